//! Photo harvesting and engagement ranking

use std::cmp::Reverse;
use std::sync::Arc;

use chrono::DateTime;
use chrono::Utc;

use crate::models::Photo;
use crate::vk::types::PhotoPage;
use crate::vk::types::PhotoSize;
use crate::vk::types::RawPhoto;
use crate::vk::VkClient;
use crate::Result;

/// photos.getAll accepts at most this many items per page
pub const MAX_PAGE_SIZE: u32 = 200;

/// Collects every photo of a user, page by page
#[derive(Debug, Clone)]
pub struct PhotoHarvester {
    client: Arc<VkClient>,
    page_size: u32,
}

impl PhotoHarvester {
    pub fn new(client: Arc<VkClient>) -> Self {
        Self {
            client,
            page_size: crate::config::default_photo_page_size(),
        }
    }

    #[must_use]
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.clamp(1, MAX_PAGE_SIZE);
        self
    }

    /// Fetch all photos of `owner_id`.
    ///
    /// Stops on an empty page, once the reported total is reached, or on the
    /// first failed call; in the last case the photos gathered so far are
    /// returned. Pages are separated by one rate-limit interval.
    pub async fn harvest_all(&self, owner_id: i64) -> Vec<Photo> {
        let mut photos = Vec::new();
        let mut offset: u32 = 0;

        loop {
            let page = match self.fetch_page(owner_id, offset).await {
                Ok(page) => page,
                Err(e) => {
                    tracing::warn!(
                        owner_id,
                        offset,
                        collected = photos.len(),
                        error = %e,
                        "photos.getAll failed, keeping partial result"
                    );
                    break;
                }
            };

            if page.items.is_empty() {
                break;
            }

            offset += page.items.len() as u32;
            photos.extend(page.items.into_iter().filter_map(photo_from_raw));

            if offset >= page.count {
                break;
            }
            self.client.pace().await;
        }

        tracing::debug!(owner_id, photos = photos.len(), "Harvest complete");
        photos
    }

    async fn fetch_page(&self, owner_id: i64, offset: u32) -> Result<PhotoPage> {
        self.client
            .call_typed(
                "photos.getAll",
                &[
                    ("owner_id", owner_id.to_string()),
                    ("extended", "1".to_string()),
                    ("photo_sizes", "1".to_string()),
                    ("offset", offset.to_string()),
                    ("count", self.page_size.to_string()),
                ],
            )
            .await
    }
}

/// The widest rendition; the earliest one wins a tie
pub fn best_rendition(sizes: &[PhotoSize]) -> Option<&PhotoSize> {
    sizes.iter().fold(None, |best, size| match best {
        Some(current) if current.width >= size.width => Some(current),
        _ => Some(size),
    })
}

/// Map a raw photo to its largest rendition; photos without sizes are dropped
pub fn photo_from_raw(raw: RawPhoto) -> Option<Photo> {
    let url = best_rendition(&raw.sizes)?.url.clone();
    Some(Photo {
        owner_id: raw.owner_id,
        photo_id: raw.id,
        url,
        likes_count: raw.likes.map_or(0, |c| c.count),
        comments_count: raw.comments.map_or(0, |c| c.count),
        captured_at: DateTime::<Utc>::from_timestamp(raw.date, 0).unwrap_or_default(),
    })
}

/// The `k` most engaging photos, fetch order kept among equal scores
pub fn top_k(photos: &[Photo], k: usize) -> Vec<Photo> {
    let mut ranked = photos.to_vec();
    ranked.sort_by_key(|photo| Reverse(photo.engagement_score()));
    ranked.truncate(k);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn size(width: u32, url: &str) -> PhotoSize {
        PhotoSize {
            width,
            height: width,
            url: url.to_string(),
            size_type: "x".to_string(),
        }
    }

    fn photo(id: i64, likes: u32, comments: u32) -> Photo {
        Photo {
            owner_id: 1,
            photo_id: id,
            url: format!("https://sun.example/{id}.jpg"),
            likes_count: likes,
            comments_count: comments,
            captured_at: DateTime::<Utc>::from_timestamp(1_700_000_000, 0).unwrap(),
        }
    }

    #[test]
    fn test_best_rendition_picks_widest() {
        let sizes = [size(100, "A"), size(800, "B"), size(400, "C")];
        assert_eq!(best_rendition(&sizes).unwrap().url, "B");
    }

    #[test]
    fn test_best_rendition_tie_keeps_first() {
        let sizes = [size(800, "first"), size(800, "second")];
        assert_eq!(best_rendition(&sizes).unwrap().url, "first");
        assert!(best_rendition(&[]).is_none());
    }

    #[test]
    fn test_top_k_orders_by_engagement() {
        let photos = vec![photo(1, 1, 0), photo(2, 10, 5), photo(3, 3, 3), photo(4, 0, 20)];
        let top = top_k(&photos, 3);
        let ids: Vec<i64> = top.iter().map(|p| p.photo_id).collect();
        assert_eq!(ids, vec![4, 2, 3]);
    }

    #[test]
    fn test_top_k_is_stable_on_ties() {
        let photos = vec![photo(1, 5, 0), photo(2, 2, 3), photo(3, 0, 5), photo(4, 9, 0)];
        let ids: Vec<i64> = top_k(&photos, 4).iter().map(|p| p.photo_id).collect();
        assert_eq!(ids, vec![4, 1, 2, 3]);
    }

    #[test]
    fn test_top_k_never_exceeds_available() {
        let photos = vec![photo(1, 1, 1)];
        assert_eq!(top_k(&photos, 3).len(), 1);
        assert!(top_k(&[], 3).is_empty());
    }

    #[test]
    fn test_photo_without_sizes_is_dropped() {
        let raw: RawPhoto = serde_json::from_value(serde_json::json!({
            "id": 1, "owner_id": 2, "date": 0, "sizes": []
        }))
        .unwrap();
        assert!(photo_from_raw(raw).is_none());
    }
}
