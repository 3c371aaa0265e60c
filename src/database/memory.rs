//! In-process store for dry runs and tests

use std::cmp::Reverse;

use async_trait::async_trait;
use dashmap::DashMap;

use super::MatchStore;
use super::StoreCounts;
use crate::models::Candidate;
use crate::models::Photo;
use crate::Result;

#[derive(Debug, Default)]
pub struct MemoryStore {
    profiles: DashMap<i64, Candidate>,
    photos: DashMap<i64, Vec<Photo>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MatchStore for MemoryStore {
    async fn wipe(&self) -> Result<()> {
        self.photos.clear();
        self.profiles.clear();
        Ok(())
    }

    async fn upsert_profile(&self, candidate: &Candidate) -> Result<()> {
        self.profiles.insert(candidate.id, candidate.clone());
        Ok(())
    }

    async fn insert_photos(&self, owner_id: i64, photos: &[Photo]) -> Result<()> {
        self.photos
            .entry(owner_id)
            .or_default()
            .extend_from_slice(photos);
        Ok(())
    }

    async fn top_photos(&self, owner_id: i64, k: usize) -> Result<Vec<Photo>> {
        let mut photos = self
            .photos
            .get(&owner_id)
            .map(|rows| rows.value().clone())
            .unwrap_or_default();
        photos.sort_by_key(|photo| Reverse(photo.engagement_score()));
        photos.truncate(k);
        Ok(photos)
    }

    async fn get_profile(&self, vk_id: i64) -> Result<Option<Candidate>> {
        Ok(self.profiles.get(&vk_id).map(|entry| entry.value().clone()))
    }

    async fn counts(&self) -> Result<StoreCounts> {
        let photos = self.photos.iter().map(|entry| entry.value().len() as u64).sum();
        Ok(StoreCounts {
            profiles: self.profiles.len() as u64,
            photos,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Sex;
    use chrono::NaiveDate;
    use chrono::Utc;

    fn candidate(id: i64) -> Candidate {
        Candidate {
            id,
            first_name: "Maria".to_string(),
            last_name: "K".to_string(),
            birthdate: NaiveDate::from_ymd_opt(1990, 1, 20).unwrap(),
            sex: Sex::Female,
            city_id: 1,
            city_title: "X".to_string(),
        }
    }

    fn photo(owner_id: i64, photo_id: i64, likes: u32) -> Photo {
        Photo {
            owner_id,
            photo_id,
            url: format!("https://sun.example/{photo_id}.jpg"),
            likes_count: likes,
            comments_count: 0,
            captured_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_wipe_is_idempotent() {
        let store = MemoryStore::new();
        store.wipe().await.unwrap();

        store.upsert_profile(&candidate(1)).await.unwrap();
        store.insert_photos(1, &[photo(1, 1, 3)]).await.unwrap();
        assert_eq!(
            store.counts().await.unwrap(),
            StoreCounts {
                profiles: 1,
                photos: 1
            }
        );

        store.wipe().await.unwrap();
        assert_eq!(store.counts().await.unwrap(), StoreCounts::default());
        store.wipe().await.unwrap();
        assert_eq!(store.counts().await.unwrap(), StoreCounts::default());
    }

    #[tokio::test]
    async fn test_upsert_replaces_and_photos_append() {
        let store = MemoryStore::new();
        store.upsert_profile(&candidate(1)).await.unwrap();
        let mut renamed = candidate(1);
        renamed.first_name = "Masha".to_string();
        store.upsert_profile(&renamed).await.unwrap();

        store.insert_photos(1, &[photo(1, 1, 3)]).await.unwrap();
        store.insert_photos(1, &[photo(1, 1, 3)]).await.unwrap();

        let counts = store.counts().await.unwrap();
        assert_eq!(counts.profiles, 1);
        assert_eq!(counts.photos, 2);
        assert_eq!(
            store.get_profile(1).await.unwrap().unwrap().first_name,
            "Masha"
        );
    }

    #[tokio::test]
    async fn test_top_photos_per_owner() {
        let store = MemoryStore::new();
        store
            .insert_photos(1, &[photo(1, 1, 3), photo(1, 2, 9), photo(1, 3, 5), photo(1, 4, 1)])
            .await
            .unwrap();
        store.insert_photos(2, &[photo(2, 5, 100)]).await.unwrap();

        let ids: Vec<i64> = store
            .top_photos(1, 3)
            .await
            .unwrap()
            .iter()
            .map(|p| p.photo_id)
            .collect();
        assert_eq!(ids, vec![2, 3, 1]);
        assert!(store.top_photos(3, 3).await.unwrap().is_empty());
    }
}
