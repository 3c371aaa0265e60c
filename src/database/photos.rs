use chrono::DateTime;
use chrono::Utc;

use super::Database;
use crate::models::Photo;
use crate::Result;

type PhotoRow = (i64, i64, String, i64, i64, DateTime<Utc>);

impl Database {
    /// Append photo rows for one owner in a single transaction
    pub async fn insert_match_photos(&self, owner_id: i64, photos: &[Photo]) -> Result<()> {
        if photos.is_empty() {
            return Ok(());
        }

        let mut tx = self.pool.begin().await?;

        for photo in photos {
            sqlx::query(
                r"
                INSERT INTO match_photos
                (owner_id, photo_id, url, likes_count, comments_count, captured_at)
                VALUES ($1, $2, $3, $4, $5, $6)
                ",
            )
            .bind(owner_id)
            .bind(photo.photo_id)
            .bind(&photo.url)
            .bind(i64::from(photo.likes_count))
            .bind(i64::from(photo.comments_count))
            .bind(photo.captured_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// Highest likes + comments first; insertion order breaks ties
    pub async fn top_match_photos(&self, owner_id: i64, k: usize) -> Result<Vec<Photo>> {
        let rows: Vec<PhotoRow> = sqlx::query_as(
            r"
            SELECT owner_id, photo_id, url, likes_count, comments_count, captured_at
            FROM match_photos
            WHERE owner_id = $1
            ORDER BY (likes_count + comments_count) DESC, id ASC
            LIMIT $2
            ",
        )
        .bind(owner_id)
        .bind(k as i64)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(photo_from_row).collect())
    }
}

fn photo_from_row(row: PhotoRow) -> Photo {
    let (owner_id, photo_id, url, likes, comments, captured_at) = row;
    Photo {
        owner_id,
        photo_id,
        url,
        likes_count: u32::try_from(likes).unwrap_or(u32::MAX),
        comments_count: u32::try_from(comments).unwrap_or(u32::MAX),
        captured_at,
    }
}
