use super::Database;
use super::StoreCounts;
use crate::Result;

impl Database {
    /// Initialize database schema
    pub async fn init_schema(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS match_profiles (
                vk_id BIGINT PRIMARY KEY,
                first_name TEXT NOT NULL,
                last_name TEXT NOT NULL,
                sex SMALLINT NOT NULL,
                birthdate DATE NOT NULL,
                city_id BIGINT NOT NULL,
                city_title TEXT NOT NULL,
                updated_at TIMESTAMP WITH TIME ZONE DEFAULT NOW()
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        // No uniqueness on photos: every harvest appends
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS match_photos (
                id BIGSERIAL PRIMARY KEY,
                owner_id BIGINT NOT NULL,
                photo_id BIGINT NOT NULL,
                url TEXT NOT NULL,
                likes_count BIGINT NOT NULL DEFAULT 0,
                comments_count BIGINT NOT NULL DEFAULT 0,
                captured_at TIMESTAMP WITH TIME ZONE NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_match_photos_owner ON match_photos (owner_id)",
        )
        .execute(&self.pool)
        .await?;

        tracing::info!("Match schema initialized");
        Ok(())
    }

    /// Delete all match data in one transaction; safe on empty tables
    pub async fn wipe_tables(&self) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        let photos = sqlx::query("DELETE FROM match_photos")
            .execute(&mut *tx)
            .await?
            .rows_affected();
        let profiles = sqlx::query("DELETE FROM match_profiles")
            .execute(&mut *tx)
            .await?
            .rows_affected();

        tx.commit().await?;
        tracing::info!(profiles, photos, "Match tables wiped");
        Ok(())
    }

    pub async fn table_counts(&self) -> Result<StoreCounts> {
        let (profiles, photos): (i64, i64) = sqlx::query_as(
            "SELECT (SELECT COUNT(*) FROM match_profiles), (SELECT COUNT(*) FROM match_photos)",
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(StoreCounts {
            profiles: profiles as u64,
            photos: photos as u64,
        })
    }
}
