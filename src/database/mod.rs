use async_trait::async_trait;
use sqlx::PgPool;

use crate::models::Candidate;
use crate::models::Photo;
use crate::Result;

mod memory;
mod photos;
mod profiles;
mod schema;

pub use memory::MemoryStore;

/// Row counts of the match tables
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreCounts {
    pub profiles: u64,
    pub photos: u64,
}

/// Storage contract of the match pipeline
///
/// Every call acquires and releases its own connection or lock.
#[async_trait]
pub trait MatchStore: Send + Sync {
    /// Delete every profile and photo row in one transaction
    async fn wipe(&self) -> Result<()>;

    /// Insert or update a profile keyed by its VK id
    async fn upsert_profile(&self, candidate: &Candidate) -> Result<()>;

    /// Append one row per photo; rows from earlier runs are kept
    async fn insert_photos(&self, owner_id: i64, photos: &[Photo]) -> Result<()>;

    /// The `k` stored photos of `owner_id` with the highest likes + comments
    async fn top_photos(&self, owner_id: i64, k: usize) -> Result<Vec<Photo>>;

    async fn get_profile(&self, vk_id: i64) -> Result<Option<Candidate>>;

    async fn counts(&self) -> Result<StoreCounts>;
}

/// Database connection pool wrapper
#[derive(Debug, Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new database instance from configuration
    pub async fn from_config(config: &crate::config::AppConfig) -> Result<Self> {
        let pool_options = sqlx::postgres::PgPoolOptions::new()
            .max_connections(config.max_connections())
            .min_connections(config.min_connections())
            .acquire_timeout(std::time::Duration::from_secs(config.connection_timeout()));

        let pool = pool_options.connect(config.database_url()).await?;

        tracing::info!(
            "Database pool configured: max_connections={}, min_connections={}",
            config.max_connections(),
            config.min_connections()
        );

        Ok(Self::new(pool))
    }

    /// Get a reference to the database pool for raw queries
    #[must_use]
    pub const fn pool(&self) -> &sqlx::PgPool {
        &self.pool
    }
}

#[async_trait]
impl MatchStore for Database {
    async fn wipe(&self) -> Result<()> {
        self.wipe_tables().await
    }

    async fn upsert_profile(&self, candidate: &Candidate) -> Result<()> {
        self.upsert_match_profile(candidate).await
    }

    async fn insert_photos(&self, owner_id: i64, photos: &[Photo]) -> Result<()> {
        self.insert_match_photos(owner_id, photos).await
    }

    async fn top_photos(&self, owner_id: i64, k: usize) -> Result<Vec<Photo>> {
        self.top_match_photos(owner_id, k).await
    }

    async fn get_profile(&self, vk_id: i64) -> Result<Option<Candidate>> {
        self.get_match_profile(vk_id).await
    }

    async fn counts(&self) -> Result<StoreCounts> {
        self.table_counts().await
    }
}
