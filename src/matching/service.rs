//! The search-and-save driver

use std::sync::Arc;

use chrono::NaiveDate;
use chrono::Utc;
use serde::Serialize;

use super::criteria;
use super::photos::top_k;
use super::photos::PhotoHarvester;
use super::resolver::ProfileResolver;
use super::search::CandidateSearch;
use crate::config::AppConfig;
use crate::database::MatchStore;
use crate::models::Candidate;
use crate::models::Photo;
use crate::models::Profile;
use crate::models::SearchCriteria;
use crate::vk::VkClient;
use crate::Result;

/// One saved candidate with its best photos
#[derive(Debug, Clone, Serialize)]
pub struct MatchedCandidate {
    pub candidate: Candidate,
    pub photo_count: usize,
    pub top_photos: Vec<Photo>,
}

/// Outcome of one match run
#[derive(Debug, Clone, Default, Serialize)]
pub struct MatchReport {
    pub seed_id: i64,
    pub seed: Option<Profile>,
    pub criteria: Option<SearchCriteria>,
    pub found: usize,
    pub saved: Vec<MatchedCandidate>,
    pub failed: usize,
}

impl MatchReport {
    fn empty(seed_id: i64) -> Self {
        Self {
            seed_id,
            ..Self::default()
        }
    }

    /// First saved candidate that has at least one photo
    pub fn best_match(&self) -> Option<&MatchedCandidate> {
        self.saved.iter().find(|m| !m.top_photos.is_empty())
    }
}

/// Resolves a seed, searches for candidates, harvests and stores their photos
pub struct MatchService {
    resolver: ProfileResolver,
    search: CandidateSearch,
    harvester: PhotoHarvester,
    store: Arc<dyn MatchStore>,
    top_photos: usize,
}

impl MatchService {
    pub fn new(client: Arc<VkClient>, store: Arc<dyn MatchStore>) -> Self {
        Self {
            resolver: ProfileResolver::new(Arc::clone(&client)),
            search: CandidateSearch::new(Arc::clone(&client)),
            harvester: PhotoHarvester::new(client),
            store,
            top_photos: 3,
        }
    }

    pub fn from_config(
        config: &AppConfig,
        client: Arc<VkClient>,
        store: Arc<dyn MatchStore>,
    ) -> Self {
        let mut service = Self::new(client, store);
        service.search = service.search.with_count(config.matching.search_count);
        service.harvester = service
            .harvester
            .with_page_size(config.matching.photo_page_size);
        service.top_photos = config.matching.top_photos;
        service
    }

    #[must_use]
    pub fn with_top_photos(mut self, k: usize) -> Self {
        self.top_photos = k;
        self
    }

    pub fn store(&self) -> &Arc<dyn MatchStore> {
        &self.store
    }

    /// Run the pipeline for `seed_id` as of today
    pub async fn run(&self, seed_id: i64) -> MatchReport {
        self.run_on(seed_id, Utc::now().date_naive()).await
    }

    /// Run the pipeline with ages evaluated on `today`.
    ///
    /// Never fails: a seed that cannot be resolved or searched gives an empty
    /// report, and a candidate that cannot be stored is counted in `failed`.
    #[tracing::instrument(skip(self, today))]
    pub async fn run_on(&self, seed_id: i64, today: NaiveDate) -> MatchReport {
        let mut report = MatchReport::empty(seed_id);

        let Some(seed) = self.resolver.resolve(seed_id).await else {
            tracing::warn!(seed_id, "Seed profile unavailable or incomplete");
            return report;
        };

        let Some(criteria) = criteria::derive_on(&seed, today) else {
            tracing::warn!(seed_id, "Cannot search without age and city");
            report.seed = Some(seed);
            return report;
        };

        tracing::info!(
            seed_id,
            target_sex = %criteria.target_sex,
            age_from = criteria.age_from,
            age_to = criteria.age_to,
            city_id = criteria.city_id,
            "Searching for candidates"
        );

        let candidates = self.search.search(&criteria, &seed).await;
        report.found = candidates.len();
        report.seed = Some(seed);
        report.criteria = Some(criteria);

        for candidate in candidates {
            match self.save_candidate(&candidate).await {
                Ok(photos) => {
                    tracing::info!(
                        candidate_id = candidate.id,
                        photos = photos.len(),
                        "Candidate saved"
                    );
                    report.saved.push(MatchedCandidate {
                        photo_count: photos.len(),
                        top_photos: top_k(&photos, self.top_photos),
                        candidate,
                    });
                }
                Err(e) => {
                    tracing::error!(candidate_id = candidate.id, error = %e, "Failed to save candidate");
                    report.failed += 1;
                }
            }
        }

        tracing::info!(
            seed_id,
            found = report.found,
            saved = report.saved.len(),
            failed = report.failed,
            "Match run finished"
        );
        report
    }

    async fn save_candidate(&self, candidate: &Candidate) -> Result<Vec<Photo>> {
        let photos = self.harvester.harvest_all(candidate.id).await;
        self.store.upsert_profile(candidate).await?;
        self.store.insert_photos(candidate.id, &photos).await?;
        Ok(photos)
    }
}
