//! Candidate search: one users.search page, re-validated hit by hit

use std::ops::RangeInclusive;
use std::sync::Arc;

use super::resolver::ProfileResolver;
use crate::models::Candidate;
use crate::models::Profile;
use crate::models::SearchCriteria;
use crate::vk::types::SearchPage;
use crate::vk::VkClient;

/// users.search never returns more than this many hits per call
pub const MAX_SEARCH_COUNT: u32 = 1000;

/// Searches the network for candidates matching a seed profile
#[derive(Debug, Clone)]
pub struct CandidateSearch {
    client: Arc<VkClient>,
    resolver: ProfileResolver,
    count: u32,
}

impl CandidateSearch {
    pub fn new(client: Arc<VkClient>) -> Self {
        let resolver = ProfileResolver::new(Arc::clone(&client));
        Self {
            client,
            resolver,
            count: MAX_SEARCH_COUNT,
        }
    }

    #[must_use]
    pub fn with_count(mut self, count: u32) -> Self {
        self.count = count.clamp(1, MAX_SEARCH_COUNT);
        self
    }

    /// Run one search and keep the hits whose fresh profile shares the
    /// seed's city and falls into its birth-year window.
    ///
    /// The upstream filters are only a coarse pre-filter. A seed without a
    /// city or birthdate, or a failing search call, gives an empty result.
    pub async fn search(&self, criteria: &SearchCriteria, seed: &Profile) -> Vec<Candidate> {
        let Some(city_id) = seed.city_id() else {
            tracing::info!(seed_id = seed.id, "City not available for seed, nothing to search");
            return Vec::new();
        };
        let Some(window) = birth_year_window(seed) else {
            tracing::info!(seed_id = seed.id, "Birthdate not available for seed, nothing to search");
            return Vec::new();
        };

        let page: SearchPage = match self
            .client
            .call_typed(
                "users.search",
                &[
                    ("sex", criteria.target_sex.vk_code().to_string()),
                    ("city", city_id.to_string()),
                    ("age_from", criteria.age_from.to_string()),
                    ("age_to", criteria.age_to.to_string()),
                    ("count", self.count.to_string()),
                ],
            )
            .await
        {
            Ok(page) => page,
            Err(e) => {
                tracing::warn!(seed_id = seed.id, error = %e, "users.search failed");
                return Vec::new();
            }
        };

        tracing::info!(
            seed_id = seed.id,
            total = page.count,
            returned = page.items.len(),
            "users.search returned hits, re-validating"
        );

        let mut candidates = Vec::new();
        for (index, hit) in page.items.iter().enumerate() {
            if index > 0 {
                self.client.pace().await;
            }
            let Some(profile) = self.resolver.resolve(hit.id).await else {
                continue;
            };
            if accepts(&profile, city_id, &window) {
                if let Some(candidate) = Candidate::from_profile(&profile) {
                    candidates.push(candidate);
                }
            } else {
                tracing::debug!(
                    user_id = profile.id,
                    city_id = ?profile.city_id(),
                    birth_year = ?profile.birth_year(),
                    "Hit rejected by city/birth-year re-check"
                );
            }
        }

        tracing::info!(seed_id = seed.id, accepted = candidates.len(), "Search complete");
        candidates
    }
}

/// `[birth_year - 1, birth_year + 1]` of the seed
pub fn birth_year_window(seed: &Profile) -> Option<RangeInclusive<i32>> {
    let year = seed.birth_year()?;
    Some(year - 1..=year + 1)
}

fn accepts(profile: &Profile, city_id: i64, window: &RangeInclusive<i32>) -> bool {
    profile.city_id() == Some(city_id)
        && profile
            .birth_year()
            .is_some_and(|year| window.contains(&year))
}
