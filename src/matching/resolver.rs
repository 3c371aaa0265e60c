//! Profile lookup and validation at the API boundary

use std::sync::Arc;

use crate::errors::VkMatchError;
use crate::models::parse_bdate;
use crate::models::City;
use crate::models::Profile;
use crate::models::Sex;
use crate::vk::types::RawUser;
use crate::vk::VkClient;
use crate::Result;

/// Fields requested from users.get
pub const PROFILE_FIELDS: &str = "sex,bdate,city";

/// Resolves user ids into complete [`Profile`]s
#[derive(Debug, Clone)]
pub struct ProfileResolver {
    client: Arc<VkClient>,
}

impl ProfileResolver {
    pub fn new(client: Arc<VkClient>) -> Self {
        Self { client }
    }

    /// Fetch one profile. Incomplete records and API failures both yield `None`.
    pub async fn resolve(&self, user_id: i64) -> Option<Profile> {
        let users: Vec<RawUser> = match self
            .client
            .call_typed(
                "users.get",
                &[
                    ("user_ids", user_id.to_string()),
                    ("fields", PROFILE_FIELDS.to_string()),
                ],
            )
            .await
        {
            Ok(users) => users,
            Err(e) => {
                tracing::warn!(user_id, error = %e, "Failed to fetch user profile");
                return None;
            }
        };

        let Some(raw) = users.into_iter().next() else {
            tracing::debug!(user_id, "users.get returned no record");
            return None;
        };

        match profile_from_raw(raw) {
            Ok(profile) => Some(profile),
            Err(e) => {
                tracing::debug!(user_id, reason = %e, "Incomplete profile, skipping");
                None
            }
        }
    }
}

/// Convert a raw users.get record into a complete profile
pub fn profile_from_raw(raw: RawUser) -> Result<Profile> {
    if let Some(state) = raw.deactivated {
        return Err(VkMatchError::Validation(format!("account is {state}")));
    }

    let id = raw.id.ok_or_else(|| missing("id"))?;
    let first_name = raw.first_name.ok_or_else(|| missing("first_name"))?;
    let last_name = raw.last_name.ok_or_else(|| missing("last_name"))?;
    let sex = raw
        .sex
        .and_then(Sex::from_vk)
        .ok_or_else(|| missing("sex"))?;
    let birthdate = parse_bdate(&raw.bdate.ok_or_else(|| missing("bdate"))?)?;
    let city = raw.city.ok_or_else(|| missing("city"))?;

    Ok(Profile {
        id,
        first_name,
        last_name,
        sex,
        birthdate: Some(birthdate),
        city: Some(City {
            id: city.id,
            title: city.title,
        }),
    })
}

fn missing(field: &str) -> VkMatchError {
    VkMatchError::Validation(format!("missing field {field}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;
    use wiremock::matchers::path;
    use wiremock::matchers::query_param;
    use wiremock::Mock;
    use wiremock::MockServer;
    use wiremock::ResponseTemplate;

    fn raw(value: serde_json::Value) -> RawUser {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_complete_record_converts() {
        let profile = profile_from_raw(raw(json!({
            "id": 10, "first_name": "Ivan", "last_name": "Petrov",
            "sex": 2, "bdate": "15.6.1990", "city": {"id": 1, "title": "Moscow"}
        })))
        .unwrap();
        assert_eq!(profile.sex, Sex::Male);
        assert_eq!(profile.birthdate, NaiveDate::from_ymd_opt(1990, 6, 15));
        assert_eq!(profile.city_id(), Some(1));
        assert!(profile.is_complete());
    }

    #[test]
    fn test_incomplete_records_rejected() {
        let cases = [
            json!({"id": 1, "first_name": "A", "last_name": "B", "sex": 1, "city": {"id": 1, "title": "X"}}),
            json!({"id": 1, "first_name": "A", "last_name": "B", "sex": 1, "bdate": "1.1.1990"}),
            json!({"id": 1, "first_name": "A", "last_name": "B", "sex": 0, "bdate": "1.1.1990", "city": {"id": 1, "title": "X"}}),
            json!({"id": 1, "first_name": "A", "last_name": "B", "sex": 1, "bdate": "1.1", "city": {"id": 1, "title": "X"}}),
            json!({"id": 1, "first_name": "A", "sex": 1, "bdate": "1.1.1990", "city": {"id": 1, "title": "X"}}),
            json!({"id": 1, "first_name": "DELETED", "last_name": "", "deactivated": "deleted"}),
        ];
        for case in cases {
            assert!(
                matches!(profile_from_raw(raw(case.clone())), Err(VkMatchError::Validation(_))),
                "expected rejection for {case}"
            );
        }
    }

    #[tokio::test]
    async fn test_resolve_requests_profile_fields() {
        let server = MockServer::start().await;
        Mock::given(path("/method/users.get"))
            .and(query_param("user_ids", "10"))
            .and(query_param("fields", PROFILE_FIELDS))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "response": [{
                    "id": 10, "first_name": "Ivan", "last_name": "Petrov",
                    "sex": 2, "bdate": "15.6.1990", "city": {"id": 1, "title": "Moscow"}
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = VkClient::new(&format!("{}/method/", server.uri()), "t").unwrap();
        let resolver = ProfileResolver::new(Arc::new(client));
        let profile = resolver.resolve(10).await.unwrap();
        assert_eq!(profile.first_name, "Ivan");
    }

    #[tokio::test]
    async fn test_resolve_swallows_api_errors() {
        let server = MockServer::start().await;
        Mock::given(path("/method/users.get"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "error": {"error_code": 30, "error_msg": "This profile is private"}
            })))
            .mount(&server)
            .await;

        let client = VkClient::new(&format!("{}/method/", server.uri()), "t").unwrap();
        let resolver = ProfileResolver::new(Arc::new(client));
        assert!(resolver.resolve(10).await.is_none());
    }
}
