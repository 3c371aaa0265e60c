//! Wire schemas of the VK API responses used by the matcher
//!
//! Everything here mirrors the JSON as sent by VK and is converted into
//! [`crate::models`] types at the first opportunity.

use serde::Deserialize;

/// Top-level body of every VK API reply
#[derive(Debug, Clone, Deserialize)]
pub struct ApiEnvelope {
    pub response: Option<serde_json::Value>,
    pub error: Option<ApiErrorBody>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    pub error_code: i64,
    #[serde(default)]
    pub error_msg: String,
}

/// One record of `users.get`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawUser {
    pub id: Option<i64>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub sex: Option<i64>,
    pub bdate: Option<String>,
    pub city: Option<RawCity>,
    /// Set to `deleted` or `banned` for inaccessible accounts
    pub deactivated: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawCity {
    pub id: i64,
    #[serde(default)]
    pub title: String,
}

/// `users.search` result page
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchPage {
    #[serde(default)]
    pub count: u32,
    #[serde(default)]
    pub items: Vec<SearchHit>,
}

/// Only the id of a search hit is used; embedded fields are re-fetched
#[derive(Debug, Clone, Deserialize)]
pub struct SearchHit {
    pub id: i64,
}

/// `photos.getAll` result page
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PhotoPage {
    #[serde(default)]
    pub count: u32,
    #[serde(default)]
    pub items: Vec<RawPhoto>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawPhoto {
    pub id: i64,
    pub owner_id: i64,
    /// Unix timestamp of the upload
    #[serde(default)]
    pub date: i64,
    #[serde(default)]
    pub sizes: Vec<PhotoSize>,
    pub likes: Option<Counter>,
    pub comments: Option<Counter>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PhotoSize {
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
    pub url: String,
    #[serde(rename = "type", default)]
    pub size_type: String,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct Counter {
    #[serde(default)]
    pub count: u32,
}
