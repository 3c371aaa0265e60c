//! Outbound messages to the user who asked for a match

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::matching::MatchReport;
use crate::vk::VkClient;
use crate::Result;

/// At most this many photo messages follow the summary
pub const MAX_PHOTO_MESSAGES: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    pub text: String,
    /// `photo{owner}_{id}` reference rendered inline by the client
    pub attachment: Option<String>,
}

impl OutboundMessage {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            attachment: None,
        }
    }
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, peer_id: i64, message: &OutboundMessage) -> Result<()>;
}

/// Delivers messages through messages.send
#[derive(Debug, Clone)]
pub struct VkNotifier {
    client: Arc<VkClient>,
}

impl VkNotifier {
    pub fn new(client: Arc<VkClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Notifier for VkNotifier {
    async fn send(&self, peer_id: i64, message: &OutboundMessage) -> Result<()> {
        let mut params = vec![
            ("user_id", peer_id.to_string()),
            ("random_id", random_message_id().to_string()),
            ("message", message.text.clone()),
        ];
        if let Some(attachment) = &message.attachment {
            params.push(("attachment", attachment.clone()));
        }

        self.client.call("messages.send", &params).await?;
        Ok(())
    }
}

/// Fresh 32-bit `random_id` for messages.send, taken from a v4 UUID
fn random_message_id() -> i32 {
    let bytes = Uuid::new_v4().into_bytes();
    i32::from_ne_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}

/// Summary text followed by one message per top photo of the best match
pub fn compose_messages(report: &MatchReport) -> Vec<OutboundMessage> {
    let Some(best) = report.best_match().or_else(|| report.saved.first()) else {
        return vec![OutboundMessage::text(
            "No matches found for your profile. Make sure your birthdate, sex and city are visible.",
        )];
    };

    let candidate = &best.candidate;
    let mut messages = vec![OutboundMessage::text(format!(
        "Found {} match(es). Best match: {} ({}), {}, born {}",
        report.saved.len(),
        candidate.full_name(),
        candidate.profile_url(),
        candidate.city_title,
        crate::models::format_bdate(candidate.birthdate),
    ))];

    messages.extend(
        best.top_photos
            .iter()
            .take(MAX_PHOTO_MESSAGES)
            .map(|photo| OutboundMessage {
                text: photo.url.clone(),
                attachment: Some(photo.attachment()),
            }),
    );
    messages
}
