//! Chat bot: turns a "find me a pair" message into a match run and a reply

pub mod command;
pub mod notifier;

use std::sync::Arc;

pub use command::BotCommand;
pub use notifier::compose_messages;
pub use notifier::Notifier;
pub use notifier::OutboundMessage;
pub use notifier::VkNotifier;

use crate::matching::MatchReport;
use crate::matching::MatchService;

pub struct MatchBot {
    service: MatchService,
    notifier: Arc<dyn Notifier>,
    trigger: String,
}

impl MatchBot {
    pub fn new(service: MatchService, notifier: Arc<dyn Notifier>, trigger: impl Into<String>) -> Self {
        Self {
            service,
            notifier,
            trigger: trigger.into(),
        }
    }

    /// Handle one inbound message; `None` when it is not a command.
    ///
    /// Previous results are wiped, the pipeline runs for the requested seed
    /// and the sender receives a summary plus the best match's top photos.
    /// Storage and delivery failures are logged, the run still completes.
    pub async fn handle_message(&self, text: &str, sender_id: i64) -> Option<MatchReport> {
        let command = BotCommand::parse(text, sender_id, &self.trigger)?;
        tracing::info!(sender_id, seed_id = command.seed_id, "Match command received");

        if let Err(e) = self.service.store().wipe().await {
            tracing::error!(error = %e, "Failed to wipe previous results");
        }

        let report = self.service.run(command.seed_id).await;
        self.notify(sender_id, &report).await;
        Some(report)
    }

    async fn notify(&self, peer_id: i64, report: &MatchReport) {
        for message in compose_messages(report) {
            if let Err(e) = self.notifier.send(peer_id, &message).await {
                tracing::error!(peer_id, error = %e, "Failed to deliver message");
            }
        }
    }
}
