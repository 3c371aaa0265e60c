//! CLI command handlers

use std::io::stdin;
use std::sync::Arc;

use crate::bot::compose_messages;
use crate::bot::MatchBot;
use crate::bot::Notifier;
use crate::bot::VkNotifier;
use crate::cli::output::print_candidate;
use crate::cli::output::print_config;
use crate::cli::output::print_error;
use crate::cli::output::print_info;
use crate::cli::output::print_match_report;
use crate::cli::output::print_photo_list;
use crate::cli::output::print_prompt;
use crate::cli::output::print_success;
use crate::cli::output::print_warning;
use crate::database::Database;
use crate::database::MatchStore;
use crate::database::MemoryStore;
use crate::matching::MatchService;
use crate::vk::VkClient;
use crate::AppConfig;
use crate::Result;

/// PostgreSQL store with the schema in place, or an in-memory one for dry runs
async fn open_store(config: &AppConfig, dry_run: bool) -> Result<Arc<dyn MatchStore>> {
    if dry_run {
        print_info("Dry run: results are kept in memory only");
        return Ok(Arc::new(MemoryStore::new()));
    }

    let database = Database::from_config(config).await?;
    database.init_schema().await?;
    Ok(Arc::new(database))
}

fn build_service(config: &AppConfig, store: Arc<dyn MatchStore>) -> Result<MatchService> {
    let client = Arc::new(VkClient::from_config(config)?);
    Ok(MatchService::from_config(config, client, store))
}

/// Handle database initialization command
pub async fn handle_init_command(config: &AppConfig) -> Result<()> {
    let database = Database::from_config(config).await?;
    database.init_schema().await?;
    print_success("Match tables created");
    Ok(())
}

/// Handle database reset command
pub async fn handle_reset_command(config: &AppConfig, force: bool) -> Result<()> {
    if !force {
        print_warning("This will delete ALL stored profiles and photos!");
        print_prompt("Are you sure you want to continue? (y/N) ");

        let mut input = String::new();
        stdin().read_line(&mut input)?;

        if !input.trim().to_lowercase().starts_with('y') {
            print_info("Operation cancelled.");
            return Ok(());
        }
    }

    let store = open_store(config, false).await?;
    store.wipe().await?;
    print_success("All match data deleted");
    Ok(())
}

/// Handle the match pipeline command
pub async fn handle_match_command(
    config: &AppConfig,
    seed_id: i64,
    keep: bool,
    notify: bool,
    dry_run: bool,
    json: bool,
) -> Result<()> {
    let store = open_store(config, dry_run).await?;
    if !keep {
        store.wipe().await?;
    }

    let service = build_service(config, store)?;
    let report = service.run(seed_id).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_match_report(&report);
    }

    if notify {
        let notifier = VkNotifier::new(Arc::new(VkClient::chat_from_config(config)?));
        for message in compose_messages(&report) {
            if let Err(e) = notifier.send(seed_id, &message).await {
                print_error(&format!("Failed to message user {seed_id}: {e}"));
            }
        }
    }

    Ok(())
}

/// Handle the stored top photos command
pub async fn handle_top_command(config: &AppConfig, vk_id: i64, k: usize) -> Result<()> {
    let store = open_store(config, false).await?;

    match store.get_profile(vk_id).await? {
        Some(candidate) => {
            let photos = store.top_photos(vk_id, k).await?;
            print_candidate(&candidate, photos.len());
            print_photo_list(&photos);
        }
        None => print_warning(&format!("No stored profile with id {vk_id}")),
    }
    Ok(())
}

/// Handle one chat message as the bot
pub async fn handle_message_command(
    config: &AppConfig,
    text: &str,
    sender_id: i64,
    dry_run: bool,
) -> Result<()> {
    let store = open_store(config, dry_run).await?;
    let service = build_service(config, store)?;
    let notifier = Arc::new(VkNotifier::new(Arc::new(VkClient::chat_from_config(config)?)));
    let bot = MatchBot::new(service, notifier, config.bot.trigger_phrase.clone());

    match bot.handle_message(text, sender_id).await {
        Some(report) => print_match_report(&report),
        None => print_info(&format!(
            "Not a command (expected {:?})",
            config.bot.trigger_phrase
        )),
    }
    Ok(())
}

/// Handle config display command
pub fn handle_config_command(config: &AppConfig) -> Result<()> {
    print_config(config);
    Ok(())
}
