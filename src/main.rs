use clap::Parser;
use tracing::info;
use vkmatch::cli::Cli;
use vkmatch::cli::Commands;
use vkmatch::config::AppConfig;
use vkmatch::Result;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = AppConfig::load()?;

    // Initialize logging
    if cli.verbose {
        vkmatch::logging::init_logging_with_level("debug")?;
    } else {
        vkmatch::logging::init_logging_with_config(Some(&config))?;
    }
    info!("Configuration loaded successfully");

    // Execute the requested command
    match cli.command {
        Commands::Init => {
            vkmatch::cli::handle_init_command(&config).await?;
        }
        Commands::Reset { force } => {
            vkmatch::cli::handle_reset_command(&config, force).await?;
        }
        Commands::Match {
            seed_id,
            keep,
            notify,
            dry_run,
            json,
        } => {
            vkmatch::cli::handle_match_command(&config, seed_id, keep, notify, dry_run, json)
                .await?;
        }
        Commands::Top { vk_id, k } => {
            vkmatch::cli::handle_top_command(&config, vk_id, k).await?;
        }
        Commands::Handle {
            text,
            sender_id,
            dry_run,
        } => {
            vkmatch::cli::handle_message_command(&config, &text, sender_id, dry_run).await?;
        }
        Commands::Config => {
            vkmatch::cli::handle_config_command(&config)?;
        }
    }

    Ok(())
}
