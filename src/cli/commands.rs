//! CLI command definitions and argument parsing

use clap::Parser;
use clap::Subcommand;

#[derive(Parser)]
#[command(name = "vkmatch")]
#[command(about = "VK matchmaking bot: search candidates, rank their photos, store the results")]
#[command(version)]
pub struct Cli {
    /// Enable verbose debug logging (default: info level)
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the match tables
    Init,
    /// Delete all stored profiles and photos
    Reset {
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
    /// Search matches for a seed user and store them
    Match {
        /// VK id of the seed user
        seed_id: i64,
        /// Keep results of previous runs instead of wiping them first
        #[arg(long)]
        keep: bool,
        /// Message the seed user with the best match
        #[arg(long)]
        notify: bool,
        /// Use an in-memory store instead of PostgreSQL
        #[arg(long)]
        dry_run: bool,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the most engaging stored photos of a user
    Top {
        /// VK id of the photo owner
        vk_id: i64,
        /// Number of photos to show
        #[arg(short, default_value = "3")]
        k: usize,
    },
    /// Process one chat message the way the bot would
    Handle {
        /// Message text, e.g. "find me a pair"
        text: String,
        /// VK id of the sender
        #[arg(long = "from")]
        sender_id: i64,
        /// Use an in-memory store instead of PostgreSQL
        #[arg(long)]
        dry_run: bool,
    },
    /// Show current configuration
    Config,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_match_command() {
        let cli = Cli::parse_from(["vkmatch", "-v", "match", "813472314", "--notify", "--dry-run"]);
        assert!(cli.verbose);
        match cli.command {
            Commands::Match {
                seed_id,
                keep,
                notify,
                dry_run,
                json,
            } => {
                assert_eq!(seed_id, 813_472_314);
                assert!(!keep);
                assert!(notify);
                assert!(dry_run);
                assert!(!json);
            }
            _ => panic!("expected match command"),
        }
    }

    #[test]
    fn test_parse_handle_command() {
        let cli = Cli::parse_from(["vkmatch", "handle", "find me a pair", "--from", "42"]);
        assert!(matches!(
            cli.command,
            Commands::Handle { sender_id: 42, dry_run: false, .. }
        ));
    }

    #[test]
    fn test_top_default_k() {
        let cli = Cli::parse_from(["vkmatch", "top", "7"]);
        assert!(matches!(cli.command, Commands::Top { vk_id: 7, k: 3 }));
    }
}
