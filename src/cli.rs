use clap::{Parser, Subcommand};
use color_eyre::eyre::{self, eyre};
use rand::seq::IndexedRandom;

use crate::api::{GiphyClient, SearchOutcome};
use crate::config::load_config;
use crate::credentials::load_api_key;
use crate::media::ResultItem;

// ---------------------------------------------------------------------------
// CLI definition
// ---------------------------------------------------------------------------

#[derive(Parser)]
#[command(name = "jiffy", about = "Search GIPHY from the terminal")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<CliCommand>,
}

#[derive(Subcommand)]
pub enum CliCommand {
    /// Launch the interactive TUI (default)
    Tui,
    /// Search once and print a random result (JSONL)
    Search {
        /// Search term
        term: String,
        /// Print every result instead of one random pick
        #[arg(long)]
        all: bool,
    },
}

// ---------------------------------------------------------------------------
// Client construction (shared with main.rs TUI path)
// ---------------------------------------------------------------------------

/// Build a `GiphyClient` from the environment API key + config.
pub fn build_api_client() -> eyre::Result<GiphyClient> {
    let config = load_config();
    let api_key = load_api_key()?;
    Ok(GiphyClient::new(api_key, &config)?)
}

// ---------------------------------------------------------------------------
// Command execution
// ---------------------------------------------------------------------------

/// Print results as JSONL to stdout.
fn print_items<'a>(items: impl IntoIterator<Item = &'a ResultItem>) -> eyre::Result<()> {
    for item in items {
        println!("{}", serde_json::to_string(item)?);
    }
    Ok(())
}

/// Execute a non-interactive command.
pub async fn run_command(cmd: CliCommand) -> eyre::Result<()> {
    match cmd {
        CliCommand::Search { term, all } => {
            let term = term.trim().to_string();
            if term.is_empty() {
                return Err(eyre!("search term is empty"));
            }
            let client = build_api_client()?;
            match client.search(&term).await {
                SearchOutcome::Found(items) if all => print_items(&items),
                SearchOutcome::Found(items) => print_items(items.choose(&mut rand::rng())),
                SearchOutcome::Empty => Err(eyre!("Nothing found for {term}")),
                SearchOutcome::Failed(message) => Err(eyre!(message)),
            }
        }
        CliCommand::Tui => Err(eyre!("`tui` is interactive; run it without a batch command")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_means_tui() {
        let cli = Cli::try_parse_from(["jiffy"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn parses_search_flags() {
        let cli = Cli::try_parse_from(["jiffy", "search", "cats", "--all"]).unwrap();
        match cli.command {
            Some(CliCommand::Search { term, all }) => {
                assert_eq!(term, "cats");
                assert!(all);
            }
            _ => panic!("expected search"),
        }
    }

    #[test]
    fn search_requires_term() {
        assert!(Cli::try_parse_from(["jiffy", "search"]).is_err());
    }

    #[tokio::test]
    async fn blank_term_is_rejected() {
        let err = run_command(CliCommand::Search {
            term: "  ".into(),
            all: false,
        })
        .await
        .unwrap_err();
        assert_eq!(err.to_string(), "search term is empty");
    }
}
