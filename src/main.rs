//! deck-spoiler - render a decklist as a static HTML spoiler.
//!
//! Each card name in the decklist is looked up on Scryfall (through a local
//! cache that trusts entries for 12 hours) and the results are written to a
//! single HTML page with images, prices and type / mana value breakdowns.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

mod api;
mod commands;
mod decklist;
mod generator;

use api::cache::DEFAULT_CACHE_FILE;
use commands::spoiler::SpoilerOptions;

#[derive(Parser)]
#[command(name = "deck-spoiler")]
#[command(author, version, about = "Render a decklist as an HTML spoiler using Scryfall data")]
struct Cli {
    /// Decklist file: one card name per line, `#` lines start a section
    decklist: PathBuf,

    /// Card cache file
    #[arg(long, default_value = DEFAULT_CACHE_FILE)]
    cache: PathBuf,

    /// Output HTML file
    #[arg(short, long, default_value = "deck.html")]
    output: PathBuf,

    /// Ignore cached cards and re-fetch everything
    #[arg(long)]
    refresh: bool,

    /// Emit section labels and card names without HTML escaping
    #[arg(long)]
    no_escape: bool,

    /// Delimiter between types and subtypes in a type line (repeatable)
    #[arg(
        long = "type-delimiter",
        value_name = "TEXT",
        default_values_t = default_type_delimiters()
    )]
    type_delimiters: Vec<String>,
}

fn default_type_delimiters() -> Vec<String> {
    generator::DEFAULT_TYPE_DELIMITERS
        .iter()
        .map(|d| d.to_string())
        .collect()
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let options = SpoilerOptions {
        decklist: cli.decklist,
        cache: cli.cache,
        output: cli.output,
        refresh: cli.refresh,
        escape: !cli.no_escape,
        type_delimiters: cli.type_delimiters,
    };

    commands::spoiler::execute(&options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["deck-spoiler", "deck.txt"]).unwrap();
        assert_eq!(cli.decklist, PathBuf::from("deck.txt"));
        assert_eq!(cli.cache, PathBuf::from(".cache.json"));
        assert_eq!(cli.output, PathBuf::from("deck.html"));
        assert!(!cli.refresh);
        assert!(!cli.no_escape);
        assert_eq!(cli.type_delimiters, vec!["—", "--"]);
    }

    #[test]
    fn test_cli_requires_decklist() {
        assert!(Cli::try_parse_from(["deck-spoiler"]).is_err());
    }
}
