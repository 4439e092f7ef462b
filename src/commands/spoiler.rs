//! Spoiler command - resolve a decklist and render it as HTML.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use colored::Colorize;
use tabled::{
    settings::{object::Columns, style::Style, Alignment, Modify},
    Table, Tabled,
};

use crate::api::{CardCache, CardFetcher, CardSource, ScryfallClient};
use crate::decklist::load_decklist;
use crate::generator::{
    DeckStats, ResolvedSection, SpoilerDocument, SpoilerGenerator, TypeLineSplitter,
};

/// Inputs and switches for one spoiler run.
#[derive(Debug, Clone)]
pub struct SpoilerOptions {
    pub decklist: PathBuf,
    pub cache: PathBuf,
    pub output: PathBuf,
    pub refresh: bool,
    pub escape: bool,
    pub type_delimiters: Vec<String>,
}

/// What a run resolved, for the terminal summary.
#[derive(Debug)]
pub struct RunSummary {
    /// Per-section statistics, in output order
    pub sections: Vec<(String, DeckStats)>,
    /// Statistics over every resolved card
    pub totals: DeckStats,
    /// Names the source did not recognise
    pub not_found: Vec<String>,
    /// Lookups that went over the network
    pub requests: usize,
}

/// Table row for the per-section summary.
#[derive(Tabled)]
struct SectionRow {
    #[tabled(rename = "Section")]
    label: String,
    #[tabled(rename = "Cards")]
    cards: usize,
    #[tabled(rename = "Price")]
    price: String,
    #[tabled(rename = "Unknown")]
    unknown: usize,
}

/// Execute the spoiler command against Scryfall.
pub fn execute(options: &SpoilerOptions) -> Result<()> {
    let client = ScryfallClient::new()?;
    let summary = run(options, &client)?;
    print_summary(&summary, options);
    Ok(())
}

/// Resolve the decklist through the cache and `source`, write the HTML and
/// save the cache.
///
/// Nothing is written if any lookup fails.
pub fn run<S: CardSource>(options: &SpoilerOptions, source: &S) -> Result<RunSummary> {
    let splitter = TypeLineSplitter::new(&options.type_delimiters)?;
    let generator = SpoilerGenerator::new(options.escape)?;

    let deck = load_decklist(&options.decklist)?;
    let mut cache = CardCache::load(&options.cache)?;

    let total: usize = deck.iter().map(|s| s.names.len()).sum();
    log::info!(
        "Resolving {} cards in {} sections ({} cached)",
        total,
        deck.len(),
        cache.len()
    );

    if options.refresh && !cache.is_empty() {
        log::info!("Refreshing {} cached cards", cache.len());
    }

    let mut fetcher = CardFetcher::new(source, &mut cache).with_refresh(options.refresh);
    let mut resolved = Vec::new();
    let mut not_found = Vec::new();
    let mut position = 0;

    for section in deck {
        let mut cards = Vec::new();

        for name in &section.names {
            position += 1;
            eprintln!("{} {}", format!("[{}/{}]", position, total).dimmed(), name);

            match fetcher.fetch(name)? {
                Some(card) => cards.push(card),
                None => {
                    eprintln!("{} Card not found: {}", "✗".red(), name.yellow());
                    log::warn!("Skipping unknown card {:?} in {}", name, section.label);
                    not_found.push(name.clone());
                }
            }
        }

        if cards.is_empty() {
            log::info!("Omitting section {} with no resolved cards", section.label);
            continue;
        }

        resolved.push(ResolvedSection {
            label: section.label,
            cards,
        });
    }

    let requests = fetcher.requests();

    let document = SpoilerDocument::build(&resolved, &splitter);
    let html = generator.render(&document)?;
    fs::write(&options.output, html)
        .with_context(|| format!("Failed to write spoiler: {}", options.output.display()))?;

    cache.save()?;

    let sections = resolved
        .iter()
        .map(|s| (s.label.clone(), DeckStats::compute(&s.cards, &splitter)))
        .collect();
    let totals = DeckStats::compute(resolved.iter().flat_map(|s| &s.cards), &splitter);

    Ok(RunSummary {
        sections,
        totals,
        not_found,
        requests,
    })
}

fn print_summary(summary: &RunSummary, options: &SpoilerOptions) {
    let rows: Vec<SectionRow> = summary
        .sections
        .iter()
        .map(|(label, stats)| SectionRow {
            label: label.clone(),
            cards: stats.count,
            price: format!("${}", stats.total_display()),
            unknown: stats.unknown_prices,
        })
        .collect();

    if !rows.is_empty() {
        let table = Table::new(rows)
            .with(Style::rounded())
            .with(Modify::new(Columns::new(1..=3)).with(Alignment::right()))
            .to_string();
        println!("\n{}", table);
    }

    println!(
        "{} {} cards, ${} total, {} unknown prices ({} fetched)",
        "Summary:".bold(),
        summary.totals.count.to_string().green(),
        summary.totals.total_display(),
        summary.totals.unknown_prices,
        summary.requests
    );

    if !summary.not_found.is_empty() {
        println!(
            "{} {} card(s) not found: {}",
            "!".yellow().bold(),
            summary.not_found.len(),
            summary.not_found.join(", ")
        );
    }

    println!(
        "{} Created {}",
        "✓".green().bold(),
        options.output.display().to_string().cyan()
    );
}
