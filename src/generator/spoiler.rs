//! HTML spoiler generation.

use anyhow::{Context, Result};
use minijinja::{AutoEscape, Environment};
use serde::Serialize;

use super::stats::{DeckStats, TypeLineSplitter};
use crate::api::Card;

/// A decklist section with its cards resolved.
#[derive(Debug, Clone)]
pub struct ResolvedSection {
    pub label: String,
    pub cards: Vec<Card>,
}

/// Everything the spoiler template renders.
#[derive(Debug, Serialize)]
pub struct SpoilerDocument {
    pub header: SpoilerHeader,
    pub sections: Vec<SectionBlock>,
}

/// Aggregate numbers shown above the sections.
#[derive(Debug, Serialize)]
pub struct SpoilerHeader {
    pub count: usize,
    pub total: String,
    pub unknown: usize,
    pub types: Vec<Bucket>,
    pub mana_values: Vec<Bucket>,
}

/// One row of a breakdown.
#[derive(Debug, Serialize)]
pub struct Bucket {
    pub label: String,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct SectionBlock {
    pub label: String,
    pub count: usize,
    pub cards: Vec<CardEntry>,
}

#[derive(Debug, Serialize)]
pub struct CardEntry {
    pub name: String,
    pub image: Option<String>,
    /// USD price as Scryfall reports it, `None` when unknown
    pub price: Option<String>,
}

impl SpoilerDocument {
    /// Build the document model for resolved sections.
    pub fn build(sections: &[ResolvedSection], splitter: &TypeLineSplitter) -> Self {
        let stats = DeckStats::compute(sections.iter().flat_map(|s| &s.cards), splitter);

        let header = SpoilerHeader {
            count: stats.count,
            total: stats.total_display(),
            unknown: stats.unknown_prices,
            types: stats
                .by_type
                .iter()
                .map(|(label, &count)| Bucket {
                    label: label.clone(),
                    count,
                })
                .collect(),
            mana_values: stats
                .by_mana_value
                .iter()
                .map(|(value, &count)| Bucket {
                    label: value.to_string(),
                    count,
                })
                .collect(),
        };

        let sections = sections
            .iter()
            .map(|section| SectionBlock {
                label: section.label.clone(),
                count: section.cards.len(),
                cards: section.cards.iter().map(CardEntry::from_card).collect(),
            })
            .collect();

        Self { header, sections }
    }
}

impl CardEntry {
    fn from_card(card: &Card) -> Self {
        Self {
            name: card.name().to_string(),
            image: card.small_image().map(str::to_string),
            price: card.usd_price().and(card.usd_text().map(str::to_string)),
        }
    }
}

/// Renders spoiler documents to HTML.
pub struct SpoilerGenerator {
    env: Environment<'static>,
}

impl SpoilerGenerator {
    /// Create a generator. With `escape` off, labels and names are emitted
    /// verbatim.
    pub fn new(escape: bool) -> Result<Self> {
        let mut env = Environment::new();
        env.set_auto_escape_callback(move |_| {
            if escape {
                AutoEscape::Html
            } else {
                AutoEscape::None
            }
        });
        env.add_template("spoiler", include_str!("../../templates/spoiler.html.jinja"))
            .context("Failed to add spoiler template")?;
        Ok(Self { env })
    }

    /// Render a document to a complete HTML page.
    pub fn render(&self, document: &SpoilerDocument) -> Result<String> {
        let template = self.env.get_template("spoiler")?;
        template
            .render(document)
            .context("Failed to render spoiler template")
    }
}
