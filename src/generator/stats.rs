//! Aggregate statistics over resolved cards.

use std::collections::BTreeMap;

use anyhow::{bail, Context, Result};
use regex::Regex;

use crate::api::Card;

/// Delimiters between super/card types and subtypes in a type line.
///
/// Scryfall uses an em dash; older exports and hand-typed lists use `--`.
pub const DEFAULT_TYPE_DELIMITERS: &[&str] = &["—", "--"];

/// Label for cards whose type line is empty.
const UNKNOWN_TYPE: &str = "Unknown";

/// Splits a type line at the first of a set of delimiters.
#[derive(Debug, Clone)]
pub struct TypeLineSplitter {
    pattern: Regex,
}

impl Default for TypeLineSplitter {
    fn default() -> Self {
        let delimiters: Vec<String> =
            DEFAULT_TYPE_DELIMITERS.iter().map(|d| d.to_string()).collect();
        Self::new(&delimiters).expect("default delimiters are valid")
    }
}

impl TypeLineSplitter {
    /// Create a splitter that matches any of `delimiters` literally.
    pub fn new(delimiters: &[String]) -> Result<Self> {
        if delimiters.is_empty() || delimiters.iter().any(|d| d.is_empty()) {
            bail!("Type line delimiters must be non-empty");
        }

        let alternation = delimiters
            .iter()
            .map(|d| regex::escape(d))
            .collect::<Vec<_>>()
            .join("|");
        let pattern = Regex::new(&alternation).context("Invalid type line delimiter")?;

        Ok(Self { pattern })
    }

    /// Get the primary type: the trimmed text before the first delimiter.
    pub fn primary_type<'t>(&self, type_line: &'t str) -> &'t str {
        let head = match self.pattern.find(type_line) {
            Some(m) => &type_line[..m.start()],
            None => type_line,
        };
        let head = head.trim();
        if head.is_empty() {
            UNKNOWN_TYPE
        } else {
            head
        }
    }
}

/// Totals and breakdowns for a set of cards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeckStats {
    /// Number of cards
    pub count: usize,
    /// Sum of known USD prices
    pub total_price: f64,
    /// Cards without a USD price
    pub unknown_prices: usize,
    /// Card count per primary type
    pub by_type: BTreeMap<String, usize>,
    /// Card count per truncated mana value
    pub by_mana_value: BTreeMap<i64, usize>,
}

impl DeckStats {
    /// Compute statistics over `cards`.
    pub fn compute<'c>(
        cards: impl IntoIterator<Item = &'c Card>,
        splitter: &TypeLineSplitter,
    ) -> Self {
        let mut stats = Self::default();

        for card in cards {
            stats.count += 1;

            match card.usd_price() {
                Some(price) => stats.total_price += price,
                None => stats.unknown_prices += 1,
            }

            *stats
                .by_type
                .entry(splitter.primary_type(card.type_line()).to_string())
                .or_default() += 1;
            *stats.by_mana_value.entry(card.mana_bucket()).or_default() += 1;
        }

        stats
    }

    /// Total price formatted to two decimals.
    pub fn total_display(&self) -> String {
        format!("{:.2}", self.total_price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(usd: Option<&str>, type_line: &str, cmc: f64) -> Card {
        serde_json::from_value(serde_json::json!({
            "name": "Test Card",
            "prices": { "usd": usd },
            "type_line": type_line,
            "cmc": cmc
        }))
        .unwrap()
    }

    #[test]
    fn test_primary_type() {
        let splitter = TypeLineSplitter::default();
        assert_eq!(splitter.primary_type("Creature — Elf Druid"), "Creature");
        assert_eq!(
            splitter.primary_type("Legendary Creature -- Human"),
            "Legendary Creature"
        );
        assert_eq!(splitter.primary_type("Instant"), "Instant");
        assert_eq!(
            splitter.primary_type("Artifact Creature — Assembly-Worker"),
            "Artifact Creature"
        );
        assert_eq!(splitter.primary_type(""), "Unknown");
    }

    #[test]
    fn test_custom_delimiter() {
        let splitter = TypeLineSplitter::new(&[" - ".to_string()]).unwrap();
        assert_eq!(splitter.primary_type("Creature - Elf"), "Creature");
        assert_eq!(splitter.primary_type("Creature — Elf"), "Creature — Elf");

        assert!(TypeLineSplitter::new(&[]).is_err());
        assert!(TypeLineSplitter::new(&[String::new()]).is_err());
    }

    #[test]
    fn test_null_prices_excluded_from_total() {
        let cards = vec![
            card(Some("0.25"), "Creature — Elf", 1.0),
            card(None, "Instant", 1.0),
            card(Some("1.50"), "Sorcery", 3.0),
            card(None, "Land", 0.0),
        ];

        let stats = DeckStats::compute(&cards, &TypeLineSplitter::default());
        assert_eq!(stats.count, 4);
        assert_eq!(stats.unknown_prices, 2);
        assert!((stats.total_price - 1.75).abs() < 1e-9);
        assert_eq!(stats.total_display(), "1.75");
    }

    #[test]
    fn test_breakdowns() {
        let cards = vec![
            card(Some("0.25"), "Creature — Elf", 1.0),
            card(Some("0.30"), "Creature — Goblin", 2.0),
            card(Some("0.10"), "Instant", 1.0),
            card(Some("2.00"), "Instant // Sorcery", 7.5),
        ];

        let stats = DeckStats::compute(&cards, &TypeLineSplitter::default());
        assert_eq!(stats.by_type.get("Creature"), Some(&2));
        assert_eq!(stats.by_type.get("Instant"), Some(&1));
        assert_eq!(stats.by_type.get("Instant // Sorcery"), Some(&1));
        assert_eq!(
            stats.by_mana_value.into_iter().collect::<Vec<_>>(),
            vec![(1, 2), (2, 1), (7, 1)]
        );
    }

    #[test]
    fn test_empty() {
        let cards: Vec<Card> = Vec::new();
        let stats = DeckStats::compute(&cards, &TypeLineSplitter::default());
        assert_eq!(stats.count, 0);
        assert_eq!(stats.total_display(), "0.00");
    }
}
