//! Decklist parsing.
//!
//! A decklist is plain text with one card name per line. Lines starting with
//! `#` open a new section labelled with the whole line; cards before the
//! first marker go into an implicit "Main" section.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// Marker that starts a section line.
const SECTION_MARKER: char = '#';

/// Label of the section cards land in before any marker.
pub const DEFAULT_SECTION: &str = "Main";

/// A labelled group of card names, in decklist order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeckSection {
    pub label: String,
    pub names: Vec<String>,
}

impl DeckSection {
    fn new(label: &str) -> Self {
        Self {
            label: label.to_string(),
            names: Vec::new(),
        }
    }
}

/// Read and parse a decklist file.
pub fn load_decklist(path: &Path) -> Result<Vec<DeckSection>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read decklist: {}", path.display()))?;
    Ok(parse_decklist(&content))
}

/// Split decklist text into sections.
///
/// Blank lines are skipped and sections without any card lines are dropped.
pub fn parse_decklist(content: &str) -> Vec<DeckSection> {
    let mut sections = Vec::new();
    let mut current: Option<DeckSection> = None;

    for line in content.lines() {
        let line = line.trim_end_matches('\r');
        if line.is_empty() {
            continue;
        }

        if line.starts_with(SECTION_MARKER) {
            if let Some(section) = current.take().filter(|s| !s.names.is_empty()) {
                sections.push(section);
            }
            current = Some(DeckSection::new(line));
        } else {
            current
                .get_or_insert_with(|| DeckSection::new(DEFAULT_SECTION))
                .names
                .push(line.to_string());
        }
    }

    if let Some(section) = current.filter(|s| !s.names.is_empty()) {
        sections.push(section);
    }

    sections
}
