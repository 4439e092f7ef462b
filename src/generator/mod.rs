//! Spoiler statistics and HTML rendering.

mod spoiler;
mod stats;

pub use spoiler::{ResolvedSection, SpoilerDocument, SpoilerGenerator};
pub use stats::{DeckStats, TypeLineSplitter, DEFAULT_TYPE_DELIMITERS};
