//! Scryfall lookups and the on-disk card cache.

pub mod cache;
pub mod client;
mod fetcher;
mod types;

pub use cache::CardCache;
pub use client::{CardSource, ScryfallClient};
pub use fetcher::CardFetcher;
pub use types::Card;
