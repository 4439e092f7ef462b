//! Scryfall API client.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::blocking::Client;
use reqwest::StatusCode;
use thiserror::Error;

use super::types::Card;

/// Scryfall endpoint for exact-name card lookups.
const SCRYFALL_NAMED_URL: &str = "https://api.scryfall.com/cards/named";

/// Scryfall asks every client to identify itself.
const USER_AGENT: &str = concat!("deck-spoiler/", env!("CARGO_PKG_VERSION"));

/// Failure of a card lookup other than "not found".
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request for '{name}' failed")]
    Transport {
        name: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("lookup of '{name}' returned {status}")]
    Status { name: String, status: StatusCode },

    #[error("malformed card data for '{name}'")]
    Malformed {
        name: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Something that can resolve a card by its exact name.
///
/// `Ok(None)` means the source has no such card.
pub trait CardSource {
    fn named(&self, name: &str) -> Result<Option<Card>, FetchError>;
}

/// Client for the Scryfall API.
pub struct ScryfallClient {
    client: Client,
    base_url: String,
}

impl ScryfallClient {
    /// Create a new API client.
    pub fn new() -> Result<Self> {
        Self::with_base_url(SCRYFALL_NAMED_URL)
    }

    /// Create a client against a different named-card endpoint (for testing).
    pub fn with_base_url(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Look up a card by exact name.
    pub fn get_card(&self, name: &str) -> Result<Option<Card>, FetchError> {
        let url = format!("{}?exact={}", self.base_url, urlencoding::encode(name));
        log::info!("Fetching card from Scryfall: {}", url);

        let transport = |source: reqwest::Error| FetchError::Transport {
            name: name.to_string(),
            source,
        };

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .map_err(transport)?;

        match response.status() {
            StatusCode::OK => {}
            StatusCode::NOT_FOUND => return Ok(None),
            status => {
                return Err(FetchError::Status {
                    name: name.to_string(),
                    status,
                })
            }
        }

        let body = response.text().map_err(transport)?;
        let card = serde_json::from_str(&body).map_err(|source| FetchError::Malformed {
            name: name.to_string(),
            source,
        })?;

        Ok(Some(card))
    }
}

impl CardSource for ScryfallClient {
    fn named(&self, name: &str) -> Result<Option<Card>, FetchError> {
        self.get_card(name)
    }
}
