//! Scryfall card types.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// A card object as returned by the Scryfall `cards/named` endpoint.
///
/// Only the fields the spoiler reads are modelled, and each of them is
/// optional; everything else is kept in `extra`. A cached card serializes back
/// to exactly the object Scryfall sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    /// Card name (e.g., "Lightning Bolt")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Image URLs keyed by size (absent for double-faced cards)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_uris: Option<Map<String, Value>>,
    /// Faces of multi-faced cards
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_faces: Option<Vec<Map<String, Value>>>,
    /// Price strings keyed by currency
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prices: Option<Map<String, Value>>,
    /// Type line (e.g., "Creature — Elf Druid")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_line: Option<String>,
    /// Mana value, kept as sent (integer or float)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cmc: Option<Number>,
    /// Fields not read by the spoiler
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn small_uri(uris: &Map<String, Value>) -> Option<&str> {
    uris.get("small").and_then(Value::as_str)
}

impl Card {
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }

    pub fn type_line(&self) -> &str {
        self.type_line.as_deref().unwrap_or_default()
    }

    /// Get the small image URL, falling back to the front face.
    pub fn small_image(&self) -> Option<&str> {
        if let Some(small) = self.image_uris.as_ref().and_then(small_uri) {
            return Some(small);
        }
        self.card_faces
            .as_ref()
            .and_then(|faces| faces.first())
            .and_then(|face| face.get("image_uris"))
            .and_then(Value::as_object)
            .and_then(small_uri)
    }

    /// Get the USD price string. `None` means Scryfall has no price.
    pub fn usd_text(&self) -> Option<&str> {
        self.prices
            .as_ref()
            .and_then(|prices| prices.get("usd"))
            .and_then(Value::as_str)
    }

    /// Get the USD price as a number.
    ///
    /// Returns `None` when the price is null or not a decimal.
    pub fn usd_price(&self) -> Option<f64> {
        let raw = self.usd_text()?;
        match raw.trim().parse::<f64>() {
            Ok(price) if price.is_finite() => Some(price),
            _ => {
                log::warn!("Ignoring unparseable price {:?} for {}", raw, self.name());
                None
            }
        }
    }

    /// Mana value bucket, truncated toward zero. Missing means 0.
    pub fn mana_bucket(&self) -> i64 {
        self.cmc
            .as_ref()
            .and_then(Number::as_f64)
            .unwrap_or_default()
            .trunc() as i64
    }
}
