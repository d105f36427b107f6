use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Card -- a single trading card as returned by the remote API
// ---------------------------------------------------------------------------

/// A single card record.
///
/// Immutable once fetched. Equality and hashing are defined by `id` alone,
/// so two fetches of the same card compare equal even when the API projects
/// different optional fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: String,
    pub name: String,
    pub hp: Option<String>,
    pub images: CardImages,
    #[serde(default)]
    pub types: Option<Vec<String>>,
    pub rarity: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardImages {
    pub small: String,
    pub large: String,
}

impl PartialEq for Card {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Card {}

impl Hash for Card {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

// ---------------------------------------------------------------------------
// CardPage -- the API's paginated response envelope
// ---------------------------------------------------------------------------

/// One page of search results.
///
/// The counter fields are optional with safe defaults; the API omits some
/// of them depending on the query.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardPage {
    #[serde(default)]
    pub data: Vec<Card>,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub page_size: Option<u32>,
    #[serde(default)]
    pub count: Option<u32>,
    #[serde(default)]
    pub total_count: Option<u32>,
}
