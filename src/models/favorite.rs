use serde::{Deserialize, Serialize};

use super::card::{Card, CardImages};

// ---------------------------------------------------------------------------
// FavoriteRecord -- a user-local favorite annotation on a card
// ---------------------------------------------------------------------------

/// A favorite flag persisted independently of search results, keyed by card
/// id. Records are never deleted; toggling off just flips the flag.
///
/// Display fields are denormalized from the last snapshot seen at toggle
/// time so a favorites screen renders without a network round trip. Every
/// denormalized field carries a serde default: records written by older
/// versions of the store load with empty values instead of failing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteRecord {
    pub card_id: String,
    pub is_favorite: bool,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub hp: Option<String>,
    #[serde(default)]
    pub small_image_url: String,
    #[serde(default)]
    pub large_image_url: String,
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default)]
    pub rarity: Option<String>,
}

impl FavoriteRecord {
    /// Create a bare record with no cached display data.
    pub fn new(card_id: impl Into<String>, is_favorite: bool) -> Self {
        Self {
            card_id: card_id.into(),
            is_favorite,
            name: String::new(),
            hp: None,
            small_image_url: String::new(),
            large_image_url: String::new(),
            types: Vec::new(),
            rarity: None,
        }
    }

    /// Refresh the denormalized display fields to a card's latest values.
    pub fn apply_snapshot(&mut self, card: &Card) {
        self.name = card.name.clone();
        self.hp = card.hp.clone();
        self.small_image_url = card.images.small.clone();
        self.large_image_url = card.images.large.clone();
        self.types = card.types.clone().unwrap_or_default();
        self.rarity = card.rarity.clone();
    }

    /// Reconstitute the cached card snapshot, if one was ever captured.
    pub fn to_card(&self) -> Option<Card> {
        if self.name.is_empty() {
            return None;
        }
        Some(Card {
            id: self.card_id.clone(),
            name: self.name.clone(),
            hp: self.hp.clone(),
            images: CardImages {
                small: self.small_image_url.clone(),
                large: self.large_image_url.clone(),
            },
            types: if self.types.is_empty() {
                None
            } else {
                Some(self.types.clone())
            },
            rarity: self.rarity.clone(),
        })
    }
}
