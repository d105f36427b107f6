//! Rarity bucket expansion and matching.
//!
//! The API exposes dozens of exact rarity strings; the user-facing filter
//! works in coarse buckets ("Common", "Uncommon", "Rare"). [`expand`] maps a
//! bucket to the exact strings it covers; anything else, including "All",
//! expands to nothing and means no filter.

use crate::models::FavoriteRecord;

/// User-facing rarity buckets, in display order.
pub const BUCKETS: [&str; 4] = ["All", "Common", "Uncommon", "Rare"];

const COMMON: [&str; 1] = ["Common"];

const UNCOMMON: [&str; 1] = ["Uncommon"];

const RARE: [&str; 20] = [
    "Promo",
    "Rare",
    "Rare ACE",
    "Rare BREAK",
    "Rare Holo",
    "Rare Holo EX",
    "Rare Holo GX",
    "Rare Holo LV.X",
    "Rare Holo Star",
    "Rare Holo V",
    "Rare Holo VMAX",
    "Rare Prime",
    "Rare Prism Star",
    "Rare Rainbow",
    "Rare Secret",
    "Rare Shining",
    "Rare Shiny",
    "Rare Shiny GX",
    "Rare Ultra",
    "LEGEND",
];

/// Expand a bucket to the exact rarity strings it covers.
///
/// Unknown buckets (including "All") expand to an empty slice, meaning no
/// filter is applied.
pub fn expand(bucket: &str) -> &'static [&'static str] {
    match bucket {
        "Common" => &COMMON,
        "Uncommon" => &UNCOMMON,
        "Rare" => &RARE,
        _ => &[],
    }
}

/// Whether a card's exact rarity string falls in a bucket.
///
/// "All" matches everything, a missing rarity matches nothing else. A
/// rarity equal to the bucket name verbatim also matches.
pub fn matches(rarity: Option<&str>, bucket: &str) -> bool {
    if bucket == "All" {
        return true;
    }
    match rarity {
        Some(r) => r == bucket || expand(bucket).contains(&r),
        None => false,
    }
}

/// Filter favorite records down to a bucket, preserving order.
pub fn filter_records(records: &[FavoriteRecord], bucket: &str) -> Vec<FavoriteRecord> {
    records
        .iter()
        .filter(|r| matches(r.rarity.as_deref(), bucket))
        .cloned()
        .collect()
}
