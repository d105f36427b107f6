use std::path::PathBuf;

pub const API_BASE: &str = "https://api.pokemontcg.io/v2";
pub const CARDS_PATH: &str = "/cards";
pub const API_KEY_ENV: &str = "POKEMONTCG_API_KEY";
pub const API_KEY_HEADER: &str = "X-Api-Key";

pub const DEFAULT_PAGE_SIZE: u32 = 10;

// Field projection sent with every search; keep in sync with the fields
// `models::Card` decodes.
pub const SELECT_FIELDS: &str = "id,name,images,hp,types,rarity";

pub const FAVORITES_FILE: &str = "favorites.json";

pub fn api_key_from_env() -> Option<String> {
    std::env::var(API_KEY_ENV).ok().filter(|key| !key.is_empty())
}

pub fn default_data_dir() -> PathBuf {
    if let Some(data) = dirs::data_dir() {
        data.join("pokemontcg-sdk")
    } else {
        PathBuf::from(".pokemontcg-sdk")
    }
}
