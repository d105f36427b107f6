//! Client SDK for the Pokemon TCG card API.
//!
//! Provides a paginated card-search client, a durable local favorites store
//! with change notifications, and a search-session reducer coordinating the
//! two behind an action channel and read-only state snapshots.
//!
//! # Quick start
//!
//! ```no_run
//! use pokemontcg_sdk::{Action, PokemonTcgSdk};
//!
//! # async fn example() -> pokemontcg_sdk::Result<()> {
//! let sdk = PokemonTcgSdk::builder().build()?;
//!
//! let mut session = sdk.search_session();
//! session.dispatch(Action::Search("pikachu".into())).await?;
//! let state = session.changed().await?;
//! println!("{} results", state.results.len());
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod favorites;
pub mod models;
pub mod query_builder;
pub mod rarity;
pub mod session;

pub use api::{CardApiClient, CardSource, SearchCardsParams};
pub use error::{Error, Result};
pub use favorites::FavoritesStore;
pub use models::{Card, CardImages, CardPage, FavoriteRecord};
pub use query_builder::QueryBuilder;
pub use session::{
    Action, Effect, ErrorInfo, ErrorKind, Mutation, SearchHandle, SearchSession, SearchState,
};

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

// ---------------------------------------------------------------------------
// PokemonTcgSdkBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing a [`PokemonTcgSdk`] instance.
///
/// Use [`PokemonTcgSdk::builder()`] to obtain a builder, chain configuration
/// methods, and call [`build()`](PokemonTcgSdkBuilder::build).
pub struct PokemonTcgSdkBuilder {
    api_key: Option<String>,
    base_url: String,
    page_size: u32,
    data_dir: Option<PathBuf>,
    timeout: Duration,
}

impl Default for PokemonTcgSdkBuilder {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: config::API_BASE.to_string(),
            page_size: config::DEFAULT_PAGE_SIZE,
            data_dir: None,
            timeout: Duration::from_secs(30),
        }
    }
}

impl PokemonTcgSdkBuilder {
    /// Set the API key sent with every request.
    ///
    /// If not set, the `POKEMONTCG_API_KEY` environment variable is used
    /// when present. The API also works unauthenticated at a lower rate
    /// limit.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Override the API base URL (e.g. to point at a local test server).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the fixed page size used by search sessions.
    ///
    /// Defaults to 10.
    pub fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Set a custom directory for the favorites store.
    ///
    /// If not set, the platform-appropriate data directory is used
    /// (e.g. `~/.local/share/pokemontcg-sdk` on Linux).
    pub fn data_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.data_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set the HTTP request timeout. Defaults to 30 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build the SDK: construct the HTTP client and open the favorites
    /// store.
    pub fn build(self) -> Result<PokemonTcgSdk> {
        if self.page_size == 0 {
            return Err(Error::InvalidArgument("page_size must be at least 1".into()));
        }
        let api_key = self.api_key.or_else(config::api_key_from_env);
        let client = CardApiClient::new(self.base_url, api_key, self.timeout)?;
        let dir = self.data_dir.unwrap_or_else(config::default_data_dir);
        let favorites = FavoritesStore::open(dir.join(config::FAVORITES_FILE))?;
        Ok(PokemonTcgSdk {
            client: Arc::new(client),
            favorites: Arc::new(favorites),
            page_size: self.page_size,
        })
    }
}

// ---------------------------------------------------------------------------
// PokemonTcgSdk
// ---------------------------------------------------------------------------

/// The main entry point.
///
/// Owns the HTTP client and the favorites store, and spawns one search
/// session per screen. Created via [`PokemonTcgSdk::builder()`].
pub struct PokemonTcgSdk {
    client: Arc<CardApiClient>,
    favorites: Arc<FavoritesStore>,
    page_size: u32,
}

impl PokemonTcgSdk {
    /// Create a new builder for configuring the SDK.
    pub fn builder() -> PokemonTcgSdkBuilder {
        PokemonTcgSdkBuilder::default()
    }

    /// The card API client, for direct one-off searches.
    pub fn client(&self) -> &CardApiClient {
        &self.client
    }

    /// The favorites store shared by all sessions.
    pub fn favorites(&self) -> &FavoritesStore {
        &self.favorites
    }

    /// Spawn a new search session actor and return its handle.
    ///
    /// Each screen gets its own session (view-model lifetime = screen
    /// lifetime); all sessions share the favorites store and observe each
    /// other's toggles. Must be called from within a tokio runtime.
    pub fn search_session(&self) -> SearchHandle {
        session::spawn(
            Arc::clone(&self.client),
            Arc::clone(&self.favorites),
            self.page_size,
        )
    }
}

impl fmt::Display for PokemonTcgSdk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PokemonTcgSdk(favorites={}, page_size={})",
            self.favorites.path().display(),
            self.page_size
        )
    }
}
