//! HTTP client for the remote card API.
//!
//! One network call per invocation; errors propagate immediately with no
//! retry. Non-2xx responses surface as [`Error::Status`] before any body
//! decode is attempted, and decode failures surface separately as
//! [`Error::Json`].

use std::future::Future;
use std::time::Duration;

use reqwest::Client;

use crate::config;
use crate::error::{Error, Result};
use crate::models::CardPage;
use crate::query_builder::QueryBuilder;
use crate::rarity;

// ---------------------------------------------------------------------------
// SearchCardsParams
// ---------------------------------------------------------------------------

/// Parameters for one paginated card search.
///
/// `rarity` is a user-facing bucket name; it is expanded to the exact
/// rarity strings before being sent. `None` applies no constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchCardsParams {
    pub query: String,
    pub page: u32,
    pub page_size: u32,
    pub rarity: Option<String>,
}

// ---------------------------------------------------------------------------
// CardSource
// ---------------------------------------------------------------------------

/// A source of card pages. The seam between a search session and the
/// network, so sessions can be driven by a scripted source in tests.
pub trait CardSource {
    fn fetch_page(
        &self,
        params: SearchCardsParams,
    ) -> impl Future<Output = Result<CardPage>> + Send;
}

// ---------------------------------------------------------------------------
// CardApiClient
// ---------------------------------------------------------------------------

/// Client for the card search endpoint.
///
/// Holds a connection-pooled HTTP client and the optional API key. The key
/// is injected at construction, never read from ambient process state.
pub struct CardApiClient {
    http: Client,
    base_url: String,
    api_key: Option<String>,
}

impl CardApiClient {
    /// Create a client against `base_url` with the given request timeout.
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(10))
            .gzip(true)
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.into(),
            api_key,
        })
    }

    /// Run one paginated search.
    ///
    /// Builds a single combined `q` filter from the name prefix and the
    /// expanded rarity bucket, requests only the fields the model decodes,
    /// and maps the JSON envelope to a [`CardPage`].
    pub async fn search(&self, params: &SearchCardsParams) -> Result<CardPage> {
        let url = format!("{}{}", self.base_url, config::CARDS_PATH);

        let mut q = QueryBuilder::new();
        if !params.query.is_empty() {
            q.name_prefix(&params.query);
        }
        if let Some(bucket) = params.rarity.as_deref() {
            q.any_of("rarity", rarity::expand(bucket));
        }

        let mut request = self.http.get(&url).query(&[
            ("page", params.page.to_string()),
            ("pageSize", params.page_size.to_string()),
            ("select", config::SELECT_FIELDS.to_string()),
        ]);
        if !q.is_empty() {
            request = request.query(&[("q", q.build())]);
        }
        if let Some(key) = &self.api_key {
            request = request.header(config::API_KEY_HEADER, key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Status(status.as_u16()));
        }

        let body = response.bytes().await?;
        let page: CardPage = serde_json::from_slice(&body)?;
        Ok(page)
    }
}

impl CardSource for CardApiClient {
    fn fetch_page(
        &self,
        params: SearchCardsParams,
    ) -> impl Future<Output = Result<CardPage>> + Send {
        async move { self.search(&params).await }
    }
}
