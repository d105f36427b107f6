//! Shared fixtures for the SDK integration tests.
//!
//! Provides a scripted [`StubSource`] card source with a call counter and
//! an optional gate for in-flight tests, small card/page factories, and a
//! state-wait helper for the session actor tests.

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use pokemontcg_sdk::{
    Card, CardImages, CardPage, CardSource, Error, FavoritesStore, Result, SearchCardsParams,
    SearchHandle, SearchState,
};
use tokio::sync::Semaphore;

// ---------------------------------------------------------------------------
// Factories
// ---------------------------------------------------------------------------

pub fn card(id: &str, name: &str, rarity: Option<&str>) -> Card {
    Card {
        id: id.to_string(),
        name: name.to_string(),
        hp: Some("60".to_string()),
        images: CardImages {
            small: format!("https://images.example/{}_small.png", id),
            large: format!("https://images.example/{}_large.png", id),
        },
        types: Some(vec!["Lightning".to_string()]),
        rarity: rarity.map(|r| r.to_string()),
    }
}

pub fn page(cards: Vec<Card>, page_number: u32, page_size: u32) -> CardPage {
    CardPage {
        count: Some(cards.len() as u32),
        total_count: None,
        page: Some(page_number),
        page_size: Some(page_size),
        data: cards,
    }
}

/// Open a favorites store inside a fresh temp dir.
///
/// The caller must keep the `TempDir` alive for the duration of the test so
/// the backing file is not deleted prematurely.
pub fn temp_store() -> (Arc<FavoritesStore>, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let store = FavoritesStore::open(dir.path().join("favorites.json")).unwrap();
    (Arc::new(store), dir)
}

// ---------------------------------------------------------------------------
// StubSource
// ---------------------------------------------------------------------------

type Key = (String, u32, Option<String>);

/// Scripted card source keyed by `(query, page, rarity)`.
///
/// Unkeyed requests resolve to an empty page. Every fetch is counted the
/// moment it starts, before the optional gate, so suppressed dispatches are
/// distinguishable from gated ones. Scripted failures resolve to
/// `Error::Status` with the given code.
pub struct StubSource {
    responses: Mutex<HashMap<Key, std::result::Result<CardPage, u16>>>,
    calls: AtomicUsize,
    gate: Option<Arc<Semaphore>>,
}

impl StubSource {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(HashMap::new()),
            calls: AtomicUsize::new(0),
            gate: None,
        }
    }

    /// Hold every fetch until the test releases a permit on `gate`.
    pub fn gated(gate: Arc<Semaphore>) -> Self {
        Self {
            gate: Some(gate),
            ..Self::new()
        }
    }

    pub fn respond(&self, query: &str, page_number: u32, rarity: Option<&str>, body: CardPage) {
        self.responses
            .lock()
            .unwrap()
            .insert(key(query, page_number, rarity), Ok(body));
    }

    pub fn fail(&self, query: &str, page_number: u32, rarity: Option<&str>, status: u16) {
        self.responses
            .lock()
            .unwrap()
            .insert(key(query, page_number, rarity), Err(status));
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

fn key(query: &str, page_number: u32, rarity: Option<&str>) -> Key {
    (query.to_string(), page_number, rarity.map(String::from))
}

impl CardSource for StubSource {
    fn fetch_page(
        &self,
        params: SearchCardsParams,
    ) -> impl Future<Output = Result<CardPage>> + Send {
        async move {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(gate) = &self.gate {
                let permit = gate.acquire().await.unwrap();
                permit.forget();
            }
            let scripted = self
                .responses
                .lock()
                .unwrap()
                .get(&(params.query.clone(), params.page, params.rarity.clone()))
                .cloned();
            match scripted {
                Some(Ok(body)) => Ok(body),
                Some(Err(status)) => Err(Error::Status(status)),
                None => Ok(page(Vec::new(), params.page, params.page_size)),
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Session helpers
// ---------------------------------------------------------------------------

/// Await snapshots until `pred` holds, with a hard timeout so a broken
/// session fails the test instead of hanging it.
pub async fn wait_for<F>(handle: &mut SearchHandle, mut pred: F) -> SearchState
where
    F: FnMut(&SearchState) -> bool,
{
    tokio::time::timeout(Duration::from_secs(5), async {
        let current = handle.state();
        if pred(&current) {
            return current;
        }
        loop {
            let state = handle.changed().await.unwrap();
            if pred(&state) {
                return state;
            }
        }
    })
    .await
    .expect("timed out waiting for session state")
}

/// Poll until the stub has seen `n` calls, with a hard timeout.
pub async fn wait_for_calls(source: &StubSource, n: usize) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while source.calls() < n {
            tokio::task::yield_now().await;
        }
    })
    .await
    .expect("timed out waiting for fetch calls");
}
