//! Pure search-session core: actions fold into state changes and effects.
//!
//! [`SearchSession::handle_action`] applies the synchronous part of a
//! transition and returns the effects the surrounding driver must execute;
//! completions re-enter through [`SearchSession::apply_mutation`]. The core
//! never touches the network or the store, so the full transition table is
//! testable without a runtime.
//!
//! Every fetch effect carries the session's generation counter. A new
//! search or filter change bumps the generation, superseding anything in
//! flight; a completion whose generation no longer matches is discarded on
//! arrival without touching state.

use std::collections::HashSet;

use super::state::{ErrorInfo, SearchState};
use crate::models::{Card, CardPage, FavoriteRecord};

// ---------------------------------------------------------------------------
// Action / Mutation / Effect
// ---------------------------------------------------------------------------

/// User intents accepted by a search session.
#[derive(Debug, Clone)]
pub enum Action {
    /// Update the query text without fetching.
    UpdateQuery(String),
    /// Start a new search from page 1. Empty text yields an immediate
    /// empty-result state with no fetch.
    Search(String),
    /// Fetch the next page. Ignored while a fetch is in flight or the end
    /// of the stream was reached.
    LoadNextPage,
    /// Change the rarity bucket and re-run the current query under it.
    SelectRarity(String),
    /// Toggle a card's favorite flag.
    ToggleFavorite { card_id: String, favorite: bool },
    /// Re-read the favorites list from the store and republish it.
    LoadFavorites,
}

/// Completions folded back into the session by the driver.
#[derive(Debug)]
pub enum Mutation {
    PageLoaded {
        generation: u64,
        page: u32,
        outcome: std::result::Result<CardPage, ErrorInfo>,
    },
    FavoritesLoaded(Vec<FavoriteRecord>),
    SetError(ErrorInfo),
}

/// Side effects to be executed by the session driver.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    FetchPage {
        generation: u64,
        query: String,
        page: u32,
        rarity: Option<String>,
    },
    WriteFavorite {
        card_id: String,
        favorite: bool,
        snapshot: Option<Card>,
    },
    ReadFavorites,
}

// ---------------------------------------------------------------------------
// SearchSession
// ---------------------------------------------------------------------------

/// Owns a [`SearchState`] and applies the transition table.
pub struct SearchSession {
    state: SearchState,
    generation: u64,
}

impl SearchSession {
    pub fn new(page_size: u32) -> Self {
        Self {
            state: SearchState::new(page_size),
            generation: 0,
        }
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    /// Current fetch generation. Only `PageLoaded` mutations carrying this
    /// value are applied; anything older belongs to a superseded request.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Apply an action's synchronous state changes and return the effects
    /// to execute.
    pub fn handle_action(&mut self, action: Action) -> Vec<Effect> {
        match action {
            Action::UpdateQuery(text) => {
                self.state.query = text;
                self.state.error = None;
                self.state.no_results = false;
                Vec::new()
            }

            Action::Search(text) => {
                self.state.query = text;
                self.begin_new_result_set()
            }

            Action::LoadNextPage => {
                if self.state.is_loading
                    || !self.state.can_load_more
                    || self.state.query.is_empty()
                {
                    return Vec::new();
                }
                self.state.page += 1;
                self.state.is_loading = true;
                self.state.error = None;
                vec![self.fetch_effect(self.state.page)]
            }

            Action::SelectRarity(bucket) => {
                self.state.selected_rarity = bucket;
                self.begin_new_result_set()
            }

            Action::ToggleFavorite { card_id, favorite } => {
                let snapshot = self
                    .state
                    .results
                    .iter()
                    .find(|c| c.id == card_id)
                    .cloned()
                    .or_else(|| {
                        self.state
                            .favorites
                            .iter()
                            .find(|r| r.card_id == card_id)
                            .and_then(|r| r.to_card())
                    });
                vec![Effect::WriteFavorite {
                    card_id,
                    favorite,
                    snapshot,
                }]
            }

            Action::LoadFavorites => vec![Effect::ReadFavorites],
        }
    }

    /// Fold a completion into the state.
    pub fn apply_mutation(&mut self, mutation: Mutation) {
        match mutation {
            Mutation::PageLoaded {
                generation,
                page,
                outcome,
            } => {
                if generation != self.generation {
                    // A newer request owns the state now, including the
                    // loading flag; the stale response changes nothing.
                    eprintln!(
                        "Discarding stale page {} response (generation {}, current {})",
                        page, generation, self.generation
                    );
                    return;
                }
                self.state.is_loading = false;
                match outcome {
                    Ok(loaded) => self.apply_page(page, loaded),
                    Err(info) => {
                        // The page counter only advances on success.
                        if page > 1 {
                            self.state.page = page - 1;
                        }
                        self.state.error = Some(info);
                    }
                }
            }

            Mutation::FavoritesLoaded(list) => {
                self.state.favorites = list;
            }

            Mutation::SetError(info) => {
                self.state.error = Some(info);
            }
        }
    }

    /// Reset pagination for a new search or filter, superseding any fetch
    /// in flight, and issue the page-1 fetch unless the query is empty.
    fn begin_new_result_set(&mut self) -> Vec<Effect> {
        self.state.error = None;
        self.state.no_results = false;
        self.state.page = 1;
        self.state.results.clear();
        self.state.can_load_more = false;
        self.generation += 1;

        if self.state.query.is_empty() {
            self.state.is_loading = false;
            return Vec::new();
        }
        self.state.is_loading = true;
        vec![self.fetch_effect(1)]
    }

    fn fetch_effect(&self, page: u32) -> Effect {
        let rarity = if self.state.selected_rarity == "All" {
            None
        } else {
            Some(self.state.selected_rarity.clone())
        };
        Effect::FetchPage {
            generation: self.generation,
            query: self.state.query.clone(),
            page,
            rarity,
        }
    }

    fn apply_page(&mut self, page: u32, loaded: CardPage) {
        let count = loaded.data.len() as u32;

        if count == 0 {
            // An empty first page means no results; an empty later page is
            // the end of the stream, with prior results untouched.
            if page == 1 {
                self.state.no_results = true;
            }
            self.state.can_load_more = false;
            return;
        }

        if page == 1 {
            self.state.results.clear();
        }
        append_unique(&mut self.state.results, loaded.data);
        self.state.can_load_more = count == self.state.page_size;
    }
}

/// Append cards whose id is not already present, preserving page order.
fn append_unique(results: &mut Vec<Card>, incoming: Vec<Card>) {
    let mut seen: HashSet<String> = results.iter().map(|c| c.id.clone()).collect();
    for card in incoming {
        if seen.insert(card.id.clone()) {
            results.push(card);
        }
    }
}
