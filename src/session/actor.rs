//! Session driver: owns the reducer, executes its effects, and publishes
//! state snapshots.
//!
//! One spawned task owns the [`SearchSession`]; actions arrive over an mpsc
//! channel and are processed one at a time in arrival order. Fetch effects
//! run in sub-tasks so the loop stays responsive while a page is in flight,
//! and their completions return over an internal channel as mutations.
//! Favorite-store change events are folded back in as favorites refreshes,
//! so every session observes toggles made from any screen.

use std::sync::Arc;

use tokio::sync::{broadcast, mpsc, watch};

use super::reducer::{Action, Effect, Mutation, SearchSession};
use super::state::{ErrorInfo, SearchState};
use crate::api::{CardSource, SearchCardsParams};
use crate::error::{Error, Result};
use crate::favorites::FavoritesStore;

const ACTION_BUFFER: usize = 32;

// ---------------------------------------------------------------------------
// SearchHandle
// ---------------------------------------------------------------------------

/// Handle to a spawned search session: the action intake and the state
/// snapshot source.
///
/// Cloning is cheap. When every handle is dropped the intake closes and
/// the session task ends.
#[derive(Clone)]
pub struct SearchHandle {
    actions: mpsc::Sender<Action>,
    state: watch::Receiver<SearchState>,
}

impl SearchHandle {
    /// Queue an action. Actions are processed one at a time in arrival
    /// order.
    pub async fn dispatch(&self, action: Action) -> Result<()> {
        self.actions
            .send(action)
            .await
            .map_err(|_| Error::SessionClosed)
    }

    /// The latest published snapshot.
    pub fn state(&self) -> SearchState {
        self.state.borrow().clone()
    }

    /// Wait for the next published snapshot and return it.
    pub async fn changed(&mut self) -> Result<SearchState> {
        self.state.changed().await.map_err(|_| Error::SessionClosed)?;
        Ok(self.state.borrow().clone())
    }
}

// ---------------------------------------------------------------------------
// spawn
// ---------------------------------------------------------------------------

/// Spawn a session actor over a card source and a favorites store.
///
/// The favorites overlay is seeded from the store before the first
/// snapshot. Must be called from within a tokio runtime.
pub fn spawn<S>(source: Arc<S>, store: Arc<FavoritesStore>, page_size: u32) -> SearchHandle
where
    S: CardSource + Send + Sync + 'static,
{
    let (action_tx, mut action_rx) = mpsc::channel::<Action>(ACTION_BUFFER);

    let mut session = SearchSession::new(page_size);
    session.apply_mutation(Mutation::FavoritesLoaded(store.list_favorites()));
    let (state_tx, state_rx) = watch::channel(session.state().clone());

    let mut changes = store.subscribe();

    tokio::spawn(async move {
        let (mutation_tx, mut mutation_rx) = mpsc::channel::<Mutation>(ACTION_BUFFER);
        let mut changes_open = true;

        loop {
            tokio::select! {
                maybe_action = action_rx.recv() => {
                    let Some(action) = maybe_action else { break };
                    let effects = session.handle_action(action);
                    publish(&state_tx, &session);
                    for effect in effects {
                        run_effect(
                            effect,
                            &source,
                            &store,
                            &mutation_tx,
                            &mut session,
                            &state_tx,
                            page_size,
                        );
                    }
                }

                Some(mutation) = mutation_rx.recv() => {
                    session.apply_mutation(mutation);
                    publish(&state_tx, &session);
                }

                changed = changes.recv(), if changes_open => {
                    match changed {
                        // A lagged receiver still means the list changed;
                        // re-reading it covers the missed events.
                        Ok(_) | Err(broadcast::error::RecvError::Lagged(_)) => {
                            session.apply_mutation(Mutation::FavoritesLoaded(
                                store.list_favorites(),
                            ));
                            publish(&state_tx, &session);
                        }
                        Err(broadcast::error::RecvError::Closed) => {
                            changes_open = false;
                        }
                    }
                }
            }
        }
    });

    SearchHandle {
        actions: action_tx,
        state: state_rx,
    }
}

fn run_effect<S>(
    effect: Effect,
    source: &Arc<S>,
    store: &Arc<FavoritesStore>,
    mutation_tx: &mpsc::Sender<Mutation>,
    session: &mut SearchSession,
    state_tx: &watch::Sender<SearchState>,
    page_size: u32,
) where
    S: CardSource + Send + Sync + 'static,
{
    match effect {
        Effect::FetchPage {
            generation,
            query,
            page,
            rarity,
        } => {
            let source = Arc::clone(source);
            let tx = mutation_tx.clone();
            tokio::spawn(async move {
                let params = SearchCardsParams {
                    query,
                    page,
                    page_size,
                    rarity,
                };
                let outcome = source
                    .fetch_page(params)
                    .await
                    .map_err(|e| ErrorInfo::from(&e));
                let _ = tx
                    .send(Mutation::PageLoaded {
                        generation,
                        page,
                        outcome,
                    })
                    .await;
            });
        }

        // Store operations are local and fast; run them inline so their
        // outcome lands before the next action is processed.
        Effect::WriteFavorite {
            card_id,
            favorite,
            snapshot,
        } => {
            match store.set_favorite(&card_id, favorite, snapshot.as_ref()) {
                Ok(()) => session
                    .apply_mutation(Mutation::FavoritesLoaded(store.list_favorites())),
                Err(e) => session.apply_mutation(Mutation::SetError(ErrorInfo::from(&e))),
            }
            publish(state_tx, session);
        }

        Effect::ReadFavorites => {
            session.apply_mutation(Mutation::FavoritesLoaded(store.list_favorites()));
            publish(state_tx, session);
        }
    }
}

fn publish(tx: &watch::Sender<SearchState>, session: &SearchSession) {
    let _ = tx.send(session.state().clone());
}
