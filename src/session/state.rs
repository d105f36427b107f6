use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::models::{Card, FavoriteRecord};

// ---------------------------------------------------------------------------
// ErrorInfo -- cloneable error summary for state snapshots
// ---------------------------------------------------------------------------

/// Coarse classification of a failed operation, for user-visible messaging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    Network,
    Decode,
    Persistence,
    InvalidArgument,
}

/// A cloneable, comparable summary of an [`Error`].
///
/// State snapshots are cloned into every subscriber, and the underlying
/// error types are not `Clone`, so snapshots carry this summary instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    pub kind: ErrorKind,
    pub message: String,
}

impl From<&Error> for ErrorInfo {
    fn from(e: &Error) -> Self {
        let kind = match e {
            Error::Http(_) | Error::Status(_) => ErrorKind::Network,
            Error::Json(_) => ErrorKind::Decode,
            Error::Io(_) | Error::Persistence(_) => ErrorKind::Persistence,
            Error::InvalidArgument(_) | Error::SessionClosed => ErrorKind::InvalidArgument,
        };
        Self {
            kind,
            message: e.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// SearchState
// ---------------------------------------------------------------------------

/// Snapshot of one search session, consumable by a view layer.
///
/// `results` holds the accumulated pages in insertion order with no
/// duplicate ids. `favorites` is the local favorite overlay, refreshed on
/// every store change. `page_size` is fixed for the session's lifetime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchState {
    pub query: String,
    pub page: u32,
    pub page_size: u32,
    pub results: Vec<Card>,
    pub is_loading: bool,
    pub can_load_more: bool,
    pub no_results: bool,
    pub selected_rarity: String,
    pub favorites: Vec<FavoriteRecord>,
    pub error: Option<ErrorInfo>,
}

impl SearchState {
    pub fn new(page_size: u32) -> Self {
        Self {
            query: String::new(),
            page: 1,
            page_size,
            results: Vec::new(),
            is_loading: false,
            can_load_more: false,
            no_results: false,
            selected_rarity: "All".to_string(),
            favorites: Vec::new(),
            error: None,
        }
    }
}
