//! Search session: the pure reducer core and the actor that drives it.

pub mod actor;
pub mod reducer;
pub mod state;

pub use actor::{spawn, SearchHandle};
pub use reducer::{Action, Effect, Mutation, SearchSession};
pub use state::{ErrorInfo, ErrorKind, SearchState};
