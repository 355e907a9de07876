//! Session management: store, controller, and route guard.
//!
//! One [`SessionStore`] instance is constructed at startup and owns the
//! session for the life of the process; the [`SessionController`] and
//! [`RouteGuard`] hold handles to it rather than reaching for ambient
//! state.

pub mod controller;
pub mod errors;
pub mod guard;
pub mod storage;
pub mod store;
pub mod token;

pub use controller::SessionController;
pub use errors::{SessionError, SessionResult, StorageError, TokenError};
pub use guard::RouteGuard;
pub use storage::SessionStorage;
pub use store::{Session, SessionStore};
pub use token::decode_access_claims;
