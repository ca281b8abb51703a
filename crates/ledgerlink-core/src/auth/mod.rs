//! Authentication module for managing the bearer token and session state.
//!
//! This module provides:
//! - `TokenStore`: single-slot storage for the bearer token, with keyring,
//!   file and in-memory backends
//! - `SessionState`: explicit `Authenticated`/`Unauthenticated` state read
//!   from a token store
//!
//! The token lives under the fixed key `userToken`. It is written after a
//! successful login and removed on logout or when the server answers 401.

pub mod session;
pub mod store;

pub use session::SessionState;
pub use store::{
    FileTokenStore, KeyringTokenStore, MemoryTokenStore, StorageError, TokenStore, TOKEN_KEY,
};
