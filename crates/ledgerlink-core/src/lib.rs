//! Core library for LedgerLink.
//!
//! LedgerLink is a client for a small personal-ledger REST backend: accounts
//! (login, registration, logout), a balance, a list of income/expense
//! transactions and a profile photo.
//!
//! The heart of the crate is [`ApiClient`], an authenticated HTTP client that
//! attaches the stored bearer token to every request and drops that token as
//! soon as the server answers `401 Unauthorized`. Everything else is built on
//! top of it:
//!
//! - [`auth`]: token storage backends and the explicit session state
//! - [`config`]: persisted configuration and client options
//! - [`models`]: request/response types for the backend
//! - [`validation`]: form checks performed before any request is sent
//! - [`flows`]: headless login/register/home/profile operations
//! - [`utils`]: currency and date formatting

pub mod api;
pub mod auth;
pub mod config;
pub mod flows;
pub mod models;
pub mod utils;
pub mod validation;

pub use api::{ApiClient, ApiError};
pub use auth::{SessionState, StorageError, TokenStore};
pub use config::{ClientConfig, Config, TokenBackend};
pub use flows::FlowError;
