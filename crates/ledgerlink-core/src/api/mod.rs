//! REST API client module for the ledger backend.
//!
//! This module provides the `ApiClient` for communicating with the backend
//! to log in, register, and read or change the balance, transactions and
//! profile photo.
//!
//! Every request passes through the `AuthInterceptor`: on the way out it
//! attaches `Authorization: Bearer <token>` when a token is stored, and on
//! the way back a 401 response deletes the stored token before the error is
//! returned to the caller.

pub mod client;
pub mod error;
pub mod interceptor;
pub mod request;

pub use client::ApiClient;
pub use error::ApiError;
pub use interceptor::AuthInterceptor;
pub use request::{ApiResponse, FilePart, RequestBody, RequestContext};
