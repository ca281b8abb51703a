//! Data models for the ledger backend.
//!
//! This module contains the data structures exchanged with the backend:
//!
//! - `User`: account data including the balance (`saldo`) and photo
//! - `Transaction`, `TransactionKind`, `NewTransaction`: ledger entries
//! - Account payloads: `LoginRequest`, `LoginResponse`, `RegisterRequest`
//!
//! The backend is loose about number encoding (decimal columns arrive as
//! strings), so amounts go through a lenient deserializer.

pub mod account;
pub mod amount;
pub mod transaction;
pub mod user;

pub use account::{LoginRequest, LoginResponse, RegisterRequest};
pub use transaction::{NewTransaction, Transaction, TransactionKind, TransactionsResponse};
pub use user::User;
