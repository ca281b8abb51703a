//! Shared helpers for integration tests against a mock backend.

#![allow(dead_code)]

use std::sync::Arc;

use ledgerlink_core::auth::{MemoryTokenStore, StorageError, TokenStore};
use ledgerlink_core::{ApiClient, ClientConfig};
use wiremock::{MockServer, Request};

/// Base path the mock backend serves under, like Laravel's `/api` prefix
pub const API_PREFIX: &str = "/api";

pub fn config_for(server: &MockServer) -> ClientConfig {
    ClientConfig::new(format!("{}{}", server.uri(), API_PREFIX))
}

/// Client over an in-memory store, optionally pre-loaded with a token
pub fn client_for(server: &MockServer, token: Option<&str>) -> (ApiClient, Arc<MemoryTokenStore>) {
    let store = Arc::new(match token {
        Some(token) => MemoryTokenStore::with_token(token),
        None => MemoryTokenStore::new(),
    });
    let api = ApiClient::new(&config_for(server), store.clone()).unwrap();
    (api, store)
}

pub fn api_path(path: &str) -> String {
    format!("{}{}", API_PREFIX, path)
}

pub async fn received(server: &MockServer) -> Vec<Request> {
    server.received_requests().await.unwrap_or_default()
}

pub fn authorization(request: &Request) -> Option<String> {
    request
        .headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

/// Store whose every operation fails, as if the keychain were locked
pub struct BrokenStore;

impl TokenStore for BrokenStore {
    fn get(&self) -> Result<Option<String>, StorageError> {
        Err(StorageError::Poisoned)
    }

    fn set(&self, _token: &str) -> Result<(), StorageError> {
        Err(StorageError::Poisoned)
    }

    fn delete(&self) -> Result<(), StorageError> {
        Err(StorageError::Poisoned)
    }
}
