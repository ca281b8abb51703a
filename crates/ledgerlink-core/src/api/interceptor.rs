use std::sync::Arc;

use reqwest::header::{self, HeaderValue};
use reqwest::Method;
use tracing::{debug, info, warn};

use super::request::{ApiResponse, RequestContext};
use super::ApiError;
use crate::auth::{SessionState, StorageError, TokenStore};

/// Attaches the stored bearer token to outgoing requests and drops it when
/// the server answers 401.
///
/// The token is read from the store on every request; nothing is cached
/// here, so a logout or invalidation is honoured by the next request.
/// Store calls may block (keychain, disk) and run on tokio's blocking pool.
#[derive(Clone)]
pub struct AuthInterceptor {
    store: Arc<dyn TokenStore>,
}

impl AuthInterceptor {
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn TokenStore> {
        &self.store
    }

    /// Run a store operation off the async worker
    pub(crate) async fn with_store<T, F>(&self, op: F) -> Result<T, StorageError>
    where
        F: FnOnce(&dyn TokenStore) -> Result<T, StorageError> + Send + 'static,
        T: Send + 'static,
    {
        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || op(store.as_ref())).await?
    }

    /// Request path. Never fails the request: a storage failure only means
    /// the request goes out without credentials.
    pub async fn on_request(&self, mut ctx: RequestContext) -> RequestContext {
        match self.with_store(SessionState::from_store).await {
            Ok(SessionState::Authenticated { credential }) => {
                match HeaderValue::from_str(&format!("Bearer {}", credential)) {
                    Ok(mut value) => {
                        value.set_sensitive(true);
                        ctx.headers.insert(header::AUTHORIZATION, value);
                    }
                    Err(e) => warn!(error = %e, "Stored token is not a valid header value, sending without it"),
                }
            }
            Ok(SessionState::Unauthenticated) => {
                debug!(path = %ctx.path, "No stored token, sending unauthenticated");
            }
            Err(e) => {
                warn!(error = %e, path = %ctx.path, "Failed to read stored token, sending unauthenticated");
            }
        }
        ctx
    }

    /// Response path. Successes pass through untouched; on 401 the stored
    /// token is deleted. The original error is always handed back.
    pub async fn on_response(
        &self,
        method: &Method,
        path: &str,
        result: Result<ApiResponse, ApiError>,
    ) -> Result<ApiResponse, ApiError> {
        let err = match result {
            Ok(response) => return Ok(response),
            Err(err) => err,
        };

        if err.is_unauthorized() {
            match self.with_store(|store| store.delete()).await {
                Ok(()) => info!(%method, path, "Server rejected token, session cleared"),
                Err(e) => warn!(error = %e, "Failed to remove stored token after 401"),
            }
        }

        warn!(
            %method,
            path,
            status = err.status().map(|s| s.as_u16()),
            server_message = err.message(),
            error = %err,
            "API request failed"
        );

        Err(err)
    }
}
