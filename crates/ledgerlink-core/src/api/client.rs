//! API client for communicating with the ledger REST backend.
//!
//! This module provides the `ApiClient` struct for making authenticated
//! API requests for account, transaction and profile data.

use std::sync::Arc;

use reqwest::header::{self, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method};
use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use crate::auth::{SessionState, StorageError, TokenStore};
use crate::config::ClientConfig;
use crate::models::transaction::TransactionEnvelope;
use crate::models::user::UserEnvelope;
use crate::models::{
    LoginRequest, LoginResponse, NewTransaction, RegisterRequest, Transaction, TransactionsResponse,
    User,
};

use super::interceptor::AuthInterceptor;
use super::request::{ApiResponse, FilePart, RequestBody, RequestContext};
use super::ApiError;

// ============================================================================
// Endpoints
// ============================================================================

const LOGIN_PATH: &str = "/login";
const REGISTER_PATH: &str = "/register";
const LOGOUT_PATH: &str = "/logout";
const USER_PATH: &str = "/user";
const TRANSACTIONS_PATH: &str = "/transactions";
const PROFILE_PHOTO_PATH: &str = "/profile/photo";

/// Multipart field name the backend expects for the profile photo
pub const PHOTO_FIELD: &str = "photo";

/// API client for the ledger backend.
/// Clone is cheap - reqwest::Client and the token store are both behind Arc.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_endpoint: Arc<str>,
    default_headers: HeaderMap,
    auth: AuthInterceptor,
}

impl ApiClient {
    /// Create a new API client reading its bearer token from `store`
    pub fn new(config: &ClientConfig, store: Arc<dyn TokenStore>) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| ApiError::InvalidRequest(format!("Failed to build HTTP client: {}", e)))?;

        let mut default_headers = HeaderMap::new();
        for (name, value) in &config.default_headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| ApiError::InvalidRequest(format!("Bad header name '{}': {}", name, e)))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| ApiError::InvalidRequest(format!("Bad value for header '{}': {}", name, e)))?;
            default_headers.insert(name, value);
        }

        Ok(Self {
            client,
            base_endpoint: Arc::from(config.base_endpoint.trim_end_matches('/')),
            default_headers,
            auth: AuthInterceptor::new(store),
        })
    }

    pub fn base_endpoint(&self) -> &str {
        &self.base_endpoint
    }

    /// The token store this client reads credentials from
    pub fn token_store(&self) -> &Arc<dyn TokenStore> {
        self.auth.store()
    }

    /// Current session state, read fresh from the token store
    pub fn session_state(&self) -> Result<SessionState, StorageError> {
        SessionState::from_store(self.token_store().as_ref())
    }

    /// Persist a new bearer token for the following requests
    pub async fn store_token(&self, token: &str) -> Result<(), StorageError> {
        let token = token.to_string();
        self.auth.with_store(move |store| store.set(&token)).await
    }

    /// Forget the stored bearer token. Succeeds when none is stored.
    pub async fn clear_token(&self) -> Result<(), StorageError> {
        self.auth.with_store(|store| store.delete()).await
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_endpoint, path)
        } else {
            format!("{}/{}", self.base_endpoint, path)
        }
    }

    /// Start a request context carrying the default headers
    pub fn request(&self, method: Method, path: impl Into<String>) -> RequestContext {
        RequestContext::new(method, path, self.default_headers.clone())
    }

    /// Run a request through both interceptors.
    ///
    /// Order: default headers (already in `ctx`), auth header, transmit,
    /// 401 handling. Any non-success status comes back as an error.
    pub async fn send(&self, ctx: RequestContext) -> Result<ApiResponse, ApiError> {
        let ctx = self.auth.on_request(ctx).await;
        let method = ctx.method.clone();
        let path = ctx.path.clone();

        let result = self.transmit(ctx).await;
        self.auth.on_response(&method, &path, result).await
    }

    async fn transmit(&self, ctx: RequestContext) -> Result<ApiResponse, ApiError> {
        let url = self.url(&ctx.path);
        debug!(method = %ctx.method, url = %url, "Sending request");

        let mut headers = ctx.headers;
        let builder = match ctx.body {
            RequestBody::Empty => self.client.request(ctx.method, &url).headers(headers),
            RequestBody::Json(body) => self.client.request(ctx.method, &url).headers(headers).json(&body),
            RequestBody::Multipart(part) => {
                // reqwest writes its own multipart Content-Type with the boundary
                headers.remove(header::CONTENT_TYPE);
                self.client
                    .request(ctx.method, &url)
                    .headers(headers)
                    .multipart(part.into_form()?)
            }
        };

        let response = builder.send().await.map_err(ApiError::from_transport)?;
        Self::check_response(response).await
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> Result<ApiResponse, ApiError> {
        let status = response.status();
        let body = response.text().await.map_err(ApiError::from_transport)?;
        if status.is_success() {
            Ok(ApiResponse { status, body })
        } else {
            Err(ApiError::from_status(status, &body))
        }
    }

    fn json_body<B: Serialize>(body: &B) -> Result<RequestBody, ApiError> {
        serde_json::to_value(body)
            .map(RequestBody::Json)
            .map_err(|e| ApiError::InvalidRequest(format!("Failed to encode request body: {}", e)))
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.send(self.request(Method::GET, path)).await?.json()
    }

    pub async fn post<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Result<T, ApiError> {
        let ctx = self.request(Method::POST, path).with_body(Self::json_body(body)?);
        self.send(ctx).await?.json()
    }

    pub async fn put<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Result<T, ApiError> {
        let ctx = self.request(Method::PUT, path).with_body(Self::json_body(body)?);
        self.send(ctx).await?.json()
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.send(self.request(Method::DELETE, path)).await?.json()
    }

    pub async fn post_multipart<T: DeserializeOwned>(&self, path: &str, part: FilePart) -> Result<T, ApiError> {
        let ctx = self.request(Method::POST, path).with_body(RequestBody::Multipart(part));
        self.send(ctx).await?.json()
    }

    // ===== Account =====

    /// Exchange email and password for a bearer token. Does not store it.
    pub async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError> {
        self.post(LOGIN_PATH, request).await
    }

    /// Create an account. The created user is returned when the backend
    /// echoes one in a recognisable shape.
    pub async fn register(&self, request: &RegisterRequest) -> Result<Option<User>, ApiError> {
        let ctx = self.request(Method::POST, REGISTER_PATH).with_body(Self::json_body(request)?);
        let response = self.send(ctx).await?;
        Ok(response.json::<UserEnvelope>().ok().map(UserEnvelope::into_user))
    }

    /// Tell the backend to revoke the current token
    pub async fn logout(&self) -> Result<(), ApiError> {
        self.send(self.request(Method::POST, LOGOUT_PATH)).await?;
        Ok(())
    }

    pub async fn fetch_user(&self) -> Result<User, ApiError> {
        let envelope: UserEnvelope = self.get(USER_PATH).await?;
        Ok(envelope.into_user())
    }

    // ===== Transactions =====

    pub async fn fetch_transactions(&self) -> Result<Vec<Transaction>, ApiError> {
        let response: Option<TransactionsResponse> = self.get(TRANSACTIONS_PATH).await?;
        Ok(response.map(|r| r.transactions).unwrap_or_default())
    }

    pub async fn create_transaction(&self, transaction: &NewTransaction) -> Result<Option<Transaction>, ApiError> {
        let ctx = self
            .request(Method::POST, TRANSACTIONS_PATH)
            .with_body(Self::json_body(transaction)?);
        let response = self.send(ctx).await?;
        Ok(response
            .json::<TransactionEnvelope>()
            .ok()
            .map(TransactionEnvelope::into_transaction))
    }

    pub async fn delete_transaction(&self, id: i64) -> Result<(), ApiError> {
        let path = format!("{}/{}", TRANSACTIONS_PATH, id);
        self.send(self.request(Method::DELETE, path)).await?;
        Ok(())
    }

    // ===== Profile =====

    pub async fn upload_profile_photo(&self, photo: FilePart) -> Result<(), ApiError> {
        let ctx = self
            .request(Method::POST, PROFILE_PHOTO_PATH)
            .with_body(RequestBody::Multipart(photo));
        self.send(ctx).await?;
        Ok(())
    }
}
