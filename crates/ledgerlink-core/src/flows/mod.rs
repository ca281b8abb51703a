//! Headless versions of the app's screens.
//!
//! Each flow validates its input, calls the [`ApiClient`](crate::ApiClient)
//! and turns failures into a [`FlowError`] carrying a message fit for the
//! user. Flows never touch the terminal; the CLI decides how to show
//! results.
//!
//! - [`account`]: login, registration, logout
//! - [`ledger`]: home data (user + transactions), creating and removing
//!   transactions
//! - [`profile`]: profile data and photo upload

pub mod account;
pub mod ledger;
pub mod profile;

use thiserror::Error;

use crate::api::ApiError;
use crate::auth::StorageError;
use crate::validation::FormError;

#[derive(Error, Debug)]
pub enum FlowError {
    /// Input rejected locally; nothing was sent
    #[error(transparent)]
    Invalid(#[from] FormError),

    /// The server rejected the stored token (which is now gone)
    #[error("Session expired - please log in again")]
    SessionExpired(#[source] ApiError),

    #[error("{message}")]
    Api {
        message: String,
        #[source]
        source: ApiError,
    },

    #[error("Token storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("{message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },
}

impl FlowError {
    /// Wrap an API error for a flow that needs a logged-in user: a 401 means
    /// the session is over, anything else gets a user message.
    pub(crate) fn authenticated(source: ApiError, fallback: &str) -> Self {
        if source.is_unauthorized() {
            FlowError::SessionExpired(source)
        } else {
            FlowError::api(source, fallback)
        }
    }

    pub(crate) fn api(source: ApiError, fallback: &str) -> Self {
        FlowError::Api {
            message: source.user_message(fallback),
            source,
        }
    }

    /// The message to show the user
    pub fn user_message(&self) -> String {
        self.to_string()
    }

    /// The underlying API error, if the request reached the API layer
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            FlowError::SessionExpired(source) | FlowError::Api { source, .. } => Some(source),
            _ => None,
        }
    }

    /// The caller should send the user back to login
    pub fn is_session_expired(&self) -> bool {
        matches!(self, FlowError::SessionExpired(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_authenticated_maps_401() {
        let err = FlowError::authenticated(ApiError::from_status(StatusCode::UNAUTHORIZED, ""), "x");
        assert!(err.is_session_expired());
        assert_eq!(err.api_error().and_then(|e| e.status()), Some(StatusCode::UNAUTHORIZED));
    }

    #[test]
    fn test_api_message_prefers_server() {
        let err = FlowError::authenticated(
            ApiError::from_status(StatusCode::BAD_REQUEST, r#"{"message": "Saldo insuficiente"}"#),
            "Could not create transaction.",
        );
        assert!(!err.is_session_expired());
        assert_eq!(err.user_message(), "Saldo insuficiente");

        let err = FlowError::api(ApiError::from_status(StatusCode::BAD_GATEWAY, ""), "Try again.");
        assert_eq!(err.user_message(), "Try again.");
    }

    #[test]
    fn test_form_error_message() {
        let err = FlowError::from(FormError("Enter your email."));
        assert_eq!(err.user_message(), "Enter your email.");
        assert!(err.api_error().is_none());
    }
}
