use reqwest::StatusCode;
use tracing::{info, warn};

use super::FlowError;
use crate::api::{ApiClient, ApiError};
use crate::auth::SessionState;
use crate::models::User;
use crate::validation::{LoginForm, RegistrationForm};

const LOGIN_FAILED: &str = "Login failed. Please try again.";
const BAD_CREDENTIALS: &str = "Incorrect email or password.";
const REGISTER_FAILED: &str = "Could not create account. Please try again.";
const EMAIL_TAKEN: &str = "This email is already in use.";
const PASSWORD_TOO_SHORT: &str = "The password must be at least 6 characters.";

/// Log in and store the returned token. Returns the user the backend sent
/// along with the token (empty if it sent none).
pub async fn login(api: &ApiClient, form: &LoginForm) -> Result<User, FlowError> {
    let request = form.validate()?;

    let response = api.login(&request).await.map_err(login_error)?;
    api.store_token(&response.token).await?;

    info!("Login successful");
    Ok(response.user.unwrap_or_default())
}

fn login_error(err: ApiError) -> FlowError {
    if err.status() == Some(StatusCode::UNAUTHORIZED) {
        FlowError::Api {
            message: BAD_CREDENTIALS.to_string(),
            source: err,
        }
    } else {
        FlowError::api(err, LOGIN_FAILED)
    }
}

/// Create an account. The user still has to log in afterwards.
pub async fn register(api: &ApiClient, form: &RegistrationForm) -> Result<Option<User>, FlowError> {
    let request = form.validate()?;
    let user = api.register(&request).await.map_err(register_error)?;
    info!("Account created");
    Ok(user)
}

fn register_error(err: ApiError) -> FlowError {
    let message = if err.has_field_error("email") {
        EMAIL_TAKEN.to_string()
    } else if err.has_field_error("password") {
        PASSWORD_TOO_SHORT.to_string()
    } else if matches!(err, ApiError::Validation { .. }) {
        REGISTER_FAILED.to_string()
    } else {
        err.user_message(REGISTER_FAILED)
    };
    FlowError::Api { message, source: err }
}

/// End the session. The backend call is best-effort; the stored token is
/// removed whatever it answers.
pub async fn logout(api: &ApiClient) -> Result<(), FlowError> {
    if let Err(e) = api.logout().await {
        warn!(error = %e, "Logout request failed, clearing local session anyway");
    }
    api.clear_token().await?;
    info!("Logged out");
    Ok(())
}

pub fn session_state(api: &ApiClient) -> Result<SessionState, FlowError> {
    Ok(api.session_state()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_error_messages() {
        let err = login_error(ApiError::from_status(StatusCode::UNAUTHORIZED, r#"{"message": "Invalid credentials"}"#));
        assert_eq!(err.user_message(), BAD_CREDENTIALS);
        // A rejected login is not an expired session
        assert!(!err.is_session_expired());

        let err = login_error(ApiError::from_status(StatusCode::TOO_MANY_REQUESTS, r#"{"message": "Too many attempts."}"#));
        assert_eq!(err.user_message(), "Too many attempts.");

        let err = login_error(ApiError::from_status(StatusCode::INTERNAL_SERVER_ERROR, ""));
        assert_eq!(err.user_message(), LOGIN_FAILED);
    }

    #[test]
    fn test_register_error_messages() {
        let taken = r#"{"message": "The given data was invalid.", "errors": {"email": ["taken"]}}"#;
        let err = register_error(ApiError::from_status(StatusCode::UNPROCESSABLE_ENTITY, taken));
        assert_eq!(err.user_message(), EMAIL_TAKEN);

        let short = r#"{"errors": {"password": ["too short"]}}"#;
        let err = register_error(ApiError::from_status(StatusCode::UNPROCESSABLE_ENTITY, short));
        assert_eq!(err.user_message(), PASSWORD_TOO_SHORT);

        let other = r#"{"message": "The given data was invalid.", "errors": {"name": ["required"]}}"#;
        let err = register_error(ApiError::from_status(StatusCode::UNPROCESSABLE_ENTITY, other));
        assert_eq!(err.user_message(), REGISTER_FAILED);

        let err = register_error(ApiError::from_status(StatusCode::SERVICE_UNAVAILABLE, r#"{"message": "Maintenance"}"#));
        assert_eq!(err.user_message(), "Maintenance");
    }
}
