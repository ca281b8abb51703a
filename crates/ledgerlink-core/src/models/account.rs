use serde::{Deserialize, Serialize};

use super::User;

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    #[serde(default)]
    pub user: Option<User>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_login_response() {
        let json = r#"{"token": "abc123", "user": {"id": 1, "name": "Ana", "email": "a@b.com", "saldo": "0.00"}}"#;
        let resp: LoginResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.token, "abc123");
        assert_eq!(resp.user.and_then(|u| u.email).as_deref(), Some("a@b.com"));
    }

    #[test]
    fn test_login_response_requires_token() {
        assert!(serde_json::from_str::<LoginResponse>(r#"{"user": {}}"#).is_err());
    }
}
