//! Form validation performed before any request is sent.
//!
//! Each form checks its fields in display order and reports the first
//! problem as a user-facing message.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::models::{LoginRequest, NewTransaction, RegisterRequest, TransactionKind};
use crate::utils::parse_amount_input;

/// Minimum password length accepted at registration
pub const MIN_PASSWORD_LENGTH: usize = 6;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
});

/// A field failed validation; the message is ready to show to the user.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct FormError(pub &'static str);

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> Result<LoginRequest, FormError> {
        if self.email.is_empty() || self.password.is_empty() {
            return Err(FormError("Please fill in all fields."));
        }
        Ok(LoginRequest {
            email: self.email.clone(),
            password: self.password.clone(),
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct RegistrationForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub password_confirmation: String,
}

impl RegistrationForm {
    /// Validate and build the request: name trimmed, email trimmed and
    /// lower-cased, password sent as typed.
    pub fn validate(&self) -> Result<RegisterRequest, FormError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(FormError("Enter your full name."));
        }

        let email = self.email.trim();
        if email.is_empty() {
            return Err(FormError("Enter your email."));
        }
        if !is_valid_email(email) {
            return Err(FormError("Enter a valid email."));
        }

        if self.password.is_empty() {
            return Err(FormError("Enter a password."));
        }
        if self.password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(FormError("The password must be at least 6 characters."));
        }
        if self.password != self.password_confirmation {
            return Err(FormError("Passwords do not match."));
        }

        Ok(RegisterRequest {
            name: name.to_string(),
            email: email.to_lowercase(),
            password: self.password.clone(),
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct TransactionForm {
    pub kind: Option<TransactionKind>,
    /// Amount as typed, in pt-BR notation (`"1.234,56"`)
    pub amount: String,
    pub description: String,
}

impl TransactionForm {
    pub fn validate(&self) -> Result<NewTransaction, FormError> {
        let kind = self.kind.ok_or(FormError("Select the transaction type."))?;

        let amount = parse_amount_input(&self.amount)
            .filter(|a| *a > 0.0)
            .ok_or(FormError("Enter a valid amount."))?;

        let description = self.description.trim();
        if description.is_empty() {
            return Err(FormError("Enter a description for the transaction."));
        }

        Ok(NewTransaction {
            kind,
            amount,
            description: description.to_string(),
        })
    }
}
