use serde::{Deserialize, Serialize};

use super::amount;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    /// Current balance
    #[serde(default, deserialize_with = "amount::lenient")]
    pub saldo: Option<f64>,
    /// Profile photo URL
    #[serde(default)]
    pub foto_perfil: Option<String>,
}

impl User {
    /// Balance, with a missing or unparsable value counted as zero
    pub fn balance(&self) -> f64 {
        self.saldo.unwrap_or(0.0)
    }

    pub fn has_photo(&self) -> bool {
        self.foto_perfil.as_deref().is_some_and(|p| !p.is_empty())
    }
}

/// `GET /user` answers either `{"user": {...}}` or the bare user object.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum UserEnvelope {
    Wrapped { user: User },
    Bare(User),
}

impl UserEnvelope {
    pub(crate) fn into_user(self) -> User {
        match self {
            UserEnvelope::Wrapped { user } | UserEnvelope::Bare(user) => user,
        }
    }
}
