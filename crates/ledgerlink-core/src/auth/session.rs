use super::{StorageError, TokenStore};

/// Whether a bearer token is currently stored.
///
/// Always derived from a fresh read of the token store, never cached, so a
/// completed logout or invalidation is visible to the very next request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Authenticated { credential: String },
    Unauthenticated,
}

impl SessionState {
    pub fn from_store(store: &dyn TokenStore) -> Result<Self, StorageError> {
        Ok(match store.get()? {
            Some(credential) if !credential.is_empty() => SessionState::Authenticated { credential },
            _ => SessionState::Unauthenticated,
        })
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionState::Authenticated { .. })
    }

    pub fn credential(&self) -> Option<&str> {
        match self {
            SessionState::Authenticated { credential } => Some(credential),
            SessionState::Unauthenticated => None,
        }
    }
}
