//! Authenticated session capability injected into transports and
//! controllers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::types::{ApiToken, EntityId};

pub mod file;
pub mod memory;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session storage error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Session data is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

pub type SessionResult<T> = Result<T, SessionError>;

/// Profile of the signed-in user as returned by the login endpoint.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct SessionUser {
    #[serde(default)]
    pub id: Option<EntityId>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Session {
    pub token: ApiToken,
    #[serde(default)]
    pub user: Option<SessionUser>,
    pub issued_at: DateTime<Utc>,
}

impl Session {
    pub fn new(token: ApiToken, user: Option<SessionUser>) -> Self {
        Self {
            token,
            user,
            issued_at: Utc::now(),
        }
    }
}

/// Process-wide session state.
///
/// Controllers only read the token (through the transport) and report
/// authentication failures through [`SessionStore::on_unauthorized`]; the
/// store decides what logging out means.
pub trait SessionStore: Send + Sync {
    fn current(&self) -> Option<Session>;

    fn token(&self) -> Option<ApiToken> {
        self.current().map(|session| session.token)
    }

    fn store(&self, session: Session) -> SessionResult<()>;

    fn clear(&self) -> SessionResult<()>;

    /// Called whenever the server rejects the stored credential.
    fn on_unauthorized(&self);
}
