use std::sync::{PoisonError, RwLock};

use crate::session::{Session, SessionResult, SessionStore};

type UnauthorizedHook = Box<dyn Fn() + Send + Sync>;

/// In-process session, optionally running a hook (typically the
/// redirect-to-login) when the server rejects the credential.
#[derive(Default)]
pub struct MemorySessionStore {
    session: RwLock<Option<Session>>,
    on_unauthorized: Option<UnauthorizedHook>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(session: Session) -> Self {
        Self {
            session: RwLock::new(Some(session)),
            on_unauthorized: None,
        }
    }

    #[must_use]
    pub fn on_unauthorized_hook(mut self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_unauthorized = Some(Box::new(hook));
        self
    }
}

impl SessionStore for MemorySessionStore {
    fn current(&self) -> Option<Session> {
        self.session
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn store(&self, session: Session) -> SessionResult<()> {
        *self.session.write().unwrap_or_else(PoisonError::into_inner) = Some(session);
        Ok(())
    }

    fn clear(&self) -> SessionResult<()> {
        *self.session.write().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }

    fn on_unauthorized(&self) {
        log::warn!("Session rejected by the server, signing out");
        *self.session.write().unwrap_or_else(PoisonError::into_inner) = None;
        if let Some(hook) = &self.on_unauthorized {
            hook();
        }
    }
}
