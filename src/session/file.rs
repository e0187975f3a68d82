//! Session persisted as JSON between command-line invocations.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::session::{Session, SessionResult, SessionStore};

pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the stored session; a missing file means signed out.
    pub fn load(&self) -> SessionResult<Option<Session>> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }
}

impl SessionStore for FileSessionStore {
    fn current(&self) -> Option<Session> {
        self.load().unwrap_or_else(|err| {
            log::error!("Failed to read session from {}: {err}", self.path.display());
            None
        })
    }

    fn store(&self, session: Session) -> SessionResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let bytes = serde_json::to_vec_pretty(&session)?;
        fs::write(&self.path, bytes)?;
        Ok(())
    }

    fn clear(&self) -> SessionResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }

    fn on_unauthorized(&self) {
        log::warn!("Session rejected by the server, removing stored credential");
        if let Err(err) = self.clear() {
            log::error!("Failed to clear session: {err}");
        }
    }
}
