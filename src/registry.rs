//! Session id -> {executable, step count, source}.
//!
//! The store is owned by whoever serves requests and handed to the core by
//! reference. Each session sits behind its own mutex so two requests for the
//! same id never run a step at the same time, while different sessions can.

use crate::error::{Error, Result};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub executable: PathBuf,
    pub steps: usize,
    pub source: Option<String>,
}

#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: Mutex<HashMap<String, Arc<Mutex<Session>>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an executable and return the new session's id.
    pub fn create(&self, executable: impl Into<PathBuf>, source: Option<String>) -> String {
        let id = Uuid::new_v4().to_string();
        let session = Session {
            executable: executable.into(),
            steps: 0,
            source,
        };
        info!(%id, executable = %session.executable.display(), "session created");
        self.sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id.clone(), Arc::new(Mutex::new(session)));
        id
    }

    fn handle(&self, id: &str) -> Result<Arc<Mutex<Session>>> {
        self.sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
            .ok_or_else(|| Error::SessionNotFound(id.to_string()))
    }

    /// Snapshot of a session.
    pub fn get(&self, id: &str) -> Result<Session> {
        let handle = self.handle(id)?;
        let session = handle.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(session.clone())
    }

    /// Run `f` with exclusive access to one session. The store-wide lock is
    /// only held long enough to find it.
    pub fn with_session<T>(&self, id: &str, f: impl FnOnce(&mut Session) -> Result<T>) -> Result<T> {
        let handle = self.handle(id)?;
        let mut session = handle.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut session)
    }

    pub fn remove(&self, id: &str) -> Result<Session> {
        let handle = self
            .sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(id)
            .ok_or_else(|| Error::SessionNotFound(id.to_string()))?;
        info!(%id, "session closed");
        let session = handle.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(session.clone())
    }

    pub fn len(&self) -> usize {
        self.sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
