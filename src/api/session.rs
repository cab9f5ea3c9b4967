use crate::storage::{load_string_from_storage, remove_from_storage, save_string_to_storage, TOKEN_KEY};
use std::sync::{Arc, Mutex};

/// Single source of truth for the current bearer token.
///
/// Clones share one cell, so the client held in the app context and any
/// in-flight future all observe the same credential. Writes are
/// last-writer-wins; reads are snapshot-at-call-time, so a request already
/// in flight keeps the header value it captured at send time.
#[derive(Clone, Debug, Default)]
pub struct SessionStore {
    token: Arc<Mutex<Option<String>>>,
}

impl SessionStore {
    /// Fresh, unauthenticated store. Does not read durable storage; useful
    /// for isolated instances in tests.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restore any previously persisted token so a reload resumes the session.
    pub fn restore() -> Self {
        Self {
            token: Arc::new(Mutex::new(load_string_from_storage(TOKEN_KEY))),
        }
    }

    /// Snapshot of the current token. No side effects.
    pub fn token(&self) -> Option<String> {
        self.token.lock().ok().and_then(|t| t.clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.lock().ok().map(|t| t.is_some()).unwrap_or(false)
    }

    /// `Some` persists the token durably; `None` clears both the in-memory
    /// value and the durable copy.
    pub fn set_token(&self, token: Option<String>) {
        match &token {
            Some(t) => save_string_to_storage(TOKEN_KEY, t),
            None => remove_from_storage(TOKEN_KEY),
        }
        if let Ok(mut cell) = self.token.lock() {
            *cell = token;
        }
    }
}
