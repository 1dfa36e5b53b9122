use std::sync::Arc;

use crate::source::NoteSource;
use crate::types::{SessionDetail, SessionSummary};

/// On-demand access to saved sessions.
///
/// Failures are not errors to the caller: listing falls back to an empty
/// list and loading to `None`, both logged. Nothing is retried or cached.
#[derive(Clone)]
pub struct SessionStore {
    source: Arc<dyn NoteSource>,
}

impl SessionStore {
    pub fn new(source: Arc<dyn NoteSource>) -> Self {
        Self { source }
    }

    /// Saved sessions in source order, or empty if the source failed.
    pub async fn list_sessions(&self) -> Vec<SessionSummary> {
        match self.source.sessions().await {
            Ok(sessions) => {
                tracing::debug!(count = sessions.len(), "listed sessions");
                sessions
            }
            Err(e) => {
                tracing::warn!(error = %e, "listing sessions failed");
                Vec::new()
            }
        }
    }

    /// The full session stored under `filename`, or `None` if it could not
    /// be loaded.
    pub async fn load_session(&self, filename: &str) -> Option<SessionDetail> {
        match self.source.session(filename).await {
            Ok(notes) => Some(notes.into_detail()),
            Err(e) => {
                tracing::warn!(filename, error = %e, "loading session failed");
                None
            }
        }
    }
}
