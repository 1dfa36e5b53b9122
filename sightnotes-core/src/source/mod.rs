//! The external note source.
//!
//! The viewer only ever reads from a source through three operations, mirrored
//! by [`NoteSource`]. [`HttpSource`] talks to the capture process's API server;
//! [`DirSource`] reads the same `.md` files straight from disk. Tests supply
//! their own implementations.

mod dir;
mod http;

use async_trait::async_trait;

use crate::error::SourceError;
use crate::types::{LatestResponse, NotesResponse, SessionSummary};

pub use dir::{split_snapshots, DirSource};
pub use http::{HttpSource, DEFAULT_BASE_URL};

/// Read-only access to live and saved note sequences.
#[async_trait]
pub trait NoteSource: Send + Sync {
    /// Current live sequence. `Err(SourceError::NotReady)` when nothing is
    /// being captured.
    async fn latest(&self) -> Result<LatestResponse, SourceError>;

    /// Saved sessions, in the order the source lists them.
    async fn sessions(&self) -> Result<Vec<SessionSummary>, SourceError>;

    /// One saved session by exact filename.
    async fn session(&self, filename: &str) -> Result<NotesResponse, SourceError>;
}
