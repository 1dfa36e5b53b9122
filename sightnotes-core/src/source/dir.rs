use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use async_trait::async_trait;

use super::NoteSource;
use crate::error::SourceError;
use crate::types::{LatestResponse, NotesResponse, SessionSummary, WireSnapshot};

const SNAPSHOT_MARKER: &str = "## Snapshot ";

/// [`NoteSource`] that reads the capture process's notes directory directly.
///
/// Every `*.md` file in `root` is a session; the most recently modified one
/// is the live feed.
#[derive(Debug, Clone)]
pub struct DirSource {
    root: PathBuf,
}

struct NoteFile {
    name: String,
    size: u64,
    modified: Option<SystemTime>,
}

impl DirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Lists `*.md` regular files. A missing directory is an empty listing.
    async fn note_files(&self) -> Result<Vec<NoteFile>, SourceError> {
        let mut entries = match tokio::fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut files = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
                continue;
            };
            if !name.ends_with(".md") {
                continue;
            }
            let meta = entry.metadata().await?;
            if !meta.is_file() {
                continue;
            }
            files.push(NoteFile { name, size: meta.len(), modified: meta.modified().ok() });
        }
        Ok(files)
    }

    async fn read_notes(&self, name: &str) -> Result<NotesResponse, SourceError> {
        let content = tokio::fs::read_to_string(self.root.join(name)).await?;
        let snapshots = split_snapshots(&content);
        Ok(NotesResponse { filename: name.to_owned(), count: Some(snapshots.len()), snapshots })
    }
}

#[async_trait]
impl NoteSource for DirSource {
    async fn latest(&self) -> Result<LatestResponse, SourceError> {
        let newest = self
            .note_files()
            .await?
            .into_iter()
            .max_by_key(|f| f.modified)
            .ok_or(SourceError::NotReady)?;
        self.read_notes(&newest.name).await
    }

    async fn sessions(&self) -> Result<Vec<SessionSummary>, SourceError> {
        let mut files = self.note_files().await?;
        files.sort_by(|a, b| b.name.cmp(&a.name));
        Ok(files
            .into_iter()
            .map(|f| SessionSummary { filename: f.name, size_bytes: f.size })
            .collect())
    }

    async fn session(&self, filename: &str) -> Result<NotesResponse, SourceError> {
        if !is_plain_note_name(filename) {
            return Err(SourceError::InvalidName(filename.to_owned()));
        }
        self.read_notes(filename).await
    }
}

/// Only bare `name.md` file names are served, never paths.
fn is_plain_note_name(name: &str) -> bool {
    name.ends_with(".md")
        && !name.starts_with('.')
        && !name.contains(['/', '\\'])
        && Path::new(name).file_name().is_some_and(|f| f == name)
}

/// Splits a notes file into its snapshots.
///
/// Each snapshot starts at a `## Snapshot ` marker. The rest of that line is
/// the snapshot number; the following lines, trimmed and with a leading `---`
/// rule removed, are its content. Text before the first marker is the file
/// header and is skipped.
pub fn split_snapshots(content: &str) -> Vec<WireSnapshot> {
    content
        .split(SNAPSHOT_MARKER)
        .skip(1)
        .map(|part| {
            let part = part.trim();
            let (number, body) = part.split_once('\n').unwrap_or((part, ""));
            WireSnapshot {
                number: number.trim().to_owned(),
                content: body.trim().trim_start_matches('-').trim().to_owned(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_snapshot_markers() {
        let file = "# Lecture notes\nheader text\n\n## Snapshot 1\n---\n### Key Concepts\n- a\n\n## Snapshot 2\n---\nbody two\n";
        let snaps = split_snapshots(file);
        assert_eq!(snaps.len(), 2);
        assert_eq!(snaps[0].number, "1");
        assert_eq!(snaps[0].content, "### Key Concepts\n- a");
        assert_eq!(snaps[1], WireSnapshot { number: "2".into(), content: "body two".into() });
    }

    #[test]
    fn header_only_file_has_no_snapshots() {
        assert!(split_snapshots("# Notes\nnothing yet").is_empty());
        assert!(split_snapshots("").is_empty());
    }

    #[test]
    fn marker_without_body_yields_empty_content() {
        let snaps = split_snapshots("## Snapshot 3");
        assert_eq!(snaps, vec![WireSnapshot { number: "3".into(), content: String::new() }]);
    }

    #[test]
    fn only_plain_markdown_names_are_served() {
        assert!(is_plain_note_name("Topic_2026-01-01_10-00-00.md"));
        assert!(!is_plain_note_name("../escape.md"));
        assert!(!is_plain_note_name("sub/dir.md"));
        assert!(!is_plain_note_name(".md"));
        assert!(!is_plain_note_name("notes.txt"));
    }
}
