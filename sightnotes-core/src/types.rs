use serde::Deserialize;

/// One captured note document, identified only by its position in a sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub index: usize,   // position within the owning sequence
    pub content: String,
}

/// Metadata for a saved session file. Carries no content.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SessionSummary {
    pub filename: String,
    #[serde(rename = "size", default)]
    pub size_bytes: u64,
}

/// A fully materialized, frozen session.
///
/// Built once per `load_session` call and never mutated while displayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionDetail {
    pub filename: String,
    pub count: usize,
    pub snapshots: Vec<Snapshot>,
}

/// A snapshot as it appears on the wire: `{ "number": "3", "content": "..." }`.
///
/// `number` is the label the capture process wrote after `## Snapshot`; the
/// viewer only uses the position.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WireSnapshot {
    #[serde(default)]
    pub number: String,
    #[serde(default)]
    pub content: String,
}

/// Body shared by `GET latest` and `GET notes/{filename}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NotesResponse {
    pub filename: String,
    #[serde(default)]
    pub count: Option<usize>,
    #[serde(default)]
    pub snapshots: Vec<WireSnapshot>,
}

impl NotesResponse {
    /// Total count reported by the source; falls back to the snapshot list
    /// length when the field is absent.
    pub fn reported_count(&self) -> usize {
        self.count.unwrap_or(self.snapshots.len())
    }

    /// Converts wire snapshots into positional [`Snapshot`]s.
    pub fn into_snapshots(self) -> Vec<Snapshot> {
        self.snapshots
            .into_iter()
            .enumerate()
            .map(|(index, s)| Snapshot { index, content: s.content })
            .collect()
    }

    /// Freezes a `notes/{filename}` response into a [`SessionDetail`].
    pub fn into_detail(self) -> SessionDetail {
        let count = self.reported_count();
        let filename = self.filename.clone();
        SessionDetail { filename, count, snapshots: self.into_snapshots() }
    }
}

/// `GET latest` has the same shape as a session body.
pub type LatestResponse = NotesResponse;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshots_are_indexed_by_position() {
        let resp = NotesResponse {
            filename: "a.md".into(),
            count: None,
            snapshots: vec![
                WireSnapshot { number: "7".into(), content: "first".into() },
                WireSnapshot { number: "9".into(), content: "second".into() },
            ],
        };
        assert_eq!(resp.reported_count(), 2);
        let snaps = resp.into_snapshots();
        assert_eq!(snaps[0], Snapshot { index: 0, content: "first".into() });
        assert_eq!(snaps[1].index, 1);
    }

    #[test]
    fn explicit_count_wins_over_list_length() {
        let resp = NotesResponse { filename: "a.md".into(), count: Some(5), snapshots: vec![] };
        assert_eq!(resp.into_detail().count, 5);
    }
}
