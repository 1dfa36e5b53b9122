//! Live-feed polling and reconciliation.
//!
//! A free-running timer requests the live state every [`POLL_INTERVAL`]. Each
//! request runs in its own task and is tagged with a strictly increasing
//! sequence number; requests are never cancelled, so responses may resolve
//! out of order. [`FeedState::apply`] is the single place responses land and
//! it drops anything older than what it has already applied, which makes
//! "last request wins" explicit.
//!
//! Growth detection compares the reported count against the last count seen.
//! A newly arrived item gets a [`HighlightToken`] from [`HighlightSet`]; the
//! caller schedules its expiry with [`schedule_expiry`].

use std::sync::Arc;
use std::time::Duration;

use tokio::task::{AbortHandle, JoinHandle};
use tokio::time::MissedTickBehavior;

use crate::error::SourceError;
use crate::source::NoteSource;
use crate::types::{LatestResponse, Snapshot};

/// Time between poll requests.
pub const POLL_INTERVAL: Duration = Duration::from_secs(8);

/// How long a newly arrived item stays highlighted.
pub const HIGHLIGHT_DURATION: Duration = Duration::from_secs(4);

/// One resolved poll request.
#[derive(Debug)]
pub struct PollResult {
    /// Issue order of the request; higher is newer.
    pub seq: u64,
    pub outcome: Result<LatestResponse, SourceError>,
}

/// Everything the live view knows about the feed.
#[derive(Debug, Default, Clone)]
pub struct FeedState {
    pub filename: Option<String>,
    pub snapshots: Vec<Snapshot>,
    pub is_live: bool,
    /// Count reported by the last successful poll. Only used to detect growth.
    pub last_known_count: usize,
    /// Sequence number of the newest response applied so far.
    applied_seq: Option<u64>,
}

impl FeedState {
    /// Applies one poll response and returns the index of a newly arrived
    /// item, if the feed grew.
    ///
    /// Responses whose sequence number is not newer than the last applied one
    /// are ignored entirely. A failure flips `is_live` off and keeps the
    /// previous snapshots. A success replaces filename and snapshots and
    /// always records the reported count, so a source that restarted with
    /// fewer items is accepted without flagging anything.
    pub fn apply(&mut self, result: PollResult) -> Option<usize> {
        if self.applied_seq.is_some_and(|applied| result.seq <= applied) {
            tracing::debug!(seq = result.seq, "dropping stale poll response");
            return None;
        }
        self.applied_seq = Some(result.seq);

        let response = match result.outcome {
            Ok(response) => response,
            Err(e) => {
                if self.is_live {
                    tracing::info!(error = %e, "live feed unavailable");
                }
                self.is_live = false;
                return None;
            }
        };

        let count = response.reported_count();
        self.is_live = true;
        self.filename = Some(response.filename.clone());
        self.snapshots = response.into_snapshots();

        let arrived = (count > self.last_known_count).then(|| count - 1);
        if count < self.last_known_count {
            tracing::info!(previous = self.last_known_count, count, "live feed count went down");
        }
        self.last_known_count = count;
        arrived
    }
}

/// Identifies one highlight so its expiry clears only that highlight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HighlightToken(u64);

#[derive(Debug)]
struct Highlight {
    token: HighlightToken,
    index: usize,
    timer: Option<AbortHandle>,
}

/// Transient "newly arrived" markers keyed by item position.
///
/// Overlapping highlights are independent: each one is removed by its own
/// token, and removing an already removed token does nothing.
#[derive(Debug, Default)]
pub struct HighlightSet {
    next: u64,
    active: Vec<Highlight>,
}

impl HighlightSet {
    /// Marks `index` as newly arrived.
    pub fn flag(&mut self, index: usize) -> HighlightToken {
        self.next += 1;
        let token = HighlightToken(self.next);
        self.active.push(Highlight { token, index, timer: None });
        token
    }

    /// Ties an expiry timer to `token` so it is aborted if the highlight goes
    /// away first. Aborts `timer` immediately if the token is already gone.
    pub fn attach_timer(&mut self, token: HighlightToken, timer: AbortHandle) {
        match self.active.iter_mut().find(|h| h.token == token) {
            Some(h) => h.timer = Some(timer),
            None => timer.abort(),
        }
    }

    /// Removes the highlight for `token`. Returns false if it was already gone.
    pub fn clear(&mut self, token: HighlightToken) -> bool {
        let before = self.active.len();
        self.active.retain(|h| h.token != token);
        self.active.len() != before
    }

    /// Drops highlights for items at or beyond `len`, cancelling their timers.
    pub fn retain_within(&mut self, len: usize) {
        self.active.retain(|h| {
            let keep = h.index < len;
            if !keep {
                if let Some(timer) = &h.timer {
                    timer.abort();
                }
            }
            keep
        });
    }

    pub fn contains(&self, index: usize) -> bool {
        self.active.iter().any(|h| h.index == index)
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }
}

impl Drop for HighlightSet {
    fn drop(&mut self) {
        for timer in self.active.iter().filter_map(|h| h.timer.as_ref()) {
            timer.abort();
        }
    }
}

/// Runs `on_expire(token)` once after `after` has elapsed.
///
/// The returned handle's [`JoinHandle::abort_handle`] can be passed to
/// [`HighlightSet::attach_timer`].
pub fn schedule_expiry<F>(token: HighlightToken, after: Duration, on_expire: F) -> JoinHandle<()>
where
    F: FnOnce(HighlightToken) + Send + 'static,
{
    tokio::spawn(async move {
        tokio::time::sleep(after).await;
        on_expire(token);
    })
}

/// Spawns the free-running poll loop.
///
/// Every `period` a new request task is started, whether or not earlier ones
/// have resolved. Each resolved request is handed to `sink` with its sequence
/// number; ordering is left to [`FeedState::apply`]. The loop runs until the
/// returned handle is aborted or the runtime shuts down.
pub fn spawn_poller<F>(source: Arc<dyn NoteSource>, period: Duration, sink: F) -> JoinHandle<()>
where
    F: Fn(PollResult) + Send + Sync + 'static,
{
    let sink = Arc::new(sink);
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut seq: u64 = 0;

        loop {
            ticker.tick().await;
            seq += 1;
            let source = Arc::clone(&source);
            let sink = Arc::clone(&sink);
            tokio::spawn(async move {
                let outcome = source.latest().await;
                if let Err(e) = &outcome {
                    tracing::debug!(seq, error = %e, "poll failed");
                }
                sink(PollResult { seq, outcome });
            });
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{NotesResponse, WireSnapshot};

    fn ok(seq: u64, filename: &str, count: usize) -> PollResult {
        let snapshots = (0..count)
            .map(|i| WireSnapshot { number: (i + 1).to_string(), content: format!("note {i}") })
            .collect();
        PollResult {
            seq,
            outcome: Ok(NotesResponse { filename: filename.to_owned(), count: Some(count), snapshots }),
        }
    }

    fn failed(seq: u64) -> PollResult {
        PollResult { seq, outcome: Err(SourceError::NotReady) }
    }

    #[test]
    fn growth_flags_the_last_item_once() {
        let mut feed = FeedState::default();
        let arrivals: Vec<_> =
            [0, 3, 3, 5].iter().enumerate().map(|(i, &n)| feed.apply(ok(i as u64 + 1, "f.md", n))).collect();
        assert_eq!(arrivals, vec![None, Some(2), None, Some(4)]);
        assert_eq!(feed.last_known_count, 5);
        assert_eq!(feed.snapshots.len(), 5);
        assert!(feed.is_live);
    }

    #[test]
    fn failure_keeps_previous_content() {
        let mut feed = FeedState::default();
        feed.apply(ok(1, "lecture.md", 2));
        assert_eq!(feed.apply(failed(2)), None);
        assert!(!feed.is_live);
        assert_eq!(feed.filename.as_deref(), Some("lecture.md"));
        assert_eq!(feed.snapshots.len(), 2);
        assert_eq!(feed.last_known_count, 2);
    }

    #[test]
    fn older_responses_never_overwrite_newer_ones() {
        let mut feed = FeedState::default();
        assert_eq!(feed.apply(ok(2, "new.md", 4)), Some(3));
        assert_eq!(feed.apply(ok(1, "old.md", 1)), None);
        assert_eq!(feed.apply(failed(2)), None);
        assert_eq!(feed.filename.as_deref(), Some("new.md"));
        assert!(feed.is_live);
        assert_eq!(feed.last_known_count, 4);
    }

    #[test]
    fn count_regression_is_accepted_without_a_flag() {
        let mut feed = FeedState::default();
        feed.apply(ok(1, "a.md", 6));
        assert_eq!(feed.apply(ok(2, "b.md", 2)), None);
        assert_eq!(feed.last_known_count, 2);
        assert_eq!(feed.apply(ok(3, "b.md", 3)), Some(2));
    }

    #[test]
    fn highlights_clear_only_their_own_token() {
        let mut set = HighlightSet::default();
        let first = set.flag(2);
        let second = set.flag(4);
        assert!(set.contains(2) && set.contains(4));
        assert!(set.clear(first));
        assert!(!set.contains(2));
        assert!(set.contains(4));
        assert!(!set.clear(first));
        assert!(set.clear(second));
        assert!(set.is_empty());
    }

    #[test]
    fn overlapping_highlights_on_one_item_are_independent() {
        let mut set = HighlightSet::default();
        let a = set.flag(1);
        let b = set.flag(1);
        set.clear(a);
        assert!(set.contains(1));
        set.clear(b);
        assert!(!set.contains(1));
    }

    #[test]
    fn highlights_for_removed_items_are_dropped() {
        let mut set = HighlightSet::default();
        set.flag(0);
        let gone = set.flag(5);
        set.retain_within(3);
        assert!(set.contains(0));
        assert!(!set.clear(gone));
    }
}
