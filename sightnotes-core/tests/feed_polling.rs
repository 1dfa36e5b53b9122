//! Drives the real poll loop against a scripted source on a paused clock.
//!
//! Exercises: spawn_poller, FeedState::apply, HighlightSet, schedule_expiry.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use sightnotes_core::error::SourceError;
use sightnotes_core::poller::{
    schedule_expiry, spawn_poller, FeedState, HighlightSet, PollResult, HIGHLIGHT_DURATION,
    POLL_INTERVAL,
};
use sightnotes_core::source::NoteSource;
use sightnotes_core::types::{LatestResponse, NotesResponse, SessionSummary, WireSnapshot};
use tokio::sync::mpsc;
use tokio::time::Instant;

/// One scripted reply: how long the request takes, then either
/// `(filename, count)` or a failure.
type Reply = (Duration, Option<(&'static str, usize)>);

struct ScriptedSource {
    replies: Mutex<VecDeque<Reply>>,
}

impl ScriptedSource {
    fn new(replies: Vec<Reply>) -> Arc<Self> {
        Arc::new(Self { replies: Mutex::new(replies.into()) })
    }
}

#[async_trait]
impl NoteSource for ScriptedSource {
    async fn latest(&self) -> Result<LatestResponse, SourceError> {
        let next = self.replies.lock().unwrap().pop_front();
        let Some((delay, reply)) = next else {
            return Err(SourceError::NotReady);
        };
        tokio::time::sleep(delay).await;
        let (filename, count) = reply.ok_or(SourceError::Status(503))?;
        let snapshots = (0..count)
            .map(|i| WireSnapshot { number: (i + 1).to_string(), content: format!("### Summary\nnote {i}") })
            .collect();
        Ok(NotesResponse { filename: filename.to_owned(), count: Some(count), snapshots })
    }

    async fn sessions(&self) -> Result<Vec<SessionSummary>, SourceError> {
        Ok(Vec::new())
    }

    async fn session(&self, _filename: &str) -> Result<NotesResponse, SourceError> {
        Err(SourceError::NotReady)
    }
}

fn start(source: Arc<ScriptedSource>) -> (tokio::task::JoinHandle<()>, mpsc::UnboundedReceiver<PollResult>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let handle = spawn_poller(source, POLL_INTERVAL, move |result| {
        let _ = tx.send(result);
    });
    (handle, rx)
}

#[tokio::test(start_paused = true)]
async fn growth_flags_two_items_that_expire_on_their_own() {
    let source = ScriptedSource::new(vec![
        (Duration::ZERO, Some(("ml.md", 0))),
        (Duration::ZERO, Some(("ml.md", 3))),
        (Duration::ZERO, Some(("ml.md", 3))),
        (Duration::ZERO, Some(("ml.md", 5))),
    ]);
    let (poller, mut rx) = start(source);
    let (expired_tx, mut expired_rx) = mpsc::unbounded_channel();

    let mut feed = FeedState::default();
    let mut highlights = HighlightSet::default();
    let mut flagged = Vec::new();

    for _ in 0..4 {
        let result = rx.recv().await.unwrap();
        if let Some(index) = feed.apply(result) {
            let token = highlights.flag(index);
            let tx = expired_tx.clone();
            let timer = schedule_expiry(token, HIGHLIGHT_DURATION, move |t| {
                let _ = tx.send((t, Instant::now()));
            });
            highlights.attach_timer(token, timer.abort_handle());
            flagged.push((index, token, Instant::now()));
        }
    }
    poller.abort();

    let indices: Vec<usize> = flagged.iter().map(|(i, _, _)| *i).collect();
    assert_eq!(indices, vec![2, 4]);
    assert_eq!(feed.last_known_count, 5);

    for (index, token, flagged_at) in flagged {
        let (expired, at) = expired_rx.recv().await.unwrap();
        assert_eq!(expired, token);
        assert!(at.duration_since(flagged_at) >= HIGHLIGHT_DURATION);
        assert!(highlights.clear(expired), "highlight for {index} should still be active");
        assert!(!highlights.contains(index));
    }
    assert!(highlights.is_empty());
}

#[tokio::test(start_paused = true)]
async fn slow_older_response_does_not_overwrite_newer_state() {
    let source = ScriptedSource::new(vec![
        (Duration::from_secs(20), Some(("old.md", 1))),
        (Duration::ZERO, Some(("new.md", 2))),
        (Duration::ZERO, Some(("new.md", 2))),
    ]);
    let (poller, mut rx) = start(source);

    let mut feed = FeedState::default();
    let mut order = Vec::new();
    for _ in 0..3 {
        let result = rx.recv().await.unwrap();
        order.push(result.seq);
        feed.apply(result);
    }
    poller.abort();

    assert_eq!(order, vec![2, 3, 1], "the first request should resolve last");
    assert_eq!(feed.filename.as_deref(), Some("new.md"));
    assert_eq!(feed.snapshots.len(), 2);
    assert!(feed.is_live);
}

#[tokio::test(start_paused = true)]
async fn failed_poll_only_flips_the_live_flag() {
    let source = ScriptedSource::new(vec![
        (Duration::ZERO, Some(("lecture.md", 2))),
        (Duration::ZERO, None),
    ]);
    let (poller, mut rx) = start(source);

    let mut feed = FeedState::default();
    feed.apply(rx.recv().await.unwrap());
    let before = feed.snapshots.clone();
    assert!(feed.is_live);

    assert_eq!(feed.apply(rx.recv().await.unwrap()), None);
    poller.abort();

    assert!(!feed.is_live);
    assert_eq!(feed.filename.as_deref(), Some("lecture.md"));
    assert_eq!(feed.snapshots, before);
}

#[tokio::test(start_paused = true)]
async fn polling_continues_after_failures() {
    let source = ScriptedSource::new(vec![
        (Duration::ZERO, None),
        (Duration::ZERO, None),
        (Duration::ZERO, Some(("late.md", 1))),
    ]);
    let (poller, mut rx) = start(source);
    let started = Instant::now();

    let mut feed = FeedState::default();
    let mut arrived = None;
    for _ in 0..3 {
        arrived = feed.apply(rx.recv().await.unwrap());
    }
    poller.abort();

    assert_eq!(arrived, Some(0));
    assert!(feed.is_live);
    assert!(started.elapsed() >= POLL_INTERVAL * 2);
}

#[tokio::test(start_paused = true)]
async fn removing_an_item_cancels_its_expiry_timer() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut highlights = HighlightSet::default();
    let token = highlights.flag(7);
    let timer = schedule_expiry(token, HIGHLIGHT_DURATION, move |t| {
        let _ = tx.send(t);
    });
    highlights.attach_timer(token, timer.abort_handle());

    highlights.retain_within(3);
    let joined = timer.await;
    assert!(joined.unwrap_err().is_cancelled());
    assert!(rx.recv().await.is_none());
}
