//! Central application state for sightnotes.
//!
//! `AppState` bundles the live feed (`FeedState` + highlights), the view
//! coordinator for the session browser, and per-view scroll positions. The
//! two data subsystems never read each other's state; the coordinator's
//! current view decides which one the renderer draws. No ratatui rendering
//! logic lives here; it is read by `ui` and mutated by the keybinding
//! dispatcher and the event loop.

use ratatui::widgets::ListState;
use sightnotes_core::poller::{FeedState, HighlightSet, HighlightToken, PollResult};
use sightnotes_core::types::{SessionDetail, SessionSummary};
use sightnotes_core::view::{Effect, RequestId, TransitionError, ViewCoordinator, ViewKind};
use tokio::sync::mpsc::UnboundedSender;

use crate::ui::cards::CardDocument;

/// Overlay mode controlling which keybinding set is active.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Normal navigation (default).
    #[default]
    Normal,
    /// Full-screen help overlay is shown above the current view.
    HelpOverlay,
}

/// All mutable UI state passed through every render cycle.
#[derive(Default)]
pub struct AppState {
    pub mode: Mode,

    // Live feed
    pub feed: FeedState,
    pub highlights: HighlightSet,
    /// Rendered cards for the live feed; rebuilt on the next frame when dirty.
    pub live_doc: CardDocument,
    pub live_dirty: bool,
    pub live_scroll: usize,
    /// Card to bring into view on the next frame (set when a snapshot arrives).
    pub follow_card: Option<usize>,

    // Session browser
    pub views: ViewCoordinator,
    pub session_list_state: ListState,
    pub detail_doc: CardDocument,
    pub detail_dirty: bool,
    pub detail_scroll: usize,

    /// Inner height of the main panel, cached after each render for paging.
    pub viewport_height: u16,
    pub help_scroll: u16,

    /// Effects produced by navigation go to the session worker through here.
    pub effect_tx: Option<UnboundedSender<Effect>>,
}

impl AppState {
    pub fn new(effect_tx: UnboundedSender<Effect>) -> Self {
        Self { effect_tx: Some(effect_tx), ..Self::default() }
    }

    // -----------------------------------------------------------------------
    // Live feed
    // -----------------------------------------------------------------------

    /// Applies a poll response. Returns a token when a new snapshot arrived;
    /// the caller schedules its expiry.
    pub fn apply_poll(&mut self, result: PollResult) -> Option<HighlightToken> {
        let arrived = self.feed.apply(result);
        self.highlights.retain_within(self.feed.snapshots.len());
        self.live_dirty = true;
        let index = arrived?;
        tracing::info!(index, "new snapshot");
        self.follow_card = Some(index);
        Some(self.highlights.flag(index))
    }

    /// Ends one highlight. A token that is already gone is ignored.
    pub fn clear_highlight(&mut self, token: HighlightToken) {
        if self.highlights.clear(token) {
            self.live_dirty = true;
        }
    }

    // -----------------------------------------------------------------------
    // Session browser results
    // -----------------------------------------------------------------------

    pub fn apply_sessions(&mut self, request: RequestId, sessions: Vec<SessionSummary>) {
        if self.views.apply_sessions(request, sessions) {
            let first = (!self.views.sessions().is_empty()).then_some(0);
            self.session_list_state.select(first);
        }
    }

    pub fn apply_detail(&mut self, request: RequestId, detail: Option<SessionDetail>) {
        if self.views.apply_detail(request, detail) {
            self.detail_dirty = true;
            self.detail_scroll = 0;
        }
    }

    // -----------------------------------------------------------------------
    // Navigation
    // -----------------------------------------------------------------------

    pub fn show_live(&mut self) {
        if accept(self.views.show_live()).is_some() {
            self.discard_detail();
        }
    }

    pub fn show_sessions(&mut self) {
        match accept(self.views.show_sessions()) {
            Some(Some(effect)) => {
                self.session_list_state.select(None);
                self.dispatch(effect);
            }
            Some(None) => self.discard_detail(),
            None => {}
        }
    }

    /// Switches between the live tab and the session browser.
    pub fn toggle_tab(&mut self) {
        match self.views.kind() {
            ViewKind::Live => self.show_sessions(),
            ViewKind::SessionList | ViewKind::SessionDetail => self.show_live(),
        }
    }

    /// Opens the session highlighted in the list.
    pub fn open_selected_session(&mut self) {
        if self.views.kind() != ViewKind::SessionList {
            return;
        }
        let Some(filename) = self
            .session_list_state
            .selected()
            .and_then(|i| self.views.sessions().get(i))
            .map(|s| s.filename.clone())
        else {
            return;
        };
        if let Some(effect) = accept(self.views.select_session(&filename)) {
            self.discard_detail();
            self.dispatch(effect);
        }
    }

    /// Detail → list, list → live. Does nothing on the live tab.
    pub fn back(&mut self) {
        match self.views.kind() {
            ViewKind::SessionDetail => {
                if accept(self.views.back()).is_some() {
                    self.discard_detail();
                }
            }
            ViewKind::SessionList => self.show_live(),
            ViewKind::Live => {}
        }
    }

    fn discard_detail(&mut self) {
        self.detail_doc = CardDocument::default();
        self.detail_dirty = false;
        self.detail_scroll = 0;
    }

    fn dispatch(&self, effect: Effect) {
        tracing::debug!(?effect, "dispatching");
        if let Some(tx) = &self.effect_tx {
            let _ = tx.send(effect);
        }
    }

    // -----------------------------------------------------------------------
    // Scrolling
    // -----------------------------------------------------------------------

    /// Scrolls the current view down by `lines` rows (or list entries).
    pub fn scroll_down(&mut self, lines: u16) {
        match self.views.kind() {
            ViewKind::Live => {
                self.follow_card = None;
                self.live_scroll = self.live_scroll.saturating_add(lines as usize);
            }
            ViewKind::SessionList => self.session_list_state.scroll_down_by(lines),
            ViewKind::SessionDetail => {
                self.detail_scroll = self.detail_scroll.saturating_add(lines as usize);
            }
        }
    }

    /// Scrolls the current view up by `lines` rows (or list entries).
    pub fn scroll_up(&mut self, lines: u16) {
        match self.views.kind() {
            ViewKind::Live => {
                self.follow_card = None;
                self.live_scroll = self.live_scroll.saturating_sub(lines as usize);
            }
            ViewKind::SessionList => self.session_list_state.scroll_up_by(lines),
            ViewKind::SessionDetail => {
                self.detail_scroll = self.detail_scroll.saturating_sub(lines as usize);
            }
        }
    }

    pub fn scroll_top(&mut self) {
        match self.views.kind() {
            ViewKind::Live => {
                self.follow_card = None;
                self.live_scroll = 0;
            }
            ViewKind::SessionList => self.session_list_state.select_first(),
            ViewKind::SessionDetail => self.detail_scroll = 0,
        }
    }

    /// Jumps to the last line (clamped by the renderer) or the last session.
    pub fn scroll_bottom(&mut self) {
        match self.views.kind() {
            ViewKind::Live => {
                self.follow_card = None;
                self.live_scroll = self.live_doc.lines.len().saturating_sub(1);
            }
            ViewKind::SessionList => self.session_list_state.select_last(),
            ViewKind::SessionDetail => {
                self.detail_scroll = self.detail_doc.lines.len().saturating_sub(1);
            }
        }
    }

    /// Scrolls by half the visible height; at least one row before the first frame.
    pub fn half_page_down(&mut self) {
        self.scroll_down((self.viewport_height / 2).max(1));
    }

    pub fn half_page_up(&mut self) {
        self.scroll_up((self.viewport_height / 2).max(1));
    }

    pub fn full_page_down(&mut self) {
        self.scroll_down(self.viewport_height.max(1));
    }

    pub fn full_page_up(&mut self) {
        self.scroll_up(self.viewport_height.max(1));
    }

    /// Jumps to the start of the next snapshot card.
    pub fn next_card(&mut self) {
        match self.views.kind() {
            ViewKind::Live => {
                if let Some(offset) = self.live_doc.next_card_after(self.live_scroll) {
                    self.follow_card = None;
                    self.live_scroll = offset;
                }
            }
            ViewKind::SessionDetail => {
                if let Some(offset) = self.detail_doc.next_card_after(self.detail_scroll) {
                    self.detail_scroll = offset;
                }
            }
            ViewKind::SessionList => {}
        }
    }

    /// Jumps to the start of the previous snapshot card.
    pub fn prev_card(&mut self) {
        match self.views.kind() {
            ViewKind::Live => {
                if let Some(offset) = self.live_doc.prev_card_before(self.live_scroll) {
                    self.follow_card = None;
                    self.live_scroll = offset;
                }
            }
            ViewKind::SessionDetail => {
                if let Some(offset) = self.detail_doc.prev_card_before(self.detail_scroll) {
                    self.detail_scroll = offset;
                }
            }
            ViewKind::SessionList => {}
        }
    }
}

/// Logs and swallows a rejected navigation; the view is unchanged.
fn accept<T>(result: Result<T, TransitionError>) -> Option<T> {
    result.map_err(|e| tracing::debug!(error = %e, "navigation ignored")).ok()
}
