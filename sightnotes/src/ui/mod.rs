//! UI rendering for sightnotes.
//!
//! `render()` is the single entry point called by the event loop's
//! `terminal.draw()` closure. Layout lives in `layout.rs`; card documents
//! are built in `cards.rs` and only rebuilt when their source data changed.

mod layout;
pub mod cards;
mod code;
pub mod help;
pub mod keybindings;
mod session_list;

use ratatui::{Frame, layout::Rect};
use sightnotes_core::filename::decode_filename;
use sightnotes_core::view::{DetailState, View, ViewKind};

use crate::app::{AppState, Mode};
use crate::theme::Theme;
use layout::{compute_layout, inner_rect, render_status_bar, render_tabs};

/// Renders one complete frame: tab row, the current view, status bar and
/// the help overlay when open.
///
/// The main panel's inner height is written back into `state` so paging keys
/// on the next keypress know the viewport size.
pub fn render(frame: &mut Frame, state: &mut AppState, theme: &Theme) {
    let [tabs, main, status_bar] = compute_layout(frame);
    state.viewport_height = inner_rect(main).height;

    render_tabs(frame, tabs, state, theme);
    match state.views.kind() {
        ViewKind::Live => render_live(frame, main, state, theme),
        ViewKind::SessionList => session_list::render_session_list(frame, main, state, theme),
        ViewKind::SessionDetail => render_detail(frame, main, state, theme),
    }
    render_status_bar(frame, status_bar, state, theme);

    if state.mode == Mode::HelpOverlay {
        help::render_help_overlay(frame, theme, state.help_scroll);
    }
}

fn render_live(frame: &mut Frame, area: Rect, state: &mut AppState, theme: &Theme) {
    if state.live_dirty {
        let highlights = &state.highlights;
        state.live_doc =
            cards::build_document(&state.feed.snapshots, |i| highlights.contains(i), theme);
        state.live_dirty = false;
    }
    if let Some(card) = state.follow_card.take() {
        if let Some(&offset) = state.live_doc.card_offsets.get(card) {
            state.live_scroll = offset;
        }
    }

    let title = match &state.feed.filename {
        Some(name) => titled(" Live", name),
        None => " Live ".to_owned(),
    };
    let placeholder = if state.feed.is_live {
        "Waiting for the first snapshot..."
    } else {
        "Not capturing right now. Retrying..."
    };
    cards::render_document(frame, area, &title, &state.live_doc, state.live_scroll, placeholder, theme);
}

fn render_detail(frame: &mut Frame, area: Rect, state: &mut AppState, theme: &Theme) {
    let View::SessionDetail { filename, detail, .. } = state.views.view() else {
        return;
    };

    let placeholder = match detail {
        DetailState::Loading => "Loading session...",
        DetailState::Missing => "Could not load this session.",
        DetailState::Loaded(loaded) => {
            if state.detail_dirty {
                state.detail_doc = cards::build_document(&loaded.snapshots, |_| false, theme);
                state.detail_dirty = false;
            }
            "This session has no snapshots."
        }
    };

    let title = titled(" Session", filename);
    cards::render_document(frame, area, &title, &state.detail_doc, state.detail_scroll, placeholder, theme);
}

/// `" Live: Rust Ownership · Feb 28, 2026 "` style panel titles.
fn titled(prefix: &str, filename: &str) -> String {
    let decoded = decode_filename(filename);
    if decoded.date.is_empty() {
        format!("{prefix}: {} ", decoded.topic)
    } else {
        format!("{prefix}: {} · {} ", decoded.topic, decoded.date)
    }
}
