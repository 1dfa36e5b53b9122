//! Keybinding dispatcher for sightnotes.
//!
//! Translates raw crossterm `KeyEvent`s into `AppState` mutations and returns a
//! `KeyAction` telling the event loop whether to continue or quit. The
//! dispatcher branches first on `state.mode` so the help overlay and normal
//! navigation have isolated handlers.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};

use crate::app::{AppState, Mode};

/// Control-flow signal returned from the key dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Continue the event loop normally.
    Continue,
    /// Exit cleanly.
    Quit,
}

/// Dispatches a key event to the handler matching the current mode.
pub fn handle_key(key: KeyEvent, state: &mut AppState) -> KeyAction {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return KeyAction::Quit;
    }
    match state.mode {
        Mode::HelpOverlay => handle_help(key, state),
        Mode::Normal => handle_normal(key, state),
    }
}

// ---------------------------------------------------------------------------
// Normal mode
// ---------------------------------------------------------------------------

fn handle_normal(key: KeyEvent, state: &mut AppState) -> KeyAction {
    if let Some(action) = handle_scroll_key(key, state) {
        return action;
    }

    match key.code {
        // View switching
        KeyCode::Char('1') | KeyCode::Char('l') => state.show_live(),
        KeyCode::Char('2') | KeyCode::Char('s') => state.show_sessions(),
        KeyCode::Tab => state.toggle_tab(),
        KeyCode::Enter => state.open_selected_session(),
        KeyCode::Esc | KeyCode::Backspace => state.back(),

        // Card navigation
        KeyCode::Char('[') => state.prev_card(),
        KeyCode::Char(']') => state.next_card(),

        KeyCode::Char('?') => {
            state.help_scroll = 0;
            state.mode = Mode::HelpOverlay;
        }
        KeyCode::Char('q') => return KeyAction::Quit,

        _ => {}
    }
    KeyAction::Continue
}

/// Handles j / k / g / G, arrows and Ctrl paging. Returns `None` when the key
/// is not a scroll key.
fn handle_scroll_key(key: KeyEvent, state: &mut AppState) -> Option<KeyAction> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
        KeyCode::Char('j') | KeyCode::Down => state.scroll_down(1),
        KeyCode::Char('k') | KeyCode::Up => state.scroll_up(1),
        KeyCode::Char('g') | KeyCode::Home => state.scroll_top(),
        KeyCode::Char('G') | KeyCode::End => state.scroll_bottom(),
        KeyCode::Char('d') if ctrl => state.half_page_down(),
        KeyCode::Char('u') if ctrl => state.half_page_up(),
        KeyCode::Char('f') if ctrl => state.full_page_down(),
        KeyCode::Char('b') if ctrl => state.full_page_up(),
        KeyCode::PageDown => state.full_page_down(),
        KeyCode::PageUp => state.full_page_up(),
        _ => return None,
    }
    Some(KeyAction::Continue)
}

// ---------------------------------------------------------------------------
// HelpOverlay mode
// ---------------------------------------------------------------------------

/// `?`, `Esc` or `q` dismiss the overlay; j / k / g / G scroll it.
fn handle_help(key: KeyEvent, state: &mut AppState) -> KeyAction {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            state.help_scroll = state.help_scroll.saturating_add(1);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            state.help_scroll = state.help_scroll.saturating_sub(1);
        }
        KeyCode::Char('g') => state.help_scroll = 0,
        KeyCode::Char('G') => state.help_scroll = u16::MAX,
        KeyCode::Char('?') | KeyCode::Esc | KeyCode::Char('q') => state.mode = Mode::Normal,
        _ => {}
    }
    KeyAction::Continue
}

// ---------------------------------------------------------------------------
// Mouse events
// ---------------------------------------------------------------------------

/// Scroll wheel moves the current view (or the help overlay) by 3 lines.
pub fn handle_mouse(mouse: MouseEvent, state: &mut AppState) -> KeyAction {
    let help = state.mode == Mode::HelpOverlay;
    match mouse.kind {
        MouseEventKind::ScrollUp if help => state.help_scroll = state.help_scroll.saturating_sub(3),
        MouseEventKind::ScrollDown if help => {
            state.help_scroll = state.help_scroll.saturating_add(3);
        }
        MouseEventKind::ScrollUp => state.scroll_up(3),
        MouseEventKind::ScrollDown => state.scroll_down(3),
        _ => {}
    }
    KeyAction::Continue
}

#[cfg(test)]
mod tests {
    use super::*;
    use sightnotes_core::types::SessionSummary;
    use sightnotes_core::view::{Effect, ViewKind};
    use tokio::sync::mpsc;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    #[test]
    fn quit_keys() {
        let mut state = AppState::default();
        assert_eq!(handle_key(press(KeyCode::Char('q')), &mut state), KeyAction::Quit);
        assert_eq!(handle_key(ctrl('c'), &mut state), KeyAction::Quit);
        assert_eq!(handle_key(press(KeyCode::Esc), &mut state), KeyAction::Continue);
    }

    #[test]
    fn help_overlay_swallows_navigation() {
        let mut state = AppState::default();
        handle_key(press(KeyCode::Char('?')), &mut state);
        assert_eq!(state.mode, Mode::HelpOverlay);

        handle_key(press(KeyCode::Char('j')), &mut state);
        assert_eq!(state.help_scroll, 1);
        assert_eq!(state.live_scroll, 0);

        assert_eq!(handle_key(press(KeyCode::Char('q')), &mut state), KeyAction::Continue);
        assert_eq!(state.mode, Mode::Normal);
    }

    #[test]
    fn tab_keys_drive_the_view_coordinator() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut state = AppState::new(tx);

        handle_key(press(KeyCode::Char('2')), &mut state);
        assert_eq!(state.views.kind(), ViewKind::SessionList);
        let Ok(Effect::ListSessions(request)) = rx.try_recv() else { panic!("no listing") };
        state.apply_sessions(
            request,
            vec![
                SessionSummary { filename: "A_2026-01-01_1.md".into(), size_bytes: 10 },
                SessionSummary { filename: "B_2026-01-02_1.md".into(), size_bytes: 20 },
            ],
        );

        handle_key(press(KeyCode::Char('j')), &mut state);
        handle_key(press(KeyCode::Enter), &mut state);
        let Ok(Effect::LoadSession { filename, .. }) = rx.try_recv() else { panic!("no load") };
        assert_eq!(filename, "B_2026-01-02_1.md");

        handle_key(press(KeyCode::Backspace), &mut state);
        assert_eq!(state.views.kind(), ViewKind::SessionList);
        handle_key(press(KeyCode::Tab), &mut state);
        assert_eq!(state.views.kind(), ViewKind::Live);
    }

    #[test]
    fn ctrl_paging_uses_viewport_height() {
        let mut state = AppState { viewport_height: 20, ..AppState::default() };
        handle_key(ctrl('d'), &mut state);
        assert_eq!(state.live_scroll, 10);
        handle_key(ctrl('u'), &mut state);
        assert_eq!(state.live_scroll, 0);
    }
}
