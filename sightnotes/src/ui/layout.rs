//! Screen layout for sightnotes.
//!
//! Pure layout arithmetic plus the two fixed chrome rows: the tab bar on top
//! and the status bar at the bottom. Called inside `terminal.draw()` on every
//! render so each frame reflects the current terminal size.

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Margin, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Paragraph, Tabs},
};
use sightnotes_core::view::ViewKind;

use crate::app::{AppState, Mode};
use crate::theme::Theme;

/// Returns `[tabs, main, status_bar]` for the current frame.
///
/// The returned rects are valid only for the current draw closure.
pub fn compute_layout(frame: &Frame) -> [Rect; 3] {
    frame.area().layout(&Layout::vertical([
        Constraint::Length(1),
        Constraint::Fill(1),
        Constraint::Length(1),
    ]))
}

/// Inner `Rect` of a panel after removing the 1-cell border on each side.
pub fn inner_rect(area: Rect) -> Rect {
    area.inner(Margin { vertical: 1, horizontal: 1 })
}

/// Builds a bordered `Block` for a panel. Focused panels get a thick border.
pub fn panel_block<'a>(title: &'a str, is_focused: bool, theme: &'a Theme) -> Block<'a> {
    let border_style = if is_focused {
        Style::default().fg(theme.border_active)
    } else {
        Style::default().fg(theme.border_inactive)
    };
    let border_type = if is_focused { BorderType::Thick } else { BorderType::Plain };

    Block::bordered().title(title).border_type(border_type).border_style(border_style)
}

/// Renders the `Live | Sessions` tab row. Session detail counts as the
/// sessions tab.
pub fn render_tabs(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let selected = match state.views.kind() {
        ViewKind::Live => 0,
        ViewKind::SessionList | ViewKind::SessionDetail => 1,
    };
    let tabs = Tabs::new([" 1 Live ", " 2 Sessions "])
        .select(selected)
        .style(Style::default().fg(theme.tab_inactive))
        .highlight_style(Style::default().fg(theme.tab_active).add_modifier(Modifier::BOLD))
        .divider("│");
    frame.render_widget(tabs, area);
}

/// Renders the 1-row status bar: mode, live indicator, snapshot count and
/// key hints. Never renders blank.
pub fn render_status_bar(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let mode_text = match state.mode {
        Mode::Normal => " NORMAL ",
        Mode::HelpOverlay => " HELP ",
    };
    let (live_text, live_fg) = if state.feed.is_live {
        (" ● LIVE ", theme.status_live)
    } else {
        (" ○ OFFLINE ", theme.status_offline)
    };

    let mut spans = vec![
        Span::styled(mode_text, Style::default().add_modifier(Modifier::BOLD)),
        Span::styled(live_text, Style::default().fg(live_fg).add_modifier(Modifier::BOLD)),
    ];
    let count = state.feed.snapshots.len();
    if count > 0 {
        let noun = if count == 1 { "snapshot" } else { "snapshots" };
        spans.push(Span::raw(format!(" {count} {noun} ")));
    }
    spans.push(Span::raw(" ? help  q quit"));

    frame.render_widget(
        Paragraph::new(Line::from(spans))
            .style(Style::default().bg(theme.status_bar_bg).fg(theme.status_bar_fg)),
        area,
    );
}
