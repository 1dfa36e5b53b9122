//! Session list renderer.
//!
//! Each saved session shows its decoded topic, capture date and file size.
//! The selection is driven by `AppState.session_list_state`.

use humansize::{DECIMAL, format_size};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem},
};
use sightnotes_core::filename::decode_filename;
use sightnotes_core::types::SessionSummary;

use crate::app::AppState;
use crate::theme::Theme;
use crate::ui::layout::panel_block;

/// Renders the session list with the current selection highlighted.
pub fn render_session_list(frame: &mut Frame, area: Rect, state: &mut AppState, theme: &Theme) {
    let sessions = state.views.sessions();
    let title = if sessions.is_empty() {
        " Sessions ".to_owned()
    } else {
        format!(" Sessions ({}) ", sessions.len())
    };
    let block = panel_block(&title, true, theme);

    let items: Vec<ListItem> = if sessions.is_empty() {
        let msg = if state.views.sessions_loading() { "Loading sessions..." } else { "No saved sessions" };
        vec![ListItem::new(Line::styled(msg, theme.muted))]
    } else {
        sessions.iter().map(|s| session_item(s, theme)).collect()
    };

    let list = List::new(items)
        .block(block)
        .highlight_symbol("▶ ")
        .highlight_style(Style::default().fg(theme.border_active).add_modifier(Modifier::BOLD));

    frame.render_stateful_widget(list, area, &mut state.session_list_state);
}

fn session_item(session: &SessionSummary, theme: &Theme) -> ListItem<'static> {
    let decoded = decode_filename(&session.filename);
    let mut spans = vec![Span::styled(decoded.topic, theme.text)];
    if !decoded.date.is_empty() {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(decoded.date, theme.session_date));
    }
    spans.push(Span::styled(
        format!("  {}", format_size(session.size_bytes, DECIMAL)),
        theme.muted,
    ));
    ListItem::new(Line::from(spans))
}
