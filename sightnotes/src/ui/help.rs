//! Help overlay renderer.
//!
//! Draws a centred modal over the current view, erasing the background with
//! `Clear` inside the same `terminal.draw()` closure as everything else.

use ratatui::{
    Frame,
    layout::Constraint,
    text::{Line, Text},
    widgets::{Block, Clear, Paragraph, Wrap},
};

use crate::theme::Theme;

/// Renders the keybinding reference as a centred modal, scrolled by
/// `help_scroll` rows. Skipped on terminals narrower than 60 columns.
pub fn render_help_overlay(frame: &mut Frame, theme: &Theme, help_scroll: u16) {
    if frame.area().width < 60 {
        return;
    }

    let overlay_area = frame
        .area()
        .centered(Constraint::Percentage(80), Constraint::Percentage(80));

    frame.render_widget(Clear, overlay_area);

    let block = Block::bordered()
        .title(" Help: j/k scroll, ? or Esc to dismiss ")
        .border_style(ratatui::style::Style::default().fg(theme.border_active));

    let help_text = build_help_text();

    frame.render_widget(
        Paragraph::new(help_text)
            .block(block)
            .wrap(Wrap { trim: false })
            .scroll((help_scroll, 0)),
        overlay_area,
    );
}

fn build_help_text() -> Text<'static> {
    Text::from(vec![
        Line::from("Views"),
        Line::from("  1 / l         Live notes"),
        Line::from("  2 / s         Saved sessions"),
        Line::from("  Tab           Switch between live and sessions"),
        Line::from("  Enter         Open the selected session"),
        Line::from("  Esc / Bksp    Back (session -> list -> live)"),
        Line::from(""),
        Line::from("Scrolling"),
        Line::from("  j / k         Down / up one line (or session)"),
        Line::from("  g / G         Jump to top / bottom"),
        Line::from("  Ctrl-d / u    Half page down / up"),
        Line::from("  Ctrl-f / b    Full page down / up"),
        Line::from("  [ / ]         Previous / next snapshot card"),
        Line::from("  Mouse wheel   Scroll three lines"),
        Line::from(""),
        Line::from("Live notes"),
        Line::from("  The feed refreshes every 8 seconds. New snapshots are"),
        Line::from("  marked NEW for a few seconds and scrolled into view."),
        Line::from(""),
        Line::from("General"),
        Line::from("  ?             Open / close this help"),
        Line::from("  q / Ctrl-c    Quit"),
    ])
}
