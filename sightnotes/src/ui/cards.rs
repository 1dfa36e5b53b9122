//! Snapshot card rendering.
//!
//! A sequence of snapshots is flattened into one `CardDocument`: a list of
//! owned lines plus the line offset where each card starts. The document is
//! built once when the underlying data changes and drawn with manual virtual
//! scrolling, so only the visible window becomes `ListItem`s per frame.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem},
};
use sightnotes_core::sections::{ParsedSnapshot, parse_snapshot};
use sightnotes_core::types::Snapshot;

use crate::theme::Theme;
use crate::ui::code::highlight_block;
use crate::ui::layout::{inner_rect, panel_block};

const INDENT: &str = "  ";
const ITEM_INDENT: &str = "    ";

/// Pre-rendered cards for one snapshot sequence.
#[derive(Debug, Default)]
pub struct CardDocument {
    pub lines: Vec<Line<'static>>,
    /// `card_offsets[i]` is the first line of card `i`.
    pub card_offsets: Vec<usize>,
}

impl CardDocument {
    /// Start of the first card below `scroll`.
    pub fn next_card_after(&self, scroll: usize) -> Option<usize> {
        self.card_offsets.iter().copied().find(|&off| off > scroll)
    }

    /// Start of the last card above `scroll`.
    pub fn prev_card_before(&self, scroll: usize) -> Option<usize> {
        self.card_offsets.iter().rev().copied().find(|&off| off < scroll)
    }
}

/// Builds the document for `snapshots`. `is_new(index)` marks cards that get
/// the arrival highlight.
pub fn build_document(
    snapshots: &[Snapshot],
    is_new: impl Fn(usize) -> bool,
    theme: &Theme,
) -> CardDocument {
    let mut doc = CardDocument::default();
    for snapshot in snapshots {
        doc.card_offsets.push(doc.lines.len());
        push_card(&mut doc.lines, snapshot, is_new(snapshot.index), theme);
        doc.lines.push(Line::default());
    }
    doc
}

fn push_card(out: &mut Vec<Line<'static>>, snapshot: &Snapshot, is_new: bool, theme: &Theme) {
    let title_color = if is_new { theme.card_new } else { theme.card_title };
    let mut title = vec![Span::styled(
        format!("▌ Snapshot {}", snapshot.index + 1),
        Style::default().fg(title_color).add_modifier(Modifier::BOLD),
    )];
    if is_new {
        title.push(Span::styled(
            "  ● NEW",
            Style::default().fg(theme.card_new).add_modifier(Modifier::BOLD),
        ));
    }
    out.push(Line::from(title));

    let parsed = parse_snapshot(&snapshot.content);
    if parsed.is_empty() {
        push_raw(out, &snapshot.content, theme);
    } else {
        push_sections(out, &parsed, theme);
    }
}

/// Content without any recognised section is shown as-is.
fn push_raw(out: &mut Vec<Line<'static>>, content: &str, theme: &Theme) {
    if content.trim().is_empty() {
        out.push(Line::styled(format!("{INDENT}(empty snapshot)"), theme.muted));
        return;
    }
    out.extend(content.lines().map(|l| Line::styled(format!("{INDENT}{l}"), theme.text)));
}

fn push_sections(out: &mut Vec<Line<'static>>, parsed: &ParsedSnapshot, theme: &Theme) {
    push_list(out, "Key Concepts", &parsed.concepts, "•", theme);

    if !parsed.definitions.is_empty() {
        push_heading(out, "Definitions", theme);
        for def in &parsed.definitions {
            let mut spans = vec![
                Span::raw(ITEM_INDENT),
                Span::styled(
                    def.term.clone(),
                    Style::default().fg(theme.definition_term).add_modifier(Modifier::BOLD),
                ),
            ];
            if !def.body.is_empty() {
                spans.push(Span::styled(" — ", theme.muted));
                spans.push(Span::styled(def.body.clone(), theme.text));
            }
            out.push(Line::from(spans));
        }
    }

    if let Some(block) = &parsed.code {
        let heading = match &block.language {
            Some(lang) => format!("Code ({lang})"),
            None => "Code".to_owned(),
        };
        push_heading(out, &heading, theme);
        for line in highlight_block(block) {
            let mut spans = vec![Span::raw(ITEM_INDENT)];
            spans.extend(line.spans);
            out.push(Line::from(spans));
        }
    }

    if !parsed.summary.is_empty() {
        push_heading(out, "Summary", theme);
        out.extend(
            parsed.summary.iter().map(|s| Line::styled(format!("{ITEM_INDENT}{s}"), theme.text)),
        );
    }

    push_list(out, "Questions", &parsed.questions, "?", theme);
    push_list(out, "Slide Text", &parsed.slide_text, "›", theme);
}

fn push_heading(out: &mut Vec<Line<'static>>, heading: &str, theme: &Theme) {
    out.push(Line::styled(
        format!("{INDENT}{heading}"),
        Style::default().fg(theme.section_heading).add_modifier(Modifier::BOLD),
    ));
}

fn push_list(
    out: &mut Vec<Line<'static>>,
    heading: &str,
    items: &[String],
    bullet: &'static str,
    theme: &Theme,
) {
    if items.is_empty() {
        return;
    }
    push_heading(out, heading, theme);
    for item in items {
        out.push(Line::from(vec![
            Span::raw(ITEM_INDENT),
            Span::styled(bullet, theme.bullet),
            Span::raw(" "),
            Span::styled(item.clone(), theme.text),
        ]));
    }
}

/// Draws `doc` inside a bordered panel starting at line `scroll`.
///
/// `scroll` is clamped to the document, so callers may overshoot freely.
pub fn render_document(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    doc: &CardDocument,
    scroll: usize,
    placeholder: &str,
    theme: &Theme,
) {
    let block = panel_block(title, true, theme);
    let inner = inner_rect(area);
    let viewport_height = inner.height as usize;

    frame.render_widget(block, area);

    if doc.lines.is_empty() {
        let list = List::new(vec![ListItem::new(Line::styled(placeholder.to_owned(), theme.muted))]);
        frame.render_widget(list, inner);
        return;
    }

    let total = doc.lines.len();
    let visible_start = scroll.min(total.saturating_sub(1));
    let visible_end = (visible_start + viewport_height).min(total);

    let items: Vec<ListItem> = doc.lines[visible_start..visible_end]
        .iter()
        .map(|l| ListItem::new(l.clone()))
        .collect();

    frame.render_widget(List::new(items), inner);
}
