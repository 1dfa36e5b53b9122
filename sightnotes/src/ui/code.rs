//! Syntax highlighting for code blocks inside snapshot cards.
//!
//! The fence language token picks the syntect syntax; unknown or missing
//! languages fall back to plain text. Syntax and theme sets load lazily on the
//! first highlighted block.

use std::sync::LazyLock;

use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};
use sightnotes_core::sections::CodeBlock;
use syntect::easy::HighlightLines;
use syntect::highlighting::{FontStyle, ThemeSet};
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

static PS: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);
static TS: LazyLock<ThemeSet> = LazyLock::new(ThemeSet::load_defaults);

const CODE_THEME: &str = "base16-ocean.dark";

/// Highlights a code block into owned lines, one per source line.
pub fn highlight_block(block: &CodeBlock) -> Vec<Line<'static>> {
    let syntax = block
        .language
        .as_deref()
        .and_then(|lang| PS.find_syntax_by_token(lang))
        .unwrap_or_else(|| PS.find_syntax_plain_text());

    let Some(theme) = TS.themes.get(CODE_THEME) else {
        return block.body.lines().map(|l| Line::raw(l.to_owned())).collect();
    };

    let mut h = HighlightLines::new(syntax, theme);
    LinesWithEndings::from(&block.body)
        .map(|line| Line::from(highlight_line(line, &mut h)))
        .collect()
}

/// Falls back to a single plain span when syntect fails on a line.
fn highlight_line(line: &str, h: &mut HighlightLines) -> Vec<Span<'static>> {
    let ranges = h.highlight_line(line, &PS).unwrap_or_default();
    let spans: Vec<Span<'static>> = ranges
        .into_iter()
        .map(|(style, text)| syntect_to_span(style, text.trim_end_matches(['\n', '\r'])))
        .filter(|span| !span.content.is_empty())
        .collect();
    if spans.is_empty() {
        vec![Span::raw(line.trim_end_matches(['\n', '\r']).to_owned())]
    } else {
        spans
    }
}

/// Converts a syntect style to a ratatui span. Only the foreground is kept so
/// the panel background shows through.
fn syntect_to_span(style: syntect::highlighting::Style, content: &str) -> Span<'static> {
    let fg = style.foreground;
    let mut ratatui_style = Style::default();
    if fg.a > 0 {
        ratatui_style = ratatui_style.fg(Color::Rgb(fg.r, fg.g, fg.b));
    }
    if style.font_style.contains(FontStyle::BOLD) {
        ratatui_style = ratatui_style.add_modifier(Modifier::BOLD);
    }
    if style.font_style.contains(FontStyle::ITALIC) {
        ratatui_style = ratatui_style.add_modifier(Modifier::ITALIC);
    }
    if style.font_style.contains(FontStyle::UNDERLINE) {
        ratatui_style = ratatui_style.add_modifier(Modifier::UNDERLINED);
    }
    Span::styled(content.to_owned(), ratatui_style)
}
