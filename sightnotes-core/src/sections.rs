//! Structured-section extraction for snapshot text.
//!
//! Snapshot bodies are loosely formatted markdown written by a best-effort
//! capture process. Everything in this module is total: any input string
//! produces a result, and missing or malformed markup degrades to empty
//! sections rather than an error.
//!
//! Sections are found with a single forward pass over the lines. The scanner
//! tracks two bits of state: whether it is inside a fenced code block (where
//! `#` lines are code, not headings) and, once the requested heading has been
//! seen, that heading's level. The section ends at the next heading of the
//! same or a shallower level.

/// Heading labels the capture process writes.
pub const KEY_CONCEPTS: &str = "Key Concepts";
pub const DEFINITIONS: &str = "Important Definitions";
pub const SUMMARY: &str = "Summary";
pub const QUESTIONS: &str = "Questions";
pub const SLIDE_TEXT: &str = "Important Slide Text";

const FENCE: &str = "```";

/// A `term: body` line from the definitions section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Definition {
    pub term: String,
    pub body: String,
}

impl Definition {
    /// Splits on the first colon. A line without a colon is all term.
    pub fn from_line(line: &str) -> Self {
        match line.split_once(':') {
            Some((term, body)) => Self { term: term.trim().to_owned(), body: body.trim().to_owned() },
            None => Self { term: line.trim().to_owned(), body: String::new() },
        }
    }
}

/// The first fenced code block in a snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeBlock {
    /// Language tag after the opening fence, if any (`python` in ```` ```python ````).
    pub language: Option<String>,
    /// Inner text with surrounding whitespace trimmed.
    pub body: String,
}

/// Everything the viewer renders for one snapshot card.
///
/// Derived on demand from the snapshot content and dropped with the frame
/// buffer that displays it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedSnapshot {
    pub concepts: Vec<String>,
    pub definitions: Vec<Definition>,
    pub code: Option<CodeBlock>,
    pub summary: Vec<String>,
    pub questions: Vec<String>,
    pub slide_text: Vec<String>,
}

impl ParsedSnapshot {
    /// True when no recognised section produced anything.
    pub fn is_empty(&self) -> bool {
        self.concepts.is_empty()
            && self.definitions.is_empty()
            && self.code.is_none()
            && self.summary.is_empty()
            && self.questions.is_empty()
            && self.slide_text.is_empty()
    }
}

/// Parses every known section out of `content`.
pub fn parse_snapshot(content: &str) -> ParsedSnapshot {
    ParsedSnapshot {
        concepts: section_items(content, KEY_CONCEPTS),
        definitions: definitions(content),
        code: first_code_block(content),
        summary: section_items(content, SUMMARY),
        questions: section_items(content, QUESTIONS),
        slide_text: section_items(content, SLIDE_TEXT),
    }
}

/// Returns the normalized line items under the first heading whose text is
/// exactly `heading`.
///
/// Items run until the next heading of the same or shallower level, or the
/// end of the text. Each line has its list marker and `**bold**` markup
/// removed and is trimmed; blank results are dropped. A missing heading
/// yields an empty vector.
pub fn section_items(content: &str, heading: &str) -> Vec<String> {
    let wanted = heading.trim();
    let mut items = Vec::new();
    let mut target_level: Option<usize> = None;
    let mut in_fence = false;

    for line in content.lines() {
        if is_fence(line) {
            in_fence = !in_fence;
        } else if !in_fence {
            if let Some((level, text)) = parse_heading(line) {
                match target_level {
                    Some(open) if level <= open => break,
                    None if text == wanted => {
                        target_level = Some(level);
                        continue;
                    }
                    _ => {}
                }
            }
        }

        if target_level.is_some() {
            if let Some(item) = normalize_item(line) {
                items.push(item);
            }
        }
    }

    items
}

/// Items of the "Important Definitions" section split into term and body.
pub fn definitions(content: &str) -> Vec<Definition> {
    section_items(content, DEFINITIONS)
        .iter()
        .map(|line| Definition::from_line(line))
        .collect()
}

/// Finds the first fenced code block anywhere in `content`, independent of
/// headings. An unterminated fence counts as no code.
pub fn first_code_block(content: &str) -> Option<CodeBlock> {
    let mut lines = content.lines();

    let language = loop {
        let line = lines.next()?;
        if let Some(tag) = line.trim_start().strip_prefix(FENCE) {
            break tag.split_whitespace().next().map(str::to_owned);
        }
    };

    let mut body: Vec<&str> = Vec::new();
    for line in lines {
        if line.trim() == FENCE {
            return Some(CodeBlock { language, body: body.join("\n").trim().to_owned() });
        }
        body.push(line);
    }
    None
}

fn is_fence(line: &str) -> bool {
    line.trim_start().starts_with(FENCE)
}

/// `### Title` → `(3, "Title")`. Requires whitespace (or nothing) after the
/// hashes so `#tag` lines are not headings.
fn parse_heading(line: &str) -> Option<(usize, &str)> {
    let trimmed = line.trim_start();
    let level = trimmed.bytes().take_while(|&b| b == b'#').count();
    if level == 0 || level > 6 {
        return None;
    }
    let rest = &trimmed[level..];
    if !rest.is_empty() && !rest.starts_with(char::is_whitespace) {
        return None;
    }
    Some((level, rest.trim()))
}

fn normalize_item(line: &str) -> Option<String> {
    let unbolded = remove_bold(strip_list_marker(line));
    let trimmed = unbolded.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

/// Strips one leading `-`, `*` or `12.` marker and the whitespace after it.
///
/// A marker must be followed by whitespace or end the line; `**bold**` and
/// `3.14` are left alone.
fn strip_list_marker(line: &str) -> &str {
    let trimmed = line.trim_start();
    let after = if let Some(rest) = trimmed.strip_prefix(['-', '*']) {
        rest
    } else {
        let digits = trimmed.bytes().take_while(u8::is_ascii_digit).count();
        match trimmed[digits..].strip_prefix('.') {
            Some(rest) if digits > 0 => rest,
            _ => return line,
        }
    };
    if after.is_empty() || after.starts_with(char::is_whitespace) {
        after.trim_start()
    } else {
        line
    }
}

/// Removes each `**…**` pair, keeping the enclosed text. An unpaired `**`
/// is left as written.
fn remove_bold(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(open) = rest.find("**") {
        let inner = &rest[open + 2..];
        let Some(close) = inner.find("**") else { break };
        out.push_str(&rest[..open]);
        out.push_str(&inner[..close]);
        rest = &inner[close + 2..];
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOTE: &str = "\
### Key Concepts
- **Backpropagation** computes gradients
* Gradient descent
1. Learning   rate schedules

### Important Definitions
- **API**: the primary interface: v2
- Tensor
-

### Code Snippets
```python
# not a heading
x = 1
```

### Summary
Networks learn by **adjusting** weights.
";

    #[test]
    fn key_concepts_are_normalized_in_order() {
        let items = section_items(NOTE, KEY_CONCEPTS);
        assert_eq!(
            items,
            vec![
                "Backpropagation computes gradients",
                "Gradient descent",
                "Learning   rate schedules",
            ]
        );
    }

    #[test]
    fn definitions_split_on_first_colon_only() {
        let defs = definitions(NOTE);
        assert_eq!(defs.len(), 2);
        assert_eq!(defs[0].term, "API");
        assert_eq!(defs[0].body, "the primary interface: v2");
        assert_eq!(defs[1], Definition { term: "Tensor".into(), body: String::new() });
    }

    #[test]
    fn code_block_keeps_language_and_trims_body() {
        let code = first_code_block(NOTE).unwrap();
        assert_eq!(code.language.as_deref(), Some("python"));
        assert_eq!(code.body, "# not a heading\nx = 1");
    }

    #[test]
    fn hash_lines_inside_fences_do_not_end_sections() {
        let text = "## Summary\n```\n# comment\n```\nafter\n## Next\nnope";
        let items = section_items(text, "Summary");
        assert_eq!(items, vec!["```", "# comment", "```", "after"]);
    }

    #[test]
    fn deeper_headings_stay_inside_the_section() {
        let text = "## Summary\none\n### Detail\ntwo\n# Top\nthree";
        assert_eq!(section_items(text, "Summary"), vec!["one", "### Detail", "two"]);
    }

    #[test]
    fn heading_match_is_exact() {
        let text = "### Key Concepts Extra\n- a\n### Key Concepts\n- b";
        assert_eq!(section_items(text, KEY_CONCEPTS), vec!["b"]);
    }

    #[test]
    fn only_the_first_matching_heading_is_used() {
        let text = "### Summary\nfirst\n### Summary\nsecond";
        assert_eq!(section_items(text, SUMMARY), vec!["first"]);
    }

    #[test]
    fn missing_sections_degrade_to_empty() {
        let parsed = parse_snapshot("just some text, no markup at all");
        assert!(parsed.is_empty());
        assert_eq!(first_code_block("no fences"), None);
        assert_eq!(first_code_block("```rust\nunterminated"), None);
    }

    #[test]
    fn empty_fenced_block_is_code_not_absence() {
        let code = first_code_block("```\n\n```").unwrap();
        assert_eq!(code, CodeBlock { language: None, body: String::new() });
    }

    #[test]
    fn markers_without_whitespace_are_content() {
        assert_eq!(strip_list_marker("**bold** start"), "**bold** start");
        assert_eq!(strip_list_marker("3.14 is pi"), "3.14 is pi");
        assert_eq!(strip_list_marker("  12. twelve"), "twelve");
        assert_eq!(remove_bold("a **b** c **d"), "a b c **d");
    }

    #[test]
    fn never_panics_on_odd_input() {
        for input in ["", "#", "###", "### ", "```", "**", "- ", "1.", "é###\n### é", "\u{0}\n##\t"] {
            let _ = parse_snapshot(input);
            let _ = section_items(input, "");
        }
    }

    #[test]
    fn parse_snapshot_collects_all_sections() {
        let parsed = parse_snapshot(NOTE);
        assert_eq!(parsed.concepts.len(), 3);
        assert_eq!(parsed.summary, vec!["Networks learn by adjusting weights."]);
        assert!(parsed.questions.is_empty());
        assert!(!parsed.is_empty());
    }
}
