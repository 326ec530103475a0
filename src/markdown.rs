//! Markdown-subset renderer
//!
//! Turns reply text into a flat list of [`StyledRun`]s. Supported markers, by precedence:
//!
//! 1. ```` ```code block``` ```` (may span lines)
//! 2. `` `inline code` ``
//! 3. `**bold**` (single line)
//! 4. `*italic*` (single line)
//!
//! A higher-precedence span splits the text before the lower levels look at it, so
//! markers never pair up across a code span. There is no escaping. Unbalanced markers
//! stay in the output as literal text.

use serde::{Deserialize, Serialize};

/// Display style attached to a run of text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Style {
    Normal,
    Info,
    Error,
    SectionTitle,
    ArticleTitle,
    CodeBlock,
    InlineCode,
    Bold,
    Italic,
}

/// A piece of text with its display style
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyledRun {
    pub text: String,
    pub style: Style,
}

impl StyledRun {
    pub fn new(text: impl Into<String>, style: Style) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }
}

const FENCE: &str = "```";

/// Render `text`; unmarked text gets `default_style`.
pub fn render(text: &str, default_style: Style) -> Vec<StyledRun> {
    let mut lexer = Lexer {
        default_style,
        runs: Vec::new(),
    };
    lexer.blocks(text);
    lexer.runs
}

/// Concatenated text of all runs, without any markers
pub fn plain_text(runs: &[StyledRun]) -> String {
    runs.iter().map(|r| r.text.as_str()).collect()
}

struct Lexer {
    default_style: Style,
    runs: Vec<StyledRun>,
}

impl Lexer {
    fn push(&mut self, text: &str, style: Style) {
        if text.is_empty() {
            return;
        }
        if let Some(last) = self.runs.last_mut() {
            if last.style == style {
                last.text.push_str(text);
                return;
            }
        }
        self.runs.push(StyledRun::new(text, style));
    }

    fn blocks(&mut self, text: &str) {
        let mut rest = text;
        while let Some(open) = rest.find(FENCE) {
            let body_start = open + FENCE.len();
            let Some(len) = rest[body_start..].find(FENCE) else {
                break;
            };
            self.code_spans(&rest[..open]);
            self.push(&rest[body_start..body_start + len], Style::CodeBlock);
            rest = &rest[body_start + len + FENCE.len()..];
        }
        self.code_spans(rest);
    }

    fn code_spans(&mut self, text: &str) {
        let mut plain_start = 0;
        let mut cursor = 0;
        while let Some(rel) = text[cursor..].find('`') {
            let open = cursor + rel;
            match text[open + 1..].find('`') {
                // "``" has no content; the second tick may still open a span
                Some(0) => cursor = open + 1,
                Some(len) => {
                    self.bold(&text[plain_start..open]);
                    self.push(&text[open + 1..open + 1 + len], Style::InlineCode);
                    cursor = open + len + 2;
                    plain_start = cursor;
                }
                None => break,
            }
        }
        self.bold(&text[plain_start..]);
    }

    fn bold(&mut self, text: &str) {
        let mut plain_start = 0;
        let mut cursor = 0;
        while let Some((open, body)) = find_delimited(text, cursor, "**") {
            match body {
                Some(len) => {
                    self.italic(&text[plain_start..open]);
                    self.push(&text[open + 2..open + 2 + len], Style::Bold);
                    cursor = open + len + 4;
                    plain_start = cursor;
                }
                None => cursor = open + 1,
            }
        }
        self.italic(&text[plain_start..]);
    }

    fn italic(&mut self, text: &str) {
        let mut plain_start = 0;
        let mut cursor = 0;
        while let Some((open, body)) = find_delimited(text, cursor, "*") {
            match body {
                Some(len) => {
                    self.push(&text[plain_start..open], self.default_style);
                    self.push(&text[open + 1..open + 1 + len], Style::Italic);
                    cursor = open + len + 2;
                    plain_start = cursor;
                }
                None => cursor = open + 1,
            }
        }
        self.push(&text[plain_start..], self.default_style);
    }
}

/// Find the next `marker` at or after `from`.
///
/// Returns its offset and, when a closing marker follows on the same line, the body length.
fn find_delimited(text: &str, from: usize, marker: &str) -> Option<(usize, Option<usize>)> {
    let open = from + text[from..].find(marker)?;
    let body_start = open + marker.len();
    let body = text[body_start..]
        .find(marker)
        .filter(|&len| !text[body_start..body_start + len].contains('\n'));
    Some((open, body))
}
