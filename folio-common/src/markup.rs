//! Inline markup used in titles, bodies and captions
//!
//! Grammar:
//! - `**text**` bold span, `~~text~~` strikethrough span
//! - `<br>` (also `<br/>`, `<br />`) forced line break inside a paragraph
//! - newline starts a new paragraph; blank lines are ignored
//! - lines starting with `- ` are list items; consecutive items share one list
//!
//! Unterminated or empty span markers are kept as literal text.

use serde::Serialize;

const BOLD: &str = "**";
const STRIKE: &str = "~~";
const BREAK_MARKERS: [&str; 3] = ["<br />", "<br/>", "<br>"];

/// Inline run of text
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum Inline {
    Text(String),
    Bold(String),
    Strike(String),
    Break,
}

/// Block-level element of a body
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "items", rename_all = "snake_case")]
pub enum Block {
    Paragraph(Vec<Inline>),
    List(Vec<Vec<Inline>>),
}

/// Chapter heading: one line, or two lines rendered with the gradient style
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Heading {
    pub first: Vec<Inline>,
    pub second: Option<Vec<Inline>>,
}

impl Heading {
    /// Split a title at its first newline or break marker
    pub fn parse(title: &str) -> Self {
        let split = title
            .find('\n')
            .map(|at| (at, 1))
            .into_iter()
            .chain(
                BREAK_MARKERS
                    .iter()
                    .filter_map(|m| title.find(m).map(|at| (at, m.len()))),
            )
            .min_by_key(|(at, _)| *at);

        match split {
            Some((at, len)) => {
                let first = title[..at].trim();
                let second = title[at + len..].trim();
                Self {
                    first: parse_inline(first),
                    second: (!second.is_empty()).then(|| parse_inline(second)),
                }
            }
            None => Self {
                first: parse_inline(title.trim()),
                second: None,
            },
        }
    }

    pub fn is_two_line(&self) -> bool {
        self.second.is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.first.is_empty() && self.second.is_none()
    }
}

/// Parse a body into paragraphs and grouped lists
pub fn parse_blocks(text: &str) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut list: Vec<Vec<Inline>> = Vec::new();

    for line in text.split('\n') {
        let line = line.trim();

        if line.is_empty() {
            flush_list(&mut list, &mut blocks);
            continue;
        }

        if let Some(item) = list_item(line) {
            list.push(parse_inline(item));
            continue;
        }

        flush_list(&mut list, &mut blocks);
        blocks.push(Block::Paragraph(parse_inline(line)));
    }

    flush_list(&mut list, &mut blocks);
    blocks
}

fn flush_list(list: &mut Vec<Vec<Inline>>, blocks: &mut Vec<Block>) {
    if !list.is_empty() {
        blocks.push(Block::List(std::mem::take(list)));
    }
}

fn list_item(line: &str) -> Option<&str> {
    let rest = line.strip_prefix('-')?;
    if rest.starts_with(char::is_whitespace) {
        Some(rest.trim_start())
    } else {
        None
    }
}

/// Parse a single line into inline runs
pub fn parse_inline(line: &str) -> Vec<Inline> {
    let mut out = Vec::new();
    let mut text = String::new();
    let mut rest = line;

    while !rest.is_empty() {
        if let Some(marker) = BREAK_MARKERS.iter().find(|m| rest.starts_with(**m)) {
            push_text(&mut text, &mut out);
            out.push(Inline::Break);
            rest = &rest[marker.len()..];
            continue;
        }

        if let Some((span, consumed)) = delimited(rest, BOLD) {
            push_text(&mut text, &mut out);
            out.push(Inline::Bold(span.to_string()));
            rest = &rest[consumed..];
            continue;
        }

        if let Some((span, consumed)) = delimited(rest, STRIKE) {
            push_text(&mut text, &mut out);
            out.push(Inline::Strike(span.to_string()));
            rest = &rest[consumed..];
            continue;
        }

        let mut chars = rest.chars();
        if let Some(c) = chars.next() {
            text.push(c);
        }
        rest = chars.as_str();
    }

    push_text(&mut text, &mut out);
    out
}

/// `rest` starts with `marker`, a non-empty span, and a closing `marker`
fn delimited<'a>(rest: &'a str, marker: &str) -> Option<(&'a str, usize)> {
    let inner = rest.strip_prefix(marker)?;
    let close = inner.find(marker)?;
    if close == 0 {
        return None;
    }
    Some((&inner[..close], marker.len() * 2 + close))
}

fn push_text(text: &mut String, out: &mut Vec<Inline>) {
    if !text.is_empty() {
        out.push(Inline::Text(std::mem::take(text)));
    }
}

/// Flatten runs to plain text (alt attributes, logging)
pub fn plain_text(runs: &[Inline]) -> String {
    runs.iter()
        .map(|run| match run {
            Inline::Text(s) | Inline::Bold(s) | Inline::Strike(s) => s.as_str(),
            Inline::Break => " ",
        })
        .collect()
}
