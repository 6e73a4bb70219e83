//! Slugs and the `**bold**` content convention used by blog posts.
//!
//! Post bodies are plain text. Paragraphs are separated by a blank line; a
//! paragraph wrapped entirely in `**` is a heading, and `**run**` inside a
//! paragraph is bold.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::models::BlogPost;

pub const PREVIEW_CHARS: usize = 200;

static NON_SLUG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9\s-]").expect("valid regex"));
static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));
static DASHES_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"-+").expect("valid regex"));
static BOLD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*([^*]+)\*\*").expect("valid regex"));
static TRAILING_WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+\S*$").expect("valid regex"));

/// Lowercases and drops everything outside `[a-z0-9\s-]`. Accented letters
/// are dropped, not transliterated.
pub fn generate_slug(title: &str) -> String {
    let lowered = title.to_lowercase();
    let stripped = NON_SLUG_RE.replace_all(&lowered, "");
    let dashed = WHITESPACE_RE.replace_all(&stripped, "-");
    DASHES_RE.replace_all(&dashed, "-").trim().to_string()
}

pub fn plain_text(content: &str) -> String {
    content.replace("**", "")
}

/// Cuts at `max_chars` and backs off to the last whole word.
pub fn excerpt(content: &str, max_chars: usize) -> String {
    let text = BOLD_RE.replace_all(content, "$1");
    if text.chars().count() <= max_chars {
        return text.into_owned();
    }
    let cut: String = text.chars().take(max_chars).collect();
    format!("{}...", TRAILING_WORD_RE.replace(&cut, ""))
}

pub fn excerpt_or_preview(post: &BlogPost) -> String {
    match post.excerpt.as_deref().map(str::trim) {
        Some(excerpt) if !excerpt.is_empty() => excerpt.to_string(),
        _ => plain_text(&post.content).chars().take(PREVIEW_CHARS).collect(),
    }
}

pub fn matches_search(post: &BlogPost, term: &str) -> bool {
    let term = term.to_lowercase();
    post.title.to_lowercase().contains(&term) || post.content.to_lowercase().contains(&term)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "text", rename_all = "lowercase")]
pub enum Segment {
    Plain(String),
    Bold(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Block {
    Heading { text: String },
    Paragraph { segments: Vec<Segment> },
}

pub fn segments(paragraph: &str) -> Vec<Segment> {
    let mut out = Vec::new();
    let mut last = 0;
    for captures in BOLD_RE.captures_iter(paragraph) {
        let Some(whole) = captures.get(0) else {
            continue;
        };
        if whole.start() > last {
            out.push(Segment::Plain(paragraph[last..whole.start()].to_string()));
        }
        out.push(Segment::Bold(captures[1].to_string()));
        last = whole.end();
    }
    if last < paragraph.len() {
        out.push(Segment::Plain(paragraph[last..].to_string()));
    }
    out
}

pub fn blocks(content: &str) -> Vec<Block> {
    content
        .split("\n\n")
        .filter(|paragraph| !paragraph.trim().is_empty())
        .map(|paragraph| {
            if paragraph.len() >= 4 && paragraph.starts_with("**") && paragraph.ends_with("**") {
                Block::Heading {
                    text: plain_text(paragraph),
                }
            } else {
                Block::Paragraph {
                    segments: segments(paragraph),
                }
            }
        })
        .collect()
}
