//! Text cleanup for everything that lands in a transcript.
//!
//! Turns hold plain text only. Model replies may carry reasoning blocks,
//! HTML fragments or markdown emphasis; human input may carry stray tags.

use regex::Regex;
use std::sync::LazyLock;

/// Reasoning/internal tags whose content is dropped along with the tag.
const REASONING_TAGS: &[&str] = &[
    "thinking",
    "think",
    "reflection",
    "reflect",
    "internal",
    "reasoning",
    "thought",
    "scratch",
    "scratchpad",
    "plan",
    "analysis",
    "analyze",
    "consider",
    "pondering",
    "deliberation",
];

static REASONING_BLOCKS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    REASONING_TAGS
        .iter()
        .filter_map(|tag| Regex::new(&format!(r"(?is)<{tag}[^>]*>.*?</{tag}>", tag = tag)).ok())
        .collect()
});

/// An opening, closing or self-closing tag. A tag name must follow `<`
/// directly, so comparisons such as "under <13" are left alone.
static MARKUP_TAG: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"</?[A-Za-z][\w:-]*(?:\s[^<>]*)?/?>").ok());

static WHITESPACE_RUN: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"\s+").ok());

/// Remove markup tags and trim. Tag content is kept.
pub fn strip_tags(text: &str) -> String {
    match MARKUP_TAG.as_ref() {
        Some(re) => re.replace_all(text, "").trim().to_string(),
        None => text.trim().to_string(),
    }
}

/// Sanitize a model reply: drop reasoning blocks with their content, strip
/// remaining tags and markdown asterisks, collapse whitespace.
pub fn sanitize_response(response: &str) -> String {
    let mut result = response.to_string();

    for re in REASONING_BLOCKS.iter() {
        result = re.replace_all(&result, "").to_string();
    }

    result = strip_tags(&result);
    result = result.replace('*', "");

    if let Some(ws) = WHITESPACE_RUN.as_ref() {
        result = ws.replace_all(&result, " ").to_string();
    }

    result.trim().to_string()
}
