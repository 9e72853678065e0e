//! # Snippet Extraction & Highlighting Engine
//!
//! ## Purpose
//! Pure post-hoc highlighting over a batch of already-fetched canonical
//! documents. For each document: locate every occurrence of every keyword
//! in one prioritized text field, merge nearby match context windows into a
//! bounded number of readable snippets, and render them HTML-safe with the
//! matches wrapped in `<mark>` markers.
//!
//! ## Input/Output Specification
//! - **Input**: Normalized documents, a keyword set, a snippet cap, a
//!   context-window radius
//! - **Output**: Per document: `source`, `collection`, display name,
//!   an exact `match_count`, and the ordered highlighted snippets
//!
//! ## Key Features
//! - Keywords are literal from the caller's perspective; pattern
//!   metacharacters are escaped before compilation
//! - `match_count` covers the whole selected field and is never truncated
//!   by the snippet cap
//! - No store access and no shared state; documents in a batch are
//!   processed in parallel

use crate::dates::first_scalar;
use crate::Document;
use rayon::prelude::*;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

/// Two windows merge when the next one starts within this many bytes of
/// the current merged window's end.
const MERGE_SLACK: usize = 10;

/// Text field priority: judgement text fields first, then statute fields,
/// then title/name fallbacks. Exactly one field is selected per document.
pub const HIGHLIGHT_FIELDS: &[&str] = &[
    "content",
    "text",
    "all_text",
    "title",
    "file_name",
    "Section Text",
    "section text",
    "Section Title",
    "section title",
    "Name of statute",
    "Name of Statute",
    "name of statute",
    "state name",
];

/// Snippet cap and context radius for one refine request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HighlightOptions {
    /// Maximum snippets returned per document; earliest windows win
    pub max_snippets: usize,
    /// Characters of context kept on each side of a match
    pub window: usize,
}

impl Default for HighlightOptions {
    fn default() -> Self {
        Self {
            max_snippets: 3,
            window: 120,
        }
    }
}

/// Highlight digest for one document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HighlightDigest {
    pub source: Option<String>,
    pub collection: Option<String>,
    pub file_name: Option<String>,
    pub title: Option<String>,
    /// Total keyword matches across the entire selected field
    pub match_count: usize,
    /// HTML-safe snippets with `<mark>` around every keyword match
    pub snippets: Vec<String>,
}

/// Compile each non-empty keyword into a case-insensitive literal matcher.
fn compile_keywords(keywords: &[String]) -> Vec<Regex> {
    keywords
        .iter()
        .map(|kw| kw.trim())
        .filter(|kw| !kw.is_empty())
        .filter_map(|kw| {
            RegexBuilder::new(&regex::escape(kw))
                .case_insensitive(true)
                .build()
                .ok()
        })
        .collect()
}

/// Select the text this document is highlighted on: the first non-empty
/// field in priority order.
fn select_text(doc: &Document) -> &str {
    for field in HIGHLIGHT_FIELDS {
        if let Some(text) = doc.get(*field).and_then(first_scalar) {
            if !text.is_empty() {
                return text;
            }
        }
    }
    ""
}

/// Escape text for rendering as HTML markup.
fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

fn floor_char_boundary(s: &str, mut i: usize) -> usize {
    while i > 0 && !s.is_char_boundary(i) {
        i -= 1;
    }
    i
}

fn ceil_char_boundary(s: &str, mut i: usize) -> usize {
    while i < s.len() && !s.is_char_boundary(i) {
        i += 1;
    }
    i
}

/// HTML-escape a slice of raw text, then wrap every keyword match within
/// the escaped text in a highlight marker.
fn highlight_text(raw: &str, matchers: &[Regex]) -> String {
    if raw.is_empty() {
        return String::new();
    }
    let mut safe = escape_html(raw);
    for rx in matchers {
        safe = rx
            .replace_all(&safe, |caps: &regex::Captures<'_>| {
                format!("<mark>{}</mark>", &caps[0])
            })
            .into_owned();
    }
    safe
}

/// Expand every match outward by the window radius, clip to the text
/// bounds, merge overlapping and near-adjacent windows in offset order,
/// and cap the result. Earliest windows win; there is no relevance
/// ranking.
fn extract_snippets(text: &str, matchers: &[Regex], options: &HighlightOptions) -> Vec<String> {
    if text.is_empty() || matchers.is_empty() {
        return Vec::new();
    }

    let mut hits: Vec<(usize, usize)> = Vec::new();
    for rx in matchers {
        for m in rx.find_iter(text) {
            let start = floor_char_boundary(text, m.start().saturating_sub(options.window));
            let end = ceil_char_boundary(text, (m.end() + options.window).min(text.len()));
            hits.push((start, end));
        }
    }
    if hits.is_empty() {
        return Vec::new();
    }
    hits.sort_unstable();

    let mut merged: Vec<(usize, usize)> = Vec::new();
    let (mut cur_start, mut cur_end) = hits[0];
    for &(start, end) in &hits[1..] {
        if start <= cur_end + MERGE_SLACK {
            cur_end = cur_end.max(end);
        } else {
            merged.push((cur_start, cur_end));
            cur_start = start;
            cur_end = end;
        }
    }
    merged.push((cur_start, cur_end));
    merged.truncate(options.max_snippets);

    merged
        .into_iter()
        .map(|(start, end)| highlight_text(&text[start..end], matchers))
        .collect()
}

/// Build the highlight digest for one document.
pub fn build_digest(
    doc: &Document,
    keywords: &[String],
    options: &HighlightOptions,
) -> HighlightDigest {
    let matchers = compile_keywords(keywords);
    let text = select_text(doc);

    let match_count = matchers.iter().map(|rx| rx.find_iter(text).count()).sum();
    let snippets = extract_snippets(text, &matchers, options);

    let get_str = |field: &str| {
        doc.get(field)
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
    };

    HighlightDigest {
        source: get_str("source"),
        collection: get_str("collection"),
        file_name: get_str("file_name"),
        title: get_str("title"),
        match_count,
        snippets,
    }
}

/// Highlight a whole batch. Pure and CPU-bound, so documents are processed
/// in parallel; output order matches input order.
pub fn refine_batch(
    docs: &[Document],
    keywords: &[String],
    options: &HighlightOptions,
) -> Vec<HighlightDigest> {
    docs.par_iter()
        .map(|doc| build_digest(doc, keywords, options))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn doc(value: Value) -> Document {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    fn kw(words: &[&str]) -> Vec<String> {
        words.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_nearby_hits_merge_into_one_snippet() {
        // two hits 200 characters apart with a 120 radius overlap
        let filler = "x".repeat(193);
        let text = format!("lease {} lease and more text", filler);
        let record = doc(json!({ "content": text, "source": "SC" }));

        let digest = build_digest(&record, &kw(&["lease"]), &HighlightOptions::default());
        assert_eq!(digest.match_count, 2);
        assert_eq!(digest.snippets.len(), 1);
        assert_eq!(digest.snippets[0].matches("<mark>lease</mark>").count(), 2);
    }

    #[test]
    fn test_distant_hits_stay_separate() {
        let filler = "x".repeat(500);
        let text = format!("lease {} lease", filler);
        let record = doc(json!({ "content": text }));

        let digest = build_digest(&record, &kw(&["lease"]), &HighlightOptions::default());
        assert_eq!(digest.snippets.len(), 2);
    }

    #[test]
    fn test_match_count_is_independent_of_snippet_cap() {
        let filler = "y".repeat(500);
        let text = format!("tax {f} tax {f} tax", f = filler);
        let record = doc(json!({ "content": text }));

        let capped = build_digest(
            &record,
            &kw(&["tax"]),
            &HighlightOptions {
                max_snippets: 1,
                window: 120,
            },
        );
        assert_eq!(capped.snippets.len(), 1);
        assert_eq!(capped.match_count, 3);

        let uncapped = build_digest(&record, &kw(&["tax"]), &HighlightOptions::default());
        assert_eq!(uncapped.match_count, 3);
    }

    #[test]
    fn test_output_is_html_escaped_even_around_matches() {
        let record = doc(json!({
            "content": "the <b>lease & deed</b> was signed",
        }));
        let digest = build_digest(&record, &kw(&["lease"]), &HighlightOptions::default());
        let snippet = &digest.snippets[0];
        assert!(snippet.contains("&lt;b&gt;<mark>lease</mark> &amp; deed&lt;/b&gt;"));
        assert!(!snippet.contains("<b>"));
    }

    #[test]
    fn test_keywords_are_literal_not_patterns() {
        let record = doc(json!({ "content": "section 4.1 versus section 4x1" }));
        let digest = build_digest(&record, &kw(&["4.1"]), &HighlightOptions::default());
        assert_eq!(digest.match_count, 1);
    }

    #[test]
    fn test_field_priority_prefers_body_text() {
        let record = doc(json!({
            "title": "lease dispute",
            "content": "nothing relevant here",
        }));
        let digest = build_digest(&record, &kw(&["lease"]), &HighlightOptions::default());
        // content is selected, so the title hit is not counted
        assert_eq!(digest.match_count, 0);
        assert!(digest.snippets.is_empty());
    }

    #[test]
    fn test_statute_fields_are_reachable() {
        let record = doc(json!({
            "section text": "Whoever commits theft shall be punished",
            "source": "CENTRAL",
            "collection": "central_acts",
        }));
        let digest = build_digest(&record, &kw(&["theft"]), &HighlightOptions::default());
        assert_eq!(digest.match_count, 1);
        assert_eq!(digest.source.as_deref(), Some("CENTRAL"));
    }

    #[test]
    fn test_empty_keywords_yield_empty_digest() {
        let record = doc(json!({ "content": "some text", "title": "t" }));
        let digest = build_digest(&record, &kw(&["", "  "]), &HighlightOptions::default());
        assert_eq!(digest.match_count, 0);
        assert!(digest.snippets.is_empty());
        assert_eq!(digest.title.as_deref(), Some("t"));
    }

    #[test]
    fn test_multibyte_text_does_not_split_characters() {
        let text = format!("{} lease {}", "न्यायालय ".repeat(20), "क़ानून ".repeat(20));
        let record = doc(json!({ "content": text }));
        let digest = build_digest(&record, &kw(&["lease"]), &HighlightOptions::default());
        assert_eq!(digest.match_count, 1);
        assert_eq!(digest.snippets.len(), 1);
    }

    #[test]
    fn test_batch_preserves_input_order() {
        let docs = vec![
            doc(json!({ "content": "alpha lease" })),
            doc(json!({ "content": "no hits" })),
            doc(json!({ "content": "lease lease" })),
        ];
        let digests = refine_batch(&docs, &kw(&["lease"]), &HighlightOptions::default());
        let counts: Vec<usize> = digests.iter().map(|d| d.match_count).collect();
        assert_eq!(counts, vec![1, 0, 2]);
    }
}
