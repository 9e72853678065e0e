//! # Result Normalization Module
//!
//! ## Purpose
//! Maps raw records from any source into one of two canonical shapes. When
//! a single source participates in a request, records keep that source's
//! natural field names (raw shape). When both categories participate, every
//! record exposes the union schema with the other side's attributes
//! explicitly null (merged shape), so one response never mixes key sets.
//!
//! ## Input/Output Specification
//! - **Input**: A raw record, its originating source, the output shape
//! - **Output**: A canonical document with `source` and `collection` tags
//!
//! Each logical attribute resolves through the ordered field-variant tables
//! in [`fields`](crate::fields): first non-null wins. The internal sort key
//! never appears in output.

use crate::dates;
use crate::fields;
use crate::labels::normalize_state_label;
use crate::{Document, SourceTag};
use serde_json::Value;

/// Output schema selector, a function solely of how many source categories
/// are in scope for the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputShape {
    /// One source participates; its natural field set is exposed
    Raw,
    /// Both categories participate; the union schema with explicit nulls
    Merged,
}

/// Canonical attribute keys contributed by each source.
const SC_KEYS: &[&str] = &[
    "file_name",
    "case_no",
    "citation",
    "bench",
    "judgement_by",
    "content",
    "judgment_dates",
];
const HC_KEYS: &[&str] = &[
    "Court name",
    "title",
    "case number",
    "cnr",
    "decision date",
    "disposal nature",
    "judge",
    "text",
];
const CENTRAL_KEYS: &[&str] = &[
    "name of statute",
    "section number",
    "section title",
    "section text",
];
const STATE_KEYS: &[&str] = &[
    "state name",
    "name of statute",
    "section number",
    "section title",
    "section text",
];

/// A value counts as present when it is not null, not an empty string, and
/// not an empty array.
fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        _ => true,
    }
}

/// First present value among the field-name variants, in table order.
fn resolve<'a>(doc: &'a Document, variants: &[&str]) -> Option<&'a Value> {
    variants
        .iter()
        .find_map(|f| doc.get(*f).filter(|v| is_present(v)))
}

/// Resolve to a string, unwrapping singleton arrays.
fn resolve_string(doc: &Document, variants: &[&str]) -> Option<String> {
    resolve(doc, variants)
        .and_then(dates::first_scalar)
        .map(|s| s.to_string())
}

fn resolved_or_null(doc: &Document, variants: &[&str]) -> Value {
    resolve(doc, variants).cloned().unwrap_or(Value::Null)
}

fn string_or_empty(doc: &Document, variants: &[&str]) -> Value {
    Value::String(resolve_string(doc, variants).unwrap_or_default())
}

/// Supreme Court attributes under their canonical keys. The exposed
/// `judgment_dates` is the normalized ISO form when any date field parses.
fn sc_attributes(doc: &Document) -> Document {
    let mut out = Document::new();
    out.insert(
        "file_name".to_string(),
        string_or_empty(doc, fields::SC_FILE_NAME_FIELDS),
    );
    out.insert("case_no".to_string(), resolved_or_null(doc, &["case_no"]));
    out.insert("citation".to_string(), resolved_or_null(doc, &["citation"]));

    let bench = resolved_or_null(doc, &["bench"]);
    let judgement_by = match resolve(doc, &["judgement_by"]) {
        Some(v) => v.clone(),
        None => bench.clone(),
    };
    out.insert("bench".to_string(), bench);
    out.insert("judgement_by".to_string(), judgement_by);

    out.insert(
        "content".to_string(),
        string_or_empty(doc, fields::SC_CONTENT_FIELDS),
    );

    let iso_date = resolve(doc, fields::SC_DATE_FIELDS)
        .and_then(dates::parse_value)
        .map(|d| Value::String(d.format("%Y-%m-%d").to_string()))
        .unwrap_or(Value::Null);
    out.insert("judgment_dates".to_string(), iso_date);
    out
}

/// High Court attributes under their canonical keys.
fn hc_attributes(doc: &Document) -> Document {
    let mut out = Document::new();
    out.insert(
        "Court name".to_string(),
        Value::String(
            resolve_string(doc, fields::HC_COURT_NAME_FIELDS)
                .map(|s| s.trim().to_string())
                .unwrap_or_default(),
        ),
    );
    out.insert(
        "title".to_string(),
        string_or_empty(doc, fields::HC_TITLE_FIELDS),
    );
    out.insert(
        "case number".to_string(),
        resolved_or_null(doc, fields::HC_CASE_NUMBER_FIELDS),
    );
    out.insert("cnr".to_string(), resolved_or_null(doc, fields::HC_CNR_FIELDS));
    out.insert(
        "decision date".to_string(),
        resolve_string(doc, fields::HC_DATE_FIELDS)
            .map(Value::String)
            .unwrap_or(Value::Null),
    );
    out.insert(
        "disposal nature".to_string(),
        resolved_or_null(doc, fields::HC_DISPOSAL_FIELDS),
    );
    out.insert("judge".to_string(), resolved_or_null(doc, fields::HC_JUDGE_FIELDS));
    out.insert(
        "text".to_string(),
        string_or_empty(doc, fields::HC_TEXT_FIELDS),
    );
    out
}

/// Statute attributes shared by both act sources.
fn statute_attributes(doc: &Document) -> Document {
    let mut out = Document::new();
    out.insert(
        "name of statute".to_string(),
        string_or_empty(doc, fields::STATUTE_NAME_FIELDS),
    );
    out.insert(
        "section number".to_string(),
        string_or_empty(doc, fields::SECTION_NUMBER_FIELDS),
    );
    out.insert(
        "section title".to_string(),
        string_or_empty(doc, fields::SECTION_TITLE_FIELDS),
    );
    out.insert(
        "section text".to_string(),
        string_or_empty(doc, fields::SECTION_TEXT_FIELDS),
    );
    out
}

fn state_attributes(doc: &Document) -> Document {
    let mut out = Document::new();
    out.insert(
        "state name".to_string(),
        Value::String(normalize_state_label(
            &resolve_string(doc, fields::STATE_NAME_FIELDS).unwrap_or_default(),
        )),
    );
    for (k, v) in statute_attributes(doc) {
        out.insert(k, v);
    }
    out
}

fn tag(out: &mut Document, source: SourceTag) {
    out.insert(
        "source".to_string(),
        Value::String(source.as_str().to_string()),
    );
    out.insert(
        "collection".to_string(),
        Value::String(source.collection().name().to_string()),
    );
}

/// Copy `keys` from `own` when this record's source contributed them,
/// otherwise write explicit nulls so merged pages share one key set.
fn write_keys(out: &mut Document, keys: &[&str], own: Option<&Document>) {
    for key in keys {
        let value = own
            .and_then(|m| m.get(*key))
            .cloned()
            .unwrap_or(Value::Null);
        out.insert(key.to_string(), value);
    }
}

/// Normalize one judgement record.
pub fn normalize_judgement(doc: &Document, source: SourceTag, shape: OutputShape) -> Document {
    let own = match source {
        SourceTag::Hc => hc_attributes(doc),
        _ => sc_attributes(doc),
    };

    let mut out = Document::new();
    match shape {
        OutputShape::Raw => {
            for (k, v) in own {
                out.insert(k, v);
            }
        }
        OutputShape::Merged => {
            let is_sc = !matches!(source, SourceTag::Hc);
            write_keys(&mut out, SC_KEYS, is_sc.then_some(&own));
            write_keys(&mut out, HC_KEYS, (!is_sc).then_some(&own));
        }
    }
    tag(&mut out, source);
    out
}

/// Normalize one statute record.
pub fn normalize_statute(doc: &Document, source: SourceTag, shape: OutputShape) -> Document {
    let own = match source {
        SourceTag::State => state_attributes(doc),
        _ => statute_attributes(doc),
    };

    let mut out = Document::new();
    match shape {
        OutputShape::Raw => {
            for (k, v) in own {
                out.insert(k, v);
            }
        }
        OutputShape::Merged => {
            let is_state = matches!(source, SourceTag::State);
            let keys = if is_state { STATE_KEYS } else { CENTRAL_KEYS };
            // union key set is STATE_KEYS; central rows null out "state name"
            write_keys(&mut out, STATE_KEYS, None);
            write_keys(&mut out, keys, Some(&own));
        }
    }
    tag(&mut out, source);
    out
}
