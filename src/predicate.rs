//! # Predicate Builder Module
//!
//! ## Purpose
//! Composes per-source filter expressions from loosely-specified search
//! parameters. Every clause is tolerant: free text matches case-insensitive
//! substrings across field-name variants, judge names match honorific- and
//! punctuation-insensitive token sequences, case titles accept any `v`/`vs`
//! separator spelling, jurisdiction labels match their generated synonym
//! set, and date ranges are evaluated store-side against every
//! (field variant, format) combination.
//!
//! ## Input/Output Specification
//! - **Input**: Search parameters for one source
//! - **Output**: A [`Predicate`] expression tree the store adapter compiles
//!   to its concrete query language
//!
//! Clauses are combined with AND; field spellings within a clause with OR.
//! An empty input contributes no clause at all, so omitted filters never
//! restrict results.

use crate::dates::DateFormat;
use crate::fields;
use crate::labels::{court_label_variants, normalize_state_label};
use crate::names::{name_pattern, tokenize_name_list};
use chrono::NaiveDate;
use regex::Regex;

/// Tagged filter expression over one source. Store-agnostic; adapters
/// compile it to their native query language.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Matches every record (no filters supplied)
    All,
    /// Conjunction; empty list behaves like `All`
    And(Vec<Predicate>),
    /// Disjunction; empty list matches nothing
    Or(Vec<Predicate>),
    /// Regex match against a field. Array-valued fields match when any
    /// element matches; missing or null fields never match.
    Regex {
        field: String,
        pattern: String,
        case_insensitive: bool,
    },
    /// Parse the field (first element if array-valued) with the given
    /// format and require `start <= parsed <= end`. Absent or unparsable
    /// dates never match.
    DateBetween {
        field: String,
        format: DateFormat,
        start: NaiveDate,
        end: NaiveDate,
    },
}

impl Predicate {
    /// Case-insensitive escaped-substring match.
    fn substring(field: &str, text: &str) -> Predicate {
        Predicate::Regex {
            field: field.to_string(),
            pattern: regex::escape(text),
            case_insensitive: true,
        }
    }

    /// Case-insensitive exact match on the whole field value.
    fn exact(field: &str, text: &str) -> Predicate {
        Predicate::Regex {
            field: field.to_string(),
            pattern: format!("^{}$", regex::escape(text)),
            case_insensitive: true,
        }
    }
}

/// AND the supplied clauses, collapsing the trivial cases.
pub fn and_all(clauses: Vec<Predicate>) -> Predicate {
    let mut clauses: Vec<Predicate> = clauses
        .into_iter()
        .filter(|c| !matches!(c, Predicate::All))
        .collect();
    match clauses.len() {
        0 => Predicate::All,
        1 => clauses.remove(0),
        _ => Predicate::And(clauses),
    }
}

/// Free-text condition: escaped substring OR'd across the candidate fields.
/// Empty query contributes nothing.
pub fn text_clause(query: &str, candidate_fields: &[&str]) -> Option<Predicate> {
    let q = query.trim();
    if q.is_empty() {
        return None;
    }
    Some(Predicate::Or(
        candidate_fields
            .iter()
            .map(|f| Predicate::substring(f, q))
            .collect(),
    ))
}

/// Turn a user-entered case title into a tolerant pattern that collapses
/// punctuation and spacing differences and treats `v`, `v.`, `vs`, `vs.`
/// as the same separator token. Returns `None` when no tokens can be
/// extracted; callers fall back to a plain substring match.
pub fn title_pattern(title: &str) -> Option<String> {
    let s = title.trim();
    if s.is_empty() {
        return None;
    }

    // Collapse every Vs spelling to a bare "v" token
    let versus = Regex::new(r"(?i)\bv(?:s\.?)?\b").unwrap();
    let s = versus.replace_all(s, " v ");

    let token_rx = Regex::new(r"[A-Za-z0-9&]+").unwrap();
    let tokens: Vec<&str> = token_rx.find_iter(&s).map(|m| m.as_str()).collect();
    if tokens.is_empty() {
        return None;
    }

    let parts: Vec<String> = tokens
        .iter()
        .map(|t| {
            if t.eq_ignore_ascii_case("v") {
                r"(?:v|vs\.?)".to_string()
            } else {
                regex::escape(t)
            }
        })
        .collect();

    Some(format!(r"\b{}\b", parts.join(r"\W+")))
}

/// Case/section-title condition across the given field variants.
pub fn title_clause(title: &str, candidate_fields: &[&str]) -> Option<Predicate> {
    let t = title.trim();
    if t.is_empty() {
        return None;
    }
    let pattern = title_pattern(t).unwrap_or_else(|| regex::escape(t));
    Some(Predicate::Or(
        candidate_fields
            .iter()
            .map(|f| Predicate::Regex {
                field: f.to_string(),
                pattern: pattern.clone(),
                case_insensitive: true,
            })
            .collect(),
    ))
}

/// Judge condition for High Court records: each comma-separated name is
/// tokenized and matched as an ordered, initials-aware pattern, OR'd across
/// names and field variants.
pub fn hc_judge_clause(judge_input: &str) -> Option<Predicate> {
    let names = tokenize_name_list(judge_input);
    if names.is_empty() {
        return None;
    }

    let mut alternatives = Vec::new();
    for tokens in &names {
        let pattern = name_pattern(tokens);
        for field in fields::HC_JUDGE_FIELDS {
            alternatives.push(Predicate::Regex {
                field: field.to_string(),
                // the pattern carries its own (?i) flag
                pattern: pattern.clone(),
                case_insensitive: false,
            });
        }
    }
    Some(Predicate::Or(alternatives))
}

/// Judge condition for Supreme Court records. Bench strings in `sc_cases`
/// carry no honorifics, so the raw input matches as a plain substring over
/// the judge field variants.
pub fn sc_judge_clause(judge_input: &str) -> Option<Predicate> {
    let j = judge_input.trim();
    if j.is_empty() {
        return None;
    }
    Some(Predicate::Or(
        fields::SC_JUDGE_FIELDS
            .iter()
            .map(|f| Predicate::substring(f, j))
            .collect(),
    ))
}

/// Court selection: exact case-insensitive match against every generated
/// label variant, across every court-name field spelling.
pub fn court_clause(selected: &[String]) -> Option<Predicate> {
    if selected.is_empty() {
        return None;
    }

    let mut alternatives = Vec::new();
    for label in selected {
        for variant in court_label_variants(label) {
            for field in fields::HC_COURT_NAME_FIELDS {
                alternatives.push(Predicate::exact(field, &variant));
            }
        }
    }
    if alternatives.is_empty() {
        return None;
    }
    Some(Predicate::Or(alternatives))
}

/// State selection: accepts both the bare canonical name and any
/// `Name_<digits>` partition spelling present in the store.
pub fn state_clause(selected: &[String]) -> Option<Predicate> {
    if selected.is_empty() {
        return None;
    }

    let mut alternatives = Vec::new();
    for label in selected {
        let canon = normalize_state_label(label);
        if canon.is_empty() {
            continue;
        }
        for field in fields::STATE_NAME_FIELDS {
            alternatives.push(Predicate::exact(field, &canon));
            alternatives.push(Predicate::Regex {
                field: field.to_string(),
                pattern: format!("^{}(_[0-9]+)?$", regex::escape(&canon)),
                case_insensitive: true,
            });
        }
    }
    if alternatives.is_empty() {
        return None;
    }
    Some(Predicate::Or(alternatives))
}

/// Inclusive date-range condition: OR across every
/// (field variant, stored format) combination, each evaluated store-side.
/// Requires both bounds; a half-open range contributes nothing.
pub fn date_clause(
    candidate_fields: &[&str],
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Option<Predicate> {
    let (start, end) = match (start, end) {
        (Some(s), Some(e)) => (s, e),
        _ => return None,
    };

    let mut alternatives = Vec::new();
    for field in candidate_fields {
        for format in [DateFormat::DayFirst, DateFormat::Iso] {
            alternatives.push(Predicate::DateBetween {
                field: field.to_string(),
                format,
                start,
                end,
            });
        }
    }
    Some(Predicate::Or(alternatives))
}

/// Filter for `sc_cases`.
pub fn build_sc_match(
    query: &str,
    judge_name: Option<&str>,
    case_title: Option<&str>,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
) -> Predicate {
    let mut clauses = Vec::new();
    if let Some(c) = text_clause(query, fields::JUDGEMENT_TEXT_FIELDS) {
        clauses.push(c);
    }
    if let Some(c) = judge_name.and_then(sc_judge_clause) {
        clauses.push(c);
    }
    if let Some(c) = case_title.and_then(|t| title_clause(t, fields::SC_TITLE_FIELDS)) {
        clauses.push(c);
    }
    if let Some(c) = date_clause(fields::SC_DATE_FIELDS, start_date, end_date) {
        clauses.push(c);
    }
    and_all(clauses)
}

/// Filter for `hc_cases`.
pub fn build_hc_match(
    query: &str,
    selected_courts: &[String],
    judge_name: Option<&str>,
    case_title: Option<&str>,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
) -> Predicate {
    let mut clauses = Vec::new();
    if let Some(c) = text_clause(query, fields::JUDGEMENT_TEXT_FIELDS) {
        clauses.push(c);
    }
    if let Some(c) = court_clause(selected_courts) {
        clauses.push(c);
    }
    if let Some(c) = judge_name.and_then(hc_judge_clause) {
        clauses.push(c);
    }
    if let Some(c) = case_title.and_then(|t| title_clause(t, fields::HC_TITLE_FIELDS)) {
        clauses.push(c);
    }
    if let Some(c) = date_clause(fields::HC_DATE_FIELDS, start_date, end_date) {
        clauses.push(c);
    }
    and_all(clauses)
}

/// Filter for `central_acts`. A provided section title restricts to the
/// `Section Title` attribute and replaces the general text condition.
pub fn build_central_match(query: &str, section_title: Option<&str>) -> Predicate {
    let mut clauses = Vec::new();
    match section_title.map(str::trim).filter(|t| !t.is_empty()) {
        Some(title) => {
            if let Some(c) = title_clause(title, fields::SECTION_TITLE_FIELDS) {
                clauses.push(c);
            }
        }
        None => {
            if let Some(c) = text_clause(query, fields::STATUTE_TEXT_FIELDS) {
                clauses.push(c);
            }
        }
    }
    and_all(clauses)
}

/// Filter for `state_acts`: state selection plus the central-acts rules.
pub fn build_state_match(
    query: &str,
    selected_states: &[String],
    section_title: Option<&str>,
) -> Predicate {
    let mut clauses = Vec::new();
    if let Some(c) = state_clause(selected_states) {
        clauses.push(c);
    }
    match section_title.map(str::trim).filter(|t| !t.is_empty()) {
        Some(title) => {
            if let Some(c) = title_clause(title, fields::SECTION_TITLE_FIELDS) {
                clauses.push(c);
            }
        }
        None => {
            if let Some(c) = text_clause(query, fields::STATUTE_TEXT_FIELDS) {
                clauses.push(c);
            }
        }
    }
    and_all(clauses)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matches_title(pattern: &str, stored: &str) -> bool {
        Regex::new(&format!("(?i){}", pattern)).unwrap().is_match(stored)
    }

    #[test]
    fn test_title_pattern_collapses_versus_variants() {
        for query in ["State vs. Ramesh", "State Vs Ramesh", "State v Ramesh"] {
            let pattern = title_pattern(query).unwrap();
            assert!(
                matches_title(&pattern, "State v. Ramesh"),
                "query {query:?} failed to match"
            );
        }
    }

    #[test]
    fn test_title_pattern_tolerates_punctuation() {
        let pattern = title_pattern("Sharma & Sons vs Union of India").unwrap();
        assert!(matches_title(&pattern, "Sharma  &  Sons  v.  Union, of India"));
    }

    #[test]
    fn test_title_clause_falls_back_to_substring() {
        // no extractable tokens, e.g. punctuation only
        assert!(title_pattern("!!!").is_none());
        let clause = title_clause("!!!", fields::SC_TITLE_FIELDS).unwrap();
        match clause {
            Predicate::Or(alts) => assert_eq!(alts.len(), fields::SC_TITLE_FIELDS.len()),
            other => panic!("unexpected clause: {other:?}"),
        }
    }

    #[test]
    fn test_empty_inputs_contribute_no_clause() {
        assert_eq!(build_sc_match("", None, None, None, None), Predicate::All);
        assert_eq!(build_central_match("", None), Predicate::All);
        assert!(text_clause("   ", fields::JUDGEMENT_TEXT_FIELDS).is_none());
        assert!(hc_judge_clause("  ,  ").is_none());
    }

    #[test]
    fn test_half_open_date_range_is_ignored() {
        let start = NaiveDate::from_ymd_opt(2020, 1, 1);
        assert!(date_clause(fields::HC_DATE_FIELDS, start, None).is_none());
        assert!(date_clause(fields::HC_DATE_FIELDS, None, start).is_none());
    }

    #[test]
    fn test_date_clause_spans_fields_and_formats() {
        let start = NaiveDate::from_ymd_opt(2020, 1, 1);
        let end = NaiveDate::from_ymd_opt(2020, 12, 31);
        match date_clause(fields::HC_DATE_FIELDS, start, end).unwrap() {
            Predicate::Or(alts) => assert_eq!(alts.len(), fields::HC_DATE_FIELDS.len() * 2),
            other => panic!("unexpected clause: {other:?}"),
        }
    }

    #[test]
    fn test_state_clause_accepts_partition_suffix() {
        let clause = state_clause(&["Rajasthan_3".to_string()]).unwrap();
        match clause {
            Predicate::Or(alts) => {
                assert!(alts.iter().any(|p| matches!(
                    p,
                    Predicate::Regex { pattern, .. } if pattern == "^Rajasthan(_[0-9]+)?$"
                )));
            }
            other => panic!("unexpected clause: {other:?}"),
        }
    }
}
