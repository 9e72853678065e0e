//! # Judge Name Tokenization Module
//!
//! ## Purpose
//! Reduces free-form judge names to ordered token lists usable for tolerant
//! matching. Stored values carry honorifics and role words in unpredictable
//! combinations (`HON'BLE SHRI JUSTICE M. S. SONAK`, `M S Sonak, J.`); the
//! tokenizer strips that vocabulary so both sides compare on the bare name.
//!
//! ## Input/Output Specification
//! - **Input**: A name string, possibly a comma-separated list of names
//! - **Output**: One ordered lowercase token list per name; single-character
//!   tokens are initials and match with or without a trailing period

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

/// Honorific and role vocabulary stripped before tokenization, whole-word
/// and case-insensitive.
const HONORIFICS_PATTERN: &str =
    r"(?i)\b(hon'?ble|honou?rable|the|chief|justice|judge|cj|jjs?|mr|mrs|ms|dr|shri|smt|sir|lady|lord)\b";

/// Tokenize one judge name: strip honorifics, drop punctuation, collapse
/// whitespace, lowercase, split. Empty or honorific-only input yields an
/// empty list.
///
/// `"HON'BLE SHRI JUSTICE M. S. SONAK"` -> `["m", "s", "sonak"]`
pub fn tokenize_name(name: &str) -> Vec<String> {
    let s: String = name.trim().nfc().collect();
    if s.is_empty() {
        return Vec::new();
    }

    let honorifics = Regex::new(HONORIFICS_PATTERN).unwrap();
    let s = honorifics.replace_all(&s, " ");

    let punctuation = Regex::new(r"[^\w\s]").unwrap();
    let s = punctuation.replace_all(&s, " ");

    s.to_lowercase()
        .split_whitespace()
        .map(|t| t.to_string())
        .collect()
}

/// Split a possibly comma-separated multi-name input and tokenize each
/// entry. Names that tokenize to nothing are dropped.
pub fn tokenize_name_list(input: &str) -> Vec<Vec<String>> {
    input
        .split(',')
        .map(tokenize_name)
        .filter(|tokens| !tokens.is_empty())
        .collect()
}

/// Build a spacing/punctuation tolerant regex matching the tokens in order.
/// Initials may appear as `M` or `M.`:
///
/// `["m", "s", "sonak"]` -> `(?i)\bm\.?\s*s\.?\s*sonak\b`
///
/// Returns a pattern that can never match when the token list is empty.
pub fn name_pattern(tokens: &[String]) -> String {
    if tokens.is_empty() {
        return r"$a".to_string();
    }

    let mut pattern = String::from(r"(?i)\b");
    for (i, token) in tokens.iter().enumerate() {
        if token.chars().count() == 1 {
            pattern.push_str(&regex::escape(token));
            pattern.push_str(r"\.?\s*");
        } else {
            pattern.push_str(&regex::escape(token));
        }
        if i < tokens.len() - 1 {
            pattern.push_str(r"\s*");
        }
    }
    pattern.push_str(r"\b");
    pattern
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_honorifics_are_stripped() {
        assert_eq!(
            tokenize_name("HON'BLE SHRI JUSTICE M. S. SONAK"),
            vec!["m", "s", "sonak"]
        );
    }

    #[test]
    fn test_role_words_are_stripped() {
        assert_eq!(
            tokenize_name("Justice D. Y. Chandrachud"),
            vec!["d", "y", "chandrachud"]
        );
        assert_eq!(tokenize_name("The Honourable Chief Justice"), Vec::<String>::new());
    }

    #[test]
    fn test_empty_input_yields_no_tokens() {
        assert!(tokenize_name("").is_empty());
        assert!(tokenize_name("   ").is_empty());
    }

    #[test]
    fn test_name_list_splits_on_commas() {
        let names = tokenize_name_list(
            "HON'BLE SHRI JUSTICE M. S. SONAK,HON'BLE SHRI JUSTICE VALMIKI MENEZES",
        );
        assert_eq!(names.len(), 2);
        assert_eq!(names[0], vec!["m", "s", "sonak"]);
        assert_eq!(names[1], vec!["valmiki", "menezes"]);
    }

    #[test]
    fn test_pattern_matches_stored_variants() {
        let tokens = tokenize_name("HON'BLE SHRI JUSTICE M. S. SONAK");
        let pattern = Regex::new(&name_pattern(&tokens)).unwrap();

        assert!(pattern.is_match("M S Sonak, J."));
        assert!(pattern.is_match("M. S. Sonak"));
        assert!(pattern.is_match("m.s.sonak"));
        assert!(!pattern.is_match("M S Sonakville"));
    }

    #[test]
    fn test_empty_token_pattern_never_matches() {
        let pattern = Regex::new(&name_pattern(&[])).unwrap();
        assert!(!pattern.is_match("anything at all"));
    }
}
