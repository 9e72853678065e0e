//! # Jurisdiction Label Module
//!
//! ## Purpose
//! Canonicalization of free-form jurisdiction labels. Court names appear in
//! the store under several spellings (`High Court of Bombay` vs `Bombay High
//! Court`), and oversized state partitions are stored under suffixed names
//! (`Rajasthan_3`). Selection matching must accept every spelling while the
//! caller only ever sees the canonical one.
//!
//! ## Input/Output Specification
//! - **Input**: A court or state label as typed or as stored
//! - **Output**: Accepted spelling variants, canonical identity, and the
//!   selectable label listings (store-backed with a static fallback)

use crate::errors::Result;
use crate::store::DocumentStore;
use crate::Collection;
use regex::Regex;

/// High Courts known to exist in the judgements corpus. Served when the
/// store's distinct-value listing is unavailable; availability of the
/// selector list takes priority over freshness.
pub const FALLBACK_HIGH_COURTS: &[&str] = &[
    "Allahabad High Court",
    "Bombay High Court",
    "Calcutta High Court",
    "Gauhati High Court",
    "High Court for the State of Telangana",
    "High Court of Andhra Pradesh",
    "High Court of Chhattisgarh",
    "High Court of Delhi",
    "High Court of Gujarat",
    "High Court of Himachal Pradesh",
    "High Court of Jammu and Kashmir",
    "High Court of Jharkhand",
    "High Court of Karnataka",
    "High Court of Kerala",
    "High Court of Madhya Pradesh",
    "High Court of Manipur",
    "High Court of Meghalaya",
    "High Court of Orissa",
    "High Court of Punjab and Haryana",
    "High Court of Rajasthan",
    "High Court of Sikkim",
    "High Court of Tripura",
    "High Court of Uttarakhand",
    "Madras High Court",
    "Patna High Court",
];

/// States and union territories known to exist in the statutes corpus.
pub const FALLBACK_STATES: &[&str] = &[
    "Andaman and Nicobar Islands",
    "Andhra Pradesh",
    "Arunachal Pradesh",
    "Assam",
    "Bihar",
    "Chandigarh",
    "Chhattisgarh",
    "Dadra and Nagar Haveli and Daman and Diu",
    "Delhi",
    "Goa",
    "Gujarat",
    "Haryana",
    "Himachal Pradesh",
    "Jammu and Kashmir",
    "Jharkhand",
    "Karnataka",
    "Kerala",
    "Ladakh",
    "Lakshadweep",
    "Madhya Pradesh",
    "Maharashtra",
    "Manipur",
    "Meghalaya",
    "Odisha",
    "Puducherry",
    "Punjab",
    "Rajasthan",
    "Tamil Nadu",
    "Tripura",
    "Uttar Pradesh",
    "Uttarakhand",
    "West Bengal",
];

/// Canonicalize a state label by dropping a trailing `_<digits>` partition
/// suffix (`Rajasthan_3` -> `Rajasthan`). Idempotent; case-preserving.
pub fn normalize_state_label(label: &str) -> String {
    let s = label.trim();
    if s.is_empty() {
        return String::new();
    }
    let suffix = Regex::new(r"_[0-9]+$").unwrap();
    suffix.replace(s, "").into_owned()
}

/// Generate the accepted spelling variants for a court label, so
/// `High Court of X` also matches a stored `X High Court` and vice versa.
/// The original label is always the first entry; matching against the
/// variants is exact and case-insensitive.
pub fn court_label_variants(label: &str) -> Vec<String> {
    let s = label.trim();
    if s.is_empty() {
        return Vec::new();
    }

    let mut variants = vec![s.to_string()];
    let mut push_unique = |v: String, out: &mut Vec<String>| {
        if !out.iter().any(|existing| existing.eq_ignore_ascii_case(&v)) {
            out.push(v);
        }
    };

    let of_form = Regex::new(r"(?i)^High Court (?:of|for the State of)\s+(.+)$").unwrap();
    if let Some(caps) = of_form.captures(s) {
        push_unique(format!("{} High Court", &caps[1]), &mut variants);
    }

    let suffix_form = Regex::new(r"(?i)^(.+?)\s+High Court$").unwrap();
    if let Some(caps) = suffix_form.captures(s) {
        push_unique(format!("High Court of {}", &caps[1]), &mut variants);
    }

    variants
}

/// List the selectable High Court labels. Values come from the store's
/// distinct `Court Name` values; any failure or empty listing degrades to
/// [`FALLBACK_HIGH_COURTS`] without surfacing an error.
pub async fn list_high_courts(store: &dyn DocumentStore) -> Vec<String> {
    match distinct_labels(store, Collection::HcCases, "Court Name").await {
        Ok(mut labels) if !labels.is_empty() => {
            labels.sort_by_key(|l| l.to_lowercase());
            labels
        }
        Ok(_) => FALLBACK_HIGH_COURTS.iter().map(|s| s.to_string()).collect(),
        Err(e) => {
            tracing::warn!("Court listing degraded to static fallback: {}", e);
            FALLBACK_HIGH_COURTS.iter().map(|s| s.to_string()).collect()
        }
    }
}

/// List the selectable state labels, normalized, deduped, and sorted
/// case-insensitively. Degrades to [`FALLBACK_STATES`] on store failure.
pub async fn list_states(store: &dyn DocumentStore) -> Vec<String> {
    match distinct_labels(store, Collection::StateActs, "State Name").await {
        Ok(labels) if !labels.is_empty() => {
            let mut normalized: Vec<String> = labels
                .iter()
                .map(|l| normalize_state_label(l))
                .filter(|l| !l.is_empty())
                .collect();
            normalized.sort_by_key(|l| l.to_lowercase());
            normalized.dedup_by(|a, b| a.eq_ignore_ascii_case(b));
            if normalized.is_empty() {
                FALLBACK_STATES.iter().map(|s| s.to_string()).collect()
            } else {
                normalized
            }
        }
        Ok(_) => FALLBACK_STATES.iter().map(|s| s.to_string()).collect(),
        Err(e) => {
            tracing::warn!("State listing degraded to static fallback: {}", e);
            FALLBACK_STATES.iter().map(|s| s.to_string()).collect()
        }
    }
}

async fn distinct_labels(
    store: &dyn DocumentStore,
    collection: Collection,
    field: &str,
) -> Result<Vec<String>> {
    let values = store.distinct(collection, field).await?;
    Ok(values
        .into_iter()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_normalization_strips_partition_suffix() {
        assert_eq!(normalize_state_label("Rajasthan_3"), "Rajasthan");
        assert_eq!(normalize_state_label("Rajasthan"), "Rajasthan");
        assert_eq!(normalize_state_label("  Tamil Nadu_12  "), "Tamil Nadu");
    }

    #[test]
    fn test_state_normalization_is_idempotent() {
        let once = normalize_state_label("West Bengal_2");
        assert_eq!(normalize_state_label(&once), once);
    }

    #[test]
    fn test_court_variants_of_form() {
        let variants = court_label_variants("High Court of Gujarat");
        assert!(variants.contains(&"High Court of Gujarat".to_string()));
        assert!(variants.contains(&"Gujarat High Court".to_string()));
    }

    #[test]
    fn test_court_variants_suffix_form() {
        let variants = court_label_variants("Bombay High Court");
        assert!(variants.contains(&"Bombay High Court".to_string()));
        assert!(variants.contains(&"High Court of Bombay".to_string()));
    }

    #[test]
    fn test_court_variants_state_of_form() {
        let variants = court_label_variants("High Court for the State of Telangana");
        assert!(variants.contains(&"Telangana High Court".to_string()));
    }

    #[test]
    fn test_empty_label_yields_no_variants() {
        assert!(court_label_variants("   ").is_empty());
    }
}
