//! # In-Memory Store Adapter
//!
//! ## Purpose
//! A complete implementation of the [`DocumentStore`] contract over plain
//! JSON records held in memory. The server binary loads its collections
//! from JSON files at startup; tests construct stores inline. The adapter
//! compiles [`Predicate`] trees once per call and evaluates them with the
//! same tolerance the contract demands: case-insensitive regex over
//! scalar-or-array string fields, strict per-format date comparison with
//! array-first extraction, and null-last descending sort keys.

use crate::dates::{self, DateFormat};
use crate::errors::{Result, SearchError};
use crate::predicate::Predicate;
use crate::store::{DocumentStore, FindSpec, SortKeyExpr, SortOrder, UnionBranch};
use crate::{Collection, Document};
use async_trait::async_trait;
use chrono::NaiveDate;
use regex::{Regex, RegexBuilder};
use serde_json::Value;
use std::collections::{BTreeSet, HashMap};
use std::path::Path;

/// Record with its store-assigned identity. Identities are monotonically
/// increasing across the whole store, so the (sort key, id) ordering is a
/// total order even across collections.
#[derive(Debug, Clone)]
struct StoredRecord {
    id: u64,
    doc: Document,
}

/// In-memory document store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: HashMap<Collection, Vec<StoredRecord>>,
    next_id: u64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load one JSON array file per collection from a directory. Missing
    /// files leave the collection empty; malformed files are a startup
    /// configuration error.
    pub fn from_dir<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();
        let mut store = Self::new();

        for collection in [
            Collection::ScCases,
            Collection::HcCases,
            Collection::CentralActs,
            Collection::StateActs,
        ] {
            let path = dir.join(format!("{}.json", collection.name()));
            if !path.exists() {
                tracing::debug!("No data file for {}, collection left empty", collection);
                continue;
            }

            let content = std::fs::read_to_string(&path).map_err(|e| SearchError::Config {
                message: format!("Failed to read {:?}: {}", path, e),
            })?;
            let records: Vec<Value> =
                serde_json::from_str(&content).map_err(|e| SearchError::Config {
                    message: format!("Failed to parse {:?}: {}", path, e),
                })?;

            let mut loaded = 0usize;
            for record in records {
                match record {
                    Value::Object(doc) => {
                        store.insert(collection, doc);
                        loaded += 1;
                    }
                    other => {
                        tracing::warn!(
                            "Skipping non-object record in {}: {}",
                            collection,
                            other
                        );
                    }
                }
            }
            tracing::info!("Loaded {} records into {}", loaded, collection);
        }

        Ok(store)
    }

    /// Insert one record, assigning the next identity.
    pub fn insert(&mut self, collection: Collection, doc: Document) -> u64 {
        self.next_id += 1;
        let id = self.next_id;
        self.collections
            .entry(collection)
            .or_default()
            .push(StoredRecord { id, doc });
        id
    }

    /// Insert every object in an iterator of JSON values; non-objects are
    /// skipped.
    pub fn insert_many<I: IntoIterator<Item = Value>>(&mut self, collection: Collection, docs: I) {
        for value in docs {
            if let Value::Object(doc) = value {
                self.insert(collection, doc);
            }
        }
    }

    pub fn len(&self, collection: Collection) -> usize {
        self.collections.get(&collection).map_or(0, Vec::len)
    }

    pub fn is_empty(&self, collection: Collection) -> bool {
        self.len(collection) == 0
    }

    fn records(&self, collection: Collection) -> &[StoredRecord] {
        self.collections
            .get(&collection)
            .map_or(&[][..], Vec::as_slice)
    }

    /// Evaluate one branch: filter, compute sort keys, project, tag.
    fn eval_branch(&self, branch: &UnionBranch) -> Result<Vec<SortableRecord>> {
        let compiled = CompiledPredicate::compile(&branch.predicate)?;
        let mut out = Vec::new();
        for record in self.records(branch.collection) {
            if !compiled.matches(&record.doc) {
                continue;
            }
            let key = branch
                .sort_key
                .as_ref()
                .and_then(|expr| eval_sort_key(expr, &record.doc));
            let mut doc = project(&record.doc, &branch.projection, record.id);
            doc.insert(
                "source".to_string(),
                Value::String(branch.source_tag.as_str().to_string()),
            );
            doc.insert(
                "collection".to_string(),
                Value::String(branch.collection.name().to_string()),
            );
            out.push(SortableRecord {
                id: record.id,
                key,
                doc,
            });
        }
        Ok(out)
    }
}

/// A matched record awaiting the (sort key, identity) ordering step.
struct SortableRecord {
    id: u64,
    key: Option<NaiveDate>,
    doc: Document,
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn count(&self, collection: Collection, predicate: &Predicate) -> Result<u64> {
        let compiled = CompiledPredicate::compile(predicate)?;
        Ok(self
            .records(collection)
            .iter()
            .filter(|r| compiled.matches(&r.doc))
            .count() as u64)
    }

    async fn find(&self, collection: Collection, spec: &FindSpec) -> Result<Vec<Document>> {
        let compiled = CompiledPredicate::compile(&spec.predicate)?;
        let mut matched = Vec::new();
        for record in self.records(collection) {
            if !compiled.matches(&record.doc) {
                continue;
            }
            let key = spec
                .sort_key
                .as_ref()
                .and_then(|expr| eval_sort_key(expr, &record.doc));
            matched.push(SortableRecord {
                id: record.id,
                key,
                doc: project(&record.doc, &spec.projection, record.id),
            });
        }

        sort_records(&mut matched, spec.order);
        Ok(paginate(matched, spec.skip, spec.limit))
    }

    async fn union_find(
        &self,
        first: &UnionBranch,
        second: &UnionBranch,
        order: SortOrder,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<Document>> {
        let mut merged = self.eval_branch(first)?;
        merged.extend(self.eval_branch(second)?);

        // Ordering and paging happen on the union, never per branch
        sort_records(&mut merged, order);
        Ok(paginate(merged, skip, limit))
    }

    async fn distinct(&self, collection: Collection, field: &str) -> Result<Vec<String>> {
        let mut values = BTreeSet::new();
        for record in self.records(collection) {
            match record.doc.get(field) {
                Some(Value::String(s)) => {
                    values.insert(s.clone());
                }
                Some(Value::Array(items)) => {
                    for item in items {
                        if let Value::String(s) = item {
                            values.insert(s.clone());
                        }
                    }
                }
                _ => {}
            }
        }
        Ok(values.into_iter().collect())
    }
}

/// Predicate with its regexes compiled, built once per store call.
enum CompiledPredicate {
    All,
    And(Vec<CompiledPredicate>),
    Or(Vec<CompiledPredicate>),
    Regex {
        field: String,
        regex: Regex,
    },
    DateBetween {
        field: String,
        format: DateFormat,
        start: NaiveDate,
        end: NaiveDate,
    },
}

impl CompiledPredicate {
    fn compile(predicate: &Predicate) -> Result<Self> {
        Ok(match predicate {
            Predicate::All => CompiledPredicate::All,
            Predicate::And(children) => CompiledPredicate::And(
                children
                    .iter()
                    .map(Self::compile)
                    .collect::<Result<Vec<_>>>()?,
            ),
            Predicate::Or(children) => CompiledPredicate::Or(
                children
                    .iter()
                    .map(Self::compile)
                    .collect::<Result<Vec<_>>>()?,
            ),
            Predicate::Regex {
                field,
                pattern,
                case_insensitive,
            } => CompiledPredicate::Regex {
                field: field.clone(),
                regex: RegexBuilder::new(pattern)
                    .case_insensitive(*case_insensitive)
                    .build()
                    .map_err(|e| SearchError::Store {
                        details: format!("Invalid filter pattern {:?}: {}", pattern, e),
                    })?,
            },
            Predicate::DateBetween {
                field,
                format,
                start,
                end,
            } => CompiledPredicate::DateBetween {
                field: field.clone(),
                format: *format,
                start: *start,
                end: *end,
            },
        })
    }

    fn matches(&self, doc: &Document) -> bool {
        match self {
            CompiledPredicate::All => true,
            CompiledPredicate::And(children) => children.iter().all(|c| c.matches(doc)),
            CompiledPredicate::Or(children) => children.iter().any(|c| c.matches(doc)),
            CompiledPredicate::Regex { field, regex } => match doc.get(field) {
                Some(Value::String(s)) => regex.is_match(s),
                Some(Value::Array(items)) => items
                    .iter()
                    .filter_map(Value::as_str)
                    .any(|s| regex.is_match(s)),
                _ => false,
            },
            CompiledPredicate::DateBetween {
                field,
                format,
                start,
                end,
            } => doc
                .get(field)
                .and_then(dates::first_scalar)
                .and_then(|s| format.parse(s))
                .map_or(false, |date| date >= *start && date <= *end),
        }
    }
}

/// First candidate that parses wins; scalar-or-array fields use the first
/// element.
fn eval_sort_key(expr: &SortKeyExpr, doc: &Document) -> Option<NaiveDate> {
    expr.candidates.iter().find_map(|candidate| {
        doc.get(&candidate.field)
            .and_then(dates::first_scalar)
            .and_then(|s| candidate.format.parse(s))
    })
}

/// Keep the projected fields plus record identity.
fn project(doc: &Document, projection: &[String], id: u64) -> Document {
    let mut out = Document::new();
    out.insert("_id".to_string(), Value::from(id));
    if projection.is_empty() {
        for (k, v) in doc {
            out.insert(k.clone(), v.clone());
        }
    } else {
        for field in projection {
            if let Some(value) = doc.get(field) {
                out.insert(field.clone(), value.clone());
            }
        }
    }
    out
}

/// Order by (sort key, identity). Descending puts the latest dates first
/// and records without a key after every dated record.
fn sort_records(records: &mut [SortableRecord], order: SortOrder) {
    records.sort_by(|a, b| {
        let by_key = a.key.cmp(&b.key).then(a.id.cmp(&b.id));
        match order {
            SortOrder::Ascending => by_key,
            SortOrder::Descending => by_key.reverse(),
        }
    });
}

fn paginate(records: Vec<SortableRecord>, skip: u64, limit: u64) -> Vec<Document> {
    records
        .into_iter()
        .skip(skip as usize)
        .take(limit as usize)
        .map(|r| r.doc)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predicate;
    use serde_json::json;

    fn store_with(collection: Collection, docs: Vec<Value>) -> MemoryStore {
        let mut store = MemoryStore::new();
        store.insert_many(collection, docs);
        store
    }

    fn find_all_spec(sort_key: Option<SortKeyExpr>) -> FindSpec {
        FindSpec {
            predicate: Predicate::All,
            projection: Vec::new(),
            sort_key,
            order: SortOrder::Descending,
            skip: 0,
            limit: 100,
        }
    }

    #[tokio::test]
    async fn test_regex_matches_array_valued_fields() {
        let store = store_with(
            Collection::HcCases,
            vec![json!({"tags": ["Criminal Appeal", "Bail"]})],
        );
        let pred = predicate::text_clause("bail", &["tags"]).unwrap();
        assert_eq!(store.count(Collection::HcCases, &pred).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_missing_and_null_fields_never_match() {
        let store = store_with(
            Collection::HcCases,
            vec![json!({"judge": null}), json!({"other": "x"})],
        );
        let pred = predicate::text_clause("x", &["judge"]).unwrap();
        assert_eq!(store.count(Collection::HcCases, &pred).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_date_between_is_inclusive_and_format_strict() {
        let store = store_with(
            Collection::HcCases,
            vec![
                json!({"decision date": "04-03-2019"}),
                json!({"decision date": "2019-03-04"}),
                json!({"decision date": "05-03-2019"}),
                json!({"decision date": "garbage"}),
            ],
        );
        let day = NaiveDate::from_ymd_opt(2019, 3, 4).unwrap();
        let pred = predicate::date_clause(&["decision date"], Some(day), Some(day)).unwrap();
        // both encodings of the same day match, the next day and garbage do not
        assert_eq!(store.count(Collection::HcCases, &pred).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_array_wrapped_date_uses_first_element() {
        let store = store_with(
            Collection::ScCases,
            vec![json!({"judgment_dates": ["2019-03-04", "1990-01-01"]})],
        );
        let day = NaiveDate::from_ymd_opt(2019, 3, 4).unwrap();
        let pred = predicate::date_clause(&["judgment_dates"], Some(day), Some(day)).unwrap();
        assert_eq!(store.count(Collection::ScCases, &pred).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_sort_is_date_desc_then_id_desc_with_absent_last() {
        let store = store_with(
            Collection::HcCases,
            vec![
                json!({"title": "oldest", "decision date": "2018-01-01"}),
                json!({"title": "undated"}),
                json!({"title": "newest", "decision date": "2020-01-01"}),
                json!({"title": "tied-later", "decision date": "2020-01-01"}),
            ],
        );
        let key = SortKeyExpr::coalesce(&[("decision date", DateFormat::Iso)]);
        let docs = store
            .find(Collection::HcCases, &find_all_spec(Some(key)))
            .await
            .unwrap();
        let titles: Vec<&str> = docs.iter().map(|d| d["title"].as_str().unwrap()).collect();
        // tie on 2020-01-01 resolved by higher id first; undated sorts last
        assert_eq!(titles, vec!["tied-later", "newest", "oldest", "undated"]);
    }

    #[tokio::test]
    async fn test_union_orders_and_pages_across_collections() {
        let mut store = MemoryStore::new();
        store.insert_many(
            Collection::ScCases,
            vec![
                json!({"file_name": "sc-old", "judgment_dates": "2017-05-01"}),
                json!({"file_name": "sc-new", "judgment_dates": "2021-05-01"}),
            ],
        );
        store.insert_many(
            Collection::HcCases,
            vec![json!({"title": "hc-mid", "decision date": "2019-05-01"})],
        );

        let first = UnionBranch {
            collection: Collection::ScCases,
            predicate: Predicate::All,
            projection: vec!["file_name".to_string(), "judgment_dates".to_string()],
            sort_key: Some(SortKeyExpr::coalesce(&[("judgment_dates", DateFormat::Iso)])),
            source_tag: crate::SourceTag::Sc,
        };
        let second = UnionBranch {
            collection: Collection::HcCases,
            predicate: Predicate::All,
            projection: vec!["title".to_string(), "decision date".to_string()],
            sort_key: Some(SortKeyExpr::coalesce(&[("decision date", DateFormat::Iso)])),
            source_tag: crate::SourceTag::Hc,
        };

        let docs = store
            .union_find(&first, &second, SortOrder::Descending, 0, 10)
            .await
            .unwrap();
        let sources: Vec<&str> = docs.iter().map(|d| d["source"].as_str().unwrap()).collect();
        assert_eq!(sources, vec!["SC", "HC", "SC"]);

        // page boundary lands inside the interleaved stream
        let second_page = store
            .union_find(&first, &second, SortOrder::Descending, 1, 1)
            .await
            .unwrap();
        assert_eq!(second_page.len(), 1);
        assert_eq!(second_page[0]["source"], "HC");
        assert_eq!(second_page[0]["collection"], "hc_cases");
    }

    #[tokio::test]
    async fn test_projection_keeps_identity_and_drops_other_fields() {
        let store = store_with(
            Collection::CentralActs,
            vec![json!({"Section Title": "Definitions", "Section Text": "long text"})],
        );
        let spec = FindSpec {
            predicate: Predicate::All,
            projection: vec!["Section Title".to_string()],
            sort_key: None,
            order: SortOrder::Descending,
            skip: 0,
            limit: 10,
        };
        let docs = store.find(Collection::CentralActs, &spec).await.unwrap();
        assert_eq!(docs.len(), 1);
        assert!(docs[0].contains_key("_id"));
        assert!(docs[0].contains_key("Section Title"));
        assert!(!docs[0].contains_key("Section Text"));
    }

    #[tokio::test]
    async fn test_distinct_unwraps_arrays_and_dedupes() {
        let store = store_with(
            Collection::StateActs,
            vec![
                json!({"State Name": "Rajasthan_3"}),
                json!({"State Name": "Rajasthan_3"}),
                json!({"State Name": ["Assam", "Goa"]}),
            ],
        );
        let values = store
            .distinct(Collection::StateActs, "State Name")
            .await
            .unwrap();
        assert_eq!(values, vec!["Assam", "Goa", "Rajasthan_3"]);
    }
}
