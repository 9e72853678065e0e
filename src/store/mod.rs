//! # Document Store Interface
//!
//! ## Purpose
//! The contract this subsystem requires from its backing document store,
//! regardless of technology: exact counting, filtered/projected/sorted
//! paged fetches with a computed per-record sort key, a union fetch that
//! sorts and pages across two collections as one stream, and distinct-value
//! listing.
//!
//! ## Input/Output Specification
//! - **Input**: [`Predicate`] expression trees, find/union specifications
//! - **Output**: Ordered sequences of raw records, exact counts
//!
//! The store client is constructed explicitly and passed into the
//! orchestrator, so tests run against the in-memory adapter in
//! [`memory`] without any live backend.

pub mod memory;

use crate::dates::DateFormat;
use crate::errors::Result;
use crate::predicate::Predicate;
use crate::{Collection, Document, SourceTag};
use async_trait::async_trait;

/// One (field, format) candidate for the computed sort key.
#[derive(Debug, Clone)]
pub struct SortKeyCandidate {
    pub field: String,
    pub format: DateFormat,
}

/// Coalescing sort-key expression, evaluated inside the store per record:
/// candidates are tried in order and the first that parses supplies the
/// key. Records where none parses have no key and sort after all dated
/// records in descending order.
#[derive(Debug, Clone, Default)]
pub struct SortKeyExpr {
    pub candidates: Vec<SortKeyCandidate>,
}

impl SortKeyExpr {
    /// Build from (field, format) pairs in priority order.
    pub fn coalesce(pairs: &[(&str, DateFormat)]) -> Self {
        Self {
            candidates: pairs
                .iter()
                .map(|(field, format)| SortKeyCandidate {
                    field: field.to_string(),
                    format: *format,
                })
                .collect(),
        }
    }
}

/// Sort direction for the (sort key, record identity) ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// A filtered, projected, sorted, paged fetch against one collection.
#[derive(Debug, Clone)]
pub struct FindSpec {
    pub predicate: Predicate,
    /// Fields to keep on returned records; record identity is always kept
    pub projection: Vec<String>,
    /// Computed sort key; `None` orders on record identity alone
    pub sort_key: Option<SortKeyExpr>,
    pub order: SortOrder,
    pub skip: u64,
    pub limit: u64,
}

/// One side of a union fetch: an independent filtered, sort-key-augmented,
/// source-tagged projection.
#[derive(Debug, Clone)]
pub struct UnionBranch {
    pub collection: Collection,
    pub predicate: Predicate,
    pub projection: Vec<String>,
    pub sort_key: Option<SortKeyExpr>,
    /// Written onto every record of this branch as `source`/`collection`
    pub source_tag: SourceTag,
}

/// Document-store contract required by the orchestrator.
///
/// Implementations must evaluate each branch's sort key before merging in
/// [`union_find`](DocumentStore::union_find); a backend that cannot express
/// per-branch computed keys inside its union operator must instead
/// merge-sort two already-sorted per-collection streams.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Exact number of records matching the predicate. No sampling, no cap.
    async fn count(&self, collection: Collection, predicate: &Predicate) -> Result<u64>;

    /// Filtered, sorted, paged fetch from one collection.
    async fn find(&self, collection: Collection, spec: &FindSpec) -> Result<Vec<Document>>;

    /// Union of two branch fetches, sorted as one stream by
    /// (sort key, record identity) and then paged. Each returned record
    /// carries the `source` and `collection` tags of its branch.
    async fn union_find(
        &self,
        first: &UnionBranch,
        second: &UnionBranch,
        order: SortOrder,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<Document>>;

    /// Distinct string values of a field across a collection. Array-valued
    /// fields contribute each element.
    async fn distinct(&self, collection: Collection, field: &str) -> Result<Vec<String>>;
}
