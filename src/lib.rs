//! # Unified Legal Search Engine
//!
//! ## Overview
//! This library implements a cross-source search engine for Indian legal text.
//! Two independent search verticals (court judgements and statutes) are each
//! split across physically distinct collections with inconsistent schemas;
//! the engine turns loosely-specified search parameters into tolerant
//! per-source filter predicates, merges the sources into one globally
//! date-ordered page, and normalizes every record into a uniform shape.
//!
//! ## Architecture
//! The system is composed of several key modules:
//! - `dates`: Loose date parsing over the formats the corpora actually use
//! - `labels`: Court/state label canonicalization and variant generation
//! - `names`: Judge-name tokenization with honorific stripping
//! - `fields`: Per-attribute field-name variant tables shared across modules
//! - `predicate`: Tagged filter expressions and per-source clause builders
//! - `store`: Document-store contract and the in-memory adapter
//! - `normalize`: Raw/merged canonical document shaping
//! - `search`: Cross-source query orchestration and pagination
//! - `highlight`: Snippet extraction and keyword highlighting
//! - `api`: REST API endpoints
//! - `config`: Configuration management and settings
//! - `errors`: Centralized error handling and types
//!
//! ## Input/Output Specification
//! - **Input**: Search parameters (free text, court/state selection, judge
//!   name, case title, date range, paging), refine keyword sets
//! - **Output**: Date-ordered result pages with exact totals, highlighted
//!   snippet digests
//! - **Guarantees**: Exact counts, globally correct page boundaries across
//!   sources, HTML-safe highlighting
//!
//! ## Usage
//! ```rust,no_run
//! use std::sync::Arc;
//! use unified_legal_search::{Config, SearchEngine, JudgementsQuery};
//! use unified_legal_search::store::memory::MemoryStore;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Arc::new(Config::from_file("config.toml")?);
//!     let store = Arc::new(MemoryStore::from_dir("./data")?);
//!     let engine = SearchEngine::new(store, config);
//!     let page = engine.judgements_search(&JudgementsQuery::default()).await?;
//!     println!("Found {} results", page.total);
//!     Ok(())
//! }
//! ```

// Core modules
pub mod config;
pub mod errors;
pub mod dates;
pub mod labels;
pub mod names;
pub mod fields;
pub mod predicate;
pub mod store;
pub mod normalize;
pub mod search;
pub mod highlight;
pub mod api;

// Re-exports for convenience
pub use config::Config;
pub use errors::{Result, SearchError};
pub use search::{JudgementsQuery, ResultPage, SearchEngine, StatutesQuery};

use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A record as stored by (or normalized from) one source. Field names vary
/// per source and per ingestion batch, so records stay schemaless maps.
pub type Document = serde_json::Map<String, serde_json::Value>;

/// The four physical collections backing the two search verticals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Collection {
    /// Supreme Court judgements
    ScCases,
    /// High Court judgements
    HcCases,
    /// Central (national) acts
    CentralActs,
    /// State acts, partitioned by state
    StateActs,
}

impl Collection {
    /// Store-side collection name.
    pub fn name(&self) -> &'static str {
        match self {
            Collection::ScCases => "sc_cases",
            Collection::HcCases => "hc_cases",
            Collection::CentralActs => "central_acts",
            Collection::StateActs => "state_acts",
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Source tag carried on every normalized record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceTag {
    Sc,
    Hc,
    Central,
    State,
}

impl SourceTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceTag::Sc => "SC",
            SourceTag::Hc => "HC",
            SourceTag::Central => "CENTRAL",
            SourceTag::State => "STATE",
        }
    }

    /// Parse a tag as written onto union records.
    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "SC" => Some(SourceTag::Sc),
            "HC" => Some(SourceTag::Hc),
            "CENTRAL" => Some(SourceTag::Central),
            "STATE" => Some(SourceTag::State),
            _ => None,
        }
    }

    /// Collection this tag originates from.
    pub fn collection(&self) -> Collection {
        match self {
            SourceTag::Sc => Collection::ScCases,
            SourceTag::Hc => Collection::HcCases,
            SourceTag::Central => Collection::CentralActs,
            SourceTag::State => Collection::StateActs,
        }
    }
}

/// Which source categories participate in a request. Decided once per
/// request; the output shape is a function of this alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    /// Only the national source (Supreme Court / Central Acts)
    National,
    /// Only partitioned sources (High Courts / State Acts)
    Partitioned,
    /// Both categories; results use the merged union schema
    Both,
}

impl SearchMode {
    /// Merged output is produced exactly when more than one source category
    /// is in scope.
    pub fn output_shape(&self) -> normalize::OutputShape {
        match self {
            SearchMode::Both => normalize::OutputShape::Merged,
            _ => normalize::OutputShape::Raw,
        }
    }
}

/// Application state shared across API handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<config::Config>,
    pub engine: Arc<search::SearchEngine>,
}
