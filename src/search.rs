//! # Cross-Source Query Orchestrator
//!
//! ## Purpose
//! Executes one search request end to end: resolves which sources are in
//! scope, obtains exact per-source totals, fetches one globally ordered
//! page (via a single-source sorted fetch or a union-sort-page fetch), and
//! normalizes every record into the response shape for that request.
//!
//! ## Input/Output Specification
//! - **Input**: Judgements or statutes search parameters
//! - **Output**: A [`ResultPage`] with exact totals and uniform records
//! - **Ordering**: (sort date descending, record identity descending);
//!   statutes page on identity alone
//!
//! ## Key Features
//! - Per-record sort keys computed inside the store query, so skip/limit
//!   paging is correct without over-fetching any source
//! - Union ordering and paging happen on the merged stream; paging each
//!   source independently would break page boundaries
//! - Exact totals summed from independent uncapped per-source counts
//! - Store calls bounded by the configured timeout; a failed count or
//!   fetch fails the whole request naming the source

use crate::config::Config;
use crate::dates::DateFormat;
use crate::errors::{Result, SearchError};
use crate::fields;
use crate::highlight::{self, HighlightDigest, HighlightOptions};
use crate::labels;
use crate::normalize::{self, OutputShape};
use crate::predicate::{self, Predicate};
use crate::store::{DocumentStore, FindSpec, SortKeyExpr, SortOrder, UnionBranch};
use crate::{Collection, Document, SearchMode, SourceTag};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// Judgements search parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JudgementsQuery {
    /// Free-text query; empty means unfiltered
    pub query: String,
    /// Selected courts: "Supreme Court" and/or High Court labels.
    /// Empty defaults to the Supreme Court alone.
    pub courts: Vec<String>,
    pub judge_name: Option<String>,
    pub case_title: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub page: u32,
    pub page_size: u32,
}

impl Default for JudgementsQuery {
    fn default() -> Self {
        Self {
            query: String::new(),
            courts: Vec::new(),
            judge_name: None,
            case_title: None,
            start_date: None,
            end_date: None,
            page: 1,
            page_size: 20,
        }
    }
}

/// Statutes search parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatutesQuery {
    pub query: String,
    /// Selected sources: "Central Acts" and/or state names.
    /// Empty defaults to Central Acts alone.
    pub statutes: Vec<String>,
    /// Restricts matching to section titles, replacing the text condition
    pub section_title: Option<String>,
    pub page: u32,
    pub page_size: u32,
}

impl Default for StatutesQuery {
    fn default() -> Self {
        Self {
            query: String::new(),
            statutes: Vec::new(),
            section_title: None,
            page: 1,
            page_size: 20,
        }
    }
}

/// One page of canonical results with exact totals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultPage {
    pub results: Vec<Document>,
    /// Sum of the independent per-source counts, uncapped
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
    /// `page * page_size < total`
    pub has_more: bool,
    /// Count from the national source (Supreme Court / Central Acts)
    pub national_total: u64,
    /// Count from the partitioned sources (High Courts / State Acts)
    pub partitioned_total: u64,
}

/// Main search engine. Holds no mutable state; safe to share across any
/// number of concurrent requests.
pub struct SearchEngine {
    store: Arc<dyn DocumentStore>,
    config: Arc<Config>,
}

impl SearchEngine {
    pub fn new(store: Arc<dyn DocumentStore>, config: Arc<Config>) -> Self {
        Self { store, config }
    }

    /// Unified judgements search across the Supreme Court and High Court
    /// collections.
    pub async fn judgements_search(&self, params: &JudgementsQuery) -> Result<ResultPage> {
        self.validate_paging(params.page, params.page_size)?;

        // Selection resolution: "Supreme Court" is the national source,
        // everything else names a High Court. Empty selection defaults to
        // the national source.
        let mut selected_hc: Vec<String> = Vec::new();
        let mut include_sc = false;
        for court in &params.courts {
            let c = court.trim();
            if c.is_empty() {
                continue;
            }
            if c.eq_ignore_ascii_case("supreme court") {
                include_sc = true;
            } else {
                selected_hc.push(c.to_string());
            }
        }
        if !include_sc && selected_hc.is_empty() {
            include_sc = true;
        }

        let mode = match (include_sc, !selected_hc.is_empty()) {
            (true, true) => SearchMode::Both,
            (true, false) => SearchMode::National,
            (false, _) => SearchMode::Partitioned,
        };
        tracing::debug!(?mode, page = params.page, "judgements search");

        let sc_match = include_sc.then(|| {
            predicate::build_sc_match(
                &params.query,
                params.judge_name.as_deref(),
                params.case_title.as_deref(),
                params.start_date,
                params.end_date,
            )
        });
        let hc_match = (!selected_hc.is_empty()).then(|| {
            predicate::build_hc_match(
                &params.query,
                &selected_hc,
                params.judge_name.as_deref(),
                params.case_title.as_deref(),
                params.start_date,
                params.end_date,
            )
        });

        let (sc_total, hc_total) = futures::future::try_join(
            self.count_opt(Collection::ScCases, sc_match.as_ref()),
            self.count_opt(Collection::HcCases, hc_match.as_ref()),
        )
        .await?;

        let skip = u64::from(params.page - 1) * u64::from(params.page_size);
        let limit = u64::from(params.page_size);
        let shape = mode.output_shape();

        let results = match mode {
            SearchMode::National => {
                let docs = self
                    .timed(Collection::ScCases.name(), {
                        let spec = single_source_spec(
                            sc_match.clone().unwrap_or(Predicate::All),
                            fields::SC_PROJECTION,
                            Some(sc_sort_key()),
                            skip,
                            limit,
                        );
                        let store = Arc::clone(&self.store);
                        async move { store.find(Collection::ScCases, &spec).await }
                    })
                    .await?;
                docs.iter()
                    .map(|d| normalize::normalize_judgement(d, SourceTag::Sc, shape))
                    .collect()
            }
            SearchMode::Partitioned => {
                let docs = self
                    .timed(Collection::HcCases.name(), {
                        let spec = single_source_spec(
                            hc_match.clone().unwrap_or(Predicate::All),
                            fields::HC_PROJECTION,
                            Some(hc_sort_key()),
                            skip,
                            limit,
                        );
                        let store = Arc::clone(&self.store);
                        async move { store.find(Collection::HcCases, &spec).await }
                    })
                    .await?;
                docs.iter()
                    .map(|d| normalize::normalize_judgement(d, SourceTag::Hc, shape))
                    .collect()
            }
            SearchMode::Both => {
                let sc_branch = UnionBranch {
                    collection: Collection::ScCases,
                    predicate: sc_match.clone().unwrap_or(Predicate::All),
                    projection: to_projection(fields::SC_PROJECTION),
                    sort_key: Some(sc_sort_key()),
                    source_tag: SourceTag::Sc,
                };
                let hc_branch = UnionBranch {
                    collection: Collection::HcCases,
                    predicate: hc_match.clone().unwrap_or(Predicate::All),
                    projection: to_projection(fields::HC_PROJECTION),
                    sort_key: Some(hc_sort_key()),
                    source_tag: SourceTag::Hc,
                };
                let label = union_label(Collection::ScCases, Collection::HcCases);
                let docs = self
                    .timed(&label, {
                        let store = Arc::clone(&self.store);
                        async move {
                            store
                                .union_find(&sc_branch, &hc_branch, SortOrder::Descending, skip, limit)
                                .await
                        }
                    })
                    .await?;
                normalize_union(&docs, shape, normalize::normalize_judgement)
            }
        };

        let total = sc_total + hc_total;
        Ok(ResultPage {
            results,
            total,
            page: params.page,
            page_size: params.page_size,
            has_more: u64::from(params.page) * u64::from(params.page_size) < total,
            national_total: sc_total,
            partitioned_total: hc_total,
        })
    }

    /// Unified statutes search across the central and state act
    /// collections.
    pub async fn statutes_search(&self, params: &StatutesQuery) -> Result<ResultPage> {
        self.validate_paging(params.page, params.page_size)?;

        let mut selected_states: Vec<String> = Vec::new();
        let mut include_central = false;
        for entry in &params.statutes {
            let s = entry.trim();
            if s.is_empty() {
                continue;
            }
            if s.eq_ignore_ascii_case("central")
                || s.eq_ignore_ascii_case("central acts")
                || s.eq_ignore_ascii_case("central act")
            {
                include_central = true;
            } else {
                selected_states.push(s.to_string());
            }
        }
        if !include_central && selected_states.is_empty() {
            include_central = true;
        }

        let mode = match (include_central, !selected_states.is_empty()) {
            (true, true) => SearchMode::Both,
            (true, false) => SearchMode::National,
            (false, _) => SearchMode::Partitioned,
        };
        tracing::debug!(?mode, page = params.page, "statutes search");

        let central_match = include_central
            .then(|| predicate::build_central_match(&params.query, params.section_title.as_deref()));
        let state_match = (!selected_states.is_empty()).then(|| {
            predicate::build_state_match(
                &params.query,
                &selected_states,
                params.section_title.as_deref(),
            )
        });

        let (central_total, state_total) = futures::future::try_join(
            self.count_opt(Collection::CentralActs, central_match.as_ref()),
            self.count_opt(Collection::StateActs, state_match.as_ref()),
        )
        .await?;

        let skip = u64::from(params.page - 1) * u64::from(params.page_size);
        let limit = u64::from(params.page_size);
        let shape = mode.output_shape();

        // No date sort key exists for acts; pages order on identity alone
        let results = match mode {
            SearchMode::National => {
                let docs = self
                    .timed(Collection::CentralActs.name(), {
                        let spec = single_source_spec(
                            central_match.clone().unwrap_or(Predicate::All),
                            fields::CENTRAL_PROJECTION,
                            None,
                            skip,
                            limit,
                        );
                        let store = Arc::clone(&self.store);
                        async move { store.find(Collection::CentralActs, &spec).await }
                    })
                    .await?;
                docs.iter()
                    .map(|d| normalize::normalize_statute(d, SourceTag::Central, shape))
                    .collect()
            }
            SearchMode::Partitioned => {
                let docs = self
                    .timed(Collection::StateActs.name(), {
                        let spec = single_source_spec(
                            state_match.clone().unwrap_or(Predicate::All),
                            fields::STATE_PROJECTION,
                            None,
                            skip,
                            limit,
                        );
                        let store = Arc::clone(&self.store);
                        async move { store.find(Collection::StateActs, &spec).await }
                    })
                    .await?;
                docs.iter()
                    .map(|d| normalize::normalize_statute(d, SourceTag::State, shape))
                    .collect()
            }
            SearchMode::Both => {
                let central_branch = UnionBranch {
                    collection: Collection::CentralActs,
                    predicate: central_match.clone().unwrap_or(Predicate::All),
                    projection: to_projection(fields::CENTRAL_PROJECTION),
                    sort_key: None,
                    source_tag: SourceTag::Central,
                };
                let state_branch = UnionBranch {
                    collection: Collection::StateActs,
                    predicate: state_match.clone().unwrap_or(Predicate::All),
                    projection: to_projection(fields::STATE_PROJECTION),
                    sort_key: None,
                    source_tag: SourceTag::State,
                };
                let label = union_label(Collection::CentralActs, Collection::StateActs);
                let docs = self
                    .timed(&label, {
                        let store = Arc::clone(&self.store);
                        async move {
                            store
                                .union_find(
                                    &central_branch,
                                    &state_branch,
                                    SortOrder::Descending,
                                    skip,
                                    limit,
                                )
                                .await
                        }
                    })
                    .await?;
                normalize_union(&docs, shape, normalize::normalize_statute)
            }
        };

        let total = central_total + state_total;
        Ok(ResultPage {
            results,
            total,
            page: params.page,
            page_size: params.page_size,
            has_more: u64::from(params.page) * u64::from(params.page_size) < total,
            national_total: central_total,
            partitioned_total: state_total,
        })
    }

    /// Selectable High Court labels; degrades to the static fallback.
    pub async fn supported_courts(&self) -> Vec<String> {
        labels::list_high_courts(self.store.as_ref()).await
    }

    /// Selectable state labels; degrades to the static fallback.
    pub async fn supported_states(&self) -> Vec<String> {
        labels::list_states(self.store.as_ref()).await
    }

    /// Highlight pass over an already-fetched batch; no store access.
    pub fn refine(
        &self,
        docs: &[Document],
        keywords: &[String],
        options: &HighlightOptions,
    ) -> Vec<HighlightDigest> {
        highlight::refine_batch(docs, keywords, options)
    }

    fn validate_paging(&self, page: u32, page_size: u32) -> Result<()> {
        if page < 1 {
            return Err(SearchError::InvalidRequest {
                field: "page".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        if page_size < 1 {
            return Err(SearchError::InvalidRequest {
                field: "page_size".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        let max = self.config.search.max_page_size;
        if page_size > max {
            return Err(SearchError::InvalidRequest {
                field: "page_size".to_string(),
                reason: format!("must not exceed {}", max),
            });
        }
        Ok(())
    }

    /// Exact count for a participating source; a source with no predicate
    /// is out of scope and contributes zero.
    async fn count_opt(
        &self,
        collection: Collection,
        predicate: Option<&Predicate>,
    ) -> Result<u64> {
        match predicate {
            Some(p) => {
                let store = Arc::clone(&self.store);
                let p = p.clone();
                self.timed(collection.name(), async move {
                    store.count(collection, &p).await
                })
                .await
            }
            None => Ok(0),
        }
    }

    /// Run one store call under the configured timeout, attributing any
    /// failure to the source it was issued against.
    async fn timed<T, F>(&self, source: &str, fut: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        let timeout_ms = self.config.store.query_timeout_ms;
        match tokio::time::timeout(Duration::from_millis(timeout_ms), fut).await {
            Ok(result) => result.map_err(|e| e.for_source(source)),
            Err(_) => Err(SearchError::SourceTimeout {
                src: source.to_string(),
                timeout_ms,
            }),
        }
    }
}

/// Sort-key candidates for Supreme Court records, in coalescing order.
pub fn sc_sort_key() -> SortKeyExpr {
    SortKeyExpr::coalesce(&[
        ("judgment_dates", DateFormat::Iso),
        ("judgment_dates", DateFormat::DayFirst),
        ("date_of_judgment", DateFormat::Iso),
        ("date_of_judgment", DateFormat::DayFirst),
        ("doc_date", DateFormat::Iso),
        ("doc_date", DateFormat::DayFirst),
    ])
}

/// Sort-key candidates for High Court records.
pub fn hc_sort_key() -> SortKeyExpr {
    SortKeyExpr::coalesce(&[
        ("decision date", DateFormat::Iso),
        ("decision date", DateFormat::DayFirst),
        ("Decision Date", DateFormat::Iso),
        ("Decision Date", DateFormat::DayFirst),
    ])
}

fn to_projection(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

fn single_source_spec(
    predicate: Predicate,
    projection: &[&str],
    sort_key: Option<SortKeyExpr>,
    skip: u64,
    limit: u64,
) -> FindSpec {
    FindSpec {
        predicate,
        projection: to_projection(projection),
        sort_key,
        order: SortOrder::Descending,
        skip,
        limit,
    }
}

fn union_label(a: Collection, b: Collection) -> String {
    format!("{}+{}", a.name(), b.name())
}

/// Normalize a union page: each record's branch tag selects the mapping.
fn normalize_union(
    docs: &[Document],
    shape: OutputShape,
    normalize_one: fn(&Document, SourceTag, OutputShape) -> Document,
) -> Vec<Document> {
    docs.iter()
        .map(|d| {
            let tag = d
                .get("source")
                .and_then(|v| v.as_str())
                .and_then(SourceTag::parse)
                .unwrap_or(SourceTag::Sc);
            normalize_one(d, tag, shape)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;
    use async_trait::async_trait;
    use serde_json::json;

    fn engine_with(store: MemoryStore) -> SearchEngine {
        SearchEngine::new(Arc::new(store), Arc::new(Config::default()))
    }

    fn seeded_store() -> MemoryStore {
        let mut store = MemoryStore::new();
        store.insert_many(
            Collection::ScCases,
            vec![
                json!({
                    "file_name": "State v. Ramesh",
                    "bench": "A. Kumar",
                    "content": "land acquisition dispute",
                    "judgment_dates": ["2021-06-15"],
                }),
                json!({
                    "file_name": "Union of India v. Sharma",
                    "judgement_by": "B. Rao",
                    "content": "service matter",
                    "date_of_judgment": "15-06-2017",
                }),
            ],
        );
        store.insert_many(
            Collection::HcCases,
            vec![
                json!({
                    "Court Name": "Bombay High Court",
                    "Title": "Patil v. State of Maharashtra",
                    "Judge": "M S Sonak, J.",
                    "Decision Date": "2019-02-10",
                    "Text": "bail application in land acquisition case",
                }),
                json!({
                    "Court name": "High Court of Gujarat",
                    "title": "Desai vs. Mehta",
                    "judge": "HON'BLE SHRI JUSTICE VALMIKI MENEZES",
                    "decision date": "10-02-2023",
                    "text": "property partition suit",
                }),
            ],
        );
        store.insert_many(
            Collection::CentralActs,
            vec![json!({
                "Name of statute": "Indian Penal Code",
                "Section Number": "378",
                "Section Title": "Theft",
                "Section Text": "Whoever intends to take dishonestly...",
            })],
        );
        store.insert_many(
            Collection::StateActs,
            vec![json!({
                "State Name": "Rajasthan_3",
                "Name of Statute": "Rajasthan Tenancy Act",
                "Section Number": "5",
                "Section Title": "Rights of tenants",
                "Section Text": "A tenant shall...",
            })],
        );
        store
    }

    #[tokio::test]
    async fn test_empty_selection_defaults_to_supreme_court() {
        let engine = engine_with(seeded_store());
        let page = engine
            .judgements_search(&JudgementsQuery::default())
            .await
            .unwrap();

        assert_eq!(page.total, 2);
        assert_eq!(page.national_total, 2);
        assert_eq!(page.partitioned_total, 0);
        // raw SC shape, no High Court keys
        assert!(page.results[0].contains_key("file_name"));
        assert!(!page.results[0].contains_key("judge"));
        assert_eq!(page.results[0]["source"], "SC");
    }

    #[tokio::test]
    async fn test_has_more_tracks_total_and_paging() {
        let engine = engine_with(seeded_store());
        let params = JudgementsQuery {
            courts: vec!["Supreme Court".to_string(), "Bombay High Court".to_string()],
            page_size: 1,
            ..Default::default()
        };

        let page = engine.judgements_search(&params).await.unwrap();
        assert_eq!(page.total, 3);
        assert!(page.has_more);

        let last = engine
            .judgements_search(&JudgementsQuery {
                page: 3,
                ..params.clone()
            })
            .await
            .unwrap();
        assert!(!last.has_more);
        assert_eq!(u64::from(last.page) * u64::from(last.page_size), last.total);
    }

    #[tokio::test]
    async fn test_both_mode_pages_are_contiguous_slices_of_global_order() {
        let engine = engine_with(seeded_store());
        let all_courts = vec![
            "Supreme Court".to_string(),
            "Bombay High Court".to_string(),
            "High Court of Gujarat".to_string(),
        ];

        let full = engine
            .judgements_search(&JudgementsQuery {
                courts: all_courts.clone(),
                page_size: 10,
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(full.total, 4);
        assert_eq!(full.results.len(), 4);

        // date desc across sources: 2023 HC, 2021 SC, 2019 HC, 2017 SC
        let sources: Vec<&str> = full
            .results
            .iter()
            .map(|d| d["source"].as_str().unwrap())
            .collect();
        assert_eq!(sources, vec!["HC", "SC", "HC", "SC"]);

        // concatenating single-result pages reproduces the full ordering
        let mut paged = Vec::new();
        for page_no in 1..=4 {
            let page = engine
                .judgements_search(&JudgementsQuery {
                    courts: all_courts.clone(),
                    page: page_no,
                    page_size: 1,
                    ..Default::default()
                })
                .await
                .unwrap();
            assert_eq!(page.results.len(), 1);
            paged.extend(page.results);
        }
        assert_eq!(paged, full.results);
    }

    #[tokio::test]
    async fn test_merged_shape_only_when_both_categories_selected() {
        let engine = engine_with(seeded_store());
        let merged = engine
            .judgements_search(&JudgementsQuery {
                courts: vec!["Supreme Court".to_string(), "Bombay High Court".to_string()],
                ..Default::default()
            })
            .await
            .unwrap();
        for doc in &merged.results {
            assert!(doc.contains_key("file_name"));
            assert!(doc.contains_key("judge"));
        }

        let raw = engine
            .judgements_search(&JudgementsQuery {
                courts: vec!["Bombay High Court".to_string()],
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(raw.total, 1);
        assert!(!raw.results[0].contains_key("file_name"));
        assert_eq!(raw.results[0]["Court name"], "Bombay High Court");
    }

    #[tokio::test]
    async fn test_judge_and_title_filters_are_tolerant() {
        let engine = engine_with(seeded_store());

        let by_judge = engine
            .judgements_search(&JudgementsQuery {
                courts: vec!["Bombay High Court".to_string()],
                judge_name: Some("HON'BLE SHRI JUSTICE M. S. SONAK".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(by_judge.total, 1);

        let by_title = engine
            .judgements_search(&JudgementsQuery {
                courts: vec!["Supreme Court".to_string()],
                case_title: Some("State vs. Ramesh".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(by_title.total, 1);
    }

    #[tokio::test]
    async fn test_single_day_date_range_matches_any_stored_format() {
        let engine = engine_with(seeded_store());
        let day = NaiveDate::from_ymd_opt(2017, 6, 15);

        let page = engine
            .judgements_search(&JudgementsQuery {
                start_date: day,
                end_date: day,
                ..Default::default()
            })
            .await
            .unwrap();
        // "15-06-2017" in date_of_judgment matches; the 2021 record does not
        assert_eq!(page.total, 1);

        let off_by_one = engine
            .judgements_search(&JudgementsQuery {
                start_date: NaiveDate::from_ymd_opt(2017, 6, 16),
                end_date: NaiveDate::from_ymd_opt(2017, 6, 16),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(off_by_one.total, 0);
    }

    #[tokio::test]
    async fn test_statutes_default_to_central_and_merge_with_states() {
        let engine = engine_with(seeded_store());

        let default_page = engine
            .statutes_search(&StatutesQuery::default())
            .await
            .unwrap();
        assert_eq!(default_page.total, 1);
        assert_eq!(default_page.results[0]["source"], "CENTRAL");
        assert!(!default_page.results[0].contains_key("state name"));

        let merged = engine
            .statutes_search(&StatutesQuery {
                statutes: vec!["Central Acts".to_string(), "Rajasthan".to_string()],
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(merged.total, 2);
        for doc in &merged.results {
            assert!(doc.contains_key("state name"));
        }
    }

    #[tokio::test]
    async fn test_section_title_restriction_replaces_text_condition() {
        let engine = engine_with(seeded_store());
        let page = engine
            .statutes_search(&StatutesQuery {
                // the query would match Section Text, but the section title
                // restriction must take precedence
                query: "dishonestly".to_string(),
                section_title: Some("Rights of tenants".to_string()),
                statutes: vec!["Central Acts".to_string(), "Rajasthan".to_string()],
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.results[0]["source"], "STATE");
    }

    #[tokio::test]
    async fn test_invalid_paging_is_rejected() {
        let engine = engine_with(seeded_store());
        let err = engine
            .judgements_search(&JudgementsQuery {
                page: 0,
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(err.is_client_error());

        let err = engine
            .judgements_search(&JudgementsQuery {
                page_size: 0,
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(err.is_client_error());
    }

    /// Store double whose every call fails.
    struct BrokenStore;

    #[async_trait]
    impl DocumentStore for BrokenStore {
        async fn count(&self, _: Collection, _: &Predicate) -> Result<u64> {
            Err(SearchError::Store {
                details: "connection reset".to_string(),
            })
        }
        async fn find(&self, _: Collection, _: &FindSpec) -> Result<Vec<Document>> {
            Err(SearchError::Store {
                details: "connection reset".to_string(),
            })
        }
        async fn union_find(
            &self,
            _: &UnionBranch,
            _: &UnionBranch,
            _: SortOrder,
            _: u64,
            _: u64,
        ) -> Result<Vec<Document>> {
            Err(SearchError::Store {
                details: "connection reset".to_string(),
            })
        }
        async fn distinct(&self, _: Collection, _: &str) -> Result<Vec<String>> {
            Err(SearchError::Store {
                details: "connection reset".to_string(),
            })
        }
    }

    #[tokio::test]
    async fn test_store_failure_is_fatal_and_names_the_source() {
        let engine = SearchEngine::new(Arc::new(BrokenStore), Arc::new(Config::default()));
        let err = engine
            .judgements_search(&JudgementsQuery::default())
            .await
            .unwrap_err();
        match err {
            SearchError::SourceQuery { src, .. } => assert_eq!(src, "sc_cases"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_listing_degrades_instead_of_failing() {
        let engine = SearchEngine::new(Arc::new(BrokenStore), Arc::new(Config::default()));
        let courts = engine.supported_courts().await;
        assert_eq!(courts.len(), labels::FALLBACK_HIGH_COURTS.len());
        let states = engine.supported_states().await;
        assert!(states.contains(&"Rajasthan".to_string()));
    }
}
