//! # API Server Module
//!
//! ## Purpose
//! REST API server exposing the unified search, refine, and label-listing
//! operations for both search verticals. The routing layer owns nothing:
//! every handler delegates to engine components that are callable as plain
//! functions.
//!
//! ## Input/Output Specification
//! - **Input**: HTTP requests with search parameters, refine batches
//! - **Output**: JSON responses with result pages, highlight digests,
//!   selectable labels
//! - **Endpoints**: judgements search/advanced/refine/courts, statutes
//!   search/advanced/refine/states, health
//!
//! ## Key Features
//! - Request validation surfaced as structured 400 responses
//! - Source-query failures surfaced as 502 naming the failing source
//! - CORS support for web frontends

use crate::errors::SearchError;
use crate::highlight::{self, HighlightDigest, HighlightOptions};
use crate::search::{JudgementsQuery, ResultPage, StatutesQuery};
use crate::{AppState, Document};
use actix_cors::Cors;
use actix_web::middleware::Condition;
use actix_web::{web, App, HttpResponse, HttpServer, Result as ActixResult};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// API server over the shared application state.
pub struct ApiServer {
    app_state: AppState,
}

fn default_page() -> u32 {
    1
}

fn default_page_size() -> u32 {
    20
}

fn default_max_snippets() -> usize {
    3
}

fn default_snippet_window() -> usize {
    120
}

/// Judgements search payload. Also used by the advanced route, which runs
/// the same engine behind a separate path for the UI's advanced panel.
#[derive(Debug, Deserialize)]
pub struct JudgementsSearchRequest {
    #[serde(default)]
    pub query: String,
    /// e.g. `["Supreme Court", "Bombay High Court"]`
    #[serde(default)]
    pub courts: Vec<String>,
    pub judge_name: Option<String>,
    pub case_title: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

#[derive(Debug, Serialize)]
pub struct JudgementsSearchResponse {
    pub results: Vec<Document>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
    pub has_more: bool,
    pub sc_total: u64,
    pub hc_total: u64,
}

impl From<ResultPage> for JudgementsSearchResponse {
    fn from(page: ResultPage) -> Self {
        Self {
            results: page.results,
            total: page.total,
            page: page.page,
            page_size: page.page_size,
            has_more: page.has_more,
            sc_total: page.national_total,
            hc_total: page.partitioned_total,
        }
    }
}

/// Statutes search payload; `section_title` only participates on the
/// advanced route.
#[derive(Debug, Deserialize)]
pub struct StatutesSearchRequest {
    #[serde(default)]
    pub query: String,
    /// `["Central Acts"]` and/or state names
    #[serde(default)]
    pub statutes: Vec<String>,
    pub section_title: Option<String>,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

#[derive(Debug, Serialize)]
pub struct StatutesSearchResponse {
    pub results: Vec<Document>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
    pub has_more: bool,
    pub central_total: u64,
    pub state_total: u64,
}

impl From<ResultPage> for StatutesSearchResponse {
    fn from(page: ResultPage) -> Self {
        Self {
            results: page.results,
            total: page.total,
            page: page.page,
            page_size: page.page_size,
            has_more: page.has_more,
            central_total: page.national_total,
            state_total: page.partitioned_total,
        }
    }
}

/// Refine payload: highlight keywords over a page already rendered by the
/// caller. No store access happens on this path.
#[derive(Debug, Deserialize)]
pub struct RefineRequest {
    #[serde(default)]
    pub results: Vec<Document>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default = "default_max_snippets")]
    pub max_snippets_per_doc: usize,
    #[serde(default = "default_snippet_window")]
    pub snippet_window: usize,
}

#[derive(Debug, Serialize)]
pub struct RefineResponse {
    pub docs: Vec<HighlightDigest>,
}

#[derive(Debug, Serialize)]
pub struct CourtsResponse {
    pub supreme: &'static str,
    pub high_courts: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct StatesResponse {
    pub central: &'static str,
    pub states: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

impl ApiServer {
    /// Create new API server
    pub fn new(app_state: AppState) -> Self {
        Self { app_state }
    }

    /// Run the API server until shutdown
    pub async fn run(self) -> crate::errors::Result<()> {
        let config = self.app_state.config.clone();
        let bind_addr = format!("{}:{}", config.server.host, config.server.port);
        let enable_cors = config.server.enable_cors;
        let app_state = self.app_state.clone();

        tracing::info!("Starting API server on {}", bind_addr);

        let server = HttpServer::new(move || {
            App::new()
                .app_data(web::Data::new(app_state.clone()))
                .wrap(Condition::new(enable_cors, Cors::permissive()))
                .route("/judgements/courts", web::get().to(courts_handler))
                .route("/judgements/search", web::post().to(judgements_handler))
                .route("/judgements/advanced", web::post().to(judgements_handler))
                .route("/judgements/refine", web::post().to(refine_handler))
                .route("/statutes/states", web::get().to(states_handler))
                .route("/statutes/search", web::post().to(statutes_basic_handler))
                .route("/statutes/advanced", web::post().to(statutes_advanced_handler))
                .route("/statutes/refine", web::post().to(refine_handler))
                .route("/health", web::get().to(health_handler))
        })
        .workers(config.server.workers)
        .bind(&bind_addr)
        .map_err(|e| SearchError::Internal {
            message: format!("Failed to bind server to {}: {}", bind_addr, e),
        })?
        .run();

        server.await.map_err(|e| SearchError::Internal {
            message: format!("Server error: {}", e),
        })?;

        Ok(())
    }
}

/// Map an engine error to a structured HTTP response.
fn error_response(request_id: Uuid, err: SearchError) -> HttpResponse {
    tracing::error!(%request_id, category = err.category(), "Search error: {}", err);
    let body = serde_json::json!({
        "error": err.category(),
        "message": err.to_string(),
        "request_id": request_id,
    });
    match &err {
        e if e.is_client_error() => HttpResponse::BadRequest().json(body),
        SearchError::SourceQuery { .. } | SearchError::SourceTimeout { .. } => {
            HttpResponse::BadGateway().json(body)
        }
        _ => HttpResponse::InternalServerError().json(body),
    }
}

/// Selectable courts for the judgements UI: the Supreme Court plus the High
/// Courts present in the store (static fallback on store failure).
async fn courts_handler(state: web::Data<AppState>) -> ActixResult<HttpResponse> {
    let response = CourtsResponse {
        supreme: "Supreme Court",
        high_courts: state.engine.supported_courts().await,
    };
    Ok(HttpResponse::Ok().json(response))
}

/// Unified judgements search. Raw shape for a single source category,
/// merged shape when both are selected, Supreme Court by default.
async fn judgements_handler(
    state: web::Data<AppState>,
    request: web::Json<JudgementsSearchRequest>,
) -> ActixResult<HttpResponse> {
    let request_id = Uuid::new_v4();
    let request = request.into_inner();

    let params = JudgementsQuery {
        query: request.query,
        courts: request.courts,
        judge_name: request.judge_name,
        case_title: request.case_title,
        start_date: request.start_date,
        end_date: request.end_date,
        page: request.page,
        page_size: request.page_size,
    };

    match state.engine.judgements_search(&params).await {
        Ok(page) => Ok(HttpResponse::Ok().json(JudgementsSearchResponse::from(page))),
        Err(e) => Ok(error_response(request_id, e)),
    }
}

/// Highlight pass over already-returned results. Shared by both verticals;
/// the documents carry the canonical field names the engine expects.
async fn refine_handler(
    state: web::Data<AppState>,
    request: web::Json<RefineRequest>,
) -> ActixResult<HttpResponse> {
    let request = request.into_inner();
    let defaults = &state.config.highlight;

    let options = HighlightOptions {
        max_snippets: if request.max_snippets_per_doc > 0 {
            request.max_snippets_per_doc
        } else {
            defaults.max_snippets_per_doc
        },
        window: if request.snippet_window > 0 {
            request.snippet_window
        } else {
            defaults.snippet_window
        },
    };

    let docs = highlight::refine_batch(&request.results, &request.keywords, &options);
    Ok(HttpResponse::Ok().json(RefineResponse { docs }))
}

/// Selectable sources for the statutes UI.
async fn states_handler(state: web::Data<AppState>) -> ActixResult<HttpResponse> {
    let response = StatesResponse {
        central: "Central Acts",
        states: state.engine.supported_states().await,
    };
    Ok(HttpResponse::Ok().json(response))
}

/// Basic statutes search; any provided section title is ignored here.
async fn statutes_basic_handler(
    state: web::Data<AppState>,
    request: web::Json<StatutesSearchRequest>,
) -> ActixResult<HttpResponse> {
    statutes_search(state, request.into_inner(), false).await
}

/// Advanced statutes search: restricts matching to section titles when one
/// is provided.
async fn statutes_advanced_handler(
    state: web::Data<AppState>,
    request: web::Json<StatutesSearchRequest>,
) -> ActixResult<HttpResponse> {
    statutes_search(state, request.into_inner(), true).await
}

async fn statutes_search(
    state: web::Data<AppState>,
    request: StatutesSearchRequest,
    use_section_title: bool,
) -> ActixResult<HttpResponse> {
    let request_id = Uuid::new_v4();

    let params = StatutesQuery {
        query: request.query,
        statutes: request.statutes,
        section_title: if use_section_title {
            request.section_title
        } else {
            None
        },
        page: request.page,
        page_size: request.page_size,
    };

    match state.engine.statutes_search(&params).await {
        Ok(page) => Ok(HttpResponse::Ok().json(StatutesSearchResponse::from(page))),
        Err(e) => Ok(error_response(request_id, e)),
    }
}

async fn health_handler() -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    }))
}
