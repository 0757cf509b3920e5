//! # API Server Module
//!
//! ## Purpose
//! REST API server mapping the three public routes onto the index's query
//! operations and serializing results as JSON.
//!
//! ## Input/Output Specification
//! - **Input**: HTTP requests with a zip code, or a city prefix plus an
//!   optional state and result cap
//! - **Output**: JSON arrays of records, city groups, or state keys
//! - **Endpoints**: `/v1/zip/{code}`, `/v1/states`, `/v1/search`, `/health`
//!
//! ## Key Features
//! - Parameter validation at the boundary (the index itself never fails)
//! - CORS support for web frontends behind a config flag
//! - Lock-free request handling: every handler only reads the shared
//!   immutable index

use crate::errors::{Result, SearchError};
use crate::index::IndexStats;
use crate::ingestion::IngestStats;
use crate::AppState;
use actix_cors::Cors;
use actix_web::{web, App, HttpResponse, HttpServer, Result as ActixResult};
use serde::{Deserialize, Serialize};

/// HTTP front end over the shared application state.
pub struct ApiServer {
    app_state: AppState,
}

/// Query parameters for `/v1/search`
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    /// City name prefix (required)
    pub name: Option<String>,
    /// State scope (optional, any case)
    pub state: Option<String>,
    /// Result cap (optional, defaults from config)
    pub max: Option<usize>,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub index: IndexStats,
    pub ingest: IngestStats,
}

impl ApiServer {
    /// Create a new API server over already-built application state.
    pub fn new(app_state: AppState) -> Self {
        Self { app_state }
    }

    /// Run the API server until the process is shut down.
    pub async fn run(self) -> Result<()> {
        let server_config = &self.app_state.config.server;
        let bind_addr = format!("{}:{}", server_config.host, server_config.port);
        let workers = server_config.workers;
        let enable_cors = server_config.enable_cors;

        tracing::info!("Starting API server on {}", bind_addr);

        let app_state = self.app_state.clone();
        let server = HttpServer::new(move || {
            let cors = if enable_cors {
                Cors::permissive()
            } else {
                Cors::default()
            };
            App::new()
                .app_data(web::Data::new(app_state.clone()))
                .wrap(cors)
                .configure(routes)
        })
        .workers(workers)
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

/// Route table, shared between the server and handler tests.
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/v1/zip/{code}", web::get().to(zip_handler))
        .route("/v1/states", web::get().to(states_handler))
        .route("/v1/search", web::get().to(search_handler))
        .route("/health", web::get().to(health_handler));
}

/// Exact zip code lookup. Unknown codes are an empty array, not a 404.
async fn zip_handler(
    app_state: web::Data<AppState>,
    path: web::Path<String>,
) -> ActixResult<HttpResponse> {
    let code = path.into_inner();
    Ok(HttpResponse::Ok().json(app_state.index.lookup_by_code(&code)))
}

/// All known states in presentation form.
async fn states_handler(app_state: web::Data<AppState>) -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(app_state.index.list_regions()))
}

/// City prefix search. Validation of the parameters happens here — the
/// index treats every well-typed query as total.
async fn search_handler(
    app_state: web::Data<AppState>,
    params: web::Query<SearchParams>,
) -> ActixResult<HttpResponse> {
    let Some(name) = params.name.as_deref() else {
        return Ok(bad_request("missing required parameter 'name'"));
    };

    let search_config = &app_state.config.search;
    let max = params.max.unwrap_or(search_config.default_max_results);
    if max == 0 {
        return Ok(bad_request("'max' must be positive"));
    }
    let max = max.min(search_config.max_results_limit);

    let matches = app_state
        .index
        .search_by_city_prefix(name, params.state.as_deref(), max);

    Ok(HttpResponse::Ok().json(matches))
}

/// Liveness plus index and build statistics.
async fn health_handler(app_state: web::Data<AppState>) -> ActixResult<HttpResponse> {
    let response = HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        index: app_state.index.stats(),
        ingest: (*app_state.ingest).clone(),
    };
    Ok(HttpResponse::Ok().json(response))
}

fn bad_request(message: &str) -> HttpResponse {
    HttpResponse::BadRequest().json(serde_json::json!({ "error": message }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::index::ZipIndex;
    use crate::ZipRecord;
    use actix_web::http::StatusCode;
    use actix_web::test;
    use chrono::Utc;
    use std::sync::Arc;

    fn sample_state() -> AppState {
        let mut index = ZipIndex::new();
        for (zip, city, state) in [
            ("07405", "Butler", "NJ"),
            ("12345", "Butler", "PA"),
            ("33333", "Buchanan", "GA"),
            ("33334", "Buchanan", "GA"),
        ] {
            index.insert(ZipRecord {
                zip: zip.to_string(),
                city: city.to_string(),
                state: state.to_string(),
            });
        }

        let stats = IngestStats {
            records: 4,
            distinct_zips: 4,
            states: 3,
            started_at: Utc::now(),
            finished_at: Utc::now(),
            elapsed_ms: 0,
        };

        AppState {
            config: Arc::new(Config::default()),
            index: Arc::new(index),
            ingest: Arc::new(stats),
        }
    }

    macro_rules! test_app {
        () => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new(sample_state()))
                    .configure(routes),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn test_zip_lookup_route() {
        let app = test_app!();
        let req = test::TestRequest::get().uri("/v1/zip/07405").to_request();
        let body: Vec<ZipRecord> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.len(), 1);
        assert_eq!(body[0].city, "Butler");
        assert_eq!(body[0].state, "NJ");
    }

    #[actix_web::test]
    async fn test_unknown_zip_is_empty_array() {
        let app = test_app!();
        let req = test::TestRequest::get().uri("/v1/zip/00000").to_request();
        let body: Vec<ZipRecord> = test::call_and_read_body_json(&app, req).await;
        assert!(body.is_empty());
    }

    #[actix_web::test]
    async fn test_states_route() {
        let app = test_app!();
        let req = test::TestRequest::get().uri("/v1/states").to_request();
        let body: Vec<String> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body, vec!["GA", "NJ", "PA"]);
    }

    #[actix_web::test]
    async fn test_search_route_scoped() {
        let app = test_app!();
        let req = test::TestRequest::get()
            .uri("/v1/search?name=b&state=pa&max=3")
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        let groups = body.as_array().unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0]["name"], "Butler");
        assert_eq!(groups[0]["records"][0]["zip"], "12345");
    }

    #[actix_web::test]
    async fn test_search_route_unscoped_cap() {
        let app = test_app!();
        let req = test::TestRequest::get()
            .uri("/v1/search?name=b&max=2")
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.as_array().unwrap().len(), 2);
    }

    #[actix_web::test]
    async fn test_search_missing_name_is_bad_request() {
        let app = test_app!();
        let req = test::TestRequest::get().uri("/v1/search?max=5").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_search_zero_max_is_bad_request() {
        let app = test_app!();
        let req = test::TestRequest::get()
            .uri("/v1/search?name=b&max=0")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_search_max_is_clamped_to_limit() {
        let app = test_app!();
        let req = test::TestRequest::get()
            .uri("/v1/search?name=b&max=100000")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn test_health_route() {
        let app = test_app!();
        let req = test::TestRequest::get().uri("/health").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["index"]["records"], 4);
    }
}
