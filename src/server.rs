// src/server.rs
//! JSON HTTP surface over the importer.
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`  | `/api` | Status and version |
//! | `GET`  | `/api/notion/import?url=..&format=..&cache=..&children=..` | Import a page |
//! | `GET`  | `/api/notion/cached/{document_id}` | Read a cached record |
//!
//! The import and cached routes are also mounted at the root, as `/import`
//! and `/cached/{document_id}`, for clients that do not use the `/api/notion`
//! prefix.
//!
//! Successful responses are `{"success": true, "data": ...}`; failures are
//! `{"success": false, "error": "<message>"}` with a 400, 403, 404 or 500
//! status. All origins, methods and headers are allowed.

use crate::error::AppError;
use crate::importer::{DocumentImporter, ImportOptions};
use crate::model::OutputFormat;
use crate::types::ValidationError;
use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

/// Shared state handed to every route handler.
#[derive(Clone)]
pub struct AppState {
    pub importer: Arc<DocumentImporter>,
}

/// Builds the router with all routes and the CORS layer.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let notion = Router::new()
        .route("/import", get(handle_import))
        .route("/cached/{document_id}", get(handle_cached));

    Router::new()
        .route("/api", get(handle_status))
        .nest("/api/notion", notion.clone())
        .merge(notion)
        .layer(cors)
        .with_state(state)
}

/// Binds `bind_addr` and serves until the process is stopped.
pub async fn serve(importer: Arc<DocumentImporter>, bind_addr: &str) -> anyhow::Result<()> {
    let app = router(AppState { importer });
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    log::info!("Notion importer listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}

// ============ Responses ============

#[derive(Serialize)]
struct Success<T: Serialize> {
    success: bool,
    data: T,
}

fn success<T: Serialize>(data: T) -> Json<Success<T>> {
    Json(Success {
        success: true,
        data,
    })
}

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    error: String,
}

/// An error on its way out as an HTTP response.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        let status = if err.is_invalid_reference() {
            StatusCode::BAD_REQUEST
        } else if err.is_access_denied() {
            StatusCode::FORBIDDEN
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        if status.is_server_error() {
            log::error!("Import failed: {}", err);
        } else {
            log::warn!("Import rejected: {}", err);
        }
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self::bad_request(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            success: false,
            error: self.message,
        };
        (self.status, Json(body)).into_response()
    }
}

// ============ Handlers ============

#[derive(Serialize)]
struct Status {
    message: &'static str,
    status: &'static str,
    version: &'static str,
}

async fn handle_status() -> Json<Status> {
    Json(Status {
        message: "Notion importer API",
        status: "online",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Raw query parameters; validated by [`ImportQuery::options`].
#[derive(Debug, Default, Deserialize)]
struct ImportQuery {
    url: Option<String>,
    format: Option<String>,
    cache: Option<String>,
    children: Option<String>,
}

impl ImportQuery {
    fn options(&self) -> Result<ImportOptions, ValidationError> {
        let format = match self.format.as_deref() {
            Some(format) => format.parse()?,
            None => OutputFormat::default(),
        };
        Ok(ImportOptions {
            format,
            use_cache: parse_flag("cache", self.cache.as_deref(), true)?,
            include_children: parse_flag("children", self.children.as_deref(), true)?,
        })
    }
}

fn parse_flag(
    name: &'static str,
    value: Option<&str>,
    default: bool,
) -> Result<bool, ValidationError> {
    match value.map(str::trim) {
        None | Some("") => Ok(default),
        Some(v) if v.eq_ignore_ascii_case("true") || v == "1" => Ok(true),
        Some(v) if v.eq_ignore_ascii_case("false") || v == "0" => Ok(false),
        Some(v) => Err(ValidationError::InvalidFlag {
            name,
            value: v.to_string(),
        }),
    }
}

async fn handle_import(
    State(state): State<AppState>,
    query: Result<Query<ImportQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(query) = query.map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;
    let url = query
        .url
        .as_deref()
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .ok_or_else(|| ApiError::bad_request("Missing required query parameter: url"))?;
    let options = query.options()?;

    let record = state.importer.import(url, options).await?;
    Ok(success(record).into_response())
}

async fn handle_cached(
    State(state): State<AppState>,
    Path(document_id): Path<String>,
) -> Result<Response, ApiError> {
    let not_cached = || ApiError::not_found(format!("No cached document for {}", document_id));

    match state.importer.cached(&document_id).await {
        Ok(Some(record)) => Ok(success(record).into_response()),
        Ok(None) => Err(not_cached()),
        Err(e) if e.is_invalid_reference() => Err(not_cached()),
        Err(e) => Err(e.into()),
    }
}
