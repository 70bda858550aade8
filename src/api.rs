//! Table listing and query handlers.
//!
//! [`query_handler`] answers `POST /tables/{name}/query`: the body is a
//! [`QueryContext`] (an empty body means no constraints), the rows come
//! back as JSON. Every query gets a `query_id`, taken from the caller's
//! `x-query-id` header or generated, and echoed back.

use std::sync::atomic::Ordering;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::error::OpsQueryError;
use crate::query::{QueryContext, Row};
use crate::server::AppState;
use crate::tables::TableDefinition;

pub const QUERY_ID_HEADER: &str = "x-query-id";

#[derive(Serialize)]
pub struct QueryResponse {
    pub table: String,
    pub query_id: String,
    pub rows: Vec<Row>,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// HTTP status for a failed query.
#[must_use]
pub const fn status_for(err: &OpsQueryError) -> StatusCode {
    match err {
        OpsQueryError::MissingAddressConstraint => StatusCode::BAD_REQUEST,
        OpsQueryError::UnknownTable(_) => StatusCode::NOT_FOUND,
        OpsQueryError::FetchFailure { .. } | OpsQueryError::ConsulDecode { .. } => {
            StatusCode::BAD_GATEWAY
        }
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_response(status: StatusCode, message: String, query_id: &str) -> Response {
    let mut response = (status, Json(ErrorBody { error: message })).into_response();
    attach_query_id(&mut response, query_id);
    response
}

fn attach_query_id(response: &mut Response, query_id: &str) {
    if let Ok(value) = HeaderValue::from_str(query_id) {
        response.headers_mut().insert(QUERY_ID_HEADER, value);
    }
}

pub async fn list_tables_handler(State(state): State<Arc<AppState>>) -> Json<Vec<TableDefinition>> {
    Json(state.tables.definitions().to_vec())
}

pub async fn query_handler(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let query_id = headers
        .get(QUERY_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map_or_else(|| uuid::Uuid::new_v4().to_string(), String::from);

    state.stats.queries.fetch_add(1, Ordering::Relaxed);

    let ctx = if body.is_empty() {
        QueryContext::default()
    } else {
        match serde_json::from_slice::<QueryContext>(&body) {
            Ok(ctx) => ctx,
            Err(e) => {
                tracing::warn!(query_id = %query_id, table = %name, error = %e, "invalid query context");
                state.stats.failed.fetch_add(1, Ordering::Relaxed);
                return error_response(
                    StatusCode::BAD_REQUEST,
                    format!("invalid query context: {e}"),
                    &query_id,
                );
            }
        }
    };

    tracing::info!(query_id = %query_id, table = %name, "query received");

    match state.tables.generate(&name, &ctx).await {
        Ok(rows) => {
            tracing::info!(query_id = %query_id, table = %name, rows = rows.len(), "query answered");
            let mut response = Json(QueryResponse {
                table: name,
                query_id: query_id.clone(),
                rows,
            })
            .into_response();
            attach_query_id(&mut response, &query_id);
            response
        }
        Err(e) => {
            let status = status_for(&e);
            if status.is_server_error() {
                tracing::error!(query_id = %query_id, table = %name, error = %e, "query failed");
            } else {
                tracing::warn!(query_id = %query_id, table = %name, error = %e, "query rejected");
            }
            state.stats.failed.fetch_add(1, Ordering::Relaxed);
            error_response(status, e.to_string(), &query_id)
        }
    }
}
