//! The HTTP API.
//!
//! - `GET /api/sheets[?type=expenses|debts|summary]` reads a view.
//! - `POST /api/sheets` appends an expense or a debt.
//! - `GET /health` answers `OK`.

use crate::ledger::{Ledger, ReadQuery, ReadResponse, WriteAck, WriteRequest};
use crate::model::FieldError;
use crate::Error;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error};

/// Builds the router for the API, sharing `ledger` between requests.
pub fn router(ledger: Arc<Ledger>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/sheets", get(read_sheets).post(write_sheets))
        .with_state(ledger)
}

pub async fn health_check() -> &'static str {
    "OK"
}

async fn read_sheets(
    State(ledger): State<Arc<Ledger>>,
    Query(query): Query<ReadQuery>,
) -> Json<ReadResponse> {
    let kind = query.list_kind();
    debug!("GET /api/sheets {kind}");
    Json(ledger.read(kind, chrono::Local::now()).await)
}

async fn write_sheets(
    State(ledger): State<Arc<Ledger>>,
    body: Result<Json<WriteRequest>, JsonRejection>,
) -> Result<Json<WriteAck>, Error> {
    let Json(request) = body.map_err(|e| Error::Request(e.body_text()))?;
    Ok(Json(ledger.append(&request).await?))
}

/// The body of every error response.
#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<&'a [FieldError]>,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match &self {
            Error::Validation(errors) => ErrorBody {
                message: "Validation error".to_string(),
                errors: Some(errors.errors()),
            },
            // The upstream body stays in the log.
            Error::Remote { status, body } => {
                error!("Google Sheets API error: {status} {body}");
                ErrorBody {
                    message: format!("Google Sheets API error: {status}"),
                    errors: None,
                }
            }
            other => ErrorBody {
                message: other.to_string(),
                errors: None,
            },
        };
        (status, Json(body)).into_response()
    }
}
