use std::str::FromStr;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use validash_application::LogFilter;
use validash_core::AppError;
use validash_domain::StatusFilter;

use crate::dto::{LogEntryResponse, PayloadTextResponse};
use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct LogListQuery {
    pub search: Option<String>,
    pub status: Option<String>,
}

impl LogListQuery {
    fn to_filter(&self) -> Result<LogFilter, AppError> {
        let status = self
            .status
            .as_deref()
            .filter(|value| !value.is_empty())
            .map(StatusFilter::from_str)
            .transpose()?
            .unwrap_or_default();

        Ok(LogFilter::new(
            self.search.clone().unwrap_or_default(),
            status,
        ))
    }
}

pub async fn list_logs_handler(
    State(state): State<AppState>,
    Query(query): Query<LogListQuery>,
) -> ApiResult<Json<Vec<LogEntryResponse>>> {
    let filter = query.to_filter()?;
    let entries = state
        .log_viewer
        .matching(&filter)
        .into_iter()
        .map(LogEntryResponse::from)
        .collect();

    Ok(Json(entries))
}

pub async fn export_logs_handler(
    State(state): State<AppState>,
    Query(query): Query<LogListQuery>,
) -> ApiResult<Response> {
    let filter = query.to_filter()?;
    let artifact = state.log_viewer.export_matching(&filter)?;
    let disposition = format!("attachment; filename=\"{}\"", artifact.file_name);

    Ok((
        [
            (CONTENT_TYPE, artifact.content_type),
            (CONTENT_DISPOSITION, disposition),
        ],
        artifact.bytes,
    )
        .into_response())
}

pub async fn payload_text_handler(
    State(state): State<AppState>,
    Path(value): Path<String>,
) -> Json<PayloadTextResponse> {
    let payload = state.log_viewer.payload_text(value.as_str());

    Json(PayloadTextResponse { value, payload })
}
