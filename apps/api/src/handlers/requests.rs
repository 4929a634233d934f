use std::str::FromStr;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use validash_application::SimulationRequest;
use validash_core::AppError;
use validash_domain::{Environment, HttpMethod};

use crate::dto::{SubmitRequestRequest, SubmitRequestResponse};
use crate::error::{ApiResult, ErrorResponse, status_for};
use crate::state::AppState;

/// Runs one simulated validation request.
///
/// Expected failures (bad key length, unknown key) are still logged and come
/// back as 4xx with the user-facing message.
pub async fn submit_request_handler(
    State(state): State<AppState>,
    Json(payload): Json<SubmitRequestRequest>,
) -> ApiResult<Response> {
    let method = HttpMethod::from_str(payload.method.as_str())?;
    let environment = payload
        .environment
        .as_deref()
        .map(Environment::from_str)
        .transpose()?
        .unwrap_or_default();

    let report = state
        .request_simulator
        .simulate(
            SimulationRequest {
                key: payload.key,
                method,
                environment,
            },
            &state.shutdown,
        )
        .await?;

    let response = match report.outcome {
        Ok(response) => (
            StatusCode::OK,
            Json(SubmitRequestResponse {
                status: "success".to_owned(),
                request_id: report.request_id.to_string(),
                response,
            }),
        )
            .into_response(),
        Err(failure) => {
            let status = status_for(&AppError::from(failure.clone()));
            (status, Json(ErrorResponse::new(failure.user_message()))).into_response()
        }
    };

    Ok(response)
}
