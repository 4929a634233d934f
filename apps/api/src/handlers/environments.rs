use axum::Json;
use validash_domain::Environment;

use crate::dto::EnvironmentResponse;

pub async fn list_environments_handler() -> Json<Vec<EnvironmentResponse>> {
    Json(
        Environment::all()
            .iter()
            .copied()
            .map(EnvironmentResponse::from)
            .collect(),
    )
}
