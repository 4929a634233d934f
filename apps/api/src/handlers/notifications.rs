use axum::Json;
use axum::extract::{Path, State};
use validash_application::NotificationId;

use crate::dto::{NotificationClickResponse, NotificationResponse};
use crate::state::AppState;

pub async fn list_notifications_handler(
    State(state): State<AppState>,
) -> Json<Vec<NotificationResponse>> {
    Json(
        state
            .notification_service
            .visible()
            .into_iter()
            .map(NotificationResponse::from)
            .collect(),
    )
}

/// Dismisses a finished notification early; processing ones stay put.
pub async fn click_notification_handler(
    State(state): State<AppState>,
    Path(notification_id): Path<u64>,
) -> Json<NotificationClickResponse> {
    let dismissed = state
        .notification_service
        .click(NotificationId::from_u64(notification_id));

    Json(NotificationClickResponse { dismissed })
}
