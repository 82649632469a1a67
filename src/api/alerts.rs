use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
    api::{ApiError, ApiResult, AppState},
    models::{Alert, TriggerKind},
    services::TriggerEvent,
};

// Request DTOs

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerAlertRequest {
    pub trigger_type: String,
    pub source_type: String,
    pub source_id: String,
    #[serde(default)]
    pub org_unit_id: Option<String>,
    #[serde(default)]
    pub data: Option<Map<String, Value>>,
}

#[derive(Debug, Deserialize)]
pub struct ListAlertsQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    50
}

// Response DTOs

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerAlertResponse {
    pub alert: Alert,
    pub message: String,
    pub recipients_notified: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AlertListResponse {
    pub alerts: Vec<Alert>,
    /// Number of alerts in this page, not the table-wide row count.
    pub count: i64,
}

// API Handlers

/// Trigger an alert from a domain event. The single inbound operation of the
/// alerting core: classifies the event, persists the alert, fans out
/// notifications and records the audit trail.
pub async fn trigger_alert(
    State(state): State<AppState>,
    Json(request): Json<TriggerAlertRequest>,
) -> ApiResult<impl IntoResponse> {
    // The trigger kind is checked against the enumeration at the boundary;
    // unknown strings are a 400, not a catalog fallback.
    let kind = TriggerKind::parse(&request.trigger_type).ok_or_else(|| ApiError::Validation {
        message: "Invalid trigger event".to_string(),
        details: vec![format!("unknown triggerType '{}'", request.trigger_type)],
    })?;

    let outcome = state
        .alert_trigger_service
        .trigger(TriggerEvent {
            kind,
            source_type: request.source_type,
            source_id: request.source_id,
            org_unit_id: request.org_unit_id,
            data: request.data,
        })
        .await?;

    let warning = (outcome.notifications_failed > 0).then(|| {
        format!(
            "{} of {} notification creations failed",
            outcome.notifications_failed,
            outcome.notifications_created + outcome.notifications_failed
        )
    });

    let response = TriggerAlertResponse {
        message: format!("Alert triggered, {} recipients notified", outcome.recipients_notified),
        alert: outcome.alert,
        recipients_notified: outcome.recipients_notified,
        warning,
    };

    Ok((StatusCode::CREATED, Json(response)))
}

/// Get one alert by id (backs the alert detail page).
pub async fn get_alert(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let alert = state
        .db
        .get_alert_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Alert not found".to_string()))?;

    Ok(Json(alert))
}

/// List recent alerts, newest first.
pub async fn list_alerts(
    State(state): State<AppState>,
    Query(query): Query<ListAlertsQuery>,
) -> ApiResult<impl IntoResponse> {
    if query.limit < 1 || query.limit > 100 {
        return Err(ApiError::BadRequest(
            "Limit must be between 1 and 100".to_string(),
        ));
    }

    if query.offset < 0 {
        return Err(ApiError::BadRequest("Offset must be non-negative".to_string()));
    }

    let alerts = state.db.list_alerts(query.limit, query.offset).await?;
    let count = alerts.len() as i64;

    Ok(Json(AlertListResponse { alerts, count }))
}
