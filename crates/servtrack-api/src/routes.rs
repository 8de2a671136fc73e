use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use servtrack_core::envelope::DataResponse;
use servtrack_core::{
    DatabaseService, NewTimeTracking, TimeTrackingEntity, TimeTrackingId, TimeTrackingPatch,
    TimeTrackingResource,
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;
use crate::error::AppError;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    db: DatabaseService,
}

impl AppState {
    pub const fn new(config: Arc<AppConfig>, db: DatabaseService) -> Self {
        Self { config, db }
    }
}

pub fn app_router(state: AppState) -> Router {
    let allow_origin = state
        .config
        .cors_origins
        .clone()
        .map_or_else(|| AllowOrigin::from(Any), AllowOrigin::list);

    Router::new()
        .route("/healthz", get(healthz))
        .route(
            "/v1/time-tracking",
            get(list_time_tracking).post(create_time_tracking),
        )
        .route(
            "/v1/time-tracking/client/{client_id}",
            get(list_time_tracking_by_client),
        )
        .route(
            "/v1/time-tracking/employee/{employee_id}",
            get(list_time_tracking_by_employee),
        )
        .route(
            "/v1/time-tracking/{id}",
            get(get_time_tracking)
                .patch(update_time_tracking)
                .put(update_time_tracking)
                .delete(delete_time_tracking),
        )
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(allow_origin)
                .allow_headers(Any)
                .allow_methods(Any),
        )
        .with_state(state)
}

type DataJson<T> = Json<DataResponse<T>>;

fn data<T>(data: T) -> DataJson<T> {
    Json(DataResponse { data })
}

fn parse_id(raw: &str) -> Result<TimeTrackingId, AppError> {
    raw.parse()
        .map_err(|_| AppError::bad_request(format!("Invalid time tracking id: {raw}")))
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    timestamp: i64,
}

async fn healthz() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        timestamp: Utc::now().timestamp(),
    })
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListQuery {
    client_id: Option<String>,
    employee_id: Option<String>,
}

async fn list_time_tracking(
    State(state): State<AppState>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<DataJson<Vec<TimeTrackingEntity>>, AppError> {
    let Query(query) = query?;
    let client_id = query.client_id.as_deref().map(str::trim);
    let employee_id = query.employee_id.as_deref().map(str::trim);

    let records = match (client_id, employee_id) {
        (Some(client_id), Some(employee_id)) => {
            let mut records = state.db.list_time_tracking_by_client(client_id).await?;
            records.retain(|record| record.employee_id == employee_id);
            records
        }
        (Some(client_id), None) => state.db.list_time_tracking_by_client(client_id).await?,
        (None, Some(employee_id)) => state.db.list_time_tracking_by_employee(employee_id).await?,
        (None, None) => state.db.list_time_tracking().await?,
    };
    Ok(data(TimeTrackingResource::collection(&records)))
}

async fn list_time_tracking_by_client(
    State(state): State<AppState>,
    Path(client_id): Path<String>,
) -> Result<DataJson<Vec<TimeTrackingEntity>>, AppError> {
    let records = state.db.list_time_tracking_by_client(&client_id).await?;
    Ok(data(TimeTrackingResource::collection(&records)))
}

async fn list_time_tracking_by_employee(
    State(state): State<AppState>,
    Path(employee_id): Path<String>,
) -> Result<DataJson<Vec<TimeTrackingEntity>>, AppError> {
    let records = state.db.list_time_tracking_by_employee(&employee_id).await?;
    Ok(data(TimeTrackingResource::collection(&records)))
}

async fn get_time_tracking(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<DataJson<TimeTrackingEntity>, AppError> {
    let id = parse_id(&id)?;
    let record = state
        .db
        .get_time_tracking(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(id.to_string()))?;
    Ok(data(TimeTrackingResource::new(&record).item()))
}

async fn create_time_tracking(
    State(state): State<AppState>,
    payload: Result<Json<NewTimeTracking>, JsonRejection>,
) -> Result<(StatusCode, DataJson<TimeTrackingEntity>), AppError> {
    let Json(input) = payload?;
    let record = state.db.create_time_tracking(&input).await?;
    tracing::info!(
        id = %record.id,
        employee_id = %record.employee_id,
        client_id = %record.client_id,
        "Created time tracking record"
    );
    Ok((
        StatusCode::CREATED,
        data(TimeTrackingResource::new(&record).item()),
    ))
}

async fn update_time_tracking(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<TimeTrackingPatch>, JsonRejection>,
) -> Result<DataJson<TimeTrackingEntity>, AppError> {
    let id = parse_id(&id)?;
    let Json(patch) = payload?;
    if patch.is_empty() {
        return Err(AppError::bad_request("Update must set at least one field"));
    }
    let record = state.db.update_time_tracking(&id, &patch).await?;
    tracing::info!(
        id = %record.id,
        status = %record.status,
        "Updated time tracking record"
    );
    Ok(data(TimeTrackingResource::new(&record).item()))
}

async fn delete_time_tracking(Path(id): Path<String>) -> AppError {
    tracing::debug!(id = %id, "Rejected time tracking delete");
    AppError::NotImplemented("Deleting time tracking records")
}
