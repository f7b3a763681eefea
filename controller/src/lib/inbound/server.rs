use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
};
use log::debug;
use railyard_shared::{OperationResult, ProjectId, Service, ServiceId};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use ts_rs::TS;

use crate::domain::lifecycle::models::error::LifecycleError;
use crate::domain::lifecycle::ports::LifecycleService;

#[derive(Clone)]
pub struct AppState<LS: LifecycleService> {
    pub lifecycle_service: Arc<LS>,
    pub default_project: Option<ProjectId>,
}

#[derive(Serialize, Deserialize, Debug, TS)]
#[ts(export)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
        }
    }
}

type ApiResult<T> = Result<Json<ApiResponse<T>>, (StatusCode, Json<ApiResponse<T>>)>;

fn bad_gateway<T>(e: LifecycleError) -> (StatusCode, Json<ApiResponse<T>>) {
    (StatusCode::BAD_GATEWAY, Json(ApiResponse::failure(e.to_string())))
}

// Web handlers
async fn health() -> &'static str {
    "OK"
}

async fn list_services<LS: LifecycleService>(
    state: &AppState<LS>,
    project_id: &ProjectId,
) -> ApiResult<Vec<Service>> {
    // the lifecycle client has already logged a failure
    state
        .lifecycle_service
        .list_services(project_id)
        .await
        .map(|services| Json(ApiResponse::success(services)))
        .map_err(bad_gateway)
}

async fn get_default_project_services<LS: LifecycleService>(
    State(state): State<AppState<LS>>,
) -> ApiResult<Vec<Service>> {
    let Some(project_id) = state.default_project.clone() else {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::failure("no default project configured")),
        ));
    };
    list_services(&state, &project_id).await
}

async fn get_project_services<LS: LifecycleService>(
    State(state): State<AppState<LS>>,
    Path(project_id): Path<ProjectId>,
) -> ApiResult<Vec<Service>> {
    debug!("list services of project {project_id}");
    list_services(&state, &project_id).await
}

async fn get_service<LS: LifecycleService>(
    State(state): State<AppState<LS>>,
    Path(service_id): Path<ServiceId>,
) -> ApiResult<Service> {
    debug!("get service {service_id}");
    match state.lifecycle_service.get_service(&service_id).await {
        Ok(Some(service)) => Ok(Json(ApiResponse::success(service))),
        Ok(None) => Err((
            StatusCode::NOT_FOUND,
            Json(ApiResponse::failure(format!("service {service_id} not found"))),
        )),
        Err(e) => Err(bad_gateway(e)),
    }
}

async fn start_service<LS: LifecycleService>(
    State(state): State<AppState<LS>>,
    Path(service_id): Path<ServiceId>,
) -> ApiResult<OperationResult> {
    match state.lifecycle_service.start_service(&service_id).await {
        Ok(result) => Ok(Json(ApiResponse::success(result))),
        Err(e) => Err(bad_gateway(e)),
    }
}

async fn stop_service<LS: LifecycleService>(
    State(state): State<AppState<LS>>,
    Path(service_id): Path<ServiceId>,
) -> ApiResult<OperationResult> {
    match state.lifecycle_service.stop_service(&service_id).await {
        Ok(result) => Ok(Json(ApiResponse::success(result))),
        Err(e) => Err(bad_gateway(e)),
    }
}

pub fn create_app<LS: LifecycleService>(state: AppState<LS>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/services", get(get_default_project_services))
        .route("/projects/{project_id}/services", get(get_project_services))
        .route("/services/{service_id}", get(get_service))
        .route("/services/{service_id}/start", post(start_service))
        .route("/services/{service_id}/stop", post(stop_service))
        .with_state(state)
}
