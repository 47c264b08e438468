use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::disputes::{DisputeList, FileDisputeRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    models::Dispute,
    response::ApiResponse,
    routes::params::DisputeListQuery,
    services::dispute_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_disputes).post(file_dispute))
        .route("/{id}", get(get_dispute))
}

#[utoipa::path(
    get,
    path = "/api/disputes",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("decided" = Option<bool>, Query, description = "true = only decided, false = only pending")
    ),
    responses(
        (status = 200, description = "Disputes on the caller's orders", body = ApiResponse<DisputeList>)
    ),
    security(("bearer_auth" = [])),
    tag = "Disputes"
)]
pub async fn list_disputes(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<DisputeListQuery>,
) -> AppResult<Json<ApiResponse<DisputeList>>> {
    let resp = dispute_service::list_disputes(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/disputes",
    request_body = FileDisputeRequest,
    responses(
        (status = 200, description = "Dispute filed", body = ApiResponse<Dispute>),
        (status = 404, description = "Order not found"),
        (status = 409, description = "Order already has a dispute"),
    ),
    security(("bearer_auth" = [])),
    tag = "Disputes"
)]
pub async fn file_dispute(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<FileDisputeRequest>,
) -> AppResult<Json<ApiResponse<Dispute>>> {
    let resp = dispute_service::file_dispute(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/disputes/{id}",
    params(
        ("id" = Uuid, Path, description = "Dispute ID")
    ),
    responses(
        (status = 200, description = "Get a dispute on one of the caller's orders", body = ApiResponse<Dispute>),
        (status = 404, description = "Dispute not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Disputes"
)]
pub async fn get_dispute(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Dispute>>> {
    let resp = dispute_service::get_dispute(&state, &user, id).await?;
    Ok(Json(resp))
}
