use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post, put},
};
use uuid::Uuid;

use crate::{
    dto::disputes::{ChoiceList, CreateChoiceRequest, DisputeList, RecordDecisionRequest},
    dto::products::{
        CreateCategoryRequest, CreateProductRequest, SetPropertiesRequest, UpdateProductRequest,
    },
    error::AppResult,
    middleware::auth::AuthUser,
    models::{Category, Dispute, DisputeChoice, Product},
    response::ApiResponse,
    routes::params::DisputeListQuery,
    services::admin_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/disputes", get(list_all_disputes))
        .route("/disputes/{id}/decision", post(record_decision))
        .route("/choices", get(list_choices).post(create_choice))
        .route("/categories", post(create_category))
        .route("/products", post(create_product))
        .route("/products/{id}", put(update_product).delete(delete_product))
        .route("/products/{id}/properties", put(set_properties))
}

#[utoipa::path(
    get,
    path = "/api/admin/disputes",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("decided" = Option<bool>, Query, description = "true = only decided, false = only pending")
    ),
    responses(
        (status = 200, description = "All disputes", body = ApiResponse<DisputeList>),
        (status = 403, description = "Not an admin"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_all_disputes(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<DisputeListQuery>,
) -> AppResult<Json<ApiResponse<DisputeList>>> {
    let resp = admin_service::list_all_disputes(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/admin/disputes/{id}/decision",
    params(
        ("id" = Uuid, Path, description = "Dispute ID")
    ),
    request_body = RecordDecisionRequest,
    responses(
        (status = 200, description = "Decision recorded", body = ApiResponse<Dispute>),
        (status = 403, description = "Not an admin"),
        (status = 404, description = "Dispute or choice not found"),
        (status = 409, description = "Dispute already decided"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn record_decision(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<RecordDecisionRequest>,
) -> AppResult<Json<ApiResponse<Dispute>>> {
    let resp = admin_service::record_decision(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/choices",
    responses(
        (status = 200, description = "List dispute decision choices", body = ApiResponse<ChoiceList>),
        (status = 403, description = "Not an admin"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_choices(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<ChoiceList>>> {
    let resp = admin_service::list_choices(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/admin/choices",
    request_body = CreateChoiceRequest,
    responses(
        (status = 200, description = "Choice created", body = ApiResponse<DisputeChoice>),
        (status = 403, description = "Not an admin"),
        (status = 409, description = "Choice already exists"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn create_choice(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateChoiceRequest>,
) -> AppResult<Json<ApiResponse<DisputeChoice>>> {
    let resp = admin_service::create_choice(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/admin/categories",
    request_body = CreateCategoryRequest,
    responses(
        (status = 200, description = "Category created", body = ApiResponse<Category>),
        (status = 403, description = "Not an admin"),
        (status = 409, description = "Name or slug already exists"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn create_category(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateCategoryRequest>,
) -> AppResult<Json<ApiResponse<Category>>> {
    let resp = admin_service::create_category(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/admin/products",
    request_body = CreateProductRequest,
    responses(
        (status = 200, description = "Product created", body = ApiResponse<Product>),
        (status = 403, description = "Not an admin"),
        (status = 404, description = "Category not found"),
        (status = 409, description = "Slug already exists"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn create_product(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateProductRequest>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let resp = admin_service::create_product(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/admin/products/{id}",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    request_body = UpdateProductRequest,
    responses(
        (status = 200, description = "Product updated", body = ApiResponse<Product>),
        (status = 403, description = "Not an admin"),
        (status = 404, description = "Product not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn update_product(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateProductRequest>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let resp = admin_service::update_product(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/admin/products/{id}",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product deleted", body = ApiResponse<serde_json::Value>),
        (status = 403, description = "Not an admin"),
        (status = 404, description = "Product not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn delete_product(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = admin_service::delete_product(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/admin/products/{id}/properties",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    request_body = SetPropertiesRequest,
    responses(
        (status = 200, description = "Property values set", body = ApiResponse<serde_json::Value>),
        (status = 403, description = "Not an admin"),
        (status = 404, description = "Product not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn set_properties(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<SetPropertiesRequest>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = admin_service::set_properties(&state, &user, id, payload).await?;
    Ok(Json(resp))
}
