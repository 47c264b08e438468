use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{delete, get},
};

use crate::{
    dto::cart::{CartView, EditCartRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    response::ApiResponse,
    services::cart_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(cart_view).post(edit_cart))
        .route("/{slug}", delete(remove_from_cart))
}

#[utoipa::path(
    get,
    path = "/api/cart",
    responses(
        (status = 200, description = "Current cart with line totals", body = ApiResponse<CartView>)
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn cart_view(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<CartView>>> {
    let resp = cart_service::view_cart(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/cart",
    request_body = EditCartRequest,
    responses(
        (status = 200, description = "Mutate the cart and return it", body = ApiResponse<CartView>),
        (status = 404, description = "Unknown product slug"),
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn edit_cart(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<EditCartRequest>,
) -> AppResult<Json<ApiResponse<CartView>>> {
    let resp = cart_service::edit_cart(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/cart/{slug}",
    params(
        ("slug" = String, Path, description = "Product slug")
    ),
    responses(
        (status = 200, description = "Line removed (no-op when absent)", body = ApiResponse<serde_json::Value>),
        (status = 404, description = "Unknown product slug"),
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn remove_from_cart(
    State(state): State<AppState>,
    user: AuthUser,
    Path(slug): Path<String>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = cart_service::remove_from_cart(&state, &user, &slug).await?;
    Ok(Json(resp))
}
