use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter, Set,
    TransactionTrait,
};
use std::collections::HashMap;
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::cart::{CartAction, CartView, EditCartRequest, parse_quantity},
    entity::{
        cart_contents::{
            ActiveModel as ContentActive, Column as ContentCol, Entity as CartContents,
        },
        carts::{ActiveModel as CartActive, Column as CartCol, Entity as Carts, Model as CartModel},
        categories::{Column as CategoryCol, Entity as Categories},
        products::{Column as ProdCol, Entity as Products, Model as ProductModel},
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::CartLine,
    response::{ApiResponse, Meta},
    services::catalog_service::product_from_entity,
    state::AppState,
};

pub async fn view_cart(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<CartView>> {
    let cart = Carts::find()
        .filter(CartCol::CustomerId.eq(user.user_id))
        .one(&state.orm)
        .await?;
    // No cart yet renders as an empty one; it is only created on first add.
    let cart = match cart {
        Some(c) => c,
        None => {
            return Ok(ApiResponse::success(
                "Cart",
                CartView {
                    lines: Vec::new(),
                    total: 0,
                },
                Some(Meta::empty()),
            ));
        }
    };

    let rows = CartContents::find()
        .filter(ContentCol::CartId.eq(cart.id))
        .find_also_related(Products)
        .all(&state.orm)
        .await?;

    let category_ids: Vec<Uuid> = rows
        .iter()
        .filter_map(|(_, product)| product.as_ref().map(|p| p.category_id))
        .collect();
    let category_names: HashMap<Uuid, String> = Categories::find()
        .filter(CategoryCol::Id.is_in(category_ids))
        .all(&state.orm)
        .await?
        .into_iter()
        .map(|c| (c.id, c.name))
        .collect();

    let mut lines = Vec::new();
    let mut total: i64 = 0;
    for (content, product) in rows {
        let product = match product {
            Some(p) => p,
            None => continue,
        };
        total += product.price * content.quantity as i64;
        let category = category_names
            .get(&product.category_id)
            .cloned()
            .unwrap_or_default();
        lines.push(CartLine {
            product: product_from_entity(product, category),
            quantity: content.quantity,
        });
    }

    Ok(ApiResponse::success(
        "Cart",
        CartView { lines, total },
        Some(Meta::empty()),
    ))
}

/// Form-style dispatcher: `submit` selects the mutation, `quantity` only
/// matters for `update` and falls back to 0 when it does not parse.
pub async fn edit_cart(
    state: &AppState,
    user: &AuthUser,
    payload: EditCartRequest,
) -> AppResult<ApiResponse<CartView>> {
    match payload.submit {
        CartAction::Add => add_item(state, user, &payload.slug).await?,
        CartAction::Update => {
            let quantity = parse_quantity(payload.quantity.as_deref());
            set_quantity(state, user, &payload.slug, quantity).await?;
        }
        CartAction::Remove => remove_item(state, user, &payload.slug).await?,
    }

    if let Err(err) = log_audit(
        state,
        Some(user.user_id),
        "cart_edit",
        Some("cart_contents"),
        Some(serde_json::json!({ "slug": payload.slug, "submit": format!("{:?}", payload.submit) })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    view_cart(state, user).await
}

/// Increment the line for (cart, product) by one, creating the cart and the
/// line as needed. Repeated calls accumulate quantity monotonically.
pub async fn add_item(state: &AppState, user: &AuthUser, slug: &str) -> AppResult<()> {
    let txn = state.orm.begin().await?;

    let product = find_product(&txn, slug).await?;
    let cart = get_or_create_cart(&txn, user.user_id).await?;

    let existing = CartContents::find()
        .filter(ContentCol::CartId.eq(cart.id))
        .filter(ContentCol::ProductId.eq(product.id))
        .one(&txn)
        .await?;

    match existing {
        Some(row) => {
            let quantity = row.quantity + 1;
            let mut active: ContentActive = row.into();
            active.quantity = Set(quantity);
            active.update(&txn).await?;
        }
        None => {
            ContentActive {
                id: Set(Uuid::new_v4()),
                cart_id: Set(cart.id),
                product_id: Set(product.id),
                quantity: Set(1),
            }
            .insert(&txn)
            .await?;
        }
    }

    txn.commit().await?;
    Ok(())
}

/// Set the line quantity outright. Zero deletes the line, and a cart left
/// without lines is deleted in the same transaction.
pub async fn set_quantity(
    state: &AppState,
    user: &AuthUser,
    slug: &str,
    quantity: i32,
) -> AppResult<()> {
    let txn = state.orm.begin().await?;

    let product = find_product(&txn, slug).await?;
    let cart = get_or_create_cart(&txn, user.user_id).await?;

    if quantity <= 0 {
        CartContents::delete_many()
            .filter(ContentCol::CartId.eq(cart.id))
            .filter(ContentCol::ProductId.eq(product.id))
            .exec(&txn)
            .await?;
    } else {
        let existing = CartContents::find()
            .filter(ContentCol::CartId.eq(cart.id))
            .filter(ContentCol::ProductId.eq(product.id))
            .one(&txn)
            .await?;
        match existing {
            Some(row) => {
                let mut active: ContentActive = row.into();
                active.quantity = Set(quantity);
                active.update(&txn).await?;
            }
            None => {
                ContentActive {
                    id: Set(Uuid::new_v4()),
                    cart_id: Set(cart.id),
                    product_id: Set(product.id),
                    quantity: Set(quantity),
                }
                .insert(&txn)
                .await?;
            }
        }
    }

    // Prune any zero-quantity stragglers across the whole cart before the
    // empty-cart check.
    CartContents::delete_many()
        .filter(ContentCol::CartId.eq(cart.id))
        .filter(ContentCol::Quantity.lte(0))
        .exec(&txn)
        .await?;

    drop_cart_if_empty(&txn, cart.id).await?;
    txn.commit().await?;
    Ok(())
}

/// Delete the line for (cart, product). Removing a line that does not exist
/// is a no-op, so the operation is idempotent.
pub async fn remove_item(state: &AppState, user: &AuthUser, slug: &str) -> AppResult<()> {
    let txn = state.orm.begin().await?;

    let product = find_product(&txn, slug).await?;
    let cart = Carts::find()
        .filter(CartCol::CustomerId.eq(user.user_id))
        .one(&txn)
        .await?;

    if let Some(cart) = cart {
        CartContents::delete_many()
            .filter(ContentCol::CartId.eq(cart.id))
            .filter(ContentCol::ProductId.eq(product.id))
            .exec(&txn)
            .await?;
        drop_cart_if_empty(&txn, cart.id).await?;
    }

    txn.commit().await?;
    Ok(())
}

pub async fn remove_from_cart(
    state: &AppState,
    user: &AuthUser,
    slug: &str,
) -> AppResult<ApiResponse<serde_json::Value>> {
    remove_item(state, user, slug).await?;

    if let Err(err) = log_audit(
        state,
        Some(user.user_id),
        "cart_remove",
        Some("cart_contents"),
        Some(serde_json::json!({ "slug": slug })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Removed from cart",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

async fn find_product<C: ConnectionTrait>(conn: &C, slug: &str) -> AppResult<ProductModel> {
    let product = Products::find()
        .filter(ProdCol::Slug.eq(slug))
        .one(conn)
        .await?;
    match product {
        Some(p) => Ok(p),
        None => Err(AppError::NotFound),
    }
}

pub(crate) async fn get_or_create_cart<C: ConnectionTrait>(
    conn: &C,
    customer_id: Uuid,
) -> AppResult<CartModel> {
    let cart = Carts::find()
        .filter(CartCol::CustomerId.eq(customer_id))
        .one(conn)
        .await?;
    let cart = match cart {
        Some(c) => c,
        None => {
            CartActive {
                id: Set(Uuid::new_v4()),
                customer_id: Set(customer_id),
                start_date: Set(Utc::now().into()),
            }
            .insert(conn)
            .await?
        }
    };
    Ok(cart)
}

/// Invariant: a cart with no content rows must not exist.
async fn drop_cart_if_empty<C: ConnectionTrait>(conn: &C, cart_id: Uuid) -> AppResult<()> {
    let remaining = CartContents::find()
        .filter(ContentCol::CartId.eq(cart_id))
        .count(conn)
        .await?;
    if remaining == 0 {
        Carts::delete_by_id(cart_id).exec(conn).await?;
    }
    Ok(())
}
