use chrono::Utc;
use sea_orm::sea_query::LockType;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};
use std::collections::HashMap;
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::orders::OrderList,
    entity::{
        Products,
        cart_contents::{Column as ContentCol, Entity as CartContents},
        carts::{Column as CartCol, Entity as Carts},
        categories::{Column as CategoryCol, Entity as Categories},
        orders::{
            ActiveModel as OrderActive, Column as OrderCol, Entity as Orders, Model as OrderModel,
        },
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{Order, OrderLine},
    response::{ApiResponse, Meta},
    routes::params::{OrderListQuery, SortOrder},
    services::catalog_service::property_strings,
    state::AppState,
};

/// Finalize the customer's cart into an immutable order.
///
/// The whole step is one transaction: snapshot the lines, compute the cost,
/// insert the order, delete the cart. The cart row is locked so a concurrent
/// add cannot interleave with finalization. `order_date` carries the cart's
/// start_date (when shopping began); `payment_date` is now, because payment
/// here is a stub that marks the order paid instantly.
pub async fn checkout(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<Order>> {
    let txn = state.orm.begin().await?;

    let cart = Carts::find()
        .filter(CartCol::CustomerId.eq(user.user_id))
        .lock(LockType::Update)
        .one(&txn)
        .await?;
    let cart = match cart {
        Some(c) => c,
        None => return Err(AppError::NotFound),
    };

    let rows = CartContents::find()
        .filter(ContentCol::CartId.eq(cart.id))
        .find_also_related(Products)
        .all(&txn)
        .await?;
    if rows.is_empty() {
        // Unreachable while the empty-cart invariant holds, still guarded.
        return Err(AppError::NotFound);
    }

    let category_ids: Vec<Uuid> = rows
        .iter()
        .filter_map(|(_, product)| product.as_ref().map(|p| p.category_id))
        .collect();
    let category_names: HashMap<Uuid, String> = Categories::find()
        .filter(CategoryCol::Id.is_in(category_ids))
        .all(&txn)
        .await?
        .into_iter()
        .map(|c| (c.id, c.name))
        .collect();

    let mut lines: Vec<OrderLine> = Vec::with_capacity(rows.len());
    let mut cost: i64 = 0;
    for (content, product) in rows {
        let product = match product {
            Some(p) => p,
            None => {
                return Err(AppError::Internal(anyhow::anyhow!(
                    "cart line without product"
                )));
            }
        };
        let properties = property_strings(&txn, product.id).await?;
        cost += product.price * content.quantity as i64;
        lines.push(OrderLine {
            id: product.id,
            name: product.name,
            category: category_names
                .get(&product.category_id)
                .cloned()
                .unwrap_or_default(),
            price: product.price,
            in_sale: product.in_sale,
            properties,
            quantity: content.quantity,
        });
    }

    let items = serde_json::to_value(&lines).map_err(anyhow::Error::from)?;
    let order = OrderActive {
        id: Set(Uuid::new_v4()),
        customer_id: Set(user.user_id),
        order_date: Set(cart.start_date),
        items: Set(items),
        payment_date: Set(Utc::now().into()),
        cost: Set(cost),
    }
    .insert(&txn)
    .await?;

    CartContents::delete_many()
        .filter(ContentCol::CartId.eq(cart.id))
        .exec(&txn)
        .await?;
    Carts::delete_by_id(cart.id).exec(&txn).await?;

    txn.commit().await?;

    if let Err(err) = log_audit(
        state,
        Some(user.user_id),
        "checkout",
        Some("orders"),
        Some(serde_json::json!({ "order_id": order.id, "cost": order.cost })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Checkout success",
        order_from_entity(order)?,
        Some(Meta::empty()),
    ))
}

pub async fn list_orders(
    state: &AppState,
    user: &AuthUser,
    query: OrderListQuery,
) -> AppResult<ApiResponse<OrderList>> {
    let (page, limit, offset) = query.pagination.normalize();
    let condition = Condition::all().add(OrderCol::CustomerId.eq(user.user_id));

    let sort_order = query.sort_order.unwrap_or(SortOrder::Desc);
    let mut finder = Orders::find().filter(condition);
    finder = match sort_order {
        SortOrder::Asc => finder.order_by_asc(OrderCol::OrderDate),
        SortOrder::Desc => finder.order_by_desc(OrderCol::OrderDate),
    };

    let total = finder.clone().count(&state.orm).await? as i64;

    let models = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?;
    let mut items = Vec::with_capacity(models.len());
    for model in models {
        items.push(order_from_entity(model)?);
    }

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success(
        "Orders",
        OrderList { items },
        Some(meta),
    ))
}

pub async fn get_order(state: &AppState, user: &AuthUser, id: Uuid) -> AppResult<ApiResponse<Order>> {
    // Ownership scoping is part of the lookup: another customer's order id
    // reports NotFound, never Forbidden.
    let order = Orders::find()
        .filter(
            Condition::all()
                .add(OrderCol::CustomerId.eq(user.user_id))
                .add(OrderCol::Id.eq(id)),
        )
        .one(&state.orm)
        .await?;
    let order = match order {
        Some(o) => o,
        None => return Err(AppError::NotFound),
    };

    Ok(ApiResponse::success(
        "Order",
        order_from_entity(order)?,
        Some(Meta::empty()),
    ))
}

fn order_from_entity(model: OrderModel) -> AppResult<Order> {
    let items: Vec<OrderLine> =
        serde_json::from_value(model.items).map_err(anyhow::Error::from)?;
    Ok(Order {
        id: model.id,
        order_date: model.order_date.with_timezone(&Utc),
        payment_date: model.payment_date.with_timezone(&Utc),
        cost: model.cost,
        items,
    })
}
