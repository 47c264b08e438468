use chrono::Utc;
use sea_orm::sea_query::LockType;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::disputes::{ChoiceList, CreateChoiceRequest, DisputeList, RecordDecisionRequest},
    dto::products::{
        CreateCategoryRequest, CreateProductRequest, SetPropertiesRequest, UpdateProductRequest,
    },
    entity::{
        DisputeChoices,
        categories::{
            ActiveModel as CategoryActive, Column as CategoryCol, Entity as Categories,
        },
        dispute_choices::{ActiveModel as ChoiceActive, Column as ChoiceCol},
        disputes::{ActiveModel as DisputeActive, Column as DisputeCol, Entity as Disputes},
        product_properties::{
            ActiveModel as PropertyActive, Column as PropertyCol, Entity as ProductProperties,
        },
        products::{ActiveModel as ProductActive, Column as ProdCol, Entity as Products},
        property_values::{
            ActiveModel as PropValActive, Column as PropValCol, Entity as PropertyValues,
        },
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::{Category, Dispute, DisputeChoice, Product},
    response::{ApiResponse, Meta},
    routes::params::DisputeListQuery,
    services::catalog_service::product_from_entity,
    services::dispute_service::dispute_from_entity,
    state::AppState,
};

pub async fn list_all_disputes(
    state: &AppState,
    user: &AuthUser,
    query: DisputeListQuery,
) -> AppResult<ApiResponse<DisputeList>> {
    ensure_admin(user)?;
    let (page, limit, offset) = query.pagination.normalize();

    let mut condition = Condition::all();
    if let Some(decided) = query.decided {
        condition = condition.add(if decided {
            DisputeCol::DecisionId.is_not_null()
        } else {
            DisputeCol::DecisionId.is_null()
        });
    }

    let finder = Disputes::find()
        .filter(condition)
        .order_by_asc(DisputeCol::CreatedAt);

    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .find_also_related(DisputeChoices)
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(|(dispute, choice)| dispute_from_entity(dispute, choice.map(|c| c.choice)))
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success(
        "Disputes",
        DisputeList { items },
        Some(meta),
    ))
}

/// Record the decision on a pending dispute: pending -> decided, exactly
/// once. A dispute that already carries a decision is a Conflict; decisions
/// are never overwritten.
pub async fn record_decision(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: RecordDecisionRequest,
) -> AppResult<ApiResponse<Dispute>> {
    ensure_admin(user)?;
    let txn = state.orm.begin().await?;

    let dispute = Disputes::find_by_id(id)
        .lock(LockType::Update)
        .one(&txn)
        .await?;
    let dispute = match dispute {
        Some(d) => d,
        None => return Err(AppError::NotFound),
    };

    if dispute.decision_id.is_some() {
        return Err(AppError::Conflict("dispute is already decided".into()));
    }

    let choice = DisputeChoices::find_by_id(payload.choice_id).one(&txn).await?;
    let choice = match choice {
        Some(c) => c,
        None => return Err(AppError::NotFound),
    };

    let mut active: DisputeActive = dispute.into();
    active.decision_id = Set(Some(choice.id));
    active.decision_text = Set(Some(payload.decision_text));
    active.decision_date = Set(Some(Utc::now().into()));
    let dispute = active.update(&txn).await?;

    txn.commit().await?;

    if let Err(err) = log_audit(
        state,
        Some(user.user_id),
        "dispute_decided",
        Some("disputes"),
        Some(serde_json::json!({ "dispute_id": dispute.id, "choice": choice.choice })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Decision recorded",
        dispute_from_entity(dispute, Some(choice.choice)),
        Some(Meta::empty()),
    ))
}

pub async fn create_choice(
    state: &AppState,
    user: &AuthUser,
    payload: CreateChoiceRequest,
) -> AppResult<ApiResponse<DisputeChoice>> {
    ensure_admin(user)?;

    let existing = DisputeChoices::find()
        .filter(ChoiceCol::Choice.eq(payload.choice.clone()))
        .one(&state.orm)
        .await?;
    if existing.is_some() {
        return Err(AppError::Conflict("choice already exists".into()));
    }

    let choice = ChoiceActive {
        id: Set(Uuid::new_v4()),
        choice: Set(payload.choice),
    }
    .insert(&state.orm)
    .await?;

    Ok(ApiResponse::success(
        "Choice created",
        DisputeChoice {
            id: choice.id,
            choice: choice.choice,
        },
        Some(Meta::empty()),
    ))
}

pub async fn list_choices(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<ChoiceList>> {
    ensure_admin(user)?;

    let items = DisputeChoices::find()
        .order_by_asc(ChoiceCol::Choice)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(|c| DisputeChoice {
            id: c.id,
            choice: c.choice,
        })
        .collect();

    Ok(ApiResponse::success(
        "Choices",
        ChoiceList { items },
        Some(Meta::empty()),
    ))
}

pub async fn create_category(
    state: &AppState,
    user: &AuthUser,
    payload: CreateCategoryRequest,
) -> AppResult<ApiResponse<Category>> {
    ensure_admin(user)?;

    let existing = Categories::find()
        .filter(
            Condition::any()
                .add(CategoryCol::Name.eq(payload.name.clone()))
                .add(CategoryCol::Slug.eq(payload.slug.clone())),
        )
        .one(&state.orm)
        .await?;
    if existing.is_some() {
        return Err(AppError::Conflict("category name or slug already exists".into()));
    }

    let category = CategoryActive {
        id: Set(Uuid::new_v4()),
        name: Set(payload.name),
        slug: Set(payload.slug),
    }
    .insert(&state.orm)
    .await?;

    if let Err(err) = log_audit(
        state,
        Some(user.user_id),
        "category_create",
        Some("categories"),
        Some(serde_json::json!({ "category_id": category.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Category created",
        Category {
            id: category.id,
            name: category.name,
            slug: category.slug,
        },
        Some(Meta::empty()),
    ))
}

pub async fn create_product(
    state: &AppState,
    user: &AuthUser,
    payload: CreateProductRequest,
) -> AppResult<ApiResponse<Product>> {
    ensure_admin(user)?;

    let category = Categories::find_by_id(payload.category_id)
        .one(&state.orm)
        .await?;
    let category = match category {
        Some(c) => c,
        None => return Err(AppError::NotFound),
    };

    let existing = Products::find()
        .filter(ProdCol::Slug.eq(payload.slug.clone()))
        .one(&state.orm)
        .await?;
    if existing.is_some() {
        return Err(AppError::Conflict("product slug already exists".into()));
    }

    if payload.price < 0 {
        return Err(AppError::BadRequest("price must not be negative".into()));
    }

    let product = ProductActive {
        id: Set(Uuid::new_v4()),
        name: Set(payload.name),
        slug: Set(payload.slug),
        category_id: Set(category.id),
        description: Set(payload.description),
        price: Set(payload.price),
        in_sale: Set(payload.in_sale),
        created_at: sea_orm::ActiveValue::NotSet,
    }
    .insert(&state.orm)
    .await?;

    if let Err(err) = log_audit(
        state,
        Some(user.user_id),
        "product_create",
        Some("products"),
        Some(serde_json::json!({ "product_id": product.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Product created",
        product_from_entity(product, category.name),
        Some(Meta::empty()),
    ))
}

pub async fn update_product(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateProductRequest,
) -> AppResult<ApiResponse<Product>> {
    ensure_admin(user)?;

    let existing = Products::find_by_id(id).one(&state.orm).await?;
    let existing = match existing {
        Some(p) => p,
        None => return Err(AppError::NotFound),
    };

    if let Some(price) = payload.price {
        if price < 0 {
            return Err(AppError::BadRequest("price must not be negative".into()));
        }
    }

    let category_id = existing.category_id;
    let mut active: ProductActive = existing.into();
    if let Some(name) = payload.name {
        active.name = Set(name);
    }
    if let Some(description) = payload.description {
        active.description = Set(Some(description));
    }
    if let Some(price) = payload.price {
        active.price = Set(price);
    }
    if let Some(in_sale) = payload.in_sale {
        active.in_sale = Set(in_sale);
    }
    let product = active.update(&state.orm).await?;

    let category = Categories::find_by_id(category_id).one(&state.orm).await?;

    if let Err(err) = log_audit(
        state,
        Some(user.user_id),
        "product_update",
        Some("products"),
        Some(serde_json::json!({ "product_id": product.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Updated",
        product_from_entity(product, category.map(|c| c.name).unwrap_or_default()),
        Some(Meta::empty()),
    ))
}

pub async fn delete_product(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;

    let result = Products::delete_by_id(id).exec(&state.orm).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    if let Err(err) = log_audit(
        state,
        Some(user.user_id),
        "product_delete",
        Some("products"),
        Some(serde_json::json!({ "product_id": id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

/// Replace or extend a product's property values. Properties are addressed
/// by name and created on first use; (product, property) stays unique.
pub async fn set_properties(
    state: &AppState,
    user: &AuthUser,
    product_id: Uuid,
    payload: SetPropertiesRequest,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;
    let txn = state.orm.begin().await?;

    let product = Products::find_by_id(product_id).one(&txn).await?;
    let product = match product {
        Some(p) => p,
        None => return Err(AppError::NotFound),
    };

    for entry in payload.properties {
        let property = ProductProperties::find()
            .filter(PropertyCol::Name.eq(entry.property.clone()))
            .one(&txn)
            .await?;
        let property = match property {
            Some(p) => p,
            None => {
                PropertyActive {
                    id: Set(Uuid::new_v4()),
                    name: Set(entry.property.clone()),
                }
                .insert(&txn)
                .await?
            }
        };

        let existing = PropertyValues::find()
            .filter(PropValCol::ProductId.eq(product.id))
            .filter(PropValCol::PropertyId.eq(property.id))
            .one(&txn)
            .await?;
        match existing {
            Some(row) => {
                let mut active: PropValActive = row.into();
                active.value = Set(entry.value);
                active.update(&txn).await?;
            }
            None => {
                PropValActive {
                    id: Set(Uuid::new_v4()),
                    product_id: Set(product.id),
                    property_id: Set(property.id),
                    value: Set(entry.value),
                }
                .insert(&txn)
                .await?;
            }
        }
    }

    txn.commit().await?;

    if let Err(err) = log_audit(
        state,
        Some(user.user_id),
        "product_properties_set",
        Some("property_values"),
        Some(serde_json::json!({ "product_id": product_id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Properties set",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}
