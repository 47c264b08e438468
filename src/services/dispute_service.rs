use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, JoinType, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Set,
};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::disputes::{DisputeList, FileDisputeRequest},
    entity::{
        DisputeChoices,
        disputes::{
            ActiveModel as DisputeActive, Column as DisputeCol, Entity as Disputes,
            Model as DisputeModel, Relation as DisputeRel,
        },
        orders::{Column as OrderCol, Entity as Orders},
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::Dispute,
    response::{ApiResponse, Meta},
    routes::params::DisputeListQuery,
    state::AppState,
};

/// File a dispute against one of the caller's orders. An order carries at
/// most one dispute; a second attempt is a Conflict and leaves the original
/// untouched.
pub async fn file_dispute(
    state: &AppState,
    user: &AuthUser,
    payload: FileDisputeRequest,
) -> AppResult<ApiResponse<Dispute>> {
    let order = Orders::find()
        .filter(
            Condition::all()
                .add(OrderCol::Id.eq(payload.order_id))
                .add(OrderCol::CustomerId.eq(user.user_id)),
        )
        .one(&state.orm)
        .await?;
    let order = match order {
        Some(o) => o,
        None => return Err(AppError::NotFound),
    };

    let existing = Disputes::find()
        .filter(DisputeCol::OrderId.eq(order.id))
        .one(&state.orm)
        .await?;
    if existing.is_some() {
        return Err(AppError::Conflict("order already has a dispute".into()));
    }

    let dispute = DisputeActive {
        id: Set(Uuid::new_v4()),
        order_id: Set(order.id),
        created_at: NotSet,
        dispute_text: Set(payload.dispute_text),
        decision_id: Set(None),
        decision_text: Set(None),
        decision_date: Set(None),
    }
    .insert(&state.orm)
    .await?;

    if let Err(err) = log_audit(
        state,
        Some(user.user_id),
        "dispute_filed",
        Some("disputes"),
        Some(serde_json::json!({ "dispute_id": dispute.id, "order_id": order.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Dispute filed",
        dispute_from_entity(dispute, None),
        Some(Meta::empty()),
    ))
}

pub async fn list_disputes(
    state: &AppState,
    user: &AuthUser,
    query: DisputeListQuery,
) -> AppResult<ApiResponse<DisputeList>> {
    let (page, limit, offset) = query.pagination.normalize();

    let mut condition = Condition::all().add(OrderCol::CustomerId.eq(user.user_id));
    if let Some(decided) = query.decided {
        condition = condition.add(if decided {
            DisputeCol::DecisionId.is_not_null()
        } else {
            DisputeCol::DecisionId.is_null()
        });
    }

    let finder = Disputes::find()
        .join(JoinType::InnerJoin, DisputeRel::Orders.def())
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

pub async fn get_dispute(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<Dispute>> {
    // Scoped through the owning order; foreign ids report NotFound.
    let found = Disputes::find()
        .join(JoinType::InnerJoin, DisputeRel::Orders.def())
        .filter(
            Condition::all()
                .add(DisputeCol::Id.eq(id))
                .add(OrderCol::CustomerId.eq(user.user_id)),
        )
        .find_also_related(DisputeChoices)
        .one(&state.orm)
        .await?;
    let (dispute, choice) = match found {
        Some(pair) => pair,
        None => return Err(AppError::NotFound),
    };

    Ok(ApiResponse::success(
        "Dispute",
        dispute_from_entity(dispute, choice.map(|c| c.choice)),
        Some(Meta::empty()),
    ))
}

pub(crate) fn dispute_from_entity(model: DisputeModel, choice: Option<String>) -> Dispute {
    Dispute {
        id: model.id,
        order_id: model.order_id,
        created_at: model.created_at.with_timezone(&chrono::Utc),
        dispute_text: model.dispute_text,
        decision: choice,
        decision_text: model.decision_text,
        decision_date: model.decision_date.map(|dt| dt.with_timezone(&chrono::Utc)),
    }
}
