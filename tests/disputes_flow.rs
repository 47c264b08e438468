use axum_storefront_api::{
    db::{create_orm_conn, create_pool, run_migrations},
    dto::disputes::{CreateChoiceRequest, FileDisputeRequest, RecordDecisionRequest},
    dto::products::{CreateCategoryRequest, CreateProductRequest},
    entity::users::ActiveModel as UserActive,
    error::AppError,
    middleware::auth::AuthUser,
    routes::params::{DisputeListQuery, Pagination},
    services::{admin_service, cart_service, dispute_service, order_service},
    state::AppState,
};
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, Set};
use uuid::Uuid;

// Dispute lifecycle: one dispute per order, pending until an admin records
// a decision, decided exactly once.
#[tokio::test]
async fn dispute_is_filed_and_decided_once() -> anyhow::Result<()> {
    let database_url = match std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => {
            eprintln!(
                "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration flow tests."
            );
            return Ok(());
        }
    };

    let state = setup_state(&database_url).await?;

    let customer = create_user(&state, "user").await?;
    let stranger = create_user(&state, "user").await?;
    let admin = create_user(&state, "admin").await?;

    let category = admin_service::create_category(
        &state,
        &admin,
        CreateCategoryRequest {
            name: unique("Laptops"),
            slug: unique("laptops"),
        },
    )
    .await?
    .data
    .unwrap();

    let slug = unique("crab-book");
    admin_service::create_product(
        &state,
        &admin,
        CreateProductRequest {
            name: "Crab Book".into(),
            slug: slug.clone(),
            category_id: category.id,
            description: None,
            price: 129_900,
            in_sale: true,
        },
    )
    .await?;

    cart_service::add_item(&state, &customer, &slug).await?;
    let order = order_service::checkout(&state, &customer).await?.data.unwrap();

    // Strangers cannot dispute someone else's order.
    let err = dispute_service::file_dispute(
        &state,
        &stranger,
        FileDisputeRequest {
            order_id: order.id,
            dispute_text: "not mine".into(),
        },
    )
    .await
    .expect_err("foreign order id must not resolve");
    assert!(matches!(err, AppError::NotFound));

    let dispute = dispute_service::file_dispute(
        &state,
        &customer,
        FileDisputeRequest {
            order_id: order.id,
            dispute_text: "arrived with a cracked case".into(),
        },
    )
    .await?
    .data
    .unwrap();
    assert!(dispute.decision.is_none());
    assert!(dispute.decision_text.is_none());
    assert!(dispute.decision_date.is_none());

    // The 1:1 invariant: a second dispute on the same order conflicts and
    // leaves the first untouched.
    let err = dispute_service::file_dispute(
        &state,
        &customer,
        FileDisputeRequest {
            order_id: order.id,
            dispute_text: "second attempt".into(),
        },
    )
    .await
    .expect_err("second dispute must conflict");
    assert!(matches!(err, AppError::Conflict(_)));

    let fetched = dispute_service::get_dispute(&state, &customer, dispute.id)
        .await?
        .data
        .unwrap();
    assert_eq!(fetched.dispute_text, "arrived with a cracked case");

    // Scoping: the stranger cannot read it either.
    let err = dispute_service::get_dispute(&state, &stranger, dispute.id)
        .await
        .expect_err("foreign dispute id must not resolve");
    assert!(matches!(err, AppError::NotFound));

    let pending = dispute_service::list_disputes(
        &state,
        &customer,
        DisputeListQuery {
            pagination: Pagination {
                page: Some(1),
                per_page: Some(20),
            },
            decided: Some(false),
        },
    )
    .await?
    .data
    .unwrap();
    assert!(pending.items.iter().any(|d| d.id == dispute.id));

    // Only admins decide.
    let choice = admin_service::create_choice(
        &state,
        &admin,
        CreateChoiceRequest {
            choice: unique("Refund"),
        },
    )
    .await?
    .data
    .unwrap();

    let err = admin_service::record_decision(
        &state,
        &customer,
        dispute.id,
        RecordDecisionRequest {
            choice_id: choice.id,
            decision_text: "nice try".into(),
        },
    )
    .await
    .expect_err("customers must not decide disputes");
    assert!(matches!(err, AppError::Forbidden));

    let decided = admin_service::record_decision(
        &state,
        &admin,
        dispute.id,
        RecordDecisionRequest {
            choice_id: choice.id,
            decision_text: "refund issued".into(),
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(decided.decision.as_deref(), Some(choice.choice.as_str()));
    assert_eq!(decided.decision_text.as_deref(), Some("refund issued"));
    assert!(decided.decision_date.is_some());

    // Decisions are final: re-deciding conflicts.
    let err = admin_service::record_decision(
        &state,
        &admin,
        dispute.id,
        RecordDecisionRequest {
            choice_id: choice.id,
            decision_text: "changed my mind".into(),
        },
    )
    .await
    .expect_err("re-deciding must conflict");
    assert!(matches!(err, AppError::Conflict(_)));

    Ok(())
}

async fn setup_state(database_url: &str) -> anyhow::Result<AppState> {
    let pool = create_pool(database_url).await?;
    let orm = create_orm_conn(database_url).await?;
    run_migrations(&orm).await?;
    Ok(AppState { pool, orm })
}

async fn create_user(state: &AppState, role: &str) -> anyhow::Result<AuthUser> {
    let user = UserActive {
        id: Set(Uuid::new_v4()),
        email: Set(unique("user") + "@example.com"),
        password_hash: Set("dummy".into()),
        name: Set("Test User".into()),
        role: Set(role.into()),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    Ok(AuthUser {
        user_id: user.id,
        role: role.into(),
    })
}

fn unique(prefix: &str) -> String {
    format!("{}-{}", prefix, Uuid::new_v4())
}
