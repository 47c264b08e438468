use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub category: String,
    pub description: Option<String>,
    pub price: i64,
    pub in_sale: bool,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProductDetail {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub category: String,
    pub description: Option<String>,
    pub price: i64,
    pub in_sale: bool,
    /// Formatted as "PropertyName: Value".
    pub properties: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CartLine {
    pub product: Product,
    pub quantity: i32,
}

/// One line of a persisted order. This is the durable wire shape stored in
/// `orders.items`; historical orders are read with it, never rewritten, so
/// fields must stay stable.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrderLine {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    pub price: i64,
    pub in_sale: bool,
    pub properties: Vec<String>,
    pub quantity: i32,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Order {
    pub id: Uuid,
    pub order_date: DateTime<Utc>,
    pub payment_date: DateTime<Utc>,
    pub cost: i64,
    pub items: Vec<OrderLine>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DisputeChoice {
    pub id: Uuid,
    pub choice: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Dispute {
    pub id: Uuid,
    pub order_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub dispute_text: String,
    /// Label of the recorded decision; null while the dispute is pending.
    pub decision: Option<String>,
    pub decision_text: Option<String>,
    pub decision_date: Option<DateTime<Utc>>,
}
