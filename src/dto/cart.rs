use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::CartLine;

/// Form-style cart mutation. `quantity` arrives as a raw string and is only
/// meaningful for `update`; anything unparseable counts as 0.
#[derive(Debug, Deserialize, ToSchema)]
pub struct EditCartRequest {
    pub slug: String,
    pub submit: CartAction,
    pub quantity: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum CartAction {
    Add,
    Update,
    Remove,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartView {
    pub lines: Vec<CartLine>,
    pub total: i64,
}

/// Parse a form quantity. Missing, negative or malformed input counts as 0,
/// which the cart engine treats as "remove the line".
pub fn parse_quantity(raw: Option<&str>) -> i32 {
    raw.and_then(|s| s.trim().parse::<i32>().ok())
        .filter(|q| *q >= 0)
        .unwrap_or(0)
}
