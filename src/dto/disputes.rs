use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{Dispute, DisputeChoice};

#[derive(Debug, Deserialize, ToSchema)]
pub struct FileDisputeRequest {
    pub order_id: Uuid,
    pub dispute_text: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RecordDecisionRequest {
    pub choice_id: Uuid,
    pub decision_text: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateChoiceRequest {
    pub choice: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct DisputeList {
    #[schema(value_type = Vec<Dispute>)]
    pub items: Vec<Dispute>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct ChoiceList {
    #[schema(value_type = Vec<DisputeChoice>)]
    pub items: Vec<DisputeChoice>,
}
