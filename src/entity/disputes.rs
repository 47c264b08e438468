use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "disputes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    pub order_id: Uuid,
    pub created_at: DateTimeWithTimeZone,
    pub dispute_text: String,
    pub decision_id: Option<Uuid>,
    pub decision_text: Option<String>,
    pub decision_date: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::orders::Entity",
        from = "Column::OrderId",
        to = "super::orders::Column::Id"
    )]
    Orders,
    #[sea_orm(
        belongs_to = "super::dispute_choices::Entity",
        from = "Column::DecisionId",
        to = "super::dispute_choices::Column::Id"
    )]
    DisputeChoices,
}

impl Related<super::orders::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Orders.def()
    }
}

impl Related<super::dispute_choices::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DisputeChoices.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
