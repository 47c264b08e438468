use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub category_id: Uuid,
    pub description: Option<String>,
    pub price: i64,
    pub in_sale: bool,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::categories::Entity",
        from = "Column::CategoryId",
        to = "super::categories::Column::Id"
    )]
    Categories,
    #[sea_orm(has_many = "super::property_values::Entity")]
    PropertyValues,
    #[sea_orm(has_many = "super::cart_contents::Entity")]
    CartContents,
}

impl Related<super::categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Categories.def()
    }
}

impl Related<super::property_values::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PropertyValues.def()
    }
}

impl Related<super::cart_contents::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CartContents.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
