use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "product_properties")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::property_values::Entity")]
    PropertyValues,
}

impl Related<super::property_values::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PropertyValues.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
