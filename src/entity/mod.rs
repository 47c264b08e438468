pub mod audit_logs;
pub mod cart_contents;
pub mod carts;
pub mod categories;
pub mod dispute_choices;
pub mod disputes;
pub mod orders;
pub mod product_properties;
pub mod products;
pub mod property_values;
pub mod users;

pub use audit_logs::Entity as AuditLogs;
pub use cart_contents::Entity as CartContents;
pub use carts::Entity as Carts;
pub use categories::Entity as Categories;
pub use dispute_choices::Entity as DisputeChoices;
pub use disputes::Entity as Disputes;
pub use orders::Entity as Orders;
pub use product_properties::Entity as ProductProperties;
pub use products::Entity as Products;
pub use property_values::Entity as PropertyValues;
pub use users::Entity as Users;
