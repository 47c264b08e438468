pub mod auth;
pub mod cart;
pub mod disputes;
pub mod orders;
pub mod products;
