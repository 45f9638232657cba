pub mod auth;
pub mod customers;
pub mod finance;
pub mod orders;
pub mod products;
pub mod reports;
pub mod team;
