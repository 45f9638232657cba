pub mod auth;
pub mod catalog;
pub mod customer;
pub mod finance;
pub mod order;
pub mod report;
