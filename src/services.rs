pub mod auth_service;
pub use auth_service::AuthService;
pub mod catalog_service;
pub use catalog_service::CatalogService;
pub mod customer_service;
pub use customer_service::CustomerService;
pub mod loyalty;
pub mod order_service;
pub use order_service::OrderService;
pub mod report_service;
pub use report_service::ReportService;
