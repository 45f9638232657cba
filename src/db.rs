pub mod catalog_repo;
pub use catalog_repo::CatalogRepository;
pub mod customer_repo;
pub use customer_repo::CustomerRepository;
pub mod order_repo;
pub use order_repo::OrderRepository;
pub mod finance_repo;
pub use finance_repo::FinanceRepository;
pub mod profile_repo;
pub use profile_repo::ProfileRepository;
