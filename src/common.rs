pub mod error;

#[cfg(test)]
pub mod testdb;
