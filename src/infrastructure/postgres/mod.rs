pub mod candidates;
pub mod postgres_connection;
pub mod repositories;
pub mod sql_executor;
