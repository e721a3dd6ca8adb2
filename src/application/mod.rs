pub mod errors;
pub mod query_router;
pub mod schema_detector;
pub mod usecases;
