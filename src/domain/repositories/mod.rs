pub mod balance;
pub mod referrals;
pub mod schema_catalog;
pub mod subscriptions;
pub mod users;
