pub mod balance;
pub mod candidate_query;
pub mod coercion;
pub mod column_mapping;
pub mod enums;
pub mod referrals;
pub mod subscriptions;
pub mod telegram_users;
