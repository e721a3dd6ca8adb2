pub mod auth;
pub mod balance;
pub mod referrals;
pub mod subscriptions;
