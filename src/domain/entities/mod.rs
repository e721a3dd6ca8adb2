pub mod devices;
pub mod referrals;
pub mod servers;
pub mod subscription_periods;
pub mod transactions;
pub mod users;
