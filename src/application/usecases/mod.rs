pub mod balance;
pub mod current_user;
pub mod referrals;
pub mod subscriptions;

#[cfg(test)]
pub(crate) mod test_support;
