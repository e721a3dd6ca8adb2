use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

use crate::domain::{
    entities::users::UserEntity,
    value_objects::{column_mapping::ColumnMapping, referrals::ReferralPage},
};

#[automock]
#[async_trait]
pub trait ReferralRepository {
    async fn list_referrals(
        &self,
        mapping: &ColumnMapping,
        referrer: &UserEntity,
    ) -> Result<ReferralPage>;

    async fn total_earned_kopeks(
        &self,
        mapping: &ColumnMapping,
        referrer: &UserEntity,
    ) -> Result<i64>;
}
