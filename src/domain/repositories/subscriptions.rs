use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

use crate::domain::{
    entities::{
        devices::DeviceEntity, servers::ServerEntity,
        subscription_periods::SubscriptionPeriodEntity,
    },
    value_objects::column_mapping::ColumnMapping,
};

/// Subscription side tables. Their names vary per bot, so a lookup where no
/// table shape answers is an empty list; `Err` is reserved for the database
/// itself being unreachable.
#[automock]
#[async_trait]
pub trait SubscriptionRepository {
    async fn list_user_servers(&self, telegram_id: i64) -> Result<Vec<ServerEntity>>;

    async fn list_user_devices(
        &self,
        mapping: &ColumnMapping,
        telegram_id: i64,
    ) -> Result<Vec<DeviceEntity>>;

    async fn list_available_servers(&self) -> Result<Vec<ServerEntity>>;

    async fn list_subscription_periods(&self) -> Result<Vec<SubscriptionPeriodEntity>>;
}
