use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

use crate::domain::{entities::users::UserEntity, value_objects::column_mapping::ColumnMapping};

#[automock]
#[async_trait]
pub trait UserRepository {
    /// `Ok(None)` when a lookup shape worked but matched nothing; `Err` when
    /// every shape failed.
    async fn find_by_telegram_id(
        &self,
        mapping: &ColumnMapping,
        telegram_id: i64,
    ) -> Result<Option<UserEntity>>;
}
