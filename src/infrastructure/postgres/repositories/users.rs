use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use tracing::debug;

use crate::{
    domain::{
        entities::users::{UserEntity, UserRow},
        repositories::users::UserRepository,
        value_objects::column_mapping::ColumnMapping,
    },
    infrastructure::postgres::{
        candidates, postgres_connection::PgPoolSquad, sql_executor::run_candidates,
    },
};

pub struct UserPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl UserPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl UserRepository for UserPostgres {
    async fn find_by_telegram_id(
        &self,
        mapping: &ColumnMapping,
        telegram_id: i64,
    ) -> Result<Option<UserEntity>> {
        let candidates = candidates::user_by_telegram_id(mapping, telegram_id)?;
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let hit = run_candidates::<UserRow>(&mut conn, "user", &candidates).await?;
        debug!(
            telegram_id,
            candidate = hit.label,
            attempt = hit.attempt,
            "users: lookup shape resolved"
        );

        let (rows, _) = hit.value;
        rows.into_iter()
            .next()
            .map(|row| UserEntity::from_row(row, mapping.balance_in_rubles()))
            .transpose()
    }
}
