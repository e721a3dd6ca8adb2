use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::warn;

use crate::{
    application::query_router::or_default,
    domain::{
        entities::{
            devices::{DeviceEntity, DeviceRow},
            servers::{ServerEntity, ServerRow},
            subscription_periods::{SubscriptionPeriodEntity, SubscriptionPeriodRow},
        },
        repositories::subscriptions::SubscriptionRepository,
        value_objects::{candidate_query::CandidateQuery, column_mapping::ColumnMapping},
    },
    infrastructure::postgres::{
        candidates, postgres_connection::PgPoolSquad, sql_executor::run_candidates,
    },
};

pub struct SubscriptionPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl SubscriptionPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }

    async fn list<R, E>(
        &self,
        operation: &'static str,
        candidates: &[CandidateQuery],
    ) -> Result<Vec<E>>
    where
        R: diesel::QueryableByName<diesel::pg::Pg> + Send + 'static,
        E: From<R>,
    {
        let mut conn = Arc::clone(&self.db_pool)
            .get()
            .with_context(|| format!("postgres pool checkout failed for `{operation}`"))?;

        let (rows, _) = or_default(run_candidates::<R>(&mut conn, operation, candidates).await);

        Ok(rows.into_iter().map(E::from).collect())
    }
}

#[async_trait]
impl SubscriptionRepository for SubscriptionPostgres {
    async fn list_user_servers(&self, telegram_id: i64) -> Result<Vec<ServerEntity>> {
        self.list::<ServerRow, _>("user_servers", &candidates::user_servers(telegram_id))
            .await
    }

    async fn list_user_devices(
        &self,
        mapping: &ColumnMapping,
        telegram_id: i64,
    ) -> Result<Vec<DeviceEntity>> {
        match candidates::user_devices(mapping, telegram_id) {
            Ok(candidates) => self.list::<DeviceRow, _>("user_devices", &candidates).await,
            Err(err) => {
                warn!(error = %err, "subscriptions: device lookup cannot be built");
                Ok(Vec::new())
            }
        }
    }

    async fn list_available_servers(&self) -> Result<Vec<ServerEntity>> {
        self.list::<ServerRow, _>("available_servers", &candidates::available_servers())
            .await
    }

    async fn list_subscription_periods(&self) -> Result<Vec<SubscriptionPeriodEntity>> {
        self.list::<SubscriptionPeriodRow, _>(
            "subscription_periods",
            &candidates::subscription_periods(),
        )
        .await
    }
}
