use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::warn;

use crate::{
    application::query_router::or_default,
    domain::{
        entities::transactions::{TransactionEntity, TransactionRow},
        repositories::balance::BalanceRepository,
        value_objects::{
            balance::{HistoryPage, TransactionPage},
            column_mapping::ColumnMapping,
        },
    },
    infrastructure::postgres::{
        candidates, postgres_connection::PgPoolSquad, sql_executor::run_candidates,
    },
};

pub struct BalancePostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl BalancePostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl BalanceRepository for BalancePostgres {
    async fn transaction_history(
        &self,
        mapping: &ColumnMapping,
        telegram_id: i64,
        page: HistoryPage,
    ) -> Result<TransactionPage> {
        let candidates = match candidates::balance_history(mapping, telegram_id, page) {
            Ok(candidates) => candidates,
            Err(err) => {
                warn!(error = %err, "balance: history lookup cannot be built");
                return Ok(TransactionPage::default());
            }
        };

        let mut conn = Arc::clone(&self.db_pool)
            .get()
            .context("postgres pool checkout failed for `balance_history`")?;

        let (rows, total) = or_default(
            run_candidates::<TransactionRow>(&mut conn, "balance_history", &candidates).await,
        );

        Ok(TransactionPage {
            items: rows.into_iter().map(TransactionEntity::from).collect(),
            total,
        })
    }
}
