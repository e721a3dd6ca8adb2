use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

use crate::domain::value_objects::{
    balance::{HistoryPage, TransactionPage},
    column_mapping::ColumnMapping,
};

#[automock]
#[async_trait]
pub trait BalanceRepository {
    /// Empty page when no known transaction table answers; `Err` only when
    /// the database cannot be reached.
    async fn transaction_history(
        &self,
        mapping: &ColumnMapping,
        telegram_id: i64,
        page: HistoryPage,
    ) -> Result<TransactionPage>;
}
