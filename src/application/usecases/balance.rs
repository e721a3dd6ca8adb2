use std::sync::Arc;

use tracing::info;

use crate::{
    application::{
        errors::MiniAppError, schema_detector::SchemaDetector,
        usecases::current_user::load_current_user,
    },
    domain::{
        repositories::{balance::BalanceRepository, users::UserRepository},
        value_objects::balance::{
            BalanceModel, HistoryPage, HistoryRequest, TransactionHistoryModel, kopeks_to_rubles,
        },
    },
};

pub struct BalanceUseCase<U, B>
where
    U: UserRepository + Send + Sync + 'static,
    B: BalanceRepository + Send + Sync + 'static,
{
    schema_detector: Arc<SchemaDetector>,
    user_repository: Arc<U>,
    balance_repository: Arc<B>,
}

impl<U, B> BalanceUseCase<U, B>
where
    U: UserRepository + Send + Sync + 'static,
    B: BalanceRepository + Send + Sync + 'static,
{
    pub fn new(
        schema_detector: Arc<SchemaDetector>,
        user_repository: Arc<U>,
        balance_repository: Arc<B>,
    ) -> Self {
        Self {
            schema_detector,
            user_repository,
            balance_repository,
        }
    }

    pub async fn balance(&self, telegram_id: i64) -> Result<BalanceModel, MiniAppError> {
        let (_, user) =
            load_current_user(&self.schema_detector, self.user_repository.as_ref(), telegram_id)
                .await?;

        info!(
            telegram_id,
            balance_kopeks = user.balance_kopeks,
            "balance: balance loaded"
        );

        Ok(BalanceModel {
            success: true,
            balance_kopeks: user.balance_kopeks,
            balance_rubles: kopeks_to_rubles(user.balance_kopeks),
        })
    }

    /// History is keyed by telegram id alone; an unknown user simply has no rows.
    pub async fn history(
        &self,
        telegram_id: i64,
        request: &HistoryRequest,
    ) -> Result<TransactionHistoryModel, MiniAppError> {
        let mapping = self.schema_detector.column_mapping().await?;
        let page = HistoryPage::from(request);

        let history = self
            .balance_repository
            .transaction_history(&mapping, telegram_id, page)
            .await?;

        info!(
            telegram_id,
            limit = page.limit,
            offset = page.offset,
            returned = history.items.len(),
            total = history.total,
            "balance: history loaded"
        );

        Ok(TransactionHistoryModel {
            success: true,
            transactions: history.items,
            total: history.total,
            limit: page.limit,
            offset: page.offset,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        application::usecases::test_support::{TELEGRAM_ID, default_detector, sample_user},
        domain::{
            entities::transactions::TransactionEntity,
            repositories::{balance::MockBalanceRepository, users::MockUserRepository},
            value_objects::balance::TransactionPage,
        },
    };
    use anyhow::anyhow;

    fn transaction(id: &str, amount_kopeks: i64) -> TransactionEntity {
        TransactionEntity {
            id: Some(id.to_string()),
            amount_kopeks,
            amount_rubles: kopeks_to_rubles(amount_kopeks),
            transaction_type: Some("deposit".to_string()),
            description: None,
            created_at: None,
        }
    }

    #[tokio::test]
    async fn reports_balance_in_both_units() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_telegram_id()
            .times(1)
            .returning(|_, _| Ok(Some(sample_user())));

        let usecase = BalanceUseCase::new(
            default_detector(),
            Arc::new(users),
            Arc::new(MockBalanceRepository::new()),
        );

        let balance = usecase.balance(TELEGRAM_ID).await.unwrap();

        assert_eq!(
            balance,
            BalanceModel {
                success: true,
                balance_kopeks: 15_050,
                balance_rubles: 150.5,
            }
        );
    }

    #[tokio::test]
    async fn balance_of_unknown_user_is_not_found() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_telegram_id().returning(|_, _| Ok(None));

        let usecase = BalanceUseCase::new(
            default_detector(),
            Arc::new(users),
            Arc::new(MockBalanceRepository::new()),
        );

        assert!(matches!(
            usecase.balance(TELEGRAM_ID).await,
            Err(MiniAppError::UserNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn history_clamps_paging_before_querying() {
        let mut balance = MockBalanceRepository::new();
        balance
            .expect_transaction_history()
            .withf(|_, id, page| {
                *id == TELEGRAM_ID && *page == HistoryPage { limit: 100, offset: 0 }
            })
            .times(1)
            .returning(|_, _, _| {
                Ok(TransactionPage {
                    items: vec![transaction("1", 10_000), transaction("2", -2_500)],
                    total: 7,
                })
            });

        let usecase = BalanceUseCase::new(
            default_detector(),
            Arc::new(MockUserRepository::new()),
            Arc::new(balance),
        );

        let history = usecase
            .history(
                TELEGRAM_ID,
                &HistoryRequest {
                    limit: 500,
                    offset: -3,
                },
            )
            .await
            .unwrap();

        assert_eq!(history.limit, 100);
        assert_eq!(history.offset, 0);
        assert_eq!(history.total, 7);
        assert_eq!(history.transactions.len(), 2);
        assert_eq!(history.transactions[1].amount_rubles, -25.0);
    }

    #[tokio::test]
    async fn history_without_transaction_table_is_empty() {
        let mut balance = MockBalanceRepository::new();
        balance
            .expect_transaction_history()
            .returning(|_, _, _| Ok(TransactionPage::default()));

        let usecase = BalanceUseCase::new(
            default_detector(),
            Arc::new(MockUserRepository::new()),
            Arc::new(balance),
        );

        let history = usecase
            .history(TELEGRAM_ID, &HistoryRequest::default())
            .await
            .unwrap();

        assert!(history.success);
        assert!(history.transactions.is_empty());
        assert_eq!(history.total, 0);
        assert_eq!(history.limit, 50);
    }

    #[tokio::test]
    async fn history_fails_when_the_database_is_unreachable() {
        let mut balance = MockBalanceRepository::new();
        balance
            .expect_transaction_history()
            .returning(|_, _, _| Err(anyhow!("postgres pool checkout failed for `balance_history`")));

        let usecase = BalanceUseCase::new(
            default_detector(),
            Arc::new(MockUserRepository::new()),
            Arc::new(balance),
        );

        assert!(matches!(
            usecase.history(TELEGRAM_ID, &HistoryRequest::default()).await,
            Err(MiniAppError::Database(_))
        ));
    }
}
