use std::sync::Arc;

use tokio::sync::OnceCell;
use tracing::{error, info, warn};

use crate::{
    application::errors::MiniAppError,
    domain::{
        repositories::schema_catalog::SchemaCatalogRepository,
        value_objects::column_mapping::{ColumnMapping, USERS_TABLE},
    },
};

/// Lazily discovers how the bot's `users` table names its columns.
///
/// Constructed once at startup and shared by every use case; the first
/// successful detection is kept for the lifetime of the detector. A failed
/// detection is not cached, so the next request retries.
pub struct SchemaDetector {
    catalog: Arc<dyn SchemaCatalogRepository + Send + Sync>,
    mapping: OnceCell<Arc<ColumnMapping>>,
}

impl SchemaDetector {
    pub fn new(catalog: Arc<dyn SchemaCatalogRepository + Send + Sync>) -> Self {
        Self {
            catalog,
            mapping: OnceCell::new(),
        }
    }

    pub async fn column_mapping(&self) -> Result<Arc<ColumnMapping>, MiniAppError> {
        self.mapping
            .get_or_try_init(|| self.detect())
            .await
            .map(Arc::clone)
    }

    pub fn cached(&self) -> Option<Arc<ColumnMapping>> {
        self.mapping.get().cloned()
    }

    /// Drops the cached mapping so the next call probes the database again.
    pub fn reset(&mut self) {
        self.mapping.take();
    }

    async fn detect(&self) -> Result<Arc<ColumnMapping>, MiniAppError> {
        let columns = self
            .catalog
            .list_table_columns(USERS_TABLE)
            .await
            .map_err(|err| {
                error!(db_error = ?err, "schema_detector: failed to read information_schema");
                err
            })?;

        info!(columns = ?columns, "schema_detector: discovered users columns");

        let mapping = ColumnMapping::resolve(columns).map_err(|err| {
            error!(error = %err, "schema_detector: users table cannot be mapped");
            err
        })?;

        for field in mapping.unresolved_fields() {
            warn!(
                field = %field,
                candidates = ?field.aliases(),
                "schema_detector: no column matches logical field, it will read as NULL"
            );
        }

        info!(mapping = ?mapping, "schema_detector: column mapping resolved");

        Ok(Arc::new(mapping))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        repositories::schema_catalog::MockSchemaCatalogRepository,
        value_objects::{column_mapping::SchemaError, enums::user_fields::UserField},
    };
    use anyhow::anyhow;

    fn catalog_returning(columns: &'static [&'static str], times: usize) -> MockSchemaCatalogRepository {
        let mut catalog = MockSchemaCatalogRepository::new();
        catalog
            .expect_list_table_columns()
            .withf(|table| table == "users")
            .times(times)
            .returning(move |_| Ok(columns.iter().map(|c| c.to_string()).collect()));
        catalog
    }

    #[tokio::test]
    async fn resolves_aliases_from_live_schema() {
        let detector = SchemaDetector::new(Arc::new(catalog_returning(
            &["id", "tg_id", "balance_kopeks", "has_active_subscription"],
            1,
        )));

        let mapping = detector.column_mapping().await.unwrap();

        assert_eq!(mapping.column(UserField::TelegramId), Some("tg_id"));
        assert_eq!(mapping.column(UserField::Balance), Some("balance_kopeks"));
        assert_eq!(
            mapping.column(UserField::SubscriptionActive),
            Some("has_active_subscription")
        );
    }

    #[tokio::test]
    async fn probes_the_database_only_once() {
        let detector =
            SchemaDetector::new(Arc::new(catalog_returning(&["id", "telegram_id"], 1)));

        let first = detector.column_mapping().await.unwrap();
        let second = detector.column_mapping().await.unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert!(detector.cached().is_some());
    }

    #[tokio::test]
    async fn reset_forces_a_new_probe() {
        let mut detector =
            SchemaDetector::new(Arc::new(catalog_returning(&["id", "telegram_id"], 2)));

        detector.column_mapping().await.unwrap();
        detector.reset();
        assert!(detector.cached().is_none());
        detector.column_mapping().await.unwrap();
    }

    #[tokio::test]
    async fn missing_users_table_is_fatal() {
        let detector = SchemaDetector::new(Arc::new(catalog_returning(&[], 1)));

        let err = detector.column_mapping().await.unwrap_err();

        assert!(matches!(
            err,
            MiniAppError::Schema(SchemaError::TableNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn failed_detection_is_not_cached() {
        let mut catalog = MockSchemaCatalogRepository::new();
        let mut calls = 0;
        catalog
            .expect_list_table_columns()
            .times(2)
            .returning(move |_| {
                calls += 1;
                if calls == 1 {
                    Err(anyhow!("pool timed out"))
                } else {
                    Ok(vec!["id".to_string(), "telegram_id".to_string()])
                }
            });
        let detector = SchemaDetector::new(Arc::new(catalog));

        assert!(matches!(
            detector.column_mapping().await,
            Err(MiniAppError::Database(_))
        ));
        assert!(detector.column_mapping().await.is_ok());
    }
}
