use thiserror::Error;

use crate::domain::value_objects::column_mapping::SchemaError;

#[derive(Debug, Error)]
pub enum MiniAppError {
    #[error("user with telegram id {telegram_id} not found")]
    UserNotFound { telegram_id: i64 },

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("database lookup failed: {0}")]
    Database(#[from] anyhow::Error),
}
