use std::sync::Arc;

use tracing::{error, warn};

use crate::{
    application::{
        errors::MiniAppError, query_router::AllCandidatesFailed, schema_detector::SchemaDetector,
    },
    domain::{
        entities::users::UserEntity, repositories::users::UserRepository,
        value_objects::column_mapping::ColumnMapping,
    },
};

/// Resolves the column mapping and the caller's `users` row.
///
/// A missing row and a lookup where no query shape worked are both
/// `UserNotFound`; anything else from the repository is a database failure.
pub async fn load_current_user<U>(
    schema_detector: &SchemaDetector,
    user_repository: &U,
    telegram_id: i64,
) -> Result<(Arc<ColumnMapping>, UserEntity), MiniAppError>
where
    U: UserRepository + Send + Sync,
{
    let mapping = schema_detector.column_mapping().await?;

    let user = user_repository
        .find_by_telegram_id(&mapping, telegram_id)
        .await
        .map_err(|err| {
            let exhausted = err
                .downcast_ref::<AllCandidatesFailed>()
                .map(|exhausted| exhausted.failures.len());

            match exhausted {
                Some(attempts) => {
                    warn!(
                        telegram_id,
                        attempts, "current_user: no lookup shape fits the users table"
                    );
                    MiniAppError::UserNotFound { telegram_id }
                }
                None => {
                    error!(telegram_id, db_error = ?err, "current_user: user lookup failed");
                    MiniAppError::Database(err)
                }
            }
        })?;

    match user {
        Some(user) => Ok((mapping, user)),
        None => {
            warn!(telegram_id, "current_user: no users row for telegram id");
            Err(MiniAppError::UserNotFound { telegram_id })
        }
    }
}
