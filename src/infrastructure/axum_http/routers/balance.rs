use std::sync::Arc;

use axum::{Json, Router, extract::State, routing::post};

use crate::{
    application::{schema_detector::SchemaDetector, usecases::balance::BalanceUseCase},
    auth::{NoPayload, TelegramAuth},
    domain::{
        repositories::{balance::BalanceRepository, users::UserRepository},
        value_objects::balance::{BalanceModel, HistoryRequest, TransactionHistoryModel},
    },
    infrastructure::{
        axum_http::error_responses::AppError,
        postgres::{
            postgres_connection::PgPoolSquad,
            repositories::{balance::BalancePostgres, users::UserPostgres},
        },
    },
};

pub fn routes(db_pool: Arc<PgPoolSquad>, schema_detector: Arc<SchemaDetector>) -> Router {
    let user_repository = UserPostgres::new(Arc::clone(&db_pool));
    let balance_repository = BalancePostgres::new(Arc::clone(&db_pool));
    let balance_usecase = BalanceUseCase::new(
        schema_detector,
        Arc::new(user_repository),
        Arc::new(balance_repository),
    );

    Router::new()
        .route("/", post(balance))
        .route("/history", post(history))
        .with_state(Arc::new(balance_usecase))
}

pub async fn balance<U, B>(
    State(balance_usecase): State<Arc<BalanceUseCase<U, B>>>,
    TelegramAuth(telegram_user, _): TelegramAuth<NoPayload>,
) -> Result<Json<BalanceModel>, AppError>
where
    U: UserRepository + Send + Sync + 'static,
    B: BalanceRepository + Send + Sync + 'static,
{
    Ok(Json(balance_usecase.balance(telegram_user.id).await?))
}

pub async fn history<U, B>(
    State(balance_usecase): State<Arc<BalanceUseCase<U, B>>>,
    TelegramAuth(telegram_user, history_request): TelegramAuth<HistoryRequest>,
) -> Result<Json<TransactionHistoryModel>, AppError>
where
    U: UserRepository + Send + Sync + 'static,
    B: BalanceRepository + Send + Sync + 'static,
{
    let history = balance_usecase
        .history(telegram_user.id, &history_request)
        .await?;

    Ok(Json(history))
}
