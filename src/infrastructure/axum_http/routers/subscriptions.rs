use std::sync::Arc;

use axum::{Json, Router, extract::State, routing::post};
use chrono::Utc;

use crate::{
    application::{schema_detector::SchemaDetector, usecases::subscriptions::SubscriptionUseCase},
    auth::{NoPayload, TelegramAuth},
    domain::{
        repositories::{subscriptions::SubscriptionRepository, users::UserRepository},
        value_objects::subscriptions::{SubscriptionOverviewModel, SubscriptionSettingsModel},
    },
    infrastructure::{
        axum_http::error_responses::AppError,
        postgres::{
            postgres_connection::PgPoolSquad,
            repositories::{subscriptions::SubscriptionPostgres, users::UserPostgres},
        },
    },
};

pub fn routes(db_pool: Arc<PgPoolSquad>, schema_detector: Arc<SchemaDetector>) -> Router {
    let user_repository = UserPostgres::new(Arc::clone(&db_pool));
    let subscription_repository = SubscriptionPostgres::new(Arc::clone(&db_pool));
    let subscription_usecase = SubscriptionUseCase::new(
        schema_detector,
        Arc::new(user_repository),
        Arc::new(subscription_repository),
    );

    Router::new()
        .route("/", post(overview))
        .route("/settings", post(settings))
        .with_state(Arc::new(subscription_usecase))
}

pub async fn overview<U, S>(
    State(subscription_usecase): State<Arc<SubscriptionUseCase<U, S>>>,
    TelegramAuth(telegram_user, _): TelegramAuth<NoPayload>,
) -> Result<Json<SubscriptionOverviewModel>, AppError>
where
    U: UserRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
{
    let overview = subscription_usecase
        .overview(telegram_user.id, Utc::now())
        .await?;

    Ok(Json(overview))
}

pub async fn settings<U, S>(
    State(subscription_usecase): State<Arc<SubscriptionUseCase<U, S>>>,
    TelegramAuth(_, _): TelegramAuth<NoPayload>,
) -> Result<Json<SubscriptionSettingsModel>, AppError>
where
    U: UserRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
{
    Ok(Json(subscription_usecase.settings().await?))
}
