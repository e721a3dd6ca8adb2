use std::sync::Arc;

use axum::{Json, Router, extract::State, routing::post};
use chrono::Utc;

use crate::{
    application::{schema_detector::SchemaDetector, usecases::referrals::ReferralUseCase},
    auth::{NoPayload, TelegramAuth},
    domain::{
        repositories::{referrals::ReferralRepository, users::UserRepository},
        value_objects::referrals::ReferralOverviewModel,
    },
    infrastructure::{
        axum_http::error_responses::AppError,
        postgres::{
            postgres_connection::PgPoolSquad,
            repositories::{referrals::ReferralPostgres, users::UserPostgres},
        },
    },
};

pub fn routes(db_pool: Arc<PgPoolSquad>, schema_detector: Arc<SchemaDetector>) -> Router {
    let user_repository = UserPostgres::new(Arc::clone(&db_pool));
    let referral_repository = ReferralPostgres::new(Arc::clone(&db_pool));
    let referral_usecase = ReferralUseCase::new(
        schema_detector,
        Arc::new(user_repository),
        Arc::new(referral_repository),
    );

    Router::new()
        .route("/", post(overview))
        .with_state(Arc::new(referral_usecase))
}

pub async fn overview<U, R>(
    State(referral_usecase): State<Arc<ReferralUseCase<U, R>>>,
    TelegramAuth(telegram_user, _): TelegramAuth<NoPayload>,
) -> Result<Json<ReferralOverviewModel>, AppError>
where
    U: UserRepository + Send + Sync + 'static,
    R: ReferralRepository + Send + Sync + 'static,
{
    let overview = referral_usecase
        .overview(telegram_user.id, Utc::now())
        .await?;

    Ok(Json(overview))
}
