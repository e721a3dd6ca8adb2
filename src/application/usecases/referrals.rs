use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;

use crate::{
    application::{
        errors::MiniAppError, schema_detector::SchemaDetector,
        usecases::current_user::load_current_user,
    },
    domain::{
        entities::referrals::ReferralEntity,
        repositories::{referrals::ReferralRepository, users::UserRepository},
        value_objects::{balance::kopeks_to_rubles, referrals::ReferralOverviewModel},
    },
};

pub struct ReferralUseCase<U, R>
where
    U: UserRepository + Send + Sync + 'static,
    R: ReferralRepository + Send + Sync + 'static,
{
    schema_detector: Arc<SchemaDetector>,
    user_repository: Arc<U>,
    referral_repository: Arc<R>,
}

impl<U, R> ReferralUseCase<U, R>
where
    U: UserRepository + Send + Sync + 'static,
    R: ReferralRepository + Send + Sync + 'static,
{
    pub fn new(
        schema_detector: Arc<SchemaDetector>,
        user_repository: Arc<U>,
        referral_repository: Arc<R>,
    ) -> Self {
        Self {
            schema_detector,
            user_repository,
            referral_repository,
        }
    }

    /// Active referrals are counted over the listed rows only, so the count
    /// never exceeds the list limit.
    pub async fn overview(
        &self,
        telegram_id: i64,
        now: DateTime<Utc>,
    ) -> Result<ReferralOverviewModel, MiniAppError> {
        let (mapping, user) =
            load_current_user(&self.schema_detector, self.user_repository.as_ref(), telegram_id)
                .await?;

        let page = self
            .referral_repository
            .list_referrals(&mapping, &user)
            .await?;
        let total_earned_kopeks = self
            .referral_repository
            .total_earned_kopeks(&mapping, &user)
            .await?;

        let listed = page.items.len() as i64;
        let referrals: Vec<ReferralEntity> = page
            .items
            .into_iter()
            .map(|row| ReferralEntity::from_row(row, now))
            .collect();
        let active_referrals = referrals.iter().filter(|r| r.is_active).count() as i64;
        let total_referrals = page.total.max(listed);

        info!(
            telegram_id,
            total_referrals, active_referrals, total_earned_kopeks, "referrals: overview loaded"
        );

        Ok(ReferralOverviewModel {
            success: true,
            referral_code: user.referral_code,
            total_referrals,
            active_referrals,
            total_earned_kopeks,
            total_earned_rubles: kopeks_to_rubles(total_earned_kopeks),
            referrals,
        })
    }
}
