use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::{
    application::{
        errors::MiniAppError, schema_detector::SchemaDetector,
        usecases::current_user::load_current_user,
    },
    domain::{
        repositories::{subscriptions::SubscriptionRepository, users::UserRepository},
        value_objects::subscriptions::{
            DEFAULT_DEVICE_LIMIT, DEVICE_LIMIT_OPTIONS, SubscriptionOverviewModel,
            SubscriptionSettings, SubscriptionSettingsModel, SubscriptionUserModel,
            TRAFFIC_OPTIONS_GB,
        },
    },
};

pub struct SubscriptionUseCase<U, S>
where
    U: UserRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
{
    schema_detector: Arc<SchemaDetector>,
    user_repository: Arc<U>,
    subscription_repository: Arc<S>,
}

impl<U, S> SubscriptionUseCase<U, S>
where
    U: UserRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
{
    pub fn new(
        schema_detector: Arc<SchemaDetector>,
        user_repository: Arc<U>,
        subscription_repository: Arc<S>,
    ) -> Self {
        Self {
            schema_detector,
            user_repository,
            subscription_repository,
        }
    }

    pub async fn overview(
        &self,
        telegram_id: i64,
        now: DateTime<Utc>,
    ) -> Result<SubscriptionOverviewModel, MiniAppError> {
        info!(telegram_id, "subscriptions: overview requested");

        let (mapping, user) =
            load_current_user(&self.schema_detector, self.user_repository.as_ref(), telegram_id)
                .await?;

        let servers = self
            .subscription_repository
            .list_user_servers(telegram_id)
            .await?;
        let devices = self
            .subscription_repository
            .list_user_devices(&mapping, telegram_id)
            .await?;

        debug!(
            telegram_id,
            servers = servers.len(),
            devices = devices.len(),
            "subscriptions: side tables loaded"
        );

        let has_active_subscription = user.has_active_subscription(now);

        Ok(SubscriptionOverviewModel {
            success: true,
            user: SubscriptionUserModel {
                telegram_id: user.telegram_id,
                has_active_subscription,
                subscription_status: user.subscription_status_label(now),
                subscribed_until: user.subscription_expires,
                traffic_limit_gb: user.traffic_limit_gb.unwrap_or(0.0),
                traffic_used_gb: user.traffic_used_gb.unwrap_or(0.0),
                device_limit: user
                    .device_limit
                    .filter(|limit| *limit > 0)
                    .unwrap_or(DEFAULT_DEVICE_LIMIT),
                balance_kopeks: user.balance_kopeks,
                referral_code: user.referral_code,
                servers,
                devices,
            },
        })
    }

    pub async fn settings(&self) -> Result<SubscriptionSettingsModel, MiniAppError> {
        let available_servers = self.subscription_repository.list_available_servers().await?;
        let available_periods = self
            .subscription_repository
            .list_subscription_periods()
            .await?;

        Ok(SubscriptionSettingsModel {
            success: true,
            settings: SubscriptionSettings {
                available_servers,
                available_periods,
                traffic_options: TRAFFIC_OPTIONS_GB.to_vec(),
                device_limits: DEVICE_LIMIT_OPTIONS.to_vec(),
            },
        })
    }
}
