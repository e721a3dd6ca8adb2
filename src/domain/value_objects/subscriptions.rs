use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::entities::{
    devices::DeviceEntity, servers::ServerEntity,
    subscription_periods::SubscriptionPeriodEntity,
};

pub const TRAFFIC_OPTIONS_GB: [i64; 5] = [50, 100, 200, 500, 1000];
pub const DEVICE_LIMIT_OPTIONS: [i64; 5] = [1, 2, 3, 5, 10];
pub const DEFAULT_DEVICE_LIMIT: i64 = 1;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubscriptionOverviewModel {
    pub success: bool,
    pub user: SubscriptionUserModel,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubscriptionUserModel {
    pub telegram_id: i64,
    pub has_active_subscription: bool,
    pub subscription_status: String,
    pub subscribed_until: Option<DateTime<Utc>>,
    pub traffic_limit_gb: f64,
    pub traffic_used_gb: f64,
    pub device_limit: i64,
    pub balance_kopeks: i64,
    pub referral_code: Option<String>,
    pub servers: Vec<ServerEntity>,
    pub devices: Vec<DeviceEntity>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubscriptionSettingsModel {
    pub success: bool,
    pub settings: SubscriptionSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubscriptionSettings {
    pub available_servers: Vec<ServerEntity>,
    pub available_periods: Vec<SubscriptionPeriodEntity>,
    pub traffic_options: Vec<i64>,
    pub device_limits: Vec<i64>,
}
