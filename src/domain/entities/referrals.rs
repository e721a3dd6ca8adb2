use chrono::{DateTime, Utc};
use diesel::{
    QueryableByName,
    sql_types::{Nullable, Text},
};
use serde::Serialize;

use super::users::{status_label, subscription_is_active};
use crate::domain::value_objects::coercion::{
    non_empty, parse_bool, parse_i64, parse_timestamp,
};

/// A user invited by the caller, read from `users` through the column mapping.
#[derive(Debug, Clone, Default, PartialEq, QueryableByName)]
pub struct ReferralRow {
    #[diesel(sql_type = Nullable<Text>)]
    pub telegram_id: Option<String>,
    #[diesel(sql_type = Nullable<Text>)]
    pub first_name: Option<String>,
    #[diesel(sql_type = Nullable<Text>)]
    pub subscription_active: Option<String>,
    #[diesel(sql_type = Nullable<Text>)]
    pub subscription_expires: Option<String>,
    #[diesel(sql_type = Nullable<Text>)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReferralEntity {
    pub telegram_id: Option<i64>,
    pub first_name: Option<String>,
    pub subscription_status: String,
    pub subscribed_until: Option<DateTime<Utc>>,
    pub joined_at: Option<DateTime<Utc>>,
    #[serde(skip)]
    pub is_active: bool,
}

impl ReferralEntity {
    pub fn from_row(row: ReferralRow, now: DateTime<Utc>) -> Self {
        let subscribed_until = parse_timestamp(row.subscription_expires.as_deref());
        let is_active = subscription_is_active(
            parse_bool(row.subscription_active.as_deref()),
            subscribed_until,
            now,
        );

        Self {
            telegram_id: parse_i64(row.telegram_id.as_deref()),
            first_name: non_empty(row.first_name),
            subscription_status: status_label(is_active).to_string(),
            subscribed_until,
            joined_at: parse_timestamp(row.created_at.as_deref()),
            is_active,
        }
    }
}
