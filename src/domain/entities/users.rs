use anyhow::{Result, anyhow};
use chrono::{DateTime, Utc};
use diesel::{
    QueryableByName,
    sql_types::{Nullable, Text},
};

use crate::domain::value_objects::coercion::{
    non_empty, parse_bool, parse_f64, parse_i64, parse_timestamp,
};

/// Raw `users` row. Column aliases are the logical field names, every value
/// arrives as text.
#[derive(Debug, Clone, Default, PartialEq, QueryableByName)]
pub struct UserRow {
    #[diesel(sql_type = Nullable<Text>)]
    pub id: Option<String>,
    #[diesel(sql_type = Nullable<Text>)]
    pub telegram_id: Option<String>,
    #[diesel(sql_type = Nullable<Text>)]
    pub balance: Option<String>,
    #[diesel(sql_type = Nullable<Text>)]
    pub subscription_active: Option<String>,
    #[diesel(sql_type = Nullable<Text>)]
    pub subscription_expires: Option<String>,
    #[diesel(sql_type = Nullable<Text>)]
    pub traffic_limit: Option<String>,
    #[diesel(sql_type = Nullable<Text>)]
    pub traffic_used: Option<String>,
    #[diesel(sql_type = Nullable<Text>)]
    pub device_limit: Option<String>,
    #[diesel(sql_type = Nullable<Text>)]
    pub referral_code: Option<String>,
    #[diesel(sql_type = Nullable<Text>)]
    pub referred_by: Option<String>,
    #[diesel(sql_type = Nullable<Text>)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UserEntity {
    pub id: Option<String>,
    pub telegram_id: i64,
    pub balance_kopeks: i64,
    pub subscription_active: Option<bool>,
    /// Raw value of the activity column when it holds a status word.
    pub subscription_status: Option<String>,
    pub subscription_expires: Option<DateTime<Utc>>,
    pub traffic_limit_gb: Option<f64>,
    pub traffic_used_gb: Option<f64>,
    pub device_limit: Option<i64>,
    pub referral_code: Option<String>,
    pub referred_by: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl UserEntity {
    pub fn from_row(row: UserRow, balance_in_rubles: bool) -> Result<Self> {
        let telegram_id = parse_i64(row.telegram_id.as_deref())
            .ok_or_else(|| anyhow!("users row has no usable telegram id: {:?}", row.telegram_id))?;

        let balance_kopeks = if balance_in_rubles {
            parse_f64(row.balance.as_deref())
                .map(|rubles| (rubles * 100.0).round() as i64)
                .unwrap_or(0)
        } else {
            parse_i64(row.balance.as_deref()).unwrap_or(0)
        };

        let subscription_status = non_empty(row.subscription_active.clone())
            .filter(|raw| !is_plain_boolean(raw))
            .map(|raw| raw.to_ascii_lowercase());

        Ok(Self {
            id: non_empty(row.id),
            telegram_id,
            balance_kopeks,
            subscription_active: parse_bool(row.subscription_active.as_deref()),
            subscription_status,
            subscription_expires: parse_timestamp(row.subscription_expires.as_deref()),
            traffic_limit_gb: parse_f64(row.traffic_limit.as_deref()),
            traffic_used_gb: parse_f64(row.traffic_used.as_deref()),
            device_limit: parse_i64(row.device_limit.as_deref()),
            referral_code: non_empty(row.referral_code),
            referred_by: non_empty(row.referred_by),
            created_at: parse_timestamp(row.created_at.as_deref()),
        })
    }

    pub fn has_active_subscription(&self, now: DateTime<Utc>) -> bool {
        subscription_is_active(self.subscription_active, self.subscription_expires, now)
    }

    pub fn subscription_status_label(&self, now: DateTime<Utc>) -> String {
        match &self.subscription_status {
            Some(status) => status.clone(),
            None => status_label(self.has_active_subscription(now)).to_string(),
        }
    }
}

/// A known expiry decides; the activity flag is only consulted without one.
pub fn subscription_is_active(
    flag: Option<bool>,
    expires: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> bool {
    match expires {
        Some(expires) => expires > now,
        None => flag.unwrap_or(false),
    }
}

pub fn status_label(active: bool) -> &'static str {
    if active { "active" } else { "inactive" }
}

fn is_plain_boolean(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "t" | "f" | "true" | "false" | "1" | "0"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    fn sample_row() -> UserRow {
        UserRow {
            id: Some("17".to_string()),
            telegram_id: Some("402695709".to_string()),
            balance: Some("15000".to_string()),
            subscription_active: Some("t".to_string()),
            subscription_expires: Some("2025-07-01 00:00:00+00".to_string()),
            traffic_limit: Some("100".to_string()),
            traffic_used: Some("12.5".to_string()),
            device_limit: Some("3".to_string()),
            referral_code: Some("REF402".to_string()),
            referred_by: None,
            created_at: Some("2024-01-15 10:00:00+00".to_string()),
        }
    }

    #[test]
    fn decodes_text_row_back_into_typed_fields() {
        let user = UserEntity::from_row(sample_row(), false).unwrap();

        assert_eq!(user.id.as_deref(), Some("17"));
        assert_eq!(user.telegram_id, 402_695_709);
        assert_eq!(user.balance_kopeks, 15_000);
        assert_eq!(user.subscription_active, Some(true));
        assert_eq!(user.subscription_status, None);
        assert_eq!(
            user.subscription_expires,
            Some(Utc.with_ymd_and_hms(2025, 7, 1, 0, 0, 0).unwrap())
        );
        assert_eq!(user.traffic_limit_gb, Some(100.0));
        assert_eq!(user.traffic_used_gb, Some(12.5));
        assert_eq!(user.device_limit, Some(3));
        assert_eq!(user.referral_code.as_deref(), Some("REF402"));
        assert_eq!(user.referred_by, None);
        assert_eq!(
            user.created_at,
            Some(Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap())
        );
    }

    #[test]
    fn ruble_balances_are_converted_to_kopeks() {
        let mut row = sample_row();
        row.balance = Some("150.50".to_string());

        let user = UserEntity::from_row(row, true).unwrap();
        assert_eq!(user.balance_kopeks, 15_050);
    }

    #[test]
    fn rejects_rows_without_telegram_id() {
        let mut row = sample_row();
        row.telegram_id = None;

        assert!(UserEntity::from_row(row, false).is_err());
    }

    #[test]
    fn expiry_decides_activity_when_known() {
        let user = UserEntity::from_row(sample_row(), false).unwrap();
        assert!(user.has_active_subscription(now()));
        assert!(!user.has_active_subscription(now() + Duration::days(60)));
        assert_eq!(user.subscription_status_label(now()), "active");
    }

    #[test]
    fn flag_decides_activity_without_expiry() {
        let mut row = sample_row();
        row.subscription_expires = None;
        row.subscription_active = Some("f".to_string());

        let user = UserEntity::from_row(row, false).unwrap();
        assert!(!user.has_active_subscription(now()));
        assert_eq!(user.subscription_status_label(now()), "inactive");
    }

    #[test]
    fn status_words_are_reported_verbatim() {
        let mut row = sample_row();
        row.subscription_active = Some("TRIAL".to_string());

        let user = UserEntity::from_row(row, false).unwrap();
        assert_eq!(user.subscription_status.as_deref(), Some("trial"));
        assert_eq!(user.subscription_status_label(now()), "trial");
    }
}
