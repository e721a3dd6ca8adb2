use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};

use crate::{
    application::schema_detector::SchemaDetector,
    domain::{
        entities::users::UserEntity, repositories::schema_catalog::MockSchemaCatalogRepository,
    },
};

pub(crate) const TELEGRAM_ID: i64 = 402_695_709;

pub(crate) fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
}

pub(crate) fn detector_with_columns(columns: &'static [&'static str]) -> Arc<SchemaDetector> {
    let mut catalog = MockSchemaCatalogRepository::new();
    catalog
        .expect_list_table_columns()
        .returning(move |_| Ok(columns.iter().map(|c| c.to_string()).collect()));

    Arc::new(SchemaDetector::new(Arc::new(catalog)))
}

pub(crate) fn default_detector() -> Arc<SchemaDetector> {
    detector_with_columns(&[
        "id",
        "telegram_id",
        "balance_kopeks",
        "subscribed_until",
        "traffic_limit_gb",
        "traffic_used_gb",
        "device_limit",
        "referral_code",
        "referred_by",
        "created_at",
    ])
}

pub(crate) fn sample_user() -> UserEntity {
    UserEntity {
        id: Some("17".to_string()),
        telegram_id: TELEGRAM_ID,
        balance_kopeks: 15_050,
        subscription_active: None,
        subscription_status: None,
        subscription_expires: Some(Utc.with_ymd_and_hms(2025, 7, 1, 0, 0, 0).unwrap()),
        traffic_limit_gb: Some(100.0),
        traffic_used_gb: Some(12.5),
        device_limit: Some(3),
        referral_code: Some("REF402".to_string()),
        referred_by: None,
        created_at: None,
    }
}
