use chrono::{DateTime, Utc};
use diesel::{
    QueryableByName,
    sql_types::{Nullable, Text},
};
use serde::Serialize;

use crate::domain::value_objects::coercion::{non_empty, parse_timestamp};

#[derive(Debug, Clone, Default, QueryableByName)]
pub struct DeviceRow {
    #[diesel(sql_type = Nullable<Text>)]
    pub hwid: Option<String>,
    #[diesel(sql_type = Nullable<Text>)]
    pub device_name: Option<String>,
    #[diesel(sql_type = Nullable<Text>)]
    pub last_seen: Option<String>,
    #[diesel(sql_type = Nullable<Text>)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceEntity {
    pub hwid: Option<String>,
    pub device_name: Option<String>,
    pub last_seen: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
}

impl From<DeviceRow> for DeviceEntity {
    fn from(value: DeviceRow) -> Self {
        Self {
            hwid: non_empty(value.hwid),
            device_name: non_empty(value.device_name),
            last_seen: parse_timestamp(value.last_seen.as_deref()),
            created_at: parse_timestamp(value.created_at.as_deref()),
        }
    }
}
