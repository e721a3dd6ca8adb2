use diesel::{
    QueryableByName,
    sql_types::{Nullable, Text},
};
use serde::Serialize;

use crate::domain::value_objects::coercion::{non_empty, parse_bool, parse_i64};

/// A VPN node. Older bots call them `servers`, Remnawave-era ones `squads`.
#[derive(Debug, Clone, Default, QueryableByName)]
pub struct ServerRow {
    #[diesel(sql_type = Nullable<Text>)]
    pub uuid: Option<String>,
    #[diesel(sql_type = Nullable<Text>)]
    pub name: Option<String>,
    #[diesel(sql_type = Nullable<Text>)]
    pub location: Option<String>,
    #[diesel(sql_type = Nullable<Text>)]
    pub country_code: Option<String>,
    #[diesel(sql_type = Nullable<Text>)]
    pub max_users: Option<String>,
    #[diesel(sql_type = Nullable<Text>)]
    pub current_users: Option<String>,
    #[diesel(sql_type = Nullable<Text>)]
    pub is_active: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServerEntity {
    pub uuid: Option<String>,
    pub name: Option<String>,
    pub location: Option<String>,
    pub country_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_users: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_users: Option<i64>,
    pub is_active: bool,
}

impl From<ServerRow> for ServerEntity {
    fn from(value: ServerRow) -> Self {
        Self {
            uuid: non_empty(value.uuid),
            name: non_empty(value.name),
            location: non_empty(value.location),
            country_code: non_empty(value.country_code),
            max_users: parse_i64(value.max_users.as_deref()),
            current_users: parse_i64(value.current_users.as_deref()),
            is_active: parse_bool(value.is_active.as_deref()).unwrap_or(false),
        }
    }
}
