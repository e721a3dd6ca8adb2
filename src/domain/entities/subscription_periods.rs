use diesel::{
    QueryableByName,
    sql_types::{Nullable, Text},
};
use serde::Serialize;

use crate::domain::value_objects::coercion::{non_empty, parse_bool, parse_i64};

#[derive(Debug, Clone, Default, QueryableByName)]
pub struct SubscriptionPeriodRow {
    #[diesel(sql_type = Nullable<Text>)]
    pub id: Option<String>,
    #[diesel(sql_type = Nullable<Text>)]
    pub name: Option<String>,
    #[diesel(sql_type = Nullable<Text>)]
    pub days: Option<String>,
    #[diesel(sql_type = Nullable<Text>)]
    pub price_kopeks: Option<String>,
    #[diesel(sql_type = Nullable<Text>)]
    pub is_active: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubscriptionPeriodEntity {
    pub id: Option<String>,
    pub name: Option<String>,
    pub days: Option<i64>,
    pub price_kopeks: Option<i64>,
    pub is_active: bool,
}

impl From<SubscriptionPeriodRow> for SubscriptionPeriodEntity {
    fn from(value: SubscriptionPeriodRow) -> Self {
        Self {
            id: non_empty(value.id),
            name: non_empty(value.name),
            days: parse_i64(value.days.as_deref()),
            price_kopeks: parse_i64(value.price_kopeks.as_deref()),
            is_active: parse_bool(value.is_active.as_deref()).unwrap_or(false),
        }
    }
}
