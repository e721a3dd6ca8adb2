use chrono::{DateTime, Utc};
use diesel::{
    QueryableByName,
    sql_types::{Nullable, Text},
};
use serde::Serialize;

use crate::domain::value_objects::{
    balance::kopeks_to_rubles,
    coercion::{non_empty, parse_i64, parse_timestamp},
};

#[derive(Debug, Clone, Default, QueryableByName)]
pub struct TransactionRow {
    #[diesel(sql_type = Nullable<Text>)]
    pub id: Option<String>,
    #[diesel(sql_type = Nullable<Text>)]
    pub amount_kopeks: Option<String>,
    #[diesel(sql_type = Nullable<Text>)]
    pub transaction_type: Option<String>,
    #[diesel(sql_type = Nullable<Text>)]
    pub description: Option<String>,
    #[diesel(sql_type = Nullable<Text>)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionEntity {
    pub id: Option<String>,
    pub amount_kopeks: i64,
    pub amount_rubles: f64,
    pub transaction_type: Option<String>,
    pub description: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl From<TransactionRow> for TransactionEntity {
    fn from(value: TransactionRow) -> Self {
        let amount_kopeks = parse_i64(value.amount_kopeks.as_deref()).unwrap_or(0);

        Self {
            id: non_empty(value.id),
            amount_kopeks,
            amount_rubles: kopeks_to_rubles(amount_kopeks),
            transaction_type: non_empty(value.transaction_type),
            description: non_empty(value.description),
            created_at: parse_timestamp(value.created_at.as_deref()),
        }
    }
}
