use serde::{Deserialize, Serialize};

use crate::domain::entities::transactions::TransactionEntity;

pub const DEFAULT_HISTORY_LIMIT: i64 = 50;
pub const MAX_HISTORY_LIMIT: i64 = 100;

pub fn kopeks_to_rubles(kopeks: i64) -> f64 {
    kopeks as f64 / 100.0
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BalanceModel {
    pub success: bool,
    pub balance_kopeks: i64,
    pub balance_rubles: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HistoryRequest {
    #[serde(default = "default_history_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

impl Default for HistoryRequest {
    fn default() -> Self {
        Self {
            limit: DEFAULT_HISTORY_LIMIT,
            offset: 0,
        }
    }
}

fn default_history_limit() -> i64 {
    DEFAULT_HISTORY_LIMIT
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryPage {
    pub limit: i64,
    pub offset: i64,
}

impl From<&HistoryRequest> for HistoryPage {
    fn from(value: &HistoryRequest) -> Self {
        Self {
            limit: value.limit.clamp(1, MAX_HISTORY_LIMIT),
            offset: value.offset.max(0),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionPage {
    pub items: Vec<TransactionEntity>,
    pub total: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionHistoryModel {
    pub success: bool,
    pub transactions: Vec<TransactionEntity>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}
