use serde::Serialize;

use crate::domain::entities::referrals::{ReferralEntity, ReferralRow};

pub const REFERRAL_LIST_LIMIT: i64 = 100;

/// Raw rows; activity is judged by the caller against its own clock.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReferralPage {
    pub items: Vec<ReferralRow>,
    pub total: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReferralOverviewModel {
    pub success: bool,
    pub referral_code: Option<String>,
    pub total_referrals: i64,
    pub active_referrals: i64,
    pub total_earned_kopeks: i64,
    pub total_earned_rubles: f64,
    pub referrals: Vec<ReferralEntity>,
}
