use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::warn;

use crate::{
    application::query_router::or_default,
    domain::{
        entities::{referrals::ReferralRow, users::UserEntity},
        repositories::referrals::ReferralRepository,
        value_objects::{column_mapping::ColumnMapping, referrals::ReferralPage},
    },
    infrastructure::postgres::{
        candidates,
        postgres_connection::PgPoolSquad,
        sql_executor::{run_candidates, run_scalar_candidates},
    },
};

pub struct ReferralPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl ReferralPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl ReferralRepository for ReferralPostgres {
    async fn list_referrals(
        &self,
        mapping: &ColumnMapping,
        referrer: &UserEntity,
    ) -> Result<ReferralPage> {
        let candidates = candidates::referrals(mapping, referrer);
        if candidates.is_empty() {
            warn!(
                telegram_id = referrer.telegram_id,
                "referrals: users has no referred_by column, nothing to list"
            );
            return Ok(ReferralPage::default());
        }

        let mut conn = Arc::clone(&self.db_pool)
            .get()
            .context("postgres pool checkout failed for `referrals`")?;

        let (items, total) =
            or_default(run_candidates::<ReferralRow>(&mut conn, "referrals", &candidates).await);

        Ok(ReferralPage { items, total })
    }

    async fn total_earned_kopeks(
        &self,
        mapping: &ColumnMapping,
        referrer: &UserEntity,
    ) -> Result<i64> {
        let candidates = match candidates::referral_earnings(mapping, referrer) {
            Ok(candidates) => candidates,
            Err(err) => {
                warn!(error = %err, "referrals: earnings lookup cannot be built");
                return Ok(0);
            }
        };

        let mut conn = Arc::clone(&self.db_pool)
            .get()
            .context("postgres pool checkout failed for `referral_earnings`")?;

        Ok(or_default(
            run_scalar_candidates(&mut conn, "referral_earnings", &candidates).await,
        ))
    }
}
