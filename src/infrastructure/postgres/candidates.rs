//! Candidate query catalogs, most common bot schema first.
//!
//! Every selected value is cast to `TEXT` and aliased to the field name of
//! the row type that decodes it, so one row type serves every shape.

use crate::domain::{
    entities::users::UserEntity,
    value_objects::{
        balance::HistoryPage,
        candidate_query::{CandidateQuery, SqlParam},
        column_mapping::{ColumnMapping, SchemaError, USERS_TABLE, quote_ident},
        enums::user_fields::UserField,
        referrals::REFERRAL_LIST_LIMIT,
    },
};

const DEVICE_COLUMNS: &str = "CAST(d.hwid AS TEXT) AS hwid, \
     CAST(d.device_name AS TEXT) AS device_name, \
     CAST(d.last_seen AS TEXT) AS last_seen, \
     CAST(d.created_at AS TEXT) AS created_at";

const SERVER_COLUMNS: &str = "CAST(s.uuid AS TEXT) AS uuid, \
     CAST(s.name AS TEXT) AS name, \
     CAST(s.location AS TEXT) AS location, \
     CAST(s.country_code AS TEXT) AS country_code, \
     CAST(s.max_users AS TEXT) AS max_users, \
     CAST(s.current_users AS TEXT) AS current_users, \
     CAST(s.is_active AS TEXT) AS is_active";

// Link tables only carry the membership, capacity columns are not selected.
const LINKED_SERVER_COLUMNS: &str = "CAST(s.uuid AS TEXT) AS uuid, \
     CAST(s.name AS TEXT) AS name, \
     CAST(s.location AS TEXT) AS location, \
     CAST(s.country_code AS TEXT) AS country_code, \
     NULL::TEXT AS max_users, \
     NULL::TEXT AS current_users, \
     CAST(s.is_active AS TEXT) AS is_active";

const TRANSACTION_COLUMNS: &str = "CAST(t.id AS TEXT) AS id, \
     CAST(t.amount_kopeks AS TEXT) AS amount_kopeks, \
     CAST(t.transaction_type AS TEXT) AS transaction_type, \
     CAST(t.description AS TEXT) AS description, \
     CAST(t.created_at AS TEXT) AS created_at";

pub fn user_by_telegram_id(
    mapping: &ColumnMapping,
    telegram_id: i64,
) -> Result<Vec<CandidateQuery>, SchemaError> {
    let select = mapping.user_select_list("u");
    let telegram_column = mapping.qualified(UserField::TelegramId, "u")?;

    Ok(vec![
        CandidateQuery::new(
            "users.telegram_id_bigint",
            format!("SELECT {select} FROM {USERS_TABLE} u WHERE {telegram_column} = $1 LIMIT 1"),
            vec![SqlParam::BigInt(telegram_id)],
        ),
        CandidateQuery::new(
            "users.telegram_id_text",
            format!(
                "SELECT {select} FROM {USERS_TABLE} u \
                 WHERE CAST({telegram_column} AS TEXT) = $1 LIMIT 1"
            ),
            vec![SqlParam::Text(telegram_id.to_string())],
        ),
    ])
}

pub fn user_devices(
    mapping: &ColumnMapping,
    telegram_id: i64,
) -> Result<Vec<CandidateQuery>, SchemaError> {
    let telegram_column = mapping.qualified(UserField::TelegramId, "u")?;
    let order = "ORDER BY d.last_seen DESC NULLS LAST";

    let mut candidates = vec![
        CandidateQuery::new(
            "user_devices.user_telegram_id",
            format!(
                "SELECT {DEVICE_COLUMNS} FROM user_devices d \
                 WHERE d.user_telegram_id = $1 {order}"
            ),
            vec![SqlParam::BigInt(telegram_id)],
        ),
        CandidateQuery::new(
            "devices.user_telegram_id",
            format!(
                "SELECT {DEVICE_COLUMNS} FROM devices d \
                 WHERE d.user_telegram_id = $1 {order}"
            ),
            vec![SqlParam::BigInt(telegram_id)],
        ),
        CandidateQuery::new(
            "devices.telegram_id",
            format!("SELECT {DEVICE_COLUMNS} FROM devices d WHERE d.telegram_id = $1 {order}"),
            vec![SqlParam::BigInt(telegram_id)],
        ),
    ];

    if let Some(id_column) = internal_id_column(mapping) {
        candidates.push(CandidateQuery::new(
            "devices.user_id_join_users",
            format!(
                "SELECT {DEVICE_COLUMNS} FROM devices d \
                 INNER JOIN {USERS_TABLE} u ON d.user_id = {id_column} \
                 WHERE {telegram_column} = $1 {order}"
            ),
            vec![SqlParam::BigInt(telegram_id)],
        ));
    }

    Ok(candidates)
}

pub fn user_servers(telegram_id: i64) -> Vec<CandidateQuery> {
    vec![
        CandidateQuery::new(
            "subscription_servers.servers",
            format!(
                "SELECT {LINKED_SERVER_COLUMNS} FROM subscription_servers ss \
                 INNER JOIN servers s ON ss.server_uuid = s.uuid \
                 WHERE ss.user_telegram_id = $1"
            ),
            vec![SqlParam::BigInt(telegram_id)],
        ),
        CandidateQuery::new(
            "subscription_squads.squads",
            format!(
                "SELECT {LINKED_SERVER_COLUMNS} FROM subscription_squads ss \
                 INNER JOIN squads s ON ss.squad_uuid = s.uuid \
                 WHERE ss.user_telegram_id = $1"
            ),
            vec![SqlParam::BigInt(telegram_id)],
        ),
    ]
}

pub fn available_servers() -> Vec<CandidateQuery> {
    vec![
        CandidateQuery::new(
            "servers.active",
            format!("SELECT {SERVER_COLUMNS} FROM servers s WHERE s.is_active = true ORDER BY s.location"),
            Vec::new(),
        ),
        CandidateQuery::new(
            "squads.active",
            format!("SELECT {SERVER_COLUMNS} FROM squads s WHERE s.is_active = true ORDER BY s.location"),
            Vec::new(),
        ),
    ]
}

pub fn subscription_periods() -> Vec<CandidateQuery> {
    vec![CandidateQuery::new(
        "subscription_periods.active",
        "SELECT CAST(p.id AS TEXT) AS id, \
         CAST(p.name AS TEXT) AS name, \
         CAST(p.days AS TEXT) AS days, \
         CAST(p.price_kopeks AS TEXT) AS price_kopeks, \
         CAST(p.is_active AS TEXT) AS is_active \
         FROM subscription_periods p WHERE p.is_active = true ORDER BY p.days",
        Vec::new(),
    )]
}

pub fn balance_history(
    mapping: &ColumnMapping,
    telegram_id: i64,
    page: HistoryPage,
) -> Result<Vec<CandidateQuery>, SchemaError> {
    let telegram_column = mapping.qualified(UserField::TelegramId, "u")?;
    let paged = |telegram_id| {
        vec![
            SqlParam::BigInt(telegram_id),
            SqlParam::BigInt(page.limit),
            SqlParam::BigInt(page.offset),
        ]
    };

    let mut candidates = vec![
        CandidateQuery::new(
            "balance_transactions.user_telegram_id",
            format!(
                "SELECT {TRANSACTION_COLUMNS} FROM balance_transactions t \
                 WHERE t.user_telegram_id = $1 \
                 ORDER BY t.created_at DESC LIMIT $2 OFFSET $3"
            ),
            paged(telegram_id),
        )
        .with_count(
            "SELECT COUNT(*) AS total FROM balance_transactions t WHERE t.user_telegram_id = $1",
            vec![SqlParam::BigInt(telegram_id)],
        ),
    ];

    if let Some(id_column) = internal_id_column(mapping) {
        candidates.push(
            CandidateQuery::new(
                "transactions.user_id_join_users",
                format!(
                    "SELECT CAST(t.id AS TEXT) AS id, \
                     CAST(t.amount_kopeks AS TEXT) AS amount_kopeks, \
                     CAST(t.type AS TEXT) AS transaction_type, \
                     CAST(t.description AS TEXT) AS description, \
                     CAST(t.created_at AS TEXT) AS created_at \
                     FROM transactions t INNER JOIN {USERS_TABLE} u ON t.user_id = {id_column} \
                     WHERE {telegram_column} = $1 \
                     ORDER BY t.created_at DESC LIMIT $2 OFFSET $3"
                ),
                paged(telegram_id),
            )
            .with_count(
                format!(
                    "SELECT COUNT(*) AS total FROM transactions t \
                     INNER JOIN {USERS_TABLE} u ON t.user_id = {id_column} \
                     WHERE {telegram_column} = $1"
                ),
                vec![SqlParam::BigInt(telegram_id)],
            ),
        );
    }

    candidates.push(
        CandidateQuery::new(
            "balance_history.user_telegram_id",
            format!(
                "SELECT {TRANSACTION_COLUMNS} FROM balance_history t \
                 WHERE t.user_telegram_id = $1 \
                 ORDER BY t.created_at DESC LIMIT $2 OFFSET $3"
            ),
            paged(telegram_id),
        )
        .with_count(
            "SELECT COUNT(*) AS total FROM balance_history t WHERE t.user_telegram_id = $1",
            vec![SqlParam::BigInt(telegram_id)],
        ),
    );

    Ok(candidates)
}

/// Users invited by `referrer`. The code shape binds text, so a numeric
/// `referred_by` column rejects it and the id shape takes over.
pub fn referrals(mapping: &ColumnMapping, referrer: &UserEntity) -> Vec<CandidateQuery> {
    let Some(referred_by) = mapping.column(UserField::ReferredBy) else {
        return Vec::new();
    };
    let referred_by = format!("u.{}", quote_ident(referred_by));

    let first_name = if mapping.has_column("first_name") {
        "CAST(u.\"first_name\" AS TEXT) AS first_name".to_string()
    } else {
        "NULL::TEXT AS first_name".to_string()
    };
    let order = match mapping.column(UserField::CreatedAt) {
        Some(column) => format!("ORDER BY u.{} DESC NULLS LAST", quote_ident(column)),
        None => String::new(),
    };
    let select = [
        mapping.select_expr(UserField::TelegramId, "u"),
        first_name,
        mapping.select_expr(UserField::SubscriptionActive, "u"),
        mapping.select_expr(UserField::SubscriptionExpires, "u"),
        mapping.select_expr(UserField::CreatedAt, "u"),
    ]
    .join(", ");

    let list_sql = format!(
        "SELECT {select} FROM {USERS_TABLE} u WHERE {referred_by} = $1 {order} LIMIT {REFERRAL_LIST_LIMIT}"
    );
    let count_sql = format!("SELECT COUNT(*) AS total FROM {USERS_TABLE} u WHERE {referred_by} = $1");

    let mut candidates = Vec::with_capacity(2);

    if let Some(code) = &referrer.referral_code {
        let params = vec![SqlParam::Text(code.clone())];
        candidates.push(
            CandidateQuery::new("users.referred_by_code", list_sql.clone(), params.clone())
                .with_count(count_sql.clone(), params),
        );
    }

    let params = vec![SqlParam::BigInt(referrer_key(referrer))];
    candidates.push(
        CandidateQuery::new("users.referred_by_id", list_sql, params.clone())
            .with_count(count_sql, params),
    );

    candidates
}

pub fn referral_earnings(
    mapping: &ColumnMapping,
    referrer: &UserEntity,
) -> Result<Vec<CandidateQuery>, SchemaError> {
    let telegram_column = mapping.qualified(UserField::TelegramId, "u")?;

    let mut candidates = vec![CandidateQuery::new(
        "referral_earnings.user_telegram_id",
        "SELECT CAST(COALESCE(SUM(e.amount_kopeks), 0) AS BIGINT) AS total \
         FROM referral_earnings e WHERE e.user_telegram_id = $1",
        vec![SqlParam::BigInt(referrer.telegram_id)],
    )];

    if let Some(id_column) = internal_id_column(mapping) {
        candidates.push(CandidateQuery::new(
            "referral_earnings.user_id_join_users",
            format!(
                "SELECT CAST(COALESCE(SUM(e.amount_kopeks), 0) AS BIGINT) AS total \
                 FROM referral_earnings e INNER JOIN {USERS_TABLE} u ON e.user_id = {id_column} \
                 WHERE {telegram_column} = $1"
            ),
            vec![SqlParam::BigInt(referrer.telegram_id)],
        ));
    }

    if let (Some(referred_by), Some(code)) = (
        mapping.column(UserField::ReferredBy),
        referrer.referral_code.as_ref(),
    ) {
        candidates.push(CandidateQuery::new(
            "users.total_earned_kopeks",
            format!(
                "SELECT CAST(COALESCE(SUM(u.total_earned_kopeks), 0) AS BIGINT) AS total \
                 FROM {USERS_TABLE} u WHERE u.{} = $1",
                quote_ident(referred_by)
            ),
            vec![SqlParam::Text(code.clone())],
        ));
    }

    Ok(candidates)
}

/// `u."id"` when the table has an internal id. Join shapes need it.
fn internal_id_column(mapping: &ColumnMapping) -> Option<String> {
    mapping.qualified(UserField::Id, "u").ok()
}

/// Internal id when it is numeric, the telegram id otherwise.
fn referrer_key(referrer: &UserEntity) -> i64 {
    referrer
        .id
        .as_deref()
        .and_then(|id| id.parse().ok())
        .unwrap_or(referrer.telegram_id)
}
