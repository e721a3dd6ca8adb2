use std::{future::ready, time::Instant};

use anyhow::{Context, Result};
use diesel::{
    PgConnection, QueryableByName, RunQueryDsl,
    pg::Pg,
    query_builder::{BoxedSqlQuery, SqlQuery},
    sql_query,
    sql_types::{BigInt, Text},
};
use tracing::debug;

use crate::{
    application::query_router::{AllCandidatesFailed, CandidateHit, first_success},
    domain::value_objects::candidate_query::{CandidateQuery, CountQuery, SqlParam},
};

const LOGGED_SQL_CHARS: usize = 100;

#[derive(Debug, QueryableByName)]
pub struct ScalarRow {
    #[diesel(sql_type = BigInt)]
    pub total: i64,
}

fn bind_params(sql: &str, params: &[SqlParam]) -> BoxedSqlQuery<'static, Pg, SqlQuery> {
    params
        .iter()
        .fold(sql_query(sql.to_string()).into_boxed::<Pg>(), |query, param| {
            match param {
                SqlParam::BigInt(value) => query.bind::<BigInt, _>(*value),
                SqlParam::Text(value) => query.bind::<Text, _>(value.clone()),
            }
        })
}

fn sql_preview(sql: &str) -> String {
    let compact = sql.split_whitespace().collect::<Vec<_>>().join(" ");
    compact.chars().take(LOGGED_SQL_CHARS).collect()
}

pub fn load_rows<R>(conn: &mut PgConnection, sql: &str, params: &[SqlParam]) -> Result<Vec<R>>
where
    R: QueryableByName<Pg> + 'static,
{
    let started = Instant::now();
    let rows = bind_params(sql, params).load::<R>(conn)?;

    debug!(
        sql = %sql_preview(sql),
        elapsed_ms = started.elapsed().as_millis() as u64,
        rows = rows.len(),
        "sql_executor: query finished"
    );

    Ok(rows)
}

/// First `total` of a single-row scalar statement.
pub fn fetch_scalar(conn: &mut PgConnection, sql: &str, params: &[SqlParam]) -> Result<i64> {
    load_rows::<ScalarRow>(conn, sql, params)?
        .into_iter()
        .next()
        .map(|row| row.total)
        .context("scalar query returned no rows")
}

pub fn fetch_count(conn: &mut PgConnection, count: &CountQuery) -> Result<i64> {
    fetch_scalar(conn, &count.sql, &count.params)
}

/// Rows of a candidate plus its row count. The count falls back to the
/// number of rows when the candidate carries no count statement; a failing
/// count fails the whole candidate.
pub fn load_candidate<R>(conn: &mut PgConnection, candidate: &CandidateQuery) -> Result<(Vec<R>, i64)>
where
    R: QueryableByName<Pg> + 'static,
{
    let rows = load_rows::<R>(conn, &candidate.sql, &candidate.params)?;

    let total = match &candidate.count {
        Some(count) => fetch_count(conn, count)?,
        None => rows.len() as i64,
    };

    Ok((rows, total))
}

/// Runs `candidates` in order on one connection until a shape loads.
pub async fn run_candidates<R>(
    conn: &mut PgConnection,
    operation: &'static str,
    candidates: &[CandidateQuery],
) -> Result<CandidateHit<(Vec<R>, i64)>, AllCandidatesFailed>
where
    R: QueryableByName<Pg> + Send + 'static,
{
    first_success(operation, candidates, |candidate| {
        ready(load_candidate::<R>(conn, candidate))
    })
    .await
}

pub async fn run_scalar_candidates(
    conn: &mut PgConnection,
    operation: &'static str,
    candidates: &[CandidateQuery],
) -> Result<CandidateHit<i64>, AllCandidatesFailed> {
    first_success(operation, candidates, |candidate| {
        ready(fetch_scalar(conn, &candidate.sql, &candidate.params))
    })
    .await
}
