use std::time::Duration;

use anyhow::{Context, Result};
use diesel::{
    Connection, PgConnection, QueryableByName, RunQueryDsl,
    connection::CacheSize,
    r2d2::{ConnectionManager, CustomizeConnection, Error as R2d2Error, Pool},
    sql_query,
    sql_types::Text,
};

use crate::config::config_model::Database;

// Candidate statements are one-off shapes; caching their plans only grows
// the per-connection cache.
#[derive(Debug, Default)]
struct DisablePreparedStatements;

impl CustomizeConnection<PgConnection, R2d2Error> for DisablePreparedStatements {
    fn on_acquire(&self, conn: &mut PgConnection) -> std::result::Result<(), R2d2Error> {
        conn.set_prepared_statement_cache_size(CacheSize::Disabled);
        Ok(())
    }
}

pub type PgPoolSquad = Pool<ConnectionManager<PgConnection>>;

pub fn establish_connection(database: &Database) -> Result<PgPoolSquad> {
    let manager = ConnectionManager::<PgConnection>::new(&database.url);
    let pool = Pool::builder()
        .max_size(database.max_connections)
        .connection_timeout(Duration::from_millis(database.connection_timeout_ms))
        .idle_timeout(Some(Duration::from_millis(database.idle_timeout_ms)))
        .connection_customizer(Box::new(DisablePreparedStatements))
        .build(manager)
        .context("failed to build postgres pool")?;
    Ok(pool)
}

#[derive(QueryableByName)]
struct ServerTime {
    #[diesel(sql_type = Text)]
    now: String,
}

/// Runs `SELECT NOW()` and returns the server clock as text.
pub fn probe(db_pool: &PgPoolSquad) -> Result<String> {
    let mut conn = db_pool.get().context("postgres pool checkout failed")?;

    let rows = sql_query("SELECT CAST(NOW() AS TEXT) AS now").load::<ServerTime>(&mut conn)?;

    rows.into_iter()
        .next()
        .map(|row| row.now)
        .context("SELECT NOW() returned no rows")
}
