use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use diesel::{QueryableByName, sql_types::Text};

use crate::{
    domain::{
        repositories::schema_catalog::SchemaCatalogRepository,
        value_objects::candidate_query::SqlParam,
    },
    infrastructure::postgres::{postgres_connection::PgPoolSquad, sql_executor::load_rows},
};

const TABLE_COLUMNS_SQL: &str = "SELECT CAST(column_name AS TEXT) AS column_name \
     FROM information_schema.columns \
     WHERE table_schema = 'public' AND table_name = $1 \
     ORDER BY ordinal_position";

#[derive(Debug, QueryableByName)]
struct ColumnNameRow {
    #[diesel(sql_type = Text)]
    column_name: String,
}

pub struct SchemaCatalogPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl SchemaCatalogPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl SchemaCatalogRepository for SchemaCatalogPostgres {
    async fn list_table_columns(&self, table_name: &str) -> Result<Vec<String>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let rows = load_rows::<ColumnNameRow>(
            &mut conn,
            TABLE_COLUMNS_SQL,
            &[SqlParam::Text(table_name.to_string())],
        )?;

        Ok(rows.into_iter().map(|row| row.column_name).collect())
    }
}
