use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

#[automock]
#[async_trait]
pub trait SchemaCatalogRepository {
    /// Column names of `public.<table_name>` in ordinal order. An absent or
    /// unreadable table yields an empty list, not an error.
    async fn list_table_columns(&self, table_name: &str) -> Result<Vec<String>>;
}
