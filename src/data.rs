use crate::utils;
use sqlx::{Row, SqlitePool};
use tracing::debug;

#[async_trait::async_trait]
pub trait Table {
    type Record<'a>;

    fn get_name(&self) -> &str;
    fn get_pool(&self) -> &SqlitePool;

    async fn create(&self) -> Result<(), sqlx::Error>;
    async fn insert<'a>(&self, record: Self::Record<'a>) -> Result<(), sqlx::Error>;

    /// Creates the table unless it already exists.
    async fn ensure(&self) -> Result<(), sqlx::Error> {
        if utils::is_table_exists(self.get_pool(), self.get_name()).await? {
            debug!("Use table {}", self.get_name());
        } else {
            debug!("Create table {}", self.get_name());
            self.create().await?;
        }
        Ok(())
    }

    async fn count(&self) -> Result<u32, sqlx::Error> {
        let query = format!("SELECT COUNT(*) FROM {}", self.get_name());
        sqlx::query(&query)
            .fetch_one(self.get_pool())
            .await?
            .try_get(0)
    }
}
