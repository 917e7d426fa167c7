pub mod artist;
pub mod details;
pub mod error;
mod genres;
pub mod schedule;
pub mod show;
pub mod venue;

use std::str::FromStr as _;

pub use error::Error;
use serde::{Deserialize, Serialize};
pub use sqlx::Error as SqlxError;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

use crate::error::Result;

pub type ChosenDB = sqlx::Sqlite;
pub type ChosenRow = sqlx::sqlite::SqliteRow;
pub type Pool = sqlx::Pool<ChosenDB>;

pub const MAX_LIMIT: usize = 10_000;

pub async fn new_pool(database_url: &str) -> Result<Pool, Error> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(50)
        .connect_with(options)
        .await?;
    Ok(pool)
}

pub async fn migrate(pool: &Pool) -> Result<()> {
    sqlx::migrate!("../../migrations").run(pool).await?;
    Ok(())
}

/// Result of name search, `count` is always length of `data`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct SearchResult<T> {
    pub count: usize,
    pub data: Vec<T>,
}

impl<T> From<Vec<T>> for SearchResult<T> {
    fn from(data: Vec<T>) -> Self {
        Self {
            count: data.len(),
            data,
        }
    }
}

/// Case insensitive substring matcher on names, folds full Unicode case
pub(crate) struct NameFilter(String);

impl NameFilter {
    pub(crate) fn new(term: &str) -> Self {
        NameFilter(term.to_lowercase())
    }

    pub(crate) fn matches(&self, name: &str) -> bool {
        self.0.is_empty() || name.to_lowercase().contains(&self.0)
    }
}

/// Checks that referenced record exists, `table` is never user input
pub(crate) async fn ensure_exists<'c, E>(table: &'static str, id: i64, executor: E) -> Result<()>
where
    E: sqlx::Executor<'c, Database = ChosenDB>,
{
    let sql = format!("SELECT id FROM {table} WHERE id = ?");
    let found: Option<i64> = sqlx::query_scalar(&sql)
        .bind(id)
        .fetch_optional(executor)
        .await?;
    match found {
        Some(_) => Ok(()),
        None => Err(Error::DanglingReference { entity: table, id }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_filter() {
        assert!(NameFilter::new("").matches("Anything"));
        assert!(NameFilter::new("park").matches("Park Square Live Music & Coffee"));
        assert!(NameFilter::new("café über").matches("Café Über"));
        assert!(NameFilter::new("ÜBER").matches("café über"));
        assert!(NameFilter::new("100%_").matches("Club 100%_"));
        assert!(!NameFilter::new("100%").matches("Club 1000"));
        assert!(!NameFilter::new("jazz").matches("Blues Hall"));
    }

    #[test]
    fn test_search_result_count() {
        let res = SearchResult::from(vec!["a", "b"]);
        assert_eq!(res.count, 2);
        let empty: SearchResult<i64> = Vec::new().into();
        assert_eq!(empty.count, 0);
        assert!(empty.data.is_empty());
    }
}
