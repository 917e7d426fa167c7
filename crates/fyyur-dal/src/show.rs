use futures::{StreamExt as _, TryStreamExt as _};
use garde::Validate;
use serde::{Deserialize, Serialize};
use sqlx::{Acquire, Executor, Pool};
use time::{OffsetDateTime, UtcOffset};
use tracing::debug;

use crate::{
    ensure_exists,
    error::{Error, Result},
    schedule::Scheduled,
    ChosenDB,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Show {
    pub id: i64,
    pub venue_id: i64,
    pub artist_id: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub start_time: OffsetDateTime,
}

impl Scheduled for Show {
    fn start_time(&self) -> OffsetDateTime {
        self.start_time
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Validate)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CreateShow {
    #[garde(range(min = 1))]
    pub venue_id: i64,
    #[garde(range(min = 1))]
    pub artist_id: i64,
    #[serde(with = "time::serde::rfc3339")]
    #[garde(skip)]
    pub start_time: OffsetDateTime,
}

/// Show joined with names of its venue and artist
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ShowListing {
    pub id: i64,
    pub venue_id: i64,
    pub venue_name: String,
    pub artist_id: i64,
    pub artist_name: String,
    pub artist_image_link: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub start_time: OffsetDateTime,
}

impl Scheduled for ShowListing {
    fn start_time(&self) -> OffsetDateTime {
        self.start_time
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct ShowSlot {
    pub venue_id: i64,
    pub start_time: OffsetDateTime,
}

impl Scheduled for ShowSlot {
    fn start_time(&self) -> OffsetDateTime {
        self.start_time
    }
}

fn chronological<T: Scheduled>(records: &mut [T], id: impl Fn(&T) -> i64) {
    records.sort_by_key(|r| (r.start_time(), id(r)));
}

pub type ShowRepository = ShowRepositoryImpl<Pool<ChosenDB>>;

pub struct ShowRepositoryImpl<E> {
    executor: E,
}

impl<'c, E> ShowRepositoryImpl<E>
where
    for<'a> &'a E: Executor<'c, Database = ChosenDB> + Acquire<'c, Database = ChosenDB>,
{
    pub fn new(executor: E) -> Self {
        Self { executor }
    }

    /// Both venue and artist must exist, otherwise nothing is stored
    pub async fn create(&self, payload: CreateShow) -> Result<Show> {
        let start_time = payload.start_time.to_offset(UtcOffset::UTC);
        let mut transaction = self.executor.begin().await?;
        ensure_exists("venue", payload.venue_id, &mut *transaction).await?;
        ensure_exists("artist", payload.artist_id, &mut *transaction).await?;

        let result =
            sqlx::query("INSERT INTO show (venue_id, artist_id, start_time) VALUES (?, ?, ?)")
                .bind(payload.venue_id)
                .bind(payload.artist_id)
                .bind(start_time)
                .execute(&mut *transaction)
                .await?;

        let id = result.last_insert_rowid();
        let record = get(id, &mut *transaction).await?;
        transaction.commit().await?;
        debug!(
            "Created show {id} of artist {} in venue {}",
            record.artist_id, record.venue_id
        );
        Ok(record)
    }

    pub async fn get(&self, id: i64) -> Result<Show> {
        get(id, &self.executor).await
    }

    pub async fn count(&self) -> Result<u64> {
        let count: u64 = sqlx::query_scalar("SELECT count(*) FROM show")
            .fetch_one(&self.executor)
            .await?;
        Ok(count)
    }

    /// All shows with venue and artist names, oldest first.
    /// `julianday` compares instants, stored text may differ in format.
    pub async fn list_all(&self) -> Result<Vec<ShowListing>> {
        let records = sqlx::query_as::<_, ShowListing>(
            "SELECT s.id, s.venue_id, v.name as venue_name, s.artist_id, a.name as artist_name, \
             a.image_link as artist_image_link, s.start_time \
             FROM show s \
             JOIN venue v ON s.venue_id = v.id \
             JOIN artist a ON s.artist_id = a.id \
             ORDER BY julianday(s.start_time), s.id",
        )
        .fetch(&self.executor)
        .take(crate::MAX_LIMIT)
        .try_collect::<Vec<_>>()
        .await?;
        Ok(records)
    }
}

async fn get<'c, E>(id: i64, executor: E) -> Result<Show>
where
    E: sqlx::Executor<'c, Database = ChosenDB>,
{
    sqlx::query_as::<_, Show>(
        "SELECT id, venue_id, artist_id, start_time FROM show WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(executor)
    .await?
    .ok_or_else(|| Error::not_found("Show", id))
}

pub(crate) async fn list_for_venue<'c, E>(venue_id: i64, executor: E) -> Result<Vec<Show>>
where
    E: sqlx::Executor<'c, Database = ChosenDB>,
{
    let mut records = sqlx::query_as::<_, Show>(
        "SELECT id, venue_id, artist_id, start_time FROM show WHERE venue_id = ?",
    )
    .bind(venue_id)
    .fetch_all(executor)
    .await?;
    chronological(&mut records, |s| s.id);
    Ok(records)
}

pub(crate) async fn list_for_artist<'c, E>(artist_id: i64, executor: E) -> Result<Vec<Show>>
where
    E: sqlx::Executor<'c, Database = ChosenDB>,
{
    let mut records = sqlx::query_as::<_, Show>(
        "SELECT id, venue_id, artist_id, start_time FROM show WHERE artist_id = ?",
    )
    .bind(artist_id)
    .fetch_all(executor)
    .await?;
    chronological(&mut records, |s| s.id);
    Ok(records)
}

pub(crate) async fn all_slots<'c, E>(executor: E) -> Result<Vec<ShowSlot>>
where
    E: sqlx::Executor<'c, Database = ChosenDB>,
{
    let records = sqlx::query_as::<_, ShowSlot>("SELECT venue_id, start_time FROM show")
        .fetch_all(executor)
        .await?;
    Ok(records)
}
