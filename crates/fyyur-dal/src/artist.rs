use std::collections::{BTreeSet, HashMap};

use futures::{StreamExt as _, TryStreamExt as _};
use fyyur_types::{
    general::{is_valid_state, required_if},
    Genres,
};
use garde::Validate;
use serde::{Deserialize, Serialize};
use sqlx::{sqlite::SqliteArguments, Acquire, Executor, Pool};
use time::OffsetDateTime;

use crate::{
    details::{aggregate_artist_details, ArtistDetails},
    error::{Error, Result},
    genres, ChosenDB, SearchResult,
};

#[derive(Debug, Serialize, Deserialize, Clone, Validate)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CreateArtist {
    #[garde(length(min = 1, max = 120))]
    pub name: String,
    #[garde(length(min = 1, max = 120))]
    pub city: String,
    #[garde(custom(is_valid_state))]
    pub state: String,
    #[garde(pattern(r"^\d{3}-\d{3}-\d{4}$"))]
    pub phone: Option<String>,
    #[garde(url, length(max = 500))]
    pub image_link: Option<String>,
    #[garde(url, length(max = 500))]
    pub facebook_link: Option<String>,
    #[garde(url, length(max = 500))]
    pub website_link: Option<String>,
    #[serde(default)]
    #[garde(skip)]
    pub seeking_venue: bool,
    #[garde(length(min = 1, max = 5000), custom(required_if(&self.seeking_venue)))]
    pub seeking_description: Option<String>,
    #[garde(skip)]
    pub genres: Genres,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Artist {
    pub id: i64,
    pub name: String,
    pub city: String,
    pub state: String,
    pub phone: Option<String>,
    pub image_link: Option<String>,
    pub facebook_link: Option<String>,
    pub website_link: Option<String>,
    pub seeking_venue: bool,
    pub seeking_description: Option<String>,
    pub genres: Genres,
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct ArtistInt {
    id: i64,
    name: String,
    city: String,
    state: String,
    phone: Option<String>,
    image_link: Option<String>,
    facebook_link: Option<String>,
    website_link: Option<String>,
    seeking_venue: bool,
    seeking_description: Option<String>,
    genres: String,
}

impl TryFrom<ArtistInt> for Artist {
    type Error = Error;

    fn try_from(value: ArtistInt) -> Result<Self> {
        let genres = genres::decode(&value.genres, value.id)?;
        Ok(Self {
            id: value.id,
            name: value.name,
            city: value.city,
            state: value.state,
            phone: value.phone,
            image_link: value.image_link,
            facebook_link: value.facebook_link,
            website_link: value.website_link,
            seeking_venue: value.seeking_venue,
            seeking_description: value.seeking_description,
            genres,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ArtistShort {
    pub id: i64,
    pub name: String,
}

/// Artist fields displayed next to a venue's show
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ArtistSummary {
    pub id: i64,
    pub name: String,
    pub image_link: Option<String>,
}

type SqliteQuery<'q> = sqlx::query::Query<'q, ChosenDB, SqliteArguments<'q>>;

fn bind_payload<'q>(
    query: SqliteQuery<'q>,
    payload: &'q CreateArtist,
    genres: String,
) -> SqliteQuery<'q> {
    query
        .bind(&payload.name)
        .bind(&payload.city)
        .bind(&payload.state)
        .bind(&payload.phone)
        .bind(&payload.image_link)
        .bind(&payload.facebook_link)
        .bind(&payload.website_link)
        .bind(payload.seeking_venue)
        .bind(&payload.seeking_description)
        .bind(genres)
}

pub type ArtistRepository = ArtistRepositoryImpl<Pool<ChosenDB>>;

pub struct ArtistRepositoryImpl<E> {
    executor: E,
}

impl<'c, E> ArtistRepositoryImpl<E>
where
    for<'a> &'a E: Executor<'c, Database = ChosenDB> + Acquire<'c, Database = ChosenDB>,
{
    pub fn new(executor: E) -> Self {
        Self { executor }
    }

    pub async fn create(&self, payload: CreateArtist) -> Result<Artist> {
        let genres = genres::encode(&payload.genres)?;
        let mut transaction = self.executor.begin().await?;
        let result = bind_payload(
            sqlx::query(
                "INSERT INTO artist (name, city, state, phone, image_link, facebook_link, \
                 website_link, seeking_venue, seeking_description, genres) \
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            ),
            &payload,
            genres,
        )
        .execute(&mut *transaction)
        .await?;

        let id = result.last_insert_rowid();
        let record = get(id, &mut *transaction).await?;
        transaction.commit().await?;
        Ok(record)
    }

    pub async fn update(&self, id: i64, payload: CreateArtist) -> Result<Artist> {
        let genres = genres::encode(&payload.genres)?;
        let mut transaction = self.executor.begin().await?;
        let result = bind_payload(
            sqlx::query(
                "UPDATE artist SET name = ?, city = ?, state = ?, phone = ?, image_link = ?, \
                 facebook_link = ?, website_link = ?, seeking_venue = ?, seeking_description = ?, \
                 genres = ? WHERE id = ?",
            ),
            &payload,
            genres,
        )
        .bind(id)
        .execute(&mut *transaction)
        .await?;

        if result.rows_affected() == 0 {
            return Err(Error::not_found("Artist", id));
        }
        let record = get(id, &mut *transaction).await?;
        transaction.commit().await?;
        Ok(record)
    }

    /// Artist with shows cannot be deleted
    pub async fn delete(&self, id: i64) -> Result<()> {
        let mut transaction = self.executor.begin().await?;
        let count: u64 = sqlx::query_scalar("SELECT count(*) FROM show WHERE artist_id = ?")
            .bind(id)
            .fetch_one(&mut *transaction)
            .await?;
        if count > 0 {
            return Err(Error::HasDependents {
                entity: "Artist",
                id,
                count,
            });
        }

        let res = sqlx::query("DELETE FROM artist WHERE id = ?")
            .bind(id)
            .execute(&mut *transaction)
            .await?;
        if res.rows_affected() == 0 {
            Err(Error::not_found("Artist", id))
        } else {
            transaction.commit().await?;
            Ok(())
        }
    }

    pub async fn get(&self, id: i64) -> Result<Artist> {
        get(id, &self.executor).await
    }

    pub async fn find(&self, id: i64) -> Result<Option<Artist>> {
        find(id, &self.executor).await
    }

    pub async fn count(&self) -> Result<u64> {
        let count: u64 = sqlx::query_scalar("SELECT count(*) FROM artist")
            .fetch_one(&self.executor)
            .await?;
        Ok(count)
    }

    pub async fn list_all(&self) -> Result<Vec<ArtistShort>> {
        let records = sqlx::query_as::<_, ArtistShort>("SELECT id, name FROM artist ORDER BY id")
            .fetch(&self.executor)
            .take(crate::MAX_LIMIT)
            .try_collect::<Vec<_>>()
            .await?;
        Ok(records)
    }

    pub async fn search(&self, term: &str) -> Result<SearchResult<ArtistShort>> {
        let filter = crate::NameFilter::new(term);
        let records = sqlx::query_as::<_, ArtistShort>("SELECT id, name FROM artist ORDER BY name, id")
            .fetch(&self.executor)
            .try_filter(|r| futures::future::ready(filter.matches(&r.name)))
            .take(crate::MAX_LIMIT)
            .try_collect::<Vec<_>>()
            .await?;
        Ok(records.into())
    }

    pub async fn details(&self, id: i64, now: OffsetDateTime) -> Result<ArtistDetails> {
        let mut transaction = self.executor.begin().await?;
        let artist = get(id, &mut *transaction).await?;
        let shows = crate::show::list_for_artist(id, &mut *transaction).await?;
        let venue_ids: BTreeSet<i64> = shows.iter().map(|s| s.venue_id).collect();
        let venues = crate::venue::summaries(&venue_ids, &mut *transaction).await?;
        transaction.commit().await?;

        aggregate_artist_details(artist, shows, &venues, now)
    }
}

async fn find<'c, E>(id: i64, executor: E) -> Result<Option<Artist>>
where
    E: sqlx::Executor<'c, Database = ChosenDB>,
{
    let record = sqlx::query_as::<_, ArtistInt>(
        "SELECT id, name, city, state, phone, image_link, facebook_link, website_link, \
         seeking_venue, seeking_description, genres FROM artist WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(executor)
    .await?;
    record.map(Artist::try_from).transpose()
}

async fn get<'c, E>(id: i64, executor: E) -> Result<Artist>
where
    E: sqlx::Executor<'c, Database = ChosenDB>,
{
    find(id, executor)
        .await?
        .ok_or_else(|| Error::not_found("Artist", id))
}

pub(crate) async fn summaries<'c, E>(
    ids: &BTreeSet<i64>,
    executor: E,
) -> Result<HashMap<i64, ArtistSummary>>
where
    E: sqlx::Executor<'c, Database = ChosenDB>,
{
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let mut builder = sqlx::QueryBuilder::<ChosenDB>::new(
        "SELECT id, name, image_link FROM artist WHERE id IN (",
    );
    let mut separated = builder.separated(", ");
    for id in ids {
        separated.push_bind(*id);
    }
    separated.push_unseparated(")");
    let records = builder
        .build_query_as::<ArtistSummary>()
        .fetch_all(executor)
        .await?;
    Ok(records.into_iter().map(|a| (a.id, a)).collect())
}
