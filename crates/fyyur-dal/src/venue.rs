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
use tracing::debug;

use crate::{
    details::{aggregate_venue_details, VenueDetails},
    error::{Error, Result},
    genres,
    schedule::Scheduled as _,
    ChosenDB, SearchResult,
};

/// Payload for both create and edit, edit replaces all fields
#[derive(Debug, Serialize, Deserialize, Clone, Validate)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CreateVenue {
    #[garde(length(min = 1, max = 120))]
    pub name: String,
    #[garde(length(min = 1, max = 120))]
    pub city: String,
    #[garde(custom(is_valid_state))]
    pub state: String,
    #[garde(length(min = 1, max = 120))]
    pub address: String,
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
    pub seeking_talent: bool,
    #[garde(length(min = 1, max = 5000), custom(required_if(&self.seeking_talent)))]
    pub seeking_description: Option<String>,
    #[garde(skip)]
    pub genres: Genres,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Venue {
    pub id: i64,
    pub name: String,
    pub city: String,
    pub state: String,
    pub address: String,
    pub phone: Option<String>,
    pub image_link: Option<String>,
    pub facebook_link: Option<String>,
    pub website_link: Option<String>,
    pub seeking_talent: bool,
    pub seeking_description: Option<String>,
    pub genres: Genres,
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct VenueInt {
    id: i64,
    name: String,
    city: String,
    state: String,
    address: String,
    phone: Option<String>,
    image_link: Option<String>,
    facebook_link: Option<String>,
    website_link: Option<String>,
    seeking_talent: bool,
    seeking_description: Option<String>,
    genres: String,
}

impl TryFrom<VenueInt> for Venue {
    type Error = Error;

    fn try_from(value: VenueInt) -> Result<Self> {
        let genres = genres::decode(&value.genres, value.id)?;
        Ok(Self {
            id: value.id,
            name: value.name,
            city: value.city,
            state: value.state,
            address: value.address,
            phone: value.phone,
            image_link: value.image_link,
            facebook_link: value.facebook_link,
            website_link: value.website_link,
            seeking_talent: value.seeking_talent,
            seeking_description: value.seeking_description,
            genres,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct VenueShort {
    pub id: i64,
    pub name: String,
}

/// Venue fields displayed next to an artist's show
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct VenueSummary {
    pub id: i64,
    pub name: String,
    pub image_link: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct AreaVenue {
    pub id: i64,
    pub name: String,
    pub num_upcoming_shows: usize,
}

/// Venues sharing the same city and state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Area {
    pub city: String,
    pub state: String,
    pub venues: Vec<AreaVenue>,
}

#[derive(Debug, sqlx::FromRow)]
struct AreaRow {
    id: i64,
    name: String,
    city: String,
    state: String,
}

fn group_by_area(rows: Vec<AreaRow>, upcoming: &HashMap<i64, usize>) -> Vec<Area> {
    let mut areas: Vec<Area> = Vec::new();
    for row in rows {
        let venue = AreaVenue {
            id: row.id,
            name: row.name,
            num_upcoming_shows: upcoming.get(&row.id).copied().unwrap_or(0),
        };
        match areas.last_mut() {
            Some(area) if area.city == row.city && area.state == row.state => {
                area.venues.push(venue)
            }
            _ => areas.push(Area {
                city: row.city,
                state: row.state,
                venues: vec![venue],
            }),
        }
    }
    areas
}

type SqliteQuery<'q> = sqlx::query::Query<'q, ChosenDB, SqliteArguments<'q>>;

fn bind_payload<'q>(query: SqliteQuery<'q>, payload: &'q CreateVenue, genres: String) -> SqliteQuery<'q> {
    query
        .bind(&payload.name)
        .bind(&payload.city)
        .bind(&payload.state)
        .bind(&payload.address)
        .bind(&payload.phone)
        .bind(&payload.image_link)
        .bind(&payload.facebook_link)
        .bind(&payload.website_link)
        .bind(payload.seeking_talent)
        .bind(&payload.seeking_description)
        .bind(genres)
}

pub type VenueRepository = VenueRepositoryImpl<Pool<ChosenDB>>;

pub struct VenueRepositoryImpl<E> {
    executor: E,
}

impl<'c, E> VenueRepositoryImpl<E>
where
    for<'a> &'a E: Executor<'c, Database = ChosenDB> + Acquire<'c, Database = ChosenDB>,
{
    pub fn new(executor: E) -> Self {
        Self { executor }
    }

    pub async fn create(&self, payload: CreateVenue) -> Result<Venue> {
        let genres = genres::encode(&payload.genres)?;
        let mut transaction = self.executor.begin().await?;
        let result = bind_payload(
            sqlx::query(
                "INSERT INTO venue (name, city, state, address, phone, image_link, facebook_link, \
                 website_link, seeking_talent, seeking_description, genres) \
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            ),
            &payload,
            genres,
        )
        .execute(&mut *transaction)
        .await?;

        let id = result.last_insert_rowid();
        let record = get(id, &mut *transaction).await?;
        transaction.commit().await?;
        debug!("Created venue {id}");
        Ok(record)
    }

    pub async fn update(&self, id: i64, payload: CreateVenue) -> Result<Venue> {
        let genres = genres::encode(&payload.genres)?;
        let mut transaction = self.executor.begin().await?;
        let result = bind_payload(
            sqlx::query(
                "UPDATE venue SET name = ?, city = ?, state = ?, address = ?, phone = ?, \
                 image_link = ?, facebook_link = ?, website_link = ?, seeking_talent = ?, \
                 seeking_description = ?, genres = ? WHERE id = ?",
            ),
            &payload,
            genres,
        )
        .bind(id)
        .execute(&mut *transaction)
        .await?;

        if result.rows_affected() == 0 {
            return Err(Error::not_found("Venue", id));
        }
        let record = get(id, &mut *transaction).await?;
        transaction.commit().await?;
        Ok(record)
    }

    /// Venue with shows cannot be deleted
    pub async fn delete(&self, id: i64) -> Result<()> {
        let mut transaction = self.executor.begin().await?;
        let count: u64 = sqlx::query_scalar("SELECT count(*) FROM show WHERE venue_id = ?")
            .bind(id)
            .fetch_one(&mut *transaction)
            .await?;
        if count > 0 {
            debug!("Refusing to delete venue {id} with {count} shows");
            return Err(Error::HasDependents {
                entity: "Venue",
                id,
                count,
            });
        }

        let res = sqlx::query("DELETE FROM venue WHERE id = ?")
            .bind(id)
            .execute(&mut *transaction)
            .await?;
        if res.rows_affected() == 0 {
            Err(Error::not_found("Venue", id))
        } else {
            transaction.commit().await?;
            Ok(())
        }
    }

    pub async fn get(&self, id: i64) -> Result<Venue> {
        get(id, &self.executor).await
    }

    pub async fn find(&self, id: i64) -> Result<Option<Venue>> {
        find(id, &self.executor).await
    }

    pub async fn count(&self) -> Result<u64> {
        let count: u64 = sqlx::query_scalar("SELECT count(*) FROM venue")
            .fetch_one(&self.executor)
            .await?;
        Ok(count)
    }

    pub async fn list_all(&self) -> Result<Vec<VenueShort>> {
        let records = sqlx::query_as::<_, VenueShort>("SELECT id, name FROM venue ORDER BY id")
            .fetch(&self.executor)
            .take(crate::MAX_LIMIT)
            .try_collect::<Vec<_>>()
            .await?;
        Ok(records)
    }

    /// Case insensitive substring search on name, empty term matches all
    pub async fn search(&self, term: &str) -> Result<SearchResult<VenueShort>> {
        let filter = crate::NameFilter::new(term);
        let records = sqlx::query_as::<_, VenueShort>("SELECT id, name FROM venue ORDER BY name, id")
            .fetch(&self.executor)
            .try_filter(|r| futures::future::ready(filter.matches(&r.name)))
            .take(crate::MAX_LIMIT)
            .try_collect::<Vec<_>>()
            .await?;
        Ok(records.into())
    }

    /// Venues grouped by (city, state), each with its number of upcoming shows
    pub async fn list_by_area(&self, now: OffsetDateTime) -> Result<Vec<Area>> {
        let mut transaction = self.executor.begin().await?;
        let rows = sqlx::query_as::<_, AreaRow>(
            "SELECT id, name, city, state FROM venue ORDER BY state, city, name, id",
        )
        .fetch_all(&mut *transaction)
        .await?;
        let slots = crate::show::all_slots(&mut *transaction).await?;
        transaction.commit().await?;

        let mut upcoming: HashMap<i64, usize> = HashMap::new();
        for slot in slots.iter().filter(|s| s.is_upcoming(now)) {
            *upcoming.entry(slot.venue_id).or_default() += 1;
        }
        Ok(group_by_area(rows, &upcoming))
    }

    /// Venue with its shows split to past and upcoming relative to `now`
    pub async fn details(&self, id: i64, now: OffsetDateTime) -> Result<VenueDetails> {
        let mut transaction = self.executor.begin().await?;
        let venue = get(id, &mut *transaction).await?;
        let shows = crate::show::list_for_venue(id, &mut *transaction).await?;
        let artist_ids: BTreeSet<i64> = shows.iter().map(|s| s.artist_id).collect();
        let artists = crate::artist::summaries(&artist_ids, &mut *transaction).await?;
        transaction.commit().await?;

        aggregate_venue_details(venue, shows, &artists, now)
    }
}

async fn find<'c, E>(id: i64, executor: E) -> Result<Option<Venue>>
where
    E: sqlx::Executor<'c, Database = ChosenDB>,
{
    let record = sqlx::query_as::<_, VenueInt>(
        "SELECT id, name, city, state, address, phone, image_link, facebook_link, website_link, \
         seeking_talent, seeking_description, genres FROM venue WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(executor)
    .await?;
    record.map(Venue::try_from).transpose()
}

async fn get<'c, E>(id: i64, executor: E) -> Result<Venue>
where
    E: sqlx::Executor<'c, Database = ChosenDB>,
{
    find(id, executor)
        .await?
        .ok_or_else(|| Error::not_found("Venue", id))
}

/// Display fields of venues, looked up in one query
pub(crate) async fn summaries<'c, E>(
    ids: &BTreeSet<i64>,
    executor: E,
) -> Result<HashMap<i64, VenueSummary>>
where
    E: sqlx::Executor<'c, Database = ChosenDB>,
{
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let mut builder =
        sqlx::QueryBuilder::<ChosenDB>::new("SELECT id, name, image_link FROM venue WHERE id IN (");
    let mut separated = builder.separated(", ");
    for id in ids {
        separated.push_bind(*id);
    }
    separated.push_unseparated(")");
    let records = builder
        .build_query_as::<VenueSummary>()
        .fetch_all(executor)
        .await?;
    Ok(records.into_iter().map(|v| (v.id, v)).collect())
}
