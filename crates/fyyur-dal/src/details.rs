//! Detail views of a venue or an artist, with shows joined to the other side.
//!
//! Aggregation itself is pure, repositories load the inputs (see
//! [`crate::venue::VenueRepositoryImpl::details`]).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    artist::{Artist, ArtistSummary},
    error::{Error, Result},
    schedule::{classify, Scheduled},
    show::Show,
    venue::{Venue, VenueSummary},
};

/// Show as listed on venue page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ShowWithArtist {
    pub artist_id: i64,
    pub artist_name: String,
    pub artist_image_link: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub start_time: OffsetDateTime,
}

impl Scheduled for ShowWithArtist {
    fn start_time(&self) -> OffsetDateTime {
        self.start_time
    }
}

/// Show as listed on artist page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ShowWithVenue {
    pub venue_id: i64,
    pub venue_name: String,
    pub venue_image_link: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub start_time: OffsetDateTime,
}

impl Scheduled for ShowWithVenue {
    fn start_time(&self) -> OffsetDateTime {
        self.start_time
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct VenueDetails {
    #[serde(flatten)]
    pub venue: Venue,
    pub past_shows: Vec<ShowWithArtist>,
    pub past_shows_count: usize,
    pub upcoming_shows: Vec<ShowWithArtist>,
    pub upcoming_shows_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ArtistDetails {
    #[serde(flatten)]
    pub artist: Artist,
    pub past_shows: Vec<ShowWithVenue>,
    pub past_shows_count: usize,
    pub upcoming_shows: Vec<ShowWithVenue>,
    pub upcoming_shows_count: usize,
}

/// Joins venue's shows with their artists and splits them by `now`.
///
/// `shows` are the venue's shows in display order. Artist of every show must be
/// in `artists`, otherwise [`Error::DanglingReference`] is returned.
pub fn aggregate_venue_details(
    venue: Venue,
    shows: Vec<Show>,
    artists: &HashMap<i64, ArtistSummary>,
    now: OffsetDateTime,
) -> Result<VenueDetails> {
    let shows = shows
        .into_iter()
        .map(|s| {
            let artist = artists.get(&s.artist_id).ok_or(Error::DanglingReference {
                entity: "artist",
                id: s.artist_id,
            })?;
            Ok(ShowWithArtist {
                artist_id: artist.id,
                artist_name: artist.name.clone(),
                artist_image_link: artist.image_link.clone(),
                start_time: s.start_time,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let schedule = classify(shows, now);
    Ok(VenueDetails {
        venue,
        past_shows: schedule.past_shows,
        past_shows_count: schedule.past_shows_count,
        upcoming_shows: schedule.upcoming_shows,
        upcoming_shows_count: schedule.upcoming_shows_count,
    })
}

pub fn aggregate_artist_details(
    artist: Artist,
    shows: Vec<Show>,
    venues: &HashMap<i64, VenueSummary>,
    now: OffsetDateTime,
) -> Result<ArtistDetails> {
    let shows = shows
        .into_iter()
        .map(|s| {
            let venue = venues.get(&s.venue_id).ok_or(Error::DanglingReference {
                entity: "venue",
                id: s.venue_id,
            })?;
            Ok(ShowWithVenue {
                venue_id: venue.id,
                venue_name: venue.name.clone(),
                venue_image_link: venue.image_link.clone(),
                start_time: s.start_time,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let schedule = classify(shows, now);
    Ok(ArtistDetails {
        artist,
        past_shows: schedule.past_shows,
        past_shows_count: schedule.past_shows_count,
        upcoming_shows: schedule.upcoming_shows,
        upcoming_shows_count: schedule.upcoming_shows_count,
    })
}

#[cfg(test)]
mod tests {
    use fyyur_types::{Genre, Genres};
    use time::macros::datetime;

    use super::*;

    fn venue() -> Venue {
        Venue {
            id: 1,
            name: "The Dueling Pianos Bar".into(),
            city: "New York".into(),
            state: "NY".into(),
            address: "335 Delancey Street".into(),
            phone: Some("914-003-1132".into()),
            image_link: None,
            facebook_link: None,
            website_link: None,
            seeking_talent: false,
            seeking_description: None,
            genres: Genres::new([Genre::Classical, Genre::RnB]).unwrap(),
        }
    }

    fn artist() -> Artist {
        Artist {
            id: 4,
            name: "Guns N Petals".into(),
            city: "San Francisco".into(),
            state: "CA".into(),
            phone: None,
            image_link: Some("https://images.example.com/petals.jpg".into()),
            facebook_link: None,
            website_link: None,
            seeking_venue: true,
            seeking_description: Some("Looking for shows in the Bay Area".into()),
            genres: Genres::new([Genre::RockNRoll]).unwrap(),
        }
    }

    fn show(id: i64, venue_id: i64, artist_id: i64, start_time: OffsetDateTime) -> Show {
        Show {
            id,
            venue_id,
            artist_id,
            start_time,
        }
    }

    fn artists() -> HashMap<i64, ArtistSummary> {
        HashMap::from([(
            4,
            ArtistSummary {
                id: 4,
                name: "Guns N Petals".into(),
                image_link: Some("https://images.example.com/petals.jpg".into()),
            },
        )])
    }

    #[test]
    fn test_venue_details() {
        let shows = vec![
            show(1, 1, 4, datetime!(2000-01-01 0:00 UTC)),
            show(2, 1, 4, datetime!(2999-01-01 0:00 UTC)),
        ];
        let details =
            aggregate_venue_details(venue(), shows, &artists(), datetime!(2024-01-01 0:00 UTC))
                .unwrap();
        assert_eq!(details.past_shows_count, 1);
        assert_eq!(details.upcoming_shows_count, 1);
        assert_eq!(details.past_shows[0].artist_name, "Guns N Petals");
        assert_eq!(
            details.upcoming_shows[0].start_time,
            datetime!(2999-01-01 0:00 UTC)
        );
        assert_eq!(details.venue.name, "The Dueling Pianos Bar");
    }

    #[test]
    fn test_venue_dangling_artist() {
        let shows = vec![show(1, 1, 99, datetime!(2000-01-01 0:00 UTC))];
        let res = aggregate_venue_details(venue(), shows, &artists(), OffsetDateTime::now_utc());
        assert!(matches!(
            res,
            Err(Error::DanglingReference {
                entity: "artist",
                id: 99
            })
        ));
    }

    #[test]
    fn test_artist_details() {
        let venues = HashMap::from([(
            1,
            VenueSummary {
                id: 1,
                name: "The Dueling Pianos Bar".into(),
                image_link: None,
            },
        )]);
        let shows = vec![
            show(1, 1, 4, datetime!(2019-06-15 23:00 UTC)),
            show(2, 1, 4, datetime!(2035-04-01 20:00 UTC)),
            show(3, 1, 4, datetime!(2035-04-08 20:00 UTC)),
        ];
        let details =
            aggregate_artist_details(artist(), shows, &venues, datetime!(2025-01-01 0:00 UTC))
                .unwrap();
        assert_eq!(details.past_shows_count, 1);
        assert_eq!(details.upcoming_shows_count, 2);
        assert_eq!(details.upcoming_shows[1].venue_name, "The Dueling Pianos Bar");

        let missing = aggregate_artist_details(
            artist(),
            vec![show(4, 2, 4, datetime!(2035-04-01 20:00 UTC))],
            &venues,
            datetime!(2025-01-01 0:00 UTC),
        );
        assert!(matches!(
            missing,
            Err(Error::DanglingReference { entity: "venue", id: 2 })
        ));
    }

    #[test]
    fn test_details_serialization() {
        let details = aggregate_venue_details(
            venue(),
            vec![show(1, 1, 4, datetime!(2999-01-01 20:00 UTC))],
            &artists(),
            datetime!(2024-01-01 0:00 UTC),
        )
        .unwrap();
        let json = serde_json::to_value(&details).unwrap();
        assert_eq!(json["name"], "The Dueling Pianos Bar");
        assert_eq!(json["genres"], serde_json::json!(["Classical", "R&B"]));
        assert_eq!(json["upcoming_shows_count"], 1);
        assert_eq!(
            json["upcoming_shows"][0]["start_time"],
            "2999-01-01T20:00:00Z"
        );
    }
}
