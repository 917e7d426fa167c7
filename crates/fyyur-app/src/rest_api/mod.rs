pub mod artist;
pub mod genre;
mod macros;
pub mod show;
pub mod venue;

use garde::Validate;
use serde::Deserialize;
use time::OffsetDateTime;

/// Form submitted by search box, empty term matches everything
#[derive(Debug, Deserialize, Validate)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct SearchForm {
    #[serde(default)]
    #[garde(length(max = 120))]
    pub search_term: String,
}

/// Reference instant for splitting shows to past and upcoming, defaults to current time
#[derive(Debug, Deserialize, Default)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams))]
pub struct DetailsQuery {
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub at: Option<OffsetDateTime>,
}

impl DetailsQuery {
    pub fn at(&self) -> OffsetDateTime {
        self.at.unwrap_or_else(OffsetDateTime::now_utc)
    }
}
