use std::{collections::BTreeSet, fmt::Display, str::FromStr};

use phf::phf_map;
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum GenreError {
    #[error("Unknown genre: {0}")]
    Unknown(String),
    #[error("At least one genre is required")]
    Empty,
}

/// Music genre a venue hosts or an artist plays.
///
/// Variant order is the display order of a [`Genres`] set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum Genre {
    Alternative,
    Blues,
    Classical,
    Country,
    Electronic,
    Folk,
    Funk,
    #[serde(rename = "Hip-Hop")]
    HipHop,
    #[serde(rename = "Heavy Metal")]
    HeavyMetal,
    Instrumental,
    Jazz,
    #[serde(rename = "Musical Theatre")]
    MusicalTheatre,
    Pop,
    Punk,
    #[serde(rename = "R&B")]
    RnB,
    Reggae,
    #[serde(rename = "Rock n Roll")]
    RockNRoll,
    Soul,
    Other,
}

static GENRE_LOOKUP: phf::Map<&'static str, Genre> = phf_map! {
    "alternative" => Genre::Alternative,
    "blues" => Genre::Blues,
    "classical" => Genre::Classical,
    "country" => Genre::Country,
    "electronic" => Genre::Electronic,
    "folk" => Genre::Folk,
    "funk" => Genre::Funk,
    "hip-hop" => Genre::HipHop,
    "heavy metal" => Genre::HeavyMetal,
    "instrumental" => Genre::Instrumental,
    "jazz" => Genre::Jazz,
    "musical theatre" => Genre::MusicalTheatre,
    "pop" => Genre::Pop,
    "punk" => Genre::Punk,
    "r&b" => Genre::RnB,
    "reggae" => Genre::Reggae,
    "rock n roll" => Genre::RockNRoll,
    "soul" => Genre::Soul,
    "other" => Genre::Other,
};

impl Genre {
    pub const ALL: [Genre; 19] = [
        Genre::Alternative,
        Genre::Blues,
        Genre::Classical,
        Genre::Country,
        Genre::Electronic,
        Genre::Folk,
        Genre::Funk,
        Genre::HipHop,
        Genre::HeavyMetal,
        Genre::Instrumental,
        Genre::Jazz,
        Genre::MusicalTheatre,
        Genre::Pop,
        Genre::Punk,
        Genre::RnB,
        Genre::Reggae,
        Genre::RockNRoll,
        Genre::Soul,
        Genre::Other,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Genre::Alternative => "Alternative",
            Genre::Blues => "Blues",
            Genre::Classical => "Classical",
            Genre::Country => "Country",
            Genre::Electronic => "Electronic",
            Genre::Folk => "Folk",
            Genre::Funk => "Funk",
            Genre::HipHop => "Hip-Hop",
            Genre::HeavyMetal => "Heavy Metal",
            Genre::Instrumental => "Instrumental",
            Genre::Jazz => "Jazz",
            Genre::MusicalTheatre => "Musical Theatre",
            Genre::Pop => "Pop",
            Genre::Punk => "Punk",
            Genre::RnB => "R&B",
            Genre::Reggae => "Reggae",
            Genre::RockNRoll => "Rock n Roll",
            Genre::Soul => "Soul",
            Genre::Other => "Other",
        }
    }
}

impl Display for Genre {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Genre {
    type Err = GenreError;

    /// Case insensitive, surrounding whitespace is ignored
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GENRE_LOOKUP
            .get(s.trim().to_lowercase().as_str())
            .copied()
            .ok_or_else(|| GenreError::Unknown(s.to_string()))
    }
}

impl<'de> Deserialize<'de> for Genre {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}

/// Non-empty set of genres.
///
/// Serialized as a list of genre names; duplicates collapse on input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Genre>", into = "Vec<Genre>")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Genres(BTreeSet<Genre>);

impl Genres {
    pub fn new(genres: impl IntoIterator<Item = Genre>) -> Result<Self, GenreError> {
        let set: BTreeSet<Genre> = genres.into_iter().collect();
        if set.is_empty() {
            Err(GenreError::Empty)
        } else {
            Ok(Genres(set))
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Genre> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, genre: Genre) -> bool {
        self.0.contains(&genre)
    }
}

impl TryFrom<Vec<Genre>> for Genres {
    type Error = GenreError;

    fn try_from(value: Vec<Genre>) -> Result<Self, Self::Error> {
        Genres::new(value)
    }
}

impl From<Genres> for Vec<Genre> {
    fn from(value: Genres) -> Self {
        value.0.into_iter().collect()
    }
}
