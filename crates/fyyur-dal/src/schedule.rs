//! Splitting shows into past and upcoming ones.
//!
//! Comparison is done on [`OffsetDateTime`] values, so shows stored with different
//! offsets still order correctly.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Anything that happens at a given instant
pub trait Scheduled {
    fn start_time(&self) -> OffsetDateTime;

    /// Show starting exactly at `now` is still upcoming
    fn is_upcoming(&self, now: OffsetDateTime) -> bool {
        self.start_time() >= now
    }
}

impl<T: Scheduled> Scheduled for &T {
    fn start_time(&self) -> OffsetDateTime {
        T::start_time(*self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShowSchedule<T> {
    pub past_shows: Vec<T>,
    pub past_shows_count: usize,
    pub upcoming_shows: Vec<T>,
    pub upcoming_shows_count: usize,
}

impl<T> ShowSchedule<T> {
    pub fn total(&self) -> usize {
        self.past_shows_count + self.upcoming_shows_count
    }
}

/// Partitions shows relative to `now`, keeping input order within each part
pub fn classify<T, I>(shows: I, now: OffsetDateTime) -> ShowSchedule<T>
where
    T: Scheduled,
    I: IntoIterator<Item = T>,
{
    let (upcoming_shows, past_shows): (Vec<T>, Vec<T>) =
        shows.into_iter().partition(|s| s.is_upcoming(now));
    ShowSchedule {
        past_shows_count: past_shows.len(),
        upcoming_shows_count: upcoming_shows.len(),
        past_shows,
        upcoming_shows,
    }
}

pub fn classify_now<T, I>(shows: I) -> ShowSchedule<T>
where
    T: Scheduled,
    I: IntoIterator<Item = T>,
{
    classify(shows, OffsetDateTime::now_utc())
}
