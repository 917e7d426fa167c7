pub mod config;
pub mod general;
pub mod genre;

pub use genre::{Genre, GenreError, Genres};
