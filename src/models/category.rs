use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};

use crate::error::AppError;

/// A server-defined movie list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CategoryId {
    Popular,
    TopRated,
    NowPlaying,
    Upcoming,
    /// Movies of one catalog genre
    Genre(u64),
}

impl CategoryId {
    /// Fixed display label for the built-in lists
    pub fn label(&self) -> Option<&'static str> {
        match self {
            CategoryId::Popular => Some("Populares"),
            CategoryId::TopRated => Some("Alta Avaliação"),
            CategoryId::NowPlaying => Some("Agora Em Cartaz"),
            CategoryId::Upcoming => Some("Em Breve"),
            CategoryId::Genre(_) => None,
        }
    }
}

impl Display for CategoryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CategoryId::Popular => write!(f, "popular"),
            CategoryId::TopRated => write!(f, "top-rated"),
            CategoryId::NowPlaying => write!(f, "now-playing"),
            CategoryId::Upcoming => write!(f, "upcoming"),
            CategoryId::Genre(id) => write!(f, "{}", id),
        }
    }
}

impl FromStr for CategoryId {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "popular" => Ok(CategoryId::Popular),
            "top-rated" => Ok(CategoryId::TopRated),
            "now-playing" => Ok(CategoryId::NowPlaying),
            "upcoming" => Ok(CategoryId::Upcoming),
            other => other
                .parse::<u64>()
                .map(CategoryId::Genre)
                .map_err(|_| AppError::InvalidInput(format!("Unknown category: {}", other))),
        }
    }
}

/// A catalog genre, used as a category identifier and its display name
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Genre {
    pub id: u64,
    pub name: String,
}
