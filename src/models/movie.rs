use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::{
    fmt::Display,
    hash::{Hash, Hasher},
};

/// Catalog identifier of a movie, stable across requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MovieId(pub u64);

impl Display for MovieId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for MovieId {
    fn from(id: u64) -> Self {
        MovieId(id)
    }
}

/// A movie record as returned by the catalog
///
/// Records are immutable once fetched. Two records are equal when they share
/// an identifier, whatever the remaining fields say.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Movie {
    pub id: MovieId,
    pub title: String,
    pub poster_path: Option<String>,
    /// Average user rating on the catalog's 0-10 scale
    pub vote_average: Option<f64>,
    pub release_date: Option<NaiveDate>,
    /// Display fields the feed layer passes through untouched
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Movie {
    /// Creates a movie with only an identifier and a title
    pub fn new(id: impl Into<MovieId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            poster_path: None,
            vote_average: None,
            release_date: None,
            extra: serde_json::Map::new(),
        }
    }
}

impl PartialEq for Movie {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Movie {}

impl Hash for Movie {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_movie_equality_is_by_id() {
        let mut a = Movie::new(550, "Fight Club");
        a.vote_average = Some(8.4);
        let b = Movie::new(550, "Clube da Luta");
        assert_eq!(a, b);
        assert_ne!(a, Movie::new(551, "Fight Club"));
    }

    #[test]
    fn test_movie_hash_is_by_id() {
        let mut set = HashSet::new();
        set.insert(Movie::new(1, "One"));
        set.insert(Movie::new(1, "Uno"));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_movie_id_display() {
        assert_eq!(MovieId(27205).to_string(), "27205");
    }

    #[test]
    fn test_movie_serde_keeps_extra_fields() {
        let json = r#"{
            "id": 27205,
            "title": "A Origem",
            "poster_path": "/inception.jpg",
            "vote_average": 8.4,
            "release_date": "2010-07-15",
            "overview": "Dom Cobb é um ladrão"
        }"#;

        let movie: Movie = serde_json::from_str(json).unwrap();
        assert_eq!(movie.id, MovieId(27205));
        assert_eq!(movie.release_date, NaiveDate::from_ymd_opt(2010, 7, 15));
        assert_eq!(movie.extra["overview"], "Dom Cobb é um ladrão");

        let back = serde_json::to_value(&movie).unwrap();
        assert_eq!(back["overview"], "Dom Cobb é um ladrão");
        assert_eq!(back["id"], 27205);
    }
}
