use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};

pub mod category;
pub mod movie;
pub mod tracked_set;

pub use category::{CategoryId, Genre};
pub use movie::{Movie, MovieId};
pub use tracked_set::TrackedSet;

// ============================================================================
// TMDB API Types
// ============================================================================

/// One page of movie results from TMDB list endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct ApiMoviePage {
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub results: Vec<ApiMovie>,
    #[serde(default)]
    pub total_pages: Option<u32>,
}

/// Raw movie record from TMDB
#[derive(Debug, Clone, Deserialize)]
pub struct ApiMovie {
    pub id: u64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub original_title: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    /// TMDB sends an empty string for unreleased or unknown dates
    #[serde(default, deserialize_with = "deserialize_release_date")]
    pub release_date: Option<NaiveDate>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl From<ApiMovie> for Movie {
    fn from(api: ApiMovie) -> Self {
        // Fall back to the original title when no localized one exists
        let title = api
            .title
            .filter(|t| !t.is_empty())
            .or(api.original_title.clone())
            .unwrap_or_default();

        let mut extra = api.extra;
        if let Some(original_title) = api.original_title {
            extra.insert(
                "original_title".to_string(),
                serde_json::Value::String(original_title),
            );
        }

        Movie {
            id: MovieId(api.id),
            title,
            poster_path: api.poster_path,
            vote_average: api.vote_average,
            release_date: api.release_date,
            extra,
        }
    }
}

/// Response from TMDB /genre/movie/list
#[derive(Debug, Clone, Deserialize)]
pub struct ApiGenreList {
    #[serde(default)]
    pub genres: Vec<Genre>,
}

fn deserialize_release_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw
        .filter(|s| !s.trim().is_empty())
        .and_then(|s| NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok()))
}
