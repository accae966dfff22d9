use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    pub id: String,
    pub title: String,
    pub poster_url: Option<String>,
    pub backdrop_url: Option<String>,
    pub overview: String,
    pub release_date: String,
    pub vote_average: f64,
    pub runtime_minutes: u32,
    pub tagline: String,
    pub genres: Vec<MovieGenre>,
}

/// Genre entry local to one movie. `id` is the 1-based position in that
/// movie's genre list and is unrelated to [`Genre::id`].
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct MovieGenre {
    pub id: u32,
    pub name: String,
}

/// Catalog-level genre used by the genre browsing page.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Genre {
    pub id: u32,
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CastMember {
    pub id: u32,
    pub name: String,
    pub character: String,
    pub profile_path: Option<String>,
}
