use futures::future;
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::models::{CastMember, Genre, Movie, MovieGenre};
use crate::omdb::{OmdbApi, RawTitle, UpstreamError};

const NO_OVERVIEW: &str = "No overview available.";
const CAST_CHARACTER: &str = "Actor";
const NOT_AVAILABLE: &str = "N/A";
const SEARCH_LIMIT: usize = 10;
const GENRE_SEARCH_LIMIT: usize = 8;
const POPULAR_COUNT: usize = 12;
const MAX_IN_FLIGHT: usize = 16;
const FALLBACK_KEYWORD: &str = "movie";

/// The provider has no "popular" or "all" listing, so the home page works
/// from this fixed list. Order here is the display order.
pub const CURATED_IDS: &[&str] = &[
    "tt0111161", // The Shawshank Redemption
    "tt0068646", // The Godfather
    "tt0468569", // The Dark Knight
    "tt0110912", // Pulp Fiction
    "tt0109830", // Forrest Gump
    "tt0137523", // Fight Club
    "tt0167260", // The Lord of the Rings: The Return of the King
    "tt0120737", // The Lord of the Rings: The Fellowship of the Ring
    "tt0080684", // Star Wars: The Empire Strikes Back
    "tt0816692", // Interstellar
    "tt1375666", // Inception
    "tt0133093", // The Matrix
    "tt0099685", // Goodfellas
    "tt0073486", // One Flew Over the Cuckoo's Nest
    "tt0047478", // Seven Samurai
    "tt0317248", // City of God
    "tt0076759", // Star Wars: A New Hope
    "tt0114369", // Se7en
    "tt0102926", // The Silence of the Lambs
    "tt0038650", // It's a Wonderful Life
    "tt0361748", // Inglourious Basterds
    "tt0482571", // The Prestige
    "tt0407887", // The Departed
    "tt0172495", // Gladiator
    "tt4154796", // Avengers: Endgame
    "tt6751668", // Parasite
    "tt4633694", // Spider-Man: Into the Spider-Verse
    "tt2380307", // Coco
    "tt0993846", // The Wolf of Wall Street
    "tt0088763", // Back to the Future
    "tt0108052", // Schindler's List
    "tt0095327", // Grave of the Fireflies
    "tt0103064", // Terminator 2: Judgment Day
    "tt0054215", // Psycho
    "tt0120689", // The Green Mile
    "tt0245429", // Spirited Away
    "tt0120815", // Saving Private Ryan
    "tt3896198", // Guardians of the Galaxy Vol. 2
    "tt4154756", // Avengers: Infinity War
];

const GENRES: [(u32, &str); 15] = [
    (1, "Action"),
    (2, "Adventure"),
    (3, "Animation"),
    (4, "Biography"),
    (5, "Comedy"),
    (6, "Crime"),
    (7, "Drama"),
    (8, "Family"),
    (9, "Fantasy"),
    (10, "Horror"),
    (11, "Mystery"),
    (12, "Romance"),
    (13, "Sci-Fi"),
    (14, "Thriller"),
    (15, "War"),
];

/// Normalizes provider payloads into [`Movie`] records.
///
/// Public operations never fail: upstream outages, misses and a missing API
/// key all come back as empty lists or `None`, with the cause logged.
#[derive(Clone)]
pub struct Catalog {
    omdb: Arc<dyn OmdbApi>,
}

impl Catalog {
    pub fn new(omdb: Arc<dyn OmdbApi>) -> Self {
        Self { omdb }
    }

    pub async fn list_all_movies(&self) -> Vec<Movie> {
        let ids = CURATED_IDS.iter().map(|id| id.to_string()).collect();
        self.movies_by_ids(ids, None).await
    }

    pub async fn list_popular_movies(&self) -> Vec<Movie> {
        let ids = CURATED_IDS[..POPULAR_COUNT]
            .iter()
            .map(|id| id.to_string())
            .collect();
        self.movies_by_ids(ids, None).await
    }

    pub async fn search_movies(&self, query: &str) -> Vec<Movie> {
        if query.trim().is_empty() {
            return Vec::new();
        }
        self.try_search(query, SEARCH_LIMIT, None)
            .await
            .unwrap_or_else(|e| {
                log_failure("search", query, &e);
                Vec::new()
            })
    }

    pub async fn get_movie_details(&self, id: &str) -> Option<Movie> {
        match self.omdb.lookup(id).await {
            Ok(raw) => Some(to_movie(id, &raw)),
            Err(e) => {
                log_failure("movie details", id, &e);
                None
            }
        }
    }

    /// The provider has no credits endpoint; the cast comes from the same
    /// detail lookup as [`Catalog::get_movie_details`].
    pub async fn get_movie_credits(&self, id: &str) -> Vec<CastMember> {
        match self.omdb.lookup(id).await {
            Ok(raw) => to_cast(&raw),
            Err(e) => {
                log_failure("movie credits", id, &e);
                Vec::new()
            }
        }
    }

    pub fn list_genres(&self) -> Vec<Genre> {
        GENRES
            .iter()
            .map(|(id, name)| Genre {
                id: *id,
                name: name.to_string(),
            })
            .collect()
    }

    /// Keyword search standing in for a genre filter. Hits are kept only when
    /// their genre text contains the keyword, case-insensitively.
    pub async fn list_movies_by_genre(&self, genre_id: u32) -> Vec<Movie> {
        let keyword = genre_keyword(genre_id);
        self.try_search(keyword, GENRE_SEARCH_LIMIT, Some(keyword))
            .await
            .unwrap_or_else(|e| {
                log_failure("genre search", keyword, &e);
                Vec::new()
            })
    }

    async fn try_search(
        &self,
        query: &str,
        limit: usize,
        genre_filter: Option<&str>,
    ) -> Result<Vec<Movie>, UpstreamError> {
        let stubs = match self.omdb.search(query).await {
            Ok(stubs) => stubs,
            Err(UpstreamError::NotFound(reason)) => {
                debug!("No search hits for '{}': {}", query, reason);
                return Ok(Vec::new());
            }
            Err(e) => return Err(e),
        };
        let ids = stubs.into_iter().take(limit).map(|s| s.imdb_id).collect();
        Ok(self.movies_by_ids(ids, genre_filter).await)
    }

    /// Fans out one lookup per id with bounded concurrency. Output keeps the
    /// input order; failed, missing or filtered-out slots are dropped.
    async fn movies_by_ids(&self, ids: Vec<String>, genre_filter: Option<&str>) -> Vec<Movie> {
        stream::iter(ids)
            .map(move |id| async move {
                match self.omdb.lookup(&id).await {
                    Ok(raw) if genre_filter.map_or(true, |k| genre_matches(&raw, k)) => {
                        Some(to_movie(&id, &raw))
                    }
                    Ok(_) => {
                        debug!("Dropping {}: genre does not match", id);
                        None
                    }
                    Err(e) => {
                        log_failure("movie lookup", &id, &e);
                        None
                    }
                }
            })
            .buffered(MAX_IN_FLIGHT)
            .filter_map(future::ready)
            .collect()
            .await
    }
}

fn log_failure(operation: &str, subject: &str, err: &UpstreamError) {
    match err {
        UpstreamError::NotFound(reason) => {
            debug!("{} for '{}' not found: {}", operation, subject, reason)
        }
        UpstreamError::MissingApiKey => {
            warn!("{} for '{}' skipped: OMDB API key is missing", operation, subject)
        }
        UpstreamError::Unavailable(reason) => {
            warn!("{} for '{}' failed: {}", operation, subject, reason)
        }
    }
}

pub fn genre_keyword(genre_id: u32) -> &'static str {
    match genre_id {
        1 => "action",
        2 => "adventure",
        3 => "animation",
        4 => "biography",
        5 => "comedy",
        6 => "crime",
        7 => "drama",
        8 => "family",
        9 => "fantasy",
        10 => "horror",
        11 => "mystery",
        12 => "romance",
        13 => "science fiction",
        14 => "thriller",
        15 => "war",
        _ => FALLBACK_KEYWORD,
    }
}

fn genre_matches(raw: &RawTitle, keyword: &str) -> bool {
    present(raw.genre.as_deref())
        .is_some_and(|g| g.to_lowercase().contains(&keyword.to_lowercase()))
}

/// Drops the provider's "N/A" sentinel and blank values.
fn present(value: Option<&str>) -> Option<&str> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty() && *v != NOT_AVAILABLE)
}

pub fn to_movie(requested_id: &str, raw: &RawTitle) -> Movie {
    let plot = present(raw.plot.as_deref());
    let poster = present(raw.poster.as_deref()).map(str::to_string);

    Movie {
        id: present(raw.imdb_id.as_deref())
            .unwrap_or(requested_id)
            .to_string(),
        title: raw.title.clone().unwrap_or_default(),
        backdrop_url: poster.clone(),
        poster_url: poster,
        overview: plot.unwrap_or(NO_OVERVIEW).to_string(),
        release_date: present(raw.released.as_deref())
            .or_else(|| present(raw.year.as_deref()))
            .unwrap_or_default()
            .to_string(),
        vote_average: parse_rating(raw.imdb_rating.as_deref()),
        runtime_minutes: parse_runtime(raw.runtime.as_deref()),
        tagline: plot.unwrap_or_default().to_string(),
        genres: split_list(raw.genre.as_deref())
            .into_iter()
            .zip(1..)
            .map(|(name, id)| MovieGenre { id, name })
            .collect(),
    }
}

pub fn to_cast(raw: &RawTitle) -> Vec<CastMember> {
    split_list(raw.actors.as_deref())
        .into_iter()
        .zip(1..)
        .map(|(name, id)| CastMember {
            id,
            name,
            character: CAST_CHARACTER.to_string(),
            profile_path: None,
        })
        .collect()
}

fn split_list(value: Option<&str>) -> Vec<String> {
    present(value)
        .map(|v| {
            v.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn parse_rating(value: Option<&str>) -> f64 {
    present(value)
        .and_then(|v| v.parse::<f64>().ok())
        .filter(|r| r.is_finite())
        .unwrap_or(0.0)
}

/// Leading integer of a duration such as "142 min".
fn parse_runtime(value: Option<&str>) -> u32 {
    present(value)
        .map(|v| {
            v.chars()
                .take_while(|c| c.is_ascii_digit())
                .collect::<String>()
        })
        .and_then(|digits| digits.parse().ok())
        .unwrap_or(0)
}
