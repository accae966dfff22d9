#![allow(dead_code)]

use moviedb::omdb::{OmdbApi, RawTitle, SearchStub, UpstreamError};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

/// In-memory provider. Ids missing from `titles` answer not-found, ids in
/// `failing` answer unavailable.
#[derive(Default)]
pub struct FakeOmdb {
    pub titles: HashMap<String, RawTitle>,
    pub searches: HashMap<String, Vec<String>>,
    pub failing: HashSet<String>,
    pub missing_key: bool,
    pub lookup_delays: HashMap<String, Duration>,
    pub lookup_calls: Mutex<Vec<String>>,
    pub search_calls: Mutex<Vec<String>>,
}

#[async_trait::async_trait]
impl OmdbApi for FakeOmdb {
    async fn lookup(&self, imdb_id: &str) -> Result<RawTitle, UpstreamError> {
        self.lookup_calls.lock().unwrap().push(imdb_id.to_string());
        if let Some(delay) = self.lookup_delays.get(imdb_id) {
            tokio::time::sleep(*delay).await;
        }
        if self.missing_key {
            return Err(UpstreamError::MissingApiKey);
        }
        if self.failing.contains(imdb_id) {
            return Err(UpstreamError::Unavailable("connection reset".to_string()));
        }
        self.titles
            .get(imdb_id)
            .cloned()
            .ok_or_else(|| UpstreamError::NotFound("Incorrect IMDb ID.".to_string()))
    }

    async fn search(&self, query: &str) -> Result<Vec<SearchStub>, UpstreamError> {
        self.search_calls.lock().unwrap().push(query.to_string());
        if self.missing_key {
            return Err(UpstreamError::MissingApiKey);
        }
        if self.failing.contains(query) {
            return Err(UpstreamError::Unavailable("HTTP status 503".to_string()));
        }
        match self.searches.get(query) {
            Some(ids) => Ok(ids
                .iter()
                .map(|id| SearchStub {
                    imdb_id: id.clone(),
                    title: None,
                    year: None,
                })
                .collect()),
            None => Err(UpstreamError::NotFound("Movie not found!".to_string())),
        }
    }
}

pub fn title(id: &str, name: &str, genre: &str) -> RawTitle {
    RawTitle {
        imdb_id: Some(id.to_string()),
        title: Some(name.to_string()),
        year: Some("1999".to_string()),
        released: Some("31 Mar 1999".to_string()),
        runtime: Some("120 min".to_string()),
        genre: Some(genre.to_string()),
        actors: Some("Actor One, Actor Two".to_string()),
        plot: Some(format!("Plot of {}", name)),
        poster: Some(format!("https://img.example/{}.jpg", id)),
        imdb_rating: Some("7.5".to_string()),
    }
}

pub fn matrix() -> RawTitle {
    RawTitle {
        imdb_id: None,
        title: Some("The Matrix".to_string()),
        year: Some("1999".to_string()),
        released: Some("31 Mar 1999".to_string()),
        runtime: Some("136 min".to_string()),
        genre: Some("Action, Sci-Fi".to_string()),
        actors: Some("Keanu Reeves, Laurence Fishburne, Carrie-Anne Moss".to_string()),
        plot: Some("A hacker...".to_string()),
        poster: Some("http://x/p.jpg".to_string()),
        imdb_rating: Some("8.7".to_string()),
    }
}
