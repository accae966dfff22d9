use crate::catalog::Catalog;
use crate::config::Config;
use crate::omdb::OmdbClient;
use crate::pages;
use anyhow::{Context, Result};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use axum_extra::TypedHeader;
use headers::CacheControl;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

const GENRE_PAGE_MAX_AGE: Duration = Duration::from_secs(3600);
const MOVIE_PAGE_MAX_AGE: Duration = Duration::from_secs(86400);
const MIN_SEARCH_CHARS: usize = 3;

#[derive(Clone)]
pub struct AppState {
    pub catalog: Catalog,
}

#[derive(Debug, Deserialize)]
struct SearchParams {
    q: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GenreParams {
    id: Option<String>,
}

pub async fn run_server(config: Config) -> Result<()> {
    let omdb = OmdbClient::new(&config)?;
    let state = AppState {
        catalog: Catalog::new(Arc::new(omdb)),
    };

    let app = build_router(state).layer(TraceLayer::new_for_http());

    info!("Listening on {}", config.bind_addr);
    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;
    Ok(())
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/movies", get(all_movies))
        .route("/search", get(search))
        .route("/genres", get(genres))
        .route("/movie/:id", get(movie_detail))
        .route("/health", get(health))
        .with_state(state)
}

async fn health() -> &'static str {
    "OK"
}

async fn home(State(state): State<AppState>) -> Html<String> {
    let movies = state.catalog.list_popular_movies().await;
    Html(pages::home(&movies))
}

async fn all_movies(State(state): State<AppState>) -> Html<String> {
    let movies = state.catalog.list_all_movies().await;
    Html(pages::all_movies(&movies))
}

async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Html<String> {
    let query = params.q.unwrap_or_default();
    let query = query.trim();
    if query.chars().count() < MIN_SEARCH_CHARS {
        return Html(pages::search(query, None));
    }
    let movies = state.catalog.search_movies(query).await;
    debug!("Search '{}' returned {} movies", query, movies.len());
    Html(pages::search(query, Some(movies.as_slice())))
}

async fn genres(
    State(state): State<AppState>,
    Query(params): Query<GenreParams>,
) -> impl IntoResponse {
    let genres = state.catalog.list_genres();
    let selected_id = params
        .id
        .as_deref()
        .and_then(|id| id.trim().parse::<u32>().ok())
        .or_else(|| genres.first().map(|g| g.id));

    let movies = match selected_id {
        Some(id) => state.catalog.list_movies_by_genre(id).await,
        None => Vec::new(),
    };
    let selected = selected_id.and_then(|id| genres.iter().find(|g| g.id == id));

    (
        TypedHeader(cache_for(GENRE_PAGE_MAX_AGE)),
        Html(pages::genres(&genres, selected, &movies)),
    )
}

async fn movie_detail(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let (movie, cast) = tokio::join!(
        state.catalog.get_movie_details(&id),
        state.catalog.get_movie_credits(&id),
    );
    match movie {
        Some(movie) => (
            TypedHeader(cache_for(MOVIE_PAGE_MAX_AGE)),
            Html(pages::movie_detail(&movie, &cast)),
        )
            .into_response(),
        None => (StatusCode::NOT_FOUND, Html(pages::not_found())).into_response(),
    }
}

fn cache_for(max_age: Duration) -> CacheControl {
    CacheControl::new().with_public().with_max_age(max_age)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        let mut term = signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");
        term.recv().await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Shutdown signal received (Ctrl+C)");
        }
        _ = terminate => {
            info!("Shutdown signal received (SIGTERM)");
        }
    }
}
