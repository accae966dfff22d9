//! Server-side HTML for the movie pages. Formatting only: every value shown
//! here already comes normalized from the catalog.

use chrono::{Datelike, NaiveDate};
use std::fmt::Write;

use crate::models::{CastMember, Genre, Movie};

const SITE_TITLE: &str = "Movie Database - Discover Movies";
const SITE_DESCRIPTION: &str = "Browse and discover popular movies, search for your favorites, and explore detailed information.";
const PLACEHOLDER_HOST: &str = "via.placeholder.com";
pub const TOP_CAST: usize = 10;

pub fn home(popular: &[Movie]) -> String {
    let mut body = String::new();
    body.push_str("<h1>Popular Movies</h1>\n");
    body.push_str(&movie_grid(popular));
    body.push_str("<p class=\"more\"><a href=\"/movies\">Browse all movies</a></p>\n");
    layout("Popular Movies", &body)
}

pub fn all_movies(movies: &[Movie]) -> String {
    let mut body = String::new();
    body.push_str("<h1>All Movies</h1>\n");
    body.push_str(&movie_grid(movies));
    layout("All Movies", &body)
}

/// `results` is `None` when the query was too short to search.
pub fn search(query: &str, results: Option<&[Movie]>) -> String {
    let mut body = String::new();
    body.push_str("<h1>Search Movies</h1>\n");
    let _ = writeln!(
        body,
        "<form method=\"get\" action=\"/search\"><input type=\"text\" name=\"q\" value=\"{}\" \
         placeholder=\"Search for movies... (try 'matrix', 'inception', 'dark')\"></form>",
        escape(query)
    );
    match results {
        Some([]) => {
            let _ = writeln!(
                body,
                "<p class=\"empty\">No movies found for &quot;{}&quot;</p>",
                escape(query)
            );
        }
        Some(movies) => body.push_str(&movie_grid(movies)),
        None => {}
    }
    layout("Search Movies", &body)
}

pub fn genres(genres: &[Genre], selected: Option<&Genre>, movies: &[Movie]) -> String {
    let mut body = String::new();
    body.push_str("<h1>Browse by Genre</h1>\n<div class=\"genre-selector\">\n");
    for genre in genres {
        let class = if selected.is_some_and(|s| s.id == genre.id) {
            "genre active"
        } else {
            "genre"
        };
        let _ = writeln!(
            body,
            "<a class=\"{}\" href=\"/genres?id={}\">{}</a>",
            class,
            genre.id,
            escape(&genre.name)
        );
    }
    body.push_str("</div>\n");
    if let Some(genre) = selected {
        let _ = writeln!(body, "<h2>{} Movies</h2>", escape(&genre.name));
        body.push_str(&movie_grid(movies));
    }
    layout("Browse by Genre", &body)
}

pub fn movie_detail(movie: &Movie, cast: &[CastMember]) -> String {
    let mut body = String::new();
    if let Some(backdrop) = &movie.backdrop_url {
        let _ = writeln!(
            body,
            "<div class=\"backdrop\"><img src=\"{}\" alt=\"{}\"></div>",
            escape(backdrop),
            escape(&movie.title)
        );
    }
    body.push_str("<div class=\"movie-detail\">\n");
    if let Some(poster) = &movie.poster_url {
        let _ = writeln!(
            body,
            "<img class=\"poster\" src=\"{}\" alt=\"{}\" width=\"300\" height=\"450\">",
            escape(poster),
            escape(&movie.title)
        );
    }
    let _ = writeln!(body, "<h1>{}</h1>", escape(&movie.title));
    if !movie.tagline.is_empty() {
        let _ = writeln!(body, "<p class=\"tagline\">{}</p>", escape(&movie.tagline));
    }
    let _ = writeln!(
        body,
        "<div class=\"facts\"><span class=\"rating-badge\">&#11088; {:.1}</span> \
         <span>{}</span> <span>{} min</span></div>",
        movie.vote_average,
        escape(&release_year(&movie.release_date).unwrap_or_default()),
        movie.runtime_minutes
    );
    if !movie.genres.is_empty() {
        body.push_str("<div class=\"genres\">");
        for genre in &movie.genres {
            let _ = write!(
                body,
                "<span class=\"genre-badge\">{}</span>",
                escape(&genre.name)
            );
        }
        body.push_str("</div>\n");
    }
    let _ = writeln!(
        body,
        "<h2>Overview</h2>\n<p class=\"overview\">{}</p>",
        escape(&movie.overview)
    );
    if !cast.is_empty() {
        body.push_str("<h2>Top Cast</h2>\n<div class=\"cast\">\n");
        for member in cast.iter().take(TOP_CAST) {
            let _ = writeln!(
                body,
                "<div class=\"cast-member\"><p class=\"name\">{}</p><p class=\"character\">{}</p></div>",
                escape(&member.name),
                escape(&member.character)
            );
        }
        body.push_str("</div>\n");
    }
    body.push_str("</div>\n");
    layout(&movie.title, &body)
}

pub fn not_found() -> String {
    layout(
        "Not Found",
        "<h1>Movie not found</h1>\n<p><a href=\"/\">Back to popular movies</a></p>\n",
    )
}

fn movie_grid(movies: &[Movie]) -> String {
    if movies.is_empty() {
        return "<div class=\"empty\"><p>No movies found</p></div>\n".to_string();
    }
    let mut out = String::from("<div class=\"movie-grid\">\n");
    for movie in movies {
        out.push_str(&movie_card(movie));
    }
    out.push_str("</div>\n");
    out
}

fn movie_card(movie: &Movie) -> String {
    let title = escape(&movie.title);
    let poster = movie
        .poster_url
        .as_deref()
        .filter(|url| !url.contains(PLACEHOLDER_HOST));
    let image = match poster {
        Some(url) => format!("<img src=\"{}\" alt=\"{}\">", escape(url), title),
        None => format!("<div class=\"no-poster\"><span>&#127916;</span><span>{}</span></div>", title),
    };
    let year = release_year(&movie.release_date).unwrap_or_else(|| "N/A".to_string());
    format!(
        "<a class=\"movie-card\" href=\"/movie/{}\">{}<span class=\"rating-badge\">&#11088; {:.1}</span>\
         <h3>{}</h3><p class=\"year\">{}</p></a>\n",
        urlencoding::encode(&movie.id),
        image,
        movie.vote_average,
        title,
        escape(&year)
    )
}

fn layout(title: &str, body: &str) -> String {
    let page_title = if title.is_empty() {
        SITE_TITLE.to_string()
    } else {
        format!("{} | {}", escape(title), SITE_TITLE)
    };
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{page_title}</title>\n<meta name=\"description\" content=\"{SITE_DESCRIPTION}\">\n</head>\n\
         <body>\n<header><nav><a class=\"brand\" href=\"/\">&#127916; MovieDB</a>\
         <ul><li><a href=\"/\">Home</a></li><li><a href=\"/search\">Search</a></li>\
         <li><a href=\"/genres\">Genres</a></li></ul></nav></header>\n\
         <main>\n{body}</main>\n<footer></footer>\n</body>\n</html>\n"
    )
}

/// Year shown on cards and the detail page. Handles the provider's
/// "31 Mar 1999" dates, bare years and ISO dates.
pub fn release_year(date: &str) -> Option<String> {
    let date = date.trim();
    if date.is_empty() {
        return None;
    }
    if let Ok(parsed) = NaiveDate::parse_from_str(date, "%d %b %Y") {
        return Some(parsed.year().to_string());
    }
    if let Some(year) = date.get(..4).filter(|y| y.chars().all(|c| c.is_ascii_digit())) {
        return Some(year.to_string());
    }
    date.split('-').next().map(|s| s.to_string())
}

pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
