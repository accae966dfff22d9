use moviedb::catalog::Catalog;
use moviedb::config::Config;
use moviedb::omdb::{OmdbApi, OmdbClient, UpstreamError};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const API_KEY: &str = "test-key";

fn config_for(server: &MockServer, api_key: Option<&str>) -> Config {
    let mut config = Config::with_api_key(api_key.map(str::to_string));
    config.base_url = format!("{}/", server.uri());
    config.timeout = Duration::from_millis(200);
    config
}

fn client_for(server: &MockServer) -> OmdbClient {
    OmdbClient::new(&config_for(server, Some(API_KEY))).expect("client builds")
}

fn matrix_payload() -> serde_json::Value {
    json!({
        "Response": "True",
        "Title": "The Matrix",
        "imdbRating": "8.7",
        "Genre": "Action, Sci-Fi",
        "Runtime": "136 min",
        "Poster": "http://x/p.jpg",
        "Plot": "A hacker..."
    })
}

#[tokio::test]
async fn lookup_sends_key_id_and_full_plot() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .and(query_param("apikey", API_KEY))
        .and(query_param("i", "tt0133093"))
        .and(query_param("plot", "full"))
        .respond_with(ResponseTemplate::new(200).set_body_json(matrix_payload()))
        .expect(1)
        .mount(&server)
        .await;

    let raw = client_for(&server)
        .lookup("tt0133093")
        .await
        .expect("lookup succeeds");
    assert_eq!(raw.title.as_deref(), Some("The Matrix"));
    assert_eq!(raw.runtime.as_deref(), Some("136 min"));
}

#[tokio::test]
async fn search_sends_encoded_query_and_movie_type() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .and(query_param("s", "science fiction"))
        .and(query_param("type", "movie"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Response": "True",
            "totalResults": "2",
            "Search": [
                { "Title": "A", "Year": "2001", "imdbID": "tt0000001", "Type": "movie" },
                { "Title": "B", "Year": "2002", "imdbID": "tt0000002", "Type": "movie" }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let stubs = client_for(&server)
        .search("science fiction")
        .await
        .expect("search succeeds");
    let ids: Vec<&str> = stubs.iter().map(|s| s.imdb_id.as_str()).collect();
    assert_eq!(ids, vec!["tt0000001", "tt0000002"]);
}

#[tokio::test]
async fn false_response_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Response": "False",
            "Error": "Incorrect IMDb ID."
        })))
        .mount(&server)
        .await;

    let err = client_for(&server).lookup("tt404").await.unwrap_err();
    assert_eq!(err, UpstreamError::NotFound("Incorrect IMDb ID.".to_string()));
}

#[tokio::test]
async fn error_status_is_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let err = client_for(&server).lookup("tt0133093").await.unwrap_err();
    assert!(matches!(err, UpstreamError::Unavailable(_)));
}

#[tokio::test]
async fn malformed_json_is_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let err = client_for(&server).search("matrix").await.unwrap_err();
    assert!(matches!(err, UpstreamError::Unavailable(_)));
}

#[tokio::test]
async fn slow_upstream_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(matrix_payload())
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .request(&[("i", "tt0133093")], Duration::from_millis(50))
        .await
        .unwrap_err();
    assert!(matches!(err, UpstreamError::Unavailable(_)));
}

#[tokio::test]
async fn error_text_does_not_leak_api_key() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .mount(&server)
        .await;

    let err = client_for(&server).lookup("tt0133093").await.unwrap_err();
    assert!(!err.to_string().contains(API_KEY));
}

#[tokio::test]
async fn missing_key_never_reaches_upstream() {
    let server = MockServer::start().await;
    let client = OmdbClient::new(&config_for(&server, None)).expect("client builds");

    assert_eq!(
        client.lookup("tt0133093").await.unwrap_err(),
        UpstreamError::MissingApiKey
    );
    assert_eq!(
        client.search("matrix").await.unwrap_err(),
        UpstreamError::MissingApiKey
    );
    let received = server.received_requests().await.unwrap_or_default();
    assert!(received.is_empty());
}

#[tokio::test]
async fn catalog_over_http_maps_details_and_absent_titles() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("i", "tt0133093"))
        .respond_with(ResponseTemplate::new(200).set_body_json(matrix_payload()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("i", "tt0000000"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Response": "False",
            "Error": "Incorrect IMDb ID."
        })))
        .mount(&server)
        .await;

    let catalog = Catalog::new(Arc::new(client_for(&server)));

    let movie = catalog
        .get_movie_details("tt0133093")
        .await
        .expect("movie present");
    assert_eq!(movie.id, "tt0133093");
    assert_eq!(movie.title, "The Matrix");
    assert_eq!(movie.vote_average, 8.7);
    assert_eq!(movie.runtime_minutes, 136);
    assert_eq!(movie.poster_url.as_deref(), Some("http://x/p.jpg"));
    assert_eq!(movie.genres.len(), 2);
    assert_eq!(movie.genres[1].id, 2);
    assert_eq!(movie.genres[1].name, "Sci-Fi");

    assert!(catalog.get_movie_details("tt0000000").await.is_none());
    assert!(catalog.get_movie_credits("tt0000000").await.is_empty());
}
