//! Client for the remote book catalog (Google Books volumes API)

use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use super::CatalogError;
use crate::config::CatalogConfig;
use crate::reading_list::Book;

const USER_AGENT: &str = concat!("bookify/", env!("CARGO_PKG_VERSION"));

// ============================================================================
// Volumes API Response Structs
// ============================================================================

/// Search response from the volumes endpoint
#[derive(Debug, Deserialize)]
struct VolumesResponse {
    #[serde(default)]
    items: Vec<Volume>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Volume {
    #[serde(default)]
    volume_info: VolumeInfo,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VolumeInfo {
    title: Option<String>,
    authors: Option<Vec<String>>,
    description: Option<String>,
    #[serde(default)]
    image_links: ImageLinks,
}

#[derive(Debug, Default, Deserialize)]
struct ImageLinks {
    thumbnail: Option<String>,
}

// ============================================================================
// Client
// ============================================================================

/// HTTP client for the catalog search endpoint
#[derive(Debug, Clone)]
pub struct CatalogClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    max_results: u32,
    print_type: String,
}

impl CatalogClient {
    pub fn new(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(CatalogError::Request)?;

        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            max_results: config.max_results,
            print_type: config.print_type.clone(),
        })
    }

    /// Use a different result-count limit for this client
    pub fn with_max_results(mut self, max_results: u32) -> Self {
        self.max_results = max_results;
        self
    }

    /// Build the full search URL for `query`
    pub fn search_url(&self, query: &str) -> String {
        let mut params = vec![format!("q={}", urlencoding::encode(query))];
        if let Some(ref key) = self.api_key {
            params.push(format!("key={}", urlencoding::encode(key)));
        }
        params.push(format!("maxResults={}", self.max_results));
        params.push(format!("printType={}", urlencoding::encode(&self.print_type)));

        let sep = if self.base_url.contains('?') { '&' } else { '?' };
        format!("{}{}{}", self.base_url, sep, params.join("&"))
    }

    /// Search the catalog and return simplified book records.
    ///
    /// An empty result set is `Ok(vec![])`; any transport, status or decoding
    /// failure is an error.
    pub async fn search(&self, query: &str) -> Result<Vec<Book>, CatalogError> {
        let url = self.search_url(query);
        debug!(query, "Searching catalog");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(CatalogError::Request)?;

        if !response.status().is_success() {
            warn!("Catalog search returned status {}", response.status());
            return Err(CatalogError::Status(response.status()));
        }

        let volumes: VolumesResponse = response.json().await.map_err(CatalogError::Decode)?;
        let books = volumes_to_books(volumes);
        debug!(query, count = books.len(), "Catalog search finished");
        Ok(books)
    }
}

/// Convert a volumes response into book records, filling in display defaults
fn volumes_to_books(response: VolumesResponse) -> Vec<Book> {
    response
        .items
        .into_iter()
        .map(|volume| volume_info_to_book(volume.volume_info))
        .collect()
}

fn volume_info_to_book(info: VolumeInfo) -> Book {
    // An explicit empty author list joins to "", only a missing one is "Unknown"
    let author = match info.authors {
        Some(authors) => authors.join(", "),
        None => "Unknown".to_string(),
    };

    Book {
        title: info.title.unwrap_or_else(|| "No title".to_string()),
        author,
        description: info
            .description
            .unwrap_or_else(|| "No description".to_string()),
        thumbnail: info.image_links.thumbnail.unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::spawn_fake_catalog;

    fn parse(json: &str) -> Vec<Book> {
        volumes_to_books(serde_json::from_str(json).unwrap())
    }

    fn client(base_url: &str, api_key: Option<&str>) -> CatalogClient {
        let config = CatalogConfig {
            base_url: base_url.to_string(),
            api_key: api_key.map(String::from),
            ..CatalogConfig::default()
        };
        CatalogClient::new(&config).unwrap()
    }

    #[test]
    fn test_full_volume() {
        let books = parse(
            r#"{"items": [{"volumeInfo": {
                "title": "Good Omens",
                "authors": ["Terry Pratchett", "Neil Gaiman"],
                "description": "The world ends on Saturday.",
                "imageLinks": {"thumbnail": "http://img.example/1.jpg"}
            }}]}"#,
        );
        assert_eq!(
            books,
            vec![Book {
                title: "Good Omens".to_string(),
                author: "Terry Pratchett, Neil Gaiman".to_string(),
                description: "The world ends on Saturday.".to_string(),
                thumbnail: "http://img.example/1.jpg".to_string(),
            }]
        );
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let books = parse(r#"{"items": [{"volumeInfo": {}}, {}]}"#);
        assert_eq!(books.len(), 2);
        for book in &books {
            assert_eq!(book.title, "No title");
            assert_eq!(book.author, "Unknown");
            assert_eq!(book.description, "No description");
            assert_eq!(book.thumbnail, "");
        }
    }

    #[test]
    fn test_empty_author_list_joins_to_empty() {
        let books = parse(r#"{"items": [{"volumeInfo": {"title": "Anon", "authors": []}}]}"#);
        assert_eq!(books[0].author, "");
    }

    #[test]
    fn test_missing_items() {
        assert!(parse(r#"{"kind": "books#volumes", "totalItems": 0}"#).is_empty());
    }

    #[test]
    fn test_search_url() {
        let c = client("https://catalog.example/volumes", Some("k&y"));
        assert_eq!(
            c.search_url("harry potter"),
            "https://catalog.example/volumes?q=harry%20potter&key=k%26y&maxResults=10&printType=books"
        );

        let c = client("https://catalog.example/volumes", None).with_max_results(3);
        assert_eq!(
            c.search_url("dune"),
            "https://catalog.example/volumes?q=dune&maxResults=3&printType=books"
        );
    }

    #[tokio::test]
    async fn test_search_against_fake_catalog() {
        let catalog = spawn_fake_catalog().await;
        let c = client(&catalog.url, Some("test-key"));

        let books = c.search("dune").await.unwrap();
        assert_eq!(books.len(), 2);
        assert_eq!(books[0].title, "Dune");
        assert_eq!(books[0].author, "Frank Herbert");

        let seen = catalog.requests();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].get("q").map(String::as_str), Some("dune"));
        assert_eq!(seen[0].get("key").map(String::as_str), Some("test-key"));
        assert_eq!(seen[0].get("maxResults").map(String::as_str), Some("10"));
        assert_eq!(seen[0].get("printType").map(String::as_str), Some("books"));
    }

    #[tokio::test]
    async fn test_search_error_status() {
        let catalog = spawn_fake_catalog().await;
        let c = client(&catalog.url, None);

        let err = c.search("fail").await.unwrap_err();
        assert!(matches!(err, CatalogError::Status(s) if s.as_u16() == 500));
    }

    #[tokio::test]
    async fn test_search_malformed_body() {
        let catalog = spawn_fake_catalog().await;
        let c = client(&catalog.url, None);

        let err = c.search("garbage").await.unwrap_err();
        assert!(matches!(err, CatalogError::Decode(_)));
    }

    #[tokio::test]
    async fn test_search_unreachable() {
        // Nothing listens on port 9 locally
        let c = client("http://127.0.0.1:9/volumes", None);
        let err = c.search("dune").await.unwrap_err();
        assert!(matches!(err, CatalogError::Request(_)));
    }
}
