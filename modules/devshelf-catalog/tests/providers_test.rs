//! Provider adapters against mocked upstream APIs.

use std::sync::Arc;
use std::time::Duration;

use devshelf_catalog::providers::{
    DevToProvider, FreeBooksProvider, GoogleBooksProvider, OpenLibraryProvider, YouTubeProvider,
};
use devshelf_catalog::{Aggregator, CatalogError, CatalogProvider, ProviderKind, UpstreamCount};
use devshelf_common::{ResourceQuery, ResourceType, Total};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TIMEOUT: Duration = Duration::from_secs(5);

fn article(id: u64) -> serde_json::Value {
    json!({
        "id": id,
        "title": format!("Article {id}"),
        "description": "Something about Rust",
        "url": format!("https://dev.to/someone/article-{id}"),
        "tag_list": ["rust", "beginners"],
        "user": { "name": "Someone" },
        "public_reactions_count": 10
    })
}

mod devto {
    use super::*;

    #[tokio::test]
    async fn fetches_tagged_feed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/articles"))
            .and(query_param("tag", "rust"))
            .and(query_param("page", "1"))
            .and(query_param("per_page", "12"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([article(1), article(2)])))
            .mount(&server)
            .await;

        let provider = DevToProvider::new(server.uri(), TIMEOUT);
        let page = provider
            .fetch_page(&ResourceQuery::new().tags(["rust"]))
            .await
            .unwrap();

        assert_eq!(page.items.len(), 2);
        assert_eq!(page.count, UpstreamCount::Unknown);
        assert_eq!(page.items[0].id, "devto-1");
        assert_eq!(page.items[0].resource_type, ResourceType::Article);
        assert_eq!(page.items[0].language, "rust");
    }

    #[tokio::test]
    async fn upstream_error_status_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/articles"))
            .respond_with(ResponseTemplate::new(503).set_body_string("try later"))
            .mount(&server)
            .await;

        let provider = DevToProvider::new(server.uri(), TIMEOUT);
        let err = provider.fetch_page(&ResourceQuery::new()).await.unwrap_err();
        assert!(matches!(err, CatalogError::Api { status: 503, .. }), "{err}");
    }

    #[tokio::test]
    async fn malformed_body_is_a_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/articles"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>nope</html>"))
            .mount(&server)
            .await;

        let provider = DevToProvider::new(server.uri(), TIMEOUT);
        let err = provider.fetch_page(&ResourceQuery::new()).await.unwrap_err();
        assert!(matches!(err, CatalogError::Parse(_)), "{err}");
    }

    #[tokio::test]
    async fn empty_next_page_ends_the_feed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/articles"))
            .and(query_param("page", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([article(1), article(2)])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/articles"))
            .and(query_param("page", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let aggregator =
            Aggregator::new().with(Arc::new(DevToProvider::new(server.uri(), TIMEOUT)));
        let query = ResourceQuery::new().of_type(ResourceType::Article).page_size(2);
        let result = aggregator.aggregate(&query, None).await.unwrap();

        assert_eq!(result.items.len(), 2);
        assert!(!result.has_next);
        assert_eq!(result.total_pages, 1);
        assert_eq!(result.total, Total::Estimated(2));
    }
}

mod youtube {
    use super::*;

    fn video(id: &str) -> serde_json::Value {
        json!({
            "id": { "kind": "youtube#video", "videoId": id },
            "snippet": {
                "title": format!("Video {id} &amp; friends"),
                "description": "A talk",
                "channelTitle": "Conf"
            }
        })
    }

    #[tokio::test]
    async fn first_page_reports_approximate_count() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("q", "docker"))
            .and(query_param("key", "yt-key"))
            .and(query_param("type", "video"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [video("a"), video("b")],
                "nextPageToken": "T2",
                "pageInfo": { "totalResults": 1000, "resultsPerPage": 2 }
            })))
            .mount(&server)
            .await;

        let provider = YouTubeProvider::new(server.uri(), Some("yt-key".into()), TIMEOUT);
        let page = provider
            .fetch_page(&ResourceQuery::new().text("docker").page_size(2))
            .await
            .unwrap();

        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[0].title, "Video a & friends");
        assert_eq!(page.count, UpstreamCount::Approximate(1000));
        assert_eq!(page.has_more, Some(true));
    }

    #[tokio::test]
    async fn later_pages_walk_the_cursor_chain() {
        let server = MockServer::start().await;
        // Specific matchers first: on a tie wiremock uses the first mounted mock.
        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("pageToken", "T2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [video("c")],
                "pageInfo": { "totalResults": 3 }
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [video("a"), video("b")],
                "nextPageToken": "T2",
                "pageInfo": { "totalResults": 3 }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let provider = YouTubeProvider::new(server.uri(), Some("yt-key".into()), TIMEOUT);
        let page = provider
            .fetch_page(&ResourceQuery::new().page_size(2).page(2))
            .await
            .unwrap();

        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].id, "youtube-c");
        assert_eq!(page.has_more, Some(false));
    }

    #[tokio::test]
    async fn chain_ending_early_is_an_empty_page() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [video("a")],
                "pageInfo": { "totalResults": 1 }
            })))
            .mount(&server)
            .await;

        let provider = YouTubeProvider::new(server.uri(), Some("yt-key".into()), TIMEOUT);
        let page = provider
            .fetch_page(&ResourceQuery::new().page(5))
            .await
            .unwrap();

        assert!(page.items.is_empty());
        assert_eq!(page.count, UpstreamCount::Unknown);
        assert_eq!(page.has_more, Some(false));
    }

    #[tokio::test]
    async fn page_past_the_chain_reports_an_estimated_total() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [video("a")],
                "pageInfo": { "totalResults": 1 }
            })))
            .mount(&server)
            .await;

        let aggregator = Aggregator::new().with(Arc::new(YouTubeProvider::new(
            server.uri(),
            Some("yt-key".into()),
            TIMEOUT,
        )));
        let query = ResourceQuery::new()
            .of_type(ResourceType::Video)
            .page(3)
            .page_size(12);
        let result = aggregator.aggregate(&query, None).await.unwrap();

        assert!(result.items.is_empty());
        assert_eq!(result.page, 3);
        assert_eq!(result.total, Total::Estimated(24));
        assert_eq!(result.total_pages, 3);
        assert!(!result.has_next);
    }
}

mod google_books {
    use super::*;

    #[tokio::test]
    async fn pdf_queries_ask_for_free_ebooks_at_offset() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/volumes"))
            .and(query_param("q", "python"))
            .and(query_param("startIndex", "10"))
            .and(query_param("maxResults", "10"))
            .and(query_param("filter", "free-ebooks"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "totalItems": 57,
                "items": [{
                    "id": "vol1",
                    "volumeInfo": {
                        "title": "Think Python",
                        "categories": ["Computers / Python"],
                        "infoLink": "https://books.google.com/books?id=vol1"
                    },
                    "accessInfo": { "pdf": { "isAvailable": true } }
                }]
            })))
            .mount(&server)
            .await;

        let provider = GoogleBooksProvider::new(server.uri(), None, TIMEOUT);
        let query = ResourceQuery::new()
            .text("python")
            .of_type(ResourceType::Pdf)
            .page_size(10)
            .page(2);
        let page = provider.fetch_page(&query).await.unwrap();

        assert_eq!(page.count, UpstreamCount::Exact(57));
        assert_eq!(page.items[0].resource_type, ResourceType::Pdf);
        assert_eq!(page.items[0].url, "https://books.google.com/books?id=vol1");
    }

    #[tokio::test]
    async fn huge_page_numbers_do_not_overflow_the_offset() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/volumes"))
            .and(query_param("startIndex", "7999999960"))
            .and(query_param("maxResults", "40"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "totalItems": 12 })))
            .expect(1)
            .mount(&server)
            .await;

        let provider = GoogleBooksProvider::new(server.uri(), None, TIMEOUT);
        let page = provider
            .fetch_page(&ResourceQuery::new().page(200_000_000).page_size(40))
            .await
            .unwrap();

        assert!(page.items.is_empty());
        assert_eq!(page.count, UpstreamCount::Exact(12));
    }

    #[tokio::test]
    async fn empty_search_has_no_items_field() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/volumes"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "totalItems": 0 })))
            .mount(&server)
            .await;

        let provider = GoogleBooksProvider::new(server.uri(), Some("gb-key".into()), TIMEOUT);
        let page = provider.fetch_page(&ResourceQuery::new()).await.unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.count, UpstreamCount::Exact(0));
    }
}

mod open_library {
    use super::*;

    #[tokio::test]
    async fn doc_queries_label_items_as_docs() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search.json"))
            .and(query_param("q", "kubernetes"))
            .and(query_param("page", "1"))
            .and(query_param("limit", "12"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "numFound": 31,
                "num_found": 31,
                "docs": [{
                    "key": "/works/OL1W",
                    "title": "Kubernetes Up and Running",
                    "author_name": ["Kelsey Hightower"],
                    "first_sentence": ["Kubernetes is an orchestrator."]
                }]
            })))
            .mount(&server)
            .await;

        let provider = OpenLibraryProvider::new(server.uri(), TIMEOUT);
        let query = ResourceQuery::new()
            .text("kubernetes")
            .of_type(ResourceType::Doc);
        let page = provider.fetch_page(&query).await.unwrap();

        assert_eq!(page.count, UpstreamCount::Exact(31));
        let item = &page.items[0];
        assert_eq!(item.resource_type, ResourceType::Doc);
        assert_eq!(item.url, "https://openlibrary.org/works/OL1W");
        assert_eq!(item.description, "Kubernetes is an orchestrator.");
    }
}

mod free_books {
    use super::*;

    fn books(n: usize) -> serde_json::Value {
        let books: Vec<_> = (0..n)
            .map(|i| {
                json!({
                    "id": format!("b{i}"),
                    "title": format!("Book {i}"),
                    "authors": "Author",
                    "url": format!("https://www.dbooks.org/book-b{i}/")
                })
            })
            .collect();
        json!({ "status": "ok", "total": n.to_string(), "books": books })
    }

    #[tokio::test]
    async fn pages_are_sliced_locally() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search/rust"))
            .respond_with(ResponseTemplate::new(200).set_body_json(books(5)))
            .mount(&server)
            .await;

        let provider = FreeBooksProvider::new(server.uri(), TIMEOUT);
        let query = ResourceQuery::new().text("rust").page_size(2).page(3);
        let page = provider.fetch_page(&query).await.unwrap();

        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].id, "freebooks-b4");
        assert_eq!(page.items[0].resource_type, ResourceType::Pdf);
    }

    #[tokio::test]
    async fn not_found_status_is_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/recent"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "status": "not found" })),
            )
            .mount(&server)
            .await;

        let provider = FreeBooksProvider::new(server.uri(), TIMEOUT);
        let page = provider.fetch_page(&ResourceQuery::new()).await.unwrap();
        assert!(page.items.is_empty());
    }

    #[tokio::test]
    async fn explicit_selection_looks_ahead_for_next_page() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/recent"))
            .respond_with(ResponseTemplate::new(200).set_body_json(books(3)))
            .mount(&server)
            .await;

        let aggregator =
            Aggregator::new().with(Arc::new(FreeBooksProvider::new(server.uri(), TIMEOUT)));
        let result = aggregator
            .aggregate(
                &ResourceQuery::new().page_size(2),
                Some(ProviderKind::FreeBooks),
            )
            .await
            .unwrap();

        assert!(result.has_next);
        assert_eq!(result.total, Total::Estimated(3));
        assert_eq!(result.total_pages, 2);
    }
}
