//! Aggregation behavior across providers, using in-memory mocks.

use std::sync::Arc;
use std::time::Duration;

use devshelf_catalog::providers::YouTubeProvider;
use devshelf_catalog::testing::{resource, typed_resource, MockProvider};
use devshelf_catalog::{Aggregator, ProviderKind, UpstreamCount};
use devshelf_common::{ResourceQuery, ResourceType, Total};

#[tokio::test]
async fn mixed_mode_keeps_the_earlier_providers_copy() {
    let devto = MockProvider::new(ProviderKind::DevTo).on_page(
        1,
        vec![
            resource("devto-1", "https://shared.dev/post"),
            resource("devto-2", "https://dev.to/only-here"),
        ],
    );
    let youtube = MockProvider::new(ProviderKind::YouTube).on_page(
        1,
        vec![typed_resource("yt-1", "https://youtu.be/x", ResourceType::Video)],
    );
    let books = MockProvider::new(ProviderKind::GoogleBooks).on_page(
        1,
        vec![
            resource("books-1", "https://shared.dev/post"),
            resource("books-2", "https://books.example/2"),
        ],
    );
    let aggregator = Aggregator::new()
        .with(Arc::new(books))
        .with(Arc::new(youtube))
        .with(Arc::new(devto));

    let result = aggregator
        .aggregate(&ResourceQuery::new().text("post"), None)
        .await
        .unwrap();

    let ids: Vec<&str> = result.items.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["devto-1", "devto-2", "yt-1", "books-2"]);
    assert_eq!(result.total_pages, 1);
    assert!(!result.has_next);
    assert_eq!(result.total, Total::Estimated(4));
}

#[tokio::test]
async fn mixed_mode_truncates_to_page_size() {
    let many = |prefix: &str| {
        (0..4)
            .map(|i| resource(&format!("{prefix}-{i}"), &format!("https://{prefix}.dev/{i}")))
            .collect::<Vec<_>>()
    };
    let aggregator = Aggregator::new()
        .with(Arc::new(MockProvider::new(ProviderKind::DevTo).on_page(1, many("a"))))
        .with(Arc::new(MockProvider::new(ProviderKind::YouTube).on_page(1, many("b"))))
        .with(Arc::new(MockProvider::new(ProviderKind::GoogleBooks).on_page(1, many("c"))));

    let result = aggregator
        .aggregate(&ResourceQuery::new().page_size(5), None)
        .await
        .unwrap();

    assert_eq!(result.items.len(), 5);
    assert_eq!(result.page_size, 5);
}

#[tokio::test]
async fn mixed_mode_survives_a_failed_provider() {
    let aggregator = Aggregator::new()
        .with(Arc::new(MockProvider::new(ProviderKind::DevTo).failing()))
        .with(Arc::new(
            MockProvider::new(ProviderKind::GoogleBooks)
                .on_page(1, vec![resource("b", "https://books.example/b")]),
        ));

    let result = aggregator
        .aggregate(&ResourceQuery::new(), None)
        .await
        .unwrap();
    assert_eq!(result.items.len(), 1);
    assert_eq!(result.items[0].id, "b");
}

#[tokio::test]
async fn video_without_credential_falls_back_to_empty_catalog_page() {
    // Never contacted: the key check fails before any request.
    let youtube = YouTubeProvider::new("http://127.0.0.1:9", None, Duration::from_secs(1));
    let aggregator = Aggregator::new().with(Arc::new(youtube));

    let query = ResourceQuery::new()
        .of_type(ResourceType::Video)
        .page_size(10);
    let result = aggregator.search(&query, None).await;

    assert!(result.items.is_empty());
    assert_eq!(result.total_pages, 1);
    assert_eq!(result.page, 1);
}

#[tokio::test]
async fn single_provider_failure_uses_fallback() {
    let aggregator = Aggregator::new()
        .with(Arc::new(MockProvider::new(ProviderKind::OpenLibrary).failing()));

    let query = ResourceQuery::new().of_type(ResourceType::Book);
    let result = aggregator.search(&query, None).await;

    assert!(!result.items.is_empty());
    assert!(result.items.iter().all(|r| r.resource_type == ResourceType::Book));
    assert_eq!(result.total, Total::Exact(result.items.len() as u64));
}

#[tokio::test]
async fn page_shape_holds_for_every_route() {
    let books = (0..3)
        .map(|i| {
            typed_resource(&format!("o{i}"), &format!("https://ol.org/{i}"), ResourceType::Book)
        })
        .collect();
    let counted = MockProvider::new(ProviderKind::OpenLibrary)
        .on_page(2, books)
        .with_count(UpstreamCount::Exact(0));
    let aggregator = Aggregator::new()
        .with(Arc::new(counted))
        .with(Arc::new(MockProvider::new(ProviderKind::DevTo)))
        .with(Arc::new(MockProvider::new(ProviderKind::GoogleBooks).failing()));

    let queries = [
        ResourceQuery::new().page_size(2).page(2).of_type(ResourceType::Book),
        ResourceQuery::new().of_type(ResourceType::Article).page(4),
        ResourceQuery::new().of_type(ResourceType::Pdf),
        ResourceQuery::new().page_size(1),
    ];
    for query in queries {
        let result = aggregator.search(&query, None).await;
        assert!(result.total_pages >= 1, "{query:?}");
        assert!(result.items.len() <= query.page_size as usize, "{query:?}");
    }
}
