// Fallback controller: a small built-in catalog served when the providers
// can't be reached. Never fails.

use devshelf_common::{
    page_count, Difficulty, PaginatedResult, Resource, ResourceQuery, ResourceType, Total,
};

use crate::filter::apply_filters;

struct Entry {
    id: &'static str,
    title: &'static str,
    description: &'static str,
    url: &'static str,
    resource_type: ResourceType,
    language: &'static str,
    framework: Option<&'static str>,
    difficulty: Difficulty,
    tags: &'static [&'static str],
    author: Option<&'static str>,
    rating: Option<f32>,
}

const CATALOG: &[Entry] = &[
    Entry {
        id: "local-mdn-js-guide",
        title: "JavaScript Guide",
        description: "MDN's guided tour of the JavaScript language, from grammar to promises.",
        url: "https://developer.mozilla.org/en-US/docs/Web/JavaScript/Guide",
        resource_type: ResourceType::Doc,
        language: "javascript",
        framework: None,
        difficulty: Difficulty::Beginner,
        tags: &["javascript", "web", "mdn"],
        author: Some("MDN"),
        rating: Some(4.8),
    },
    Entry {
        id: "local-rust-book",
        title: "The Rust Programming Language",
        description: "The official book on Rust: ownership, traits, concurrency and more.",
        url: "https://doc.rust-lang.org/book/",
        resource_type: ResourceType::Book,
        language: "rust",
        framework: None,
        difficulty: Difficulty::Beginner,
        tags: &["rust", "systems"],
        author: Some("Steve Klabnik, Carol Nichols"),
        rating: Some(4.9),
    },
    Entry {
        id: "local-python-tutorial",
        title: "The Python Tutorial",
        description: "An informal introduction to Python's basic concepts and features.",
        url: "https://docs.python.org/3/tutorial/",
        resource_type: ResourceType::Doc,
        language: "python",
        framework: None,
        difficulty: Difficulty::Beginner,
        tags: &["python"],
        author: Some("Python Software Foundation"),
        rating: Some(4.7),
    },
    Entry {
        id: "local-eloquent-js",
        title: "Eloquent JavaScript",
        description: "A book about JavaScript, programming, and the wonders of the digital.",
        url: "https://eloquentjavascript.net/",
        resource_type: ResourceType::Book,
        language: "javascript",
        framework: None,
        difficulty: Difficulty::Intermediate,
        tags: &["javascript", "free"],
        author: Some("Marijn Haverbeke"),
        rating: Some(4.6),
    },
    Entry {
        id: "local-pro-git",
        title: "Pro Git",
        description: "Everything you need to know about Git, free to read and download.",
        url: "https://github.com/progit/progit2/releases/download/2.1.360/progit.pdf",
        resource_type: ResourceType::Pdf,
        language: "general",
        framework: None,
        difficulty: Difficulty::Beginner,
        tags: &["git", "free", "tools"],
        author: Some("Scott Chacon, Ben Straub"),
        rating: Some(4.7),
    },
    Entry {
        id: "local-react-learn",
        title: "Learn React",
        description: "The official React docs: components, state, effects and hooks.",
        url: "https://react.dev/learn",
        resource_type: ResourceType::Doc,
        language: "javascript",
        framework: Some("react"),
        difficulty: Difficulty::Intermediate,
        tags: &["javascript", "react", "frontend"],
        author: Some("Meta"),
        rating: Some(4.6),
    },
    Entry {
        id: "local-docker-overview",
        title: "Docker Overview",
        description: "What containers are and how Docker builds, ships and runs them.",
        url: "https://docs.docker.com/get-started/docker-overview/",
        resource_type: ResourceType::Doc,
        language: "general",
        framework: None,
        difficulty: Difficulty::Beginner,
        tags: &["docker", "containers", "devops"],
        author: Some("Docker"),
        rating: None,
    },
    Entry {
        id: "local-twelve-factor",
        title: "The Twelve-Factor App",
        description: "A methodology for building software-as-a-service apps.",
        url: "https://12factor.net/",
        resource_type: ResourceType::Article,
        language: "general",
        framework: None,
        difficulty: Difficulty::Intermediate,
        tags: &["architecture", "devops"],
        author: Some("Adam Wiggins"),
        rating: Some(4.4),
    },
    Entry {
        id: "local-cpu-memory",
        title: "What Every Programmer Should Know About Memory",
        description: "A deep dive into caches, NUMA and how memory shapes performance.",
        url: "https://people.freebsd.org/~lstewart/articles/cpumemory.pdf",
        resource_type: ResourceType::Pdf,
        language: "c",
        framework: None,
        difficulty: Difficulty::Advanced,
        tags: &["performance", "memory", "free"],
        author: Some("Ulrich Drepper"),
        rating: Some(4.5),
    },
];

/// The built-in catalog, freshly built.
pub fn catalog() -> Vec<Resource> {
    CATALOG
        .iter()
        .map(|e| Resource {
            id: e.id.to_string(),
            title: e.title.to_string(),
            description: e.description.to_string(),
            url: e.url.to_string(),
            resource_type: e.resource_type,
            language: e.language.to_string(),
            framework: e.framework.map(str::to_string),
            difficulty: e.difficulty,
            tags: e.tags.iter().map(|t| t.to_string()).collect(),
            author: e.author.map(str::to_string),
            rating: e.rating,
        })
        .collect()
}

/// Filter the built-in catalog with every filter in `query` and slice out the
/// requested page.
pub fn respond(query: &ResourceQuery) -> PaginatedResult {
    let matching = apply_filters(&catalog(), query);
    let total = matching.len() as u64;
    let total_pages = page_count(total, query.page_size);

    let items: Vec<Resource> = matching
        .into_iter()
        .skip(query.offset())
        .take(query.page_size as usize)
        .collect();

    PaginatedResult::new(
        items,
        Total::Exact(total),
        query.page,
        query.page_size,
        total_pages,
        query.page < total_pages,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn catalog_ids_and_urls_are_unique() {
        let items = catalog();
        let ids: HashSet<_> = items.iter().map(|r| r.id.as_str()).collect();
        let urls: HashSet<_> = items.iter().map(|r| r.url.as_str()).collect();
        assert_eq!(ids.len(), items.len());
        assert_eq!(urls.len(), items.len());
    }

    #[test]
    fn catalog_has_no_videos() {
        let result = respond(&ResourceQuery::new().of_type(ResourceType::Video).page_size(10));
        assert!(result.items.is_empty());
        assert_eq!(result.total_pages, 1);
        assert_eq!(result.total, Total::Exact(0));
    }

    #[test]
    fn filters_and_slices() {
        let query = ResourceQuery::new().of_type(ResourceType::Doc).page_size(2);
        let first = respond(&query);
        assert_eq!(first.items.len(), 2);
        assert_eq!(first.total, Total::Exact(4));
        assert_eq!(first.total_pages, 2);
        assert!(first.has_next);

        let second = respond(&query.at_page(2));
        assert_eq!(second.items.len(), 2);
        assert!(!second.has_next);
        assert_ne!(first.items[0].id, second.items[0].id);
    }

    #[test]
    fn page_past_the_end_is_empty_but_valid() {
        let result = respond(&ResourceQuery::new().page(9));
        assert!(result.items.is_empty());
        assert_eq!(result.page, 9);
        assert!(result.total_pages >= 1);
    }

    #[test]
    fn text_query_applies() {
        let result = respond(&ResourceQuery::new().text("docker"));
        assert_eq!(result.items.len(), 1);
        assert_eq!(result.items[0].id, "local-docker-overview");
    }
}
