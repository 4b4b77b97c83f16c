// Classification heuristics for providers that don't say what they return.
//
// Type rules are ordered and the first match wins:
//   .pdf suffix → pdf, video host → video, documentation host/path → doc,
//   anything else → article.

use devshelf_common::{Difficulty, ResourceType};
use url::Url;

const VIDEO_HOSTS: &[&str] = &[
    "youtube.com",
    "youtu.be",
    "vimeo.com",
    "twitch.tv",
    "egghead.io",
    "frontendmasters.com",
];

const DOC_HOSTS: &[&str] = &[
    "developer.mozilla.org",
    "doc.rust-lang.org",
    "docs.rs",
    "readthedocs.io",
    "learn.microsoft.com",
    "devdocs.io",
    "pkg.go.dev",
];

const DOC_PATH_SEGMENTS: &[&str] = &["docs", "documentation", "reference", "manual", "api-docs"];

/// Tag → canonical language name.
const LANGUAGES: &[(&str, &str)] = &[
    ("javascript", "javascript"),
    ("js", "javascript"),
    ("typescript", "typescript"),
    ("ts", "typescript"),
    ("python", "python"),
    ("rust", "rust"),
    ("go", "go"),
    ("golang", "go"),
    ("java", "java"),
    ("kotlin", "kotlin"),
    ("swift", "swift"),
    ("c", "c"),
    ("cpp", "cpp"),
    ("c++", "cpp"),
    ("csharp", "csharp"),
    ("c#", "csharp"),
    ("ruby", "ruby"),
    ("php", "php"),
    ("scala", "scala"),
    ("elixir", "elixir"),
    ("haskell", "haskell"),
    ("dart", "dart"),
    ("sql", "sql"),
];

const FRAMEWORKS: &[&str] = &[
    "react", "vue", "angular", "svelte", "nextjs", "nuxt", "django", "flask", "fastapi",
    "rails", "spring", "express", "laravel", "flutter", "tokio", "axum",
];

pub fn infer_type(url: &str) -> ResourceType {
    let Ok(parsed) = Url::parse(url.trim()) else {
        // Not a URL we can reason about beyond the suffix.
        return if url.trim().to_ascii_lowercase().ends_with(".pdf") {
            ResourceType::Pdf
        } else {
            ResourceType::Article
        };
    };

    let path = parsed.path().to_ascii_lowercase();
    if path.ends_with(".pdf") {
        return ResourceType::Pdf;
    }

    let host = parsed.host_str().unwrap_or_default().to_ascii_lowercase();
    if VIDEO_HOSTS.iter().any(|h| host_matches(&host, h)) {
        return ResourceType::Video;
    }

    if host.starts_with("docs.")
        || DOC_HOSTS.iter().any(|h| host_matches(&host, h))
        || path
            .split('/')
            .any(|segment| DOC_PATH_SEGMENTS.contains(&segment))
    {
        return ResourceType::Doc;
    }

    ResourceType::Article
}

/// Exact host or any subdomain of it.
fn host_matches(host: &str, domain: &str) -> bool {
    host == domain
        || host
            .strip_suffix(domain)
            .is_some_and(|prefix| prefix.ends_with('.'))
}

/// First tag that names a programming language.
pub fn language_from_tags(tags: &[String]) -> Option<String> {
    tags.iter().find_map(|tag| {
        let tag = tag.to_ascii_lowercase();
        LANGUAGES
            .iter()
            .find(|(alias, _)| *alias == tag)
            .map(|(_, name)| name.to_string())
    })
}

pub fn framework_from_tags(tags: &[String]) -> Option<String> {
    tags.iter()
        .map(|t| t.to_ascii_lowercase())
        .find(|t| FRAMEWORKS.contains(&t.as_str()))
}

pub fn difficulty_from_tags(tags: &[String]) -> Difficulty {
    if has_any(tags, &["beginner", "beginners", "newbie", "tutorial"]) {
        Difficulty::Beginner
    } else if has_any(tags, &["advanced", "expert"]) {
        Difficulty::Advanced
    } else {
        Difficulty::Intermediate
    }
}

fn has_any(tags: &[String], wanted: &[&str]) -> bool {
    tags.iter()
        .any(|t| wanted.contains(&t.to_ascii_lowercase().as_str()))
}
