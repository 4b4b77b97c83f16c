// Provider-native fields → unified Resource, with explicit defaults for
// anything the upstream left out.

use devshelf_common::{Difficulty, Resource, ResourceType, GENERAL_LANGUAGE};

use crate::infer;

pub const UNTITLED: &str = "Untitled";

/// Link used when the upstream gives none.
pub const MISSING_URL: &str = "#";

const MAX_RATING: f32 = 5.0;

/// Everything an adapter managed to pull out of one upstream item.
#[derive(Debug, Clone, Default)]
pub struct RawResource {
    pub id: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub resource_type: Option<ResourceType>,
    pub language: Option<String>,
    pub framework: Option<String>,
    pub difficulty: Option<Difficulty>,
    pub tags: Vec<String>,
    pub author: Option<String>,
    pub rating: Option<f32>,
}

impl RawResource {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn into_resource(self) -> Resource {
        let tags = normalize_tags(self.tags);
        let url = clean(self.url).unwrap_or_else(|| MISSING_URL.to_string());
        let resource_type = self
            .resource_type
            .unwrap_or_else(|| infer::infer_type(&url));

        Resource {
            id: self.id,
            title: clean(self.title).unwrap_or_else(|| UNTITLED.to_string()),
            description: clean(self.description).unwrap_or_default(),
            resource_type,
            language: clean(self.language)
                .or_else(|| infer::language_from_tags(&tags))
                .unwrap_or_else(|| GENERAL_LANGUAGE.to_string()),
            framework: clean(self.framework).or_else(|| infer::framework_from_tags(&tags)),
            difficulty: self
                .difficulty
                .unwrap_or_else(|| infer::difficulty_from_tags(&tags)),
            author: clean(self.author),
            rating: self
                .rating
                .filter(|r| r.is_finite())
                .map(|r| r.clamp(0.0, MAX_RATING)),
            url,
            tags,
        }
    }
}

fn clean(value: Option<String>) -> Option<String> {
    value
        .map(|v| decode_entities(v.trim()))
        .filter(|v| !v.is_empty())
}

/// Lowercase, trimmed, de-duplicated; first occurrence keeps its position.
fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim().to_lowercase();
        if !tag.is_empty() && !out.contains(&tag) {
            out.push(tag);
        }
    }
    out
}

/// Undo the handful of HTML entities search APIs like to leave in titles.
pub fn decode_entities(s: &str) -> String {
    if !s.contains('&') {
        return s.to_string();
    }
    s.replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&apos;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}
