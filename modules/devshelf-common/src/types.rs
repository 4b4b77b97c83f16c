use std::fmt;
use std::str::FromStr;

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

/// Page size used when the caller does not ask for one (or asks for garbage).
pub const DEFAULT_PAGE_SIZE: u32 = 12;

/// Upper bound on a requested page size. Matches the largest cap any provider accepts.
pub const MAX_PAGE_SIZE: u32 = 50;

/// Language recorded when nothing better is known.
pub const GENERAL_LANGUAGE: &str = "general";

// --- Enums ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    Video,
    Book,
    Doc,
    Pdf,
    Article,
}

impl ResourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::Video => "video",
            ResourceType::Book => "book",
            ResourceType::Doc => "doc",
            ResourceType::Pdf => "pdf",
            ResourceType::Article => "article",
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "video" => Ok(ResourceType::Video),
            "book" => Ok(ResourceType::Book),
            "doc" => Ok(ResourceType::Doc),
            "pdf" => Ok(ResourceType::Pdf),
            "article" => Ok(ResourceType::Article),
            other => Err(format!("unknown resource type: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Beginner,
    #[default]
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "beginner" => Ok(Difficulty::Beginner),
            "intermediate" => Ok(Difficulty::Intermediate),
            "advanced" => Ok(Difficulty::Advanced),
            other => Err(format!("unknown difficulty: {other}")),
        }
    }
}

// --- Resource ---

/// The unified record every provider is normalized into.
///
/// `url` doubles as the de-duplication key when several providers are merged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub id: String,
    pub title: String,
    pub description: String,
    pub url: String,
    #[serde(rename = "type")]
    pub resource_type: ResourceType,
    pub language: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub framework: Option<String>,
    pub difficulty: Difficulty,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f32>,
}

impl Resource {
    /// Case-insensitive tag membership.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }
}

// --- Pagination ---

/// A result count, tagged with whether anyone actually counted it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Total {
    Exact(u64),
    Estimated(u64),
}

impl Total {
    pub fn value(&self) -> u64 {
        match self {
            Total::Exact(n) | Total::Estimated(n) => *n,
        }
    }

    pub fn is_estimate(&self) -> bool {
        matches!(self, Total::Estimated(_))
    }
}

/// Number of pages needed for `total` items. Never less than 1.
pub fn page_count(total: u64, page_size: u32) -> u32 {
    let page_size = u64::from(page_size.max(1));
    let pages = total.div_ceil(page_size).max(1);
    u32::try_from(pages).unwrap_or(u32::MAX)
}

#[derive(Debug, Clone, PartialEq)]
pub struct PaginatedResult {
    pub items: Vec<Resource>,
    pub total: Total,
    pub page: u32,
    pub page_size: u32,
    pub total_pages: u32,
    pub has_next: bool,
}

impl PaginatedResult {
    /// Build a page, holding `items.len() <= page_size` and `total_pages >= 1`.
    pub fn new(
        mut items: Vec<Resource>,
        total: Total,
        page: u32,
        page_size: u32,
        total_pages: u32,
        has_next: bool,
    ) -> Self {
        let page_size = page_size.max(1);
        items.truncate(page_size as usize);
        Self {
            items,
            total,
            page: page.max(1),
            page_size,
            total_pages: total_pages.max(1),
            has_next,
        }
    }

    /// "Page 1 of 1" with nothing on it.
    pub fn empty(page: u32, page_size: u32) -> Self {
        Self::new(Vec::new(), Total::Exact(0), page, page_size, 1, false)
    }
}

impl Serialize for PaginatedResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("PaginatedResult", 7)?;
        state.serialize_field("items", &self.items)?;
        state.serialize_field("total", &self.total.value())?;
        state.serialize_field("totalEstimated", &self.total.is_estimate())?;
        state.serialize_field("page", &self.page)?;
        state.serialize_field("pageSize", &self.page_size)?;
        state.serialize_field("totalPages", &self.total_pages)?;
        state.serialize_field("hasNext", &self.has_next)?;
        state.end()
    }
}
