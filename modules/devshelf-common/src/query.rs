use tracing::debug;

use crate::types::{Difficulty, ResourceType, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

/// Search term used when the caller gives neither text nor tags.
pub const FALLBACK_SEARCH_TERM: &str = "programming";

/// Sentinel meaning "do not filter on this dimension".
const ALL: &str = "all";

/// Raw `/api/resources` query string. Everything stays a string so a bad value
/// degrades to a default instead of rejecting the request.
#[derive(Debug, Clone, Default)]
pub struct ResourceParams {
    pub query: Option<String>,
    pub resource_type: Option<String>,
    pub language: Option<String>,
    pub framework: Option<String>,
    pub difficulty: Option<String>,
    pub tags: Option<String>,
    pub page: Option<String>,
    pub page_size: Option<String>,
    pub provider: Option<String>,
}

impl ResourceParams {
    /// Collect decoded query-string pairs. Repeated `tags` accumulate; any
    /// other repeated key keeps its last value. Unknown keys are ignored.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut params = Self::default();
        let mut tags: Vec<String> = Vec::new();

        for (key, value) in pairs {
            let slot = match key.as_ref() {
                "query" => &mut params.query,
                "type" => &mut params.resource_type,
                "language" => &mut params.language,
                "framework" => &mut params.framework,
                "difficulty" => &mut params.difficulty,
                "page" => &mut params.page,
                "pageSize" => &mut params.page_size,
                "provider" => &mut params.provider,
                "tags" => {
                    tags.push(value.into());
                    continue;
                }
                _ => continue,
            };
            *slot = Some(value.into());
        }

        if !tags.is_empty() {
            params.tags = Some(tags.join(","));
        }
        params
    }

    pub fn to_query(&self) -> ResourceQuery {
        ResourceQuery {
            query: non_empty(self.query.as_deref()),
            resource_type: filter_value(self.resource_type.as_deref()).and_then(|v| {
                v.parse::<ResourceType>()
                    .map_err(|e| debug!(error = %e, "Ignoring type filter"))
                    .ok()
            }),
            language: filter_value(self.language.as_deref()),
            framework: filter_value(self.framework.as_deref()),
            difficulty: filter_value(self.difficulty.as_deref()).and_then(|v| {
                v.parse::<Difficulty>()
                    .map_err(|e| debug!(error = %e, "Ignoring difficulty filter"))
                    .ok()
            }),
            tags: self.tags.as_deref().map(parse_tags).unwrap_or_default(),
            page: parse_positive(self.page.as_deref()).unwrap_or(1),
            page_size: parse_positive(self.page_size.as_deref())
                .unwrap_or(DEFAULT_PAGE_SIZE)
                .min(MAX_PAGE_SIZE),
        }
    }
}

/// A validated, filter-ready resource query. `None` filters mean "all".
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceQuery {
    pub query: Option<String>,
    pub resource_type: Option<ResourceType>,
    pub language: Option<String>,
    pub framework: Option<String>,
    pub difficulty: Option<Difficulty>,
    pub tags: Vec<String>,
    pub page: u32,
    pub page_size: u32,
}

impl Default for ResourceQuery {
    fn default() -> Self {
        Self {
            query: None,
            resource_type: None,
            language: None,
            framework: None,
            difficulty: None,
            tags: Vec::new(),
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl ResourceQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        let text: String = text.into();
        self.query = non_empty(Some(text.as_str()));
        self
    }

    pub fn of_type(mut self, resource_type: ResourceType) -> Self {
        self.resource_type = Some(resource_type);
        self
    }

    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.tags = tags
            .into_iter()
            .map(|t| t.as_ref().trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect();
        self
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = page.max(1);
        self
    }

    pub fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.clamp(1, MAX_PAGE_SIZE);
        self
    }

    /// Same query, different page.
    pub fn at_page(&self, page: u32) -> Self {
        self.clone().page(page)
    }

    /// Zero-based index of the first item on the requested page.
    pub fn offset(&self) -> usize {
        (self.page.max(1) as usize - 1).saturating_mul(self.page_size as usize)
    }

    /// The user's text, else their first tag, else a generic term.
    pub fn search_term(&self) -> &str {
        self.query
            .as_deref()
            .or_else(|| self.tags.first().map(String::as_str))
            .unwrap_or(FALLBACK_SEARCH_TERM)
    }

    pub fn wants_free(&self) -> bool {
        self.tags.iter().any(|t| t == "free")
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn filter_value(value: Option<&str>) -> Option<String> {
    non_empty(value).filter(|v| !v.eq_ignore_ascii_case(ALL))
}

fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect()
}

fn parse_positive(value: Option<&str>) -> Option<u32> {
    value
        .and_then(|v| v.trim().parse::<u32>().ok())
        .filter(|n| *n >= 1)
}
