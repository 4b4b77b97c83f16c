// Filter engine. Pure and order-preserving; inputs are never mutated.

use devshelf_common::{Resource, ResourceQuery, ResourceType};

/// Keep the items that satisfy every active filter in `query`.
pub fn apply_filters(items: &[Resource], query: &ResourceQuery) -> Vec<Resource> {
    items
        .iter()
        .filter(|r| matches(r, query))
        .cloned()
        .collect()
}

pub fn matches(resource: &Resource, query: &ResourceQuery) -> bool {
    if let Some(t) = query.resource_type {
        if resource.resource_type != t {
            return false;
        }
    }
    if let Some(ref language) = query.language {
        if !resource.language.eq_ignore_ascii_case(language) {
            return false;
        }
    }
    if let Some(ref framework) = query.framework {
        let hit = resource
            .framework
            .as_deref()
            .is_some_and(|f| f.eq_ignore_ascii_case(framework));
        if !hit {
            return false;
        }
    }
    if let Some(difficulty) = query.difficulty {
        if resource.difficulty != difficulty {
            return false;
        }
    }
    // ANY semantics: one shared tag is enough.
    if !query.tags.is_empty() && !query.tags.iter().any(|t| resource.has_tag(t)) {
        return false;
    }
    if let Some(ref text) = query.query {
        if !matches_text(resource, text) {
            return false;
        }
    }
    true
}

/// Case-insensitive substring over title, description, and tags.
fn matches_text(resource: &Resource, text: &str) -> bool {
    let needle = text.to_lowercase();
    resource.title.to_lowercase().contains(&needle)
        || resource.description.to_lowercase().contains(&needle)
        || resource
            .tags
            .iter()
            .any(|t| t.to_lowercase().contains(&needle))
}

/// The one filter re-applied after an upstream has already been asked to filter.
pub fn retain_type(items: Vec<Resource>, resource_type: Option<ResourceType>) -> Vec<Resource> {
    match resource_type {
        Some(t) => items.into_iter().filter(|r| r.resource_type == t).collect(),
        None => items,
    }
}
