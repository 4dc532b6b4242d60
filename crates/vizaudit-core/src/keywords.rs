//! Keyword extraction for competitor discovery.
//!
//! Pulls candidate keywords out of provider category tags, the business name,
//! and scraped website text, then folds them into a search query used to find
//! nearby competitors in the same line of business.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Category tags too generic to describe a line of business.
const GENERIC_TYPES: &[&str] = &[
    "point_of_interest",
    "establishment",
    "food",
    "store",
    "place_of_worship",
];

const NAME_STOP_WORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "of", "in", "at", "to", "for", "is", "on", "with", "by",
    "from", "as", "ltd", "limited", "llc", "inc", "co", "company", "group",
];

const CONTENT_STOP_WORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "of", "in", "at", "to", "for", "is", "on", "with", "by",
    "from", "as", "we", "our", "your", "you", "us", "are", "be", "been", "being", "have",
    "has", "had", "do", "does", "did", "will", "would", "could", "should", "may", "might",
    "must", "shall", "can", "need", "dare", "ought", "used", "welcome", "home", "page",
    "website", "site", "contact", "about", "services", "products", "more", "click", "here",
    "read", "learn",
];

/// Combined keyword view of a business, ready for query building.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusinessKeywords {
    pub primary_category: String,
    pub categories: Vec<String>,
    pub keywords: Vec<String>,
    pub services: Vec<String>,
}

/// Extract up to five business-describing keywords from provider category tags.
///
/// Generic tags are dropped and underscores become spaces
/// (`"hair_salon"` → `"hair salon"`).
#[must_use]
pub fn extract_from_categories(types: &[String]) -> Vec<String> {
    types
        .iter()
        .filter(|t| !GENERIC_TYPES.contains(&t.as_str()))
        .map(|t| t.replace('_', " "))
        .take(5)
        .collect()
}

/// Extract up to five keywords from the business name, dropping stop words
/// and anything shorter than three characters.
#[must_use]
pub fn extract_from_name(name: &str) -> Vec<String> {
    name.to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect::<String>()
        .split_whitespace()
        .filter(|w| w.len() > 2 && !NAME_STOP_WORDS.contains(w))
        .map(ToOwned::to_owned)
        .take(5)
        .collect()
}

/// Extract the ten most frequent content words from page title, meta
/// description, and headings.
#[must_use]
pub fn extract_from_content(title: Option<&str>, description: Option<&str>, headings: &[String]) -> Vec<String> {
    let mut text = String::new();
    if let Some(t) = title {
        text.push(' ');
        text.push_str(t);
    }
    if let Some(d) = description {
        text.push(' ');
        text.push_str(d);
    }
    for h in headings {
        text.push(' ');
        text.push_str(h);
    }

    let mut counts: HashMap<String, usize> = HashMap::new();
    for word in text
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect::<String>()
        .split_whitespace()
        .filter(|w| w.len() > 3 && !CONTENT_STOP_WORDS.contains(w))
    {
        *counts.entry(word.to_owned()).or_insert(0) += 1;
    }

    let mut ranked: Vec<(String, usize)> = counts.into_iter().collect();
    // Frequency first; tie-break alphabetically so ordering is deterministic.
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.into_iter().map(|(w, _)| w).take(10).collect()
}

/// Merge all keyword sources, deduplicating in priority order
/// (categories, then name words, then content words).
#[must_use]
pub fn combine_keywords(
    categories: Vec<String>,
    name_keywords: Vec<String>,
    content_keywords: Vec<String>,
) -> BusinessKeywords {
    let mut all: Vec<String> = Vec::new();
    for kw in categories
        .iter()
        .chain(name_keywords.iter())
        .chain(content_keywords.iter())
    {
        if !all.contains(kw) {
            all.push(kw.clone());
        }
    }

    let primary_category = categories
        .first()
        .or_else(|| name_keywords.first())
        .cloned()
        .unwrap_or_else(|| "business".to_string());

    BusinessKeywords {
        primary_category,
        categories,
        keywords: all.into_iter().take(10).collect(),
        services: content_keywords.into_iter().take(5).collect(),
    }
}

/// Build the competitor search query: primary category plus up to two more
/// distinct keywords.
#[must_use]
pub fn build_competitor_query(keywords: &BusinessKeywords) -> String {
    let mut parts: Vec<&str> = Vec::new();
    if !keywords.primary_category.is_empty() {
        parts.push(&keywords.primary_category);
    }
    for kw in keywords.keywords.iter().take(2) {
        if !parts.contains(&kw.as_str()) {
            parts.push(kw);
        }
    }
    parts.join(" ")
}
