//! Result set normalization.
//!
//! Flattens the attribute-keyed [`ResultSet`] into the ordered list of slide
//! records the carousel pages over.

use serde::Serialize;

use crate::results::{Article, ItemId, ResultSet, Summary};

/// Summaries and articles of one attribute, with absent lists defaulted.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SlideContent {
    pub summary: Vec<Summary>,
    pub articles: Vec<Article>,
}

impl SlideContent {
    pub fn find_summary(&self, id: &ItemId) -> Option<&Summary> {
        self.summary.iter().find(|s| &s.id == id)
    }
}

/// One slide's worth of data: the attribute name and its content.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlideRecord {
    pub attribute: String,
    pub content: SlideContent,
}

/// Convert a result set into slide records, in document order.
///
/// Never fails; missing `summary`/`articles` lists become empty.
///
/// # Example
///
/// ```rust
/// use lens_core::normalize::normalize;
/// use lens_core::results::ResultSet;
///
/// let results: ResultSet = serde_json::from_str(r#"{ "pro": {}, "con": { "summary": null } }"#).unwrap();
/// let slides = normalize(&results);
/// assert_eq!(slides.len(), 2);
/// assert_eq!(slides[0].attribute, "pro");
/// assert!(slides[1].content.summary.is_empty());
/// ```
pub fn normalize(results: &ResultSet) -> Vec<SlideRecord> {
    results
        .iter()
        .map(|(attribute, data)| SlideRecord {
            attribute: attribute.clone(),
            content: SlideContent {
                summary: data.summary.clone().unwrap_or_default(),
                articles: data.articles.clone().unwrap_or_default(),
            },
        })
        .collect()
}
