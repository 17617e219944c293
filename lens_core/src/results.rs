//! # Search Result Data Structures
//!
//! Read-only records produced by the upstream search/evaluation pipeline.
//! The view engine never mutates these; it only derives view state from them.
//!
//! ## Structure
//!
//! ```text
//! ResultSet (insertion-ordered)
//! └── attribute name → AttributeResults
//!     ├── summary: [Summary]   (articleScores, crossAttributeScores)
//!     └── articles: [Article]
//! ```
//!
//! Every optional field is lenient: absent lists, `null` score maps and
//! non-numeric scores all degrade to empty/zero instead of failing.

use std::collections::HashMap;
use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

/// Identifier of a summary or article.
///
/// Upstream emits both `"summary_0"` and bare numbers; both normalize to a
/// string so `1` and `"1"` address the same item.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        ItemId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(value: &str) -> Self {
        ItemId(value.to_string())
    }
}

impl From<String> for ItemId {
    fn from(value: String) -> Self {
        ItemId(value)
    }
}

impl From<u64> for ItemId {
    fn from(value: u64) -> Self {
        ItemId(value.to_string())
    }
}

impl<'de> Deserialize<'de> for ItemId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Integer(i64),
            Float(f64),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(text) => ItemId(text),
            RawId::Integer(n) => ItemId(n.to_string()),
            RawId::Float(f) => ItemId(f.to_string()),
        })
    }
}

/// A relevance score on the 0-5 scale.
///
/// Deserialization accepts numbers, numeric strings and `null`; anything that
/// does not parse becomes 0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Score(pub f64);

impl<'de> Deserialize<'de> for Score {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawScore {
            Number(f64),
            Text(String),
            Other(serde_json::Value),
        }

        let value = match RawScore::deserialize(deserializer)? {
            RawScore::Number(n) => n,
            RawScore::Text(text) => text.trim().parse().unwrap_or(0.0),
            RawScore::Other(_) => 0.0,
        };
        Ok(Score(if value.is_finite() { value } else { 0.0 }))
    }
}

/// Score map keyed by item id.
pub type ScoreMap = HashMap<ItemId, Score>;

/// An evaluated summary point for one attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub id: ItemId,

    #[serde(default)]
    pub text: String,

    /// Generator confidence in [0, 1]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,

    /// Number of articles the summary was drawn from
    #[serde(
        default,
        deserialize_with = "lenient_count",
        skip_serializing_if = "Option::is_none"
    )]
    pub source_count: Option<u32>,

    /// Groundedness of this summary against each article (0-5)
    #[serde(
        default,
        rename = "articleScores",
        deserialize_with = "null_as_default",
        skip_serializing_if = "HashMap::is_empty"
    )]
    pub article_scores: ScoreMap,

    /// Relevance of this summary to the summaries of other attributes (0-5),
    /// keyed by attribute name then summary id
    #[serde(
        default,
        rename = "crossAttributeScores",
        deserialize_with = "null_as_default",
        skip_serializing_if = "HashMap::is_empty"
    )]
    pub cross_attribute_scores: HashMap<String, ScoreMap>,

    /// Aggregate groundedness reported by the evaluator
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub groundedness: Option<f64>,
}

impl Summary {
    pub fn new(id: impl Into<ItemId>, text: impl Into<String>) -> Self {
        Summary {
            id: id.into(),
            text: text.into(),
            confidence: None,
            source_count: None,
            article_scores: HashMap::new(),
            cross_attribute_scores: HashMap::new(),
            groundedness: None,
        }
    }

    /// Builder: set the groundedness score against one article.
    pub fn with_article_score(mut self, article_id: impl Into<ItemId>, score: f64) -> Self {
        self.article_scores.insert(article_id.into(), Score(score));
        self
    }

    /// Builder: set the relevance score against a summary of another attribute.
    pub fn with_cross_score(
        mut self,
        attribute: impl Into<String>,
        summary_id: impl Into<ItemId>,
        score: f64,
    ) -> Self {
        self.cross_attribute_scores
            .entry(attribute.into())
            .or_default()
            .insert(summary_id.into(), Score(score));
        self
    }

    /// Groundedness of this summary in the given article, if scored.
    pub fn article_score(&self, article_id: &ItemId) -> Option<f64> {
        self.article_scores.get(article_id).map(|s| s.0)
    }

    /// Relevance of this summary to `summary_id` of `attribute`, if scored.
    pub fn cross_score(&self, attribute: &str, summary_id: &ItemId) -> Option<f64> {
        self.cross_attribute_scores
            .get(attribute)
            .and_then(|scores| scores.get(summary_id))
            .map(|s| s.0)
    }
}

/// A retrieved source article.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub id: ItemId,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub content: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Retriever relevance; informational only, never used for ordering
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relevance_score: Option<f64>,
}

impl Article {
    pub fn new(id: impl Into<ItemId>, title: impl Into<String>, content: impl Into<String>) -> Self {
        Article {
            id: id.into(),
            title: title.into(),
            content: content.into(),
            url: None,
            relevance_score: None,
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}

/// Raw per-attribute payload as delivered by the search service.
///
/// Either list may be absent or `null`; the normalizer fills in empties.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttributeResults {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<Vec<Summary>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub articles: Option<Vec<Article>>,
}

impl AttributeResults {
    pub fn new(summary: Vec<Summary>, articles: Vec<Article>) -> Self {
        AttributeResults {
            summary: Some(summary),
            articles: Some(articles),
        }
    }
}

/// Results keyed by attribute name, in document order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultSet {
    attributes: IndexMap<String, AttributeResults>,
}

impl ResultSet {
    pub fn new() -> Self {
        ResultSet::default()
    }

    /// Builder: append an attribute. Re-inserting a name replaces its payload
    /// but keeps its original position.
    pub fn with_attribute(mut self, name: impl Into<String>, results: AttributeResults) -> Self {
        self.insert(name, results);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, results: AttributeResults) {
        self.attributes.insert(name.into(), results);
    }

    pub fn get(&self, name: &str) -> Option<&AttributeResults> {
        self.attributes.get(name)
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &AttributeResults)> {
        self.attributes.iter()
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A count given as a number or numeric string. Fractions truncate; values
/// that are negative, out of range or not numeric read as absent.
fn lenient_count<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(value
        .filter(|n| n.is_finite() && *n >= 0.0 && *n <= f64::from(u32::MAX))
        .map(|n| n as u32))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_id_accepts_numbers_and_strings() {
        let ids: Vec<ItemId> = serde_json::from_str(r#"["summary_0", 7, 2.5]"#).unwrap();
        assert_eq!(ids[0], ItemId::new("summary_0"));
        assert_eq!(ids[1], ItemId::from(7u64));
        assert_eq!(ids[2], ItemId::new("2.5"));
    }

    #[test]
    fn test_summary_parses_upstream_shape() {
        let json = r#"{
            "id": "summary_0",
            "text": "Open models are auditable.",
            "confidence": 0.9,
            "source_count": 3,
            "articleScores": { "article_0": 4.7, "article_1": "3.8", "article_2": null },
            "crossAttributeScores": { "Drawbacks": { "summary_0": 4.5 } },
            "groundedness": 3.8
        }"#;
        let summary: Summary = serde_json::from_str(json).unwrap();

        assert_eq!(summary.confidence, Some(0.9));
        assert_eq!(summary.source_count, Some(3));
        assert_eq!(summary.article_score(&ItemId::new("article_0")), Some(4.7));
        assert_eq!(summary.article_score(&ItemId::new("article_1")), Some(3.8));
        assert_eq!(summary.article_score(&ItemId::new("article_2")), Some(0.0));
        assert_eq!(summary.article_score(&ItemId::new("article_9")), None);
        assert_eq!(summary.cross_score("Drawbacks", &ItemId::new("summary_0")), Some(4.5));
        assert_eq!(summary.cross_score("Benefits", &ItemId::new("summary_0")), None);
    }

    #[test]
    fn test_source_count_is_lenient() {
        let count = |raw: &str| {
            let json = format!(r#"{{ "id": 1, "source_count": {} }}"#, raw);
            serde_json::from_str::<Summary>(&json).unwrap().source_count
        };
        assert_eq!(count("3.0"), Some(3));
        assert_eq!(count(r#""2""#), Some(2));
        assert_eq!(count("-1"), None);
        assert_eq!(count("null"), None);
        assert_eq!(count(r#""many""#), None);
        assert_eq!(count("1e12"), None);

        let summary: Summary = serde_json::from_str(r#"{ "id": 1 }"#).unwrap();
        assert_eq!(summary.source_count, None);
    }

    #[test]
    fn test_summary_tolerates_missing_and_null_maps() {
        let summary: Summary =
            serde_json::from_str(r#"{ "id": 1, "articleScores": null }"#).unwrap();
        assert!(summary.text.is_empty());
        assert!(summary.article_scores.is_empty());
        assert!(summary.cross_attribute_scores.is_empty());
        assert_eq!(summary.confidence, None);
    }

    #[test]
    fn test_numeric_score_keys_match_numeric_ids() {
        let summary: Summary =
            serde_json::from_str(r#"{ "id": 1, "articleScores": { "1": 2, "2": 4 } }"#).unwrap();
        let article: Article = serde_json::from_str(r#"{ "id": 2, "title": "t" }"#).unwrap();
        assert_eq!(summary.article_score(&article.id), Some(4.0));
    }

    #[test]
    fn test_result_set_preserves_document_order() {
        let json = r#"{
            "zeta": { "summary": [], "articles": [] },
            "alpha": { "summary": null },
            "mid": {}
        }"#;
        let results: ResultSet = serde_json::from_str(json).unwrap();
        let names: Vec<&String> = results.iter().map(|(name, _)| name).collect();
        assert_eq!(names, ["zeta", "alpha", "mid"]);
        assert_eq!(results.get("alpha").unwrap().summary, None);
    }
}
