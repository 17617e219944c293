//! # Search Boundary
//!
//! Assembles the JSON payload for the search service from typed settings and
//! parses the service's response envelope. No network I/O happens here.
//!
//! ## Example
//!
//! ```rust
//! use lens_core::request::build_search_request;
//! use lens_core::settings::SearchSettings;
//!
//! let mut settings = SearchSettings::default();
//! settings.add_aspect("pro").unwrap();
//! settings.add_aspect("con").unwrap();
//!
//! let request = build_search_request("  should LLMs be open sourced? ", &settings).unwrap();
//! assert_eq!(request.query, "should LLMs be open sourced?");
//! assert_eq!(request.attributes, vec!["pro", "con"]);
//! ```

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::errors::{LensError, LensResult};
use crate::results::ResultSet;
use crate::settings::{
    Browser, EvaluatorSettings, Generator, JudgeCategory, RerankMethod, RetrievalAlgorithm,
    SearchSettings,
};

/// Request body for `POST /api/search`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    pub query: String,
    pub browser: BrowserSpec,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reranker: Option<RerankerSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query_reformulation: Option<PromptSpec>,
    /// Names of the selected aspects; one slide per name comes back
    pub attributes: Vec<String>,
    pub generator: GeneratorSpec,
    pub evaluation: EvaluationSpec,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BrowserSpec {
    #[serde(rename = "type")]
    pub kind: Browser,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub algorithm: Option<RetrievalAlgorithm>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RerankerSpec {
    pub prompt: String,
    pub method: RerankMethod,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PromptSpec {
    pub prompt: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratorSpec {
    pub model: Generator,
    pub version: String,
    pub api_key: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationSpec {
    pub evaluator: EvaluatorSettings,
    pub categories: Vec<CategorySpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySpec {
    pub name: JudgeCategory,
    pub prompt: String,
    pub is_enabled: bool,
}

/// Build the search request for `query`.
///
/// # Errors
///
/// * `InvalidInput` - the query is blank
/// * `MissingField` - no aspect is selected, so there is nothing to compare
pub fn build_search_request(query: &str, settings: &SearchSettings) -> LensResult<SearchRequest> {
    let query = query.trim();
    if query.is_empty() {
        return Err(LensError::invalid_input("query", query, "Query must not be empty"));
    }

    let attributes: Vec<String> = settings
        .selected_aspects()
        .into_iter()
        .map(str::to_string)
        .collect();
    if attributes.is_empty() {
        return Err(LensError::missing_field("aspects"));
    }

    let browser = BrowserSpec {
        kind: settings.browser,
        algorithm: settings
            .browser
            .uses_algorithm()
            .then_some(settings.search_algorithm),
    };

    let reranker = settings.reranker.enabled.then(|| RerankerSpec {
        prompt: settings.reranker.prompt.clone(),
        method: settings.reranker.method,
    });

    let query_reformulation = settings.query_reformulation.enabled.then(|| PromptSpec {
        prompt: settings.query_reformulation.prompt.clone(),
    });

    let categories = JudgeCategory::ALL
        .iter()
        .map(|category| {
            let config = settings.judge.category(*category);
            CategorySpec {
                name: *category,
                prompt: config.prompt.clone(),
                is_enabled: config.enabled,
            }
        })
        .collect();

    Ok(SearchRequest {
        query: query.to_string(),
        browser,
        reranker,
        query_reformulation,
        attributes,
        generator: GeneratorSpec {
            model: settings.generator,
            version: settings.model.clone(),
            api_key: settings.api_key.clone(),
        },
        evaluation: EvaluationSpec {
            evaluator: settings.judge.evaluator.clone(),
            categories,
        },
    })
}

/// Response envelope returned by the search service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,

    /// ISO-8601, usually without an offset (`2025-03-27T21:34:36`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<ResultSet>,
}

impl SearchResponse {
    /// When the results were produced, if the timestamp parses.
    pub fn timestamp(&self) -> Option<NaiveDateTime> {
        let raw = self.timestamp.as_deref()?.trim();
        raw.parse::<NaiveDateTime>()
            .ok()
            .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.naive_utc()))
    }

    /// The result set, or `None` for the "no data" state.
    ///
    /// # Errors
    ///
    /// * `SearchFailed` - the envelope carries a status other than `success`
    pub fn into_result_set(self) -> LensResult<Option<ResultSet>> {
        match self.status.as_deref() {
            None | Some("success") => Ok(self.results),
            Some(other) => Err(LensError::search_failed(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings_with_aspects() -> SearchSettings {
        let mut settings = SearchSettings::default();
        settings.add_aspect("Benefits").unwrap();
        settings.add_aspect("Drawbacks").unwrap();
        settings
    }

    #[test]
    fn test_default_request_payload() {
        let request = build_search_request("open source llms", &settings_with_aspects()).unwrap();
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["query"], "open source llms");
        assert_eq!(json["browser"]["type"], "google");
        assert!(json["browser"].get("algorithm").is_none());
        assert!(json.get("reranker").is_none());
        assert!(json.get("queryReformulation").is_none());
        assert_eq!(json["attributes"], serde_json::json!(["Benefits", "Drawbacks"]));
        assert_eq!(json["generator"]["model"], "gpt-4");
        assert_eq!(json["generator"]["version"], "gpt-4-turbo");
        assert_eq!(json["generator"]["apiKey"], "");
        assert_eq!(json["evaluation"]["evaluator"]["modelVersion"], "gpt-4-turbo");
        assert_eq!(json["evaluation"]["categories"][2]["name"], "Answer Groundedness");
        assert_eq!(json["evaluation"]["categories"][0]["isEnabled"], true);
    }

    #[test]
    fn test_optional_sections() {
        let mut settings = settings_with_aspects();
        settings.browser = Browser::Pyserini;
        settings.search_algorithm = RetrievalAlgorithm::Bm25;
        settings.reranker.enabled = true;
        settings.reranker.method = RerankMethod::Listwise;
        settings.query_reformulation.enabled = true;

        let json = serde_json::to_value(build_search_request("q", &settings).unwrap()).unwrap();
        assert_eq!(json["browser"]["algorithm"], "BM25");
        assert_eq!(json["reranker"]["method"], "listwise");
        assert!(json["queryReformulation"]["prompt"].as_str().unwrap().starts_with("Analyze"));
    }

    #[test]
    fn test_request_validation() {
        let err = build_search_request("   ", &settings_with_aspects()).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");

        let err = build_search_request("query", &SearchSettings::default()).unwrap_err();
        assert_eq!(err, LensError::missing_field("aspects"));

        let mut settings = settings_with_aspects();
        let ids: Vec<_> = settings.aspects.iter().map(|a| a.id).collect();
        for id in &ids {
            settings.toggle_aspect(id);
        }
        assert!(build_search_request("query", &settings).is_err());
    }

    #[test]
    fn test_response_envelope() {
        let json = r#"{
            "status": "success",
            "query": "Should LLM be open sourced",
            "timestamp": "2025-03-27T21:34:36",
            "results": { "Benefits": { "summary": [], "articles": [] } }
        }"#;
        let response: SearchResponse = serde_json::from_str(json).unwrap();
        let stamp = response.timestamp().unwrap();
        assert_eq!(stamp.to_string(), "2025-03-27 21:34:36");

        let results = response.into_result_set().unwrap().unwrap();
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn test_response_failure_and_empty() {
        let failed: SearchResponse = serde_json::from_str(r#"{ "status": "error" }"#).unwrap();
        assert_eq!(
            failed.into_result_set().unwrap_err(),
            LensError::search_failed("error")
        );

        let empty: SearchResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(empty.timestamp(), None);
        assert_eq!(empty.into_result_set().unwrap(), None);
    }
}
