//! # Settings
//!
//! Typed settings for the viewer and for the search request builder.
//!
//! ## Structure
//!
//! ```text
//! ViewerSettings   (paging, transition lock, excerpt length, colors)
//! SearchSettings
//! ├── browser / search_algorithm
//! ├── reranker / query_reformulation
//! ├── generator / model / api_key
//! ├── judge: JudgeSettings (evaluator + per-category prompts)
//! └── aspects: [Aspect]    (attributes to compare, e.g. "pro", "con")
//! ```
//!
//! Every struct carries serde defaults, so partial config files load.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::carousel::{DEFAULT_SETTLE_DELAY, DEFAULT_SLIDES_PER_PAGE};
use crate::errors::{LensError, LensResult};
use crate::scoring::ColorScheme;

/// Characters of article text shown before "Show More"
pub const DEFAULT_EXCERPT_CHARS: usize = 300;

/// Presentation settings consumed by the viewer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerSettings {
    pub slides_per_page: usize,

    /// Page-change lock in milliseconds
    pub transition_ms: u64,

    pub excerpt_chars: usize,

    pub colors: ColorScheme,
}

impl Default for ViewerSettings {
    fn default() -> Self {
        ViewerSettings {
            slides_per_page: DEFAULT_SLIDES_PER_PAGE,
            transition_ms: DEFAULT_SETTLE_DELAY.as_millis() as u64,
            excerpt_chars: DEFAULT_EXCERPT_CHARS,
            colors: ColorScheme::default(),
        }
    }
}

impl ViewerSettings {
    pub fn transition_delay(&self) -> Duration {
        Duration::from_millis(self.transition_ms)
    }

    /// Reject settings the viewer cannot honor.
    pub fn validate(&self) -> LensResult<()> {
        if self.slides_per_page == 0 {
            return Err(LensError::invalid_setting(
                "viewer.slides_per_page",
                "0",
                "At least one slide must fit on a page",
            ));
        }
        if self.excerpt_chars == 0 {
            return Err(LensError::invalid_setting(
                "viewer.excerpt_chars",
                "0",
                "Excerpts must show at least one character",
            ));
        }
        let opacity = self.colors.opacity;
        for (name, value) in [("floor", opacity.floor), ("span", opacity.span)] {
            if !(0.0..=1.0).contains(&value) {
                return Err(LensError::invalid_setting(
                    format!("viewer.colors.opacity.{}", name),
                    value.to_string(),
                    "Must lie in [0, 1]",
                ));
            }
        }
        if opacity.floor + opacity.span > 1.0 {
            return Err(LensError::invalid_setting(
                "viewer.colors.opacity",
                format!("{} + {}", opacity.floor, opacity.span),
                "Floor plus span must not exceed 1",
            ));
        }
        Ok(())
    }
}

/// Search backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Browser {
    #[default]
    Google,
    Bing,
    Pyterrier,
    Pyserini,
}

impl Browser {
    pub fn id(&self) -> &'static str {
        match self {
            Browser::Google => "google",
            Browser::Bing => "bing",
            Browser::Pyterrier => "pyterrier",
            Browser::Pyserini => "pyserini",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Browser::Google => "Google",
            Browser::Bing => "Microsoft Bing",
            Browser::Pyterrier => "Pyterrier",
            Browser::Pyserini => "Pyserini",
        }
    }

    /// Local index backends take a retrieval algorithm.
    pub fn uses_algorithm(&self) -> bool {
        matches!(self, Browser::Pyterrier | Browser::Pyserini)
    }
}

/// Retrieval model for local index backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RetrievalAlgorithm {
    #[default]
    #[serde(rename = "TFIDF")]
    TfIdf,
    #[serde(rename = "BM25")]
    Bm25,
    #[serde(rename = "colBERT")]
    ColBert,
}

impl RetrievalAlgorithm {
    pub fn display_name(&self) -> &'static str {
        match self {
            RetrievalAlgorithm::TfIdf => "TF-IDF",
            RetrievalAlgorithm::Bm25 => "BM25",
            RetrievalAlgorithm::ColBert => "colBERT",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RerankMethod {
    /// Score documents independently
    #[default]
    Pointwise,
    /// Compare document pairs
    Pairwise,
    /// Consider the entire result list
    Listwise,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RerankerSettings {
    pub enabled: bool,
    pub prompt: String,
    pub method: RerankMethod,
}

impl Default for RerankerSettings {
    fn default() -> Self {
        RerankerSettings {
            enabled: false,
            prompt: "Rerank the documents based on relevance to the query while maintaining diversity of information.".to_string(),
            method: RerankMethod::Pointwise,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryReformulationSettings {
    pub enabled: bool,
    pub prompt: String,
}

impl Default for QueryReformulationSettings {
    fn default() -> Self {
        QueryReformulationSettings {
            enabled: false,
            prompt: "Analyze the user query and reformulate it to improve search results while maintaining the original intent.".to_string(),
        }
    }
}

/// Summary generator family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Generator {
    #[default]
    #[serde(rename = "gpt-4")]
    Gpt4,
    Claude,
    Llama,
    Huggingface,
}

impl Generator {
    pub fn id(&self) -> &'static str {
        match self {
            Generator::Gpt4 => "gpt-4",
            Generator::Claude => "claude",
            Generator::Llama => "llama",
            Generator::Huggingface => "huggingface",
        }
    }
}

/// LLM-judge evaluation categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JudgeCategory {
    #[serde(rename = "Context Relevance")]
    ContextRelevance,
    #[serde(rename = "Answer Relevance")]
    AnswerRelevance,
    #[serde(rename = "Answer Groundedness")]
    AnswerGroundedness,
}

impl JudgeCategory {
    pub const ALL: [JudgeCategory; 3] = [
        JudgeCategory::ContextRelevance,
        JudgeCategory::AnswerRelevance,
        JudgeCategory::AnswerGroundedness,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            JudgeCategory::ContextRelevance => "Context Relevance",
            JudgeCategory::AnswerRelevance => "Answer Relevance",
            JudgeCategory::AnswerGroundedness => "Answer Groundedness",
        }
    }

    pub fn default_prompt(&self) -> &'static str {
        match self {
            JudgeCategory::ContextRelevance => "Is the retrieved context relevant to the query?",
            JudgeCategory::AnswerRelevance => "Is the answer relevant to the query?",
            JudgeCategory::AnswerGroundedness => "Is the response supported by the context?",
        }
    }
}

/// Model used as the judge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EvaluatorSettings {
    pub model: String,
    pub model_version: String,
    pub api_key: String,
}

impl Default for EvaluatorSettings {
    fn default() -> Self {
        EvaluatorSettings {
            model: "gpt-4".to_string(),
            model_version: "gpt-4-turbo".to_string(),
            api_key: String::new(),
        }
    }
}

/// One judge category's switch and prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySettings {
    pub enabled: bool,
    pub prompt: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JudgeSettings {
    pub evaluator: EvaluatorSettings,
    pub context_relevance: CategorySettings,
    pub answer_relevance: CategorySettings,
    pub answer_groundedness: CategorySettings,
}

impl Default for JudgeSettings {
    fn default() -> Self {
        let category = |c: JudgeCategory| CategorySettings {
            enabled: true,
            prompt: c.default_prompt().to_string(),
        };
        JudgeSettings {
            evaluator: EvaluatorSettings::default(),
            context_relevance: category(JudgeCategory::ContextRelevance),
            answer_relevance: category(JudgeCategory::AnswerRelevance),
            answer_groundedness: category(JudgeCategory::AnswerGroundedness),
        }
    }
}

impl JudgeSettings {
    pub fn category(&self, category: JudgeCategory) -> &CategorySettings {
        match category {
            JudgeCategory::ContextRelevance => &self.context_relevance,
            JudgeCategory::AnswerRelevance => &self.answer_relevance,
            JudgeCategory::AnswerGroundedness => &self.answer_groundedness,
        }
    }
}

/// A comparison axis the user asked for, e.g. "pro" or "con".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Aspect {
    pub id: Uuid,
    pub name: String,
    pub selected: bool,
}

/// Everything the search request is assembled from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    pub browser: Browser,
    pub search_algorithm: RetrievalAlgorithm,
    pub generator: Generator,
    /// Generator model version, e.g. `gpt-4-turbo`
    pub model: String,
    pub api_key: String,
    pub reranker: RerankerSettings,
    pub query_reformulation: QueryReformulationSettings,
    pub judge: JudgeSettings,
    pub aspects: Vec<Aspect>,
}

impl Default for SearchSettings {
    fn default() -> Self {
        SearchSettings {
            browser: Browser::default(),
            search_algorithm: RetrievalAlgorithm::default(),
            generator: Generator::default(),
            model: "gpt-4-turbo".to_string(),
            api_key: String::new(),
            reranker: RerankerSettings::default(),
            query_reformulation: QueryReformulationSettings::default(),
            judge: JudgeSettings::default(),
            aspects: Vec::new(),
        }
    }
}

impl SearchSettings {
    /// Add a selected aspect. Names are trimmed; empty names are rejected.
    ///
    /// # Example
    ///
    /// ```rust
    /// use lens_core::settings::SearchSettings;
    ///
    /// let mut settings = SearchSettings::default();
    /// settings.add_aspect("  pro ").unwrap();
    /// assert_eq!(settings.selected_aspects(), vec!["pro"]);
    /// assert!(settings.add_aspect("   ").is_err());
    /// ```
    pub fn add_aspect(&mut self, name: &str) -> LensResult<Uuid> {
        let name = name.trim();
        if name.is_empty() {
            return Err(LensError::invalid_input("aspect", name, "Aspect name must not be empty"));
        }
        let id = Uuid::new_v4();
        self.aspects.push(Aspect {
            id,
            name: name.to_string(),
            selected: true,
        });
        Ok(id)
    }

    /// Flip an aspect's selection. Returns the new state, or `None` if the
    /// id is unknown.
    pub fn toggle_aspect(&mut self, id: &Uuid) -> Option<bool> {
        let aspect = self.aspects.iter_mut().find(|a| &a.id == id)?;
        aspect.selected = !aspect.selected;
        Some(aspect.selected)
    }

    pub fn remove_aspect(&mut self, id: &Uuid) -> Option<Aspect> {
        let index = self.aspects.iter().position(|a| &a.id == id)?;
        Some(self.aspects.remove(index))
    }

    pub fn selected_aspects(&self) -> Vec<&str> {
        self.aspects
            .iter()
            .filter(|a| a.selected)
            .map(|a| a.name.as_str())
            .collect()
    }

    /// One-line description of the active search pipeline, e.g.
    /// `Using Pyterrier Search with BM25 | Reranking: pairwise`.
    pub fn describe(&self) -> String {
        let mut line = format!("Using {} Search", self.browser.display_name());
        if self.browser.uses_algorithm() {
            line.push_str(&format!(" with {}", self.search_algorithm.display_name()));
        }
        if self.reranker.enabled {
            let method = match self.reranker.method {
                RerankMethod::Pointwise => "pointwise",
                RerankMethod::Pairwise => "pairwise",
                RerankMethod::Listwise => "listwise",
            };
            line.push_str(&format!(" | Reranking: {}", method));
        }
        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_viewer_defaults_validate() {
        let settings = ViewerSettings::default();
        assert_eq!(settings.slides_per_page, 2);
        assert_eq!(settings.transition_delay(), Duration::from_millis(300));
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_viewer_validation_errors() {
        let settings = ViewerSettings {
            slides_per_page: 0,
            ..ViewerSettings::default()
        };
        assert_eq!(settings.validate().unwrap_err().error_code(), "INVALID_SETTING");

        let mut settings = ViewerSettings::default();
        settings.colors.opacity.floor = 0.8;
        assert!(settings.validate().is_err());

        let mut settings = ViewerSettings::default();
        settings.colors.opacity.span = -0.1;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_aspect_lifecycle() {
        let mut settings = SearchSettings::default();
        let pro = settings.add_aspect("pro").unwrap();
        let con = settings.add_aspect("con").unwrap();
        assert_eq!(settings.selected_aspects(), vec!["pro", "con"]);

        assert_eq!(settings.toggle_aspect(&pro), Some(false));
        assert_eq!(settings.selected_aspects(), vec!["con"]);

        let removed = settings.remove_aspect(&con).unwrap();
        assert_eq!(removed.name, "con");
        assert!(settings.selected_aspects().is_empty());
        assert_eq!(settings.toggle_aspect(&con), None);
    }

    #[test]
    fn test_enum_wire_names() {
        assert_eq!(serde_json::to_string(&RetrievalAlgorithm::ColBert).unwrap(), "\"colBERT\"");
        assert_eq!(serde_json::to_string(&Generator::Gpt4).unwrap(), "\"gpt-4\"");
        assert_eq!(serde_json::to_string(&Browser::Pyserini).unwrap(), "\"pyserini\"");
        assert_eq!(
            serde_json::to_string(&JudgeCategory::AnswerGroundedness).unwrap(),
            "\"Answer Groundedness\""
        );
    }

    #[test]
    fn test_describe() {
        let mut settings = SearchSettings::default();
        assert_eq!(settings.describe(), "Using Google Search");

        settings.browser = Browser::Pyterrier;
        settings.search_algorithm = RetrievalAlgorithm::Bm25;
        settings.reranker.enabled = true;
        settings.reranker.method = RerankMethod::Pairwise;
        assert_eq!(settings.describe(), "Using Pyterrier Search with BM25 | Reranking: pairwise");
    }
}
