//! # Slide
//!
//! Per-attribute selection state and its render model.
//!
//! A slide owns two pieces of UI state: which summary is selected and
//! whether that summary drives article relevance (`Articles`) or is pinned
//! for cross-attribute comparison (`Attributes`). Interactions return an
//! optional [`ComparisonRequest`] for the coordinator instead of mutating
//! shared state, and [`SlideState::view`] is a pure function of the local
//! state, the slide's data and the global comparison.
//!
//! ## Example
//!
//! ```rust
//! use lens_core::normalize::{SlideContent, SlideRecord};
//! use lens_core::results::{ItemId, Summary};
//! use lens_core::slide::{ComparisonMode, SlideState};
//!
//! let record = SlideRecord {
//!     attribute: "pro".to_string(),
//!     content: SlideContent { summary: vec![Summary::new("s1", "Cheaper")], articles: vec![] },
//! };
//! let mut state = SlideState::default();
//! let id = ItemId::new("s1");
//!
//! state.select_summary(&record, &id);
//! assert_eq!(state.selected(), Some(&id));
//!
//! state.select_summary(&record, &id);
//! assert_eq!(state.selected(), None);
//! assert_eq!(state.mode(), ComparisonMode::Articles);
//! ```

use std::collections::HashSet;

use serde::Serialize;
use tracing::debug;

use crate::comparison::{ComparisonRequest, CrossComparison};
use crate::normalize::SlideRecord;
use crate::results::{Article, ItemId, Summary};
use crate::scoring::{sort_by_relevance, ColorScheme, Hue, Tint};

/// What the selected summary is currently compared against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonMode {
    /// Articles are ranked and tinted by groundedness in the summary
    #[default]
    Articles,
    /// The summary is pinned and broadcast to the other attributes
    Attributes,
}

/// Transient UI state of one slide.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SlideState {
    selected: Option<ItemId>,
    mode: ComparisonMode,
    expanded_articles: HashSet<ItemId>,
}

impl SlideState {
    pub fn selected(&self) -> Option<&ItemId> {
        self.selected.as_ref()
    }

    pub fn mode(&self) -> ComparisonMode {
        self.mode
    }

    pub fn is_expanded(&self, article_id: &ItemId) -> bool {
        self.expanded_articles.contains(article_id)
    }

    /// The selected summary, if it still exists in `record`.
    pub fn selected_summary<'a>(&self, record: &'a SlideRecord) -> Option<&'a Summary> {
        self.selected
            .as_ref()
            .and_then(|id| record.content.find_summary(id))
    }

    /// Click on a summary: select it in article mode, or deselect it if it
    /// was already selected. Either way this slide's broadcast, if any, is
    /// withdrawn.
    ///
    /// An id that does not belong to the slide deselects.
    pub fn select_summary(&mut self, record: &SlideRecord, summary_id: &ItemId) -> ComparisonRequest {
        let already_selected = self.selected.as_ref() == Some(summary_id);
        if already_selected || record.content.find_summary(summary_id).is_none() {
            self.deselect();
        } else {
            self.selected = Some(summary_id.clone());
            self.mode = ComparisonMode::Articles;
        }
        debug!(
            attribute = %record.attribute,
            selected = self.selected.as_ref().map(ItemId::as_str),
            "summary selection changed"
        );
        ComparisonRequest::withdraw(&record.attribute)
    }

    /// The cross-comparison action on a summary.
    ///
    /// On the selected summary this flips between article and attribute
    /// mode; on any other summary it selects it straight into attribute
    /// mode. Inert (returns `None`) when there are no sibling slides.
    pub fn toggle_comparison_mode(
        &mut self,
        record: &SlideRecord,
        summary_id: &ItemId,
        has_siblings: bool,
    ) -> Option<ComparisonRequest> {
        if !has_siblings {
            return None;
        }
        let Some(summary) = record.content.find_summary(summary_id) else {
            self.deselect();
            return Some(ComparisonRequest::withdraw(&record.attribute));
        };

        if self.selected.as_ref() == Some(summary_id) {
            self.mode = match self.mode {
                ComparisonMode::Articles => ComparisonMode::Attributes,
                ComparisonMode::Attributes => ComparisonMode::Articles,
            };
        } else {
            self.selected = Some(summary_id.clone());
            self.mode = ComparisonMode::Attributes;
        }

        debug!(attribute = %record.attribute, mode = ?self.mode, "comparison mode toggled");
        Some(match self.mode {
            ComparisonMode::Attributes => ComparisonRequest::broadcast(&record.attribute, summary.clone()),
            ComparisonMode::Articles => ComparisonRequest::withdraw(&record.attribute),
        })
    }

    /// The article-relevance action on the selected summary: back to article
    /// mode, withdrawing this slide's broadcast.
    pub fn show_article_relevance(
        &mut self,
        record: &SlideRecord,
        summary_id: &ItemId,
    ) -> Option<ComparisonRequest> {
        if self.selected.as_ref() != Some(summary_id) {
            return None;
        }
        self.mode = ComparisonMode::Articles;
        Some(ComparisonRequest::withdraw(&record.attribute))
    }

    /// Another slide's broadcast replaced ours; keep the selection but stop
    /// claiming attribute mode.
    pub fn demote(&mut self) {
        self.mode = ComparisonMode::Articles;
    }

    /// Show or hide the full text of an article. Returns the new state.
    pub fn toggle_article_expanded(&mut self, article_id: &ItemId) -> bool {
        if self.expanded_articles.remove(article_id) {
            false
        } else {
            self.expanded_articles.insert(article_id.clone());
            true
        }
    }

    /// The slide left the screen.
    pub fn on_deactivate(&mut self) {
        self.deselect();
        self.expanded_articles.clear();
    }

    fn deselect(&mut self) {
        self.selected = None;
        self.mode = ComparisonMode::Articles;
    }

    /// Build the render model for this slide.
    pub fn view(&self, record: &SlideRecord, ctx: &SlideContext<'_>) -> SlideView {
        let attribute = record.attribute.as_str();
        let selected = self.selected_summary(record);
        let incoming = ctx
            .comparison
            .filter(|c| c.active && c.source_attribute != attribute);
        let is_source = ctx
            .comparison
            .is_some_and(|c| c.active && c.source_attribute == attribute);

        let summaries = record
            .content
            .summary
            .iter()
            .map(|summary| {
                let is_selected = selected.is_some_and(|s| s.id == summary.id);
                let tint = incoming.map(|c| {
                    ctx.colors
                        .tint(c.score_for(attribute, &summary.id), Hue::CrossAttribute)
                });
                SummaryView {
                    id: summary.id.clone(),
                    text: summary.text.clone(),
                    selected: is_selected,
                    relevance_label: tint.map(|t| t.label()),
                    tint,
                    confidence_label: confidence_label(summary),
                    sources_label: sources_label(summary),
                    actions: is_selected.then(|| SummaryActions {
                        article_relevance_active: self.mode == ComparisonMode::Articles,
                        cross_comparison_active: self.mode == ComparisonMode::Attributes,
                        cross_comparison_enabled: ctx.has_siblings,
                    }),
                }
            })
            .collect();

        let tint_articles = self.mode == ComparisonMode::Articles;
        let articles = sort_by_relevance(&record.content.articles, selected)
            .into_iter()
            .map(|article| {
                let tint = selected.filter(|_| tint_articles).map(|s| {
                    ctx.colors
                        .tint(s.article_score(&article.id), Hue::ArticleRelevance)
                });
                ArticleView::build(article, tint, self.is_expanded(&article.id), ctx.excerpt_chars)
            })
            .collect();

        SlideView {
            attribute: record.attribute.clone(),
            is_fullscreen: ctx.is_fullscreen,
            mode: self.mode,
            is_comparison_source: is_source,
            banner: incoming
                .map(|c| format!("Showing relevance to {} summary", c.source_attribute)),
            summaries,
            articles,
        }
    }
}

/// Everything outside the slide that its rendering depends on.
#[derive(Debug, Clone, Copy)]
pub struct SlideContext<'a> {
    pub is_fullscreen: bool,
    pub has_siblings: bool,
    pub comparison: Option<&'a CrossComparison>,
    pub colors: &'a ColorScheme,
    pub excerpt_chars: usize,
}

/// Render model of one slide.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlideView {
    pub attribute: String,
    pub is_fullscreen: bool,
    pub mode: ComparisonMode,
    pub is_comparison_source: bool,
    /// Set while this slide is colored by another slide's pinned summary
    pub banner: Option<String>,
    pub summaries: Vec<SummaryView>,
    /// In display order
    pub articles: Vec<ArticleView>,
}

impl SlideView {
    pub fn fullscreen_label(&self) -> &'static str {
        if self.is_fullscreen {
            "Exit fullscreen"
        } else {
            "Enter fullscreen"
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryView {
    pub id: ItemId,
    pub text: String,
    pub selected: bool,
    /// Cross-attribute tint; `None` renders neutral
    pub tint: Option<Tint>,
    pub relevance_label: Option<String>,
    pub confidence_label: Option<String>,
    pub sources_label: Option<String>,
    /// Only present on the selected summary
    pub actions: Option<SummaryActions>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SummaryActions {
    pub article_relevance_active: bool,
    pub cross_comparison_active: bool,
    pub cross_comparison_enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArticleView {
    pub id: ItemId,
    pub title: String,
    /// Excerpt or full text, depending on `expanded`
    pub text: String,
    /// The text was cut; render an ellipsis
    pub truncated: bool,
    /// Long enough to offer show more / show less
    pub expandable: bool,
    pub expanded: bool,
    pub url: Option<String>,
    /// Article-relevance tint; `None` renders neutral
    pub tint: Option<Tint>,
    pub relevance_label: Option<String>,
}

impl ArticleView {
    fn build(article: &Article, tint: Option<Tint>, expanded: bool, excerpt_chars: usize) -> Self {
        let expandable = article.content.chars().count() > excerpt_chars;
        let text = if expanded || !expandable {
            article.content.clone()
        } else {
            article.content.chars().take(excerpt_chars).collect()
        };
        ArticleView {
            id: article.id.clone(),
            title: article.title.clone(),
            text,
            truncated: expandable && !expanded,
            expandable,
            expanded,
            url: article.url.clone(),
            relevance_label: tint.map(|t| t.label()),
            tint,
        }
    }

    pub fn expand_label(&self) -> Option<&'static str> {
        match (self.expandable, self.expanded) {
            (false, _) => None,
            (true, true) => Some("Show Less"),
            (true, false) => Some("Show More"),
        }
    }
}

fn confidence_label(summary: &Summary) -> Option<String> {
    summary
        .confidence
        .filter(|c| *c != 0.0 && c.is_finite())
        .map(|c| format!("Confidence: {:.1}%", c * 100.0))
}

fn sources_label(summary: &Summary) -> Option<String> {
    summary
        .source_count
        .filter(|n| *n != 0)
        .map(|n| format!("Sources: {}", n))
}
