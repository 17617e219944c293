//! # Cross-Attribute Comparison Coordinator
//!
//! Holds the single, viewer-wide cross comparison. Slides never touch this
//! state directly: they emit a [`ComparisonRequest`] and the coordinator is
//! the only thing that applies it. A new broadcast always replaces the old
//! one, so there is never more than one active comparison.
//!
//! ## Example
//!
//! ```rust
//! use lens_core::comparison::{ComparisonCoordinator, ComparisonRequest};
//! use lens_core::results::Summary;
//!
//! let mut coordinator = ComparisonCoordinator::new();
//! coordinator.apply(ComparisonRequest::broadcast("pro", Summary::new("p1", "Cheaper")));
//! coordinator.apply(ComparisonRequest::broadcast("con", Summary::new("c1", "Riskier")));
//!
//! assert!(coordinator.is_source("con"));
//! assert!(coordinator.is_in_cross_comparison("pro"));
//! assert!(!coordinator.is_in_cross_comparison("con"));
//! ```

use serde::Serialize;
use tracing::debug;

use crate::results::{ItemId, Summary};

/// The active comparison: one attribute's summary projected onto the others.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrossComparison {
    pub source_attribute: String,
    pub summary: Summary,
    pub active: bool,
}

impl CrossComparison {
    /// Relevance of the pinned summary to `summary_id` of `attribute`.
    pub fn score_for(&self, attribute: &str, summary_id: &ItemId) -> Option<f64> {
        self.summary.cross_score(attribute, summary_id)
    }
}

/// A message from a slide to the coordinator.
#[derive(Debug, Clone, PartialEq)]
pub enum ComparisonRequest {
    /// `setComparison(source, summary, active)`
    Set {
        source_attribute: Option<String>,
        summary: Option<Summary>,
        active: bool,
    },
    /// Drop the active comparison, but only if `source_attribute` owns it
    Withdraw { source_attribute: String },
}

impl ComparisonRequest {
    /// Pin `summary` of `source_attribute` and color every other slide by it.
    pub fn broadcast(source_attribute: impl Into<String>, summary: Summary) -> Self {
        ComparisonRequest::Set {
            source_attribute: Some(source_attribute.into()),
            summary: Some(summary),
            active: true,
        }
    }

    /// Unconditionally clear the active comparison.
    pub fn clear() -> Self {
        ComparisonRequest::Set {
            source_attribute: None,
            summary: None,
            active: false,
        }
    }

    pub fn withdraw(source_attribute: impl Into<String>) -> Self {
        ComparisonRequest::Withdraw {
            source_attribute: source_attribute.into(),
        }
    }
}

/// What applying a request did to the global state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComparisonChange {
    Unchanged,
    /// A comparison is now active from `source`. `superseded` names a
    /// different attribute whose broadcast was replaced.
    Activated {
        source: String,
        superseded: Option<String>,
    },
    /// The comparison sourced from `source` was cleared
    Cleared { source: String },
}

#[derive(Debug, Clone, Default)]
pub struct ComparisonCoordinator {
    state: Option<CrossComparison>,
}

impl ComparisonCoordinator {
    pub fn new() -> Self {
        ComparisonCoordinator::default()
    }

    pub fn current(&self) -> Option<&CrossComparison> {
        self.state.as_ref()
    }

    /// Whether `attribute` owns the active comparison.
    pub fn is_source(&self, attribute: &str) -> bool {
        self.state
            .as_ref()
            .is_some_and(|s| s.active && s.source_attribute == attribute)
    }

    /// Whether `attribute` should display scores from another slide's
    /// pinned summary.
    pub fn is_in_cross_comparison(&self, attribute: &str) -> bool {
        self.state
            .as_ref()
            .is_some_and(|s| s.active && s.source_attribute != attribute)
    }

    pub fn apply(&mut self, request: ComparisonRequest) -> ComparisonChange {
        match request {
            ComparisonRequest::Set {
                source_attribute,
                summary,
                active,
            } => self.set_comparison(source_attribute.as_deref(), summary.as_ref(), active),
            ComparisonRequest::Withdraw { source_attribute } => {
                if self.is_source(&source_attribute) {
                    self.clear()
                } else {
                    ComparisonChange::Unchanged
                }
            }
        }
    }

    /// Replace, or clear, the global comparison.
    ///
    /// An inactive request, or one missing its source or summary, clears the
    /// state; this includes re-sending the current comparison with
    /// `active = false`. Anything else replaces the state wholesale.
    pub fn set_comparison(
        &mut self,
        source_attribute: Option<&str>,
        summary: Option<&Summary>,
        active: bool,
    ) -> ComparisonChange {
        let (Some(source), Some(summary), true) = (source_attribute, summary, active) else {
            return self.clear();
        };

        let superseded = self
            .state
            .as_ref()
            .map(|s| s.source_attribute.clone())
            .filter(|previous| previous != source);

        debug!(
            source,
            summary = %summary.id,
            superseded = superseded.as_deref(),
            "cross comparison broadcast"
        );
        self.state = Some(CrossComparison {
            source_attribute: source.to_string(),
            summary: summary.clone(),
            active: true,
        });
        ComparisonChange::Activated {
            source: source.to_string(),
            superseded,
        }
    }

    pub fn clear(&mut self) -> ComparisonChange {
        match self.state.take() {
            Some(previous) => {
                debug!(source = %previous.source_attribute, "cross comparison cleared");
                ComparisonChange::Cleared {
                    source: previous.source_attribute,
                }
            }
            None => ComparisonChange::Unchanged,
        }
    }
}
