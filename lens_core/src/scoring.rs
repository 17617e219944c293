//! # Relevance Scoring
//!
//! Maps 0-5 relevance scores to background tints and orders articles by
//! their groundedness against a selected summary.
//!
//! ## Color mapping
//!
//! ```text
//! opacity = floor + (clamp(score, 0, 5) / 5) * span      (defaults 0.1, 0.5)
//!
//! score 0.0 -> 0.10
//! score 2.5 -> 0.35
//! score 5.0 -> 0.60
//! ```
//!
//! Two hues keep the modes apart: blue for article relevance, red for
//! cross-attribute relevance.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::results::{Article, Summary};

/// Upper bound of the relevance scale
pub const MAX_SCORE: f64 = 5.0;

/// An opaque RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb { r, g, b }
    }

    /// Blend this color over `background` at the given opacity.
    pub fn over(self, background: Rgb, opacity: f64) -> Rgb {
        let alpha = opacity.clamp(0.0, 1.0);
        let mix = |fg: u8, bg: u8| -> u8 {
            (f64::from(fg) * alpha + f64::from(bg) * (1.0 - alpha)).round() as u8
        };
        Rgb {
            r: mix(self.r, background.r),
            g: mix(self.g, background.g),
            b: mix(self.b, background.b),
        }
    }
}

/// Which comparison a tint expresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Hue {
    /// Groundedness of an article in the selected summary
    ArticleRelevance,
    /// Relevance of a summary to another attribute's pinned summary
    CrossAttribute,
}

/// Linear opacity ramp over the score range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OpacityScale {
    /// Opacity at score 0
    pub floor: f64,
    /// Opacity added between score 0 and score 5
    pub span: f64,
}

impl Default for OpacityScale {
    fn default() -> Self {
        OpacityScale {
            floor: 0.1,
            span: 0.5,
        }
    }
}

impl OpacityScale {
    /// Opacity for a raw score. Missing or non-finite scores count as 0.
    pub fn opacity(&self, score: Option<f64>) -> f64 {
        self.floor + (clamp_score(score) / MAX_SCORE) * self.span
    }
}

/// Hues and opacity ramp used for relevance tints.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorScheme {
    pub article_relevance: Rgb,
    pub cross_attribute: Rgb,
    pub opacity: OpacityScale,
}

impl Default for ColorScheme {
    fn default() -> Self {
        ColorScheme {
            article_relevance: Rgb::new(59, 130, 246),
            cross_attribute: Rgb::new(220, 38, 38),
            opacity: OpacityScale::default(),
        }
    }
}

impl ColorScheme {
    pub fn color(&self, hue: Hue) -> Rgb {
        match hue {
            Hue::ArticleRelevance => self.article_relevance,
            Hue::CrossAttribute => self.cross_attribute,
        }
    }

    /// Build the tint for a score in the given hue.
    pub fn tint(&self, score: Option<f64>, hue: Hue) -> Tint {
        Tint {
            hue,
            color: self.color(hue),
            opacity: self.opacity.opacity(score),
            score: score_or_zero(score),
        }
    }
}

/// A translucent background derived from a relevance score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Tint {
    pub hue: Hue,
    pub color: Rgb,
    pub opacity: f64,
    /// The score the tint was derived from (missing already mapped to 0)
    pub score: f64,
}

impl Tint {
    /// `Relevance: 3.5/5` style label.
    pub fn label(&self) -> String {
        format!("Relevance: {:.1}/5", self.score)
    }
}

/// Opacity for a score using the default ramp.
///
/// # Example
///
/// ```rust
/// use lens_core::scoring::relevance_opacity;
///
/// assert!((relevance_opacity(Some(0.0)) - 0.1).abs() < 1e-9);
/// assert!((relevance_opacity(Some(5.0)) - 0.6).abs() < 1e-9);
/// assert!((relevance_opacity(None) - 0.1).abs() < 1e-9);
/// ```
pub fn relevance_opacity(score: Option<f64>) -> f64 {
    OpacityScale::default().opacity(score)
}

/// Missing and non-finite scores read as 0.
pub fn score_or_zero(score: Option<f64>) -> f64 {
    match score {
        Some(s) if s.is_finite() => s,
        _ => 0.0,
    }
}

fn clamp_score(score: Option<f64>) -> f64 {
    score_or_zero(score).clamp(0.0, MAX_SCORE)
}

/// Order articles by groundedness in `selected`, highest first.
///
/// Unscored articles count as 0. The sort is stable, so equal scores keep
/// their original order. Without a selection the original order is returned.
pub fn sort_by_relevance<'a>(articles: &'a [Article], selected: Option<&Summary>) -> Vec<&'a Article> {
    let mut ordered: Vec<&Article> = articles.iter().collect();
    if let Some(summary) = selected {
        ordered.sort_by(|a, b| {
            let score_a = score_or_zero(summary.article_score(&a.id));
            let score_b = score_or_zero(summary.article_score(&b.id));
            score_b.partial_cmp(&score_a).unwrap_or(Ordering::Equal)
        });
    }
    ordered
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_opacity_reference_points() {
        assert!(approx(relevance_opacity(Some(0.0)), 0.1));
        assert!(approx(relevance_opacity(Some(5.0)), 0.6));
        assert!(approx(relevance_opacity(Some(2.5)), 0.35));
    }

    #[test]
    fn test_opacity_clamps_out_of_range_scores() {
        assert!(approx(relevance_opacity(Some(-3.0)), 0.1));
        assert!(approx(relevance_opacity(Some(12.0)), 0.6));
        assert!(approx(relevance_opacity(Some(f64::NAN)), 0.1));
    }

    #[test]
    fn test_tint_color_and_label() {
        let scheme = ColorScheme::default();
        let tint = scheme.tint(Some(5.0), Hue::ArticleRelevance);
        assert_eq!(tint.color, Rgb::new(59, 130, 246));
        assert!(approx(tint.opacity, 0.6));
        assert_eq!(tint.label(), "Relevance: 5.0/5");

        let cross = scheme.tint(None, Hue::CrossAttribute);
        assert_eq!(cross.color, Rgb::new(220, 38, 38));
        assert_eq!(cross.label(), "Relevance: 0.0/5");
    }

    #[test]
    fn test_sort_descending_with_missing_as_zero() {
        let articles = vec![
            Article::new(1u64, "one", ""),
            Article::new(2u64, "two", ""),
            Article::new(3u64, "three", ""),
        ];
        let summary = Summary::new("s", "")
            .with_article_score(1u64, 2.0)
            .with_article_score(2u64, 4.0);

        let order: Vec<String> = sort_by_relevance(&articles, Some(&summary))
            .iter()
            .map(|a| a.id.to_string())
            .collect();
        assert_eq!(order, ["2", "1", "3"]);
    }

    #[test]
    fn test_sort_is_stable_for_ties() {
        let articles = vec![
            Article::new("a", "", ""),
            Article::new("b", "", ""),
            Article::new("c", "", ""),
            Article::new("d", "", ""),
        ];
        let summary = Summary::new("s", "")
            .with_article_score("c", 3.0)
            .with_article_score("a", 1.0)
            .with_article_score("d", 1.0);

        let order: Vec<&str> = sort_by_relevance(&articles, Some(&summary))
            .iter()
            .map(|a| a.id.as_str())
            .collect();
        assert_eq!(order, ["c", "a", "d", "b"]);
    }

    #[test]
    fn test_sort_without_selection_keeps_order() {
        let articles = vec![Article::new("x", "", ""), Article::new("y", "", "")];
        let order: Vec<&str> = sort_by_relevance(&articles, None)
            .iter()
            .map(|a| a.id.as_str())
            .collect();
        assert_eq!(order, ["x", "y"]);
    }

    #[test]
    fn test_blend_over_background() {
        let white = Rgb::new(255, 255, 255);
        assert_eq!(Rgb::new(0, 0, 0).over(white, 0.0), white);
        assert_eq!(Rgb::new(0, 0, 0).over(white, 1.0), Rgb::new(0, 0, 0));
    }

    proptest! {
        #[test]
        fn prop_opacity_stays_in_range(score in proptest::num::f64::ANY) {
            let opacity = relevance_opacity(Some(score));
            prop_assert!((0.1 - 1e-9..=0.6 + 1e-9).contains(&opacity));
        }

        #[test]
        fn prop_opacity_is_monotonic(a in 0.0f64..5.0, b in 0.0f64..5.0) {
            let (low, high) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(relevance_opacity(Some(low)) <= relevance_opacity(Some(high)));
        }
    }
}
