//! # Viewer
//!
//! The state container behind the comparative view. It owns the normalized
//! slides, their local states, the carousel, the fullscreen overlay and the
//! comparison coordinator, and changes them only through [`Viewer::update`].
//!
//! ```text
//! Message ──> update(now) ──> Slide ops ──> ComparisonRequest ──> Coordinator
//!                 │                                                   │
//!                 └──> Carousel / Overlay                             │
//!                                                                     v
//!                               view() <── SlideState::view(comparison)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use std::time::Instant;
//! use lens_core::results::{AttributeResults, ResultSet};
//! use lens_core::settings::ViewerSettings;
//! use lens_core::viewer::{Message, Viewer, ViewerView};
//!
//! let results = ResultSet::new()
//!     .with_attribute("pro", AttributeResults::default())
//!     .with_attribute("con", AttributeResults::default());
//!
//! let mut viewer = Viewer::new(ViewerSettings::default());
//! viewer.load_results(Some(results));
//! viewer.update(Message::FullscreenToggled("con".into()), Instant::now());
//!
//! match viewer.view() {
//!     ViewerView::Carousel(carousel) => assert_eq!(carousel.fullscreen.as_deref(), Some("con")),
//!     ViewerView::Empty => unreachable!(),
//! }
//! ```

use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info, trace};

use crate::carousel::{Carousel, PageControls, PageState};
use crate::comparison::{ComparisonChange, ComparisonCoordinator, ComparisonRequest};
use crate::fullscreen::{FullscreenOverlay, Key, OverlayChange};
use crate::normalize::{normalize, SlideRecord};
use crate::results::{ItemId, ResultSet};
use crate::settings::ViewerSettings;
use crate::slide::{SlideContext, SlideState, SlideView};

/// Everything a user (or a test) can do to the viewer.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    PageRequested(isize),
    NextPage,
    PreviousPage,
    SummaryClicked { attribute: String, summary_id: ItemId },
    ComparisonToggled { attribute: String, summary_id: ItemId },
    ArticleRelevanceShown { attribute: String, summary_id: ItemId },
    ArticleExpandToggled { attribute: String, article_id: ItemId },
    FullscreenToggled(String),
    BackdropClicked,
    KeyPressed(Key),
    /// Clock advanced; releases an expired transition lock
    Tick,
}

/// What one `update` call changed.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub page_changed: bool,
    pub comparison: ComparisonChange,
    pub overlay: Option<OverlayChange>,
}

impl Default for Outcome {
    fn default() -> Self {
        Outcome {
            page_changed: false,
            comparison: ComparisonChange::Unchanged,
            overlay: None,
        }
    }
}

/// Render model of the whole viewer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ViewerView {
    /// No result set, or one without attributes
    Empty,
    Carousel(CarouselView),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CarouselView {
    pub page: PageState,
    /// `None` when there is nothing to page through
    pub controls: Option<PageControls>,
    /// Slides on the current page, in result-set order
    pub slides: Vec<SlideView>,
    pub fullscreen: Option<String>,
    pub scroll_locked: bool,
    pub comparison_source: Option<String>,
}

#[derive(Debug, Default)]
pub struct Viewer {
    settings: ViewerSettings,
    records: Vec<SlideRecord>,
    slides: Vec<SlideState>,
    carousel: Carousel,
    overlay: FullscreenOverlay,
    coordinator: ComparisonCoordinator,
}

impl Viewer {
    pub fn new(settings: ViewerSettings) -> Self {
        let carousel = Carousel::new(0, settings.slides_per_page, settings.transition_delay());
        Viewer {
            settings,
            carousel,
            ..Viewer::default()
        }
    }

    /// Replace the result set. `None` is the "no data" state.
    ///
    /// Paging, fullscreen, the comparison and every slide state start over.
    pub fn load_results(&mut self, results: Option<ResultSet>) {
        self.records = results.as_ref().map(normalize).unwrap_or_default();
        self.slides = vec![SlideState::default(); self.records.len()];
        self.carousel.reset(self.records.len());
        self.overlay.clear();
        self.coordinator.clear();
        info!(
            attributes = self.records.len(),
            pages = self.carousel.total_pages(),
            "result set loaded"
        );
    }

    pub fn settings(&self) -> &ViewerSettings {
        &self.settings
    }

    pub fn records(&self) -> &[SlideRecord] {
        &self.records
    }

    pub fn carousel(&self) -> &Carousel {
        &self.carousel
    }

    pub fn overlay(&self) -> &FullscreenOverlay {
        &self.overlay
    }

    pub fn coordinator(&self) -> &ComparisonCoordinator {
        &self.coordinator
    }

    pub fn slide_state(&self, attribute: &str) -> Option<&SlideState> {
        self.index_of(attribute).map(|index| &self.slides[index])
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn has_siblings(&self) -> bool {
        self.records.len() > 1
    }

    fn index_of(&self, attribute: &str) -> Option<usize> {
        self.records.iter().position(|r| r.attribute == attribute)
    }

    /// Index of `attribute` if its slide is on the current page.
    fn active_index(&self, attribute: &str) -> Option<usize> {
        let index = self.index_of(attribute);
        match index {
            Some(index) if self.carousel.is_visible(index) => Some(index),
            _ => {
                trace!(attribute, "message for inactive slide ignored");
                None
            }
        }
    }

    pub fn update(&mut self, message: Message, now: Instant) -> Outcome {
        let mut outcome = Outcome::default();
        match message {
            Message::PageRequested(target) => self.change_page(target, now, &mut outcome),
            Message::NextPage => {
                let target = self.carousel.current_page() as isize + 1;
                self.change_page(target, now, &mut outcome);
            }
            Message::PreviousPage => {
                let target = self.carousel.current_page() as isize - 1;
                self.change_page(target, now, &mut outcome);
            }
            Message::SummaryClicked { attribute, summary_id } => {
                if let Some(index) = self.active_index(&attribute) {
                    let request = self.slides[index].select_summary(&self.records[index], &summary_id);
                    outcome.comparison = self.dispatch(request);
                }
            }
            Message::ComparisonToggled { attribute, summary_id } => {
                if let Some(index) = self.active_index(&attribute) {
                    let has_siblings = self.has_siblings();
                    let request = self.slides[index].toggle_comparison_mode(
                        &self.records[index],
                        &summary_id,
                        has_siblings,
                    );
                    if let Some(request) = request {
                        outcome.comparison = self.dispatch(request);
                    }
                }
            }
            Message::ArticleRelevanceShown { attribute, summary_id } => {
                if let Some(index) = self.active_index(&attribute) {
                    let request =
                        self.slides[index].show_article_relevance(&self.records[index], &summary_id);
                    if let Some(request) = request {
                        outcome.comparison = self.dispatch(request);
                    }
                }
            }
            Message::ArticleExpandToggled { attribute, article_id } => {
                if let Some(index) = self.active_index(&attribute) {
                    self.slides[index].toggle_article_expanded(&article_id);
                }
            }
            Message::FullscreenToggled(attribute) => {
                if self.active_index(&attribute).is_some() {
                    outcome.overlay = Some(self.overlay.toggle(&attribute));
                }
            }
            Message::BackdropClicked => outcome.overlay = self.overlay.backdrop_clicked(),
            Message::KeyPressed(key) => outcome.overlay = self.overlay.handle_key(key),
            Message::Tick => {
                self.carousel.settle(now);
            }
        }
        outcome
    }

    fn change_page(&mut self, target: isize, now: Instant, outcome: &mut Outcome) {
        let leaving = self.carousel.visible_range();
        if !self.carousel.change_page(target, now) {
            return;
        }
        outcome.page_changed = true;

        for index in leaving {
            if let Some(slide) = self.slides.get_mut(index) {
                slide.on_deactivate();
            }
        }
        outcome.comparison = self.coordinator.clear();

        let target_visible = self
            .overlay
            .target()
            .and_then(|attribute| self.index_of(attribute))
            .is_some_and(|index| self.carousel.is_visible(index));
        if !target_visible {
            outcome.overlay = self.overlay.clear();
        }
    }

    /// Hand a slide's request to the coordinator and keep the slides in
    /// line with the result: only the source may stay in attribute mode.
    fn dispatch(&mut self, request: ComparisonRequest) -> ComparisonChange {
        let change = self.coordinator.apply(request);
        if let ComparisonChange::Activated {
            superseded: Some(previous),
            ..
        } = &change
        {
            if let Some(index) = self.index_of(previous) {
                debug!(attribute = %previous, "previous comparison source demoted");
                self.slides[index].demote();
            }
        }
        change
    }

    /// Build the render model for the current page.
    pub fn view(&self) -> ViewerView {
        if self.records.is_empty() {
            return ViewerView::Empty;
        }

        let comparison = self.coordinator.current();
        let has_siblings = self.has_siblings();
        let slides = self
            .carousel
            .visible_range()
            .filter_map(|index| {
                let record = self.records.get(index)?;
                let state = self.slides.get(index)?;
                let ctx = SlideContext {
                    is_fullscreen: self.overlay.is_fullscreen(&record.attribute),
                    has_siblings,
                    comparison,
                    colors: &self.settings.colors,
                    excerpt_chars: self.settings.excerpt_chars,
                };
                Some(state.view(record, &ctx))
            })
            .collect();

        ViewerView::Carousel(CarouselView {
            page: self.carousel.state(),
            controls: self.carousel.controls(),
            slides,
            fullscreen: self.overlay.target().map(str::to_string),
            scroll_locked: self.overlay.scroll_locked(),
            comparison_source: comparison
                .filter(|c| c.active)
                .map(|c| c.source_attribute.clone()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::{Article, AttributeResults, Summary};
    use crate::scoring::Hue;
    use crate::slide::ComparisonMode;
    use std::time::Duration;

    const SETTLE: Duration = Duration::from_millis(300);

    /// One summary `{name}1` and one article `{name}-a1`; the summary scores
    /// `{other}1` of attribute `other` at 5.
    fn attribute(name: &str, other: &str) -> AttributeResults {
        let article_id = format!("{}-a1", name);
        let summary = Summary::new(format!("{}1", name), format!("{} summary", name))
            .with_article_score(article_id.as_str(), 4.0)
            .with_cross_score(other, format!("{}1", other), 5.0);
        AttributeResults::new(vec![summary], vec![Article::new(article_id, "title", "content")])
    }

    fn pro_con() -> ResultSet {
        ResultSet::new()
            .with_attribute("pro", attribute("pro", "con"))
            .with_attribute("con", attribute("con", "pro"))
    }

    fn five_attributes() -> ResultSet {
        ["a", "b", "c", "d", "e"]
            .iter()
            .fold(ResultSet::new(), |set, name| {
                set.with_attribute(*name, attribute(name, "a"))
            })
    }

    fn loaded(results: ResultSet) -> Viewer {
        let mut viewer = Viewer::new(ViewerSettings::default());
        viewer.load_results(Some(results));
        viewer
    }

    fn carousel_view(viewer: &Viewer) -> CarouselView {
        match viewer.view() {
            ViewerView::Carousel(view) => view,
            ViewerView::Empty => panic!("expected slides"),
        }
    }

    fn toggle(attribute: &str, summary: &str) -> Message {
        Message::ComparisonToggled {
            attribute: attribute.into(),
            summary_id: ItemId::new(summary),
        }
    }

    fn click(attribute: &str, summary: &str) -> Message {
        Message::SummaryClicked {
            attribute: attribute.into(),
            summary_id: ItemId::new(summary),
        }
    }

    #[test]
    fn test_empty_states() {
        let mut viewer = Viewer::new(ViewerSettings::default());
        assert_eq!(viewer.view(), ViewerView::Empty);

        viewer.load_results(None);
        assert_eq!(viewer.view(), ViewerView::Empty);

        viewer.load_results(Some(ResultSet::new()));
        assert_eq!(viewer.view(), ViewerView::Empty);
        let outcome = viewer.update(Message::NextPage, Instant::now());
        assert!(!outcome.page_changed);
    }

    #[test]
    fn test_pro_con_scenario() {
        let mut viewer = loaded(pro_con());
        let now = Instant::now();

        let view = carousel_view(&viewer);
        assert_eq!(view.page.total_pages, 1);
        assert_eq!(view.controls, None);
        assert_eq!(view.slides.len(), 2);
        assert_eq!(view.fullscreen, None);
        assert_eq!(view.comparison_source, None);

        viewer.update(click("pro", "pro1"), now);
        let outcome = viewer.update(toggle("pro", "pro1"), now);
        assert_eq!(
            outcome.comparison,
            ComparisonChange::Activated { source: "pro".into(), superseded: None }
        );

        let view = carousel_view(&viewer);
        assert_eq!(view.comparison_source.as_deref(), Some("pro"));
        let (pro, con) = (&view.slides[0], &view.slides[1]);
        assert!(pro.is_comparison_source);
        assert_eq!(pro.mode, ComparisonMode::Attributes);

        let tint = con.summaries[0].tint.unwrap();
        assert_eq!(tint.hue, Hue::CrossAttribute);
        assert!((tint.opacity - 0.6).abs() < 1e-9);
        assert_eq!(con.summaries[0].relevance_label.as_deref(), Some("Relevance: 5.0/5"));
        assert_eq!(con.banner.as_deref(), Some("Showing relevance to pro summary"));
    }

    #[test]
    fn test_last_writer_wins_demotes_previous_source() {
        let mut viewer = loaded(pro_con());
        let now = Instant::now();

        viewer.update(toggle("pro", "pro1"), now);
        let outcome = viewer.update(toggle("con", "con1"), now);
        assert_eq!(
            outcome.comparison,
            ComparisonChange::Activated {
                source: "con".into(),
                superseded: Some("pro".into())
            }
        );

        let pro = viewer.slide_state("pro").unwrap();
        assert_eq!(pro.mode(), ComparisonMode::Articles);
        assert_eq!(pro.selected(), Some(&ItemId::new("pro1")));

        let view = carousel_view(&viewer);
        assert!(view.slides[1].is_comparison_source);
        assert!(view.slides[0].summaries[0].tint.is_some());
        assert!(view.slides[1].summaries[0].tint.is_none());
    }

    #[test]
    fn test_foreign_selection_keeps_broadcast() {
        let mut viewer = loaded(pro_con());
        let now = Instant::now();

        viewer.update(toggle("pro", "pro1"), now);
        let outcome = viewer.update(click("con", "con1"), now);
        assert_eq!(outcome.comparison, ComparisonChange::Unchanged);
        assert!(viewer.coordinator().is_source("pro"));

        let outcome = viewer.update(click("pro", "pro1"), now);
        assert_eq!(outcome.comparison, ComparisonChange::Cleared { source: "pro".into() });
        assert_eq!(viewer.slide_state("pro").unwrap().selected(), None);
    }

    #[test]
    fn test_article_relevance_action_withdraws() {
        let mut viewer = loaded(pro_con());
        let now = Instant::now();

        viewer.update(toggle("pro", "pro1"), now);
        let outcome = viewer.update(
            Message::ArticleRelevanceShown {
                attribute: "pro".into(),
                summary_id: ItemId::new("pro1"),
            },
            now,
        );
        assert_eq!(outcome.comparison, ComparisonChange::Cleared { source: "pro".into() });

        let view = carousel_view(&viewer);
        let article = &view.slides[0].articles[0];
        assert_eq!(article.tint.unwrap().hue, Hue::ArticleRelevance);
    }

    #[test]
    fn test_page_change_deactivates_and_clears() {
        let mut viewer = loaded(five_attributes());
        let start = Instant::now();

        viewer.update(click("a", "a1"), start);
        viewer.update(toggle("b", "b1"), start);
        viewer.update(
            Message::ArticleExpandToggled {
                attribute: "a".into(),
                article_id: ItemId::new("a-a1"),
            },
            start,
        );

        let outcome = viewer.update(Message::NextPage, start);
        assert!(outcome.page_changed);
        assert_eq!(outcome.comparison, ComparisonChange::Cleared { source: "b".into() });
        assert_eq!(viewer.slide_state("a").unwrap(), &SlideState::default());
        assert_eq!(viewer.slide_state("b").unwrap(), &SlideState::default());

        let view = carousel_view(&viewer);
        let names: Vec<&str> = view.slides.iter().map(|s| s.attribute.as_str()).collect();
        assert_eq!(names, ["c", "d"]);
        assert!(view.page.is_transitioning);
        assert!(view.controls.unwrap().dots.iter().all(|d| !d.enabled));
    }

    #[test]
    fn test_transition_lock_and_tick() {
        let mut viewer = loaded(five_attributes());
        let start = Instant::now();

        assert!(viewer.update(Message::PageRequested(2), start).page_changed);
        assert!(!viewer.update(Message::PreviousPage, start + SETTLE / 2).page_changed);
        assert_eq!(viewer.carousel().current_page(), 2);

        viewer.update(Message::Tick, start + SETTLE);
        assert!(!carousel_view(&viewer).page.is_transitioning);

        let view = carousel_view(&viewer);
        assert_eq!(view.slides.len(), 1);
        assert_eq!(view.slides[0].attribute, "e");

        assert!(!viewer.update(Message::PageRequested(3), start + SETTLE).page_changed);
        assert!(!viewer.update(Message::PageRequested(-1), start + SETTLE).page_changed);
    }

    #[test]
    fn test_messages_for_offscreen_slides_are_ignored() {
        let mut viewer = loaded(five_attributes());
        let now = Instant::now();

        let outcome = viewer.update(toggle("e", "e1"), now);
        assert_eq!(outcome.comparison, ComparisonChange::Unchanged);
        assert_eq!(viewer.slide_state("e").unwrap(), &SlideState::default());

        let outcome = viewer.update(Message::FullscreenToggled("e".into()), now);
        assert_eq!(outcome.overlay, None);
        let outcome = viewer.update(Message::FullscreenToggled("ghost".into()), now);
        assert_eq!(outcome.overlay, None);
    }

    #[test]
    fn test_fullscreen_switch_and_escape_during_transition() {
        let mut viewer = loaded(five_attributes());
        let start = Instant::now();

        viewer.update(Message::PageRequested(1), start);
        viewer.update(Message::FullscreenToggled("c".into()), start);
        let outcome = viewer.update(Message::FullscreenToggled("d".into()), start);
        assert_eq!(
            outcome.overlay,
            Some(OverlayChange::Switched { from: "c".into(), to: "d".into() })
        );

        let view = carousel_view(&viewer);
        assert_eq!(view.fullscreen.as_deref(), Some("d"));
        assert!(view.scroll_locked);
        assert!(view.slides[1].is_fullscreen);
        assert!(!view.slides[0].is_fullscreen);

        // page lock still held; the overlay axis is independent
        let outcome = viewer.update(Message::KeyPressed(Key::Escape), start);
        assert_eq!(outcome.overlay, Some(OverlayChange::Exited { attribute: "d".into() }));
        assert!(viewer.carousel().is_transitioning());
        assert!(!carousel_view(&viewer).scroll_locked);

        let outcome = viewer.update(Message::KeyPressed(Key::Escape), start);
        assert_eq!(outcome.overlay, None);
    }

    #[test]
    fn test_fullscreen_never_touches_selection() {
        let mut viewer = loaded(pro_con());
        let now = Instant::now();

        viewer.update(toggle("pro", "pro1"), now);
        viewer.update(Message::FullscreenToggled("pro".into()), now);
        viewer.update(Message::BackdropClicked, now);

        let pro = viewer.slide_state("pro").unwrap();
        assert_eq!(pro.mode(), ComparisonMode::Attributes);
        assert!(viewer.coordinator().is_source("pro"));
        assert!(!viewer.overlay().is_active());
    }

    #[test]
    fn test_fullscreen_slide_leaving_page_closes_overlay() {
        let mut viewer = loaded(five_attributes());
        let now = Instant::now();

        viewer.update(Message::FullscreenToggled("a".into()), now);
        let outcome = viewer.update(Message::NextPage, now);
        assert_eq!(outcome.overlay, Some(OverlayChange::Exited { attribute: "a".into() }));
    }

    #[test]
    fn test_single_slide() {
        let mut viewer = loaded(ResultSet::new().with_attribute("only", attribute("only", "x")));
        let now = Instant::now();

        let view = carousel_view(&viewer);
        assert_eq!(view.controls, None);
        assert_eq!(view.slides.len(), 1);

        viewer.update(click("only", "only1"), now);
        let outcome = viewer.update(toggle("only", "only1"), now);
        assert_eq!(outcome.comparison, ComparisonChange::Unchanged);

        let view = carousel_view(&viewer);
        let actions = view.slides[0].summaries[0].actions.unwrap();
        assert!(!actions.cross_comparison_enabled);
        assert!(actions.article_relevance_active);
    }

    #[test]
    fn test_reload_resets_everything() {
        let mut viewer = loaded(five_attributes());
        let now = Instant::now();

        viewer.update(Message::PageRequested(1), now);
        viewer.update(toggle("c", "c1"), now);
        viewer.update(Message::FullscreenToggled("c".into()), now);

        viewer.load_results(Some(pro_con()));
        assert_eq!(viewer.carousel().current_page(), 0);
        assert!(!viewer.carousel().is_transitioning());
        assert!(!viewer.overlay().is_active());
        assert!(viewer.coordinator().current().is_none());
        assert_eq!(viewer.records().len(), 2);
    }

    #[test]
    fn test_view_serializes() {
        let viewer = loaded(pro_con());
        let json = serde_json::to_value(viewer.view()).unwrap();
        assert_eq!(json["state"], "carousel");
        assert_eq!(json["slides"][0]["attribute"], "pro");
        assert_eq!(json["page"]["total_pages"], 1);

        let empty = serde_json::to_value(Viewer::default().view()).unwrap();
        assert_eq!(empty["state"], "empty");
    }
}
