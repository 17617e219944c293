//! TUI state: the viewer plus focus, cursors and scroll.

use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind};
use lens_core::comparison::ComparisonChange;
use lens_core::fullscreen::Key;
use lens_core::slide::SlideView;
use lens_core::viewer::{CarouselView, Outcome};
use lens_core::{Message, Viewer, ViewerView};
use ratatui::layout::{Position, Rect};
use tracing::debug;

pub struct App {
    pub viewer: Viewer,
    /// Index of the focused slide among the visible ones
    pub focus: usize,
    pub summary_cursor: usize,
    pub article_cursor: usize,
    /// Vertical scroll of the slide panes
    pub scroll: u16,
    pub status: Option<String>,
    /// Where the fullscreen overlay was last drawn
    pub overlay_area: Option<Rect>,
    pub should_quit: bool,
}

impl App {
    pub fn new(viewer: Viewer) -> Self {
        App {
            viewer,
            focus: 0,
            summary_cursor: 0,
            article_cursor: 0,
            scroll: 0,
            status: None,
            overlay_area: None,
            should_quit: false,
        }
    }

    pub fn tick(&mut self, now: Instant) {
        self.viewer.update(Message::Tick, now);
    }

    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        if key.code == KeyCode::Char('q') {
            self.should_quit = true;
            return;
        }

        let ViewerView::Carousel(view) = self.viewer.view() else {
            return;
        };
        self.follow_fullscreen(&view);

        let slide = view.slides.get(self.focus);
        let attribute = slide.map(|s| s.attribute.clone());
        let summary_id = slide
            .and_then(|s| s.summaries.get(self.summary_cursor))
            .map(|s| s.id.clone());
        let article_id = slide
            .and_then(|s| s.articles.get(self.article_cursor))
            .map(|a| a.id.clone());

        let message = match key.code {
            KeyCode::Left => Some(Message::PreviousPage),
            KeyCode::Right => Some(Message::NextPage),
            KeyCode::Char(digit @ '1'..='9') => {
                Some(Message::PageRequested(digit as isize - '1' as isize))
            }
            KeyCode::Tab if view.fullscreen.is_none() => {
                self.focus = (self.focus + 1) % view.slides.len().max(1);
                self.reset_cursors();
                None
            }
            KeyCode::Up => {
                self.summary_cursor = self.summary_cursor.saturating_sub(1);
                None
            }
            KeyCode::Down => {
                self.summary_cursor = step(self.summary_cursor, slide.map_or(0, |s| s.summaries.len()));
                None
            }
            KeyCode::Char('k') => {
                self.article_cursor = self.article_cursor.saturating_sub(1);
                None
            }
            KeyCode::Char('j') => {
                self.article_cursor = step(self.article_cursor, slide.map_or(0, |s| s.articles.len()));
                None
            }
            KeyCode::Enter => attribute
                .zip(summary_id)
                .map(|(attribute, summary_id)| Message::SummaryClicked { attribute, summary_id }),
            KeyCode::Char('c') => attribute
                .zip(summary_id)
                .map(|(attribute, summary_id)| Message::ComparisonToggled { attribute, summary_id }),
            KeyCode::Char('a') => attribute.zip(summary_id).map(|(attribute, summary_id)| {
                Message::ArticleRelevanceShown { attribute, summary_id }
            }),
            KeyCode::Char('e') => attribute.zip(article_id).map(|(attribute, article_id)| {
                Message::ArticleExpandToggled { attribute, article_id }
            }),
            KeyCode::Char('f') => attribute.map(Message::FullscreenToggled),
            KeyCode::Esc => Some(Message::KeyPressed(Key::Escape)),
            _ => None,
        };

        if let Some(message) = message {
            self.send(message, now);
        }
    }

    pub fn handle_mouse(&mut self, mouse: MouseEvent, now: Instant) {
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                let outside = self
                    .overlay_area
                    .is_some_and(|area| !area.contains(Position::new(mouse.column, mouse.row)));
                if outside {
                    self.send(Message::BackdropClicked, now);
                }
            }
            MouseEventKind::ScrollDown if !self.viewer.overlay().scroll_locked() => {
                self.scroll = self.scroll.saturating_add(1);
            }
            MouseEventKind::ScrollUp if !self.viewer.overlay().scroll_locked() => {
                self.scroll = self.scroll.saturating_sub(1);
            }
            _ => {}
        }
    }

    /// The focused slide of the current view.
    pub fn focused<'a>(&self, view: &'a CarouselView) -> Option<&'a SlideView> {
        view.slides.get(self.focus)
    }

    fn send(&mut self, message: Message, now: Instant) {
        debug!(?message, "tui message");
        let outcome = self.viewer.update(message, now);
        self.apply_outcome(&outcome);
    }

    fn apply_outcome(&mut self, outcome: &Outcome) {
        if outcome.page_changed {
            self.focus = 0;
            self.scroll = 0;
            self.reset_cursors();
        }
        match &outcome.comparison {
            ComparisonChange::Activated { source, .. } => {
                self.status = Some(format!("Comparing other aspects against {}", source));
            }
            ComparisonChange::Cleared { .. } => {
                self.status = Some("Comparison cleared".to_string());
            }
            ComparisonChange::Unchanged => {}
        }
    }

    /// Keep focus on the fullscreen slide while the overlay is up.
    fn follow_fullscreen(&mut self, view: &CarouselView) {
        let Some(target) = view.fullscreen.as_deref() else {
            return;
        };
        if let Some(index) = view.slides.iter().position(|s| s.attribute == target) {
            if index != self.focus {
                self.focus = index;
                self.reset_cursors();
            }
        }
    }

    fn reset_cursors(&mut self) {
        self.summary_cursor = 0;
        self.article_cursor = 0;
    }
}

fn step(cursor: usize, len: usize) -> usize {
    (cursor + 1).min(len.saturating_sub(1))
}
