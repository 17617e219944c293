//! # Carousel Controller
//!
//! Pages the slide list two at a time and serializes page changes behind a
//! short transition lock, so rapid input cannot stack page changes while a
//! slide animation is still in flight.
//!
//! Time is injected: every operation that can start or release the lock
//! takes the current [`Instant`], which keeps the state machine
//! deterministic under test.
//!
//! ## Example
//!
//! ```rust
//! use std::time::{Duration, Instant};
//! use lens_core::carousel::Carousel;
//!
//! let mut carousel = Carousel::new(5, 2, Duration::from_millis(300));
//! let start = Instant::now();
//!
//! assert_eq!(carousel.total_pages(), 3);
//! assert!(carousel.change_page(2, start));
//! assert!(!carousel.change_page(1, start)); // locked
//! assert!(carousel.change_page(1, start + Duration::from_millis(300)));
//! assert_eq!(carousel.current_page(), 1);
//! ```

use std::ops::Range;
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{debug, trace};

/// Slides shown side by side on one page
pub const DEFAULT_SLIDES_PER_PAGE: usize = 2;

/// How long page changes stay locked after one is accepted
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(300);

/// Snapshot of the paging state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageState {
    pub current_page: usize,
    pub total_pages: usize,
    pub is_transitioning: bool,
}

/// One page indicator dot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageDot {
    pub index: usize,
    pub active: bool,
    pub enabled: bool,
}

impl PageDot {
    pub fn label(&self) -> String {
        format!("Go to page {}", self.index + 1)
    }
}

/// Previous/next buttons and page dots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageControls {
    pub previous_enabled: bool,
    pub next_enabled: bool,
    pub dots: Vec<PageDot>,
}

/// Pagination state machine over a fixed number of slides.
#[derive(Debug, Clone)]
pub struct Carousel {
    slide_count: usize,
    slides_per_page: usize,
    settle_delay: Duration,
    current_page: usize,
    locked_until: Option<Instant>,
}

impl Default for Carousel {
    fn default() -> Self {
        Carousel::new(0, DEFAULT_SLIDES_PER_PAGE, DEFAULT_SETTLE_DELAY)
    }
}

impl Carousel {
    /// Create a carousel on page 0. A `slides_per_page` of 0 is treated as 1.
    pub fn new(slide_count: usize, slides_per_page: usize, settle_delay: Duration) -> Self {
        Carousel {
            slide_count,
            slides_per_page: slides_per_page.max(1),
            settle_delay,
            current_page: 0,
            locked_until: None,
        }
    }

    /// Start over for a new result set: page 0, no lock.
    pub fn reset(&mut self, slide_count: usize) {
        self.slide_count = slide_count;
        self.current_page = 0;
        self.locked_until = None;
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    /// `ceil(slide_count / slides_per_page)`; 0 when there are no slides.
    pub fn total_pages(&self) -> usize {
        self.slide_count.div_ceil(self.slides_per_page)
    }

    /// A lone slide is always shown and never paged.
    pub fn is_single_slide(&self) -> bool {
        self.slide_count == 1
    }

    pub fn shows_controls(&self) -> bool {
        !self.is_single_slide() && self.total_pages() > 1
    }

    pub fn is_transitioning(&self) -> bool {
        self.locked_until.is_some()
    }

    pub fn state(&self) -> PageState {
        PageState {
            current_page: self.current_page,
            total_pages: self.total_pages(),
            is_transitioning: self.is_transitioning(),
        }
    }

    /// Release the transition lock once its deadline has passed.
    ///
    /// Returns `true` if the lock was released by this call.
    pub fn settle(&mut self, now: Instant) -> bool {
        match self.locked_until {
            Some(deadline) if now >= deadline => {
                self.locked_until = None;
                trace!(page = self.current_page, "page transition settled");
                true
            }
            _ => false,
        }
    }

    /// Move to `target`, returning whether the change was accepted.
    ///
    /// Out-of-range targets and requests made while a transition is still
    /// settling are ignored.
    pub fn change_page(&mut self, target: isize, now: Instant) -> bool {
        self.settle(now);

        let total = self.total_pages();
        let Ok(target) = usize::try_from(target) else {
            trace!(target, "page change ignored: before first page");
            return false;
        };
        if target >= total {
            trace!(target, total, "page change ignored: past last page");
            return false;
        }
        if self.is_transitioning() {
            trace!(target, "page change ignored: transition in flight");
            return false;
        }

        self.current_page = target;
        self.locked_until = Some(now + self.settle_delay);
        debug!(page = target, total, "page changed");
        true
    }

    pub fn next_page(&mut self, now: Instant) -> bool {
        self.change_page(self.current_page as isize + 1, now)
    }

    pub fn previous_page(&mut self, now: Instant) -> bool {
        self.change_page(self.current_page as isize - 1, now)
    }

    /// Indices of the slides on the current page.
    pub fn visible_range(&self) -> Range<usize> {
        if self.is_single_slide() {
            return 0..1;
        }
        let start = (self.current_page * self.slides_per_page).min(self.slide_count);
        let end = (start + self.slides_per_page).min(self.slide_count);
        start..end
    }

    /// The slice of `all` shown on the current page.
    pub fn visible_slides<'a, T>(&self, all: &'a [T]) -> &'a [T] {
        let range = self.visible_range();
        let end = range.end.min(all.len());
        let start = range.start.min(end);
        &all[start..end]
    }

    pub fn is_visible(&self, index: usize) -> bool {
        self.visible_range().contains(&index)
    }

    /// Navigation controls, or `None` when there is nothing to page through.
    pub fn controls(&self) -> Option<PageControls> {
        if !self.shows_controls() {
            return None;
        }
        let total = self.total_pages();
        let locked = self.is_transitioning();
        Some(PageControls {
            previous_enabled: self.current_page > 0 && !locked,
            next_enabled: self.current_page + 1 < total && !locked,
            dots: (0..total)
                .map(|index| PageDot {
                    index,
                    active: index == self.current_page,
                    enabled: !locked,
                })
                .collect(),
        })
    }
}
