//! Fullscreen overlay controller.
//!
//! At most one slide is expanded at a time. While an overlay is up the
//! background must not scroll; every transition reports a [`OverlayChange`]
//! so the shell knows when to lock or restore scrolling.

use serde::Serialize;
use tracing::debug;

/// Keyboard signals the overlay reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    Other,
}

/// What a fullscreen transition did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OverlayChange {
    /// An overlay opened; background scroll must be locked
    Entered { attribute: String },
    /// The overlay moved from one slide to another; scroll stays locked
    Switched { from: String, to: String },
    /// The overlay closed; background scroll is restored
    Exited { attribute: String },
}

impl OverlayChange {
    /// Whether background scroll is locked after this change.
    pub fn scroll_locked(&self) -> bool {
        !matches!(self, OverlayChange::Exited { .. })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FullscreenOverlay {
    target: Option<String>,
}

impl FullscreenOverlay {
    pub fn new() -> Self {
        FullscreenOverlay::default()
    }

    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    pub fn is_fullscreen(&self, attribute: &str) -> bool {
        self.target.as_deref() == Some(attribute)
    }

    pub fn is_active(&self) -> bool {
        self.target.is_some()
    }

    /// Background scroll is suppressed while any slide is fullscreen.
    pub fn scroll_locked(&self) -> bool {
        self.is_active()
    }

    /// Expand `attribute`, or collapse it if it is already expanded.
    /// Any other fullscreen slide is replaced.
    pub fn toggle(&mut self, attribute: &str) -> OverlayChange {
        let change = match self.target.take() {
            Some(current) if current == attribute => OverlayChange::Exited { attribute: current },
            Some(current) => {
                self.target = Some(attribute.to_string());
                OverlayChange::Switched {
                    from: current,
                    to: attribute.to_string(),
                }
            }
            None => {
                self.target = Some(attribute.to_string());
                OverlayChange::Entered {
                    attribute: attribute.to_string(),
                }
            }
        };
        debug!(?change, "fullscreen toggled");
        change
    }

    /// Collapse whatever is expanded.
    pub fn clear(&mut self) -> Option<OverlayChange> {
        let attribute = self.target.take()?;
        debug!(%attribute, "fullscreen cleared");
        Some(OverlayChange::Exited { attribute })
    }

    /// `Escape` closes the overlay; other keys do nothing.
    pub fn handle_key(&mut self, key: Key) -> Option<OverlayChange> {
        match key {
            Key::Escape => self.clear(),
            Key::Other => None,
        }
    }

    /// A click on the dimmed backdrop closes the overlay.
    pub fn backdrop_clicked(&mut self) -> Option<OverlayChange> {
        self.clear()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_enters_and_exits() {
        let mut overlay = FullscreenOverlay::new();
        let entered = overlay.toggle("pro");
        assert_eq!(entered, OverlayChange::Entered { attribute: "pro".into() });
        assert!(entered.scroll_locked());
        assert!(overlay.is_fullscreen("pro"));

        let exited = overlay.toggle("pro");
        assert_eq!(exited, OverlayChange::Exited { attribute: "pro".into() });
        assert!(!exited.scroll_locked());
        assert!(!overlay.is_active());
    }

    #[test]
    fn test_second_slide_replaces_first() {
        let mut overlay = FullscreenOverlay::new();
        overlay.toggle("pro");
        let change = overlay.toggle("con");
        assert_eq!(
            change,
            OverlayChange::Switched { from: "pro".into(), to: "con".into() }
        );
        assert!(overlay.is_fullscreen("con"));
        assert!(!overlay.is_fullscreen("pro"));
        assert!(overlay.scroll_locked());
    }

    #[test]
    fn test_escape_and_backdrop_clear() {
        let mut overlay = FullscreenOverlay::new();
        assert_eq!(overlay.handle_key(Key::Escape), None);

        overlay.toggle("pro");
        assert_eq!(overlay.handle_key(Key::Other), None);
        assert!(overlay.is_active());
        assert!(overlay.handle_key(Key::Escape).is_some());
        assert!(!overlay.scroll_locked());

        overlay.toggle("con");
        assert_eq!(
            overlay.backdrop_clicked(),
            Some(OverlayChange::Exited { attribute: "con".into() })
        );
        assert_eq!(overlay.backdrop_clicked(), None);
    }
}
