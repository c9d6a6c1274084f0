//! Horizontal scroll strip affordances
//!
//! The host reports strip geometry whenever the strip scrolls, the viewport
//! resizes, or the content width changes (late-loading images); the
//! controller answers whether the prior/next buttons should be enabled.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Rounding slack in CSS pixels
pub const SCROLL_EPSILON: f64 = 2.0;

/// Fraction of the viewport moved by one button press
pub const SCROLL_STEP: f64 = 0.8;

/// Geometry of a strip at one moment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScrollMetrics {
    /// Current scroll offset from the left edge
    pub offset: f64,
    /// Visible width
    pub viewport_width: f64,
    /// Total scrollable width
    pub total_width: f64,
}

/// What caused a re-measure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrollTrigger {
    Mount,
    Scroll,
    ViewportResize,
    ContentResize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollDirection {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScrollAffordance {
    pub can_scroll_left: bool,
    pub can_scroll_right: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollBehavior {
    Smooth,
}

/// Scroll the host should perform
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScrollRequest {
    /// Signed horizontal distance; negative scrolls left
    pub delta: f64,
    pub behavior: ScrollBehavior,
}

#[derive(Debug, Clone)]
pub struct HorizontalScrollController {
    can_scroll_left: bool,
    can_scroll_right: bool,
    metrics: Option<ScrollMetrics>,
}

impl Default for HorizontalScrollController {
    fn default() -> Self {
        Self::new()
    }
}

impl HorizontalScrollController {
    /// Before the first measurement more content is assumed to the right
    pub fn new() -> Self {
        Self {
            can_scroll_left: false,
            can_scroll_right: true,
            metrics: None,
        }
    }

    pub fn affordance(&self) -> ScrollAffordance {
        ScrollAffordance {
            can_scroll_left: self.can_scroll_left,
            can_scroll_right: self.can_scroll_right,
        }
    }

    pub fn metrics(&self) -> Option<ScrollMetrics> {
        self.metrics
    }

    /// Recompute both affordances from the given geometry
    pub fn check_scroll(&mut self, metrics: ScrollMetrics) -> ScrollAffordance {
        self.metrics = Some(metrics);
        self.can_scroll_left = metrics.offset > SCROLL_EPSILON;
        self.can_scroll_right =
            metrics.offset + metrics.viewport_width < metrics.total_width - SCROLL_EPSILON;
        self.affordance()
    }

    /// Re-measure after a host event
    pub fn observe(&mut self, trigger: ScrollTrigger, metrics: ScrollMetrics) -> ScrollAffordance {
        let affordance = self.check_scroll(metrics);
        debug!(
            ?trigger,
            offset = metrics.offset,
            left = affordance.can_scroll_left,
            right = affordance.can_scroll_right,
            "Scroll strip re-measured"
        );
        affordance
    }

    /// Smooth scroll by 80% of the last measured viewport width
    pub fn scroll(&self, direction: ScrollDirection) -> ScrollRequest {
        let width = self.metrics.map(|m| m.viewport_width).unwrap_or(0.0);
        let distance = width * SCROLL_STEP;
        ScrollRequest {
            delta: match direction {
                ScrollDirection::Left => -distance,
                ScrollDirection::Right => distance,
            },
            behavior: ScrollBehavior::Smooth,
        }
    }
}
