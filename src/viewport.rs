//! Viewport geometry and the prefetch visibility predicate.
//!
//! An item counts as visible when its bounds sit inside the scroll region's
//! visible strip extended by [`PREFETCH_MARGIN`] on both ends. Items just
//! above or below the fold are treated as visible so their content is ready
//! before they actually scroll in.

use eframe::egui::Rect;

/// Margin (logical points) above and below the visible strip that still
/// counts as visible.
pub const PREFETCH_MARGIN: f32 = 125.0;

/// The visible strip of a scroll region, in screen coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    /// Screen-space y of the strip's top edge.
    pub top: f32,
    /// Height of the strip.
    pub height: f32,
}

impl Viewport {
    pub fn new(top: f32, height: f32) -> Self {
        Self { top, height }
    }
}

/// An item's vertical extent expressed relative to the viewport's top edge.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ItemBounds {
    pub top: f32,
    pub bottom: f32,
}

impl ItemBounds {
    pub fn new(top: f32, bottom: f32) -> Self {
        Self { top, bottom }
    }

    /// Translate an absolute (screen-space) rectangle into bounds relative
    /// to the given viewport's top edge.
    pub fn relative_to(rect: Rect, viewport: Viewport) -> Self {
        Self {
            top: rect.top() - viewport.top,
            bottom: rect.bottom() - viewport.top,
        }
    }
}

/// Visibility predicate: `top >= -margin && bottom <= height + margin`.
pub fn is_within_viewport(bounds: ItemBounds, viewport_height: f32) -> bool {
    bounds.top >= -PREFETCH_MARGIN && bounds.bottom <= viewport_height + PREFETCH_MARGIN
}
