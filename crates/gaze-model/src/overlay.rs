//! Overlay geometry driven by stable gaze updates.
//!
//! Gaze arrives in screen coordinates. The overlay converts it to window
//! space, then into the local space of the container that hosts the
//! pointer. The focus-reveal region is only placed while the gaze falls
//! on the displayed image.

use serde::{Deserialize, Serialize};

use crate::gaze::{GazePoint, StableGazeUpdate};

/// Position and size of the host window on screen.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WindowBounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl WindowBounds {
    /// Convert a screen coordinate into window space.
    pub fn screen_to_window(&self, x: f64, y: f64) -> GazePoint {
        GazePoint::new(x - self.x, y - self.y)
    }
}

/// A rectangle in window space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Convert a window-space point into this rectangle's local space.
    pub fn to_local(&self, point: GazePoint) -> GazePoint {
        GazePoint::new(point.x - self.left, point.y - self.top)
    }

    /// Whether a local-space point lies inside, edges included.
    pub fn contains_local(&self, local: GazePoint) -> bool {
        local.x >= 0.0 && local.x <= self.width && local.y >= 0.0 && local.y <= self.height
    }
}

/// Square focus-reveal region in container space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FocusRegion {
    /// Top-left corner.
    pub x: f64,
    pub y: f64,
    pub size: f64,
}

impl FocusRegion {
    /// Region of side `size` centered on `(cx, cy)`.
    pub fn centered(cx: f64, cy: f64, size: f64) -> Self {
        Self {
            x: cx - size / 2.0,
            y: cy - size / 2.0,
            size,
        }
    }

    pub fn center(&self) -> GazePoint {
        GazePoint::new(self.x + self.size / 2.0, self.y + self.size / 2.0)
    }
}

/// Where the overlay should draw for one update.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OverlayPlacement {
    /// Pointer position in container space.
    pub pointer: GazePoint,
    /// Focus region, present only while the gaze is over the image.
    pub focus: Option<FocusRegion>,
}

/// Window layout the overlay is drawn into.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OverlayLayout {
    pub window: WindowBounds,
    /// Pointer container, in window space.
    pub container: Rect,
    /// Displayed image, in window space. `None` until an image is loaded.
    pub image: Option<Rect>,
    pub focus_size: f64,
}

impl OverlayLayout {
    /// Place the pointer and focus region for an update.
    pub fn place(&self, update: &StableGazeUpdate) -> OverlayPlacement {
        let in_window = self.window.screen_to_window(update.x, update.y);
        let pointer = self.container.to_local(in_window);

        let focus = self
            .image
            .filter(|image| image.contains_local(image.to_local(in_window)))
            .map(|_| FocusRegion::centered(pointer.x, pointer.y, self.focus_size));

        OverlayPlacement { pointer, focus }
    }
}
