//! Platform capability traits
//!
//! The two seams between the pipeline and the window system. Production
//! code implements these over Win32; tests drive the pipeline with
//! scripted doubles.

use crate::geometry::{MonitorInfo, Point, Rect};
use crate::{SelectionOutcome, SnipResult};
use image::RgbaImage;
use std::fmt::Debug;

/// Window-system queries and screen pixel reads.
pub trait WindowSystem {
    /// Opaque window identifier. Treated as stale once the session that
    /// resolved it finishes.
    type Window: Copy + Debug;

    /// Snapshot of every connected monitor.
    fn monitors(&self) -> Vec<MonitorInfo>;

    /// Topmost window containing the point, if any.
    fn window_at(&self, point: Point) -> Option<Self::Window>;

    /// Outer bounding rectangle in screen coordinates.
    fn window_rect(&self, window: Self::Window) -> Option<Rect>;

    /// Client-area rectangle in window-local coordinates.
    fn client_rect(&self, window: Self::Window) -> Option<Rect>;

    /// Translate a window-local point to screen coordinates.
    fn client_to_screen(&self, window: Self::Window, point: Point) -> Option<Point>;

    /// Monitor nearest to the window.
    fn monitor_near(&self, window: Self::Window) -> Option<MonitorInfo>;

    /// Read a rectangular region of on-screen pixels.
    fn read_screen(&self, area: Rect) -> SnipResult<RgbaImage>;
}

/// Full-coverage selection overlay.
pub trait SelectionSurface {
    /// Cover `bounds`, run one selection interaction to completion and
    /// report how it ended. The surface must already be hidden when this
    /// returns so the screen read that follows cannot photograph it.
    fn select(&mut self, bounds: Rect) -> SnipResult<SelectionOutcome>;
}
