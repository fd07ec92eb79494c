//! Window resolution at the release point.

use crate::geometry::{Point, Rect};
use crate::platform::WindowSystem;

/// A window resolved under a release point, with the competing rectangle
/// sources reconciled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedWindow<W> {
    /// Platform window identifier.
    pub window: W,
    /// Outer frame, with monitor bounds substituted for fullscreen windows.
    pub frame: Rect,
    /// Outer frame exactly as the platform reported it.
    pub reported_frame: Rect,
    /// Client area in screen coordinates; falls back to `reported_frame`
    /// when the translation failed.
    pub content: Rect,
    /// The reported frame covers its whole monitor.
    pub fullscreen: bool,
}

impl<W> ResolvedWindow<W> {
    /// Screen rectangle the capture reads: the reported frame's origin with
    /// the content rectangle's dimensions. Anchoring at the reported origin
    /// keeps the buffer aligned with the rectangle annotations are placed
    /// against, fullscreen or not.
    pub fn capture_area(&self) -> Rect {
        Rect::new(
            self.reported_frame.left,
            self.reported_frame.top,
            self.reported_frame.left + self.content.width(),
            self.reported_frame.top + self.content.height(),
        )
    }
}

/// Resolve the topmost window under `point`.
///
/// Queries are read-only, so resolving the same point twice against an
/// unchanged desktop yields the same rectangles.
pub fn resolve_window<W: WindowSystem>(
    system: &W,
    point: Point,
) -> Option<ResolvedWindow<W::Window>> {
    let window = system.window_at(point)?;
    let reported_frame = system.window_rect(window)?;

    let content = match translated_client_rect(system, window) {
        Some(rect) => rect,
        None => {
            log::debug!(
                "client rect translation failed for {:?}, using window frame",
                window
            );
            reported_frame
        }
    };

    let (frame, fullscreen) = match system.monitor_near(window) {
        Some(monitor) if reported_frame.encloses(&monitor.bounds) => (monitor.bounds, true),
        _ => (reported_frame, false),
    };

    Some(ResolvedWindow {
        window,
        frame,
        reported_frame,
        content,
        fullscreen,
    })
}

/// Client rectangle lifted into screen coordinates, corner by corner.
fn translated_client_rect<W: WindowSystem>(system: &W, window: W::Window) -> Option<Rect> {
    let local = system.client_rect(window)?;
    let top_left = system.client_to_screen(window, Point::new(local.left, local.top))?;
    let bottom_right = system.client_to_screen(window, Point::new(local.right, local.bottom))?;

    Some(Rect::new(top_left.x, top_left.y, bottom_right.x, bottom_right.y))
}
