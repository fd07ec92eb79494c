//! Win32 window-system backend for TinySnip
//!
//! Implements the core [`WindowSystem`] trait over user32/GDI: monitor
//! enumeration, window lookup at a point, rectangle queries and BitBlt
//! screen reads.

mod monitor;
mod screen;
mod window;

use image::RgbaImage;
use snip::{MonitorInfo, Point, Rect, SnipResult, WindowSystem};
use windows::Win32::Foundation::RECT;

/// `WindowSystem` over user32/GDI.
///
/// Window handles are raw HWND values carried as `isize` so they stay
/// `Send` between the shell and the capture worker.
#[derive(Debug, Default, Clone, Copy)]
pub struct GdiWindowSystem;

impl GdiWindowSystem {
    pub fn new() -> Self {
        Self
    }
}

impl WindowSystem for GdiWindowSystem {
    type Window = isize;

    fn monitors(&self) -> Vec<MonitorInfo> {
        monitor::enumerate_monitors()
    }

    fn window_at(&self, point: Point) -> Option<isize> {
        window::window_at_point(point)
    }

    fn window_rect(&self, window: isize) -> Option<Rect> {
        window::window_rect(window)
    }

    fn client_rect(&self, window: isize) -> Option<Rect> {
        window::client_rect(window)
    }

    fn client_to_screen(&self, window: isize, point: Point) -> Option<Point> {
        window::client_to_screen(window, point)
    }

    fn monitor_near(&self, window: isize) -> Option<MonitorInfo> {
        monitor::monitor_near_window(window)
    }

    fn read_screen(&self, area: Rect) -> SnipResult<RgbaImage> {
        screen::read_screen_area(area)
    }
}

pub(crate) fn rect_from_win32(rect: &RECT) -> Rect {
    Rect::new(rect.left, rect.top, rect.right, rect.bottom)
}
