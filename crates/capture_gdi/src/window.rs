//! Window queries at and around a screen point.

use crate::rect_from_win32;
use snip::{Point, Rect};
use windows::Win32::Foundation::{HWND, POINT, RECT};
use windows::Win32::Graphics::Gdi::ClientToScreen;
use windows::Win32::UI::WindowsAndMessaging::{GetClientRect, GetWindowRect, WindowFromPoint};

pub(crate) fn hwnd_from_raw(raw: isize) -> HWND {
    HWND(raw as *mut std::ffi::c_void)
}

/// Topmost window under a screen point.
pub fn window_at_point(point: Point) -> Option<isize> {
    unsafe {
        let hwnd = WindowFromPoint(POINT { x: point.x, y: point.y });
        if hwnd.0.is_null() {
            return None;
        }

        Some(hwnd.0 as isize)
    }
}

/// Outer bounding rectangle in screen coordinates.
pub fn window_rect(hwnd_raw: isize) -> Option<Rect> {
    unsafe {
        let mut rect = RECT::default();
        if GetWindowRect(hwnd_from_raw(hwnd_raw), &mut rect).is_err() {
            return None;
        }

        Some(rect_from_win32(&rect))
    }
}

/// Client rectangle in window-local coordinates.
pub fn client_rect(hwnd_raw: isize) -> Option<Rect> {
    unsafe {
        let mut rect = RECT::default();
        if GetClientRect(hwnd_from_raw(hwnd_raw), &mut rect).is_err() {
            return None;
        }

        Some(rect_from_win32(&rect))
    }
}

/// Translate a window-local point to screen coordinates.
pub fn client_to_screen(hwnd_raw: isize, point: Point) -> Option<Point> {
    unsafe {
        let mut pt = POINT { x: point.x, y: point.y };
        if !ClientToScreen(hwnd_from_raw(hwnd_raw), &mut pt).as_bool() {
            return None;
        }

        Some(Point::new(pt.x, pt.y))
    }
}
