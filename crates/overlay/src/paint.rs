//! Overlay painting: dim layer plus the live selection rectangle.

use snip::{Rect, SelectionTracker};
use windows::Win32::Foundation::{COLORREF, HWND, RECT};
use windows::Win32::Graphics::Gdi::{
    BeginPaint, CreatePen, CreateSolidBrush, DeleteObject, EndPaint, FillRect, GetStockObject,
    Rectangle, SelectObject, SetBkMode, SetTextColor, TextOutW, HDC, NULL_BRUSH, PAINTSTRUCT,
    PS_DASH, TRANSPARENT,
};

/// Selection border color (green).
const SELECTION_COLOR: COLORREF = COLORREF(0x0000FF00);
/// Base color of the dim layer; the window's alpha does the dimming.
const DIM_COLOR: COLORREF = COLORREF(0x00000000);

/// Paint the dim layer and, mid-drag, the selection rectangle with a size
/// readout.
pub(crate) fn paint_overlay(hwnd: HWND, bounds: Rect, tracker: &SelectionTracker) {
    unsafe {
        let mut ps = PAINTSTRUCT::default();
        let hdc = BeginPaint(hwnd, &mut ps);

        fill_background(hdc, bounds);

        let selection = tracker.selection();
        if tracker.is_dragging() && !selection.is_empty() {
            draw_selection(hdc, bounds, selection);
        }

        EndPaint(hwnd, &ps);
    }
}

unsafe fn fill_background(hdc: HDC, bounds: Rect) {
    let brush = CreateSolidBrush(DIM_COLOR);
    let rc = RECT {
        left: 0,
        top: 0,
        right: bounds.width(),
        bottom: bounds.height(),
    };
    FillRect(hdc, &rc, brush);
    DeleteObject(brush);
}

unsafe fn draw_selection(hdc: HDC, bounds: Rect, selection: Rect) {
    // The tracker speaks screen coordinates; painting is window-local.
    let local = selection.translate(-bounds.left, -bounds.top);

    let pen = CreatePen(PS_DASH, 2, SELECTION_COLOR);
    let old_pen = SelectObject(hdc, pen);
    let old_brush = SelectObject(hdc, GetStockObject(NULL_BRUSH));

    Rectangle(hdc, local.left, local.top, local.right, local.bottom);

    SelectObject(hdc, old_brush);
    SelectObject(hdc, old_pen);
    DeleteObject(pen);

    draw_size_text(hdc, local, selection);
}

unsafe fn draw_size_text(hdc: HDC, local: Rect, selection: Rect) {
    let text: Vec<u16> = format!("{} x {}", selection.width(), selection.height())
        .encode_utf16()
        .collect();

    SetBkMode(hdc, TRANSPARENT);
    SetTextColor(hdc, COLORREF(0x00FFFFFF));
    TextOutW(hdc, local.left + 4, local.bottom + 4, &text);
}
