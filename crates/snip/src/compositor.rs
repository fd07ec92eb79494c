//! Screen capture and selection-outline composition.

use crate::geometry::Rect;
use crate::platform::WindowSystem;
use crate::SnipResult;
use image::{Rgba, RgbaImage};

/// Outline stroke width in pixels.
pub const OUTLINE_THICKNESS: i32 = 2;
/// Outline color (opaque red).
pub const OUTLINE_COLOR: Rgba<u8> = Rgba([255, 0, 0, 255]);

/// Capture `area` from the screen and stroke the selection outline onto it.
///
/// `annotation` and `reference` are screen rectangles; the outline lands at
/// `annotation` shifted by `reference`'s top-left corner, so the reference
/// must be the rectangle the captured buffer was read against. A zero-area
/// annotation draws nothing.
pub fn capture_annotated<W: WindowSystem>(
    system: &W,
    area: Rect,
    annotation: Rect,
    reference: Rect,
) -> SnipResult<RgbaImage> {
    let mut bitmap = system.read_screen(area)?;

    if !annotation.is_empty() {
        let local = annotation.translate(-reference.left, -reference.top);
        draw_selection_outline(&mut bitmap, local);
    }

    Ok(bitmap)
}

/// Stroke a hollow rectangle onto the bitmap, clipped to its bounds.
pub fn draw_selection_outline(bitmap: &mut RgbaImage, rect: Rect) {
    for inset in 0..OUTLINE_THICKNESS {
        let ring = Rect::new(
            rect.left + inset,
            rect.top + inset,
            rect.right - inset,
            rect.bottom - inset,
        );
        if ring.is_empty() {
            break;
        }

        hline(bitmap, ring.left, ring.right, ring.top);
        hline(bitmap, ring.left, ring.right, ring.bottom - 1);
        vline(bitmap, ring.left, ring.top, ring.bottom);
        vline(bitmap, ring.right - 1, ring.top, ring.bottom);
    }
}

fn hline(bitmap: &mut RgbaImage, x0: i32, x1: i32, y: i32) {
    if y < 0 || y >= bitmap.height() as i32 {
        return;
    }

    let x0 = x0.max(0);
    let x1 = x1.min(bitmap.width() as i32);
    for x in x0..x1 {
        bitmap.put_pixel(x as u32, y as u32, OUTLINE_COLOR);
    }
}

fn vline(bitmap: &mut RgbaImage, x: i32, y0: i32, y1: i32) {
    if x < 0 || x >= bitmap.width() as i32 {
        return;
    }

    let y0 = y0.max(0);
    let y1 = y1.min(bitmap.height() as i32);
    for y in y0..y1 {
        bitmap.put_pixel(x as u32, y as u32, OUTLINE_COLOR);
    }
}
