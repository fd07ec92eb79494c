//! GDI screen reads

use image::{ImageBuffer, RgbaImage};
use snip::{Rect, SnipError, SnipResult};
use windows::Win32::Graphics::Gdi::{
    BitBlt, CreateCompatibleBitmap, CreateCompatibleDC, DeleteDC, DeleteObject, GetDC, GetDIBits,
    ReleaseDC, SelectObject, BITMAPINFO, BITMAPINFOHEADER, BI_RGB, DIB_RGB_COLORS, SRCCOPY,
};

/// Copy a screen rectangle into an owned RGBA buffer.
pub fn read_screen_area(area: Rect) -> SnipResult<RgbaImage> {
    let width = area.width();
    let height = area.height();

    if width <= 0 || height <= 0 {
        return Err(SnipError::ScreenRead(format!(
            "invalid capture area {}x{}",
            width, height
        )));
    }

    unsafe {
        let screen_dc = GetDC(None);
        if screen_dc.is_invalid() {
            return Err(SnipError::ScreenRead("failed to get screen DC".into()));
        }

        let mem_dc = CreateCompatibleDC(screen_dc);
        let bitmap = CreateCompatibleBitmap(screen_dc, width, height);
        let old_bitmap = SelectObject(mem_dc, bitmap);

        let blt = BitBlt(
            mem_dc, 0, 0, width, height, screen_dc, area.left, area.top, SRCCOPY,
        );

        let mut bitmap_info = BITMAPINFO {
            bmiHeader: BITMAPINFOHEADER {
                biSize: std::mem::size_of::<BITMAPINFOHEADER>() as u32,
                biWidth: width,
                biHeight: -height, // Top-down
                biPlanes: 1,
                biBitCount: 32,
                biCompression: BI_RGB.0,
                ..Default::default()
            },
            ..Default::default()
        };

        let mut data = vec![0u8; (width * height * 4) as usize];

        let scanlines = if blt.is_ok() {
            GetDIBits(
                mem_dc,
                bitmap,
                0,
                height as u32,
                Some(data.as_mut_ptr() as *mut _),
                &mut bitmap_info,
                DIB_RGB_COLORS,
            )
        } else {
            0
        };

        SelectObject(mem_dc, old_bitmap);
        DeleteObject(bitmap);
        DeleteDC(mem_dc);
        ReleaseDC(None, screen_dc);

        if let Err(e) = blt {
            return Err(SnipError::ScreenRead(format!("BitBlt failed: {}", e)));
        }
        if scanlines == 0 {
            return Err(SnipError::ScreenRead(
                "GetDIBits returned no scanlines".into(),
            ));
        }

        // BGRA to RGBA; GDI leaves the alpha channel undefined.
        for chunk in data.chunks_exact_mut(4) {
            chunk.swap(0, 2);
            chunk[3] = 255;
        }

        ImageBuffer::from_raw(width as u32, height as u32, data)
            .ok_or_else(|| SnipError::ScreenRead("pixel buffer size mismatch".into()))
    }
}
