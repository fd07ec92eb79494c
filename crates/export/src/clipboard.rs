//! Clipboard delivery

use crate::{ExportError, ExportResult};
use image::{DynamicImage, ImageFormat, RgbaImage};
use std::io::Cursor;
use windows::Win32::Foundation::HANDLE;
use windows::Win32::System::DataExchange::{
    CloseClipboard, EmptyClipboard, OpenClipboard, SetClipboardData,
};
use windows::Win32::System::Memory::{GlobalAlloc, GlobalLock, GlobalUnlock, GMEM_MOVEABLE};

/// Device-independent bitmap clipboard format.
const CF_DIB: u32 = 8;
/// Length of the BITMAPFILEHEADER a BMP file carries in front of the DIB.
const BMP_FILE_HEADER_LEN: usize = 14;

/// Place a captured bitmap on the clipboard as CF_DIB.
///
/// The bitmap is re-encoded as a 24-bit BMP and the file header stripped
/// off; what remains is exactly the packed DIB the clipboard expects.
pub fn copy_to_clipboard(bitmap: &RgbaImage) -> ExportResult<()> {
    let rgb = DynamicImage::ImageRgba8(bitmap.clone()).to_rgb8();

    let mut bmp = Vec::new();
    rgb.write_to(&mut Cursor::new(&mut bmp), ImageFormat::Bmp)?;

    if bmp.len() <= BMP_FILE_HEADER_LEN {
        return Err(ExportError::Clipboard(
            "BMP encoding produced no data".into(),
        ));
    }
    let dib = &bmp[BMP_FILE_HEADER_LEN..];

    unsafe {
        OpenClipboard(None)
            .map_err(|e| ExportError::Clipboard(format!("OpenClipboard failed: {}", e)))?;

        if let Err(e) = EmptyClipboard() {
            let _ = CloseClipboard();
            return Err(ExportError::Clipboard(format!(
                "EmptyClipboard failed: {}",
                e
            )));
        }

        let h_mem = match GlobalAlloc(GMEM_MOVEABLE, dib.len()) {
            Ok(h) => h,
            Err(e) => {
                let _ = CloseClipboard();
                return Err(ExportError::Clipboard(format!(
                    "GlobalAlloc failed: {}",
                    e
                )));
            }
        };

        let dst = GlobalLock(h_mem);
        if dst.is_null() {
            let _ = CloseClipboard();
            return Err(ExportError::Clipboard("GlobalLock failed".into()));
        }

        std::ptr::copy_nonoverlapping(dib.as_ptr(), dst as *mut u8, dib.len());
        let _ = GlobalUnlock(h_mem);

        // On success the clipboard owns the allocation.
        if let Err(e) = SetClipboardData(CF_DIB, HANDLE(h_mem.0)) {
            let _ = CloseClipboard();
            return Err(ExportError::Clipboard(format!(
                "SetClipboardData failed: {}",
                e
            )));
        }

        let _ = CloseClipboard();
    }

    log::debug!("placed {} DIB bytes on the clipboard", dib.len());
    Ok(())
}
