//! PNG persistence

use crate::ExportResult;
use image::RgbaImage;
use std::path::Path;

/// Save a captured bitmap as PNG.
pub fn save_png(bitmap: &RgbaImage, path: &Path) -> ExportResult<()> {
    bitmap.save(path)?;
    log::debug!(
        "saved {}x{} capture to {}",
        bitmap.width(),
        bitmap.height(),
        path.display()
    );
    Ok(())
}
