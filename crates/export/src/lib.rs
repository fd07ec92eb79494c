//! Export module for TinySnip
//!
//! Delivers a captured bitmap: PNG on disk and CF_DIB on the clipboard.

mod clipboard;
mod png;

pub use clipboard::copy_to_clipboard;
pub use png::save_png;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Clipboard error: {0}")]
    Clipboard(String),
}

pub type ExportResult<T> = Result<T, ExportError>;
