//! Core capture pipeline for TinySnip
//!
//! Platform-neutral half of the snipping tool: geometry, drag tracking,
//! window resolution and bitmap composition. The platform side plugs in
//! through the traits in [`platform`], so the whole pipeline runs against
//! scripted doubles in tests.

pub mod compositor;
pub mod geometry;
pub mod layout;
pub mod platform;
pub mod resolver;
pub mod session;
pub mod tracker;

pub use geometry::{MonitorInfo, Point, Rect};
pub use platform::{SelectionSurface, WindowSystem};
pub use resolver::{resolve_window, ResolvedWindow};
pub use session::{CaptureSession, SessionConfig};
pub use tracker::SelectionTracker;

use image::RgbaImage;
use thiserror::Error;

/// Pipeline errors
#[derive(Error, Debug)]
pub enum SnipError {
    #[error("Screen read failed: {0}")]
    ScreenRead(String),

    #[error("Selection surface failed: {0}")]
    Surface(String),
}

pub type SnipResult<T> = Result<T, SnipError>;

/// What the selection surface reports back to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionOutcome {
    /// A drag (or click) ran to completion: the normalized region and the
    /// raw release point, both in screen coordinates.
    Picked { region: Rect, release: Point },
    /// The surface was dismissed without a release.
    Dismissed,
}

/// Why a session ended without pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// The overlay was dismissed before a selection was released.
    Dismissed,
    /// No window under the release point.
    NoWindowAtPoint,
    /// The platform refused the screen read.
    ScreenRead(String),
    /// The selection surface could not be created or run.
    Surface(String),
}

/// Outcome of one capture session.
#[derive(Debug)]
pub enum CaptureResult {
    /// Captured frame with the selection outline drawn on.
    Captured { bitmap: RgbaImage },
    /// The session ended without a bitmap.
    Failed { reason: FailureReason },
}

impl CaptureResult {
    pub fn succeeded(&self) -> bool {
        matches!(self, CaptureResult::Captured { .. })
    }

    pub fn into_bitmap(self) -> Option<RgbaImage> {
        match self {
            CaptureResult::Captured { bitmap } => Some(bitmap),
            CaptureResult::Failed { .. } => None,
        }
    }
}
