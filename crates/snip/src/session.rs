//! One end-to-end capture session.

use crate::compositor::capture_annotated;
use crate::layout::virtual_desktop_bounds;
use crate::platform::{SelectionSurface, WindowSystem};
use crate::resolver::resolve_window;
use crate::{CaptureResult, FailureReason, SelectionOutcome};
use std::thread;
use std::time::Duration;

/// Session tuning knobs.
#[derive(Debug, Clone, Copy)]
pub struct SessionConfig {
    /// Wait between the overlay hiding and the screen read, giving the
    /// desktop compositor time to actually remove the overlay's pixels.
    pub settle_delay: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            settle_delay: Duration::from_millis(100),
        }
    }
}

/// Runs one selection-to-capture cycle and delivers exactly one result.
pub struct CaptureSession<W, S> {
    system: W,
    surface: S,
    config: SessionConfig,
}

impl<W: WindowSystem, S: SelectionSurface> CaptureSession<W, S> {
    pub fn new(system: W, surface: S) -> Self {
        Self::with_config(system, surface, SessionConfig::default())
    }

    pub fn with_config(system: W, surface: S, config: SessionConfig) -> Self {
        Self {
            system,
            surface,
            config,
        }
    }

    /// Run the session to completion.
    ///
    /// Consumes the session: the result is delivered exactly once and the
    /// window handle resolved along the way never outlives the call.
    pub fn run(mut self) -> CaptureResult {
        let monitors = self.system.monitors();
        let bounds = virtual_desktop_bounds(&monitors);
        log::debug!("overlay bounds {:?} over {} monitor(s)", bounds, monitors.len());

        let outcome = match self.surface.select(bounds) {
            Ok(outcome) => outcome,
            Err(e) => {
                log::warn!("selection surface failed: {}", e);
                return CaptureResult::Failed {
                    reason: FailureReason::Surface(e.to_string()),
                };
            }
        };

        let (region, release) = match outcome {
            SelectionOutcome::Picked { region, release } => (region, release),
            SelectionOutcome::Dismissed => {
                log::info!("selection dismissed");
                return CaptureResult::Failed {
                    reason: FailureReason::Dismissed,
                };
            }
        };

        // The surface is hidden by the time select() returns; wait out the
        // compositor before reading pixels or the capture shows the overlay.
        thread::sleep(self.config.settle_delay);

        let resolved = match resolve_window(&self.system, release) {
            Some(resolved) => resolved,
            None => {
                log::info!("no window under release point {:?}", release);
                return CaptureResult::Failed {
                    reason: FailureReason::NoWindowAtPoint,
                };
            }
        };

        log::debug!(
            "resolved {:?}: frame {:?}, content {:?}, fullscreen {}",
            resolved.window,
            resolved.frame,
            resolved.content,
            resolved.fullscreen
        );

        match capture_annotated(
            &self.system,
            resolved.capture_area(),
            region,
            resolved.reported_frame,
        ) {
            Ok(bitmap) => CaptureResult::Captured { bitmap },
            Err(e) => {
                log::warn!("capture failed: {}", e);
                CaptureResult::Failed {
                    reason: FailureReason::ScreenRead(e.to_string()),
                }
            }
        }
    }
}
