//! Selection overlay for TinySnip
//!
//! A topmost translucent window covering the whole virtual desktop. The
//! user drags out a region (or clicks); the overlay hides itself and
//! reports the outcome through the core [`SelectionSurface`] trait.
//!
//! [`SelectionSurface`]: snip::SelectionSurface

mod paint;
mod window;

pub use window::OverlaySurface;
