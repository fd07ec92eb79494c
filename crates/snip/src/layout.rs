//! Virtual desktop layout
//!
//! The selection overlay has to span every monitor, including ones placed
//! left of or above the primary, so the combined bounds can start at
//! negative coordinates.

use crate::geometry::{MonitorInfo, Rect};

/// Smallest rectangle containing every monitor.
///
/// An empty monitor list yields an empty rectangle; callers treat that as
/// "no display to cover".
pub fn virtual_desktop_bounds(monitors: &[MonitorInfo]) -> Rect {
    let mut iter = monitors.iter();

    let first = match iter.next() {
        Some(m) => m.bounds,
        None => return Rect::default(),
    };

    iter.fold(first, |acc, m| acc.union(&m.bounds))
}
