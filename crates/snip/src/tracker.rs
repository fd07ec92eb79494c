//! Drag-gesture tracking for the selection overlay.

use crate::geometry::{Point, Rect};

/// One-shot press/drag/release tracker.
///
/// Feeds on pointer events in screen coordinates and keeps the current
/// normalized selection rectangle. A release returns the last rectangle
/// computed during the drag together with the raw release point; moving
/// back past the origin simply inverts the rectangle.
#[derive(Debug, Default)]
pub struct SelectionTracker {
    origin: Point,
    dragging: bool,
    selection: Rect,
}

impl SelectionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a drag. Ignored while one is already in progress.
    pub fn press(&mut self, p: Point) {
        if self.dragging {
            return;
        }

        self.origin = p;
        self.dragging = true;
        self.selection = Rect::from_points(p, p);
    }

    /// Update the selection for a pointer move. Returns the new rectangle
    /// while dragging, `None` otherwise.
    pub fn drag(&mut self, p: Point) -> Option<Rect> {
        if !self.dragging {
            return None;
        }

        self.selection = Rect::from_points(self.origin, p);
        Some(self.selection)
    }

    /// Finish the drag. Returns the selection as last computed by [`drag`]
    /// (not recomputed from `p`) plus the raw release point, or `None` when
    /// no drag was in progress.
    ///
    /// [`drag`]: SelectionTracker::drag
    pub fn release(&mut self, p: Point) -> Option<(Rect, Point)> {
        if !self.dragging {
            return None;
        }

        self.dragging = false;
        Some((self.selection, p))
    }

    pub fn selection(&self) -> Rect {
        self.selection
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drag_down_right_builds_rect() {
        let mut tracker = SelectionTracker::new();
        tracker.press(Point::new(50, 50));
        assert!(tracker.is_dragging());

        let rect = tracker.drag(Point::new(250, 150));
        assert_eq!(rect, Some(Rect::new(50, 50, 250, 150)));

        let (region, release) = tracker.release(Point::new(250, 150)).unwrap();
        assert_eq!(region, Rect::new(50, 50, 250, 150));
        assert_eq!(release, Point::new(250, 150));
        assert!(!tracker.is_dragging());
    }

    #[test]
    fn drag_up_left_inverts_rect() {
        let mut tracker = SelectionTracker::new();
        tracker.press(Point::new(250, 150));
        tracker.drag(Point::new(50, 50));

        let (region, _) = tracker.release(Point::new(50, 50)).unwrap();
        assert_eq!(region, Rect::new(50, 50, 250, 150));
    }

    #[test]
    fn click_without_move_is_zero_area() {
        let mut tracker = SelectionTracker::new();
        tracker.press(Point::new(500, 500));

        let (region, release) = tracker.release(Point::new(500, 500)).unwrap();
        assert!(region.is_empty());
        assert_eq!(region.top_left(), Point::new(500, 500));
        assert_eq!(release, Point::new(500, 500));
    }

    #[test]
    fn release_reports_last_computed_rect_not_release_point() {
        let mut tracker = SelectionTracker::new();
        tracker.press(Point::new(0, 0));
        tracker.drag(Point::new(100, 100));

        // Pointer jumps between the last move and the release.
        let (region, release) = tracker.release(Point::new(300, 300)).unwrap();
        assert_eq!(region, Rect::new(0, 0, 100, 100));
        assert_eq!(release, Point::new(300, 300));
    }

    #[test]
    fn moves_before_press_are_ignored() {
        let mut tracker = SelectionTracker::new();
        assert_eq!(tracker.drag(Point::new(10, 10)), None);
        assert_eq!(tracker.release(Point::new(10, 10)), None);
        assert!(tracker.selection().is_empty());
    }

    #[test]
    fn release_without_drag_is_none_after_finish() {
        let mut tracker = SelectionTracker::new();
        tracker.press(Point::new(0, 0));
        tracker.release(Point::new(10, 10)).unwrap();

        assert_eq!(tracker.release(Point::new(20, 20)), None);
        assert_eq!(tracker.drag(Point::new(20, 20)), None);
    }

    #[test]
    fn press_during_drag_keeps_origin() {
        let mut tracker = SelectionTracker::new();
        tracker.press(Point::new(0, 0));
        tracker.press(Point::new(40, 40));

        let rect = tracker.drag(Point::new(10, 10));
        assert_eq!(rect, Some(Rect::new(0, 0, 10, 10)));
    }
}
