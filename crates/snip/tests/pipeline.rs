//! End-to-end pipeline tests over scripted platform doubles.

use image::{Rgba, RgbaImage};
use snip::compositor::OUTLINE_COLOR;
use snip::{
    resolve_window, CaptureResult, CaptureSession, FailureReason, MonitorInfo, Point, Rect,
    SelectionOutcome, SelectionSurface, SessionConfig, SnipError, SnipResult, WindowSystem,
};
use std::cell::Cell;
use std::time::Duration;

const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

struct FakeWindow {
    id: u32,
    frame: Rect,
    /// Client rectangle in window-local coordinates.
    client: Option<Rect>,
    /// Offset applied by client-to-screen translation; `None` makes the
    /// translation fail.
    client_offset: Option<(i32, i32)>,
}

struct FakeDesktop {
    monitors: Vec<MonitorInfo>,
    windows: Vec<FakeWindow>,
    reads: Cell<usize>,
    deny_reads: bool,
}

impl FakeDesktop {
    fn new(monitors: Vec<Rect>, windows: Vec<FakeWindow>) -> Self {
        Self {
            monitors: monitors
                .into_iter()
                .map(|bounds| MonitorInfo { bounds, work_area: bounds })
                .collect(),
            windows,
            reads: Cell::new(0),
            deny_reads: false,
        }
    }

    fn find(&self, id: u32) -> Option<&FakeWindow> {
        self.windows.iter().find(|w| w.id == id)
    }
}

impl WindowSystem for &FakeDesktop {
    type Window = u32;

    fn monitors(&self) -> Vec<MonitorInfo> {
        self.monitors.clone()
    }

    fn window_at(&self, point: Point) -> Option<u32> {
        self.windows
            .iter()
            .find(|w| w.frame.contains(point))
            .map(|w| w.id)
    }

    fn window_rect(&self, window: u32) -> Option<Rect> {
        self.find(window).map(|w| w.frame)
    }

    fn client_rect(&self, window: u32) -> Option<Rect> {
        self.find(window).and_then(|w| w.client)
    }

    fn client_to_screen(&self, window: u32, point: Point) -> Option<Point> {
        let (dx, dy) = self.find(window)?.client_offset?;
        Some(Point::new(point.x + dx, point.y + dy))
    }

    fn monitor_near(&self, window: u32) -> Option<MonitorInfo> {
        let frame = self.find(window)?.frame;
        self.monitors
            .iter()
            .find(|m| m.bounds.intersection(&frame).is_some())
            .or_else(|| self.monitors.first())
            .copied()
    }

    fn read_screen(&self, area: Rect) -> SnipResult<RgbaImage> {
        if self.deny_reads {
            return Err(SnipError::ScreenRead("access denied".into()));
        }
        if area.is_empty() {
            return Err(SnipError::ScreenRead(format!(
                "invalid capture area {}x{}",
                area.width(),
                area.height()
            )));
        }

        self.reads.set(self.reads.get() + 1);
        Ok(RgbaImage::from_pixel(
            area.width() as u32,
            area.height() as u32,
            WHITE,
        ))
    }
}

struct ScriptedSurface {
    outcome: Option<SnipResult<SelectionOutcome>>,
    seen_bounds: Option<Rect>,
}

impl ScriptedSurface {
    fn new(outcome: SnipResult<SelectionOutcome>) -> Self {
        Self {
            outcome: Some(outcome),
            seen_bounds: None,
        }
    }

    fn picked(region: Rect, release: Point) -> Self {
        Self::new(Ok(SelectionOutcome::Picked { region, release }))
    }

    fn dismissed() -> Self {
        Self::new(Ok(SelectionOutcome::Dismissed))
    }
}

impl SelectionSurface for &mut ScriptedSurface {
    fn select(&mut self, bounds: Rect) -> SnipResult<SelectionOutcome> {
        self.seen_bounds = Some(bounds);
        self.outcome.take().expect("select called twice")
    }
}

fn run_session(desktop: &FakeDesktop, surface: &mut ScriptedSurface) -> CaptureResult {
    let config = SessionConfig {
        settle_delay: Duration::ZERO,
    };
    CaptureSession::with_config(desktop, surface, config).run()
}

fn count_outline_pixels(bitmap: &RgbaImage) -> usize {
    bitmap.pixels().filter(|&&p| p == OUTLINE_COLOR).count()
}

/// Window frame (100,100)-(900,700) whose client area translates to
/// (108,130)-(892,693): a 784x563 content region behind an 8px border
/// and a 30px caption.
fn bordered_window(id: u32) -> FakeWindow {
    FakeWindow {
        id,
        frame: Rect::new(100, 100, 900, 700),
        client: Some(Rect::new(0, 0, 784, 563)),
        client_offset: Some((108, 130)),
    }
}

#[test]
fn resolver_translates_client_rect() {
    let desktop = FakeDesktop::new(vec![Rect::new(0, 0, 1920, 1080)], vec![bordered_window(1)]);

    let resolved = resolve_window(&&desktop, Point::new(500, 500)).unwrap();

    assert_eq!(resolved.window, 1);
    assert_eq!(resolved.reported_frame, Rect::new(100, 100, 900, 700));
    assert_eq!(resolved.content, Rect::new(108, 130, 892, 693));
    assert!(!resolved.fullscreen);
    assert_eq!(resolved.frame, resolved.reported_frame);

    let area = resolved.capture_area();
    assert_eq!(area.top_left(), Point::new(100, 100));
    assert_eq!(area.width(), 784);
    assert_eq!(area.height(), 563);
}

#[test]
fn resolver_falls_back_when_translation_fails() {
    let desktop = FakeDesktop::new(
        vec![Rect::new(0, 0, 1920, 1080)],
        vec![FakeWindow {
            id: 7,
            frame: Rect::new(100, 100, 900, 700),
            client: Some(Rect::new(0, 0, 784, 563)),
            client_offset: None,
        }],
    );

    let resolved = resolve_window(&&desktop, Point::new(500, 500)).unwrap();

    assert_eq!(resolved.content, resolved.reported_frame);
    assert_eq!(resolved.capture_area(), Rect::new(100, 100, 900, 700));
}

#[test]
fn resolver_is_idempotent() {
    let desktop = FakeDesktop::new(vec![Rect::new(0, 0, 1920, 1080)], vec![bordered_window(1)]);

    let first = resolve_window(&&desktop, Point::new(500, 500)).unwrap();
    let second = resolve_window(&&desktop, Point::new(500, 500)).unwrap();

    assert_eq!(first, second);
}

#[test]
fn resolver_substitutes_monitor_bounds_for_fullscreen() {
    // Maximized-style frame overhanging the monitor on every side.
    let desktop = FakeDesktop::new(
        vec![Rect::new(0, 0, 1920, 1080)],
        vec![FakeWindow {
            id: 2,
            frame: Rect::new(-8, -8, 1928, 1088),
            client: Some(Rect::new(0, 0, 1920, 1080)),
            client_offset: Some((0, 0)),
        }],
    );

    let resolved = resolve_window(&&desktop, Point::new(960, 540)).unwrap();

    assert!(resolved.fullscreen);
    assert_eq!(resolved.frame, Rect::new(0, 0, 1920, 1080));
    assert_eq!(resolved.reported_frame, Rect::new(-8, -8, 1928, 1088));
    // The substitution is bookkeeping only: the capture still starts at the
    // reported origin.
    assert_eq!(resolved.capture_area().top_left(), Point::new(-8, -8));
}

#[test]
fn resolver_rejects_near_fullscreen_frame() {
    let desktop = FakeDesktop::new(
        vec![Rect::new(0, 0, 1920, 1080)],
        vec![FakeWindow {
            id: 3,
            frame: Rect::new(0, 0, 1918, 1078),
            client: Some(Rect::new(0, 0, 1918, 1078)),
            client_offset: Some((0, 0)),
        }],
    );

    let resolved = resolve_window(&&desktop, Point::new(500, 500)).unwrap();

    assert!(!resolved.fullscreen);
    assert_eq!(resolved.frame, Rect::new(0, 0, 1918, 1078));
}

#[test]
fn resolver_handles_fullscreen_on_second_monitor() {
    let desktop = FakeDesktop::new(
        vec![Rect::new(0, 0, 1920, 1080), Rect::new(1920, 0, 3840, 1080)],
        vec![FakeWindow {
            id: 4,
            frame: Rect::new(1920, 0, 3840, 1080),
            client: Some(Rect::new(0, 0, 1920, 1080)),
            client_offset: Some((1920, 0)),
        }],
    );

    let resolved = resolve_window(&&desktop, Point::new(2500, 540)).unwrap();

    assert!(resolved.fullscreen);
    assert_eq!(resolved.frame, Rect::new(1920, 0, 3840, 1080));
}

#[test]
fn resolver_finds_nothing_on_bare_desktop() {
    let desktop = FakeDesktop::new(vec![Rect::new(0, 0, 1920, 1080)], vec![]);

    assert!(resolve_window(&&desktop, Point::new(500, 500)).is_none());
}

#[test]
fn session_captures_clicked_window() {
    let desktop = FakeDesktop::new(vec![Rect::new(0, 0, 1920, 1080)], vec![bordered_window(1)]);
    let click = Point::new(500, 500);
    let mut surface = ScriptedSurface::picked(Rect::from_points(click, click), click);

    let result = run_session(&desktop, &mut surface);

    assert!(result.succeeded());
    let bitmap = result.into_bitmap().unwrap();
    assert_eq!(bitmap.width(), 784);
    assert_eq!(bitmap.height(), 563);
    // A zero-area click leaves the capture clean.
    assert_eq!(count_outline_pixels(&bitmap), 0);
    assert_eq!(desktop.reads.get(), 1);
    assert_eq!(surface.seen_bounds, Some(Rect::new(0, 0, 1920, 1080)));
}

#[test]
fn session_draws_outline_for_dragged_region() {
    let desktop = FakeDesktop::new(
        vec![Rect::new(0, 0, 1920, 1080)],
        vec![FakeWindow {
            id: 5,
            frame: Rect::new(0, 0, 400, 300),
            client: Some(Rect::new(0, 0, 400, 300)),
            client_offset: Some((0, 0)),
        }],
    );
    let region = Rect::from_points(Point::new(50, 50), Point::new(250, 150));
    let mut surface = ScriptedSurface::picked(region, Point::new(250, 150));

    let result = run_session(&desktop, &mut surface);

    let bitmap = result.into_bitmap().unwrap();
    assert_eq!(bitmap.width(), 400);
    assert_eq!(bitmap.height(), 300);

    // Outline at window-local (50,50), 200x100, two pixels thick.
    assert_eq!(*bitmap.get_pixel(50, 50), OUTLINE_COLOR);
    assert_eq!(*bitmap.get_pixel(249, 149), OUTLINE_COLOR);
    assert_eq!(*bitmap.get_pixel(53, 53), WHITE);
    assert_eq!(*bitmap.get_pixel(150, 100), WHITE);
}

#[test]
fn session_places_outline_against_reported_frame() {
    // Fullscreen window: the frame is corrected to the monitor bounds but
    // annotations stay aligned with the reported frame the pixels were
    // read against.
    let desktop = FakeDesktop::new(
        vec![Rect::new(0, 0, 1920, 1080)],
        vec![FakeWindow {
            id: 6,
            frame: Rect::new(-8, -8, 1928, 1088),
            client: Some(Rect::new(0, 0, 1920, 1080)),
            client_offset: Some((0, 0)),
        }],
    );
    let region = Rect::from_points(Point::new(100, 100), Point::new(300, 200));
    let mut surface = ScriptedSurface::picked(region, Point::new(300, 200));

    let result = run_session(&desktop, &mut surface);

    let bitmap = result.into_bitmap().unwrap();
    assert_eq!(*bitmap.get_pixel(108, 108), OUTLINE_COLOR);
    assert_eq!(*bitmap.get_pixel(100, 100), WHITE);
}

#[test]
fn session_dismissed_reads_nothing() {
    let desktop = FakeDesktop::new(vec![Rect::new(0, 0, 1920, 1080)], vec![bordered_window(1)]);
    let mut surface = ScriptedSurface::dismissed();

    let result = run_session(&desktop, &mut surface);

    assert!(!result.succeeded());
    match &result {
        CaptureResult::Failed { reason } => assert_eq!(*reason, FailureReason::Dismissed),
        CaptureResult::Captured { .. } => panic!("dismissal must not capture"),
    }
    assert_eq!(desktop.reads.get(), 0);
    assert!(result.into_bitmap().is_none());
}

#[test]
fn session_fails_when_release_hits_nothing() {
    let desktop = FakeDesktop::new(vec![Rect::new(0, 0, 1920, 1080)], vec![bordered_window(1)]);
    let release = Point::new(1500, 900);
    let mut surface = ScriptedSurface::picked(Rect::from_points(release, release), release);

    let result = run_session(&desktop, &mut surface);

    match result {
        CaptureResult::Failed { reason } => assert_eq!(reason, FailureReason::NoWindowAtPoint),
        CaptureResult::Captured { .. } => panic!("no window should resolve at 1500,900"),
    }
    assert_eq!(desktop.reads.get(), 0);
}

#[test]
fn session_reports_denied_screen_read() {
    let mut desktop =
        FakeDesktop::new(vec![Rect::new(0, 0, 1920, 1080)], vec![bordered_window(1)]);
    desktop.deny_reads = true;
    let click = Point::new(500, 500);
    let mut surface = ScriptedSurface::picked(Rect::from_points(click, click), click);

    let result = run_session(&desktop, &mut surface);

    match result {
        CaptureResult::Failed { reason } => {
            assert!(matches!(reason, FailureReason::ScreenRead(_)));
        }
        CaptureResult::Captured { .. } => panic!("denied read should fail the session"),
    }
}

#[test]
fn session_reports_surface_failure() {
    let desktop = FakeDesktop::new(vec![Rect::new(0, 0, 1920, 1080)], vec![bordered_window(1)]);
    let mut surface = ScriptedSurface::new(Err(SnipError::Surface("no overlay window".into())));

    let result = run_session(&desktop, &mut surface);

    match result {
        CaptureResult::Failed { reason } => {
            assert!(matches!(reason, FailureReason::Surface(_)));
        }
        CaptureResult::Captured { .. } => panic!("surface failure should fail the session"),
    }
    assert_eq!(desktop.reads.get(), 0);
}

#[test]
fn session_spans_all_monitors() {
    let desktop = FakeDesktop::new(
        vec![Rect::new(0, 0, 1920, 1080), Rect::new(1920, 0, 3840, 1080)],
        vec![],
    );
    let mut surface = ScriptedSurface::dismissed();

    run_session(&desktop, &mut surface);

    assert_eq!(surface.seen_bounds, Some(Rect::new(0, 0, 3840, 1080)));
}
