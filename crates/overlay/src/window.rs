//! Overlay window implementation

use crate::paint::paint_overlay;
use snip::{
    Point, Rect, SelectionOutcome, SelectionSurface, SelectionTracker, SnipError, SnipResult,
};
use std::cell::RefCell;
use std::sync::Once;
use windows::core::{w, PCWSTR};
use windows::Win32::Foundation::{COLORREF, HINSTANCE, HWND, LPARAM, LRESULT, WPARAM};
use windows::Win32::Graphics::Gdi::{InvalidateRect, UpdateWindow};
use windows::Win32::System::LibraryLoader::GetModuleHandleW;
use windows::Win32::UI::WindowsAndMessaging::{
    CreateWindowExW, DefWindowProcW, DestroyWindow, DispatchMessageW, GetMessageW, LoadCursorW,
    RegisterClassExW, SetForegroundWindow, SetLayeredWindowAttributes, ShowWindow,
    TranslateMessage, CS_HREDRAW, CS_VREDRAW, IDC_CROSS, LWA_ALPHA, MSG, SW_HIDE, SW_SHOW,
    WM_CLOSE, WM_DESTROY, WM_KEYDOWN, WM_LBUTTONDOWN, WM_LBUTTONUP, WM_MOUSEMOVE, WM_PAINT,
    WNDCLASSEXW, WS_EX_LAYERED, WS_EX_TOOLWINDOW, WS_EX_TOPMOST, WS_POPUP,
};

thread_local! {
    static OVERLAY_STATE: RefCell<Option<Box<OverlayState>>> = RefCell::new(None);
}

struct OverlayState {
    tracker: SelectionTracker,
    /// Virtual desktop rectangle the window covers; its top-left is the
    /// local-to-screen offset.
    bounds: Rect,
    outcome: Option<SelectionOutcome>,
}

const CLASS_NAME: PCWSTR = w!("TinySnipOverlay");
/// Whole-window alpha of the dim layer.
const OVERLAY_ALPHA: u8 = 80;

static REGISTER: Once = Once::new();

/// Win32 implementation of the core selection surface.
///
/// One selection at a time per thread; the window state lives in a
/// thread-local for the duration of [`select`].
///
/// [`select`]: snip::SelectionSurface::select
#[derive(Debug, Default)]
pub struct OverlaySurface;

impl OverlaySurface {
    pub fn new() -> Self {
        Self
    }
}

impl SelectionSurface for OverlaySurface {
    fn select(&mut self, bounds: Rect) -> SnipResult<SelectionOutcome> {
        run_overlay(bounds)
    }
}

fn win_err(e: windows::core::Error) -> SnipError {
    SnipError::Surface(e.to_string())
}

fn ensure_class_registered() -> SnipResult<()> {
    let mut result = Ok(());

    REGISTER.call_once(|| {
        result = register_class();
    });

    result
}

fn register_class() -> SnipResult<()> {
    unsafe {
        let hmodule = GetModuleHandleW(None).map_err(win_err)?;
        let hinstance = HINSTANCE(hmodule.0);

        let wc = WNDCLASSEXW {
            cbSize: std::mem::size_of::<WNDCLASSEXW>() as u32,
            style: CS_HREDRAW | CS_VREDRAW,
            lpfnWndProc: Some(wnd_proc),
            hInstance: hinstance,
            hCursor: LoadCursorW(None, IDC_CROSS).map_err(win_err)?,
            lpszClassName: CLASS_NAME,
            ..Default::default()
        };

        RegisterClassExW(&wc);
    }

    Ok(())
}

fn run_overlay(bounds: Rect) -> SnipResult<SelectionOutcome> {
    if bounds.is_empty() {
        return Err(SnipError::Surface("virtual desktop bounds are empty".into()));
    }

    log::debug!("showing selection overlay over {:?}", bounds);
    ensure_class_registered()?;

    unsafe {
        let hmodule = GetModuleHandleW(None).map_err(win_err)?;
        let hinstance = HINSTANCE(hmodule.0);

        OVERLAY_STATE.with(|s| {
            *s.borrow_mut() = Some(Box::new(OverlayState {
                tracker: SelectionTracker::new(),
                bounds,
                outcome: None,
            }));
        });

        let hwnd = match CreateWindowExW(
            WS_EX_TOPMOST | WS_EX_TOOLWINDOW | WS_EX_LAYERED,
            CLASS_NAME,
            w!("TinySnip Selection"),
            WS_POPUP,
            bounds.left,
            bounds.top,
            bounds.width(),
            bounds.height(),
            None,
            None,
            hinstance,
            None,
        ) {
            Ok(hwnd) => hwnd,
            Err(e) => {
                OVERLAY_STATE.with(|s| {
                    *s.borrow_mut() = None;
                });
                return Err(win_err(e));
            }
        };

        let _ = SetLayeredWindowAttributes(hwnd, COLORREF(0), OVERLAY_ALPHA, LWA_ALPHA);

        ShowWindow(hwnd, SW_SHOW);
        let _ = UpdateWindow(hwnd);
        // Popup windows don't always take focus on show; Escape needs it.
        let _ = SetForegroundWindow(hwnd);

        let mut msg = MSG::default();
        loop {
            let ret = GetMessageW(&mut msg, None, 0, 0);
            if !ret.as_bool() {
                break;
            }
            TranslateMessage(&msg);
            DispatchMessageW(&msg);

            let has_outcome = OVERLAY_STATE.with(|s| {
                s.borrow()
                    .as_ref()
                    .map(|state| state.outcome.is_some())
                    .unwrap_or(false)
            });
            if has_outcome {
                break;
            }
        }

        let outcome = OVERLAY_STATE.with(|s| s.borrow().as_ref().and_then(|state| state.outcome));

        let _ = DestroyWindow(hwnd);
        OVERLAY_STATE.with(|s| {
            *s.borrow_mut() = None;
        });

        outcome.ok_or_else(|| SnipError::Surface("overlay closed without an outcome".into()))
    }
}

unsafe extern "system" fn wnd_proc(hwnd: HWND, msg: u32, wparam: WPARAM, lparam: LPARAM) -> LRESULT {
    match msg {
        WM_PAINT => {
            OVERLAY_STATE.with(|s| {
                if let Some(ref state) = *s.borrow() {
                    paint_overlay(hwnd, state.bounds, &state.tracker);
                }
            });
            LRESULT(0)
        }

        WM_LBUTTONDOWN => {
            handle_mouse_down(lparam);
            LRESULT(0)
        }

        WM_MOUSEMOVE => {
            handle_mouse_move(hwnd, lparam);
            LRESULT(0)
        }

        WM_LBUTTONUP => {
            handle_mouse_up(hwnd, lparam);
            LRESULT(0)
        }

        WM_KEYDOWN => {
            handle_key_down(hwnd, wparam);
            LRESULT(0)
        }

        WM_CLOSE => {
            OVERLAY_STATE.with(|s| {
                if let Some(ref mut state) = *s.borrow_mut() {
                    if state.outcome.is_none() {
                        ShowWindow(hwnd, SW_HIDE);
                        state.outcome = Some(SelectionOutcome::Dismissed);
                    }
                }
            });
            let _ = DestroyWindow(hwnd);
            LRESULT(0)
        }

        WM_DESTROY => LRESULT(0),

        _ => DefWindowProcW(hwnd, msg, wparam, lparam),
    }
}

/// Pointer position from a mouse message, lifted to screen coordinates.
fn point_from_lparam(bounds: Rect, lparam: LPARAM) -> Point {
    let x = (lparam.0 & 0xFFFF) as i16 as i32;
    let y = ((lparam.0 >> 16) & 0xFFFF) as i16 as i32;

    Point::new(x + bounds.left, y + bounds.top)
}

unsafe fn handle_mouse_down(lparam: LPARAM) {
    OVERLAY_STATE.with(|s| {
        if let Some(ref mut state) = *s.borrow_mut() {
            let p = point_from_lparam(state.bounds, lparam);
            state.tracker.press(p);
        }
    });
}

unsafe fn handle_mouse_move(hwnd: HWND, lparam: LPARAM) {
    let updated = OVERLAY_STATE.with(|s| {
        if let Some(ref mut state) = *s.borrow_mut() {
            let p = point_from_lparam(state.bounds, lparam);
            state.tracker.drag(p).is_some()
        } else {
            false
        }
    });

    if updated {
        let _ = InvalidateRect(hwnd, None, false);
    }
}

unsafe fn handle_mouse_up(hwnd: HWND, lparam: LPARAM) {
    OVERLAY_STATE.with(|s| {
        if let Some(ref mut state) = *s.borrow_mut() {
            let p = point_from_lparam(state.bounds, lparam);
            if let Some((region, release)) = state.tracker.release(p) {
                // Hide before reporting so the capture cannot photograph
                // the overlay.
                ShowWindow(hwnd, SW_HIDE);
                state.outcome = Some(SelectionOutcome::Picked { region, release });
            }
        }
    });
}

unsafe fn handle_key_down(hwnd: HWND, wparam: WPARAM) {
    const VK_ESCAPE: usize = 0x1B;

    if wparam.0 == VK_ESCAPE {
        OVERLAY_STATE.with(|s| {
            if let Some(ref mut state) = *s.borrow_mut() {
                ShowWindow(hwnd, SW_HIDE);
                state.outcome = Some(SelectionOutcome::Dismissed);
            }
        });
    }
}
