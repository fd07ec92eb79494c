//! Hidden shell window: hotkey, tray icon and message dispatch.

use crate::state::StateMachine;
use crate::tray::{SystemTray, ID_TRAY_EXIT, ID_TRAY_SNIP, WM_TRAYICON};
use crate::WorkerCommand;
use crossbeam_channel::Sender;
use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use std::cell::RefCell;
use std::sync::Arc;
use windows::core::{w, PCWSTR};
use windows::Win32::Foundation::{HINSTANCE, HWND, LPARAM, LRESULT, WPARAM};
use windows::Win32::System::LibraryLoader::GetModuleHandleW;
use windows::Win32::UI::Input::KeyboardAndMouse::{RegisterHotKey, UnregisterHotKey, MOD_CONTROL};
use windows::Win32::UI::WindowsAndMessaging::{
    CreateWindowExW, DefWindowProcW, DestroyWindow, DispatchMessageW, GetMessageW, PostMessageW,
    PostQuitMessage, RegisterClassExW, TranslateMessage, HMENU, MSG, WINDOW_EX_STYLE,
    WM_COMMAND, WM_DESTROY, WM_HOTKEY, WM_LBUTTONDBLCLK, WM_RBUTTONUP, WM_USER, WNDCLASSEXW,
    WS_OVERLAPPED,
};

/// Custom messages
pub const WM_APP_CAPTURE_DONE: u32 = WM_USER + 100;

/// Ctrl+D triggers a capture.
const HOTKEY_ID: i32 = 9000;
const VK_D: u32 = 0x44;

static SHELL_STATE: OnceCell<ShellState> = OnceCell::new();

thread_local! {
    static TRAY: RefCell<Option<SystemTray>> = RefCell::new(None);
}

struct ShellState {
    state_machine: Arc<Mutex<StateMachine>>,
    cmd_tx: Sender<WorkerCommand>,
}

fn isize_to_hwnd(val: isize) -> HWND {
    HWND(val as *mut std::ffi::c_void)
}

/// Invisible window owning the global hotkey and the tray icon.
pub struct Shell {
    hwnd: HWND,
}

impl Shell {
    const CLASS_NAME: PCWSTR = w!("TinySnipShell");

    /// Create the shell window, tray icon and hotkey registration.
    pub fn create(
        state_machine: Arc<Mutex<StateMachine>>,
        cmd_tx: Sender<WorkerCommand>,
    ) -> windows::core::Result<Self> {
        let _ = SHELL_STATE.set(ShellState {
            state_machine,
            cmd_tx,
        });

        unsafe {
            let hmodule = GetModuleHandleW(None)?;
            let hinstance = HINSTANCE(hmodule.0);

            let wc = WNDCLASSEXW {
                cbSize: std::mem::size_of::<WNDCLASSEXW>() as u32,
                lpfnWndProc: Some(Self::wnd_proc),
                hInstance: hinstance,
                lpszClassName: Self::CLASS_NAME,
                ..Default::default()
            };

            RegisterClassExW(&wc);

            // Never shown; it only receives hotkey, tray and worker messages.
            let hwnd = CreateWindowExW(
                WINDOW_EX_STYLE::default(),
                Self::CLASS_NAME,
                w!("TinySnip"),
                WS_OVERLAPPED,
                0,
                0,
                0,
                0,
                HWND::default(),
                HMENU::default(),
                hinstance,
                None,
            )?;

            RegisterHotKey(hwnd, HOTKEY_ID, MOD_CONTROL, VK_D)?;
            log::info!("registered Ctrl+D capture hotkey");

            TRAY.with(|tray| {
                let mut tray = tray.borrow_mut();
                let mut new_tray = SystemTray::new(hwnd);
                let _ = new_tray.show();
                *tray = Some(new_tray);
            });

            Ok(Self { hwnd })
        }
    }

    /// Window handle as isize for cross-thread posting.
    pub fn hwnd_raw(&self) -> isize {
        self.hwnd.0 as isize
    }

    /// Run message loop
    pub fn run_message_loop() -> i32 {
        unsafe {
            let mut msg = MSG::default();
            while GetMessageW(&mut msg, None, 0, 0).into() {
                let _ = TranslateMessage(&msg);
                DispatchMessageW(&msg);
            }
            msg.wParam.0 as i32
        }
    }

    unsafe extern "system" fn wnd_proc(
        hwnd: HWND,
        msg: u32,
        wparam: WPARAM,
        lparam: LPARAM,
    ) -> LRESULT {
        match msg {
            WM_HOTKEY => {
                if wparam.0 as i32 == HOTKEY_ID {
                    Self::on_snip_trigger();
                }
                LRESULT(0)
            }

            WM_COMMAND => {
                match wparam.0 as u32 {
                    ID_TRAY_SNIP => Self::on_snip_trigger(),
                    ID_TRAY_EXIT => {
                        let _ = DestroyWindow(hwnd);
                    }
                    _ => {}
                }
                LRESULT(0)
            }

            WM_TRAYICON => {
                let event = (lparam.0 & 0xFFFF) as u32;
                if event == WM_RBUTTONUP {
                    let can_snip = SHELL_STATE
                        .get()
                        .map(|shell| shell.state_machine.lock().state().can_capture())
                        .unwrap_or(false);
                    TRAY.with(|tray| {
                        if let Some(ref tray) = *tray.borrow() {
                            let _ = tray.show_context_menu(can_snip);
                        }
                    });
                } else if event == WM_LBUTTONDBLCLK {
                    Self::on_snip_trigger();
                }
                LRESULT(0)
            }

            WM_APP_CAPTURE_DONE => {
                Self::on_capture_done(wparam.0 != 0);
                LRESULT(0)
            }

            WM_DESTROY => {
                let _ = UnregisterHotKey(hwnd, HOTKEY_ID);
                TRAY.with(|tray| {
                    *tray.borrow_mut() = None;
                });
                PostQuitMessage(0);
                LRESULT(0)
            }

            _ => DefWindowProcW(hwnd, msg, wparam, lparam),
        }
    }

    fn on_snip_trigger() {
        let shell = match SHELL_STATE.get() {
            Some(shell) => shell,
            None => return,
        };

        if !shell.state_machine.lock().start_capture() {
            log::debug!("capture already in flight, trigger ignored");
            return;
        }

        Self::update_tooltip();

        if shell.cmd_tx.send(WorkerCommand::Snip).is_err() {
            log::error!("capture worker is gone");
            shell.state_machine.lock().finish_capture();
            Self::update_tooltip();
        }
    }

    fn on_capture_done(saved: bool) {
        log::debug!("capture session finished, saved: {}", saved);
        Self::update_tooltip();
    }

    fn update_tooltip() {
        let shell = match SHELL_STATE.get() {
            Some(shell) => shell,
            None => return,
        };

        let text = format!(
            "TinySnip - {}",
            shell.state_machine.lock().state().display_text()
        );
        TRAY.with(|tray| {
            if let Some(ref mut tray) = *tray.borrow_mut() {
                let _ = tray.set_tooltip(&text);
            }
        });
    }
}

/// Posted by the result handler once a session's output is dealt with.
pub fn post_capture_done(hwnd_raw: isize, saved: bool) {
    unsafe {
        let _ = PostMessageW(
            isize_to_hwnd(hwnd_raw),
            WM_APP_CAPTURE_DONE,
            WPARAM(saved as usize),
            LPARAM(0),
        );
    }
}
