//! TinySnip - hotkey-driven window snipping tool

#![windows_subsystem = "windows"]

mod shell;
mod state;
mod tray;

use crate::shell::{post_capture_done, Shell};
use crate::state::StateMachine;
use capture_gdi::GdiWindowSystem;
use crossbeam_channel::{bounded, Receiver, Sender};
use overlay::OverlaySurface;
use parking_lot::Mutex;
use snip::{CaptureResult, CaptureSession};
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use windows::Win32::UI::HiDpi::{
    SetProcessDpiAwarenessContext, DPI_AWARENESS_CONTEXT_PER_MONITOR_AWARE_V2,
};

/// Capture worker commands
pub enum WorkerCommand {
    /// Run one selection-to-capture session.
    Snip,
    Shutdown,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    // Rectangles must be physical pixels on every monitor or the capture
    // reads from the wrong place on scaled displays.
    unsafe {
        let _ = SetProcessDpiAwarenessContext(DPI_AWARENESS_CONTEXT_PER_MONITOR_AWARE_V2);
    }

    let state = Arc::new(Mutex::new(StateMachine::new()));

    let (cmd_tx, cmd_rx): (Sender<WorkerCommand>, Receiver<WorkerCommand>) = bounded(4);
    let (result_tx, result_rx): (Sender<CaptureResult>, Receiver<CaptureResult>) = bounded(4);

    let worker_handle = thread::spawn(move || {
        capture_worker(cmd_rx, result_tx);
    });

    let shell = Shell::create(state.clone(), cmd_tx.clone())?;
    let hwnd_raw = shell.hwnd_raw();

    let handler_state = state.clone();
    let handler_handle = thread::spawn(move || {
        result_handler(hwnd_raw, handler_state, result_rx);
    });

    let exit_code = Shell::run_message_loop();
    log::debug!("message loop exited with code {}", exit_code);

    // Closing the command channel stops the worker; the worker dropping its
    // result sender stops the handler.
    let _ = cmd_tx.send(WorkerCommand::Shutdown);
    drop(cmd_tx);
    let _ = worker_handle.join();
    let _ = handler_handle.join();

    Ok(())
}

/// Runs capture sessions off the UI thread, one at a time.
fn capture_worker(cmd_rx: Receiver<WorkerCommand>, result_tx: Sender<CaptureResult>) {
    loop {
        match cmd_rx.recv() {
            Ok(WorkerCommand::Snip) => {
                log::info!("capture session starting");
                let session = CaptureSession::new(GdiWindowSystem::new(), OverlaySurface::new());
                let result = session.run();

                if result_tx.send(result).is_err() {
                    break;
                }
            }
            Ok(WorkerCommand::Shutdown) | Err(_) => break,
        }
    }
}

/// Delivers finished captures: PNG next to the executable, DIB on the
/// clipboard, then tells the shell the session is over.
fn result_handler(
    hwnd_raw: isize,
    state: Arc<Mutex<StateMachine>>,
    result_rx: Receiver<CaptureResult>,
) {
    loop {
        match result_rx.recv() {
            Ok(CaptureResult::Captured { bitmap }) => {
                let path = PathBuf::from(format!("capture_{}.png", uuid::Uuid::new_v4()));

                match export::save_png(&bitmap, &path) {
                    Ok(()) => log::info!("saved capture to {}", path.display()),
                    Err(e) => log::error!("PNG save failed: {}", e),
                }

                if let Err(e) = export::copy_to_clipboard(&bitmap) {
                    log::error!("clipboard copy failed: {}", e);
                }

                state.lock().finish_capture();
                post_capture_done(hwnd_raw, true);
            }
            Ok(CaptureResult::Failed { reason }) => {
                log::info!("capture ended without a bitmap: {:?}", reason);
                state.lock().finish_capture();
                post_capture_done(hwnd_raw, false);
            }
            Err(_) => break,
        }
    }
}
