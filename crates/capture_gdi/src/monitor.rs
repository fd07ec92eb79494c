//! Monitor enumeration

use crate::rect_from_win32;
use snip::MonitorInfo;
use windows::Win32::Foundation::{BOOL, LPARAM, RECT};
use windows::Win32::Graphics::Gdi::{
    EnumDisplayMonitors, GetMonitorInfoW, MonitorFromWindow, HDC, HMONITOR, MONITORINFO,
    MONITOR_DEFAULTTONEAREST,
};

use crate::window::hwnd_from_raw;

/// Snapshot every connected monitor.
pub fn enumerate_monitors() -> Vec<MonitorInfo> {
    let mut monitors: Vec<MonitorInfo> = Vec::new();

    unsafe {
        let _ = EnumDisplayMonitors(
            HDC::default(),
            None,
            Some(enum_monitor_callback),
            LPARAM(&mut monitors as *mut Vec<MonitorInfo> as isize),
        );
    }

    log::debug!("enumerated {} monitor(s)", monitors.len());
    monitors
}

unsafe extern "system" fn enum_monitor_callback(
    hmonitor: HMONITOR,
    _hdc: HDC,
    _clip: *mut RECT,
    lparam: LPARAM,
) -> BOOL {
    let monitors = &mut *(lparam.0 as *mut Vec<MonitorInfo>);

    if let Some(info) = query_monitor(hmonitor) {
        monitors.push(info);
    }

    BOOL(1) // Continue enumeration
}

/// Monitor nearest to the window.
pub fn monitor_near_window(hwnd_raw: isize) -> Option<MonitorInfo> {
    unsafe {
        let hmonitor = MonitorFromWindow(hwnd_from_raw(hwnd_raw), MONITOR_DEFAULTTONEAREST);
        if hmonitor.is_invalid() {
            return None;
        }

        query_monitor(hmonitor)
    }
}

unsafe fn query_monitor(hmonitor: HMONITOR) -> Option<MonitorInfo> {
    let mut info = MONITORINFO {
        cbSize: std::mem::size_of::<MONITORINFO>() as u32,
        ..Default::default()
    };

    if !GetMonitorInfoW(hmonitor, &mut info).as_bool() {
        return None;
    }

    Some(MonitorInfo {
        bounds: rect_from_win32(&info.rcMonitor),
        work_area: rect_from_win32(&info.rcWork),
    })
}
