//! Per-platform message pumping for the tray thread
//!
//! tray-icon needs the thread that creates the icon to run the platform's
//! event loop: gtk on Linux, a Win32 message loop on Windows. The tray
//! thread polls instead of blocking so it can also watch the UI's updates.

use super::TrayError;

#[cfg(target_os = "linux")]
pub fn init() -> Result<(), TrayError> {
    gtk::init().map_err(|e| TrayError::Platform(e.to_string()))
}

/// Dispatch every pending gtk event without blocking
#[cfg(target_os = "linux")]
pub fn pump() {
    while gtk::events_pending() {
        gtk::main_iteration_do(false);
    }
}

#[cfg(windows)]
pub fn init() -> Result<(), TrayError> {
    Ok(())
}

/// Dispatch every message queued for this thread's windows
#[cfg(windows)]
pub fn pump() {
    use windows::Win32::Foundation::HWND;
    use windows::Win32::UI::WindowsAndMessaging::{
        DispatchMessageW, PeekMessageW, TranslateMessage, MSG, PM_REMOVE,
    };

    let mut msg = MSG::default();
    // SAFETY: `msg` outlives every call; a null HWND selects all windows of this thread
    unsafe {
        while PeekMessageW(&mut msg, HWND::default(), 0, 0, PM_REMOVE).as_bool() {
            let _ = TranslateMessage(&msg);
            DispatchMessageW(&msg);
        }
    }
}

#[cfg(not(any(target_os = "linux", windows)))]
pub fn init() -> Result<(), TrayError> {
    Ok(())
}

#[cfg(not(any(target_os = "linux", windows)))]
pub fn pump() {}
