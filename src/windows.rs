use tauri::{AppHandle, Manager, Runtime};

pub const MAIN_WINDOW: &str = "main";

pub fn show_main_window<R: Runtime>(app: &AppHandle<R>) {
    let Some(window) = app.get_webview_window(MAIN_WINDOW) else {
        log::warn!("tray: main window missing");
        return;
    };
    if let Err(err) = window.unminimize() {
        log::warn!("tray: failed to unminimize main window: {err}");
    }
    if let Err(err) = window.show() {
        log::warn!("tray: failed to show main window: {err}");
    }
    if let Err(err) = window.set_focus() {
        log::warn!("tray: failed to focus main window: {err}");
    }
}
