mod commands;
mod config;
mod events;
mod icon;
mod locale;
mod logging;
mod models;
mod state;
mod storage;
mod toast;
mod tray;
#[cfg(all(feature = "app", not(test)))]
mod windows;

#[cfg(all(feature = "app", not(test)))]
use std::sync::Arc;

#[cfg(all(feature = "app", not(test)))]
use tauri::{AppHandle, Emitter, Manager, WebviewWindowBuilder, WindowEvent};

#[cfg(all(feature = "app", not(test)))]
use crate::commands::*;
#[cfg(all(feature = "app", not(test)))]
use crate::config::AppConfig;
#[cfg(all(feature = "app", not(test)))]
use crate::events::{ToastPayload, EVENT_TOAST};
#[cfg(all(feature = "app", not(test)))]
use crate::icon::ensure_icon_file;
#[cfg(all(feature = "app", not(test)))]
use crate::locale::labels;
#[cfg(all(feature = "app", not(test)))]
use crate::logging::init_logging;
#[cfg(all(feature = "app", not(test)))]
use crate::state::AppState;
#[cfg(all(feature = "app", not(test)))]
use crate::storage::Storage;
#[cfg(all(feature = "app", not(test)))]
use crate::toast::{ToastSink, Toasts};
#[cfg(all(feature = "app", not(test)))]
use crate::tray::init_tray;
#[cfg(all(feature = "app", not(test)))]
use crate::windows::MAIN_WINDOW;

#[cfg(all(feature = "app", not(test)))]
struct WindowToastSink {
    app: AppHandle,
}

#[cfg(all(feature = "app", not(test)))]
impl ToastSink for WindowToastSink {
    fn publish(&self, payload: ToastPayload) {
        if let Err(err) = self.app.emit_to(MAIN_WINDOW, EVENT_TOAST, payload) {
            log::warn!("toast: failed to emit: {err}");
        }
    }
}

#[cfg_attr(mobile, tauri::mobile_entry_point)]
#[cfg(all(feature = "app", not(test)))]
pub fn run() {
    tauri::Builder::default()
        .setup(|app| {
            let config = AppConfig::from_env()?;
            std::fs::create_dir_all(&config.data_dir)?;
            if let Err(err) = init_logging(&config.data_dir) {
                eprintln!("logging disabled: {err}");
            }
            log::info!(
                "app: starting data_dir={} language={:?}",
                config.data_dir.display(),
                config.language
            );

            let storage = Storage::new(config.data_dir.clone());
            let todos = storage.load_todos().map_err(|err| {
                log::error!(
                    "app: cannot load {}: {err}",
                    storage.data_path().display()
                );
                err
            })?;
            let count = todos.len();
            app.manage(AppState::new(todos));
            app.manage(config.clone());

            let toasts = Toasts::new(Arc::new(WindowToastSink {
                app: app.handle().clone(),
            }));
            app.manage(toasts);

            let texts = labels(config.language);
            // Starts hidden; the tray opens it.
            WebviewWindowBuilder::new(
                app,
                MAIN_WINDOW,
                tauri::WebviewUrl::App("index.html".into()),
            )
            .title(texts.window_title)
            .inner_size(360.0, 440.0)
            .resizable(true)
            .visible(false)
            .build()?;

            let icon_path = ensure_icon_file(&config.data_dir)?;
            init_tray(app, &icon_path, config.language, count)?;
            Ok(())
        })
        .on_window_event(|window, event| {
            if window.label() != MAIN_WINDOW {
                return;
            }
            match event {
                WindowEvent::CloseRequested { api, .. } => {
                    let _ = window.hide();
                    api.prevent_close();
                }
                WindowEvent::Destroyed => {
                    window.app_handle().state::<Toasts>().close();
                }
                _ => {}
            }
        })
        .invoke_handler(tauri::generate_handler![
            list_todos,
            add_todo,
            remove_todo,
            copy_todo,
            ui_labels,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
