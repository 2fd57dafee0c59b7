use std::path::PathBuf;

use crate::events::RowsPayload;
#[cfg(all(feature = "app", not(test)))]
use crate::events::EVENT_TODOS_UPDATED;
use crate::locale::{labels, Language};
use crate::models::{TodoItem, TodoRow};
use crate::state::{AppState, RemoveError, ValidationError};
use crate::storage::{Storage, StorageError};

#[cfg(all(feature = "app", not(test)))]
use crate::config::AppConfig;
#[cfg(all(feature = "app", not(test)))]
use crate::toast::Toasts;
#[cfg(all(feature = "app", not(test)))]
use crate::tray::update_tray_count;
#[cfg(all(feature = "app", not(test)))]
use tauri::{AppHandle, Emitter, Manager, Runtime, State};

#[derive(Debug, serde::Serialize)]
pub struct CommandResult<T> {
    pub ok: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

/// Everything a command needs from the running app, so command logic can be driven
/// without a window in tests.
trait CommandCtx {
    fn data_dir(&self) -> PathBuf;
    fn language(&self) -> Language;
    fn emit_todos_updated(&self, payload: RowsPayload);
    fn update_tray_count(&self, count: usize);
    fn show_toast(&self, message: &str);
    fn set_clipboard(&self, text: &str) -> Result<(), String>;
}

fn ok<T>(data: T) -> CommandResult<T> {
    CommandResult {
        ok: true,
        data: Some(data),
        error: None,
    }
}

fn err<T>(message: &str) -> CommandResult<T> {
    CommandResult {
        ok: false,
        data: None,
        error: Some(message.to_string()),
    }
}

fn persist(ctx: &impl CommandCtx, state: &AppState) -> Result<(), StorageError> {
    let storage = Storage::new(ctx.data_dir());
    let todos = state.todos();
    storage.save_todos(&todos)?;
    ctx.update_tray_count(todos.len());
    ctx.emit_todos_updated(RowsPayload { rows: state.rows() });
    Ok(())
}

/// Writes the current list through. On failure the list goes back to `snapshot` so that
/// memory never runs ahead of what is on disk, and the user is told.
fn persist_or_rollback(
    ctx: &impl CommandCtx,
    state: &AppState,
    snapshot: Vec<TodoItem>,
) -> Result<(), String> {
    if let Err(error) = persist(ctx, state) {
        log::error!("todos: save failed, rolling back error={error}");
        state.restore(snapshot);
        // The webview may already show the change; send it the rows it should show.
        ctx.emit_todos_updated(RowsPayload { rows: state.rows() });
        ctx.show_toast(&format!("{}: {error}", labels(ctx.language()).save_failed));
        return Err(format!("storage error: {error}"));
    }
    Ok(())
}

fn list_todos_impl(state: &AppState) -> CommandResult<Vec<TodoRow>> {
    ok(state.rows())
}

fn add_todo_impl(
    ctx: &impl CommandCtx,
    state: &AppState,
    text: String,
) -> CommandResult<TodoItem> {
    let snapshot = state.todos();
    let item = match state.add(&text) {
        Ok(item) => item,
        Err(error) => {
            if let ValidationError::TooLong { chars } = error {
                log::info!("todos: rejected over-length input chars={chars}");
                ctx.show_toast(labels(ctx.language()).too_long);
            }
            return err(&format!("validation error: {error}"));
        }
    };
    if let Err(message) = persist_or_rollback(ctx, state, snapshot) {
        return err(&message);
    }
    log::debug!("todos: added count={}", state.todos().len());
    ok(item)
}

fn remove_todo_impl(
    ctx: &impl CommandCtx,
    state: &AppState,
    index: usize,
    expected: Option<&str>,
) -> CommandResult<TodoItem> {
    let snapshot = state.todos();
    let removed = match expected {
        Some(text) => state.remove_matching(index, text),
        None => state.remove_at(index).map_err(RemoveError::from),
    };
    let item = match removed {
        Ok(item) => item,
        Err(error) => {
            log::warn!("todos: remove rejected error={error}");
            return err(&format!("index error: {error}"));
        }
    };
    if let Err(message) = persist_or_rollback(ctx, state, snapshot) {
        return err(&message);
    }
    log::debug!("todos: removed index={index} count={}", state.todos().len());
    ok(item)
}

fn copy_todo_impl(ctx: &impl CommandCtx, state: &AppState, index: usize) -> CommandResult<bool> {
    let item = match state.get(index) {
        Ok(item) => item,
        Err(error) => return err(&format!("index error: {error}")),
    };
    let texts = labels(ctx.language());
    if let Err(error) = ctx.set_clipboard(&item.text) {
        log::warn!("todos: clipboard write failed error={error}");
        ctx.show_toast(&format!("{}: {error}", texts.copy_failed));
        return err(&format!("clipboard error: {error}"));
    }
    ctx.show_toast(texts.copied);
    ok(true)
}

#[cfg(all(feature = "app", not(test)))]
struct TauriCommandCtx<'a, R: Runtime> {
    app: &'a AppHandle<R>,
}

#[cfg(all(feature = "app", not(test)))]
impl<R: Runtime> CommandCtx for TauriCommandCtx<'_, R> {
    fn data_dir(&self) -> PathBuf {
        self.app.state::<AppConfig>().data_dir.clone()
    }

    fn language(&self) -> Language {
        self.app.state::<AppConfig>().language
    }

    fn emit_todos_updated(&self, payload: RowsPayload) {
        if let Err(err) = self.app.emit(EVENT_TODOS_UPDATED, payload) {
            log::warn!("todos: failed to emit update: {err}");
        }
    }

    fn update_tray_count(&self, count: usize) {
        update_tray_count(self.app, count, self.language());
    }

    fn show_toast(&self, message: &str) {
        self.app.state::<Toasts>().show(message);
    }

    fn set_clipboard(&self, text: &str) -> Result<(), String> {
        let mut clipboard = arboard::Clipboard::new().map_err(|e| e.to_string())?;
        clipboard.set_text(text).map_err(|e| e.to_string())
    }
}

#[cfg(all(feature = "app", not(test)))]
#[tauri::command]
pub fn list_todos(state: State<AppState>) -> CommandResult<Vec<TodoRow>> {
    list_todos_impl(state.inner())
}

#[cfg(all(feature = "app", not(test)))]
#[tauri::command]
pub fn add_todo(app: AppHandle, state: State<AppState>, text: String) -> CommandResult<TodoItem> {
    let ctx = TauriCommandCtx { app: &app };
    add_todo_impl(&ctx, state.inner(), text)
}

#[cfg(all(feature = "app", not(test)))]
#[tauri::command]
pub fn remove_todo(
    app: AppHandle,
    state: State<AppState>,
    index: usize,
    text: Option<String>,
) -> CommandResult<TodoItem> {
    let ctx = TauriCommandCtx { app: &app };
    remove_todo_impl(&ctx, state.inner(), index, text.as_deref())
}

#[cfg(all(feature = "app", not(test)))]
#[tauri::command]
pub fn copy_todo(app: AppHandle, state: State<AppState>, index: usize) -> CommandResult<bool> {
    let ctx = TauriCommandCtx { app: &app };
    copy_todo_impl(&ctx, state.inner(), index)
}

#[cfg(all(feature = "app", not(test)))]
#[tauri::command]
pub fn ui_labels(app: AppHandle) -> CommandResult<UiLabels> {
    ok(ui_labels_impl(app.state::<AppConfig>().language))
}

/// Strings the webview renders itself.
#[derive(Debug, serde::Serialize)]
pub struct UiLabels {
    pub placeholder: String,
    pub copy: String,
}

fn ui_labels_impl(language: Language) -> UiLabels {
    let texts = labels(language);
    UiLabels {
        placeholder: texts.placeholder.to_string(),
        copy: texts.copy_button.to_string(),
    }
}
