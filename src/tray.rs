#[cfg(all(feature = "app", not(test)))]
use std::path::Path;

#[cfg(all(feature = "app", not(test)))]
use tauri::{
    image::Image,
    menu::{Menu, MenuItem},
    tray::{MouseButton, MouseButtonState, TrayIconBuilder, TrayIconEvent},
    App, Manager, Runtime,
};

#[cfg(all(feature = "app", not(test)))]
use crate::icon::load_icon;
#[cfg(all(feature = "app", not(test)))]
use crate::locale::labels;
use crate::locale::Language;
#[cfg(all(feature = "app", not(test)))]
use crate::windows::show_main_window;

#[cfg(all(feature = "app", not(test)))]
const TRAY_ID: &str = "main";

pub const MENU_OPEN: &str = "open";
pub const MENU_QUIT: &str = "quit";

#[derive(Debug, PartialEq, Eq)]
pub enum TrayAction {
    ShowMain,
    Quit,
    Ignore,
}

pub fn menu_action(id: &str) -> TrayAction {
    match id {
        MENU_OPEN => TrayAction::ShowMain,
        MENU_QUIT => TrayAction::Quit,
        _ => TrayAction::Ignore,
    }
}

/// Tooltip shows the number of open items, e.g. `待办: 3`.
pub fn tray_tooltip(count: usize, lang: Language) -> String {
    format!("{}: {count}", crate::locale::labels(lang).tray_tooltip)
}

#[cfg(all(feature = "app", not(test)))]
fn build_tray_menu<R: Runtime, M: Manager<R>>(
    app: &M,
    lang: Language,
) -> Result<Menu<R>, Box<dyn std::error::Error>> {
    let texts = labels(lang);
    let open = MenuItem::with_id(app, MENU_OPEN, texts.tray_open, true, None::<&str>)?;
    let quit = MenuItem::with_id(app, MENU_QUIT, texts.tray_quit, true, None::<&str>)?;
    Ok(Menu::with_items(app, &[&open, &quit])?)
}

#[cfg(all(feature = "app", not(test)))]
pub fn init_tray(
    app: &mut App,
    icon_path: &Path,
    lang: Language,
    count: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    let icon = load_icon(icon_path)?;
    let icon = Image::new_owned(icon.rgba, icon.width, icon.height);
    let menu = build_tray_menu(app, lang)?;

    let _tray = TrayIconBuilder::with_id(TRAY_ID)
        .icon(icon)
        .menu(&menu)
        .tooltip(tray_tooltip(count, lang))
        .show_menu_on_left_click(false)
        .on_menu_event(|app, event| {
            let id = event.id.as_ref();
            log::info!("tray: menu_event id={id}");

            match menu_action(id) {
                TrayAction::Quit => app.exit(0),
                TrayAction::ShowMain => show_main_window(app),
                TrayAction::Ignore => {}
            }
        })
        .on_tray_icon_event(|tray, event| {
            if let TrayIconEvent::Click {
                button: MouseButton::Left,
                button_state: MouseButtonState::Up,
                ..
            } = event
            {
                log::info!("tray: left_click");
                show_main_window(tray.app_handle());
            }
        })
        .build(app)?;

    Ok(())
}

#[cfg(all(feature = "app", not(test)))]
pub fn update_tray_count<R: Runtime>(app: &tauri::AppHandle<R>, count: usize, lang: Language) {
    if let Some(tray) = app.tray_by_id(TRAY_ID) {
        if let Err(err) = tray.set_tooltip(Some(tray_tooltip(count, lang))) {
            log::warn!("tray: failed to update tooltip: {err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn menu_ids_map_to_actions() {
        assert_eq!(menu_action("open"), TrayAction::ShowMain);
        assert_eq!(menu_action("quit"), TrayAction::Quit);
        assert_eq!(menu_action("settings"), TrayAction::Ignore);
    }

    #[test]
    fn tooltip_uses_language_prefix() {
        assert_eq!(tray_tooltip(2, Language::Zh), "待办: 2");
        assert_eq!(tray_tooltip(0, Language::En), "To-do: 0");
    }
}
