use sys_locale::get_locale;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    Zh,
    En,
}

/// User-visible strings shown outside the webview (tray, window title) and in popups.
#[derive(Debug)]
pub struct Labels {
    pub window_title: &'static str,
    pub tray_open: &'static str,
    pub tray_quit: &'static str,
    pub tray_tooltip: &'static str,
    pub placeholder: &'static str,
    pub copy_button: &'static str,
    pub copied: &'static str,
    pub too_long: &'static str,
    pub save_failed: &'static str,
    pub copy_failed: &'static str,
}

/// `zh` and `en` are honored as-is; anything else falls back to the OS locale.
pub fn resolve_language(language: &str) -> Language {
    let normalized = language.trim().to_lowercase();
    match normalized.as_str() {
        "zh" => Language::Zh,
        "en" => Language::En,
        _ => detect_system_language(),
    }
}

fn detect_system_language() -> Language {
    language_from_locale(&get_locale().unwrap_or_default())
}

fn language_from_locale(locale: &str) -> Language {
    if locale.to_lowercase().starts_with("zh") {
        Language::Zh
    } else {
        Language::En
    }
}

pub fn labels(lang: Language) -> Labels {
    match lang {
        Language::Zh => Labels {
            window_title: "待办事项",
            tray_open: "打开待办事项",
            tray_quit: "退出",
            tray_tooltip: "待办",
            placeholder: "新增待办事项，回车确认（最多50字）",
            copy_button: "复制",
            copied: "已复制到剪贴板",
            too_long: "待办事项最多50个汉字",
            save_failed: "保存失败",
            copy_failed: "复制失败",
        },
        Language::En => Labels {
            window_title: "To-do",
            tray_open: "Open to-do list",
            tray_quit: "Quit",
            tray_tooltip: "To-do",
            placeholder: "New to-do, press Enter to add (max 50 characters)",
            copy_button: "Copy",
            copied: "Copied to clipboard",
            too_long: "To-dos are limited to 50 characters",
            save_failed: "Could not save",
            copy_failed: "Could not copy",
        },
    }
}
