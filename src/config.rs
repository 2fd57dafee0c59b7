use std::path::PathBuf;

use crate::locale::{resolve_language, Language};

pub const HOME_ENV: &str = "TODO_TRAY_HOME";
pub const LANG_ENV: &str = "TODO_TRAY_LANG";

/// Runtime configuration, resolved once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Holds `todo.json`, `tray.png` and the log files.
    pub data_dir: PathBuf,
    pub language: Language,
}

impl AppConfig {
    pub fn from_env() -> std::io::Result<Self> {
        let cwd = std::env::current_dir()?;
        Ok(Self::from_values(
            non_blank_var(HOME_ENV),
            non_blank_var(LANG_ENV),
            cwd,
        ))
    }

    fn from_values(home: Option<String>, language: Option<String>, cwd: PathBuf) -> Self {
        let data_dir = match home {
            Some(home) => {
                let home = PathBuf::from(home);
                if home.is_absolute() {
                    home
                } else {
                    cwd.join(home)
                }
            }
            None => cwd,
        };
        Self {
            data_dir,
            language: resolve_language(language.as_deref().unwrap_or("auto")),
        }
    }
}

fn non_blank_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
}
