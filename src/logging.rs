#[cfg(all(feature = "app", not(test)))]
use std::path::Path;

pub const LOG_FILE_BASENAME: &str = "todo-tray";
pub const LOG_FILE_SUFFIX: &str = "log";
pub const LOG_ROTATE_SIZE_BYTES: u64 = 10 * 1024 * 1024;
pub const LOG_ROTATE_KEEP_FILES: usize = 5;
pub const LOG_ENV: &str = "TODO_TRAY_LOG";

/// Picks the log filter: `TODO_TRAY_LOG`, then `RUST_LOG`, then the build default.
pub fn log_spec(app_var: Option<String>, rust_log: Option<String>, debug: bool) -> String {
    let non_blank = |value: Option<String>| value.filter(|v| !v.trim().is_empty());
    non_blank(app_var)
        .or_else(|| non_blank(rust_log))
        .unwrap_or_else(|| {
            if debug {
                "warn,todo_tray_lib=debug".to_string()
            } else {
                "warn,todo_tray_lib=info".to_string()
            }
        })
}

#[cfg(all(feature = "app", not(test)))]
pub fn init_logging(log_dir: &Path) -> Result<(), flexi_logger::FlexiLoggerError> {
    use flexi_logger::{
        detailed_format, Cleanup, Criterion, Duplicate, FileSpec, Logger, Naming, WriteMode,
    };

    std::fs::create_dir_all(log_dir)?;

    let spec = log_spec(
        std::env::var(LOG_ENV).ok(),
        std::env::var("RUST_LOG").ok(),
        cfg!(debug_assertions),
    );

    Logger::try_with_str(spec)?
        .log_to_file(
            FileSpec::default()
                .directory(log_dir)
                .basename(LOG_FILE_BASENAME)
                .suffix(LOG_FILE_SUFFIX),
        )
        .write_mode(WriteMode::BufferAndFlush)
        .format_for_files(detailed_format)
        .rotate(
            Criterion::Size(LOG_ROTATE_SIZE_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(LOG_ROTATE_KEEP_FILES),
        )
        .duplicate_to_stdout(if cfg!(debug_assertions) {
            Duplicate::Info
        } else {
            Duplicate::None
        })
        .start()?;

    install_panic_hook();

    log::info!(
        "logger initialized dir={} rotate_size_bytes={} keep_files={}",
        log_dir.display(),
        LOG_ROTATE_SIZE_BYTES,
        LOG_ROTATE_KEEP_FILES
    );
    Ok(())
}

#[cfg(all(feature = "app", not(test)))]
fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info: &std::panic::PanicHookInfo<'_>| {
        let payload = info
            .payload()
            .downcast_ref::<&str>()
            .copied()
            .or_else(|| info.payload().downcast_ref::<String>().map(|s| s.as_str()))
            .unwrap_or("<non-string panic payload>");
        let location = info
            .location()
            .map(|loc| format!("{loc}"))
            .unwrap_or_else(|| "<unknown>".to_string());
        let backtrace = std::backtrace::Backtrace::force_capture();

        log::error!("panic: payload={payload} location={location}\nbacktrace:\n{backtrace}");
        default_hook(info);
    }));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_spec_prefers_app_variable_then_rust_log() {
        assert_eq!(
            log_spec(Some("trace".into()), Some("error".into()), true),
            "trace"
        );
        assert_eq!(log_spec(Some("  ".into()), Some("error".into()), true), "error");
        assert_eq!(log_spec(None, None, true), "warn,todo_tray_lib=debug");
        assert_eq!(log_spec(None, Some(String::new()), false), "warn,todo_tray_lib=info");
    }
}
