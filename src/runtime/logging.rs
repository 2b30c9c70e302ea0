use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use env_logger::{Builder, Env, Target};

use crate::config::LoggingSettings;

/// Where log records go when `logging.file` is unset.
pub fn default_log_path() -> PathBuf {
    std::env::temp_dir().join("djuzzwave.log")
}

fn open_log_file(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

/// Route `log` records to a file; the terminal belongs to the UI.
///
/// `RUST_LOG` wins over `logging.level`. Returns whether records are being
/// written anywhere. When the file cannot be opened this says so on stderr,
/// which is still the plain terminal at this point.
pub fn init(settings: &LoggingSettings) -> bool {
    if !settings.enabled {
        return false;
    }

    let path = settings.file.clone().unwrap_or_else(default_log_path);
    let file = match open_log_file(&path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!(
                "djuzzwave: cannot open log file {}, logging disabled: {e}",
                path.display()
            );
            return false;
        }
    };

    let _ = Builder::from_env(Env::default().default_filter_or(settings.level.as_str()))
        .target(Target::Pipe(Box::new(file)))
        .format_timestamp_millis()
        .try_init();
    log::info!("logging to {}", path.display());
    true
}
