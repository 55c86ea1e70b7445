//! Log setup. The terminal belongs to the UI, so logs go to a file.

use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global subscriber, writing to `path`.
///
/// `RUST_LOG` wins over `level`. Returns `false` when the file cannot be
/// opened or a subscriber is already installed; the app then runs without logs.
pub fn init(path: &Path, level: &str) -> bool {
    if let Some(dir) = path.parent() {
        if fs::create_dir_all(dir).is_err() {
            return false;
        }
    }
    let Ok(file) = OpenOptions::new().create(true).append(true).open(path) else {
        return false;
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn init_creates_log_file_once() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("canto.log");

        assert!(init(&path, "debug"));
        assert!(path.exists());
        // The global subscriber can only be installed once per process.
        assert!(!init(&path, "debug"));
    }

    #[test]
    fn unwritable_location_disables_logging() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, b"").unwrap();
        assert!(!init(&blocker.join("canto.log"), "info"));
    }
}
