//! Log output for the debugger
//!
//! The terminal belongs to the UI, so logs only go to a file named on the
//! command line. The filter comes from `WSDEBUG_LOG` (default `info`).

use std::error::Error;
use std::fs::File;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter
pub const LOG_ENV: &str = "WSDEBUG_LOG";

/// Install the global subscriber writing to `path`. Fails when the file
/// cannot be created or a subscriber is already installed.
pub fn init_tracing(path: &Path) -> Result<(), Box<dyn Error>> {
    let file = File::create(path)?;
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_target(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|e| e as Box<dyn Error>)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_is_an_error() {
        let dir = std::env::temp_dir();
        let first = dir.join(format!("wsdebug-log-{}-a.log", std::process::id()));
        let second = dir.join(format!("wsdebug-log-{}-b.log", std::process::id()));
        assert!(init_tracing(&first).is_ok());
        assert!(init_tracing(&second).is_err());
        let _ = std::fs::remove_file(first);
        let _ = std::fs::remove_file(second);
    }

    #[test]
    fn test_unwritable_log_path() {
        let path = Path::new("/nonexistent-wsdebug-dir/wsdebug.log");
        assert!(init_tracing(path).is_err());
    }
}
