use std::path::PathBuf;

use serde::Deserialize;

/// Fallback rotation threshold: 5 MiB.
pub const DEFAULT_MAX_LOG_BYTES: u64 = 5 * 1024 * 1024;

/// Log level, destination, and rotation settings.
///
/// # Example
///
/// ```toml
/// [logging]
/// level = "debug"
/// dir = "/var/log/aether"
/// max_size = "10MB"
/// max_files = 3
/// ```
#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    /// Minimum level (`error`, `warn`, `info`, `debug`, `trace`).
    #[serde(default = "default_level")]
    pub level: String,
    /// Directory holding `combined.log` and `error.log`.
    #[serde(default = "default_dir")]
    pub dir: PathBuf,
    /// Rotation threshold per file, e.g. `"5MB"`, `"512KB"`, or a byte count.
    #[serde(default = "default_max_size")]
    pub max_size: String,
    /// Files kept per log, counting the active one.
    #[serde(default = "default_max_files")]
    pub max_files: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            dir: default_dir(),
            max_size: default_max_size(),
            max_files: default_max_files(),
        }
    }
}

impl LoggingConfig {
    /// The rotation threshold in bytes.
    pub fn max_size_bytes(&self) -> u64 {
        parse_file_size(&self.max_size)
    }
}

/// Parse `<n>KB`, `<n>MB`, `<n>GB` (1024-based, unit case-insensitive) or a
/// bare byte count. Anything else, including zero, yields 5 MiB.
pub fn parse_file_size(raw: &str) -> u64 {
    let raw = raw.trim();
    let split = raw
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(raw.len());
    let (digits, unit) = raw.split_at(split);

    let Ok(number) = digits.parse::<u64>() else {
        return DEFAULT_MAX_LOG_BYTES;
    };
    let multiplier = match unit.to_ascii_uppercase().as_str() {
        "" => 1,
        "KB" => 1024,
        "MB" => 1024 * 1024,
        "GB" => 1024 * 1024 * 1024,
        _ => return DEFAULT_MAX_LOG_BYTES,
    };

    match number.checked_mul(multiplier) {
        Some(0) | None => DEFAULT_MAX_LOG_BYTES,
        Some(bytes) => bytes,
    }
}

fn default_level() -> String {
    "info".to_owned()
}

fn default_dir() -> PathBuf {
    PathBuf::from("logs")
}

fn default_max_size() -> String {
    "5MB".to_owned()
}

fn default_max_files() -> usize {
    5
}
