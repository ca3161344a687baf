// Configuration module for repodoc
// Reads from environment variables with sensible defaults

use std::env;
use std::sync::OnceLock;

/// Global configuration instance
static CONFIG: OnceLock<Config> = OnceLock::new();

pub const DEFAULT_MAX_FILE_BYTES: u64 = 4 * 1024 * 1024;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Largest source file that will be read and parsed (REPODOC_MAX_FILE_BYTES)
    pub max_file_bytes: u64,

    /// Directory names pruned in addition to the built-in set (REPODOC_EXTRA_IGNORE)
    pub extra_ignore: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
            extra_ignore: Vec::new(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Config::default();

        if let Some(val) = lookup("REPODOC_MAX_FILE_BYTES") {
            match val.trim().parse() {
                Ok(parsed) if parsed > 0 => config.max_file_bytes = parsed,
                _ => log::warn!(
                    "invalid REPODOC_MAX_FILE_BYTES value: {}, using default: {}",
                    val,
                    config.max_file_bytes
                ),
            }
        }

        if let Some(val) = lookup("REPODOC_EXTRA_IGNORE") {
            config.extra_ignore = parse_list(&val);
        }

        config
    }

    /// Get the global configuration instance
    pub fn get() -> &'static Config {
        CONFIG.get_or_init(Config::from_env)
    }
}

fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}
