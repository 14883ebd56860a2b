use serde::Deserialize;

/// Log output configuration. `RUST_LOG` takes precedence over `level`.
#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive (e.g. `"info"`, `"folio_engine=debug,info"`).
    #[serde(default = "default_level")]
    pub level: String,
    /// Colourise output.
    #[serde(default = "default_ansi")]
    pub ansi: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            ansi: default_ansi(),
        }
    }
}

fn default_level() -> String {
    "info".to_owned()
}

fn default_ansi() -> bool {
    true
}
