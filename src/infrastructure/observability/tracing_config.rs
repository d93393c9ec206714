use crate::presentation::config::LoggingSettings;

pub(crate) const DEFAULT_FILTER: &str = "info,voxgate=debug,tower_http=debug";

/// Configuration for tracing initialization.
#[derive(Debug, Clone)]
pub struct TracingConfig {
    pub environment: String,
    pub json_format: bool,
    pub default_filter: String,
}

impl TracingConfig {
    /// Builds the config from settings. `LOG_FORMAT=json` in the process
    /// environment switches to JSON output even when settings do not.
    pub fn from_settings(environment: impl Into<String>, logging: &LoggingSettings) -> Self {
        let level = logging.level.trim();
        Self {
            environment: environment.into(),
            json_format: logging.json,
            default_filter: if level.is_empty() {
                DEFAULT_FILTER.to_string()
            } else {
                level.to_string()
            },
        }
        .with_log_format(std::env::var("LOG_FORMAT").ok().as_deref())
    }

    pub fn with_log_format(mut self, log_format: Option<&str>) -> Self {
        if let Some(format) = log_format {
            if format.trim().eq_ignore_ascii_case("json") {
                self.json_format = true;
            }
        }
        self
    }
}
