use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use desk_logging::{desk_info, desk_warn};
use newsdesk_core::SearchSettings;
use newsdesk_engine::{ClientSettings, MIN_QUERY_CHARS};
use serde::Deserialize;

use super::logging::LogDestination;

pub const SETTINGS_FILENAME: &str = "newsdesk.ron";

/// Contents of `newsdesk.ron`. Every field is optional.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ShellSettings {
    pub base_url: String,
    pub credential_path: PathBuf,
    pub debounce_ms: u64,
    pub request_timeout_ms: u64,
    pub connect_timeout_ms: u64,
    pub max_results: u32,
    pub min_query_chars: usize,
    pub max_body_bytes: u64,
    pub log_destination: LogDestination,
    pub verbose: bool,
}

impl Default for ShellSettings {
    fn default() -> Self {
        let search = SearchSettings::default();
        let client = ClientSettings::default();
        Self {
            base_url: client.base_url,
            credential_path: PathBuf::from(".newsdesk/credential.json"),
            debounce_ms: millis(search.debounce),
            request_timeout_ms: millis(search.request_timeout),
            connect_timeout_ms: millis(client.connect_timeout),
            max_results: search.max_results,
            min_query_chars: search.min_query_chars,
            max_body_bytes: client.max_bytes,
            log_destination: LogDestination::default(),
            verbose: false,
        }
    }
}

impl ShellSettings {
    /// The endpoint refuses queries under [`MIN_QUERY_CHARS`], so lower settings are raised to it.
    pub fn search(&self) -> SearchSettings {
        SearchSettings {
            debounce: Duration::from_millis(self.debounce_ms),
            request_timeout: Duration::from_millis(self.request_timeout_ms),
            max_results: self.max_results,
            min_query_chars: self.min_query_chars.max(MIN_QUERY_CHARS),
        }
    }

    pub fn client(&self) -> ClientSettings {
        ClientSettings {
            base_url: self.base_url.clone(),
            connect_timeout: Duration::from_millis(self.connect_timeout_ms),
            request_timeout: Duration::from_millis(self.request_timeout_ms),
            max_bytes: self.max_body_bytes,
        }
    }
}

/// Reads settings from `path`; a missing or unparsable file yields defaults.
///
/// Runs before the logger exists, so problems are returned as warnings for
/// the caller to report once logging is up.
pub fn load(path: &Path) -> (ShellSettings, Option<String>) {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return (ShellSettings::default(), None);
        }
        Err(err) => {
            let warning = format!("Failed to read settings from {:?}: {}", path, err);
            return (ShellSettings::default(), Some(warning));
        }
    };

    match ron::from_str(&content) {
        Ok(settings) => (settings, None),
        Err(err) => {
            let warning = format!("Failed to parse settings from {:?}: {}", path, err);
            (ShellSettings::default(), Some(warning))
        }
    }
}

pub fn report(path: &Path, settings: &ShellSettings, warning: Option<String>) {
    if let Some(warning) = warning {
        desk_warn!("{}; using defaults", warning);
    }
    desk_info!(
        "settings: file={:?} base_url={} debounce_ms={} timeout_ms={}",
        path,
        settings.base_url,
        settings.debounce_ms,
        settings.request_timeout_ms
    );
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
