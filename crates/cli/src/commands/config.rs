use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use croprec_core::config::{AppConfig, LoadOptions, DEFAULT_CONFIG_FILE};
use serde::Serialize;
use serde_json::json;
use toml::Value;

use crate::commands::{CommandResult, EXIT_CONFIG_FAILURE};

#[derive(Debug, Serialize)]
struct ConfigEntry {
    key: &'static str,
    value: String,
    source: String,
}

/// Config keys paired with the env var that overrides them.
const TRACKED_KEYS: &[(&str, &[&str])] = &[
    ("server.bind_address", &["CROPREC_SERVER_BIND_ADDRESS"]),
    ("server.port", &["CROPREC_SERVER_PORT"]),
    ("server.graceful_shutdown_secs", &["CROPREC_SERVER_GRACEFUL_SHUTDOWN_SECS"]),
    ("model.bundle_path", &["CROPREC_MODEL_BUNDLE_PATH"]),
    ("web.templates_dir", &["CROPREC_WEB_TEMPLATES_DIR"]),
    ("web.static_dir", &["CROPREC_WEB_STATIC_DIR"]),
    ("logging.level", &["CROPREC_LOGGING_LEVEL", "CROPREC_LOG_LEVEL"]),
    ("logging.format", &["CROPREC_LOGGING_FORMAT", "CROPREC_LOG_FORMAT"]),
];

pub fn run() -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                "config",
                "config_validation",
                format!("config validation failed: {error}"),
                EXIT_CONFIG_FAILURE,
            )
        }
    };

    let config_file_path = detect_config_path();
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());

    let entries: Vec<ConfigEntry> = TRACKED_KEYS
        .iter()
        .map(|&(key, env_keys)| ConfigEntry {
            key,
            value: value_for(&config, key),
            source: field_source(
                key,
                env_keys,
                config_file_doc.as_ref(),
                config_file_path.as_deref(),
            ),
        })
        .collect();

    CommandResult::success_with_data(
        "config",
        "effective config (source precedence: env > file > default)",
        Some(json!({
            "config_file": config_file_path.map(|path| path.display().to_string()),
            "entries": entries,
        })),
    )
}

fn value_for(config: &AppConfig, key: &str) -> String {
    match key {
        "server.bind_address" => config.server.bind_address.clone(),
        "server.port" => config.server.port.to_string(),
        "server.graceful_shutdown_secs" => config.server.graceful_shutdown_secs.to_string(),
        "model.bundle_path" => config.model.bundle_path.display().to_string(),
        "web.templates_dir" => config.web.templates_dir.display().to_string(),
        "web.static_dir" => config.web.static_dir.display().to_string(),
        "logging.level" => config.logging.level.clone(),
        "logging.format" => format!("{:?}", config.logging.format).to_lowercase(),
        _ => "<unknown>".to_string(),
    }
}

fn detect_config_path() -> Option<PathBuf> {
    [PathBuf::from(DEFAULT_CONFIG_FILE), PathBuf::from("config").join(DEFAULT_CONFIG_FILE)]
        .into_iter()
        .find(|path| path.exists())
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_keys: &[&str],
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if let Some(env_key) = env_keys.iter().find(|key| env::var_os(key).is_some()) {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}
