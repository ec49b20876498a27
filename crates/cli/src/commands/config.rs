use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use sitequote_core::config::{AppConfig, LoadOptions};
use toml::Value;

pub fn run() -> String {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => return format!("config validation failed: {error}"),
    };

    let config_file_path = detect_config_path();
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());
    let source = |key_path: &str, env_key: Option<&str>| {
        field_source(key_path, env_key, config_file_doc.as_ref(), config_file_path.as_deref())
    };

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];

    lines.push(render_line(
        "server.bind_address",
        &config.server.bind_address,
        source("server.bind_address", Some("SITEQUOTE_SERVER_BIND_ADDRESS")),
    ));
    lines.push(render_line(
        "server.port",
        &config.server.port.to_string(),
        source("server.port", Some("SITEQUOTE_SERVER_PORT")),
    ));
    lines.push(render_line(
        "server.graceful_shutdown_secs",
        &config.server.graceful_shutdown_secs.to_string(),
        source("server.graceful_shutdown_secs", Some("SITEQUOTE_SERVER_GRACEFUL_SHUTDOWN_SECS")),
    ));

    lines.push(render_line(
        "mail.host",
        config.mail.host.as_deref().unwrap_or("<unset>"),
        source("mail.host", Some("EMAIL_SERVER_HOST")),
    ));
    lines.push(render_line(
        "mail.port",
        &config.mail.port.map(|port| port.to_string()).unwrap_or_else(|| "<unset>".to_string()),
        source("mail.port", Some("EMAIL_SERVER_PORT")),
    ));
    lines.push(render_line(
        "mail.secure",
        &config.mail.secure.to_string(),
        source("mail.secure", Some("EMAIL_SERVER_SECURE")),
    ));
    lines.push(render_line(
        "mail.username",
        config.mail.username.as_deref().unwrap_or("<unset>"),
        source("mail.username", Some("EMAIL_USERNAME")),
    ));

    let password = if config.mail.password.is_some() { "<redacted>" } else { "<unset>" };
    lines.push(render_line(
        "mail.password",
        password,
        source("mail.password", Some("EMAIL_PASSWORD")),
    ));
    lines.push(render_line(
        "mail.from_address",
        config.mail.from_address.as_deref().unwrap_or("<unset>"),
        source("mail.from_address", Some("EMAIL_FROM")),
    ));

    lines.push(render_line(
        "logging.level",
        &config.logging.level,
        source("logging.level", Some("SITEQUOTE_LOGGING_LEVEL")),
    ));
    lines.push(render_line(
        "logging.format",
        &format!("{:?}", config.logging.format),
        source("logging.format", Some("SITEQUOTE_LOGGING_FORMAT")),
    ));

    lines.join("\n")
}

fn detect_config_path() -> Option<PathBuf> {
    let root = PathBuf::from("sitequote.toml");
    if root.exists() {
        return Some(root);
    }

    let nested = PathBuf::from("config/sitequote.toml");
    if nested.exists() {
        return Some(nested);
    }

    None
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_key: Option<&str>,
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if let Some(env_key) = env_key {
        if env::var_os(env_key).is_some() {
            return format!("env ({env_key})");
        }
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

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}
