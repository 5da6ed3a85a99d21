use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use regulus_core::config::{AppConfig, LoadOptions};
use secrecy::ExposeSecret;
use toml::Value;

struct Field {
    key_path: &'static str,
    env_keys: &'static [&'static str],
    value: String,
}

pub fn run() -> String {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => return format!("config validation failed: {error}"),
    };

    let config_file_path = detect_config_path();
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];
    for field in fields(&config) {
        let source = field_source(
            field.key_path,
            field.env_keys,
            config_file_doc.as_ref(),
            config_file_path.as_deref(),
        );
        lines.push(render_line(field.key_path, &field.value, source));
    }

    lines.join("\n")
}

fn fields(config: &AppConfig) -> Vec<Field> {
    vec![
        Field {
            key_path: "api.base_url",
            env_keys: &["REGULUS_API_BASE_URL"],
            value: config.api.base_url.clone(),
        },
        Field {
            key_path: "api.api_key",
            env_keys: &["REGULUS_API_KEY", "RGA_API_KEY"],
            value: redact_key(config.api.api_key.expose_secret()),
        },
        Field {
            key_path: "api.page_number_policy",
            env_keys: &["REGULUS_API_PAGE_NUMBER_POLICY"],
            value: format!("{:?}", config.api.page_number_policy),
        },
        Field {
            key_path: "pdf.extractor",
            env_keys: &["REGULUS_PDF_EXTRACTOR"],
            value: config.pdf.extractor.clone(),
        },
        Field {
            key_path: "pdf.scratch_dir",
            env_keys: &["REGULUS_PDF_SCRATCH_DIR"],
            value: display_path(config.pdf.scratch_dir.as_deref(), "<system temp dir>"),
        },
        Field {
            key_path: "agents.model",
            env_keys: &["REGULUS_AGENTS_MODEL"],
            value: config.agents.model.clone(),
        },
        Field {
            key_path: "agents.agency_directory",
            env_keys: &["REGULUS_AGENTS_AGENCY_DIRECTORY"],
            value: display_path(config.agents.agency_directory.as_deref(), "<bundled>"),
        },
        Field {
            key_path: "logging.level",
            env_keys: &["REGULUS_LOGGING_LEVEL", "REGULUS_LOG_LEVEL"],
            value: config.logging.level.clone(),
        },
        Field {
            key_path: "logging.format",
            env_keys: &["REGULUS_LOGGING_FORMAT", "REGULUS_LOG_FORMAT"],
            value: format!("{:?}", config.logging.format),
        },
    ]
}

fn detect_config_path() -> Option<PathBuf> {
    ["regulus.toml", "config/regulus.toml"].into_iter().map(PathBuf::from).find(|path| path.exists())
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
    if let Some(env_key) = env_keys.iter().find(|key| env_is_set(key)) {
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

/// Blank variables are ignored by the loader, so they never count as a source.
fn env_is_set(key: &str) -> bool {
    env::var(key).is_ok_and(|value| !value.trim().is_empty())
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

fn display_path(path: Option<&Path>, unset: &str) -> String {
    path.map(|path| path.display().to_string()).unwrap_or_else(|| unset.to_string())
}

/// Keeps the first four characters so operators can tell keys apart.
pub(crate) fn redact_key(key: &str) -> String {
    let trimmed = key.trim();
    if trimmed.is_empty() {
        return "<empty>".to_string();
    }

    if trimmed.chars().count() <= 8 {
        return "<redacted>".to_string();
    }

    let prefix: String = trimmed.chars().take(4).collect();
    format!("{prefix}***")
}

#[cfg(test)]
mod tests {
    use super::redact_key;

    #[test]
    fn keys_are_redacted_to_a_short_prefix() {
        assert_eq!(redact_key(""), "<empty>");
        assert_eq!(redact_key("DEMO_KEY"), "<redacted>");
        assert_eq!(redact_key("abcd1234efgh5678ijkl"), "abcd***");
    }
}
