use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::normalize::PageNumberPolicy;

pub const DEFAULT_BASE_URL: &str = "https://api.regulations.gov/v4";

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub pdf: PdfConfig,
    pub agents: AgentsConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug)]
pub struct ApiConfig {
    pub base_url: String,
    pub api_key: SecretString,
    pub page_number_policy: PageNumberPolicy,
}

#[derive(Clone, Debug)]
pub struct PdfConfig {
    /// Executable name or path of the PDF text extractor.
    pub extractor: String,
    /// Where transient downloads are written; system temp dir when unset.
    pub scratch_dir: Option<PathBuf>,
}

#[derive(Clone, Debug)]
pub struct AgentsConfig {
    pub model: String,
    pub agency_directory: Option<PathBuf>,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub api_key: Option<String>,
    pub api_base_url: Option<String>,
    pub page_number_policy: Option<PageNumberPolicy>,
    pub pdf_extractor: Option<String>,
    pub pdf_scratch_dir: Option<PathBuf>,
    pub agents_model: Option<String>,
    pub agency_directory: Option<PathBuf>,
    pub log_level: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig {
                base_url: DEFAULT_BASE_URL.to_string(),
                api_key: String::new().into(),
                page_number_policy: PageNumberPolicy::Reject,
            },
            pdf: PdfConfig { extractor: "pdftotext".to_string(), scratch_dir: None },
            agents: AgentsConfig { model: "gpt-4o".to_string(), agency_directory: None },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

fn secret_value(value: String) -> SecretString {
    value.into()
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected = options.config_path.unwrap_or_else(|| PathBuf::from("regulus.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(api) = patch.api {
            if let Some(base_url) = api.base_url {
                self.api.base_url = base_url;
            }
            if let Some(api_key_value) = api.api_key {
                self.api.api_key = secret_value(api_key_value);
            }
            if let Some(policy) = api.page_number_policy {
                self.api.page_number_policy = policy;
            }
        }

        if let Some(pdf) = patch.pdf {
            if let Some(extractor) = pdf.extractor {
                self.pdf.extractor = extractor;
            }
            if let Some(scratch_dir) = pdf.scratch_dir {
                self.pdf.scratch_dir = Some(scratch_dir);
            }
        }

        if let Some(agents) = patch.agents {
            if let Some(model) = agents.model {
                self.agents.model = model;
            }
            if let Some(agency_directory) = agents.agency_directory {
                self.agents.agency_directory = Some(agency_directory);
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("REGULUS_API_BASE_URL") {
            self.api.base_url = value;
        }
        let api_key = read_env("REGULUS_API_KEY").or_else(|| read_env("RGA_API_KEY"));
        if let Some(value) = api_key {
            self.api.api_key = secret_value(value);
        }
        if let Some(value) = read_env("REGULUS_API_PAGE_NUMBER_POLICY") {
            self.api.page_number_policy = value.parse().map_err(|_| {
                ConfigError::InvalidEnvOverride {
                    key: "REGULUS_API_PAGE_NUMBER_POLICY".to_string(),
                    value: value.clone(),
                }
            })?;
        }

        if let Some(value) = read_env("REGULUS_PDF_EXTRACTOR") {
            self.pdf.extractor = value;
        }
        if let Some(value) = read_env("REGULUS_PDF_SCRATCH_DIR") {
            self.pdf.scratch_dir = Some(PathBuf::from(value));
        }

        if let Some(value) = read_env("REGULUS_AGENTS_MODEL") {
            self.agents.model = value;
        }
        if let Some(value) = read_env("REGULUS_AGENTS_AGENCY_DIRECTORY") {
            self.agents.agency_directory = Some(PathBuf::from(value));
        }

        let log_level =
            read_env("REGULUS_LOGGING_LEVEL").or_else(|| read_env("REGULUS_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("REGULUS_LOGGING_FORMAT").or_else(|| read_env("REGULUS_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(api_key) = overrides.api_key {
            self.api.api_key = secret_value(api_key);
        }
        if let Some(base_url) = overrides.api_base_url {
            self.api.base_url = base_url;
        }
        if let Some(policy) = overrides.page_number_policy {
            self.api.page_number_policy = policy;
        }
        if let Some(extractor) = overrides.pdf_extractor {
            self.pdf.extractor = extractor;
        }
        if let Some(scratch_dir) = overrides.pdf_scratch_dir {
            self.pdf.scratch_dir = Some(scratch_dir);
        }
        if let Some(model) = overrides.agents_model {
            self.agents.model = model;
        }
        if let Some(agency_directory) = overrides.agency_directory {
            self.agents.agency_directory = Some(agency_directory);
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_api(&self.api)?;
        validate_pdf(&self.pdf)?;
        validate_agents(&self.agents)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from("regulus.toml"), PathBuf::from("config/regulus.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    let interpolated = interpolate_env_vars(&raw)?;
    toml::from_str::<ConfigPatch>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next();
            let mut key = String::new();

            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(next) => key.push(next),
                    None => return Err(ConfigError::UnterminatedInterpolation),
                }
            }

            let value = env::var(&key)
                .map_err(|_| ConfigError::MissingEnvInterpolation { var: key.clone() })?;
            output.push_str(&value);
            continue;
        }

        output.push(ch);
    }

    Ok(output)
}

fn validate_api(api: &ApiConfig) -> Result<(), ConfigError> {
    let base_url = api.base_url.trim();
    if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
        return Err(ConfigError::Validation(
            "api.base_url must start with http:// or https://".to_string(),
        ));
    }

    if api.api_key.expose_secret().trim().is_empty() {
        return Err(ConfigError::Validation(
            "api.api_key is required. Set REGULUS_API_KEY (or RGA_API_KEY); keys are issued at https://open.gsa.gov/api/regulationsgov/".to_string(),
        ));
    }

    Ok(())
}

fn validate_pdf(pdf: &PdfConfig) -> Result<(), ConfigError> {
    if pdf.extractor.trim().is_empty() {
        return Err(ConfigError::Validation("pdf.extractor must not be empty".to_string()));
    }

    if let Some(dir) = &pdf.scratch_dir {
        if dir.exists() && !dir.is_dir() {
            return Err(ConfigError::Validation(format!(
                "pdf.scratch_dir `{}` exists but is not a directory",
                dir.display()
            )));
        }
    }

    Ok(())
}

fn validate_agents(agents: &AgentsConfig) -> Result<(), ConfigError> {
    if agents.model.trim().is_empty() {
        return Err(ConfigError::Validation("agents.model must not be empty".to_string()));
    }

    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    api: Option<ApiPatch>,
    pdf: Option<PdfPatch>,
    agents: Option<AgentsPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct ApiPatch {
    base_url: Option<String>,
    api_key: Option<String>,
    page_number_policy: Option<PageNumberPolicy>,
}

#[derive(Debug, Default, Deserialize)]
struct PdfPatch {
    extractor: Option<String>,
    scratch_dir: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
struct AgentsPatch {
    model: Option<String>,
    agency_directory: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}
