// Configuration loading and parsing (planner.toml).

use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::Url;
use serde::Deserialize;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// Assembled Config
// ---------------------------------------------------------------------------

/// Resolved configuration. URLs are parsed and joined at load time so the
/// rest of the program never handles raw strings.
#[derive(Debug, Clone)]
pub struct Config {
    pub service: ServiceConfig,
    /// `None` when the `[auth]` section is absent: no session detection.
    pub auth: Option<AuthConfig>,
}

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Full URL the trip request is POSTed to.
    pub plan_url: Url,
    /// `None` waits for the service indefinitely.
    pub request_timeout: Option<Duration>,
}

#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub base_url: Url,
}

// ---------------------------------------------------------------------------
// planner.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for planner.toml.
#[derive(Debug, Clone, Deserialize)]
struct PlannerFile {
    service: ServiceSection,
    #[serde(default)]
    auth: Option<AuthSection>,
}

#[derive(Debug, Clone, Deserialize)]
struct ServiceSection {
    base_url: String,
    plan_path: String,
    #[serde(default)]
    request_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
struct AuthSection {
    base_url: String,
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate configuration from `config/planner.toml` relative to
/// `base_dir`. Does not seed defaults; see [`load_config`].
pub(crate) fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = base_dir.join("config").join("planner.toml");
    let text = read_file(&path)?;
    parse_config(&text).map_err(|e| match e {
        ParseFailure::Toml(source) => ConfigError::ParseError { path, source },
        ParseFailure::Invalid(err) => err,
    })
}

enum ParseFailure {
    Toml(toml::de::Error),
    Invalid(ConfigError),
}

fn parse_config(text: &str) -> Result<Config, ParseFailure> {
    let file: PlannerFile = toml::from_str(text).map_err(ParseFailure::Toml)?;
    resolve(file).map_err(ParseFailure::Invalid)
}

/// Validate the raw file and resolve it into a [`Config`].
fn resolve(file: PlannerFile) -> Result<Config, ConfigError> {
    let base = parse_http_url("service.base_url", &file.service.base_url)?;

    if !file.service.plan_path.starts_with('/') {
        return Err(ConfigError::ValidationError {
            field: "service.plan_path".into(),
            message: format!("must start with '/', got {:?}", file.service.plan_path),
        });
    }
    let plan_url = append_path(&base, &file.service.plan_path);

    let request_timeout = match file.service.request_timeout_secs {
        Some(0) => {
            return Err(ConfigError::ValidationError {
                field: "service.request_timeout_secs".into(),
                message: "must be > 0 (remove the key to disable the timeout)".into(),
            })
        }
        Some(secs) => Some(Duration::from_secs(secs)),
        None => None,
    };

    let auth = match file.auth {
        Some(section) => Some(AuthConfig {
            base_url: parse_http_url("auth.base_url", &section.base_url)?,
        }),
        None => None,
    };

    Ok(Config {
        service: ServiceConfig {
            plan_url,
            request_timeout,
        },
        auth,
    })
}

/// Ensure all config files exist by copying missing ones from `defaults/`.
/// Returns the list of files that were copied. Skips `.example` files.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let defaults_dir = base_dir.join("defaults");
    let config_dir = base_dir.join("config");

    if !defaults_dir.exists() {
        if !config_dir.exists() {
            return Err(ConfigError::DefaultsCopyError {
                message: format!(
                    "neither defaults/ nor config/ directory found in {}; \
                     run from the crate root or ensure defaults/ is present",
                    base_dir.display()
                ),
            });
        }
        return Ok(vec![]);
    }

    std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to create config directory: {e}"),
    })?;

    let mut copied = Vec::new();

    let entries = std::fs::read_dir(&defaults_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to read defaults directory: {e}"),
    })?;

    for entry in entries {
        let entry = entry.map_err(|e| ConfigError::DefaultsCopyError {
            message: format!("failed to read defaults entry: {e}"),
        })?;
        let path = entry.path();

        if !path.is_file() {
            continue;
        }
        let Some(file_name) = path.file_name() else {
            continue;
        };
        if file_name.to_str().is_some_and(|n| n.ends_with(".example")) {
            continue;
        }
        let target = config_dir.join(file_name);

        match std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&target)
        {
            Ok(mut dest) => {
                let content = std::fs::read(&path).map_err(|e| ConfigError::DefaultsCopyError {
                    message: format!("failed to read {}: {e}", path.display()),
                })?;
                std::io::Write::write_all(&mut dest, &content).map_err(|e| {
                    ConfigError::DefaultsCopyError {
                        message: format!("failed to write {}: {e}", target.display()),
                    }
                })?;
                copied.push(target);
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                // User's copy wins.
            }
            Err(e) => {
                return Err(ConfigError::DefaultsCopyError {
                    message: format!("failed to create {}: {e}", target.display()),
                });
            }
        }
    }

    Ok(copied)
}

/// Convenience wrapper: loads config relative to the current working directory.
/// Ensures default config files are copied before loading.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    ensure_config_files(&cwd)?;
    load_config_from(&cwd)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

/// Append `path` to whatever path `base` already has, keeping a base like
/// `https://host/prefix` intact (unlike `Url::join` with an absolute path).
pub(crate) fn append_path(base: &Url, path: &str) -> Url {
    let mut url = base.clone();
    let joined = format!("{}{}", base.path().trim_end_matches('/'), path);
    url.set_path(&joined);
    url
}

fn parse_http_url(field: &str, raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw).map_err(|e| ConfigError::ValidationError {
        field: field.into(),
        message: format!("invalid URL {raw:?}: {e}"),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::ValidationError {
            field: field.into(),
            message: format!("must be an http(s) URL, got scheme {:?}", url.scheme()),
        });
    }
    Ok(url)
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
