use std::collections::HashMap;
use std::env;
use std::path::{Path, PathBuf};

use catalog_core::auth::parse_scopes;
use config_crate::{File, FileFormat, Source};
use thiserror::Error;

/// Directory searched for the optional `config.<env>.yaml` file.
const CONFIG_DIR: &str = "configs";

/// Deployment environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Env {
    Local,
    Dev,
}

impl Env {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Dev => "dev",
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Storage backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    DynamoDb,
    Memory,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value} (expected one of: {expected})")]
    InvalidValue {
        key: &'static str,
        value: String,
        expected: &'static str,
    },
    #[error("failed to read config file: {0}")]
    File(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DynamoDbConfig {
    pub region: String,
    /// Custom endpoint, e.g. `http://localhost:8000`. Honoured only in `local`.
    pub endpoint_override: Option<String>,
    pub shows_table: String,
    pub create_table_if_missing: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CognitoConfig {
    pub user_pool_id: String,
    pub client_id: String,
    pub region: String,
    pub jwks_url: String,
    pub valid_scopes: Vec<String>,
}

/// Application configuration loaded from an optional per-environment YAML
/// file and `APP_*` environment variables, the latter taking precedence.
///
/// Nested keys are separated by `__`, e.g. `APP_DYNAMODB__SHOWSTABLE`
/// overrides `dynamodb.showsTable` from the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub env: Env,
    pub log: LogConfig,
    pub storage: StorageBackend,
    pub dynamodb: DynamoDbConfig,
    pub cognito: CognitoConfig,
}

impl Config {
    /// Load configuration from `configs/config.<env>.yaml` (if present)
    /// overlaid with the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let process = |key: &str| env::var(key).ok();
        let file = read_config_file(&config_file_path(detect_env(&process)))?;
        Self::from_lookup(|key| process(key).or_else(|| file.get(key).cloned()))
    }

    /// Load configuration through `lookup`, which returns the value of an
    /// environment variable if set.
    ///
    /// Environment variables:
    /// - `APP_ENV` - `local` or `dev` (default: detected)
    /// - `APP_LOG__LEVEL` - log level (default: "info")
    /// - `APP_LOG__FORMAT` - `pretty` or `json` (default: "pretty")
    /// - `APP_STORAGE` - `dynamodb` or `memory` (default: "dynamodb")
    /// - `APP_DYNAMODB__REGION` - AWS region (default: "ap-southeast-2")
    /// - `APP_DYNAMODB__ENDPOINTOVERRIDE` - custom endpoint (default: none)
    /// - `APP_DYNAMODB__SHOWSTABLE` - table name (default: "shows-<env>")
    /// - `APP_DYNAMODB__CREATETABLEIFMISSING` - create table at startup (default: false)
    /// - `APP_COGNITO__VALIDSCOPES` - comma- or space-separated scopes
    /// - `APP_COGNITO__USERPOOLID`, `APP_COGNITO__CLIENTID`,
    ///   `APP_COGNITO__REGION`, `APP_COGNITO__JWKSURL`
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let env = detect_env(&lookup);

        let format = match get("APP_LOG__FORMAT").map(|v| v.to_lowercase()).as_deref() {
            None | Some("pretty") => LogFormat::Pretty,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(ConfigError::InvalidValue {
                    key: "APP_LOG__FORMAT",
                    value: other.to_string(),
                    expected: "pretty, json",
                })
            }
        };

        let storage = match get("APP_STORAGE").map(|v| v.to_lowercase()).as_deref() {
            None | Some("dynamodb") => StorageBackend::DynamoDb,
            Some("memory") => StorageBackend::Memory,
            Some(other) => {
                return Err(ConfigError::InvalidValue {
                    key: "APP_STORAGE",
                    value: other.to_string(),
                    expected: "dynamodb, memory",
                })
            }
        };

        let create_table_if_missing = match get("APP_DYNAMODB__CREATETABLEIFMISSING")
            .map(|v| v.to_lowercase())
            .as_deref()
        {
            None | Some("false") | Some("0") => false,
            Some("true") | Some("1") => true,
            Some(other) => {
                return Err(ConfigError::InvalidValue {
                    key: "APP_DYNAMODB__CREATETABLEIFMISSING",
                    value: other.to_string(),
                    expected: "true, false",
                })
            }
        };

        Ok(Self {
            env,
            log: LogConfig {
                level: get("APP_LOG__LEVEL").unwrap_or_else(|| "info".to_string()),
                format,
            },
            storage,
            dynamodb: DynamoDbConfig {
                region: get("APP_DYNAMODB__REGION")
                    .unwrap_or_else(|| "ap-southeast-2".to_string()),
                endpoint_override: get("APP_DYNAMODB__ENDPOINTOVERRIDE"),
                shows_table: get("APP_DYNAMODB__SHOWSTABLE")
                    .unwrap_or_else(|| format!("shows-{}", env.as_str())),
                create_table_if_missing,
            },
            cognito: CognitoConfig {
                user_pool_id: get("APP_COGNITO__USERPOOLID").unwrap_or_default(),
                client_id: get("APP_COGNITO__CLIENTID").unwrap_or_default(),
                region: get("APP_COGNITO__REGION").unwrap_or_default(),
                jwks_url: get("APP_COGNITO__JWKSURL").unwrap_or_default(),
                valid_scopes: get("APP_COGNITO__VALIDSCOPES")
                    .map(|v| parse_scopes(&v))
                    .unwrap_or_default(),
            },
        })
    }

    /// Endpoint override to apply, if any. Ignored outside `local`.
    pub fn endpoint_override(&self) -> Option<&str> {
        match self.env {
            Env::Local => self.dynamodb.endpoint_override.as_deref(),
            Env::Dev => None,
        }
    }

    /// Default tracing filter for the configured level.
    pub fn default_log_filter(&self) -> String {
        format!("catalog={0},tower_http={0}", self.log.level)
    }
}

/// Path of the optional config file for `env`.
pub fn config_file_path(env: Env) -> PathBuf {
    Path::new(CONFIG_DIR).join(format!("config.{}.yaml", env.as_str()))
}

/// Read an optional YAML config file. A missing file yields no values.
fn read_config_file(path: &Path) -> Result<HashMap<String, String>, ConfigError> {
    file_values(File::from(path).format(FileFormat::Yaml).required(false))
}

/// Flatten a config source into `APP_*` keys, e.g. `dynamodb.showsTable`
/// becomes `APP_DYNAMODB__SHOWSTABLE`. Lists are joined with commas.
///
/// The environment is never taken from a file.
fn file_values<S>(source: S) -> Result<HashMap<String, String>, ConfigError>
where
    S: Source + Send + Sync + 'static,
{
    let root: serde_json::Value = config_crate::Config::builder()
        .add_source(source)
        .build()
        .and_then(|config| config.try_deserialize())
        .map_err(|e| ConfigError::File(e.to_string()))?;

    let mut values = HashMap::new();
    if let serde_json::Value::Object(map) = &root {
        for (key, value) in map {
            flatten_value(format!("APP_{}", key.to_uppercase()), value, &mut values);
        }
    }
    values.remove("APP_ENV");
    Ok(values)
}

fn flatten_value(key: String, value: &serde_json::Value, out: &mut HashMap<String, String>) {
    match value {
        serde_json::Value::Null => {}
        serde_json::Value::Object(map) => {
            for (child, value) in map {
                flatten_value(format!("{key}__{}", child.to_uppercase()), value, out);
            }
        }
        serde_json::Value::Array(items) => {
            let joined = items.iter().map(scalar_string).collect::<Vec<_>>().join(",");
            out.insert(key, joined);
        }
        scalar => {
            out.insert(key, scalar_string(scalar));
        }
    }
}

fn scalar_string(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// `APP_ENV` when it names a known environment; otherwise `dev` when running
/// on ECS or Lambda, and `local` elsewhere.
fn detect_env<F>(lookup: &F) -> Env
where
    F: Fn(&str) -> Option<String>,
{
    let explicit = lookup("APP_ENV").map(|v| v.trim().to_lowercase());
    match explicit.as_deref() {
        Some("dev") => return Env::Dev,
        Some("local") => return Env::Local,
        _ => {}
    }

    let present = |key: &str| lookup(key).is_some_and(|v| !v.is_empty());
    if present("ECS_CONTAINER_METADATA_URI") || present("AWS_EXECUTION_ENV") {
        Env::Dev
    } else {
        Env::Local
    }
}
