use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

const DEFAULT_PORT: u16 = 5000;
const DEFAULT_DATABASE: &str = "devotions.db";

#[derive(Parser, Debug)]
#[command(name = "devotions")]
#[command(about = "Serves daily devotional readings over HTTP", long_about = None)]
pub struct Cli {
    #[arg(short = 'c', long = "config")]
    pub config_path: Option<String>,
    #[arg(short = 'p', long = "port")]
    pub port: Option<u16>,
}

pub fn default_config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".devotions")
}

pub fn default_config_path() -> PathBuf {
    default_config_dir().join("config.yaml")
}

/// Resolves the config file and the directory a local database lives in.
/// An explicit path puts data next to the config file, otherwise
/// `~/.devotions/` holds both.
pub fn resolve_paths(config_path: Option<&str>) -> (PathBuf, PathBuf) {
    match config_path {
        Some(path) => {
            let path = PathBuf::from(path);
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map(|p| p.to_path_buf())
                .unwrap_or_else(|| PathBuf::from("."));
            (path, dir)
        }
        None => (default_config_path(), default_config_dir()),
    }
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_database() -> String {
    DEFAULT_DATABASE.to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct App {
    #[serde(default = "default_database")]
    database: String,
    #[serde(default = "default_port")]
    port: u16,
    #[serde(default)]
    pub remote_url: Option<String>,
    #[serde(default)]
    pub remote_auth_token: Option<String>,
}

impl Default for App {
    fn default() -> Self {
        App {
            database: default_database(),
            port: DEFAULT_PORT,
            remote_url: None,
            remote_auth_token: None,
        }
    }
}

impl App {
    pub fn get_db(&self) -> &str {
        &self.database
    }

    pub fn get_port(&self) -> u16 {
        self.port
    }

    pub fn set_port(&mut self, port: u16) {
        self.port = port;
    }

    /// Remote mode needs both the url and the token.
    pub fn remote(&self) -> Option<(&str, &str)> {
        match (non_empty(&self.remote_url), non_empty(&self.remote_auth_token)) {
            (Some(url), Some(token)) => Some((url, token)),
            _ => None,
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct Config {
    pub app: App,
}

impl Config {
    /// Reads the YAML file at `path` if it exists, falling back to the
    /// process environment.
    pub fn load(path: &Path) -> Result<Self> {
        if path.exists() {
            Config::load_config(path)
        } else {
            tracing::info!(path = ?path, "config file not found, reading environment");
            Config::from_env()
        }
    }

    pub fn from_env() -> Result<Self> {
        let port = match env::var("PORT") {
            Ok(port) if !port.trim().is_empty() => port
                .trim()
                .parse()
                .with_context(|| format!("invalid PORT value {port:?}"))?,
            _ => DEFAULT_PORT,
        };

        Ok(Config {
            app: App {
                database: env::var("DATABASE_PATH").unwrap_or_else(|_| default_database()),
                port,
                remote_url: env::var("LIBSQL_URL").ok(),
                remote_auth_token: env::var("LIBSQL_AUTH_TOKEN").ok(),
            },
        })
    }

    fn load_config(path: &Path) -> Result<Config> {
        let yaml_str = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Config::from_yaml(&yaml_str)
    }

    pub fn from_yaml(yaml_str: &str) -> Result<Config> {
        let yaml_with_env = Config::substitute_env_vars(yaml_str);
        let config: Config = serde_yaml::from_str(&yaml_with_env)?;
        Ok(config)
    }

    fn substitute_env_vars(yaml_str: &str) -> String {
        let mut result = yaml_str.to_string();
        let mut offset = 0;

        while let Some(start) = result[offset..].find("${") {
            let actual_start = offset + start;
            let Some(end) = result[actual_start..].find('}') else {
                break;
            };
            let var_name = &result[actual_start + 2..actual_start + end];

            // ${VAR:-default}
            let env_value = if let Some(default_start) = var_name.find(":-") {
                let actual_var = &var_name[..default_start];
                let default_val = &var_name[default_start + 2..];
                env::var(actual_var).unwrap_or_else(|_| default_val.to_string())
            } else {
                env::var(var_name).unwrap_or_else(|_| {
                    tracing::warn!("environment variable '{}' not found", var_name);
                    String::new()
                })
            };

            result.replace_range(actual_start..actual_start + end + 1, &env_value);
            offset = actual_start + env_value.len();
        }

        result
    }
}
