//! Handles settings for the application. Configuration is written in
//! `settings.toml`, and every key can be overridden from the environment,
//! e.g. `CORRIDA_SERVER__PORT=8080` or `CORRIDA_BACKEND__ANON_KEY=...`.
//!
//! See `settings.toml` for the configuration.
use clap::Parser;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

const DEFAULT_CONFIG_PATH: &str = "settings";
const DEFAULT_SESSION_TTL_SECS: i64 = 3600;

#[derive(Debug, Parser)]
#[command(name = "corrida", version, about = "Corrida Rústica Semeando registration site")]
struct Args {
    /// Settings file, with or without the `.toml` extension.
    #[arg(long, env = "CORRIDA_CONFIG")]
    config: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct App {
    pub level: String,
}

impl Default for App {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Server {
    pub bind: String,
    pub port: u16,
    /// Defaults to `http://{bind}:{port}`.
    pub public_url: Option<String>,
    pub secure_cookies: bool,
}

impl Default for Server {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".to_string(),
            port: 3000,
            public_url: None,
            secure_cookies: false,
        }
    }
}

impl Server {
    pub fn address(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }

    pub fn public_url(&self) -> String {
        self.public_url
            .clone()
            .unwrap_or_else(|| format!("http://{}", self.address()))
    }
}

fn default_session_ttl() -> i64 {
    DEFAULT_SESSION_TTL_SECS
}

fn default_table() -> String {
    supabase::DEFAULT_TABLE.to_string()
}

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Backend {
    Supabase {
        url: String,
        anon_key: String,
        #[serde(default = "default_table")]
        table: String,
    },
    Sqlite {
        path: String,
        #[serde(default = "default_session_ttl")]
        session_ttl_secs: i64,
    },
    Memory {
        #[serde(default = "default_session_ttl")]
        session_ttl_secs: i64,
    },
}

impl Default for Backend {
    fn default() -> Self {
        Backend::Memory {
            session_ttl_secs: DEFAULT_SESSION_TTL_SECS,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub app: App,
    #[serde(default)]
    pub server: Server,
    #[serde(default)]
    pub backend: Backend,
}

impl Settings {
    /// Reads the file named by `--config` (or `settings.toml`), then the
    /// `CORRIDA_*` environment.
    pub fn new() -> Result<Self, ConfigError> {
        let args = Args::parse();
        let path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
        Self::from_sources(Config::builder().add_source(File::with_name(path).required(false)))
    }

    fn from_sources(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self, ConfigError> {
        builder
            .add_source(
                Environment::with_prefix("CORRIDA")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}
