//! Application configuration management.
//!
//! Configuration is loaded from a YAML file with environment variable overrides. The file
//! path defaults to `config.yaml` but can be specified via `-f` flag or `BREWGATE_CONFIG`.
//!
//! ## Loading priority
//!
//! Sources are merged in order (later sources override earlier ones):
//!
//! 1. **YAML config file** - base configuration (default: `config.yaml`)
//! 2. **Environment variables** - `BREWGATE_`-prefixed, `__` for nesting
//!    (e.g. `BREWGATE_DATABASE__HOST=db.internal`)
//! 3. **Legacy flat variables** - `DB_HOST`, `DB_PORT`, `DB_USER`, `DB_PASS`, `DB_NAME`,
//!    `PORT`, `NODE_ENV`, kept so existing deployments work unchanged
//!
//! ## Example
//!
//! ```bash
//! PORT=3000
//! NODE_ENV=production
//! DB_HOST=db.internal DB_PORT=3306 DB_USER=gateway DB_PASS=secret DB_NAME=mycoffee
//! ```

use clap::Parser;
use figment::{
    Figment,
    providers::{Env, Format, Yaml},
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::errors::Error;

/// Simple CLI args - just for specifying config file
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to configuration file
    #[arg(short = 'f', long, env = "BREWGATE_CONFIG", default_value = "config.yaml")]
    pub config: String,

    /// Validate configuration and exit without starting the server.
    #[arg(long)]
    pub validate: bool,
}

/// Deployment environment, controlling whether error detail is exposed.
///
/// Mirrors the `NODE_ENV` convention: anything other than `production` is treated as a
/// development configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

/// Main application configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// HTTP server host to bind to (e.g., "0.0.0.0" for all interfaces)
    pub host: String,
    /// HTTP server port to bind to
    pub port: u16,
    /// Deployment environment; `production` suppresses driver error detail in responses
    pub environment: Environment,
    /// MySQL connection settings
    pub database: DatabaseConfig,
    /// Upper bound on a single stored-procedure execution (step 4 of the request path).
    /// Exceeding it surfaces as a 504, not a hung request.
    #[serde(with = "humantime_serde")]
    pub statement_timeout: Duration,
    /// CORS settings
    pub cors: CorsConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            environment: Environment::default(),
            database: DatabaseConfig::default(),
            statement_timeout: Duration::from_secs(10),
            cors: CorsConfig::default(),
        }
    }
}

/// MySQL connection settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    /// Database (schema) name holding the stored procedures
    pub name: String,
    /// Connection pool settings
    pub pool: PoolSettings,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 3306,
            user: "root".to_string(),
            password: String::new(),
            name: "mycoffee".to_string(),
            pool: PoolSettings::default(),
        }
    }
}

/// Individual pool configuration with all SQLx parameters.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct PoolSettings {
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Minimum number of idle connections to maintain
    pub min_connections: u32,
    /// Maximum time to wait for a connection (seconds)
    pub acquire_timeout_secs: u64,
    /// Time before idle connections are closed (seconds, 0 = never)
    pub idle_timeout_secs: u64,
    /// Maximum lifetime of a connection (seconds, 0 = never)
    pub max_lifetime_secs: u64,
}

impl Default for PoolSettings {
    /// Production defaults: balanced for reliability and resource usage
    fn default() -> Self {
        Self {
            max_connections: 10,
            min_connections: 0,
            acquire_timeout_secs: 30,
            idle_timeout_secs: 600,  // 10 minutes
            max_lifetime_secs: 1800, // 30 minutes
        }
    }
}

/// CORS configuration. The original deployment allowed any origin; that stays the default.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct CorsConfig {
    /// Allowed origins; "*" for any
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["*".to_string()],
        }
    }
}

impl Config {
    pub fn load(args: &Args) -> Result<Self, figment::Error> {
        let config: Self = Self::figment(args).extract()?;
        config.validate().map_err(|e| figment::Error::from(e.to_string()))?;
        Ok(config)
    }

    pub fn figment(args: &Args) -> Figment {
        Figment::new()
            // Load base config file
            .merge(Yaml::file(&args.config))
            // Environment variables can still override specific values
            .merge(Env::prefixed("BREWGATE_").split("__"))
            // Legacy flat variables used by existing deployments
            .merge(Env::raw().only(&["PORT"]).map(|_| "port".into()))
            .merge(Env::raw().only(&["NODE_ENV"]).map(|_| "environment".into()))
            .merge(Env::raw().only(&["DB_HOST"]).map(|_| "database__host".into()).split("__"))
            .merge(Env::raw().only(&["DB_PORT"]).map(|_| "database__port".into()).split("__"))
            .merge(Env::raw().only(&["DB_USER"]).map(|_| "database__user".into()).split("__"))
            .merge(Env::raw().only(&["DB_PASS"]).map(|_| "database__password".into()).split("__"))
            .merge(Env::raw().only(&["DB_NAME"]).map(|_| "database__name".into()).split("__"))
    }

    /// Validate the configuration for consistency and required fields
    pub fn validate(&self) -> Result<(), Error> {
        if self.database.name.is_empty() {
            return Err(Error::Validation {
                message: "Config validation: database.name must not be empty. \
                     Set DB_NAME or add database.name to the config file."
                    .to_string(),
            });
        }
        if self.database.user.is_empty() {
            return Err(Error::Validation {
                message: "Config validation: database.user must not be empty. \
                     Set DB_USER or add database.user to the config file."
                    .to_string(),
            });
        }
        if self.statement_timeout.is_zero() {
            return Err(Error::Validation {
                message: "Config validation: statement_timeout must be greater than zero".to_string(),
            });
        }
        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Whether driver error detail may be included in error responses
    pub fn expose_error_detail(&self) -> bool {
        self.environment == Environment::Development
    }
}
