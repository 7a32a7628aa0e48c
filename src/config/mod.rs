//!
//! Configuration for the router, the HTTP server and logging.
//!
//! A configuration can be created in several ways:
//! - From an environment-specific TOML file via `Config::from_rust_env` or `Config::from_toml_file`
//! - From a TOML string via `Config::from_toml` or `str::parse`
//! - Constructed programmatically via the `with_*` builder methods on `Config`
//!
//! In both TOML-based methods, environment variables can be referenced using the
//! `{{ VAR_NAME }}` syntax. They are substituted before the TOML is parsed, so
//! addresses and ports can vary per deployment without editing the files.
//!
//! Sections:
//!
//! - `HttpConfig` for server binding, shutdown and standard layers
//! - `RoutingConfig` for route registration diagnostics and trailing slashes
//! - `LoggingConfig` for the tracing output format
//!
mod http;
mod logging;
mod routing;

pub use http::*;
pub use logging::*;
pub use routing::*;

use {
    crate::{Error, Result},
    regex::{Captures, Regex},
    serde::Deserialize,
    std::{env, fs, str::FromStr, sync::LazyLock, time::Duration},
};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub routing: RoutingConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for Config {
    ///
    /// Creates a default configuration.
    /// This will attempt to load configuration from the file based on the RUST_ENV
    /// environment variable falling back to a default configuration if the variable
    /// is not set or the file cannot be read. Configuration files should be located
    /// in the "config/" directory of your project.
    ///
    fn default() -> Self {
        Self::from_rust_env().unwrap_or_else(|_| Self::builtin())
    }
}

impl Config {
    /// Configuration made only of built-in defaults, ignoring RUST_ENV.
    pub fn builtin() -> Self {
        Config {
            http: HttpConfig::default(),
            routing: RoutingConfig::default(),
            logging: LoggingConfig::default(),
        }
    }

    ///
    /// Loads the configuration from `config/{RUST_ENV}.toml`.
    ///
    pub fn from_rust_env() -> Result<Config> {
        Self::from_toml_file(env::var("RUST_ENV")?)
    }

    ///
    /// Given an environment name, loads "config/{env}.toml", substitutes
    /// environment variables and parses the result.
    ///
    pub fn from_toml_file(env: impl AsRef<str>) -> Result<Config> {
        let path = format!("config/{}.toml", env.as_ref());
        let text = fs::read_to_string(path)?;
        Self::from_toml(&text)
    }

    ///
    /// Parses a configuration string in TOML format into a Config struct.
    ///
    pub fn from_toml(toml_str: &str) -> Result<Config> {
        toml_str.parse()
    }

    /// Sets the HTTP server bind address.
    pub fn with_bind_addr<S: AsRef<str>>(mut self, addr: S) -> Self {
        self.http.bind_addr = addr.as_ref().into();
        self
    }

    /// Sets the HTTP server bind port.
    pub fn with_bind_port(mut self, port: u16) -> Self {
        self.http.bind_port = port;
        self
    }

    /// Sets the graceful shutdown timeout.
    pub fn with_shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.http.shutdown_timeout = timeout;
        self
    }

    /// Enables or disables the panic catching layer.
    pub fn with_catch_panic(mut self, enable: bool) -> Self {
        self.http.catch_panic = enable;
        self
    }

    /// Enables or disables per-request tracing spans.
    pub fn with_trace_requests(mut self, enable: bool) -> Self {
        self.http.trace_requests = enable;
        self
    }

    /// Enables or disables route registration logging.
    pub fn with_log_routes(mut self, enable: bool) -> Self {
        self.routing.log_routes = enable;
        self
    }

    /// Sets the level of route registration log lines.
    pub fn with_route_log_level(mut self, level: RouteLogLevel) -> Self {
        self.routing.route_log_level = level;
        self
    }

    /// Chooses whether trailing slashes distinguish routes.
    pub fn with_strict_trailing_slash(mut self, strict: bool) -> Self {
        self.routing.strict_trailing_slash = strict;
        self
    }

    /// Sets the log format of the LoggingConfig.
    pub fn with_log_format(mut self, format: LogFormat) -> Self {
        self.logging.format = format;
        self
    }

    /// Ensures that the configuration is valid.
    pub fn validate(&self) -> Result<()> {
        self.http.validate()?;
        self.routing.validate()?;
        self.logging.validate()?;
        Ok(())
    }

    ///
    /// Sets up the tracing subscriber for logging based on the LoggingConfig.
    ///
    /// NOTE: This should be called early during startup so that route
    ///       registration lines are not lost.
    ///
    pub fn setup_tracing(&self) {
        use tracing_subscriber::{EnvFilter, prelude::*};
        let env_filter = EnvFilter::from_default_env();
        let registry = tracing_subscriber::registry().with(env_filter);
        let _ = match self.logging.format {
            LogFormat::Json => registry
                .with(tracing_subscriber::fmt::layer().json())
                .try_init(),
            LogFormat::Default => registry.with(tracing_subscriber::fmt::layer()).try_init(),
            LogFormat::Compact => registry
                .with(tracing_subscriber::fmt::layer().compact())
                .try_init(),
            LogFormat::Pretty => registry
                .with(tracing_subscriber::fmt::layer().pretty())
                .try_init(),
        };
    }
}

/// Matches `{{ VAR_NAME }}` references; names are upper-case env var names.
static ENV_REFERENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{\s*([A-Z0-9_]+)\s*\}\}").expect("valid regex"));

/// Replaces every `{{ VAR_NAME }}` in `input` with the value of that
/// environment variable. Unset variables become empty strings and are
/// reported at `warn`.
pub fn substitute_env_vars(input: &str) -> String {
    ENV_REFERENCE
        .replace_all(input, |caps: &Captures| {
            let name = &caps[1];
            env::var(name).unwrap_or_else(|_| {
                tracing::warn!(variable = %name, "Environment variable not set, using empty string");
                String::new()
            })
        })
        .into_owned()
}

impl FromStr for Config {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self> {
        let config = toml::from_str::<Config>(&substitute_env_vars(s))?;
        Ok(config)
    }
}
