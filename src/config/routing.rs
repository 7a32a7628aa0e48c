use {crate::Result, serde::Deserialize};

///
/// Configuration for route registration.
///
/// ```toml
/// [routing]
/// log_routes = true
/// route_log_level = "info"
/// strict_trailing_slash = false
/// ```
///
#[derive(Debug, Clone, Deserialize)]
pub struct RoutingConfig {
    /// Whether `AppRouter::register` logs one line per route through `tracing`.
    /// Ignored when a diagnostic sink is installed explicitly.
    /// By default `log_routes` is true.
    #[serde(default = "RoutingConfig::default_log_routes")]
    pub log_routes: bool,

    /// Level used for route registration lines. Defaults to `debug`.
    #[serde(default)]
    pub route_log_level: RouteLogLevel,

    /// When true, `/users` and `/users/` are distinct routes. When false the
    /// trailing slash is dropped from every pattern before registration.
    /// By default `strict_trailing_slash` is true.
    #[serde(default = "RoutingConfig::default_strict_trailing_slash")]
    pub strict_trailing_slash: bool,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            log_routes: Self::default_log_routes(),
            route_log_level: RouteLogLevel::default(),
            strict_trailing_slash: Self::default_strict_trailing_slash(),
        }
    }
}

impl RoutingConfig {
    fn default_log_routes() -> bool {
        true
    }

    fn default_strict_trailing_slash() -> bool {
        true
    }

    pub fn validate(&self) -> Result<()> {
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RouteLogLevel {
    #[default]
    Debug,
    Info,
}
