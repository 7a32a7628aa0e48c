use {
    crate::{Error, Result},
    serde::Deserialize,
    std::{net::SocketAddr, time::Duration},
};

///
/// Configuration for the HTTP server
///
/// Controls where `AppRouter::start` binds, how long it waits for in-flight
/// requests on shutdown, and which of the standard tower-http layers
/// `AppRouter::setup_middleware` installs.
///
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    /// IP address to bind the HTTP server to
    /// The default `bind_addr` is "127.0.0.1".
    #[serde(default = "HttpConfig::default_bind_addr")]
    pub bind_addr: String,

    /// Port to bind the HTTP server to
    /// The default `bind_port` is 3000.
    #[serde(default = "HttpConfig::default_bind_port")]
    pub bind_port: u16,

    /// Maximum time to wait for graceful shutdown to complete.
    /// After this timeout, the server will force shutdown.
    /// By default `shutdown_timeout` is set to 30 seconds.
    #[serde(
        default = "HttpConfig::default_shutdown_timeout",
        with = "humantime_serde"
    )]
    pub shutdown_timeout: Duration,

    /// Whether a panicking handler is turned into a 500 response instead of
    /// tearing down the connection. By default `catch_panic` is true.
    #[serde(default = "HttpConfig::default_true")]
    pub catch_panic: bool,

    /// Whether every request gets a tracing span with method, path and
    /// latency. By default `trace_requests` is true.
    #[serde(default = "HttpConfig::default_true")]
    pub trace_requests: bool,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind_addr: Self::default_bind_addr(),
            bind_port: Self::default_bind_port(),
            shutdown_timeout: Self::default_shutdown_timeout(),
            catch_panic: true,
            trace_requests: true,
        }
    }
}

impl HttpConfig {
    ///
    /// Returns the full bind address as a string in the format "IP:PORT".
    ///
    pub fn full_bind_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.bind_port)
    }

    /// Parses the bind address and port into a socket address.
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        let ip: std::net::IpAddr = self.bind_addr.parse()?;
        Ok(SocketAddr::new(ip, self.bind_port))
    }

    fn default_bind_addr() -> String {
        "127.0.0.1".into()
    }

    fn default_bind_port() -> u16 {
        3000
    }

    fn default_shutdown_timeout() -> Duration {
        Duration::from_secs(30)
    }

    fn default_true() -> bool {
        true
    }

    pub fn validate(&self) -> Result<()> {
        if self.bind_addr.trim().is_empty() {
            return Err(Error::invalid_input(
                "HTTP bind_addr is required. Set [http] bind_addr = \"0.0.0.0\" or \"127.0.0.1\" in config.",
            ));
        }

        if self.bind_addr.parse::<std::net::IpAddr>().is_err() {
            return Err(Error::invalid_input(
                "HTTP bind_addr must be a valid IP address. Examples: \"127.0.0.1\", \"0.0.0.0\", \"::1\"",
            ));
        }

        Ok(())
    }
}
