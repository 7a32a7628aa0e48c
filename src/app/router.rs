//! Core AppRouter struct and route declaration methods.

use {
    crate::{
        Config, DiagnosticSink, Error, HandlerChain, PathPattern, Result, RouteInfo, RouteMethod,
        routing::{RouteTree, tracing_sink},
    },
    axum::Router,
    std::{fmt, sync::Arc},
};

/// Application router that checks route tables before handing them to axum.
///
/// Routes are declared with [`AppRouter::get`], [`AppRouter::post`] and
/// friends, each taking a pattern such as `/users/:id` and a
/// [`HandlerChain`]. Declared routes are buffered until
/// [`AppRouter::register`] validates the batch, together with every route
/// registered before it, against the single-wildcard-per-level rule and
/// installs it on the inner `axum::Router`. A batch with conflicting routes fails as a whole, with an
/// error naming both patterns and the offending segment.
///
/// ```rust
/// use axum::http::StatusCode;
/// use axum_approuter::{AppRouter, Config, Context, chain};
///
/// fn list_users(ctx: &mut Context) {
///     ctx.text(StatusCode::OK, "[]");
/// }
///
/// fn show_user(ctx: &mut Context) {
///     let id = ctx.param("id").unwrap_or_default().to_owned();
///     ctx.text(StatusCode::OK, id);
/// }
///
/// # fn main() -> axum_approuter::Result<()> {
/// let app = AppRouter::new(Config::builtin())?
///     .get("/users", chain![list_users])?
///     .get("/users/:id", chain![show_user])?
///     .register()?;
///
/// let err = AppRouter::new(Config::builtin())?
///     .get("/users/:id", chain![show_user])?
///     .get("/users/:name", chain![show_user])?
///     .register()
///     .unwrap_err();
/// assert_eq!(err.kind(), axum_approuter::ErrorKind::RouteConflict);
/// # let _ = app;
/// # Ok(())
/// # }
/// ```
pub struct AppRouter {
    pub(crate) config: Config,
    pub(crate) inner: Router,
    pub(crate) pending: Vec<RouteEntry>,
    pub(crate) tree: RouteTree,
    pub(crate) sink: Option<DiagnosticSink>,
    pub(crate) state: RegistrationState,
}

/// Where an [`AppRouter`] stands in its declare/register cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationState {
    /// Routes are being declared and have not reached axum yet.
    Accumulating,
    /// The last batch was registered and nothing has been declared since.
    Registered,
}

/// A declared route waiting for [`AppRouter::register`].
#[derive(Debug, Clone)]
pub struct RouteEntry {
    pub(crate) method: RouteMethod,
    pub(crate) pattern: PathPattern,
    pub(crate) chain: HandlerChain,
}

impl RouteEntry {
    pub fn method(&self) -> RouteMethod {
        self.method
    }

    pub fn pattern(&self) -> &PathPattern {
        &self.pattern
    }

    pub fn chain(&self) -> &HandlerChain {
        &self.chain
    }
}

impl AppRouter {
    /// Creates a new `AppRouter` with the provided configuration.
    ///
    /// When `routing.log_routes` is enabled, every registered route is logged
    /// through `tracing` at `routing.route_log_level`.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration fails validation.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;

        let sink = config
            .routing
            .log_routes
            .then(|| tracing_sink(config.routing.route_log_level));

        Ok(Self {
            config,
            inner: Router::new(),
            pending: Vec::new(),
            tree: RouteTree::default(),
            sink,
            state: RegistrationState::Accumulating,
        })
    }

    /// Replaces the diagnostic sink called for each registered route.
    #[must_use]
    pub fn with_diagnostic_sink<F>(mut self, sink: F) -> Self
    where
        F: Fn(&RouteInfo) + Send + Sync + 'static,
    {
        self.sink = Some(Arc::new(sink));
        self
    }

    /// Turns off route diagnostics, including the configured log sink.
    #[must_use]
    pub fn without_diagnostics(mut self) -> Self {
        self.sink = None;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn state(&self) -> RegistrationState {
        self.state
    }

    /// Routes declared since the last [`AppRouter::register`].
    pub fn pending_routes(&self) -> &[RouteEntry] {
        &self.pending
    }

    /// Declares a route for `method`.
    ///
    /// The route is only buffered; it is checked and handed to axum by
    /// [`AppRouter::register`]. With `routing.strict_trailing_slash` turned
    /// off, a trailing `/` in the pattern is dropped.
    ///
    /// # Errors
    ///
    /// Returns an `EmptyChain` error if `chain` has no handlers and an
    /// `InvalidInput` error if `pattern` cannot be parsed.
    pub fn route(mut self, method: RouteMethod, pattern: &str, chain: HandlerChain) -> Result<Self> {
        if chain.is_empty() {
            return Err(Error::empty_chain(method, pattern));
        }

        let mut pattern = PathPattern::parse(pattern)?;
        if !self.config.routing.strict_trailing_slash {
            pattern = pattern.without_trailing_slash();
        }

        self.pending.push(RouteEntry {
            method,
            pattern,
            chain,
        });
        self.state = RegistrationState::Accumulating;
        Ok(self)
    }

    /// Declares a `GET` route. See [`AppRouter::route`].
    pub fn get(self, pattern: &str, chain: HandlerChain) -> Result<Self> {
        self.route(RouteMethod::Get, pattern, chain)
    }

    /// Declares a `POST` route. See [`AppRouter::route`].
    pub fn post(self, pattern: &str, chain: HandlerChain) -> Result<Self> {
        self.route(RouteMethod::Post, pattern, chain)
    }

    /// Declares a `PUT` route. See [`AppRouter::route`].
    pub fn put(self, pattern: &str, chain: HandlerChain) -> Result<Self> {
        self.route(RouteMethod::Put, pattern, chain)
    }

    /// Declares a `PATCH` route. See [`AppRouter::route`].
    pub fn patch(self, pattern: &str, chain: HandlerChain) -> Result<Self> {
        self.route(RouteMethod::Patch, pattern, chain)
    }

    /// Declares a `DELETE` route. See [`AppRouter::route`].
    pub fn delete(self, pattern: &str, chain: HandlerChain) -> Result<Self> {
        self.route(RouteMethod::Delete, pattern, chain)
    }

    /// Declares an `OPTIONS` route. See [`AppRouter::route`].
    pub fn options(self, pattern: &str, chain: HandlerChain) -> Result<Self> {
        self.route(RouteMethod::Options, pattern, chain)
    }

    /// Declares a `HEAD` route. See [`AppRouter::route`].
    pub fn head(self, pattern: &str, chain: HandlerChain) -> Result<Self> {
        self.route(RouteMethod::Head, pattern, chain)
    }

    /// Declares a route answering every method.
    ///
    /// It conflicts with any method-specific route sharing its pattern.
    pub fn any(self, pattern: &str, chain: HandlerChain) -> Result<Self> {
        self.route(RouteMethod::Any, pattern, chain)
    }
}

impl fmt::Debug for AppRouter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppRouter")
            .field("state", &self.state)
            .field("pending", &self.pending.len())
            .field("diagnostics", &self.sink.is_some())
            .finish_non_exhaustive()
    }
}
