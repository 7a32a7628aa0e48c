//! Request tracing and panic recovery.

use {
    super::router::AppRouter,
    crate::Result,
    axum::{
        body::Body,
        http::{Request, Response, StatusCode, header},
    },
    tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer},
};

impl AppRouter {
    /// Registers pending routes and installs the middleware enabled in the
    /// configuration: request tracing (`http.trace_requests`) and panic
    /// recovery (`http.catch_panic`, outermost).
    ///
    /// Layers wrap only the routes installed at this point; routes registered
    /// afterwards are served without them.
    ///
    /// # Errors
    ///
    /// Returns an error if registering the pending routes fails.
    pub fn setup_middleware(self) -> Result<Self> {
        const PACKAGE_NAME: &str = env!("CARGO_PKG_NAME");
        const VERSION: &str = env!("CARGO_PKG_VERSION");
        tracing::info!("Starting {PACKAGE_NAME} version {VERSION}...");

        Ok(self.register()?.setup_logging().setup_catch_panic())
    }

    /// Wraps registered routes in a `tower_http` trace layer that opens an
    /// `http_request` span per request.
    #[must_use]
    pub fn setup_logging(mut self) -> Self {
        if !self.config.http.trace_requests {
            return self;
        }

        self.inner = self.inner.layer(TraceLayer::new_for_http().make_span_with(
            |request: &Request<Body>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                )
            },
        ));
        self
    }

    /// Turns a panicking handler into a `500 Internal Server Error` response.
    #[must_use]
    pub fn setup_catch_panic(mut self) -> Self {
        if !self.config.http.catch_panic {
            return self;
        }

        self.inner = self.inner.layer(CatchPanicLayer::custom(
            |err: Box<dyn std::any::Any + Send + 'static>| {
                let msg = if let Some(s) = err.downcast_ref::<String>() {
                    s.clone()
                } else if let Some(s) = err.downcast_ref::<&str>() {
                    (*s).to_owned()
                } else {
                    "`CatchPanic` was unable to downcast the panic info".to_owned()
                };
                tracing::error!("Service panicked: {}", msg);

                Response::builder()
                    .status(StatusCode::INTERNAL_SERVER_ERROR)
                    .header(header::CONTENT_TYPE, "text/plain; charset=utf-8")
                    .body("Internal Server Error".to_owned())
                    .unwrap_or_else(|_| Response::new("Internal Server Error".to_owned()))
            },
        ));
        self
    }
}
