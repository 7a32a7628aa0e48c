//! Registration, composition and serving methods for AppRouter.

use {
    super::{
        router::{AppRouter, RegistrationState, RouteEntry},
        shutdown::shutdown_signal,
    },
    crate::{Context, Error, ErrorKind, Result, RouteInfo},
    axum::{
        Router,
        body::Body,
        extract::Request,
        http,
        routing::Route,
    },
    std::{
        convert::Infallible,
        future::Future,
        panic::{AssertUnwindSafe, catch_unwind},
    },
    tokio::{net::TcpListener, sync::watch},
    tower::{Layer, Service},
};

impl AppRouter {
    /// Checks the routes declared since the last call and installs them on the
    /// inner `axum::Router`.
    ///
    /// Routes are processed in declaration order. Each one is checked against
    /// every route before it, including those of earlier batches, then
    /// translated to axum's path syntax, added to the inner router and
    /// reported to the diagnostic sink. Calling `register` with nothing
    /// declared leaves the router untouched.
    ///
    /// # Errors
    ///
    /// Returns a `RouteConflict` error for the first route that cannot coexist
    /// with an earlier one. The router is consumed, so no route of the failed
    /// batch is ever served.
    pub fn register(mut self) -> Result<Self> {
        if self.pending.is_empty() {
            return Ok(self);
        }

        let entries = std::mem::take(&mut self.pending);
        let total = entries.len();

        for (position, entry) in entries.into_iter().enumerate() {
            self.tree
                .insert(entry.method, &entry.pattern)
                .map_err(Error::route_conflict)?;

            let info = self.sink.as_ref().map(|_| route_info(&entry, position + 1, total));
            self.inner = install(self.inner, &entry)?;

            if let (Some(sink), Some(info)) = (&self.sink, info) {
                sink(&info);
            }
        }

        self.state = RegistrationState::Registered;
        Ok(self)
    }

    /// Adds a custom Tower middleware layer to the inner router.
    ///
    /// Like `axum::Router::layer`, the layer only wraps routes that are
    /// already installed, so call [`AppRouter::register`] first.
    #[must_use]
    pub fn layer<L>(mut self, layer: L) -> Self
    where
        L: Layer<Route> + Clone + Send + Sync + 'static,
        L::Service: Service<http::Request<Body>> + Clone + Send + Sync + 'static,
        <L::Service as Service<http::Request<Body>>>::Response: axum::response::IntoResponse + 'static,
        <L::Service as Service<http::Request<Body>>>::Error: Into<Infallible> + 'static,
        <L::Service as Service<http::Request<Body>>>::Future: Send + 'static,
    {
        self.inner = self.inner.layer(layer);
        self
    }

    /// Merges a plain `axum::Router` into this one.
    ///
    /// Routes merged this way bypass conflict detection; axum still rejects
    /// overlapping routes by panicking.
    #[must_use]
    pub fn merge(mut self, other: Router) -> Self {
        self.inner = self.inner.merge(other);
        self
    }

    /// Returns the inner `axum::Router`.
    ///
    /// Routes that were declared but not registered are dropped with a warning.
    pub fn into_inner(self) -> Router {
        if !self.pending.is_empty() {
            tracing::warn!(
                pending = self.pending.len(),
                "router taken with unregistered routes; call register() first"
            );
        }
        self.inner
    }

    /// Binds `http.bind_addr:http.bind_port` and serves until SIGINT or SIGTERM.
    ///
    /// Pending routes are registered first. After a shutdown signal the server
    /// stops accepting connections and waits up to `http.shutdown_timeout` for
    /// in-flight requests to finish.
    ///
    /// ```rust,no_run
    /// use axum::http::StatusCode;
    /// use axum_approuter::{AppRouter, Config, Context, chain};
    ///
    /// fn hello(ctx: &mut Context) {
    ///     ctx.text(StatusCode::OK, "Hello, World!");
    /// }
    ///
    /// #[tokio::main]
    /// async fn main() -> axum_approuter::Result<()> {
    ///     let config = Config::default();
    ///     config.setup_tracing();
    ///
    ///     AppRouter::new(config)?
    ///         .get("/", chain![hello])?
    ///         .setup_middleware()?
    ///         .start()
    ///         .await
    /// }
    /// ```
    ///
    /// # Errors
    ///
    /// Returns an error if registration fails, the address cannot be bound, or
    /// the server fails while running.
    pub async fn start(self) -> Result<()> {
        let bind_addr = self.config.http.socket_addr()?;
        let listener = TcpListener::bind(bind_addr).await?;
        self.serve(listener).await
    }

    /// Serves on an already bound listener until SIGINT or SIGTERM.
    pub async fn serve(self, listener: TcpListener) -> Result<()> {
        self.serve_with_shutdown(listener, shutdown_signal()).await
    }

    /// Serves on `listener` until `signal` completes, then shuts down
    /// gracefully within `http.shutdown_timeout`.
    pub async fn serve_with_shutdown<F>(self, listener: TcpListener, signal: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let router = self.register()?;
        let shutdown_timeout = router.config.http.shutdown_timeout;

        tracing::info!("Bound to {}", listener.local_addr()?);
        tracing::info!("Waiting for connections");

        let (initiated_tx, mut initiated_rx) = watch::channel(false);
        let serve_future = axum::serve(listener, router.inner.into_make_service())
            .with_graceful_shutdown(async move {
                signal.await;
                tracing::info!(
                    "Shutdown signal received, starting graceful shutdown (timeout: {}s)",
                    shutdown_timeout.as_secs()
                );
                initiated_tx.send_replace(true);
            });

        // The grace period starts counting only once shutdown has begun.
        tokio::select! {
            result = serve_future => {
                result?;
                tracing::info!("Graceful shutdown completed");
            }
            _ = async {
                let initiated = initiated_rx.wait_for(|initiated| *initiated).await.is_ok();
                if !initiated {
                    std::future::pending::<()>().await;
                }
                tokio::time::sleep(shutdown_timeout).await;
            } => {
                tracing::warn!("Graceful shutdown timeout expired, forcing shutdown");
            }
        }

        Ok(())
    }
}

fn route_info(entry: &RouteEntry, index: usize, total: usize) -> RouteInfo {
    RouteInfo {
        index,
        total,
        method: entry.method,
        pattern: entry.pattern.as_str().to_owned(),
        handler_name: entry.chain.last_name().unwrap_or_default().into_owned(),
        chain_length: entry.chain.len(),
        shadow_path: entry.pattern.shadow_path(),
    }
}

/// Adds one route to `router`. Routes merged in with [`AppRouter::merge`]
/// are unknown to the conflict check, so axum may still reject a route; its
/// panic is turned into an error.
fn install(router: Router, entry: &RouteEntry) -> Result<Router> {
    let path = entry.pattern.to_axum_path();
    let chain = entry.chain.clone();
    let method_router = entry.method.method_router(move |request: Request| async move {
        Context::from_request(request, chain).await.run()
    });

    catch_unwind(AssertUnwindSafe(move || router.route(&path, method_router))).map_err(|panic| {
        let reason = panic
            .downcast_ref::<String>()
            .map(String::as_str)
            .or_else(|| panic.downcast_ref::<&str>().copied())
            .unwrap_or("axum rejected the route");
        Error::new(
            ErrorKind::RouteConflict,
            format!("{} {}: {reason}", entry.method, entry.pattern),
        )
    })
}
