use {
    super::RouteMethod,
    crate::RouteLogLevel,
    std::sync::Arc,
};

/// What the diagnostic sink learns about each registered route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteInfo {
    /// 1-based position of the route within its registration batch.
    pub index: usize,
    /// Number of routes in the batch.
    pub total: usize,
    pub method: RouteMethod,
    /// The pattern as written by the caller.
    pub pattern: String,
    /// Name of the last handler of the chain, usually the endpoint itself.
    pub handler_name: String,
    pub chain_length: usize,
    /// The pattern with positional placeholders, see [`crate::PathPattern::shadow_path`].
    pub shadow_path: String,
}

/// Callback invoked once per route by `AppRouter::register`.
pub type DiagnosticSink = Arc<dyn Fn(&RouteInfo) + Send + Sync>;

/// A sink that writes one `tracing` event per route at the given level.
pub fn tracing_sink(level: RouteLogLevel) -> DiagnosticSink {
    Arc::new(move |info: &RouteInfo| match level {
        RouteLogLevel::Debug => tracing::debug!(
            method = %info.method,
            pattern = %info.pattern,
            shadow = %info.shadow_path,
            handler = %info.handler_name,
            handlers = info.chain_length,
            "[{}/{}] route registered",
            info.index,
            info.total
        ),
        RouteLogLevel::Info => tracing::info!(
            method = %info.method,
            pattern = %info.pattern,
            shadow = %info.shadow_path,
            handler = %info.handler_name,
            handlers = info.chain_length,
            "[{}/{}] route registered",
            info.index,
            info.total
        ),
    })
}
