use {
    super::Context,
    std::{borrow::Cow, fmt, sync::Arc},
};

/// A step in a request's handler chain.
///
/// Handlers are synchronous: they read the request from the [`Context`], write
/// a response into it, and may call [`Context::next`] to run the rest of the
/// chain in the middle of their own work or [`Context::abort`] to stop it.
///
/// Every `Fn(&mut Context) + Send + Sync + 'static` is a handler.
pub trait Handler: Send + Sync + 'static {
    fn call(&self, ctx: &mut Context);

    /// Name reported in route diagnostics.
    fn name(&self) -> Cow<'static, str> {
        Cow::Borrowed(std::any::type_name::<Self>())
    }
}

impl<F> Handler for F
where
    F: Fn(&mut Context) + Send + Sync + 'static,
{
    fn call(&self, ctx: &mut Context) {
        self(ctx)
    }
}

/// Pins a closure to the handler signature so its argument type is inferred.
///
/// ```rust
/// use axum::http::StatusCode;
/// use axum_approuter::{chain, handler_fn};
///
/// let chain = chain![handler_fn(|ctx| ctx.text(StatusCode::OK, "pong"))];
/// assert_eq!(chain.len(), 1);
/// ```
pub fn handler_fn<F>(f: F) -> F
where
    F: Fn(&mut Context) + Send + Sync + 'static,
{
    f
}

/// An ordered, immutable list of handlers shared by every request of a route.
#[derive(Clone, Default)]
pub struct HandlerChain(Arc<[Arc<dyn Handler>]>);

impl HandlerChain {
    pub fn new(handlers: Vec<Arc<dyn Handler>>) -> Self {
        Self(handlers.into())
    }

    /// A chain made of one handler.
    pub fn single(handler: impl Handler) -> Self {
        Self::new(vec![Arc::new(handler)])
    }

    /// Returns a new chain with `handler` appended.
    #[must_use]
    pub fn then(&self, handler: impl Handler) -> Self {
        self.iter()
            .cloned()
            .chain(std::iter::once(Arc::new(handler) as Arc<dyn Handler>))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Arc<dyn Handler>> {
        self.0.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Handler>> {
        self.0.iter()
    }

    /// Name of the final handler, the one that normally produces the response.
    pub fn last_name(&self) -> Option<Cow<'static, str>> {
        self.0.last().map(|handler| handler.name())
    }
}

impl FromIterator<Arc<dyn Handler>> for HandlerChain {
    fn from_iter<I: IntoIterator<Item = Arc<dyn Handler>>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Debug for HandlerChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.0.iter().map(|handler| handler.name()))
            .finish()
    }
}

/// Builds a [`HandlerChain`] from handler expressions.
///
/// ```rust
/// use axum_approuter::{Context, chain};
///
/// fn auth(ctx: &mut Context) {
///     if ctx.headers().get("authorization").is_none() {
///         ctx.abort_with_status(axum::http::StatusCode::UNAUTHORIZED);
///     }
/// }
///
/// fn index(ctx: &mut Context) {
///     ctx.text(axum::http::StatusCode::OK, "hello");
/// }
///
/// let chain = chain![auth, index];
/// assert_eq!(chain.len(), 2);
/// ```
#[macro_export]
macro_rules! chain {
    () => {
        $crate::HandlerChain::default()
    };
    ($($handler:expr),+ $(,)?) => {
        $crate::HandlerChain::new(::std::vec![
            $(::std::sync::Arc::new($handler) as ::std::sync::Arc<dyn $crate::Handler>),+
        ])
    };
}
