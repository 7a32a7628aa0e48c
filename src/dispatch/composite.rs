use {
    super::{Context, DispatchOption, Handler, HandlerChain},
    std::borrow::Cow,
};

/// A handler that re-dispatches on the value of one captured path parameter.
///
/// The router only sees a single wildcard at the composite's position; the
/// composite then picks between several chains depending on what was
/// captured, as if each option were its own route. Option chains may contain
/// further composites, so a route tree of any depth can be expressed with one
/// wildcard per level.
///
/// ```rust
/// use axum::http::StatusCode;
/// use axum_approuter::{Context, DispatchOption, chain, composite};
///
/// fn current_user(ctx: &mut Context) {
///     ctx.text(StatusCode::OK, "me");
/// }
///
/// fn user_by_id(ctx: &mut Context) {
///     let id = ctx.param("user").unwrap_or_default().to_owned();
///     ctx.text(StatusCode::OK, id);
/// }
///
/// fn user_by_name(ctx: &mut Context) {
///     ctx.text(StatusCode::OK, "by name");
/// }
///
/// // GET /users/:user serving /users/me, /users/42 and /users/alice
/// let users = composite(
///     "user",
///     chain![user_by_name],
///     vec![
///         DispatchOption::prefix("me", chain![current_user]),
///         DispatchOption::numeric(chain![user_by_id]),
///     ],
/// );
/// assert_eq!(users.options().len(), 2);
/// ```
#[derive(Clone, Debug)]
pub struct Composite {
    param: String,
    main: HandlerChain,
    options: Vec<DispatchOption>,
}

impl Composite {
    pub fn new(param: impl Into<String>, main: HandlerChain, options: Vec<DispatchOption>) -> Self {
        Self {
            param: param.into(),
            main,
            options,
        }
    }

    pub fn param(&self) -> &str {
        &self.param
    }

    pub fn options(&self) -> &[DispatchOption] {
        &self.options
    }

    /// The chain a captured value dispatches to: the first matching option's,
    /// or the main chain.
    pub fn select(&self, value: &str) -> &HandlerChain {
        self.find(value)
            .map(DispatchOption::chain)
            .unwrap_or(&self.main)
    }

    fn find(&self, value: &str) -> Option<&DispatchOption> {
        self.options.iter().find(|option| option.check(value))
    }
}

impl Handler for Composite {
    fn call(&self, ctx: &mut Context) {
        let value = ctx.param(&self.param).unwrap_or_default();
        let (branch, chain) = match self.find(value) {
            Some(option) => (Cow::Owned(option.to_string()), option.chain()),
            None => (Cow::Borrowed("main"), &self.main),
        };
        tracing::trace!(param = %self.param, value, %branch, "composite dispatch");
        ctx.run_chain(chain);
    }

    fn name(&self) -> Cow<'static, str> {
        Cow::Owned(format!("composite(:{})", self.param))
    }
}

/// Builds a [`Composite`] handler.
pub fn composite(
    param: impl Into<String>,
    main: HandlerChain,
    options: Vec<DispatchOption>,
) -> Composite {
    Composite::new(param, main, options)
}
