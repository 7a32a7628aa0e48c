use {super::HandlerChain, std::fmt};

/// One branch of a [`Composite`](super::Composite).
///
/// Options are checked against the captured parameter value in the order they
/// were given; the first one whose predicate holds runs its chain.
#[derive(Clone, Debug)]
pub enum DispatchOption {
    /// Matches any value.
    Main { chain: HandlerChain },
    /// Matches a non-empty value equal to `literal`, case-sensitively.
    Prefix { literal: String, chain: HandlerChain },
    /// Matches a value that parses as a base-10 `i64`.
    Numeric { chain: HandlerChain },
}

impl DispatchOption {
    /// Builds an option from its flags: `numeric` takes precedence, then a
    /// literal, otherwise the option matches unconditionally.
    ///
    /// ```rust
    /// use axum_approuter::{DispatchOption, Context, chain};
    ///
    /// fn show(_: &mut Context) {}
    ///
    /// let by_id = DispatchOption::new(None, true, chain![show]);
    /// assert!(by_id.check("42"));
    ///
    /// let me = DispatchOption::new(Some("me"), false, chain![show]);
    /// assert!(me.check("me"));
    /// assert!(!me.check("42"));
    /// ```
    pub fn new(literal: Option<&str>, numeric: bool, chain: HandlerChain) -> Self {
        match (literal, numeric) {
            (_, true) => Self::numeric(chain),
            (Some(literal), false) => Self::prefix(literal, chain),
            (None, false) => Self::main(chain),
        }
    }

    pub fn main(chain: HandlerChain) -> Self {
        Self::Main { chain }
    }

    pub fn prefix(literal: impl Into<String>, chain: HandlerChain) -> Self {
        Self::Prefix {
            literal: literal.into(),
            chain,
        }
    }

    pub fn numeric(chain: HandlerChain) -> Self {
        Self::Numeric { chain }
    }

    /// Whether this option accepts the captured value.
    pub fn check(&self, value: &str) -> bool {
        match self {
            Self::Main { .. } => true,
            Self::Prefix { literal, .. } => !value.is_empty() && value == literal,
            // out-of-range integers do not match
            Self::Numeric { .. } => value.parse::<i64>().is_ok(),
        }
    }

    pub fn chain(&self) -> &HandlerChain {
        match self {
            Self::Main { chain } | Self::Prefix { chain, .. } | Self::Numeric { chain } => chain,
        }
    }
}

impl fmt::Display for DispatchOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Main { .. } => f.write_str("main"),
            Self::Prefix { literal, .. } => write!(f, "prefix({literal})"),
            Self::Numeric { .. } => f.write_str("numeric"),
        }
    }
}
