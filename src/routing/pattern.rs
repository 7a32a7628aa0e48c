//! Route pattern parsing.
//!
//! Patterns use the colon syntax (`/users/:id/*rest`); the brace syntax axum
//! understands (`/users/{id}/{*rest}`) is accepted too. Either way the pattern
//! is normalized into a list of [`Segment`]s plus a trailing slash flag, and
//! rendered back into axum's syntax when the route is handed over.

use {
    crate::{Error, Result},
    std::{fmt, str::FromStr},
};

/// One `/`-separated piece of a route pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// Static text that must match exactly.
    Literal(String),
    /// Captures one path segment under the given name.
    Param(String),
    /// Captures the remainder of the path. Always the final segment.
    CatchAll(String),
}

impl Segment {
    fn parse(piece: &str) -> Result<Self> {
        let segment = if let Some(inner) = piece.strip_prefix('{').and_then(|p| p.strip_suffix('}')) {
            match inner.strip_prefix('*') {
                Some(name) => Segment::CatchAll(name.to_owned()),
                None => Segment::Param(inner.to_owned()),
            }
        } else if let Some(name) = piece.strip_prefix(':') {
            Segment::Param(name.to_owned())
        } else if let Some(name) = piece.strip_prefix('*') {
            Segment::CatchAll(name.to_owned())
        } else if piece.contains(['{', '}']) {
            return Err(Error::invalid_input(format!(
                "segment `{piece}`: braces may only wrap a whole segment"
            )));
        } else {
            Segment::Literal(piece.to_owned())
        };

        if let Segment::Param(name) | Segment::CatchAll(name) = &segment
            && !is_valid_name(name)
        {
            return Err(Error::invalid_input(format!(
                "segment `{piece}`: parameter name must be non-empty and free of `:*{{}}`"
            )));
        }
        Ok(segment)
    }

    pub fn is_wildcard(&self) -> bool {
        !matches!(self, Segment::Literal(_))
    }
}

fn is_valid_name(name: &str) -> bool {
    !name.is_empty() && !name.contains([':', '*', '{', '}'])
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Literal(text) => f.write_str(text),
            Segment::Param(name) => write!(f, ":{name}"),
            Segment::CatchAll(name) => write!(f, "*{name}"),
        }
    }
}

/// A parsed route pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathPattern {
    raw: String,
    segments: Vec<Segment>,
    trailing_slash: bool,
}

impl PathPattern {
    /// Parses a route pattern.
    ///
    /// ```rust
    /// use axum_approuter::{PathPattern, Segment};
    ///
    /// let pattern = PathPattern::parse("/users/:id/files/*path").unwrap();
    /// assert_eq!(pattern.segments()[1], Segment::Param("id".into()));
    /// assert_eq!(pattern.to_axum_path(), "/users/{id}/files/{*path}");
    /// ```
    ///
    /// # Errors
    ///
    /// Returns an `InvalidInput` error if the pattern does not start with `/`,
    /// contains an empty segment, an unnamed parameter, or a catch-all that is
    /// not the final segment.
    pub fn parse(raw: &str) -> Result<Self> {
        let Some(rest) = raw.strip_prefix('/') else {
            return Err(Error::invalid_input(format!(
                "pattern `{raw}` must start with '/'"
            )));
        };

        let mut pieces: Vec<&str> = if rest.is_empty() {
            Vec::new()
        } else {
            rest.split('/').collect()
        };
        let trailing_slash = pieces.last() == Some(&"");
        if trailing_slash {
            pieces.pop();
        }

        let mut segments = Vec::with_capacity(pieces.len());
        for piece in pieces {
            if piece.is_empty() {
                return Err(Error::invalid_input(format!(
                    "pattern `{raw}` contains an empty segment"
                )));
            }
            if matches!(segments.last(), Some(Segment::CatchAll(_))) {
                return Err(Error::invalid_input(format!(
                    "pattern `{raw}`: a catch-all must be the final segment"
                )));
            }
            segments.push(Segment::parse(piece)?);
        }
        if trailing_slash && matches!(segments.last(), Some(Segment::CatchAll(_))) {
            return Err(Error::invalid_input(format!(
                "pattern `{raw}`: a catch-all cannot be followed by '/'"
            )));
        }

        Ok(Self {
            raw: raw.to_owned(),
            segments,
            trailing_slash,
        })
    }

    /// The pattern exactly as it was written.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn has_trailing_slash(&self) -> bool {
        self.trailing_slash
    }

    /// Names of all captured parameters, in path order.
    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Param(name) | Segment::CatchAll(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// Drops the trailing slash, so `/users/` registers as `/users`.
    pub fn without_trailing_slash(mut self) -> Self {
        if self.trailing_slash {
            self.trailing_slash = false;
            self.raw = self.render(|_, segment| segment.to_string());
        }
        self
    }

    /// Renders the pattern in axum's path syntax.
    pub fn to_axum_path(&self) -> String {
        self.render(|_, segment| match segment {
            Segment::Literal(text) => text.clone(),
            Segment::Param(name) => format!("{{{name}}}"),
            Segment::CatchAll(name) => format!("{{*{name}}}"),
        })
    }

    /// Renders the pattern with positional placeholders instead of parameter
    /// names: `/users/:id/posts/:post` becomes `/users/:p2/posts/:p4`.
    ///
    /// Two routes that capture at the same positions produce the same shadow
    /// path regardless of how their parameters are named.
    pub fn shadow_path(&self) -> String {
        self.render(|position, segment| match segment {
            Segment::Literal(text) => text.clone(),
            Segment::Param(_) => format!(":p{position}"),
            Segment::CatchAll(_) => format!("*p{position}"),
        })
    }

    fn render(&self, segment: impl Fn(usize, &Segment) -> String) -> String {
        let mut path = String::with_capacity(self.raw.len() + 8);
        for (index, seg) in self.segments.iter().enumerate() {
            path.push('/');
            path.push_str(&segment(index + 1, seg));
        }
        if self.trailing_slash || self.segments.is_empty() {
            path.push('/');
        }
        path
    }
}

impl FromStr for PathPattern {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
