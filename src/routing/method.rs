use {
    axum::{
        handler::Handler as AxumHandler,
        routing::{MethodFilter, MethodRouter},
    },
    std::fmt,
};

/// HTTP method a route is registered under.
///
/// `Any` matches every method and occupies every concrete method tree during
/// conflict detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RouteMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Options,
    Head,
    Any,
}

impl RouteMethod {
    /// All methods that own a routing tree of their own.
    pub const CONCRETE: [RouteMethod; 7] = [
        RouteMethod::Get,
        RouteMethod::Post,
        RouteMethod::Put,
        RouteMethod::Patch,
        RouteMethod::Delete,
        RouteMethod::Options,
        RouteMethod::Head,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RouteMethod::Get => "GET",
            RouteMethod::Post => "POST",
            RouteMethod::Put => "PUT",
            RouteMethod::Patch => "PATCH",
            RouteMethod::Delete => "DELETE",
            RouteMethod::Options => "OPTIONS",
            RouteMethod::Head => "HEAD",
            RouteMethod::Any => "ANY",
        }
    }

    /// The routing trees a registration under this method lands in.
    pub(crate) fn trees(self) -> &'static [RouteMethod] {
        match self {
            RouteMethod::Get => &[RouteMethod::Get],
            RouteMethod::Post => &[RouteMethod::Post],
            RouteMethod::Put => &[RouteMethod::Put],
            RouteMethod::Patch => &[RouteMethod::Patch],
            RouteMethod::Delete => &[RouteMethod::Delete],
            RouteMethod::Options => &[RouteMethod::Options],
            RouteMethod::Head => &[RouteMethod::Head],
            RouteMethod::Any => &Self::CONCRETE,
        }
    }

    fn filter(self) -> Option<MethodFilter> {
        match self {
            RouteMethod::Get => Some(MethodFilter::GET),
            RouteMethod::Post => Some(MethodFilter::POST),
            RouteMethod::Put => Some(MethodFilter::PUT),
            RouteMethod::Patch => Some(MethodFilter::PATCH),
            RouteMethod::Delete => Some(MethodFilter::DELETE),
            RouteMethod::Options => Some(MethodFilter::OPTIONS),
            RouteMethod::Head => Some(MethodFilter::HEAD),
            RouteMethod::Any => None,
        }
    }

    /// Wraps an axum handler into a method router for this method.
    pub(crate) fn method_router<H, T>(self, handler: H) -> MethodRouter
    where
        H: AxumHandler<T, ()>,
        T: 'static,
    {
        match self.filter() {
            Some(filter) => axum::routing::on(filter, handler),
            None => axum::routing::any(handler),
        }
    }
}

impl fmt::Display for RouteMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
