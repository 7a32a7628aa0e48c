use {
    super::HandlerChain,
    crate::{Error, Result},
    axum::{
        body::Body,
        extract::{FromRequestParts, RawPathParams, Request},
        http::{
            Extensions, HeaderMap, HeaderName, HeaderValue, Method, StatusCode, Uri, header,
            request::Parts,
        },
        response::{IntoResponse, Response},
    },
    serde::Serialize,
};

/// Per-request state shared by every handler of a chain.
///
/// A `Context` owns the request head, the path parameters the router
/// captured, the position within the running chain and the response being
/// built. It is created for each request and dropped once the response has
/// been produced.
pub struct Context {
    parts: Parts,
    params: Vec<(String, String)>,
    chain: HandlerChain,
    index: usize,
    aborted: bool,
    status: StatusCode,
    headers: HeaderMap,
    body: Body,
}

impl Context {
    /// Creates a context for a request head and the chain that will serve it.
    ///
    /// Path parameters are normally filled in by the router; use
    /// [`Context::with_params`] when driving a chain by hand.
    pub fn new(parts: Parts, chain: HandlerChain) -> Self {
        Self {
            parts,
            params: Vec::new(),
            chain,
            index: 0,
            aborted: false,
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            body: Body::empty(),
        }
    }

    #[must_use]
    pub fn with_params<K, V>(mut self, params: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.params
            .extend(params.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Builds a context from an incoming request, reading the path parameters
    /// axum captured for the matched route.
    pub(crate) async fn from_request(request: Request, chain: HandlerChain) -> Self {
        let (mut parts, _body) = request.into_parts();
        let params = match RawPathParams::from_request_parts(&mut parts, &()).await {
            Ok(raw) => raw
                .iter()
                .map(|(key, value)| (key.to_owned(), value.to_owned()))
                .collect(),
            Err(rejection) => {
                tracing::debug!(uri = %parts.uri, %rejection, "path parameters unavailable");
                Vec::new()
            }
        };
        Self::new(parts, chain).with_params(params)
    }

    /// Runs the whole chain and returns the response it built.
    pub fn run(mut self) -> Response {
        self.next();
        self.into_response()
    }

    // ------------------------------------------------------------------
    // Chain control
    // ------------------------------------------------------------------

    /// Runs the remaining handlers of the current chain.
    ///
    /// A handler that calls `next` regains control once the handlers after it
    /// have finished, which lets it act both before and after them.
    pub fn next(&mut self) {
        while !self.aborted {
            let Some(handler) = self.chain.get(self.index).cloned() else {
                break;
            };
            self.index += 1;
            handler.call(self);
        }
    }

    /// Runs `chain` to completion as a nested chain, then resumes the current one.
    pub fn run_chain(&mut self, chain: &HandlerChain) {
        let outer_chain = std::mem::replace(&mut self.chain, chain.clone());
        let outer_index = std::mem::replace(&mut self.index, 0);
        self.next();
        self.chain = outer_chain;
        self.index = outer_index;
    }

    /// Stops the chain: no further handler runs, at any nesting level.
    pub fn abort(&mut self) {
        self.aborted = true;
    }

    pub fn is_aborted(&self) -> bool {
        self.aborted
    }

    pub fn abort_with_status(&mut self, status: StatusCode) {
        self.status = status;
        self.abort();
    }

    /// Replaces the response with the JSON rendering of `error` and aborts.
    pub fn abort_with_error(&mut self, error: Error) {
        self.respond(error);
        self.abort();
    }

    // ------------------------------------------------------------------
    // Request
    // ------------------------------------------------------------------

    /// The value captured for the named path parameter.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn params(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn method(&self) -> &Method {
        &self.parts.method
    }

    pub fn uri(&self) -> &Uri {
        &self.parts.uri
    }

    pub fn path(&self) -> &str {
        self.parts.uri.path()
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.parts.headers
    }

    /// First value of a query string parameter, percent-decoded.
    pub fn query(&self, key: &str) -> Option<String> {
        let query = self.parts.uri.query()?;
        url::form_urlencoded::parse(query.as_bytes())
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.into_owned())
    }

    /// Request extensions, also usable to pass values between handlers.
    pub fn extensions(&self) -> &Extensions {
        &self.parts.extensions
    }

    pub fn extensions_mut(&mut self) -> &mut Extensions {
        &mut self.parts.extensions
    }

    // ------------------------------------------------------------------
    // Response
    // ------------------------------------------------------------------

    pub fn status(&mut self, status: StatusCode) {
        self.status = status;
    }

    /// The status the response will be sent with.
    pub fn response_status(&self) -> StatusCode {
        self.status
    }

    pub fn response_headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Sets a response header, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an `InvalidInput` error if the name or value is not a valid
    /// HTTP header name or value.
    pub fn header(&mut self, name: &str, value: &str) -> Result<()> {
        let name = HeaderName::try_from(name)?;
        let value = HeaderValue::try_from(value)?;
        self.headers.insert(name, value);
        Ok(())
    }

    pub fn text(&mut self, status: StatusCode, body: impl Into<String>) {
        self.status = status;
        self.headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("text/plain; charset=utf-8"),
        );
        self.body = Body::from(body.into());
    }

    /// Serializes `value` as the response body. A value that fails to
    /// serialize produces a 500 error response instead.
    pub fn json<T: Serialize + ?Sized>(&mut self, status: StatusCode, value: &T) {
        match serde_json::to_vec(value) {
            Ok(bytes) => {
                self.status = status;
                self.headers.insert(
                    header::CONTENT_TYPE,
                    HeaderValue::from_static("application/json"),
                );
                self.body = Body::from(bytes);
            }
            Err(e) => self.respond(Error::internal(format!("failed to serialize response: {e}"))),
        }
    }

    /// Replaces the status and body with those of `response` and merges its headers.
    pub fn respond(&mut self, response: impl IntoResponse) {
        let (parts, body) = response.into_response().into_parts();
        self.status = parts.status;
        for name in parts.headers.keys() {
            self.headers.remove(name);
        }
        for (name, value) in &parts.headers {
            self.headers.append(name, value.clone());
        }
        self.body = body;
    }

    pub fn into_response(self) -> Response {
        let mut response = Response::new(self.body);
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;
        response
    }
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("method", &self.parts.method)
            .field("uri", &self.parts.uri)
            .field("params", &self.params)
            .field("index", &self.index)
            .field("aborted", &self.aborted)
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain;
    use std::sync::{Arc, Mutex};

    fn parts(uri: &str) -> Parts {
        axum::http::Request::builder()
            .uri(uri)
            .header("x-request", "yes")
            .body(())
            .unwrap()
            .into_parts()
            .0
    }

    async fn body_string(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_empty_chain_yields_empty_ok() {
        let response = Context::new(parts("/"), HandlerChain::default()).run();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, "");
    }

    #[tokio::test]
    async fn test_handlers_run_in_order() {
        let chain = chain![
            |ctx: &mut Context| ctx.header("x-first", "1").unwrap(),
            |ctx: &mut Context| ctx.text(StatusCode::CREATED, "done"),
        ];
        let response = Context::new(parts("/"), chain).run();
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(response.headers()["x-first"], "1");
        assert_eq!(body_string(response).await, "done");
    }

    #[test]
    fn test_next_wraps_later_handlers() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let (outer, inner) = (log.clone(), log.clone());
        let chain = chain![
            move |ctx: &mut Context| {
                outer.lock().unwrap().push("before");
                ctx.next();
                outer.lock().unwrap().push("after");
            },
            move |_: &mut Context| inner.lock().unwrap().push("endpoint"),
        ];
        Context::new(parts("/"), chain).run();
        assert_eq!(*log.lock().unwrap(), vec!["before", "endpoint", "after"]);
    }

    #[test]
    fn test_abort_stops_chain() {
        let reached = Arc::new(Mutex::new(false));
        let flag = reached.clone();
        let chain = chain![
            |ctx: &mut Context| ctx.abort_with_status(StatusCode::FORBIDDEN),
            move |_: &mut Context| *flag.lock().unwrap() = true,
        ];
        let response = Context::new(parts("/"), chain).run();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert!(!*reached.lock().unwrap());
    }

    #[test]
    fn test_run_chain_resumes_outer() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let (a, b, c) = (log.clone(), log.clone(), log.clone());
        let nested = chain![move |_: &mut Context| a.lock().unwrap().push("nested")];
        let chain = chain![
            move |ctx: &mut Context| {
                b.lock().unwrap().push("outer");
                ctx.run_chain(&nested);
            },
            move |_: &mut Context| c.lock().unwrap().push("tail"),
        ];
        Context::new(parts("/"), chain).run();
        assert_eq!(*log.lock().unwrap(), vec!["outer", "nested", "tail"]);
    }

    #[test]
    fn test_request_accessors() {
        let ctx = Context::new(parts("/users/7?tab=posts&q=a%20b"), HandlerChain::default())
            .with_params([("id", "7")]);
        assert_eq!(ctx.param("id"), Some("7"));
        assert_eq!(ctx.param("missing"), None);
        assert_eq!(ctx.params().collect::<Vec<_>>(), vec![("id", "7")]);
        assert_eq!(*ctx.method(), Method::GET);
        assert_eq!(ctx.path(), "/users/7");
        assert_eq!(ctx.query("tab").as_deref(), Some("posts"));
        assert_eq!(ctx.query("q").as_deref(), Some("a b"));
        assert_eq!(ctx.query("nope"), None);
        assert_eq!(ctx.headers()["x-request"], "yes");
    }

    #[test]
    fn test_extensions_pass_values_between_handlers() {
        #[derive(Clone)]
        struct UserId(u64);

        let chain = chain![
            |ctx: &mut Context| {
                ctx.extensions_mut().insert(UserId(9));
            },
            |ctx: &mut Context| {
                let id = ctx.extensions().get::<UserId>().map(|u| u.0).unwrap_or_default();
                ctx.text(StatusCode::OK, id.to_string());
            },
        ];
        let response = Context::new(parts("/"), chain).run();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn test_invalid_header_is_rejected() {
        let mut ctx = Context::new(parts("/"), HandlerChain::default());
        let err = ctx.header("bad header", "v").unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::InvalidInput);
        assert!(ctx.response_headers().is_empty());
    }

    #[tokio::test]
    async fn test_json_response() {
        let mut ctx = Context::new(parts("/"), HandlerChain::default());
        ctx.json(StatusCode::OK, &serde_json::json!({ "id": 7 }));
        let response = ctx.into_response();
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
        assert_eq!(body_string(response).await, r#"{"id":7}"#);
    }

    #[tokio::test]
    async fn test_abort_with_error_renders_json() {
        let mut ctx = Context::new(parts("/"), HandlerChain::default());
        ctx.abort_with_error(Error::invalid_input("bad id"));
        assert!(ctx.is_aborted());
        let response = ctx.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_string(response).await.contains("INVALID_INPUT"));
    }
}
