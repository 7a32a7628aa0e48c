//! Tests for route declaration, conflict detection and diagnostics

use super::*;
use crate::{
    Context, ErrorKind, HandlerChain, RegistrationState, RouteMethod, chain, handler_fn,
};
use axum::http::{Method, StatusCode};
use tower::ServiceExt;

fn ok(ctx: &mut Context) {
    ctx.text(StatusCode::OK, "ok");
}

fn auth(_: &mut Context) {}

// ============================================================================
// Declaration
// ============================================================================

#[test]
fn test_routes_are_buffered_until_register() {
    let router = quiet_router()
        .get("/users", chain![ok])
        .unwrap()
        .post("/users", chain![ok])
        .unwrap();

    assert_eq!(router.state(), RegistrationState::Accumulating);
    let pending: Vec<_> = router
        .pending_routes()
        .iter()
        .map(|entry| (entry.method(), entry.pattern().as_str().to_owned()))
        .collect();
    assert_eq!(
        pending,
        vec![
            (RouteMethod::Get, "/users".to_owned()),
            (RouteMethod::Post, "/users".to_owned()),
        ]
    );

    let router = router.register().unwrap();
    assert_eq!(router.state(), RegistrationState::Registered);
    assert!(router.pending_routes().is_empty());
}

#[test]
fn test_empty_chain_is_rejected() {
    let err = quiet_router()
        .get("/users", HandlerChain::default())
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::EmptyChain);
    assert!(err.to_string().contains("GET /users"));
}

#[test]
fn test_invalid_pattern_is_rejected() {
    let err = quiet_router().get("users", chain![ok]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
}

#[test]
fn test_every_method_helper_declares_its_method() {
    let router = quiet_router()
        .get("/r", chain![ok])
        .unwrap()
        .post("/r", chain![ok])
        .unwrap()
        .put("/r", chain![ok])
        .unwrap()
        .patch("/r", chain![ok])
        .unwrap()
        .delete("/r", chain![ok])
        .unwrap()
        .options("/r", chain![ok])
        .unwrap()
        .head("/r", chain![ok])
        .unwrap()
        .any("/other", chain![ok])
        .unwrap();

    let methods: Vec<_> = router.pending_routes().iter().map(|e| e.method()).collect();
    assert_eq!(
        methods,
        vec![
            RouteMethod::Get,
            RouteMethod::Post,
            RouteMethod::Put,
            RouteMethod::Patch,
            RouteMethod::Delete,
            RouteMethod::Options,
            RouteMethod::Head,
            RouteMethod::Any,
        ]
    );
    assert!(router.register().is_ok());
}

#[test]
fn test_relaxed_trailing_slash_is_dropped() {
    let config = create_base_config().with_strict_trailing_slash(false);
    let router = AppRouter::new(config)
        .unwrap()
        .get("/users/", chain![ok])
        .unwrap();
    assert_eq!(router.pending_routes()[0].pattern().as_str(), "/users");
}

// ============================================================================
// Conflicts
// ============================================================================

#[test]
fn test_param_name_mismatch_conflicts() {
    let err = quiet_router()
        .get("/users/:id", chain![ok])
        .unwrap()
        .get("/users/:name/posts", chain![ok])
        .unwrap()
        .register()
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::RouteConflict);
    let detail = err.conflict().expect("structured conflict");
    assert_eq!(detail.pattern, "/users/:name/posts");
    assert_eq!(detail.existing_pattern, "/users/:id");
    assert_eq!(detail.segment, ":name");
    assert_eq!(detail.existing_segment, ":id");
}

#[test]
fn test_literal_and_param_siblings_conflict() {
    let err = quiet_router()
        .get("/:a", chain![ok])
        .unwrap()
        .get("/b", chain![ok])
        .unwrap()
        .register()
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::RouteConflict);
    let message = err.to_string();
    assert!(message.contains("/:a"));
    assert!(message.contains("/b"));
}

#[test]
fn test_same_pattern_twice_is_a_self_conflict() {
    let err = quiet_router()
        .get("/users", chain![ok])
        .unwrap()
        .get("/users", chain![ok])
        .unwrap()
        .register()
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::RouteConflict);
    assert_eq!(err.conflict().unwrap().existing_pattern, "/users");
}

#[test]
fn test_any_conflicts_with_method_route() {
    let err = quiet_router()
        .get("/health", chain![ok])
        .unwrap()
        .any("/health", chain![ok])
        .unwrap()
        .register()
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::RouteConflict);
}

#[test]
fn test_conflicting_batch_never_reaches_sink_past_the_conflict() {
    let (router, recorded) = recording_router();
    let result = router
        .get("/a", chain![ok])
        .unwrap()
        .get("/:x", chain![ok])
        .unwrap()
        .get("/c", chain![ok])
        .unwrap()
        .register();

    assert!(result.is_err());
    let patterns: Vec<_> = recorded.lock().unwrap().iter().map(|i| i.pattern.clone()).collect();
    assert_eq!(patterns, vec!["/a"]);
}

// ============================================================================
// Register lifecycle
// ============================================================================

#[test]
fn test_register_with_nothing_pending_is_a_noop() {
    let (router, recorded) = recording_router();
    let router = router.get("/a", chain![ok]).unwrap().register().unwrap();
    assert_eq!(recorded.lock().unwrap().len(), 1);

    let router = router.register().unwrap().register().unwrap();
    assert_eq!(recorded.lock().unwrap().len(), 1);
    assert_eq!(router.state(), RegistrationState::Registered);
}

#[test]
fn test_register_on_fresh_router_is_a_noop() {
    let router = quiet_router().register().unwrap();
    assert_eq!(router.state(), RegistrationState::Accumulating);
}

#[test]
fn test_new_batch_after_register() {
    let router = quiet_router()
        .get("/a", chain![ok])
        .unwrap()
        .register()
        .unwrap()
        .get("/b", chain![ok])
        .unwrap();
    assert_eq!(router.state(), RegistrationState::Accumulating);
    assert_eq!(router.pending_routes().len(), 1);
    assert!(router.register().is_ok());
}

#[test]
fn test_literal_after_param_in_a_later_batch_conflicts() {
    let err = quiet_router()
        .get("/users/:id", chain![ok])
        .unwrap()
        .register()
        .unwrap()
        .get("/users/new", chain![ok])
        .unwrap()
        .register()
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::RouteConflict);
    let detail = err.conflict().expect("structured conflict");
    assert_eq!(detail.pattern, "/users/new");
    assert_eq!(detail.segment, "new");
    assert_eq!(detail.existing_segment, ":id");
    assert_eq!(detail.existing_pattern, "/users/:id");
}

#[test]
fn test_param_after_literal_in_a_later_batch_conflicts() {
    let err = quiet_router()
        .get("/b", chain![ok])
        .unwrap()
        .register()
        .unwrap()
        .get("/:a", chain![ok])
        .unwrap()
        .register()
        .unwrap_err();

    let detail = err.conflict().expect("structured conflict");
    assert_eq!(detail.segment, ":a");
    assert_eq!(detail.existing_pattern, "/b");
}

#[test]
fn test_duplicate_in_a_later_batch_is_a_self_conflict() {
    let err = quiet_router()
        .get("/a", chain![ok])
        .unwrap()
        .register()
        .unwrap()
        .get("/a", chain![ok])
        .unwrap()
        .register()
        .unwrap_err();
    assert_eq!(err.conflict().unwrap().existing_pattern, "/a");
}

#[test]
fn test_param_name_mismatch_across_methods_conflicts() {
    let err = quiet_router()
        .get("/u/:id", chain![ok])
        .unwrap()
        .post("/u/:name", chain![ok])
        .unwrap()
        .register()
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::RouteConflict);
    let detail = err.conflict().expect("structured conflict");
    assert_eq!(detail.method, RouteMethod::Post);
    assert_eq!(detail.segment, ":name");
    assert_eq!(detail.existing_segment, ":id");
    assert_eq!(detail.existing_pattern, "/u/:id");
}

#[tokio::test]
async fn test_methods_may_differ_at_one_position() {
    let app = quiet_router()
        .get("/users/:id", chain![|ctx: &mut Context| {
            let id = ctx.param("id").unwrap_or_default().to_owned();
            ctx.text(StatusCode::OK, format!("show {id}"));
        }])
        .unwrap()
        .register()
        .unwrap()
        .post("/users/new", chain![|ctx: &mut Context| ctx.text(StatusCode::CREATED, "created")])
        .unwrap()
        .register()
        .unwrap()
        .into_inner();

    let response = app
        .clone()
        .oneshot(request(Method::POST, "/users/new"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(get_body_string(response).await, "created");

    let response = app.oneshot(get_request("/users/7")).await.unwrap();
    assert_eq!(get_body_string(response).await, "show 7");
}

// ============================================================================
// Diagnostics
// ============================================================================

#[test]
fn test_diagnostics_report_every_route_in_order() {
    let (router, recorded) = recording_router();
    router
        .get("/", chain![ok])
        .unwrap()
        .get("/users/:id/posts/:post", chain![auth, ok])
        .unwrap()
        .put("/files/*path", chain![handler_fn(|ctx| ctx.status(StatusCode::NO_CONTENT))])
        .unwrap()
        .register()
        .unwrap();

    let recorded = recorded.lock().unwrap();
    assert_eq!(recorded.len(), 3);

    assert_eq!(recorded[0].index, 1);
    assert_eq!(recorded[0].total, 3);
    assert_eq!(recorded[0].shadow_path, "/");

    let posts = &recorded[1];
    assert_eq!(posts.index, 2);
    assert_eq!(posts.method, RouteMethod::Get);
    assert_eq!(posts.pattern, "/users/:id/posts/:post");
    assert_eq!(posts.shadow_path, "/users/:p2/posts/:p4");
    assert_eq!(posts.chain_length, 2);
    assert!(posts.handler_name.ends_with("::ok"), "{}", posts.handler_name);

    assert_eq!(recorded[2].index, 3);
    assert_eq!(recorded[2].method, RouteMethod::Put);
    assert_eq!(recorded[2].shadow_path, "/files/*p2");
}

#[test]
fn test_without_diagnostics_disables_sink() {
    let (router, recorded) = recording_router();
    router
        .without_diagnostics()
        .get("/", chain![ok])
        .unwrap()
        .register()
        .unwrap();
    assert!(recorded.lock().unwrap().is_empty());
}

#[test]
fn test_log_routes_installs_tracing_sink() {
    let config = create_base_config().with_log_routes(true);
    let router = AppRouter::new(config).unwrap();
    assert!(format!("{router:?}").contains("diagnostics: true"));

    let router = quiet_router();
    assert!(format!("{router:?}").contains("diagnostics: false"));
}
