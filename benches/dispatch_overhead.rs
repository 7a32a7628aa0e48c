//! Benchmarks for measuring composite dispatch overhead.
//!
//! Compares separate axum routes against one wildcard route that
//! re-dispatches through a `Composite`, both in isolation (a bare `Context`)
//! and through the full router.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, request::Parts},
    routing::get,
};
use axum_approuter::{
    AppRouter, Config, Context, DispatchOption, Handler, HandlerChain, chain, composite,
};
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use tower::ServiceExt;

fn ok(ctx: &mut Context) {
    ctx.status(StatusCode::OK);
}

fn test_config() -> Config {
    Config::builtin()
        .with_log_routes(false)
        .with_trace_requests(false)
        .with_catch_panic(false)
}

fn test_request(path: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(path)
        .body(Body::empty())
        .unwrap()
}

fn test_parts() -> Parts {
    Request::builder().uri("/").body(()).unwrap().into_parts().0
}

/// A composite with `prefixes` literal options followed by a numeric one.
fn wide_composite(prefixes: usize) -> impl Handler + Clone {
    let mut options: Vec<_> = (0..prefixes)
        .map(|i| DispatchOption::prefix(format!("p{i}"), chain![ok]))
        .collect();
    options.push(DispatchOption::numeric(chain![ok]));
    composite("x", chain![ok], options)
}

/// Benchmark: selecting a branch with a bare context, no HTTP involved
fn bench_select(c: &mut Criterion) {
    let mut group = c.benchmark_group("composite_select");

    for prefixes in [1, 8, 32] {
        let handler = wide_composite(prefixes);
        let chain = HandlerChain::single(handler);

        for (label, value) in [("first", "p0".to_owned()), ("numeric", "12345".to_owned()), ("main", "zzz".to_owned())] {
            group.bench_with_input(
                BenchmarkId::new(label, prefixes),
                &value,
                |b, value| {
                    b.iter(|| {
                        let mut ctx = Context::new(test_parts(), chain.clone())
                            .with_params([("x", value.as_str())]);
                        ctx.next();
                        black_box(ctx.response_status())
                    })
                },
            );
        }
    }
    group.finish();
}

/// Benchmark: separate axum routes vs. one composite route
fn bench_router(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let mut group = c.benchmark_group("router");

    let bare = Router::new()
        .route("/items/new", get(|| async { "OK" }))
        .route("/items/{id}", get(|| async { "OK" }));

    group.bench_function("bare_axum", |b| {
        b.to_async(&rt).iter(|| async {
            let response = bare.clone().oneshot(test_request("/items/42")).await.unwrap();
            black_box(response)
        })
    });

    let app = AppRouter::new(test_config())
        .unwrap()
        .get("/items/:id", chain![wide_composite(1)])
        .unwrap()
        .register()
        .unwrap()
        .into_inner();

    group.bench_function("composite", |b| {
        b.to_async(&rt).iter(|| async {
            let response = app.clone().oneshot(test_request("/items/42")).await.unwrap();
            black_box(response)
        })
    });

    group.finish();
}

/// Benchmark: conflict checking and registration of a route table
fn bench_register(c: &mut Criterion) {
    c.bench_function("register_64_routes", |b| {
        b.iter(|| {
            let mut router = AppRouter::new(test_config()).unwrap();
            for i in 0..64 {
                router = router
                    .get(&format!("/r{i}/:id/items/*rest"), chain![ok])
                    .unwrap();
            }
            black_box(router.register().unwrap())
        })
    });
}

criterion_group!(benches, bench_select, bench_router, bench_register);
criterion_main!(benches);
