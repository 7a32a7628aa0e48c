//! # axum-approuter
//!
//! Conflict-checked route registration and composite parameter dispatch on
//! top of Axum.
//!
//! Axum resolves paths with a radix trie that allows one wildcard per tree
//! position. This crate checks route tables against that rule before they
//! reach axum, reporting both conflicting patterns and the offending
//! segment, and provides [`Composite`] handlers that let one wildcard segment
//! behave like several static or numeric routes at request time.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use axum::http::StatusCode;
//! use axum_approuter::{AppRouter, Config, Context, DispatchOption, Result, chain, composite};
//!
//! fn current_user(ctx: &mut Context) {
//!     ctx.text(StatusCode::OK, "it's you");
//! }
//!
//! fn user_by_id(ctx: &mut Context) {
//!     let id = ctx.param("user").unwrap_or_default().to_owned();
//!     ctx.text(StatusCode::OK, format!("user #{id}"));
//! }
//!
//! fn user_by_name(ctx: &mut Context) {
//!     let name = ctx.param("user").unwrap_or_default().to_owned();
//!     ctx.text(StatusCode::OK, format!("user {name}"));
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = Config::default(); // Loads from config/{RUST_ENV}.toml
//!     config.setup_tracing();
//!
//!     // /users/me, /users/42 and /users/alice behind a single wildcard
//!     let users = composite(
//!         "user",
//!         chain![user_by_name],
//!         vec![
//!             DispatchOption::prefix("me", chain![current_user]),
//!             DispatchOption::numeric(chain![user_by_id]),
//!         ],
//!     );
//!
//!     AppRouter::new(config)?
//!         .get("/users/:user", chain![users])?
//!         .setup_middleware()?
//!         .start()
//!         .await
//! }
//! ```
//!
//! With `config/dev.toml`:
//! ```toml
//! [http]
//! bind_port = 3000
//!
//! [routing]
//! route_log_level = "info"
//! ```
//!
//! Run with `RUST_ENV=dev cargo run`.
//!
//! # Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`config`] | Configuration loading and validation ([`Config`]) |
//! | [`routing`] | Patterns, conflict detection and diagnostics ([`PathPattern`], [`RouteInfo`]) |
//! | [`dispatch`] | Handler chains and composites ([`Context`], [`Composite`]) |
//! | [`app`] | Route declaration, registration and serving ([`AppRouter`]) |
//! | [`error`] | Error types ([`Error`]) |

pub mod app;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod routing;

pub use app::*;
pub use config::*;
pub use dispatch::*;
pub use error::*;
pub use routing::*;

/// Type alias for `Result<T, Error>` using this crate's [`Error`] type.
pub type Result<T> = std::result::Result<T, Error>;
