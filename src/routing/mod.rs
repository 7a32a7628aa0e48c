//! Route patterns, conflict detection and registration diagnostics.
//!
//! # Data Flow
//! ```text
//! "/users/:id"  ──parse──▶  PathPattern [Literal("users"), Param("id")]
//!                                 │
//!                  RouteTree::insert (all batches) ── conflict ──▶ Error
//!                                 │
//!                    to_axum_path "/users/{id}"  ──▶ axum::Router
//!                    shadow_path  "/users/:p2"   ──▶ DiagnosticSink
//! ```

mod diagnostics;
mod method;
mod pattern;
mod tree;

pub use diagnostics::*;
pub use method::RouteMethod;
pub use pattern::{PathPattern, Segment};
pub(crate) use tree::RouteTree;
