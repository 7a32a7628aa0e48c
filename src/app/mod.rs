//! AppRouter: route declaration, conflict-checked registration and serving.
//!
//! Methods are grouped by concern:
//! - `router`: struct definition, construction and route declaration
//! - `builder`: registration, composition and the server loop
//! - `middleware`: request tracing and panic recovery
//! - `shutdown`: signal handling for graceful shutdown

mod builder;
mod middleware;
mod router;
mod shutdown;

#[cfg(test)]
mod tests;

pub use router::{AppRouter, RegistrationState, RouteEntry};
