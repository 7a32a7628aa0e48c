//! Handler chains and request-time re-dispatch.
//!
//! A route's [`HandlerChain`] runs against a per-request [`Context`]. A
//! [`Composite`] placed in a chain reads one captured parameter and continues
//! with whichever of its [`DispatchOption`]s matches, which lets a single
//! wildcard route stand in for several static and numeric ones.

mod composite;
mod context;
mod handler;
mod option;

pub use composite::{Composite, composite};
pub use context::Context;
pub use handler::{Handler, HandlerChain, handler_fn};
pub use option::DispatchOption;
