//! # Middleware Resolver
//!
//! Discovers middleware source files from a flat directory and composes the
//! ordered chain attached to each route.
//!
//! ## Conventions
//!
//! - `<name>._global.<ext>` registers **global** middleware `name`, applied to
//!   every route unless the route opts out.
//! - `<name>.<ext>` registers **named** middleware `name`, applied only when a
//!   route declares it.
//!
//! ## Chain composition
//!
//! For each route: global middlewares first, sorted lexicographically by
//! filename (never by discovery order), then the route's declared names in
//! declared order, then the handler. A declared list containing the reserved
//! [`SKIP_GLOBAL`] sentinel drops the global prefix for that one route.
//! Unknown declared names and duplicate global names are fatal.

mod core;
mod resolver;

pub use core::{MiddlewareDescriptor, MiddlewareKind, SKIP_GLOBAL};
pub use resolver::MiddlewareSet;
