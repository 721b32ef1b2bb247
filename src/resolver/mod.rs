//! # Path Resolver
//!
//! Flattens the scanned [`crate::scanner::RouteNode`] tree into an ordered
//! sequence of URL patterns, one per discovered handler.
//!
//! Traversal is depth-first, parents before children. Sibling order is
//! load-bearing: static children are visited before dynamic children (then
//! alphabetically within each class), and that order is preserved all the way
//! into host registration so exact paths take priority over parameterized
//! ones on routers that match in registration order. Running the resolver
//! twice over an unchanged tree yields an identical sequence.

mod core;

pub use core::{resolve_routes, ResolvedRoute, Segment, UrlPattern};
