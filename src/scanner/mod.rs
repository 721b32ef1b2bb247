//! # Tree Scanner
//!
//! Walks the routes root directory and builds the in-memory [`RouteNode`]
//! tree that the rest of the pipeline consumes.
//!
//! ## Conventions
//!
//! - A subdirectory extends the tree with a child node; a name written
//!   `[param]` makes that node dynamic and binds the URL parameter `param`.
//! - A file whose stem matches an HTTP method token (case-insensitive) and
//!   whose extension is a recognized source kind (`js` or `ts`) registers a
//!   handler for that method on the current node.
//! - Any other file is ignored.
//!
//! The scan is fatal on the first problem it finds: an unreadable directory,
//! a parameter segment that is not a valid identifier, or two handler files
//! claiming the same method at the same node.

mod core;

pub use core::{scan_routes, HandlerFile, RouteNode, SegmentKind, SourceExt, METHOD_TOKENS};
