//! # treeroute
//!
//! **treeroute** maps a directory hierarchy onto an HTTP routing table. A
//! directory becomes a URL segment, a `[param]` directory becomes a named URL
//! parameter, and a `GET.js` / `POST.ts` file registers a handler for that
//! method at that path. The committed table is handed to a hosting server
//! abstraction exactly once at process start; route changes in development are
//! picked up by restarting the hosted process, not by patching a live table.
//!
//! ## Architecture
//!
//! The registration pipeline runs synchronously, in dependency order:
//!
//! - **[`scanner`]** - walks the routes root and builds the in-memory route tree
//! - **[`resolver`]** - flattens the tree into ordered URL patterns
//! - **[`conflict`]** - detects ambiguous dynamic-segment collisions and applies
//!   the strict / non-strict policy
//! - **[`middleware`]** - discovers global and named middleware and composes
//!   per-route chains
//! - **[`registrar`]** - resolves handlers through a [`loader::ModuleLoader`]
//!   and mounts every record on the [`registrar::HostServer`] abstraction
//! - **[`inspector`]** - read-only reporting over the committed table
//! - **[`watcher`]** - development-mode process supervisor: observe, debounce,
//!   restart
//!
//! Every registration error is raised before the first route is mounted;
//! commitment is all-or-nothing. After the pipeline completes the
//! [`registrar::RouteTable`] is an immutable snapshot, so no locking is needed
//! on the request path.
//!
//! ## Quick start
//!
//! ```no_run
//! use treeroute::{register_routes, EchoLoader, RegisterOptions};
//! # struct Server;
//! # impl treeroute::HostServer for Server {
//! #     fn mount(&mut self, _record: treeroute::RouteRecord) {}
//! # }
//!
//! let mut server = Server;
//! let table = register_routes(
//!     &mut server,
//!     "routes".as_ref(),
//!     &RegisterOptions::default(),
//!     &EchoLoader,
//! ).expect("route registration failed");
//! println!("{} routes committed", table.records().len());
//! ```
//!
//! ## Directory conventions
//!
//! ```text
//! routes/
//! ├── GET.js              # GET /
//! ├── users/
//! │   ├── GET.js          # GET /users
//! │   ├── POST.js         # POST /users
//! │   ├── profile/
//! │   │   └── GET.js      # GET /users/profile   (static wins over [id])
//! │   └── [id]/
//! │       └── GET.js      # GET /users/:id
//! middleware/
//! ├── auth._global.js     # global: runs on every route unless skipped
//! └── audit.js            # named: runs only when a route declares "audit"
//! ```
//!
//! A route module may declare a middleware-name list; the reserved entry
//! `"!_global"` suppresses global middleware for that one route.

pub mod cli;
pub mod conflict;
pub mod error;
pub mod inspector;
pub mod loader;
pub mod middleware;
pub mod registrar;
pub mod resolver;
pub mod scanner;
pub mod watcher;

pub use conflict::{Conflict, ConflictPolicy};
pub use error::RegistrationError;
pub use loader::{EchoLoader, Handler, HandlerRequest, HandlerResponse, ModuleLoader, RouteModule};
pub use middleware::{MiddlewareDescriptor, MiddlewareKind, MiddlewareSet, SKIP_GLOBAL};
pub use registrar::{register_routes, HostServer, RegisterOptions, RouteRecord, RouteTable};
pub use resolver::{ResolvedRoute, Segment, UrlPattern};
pub use scanner::{scan_routes, HandlerFile, RouteNode, SegmentKind, SourceExt};
pub use watcher::{DevWatcher, WatcherConfig, WatcherState};
