//! # Dev Watcher
//!
//! Development-mode process supervisor. Observes the configured watch paths,
//! collapses bursts of change events through a debounce window, and restarts
//! the hosted server process so the registration pipeline re-executes from
//! scratch in a fresh process.
//!
//! ## State machine
//!
//! ```text
//! Idle -> Watching -> Debouncing -> Restarting -> Watching -> ...
//!                                       |
//!                                       v
//!                                    Failed  (until the next change event)
//! ```
//!
//! `Failed` is entered when a spawn fails or the hosted process exits on its
//! own; the watcher then sits idle instead of restart-looping, and the next
//! qualifying change event triggers a fresh attempt.
//!
//! ## Guarantees
//!
//! - N change events inside one debounce window yield exactly one restart.
//! - Single-flight restarts: the replacement process is spawned only after
//!   the previous one has fully exited; children never overlap.
//! - `stop()` during a pending debounce cancels the scheduled restart.
//!
//! Everything runs on one event-driven supervision thread; the `notify`
//! callback only forwards events into it.

mod core;

pub use core::{DevWatcher, WatcherConfig, WatcherState, DEFAULT_DEBOUNCE};
