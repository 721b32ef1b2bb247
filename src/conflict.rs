//! # Conflict Detector
//!
//! Two routes collide when they share a method and a pattern shape - the same
//! count and position of dynamic segments with identical surrounding literals
//! - and differ only in parameter naming. No incoming request can distinguish
//! them, so at most one may survive into the committed table.
//!
//! Policy is configurable per registration: the non-strict default keeps the
//! earliest record in traversal order and logs a warning naming both source
//! files; strict mode collects every pairwise conflict in the pass and aborts
//! with all of them, so one failed run reports the full repair list.

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

use http::Method;
use tracing::warn;

use crate::error::RegistrationError;
use crate::resolver::ResolvedRoute;

/// What to do when an ambiguous collision is found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConflictPolicy {
    /// Keep the earliest record, drop the later one, warn
    #[default]
    NonStrict,
    /// Abort the whole registration; nothing is committed
    Strict,
}

/// A pair of routes indistinguishable by URL shape.
#[derive(Debug, Clone)]
pub struct Conflict {
    pub method: Method,
    /// The shared shape, parameter names erased
    pub shape: String,
    /// Pattern and source file of the earlier-traversed record
    pub kept_pattern: String,
    pub kept_source: PathBuf,
    /// Pattern and source file of the later record
    pub dropped_pattern: String,
    pub dropped_source: PathBuf,
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} ({}) collides with {} ({})",
            self.method,
            self.kept_pattern,
            self.kept_source.display(),
            self.dropped_pattern,
            self.dropped_source.display()
        )
    }
}

/// Detect shape collisions in resolver output and apply `policy`.
///
/// Returns the surviving records (resolver order preserved) together with
/// every conflict that was detected. Under [`ConflictPolicy::NonStrict`] the
/// conflicts describe dropped routes; under [`ConflictPolicy::Strict`] any
/// conflict aborts with [`RegistrationError::Conflict`] carrying all pairs.
pub fn resolve_conflicts(
    records: Vec<ResolvedRoute>,
    policy: ConflictPolicy,
) -> Result<(Vec<ResolvedRoute>, Vec<Conflict>), RegistrationError> {
    let mut kept: Vec<ResolvedRoute> = Vec::with_capacity(records.len());
    let mut first_by_shape: HashMap<String, usize> = HashMap::new();
    let mut conflicts: Vec<Conflict> = Vec::new();

    for record in records {
        let key = format!("{} {}", record.method, record.pattern.shape());
        match first_by_shape.get(&key) {
            None => {
                first_by_shape.insert(key, kept.len());
                kept.push(record);
            }
            Some(&idx) => {
                let winner = &kept[idx];
                let conflict = Conflict {
                    method: record.method.clone(),
                    shape: record.pattern.shape(),
                    kept_pattern: winner.pattern.to_string(),
                    kept_source: winner.source.clone(),
                    dropped_pattern: record.pattern.to_string(),
                    dropped_source: record.source.clone(),
                };
                if policy == ConflictPolicy::NonStrict {
                    warn!(
                        method = %conflict.method,
                        kept = %conflict.kept_source.display(),
                        dropped = %conflict.dropped_source.display(),
                        shape = %conflict.shape,
                        "ambiguous route dropped: pattern shape already registered"
                    );
                }
                conflicts.push(conflict);
            }
        }
    }

    if policy == ConflictPolicy::Strict && !conflicts.is_empty() {
        return Err(RegistrationError::Conflict { conflicts });
    }

    Ok((kept, conflicts))
}
