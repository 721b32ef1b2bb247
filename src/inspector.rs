//! # Inspector
//!
//! Read-only reporting over a committed [`RouteTable`], for humans debugging
//! their directory conventions. Pure consumer: nothing here mutates
//! registration state.

use serde::Serialize;

use crate::registrar::RouteTable;

/// One committed route, flattened for reporting.
#[derive(Debug, Clone, Serialize)]
pub struct RouteReport {
    pub method: String,
    pub pattern: String,
    /// Middleware names in invocation order; the handler runs last
    pub chain: Vec<String>,
    pub source: String,
}

/// One discovered middleware.
#[derive(Debug, Clone, Serialize)]
pub struct MiddlewareReport {
    pub name: String,
    pub kind: String,
    pub source: String,
}

/// A route dropped by non-strict conflict resolution.
#[derive(Debug, Clone, Serialize)]
pub struct DroppedReport {
    pub method: String,
    pub kept: String,
    pub dropped: String,
}

/// The full table report.
#[derive(Debug, Clone, Serialize)]
pub struct TableReport {
    pub routes: Vec<RouteReport>,
    pub middlewares: Vec<MiddlewareReport>,
    pub dropped: Vec<DroppedReport>,
}

/// Build a serializable report from a committed table.
pub fn report(table: &RouteTable) -> TableReport {
    let routes = table
        .records()
        .iter()
        .map(|r| RouteReport {
            method: r.method.to_string(),
            pattern: r.pattern.to_string(),
            chain: r.chain.iter().map(|m| m.name.clone()).collect(),
            source: r.source.display().to_string(),
        })
        .collect();

    let middlewares = table
        .middlewares()
        .descriptors()
        .into_iter()
        .map(|m| MiddlewareReport {
            name: m.name.clone(),
            kind: m.kind.as_str().to_string(),
            source: m.source.display().to_string(),
        })
        .collect();

    let dropped = table
        .dropped_conflicts()
        .iter()
        .map(|c| DroppedReport {
            method: c.method.to_string(),
            kept: c.kept_source.display().to_string(),
            dropped: c.dropped_source.display().to_string(),
        })
        .collect();

    TableReport {
        routes,
        middlewares,
        dropped,
    }
}

/// Print the committed table to stdout, one line per route.
pub fn dump(table: &RouteTable) {
    println!("[routes] count={}", table.records().len());
    for r in table.records() {
        let chain: Vec<&str> = r.chain.iter().map(|m| m.name.as_str()).collect();
        println!(
            "[route] {} {} chain=[{}] <- {}",
            r.method,
            r.pattern,
            chain.join(", "),
            r.source.display()
        );
    }
    for c in table.dropped_conflicts() {
        println!("[dropped] {c}");
    }
}
