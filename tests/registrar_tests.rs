use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use treeroute::loader::echo_handler;
use treeroute::{
    register_routes, EchoLoader, HandlerRequest, HostServer, ModuleLoader, RegisterOptions,
    RegistrationError, RouteModule, RouteRecord,
};

mod common;
use common::fixtures::Project;

/// Host that records mount calls in order.
#[derive(Default)]
struct RecordingServer {
    mounted: Vec<RouteRecord>,
}

impl HostServer for RecordingServer {
    fn mount(&mut self, record: RouteRecord) {
        self.mounted.push(record);
    }
}

/// Loader that declares the same middleware list for every route.
struct DeclaringLoader {
    declared: Vec<String>,
}

impl DeclaringLoader {
    fn new(declared: &[&str]) -> Self {
        Self {
            declared: declared.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl ModuleLoader for DeclaringLoader {
    fn load_route(&self, _source: &Path) -> Result<RouteModule, RegistrationError> {
        Ok(RouteModule {
            handler: Arc::new(echo_handler),
            middleware: self.declared.clone(),
        })
    }
}

fn mounted_patterns(server: &RecordingServer) -> Vec<String> {
    server
        .mounted
        .iter()
        .map(|r| r.pattern.to_string())
        .collect()
}

#[test]
fn test_static_paths_register_before_sibling_dynamic() {
    let project = Project::new();
    project.route_file("users/GET.js");
    project.route_file("users/[id]/GET.js");
    project.route_file("users/profile/GET.js");

    let mut server = RecordingServer::default();
    register_routes(
        &mut server,
        &project.routes_dir(),
        &RegisterOptions::default(),
        &EchoLoader,
    )
    .expect("registration failed");

    assert_eq!(
        mounted_patterns(&server),
        vec!["/users", "/users/profile", "/users/:id"]
    );
}

#[test]
fn test_chains_are_globals_then_declared_then_handler() {
    let project = Project::new();
    project.route_file("users/GET.js");
    project.middleware_file("a._global.js");
    project.middleware_file("z._global.js");
    project.middleware_file("m1.js");
    project.middleware_file("m2.js");

    let mut server = RecordingServer::default();
    let loader = DeclaringLoader::new(&["m1", "m2"]);
    let table = register_routes(
        &mut server,
        &project.routes_dir(),
        &RegisterOptions::default(),
        &loader,
    )
    .expect("registration failed");

    let chain: Vec<&str> = table.records()[0]
        .chain
        .iter()
        .map(|m| m.name.as_str())
        .collect();
    assert_eq!(chain, vec!["a", "z", "m1", "m2"]);
}

#[test]
fn test_skip_sentinel_omits_globals_for_the_route() {
    let project = Project::new();
    project.route_file("users/GET.js");
    project.middleware_file("a._global.js");
    project.middleware_file("z._global.js");
    project.middleware_file("m1.js");

    let mut server = RecordingServer::default();
    let loader = DeclaringLoader::new(&["!_global", "m1"]);
    let table = register_routes(
        &mut server,
        &project.routes_dir(),
        &RegisterOptions::default(),
        &loader,
    )
    .expect("registration failed");

    let chain: Vec<&str> = table.records()[0]
        .chain
        .iter()
        .map(|m| m.name.as_str())
        .collect();
    assert_eq!(chain, vec!["m1"]);
}

#[test]
fn test_unknown_middleware_aborts_before_any_mount() {
    let project = Project::new();
    project.route_file("a/GET.js");
    project.route_file("b/GET.js");
    project.middleware_file("m1.js");

    let mut server = RecordingServer::default();
    let loader = DeclaringLoader::new(&["missing"]);
    let err = register_routes(
        &mut server,
        &project.routes_dir(),
        &RegisterOptions::default(),
        &loader,
    )
    .expect_err("registration should fail");

    assert!(matches!(err, RegistrationError::MiddlewareNotFound { .. }));
    assert!(server.mounted.is_empty(), "nothing may be partially mounted");
}

#[test]
fn test_strict_conflict_aborts_before_any_mount() {
    let project = Project::new();
    project.route_file("users/[id]/GET.js");
    project.route_file("users/[uid]/GET.js");

    let mut server = RecordingServer::default();
    let options = RegisterOptions {
        strict: true,
        ..RegisterOptions::default()
    };
    let err = register_routes(&mut server, &project.routes_dir(), &options, &EchoLoader)
        .expect_err("strict registration should fail");

    assert!(matches!(err, RegistrationError::Conflict { .. }));
    assert!(server.mounted.is_empty());
}

#[test]
fn test_non_strict_commits_survivor_and_reports_drop() {
    let project = Project::new();
    project.route_file("users/[id]/GET.js");
    project.route_file("users/[uid]/GET.js");

    let mut server = RecordingServer::default();
    let table = register_routes(
        &mut server,
        &project.routes_dir(),
        &RegisterOptions::default(),
        &EchoLoader,
    )
    .expect("registration failed");

    assert_eq!(mounted_patterns(&server), vec!["/users/:id"]);
    assert_eq!(table.dropped_conflicts().len(), 1);
}

#[test]
fn test_prefix_applies_to_every_pattern() {
    let project = Project::new();
    project.route_file("GET.js");
    project.route_file("users/GET.js");

    let mut server = RecordingServer::default();
    let options = RegisterOptions {
        prefix: "/api".to_string(),
        ..RegisterOptions::default()
    };
    register_routes(&mut server, &project.routes_dir(), &options, &EchoLoader)
        .expect("registration failed");

    assert_eq!(mounted_patterns(&server), vec!["/api", "/api/users"]);
}

#[test]
fn test_committed_handler_is_callable() {
    let project = Project::new();
    project.route_file("users/[id]/GET.js");

    let mut server = RecordingServer::default();
    let table = register_routes(
        &mut server,
        &project.routes_dir(),
        &RegisterOptions::default(),
        &EchoLoader,
    )
    .expect("registration failed");

    let record = &table.records()[0];
    let mut params = HashMap::new();
    params.insert("id".to_string(), "42".to_string());
    let response = (record.handler)(HandlerRequest {
        method: record.method.clone(),
        path: "/users/42".to_string(),
        path_params: params,
        body: None,
    });

    assert_eq!(response.status, 200);
    assert_eq!(response.body["path"], "/users/42");
    assert_eq!(response.body["params"]["id"], "42");
}

#[test]
fn test_pipeline_is_idempotent_over_unchanged_tree() {
    let project = Project::new();
    project.route_file("GET.js");
    project.route_file("users/GET.js");
    project.route_file("users/[id]/GET.js");
    project.middleware_file("a._global.js");

    let run = || {
        let mut server = RecordingServer::default();
        register_routes(
            &mut server,
            &project.routes_dir(),
            &RegisterOptions::default(),
            &EchoLoader,
        )
        .expect("registration failed");
        server
            .mounted
            .iter()
            .map(|r| {
                let chain: Vec<String> = r.chain.iter().map(|m| m.name.clone()).collect();
                (r.method.to_string(), r.pattern.to_string(), chain)
            })
            .collect::<Vec<_>>()
    };

    assert_eq!(run(), run());
}
