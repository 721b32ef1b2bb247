use treeroute::resolver::resolve_routes;
use treeroute::scan_routes;

mod common;
use common::fixtures::Project;

fn resolved_patterns(project: &Project, prefix: &str) -> Vec<(String, String)> {
    let tree = scan_routes(&project.routes_dir()).expect("scan failed");
    resolve_routes(&tree, prefix)
        .into_iter()
        .map(|r| (r.method.to_string(), r.pattern.to_string()))
        .collect()
}

#[test]
fn test_patterns_concatenate_segment_transforms() {
    let project = Project::new();
    project.route_file("users/[id]/posts/[post_id]/GET.js");

    let routes = resolved_patterns(&project, "");
    assert_eq!(
        routes,
        vec![("GET".to_string(), "/users/:id/posts/:post_id".to_string())]
    );
}

#[test]
fn test_root_handler_resolves_to_root_path() {
    let project = Project::new();
    project.route_file("GET.js");

    let routes = resolved_patterns(&project, "");
    assert_eq!(routes, vec![("GET".to_string(), "/".to_string())]);
}

#[test]
fn test_prefix_is_prepended_as_literals() {
    let project = Project::new();
    project.route_file("GET.js");
    project.route_file("users/GET.js");

    let routes = resolved_patterns(&project, "/api/v1");
    assert_eq!(
        routes,
        vec![
            ("GET".to_string(), "/api/v1".to_string()),
            ("GET".to_string(), "/api/v1/users".to_string()),
        ]
    );
}

#[test]
fn test_parents_before_children_siblings_alphabetical() {
    let project = Project::new();
    project.route_file("zoo/GET.js");
    project.route_file("zoo/birds/GET.js");
    project.route_file("zoo/ants/GET.js");

    let routes = resolved_patterns(&project, "");
    let patterns: Vec<&str> = routes.iter().map(|(_, p)| p.as_str()).collect();
    assert_eq!(patterns, vec!["/zoo", "/zoo/ants", "/zoo/birds"]);
}

#[test]
fn test_static_siblings_resolve_before_dynamic() {
    let project = Project::new();
    project.route_file("users/GET.js");
    project.route_file("users/[id]/GET.js");
    project.route_file("users/profile/GET.js");

    let routes = resolved_patterns(&project, "");
    let patterns: Vec<&str> = routes.iter().map(|(_, p)| p.as_str()).collect();
    // "[id]" sorts before "profile" as a raw name; the resolver must still
    // put the static sibling first.
    assert_eq!(patterns, vec!["/users", "/users/profile", "/users/:id"]);
}

#[test]
fn test_methods_at_one_node_resolve_in_fixed_order() {
    let project = Project::new();
    project.route_file("items/POST.js");
    project.route_file("items/GET.js");
    project.route_file("items/DELETE.js");

    let routes = resolved_patterns(&project, "");
    let methods: Vec<&str> = routes.iter().map(|(m, _)| m.as_str()).collect();
    assert_eq!(methods, vec!["DELETE", "GET", "POST"]);
}

#[test]
fn test_resolution_is_idempotent() {
    let project = Project::new();
    project.route_file("GET.js");
    project.route_file("users/GET.js");
    project.route_file("users/[id]/GET.js");
    project.route_file("users/[id]/POST.js");
    project.route_file("users/profile/GET.js");

    let first = resolved_patterns(&project, "/api");
    let second = resolved_patterns(&project, "/api");
    assert_eq!(first, second);
}
