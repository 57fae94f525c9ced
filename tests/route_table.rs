//! Properties of the built admin route table.

use admin_routes::controllers;
use admin_routes::routes;
use admin_routes::routing::{
    BuildError, GroupAttributes, HandlerRef, RouteFile, RouteTable, RouteTableBuilder, Verb,
};

fn any_handler(_: &HandlerRef) -> bool {
    true
}

fn admin_table() -> RouteTable {
    routes::builder().build(&controllers::registry()).unwrap()
}

#[test]
fn test_admin_table_has_expected_entries_in_order() {
    let table = admin_table();

    let rows: Vec<(String, String, Option<&str>, String)> = table
        .entries()
        .iter()
        .map(|e| {
            (
                e.methods_label(),
                e.path.to_string(),
                e.name.as_deref(),
                e.handler.to_string(),
            )
        })
        .collect();

    let back = "App\\Http\\Controllers\\Back";
    let expected = vec![
        ("GET", "/admin/", "admin", format!("{back}\\AdminController@index")),
        ("GET", "/admin/days", "days.index", format!("{back}\\DaysController@index")),
        ("GET", "/admin/days/create", "days.create", format!("{back}\\DaysController@create")),
        ("POST", "/admin/days", "days.store", format!("{back}\\DaysController@store")),
        ("GET", "/admin/days/{day}/edit", "days.edit", format!("{back}\\DaysController@edit")),
        ("PUT|PATCH", "/admin/days/{day}", "days.update", format!("{back}\\DaysController@update")),
        ("DELETE", "/admin/days/{day}", "days.destroy", format!("{back}\\DaysController@destroy")),
        ("GET", "/admin/days/{day}", "days.destroy.alert", format!("{back}\\DaysController@alert")),
    ];

    assert_eq!(rows.len(), expected.len());
    for (row, (method, path, name, handler)) in rows.iter().zip(&expected) {
        assert_eq!(row.0, *method);
        assert_eq!(row.1, *path);
        assert_eq!(row.2, Some(*name));
        assert_eq!(&row.3, handler);
    }
}

#[test]
fn test_every_admin_route_carries_admin_middleware() {
    for entry in admin_table().entries() {
        assert_eq!(entry.middleware, vec!["admin".to_string()], "{}", entry.label());
    }
}

#[test]
fn test_group_prefix_is_applied_without_double_slashes() {
    for entry in admin_table().entries() {
        let path = entry.path.as_str();
        assert!(path.starts_with("/admin/"), "{}", path);
        assert!(!path.contains("//"), "{}", path);
    }
}

#[test]
fn test_day_placeholder_on_every_parameterized_route() {
    let table = admin_table();
    let with_params: Vec<_> = table
        .entries()
        .iter()
        .filter(|e| e.path.params().next().is_some())
        .collect();

    assert_eq!(with_params.len(), 4);
    for entry in with_params {
        assert_eq!(entry.path.params().collect::<Vec<_>>(), vec!["day"]);
    }
}

#[test]
fn test_show_is_excluded_and_alert_takes_its_place() {
    let table = admin_table();
    assert!(table.by_name("days.show").is_none());

    let m = table
        .match_route(&axum::http::Method::GET, "/admin/days/14")
        .unwrap();
    assert_eq!(m.entry.name.as_deref(), Some("days.destroy.alert"));
    assert_eq!(m.param("day"), Some("14"));

    assert_eq!(
        table.allowed_methods("/admin/days/14"),
        vec![Verb::Get, Verb::Put, Verb::Patch, Verb::Delete]
    );
}

#[test]
fn test_named_urls() {
    let table = admin_table();
    assert_eq!(table.url("admin", &[]).unwrap(), "/admin/");
    assert_eq!(table.url("days.edit", &[("day", "3")]).unwrap(), "/admin/days/3/edit");
    assert_eq!(table.url("days.destroy.alert", &[("day", "3")]).unwrap(), "/admin/days/3");
}

#[test]
fn test_generated_urls_match_their_route() {
    let table = admin_table();
    let url = table.url("days.edit", &[("day", "first week")]).unwrap();
    assert_eq!(url, "/admin/days/first%20week/edit");

    let m = table.match_route(&axum::http::Method::GET, &url).unwrap();
    assert_eq!(m.entry.name.as_deref(), Some("days.edit"));
    assert_eq!(m.param("day"), Some("first week"));
}

#[test]
fn test_build_is_deterministic() {
    let a = serde_json::to_string(&admin_table()).unwrap();
    let b = serde_json::to_string(&admin_table()).unwrap();
    assert_eq!(a, b);
    assert_eq!(admin_table().to_string(), admin_table().to_string());
}

#[test]
fn test_except_count() {
    let cases: Vec<(Vec<&str>, usize)> = vec![
        (vec![], 7),
        (vec!["show"], 6),
        (vec!["show", "edit"], 5),
        (vec!["show", "bogus"], 6),
        (vec!["bogus"], 7),
    ];

    for (except, expected) in cases {
        let mut b = RouteTableBuilder::new();
        b.resource("days", "DaysController").except(except.clone());
        let table = b.build(&any_handler).unwrap();
        assert_eq!(table.len(), expected, "except {:?}", except);
    }
}

#[test]
fn test_except_and_parameters_apply_in_either_order() {
    let mut excluded_first = RouteTableBuilder::new();
    excluded_first
        .resource("days", "DaysController")
        .except(["show"])
        .parameters([("days", "entry")]);

    let mut renamed_first = RouteTableBuilder::new();
    renamed_first
        .resource("days", "DaysController")
        .parameters([("days", "entry")])
        .except(["show"]);

    let a = excluded_first.build(&any_handler).unwrap();
    let b = renamed_first.build(&any_handler).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.len(), 6);
    assert!(a.by_name("days.show").is_none());

    let members: Vec<&str> = a
        .entries()
        .iter()
        .map(|e| e.path.as_str())
        .filter(|p| *p != "/days" && *p != "/days/create")
        .collect();
    assert_eq!(members, vec!["/days/{entry}/edit", "/days/{entry}", "/days/{entry}"]);
    for entry in a.entries() {
        assert!(entry.path.params().all(|p| p == "entry"), "{}", entry.path);
    }
}

#[test]
fn test_duplicate_name_fails_build() {
    let mut b = RouteTableBuilder::new();
    b.group(GroupAttributes::new().prefix("admin"), |b| {
        b.resource("days", "DaysController").except(["show"]);
        b.get("days/{day}", ("DaysController", "alert")).name("days.index");
    });

    match b.build(&any_handler) {
        Err(BuildError::DuplicateRouteName { name, .. }) => assert_eq!(name, "days.index"),
        other => panic!("expected duplicate name error, got {:?}", other),
    }
}

#[test]
fn test_unregistered_handler_fails_build() {
    let mut b = routes::builder();
    b.get("reports", ("ReportsController", "index"));

    match b.build(&controllers::registry()) {
        Err(BuildError::UnresolvedHandler { handler, .. }) => {
            assert_eq!(handler, "ReportsController@index");
        }
        other => panic!("expected unresolved handler error, got {:?}", other),
    }
}

#[test]
fn test_route_file_matches_builtin_routes() {
    let file = RouteFile::from_toml(include_str!("../config/routes.toml")).unwrap();
    let from_file = file.build(&controllers::registry()).unwrap();

    assert_eq!(from_file, admin_table());
    assert_eq!(
        serde_json::to_string(&from_file).unwrap(),
        serde_json::to_string(&admin_table()).unwrap()
    );
}
