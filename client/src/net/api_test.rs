use super::*;
use crate::net::http::Method;
use crate::net::test_support::scripted_client;
use futures::executor::block_on;
use serde_json::json;

// =============================================================
// Paths + shapes
// =============================================================

#[test]
fn resource_paths() {
    assert_eq!(Resource::Programs.path(), "/programs");
    assert_eq!(Resource::Seasons.path(), "/seasons");
    assert_eq!(Resource::Courses.item_path("c 1"), "/courses/c%201");
}

#[test]
fn records_from_accepts_bare_array_and_wrappers() {
    assert_eq!(records_from(json!([{ "id": 1 }])), vec![json!({ "id": 1 })]);
    assert_eq!(records_from(json!({ "items": [1, 2] })), vec![json!(1), json!(2)]);
    assert_eq!(records_from(json!({ "results": [3] })), vec![json!(3)]);
    assert_eq!(records_from(json!({ "rows": [4] })), vec![json!(4)]);
}

#[test]
fn records_from_unknown_shapes_are_empty() {
    assert!(records_from(json!({ "count": 3 })).is_empty());
    assert!(records_from(json!("nope")).is_empty());
    assert!(records_from(Value::Null).is_empty());
}

#[test]
fn record_id_reads_string_or_number() {
    assert_eq!(record_id(&json!({ "id": "p1" })).as_deref(), Some("p1"));
    assert_eq!(record_id(&json!({ "_id": 12 })).as_deref(), Some("12"));
    assert_eq!(record_id(&json!({ "name": "x" })), None);
}

// =============================================================
// CRUD
// =============================================================

#[test]
fn list_unwraps_envelope() {
    let (api, transport, _) = scripted_client();
    transport.respond(200, r#"{"data":[{"id":1},{"id":2}]}"#);

    let items = block_on(list(&api, Resource::Programs)).unwrap();

    assert_eq!(items.len(), 2);
    assert_eq!(transport.requests()[0].url, "https://api.test/v1/programs");
}

#[test]
fn list_or_empty_swallows_errors() {
    let (api, transport, _) = scripted_client();
    transport.respond(500, r#"{"message":"boom"}"#);
    assert!(block_on(list_or_empty(&api, Resource::Courses)).is_empty());
}

#[test]
fn update_and_delete_use_item_paths() {
    let (api, transport, _) = scripted_client();
    transport.respond(200, r#"{"id":"g1","score":90}"#);
    transport.respond(204, "");

    let updated = block_on(update(&api, Resource::Grades, "g1", json!({ "score": 90 }))).unwrap();
    block_on(delete(&api, Resource::Grades, "g1")).unwrap();

    assert_eq!(updated["score"], json!(90));
    let sent = transport.requests();
    assert_eq!(sent[0].method, Method::Put);
    assert_eq!(sent[0].url, "https://api.test/v1/grades/g1");
    assert_eq!(sent[1].method, Method::Delete);
}

#[test]
fn create_propagates_backend_error() {
    let (api, transport, _) = scripted_client();
    transport.respond(422, r#"{"error":"Title is required"}"#);
    let err = block_on(create(&api, Resource::Courses, json!({}))).unwrap_err();
    assert_eq!(err.to_string(), "Title is required");
}

// =============================================================
// Dashboard stats
// =============================================================

#[test]
fn dashboard_stats_settle_independently() {
    let (api, transport, _) = scripted_client();
    // Admin: programs, courses, users, payments.
    transport.respond(200, "[1,2,3]");
    transport.respond(500, "{}");
    transport.respond(200, r#"{"data":[1]}"#);
    transport.fail(ApiError::Timeout(30_000));

    let stats = block_on(fetch_dashboard_stats(&api, Role::Admin));

    assert_eq!(
        stats,
        vec![
            StatCard { resource: Resource::Programs, count: 3 },
            StatCard { resource: Resource::Courses, count: 0 },
            StatCard { resource: Resource::Users, count: 1 },
            StatCard { resource: Resource::Payments, count: 0 },
        ]
    );
    assert_eq!(transport.request_count(), 4);
}

#[test]
fn dashboard_resources_per_role() {
    assert_eq!(dashboard_resources(Role::Student), &[Resource::Courses, Resource::Grades, Resource::Certificates]);
    assert_eq!(dashboard_resources(Role::Lecturer).len(), 3);
}
