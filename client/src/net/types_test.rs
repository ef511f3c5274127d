use super::*;
use serde_json::json;

// =============================================================
// Role
// =============================================================

#[test]
fn role_parse_known_values() {
    assert_eq!(Role::parse("admin"), Role::Admin);
    assert_eq!(Role::parse(" Lecturer "), Role::Lecturer);
    assert_eq!(Role::parse("STUDENT"), Role::Student);
}

#[test]
fn role_parse_unknown_defaults_to_student() {
    assert_eq!(Role::parse("parent"), Role::Student);
    assert_eq!(Role::parse(""), Role::Student);
}

#[test]
fn role_dashboard_paths() {
    assert_eq!(Role::Admin.dashboard_path(), "/dashboard/admin");
    assert_eq!(Role::Lecturer.dashboard_path(), "/dashboard/lecturer");
    assert_eq!(Role::Student.dashboard_path(), "/dashboard/student");
}

#[test]
fn role_serializes_lowercase() {
    assert_eq!(serde_json::to_value(Role::Lecturer).unwrap(), json!("lecturer"));
}

// =============================================================
// User
// =============================================================

#[test]
fn user_deserializes_camel_case_and_numeric_id() {
    let user: User = serde_json::from_value(json!({
        "id": 42,
        "email": "ada@example.com",
        "firstName": "Ada",
        "lastName": "Lovelace",
        "role": "admin",
        "phone": "555"
    }))
    .unwrap();

    assert_eq!(user.id, "42");
    assert_eq!(user.role, Role::Admin);
    assert_eq!(user.display_name(), "Ada Lovelace");
    assert_eq!(user.extra.get("phone"), Some(&json!("555")));
}

#[test]
fn user_accepts_mongo_style_id() {
    let user: User = serde_json::from_value(json!({ "_id": "abc", "email": "x@y.z", "role": "lecturer" })).unwrap();
    assert_eq!(user.id, "abc");
    assert_eq!(user.role, Role::Lecturer);
}

#[test]
fn user_missing_or_unknown_role_is_student() {
    let missing: User = serde_json::from_value(json!({ "id": "1", "email": "a@b.c" })).unwrap();
    let unknown: User = serde_json::from_value(json!({ "id": "1", "email": "a@b.c", "role": "guest" })).unwrap();
    let null: User = serde_json::from_value(json!({ "id": "1", "role": null })).unwrap();
    assert_eq!(missing.role, Role::Student);
    assert_eq!(unknown.role, Role::Student);
    assert_eq!(null.role, Role::Student);
}

#[test]
fn display_name_falls_back_to_email() {
    let user: User = serde_json::from_value(json!({ "id": "1", "email": "solo@example.com", "first_name": " " })).unwrap();
    assert_eq!(user.display_name(), "solo@example.com");
}

#[test]
fn user_rejects_object_id() {
    let result = serde_json::from_value::<User>(json!({ "id": { "nested": true } }));
    assert!(result.is_err());
}

#[test]
fn user_with_both_id_and_mongo_id_prefers_id() {
    let user: User = serde_json::from_value(json!({ "_id": "abc", "id": "abc", "email": "x@y.z" })).unwrap();
    assert_eq!(user.id, "abc");
    assert!(!user.extra.contains_key("_id"));
}

#[test]
fn user_falls_back_to_mongo_id_when_id_is_null() {
    let user: User = serde_json::from_value(json!({ "id": null, "_id": { "$oid": "65f0" } })).unwrap();
    assert_eq!(user.id, "65f0");
}

#[test]
fn user_null_email_reads_as_empty() {
    let user: User = serde_json::from_value(json!({ "id": "1", "email": null, "firstName": null })).unwrap();
    assert_eq!(user.email, "");
    assert_eq!(user.first_name, None);
}

#[test]
fn user_non_string_role_is_student() {
    let object: User = serde_json::from_value(json!({ "id": "1", "role": { "name": "admin" } })).unwrap();
    let number: User = serde_json::from_value(json!({ "id": "1", "role": 3 })).unwrap();
    assert_eq!(object.role, Role::Student);
    assert_eq!(number.role, Role::Student);
}
