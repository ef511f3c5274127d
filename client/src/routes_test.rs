use super::*;
use crate::net::types::{Session, User};

fn signed_in(role: &str) -> AuthState {
    let user: User =
        serde_json::from_value(serde_json::json!({ "id": "u1", "email": "u@example.com", "role": role })).unwrap();
    let mut state = AuthState::default();
    state.signed_in(Session { token: "tok".to_owned(), user });
    state
}

// =============================================================
// Access table
// =============================================================

#[test]
fn public_pages() {
    for path in ["/", "/login", "/register", "/programs", "/payment/callback?reference=r1"] {
        assert_eq!(access_for(path), Access::Public, "{path}");
    }
}

#[test]
fn gated_pages() {
    assert_eq!(access_for("/dashboard"), Access::Authenticated);
    assert_eq!(access_for("/dashboard/"), Access::Authenticated);
    assert_eq!(access_for("/classroom/c-42"), Access::Authenticated);
    assert_eq!(access_for("/dashboard/admin"), Access::Role(Role::Admin));
    assert_eq!(access_for("/dashboard/lecturer?tab=x"), Access::Role(Role::Lecturer));
    assert_eq!(access_for("/dashboard/student"), Access::Role(Role::Student));
}

// =============================================================
// Guard
// =============================================================

#[test]
fn public_route_always_allowed() {
    assert_eq!(guard(Access::Public, &AuthState::pending(), "/"), GuardDecision::Allow);
    assert_eq!(guard(Access::Public, &AuthState::default(), "/"), GuardDecision::Allow);
}

#[test]
fn gated_route_waits_while_session_restores() {
    assert_eq!(guard(Access::Authenticated, &AuthState::pending(), "/dashboard"), GuardDecision::Wait);
}

#[test]
fn anonymous_user_is_sent_to_login_with_return_path() {
    assert_eq!(
        guard(Access::Role(Role::Admin), &AuthState::default(), "/dashboard/admin"),
        GuardDecision::Redirect("/login?redirect=%2Fdashboard%2Fadmin".to_owned())
    );
}

#[test]
fn wrong_role_goes_to_own_dashboard() {
    assert_eq!(
        guard(Access::Role(Role::Admin), &signed_in("lecturer"), "/dashboard/admin"),
        GuardDecision::Redirect("/dashboard/lecturer".to_owned())
    );
}

#[test]
fn unknown_role_is_treated_as_student() {
    assert_eq!(
        guard(Access::Role(Role::Lecturer), &signed_in("janitor"), "/dashboard/lecturer"),
        GuardDecision::Redirect("/dashboard/student".to_owned())
    );
    assert_eq!(guard(Access::Role(Role::Student), &signed_in("janitor"), "/dashboard/student"), GuardDecision::Allow);
}

#[test]
fn matching_role_allowed() {
    assert_eq!(guard(Access::Role(Role::Admin), &signed_in("admin"), "/dashboard/admin"), GuardDecision::Allow);
    assert_eq!(guard(Access::Authenticated, &signed_in("student"), "/classroom/1"), GuardDecision::Allow);
}

// =============================================================
// Redirect targets
// =============================================================

#[test]
fn login_redirect_omits_home() {
    assert_eq!(login_redirect("/"), "/login");
    assert_eq!(login_redirect(""), "/login");
    assert_eq!(login_redirect("/classroom/a b"), "/login?redirect=%2Fclassroom%2Fa%20b");
}

#[test]
fn post_login_honours_safe_redirect() {
    assert_eq!(post_login_target(Some("/classroom/7"), Role::Student), "/classroom/7");
}

#[test]
fn post_login_rejects_offsite_and_auth_pages() {
    for target in ["https://evil.test", "//evil.test", "/\\evil.test", "dashboard", "/login?redirect=/x", "/register"] {
        assert_eq!(post_login_target(Some(target), Role::Lecturer), "/dashboard/lecturer", "{target}");
    }
    assert_eq!(post_login_target(None, Role::Admin), "/dashboard/admin");
}

#[test]
fn classroom_path_encodes_id() {
    assert_eq!(classroom_path("room 1"), "/classroom/room%201");
}

#[test]
fn return_path_keeps_query_string() {
    assert_eq!(return_path("/classroom/c1", ""), "/classroom/c1");
    assert_eq!(return_path("/classroom/c1", "tab=chat"), "/classroom/c1?tab=chat");
    assert_eq!(return_path("/classroom/c1", "?tab=chat"), "/classroom/c1?tab=chat");
}

#[test]
fn anonymous_redirect_round_trips_query_string() {
    let current = return_path("/dashboard/student", "?page=2");
    let decision = guard(Access::Role(Role::Student), &AuthState::default(), &current);
    assert_eq!(decision, GuardDecision::Redirect("/login?redirect=%2Fdashboard%2Fstudent%3Fpage%3D2".to_owned()));
    assert_eq!(post_login_target(Some(&current), Role::Student), "/dashboard/student?page=2");
}
