//! REST helpers for backend resources.
//!
//! SYSTEM CONTEXT
//! ==============
//! Pages never build resource URLs by hand. They pick a `Resource` and call the
//! CRUD helpers here; records stay opaque `serde_json::Value`.
//!
//! ERROR HANDLING
//! ==============
//! `list_or_empty` and `fetch_dashboard_stats` degrade failures to empty
//! values so a broken endpoint renders an empty state instead of an error
//! page. The plain CRUD helpers propagate `ApiError` for toast reporting.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use futures::future::join_all;
use serde_json::Value;

use super::error::ApiError;
use super::http::ApiClient;
use super::types::{Record, Role};

/// Backend collections.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Resource {
    Programs,
    Courses,
    Classes,
    Grades,
    Resources,
    Certificates,
    Users,
    Payments,
    Seasons,
}

impl Resource {
    pub fn path(self) -> &'static str {
        match self {
            Self::Programs => "/programs",
            Self::Courses => "/courses",
            Self::Classes => "/classes",
            Self::Grades => "/grades",
            Self::Resources => "/resources",
            Self::Certificates => "/certificates",
            Self::Users => "/users",
            Self::Payments => "/payments",
            Self::Seasons => "/seasons",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Programs => "Programs",
            Self::Courses => "Courses",
            Self::Classes => "Classes",
            Self::Grades => "Grades",
            Self::Resources => "Resources",
            Self::Certificates => "Certificates",
            Self::Users => "Users",
            Self::Payments => "Payments",
            Self::Seasons => "Seasons",
        }
    }

    pub fn item_path(self, id: &str) -> String {
        format!("{}/{}", self.path(), urlencoding::encode(id))
    }
}

/// Normalize a list response into records.
///
/// Accepts a bare array or an object holding the array under `items`,
/// `results`, `rows` or the resource-agnostic `records`. Anything else is an
/// empty list.
pub fn records_from(body: Value) -> Vec<Record> {
    match body {
        Value::Array(items) => items,
        Value::Object(mut map) => ["items", "results", "rows", "records"]
            .iter()
            .find_map(|key| match map.remove(*key) {
                Some(Value::Array(items)) => Some(items),
                _ => None,
            })
            .unwrap_or_default(),
        _ => Vec::new(),
    }
}

/// Stable id of a record (`id` or `_id`, string or number).
pub fn record_id(record: &Record) -> Option<String> {
    ["id", "_id"].iter().find_map(|key| match record.get(*key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// # Errors
///
/// Propagates the request error.
pub async fn list(api: &ApiClient, resource: Resource) -> Result<Vec<Record>, ApiError> {
    api.get(resource.path()).await.map(records_from)
}

/// List a resource, logging and swallowing any failure.
pub async fn list_or_empty(api: &ApiClient, resource: Resource) -> Vec<Record> {
    match list(api, resource).await {
        Ok(items) => items,
        Err(err) => {
            leptos::logging::warn!("{} list failed: {err}", resource.label());
            Vec::new()
        }
    }
}

/// # Errors
///
/// Propagates the request error.
pub async fn get(api: &ApiClient, resource: Resource, id: &str) -> Result<Record, ApiError> {
    api.get(&resource.item_path(id)).await
}

/// # Errors
///
/// Propagates the request error.
pub async fn create(api: &ApiClient, resource: Resource, body: Value) -> Result<Record, ApiError> {
    api.post(resource.path(), body).await
}

/// # Errors
///
/// Propagates the request error.
pub async fn update(api: &ApiClient, resource: Resource, id: &str, body: Value) -> Result<Record, ApiError> {
    api.put(&resource.item_path(id), body).await
}

/// # Errors
///
/// Propagates the request error.
pub async fn delete(api: &ApiClient, resource: Resource, id: &str) -> Result<(), ApiError> {
    api.delete(&resource.item_path(id)).await.map(|_| ())
}

/// One dashboard counter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatCard {
    pub resource: Resource,
    pub count: usize,
}

/// Collections counted on each role's dashboard.
pub fn dashboard_resources(role: Role) -> &'static [Resource] {
    match role {
        Role::Admin => &[Resource::Programs, Resource::Courses, Resource::Users, Resource::Payments],
        Role::Lecturer => &[Resource::Classes, Resource::Courses, Resource::Resources],
        Role::Student => &[Resource::Courses, Resource::Grades, Resource::Certificates],
    }
}

/// Count each dashboard collection concurrently.
///
/// Every request settles independently; a failure reports zero for its card
/// and does not hold up the others.
pub async fn fetch_dashboard_stats(api: &ApiClient, role: Role) -> Vec<StatCard> {
    let resources = dashboard_resources(role);
    let results = join_all(resources.iter().map(|r| list(api, *r))).await;

    resources
        .iter()
        .zip(results)
        .map(|(resource, result)| {
            let count = match result {
                Ok(items) => items.len(),
                Err(err) => {
                    leptos::logging::warn!("{} stats failed: {err}", resource.label());
                    0
                }
            };
            StatCard { resource: *resource, count }
        })
        .collect()
}
