//! Client-side views of backend records.
//!
//! DESIGN
//! ======
//! Backend entities (programs, courses, grades, payments, ...) are opaque JSON
//! and stay `serde_json::Value` all the way to rendering. The signed-in `User`
//! is the exception: routing needs its `role`, so it gets a lenient typed shape
//! with everything else kept in `extra`.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Opaque backend record.
pub type Record = serde_json::Value;

/// Platform role. Anything unrecognised is treated as a student.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Role {
    Admin,
    Lecturer,
    #[default]
    Student,
}

impl Role {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "admin" | "administrator" | "superadmin" => Self::Admin,
            "lecturer" | "instructor" | "teacher" => Self::Lecturer,
            _ => Self::Student,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Lecturer => "lecturer",
            Self::Student => "student",
        }
    }

    /// Landing route for this role after sign-in.
    pub fn dashboard_path(self) -> &'static str {
        match self {
            Self::Admin => "/dashboard/admin",
            Self::Lecturer => "/dashboard/lecturer",
            Self::Student => "/dashboard/student",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Admin => "Admin",
            Self::Lecturer => "Lecturer",
            Self::Student => "Student",
        }
    }
}

impl Serialize for Role {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Self::from_value(&serde_json::Value::deserialize(deserializer)?))
    }
}

impl Role {
    /// Any non-string role (null, object, number) reads as a student.
    pub fn from_value(value: &serde_json::Value) -> Self {
        value.as_str().map(Self::parse).unwrap_or_default()
    }
}

/// The authenticated user as returned by `/auth/me`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: Role,
    /// Every other profile field, untouched.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl<'de> Deserialize<'de> for User {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut fields = serde_json::Map::<String, serde_json::Value>::deserialize(deserializer)?;

        // Document stores often send both `id` and `_id`; the first non-null wins.
        let id_value = take_first(&mut fields, &["id", "_id"]);
        let id = id_text(id_value).map_err(D::Error::custom)?;
        let email = text(take_first(&mut fields, &["email"])).unwrap_or_default();
        let first_name = text(take_first(&mut fields, &["firstName", "first_name"]));
        let last_name = text(take_first(&mut fields, &["lastName", "last_name"]));
        let role = Role::from_value(&take_first(&mut fields, &["role"]));

        Ok(Self { id, email, first_name, last_name, role, extra: fields })
    }
}

impl User {
    /// "First Last", falling back to the email address.
    pub fn display_name(&self) -> String {
        let full = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        if full.is_empty() { self.email.clone() } else { full }
    }
}

/// A signed-in session: bearer token plus loaded profile.
#[derive(Clone, Debug, PartialEq)]
pub struct Session {
    pub token: String,
    pub user: User,
}

/// Remove every key and keep the first non-null value.
fn take_first(fields: &mut serde_json::Map<String, serde_json::Value>, keys: &[&str]) -> serde_json::Value {
    let values: Vec<serde_json::Value> = keys.iter().filter_map(|key| fields.remove(*key)).collect();
    values.into_iter().find(|value| !value.is_null()).unwrap_or(serde_json::Value::Null)
}

fn text(value: serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => Some(s),
        _ => None,
    }
}

/// Ids arrive as strings, numbers or `{ "$oid": ... }` depending on the endpoint.
fn id_text(value: serde_json::Value) -> Result<String, String> {
    match value {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        serde_json::Value::Null => Ok(String::new()),
        serde_json::Value::Object(ref map) => match map.get("$oid").and_then(serde_json::Value::as_str) {
            Some(oid) => Ok(oid.to_owned()),
            None => Err(format!("expected string or number id, got {value}")),
        },
        other => Err(format!("expected string or number id, got {other}")),
    }
}
