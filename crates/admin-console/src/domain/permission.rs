use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PermissionParseError {
    #[error("permission `{0}` is not of the form resource:action")]
    MissingSeparator(String),
    #[error("permission `{0}` has an empty resource or action")]
    EmptyPart(String),
}

/// A `resource:action` grant.
///
/// Both halves are trimmed and lower-cased when parsed, so every comparison
/// in the console is case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Permission {
    resource: String,
    action: String,
}

impl Permission {
    pub fn new(resource: &str, action: &str) -> Result<Self, PermissionParseError> {
        let resource = resource.trim().to_lowercase();
        let action = action.trim().to_lowercase();

        if resource.is_empty() || action.is_empty() {
            return Err(PermissionParseError::EmptyPart(format!("{resource}:{action}")));
        }

        Ok(Self { resource, action })
    }

    pub fn resource(&self) -> &str {
        &self.resource
    }

    pub fn action(&self) -> &str {
        &self.action
    }
}

impl FromStr for Permission {
    type Err = PermissionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (resource, action) = s
            .split_once(':')
            .ok_or_else(|| PermissionParseError::MissingSeparator(s.to_string()))?;
        Permission::new(resource, action)
    }
}

impl TryFrom<String> for Permission {
    type Error = PermissionParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Permission> for String {
    fn from(value: Permission) -> Self {
        value.to_string()
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.resource, self.action)
    }
}

/// Permission row as returned by `GET /api/v1/roles/{id}/permissions`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PermissionRecord {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub resource: Option<String>,
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub created_at_datetime: Option<String>,
}

impl PermissionRecord {
    /// `name` when it already reads `resource:action`, otherwise the
    /// separate `resource`/`action` columns.
    pub fn to_permission(&self) -> Option<Permission> {
        if let Some(name) = self.name.as_deref()
            && name.contains(':')
        {
            return name.parse().ok();
        }

        match (self.resource.as_deref(), self.action.as_deref()) {
            (Some(resource), Some(action)) => Permission::new(resource, action).ok(),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionSet(BTreeSet<Permission>);

impl PermissionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a set from raw strings, skipping malformed entries.
    pub fn from_strings<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = BTreeSet::new();
        for value in values {
            match value.as_ref().parse::<Permission>() {
                Ok(permission) => {
                    set.insert(permission);
                }
                Err(e) => warn!("Skipping permission: {e}"),
            }
        }
        Self(set)
    }

    pub fn from_records(records: &[PermissionRecord]) -> Self {
        let mut set = BTreeSet::new();
        for record in records {
            match record.to_permission() {
                Some(permission) => {
                    set.insert(permission);
                }
                None => warn!("Skipping unusable permission record: {:?}", record.id),
            }
        }
        Self(set)
    }

    pub fn contains(&self, permission: &Permission) -> bool {
        self.0.contains(permission)
    }

    pub fn intersects(&self, required: &[Permission]) -> bool {
        required.iter().any(|p| self.0.contains(p))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Permission> {
        self.0.iter()
    }

    pub fn to_strings(&self) -> Vec<String> {
        self.0.iter().map(Permission::to_string).collect()
    }

    /// `{ resource: [action, ..] }`, as shown on the role permissions screen.
    pub fn grouped_by_resource(&self) -> BTreeMap<String, Vec<String>> {
        let mut grouped: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for permission in &self.0 {
            grouped
                .entry(permission.resource.clone())
                .or_default()
                .push(permission.action.clone());
        }
        grouped
    }
}

impl FromIterator<Permission> for PermissionSet {
    fn from_iter<T: IntoIterator<Item = Permission>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// What a caller needs before an action or page is allowed.
///
/// `AnyOf` is satisfied by holding at least one of the listed permissions.
/// An empty `AnyOf` can never be satisfied by plain permissions.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Requirement {
    #[default]
    None,
    AnyOf(Vec<Permission>),
}

impl Requirement {
    pub fn one(permission: &str) -> Self {
        Self::any_of([permission])
    }

    pub fn any_of<I, S>(permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let parsed = permissions
            .into_iter()
            .filter_map(|p| match p.as_ref().parse::<Permission>() {
                Ok(permission) => Some(permission),
                Err(e) => {
                    warn!("Ignoring required permission: {e}");
                    None
                }
            })
            .collect();
        Requirement::AnyOf(parsed)
    }

    /// Untyped input from lower-trust call sites: a string, an array of
    /// strings, or null. Anything else is unsatisfiable.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Null => Requirement::None,
            Value::String(s) => Requirement::one(s),
            Value::Array(items) => {
                if items.is_empty() {
                    return Requirement::None;
                }
                Requirement::any_of(items.iter().filter_map(Value::as_str))
            }
            other => {
                warn!("Unrecognised permission requirement: {other}");
                Requirement::AnyOf(Vec::new())
            }
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Requirement::None)
    }

    pub fn satisfied_by(&self, permissions: &PermissionSet) -> bool {
        match self {
            Requirement::None => true,
            Requirement::AnyOf(required) => permissions.intersects(required),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_and_normalises_case() {
        let permission: Permission = " Alarms:Create ".parse().unwrap();
        assert_eq!(permission.resource(), "alarms");
        assert_eq!(permission.action(), "create");
        assert_eq!(permission.to_string(), "alarms:create");
    }

    #[test]
    fn rejects_malformed_permissions() {
        assert!(matches!(
            "alarms".parse::<Permission>(),
            Err(PermissionParseError::MissingSeparator(_))
        ));
        assert!(matches!(
            "alarms:".parse::<Permission>(),
            Err(PermissionParseError::EmptyPart(_))
        ));
    }

    #[test]
    fn record_prefers_name_with_colon() {
        let record = PermissionRecord {
            name: Some("samples:read".into()),
            resource: Some("ignored".into()),
            action: Some("ignored".into()),
            ..Default::default()
        };
        assert_eq!(record.to_permission().unwrap().to_string(), "samples:read");
    }

    #[test]
    fn record_falls_back_to_resource_and_action() {
        let record = PermissionRecord {
            name: Some("Create sampling routes".into()),
            resource: Some("sampling_routes".into()),
            action: Some("create".into()),
            ..Default::default()
        };
        assert_eq!(
            record.to_permission().unwrap().to_string(),
            "sampling_routes:create"
        );

        let unusable = PermissionRecord {
            name: Some("orphan".into()),
            ..Default::default()
        };
        assert!(unusable.to_permission().is_none());
    }

    #[test]
    fn set_deduplicates_and_skips_garbage() {
        let set = PermissionSet::from_strings(["alarms:read", "ALARMS:READ", "junk", "sites:read"]);
        assert_eq!(set.len(), 2);
        assert_eq!(set.to_strings(), vec!["alarms:read", "sites:read"]);
    }

    #[test]
    fn groups_actions_by_resource() {
        let set = PermissionSet::from_strings(["alarms:read", "alarms:create", "users:delete"]);
        let grouped = set.grouped_by_resource();

        assert_eq!(grouped["alarms"], vec!["create", "read"]);
        assert_eq!(grouped["users"], vec!["delete"]);
    }

    #[test]
    fn requirement_is_logical_or() {
        let held = PermissionSet::from_strings(["alarms:read"]);

        assert!(Requirement::any_of(["alarms:read", "alarms:create"]).satisfied_by(&held));
        assert!(!Requirement::one("alarms:create").satisfied_by(&held));
        assert!(Requirement::None.satisfied_by(&held));
        assert!(Requirement::None.satisfied_by(&PermissionSet::new()));
    }

    #[test]
    fn untyped_requirements() {
        let held = PermissionSet::from_strings(["sites:read"]);

        assert!(Requirement::from_value(&Value::Null).is_none());
        assert!(Requirement::from_value(&json!("sites:read")).satisfied_by(&held));
        assert!(Requirement::from_value(&json!(["assets:read", "sites:read"])).satisfied_by(&held));
        assert!(!Requirement::from_value(&json!(42)).satisfied_by(&held));
        assert!(!Requirement::from_value(&json!("not-a-permission")).satisfied_by(&held));
    }
}
