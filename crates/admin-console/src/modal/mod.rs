//! Modal visibility and payload kept in the page URL.
//!
//! A manager owns one query key (`param_name`) whose value names the open
//! modal, plus a data key holding its JSON payload. Every write re-reads the
//! current location, so query parameters owned by other writers (search
//! boxes, filters, other managers) survive.

mod history;

pub use self::history::MemoryHistory;

use crate::abstract_trait::{DynHistory, HistoryTrait, NavigationMode};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

pub const DEFAULT_PARAM_NAME: &str = "modal";
pub const MODAL_DATA_KEY: &str = "modalData";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalOptions {
    pub param_name: String,
    pub data_key: String,
    pub default_value: Option<String>,
    pub reset_on_route_change: bool,
}

impl Default for ModalOptions {
    fn default() -> Self {
        Self {
            param_name: DEFAULT_PARAM_NAME.to_string(),
            data_key: MODAL_DATA_KEY.to_string(),
            default_value: None,
            reset_on_route_change: false,
        }
    }
}

impl ModalOptions {
    pub fn named(param_name: &str) -> Self {
        Self {
            param_name: param_name.to_string(),
            ..Self::default()
        }
    }

    pub fn with_data_key(mut self, data_key: &str) -> Self {
        self.data_key = data_key.to_string();
        self
    }

    pub fn with_default(mut self, value: &str) -> Self {
        self.default_value = Some(value.to_string());
        self
    }

    pub fn reset_on_route_change(mut self, reset: bool) -> Self {
        self.reset_on_route_change = reset;
        self
    }
}

pub struct ModalManager {
    history: DynHistory,
    options: ModalOptions,
    last_path: String,
}

impl ModalManager {
    pub fn new(history: DynHistory, options: ModalOptions) -> Self {
        let last_path = history.current().path().to_string();
        Self {
            history,
            options,
            last_path,
        }
    }

    pub fn options(&self) -> &ModalOptions {
        &self.options
    }

    pub fn open_modal(&self, name: &str) {
        self.write_open(name, None);
    }

    /// Opens `name` with a JSON payload. A payload that cannot be encoded is
    /// dropped with a warning; the modal still opens.
    pub fn open_modal_with<T: Serialize + ?Sized>(&self, name: &str, data: &T) {
        self.write_open(name, self.encode(name, data));
    }

    pub fn close_modal(&self) {
        let keys = [
            self.options.param_name.as_str(),
            self.options.data_key.as_str(),
        ];
        self.history
            .commit(NavigationMode::Replace, &mut |url: &mut Url| {
                let pairs = retained_pairs(url, &keys);
                write_pairs(url, &pairs);
            });
    }

    pub fn modal_name(&self) -> Option<String> {
        query_value(&self.history.current(), &self.options.param_name)
            .or_else(|| self.options.default_value.clone())
    }

    /// With `None`, whether any modal of this namespace is open; otherwise
    /// whether `name` is the open one.
    pub fn is_modal_open(&self, name: Option<&str>) -> bool {
        match (self.modal_name(), name) {
            (Some(current), Some(name)) => current == name,
            (Some(_), None) => true,
            (None, _) => false,
        }
    }

    pub fn modal_data<T: DeserializeOwned>(&self) -> Option<T> {
        self.modal_name()?;
        let raw = query_value(&self.history.current(), &self.options.data_key)?;

        match serde_json::from_str(&raw) {
            Ok(data) => Some(data),
            Err(e) => {
                warn!(
                    "Discarding unreadable {} for {}: {e}",
                    self.options.data_key, self.options.param_name
                );
                None
            }
        }
    }

    pub fn modal_data_value(&self) -> Option<Value> {
        self.modal_data::<Value>()
    }

    /// Call once per render. Closes the modal when the path changed since the
    /// previous call and `reset_on_route_change` is set. Returns whether a
    /// reset happened.
    pub fn observe_route(&mut self) -> bool {
        let path = self.history.current().path().to_string();
        if path == self.last_path {
            return false;
        }

        debug!("Route changed from {} to {}", self.last_path, path);
        self.last_path = path;

        if self.options.reset_on_route_change {
            self.close_modal();
            return true;
        }
        false
    }

    /// Link (path and query) that reproduces this page with `name` open.
    pub fn href_for<T: Serialize + ?Sized>(&self, name: &str, data: Option<&T>) -> String {
        let encoded = data.and_then(|data| self.encode(name, data));
        let mut url = self.history.current();
        apply_open(&mut url, &self.options, name, encoded.as_deref());

        match url.query() {
            Some(query) => format!("{}?{}", url.path(), query),
            None => url.path().to_string(),
        }
    }

    fn encode<T: Serialize + ?Sized>(&self, name: &str, data: &T) -> Option<String> {
        match serde_json::to_string(data) {
            Ok(json) => Some(json),
            Err(e) => {
                warn!("Opening {name} without data, payload is not serializable: {e}");
                None
            }
        }
    }

    fn write_open(&self, name: &str, encoded: Option<String>) {
        let options = &self.options;
        self.history
            .commit(NavigationMode::Replace, &mut |url: &mut Url| {
                apply_open(url, options, name, encoded.as_deref());
            });
    }
}

fn apply_open(url: &mut Url, options: &ModalOptions, name: &str, encoded: Option<&str>) {
    let mut pairs = retained_pairs(
        url,
        &[options.param_name.as_str(), options.data_key.as_str()],
    );
    pairs.push((options.param_name.clone(), name.to_string()));
    if let Some(encoded) = encoded {
        pairs.push((options.data_key.clone(), encoded.to_string()));
    }
    write_pairs(url, &pairs);
}

fn query_value(url: &Url, key: &str) -> Option<String> {
    url.query_pairs()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
}

fn retained_pairs(url: &Url, drop: &[&str]) -> Vec<(String, String)> {
    url.query_pairs()
        .filter(|(k, _)| !drop.contains(&&**k))
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}

fn write_pairs(url: &mut Url, pairs: &[(String, String)]) {
    if pairs.is_empty() {
        url.set_query(None);
    } else {
        url.query_pairs_mut().clear().extend_pairs(pairs.iter());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abstract_trait::{HistoryTrait, NavigatorTrait};
    use serde::Deserialize;
    use serde_json::json;
    use std::{collections::HashMap, sync::Arc};

    fn history(start: &str) -> Arc<MemoryHistory> {
        Arc::new(MemoryHistory::parse(start).unwrap())
    }

    fn has_key(history: &MemoryHistory, key: &str) -> bool {
        history.current().query_pairs().any(|(k, _)| k == key)
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct AlarmRef {
        id: u32,
        asset: String,
        tags: Vec<String>,
    }

    #[test]
    fn open_is_idempotent() {
        let history = history("http://console.local/alarms?page=2");
        let modal = ModalManager::new(history.clone(), ModalOptions::named("alarm"));

        modal.open_modal_with("view", &json!({ "id": 12 }));
        let first = history.current().query().map(str::to_string);
        modal.open_modal_with("view", &json!({ "id": 12 }));
        let second = history.current().query().map(str::to_string);

        assert_eq!(first, second);
        assert_eq!(
            history.current().query_pairs().count(),
            3,
            "page, alarm and modalData only"
        );
    }

    #[test]
    fn close_removes_name_and_data_together() {
        let history = history("http://console.local/alarms?q=pump");
        let modal = ModalManager::new(history.clone(), ModalOptions::named("alarm"));

        modal.open_modal_with("edit", &json!({ "id": 3 }));
        assert!(has_key(&history, "alarm"));
        assert!(has_key(&history, MODAL_DATA_KEY));

        modal.close_modal();
        assert!(!has_key(&history, "alarm"));
        assert!(!has_key(&history, MODAL_DATA_KEY));
        assert_eq!(history.current().query(), Some("q=pump"));
        assert!(!modal.is_modal_open(None));
    }

    #[test]
    fn data_round_trips() {
        let history = history("http://console.local/alarms");
        let modal = ModalManager::new(history, ModalOptions::named("alarm"));
        let data = AlarmRef {
            id: 41,
            asset: "Gearbox & pump #2".into(),
            tags: vec!["viscosity".into(), "100%".into()],
        };

        modal.open_modal_with("view", &data);

        assert_eq!(modal.modal_data::<AlarmRef>(), Some(data));
    }

    #[test]
    fn reopening_without_data_clears_stale_payload() {
        let history = history("http://console.local/alarms");
        let modal = ModalManager::new(history.clone(), ModalOptions::named("alarm"));

        modal.open_modal_with("view", &json!({ "id": 1 }));
        modal.open_modal("create");

        assert!(!has_key(&history, MODAL_DATA_KEY));
        assert!(modal.modal_data_value().is_none());
    }

    #[test]
    fn named_and_any_open_checks() {
        let history = history("http://console.local/alarms");
        let modal = ModalManager::new(history, ModalOptions::named("alarm"));

        assert!(!modal.is_modal_open(None));
        modal.open_modal("delete");

        assert!(modal.is_modal_open(None));
        assert!(modal.is_modal_open(Some("delete")));
        assert!(!modal.is_modal_open(Some("edit")));
    }

    #[test]
    fn second_variant_replaces_first_in_namespace() {
        let history = history("http://console.local/alarms");
        let modal = ModalManager::new(history.clone(), ModalOptions::named("alarm"));

        modal.open_modal("view");
        modal.open_modal("edit");

        assert_eq!(modal.modal_name().as_deref(), Some("edit"));
        assert_eq!(
            history
                .current()
                .query_pairs()
                .filter(|(k, _)| k == "alarm")
                .count(),
            1
        );
    }

    #[test]
    fn unreadable_data_yields_none() {
        let history = history("http://console.local/alarms?alarm=view&modalData=%7Bnot-json");
        let modal = ModalManager::new(history, ModalOptions::named("alarm"));

        assert!(modal.is_modal_open(Some("view")));
        assert!(modal.modal_data_value().is_none());
    }

    #[test]
    fn data_without_name_is_ignored() {
        let history = history("http://console.local/alarms?modalData=%7B%22id%22%3A1%7D");
        let modal = ModalManager::new(history, ModalOptions::named("alarm"));

        assert!(modal.modal_data_value().is_none());
    }

    #[test]
    fn unserializable_payload_still_opens() {
        let history = history("http://console.local/samples");
        let modal = ModalManager::new(history.clone(), ModalOptions::default());
        let mut bad: HashMap<(u8, u8), u8> = HashMap::new();
        bad.insert((1, 2), 3);

        modal.open_modal_with("view", &bad);

        assert!(modal.is_modal_open(Some("view")));
        assert!(!has_key(&history, MODAL_DATA_KEY));
    }

    #[test]
    fn writes_merge_with_other_query_writers() {
        let history = history("http://console.local/alarms");
        let modal = ModalManager::new(history.clone(), ModalOptions::named("alarm"));

        modal.open_modal("view");
        history.commit(NavigationMode::Replace, &mut |url: &mut Url| {
            url.query_pairs_mut().append_pair("q", "gearbox");
        });
        modal.open_modal("edit");
        modal.close_modal();

        assert_eq!(history.current().query(), Some("q=gearbox"));
    }

    #[test]
    fn independent_namespaces_do_not_collide() {
        let history = history("http://console.local/assets");
        let alarms = ModalManager::new(
            history.clone(),
            ModalOptions::named("alarm").with_data_key("alarmData"),
        );
        let samples = ModalManager::new(
            history.clone(),
            ModalOptions::named("sample").with_data_key("sampleData"),
        );

        alarms.open_modal_with("view", &json!({ "id": 1 }));
        samples.open_modal_with("edit", &json!({ "id": 2 }));
        alarms.close_modal();

        assert!(!alarms.is_modal_open(None));
        assert!(samples.is_modal_open(Some("edit")));
        assert_eq!(samples.modal_data_value(), Some(json!({ "id": 2 })));
    }

    #[test]
    fn replace_keeps_modal_transitions_out_of_back_stack() {
        let history = history("http://console.local/sites");
        history.navigate("/alarms");
        let modal = ModalManager::new(history.clone(), ModalOptions::named("alarm"));

        modal.open_modal_with("view", &json!({ "id": 5 }));
        modal.close_modal();
        modal.open_modal_with("view", &json!({ "id": 7 }));

        assert_eq!(history.len(), 2);
        assert!(history.back());
        assert_eq!(history.current().path(), "/sites");
        assert!(!modal.is_modal_open(None));

        assert!(history.forward());
        assert_eq!(modal.modal_data_value(), Some(json!({ "id": 7 })));
    }

    #[test]
    fn route_change_resets_once_per_transition() {
        let history = history("http://console.local/alarms");
        let mut modal = ModalManager::new(
            history.clone(),
            ModalOptions::named("alarm").reset_on_route_change(true),
        );

        modal.open_modal("view");
        assert!(!modal.observe_route());

        history.commit(NavigationMode::Push, &mut |url: &mut Url| {
            url.set_path("/samples");
        });
        assert!(modal.is_modal_open(None));

        assert!(modal.observe_route());
        assert!(!modal.is_modal_open(None));

        let navigations = history.navigations();
        assert!(!modal.observe_route());
        assert_eq!(history.navigations(), navigations);
    }

    #[test]
    fn route_change_without_reset_keeps_modal() {
        let history = history("http://console.local/alarms");
        let mut modal = ModalManager::new(history.clone(), ModalOptions::named("alarm"));

        modal.open_modal("view");
        history.commit(NavigationMode::Push, &mut |url: &mut Url| {
            url.set_path("/samples");
        });

        assert!(!modal.observe_route());
        assert!(modal.is_modal_open(Some("view")));
    }

    #[test]
    fn default_value_applies_when_param_absent() {
        let history = history("http://console.local/roles");
        let modal = ModalManager::new(history, ModalOptions::named("role").with_default("list"));

        assert_eq!(modal.modal_name().as_deref(), Some("list"));
        modal.open_modal("edit");
        assert_eq!(modal.modal_name().as_deref(), Some("edit"));
    }

    #[test]
    fn href_reproduces_the_modal_view() {
        let source = history("http://console.local/alarms?q=oil");
        let modal = ModalManager::new(source.clone(), ModalOptions::named("alarm"));
        let href = modal.href_for("view", Some(&json!({ "id": 9 })));

        assert_eq!(source.navigations(), 0);

        let shared = history(&format!("http://console.local{href}"));
        let reopened = ModalManager::new(shared, ModalOptions::named("alarm"));
        assert!(reopened.is_modal_open(Some("view")));
        assert_eq!(reopened.modal_data_value(), Some(json!({ "id": 9 })));
    }
}
