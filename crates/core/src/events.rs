//! Normalized analytics events — the vendor-neutral schema every integration
//! consumes (lifecycle, identify, track, reset).

use std::collections::HashMap;
use std::ops::Deref;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::LifecyclePhase;

/// Untyped key/value payload carried by identify and track events.
///
/// Getters coerce loosely: numbers may arrive as strings and strings may be
/// requested from numeric values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValueMap(HashMap<String, Value>);

impl ValueMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.0.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// String view of a value. `null` and missing keys are absent; non-string
    /// values are rendered as JSON text.
    pub fn get_string(&self, key: &str) -> Option<String> {
        self.0.get(key).and_then(stringify)
    }

    /// Integer view of a value. Floats truncate toward zero, numeric strings
    /// are parsed, anything else yields `default`.
    pub fn get_int(&self, key: &str, default: i64) -> i64 {
        match self.0.get(key) {
            Some(Value::Number(n)) => n
                .as_i64()
                .or_else(|| n.as_f64().map(|f| f.trunc() as i64))
                .unwrap_or(default),
            Some(Value::String(s)) => s.trim().parse().unwrap_or(default),
            _ => default,
        }
    }

    pub fn get_double(&self, key: &str, default: f64) -> f64 {
        match self.0.get(key) {
            Some(Value::Number(n)) => n.as_f64().unwrap_or(default),
            Some(Value::String(s)) => s.trim().parse().unwrap_or(default),
            _ => default,
        }
    }

    /// Every entry stringified. `null` becomes `"null"` so no key is lost.
    pub fn to_string_map(&self) -> HashMap<String, String> {
        self.0
            .iter()
            .map(|(k, v)| (k.clone(), stringify(v).unwrap_or_else(|| "null".to_string())))
            .collect()
    }
}

fn stringify(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for ValueMap {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// Attributes describing a user, supplied with an identify call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Traits(ValueMap);

impl Traits {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: Value) -> Self {
        self.0.insert(key, value);
        self
    }

    pub fn username(&self) -> Option<String> {
        self.0.get_string("username")
    }

    pub fn email(&self) -> Option<String> {
        self.0.get_string("email")
    }
}

impl Deref for Traits {
    type Target = ValueMap;

    fn deref(&self) -> &ValueMap {
        &self.0
    }
}

impl From<ValueMap> for Traits {
    fn from(map: ValueMap) -> Self {
        Self(map)
    }
}

/// Attributes describing a single tracked occurrence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Properties(ValueMap);

impl Properties {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: Value) -> Self {
        self.0.insert(key, value);
        self
    }

    /// Item count, 0 when absent.
    pub fn quantity(&self) -> i64 {
        self.0.get_int("quantity", 0)
    }

    /// Revenue in currency units (dollars), 0.0 when absent.
    pub fn revenue(&self) -> f64 {
        self.0.get_double("revenue", 0.0)
    }
}

impl Deref for Properties {
    type Target = ValueMap;

    fn deref(&self) -> &ValueMap {
        &self.0
    }
}

impl From<ValueMap> for Properties {
    fn from(map: ValueMap) -> Self {
        Self(map)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IdentifyEvent {
    pub user_id: Option<String>,
    #[serde(default)]
    pub traits: Traits,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackEvent {
    pub event: String,
    #[serde(default)]
    pub properties: Properties,
}

impl TrackEvent {
    pub fn new(event: impl Into<String>) -> Self {
        Self {
            event: event.into(),
            properties: Properties::default(),
        }
    }
}

/// One analytics occurrence as delivered by the upstream dispatcher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NormalizedEvent {
    Lifecycle { phase: LifecyclePhase },
    Identify(IdentifyEvent),
    Track(TrackEvent),
    Reset,
}

impl NormalizedEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            NormalizedEvent::Lifecycle { .. } => "lifecycle",
            NormalizedEvent::Identify(_) => "identify",
            NormalizedEvent::Track(_) => "track",
            NormalizedEvent::Reset => "reset",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_get_string_coercion() {
        let map: ValueMap = [
            ("name", json!("ada")),
            ("age", json!(36)),
            ("vip", json!(true)),
            ("nothing", Value::Null),
        ]
        .into_iter()
        .collect();

        assert_eq!(map.get_string("name").as_deref(), Some("ada"));
        assert_eq!(map.get_string("age").as_deref(), Some("36"));
        assert_eq!(map.get_string("vip").as_deref(), Some("true"));
        assert_eq!(map.get_string("nothing"), None);
        assert_eq!(map.get_string("missing"), None);
    }

    #[test]
    fn test_get_int_coercion() {
        let map: ValueMap = [
            ("int", json!(3)),
            ("float", json!(3.7)),
            ("negative_float", json!(-2.9)),
            ("text", json!(" 12 ")),
            ("junk", json!("twelve")),
            ("flag", json!(true)),
        ]
        .into_iter()
        .collect();

        assert_eq!(map.get_int("int", 0), 3);
        assert_eq!(map.get_int("float", 0), 3);
        assert_eq!(map.get_int("negative_float", 0), -2);
        assert_eq!(map.get_int("text", 0), 12);
        assert_eq!(map.get_int("junk", 7), 7);
        assert_eq!(map.get_int("flag", 7), 7);
        assert_eq!(map.get_int("missing", 5), 5);
    }

    #[test]
    fn test_get_double_coercion() {
        let map: ValueMap = [("price", json!(19.99)), ("text", json!("4.5")), ("int", json!(2))]
            .into_iter()
            .collect();

        assert_eq!(map.get_double("price", 0.0), 19.99);
        assert_eq!(map.get_double("text", 0.0), 4.5);
        assert_eq!(map.get_double("int", 0.0), 2.0);
        assert_eq!(map.get_double("missing", 1.5), 1.5);
    }

    #[test]
    fn test_to_string_map_keeps_every_key() {
        let traits = Traits::new()
            .with("email", json!("a@b.com"))
            .with("age", json!(41))
            .with("address", json!({"city": "Oslo"}))
            .with("nickname", Value::Null);

        let map = traits.to_string_map();
        assert_eq!(map.len(), 4);
        assert_eq!(map["email"], "a@b.com");
        assert_eq!(map["age"], "41");
        assert_eq!(map["address"], r#"{"city":"Oslo"}"#);
        assert_eq!(map["nickname"], "null");
    }

    #[test]
    fn test_reserved_accessors() {
        let traits = Traits::new().with("username", json!("ada"));
        assert_eq!(traits.username().as_deref(), Some("ada"));
        assert_eq!(traits.email(), None);

        let props = Properties::new();
        assert_eq!(props.quantity(), 0);
        assert_eq!(props.revenue(), 0.0);
    }

    #[test]
    fn test_event_wire_format() {
        let identify: NormalizedEvent = serde_json::from_value(json!({
            "type": "identify",
            "user_id": "u1",
            "traits": {"email": "a@b.com"}
        }))
        .unwrap();
        match &identify {
            NormalizedEvent::Identify(evt) => {
                assert_eq!(evt.user_id.as_deref(), Some("u1"));
                assert_eq!(evt.traits.email().as_deref(), Some("a@b.com"));
            }
            other => panic!("expected identify, got {other:?}"),
        }

        let track: NormalizedEvent =
            serde_json::from_value(json!({"type": "track", "event": "Ping"})).unwrap();
        assert_eq!(track, NormalizedEvent::Track(TrackEvent::new("Ping")));

        let lifecycle: NormalizedEvent =
            serde_json::from_value(json!({"type": "lifecycle", "phase": "started"})).unwrap();
        assert_eq!(
            lifecycle,
            NormalizedEvent::Lifecycle {
                phase: LifecyclePhase::Started
            }
        );

        let reset: NormalizedEvent = serde_json::from_value(json!({"type": "reset"})).unwrap();
        assert_eq!(reset.kind(), "reset");
    }

    #[test]
    fn test_track_requires_event_name() {
        let result: Result<NormalizedEvent, _> =
            serde_json::from_value(json!({"type": "track", "properties": {}}));
        assert!(result.is_err());
    }
}
