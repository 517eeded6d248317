//! Decoded webhook events

use crate::Result;
use chrono::{DateTime, FixedOffset};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// A verified Authsignal webhook event
///
/// Any JSON document decodes. Envelope fields are picked up only when they
/// carry the expected JSON type; anything else, including an envelope field
/// of another type, stays untouched in `extra`. `data` depends on the event
/// type and is kept as raw JSON. Keys stay in their wire casing (`tenantId`,
/// `userId`, ...).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WebhookEvent {
    /// Envelope version
    pub version: Option<i64>,

    /// Event type (e.g., "email.created", "sms.created")
    pub event_type: Option<String>,

    /// Unique identifier for this event
    pub id: Option<String>,

    /// URI of the producer
    pub source: Option<String>,

    /// ISO-8601 time the event occurred
    pub time: Option<String>,

    /// Tenant the event belongs to
    pub tenant_id: Option<String>,

    /// Event-type specific payload, when it is an object
    pub data: Map<String, Value>,

    /// Any other top-level fields
    pub extra: Map<String, Value>,

    /// The whole document when it is not a JSON object
    pub raw: Option<Value>,
}

fn take_string(object: &mut Map<String, Value>, key: &str) -> Option<String> {
    match object.remove(key)? {
        Value::String(s) => Some(s),
        other => {
            object.insert(key.to_string(), other);
            None
        }
    }
}

impl From<Value> for WebhookEvent {
    fn from(value: Value) -> Self {
        let Value::Object(mut object) = value else {
            return Self {
                raw: Some(value),
                ..Default::default()
            };
        };

        let version = match object.remove("version") {
            Some(Value::Number(n)) if n.is_i64() => n.as_i64(),
            Some(other) => {
                object.insert("version".to_string(), other);
                None
            }
            None => None,
        };

        let data = match object.remove("data") {
            Some(Value::Object(data)) => data,
            Some(Value::Null) | None => Map::new(),
            Some(other) => {
                object.insert("data".to_string(), other);
                Map::new()
            }
        };

        Self {
            version,
            event_type: take_string(&mut object, "type"),
            id: take_string(&mut object, "id"),
            source: take_string(&mut object, "source"),
            time: take_string(&mut object, "time"),
            tenant_id: take_string(&mut object, "tenantId"),
            data,
            extra: object,
            raw: None,
        }
    }
}

impl From<WebhookEvent> for Value {
    fn from(event: WebhookEvent) -> Self {
        if let Some(raw) = event.raw {
            return raw;
        }

        let mut object = event.extra;
        if let Some(version) = event.version {
            object.insert("version".to_string(), version.into());
        }
        let strings = [
            ("type", event.event_type),
            ("id", event.id),
            ("source", event.source),
            ("time", event.time),
            ("tenantId", event.tenant_id),
        ];
        for (key, value) in strings {
            if let Some(value) = value {
                object.insert(key.to_string(), Value::String(value));
            }
        }
        if !event.data.is_empty() {
            object.insert("data".to_string(), Value::Object(event.data));
        }
        Value::Object(object)
    }
}

impl Serialize for WebhookEvent {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        Value::from(self.clone()).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for WebhookEvent {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Self::from)
    }
}

impl WebhookEvent {
    /// Event type, or an empty string when the payload carried none
    pub fn event_type(&self) -> &str {
        self.event_type.as_deref().unwrap_or_default()
    }

    /// Check the event type against a filter
    ///
    /// `"*"` matches everything, `"email.*"` matches every type under the
    /// `email` namespace, anything else must match exactly.
    pub fn matches_type(&self, filter: &str) -> bool {
        let event = self.event_type();

        if filter == "*" {
            return true;
        }

        if let Some(prefix) = filter.strip_suffix(".*") {
            return event
                .strip_prefix(prefix)
                .is_some_and(|rest| rest.starts_with('.'));
        }

        filter == event
    }

    /// Look up a field inside `data`
    pub fn data_field(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    /// Look up a top-level field outside the envelope
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }

    /// Deserialize `data` into a caller-defined type
    pub fn data_as<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_value(Value::Object(self.data.clone()))?)
    }

    /// Parse `time`, if present and well formed
    pub fn parsed_time(&self) -> Option<DateTime<FixedOffset>> {
        self.time
            .as_deref()
            .and_then(|t| DateTime::parse_from_rfc3339(t).ok())
    }
}

/// Decode verified payload bytes into a [`WebhookEvent`]
///
/// Fails only when the bytes are not valid JSON.
pub fn decode(payload: &[u8]) -> Result<WebhookEvent> {
    let value: Value = serde_json::from_slice(payload)?;
    Ok(WebhookEvent::from(value))
}

/// Decode verified payload bytes into any deserializable type
pub fn decode_as<T: DeserializeOwned>(payload: &[u8]) -> Result<T> {
    Ok(serde_json::from_slice(payload)?)
}
