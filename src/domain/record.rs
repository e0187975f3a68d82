use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::types::EntityId;

/// Anything the list controller can hold.
///
/// Only the identifier is interpreted; every other field is passed through to
/// the screen untouched. `field_text` backs client-side search.
pub trait Entity: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    fn id(&self) -> &EntityId;

    /// Text representation of a top-level field, if it is a scalar.
    fn field_text(&self, field: &str) -> Option<String> {
        let value = serde_json::to_value(self).ok()?;
        value.get(field).and_then(scalar_text)
    }

    /// Text of every top-level scalar field.
    fn all_field_text(&self) -> Vec<String> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map.values().filter_map(scalar_text).collect(),
            _ => Vec::new(),
        }
    }
}

/// Opaque server entity: an identifier plus whatever else the API returned.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Record {
    pub id: EntityId,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Record {
    pub fn new(id: EntityId) -> Self {
        Self {
            id,
            fields: Map::new(),
        }
    }

    /// Builder-style field setter, mostly useful for fixtures and payloads.
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }
}

impl Entity for Record {
    fn id(&self) -> &EntityId {
        &self.id
    }

    fn field_text(&self, field: &str) -> Option<String> {
        if field == "id" {
            return Some(self.id.to_string());
        }
        self.fields.get(field).and_then(scalar_text)
    }

    fn all_field_text(&self) -> Vec<String> {
        std::iter::once(self.id.to_string())
            .chain(self.fields.values().filter_map(scalar_text))
            .collect()
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
