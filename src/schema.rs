use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// OpenAPI Schema definition attached to parameters.
///
/// Only the commonly used keywords are typed; anything else a caller declares is kept in
/// `extensions` and written back out unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    /// The type of the schema (string, integer, object, array, etc.)
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<String>,
    /// Format for primitive types (e.g., "int32", "uuid")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Items schema for array types
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<Schema>>,
    /// Enum values
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<Value>>,
    /// Reference to another schema
    #[serde(rename = "$ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    /// Any other schema keywords
    #[serde(flatten)]
    pub extensions: BTreeMap<String, Value>,
}

impl Schema {
    /// A schema with only a `type` keyword
    pub fn of_type(schema_type: impl Into<String>) -> Self {
        Self {
            schema_type: Some(schema_type.into()),
            ..Default::default()
        }
    }

    /// `{type: string}`, the schema given to undeclared path parameters
    pub fn string() -> Self {
        Self::of_type("string")
    }
}
