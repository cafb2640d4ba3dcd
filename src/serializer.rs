//! Conversion of OpenAPI documents to and from YAML or JSON text.
//!
//! Rendering is used once a document has been built; parsing is used to load the base document
//! (info, servers, tags, components) a generator starts from.

use crate::document::OpenApiDocument;
use crate::error::Result;
use log::debug;

/// Serializes an OpenAPI document to YAML format.
///
/// # Example
///
/// ```
/// use openapi_from_router::document::OpenApiDocument;
/// use openapi_from_router::serializer::serialize_yaml;
///
/// let yaml = serialize_yaml(&OpenApiDocument::default()).unwrap();
/// assert!(yaml.contains("openapi:"));
/// ```
pub fn serialize_yaml(doc: &OpenApiDocument) -> Result<String> {
    debug!("Serializing OpenAPI document to YAML");
    Ok(serde_yaml::to_string(doc)?)
}

/// Serializes an OpenAPI document to JSON format with pretty printing.
pub fn serialize_json(doc: &OpenApiDocument) -> Result<String> {
    debug!("Serializing OpenAPI document to JSON");
    Ok(serde_json::to_string_pretty(doc)?)
}

/// Parses a base document from YAML.
///
/// # Errors
///
/// Returns [`crate::error::Error::Yaml`] if the text is not a valid document; `openapi` and
/// `info` (with `title` and `version`) are required.
pub fn deserialize_yaml(content: &str) -> Result<OpenApiDocument> {
    debug!("Parsing OpenAPI document from YAML ({} bytes)", content.len());
    Ok(serde_yaml::from_str(content)?)
}

/// Parses a base document from JSON.
pub fn deserialize_json(content: &str) -> Result<OpenApiDocument> {
    debug!("Parsing OpenAPI document from JSON ({} bytes)", content.len());
    Ok(serde_json::from_str(content)?)
}
