//! OpenAPI document model.
//!
//! The typed structs cover what the walker reads or writes. Every struct also carries a
//! flattened `extensions` map so caller-declared fields outside that subset (`x-` extensions,
//! `components`, `security`, ...) survive a round trip untouched.

use crate::router::HttpMethod;
use crate::schema::Schema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use url::Url;

/// Complete OpenAPI document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenApiDocument {
    /// OpenAPI version
    pub openapi: String,
    /// API info
    pub info: Info,
    /// Declared servers; the first one determines the base path
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub servers: Vec<Server>,
    /// API paths
    #[serde(default)]
    pub paths: BTreeMap<String, PathItem>,
    #[serde(flatten)]
    pub extensions: BTreeMap<String, Value>,
}

/// OpenAPI PathItem object - all operations for a single path, plus path-level fields
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PathItem {
    /// Reference to a path item defined elsewhere
    #[serde(rename = "$ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// GET operation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub get: Option<Operation>,
    /// PUT operation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub put: Option<Operation>,
    /// POST operation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post: Option<Operation>,
    /// DELETE operation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delete: Option<Operation>,
    /// OPTIONS operation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Operation>,
    /// HEAD operation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub head: Option<Operation>,
    /// PATCH operation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patch: Option<Operation>,
    /// TRACE operation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace: Option<Operation>,
    /// Servers overriding the document servers for this path
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub servers: Vec<Server>,
    /// Parameters shared by every operation of this path
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Parameter>,
    #[serde(flatten)]
    pub extensions: BTreeMap<String, Value>,
}

/// OpenAPI Info object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Info {
    /// API title
    pub title: String,
    /// API version
    pub version: String,
    /// API description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub extensions: BTreeMap<String, Value>,
}

/// OpenAPI Server object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Server {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub extensions: BTreeMap<String, Value>,
}

/// OpenAPI Operation object - the metadata a caller declares for one handler
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    /// Tags for grouping operations
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Operation summary
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Operation description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Operation ID
    #[serde(rename = "operationId", skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<String>,
    /// Parameters (path, query, header, cookie)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Parameter>,
    /// Request body, passed through as declared
    #[serde(rename = "requestBody", skip_serializing_if = "Option::is_none")]
    pub request_body: Option<Value>,
    /// Responses keyed by status code
    #[serde(default)]
    pub responses: BTreeMap<String, Response>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<bool>,
    #[serde(flatten)]
    pub extensions: BTreeMap<String, Value>,
}

/// OpenAPI Parameter object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    /// Parameter name
    pub name: String,
    /// Parameter location (path, query, header, cookie)
    #[serde(rename = "in")]
    pub location: ParameterLocation,
    /// Whether the parameter is required
    #[serde(default)]
    pub required: bool,
    /// Parameter schema
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<Schema>,
    /// Parameter description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<Value>,
    #[serde(flatten)]
    pub extensions: BTreeMap<String, Value>,
}

/// Where a parameter is read from in the request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    Path,
    Query,
    Header,
    Cookie,
}

/// OpenAPI Response object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    /// Response description
    pub description: String,
    /// Response content, passed through as declared
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<Value>,
    #[serde(flatten)]
    pub extensions: BTreeMap<String, Value>,
}

impl OpenApiDocument {
    /// Create an empty document with the given title and version
    pub fn new(title: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            openapi: "3.0.0".to_string(),
            info: Info {
                title: title.into(),
                version: version.into(),
                description: None,
                extensions: BTreeMap::new(),
            },
            servers: Vec::new(),
            paths: BTreeMap::new(),
            extensions: BTreeMap::new(),
        }
    }

    /// Path prefix recorded paths are made relative to.
    ///
    /// Derived from the first server URL; `/` when no server is declared.
    pub fn base_path(&self) -> String {
        self.servers
            .first()
            .map(Server::base_path)
            .unwrap_or_else(|| "/".to_string())
    }

    /// Look up the operation recorded for `path` and `method`
    pub fn operation(&self, path: &str, method: HttpMethod) -> Option<&Operation> {
        self.paths.get(path).and_then(|item| item.operation(method))
    }

    /// Store an operation, replacing whatever was recorded for the same path and method
    pub fn insert_operation(&mut self, path: String, method: HttpMethod, operation: Operation) {
        self.paths.entry(path).or_default().insert(method, operation);
    }

    /// Number of (path, method) pairs recorded
    pub fn operation_count(&self) -> usize {
        self.paths.values().map(|item| item.len()).sum()
    }
}

impl Default for OpenApiDocument {
    fn default() -> Self {
        Self::new("Generated API", "1.0.0")
    }
}

impl PathItem {
    /// Operation recorded for `method`, if any
    pub fn operation(&self, method: HttpMethod) -> Option<&Operation> {
        match method {
            HttpMethod::Get => self.get.as_ref(),
            HttpMethod::Put => self.put.as_ref(),
            HttpMethod::Post => self.post.as_ref(),
            HttpMethod::Delete => self.delete.as_ref(),
            HttpMethod::Options => self.options.as_ref(),
            HttpMethod::Head => self.head.as_ref(),
            HttpMethod::Patch => self.patch.as_ref(),
            HttpMethod::Trace => self.trace.as_ref(),
        }
    }

    fn slot_mut(&mut self, method: HttpMethod) -> &mut Option<Operation> {
        match method {
            HttpMethod::Get => &mut self.get,
            HttpMethod::Put => &mut self.put,
            HttpMethod::Post => &mut self.post,
            HttpMethod::Delete => &mut self.delete,
            HttpMethod::Options => &mut self.options,
            HttpMethod::Head => &mut self.head,
            HttpMethod::Patch => &mut self.patch,
            HttpMethod::Trace => &mut self.trace,
        }
    }

    /// Store the operation for `method`, returning the one it replaced
    pub fn insert(&mut self, method: HttpMethod, operation: Operation) -> Option<Operation> {
        self.slot_mut(method).replace(operation)
    }

    /// Recorded operations in method order
    pub fn operations(&self) -> impl Iterator<Item = (HttpMethod, &Operation)> + '_ {
        HttpMethod::ALL
            .iter()
            .filter_map(move |method| self.operation(*method).map(|op| (*method, op)))
    }

    /// Number of recorded operations
    pub fn len(&self) -> usize {
        self.operations().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Server {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            description: None,
            extensions: BTreeMap::new(),
        }
    }

    /// Path component of the server URL, without a trailing slash.
    ///
    /// Accepts absolute URLs as well as server-relative paths such as `/api/v1`.
    pub fn base_path(&self) -> String {
        let raw = match Url::parse(&self.url) {
            Ok(url) => url.path().to_string(),
            Err(_) => Self::path_of_unparsed(&self.url).to_string(),
        };

        let trimmed = raw.trim_end_matches('/');
        if trimmed.is_empty() {
            "/".to_string()
        } else if trimmed.starts_with('/') {
            trimmed.to_string()
        } else {
            format!("/{}", trimmed)
        }
    }

    // Relative paths, and templated hosts such as `https://{region}.example.com/v1`
    fn path_of_unparsed(url: &str) -> &str {
        let url = url.split(['?', '#']).next().unwrap_or("");
        match url.find("//") {
            Some(idx) => {
                let rest = &url[idx + 2..];
                match rest.find('/') {
                    Some(slash) => &rest[slash..],
                    None => "",
                }
            }
            None => url,
        }
    }
}

impl Operation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_operation_id(mut self, operation_id: impl Into<String>) -> Self {
        self.operation_id = Some(operation_id.into());
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn with_parameter(mut self, parameter: Parameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Add a response with a description and no content
    pub fn with_response(mut self, status: impl ToString, description: impl Into<String>) -> Self {
        self.responses.insert(
            status.to_string(),
            Response {
                description: description.into(),
                content: None,
                extensions: BTreeMap::new(),
            },
        );
        self
    }
}

impl Parameter {
    /// Create a parameter with no schema or description
    pub fn new(name: impl Into<String>, location: ParameterLocation, required: bool) -> Self {
        Self {
            name: name.into(),
            location,
            required,
            schema: None,
            description: None,
            deprecated: None,
            example: None,
            extensions: BTreeMap::new(),
        }
    }

    /// Default path parameter: `{name, in: path, required, schema: {type: string}}`
    pub fn path(name: impl Into<String>, required: bool) -> Self {
        let mut parameter = Self::new(name, ParameterLocation::Path, required);
        parameter.schema = Some(Schema::string());
        parameter
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_schema(mut self, schema: Schema) -> Self {
        self.schema = Some(schema);
        self
    }
}
