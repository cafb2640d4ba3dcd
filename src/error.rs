use thiserror::Error;

/// Result type alias for the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while walking a router tree or (de)serializing a document
#[derive(Debug, Error)]
pub enum Error {
    /// A sub-router was reached without a prior mount-path registration.
    #[error(
        "router `{name}` reached at `{path}` (stack size {stack_size}) has no registered mount path"
    )]
    RouterRegistration {
        name: String,
        path: String,
        stack_size: usize,
    },

    /// A route path contains a wildcard, which OpenAPI path templates cannot express.
    #[error("route `{name}` uses wildcard path `{path}`, which cannot be documented")]
    WildcardPath { path: String, name: String },

    /// A route path could not be tokenized.
    #[error("invalid path template `{path}`: {message}")]
    PathSyntax { path: String, message: String },

    #[error("unsupported HTTP method: {0}")]
    UnsupportedMethod(String),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
