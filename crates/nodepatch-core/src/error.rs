use thiserror::Error;

use crate::Status;

/// Errors that can occur while classifying external data into a [`Value`](crate::Value).
#[derive(Debug, Error)]
pub enum ParseError {
    /// The provided JSON input was invalid.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// The provided YAML input was invalid.
    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    /// YAML maps may only contain string keys.
    #[error("unsupported YAML key type: {found}")]
    NonStringYamlKey {
        /// A description of the key that triggered the error.
        found: String,
    },
    /// Tagged YAML values have no counterpart in node documents.
    #[error("unsupported YAML tag: {tag}")]
    UnsupportedYamlTag {
        /// The tag identifier encountered in the document.
        tag: String,
    },
    /// Attempted to construct a [`Number`](crate::Number) that is not finite.
    #[error("non-finite number encountered: {value}")]
    NotFinite {
        /// The offending numeric value.
        value: f64,
    },
}

/// Errors emitted when constructing [`PatchOptions`](crate::PatchOptions).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OptionsError {
    /// Base paths are pointers and must be empty or start with `/`.
    #[error("base path must be empty or start with '/': {path}")]
    RelativeBasePath {
        /// The rejected base path.
        path: String,
    },
    /// A trailing `/` would produce an empty key segment on every operation.
    #[error("base path must not end with '/': {path}")]
    TrailingSlash {
        /// The rejected base path.
        path: String,
    },
}

/// Errors returned by the submission gate.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SubmitError {
    /// The patch could not be fully represented and the policy requires a clean result.
    #[error("refusing to submit incomplete patch (status {status})")]
    Incomplete {
        /// Final status of the rejected patch.
        status: Status,
    },
}

/// Errors that can occur while rendering a patch result.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Serializing the operations failed.
    #[error("failed to serialize patch: {0}")]
    Json(#[from] serde_json::Error),
}
