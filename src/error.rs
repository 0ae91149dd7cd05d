use thiserror::Error;

/// The definition itself is malformed. Value mismatches are never errors;
/// they are `Ok(false)`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// A definition node was reached again along its own descent path.
    #[error("circular definition: {node} is its own ancestor (depth {depth})")]
    CircularDefinition { node: String, depth: usize },

    #[error("definition nesting exceeds the configured limit of {limit}")]
    DepthLimitExceeded { limit: usize },
}

/// Problems building a definition, as opposed to evaluating one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DefinitionError {
    /// JSON definition text that does not describe a definition. `pointer` is
    /// an RFC 6901 pointer into the source document.
    #[error("malformed definition at `{pointer}`: {reason}")]
    Malformed { pointer: String, reason: String },

    #[error("expected a {expected} definition, found {found}")]
    NotComposite { expected: &'static str, found: &'static str },
}
