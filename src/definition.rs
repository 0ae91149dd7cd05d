//! Definition model.
//!
//! A definition is plain data describing an expected shape: type tokens
//! (`"string[]?"`), tuples, bounded arrays, unions, nominal classes, the
//! null/undefined literals, and open field-wise shapes.
//!
//! Composite nodes are reference-typed so that a node keeps one identity no
//! matter how many places hold it. That identity is what the matcher's cycle
//! guard compares, and it is also what lets a caller wire up a
//! self-referential graph (which the matcher then rejects).
pub mod builders;
pub mod json;
pub mod token;

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::error::DefinitionError;
use crate::shared::Shared;
use crate::value::{Class, Value};

pub use token::TypeToken;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

#[derive(Clone)]
pub enum Definition {
    /// `name[]?` mini-language string.
    Token(Arc<str>),
    /// Per-position definitions; trailing positions may be optional.
    Tuple(Shared<Vec<Definition>>),
    BoundedArray(Arc<BoundedArray>),
    /// Alternatives in declaration order.
    Union(Shared<Vec<Definition>>),
    Nominal(Class),
    Null,
    Undefined,
    /// Open shape: undeclared fields on the value are ignored.
    Shape(Shared<IndexMap<String, Definition>>),
    /// Anything else handed over as a definition (numbers, booleans,
    /// symbols...). Never matches.
    Other(Value),
}

/// Homogeneous array with an inclusive length range.
#[derive(Clone, Debug)]
pub struct BoundedArray {
    pub element: Definition,
    pub min: usize,
    /// `None` is unbounded.
    pub max: Option<usize>,
}

/// What the cycle guard compares. Tokens compare by content, composites and
/// nominal references by allocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeId {
    Token(Arc<str>),
    Null,
    Undefined,
    Addr(usize),
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl BoundedArray {
    pub fn admits_len(&self, len: usize) -> bool {
        len >= self.min && self.max.is_none_or(|max| len <= max)
    }
}

impl Definition {
    pub fn token(token: impl Into<Arc<str>>) -> Self {
        Definition::Token(token.into())
    }

    pub fn tuple<I>(items: I) -> Self
    where
        I: IntoIterator<Item = Definition>,
    {
        Definition::Tuple(Shared::new(items.into_iter().collect()))
    }

    pub fn shape<I, K>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, Definition)>,
        K: Into<String>,
    {
        let fields = fields.into_iter().map(|(k, d)| (k.into(), d)).collect();
        Definition::Shape(Shared::new(fields))
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Definition::Token(_) => "token",
            Definition::Tuple(_) => "tuple",
            Definition::BoundedArray(_) => "bounded array",
            Definition::Union(_) => "union",
            Definition::Nominal(_) => "nominal",
            Definition::Null => "null",
            Definition::Undefined => "undefined",
            Definition::Shape(_) => "shape",
            Definition::Other(_) => "other",
        }
    }

    /// Short human label used in error messages.
    pub fn describe(&self) -> String {
        match self {
            Definition::Token(token) => format!("token {token:?}"),
            Definition::Nominal(class) => format!("nominal {class}"),
            Definition::Tuple(items) => format!("tuple of {}", items.read().len()),
            Definition::Union(alts) => format!("union of {}", alts.read().len()),
            Definition::Shape(fields) => {
                let keys: Vec<String> = fields.read().keys().cloned().collect();
                format!("shape {{{}}}", keys.join(", "))
            }
            other => other.kind_name().to_string(),
        }
    }

    /// `None` for `Other`, which is a leaf that never matches anyway.
    pub fn identity(&self) -> Option<NodeId> {
        match self {
            Definition::Token(token) => Some(NodeId::Token(token.clone())),
            Definition::Tuple(node) | Definition::Union(node) => Some(NodeId::Addr(node.addr())),
            Definition::Shape(node) => Some(NodeId::Addr(node.addr())),
            Definition::BoundedArray(bounded) => {
                Some(NodeId::Addr(Arc::as_ptr(bounded) as *const () as usize))
            }
            Definition::Nominal(class) => Some(NodeId::Addr(class.addr())),
            Definition::Null => Some(NodeId::Null),
            Definition::Undefined => Some(NodeId::Undefined),
            Definition::Other(_) => None,
        }
    }

    /// True when both handles are the same node.
    pub fn same_node(&self, other: &Definition) -> bool {
        match (self.identity(), other.identity()) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }

    /// Append to a tuple or union in place.
    pub fn push_element(&self, item: Definition) -> Result<(), DefinitionError> {
        match self {
            Definition::Tuple(items) | Definition::Union(items) => {
                items.write().push(item);
                Ok(())
            }
            other => Err(DefinitionError::NotComposite {
                expected: "tuple or union",
                found: other.kind_name(),
            }),
        }
    }

    /// Declare (or replace) a field of a shape in place.
    pub fn insert_field(&self, key: impl Into<String>, field: Definition) -> Result<(), DefinitionError> {
        match self {
            Definition::Shape(fields) => {
                fields.write().insert(key.into(), field);
                Ok(())
            }
            other => Err(DefinitionError::NotComposite {
                expected: "shape",
                found: other.kind_name(),
            }),
        }
    }
}

// ------------------------------ Conversions ------------------------------ //

impl From<&str> for Definition {
    fn from(token: &str) -> Self { Definition::token(token) }
}

impl From<String> for Definition {
    fn from(token: String) -> Self { Definition::token(token) }
}

impl From<Class> for Definition {
    fn from(class: Class) -> Self { Definition::Nominal(class) }
}

impl From<&Class> for Definition {
    fn from(class: &Class) -> Self { Definition::Nominal(class.clone()) }
}

impl From<Vec<Definition>> for Definition {
    fn from(items: Vec<Definition>) -> Self { Definition::Tuple(Shared::new(items)) }
}

impl From<&Definition> for Definition {
    fn from(definition: &Definition) -> Self { definition.clone() }
}

/// Values used directly as definitions: null and undefined become the
/// literals, strings become tokens, everything else is `Other`.
impl From<Value> for Definition {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Definition::Null,
            Value::Undefined => Definition::Undefined,
            Value::String(token) => Definition::Token(token),
            other => Definition::Other(other),
        }
    }
}

impl fmt::Debug for Definition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Definition::Other(value) => write!(f, "Other({value:?})"),
            other => write!(f, "Definition({})", other.describe()),
        }
    }
}

// ------------------------------- Tests ------------------------------------ //
