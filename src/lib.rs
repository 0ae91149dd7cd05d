//! Structural runtime type validation.
//!
//! Hand [`validate`] a [`Value`] and a [`Definition`]; get back whether the
//! value has that shape. Definitions are data: type tokens such as
//! `"string[]?"`, tuples, shapes, nominal classes, and the [`union`],
//! [`optional`] and [`array_of`] combinators.
//!
//! ```
//! use shape_guard::{array_of_bounded, shape, validate, Value};
//! use serde_json::json;
//!
//! let def = shape! { "name": "string", "tags": array_of_bounded("string", 1, Some(3)) };
//! let ok = Value::from(json!({"name": "crate", "tags": ["rust"], "extra": 1}));
//! assert!(validate(&ok, &def).unwrap());
//! ```
pub mod definition;
pub mod document;
pub mod error;
pub mod matcher;
pub mod path_de;
pub mod shared;
pub mod value;

pub use definition::builders::{array_of, array_of_bounded, optional, union};
pub use definition::{BoundedArray, Definition, TypeToken};
pub use document::SchemaDocument;
pub use error::{DefinitionError, SchemaError};
pub use matcher::{validate, Options, Validator};
pub use value::{Class, Kind, Value};
