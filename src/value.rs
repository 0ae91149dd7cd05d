//! Runtime values the matcher inspects.
//!
//! The model mirrors a dynamic runtime: an absent sentinel (`Undefined`),
//! `Null`, scalars, opaque symbols and functions, and reference-typed arrays
//! and objects. Cloning an array or object clones the handle, so a value graph
//! may point back at itself.
pub mod class;

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::shared::Shared;

pub use class::Class;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

#[derive(Clone, Default)]
pub enum Value {
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(Arc<str>),
    Symbol(Symbol),
    Function(Function),
    Array(Shared<Vec<Value>>),
    Object(Object),
}

/// Primitive runtime kind, as reported by `typeof`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    String,
    Number,
    Boolean,
    Object,
    Function,
    Undefined,
    Symbol,
}

/// Opaque identity-bearing token.
#[derive(Clone)]
pub struct Symbol(Arc<str>);

#[derive(Clone)]
pub struct Function {
    name: Arc<str>,
}

#[derive(Clone)]
pub struct Object {
    class: Class,
    fields: Shared<IndexMap<String, Value>>,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl Kind {
    pub const ALL: [Kind; 7] = [
        Kind::String,
        Kind::Number,
        Kind::Boolean,
        Kind::Object,
        Kind::Function,
        Kind::Undefined,
        Kind::Symbol,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Kind::String => "string",
            Kind::Number => "number",
            Kind::Boolean => "boolean",
            Kind::Object => "object",
            Kind::Function => "function",
            Kind::Undefined => "undefined",
            Kind::Symbol => "symbol",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Symbol {
    pub fn new(description: impl Into<Arc<str>>) -> Self { Self(description.into()) }
    pub fn description(&self) -> &str { &self.0 }
    pub fn ptr_eq(&self, other: &Symbol) -> bool { Arc::ptr_eq(&self.0, &other.0) }
}

impl Function {
    pub fn new(name: impl Into<Arc<str>>) -> Self { Self { name: name.into() } }
    pub fn name(&self) -> &str { &self.name }
}

impl Object {
    pub fn new(class: Class) -> Self {
        Self { class, fields: Shared::default() }
    }
    pub fn class(&self) -> &Class { &self.class }
    pub fn get(&self, key: &str) -> Option<Value> { self.fields.read().get(key).cloned() }
    pub fn set(&self, key: impl Into<String>, value: Value) {
        self.fields.write().insert(key.into(), value);
    }
    pub fn len(&self) -> usize { self.fields.read().len() }
    pub fn is_empty(&self) -> bool { self.len() == 0 }
    pub fn keys(&self) -> Vec<String> { self.fields.read().keys().cloned().collect() }
}

impl Value {
    // -------------------------------- Build ---------------------------------- //

    pub fn array<I>(items: I) -> Self
    where
        I: IntoIterator<Item = Value>,
    {
        Value::Array(Shared::new(items.into_iter().collect()))
    }

    /// Plain object (class `Object`).
    pub fn object<I, K>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        Self::instance(&Class::object(), fields)
    }

    pub fn instance<I, K>(class: &Class, fields: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        let object = Object::new(class.clone());
        for (key, value) in fields {
            object.set(key, value);
        }
        Value::Object(object)
    }

    pub fn function(name: impl Into<Arc<str>>) -> Self { Value::Function(Function::new(name)) }

    pub fn symbol(description: impl Into<Arc<str>>) -> Self { Value::Symbol(Symbol::new(description)) }

    /// Append to an array in place. Returns `false` and does nothing when
    /// `self` is not an array.
    pub fn push(&self, item: Value) -> bool {
        match self {
            Value::Array(items) => {
                items.write().push(item);
                true
            }
            _ => false,
        }
    }

    /// Set a field on an object in place. Returns `false` and does nothing
    /// when `self` is not an object.
    pub fn set_field(&self, key: impl Into<String>, value: Value) -> bool {
        match self {
            Value::Object(object) => {
                object.set(key, value);
                true
            }
            _ => false,
        }
    }

    // ------------------------------- Inspect --------------------------------- //

    /// Null reports `object`, as the runtime it models does.
    pub fn kind(&self) -> Kind {
        match self {
            Value::Undefined => Kind::Undefined,
            Value::Null => Kind::Object,
            Value::Bool(_) => Kind::Boolean,
            Value::Number(_) => Kind::Number,
            Value::String(_) => Kind::String,
            Value::Symbol(_) => Kind::Symbol,
            Value::Function(_) => Kind::Function,
            Value::Array(_) | Value::Object(_) => Kind::Object,
        }
    }

    /// Arrays and objects only; null is object-kind but not a reference.
    pub fn is_non_primitive(&self) -> bool {
        matches!(self, Value::Array(_) | Value::Object(_))
    }

    pub fn is_null(&self) -> bool { matches!(self, Value::Null) }

    pub fn is_undefined(&self) -> bool { matches!(self, Value::Undefined) }

    pub fn is_array(&self) -> bool { matches!(self, Value::Array(_)) }

    /// Element count for arrays, `None` otherwise.
    pub fn len(&self) -> Option<usize> {
        match self {
            Value::Array(items) => Some(items.read().len()),
            _ => None,
        }
    }

    /// Element at `index`, or `Undefined` when out of range or not an array.
    pub fn get_index(&self, index: usize) -> Value {
        match self {
            Value::Array(items) => items.read().get(index).cloned().unwrap_or_default(),
            _ => Value::Undefined,
        }
    }

    /// Property read. Arrays expose `length` and canonical decimal indices.
    pub fn get_field(&self, key: &str) -> Value {
        match self {
            Value::Object(object) => object.get(key).unwrap_or_default(),
            Value::Array(items) => {
                if key == "length" {
                    return Value::Number(items.read().len() as f64);
                }
                match parse_index(key) {
                    Some(index) => self.get_index(index),
                    None => Value::Undefined,
                }
            }
            _ => Value::Undefined,
        }
    }

    pub fn class(&self) -> Option<Class> {
        match self {
            Value::Array(_) => Some(Class::array()),
            Value::Object(object) => Some(object.class().clone()),
            _ => None,
        }
    }

    pub fn instance_of(&self, class: &Class) -> bool {
        self.class().is_some_and(|own| own.is_subclass_of(class))
    }
}

/// `"0"`, `"12"`; rejects `"01"`, `"+1"`, `""`.
fn parse_index(key: &str) -> Option<usize> {
    let canonical = !key.is_empty()
        && key.bytes().all(|b| b.is_ascii_digit())
        && (key == "0" || !key.starts_with('0'));
    if canonical { key.parse().ok() } else { None }
}

// ------------------------------ Conversions ------------------------------ //

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Value::String(s.into()),
            serde_json::Value::Array(xs) => Value::array(xs.into_iter().map(Value::from)),
            serde_json::Value::Object(map) => {
                Value::object(map.into_iter().map(|(k, v)| (k, Value::from(v))))
            }
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self { Value::String(s.into()) }
}

impl From<String> for Value {
    fn from(s: String) -> Self { Value::String(s.into()) }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self { Value::Number(n) }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self { Value::Number(n.into()) }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self { Value::Bool(b) }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self { Value::Array(Shared::new(items)) }
}

/// A class used as a value is its constructor function.
impl From<Class> for Value {
    fn from(class: Class) -> Self { Value::function(class.name()) }
}

// shallow on purpose: arrays and objects may be cyclic
impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => f.write_str("undefined"),
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) => write!(f, "{n}"),
            Value::String(s) => write!(f, "{s:?}"),
            Value::Symbol(sym) => write!(f, "Symbol({})", sym.description()),
            Value::Function(func) => write!(f, "[Function {}]", func.name()),
            Value::Array(items) => write!(f, "[Array; {}]", items.read().len()),
            Value::Object(object) => write!(f, "[{} with {} fields]", object.class(), object.len()),
        }
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({})", self.description())
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[Function {}]", self.name())
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} with {} fields]", self.class(), self.len())
    }
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn kinds_follow_typeof() {
        assert_eq!(Value::from("x").kind(), Kind::String);
        assert_eq!(Value::from(f64::NAN).kind(), Kind::Number);
        assert_eq!(Value::from(true).kind(), Kind::Boolean);
        assert_eq!(Value::Null.kind(), Kind::Object);
        assert_eq!(Value::array([]).kind(), Kind::Object);
        assert_eq!(Value::function("f").kind(), Kind::Function);
        assert_eq!(Value::symbol("s").kind(), Kind::Symbol);
        assert_eq!(Value::Undefined.kind(), Kind::Undefined);
        assert_eq!(Kind::ALL.map(Kind::as_str).join(","), "string,number,boolean,object,function,undefined,symbol");
    }

    #[test]
    fn null_is_object_kind_but_primitive() {
        assert_eq!(Value::Null.kind(), Kind::Object);
        assert!(!Value::Null.is_non_primitive());
        assert!(Value::object::<_, &str>([]).is_non_primitive());
    }

    #[test]
    fn json_conversion_builds_plain_objects_and_arrays() {
        let v = Value::from(json!({"a": [1, "two", null], "b": {"c": false}}));
        assert!(v.instance_of(&Class::object()));
        let a = v.get_field("a");
        assert_eq!(a.len(), Some(3));
        assert!(matches!(a.get_index(0), Value::Number(n) if n == 1.0));
        assert!(a.get_index(2).is_null());
        assert!(a.get_index(3).is_undefined());
        assert!(matches!(v.get_field("b").get_field("c"), Value::Bool(false)));
        assert!(v.get_field("missing").is_undefined());
    }

    #[test]
    fn arrays_expose_length_and_indices_as_fields() {
        let v = Value::array(["a".into(), "b".into()]);
        assert!(matches!(v.get_field("length"), Value::Number(n) if n == 2.0));
        assert!(matches!(v.get_field("1"), Value::String(s) if &*s == "b"));
        assert!(v.get_field("01").is_undefined());
        assert!(v.get_field("x").is_undefined());
    }

    #[test]
    fn arrays_are_instances_of_array_and_object() {
        let v = Value::array([]);
        assert!(v.instance_of(&Class::array()));
        assert!(v.instance_of(&Class::object()));
        assert!(!v.instance_of(&Class::error()));
        assert!(!Value::from(5).instance_of(&Class::object()));
    }

    #[test]
    fn cyclic_values_can_be_built_and_printed() {
        let a = Value::object::<_, &str>([]);
        let b = Value::object([("a", a.clone())]);
        assert!(a.set_field("b", b.clone()));
        let again = a.get_field("b").get_field("a").get_field("b");
        assert!(again.is_non_primitive());
        assert_eq!(format!("{a:?}"), "[Object with 1 fields]");

        let xs = Value::array([]);
        assert!(xs.push(xs.clone()));
        assert_eq!(xs.get_index(0).get_index(0).len(), Some(1));
        assert!(!Value::from(1).push(Value::Null));
    }
}
