//! JSON rendition of the definition DSL.
//!
//! Plain JSON maps onto the literal forms: strings are tokens, arrays are
//! tuples, objects are shapes, `null` is the null literal, and numbers or
//! booleans are `Other`. JSON has no way to spell a union, a bounded array, a
//! class reference, or the undefined literal, so single-purpose directive
//! objects cover those:
//!
//! ```json
//! { "$undefined": true }
//! { "$union": ["string", "string[]"] }
//! { "$optional": { "id": "number" } }
//! { "$arrayOf": "string", "$min": 1, "$max": 3 }
//! { "$instanceOf": "Array" }
//! ```
//!
//! An object is read as a directive only when its keys are exactly those of
//! one directive; anything else is a shape.
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value as Json};

use crate::error::DefinitionError;
use crate::value::{Class, Value};

use super::builders::{array_of_bounded, optional, union};
use super::Definition;

const UNION: &str = "$union";
const OPTIONAL: &str = "$optional";
const ARRAY_OF: &str = "$arrayOf";
const MIN: &str = "$min";
const MAX: &str = "$max";
const INSTANCE_OF: &str = "$instanceOf";
const UNDEFINED: &str = "$undefined";

pub fn from_json(src: &Json) -> Result<Definition, DefinitionError> {
    convert(src, "")
}

pub fn from_json_str(src: &str) -> Result<Definition, DefinitionError> {
    let json: Json = serde_json::from_str(src).map_err(|error| malformed("", error.to_string()))?;
    from_json(&json)
}

impl<'de> Deserialize<'de> for Definition {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let json = Json::deserialize(deserializer)?;
        from_json(&json).map_err(serde::de::Error::custom)
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn convert(src: &Json, pointer: &str) -> Result<Definition, DefinitionError> {
    match src {
        Json::Null => Ok(Definition::Null),
        Json::String(token) => Ok(Definition::token(token.as_str())),
        Json::Bool(_) | Json::Number(_) => Ok(Definition::Other(Value::from(src.clone()))),
        Json::Array(items) => {
            let items = convert_all(items, pointer)?;
            Ok(Definition::tuple(items))
        }
        Json::Object(map) => convert_object(map, pointer),
    }
}

fn convert_all(items: &[Json], pointer: &str) -> Result<Vec<Definition>, DefinitionError> {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| convert(item, &format!("{pointer}/{i}")))
        .collect()
}

fn convert_object(map: &Map<String, Json>, pointer: &str) -> Result<Definition, DefinitionError> {
    let has_only = |allowed: &[&str]| map.keys().all(|k| allowed.contains(&k.as_str()));

    if let (Some(flag), true) = (map.get(UNDEFINED), has_only(&[UNDEFINED])) {
        if flag != &Json::Bool(true) {
            return Err(malformed(&child(pointer, UNDEFINED), "`$undefined` takes `true`"));
        }
        return Ok(Definition::Undefined);
    }

    if let (Some(alts), true) = (map.get(UNION), has_only(&[UNION])) {
        let here = child(pointer, UNION);
        let Json::Array(alts) = alts else {
            return Err(malformed(&here, "`$union` takes an array of definitions"));
        };
        return Ok(union(convert_all(alts, &here)?));
    }

    if let (Some(inner), true) = (map.get(OPTIONAL), has_only(&[OPTIONAL])) {
        return Ok(optional(convert(inner, &child(pointer, OPTIONAL))?));
    }

    if let (Some(element), true) = (map.get(ARRAY_OF), has_only(&[ARRAY_OF, MIN, MAX])) {
        let element = convert(element, &child(pointer, ARRAY_OF))?;
        let min = bound(map.get(MIN), &child(pointer, MIN))?.unwrap_or(0);
        let max = bound(map.get(MAX), &child(pointer, MAX))?;
        if let Some(max) = max.filter(|max| *max < min) {
            return Err(malformed(pointer, format!("`$max` ({max}) is below `$min` ({min})")));
        }
        return Ok(array_of_bounded(element, min, max));
    }

    if let (Some(name), true) = (map.get(INSTANCE_OF), has_only(&[INSTANCE_OF])) {
        let here = child(pointer, INSTANCE_OF);
        let name = name
            .as_str()
            .ok_or_else(|| malformed(&here, "`$instanceOf` takes a class name"))?;
        let class = Class::builtin(name)
            .ok_or_else(|| malformed(&here, format!("unknown class `{name}`")))?;
        return Ok(Definition::Nominal(class));
    }

    let mut fields = Vec::with_capacity(map.len());
    for (key, field) in map {
        fields.push((key.clone(), convert(field, &child(pointer, key))?));
    }
    Ok(Definition::shape(fields))
}

fn bound(src: Option<&Json>, pointer: &str) -> Result<Option<usize>, DefinitionError> {
    match src {
        None | Some(Json::Null) => Ok(None),
        Some(n) => n
            .as_u64()
            .and_then(|n| usize::try_from(n).ok())
            .map(Some)
            .ok_or_else(|| malformed(pointer, "length bounds must be non-negative integers")),
    }
}

/// RFC 6901 escaping.
fn child(pointer: &str, key: &str) -> String {
    format!("{pointer}/{}", key.replace('~', "~0").replace('/', "~1"))
}

fn malformed(pointer: &str, reason: impl Into<String>) -> DefinitionError {
    DefinitionError::Malformed {
        pointer: pointer.to_string(),
        reason: reason.into(),
    }
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(src: Json) -> Definition {
        from_json(&src).unwrap()
    }

    #[test]
    fn literal_forms_map_to_variants() {
        assert!(matches!(parse(json!("string[]")), Definition::Token(_)));
        assert!(matches!(parse(json!(null)), Definition::Null));
        assert!(matches!(parse(json!(5)), Definition::Other(_)));
        assert!(matches!(parse(json!(true)), Definition::Other(_)));
        assert_eq!(parse(json!(["string", "number?"])).describe(), "tuple of 2");
        assert_eq!(parse(json!({"foo": "number", "bar": {"baz": "any"}})).describe(), "shape {foo, bar}");
    }

    #[test]
    fn directives_build_combinators() {
        assert_eq!(parse(json!({"$union": ["string", "string[]"]})).describe(), "union of 2");
        assert_eq!(parse(json!({"$optional": "number"})).describe(), "union of 3");
        let Definition::BoundedArray(bounded) = parse(json!({"$arrayOf": "string", "$min": 1, "$max": 3})) else {
            panic!("expected bounded array")
        };
        assert_eq!((bounded.min, bounded.max), (1, Some(3)));
        let Definition::Nominal(class) = parse(json!({"$instanceOf": "Array"})) else {
            panic!("expected nominal")
        };
        assert_eq!(class, Class::array());
    }

    #[test]
    fn undefined_directive_is_the_undefined_literal() {
        assert!(matches!(parse(json!({"$undefined": true})), Definition::Undefined));
        let def = parse(json!({"gone": {"$undefined": true}}));
        assert_eq!(crate::validate(&Value::from(json!({})), &def), Ok(true));
        assert_eq!(crate::validate(&Value::from(json!({"gone": null})), &def), Ok(false));

        let err = from_json(&json!({"$undefined": false})).unwrap_err();
        assert!(matches!(err, DefinitionError::Malformed { ref pointer, .. } if pointer == "/$undefined"));
    }

    #[test]
    fn directive_keys_mixed_with_fields_are_a_shape() {
        let def = parse(json!({"$union": "string", "other": "number"}));
        assert_eq!(def.describe(), "shape {$union, other}");
    }

    #[test]
    fn malformed_directives_report_a_pointer() {
        let err = from_json(&json!({"items": [{"$arrayOf": "string", "$min": -1}]})).unwrap_err();
        assert_eq!(err, DefinitionError::Malformed {
            pointer: "/items/0/$min".into(),
            reason: "length bounds must be non-negative integers".into(),
        });

        let err = from_json(&json!({"a/b": {"$union": "string"}})).unwrap_err();
        assert!(matches!(err, DefinitionError::Malformed { ref pointer, .. } if pointer == "/a~1b/$union"));

        let err = from_json(&json!({"$instanceOf": "Date"})).unwrap_err();
        assert!(err.to_string().contains("unknown class `Date`"));

        let err = from_json(&json!({"$arrayOf": "any", "$min": 4, "$max": 2})).unwrap_err();
        assert!(err.to_string().contains("below"));
    }

    #[test]
    fn deserializes_through_serde() {
        let def: Definition = serde_json::from_str(r#"{"tags": "string[]", "id": {"$optional": "number"}}"#).unwrap();
        assert_eq!(def.describe(), "shape {tags, id}");
        assert!(serde_json::from_str::<Definition>(r#"{"$union": 1}"#).is_err());
        assert!(from_json_str("{not json").is_err());
    }
}
