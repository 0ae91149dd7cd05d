//! Combinator builders. Pure constructors; nothing here inspects values.
use std::sync::Arc;

use crate::shared::Shared;

use super::{BoundedArray, Definition};

/// Value must satisfy at least one alternative. Declaration order is kept.
pub fn union<I>(alternatives: I) -> Definition
where
    I: IntoIterator<Item = Definition>,
{
    Definition::Union(Shared::new(alternatives.into_iter().collect()))
}

/// `union(null, undefined, definition)`.
pub fn optional(definition: impl Into<Definition>) -> Definition {
    union([Definition::Null, Definition::Undefined, definition.into()])
}

/// Homogeneous array of any length.
pub fn array_of(element: impl Into<Definition>) -> Definition {
    array_of_bounded(element, 0, None)
}

/// Homogeneous array whose length lies in `min..=max` (`max: None` is
/// unbounded). `min > max` is accepted and simply matches nothing.
pub fn array_of_bounded(element: impl Into<Definition>, min: usize, max: Option<usize>) -> Definition {
    Definition::BoundedArray(Arc::new(BoundedArray {
        element: element.into(),
        min,
        max,
    }))
}

/// Tuple definition from anything convertible to a definition.
///
/// ```
/// use shape_guard::{tuple, validate, Value};
/// let def = tuple!["string", "number?"];
/// assert!(validate(&Value::array(["x".into()]), &def).unwrap());
/// ```
#[macro_export]
macro_rules! tuple {
    ($($item:expr),* $(,)?) => {{
        let items: ::std::vec::Vec<$crate::Definition> =
            ::std::vec![$($crate::Definition::from($item)),*];
        $crate::Definition::tuple(items)
    }};
}

/// Union definition from anything convertible to a definition.
#[macro_export]
macro_rules! union {
    ($($alt:expr),* $(,)?) => {{
        let alts: ::std::vec::Vec<$crate::Definition> =
            ::std::vec![$($crate::Definition::from($alt)),*];
        $crate::union(alts)
    }};
}

/// Shape definition: `shape!{ "foo": "number", "bar": shape!{ .. } }`.
#[macro_export]
macro_rules! shape {
    ($($key:literal : $value:expr),* $(,)?) => {{
        let fields: ::std::vec::Vec<(::std::string::String, $crate::Definition)> = ::std::vec![
            $(
                (::std::string::String::from($key), $crate::Definition::from($value))
            ),*
        ];
        $crate::Definition::shape(fields)
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optional_is_null_undefined_then_inner() {
        let Definition::Union(alts) = optional("string") else { panic!("expected union") };
        let alts = alts.snapshot();
        assert_eq!(alts.len(), 3);
        assert!(matches!(alts[0], Definition::Null));
        assert!(matches!(alts[1], Definition::Undefined));
        assert!(matches!(&alts[2], Definition::Token(t) if &**t == "string"));
    }

    #[test]
    fn array_of_defaults_to_unbounded() {
        let Definition::BoundedArray(bounded) = array_of("number") else { panic!("expected bounded array") };
        assert_eq!(bounded.min, 0);
        assert_eq!(bounded.max, None);
        let Definition::BoundedArray(bounded) = array_of_bounded("string", 1, Some(3)) else {
            panic!("expected bounded array")
        };
        assert_eq!((bounded.min, bounded.max), (1, Some(3)));
    }

    #[test]
    fn macros_build_the_matching_variants() {
        assert_eq!(crate::tuple!["string", "number?"].describe(), "tuple of 2");
        assert_eq!(crate::union!["string", "string[]"].describe(), "union of 2");
        assert_eq!(crate::shape! { "foo": "number", "bar": "string?" }.describe(), "shape {foo, bar}");
        assert_eq!(crate::tuple![].describe(), "tuple of 0");
    }

    #[test]
    fn each_build_is_a_fresh_node() {
        let a = union([Definition::from("string")]);
        let b = union([Definition::from("string")]);
        assert!(!a.same_node(&b));
    }
}
