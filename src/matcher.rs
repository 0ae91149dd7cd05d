//! Recursive structural matcher.
//!
//! `validate` answers whether a value conforms to a definition. Mismatches of
//! any sort are `Ok(false)`; the only errors are defects in the definition
//! itself (a node that is its own ancestor, or nesting past a configured
//! ceiling).
//!
//! Recursion follows the definition, never the value, so a cyclic value is
//! explored only as deep as the definition reaches and always terminates.
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::definition::builders::{array_of, optional};
use crate::definition::{BoundedArray, Definition, NodeId, TypeToken};
use crate::error::SchemaError;
use crate::value::Value;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Options {
    /// Deepest definition level (root is 0) the matcher will enter. `None`
    /// means no ceiling; cycles are caught regardless.
    #[serde(default)]
    pub max_depth: Option<usize>,
}

#[derive(Debug, Clone, Default)]
pub struct Validator {
    options: Options,
}

/// Definition nodes on the current descent path, innermost first. Frames are
/// never mutated; each child call links a new frame onto its parent, so
/// sibling branches share only their common prefix.
struct Ancestry<'a> {
    node: Option<NodeId>,
    depth: usize,
    parent: Option<&'a Ancestry<'a>>,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

/// Check `value` against `definition` with default options.
pub fn validate(value: &Value, definition: &Definition) -> Result<bool, SchemaError> {
    Validator::default().validate(value, definition)
}

impl Ancestry<'_> {
    fn contains(&self, node: &NodeId) -> bool {
        let mut cursor = Some(self);
        while let Some(frame) = cursor {
            if frame.node.as_ref() == Some(node) {
                return true;
            }
            cursor = frame.parent;
        }
        false
    }
}

impl Validator {
    pub fn new(options: Options) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn validate(&self, value: &Value, definition: &Definition) -> Result<bool, SchemaError> {
        self.compare(value, definition, None)
    }

    fn compare(
        &self,
        value: &Value,
        definition: &Definition,
        ancestry: Option<&Ancestry<'_>>,
    ) -> Result<bool, SchemaError> {
        let node = definition.identity();
        let depth = ancestry.map_or(0, |frame| frame.depth + 1);

        // cycle guard runs before any dispatch, primitives included
        if let (Some(node), Some(parent)) = (&node, ancestry) {
            if parent.contains(node) {
                debug!(depth, node = %definition.describe(), "circular definition");
                return Err(SchemaError::CircularDefinition { node: definition.describe(), depth });
            }
        }
        if let Some(limit) = self.options.max_depth {
            if depth > limit {
                debug!(depth, limit, "definition depth limit exceeded");
                return Err(SchemaError::DepthLimitExceeded { limit });
            }
        }

        let frame = Ancestry { node, depth, parent: ancestry };

        match definition {
            Definition::Token(token) => self.compare_token(value, token, &frame),
            Definition::Tuple(items) => self.compare_tuple(value, &items.snapshot(), &frame),
            Definition::BoundedArray(bounded) => self.compare_bounded(value, bounded, &frame),
            Definition::Union(alts) => self.compare_union(value, &alts.snapshot(), &frame),
            Definition::Nominal(class) => Ok(value.is_non_primitive() && value.instance_of(class)),
            Definition::Null => Ok(value.is_null()),
            Definition::Undefined => Ok(value.is_undefined()),
            Definition::Shape(fields) => {
                let fields = fields.snapshot();
                self.compare_fields(value, fields.iter(), &frame)
            }
            Definition::Other(_) => Ok(false),
        }
    }

    // ------------------------------- Tokens ---------------------------------- //

    /// Optional before array before wildcard before kind check; the first two
    /// rewrite to simpler definitions and recurse.
    fn compare_token(&self, value: &Value, src: &str, frame: &Ancestry<'_>) -> Result<bool, SchemaError> {
        let Some(token) = TypeToken::parse(src) else {
            return Ok(false);
        };
        if token.optional {
            let rewritten = optional(token.without_optional().to_string());
            return self.compare(value, &rewritten, Some(frame));
        }
        if token.array {
            let rewritten = array_of(token.element().to_string());
            return self.compare(value, &rewritten, Some(frame));
        }
        if token.is_wildcard() {
            return Ok(true);
        }
        Ok(value.kind().as_str() == token.base)
    }

    // ------------------------------- Arrays ---------------------------------- //

    /// Longer than declared fails; shorter reads `Undefined` for the missing
    /// tail, which only optional positions accept.
    fn compare_tuple(&self, value: &Value, items: &[Definition], frame: &Ancestry<'_>) -> Result<bool, SchemaError> {
        let Some(len) = value.len() else {
            return Ok(false);
        };
        if len > items.len() {
            return Ok(false);
        }
        for (index, item) in items.iter().enumerate() {
            if !self.compare(&value.get_index(index), item, Some(frame))? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn compare_bounded(&self, value: &Value, bounded: &BoundedArray, frame: &Ancestry<'_>) -> Result<bool, SchemaError> {
        let Some(len) = value.len() else {
            return Ok(false);
        };
        if !bounded.admits_len(len) {
            return Ok(false);
        }
        for index in 0..len {
            if !self.compare(&value.get_index(index), &bounded.element, Some(frame))? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    // ------------------------------- Unions ---------------------------------- //

    fn compare_union(&self, value: &Value, alts: &[Definition], frame: &Ancestry<'_>) -> Result<bool, SchemaError> {
        for (index, alt) in alts.iter().enumerate() {
            if self.compare(value, alt, Some(frame))? {
                trace!(index, alternative = %alt.describe(), "union alternative matched");
                return Ok(true);
            }
        }
        Ok(false)
    }

    // ------------------------------- Shapes ---------------------------------- //

    /// Declared keys only; extra fields on the value are ignored.
    fn compare_fields<'d, I>(&self, value: &Value, fields: I, frame: &Ancestry<'_>) -> Result<bool, SchemaError>
    where
        I: Iterator<Item = (&'d String, &'d Definition)>,
    {
        if !value.is_non_primitive() {
            return Ok(false);
        }
        for (key, field) in fields {
            if !self.compare(&value.get_field(key), field, Some(frame))? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

// ------------------------------- Tests ------------------------------------ //
