//! Schema files: a definition plus the validator options to run it with.
//!
//! A file holds either a bare JSON definition or an envelope
//! `{ "definition": .., "options": { "max_depth": 32 } }`. A top-level object
//! is an envelope only when it has a `definition` key and no keys other than
//! `definition` and `options`. A bare shape whose only fields are `definition`
//! (and maybe `options`) therefore reads as an envelope; write it inside one,
//! as `{ "definition": { "definition": .. } }`.
use serde::Deserialize;

use crate::definition::Definition;
use crate::matcher::{Options, Validator};
use crate::path_de::{self, PathError};

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchemaDocument {
    pub definition: Definition,
    #[serde(default)]
    pub options: Options,
}

impl SchemaDocument {
    pub fn parse(src: &str) -> Result<Self, PathError> {
        let raw: serde_json::Value = path_de::from_str_with_path(src)?;
        if is_envelope(&raw) {
            path_de::from_value_with_path(raw)
        } else {
            Ok(Self {
                definition: path_de::from_value_with_path(raw)?,
                options: Options::default(),
            })
        }
    }

    pub fn validator(&self) -> Validator {
        Validator::new(self.options)
    }
}

fn is_envelope(raw: &serde_json::Value) -> bool {
    raw.as_object().is_some_and(|map| {
        map.contains_key("definition") && map.keys().all(|k| k == "definition" || k == "options")
    })
}
