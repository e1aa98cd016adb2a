//! Prop schema system for block configuration
//!
//! A block's schema maps each prop name to one of a handful of editor-facing
//! types. Schemas drive the editor's property panel and the (advisory) prop
//! validation performed before rendering.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use super::Props;

/// Prop types understood by the editor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropType {
    /// Single-line string
    String,
    /// Multi-line text
    Text,
    /// Image URL or asset key
    Image,
    /// Numeric value
    Number,
    /// Boolean toggle
    Boolean,
}

impl PropType {
    /// Check whether a JSON value fits this prop type.
    ///
    /// `null` is accepted for every type: props are optional.
    pub fn accepts(&self, value: &Value) -> bool {
        match (self, value) {
            (_, Value::Null) => true,
            (PropType::String | PropType::Text | PropType::Image, Value::String(_)) => true,
            (PropType::Number, Value::Number(_)) => true,
            (PropType::Boolean, Value::Bool(_)) => true,
            _ => false,
        }
    }

    /// Get the wire name of the type
    pub fn as_str(&self) -> &'static str {
        match self {
            PropType::String => "string",
            PropType::Text => "text",
            PropType::Image => "image",
            PropType::Number => "number",
            PropType::Boolean => "boolean",
        }
    }
}

impl std::fmt::Display for PropType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mapping from prop name to prop type
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockSchema(BTreeMap<String, PropType>);

impl BlockSchema {
    /// Create an empty schema
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Add a prop to the schema
    pub fn with(mut self, name: impl Into<String>, prop_type: PropType) -> Self {
        self.0.insert(name.into(), prop_type);
        self
    }

    /// Look up the declared type of a prop
    pub fn get(&self, name: &str) -> Option<PropType> {
        self.0.get(name).copied()
    }

    /// Iterate over declared props in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, PropType)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Check a prop set against this schema.
    ///
    /// Type mismatches are errors; props the schema does not declare are
    /// warnings. The injected `variant` prop is never reported, and a block
    /// with an empty schema accepts anything.
    pub fn validate_props(&self, props: &Props) -> ValidationResult {
        let mut result = ValidationResult::default();
        if self.is_empty() {
            return result;
        }

        for (name, value) in props {
            match self.get(name) {
                Some(prop_type) if !prop_type.accepts(value) => result.errors.push(format!(
                    "Prop '{}' expects {} but got {}",
                    name,
                    prop_type,
                    json_kind(value)
                )),
                Some(_) => {}
                None if name == "variant" => {}
                None => result.warnings.push(format!("Prop '{}' is not declared in the schema", name)),
            }
        }

        result
    }
}

impl<K: Into<String>> FromIterator<(K, PropType)> for BlockSchema {
    fn from_iter<I: IntoIterator<Item = (K, PropType)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Problems found while checking props against block metadata
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    /// Props whose value does not fit the declared type
    pub errors: Vec<String>,
    /// Undeclared props and undeclared variants
    pub warnings: Vec<String>,
}

impl ValidationResult {
    /// No prop has the wrong type
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Nothing was reported at all
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }

    /// All messages, errors first
    pub fn messages(&self) -> impl Iterator<Item = &str> {
        self.errors.iter().chain(&self.warnings).map(String::as_str)
    }
}
