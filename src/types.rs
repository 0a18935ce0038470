//! Core types for facade schema linearization.

use serde_json::{Map, Value};

use crate::error::LinearizeError;

/// Prefix every supported `$ref` must start with.
pub const DEFINITIONS_PREFIX: &str = "#/definitions/";

/// Pattern key that is rendered as a placeholder instead of verbatim.
pub const ANY_KEY_PATTERN: &str = ".*";

/// Audience tags rendered by default, one output file each.
pub const DEFAULT_AUDIENCES: &[&str] = &["model-user", "controller-user"];

/// Returns the JSON type name for error messages.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Leaf types a schema node can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarType {
    String,
    Number,
    Integer,
    Boolean,
}

impl ScalarType {
    /// Parse a scalar JSON Schema `type` keyword.
    ///
    /// Returns `None` for `object`, `array` and unknown values.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "string" => Some(ScalarType::String),
            "number" => Some(ScalarType::Number),
            "integer" => Some(ScalarType::Integer),
            "boolean" => Some(ScalarType::Boolean),
            _ => None,
        }
    }
}

/// Vocabulary used for leaf type names in the rendered listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LabelStyle {
    /// Plain words: `text`, `integer`, `mapping`.
    #[default]
    Plain,
    /// Python type hints: `str`, `int`, `dict[Any, Any]`.
    Python,
}

impl LabelStyle {
    /// Label for a scalar leaf.
    pub fn scalar(&self, scalar: ScalarType) -> &'static str {
        match (self, scalar) {
            (LabelStyle::Plain, ScalarType::String) => "text",
            (LabelStyle::Plain, ScalarType::Number) => "floating-point number",
            (LabelStyle::Plain, ScalarType::Integer) => "integer",
            (LabelStyle::Plain, ScalarType::Boolean) => "boolean",
            (LabelStyle::Python, ScalarType::String) => "str",
            (LabelStyle::Python, ScalarType::Number) => "float",
            (LabelStyle::Python, ScalarType::Integer) => "int",
            (LabelStyle::Python, ScalarType::Boolean) => "bool",
        }
    }

    /// Label for an object that declares no properties of either kind.
    pub fn mapping(&self) -> &'static str {
        match self {
            LabelStyle::Plain => "mapping",
            LabelStyle::Python => "dict[Any, Any]",
        }
    }

    /// Text shown inside `[...]` for a pattern property key.
    ///
    /// Only `.*` is substituted; every other pattern passes through verbatim.
    pub fn pattern<'p>(&self, pattern: &'p str) -> &'p str {
        if pattern != ANY_KEY_PATTERN {
            return pattern;
        }
        match self {
            LabelStyle::Plain => "abc",
            LabelStyle::Python => "\"abc\"",
        }
    }
}

/// Options for linearization.
#[derive(Debug, Clone, Default)]
pub struct LinearizeOptions {
    /// Vocabulary for leaf type names.
    pub labels: LabelStyle,
}

impl LinearizeOptions {
    /// Create options with the plain label style.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the label style.
    pub fn labels(mut self, labels: LabelStyle) -> Self {
        self.labels = labels;
        self
    }
}

/// Classification of a single schema node.
///
/// Exactly one shape applies to any well-formed node; [`NodeShape::classify`]
/// rejects everything else.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NodeShape<'a> {
    /// `$ref` into the local definitions; holds the definition name.
    Reference(&'a str),
    /// Object with a non-empty `properties` mapping.
    Properties(&'a Map<String, Value>),
    /// Object with a non-empty `patternProperties` mapping.
    PatternProperties(&'a Map<String, Value>),
    /// Object that declares no properties of either kind.
    OpenObject,
    /// Array; holds the `items` schema.
    Array(&'a Value),
    Scalar(ScalarType),
}

impl<'a> NodeShape<'a> {
    /// Classify `node`, reporting errors against the path label `path`.
    ///
    /// `$ref` wins over `type` when both are present.
    ///
    /// # Errors
    ///
    /// Returns `LinearizeError` if the node is not an object, carries an
    /// unsupported `$ref`, has no usable `type`, or is an array without `items`.
    pub fn classify(node: &'a Value, path: &str) -> Result<Self, LinearizeError> {
        let Some(obj) = node.as_object() else {
            return Err(LinearizeError::MalformedNode {
                path: path.to_string(),
                reason: format!("expected object, got {}", json_type_name(node)),
            });
        };

        if let Some(reference) = obj.get("$ref") {
            let name = reference
                .as_str()
                .and_then(|r| r.strip_prefix(DEFINITIONS_PREFIX))
                .filter(|name| !name.is_empty());
            return match name {
                Some(name) => Ok(NodeShape::Reference(name)),
                None => Err(LinearizeError::UnsupportedReferenceForm {
                    path: path.to_string(),
                    reference: reference
                        .as_str()
                        .map(String::from)
                        .unwrap_or_else(|| reference.to_string()),
                }),
            };
        }

        let type_name = match obj.get("type") {
            Some(Value::String(t)) => t.as_str(),
            Some(other) => {
                return Err(LinearizeError::MalformedNode {
                    path: path.to_string(),
                    reason: format!("type must be a string, got {}", json_type_name(other)),
                })
            }
            None => {
                return Err(LinearizeError::MalformedNode {
                    path: path.to_string(),
                    reason: "node has neither $ref nor type".to_string(),
                })
            }
        };

        match type_name {
            "object" => {
                if let Some(props) = non_empty_map(obj, "properties") {
                    Ok(NodeShape::Properties(props))
                } else if let Some(patterns) = non_empty_map(obj, "patternProperties") {
                    Ok(NodeShape::PatternProperties(patterns))
                } else {
                    Ok(NodeShape::OpenObject)
                }
            }
            "array" => match obj.get("items") {
                Some(items) => Ok(NodeShape::Array(items)),
                None => Err(LinearizeError::MissingArrayItems {
                    path: path.to_string(),
                }),
            },
            other => ScalarType::parse(other).map(NodeShape::Scalar).ok_or_else(|| {
                LinearizeError::UnknownScalarType {
                    path: path.to_string(),
                    type_name: other.to_string(),
                }
            }),
        }
    }
}

fn non_empty_map<'a>(obj: &'a Map<String, Value>, key: &str) -> Option<&'a Map<String, Value>> {
    obj.get(key)
        .and_then(Value::as_object)
        .filter(|map| !map.is_empty())
}
