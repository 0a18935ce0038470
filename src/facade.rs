//! Facade records and the per-audience listing formatter.
//!
//! A facade document is a list of records such as:
//! ```json
//! [{
//!   "Name": "Secrets",
//!   "Version": 2,
//!   "AvailableTo": ["model-user"],
//!   "Schema": {
//!     "properties": {
//!       "DeleteSecrets": {
//!         "properties": {
//!           "Params": { "$ref": "#/definitions/DeleteSecretArgs" },
//!           "Result": { "$ref": "#/definitions/ErrorResults" }
//!         }
//!       }
//!     },
//!     "definitions": { ... }
//!   }
//! }]
//! ```
//! Documents wrapped as `{"facades": [...]}` are accepted as well.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use crate::error::{DocumentError, LinearizeError};
use crate::linearizer::collect_lines;
use crate::types::LinearizeOptions;

/// One named, versioned group of RPC methods.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Facade {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Version")]
    pub version: FacadeVersion,
    /// Audience tags this facade is exposed to.
    #[serde(rename = "AvailableTo", default)]
    pub available_to: Vec<String>,
    #[serde(rename = "Schema")]
    pub schema: FacadeSchema,
}

/// Facade version, rendered verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FacadeVersion {
    Number(Number),
    Text(String),
}

impl fmt::Display for FacadeVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FacadeVersion::Number(n) => write!(f, "{}", n),
            FacadeVersion::Text(s) => f.write_str(s),
        }
    }
}

/// Method table and shared definitions of a facade.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FacadeSchema {
    /// Method name to method body, in declaration order.
    #[serde(default)]
    pub properties: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub definitions: Option<Map<String, Value>>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Document {
    List(Vec<Facade>),
    Wrapped { facades: Vec<Facade> },
}

impl Facade {
    /// Returns true if `audience` is one of the facade's `AvailableTo` tags.
    pub fn is_available_to(&self, audience: &str) -> bool {
        self.available_to.iter().any(|tag| tag == audience)
    }

    /// The shared definitions mapping; empty when the schema declares none.
    pub fn definitions(&self) -> &Map<String, Value> {
        static EMPTY: std::sync::OnceLock<Map<String, Value>> = std::sync::OnceLock::new();
        self.schema
            .definitions
            .as_ref()
            .unwrap_or_else(|| EMPTY.get_or_init(Map::new))
    }

    /// Methods in declaration order.
    pub fn methods(&self) -> impl Iterator<Item = Method<'_>> {
        self.schema.properties.iter().map(|(name, body)| Method {
            name,
            params: payload(body, "Params"),
            result: payload(body, "Result"),
        })
    }
}

/// A method with its optional request and response payload schemas.
#[derive(Debug, Clone, Copy)]
pub struct Method<'a> {
    pub name: &'a str,
    pub params: Option<&'a Value>,
    pub result: Option<&'a Value>,
}

fn payload<'a>(body: &'a Value, key: &str) -> Option<&'a Value> {
    body.get("properties").and_then(|props| props.get(key))
}

/// Parse facade records from a loaded document.
///
/// # Errors
///
/// Returns `DocumentError::InvalidDocument` if the value is neither a list of
/// facade records nor an object with a `facades` list.
pub fn parse_facades(document: Value) -> Result<Vec<Facade>, DocumentError> {
    let document: Document = serde_json::from_value(document)
        .map_err(|source| DocumentError::InvalidDocument { source })?;
    Ok(match document {
        Document::List(facades) | Document::Wrapped { facades } => facades,
    })
}

/// Format every method of every facade available to `audience`.
///
/// Each method produces five entries: the `Name: Version` header, the
/// `.Method()` line, the `in` and `out` blocks and a blank separator. The
/// `in`/`out` entries hold the linearized payload on following lines, or
/// `: None` when the payload is not declared.
///
/// # Errors
///
/// Returns the first `LinearizeError` from any payload.
pub fn format_facades(
    facades: &[Facade],
    audience: &str,
    options: &LinearizeOptions,
) -> Result<Vec<String>, LinearizeError> {
    let mut lines = Vec::new();

    for facade in facades.iter().filter(|f| f.is_available_to(audience)) {
        let definitions = facade.definitions();
        for method in facade.methods() {
            let args = format_payload(method.params, definitions, options)?;
            let rets = format_payload(method.result, definitions, options)?;

            lines.push(format!("{}: {}", facade.name, facade.version));
            lines.push(format!(".{}()", method.name));
            lines.push(format!("in{}", args));
            lines.push(format!("out{}", rets));
            lines.push(String::new());
        }
    }

    Ok(lines)
}

fn format_payload(
    node: Option<&Value>,
    definitions: &Map<String, Value>,
    options: &LinearizeOptions,
) -> Result<String, LinearizeError> {
    match node {
        Some(node) => Ok(format!(
            "\n{}",
            collect_lines(node, definitions, options)?.join("\n")
        )),
        None => Ok(": None".to_string()),
    }
}
