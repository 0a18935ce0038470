//! Facade Schema Linearizer
//!
//! Flattens JSON-Schema descriptions of RPC facades into readable listings of
//! every leaf field and its type.
//!
//! Each schema node becomes zero or more `path: type` lines. Object properties
//! extend the path with `.name`, pattern properties with `[pattern]` and array
//! items with `[0]`. A `$ref` emits its definition name at the point of use and
//! is then expanded in place, at the same path. A definition already expanded
//! on the current branch is not expanded again, so recursive schemas terminate.
//!
//! # Example
//!
//! ```
//! use facade_schema::{collect_lines, LinearizeOptions};
//! use serde_json::json;
//!
//! let schema = json!({
//!     "definitions": {
//!         "Error": {
//!             "type": "object",
//!             "properties": {
//!                 "code": { "type": "string" },
//!                 "info": {
//!                     "type": "object",
//!                     "patternProperties": { ".*": { "type": "object" } }
//!                 },
//!                 "message": { "type": "string" }
//!             }
//!         }
//!     }
//! });
//! let definitions = schema["definitions"].as_object().unwrap();
//!
//! let lines = collect_lines(&definitions["Error"], definitions, &LinearizeOptions::new()).unwrap();
//! assert_eq!(lines, [".code: text", ".info[abc]: mapping", ".message: text"]);
//! ```
//!
//! # Leaf Labels
//!
//! | Schema | `LabelStyle::Plain` | `LabelStyle::Python` |
//! |--------|---------------------|----------------------|
//! | `"string"` | `text` | `str` |
//! | `"number"` | `floating-point number` | `float` |
//! | `"integer"` | `integer` | `int` |
//! | `"boolean"` | `boolean` | `bool` |
//! | `"object"` without properties | `mapping` | `dict[Any, Any]` |
//! | pattern `.*` | `[abc]` | `["abc"]` |

mod error;
mod facade;
mod linearizer;
mod loader;
mod render;
mod types;

pub use error::{DocumentError, LinearizeError, RenderError};
pub use facade::{format_facades, parse_facades, Facade, FacadeSchema, FacadeVersion, Method};
pub use linearizer::{collect_lines, linearize, linearize_definitions, Lines};
pub use loader::{is_url, load_document, load_document_auto, load_document_str};
pub use render::{
    discover_inputs, output_path, render_dir, render_document, render_file, FileReport,
    FileStatus, InputPattern, RenderReport, DEFAULT_PATTERN,
};
pub use types::{
    json_type_name, LabelStyle, LinearizeOptions, NodeShape, ScalarType, ANY_KEY_PATTERN,
    DEFAULT_AUDIENCES, DEFINITIONS_PREFIX,
};

#[cfg(feature = "remote")]
pub use loader::load_document_url;
