//! Schema linearization - flattens a schema node into `path: type` lines.
//!
//! The walk is depth-first over an explicit stack so callers can stream lines
//! as they are produced. Each stack frame owns its copy of the visited set,
//! so a definition is expanded at most once per root-to-leaf branch while
//! sibling branches expand it independently.

use std::collections::HashSet;
use std::iter::FusedIterator;

use serde_json::{Map, Value};

use crate::error::LinearizeError;
use crate::types::{LabelStyle, LinearizeOptions, NodeShape};

/// Linearize `node` from the root: empty path, nothing visited.
///
/// # Example
///
/// ```
/// use facade_schema::{linearize, LinearizeOptions};
/// use serde_json::json;
///
/// let node = json!({ "$ref": "#/definitions/X" });
/// let defs = json!({ "X": { "type": "string" } });
/// let lines: Vec<String> = linearize(&node, defs.as_object().unwrap(), &LinearizeOptions::new())
///     .collect::<Result<_, _>>()
///     .unwrap();
/// assert_eq!(lines, [": X", ": text"]);
/// ```
pub fn linearize<'a>(
    node: &'a Value,
    definitions: &'a Map<String, Value>,
    options: &LinearizeOptions,
) -> Lines<'a> {
    Lines::at(node, definitions, String::new(), std::iter::empty(), options)
}

/// Linearize `node` and collect every line.
///
/// # Errors
///
/// Returns the first `LinearizeError` met during the walk.
pub fn collect_lines(
    node: &Value,
    definitions: &Map<String, Value>,
    options: &LinearizeOptions,
) -> Result<Vec<String>, LinearizeError> {
    linearize(node, definitions, options).collect()
}

/// Linearize every entry of `definitions` on its own, in declaration order.
///
/// # Errors
///
/// Returns the first `LinearizeError` from any definition.
pub fn linearize_definitions(
    definitions: &Map<String, Value>,
    options: &LinearizeOptions,
) -> Result<Vec<(String, Vec<String>)>, LinearizeError> {
    definitions
        .iter()
        .map(|(name, node)| Ok((name.clone(), collect_lines(node, definitions, options)?)))
        .collect()
}

/// Lazy sequence of linearized lines.
///
/// Yields `Err` at most once; the iterator is exhausted afterwards.
#[derive(Debug)]
pub struct Lines<'a> {
    definitions: &'a Map<String, Value>,
    labels: LabelStyle,
    stack: Vec<Frame<'a>>,
    pending: Option<LinearizeError>,
}

#[derive(Debug)]
struct Frame<'a> {
    node: &'a Value,
    path: String,
    visited: HashSet<&'a str>,
}

impl<'a> Lines<'a> {
    /// Start a walk at `node` with an explicit path label and visited set.
    pub fn at(
        node: &'a Value,
        definitions: &'a Map<String, Value>,
        path: impl Into<String>,
        visited: impl IntoIterator<Item = &'a str>,
        options: &LinearizeOptions,
    ) -> Self {
        Self {
            definitions,
            labels: options.labels,
            stack: vec![Frame {
                node,
                path: path.into(),
                visited: visited.into_iter().collect(),
            }],
            pending: None,
        }
    }

    /// Expand one frame. Returns the line it emits, if any.
    fn step(&mut self, frame: Frame<'a>) -> Result<Option<String>, LinearizeError> {
        let Frame {
            node,
            path,
            mut visited,
        } = frame;

        match NodeShape::classify(node, &path)? {
            NodeShape::Reference(name) => {
                let line = format!("{}: {}", path, name);
                if visited.contains(name) {
                    return Ok(Some(line));
                }
                match self.definitions.get(name) {
                    Some(target) => {
                        visited.insert(name);
                        self.stack.push(Frame {
                            node: target,
                            path,
                            visited,
                        });
                    }
                    // The marker line still goes out before the failure.
                    None => {
                        self.pending = Some(LinearizeError::UnresolvedReference {
                            path,
                            name: name.to_string(),
                        });
                    }
                }
                Ok(Some(line))
            }
            NodeShape::Properties(props) => {
                for (name, child) in props.iter().rev() {
                    self.stack.push(Frame {
                        node: child,
                        path: format!("{}.{}", path, name),
                        visited: visited.clone(),
                    });
                }
                Ok(None)
            }
            NodeShape::PatternProperties(patterns) => {
                for (pattern, child) in patterns.iter().rev() {
                    self.stack.push(Frame {
                        node: child,
                        path: format!("{}[{}]", path, self.labels.pattern(pattern)),
                        visited: visited.clone(),
                    });
                }
                Ok(None)
            }
            NodeShape::OpenObject => Ok(Some(format!("{}: {}", path, self.labels.mapping()))),
            NodeShape::Array(items) => {
                self.stack.push(Frame {
                    node: items,
                    path: format!("{}[0]", path),
                    visited,
                });
                Ok(None)
            }
            NodeShape::Scalar(scalar) => {
                Ok(Some(format!("{}: {}", path, self.labels.scalar(scalar))))
            }
        }
    }

    fn fail(&mut self, err: LinearizeError) -> Option<Result<String, LinearizeError>> {
        self.stack.clear();
        Some(Err(err))
    }
}

impl<'a> Iterator for Lines<'a> {
    type Item = Result<String, LinearizeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(err) = self.pending.take() {
            return self.fail(err);
        }

        while let Some(frame) = self.stack.pop() {
            match self.step(frame) {
                Ok(Some(line)) => return Some(Ok(line)),
                Ok(None) => {}
                Err(err) => return self.fail(err),
            }
        }
        None
    }
}

impl FusedIterator for Lines<'_> {}
