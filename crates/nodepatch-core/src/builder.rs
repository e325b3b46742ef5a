//! Structural diff producing node update patches.
//!
//! [`PatchBuilder`] walks a source and a target [`Value`] side by side and
//! records the leaf-level `add`, `remove` and `replace` operations that turn
//! one into the other. Shape problems never abort the walk: they are folded
//! into the result [`Status`] and the remaining branches are still diffed.

use crate::{PatchOp, PatchOperation, PatchOptions, PatchResult, PointerStyle, Status, Value};

/// Accumulates patch operations across one diff.
///
/// A builder is created per diff request and read once through
/// [`PatchBuilder::finalize`].
///
/// ```
/// # use nodepatch_core::{PatchBuilder, PatchOp, Status, Value};
/// let source = Value::from_json_str("{\"a\":1,\"b\":2}")?;
/// let target = Value::from_json_str("{\"a\":1,\"c\":3}")?;
/// let mut builder = PatchBuilder::new();
/// builder.build_patch(&source, &target, "");
/// let result = builder.finalize();
/// assert_eq!(result.status, Status::Ok);
/// let ops: Vec<_> = result.iter().map(|op| (op.op, op.path.as_str())).collect();
/// assert_eq!(ops, [(PatchOp::Remove, "/b"), (PatchOp::Add, "/c")]);
/// # Ok::<(), nodepatch_core::ParseError>(())
/// ```
#[derive(Clone, Debug, Default)]
pub struct PatchBuilder {
    operations: Vec<PatchOperation>,
    status: Status,
    pointer_style: PointerStyle,
}

impl PatchBuilder {
    /// Creates a builder that appends keys verbatim.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder using the pointer style from `options`.
    #[must_use]
    pub fn with_options(options: &PatchOptions) -> Self {
        Self { pointer_style: options.pointer_style(), ..Self::default() }
    }

    /// Records the operations that transform `source` into `target` at `path`.
    pub fn build_patch(&mut self, source: &Value, target: &Value, path: &str) {
        tracing::trace!(path, "building patch");
        match (source, target) {
            (Value::Scalar(lhs), Value::Scalar(rhs)) => {
                if lhs != rhs {
                    self.push(PatchOp::Replace, path, target);
                }
            }
            (Value::Collection(lhs), Value::Collection(rhs)) => {
                for (key, item) in lhs {
                    let child = self.child_path(path, key);
                    match rhs.get(key) {
                        Some(other) => self.build_patch(item, other, &child),
                        None => self.remove_subtree(item, &child),
                    }
                }
                for (key, item) in rhs {
                    if !lhs.contains_key(key) {
                        let child = self.child_path(path, key);
                        self.add_subtree(item, &child);
                    }
                }
            }
            (Value::Scalar(_), Value::Collection(_)) | (Value::Collection(_), Value::Scalar(_)) => {
                self.remove_subtree(source, path);
                self.add_subtree(target, path);
            }
            _ => {
                self.escalate(Status::Error);
                tracing::error!(
                    path,
                    source = %source.to_json_value(),
                    target = %target.to_json_value(),
                    "unable to patch"
                );
            }
        }
    }

    /// Records one `add` per scalar leaf of `value`, rooted at `path`.
    pub fn add_subtree(&mut self, value: &Value, path: &str) {
        self.expand(value, path, PatchOp::Add);
    }

    /// Records one `remove` per scalar leaf of `value`, rooted at `path`.
    pub fn remove_subtree(&mut self, value: &Value, path: &str) {
        self.expand(value, path, PatchOp::Remove);
    }

    /// Returns a copy of the accumulated operations together with the status.
    #[must_use]
    pub fn finalize(&self) -> PatchResult {
        PatchResult { operations: self.operations.clone(), status: self.status }
    }

    /// Returns the status recorded so far.
    #[must_use]
    pub fn status(&self) -> Status {
        self.status
    }

    fn expand(&mut self, value: &Value, path: &str, op: PatchOp) {
        tracing::trace!(path, %op, "expanding subtree");
        match value {
            Value::Scalar(_) => self.push(op, path, value),
            Value::Collection(children) => {
                for (key, child) in children {
                    let child_path = self.child_path(path, key);
                    self.expand(child, &child_path, op);
                }
            }
            Value::Unrecognized(_) => {
                self.escalate(Status::UnknownType);
                tracing::warn!(
                    path,
                    %op,
                    value = %value.to_json_value(),
                    "unable to process item of unrecognized type"
                );
            }
        }
    }

    fn push(&mut self, op: PatchOp, path: &str, value: &Value) {
        tracing::debug!(path, %op, "recording operation");
        self.operations.push(PatchOperation { op, path: path.to_owned(), value: value.clone() });
    }

    fn escalate(&mut self, status: Status) {
        self.status = self.status.merge(status);
    }

    fn child_path(&self, path: &str, key: &str) -> String {
        match self.pointer_style {
            PointerStyle::Raw => format!("{path}/{key}"),
            PointerStyle::Escaped => format!("{path}/{}", escape_pointer_segment(key)),
        }
    }
}

fn escape_pointer_segment(segment: &str) -> String {
    segment.replace('~', "~0").replace('/', "~1")
}

/// Diffs `source` against `target` at the configured base path.
///
/// ```
/// # use nodepatch_core::{build_patch, PatchOptions, Value};
/// let source = Value::from_json_str("{\"cpus\":8}")?;
/// let target = Value::from_json_str("{\"cpus\":16}")?;
/// let opts = PatchOptions::default().with_base_path("/properties").unwrap();
/// let result = build_patch(&source, &target, &opts);
/// assert_eq!(result.operations[0].path, "/properties/cpus");
/// # Ok::<(), nodepatch_core::ParseError>(())
/// ```
#[must_use]
pub fn build_patch(source: &Value, target: &Value, options: &PatchOptions) -> PatchResult {
    let mut builder = PatchBuilder::with_options(options);
    builder.build_patch(source, target, options.base_path());
    builder.finalize()
}
