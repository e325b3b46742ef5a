//! Patch operations and the result handed to node update callers.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Status, SubmitError, Unrecognized, Value};

/// Kind of a patch operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatchOp {
    /// Insert a leaf value.
    Add,
    /// Delete a leaf value.
    Remove,
    /// Overwrite a leaf value.
    Replace,
}

impl fmt::Display for PatchOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Add => f.write_str("add"),
            Self::Remove => f.write_str("remove"),
            Self::Replace => f.write_str("replace"),
        }
    }
}

/// A single `{op, path, value}` instruction.
///
/// `value` is recorded for removals too; use
/// [`PatchFormat::Strict`](crate::PatchFormat::Strict) when the consumer
/// rejects it. Strict `remove` entries read back with a `null` value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PatchOperation {
    /// Operation kind.
    pub op: PatchOp,
    /// Slash-delimited pointer to the affected leaf.
    pub path: String,
    /// Leaf value added, removed, or written.
    #[serde(default = "absent_value")]
    pub value: Value,
}

fn absent_value() -> Value {
    Value::Unrecognized(Unrecognized::Null)
}

impl PatchOperation {
    /// Creates an `add` operation.
    #[must_use]
    pub fn add(path: impl Into<String>, value: Value) -> Self {
        Self { op: PatchOp::Add, path: path.into(), value }
    }

    /// Creates a `remove` operation.
    #[must_use]
    pub fn remove(path: impl Into<String>, value: Value) -> Self {
        Self { op: PatchOp::Remove, path: path.into(), value }
    }

    /// Creates a `replace` operation.
    #[must_use]
    pub fn replace(path: impl Into<String>, value: Value) -> Self {
        Self { op: PatchOp::Replace, path: path.into(), value }
    }
}

/// Whether a non-OK patch may still be submitted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubmitPolicy {
    /// Only clean patches are submitted.
    #[default]
    RequireOk,
    /// Partial patches are submitted with a warning.
    AllowPartial,
}

/// Operations accumulated by one builder run, plus its final status.
///
/// ```
/// # use nodepatch_core::{PatchResult, Status, SubmitPolicy};
/// let result = PatchResult::default();
/// assert!(result.is_empty());
/// assert_eq!(result.status, Status::Ok);
/// assert!(result.submittable(SubmitPolicy::RequireOk).is_ok());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PatchResult {
    /// Operations in emission order.
    #[serde(alias = "patch")]
    pub operations: Vec<PatchOperation>,
    /// Most severe status recorded while building.
    pub status: Status,
}

impl PatchResult {
    /// Returns the number of operations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Indicates whether no operations were produced.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Returns an iterator over the operations.
    pub fn iter(&self) -> std::slice::Iter<'_, PatchOperation> {
        self.operations.iter()
    }

    /// Applies the submission gate, returning the operations to send.
    ///
    /// ```
    /// # use nodepatch_core::{PatchResult, Status, SubmitError, SubmitPolicy};
    /// let result = PatchResult { operations: Vec::new(), status: Status::Error };
    /// assert_eq!(
    ///     result.submittable(SubmitPolicy::RequireOk).unwrap_err(),
    ///     SubmitError::Incomplete { status: Status::Error },
    /// );
    /// assert!(result.submittable(SubmitPolicy::AllowPartial).is_ok());
    /// ```
    pub fn submittable(&self, policy: SubmitPolicy) -> Result<&[PatchOperation], SubmitError> {
        if self.status.is_ok() {
            return Ok(&self.operations);
        }
        match policy {
            SubmitPolicy::RequireOk => Err(SubmitError::Incomplete { status: self.status }),
            SubmitPolicy::AllowPartial => {
                tracing::warn!(
                    status = %self.status,
                    operations = self.operations.len(),
                    "submitting partial patch"
                );
                Ok(&self.operations)
            }
        }
    }
}

impl IntoIterator for PatchResult {
    type Item = PatchOperation;
    type IntoIter = std::vec::IntoIter<PatchOperation>;

    fn into_iter(self) -> Self::IntoIter {
        self.operations.into_iter()
    }
}

impl<'a> IntoIterator for &'a PatchResult {
    type Item = &'a PatchOperation;
    type IntoIter = std::slice::Iter<'a, PatchOperation>;

    fn into_iter(self) -> Self::IntoIter {
        self.operations.iter()
    }
}
