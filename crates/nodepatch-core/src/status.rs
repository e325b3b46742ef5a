use std::fmt;

use serde::{Deserialize, Serialize};

/// Summary of how faithfully a patch represents the requested change.
///
/// Variants are ordered by severity. A builder run only ever moves the
/// status upwards through [`Status::merge`].
///
/// ```
/// # use nodepatch_core::Status;
/// let status = Status::Ok.merge(Status::UnknownType).merge(Status::Error);
/// assert_eq!(status, Status::UnknownType);
/// ```
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    /// Every difference was expressed as operations.
    #[default]
    Ok,
    /// A source/target pair could not be reconciled.
    Error,
    /// A value of unrecognized type was met while expanding a subtree.
    UnknownType,
}

impl Status {
    /// Returns the more severe of the two statuses.
    #[must_use]
    pub fn merge(self, other: Self) -> Self {
        self.max(other)
    }

    /// Numeric code used by the node update API clients (0, 1, 2).
    #[must_use]
    pub fn code(self) -> u8 {
        match self {
            Self::Ok => 0,
            Self::Error => 1,
            Self::UnknownType => 2,
        }
    }

    /// Indicates whether the status is [`Status::Ok`].
    #[must_use]
    pub fn is_ok(self) -> bool {
        self == Self::Ok
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ok => f.write_str("OK"),
            Self::Error => f.write_str("ERROR"),
            Self::UnknownType => f.write_str("UNKNOWN_TYPE"),
        }
    }
}
