//! Structural patch builder for bare-metal node documents.
//!
//! `nodepatch-core` computes the JSON-Patch style operations that turn a
//! stored node into an edited one. Values are classified once into
//! [`Value`]; the [`PatchBuilder`] diffs them recursively and reports
//! anything it cannot express through a [`Status`] instead of failing.
//!
//! ```
//! use nodepatch_core::{PatchFormat, PatchOptions, Status, SubmitPolicy, Value};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let stored = Value::from_json_str("{\"name\":\"node-1\",\"extra\":{\"rack\":\"r1\"}}")?;
//!     let edited = Value::from_json_str("{\"name\":\"node-1\",\"extra\":{\"rack\":\"r2\"}}")?;
//!     let result = stored.patch_to(&edited, &PatchOptions::default());
//!     assert_eq!(result.status, Status::Ok);
//!
//!     let rendered = result.render_patch(PatchFormat::Strict)?;
//!     assert_eq!(rendered, "[{\"op\":\"replace\",\"path\":\"/extra/rack\",\"value\":\"r2\"}]");
//!
//!     let operations = result.submittable(SubmitPolicy::RequireOk)?;
//!     assert_eq!(operations.len(), 1);
//!     Ok(())
//! }
//! ```
#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod builder;
mod error;
pub mod ironic;
mod number;
mod options;
mod patch;
mod render;
mod status;
mod value;

pub use builder::{build_patch, PatchBuilder};
pub use error::{OptionsError, ParseError, RenderError, SubmitError};
pub use number::Number;
pub use options::{PatchOptions, PointerStyle};
pub use patch::{PatchOp, PatchOperation, PatchResult, SubmitPolicy};
pub use render::{PatchFormat, RenderConfig};
pub use status::Status;
pub use value::{Collection, CollectionKind, Scalar, Unrecognized, Value};

/// Returns the semantic version of the `nodepatch-core` crate.
///
/// ```
/// assert!(!nodepatch_core::version().is_empty());
/// ```
#[must_use]
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
