//! Benchmark corpora for `nodepatch-core`.
//!
//! Each corpus is a pair of node documents (stored and edited) embedded at
//! compile time from `fixtures/`.
//!
//! # Examples
//!
//! ```
//! use nodepatch_benches::available_corpora;
//! use nodepatch_core::PatchOptions;
//!
//! let corpus = &available_corpora()[0];
//! let dataset = corpus.load()?;
//! let patch = dataset.build(&PatchOptions::default());
//! assert!(!patch.is_empty());
//! # Ok::<(), nodepatch_core::ParseError>(())
//! ```
#![forbid(unsafe_code)]
#![warn(missing_docs)]

use nodepatch_core::{build_patch, ParseError, PatchOptions, PatchResult, RenderConfig, Value};

/// A named pair of fixture documents.
#[derive(Clone, Copy, Debug)]
pub struct Corpus {
    name: &'static str,
    before: &'static str,
    after: &'static str,
}

impl Corpus {
    /// Short identifier used as the benchmark id.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Total size of both fixture documents in bytes.
    #[must_use]
    pub fn fixture_bytes(&self) -> usize {
        self.before.len() + self.after.len()
    }

    /// Parses both fixture documents.
    pub fn load(&self) -> Result<Dataset, ParseError> {
        Ok(Dataset {
            before: Value::from_json_str(self.before)?,
            after: Value::from_json_str(self.after)?,
        })
    }
}

/// Parsed documents of a [`Corpus`].
#[derive(Clone, Debug)]
pub struct Dataset {
    before: Value,
    after: Value,
}

impl Dataset {
    /// The stored document.
    #[must_use]
    pub fn before(&self) -> &Value {
        &self.before
    }

    /// The edited document.
    #[must_use]
    pub fn after(&self) -> &Value {
        &self.after
    }

    /// Builds the patch from the stored to the edited document.
    #[must_use]
    pub fn build(&self, options: &PatchOptions) -> PatchResult {
        build_patch(&self.before, &self.after, options)
    }

    /// Renders a patch in the line-oriented text format.
    #[must_use]
    pub fn render_text(&self, patch: &PatchResult, config: &RenderConfig) -> String {
        patch.render(config)
    }
}

const CORPORA: &[Corpus] = &[
    Corpus {
        name: "node-small",
        before: include_str!("../fixtures/node-small.before.json"),
        after: include_str!("../fixtures/node-small.after.json"),
    },
    Corpus {
        name: "node-wide",
        before: include_str!("../fixtures/node-wide.before.json"),
        after: include_str!("../fixtures/node-wide.after.json"),
    },
    Corpus {
        name: "ports",
        before: include_str!("../fixtures/ports.before.json"),
        after: include_str!("../fixtures/ports.after.json"),
    },
];

/// All registered corpora, smallest first.
#[must_use]
pub fn available_corpora() -> &'static [Corpus] {
    CORPORA
}
