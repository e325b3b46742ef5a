use std::fmt;

use serde::{Deserialize, Serialize};

use crate::OptionsError;

/// Controls how object keys are appended to operation paths.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointerStyle {
    /// Keys are appended verbatim (`path + "/" + key`), as the node update API expects.
    #[default]
    Raw,
    /// Keys are escaped per RFC 6901 (`~` becomes `~0`, `/` becomes `~1`).
    Escaped,
}

/// Configuration knobs for classification and patch building.
///
/// Deserialized options go through the same validation as
/// [`PatchOptions::with_base_path`].
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(try_from = "RawPatchOptions")]
pub struct PatchOptions {
    base_path: String,
    pointer_style: PointerStyle,
    detect_dates: bool,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawPatchOptions {
    #[serde(default)]
    base_path: String,
    #[serde(default)]
    pointer_style: PointerStyle,
    #[serde(default)]
    detect_dates: bool,
}

impl TryFrom<RawPatchOptions> for PatchOptions {
    type Error = OptionsError;

    fn try_from(raw: RawPatchOptions) -> Result<Self, Self::Error> {
        Ok(Self::default()
            .with_base_path(raw.base_path)?
            .with_pointer_style(raw.pointer_style)
            .with_date_detection(raw.detect_dates))
    }
}

impl PatchOptions {
    /// Returns the pointer every operation path is rooted at.
    ///
    /// ```
    /// # use nodepatch_core::PatchOptions;
    /// assert_eq!(PatchOptions::default().base_path(), "");
    /// ```
    #[must_use]
    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// Returns the configured pointer style.
    #[must_use]
    pub fn pointer_style(&self) -> PointerStyle {
        self.pointer_style
    }

    /// Indicates whether RFC 3339 strings classify as date scalars.
    #[must_use]
    pub fn detect_dates(&self) -> bool {
        self.detect_dates
    }

    /// Sets the base path.
    ///
    /// ```
    /// # use nodepatch_core::{OptionsError, PatchOptions};
    /// let opts = PatchOptions::default().with_base_path("/properties")?;
    /// assert_eq!(opts.base_path(), "/properties");
    /// assert!(PatchOptions::default().with_base_path("properties").is_err());
    /// # Ok::<(), OptionsError>(())
    /// ```
    pub fn with_base_path(mut self, path: impl Into<String>) -> Result<Self, OptionsError> {
        self.base_path = path.into();
        self.validate()?;
        Ok(self)
    }

    /// Sets the pointer style.
    #[must_use]
    pub fn with_pointer_style(mut self, style: PointerStyle) -> Self {
        self.pointer_style = style;
        self
    }

    /// Enables or disables date detection during classification.
    #[must_use]
    pub fn with_date_detection(mut self, enabled: bool) -> Self {
        self.detect_dates = enabled;
        self
    }

    fn validate(&self) -> Result<(), OptionsError> {
        if self.base_path.is_empty() {
            return Ok(());
        }
        if !self.base_path.starts_with('/') {
            return Err(OptionsError::RelativeBasePath { path: self.base_path.clone() });
        }
        if self.base_path.ends_with('/') {
            return Err(OptionsError::TrailingSlash { path: self.base_path.clone() });
        }
        Ok(())
    }
}

impl fmt::Display for PointerStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PointerStyle::Raw => f.write_str("raw"),
            PointerStyle::Escaped => f.write_str("escaped"),
        }
    }
}
