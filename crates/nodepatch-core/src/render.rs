//! Output formats for [`PatchResult`].

use serde::Serialize;
use serde_json::Value as JsonValue;

use crate::{PatchOp, PatchOperation, PatchResult, RenderError};

const COLOR_RESET: &str = "\u{1b}[0m";
const COLOR_RED: &str = "\u{1b}[31m";
const COLOR_GREEN: &str = "\u{1b}[32m";
const COLOR_YELLOW: &str = "\u{1b}[33m";

/// Wire shape of the JSON Patch rendering.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PatchFormat {
    /// Keeps `value` on `remove` entries, as recorded by the builder.
    #[default]
    Debug,
    /// Drops `value` on `remove` entries (RFC 6902).
    Strict,
}

/// Configuration toggles for text rendering.
#[derive(Clone, Copy, Debug, Default)]
pub struct RenderConfig {
    color: bool,
}

impl RenderConfig {
    /// Constructs a configuration with default settings (no ANSI color).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables or disables ANSI color output.
    #[must_use]
    pub fn with_color(mut self, enabled: bool) -> Self {
        self.color = enabled;
        self
    }

    /// Indicates whether color output is enabled.
    #[must_use]
    pub fn color_enabled(self) -> bool {
        self.color
    }
}

#[derive(Serialize)]
struct PatchElement<'a> {
    op: PatchOp,
    path: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<JsonValue>,
}

impl<'a> PatchElement<'a> {
    fn new(operation: &'a PatchOperation, format: PatchFormat) -> Self {
        let value = match (operation.op, format) {
            (PatchOp::Remove, PatchFormat::Strict) => None,
            _ => Some(operation.value.to_json_value()),
        };
        Self { op: operation.op, path: &operation.path, value }
    }
}

impl PatchResult {
    /// Renders the operations as a JSON Patch array.
    ///
    /// ```
    /// # use nodepatch_core::{PatchFormat, PatchOptions, Value};
    /// let source = Value::from_json_str("{\"a\":1}")?;
    /// let target = Value::from_json_str("{}")?;
    /// let result = source.patch_to(&target, &PatchOptions::default());
    /// assert_eq!(
    ///     result.render_patch(PatchFormat::Debug)?,
    ///     "[{\"op\":\"remove\",\"path\":\"/a\",\"value\":1}]"
    /// );
    /// assert_eq!(
    ///     result.render_patch(PatchFormat::Strict)?,
    ///     "[{\"op\":\"remove\",\"path\":\"/a\"}]"
    /// );
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn render_patch(&self, format: PatchFormat) -> Result<String, RenderError> {
        let elements: Vec<_> =
            self.operations.iter().map(|operation| PatchElement::new(operation, format)).collect();
        Ok(serde_json::to_string(&elements)?)
    }

    /// Renders the operations as human-readable lines.
    ///
    /// ```
    /// # use nodepatch_core::{PatchOptions, RenderConfig, Value};
    /// let source = Value::from_json_str("{\"a\":1,\"b\":2}")?;
    /// let target = Value::from_json_str("{\"a\":3,\"c\":\"x\"}")?;
    /// let result = source.patch_to(&target, &PatchOptions::default());
    /// assert_eq!(result.render(&RenderConfig::default()), "~ /a 3\n- /b 2\n+ /c \"x\"\n");
    /// # Ok::<(), nodepatch_core::ParseError>(())
    /// ```
    #[must_use]
    pub fn render(&self, config: &RenderConfig) -> String {
        let mut output = String::new();
        for operation in &self.operations {
            let (marker, color) = match operation.op {
                PatchOp::Add => ('+', COLOR_GREEN),
                PatchOp::Remove => ('-', COLOR_RED),
                PatchOp::Replace => ('~', COLOR_YELLOW),
            };
            if config.color_enabled() {
                output.push_str(color);
            }
            output.push(marker);
            output.push(' ');
            output.push_str(&operation.path);
            output.push(' ');
            output.push_str(&operation.value.to_json_value().to_string());
            if config.color_enabled() {
                output.push_str(COLOR_RESET);
            }
            output.push('\n');
        }
        if !self.status.is_ok() {
            output.push_str("# status: ");
            output.push_str(&self.status.to_string());
            output.push('\n');
        }
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Status, Value};

    #[test]
    fn empty_result_renders_empty_array() {
        let result = PatchResult::default();
        assert_eq!(result.render_patch(PatchFormat::Strict).unwrap(), "[]");
        assert_eq!(result.render(&RenderConfig::default()), "");
    }

    #[test]
    fn strict_format_keeps_values_on_add_and_replace() {
        let result = PatchResult {
            operations: vec![
                PatchOperation::add("/a", Value::from("x")),
                PatchOperation::replace("/b", Value::from("y")),
            ],
            status: Status::Ok,
        };
        assert_eq!(
            result.render_patch(PatchFormat::Strict).unwrap(),
            "[{\"op\":\"add\",\"path\":\"/a\",\"value\":\"x\"},{\"op\":\"replace\",\"path\":\"/b\",\"value\":\"y\"}]"
        );
    }

    #[test]
    fn non_ok_status_is_appended_to_text() {
        let result = PatchResult { operations: Vec::new(), status: Status::Error };
        assert_eq!(result.render(&RenderConfig::default()), "# status: ERROR\n");
    }

    #[test]
    fn color_wraps_each_line() {
        let result = PatchResult {
            operations: vec![PatchOperation::remove("/a", Value::from("x"))],
            status: Status::Ok,
        };
        let rendered = result.render(&RenderConfig::new().with_color(true));
        assert_eq!(rendered, "\u{1b}[31m- /a \"x\"\u{1b}[0m\n");
    }
}
