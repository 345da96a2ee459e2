use crate::domain::model::{FormattedOutput, ParsedValue};
use crate::domain::ports::{Grammar, PrettyPrinter, RenderOptions};
use crate::utils::error::{ParseError, Result};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;

/// Default engine: `serde_json`'s pretty printer, one trailing newline.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonPrettyPrinter;

impl PrettyPrinter for JsonPrettyPrinter {
    fn render(&self, text: &str, options: &RenderOptions) -> Result<String> {
        match options.grammar {
            Grammar::Json => {}
        }

        let value: serde_json::Value = serde_json::from_str(text)?;
        let indent = " ".repeat(options.indent);
        let mut buf = Vec::with_capacity(text.len() * 2);
        let mut serializer =
            serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(indent.as_bytes()));
        value.serialize(&mut serializer)?;

        let mut rendered =
            String::from_utf8(buf).map_err(|e| ParseError::format(e.to_string()))?;
        rendered.push('\n');
        Ok(rendered)
    }
}

/// Serializes a parsed value to canonical JSON and hands it to the printer.
#[derive(Debug, Clone)]
pub struct FormattingAdapter<P: PrettyPrinter = JsonPrettyPrinter> {
    printer: P,
    options: RenderOptions,
}

impl FormattingAdapter<JsonPrettyPrinter> {
    pub fn new() -> Self {
        Self::with_printer(JsonPrettyPrinter, RenderOptions::default())
    }

    pub fn with_indent(indent: usize) -> Self {
        Self::with_printer(
            JsonPrettyPrinter,
            RenderOptions {
                indent,
                ..RenderOptions::default()
            },
        )
    }
}

impl Default for FormattingAdapter<JsonPrettyPrinter> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: PrettyPrinter> FormattingAdapter<P> {
    pub fn with_printer(printer: P, options: RenderOptions) -> Self {
        Self { printer, options }
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    pub fn format(&self, value: &ParsedValue) -> Result<FormattedOutput> {
        let canonical = serde_json::to_string(value)?;
        let rendered = self
            .printer
            .render(&canonical, &self.options)
            .map_err(|err| match err {
                ParseError::FormatFailure { .. } => err,
                other => ParseError::format(other.to_string()),
            })?;
        Ok(FormattedOutput::new(rendered))
    }
}
