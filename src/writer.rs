use std::borrow::Cow;
use std::io::{self, Write};

use bitflags::bitflags;

use crate::attribute::Attribute;
use crate::error::{Error, Result};

bitflags! {
    /// Output format flags
    pub struct Format: u32 {
        /// Write the label as the first column of each item
        const LABEL = 0x01;
        /// Escape `\` and `:` in attribute names
        const ESCAPE = 0x02;
        /// Leave out attributes that expanded to an empty string
        const SKIP_EMPTY = 0x04;
    }
}

impl Default for Format {
    fn default() -> Self {
        Format::all()
    }
}

/// Options controlling how expanded attributes are written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputOptions {
    separator: String,
    format: Format,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            separator: "\t".to_string(),
            format: Format::default(),
        }
    }
}

impl OutputOptions {
    /// Column separator, a tab by default
    pub fn separator(&self) -> &str {
        &self.separator
    }

    pub fn set_separator(&mut self, separator: &str) -> Result<()> {
        if separator.is_empty() {
            return Err(Error::invalid_parameter("separator must not be empty"));
        }
        if separator.contains(['\n', '\r']) {
            return Err(Error::invalid_parameter(
                "separator must not contain a line break",
            ));
        }
        self.separator = separator.to_string();
        Ok(())
    }

    pub fn format(&self) -> Format {
        self.format
    }

    pub fn set_format(&mut self, format: Format) {
        self.format = format;
    }

    /// Enable or disable a single format flag
    pub fn set_flag(&mut self, flag: Format, enabled: bool) {
        self.format.set(flag, enabled);
    }
}

/// Escape an attribute name for the CRFsuite data format.
///
/// CRFsuite reads `name:value`, so a colon inside a name must be written as
/// `\:` and a backslash as `\\`.
pub fn escape(name: &str) -> Cow<'_, str> {
    if !name.contains(['\\', ':']) {
        return Cow::Borrowed(name);
    }
    let mut escaped = String::with_capacity(name.len() + 4);
    for c in name.chars() {
        if c == '\\' || c == ':' {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    Cow::Owned(escaped)
}

/// Writes items in the CRFsuite data format.
///
/// Every item is one line holding the label and its attributes; a blank line
/// ends a sequence.
#[derive(Debug)]
pub struct SuiteWriter<W: Write> {
    inner: W,
    options: OutputOptions,
}

impl<W: Write> SuiteWriter<W> {
    pub fn new(inner: W, options: OutputOptions) -> Self {
        Self { inner, options }
    }

    /// Write one item line
    pub fn write_item(&mut self, label: &str, attrs: &[Attribute]) -> io::Result<()> {
        let format = self.options.format;
        let mut first = true;
        if format.contains(Format::LABEL) {
            self.inner.write_all(label.as_bytes())?;
            first = false;
        }
        for attr in attrs {
            if !first {
                self.inner.write_all(self.options.separator.as_bytes())?;
            }
            first = false;
            if format.contains(Format::ESCAPE) {
                self.inner.write_all(escape(&attr.name).as_bytes())?;
            } else {
                self.inner.write_all(attr.name.as_bytes())?;
            }
        }
        self.inner.write_all(b"\n")
    }

    /// Terminate the current sequence
    pub fn end_sequence(&mut self) -> io::Result<()> {
        self.inner.write_all(b"\n")
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}
