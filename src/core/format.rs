//! Line formatting for sinks
//!
//! A template such as
//! `{timestamp} {color}[{level}] {logger} [{function} {line}]: {message}`
//! is compiled once when the configuration is built and rendered per record.
//! `{color}` opens a region painted in the record level's color which runs
//! to the end of the line; it renders nothing when colors are disabled.

use super::error::{LoggerError, Result};
use super::log_entry::LogEntry;
use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};

pub const DEFAULT_TEMPLATE: &str =
    "{timestamp} {color}[{level}] {logger} [{function} {line}]: {message}";
pub const DEFAULT_DATE_FORMAT: &str = "[%Y-%m-%d %H:%M:%S %z]";

/// Named formatter definition as it appears in a configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatterSpec {
    pub template: String,
    /// strftime format for `{timestamp}`, rendered in local time
    pub date_format: String,
    pub colored: bool,
}

impl Default for FormatterSpec {
    fn default() -> Self {
        Self {
            template: DEFAULT_TEMPLATE.to_string(),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            colored: false,
        }
    }
}

impl FormatterSpec {
    #[must_use]
    pub fn colored() -> Self {
        Self {
            colored: true,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Timestamp,
    Level,
    Logger,
    Function,
    Line,
    File,
    Thread,
    Message,
}

impl Field {
    fn parse(name: &str) -> Option<Self> {
        Some(match name {
            "timestamp" => Field::Timestamp,
            "level" => Field::Level,
            "logger" => Field::Logger,
            "function" => Field::Function,
            "line" => Field::Line,
            "file" => Field::File,
            "thread" => Field::Thread,
            "message" => Field::Message,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Field(Field),
    ColorStart,
}

/// Compiled formatter shared by the sinks that reference it
#[derive(Debug, Clone)]
pub struct Formatter {
    segments: Vec<Segment>,
    date_format: String,
    colored: bool,
}

impl Formatter {
    /// Compile a formatter definition
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` for unknown fields or unbalanced braces.
    pub fn compile(spec: &FormatterSpec) -> Result<Self> {
        let component = "formatter";
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = spec.template.chars();

        while let Some(c) = chars.next() {
            match c {
                '{' => {
                    let mut name = String::new();
                    let mut closed = false;
                    for c in chars.by_ref() {
                        if c == '}' {
                            closed = true;
                            break;
                        }
                        name.push(c);
                    }
                    if !closed {
                        return Err(LoggerError::config(
                            component,
                            format!("unclosed '{{' in template '{}'", spec.template),
                        ));
                    }
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    if name == "color" {
                        segments.push(Segment::ColorStart);
                    } else {
                        let field = Field::parse(&name).ok_or_else(|| {
                            LoggerError::config(
                                component,
                                format!("unknown template field '{{{}}}'", name),
                            )
                        })?;
                        segments.push(Segment::Field(field));
                    }
                }
                '}' => {
                    return Err(LoggerError::config(
                        component,
                        format!("unmatched '}}' in template '{}'", spec.template),
                    ));
                }
                other => literal.push(other),
            }
        }
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        if StrftimeItems::new(&spec.date_format).any(|item| matches!(item, Item::Error)) {
            return Err(LoggerError::config(
                component,
                format!("invalid date format '{}'", spec.date_format),
            ));
        }

        Ok(Self {
            segments,
            date_format: spec.date_format.clone(),
            colored: spec.colored,
        })
    }

    /// Render a record; exception context follows on the next lines
    pub fn format(&self, entry: &LogEntry) -> String {
        let mut plain = String::with_capacity(128);
        let mut painted = String::new();
        let mut in_color = false;

        for segment in &self.segments {
            let target = if in_color { &mut painted } else { &mut plain };
            match segment {
                Segment::Literal(text) => target.push_str(text),
                Segment::Field(field) => self.push_field(target, *field, entry),
                Segment::ColorStart => in_color = true,
            }
        }

        if !painted.is_empty() {
            if self.colored {
                plain.push_str(&entry.level.paint(&painted));
            } else {
                plain.push_str(&painted);
            }
        }

        if let Some(ref exception) = entry.exception {
            plain.push('\n');
            plain.push_str(&exception.to_string());
        }
        plain
    }

    fn push_field(&self, out: &mut String, field: Field, entry: &LogEntry) {
        use std::fmt::Write;
        match field {
            Field::Timestamp => {
                let _ = write!(out, "{}", entry.timestamp.format(&self.date_format));
            }
            Field::Level => out.push_str(entry.level.to_str()),
            Field::Logger => out.push_str(&entry.logger),
            Field::Function => out.push_str(&entry.location.function),
            Field::Line => {
                let _ = write!(out, "{}", entry.location.line);
            }
            Field::File => out.push_str(&entry.location.file),
            Field::Thread => out.push_str(entry.thread_label()),
            Field::Message => out.push_str(&entry.message),
        }
    }
}

impl Default for Formatter {
    fn default() -> Self {
        // The default template is known to compile
        Self::compile(&FormatterSpec::default()).unwrap_or(Self {
            segments: vec![Segment::Field(Field::Message)],
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            colored: false,
        })
    }
}
