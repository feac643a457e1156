//! Call-site capture
//!
//! A record must name the place the user wrote the logging call, not the
//! facade function that eventually builds it. The macros in this crate
//! capture the location where they are expanded; [`CallerLocation::caller`]
//! does the same for plain function calls through `#[track_caller]`.

use serde::{Deserialize, Serialize};
use std::backtrace::{Backtrace, BacktraceStatus};
use std::borrow::Cow;
use std::fmt;
use std::panic::Location;

pub const UNKNOWN_FILE: &str = "(unknown file)";
pub const UNKNOWN_FUNCTION: &str = "(unknown function)";

/// Frames whose symbol starts with one of these belong to the facility
/// or to the backtrace machinery and are left out of rendered stacks.
const INTERNAL_FRAME_PREFIXES: &[&str] = &[
    "std::backtrace",
    "aelog::core::",
    "aelog::facade::",
];

/// Source location a record is attributed to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallerLocation {
    pub file: Cow<'static, str>,
    pub line: u32,
    pub function: Cow<'static, str>,
}

impl CallerLocation {
    pub fn new(
        file: impl Into<Cow<'static, str>>,
        line: u32,
        function: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self {
            file: file.into(),
            line,
            function: function.into(),
        }
    }

    /// Sentinel used when no location could be recovered
    pub const fn unknown() -> Self {
        Self {
            file: Cow::Borrowed(UNKNOWN_FILE),
            line: 0,
            function: Cow::Borrowed(UNKNOWN_FUNCTION),
        }
    }

    /// Location of whoever called the `#[track_caller]` chain ending here
    ///
    /// File and line are exact; the enclosing function cannot be recovered
    /// this way and is reported as the unknown sentinel.
    #[track_caller]
    pub fn caller() -> Self {
        let location = Location::caller();
        Self::new(location.file(), location.line(), UNKNOWN_FUNCTION)
    }

    /// Build a location from a marker item's type name
    ///
    /// `marker_path` is the `type_name` of a function item declared inside
    /// the calling function, e.g. `app::net::serve::{{closure}}::__aelog_marker`.
    /// The marker segment and any closure segments are stripped and the
    /// last remaining segment is the function name.
    pub fn from_marker(file: &'static str, line: u32, marker_path: &'static str) -> Self {
        let file = if file.is_empty() { UNKNOWN_FILE } else { file };
        Self::new(file, line, function_from_marker(marker_path))
    }

    #[must_use]
    pub fn is_unknown(&self) -> bool {
        self.file == UNKNOWN_FILE && self.line == 0 && self.function == UNKNOWN_FUNCTION
    }
}

impl Default for CallerLocation {
    fn default() -> Self {
        Self::unknown()
    }
}

impl fmt::Display for CallerLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{} in {}", self.file, self.line, self.function)
    }
}

/// `std::any::type_name` of a value, used on the macro marker function
#[doc(hidden)]
pub fn type_name_of<T>(_: T) -> &'static str {
    std::any::type_name::<T>()
}

fn function_from_marker(marker_path: &'static str) -> &'static str {
    let mut path = marker_path;
    if let Some((parent, _marker)) = path.rsplit_once("::") {
        path = parent;
    } else {
        return UNKNOWN_FUNCTION;
    }
    while let Some(parent) = path.strip_suffix("::{{closure}}") {
        path = parent;
    }
    match path.rsplit_once("::") {
        Some((_, name)) if !name.is_empty() => name,
        _ => UNKNOWN_FUNCTION,
    }
}

/// Render the current call stack, most recent frame last
///
/// Returns `None` when the platform cannot capture backtraces.
pub fn stack_text() -> Option<String> {
    let backtrace = Backtrace::force_capture();
    match backtrace.status() {
        BacktraceStatus::Captured => Some(reorder_frames(&backtrace.to_string())),
        _ => None,
    }
}

/// Reverse the frame blocks of a rendered backtrace and drop internal frames
///
/// A frame block starts at a line of the form `  N: symbol` and carries any
/// following `at file:line` lines.
pub(crate) fn reorder_frames(rendered: &str) -> String {
    let mut frames: Vec<Vec<&str>> = Vec::new();
    for line in rendered.lines() {
        let trimmed = line.trim_start();
        let starts_frame = trimmed
            .split_once(": ")
            .map(|(index, _)| !index.is_empty() && index.chars().all(|c| c.is_ascii_digit()))
            .unwrap_or(false);
        if starts_frame || frames.is_empty() {
            frames.push(vec![line]);
        } else if let Some(frame) = frames.last_mut() {
            frame.push(line);
        }
    }

    let mut text = String::new();
    for frame in frames.iter().rev() {
        let symbol = frame[0]
            .trim_start()
            .split_once(": ")
            .map(|(_, symbol)| symbol)
            .unwrap_or("");
        if INTERNAL_FRAME_PREFIXES.iter().any(|p| symbol.starts_with(p)) {
            continue;
        }
        for line in frame {
            text.push_str(line);
            text.push('\n');
        }
    }
    if text.ends_with('\n') {
        text.pop();
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_sentinel() {
        let unknown = CallerLocation::unknown();
        assert_eq!(unknown.file, "(unknown file)");
        assert_eq!(unknown.line, 0);
        assert_eq!(unknown.function, "(unknown function)");
        assert!(unknown.is_unknown());
        assert_eq!(CallerLocation::default(), unknown);
    }

    #[test]
    fn test_track_caller_reports_call_site() {
        let expected_line = line!() + 1;
        let location = CallerLocation::caller();
        assert_eq!(location.file, file!());
        assert_eq!(location.line, expected_line);
        assert_eq!(location.function, UNKNOWN_FUNCTION);
    }

    #[test]
    fn test_function_from_marker() {
        assert_eq!(function_from_marker("app::net::serve::__aelog_marker"), "serve");
        assert_eq!(
            function_from_marker("app::net::serve::{{closure}}::{{closure}}::__aelog_marker"),
            "serve"
        );
        assert_eq!(function_from_marker("__aelog_marker"), UNKNOWN_FUNCTION);
        assert_eq!(function_from_marker("main::__aelog_marker"), UNKNOWN_FUNCTION);
    }

    #[test]
    fn test_marker_inside_function() {
        fn marker() {}
        let location = CallerLocation::from_marker(file!(), 7, type_name_of(marker));
        assert_eq!(location.function, "test_marker_inside_function");
        assert_eq!(location.line, 7);
    }

    #[test]
    fn test_reorder_frames_most_recent_last() {
        let rendered = "   0: std::backtrace::Backtrace::force_capture\n\
                        \x20            at /rustc/library/std/src/backtrace.rs:312:13\n\
                        \x20  1: aelog::core::caller::stack_text\n\
                        \x20  2: app::handler\n\
                        \x20            at ./src/handler.rs:10:5\n\
                        \x20  3: app::main\n\
                        \x20            at ./src/main.rs:3:5\n";

        let text = reorder_frames(rendered);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0].trim(), "3: app::main");
        assert_eq!(lines[2].trim(), "2: app::handler");
        assert!(!text.contains("force_capture"));
        assert!(!text.contains("stack_text"));
        assert!(!text.ends_with('\n'));
    }
}
