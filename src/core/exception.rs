//! Captured error context attached by the exception form

use super::caller::{stack_text, CallerLocation};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExceptionInfo {
    /// Fully qualified type name of the error value
    pub type_name: String,
    /// `Display` rendering of the error
    pub message: String,
    /// `Display` rendering of each `source()` in the chain, outermost first
    pub causes: Vec<String>,
    /// Stack at capture time, most recent frame last
    pub trace: String,
}

impl ExceptionInfo {
    /// Capture an error value together with the current stack
    ///
    /// When the stack cannot be captured the trace names `location` so the
    /// record always carries some trace text.
    pub fn capture<E>(error: &E, location: &CallerLocation) -> Self
    where
        E: Error + ?Sized + 'static,
    {
        let mut causes = Vec::new();
        let mut source = error.source();
        while let Some(cause) = source {
            causes.push(cause.to_string());
            source = cause.source();
        }

        let trace = stack_text()
            .filter(|text| !text.trim().is_empty())
            .unwrap_or_else(|| format!("  at {}", location));

        Self {
            type_name: std::any::type_name::<E>().to_string(),
            message: error.to_string(),
            causes,
            trace,
        }
    }
}

impl fmt::Display for ExceptionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.type_name, self.message)?;
        for cause in &self.causes {
            write!(f, "\nCaused by: {}", cause)?;
        }
        write!(f, "\nStack (most recent call last):\n{}", self.trace)
    }
}
