//! Captured payload of an unhandled error.
//!
//! A [`Fault`] is what the control loop holds after an error escaped a view.
//! It keeps the short type name and message of the original error next to
//! the place it was raised. It is built in two ways:
//!
//! - `?` on any `std::error::Error` inside a function returning
//!   `Result<_, Fault>`. The `From` impl is `#[track_caller]`, so the recorded
//!   location is the `?` site.
//! - [`Fault::from_panic`] for unwinding panics caught by the supervisor.
//!
//! `Fault` does not implement `std::error::Error` (the blanket
//! `From` impl would overlap with `From<T> for T`). Wrap it in [`FatalError`]
//! at the process boundary.

use std::any::Any;
use std::backtrace::{Backtrace, BacktraceStatus};
use std::error::Error;
use std::fmt;
use std::panic::Location;

use thiserror::Error as ThisError;

/// `file:line:column` of the place an error was raised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    file: String,
    line: u32,
    column: u32,
}

impl SourceLocation {
    pub fn new(file: impl Into<String>, line: u32, column: u32) -> Self {
        Self {
            file: file.into(),
            line,
            column,
        }
    }

    #[must_use]
    pub fn file(&self) -> &str {
        &self.file
    }

    #[must_use]
    pub fn line(&self) -> u32 {
        self.line
    }

    #[must_use]
    pub fn column(&self) -> u32 {
        self.column
    }
}

impl From<&Location<'_>> for SourceLocation {
    fn from(location: &Location<'_>) -> Self {
        Self::new(location.file(), location.line(), location.column())
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fault {
    kind: String,
    message: String,
    location: Option<SourceLocation>,
    trace: String,
}

impl Fault {
    /// Capture `err` at the caller's location.
    #[track_caller]
    pub fn new<E: Error>(err: E) -> Self {
        Self::capture(&err, short_type_name(std::any::type_name::<E>()))
    }

    #[track_caller]
    fn capture(err: &dyn Error, kind: String) -> Self {
        let location = SourceLocation::from(Location::caller());
        let message = err.to_string();

        let mut trace = format!("{kind}: {message}\n    at {location}");
        let mut source = err.source();
        if source.is_some() {
            trace.push_str("\n\nCaused by:");
        }
        let mut depth = 0;
        while let Some(cause) = source {
            trace.push_str(&format!("\n    {depth}: {cause}"));
            depth += 1;
            source = cause.source();
        }
        append_backtrace(&mut trace, &Backtrace::capture());

        Self {
            kind,
            message,
            location: Some(location),
            trace,
        }
    }

    /// Build a fault from a caught panic payload.
    ///
    /// `location` comes from the panic hook; payloads are usually `&str` or
    /// `String`, anything else is reported as opaque.
    pub fn from_panic(payload: &(dyn Any + Send), location: Option<SourceLocation>) -> Self {
        let message = if let Some(text) = payload.downcast_ref::<&str>() {
            (*text).to_string()
        } else if let Some(text) = payload.downcast_ref::<String>() {
            text.clone()
        } else {
            "Box<dyn Any>".to_string()
        };

        let mut trace = format!("panic: {message}");
        if let Some(location) = &location {
            trace.push_str(&format!("\n    at {location}"));
        }

        Self {
            kind: "panic".to_string(),
            message,
            location,
            trace,
        }
    }

    /// Short type name of the original error (e.g. `ConfigError`, `io::Error`).
    #[must_use]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    pub fn location(&self) -> Option<&SourceLocation> {
        self.location.as_ref()
    }

    #[must_use]
    pub fn line(&self) -> Option<u32> {
        self.location.as_ref().map(SourceLocation::line)
    }

    /// Full formatted trace: headline, location, cause chain, backtrace.
    #[must_use]
    pub fn trace(&self) -> &str {
        &self.trace
    }
}

impl<E> From<E> for Fault
where
    E: Error,
{
    #[track_caller]
    fn from(err: E) -> Self {
        Self::new(err)
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

/// A fault re-raised to the process boundary.
#[derive(Debug, ThisError)]
#[error("{}", .0.trace())]
pub struct FatalError(pub Fault);

fn append_backtrace(trace: &mut String, backtrace: &Backtrace) {
    if backtrace.status() == BacktraceStatus::Captured {
        trace.push_str(&format!("\n\nStack backtrace:\n{backtrace}"));
    }
}

/// `pst_config::store::ConfigError` -> `ConfigError`,
/// `std::io::error::Error` -> `io::Error`.
fn short_type_name(full: &str) -> String {
    let base = full.split('<').next().unwrap_or(full);
    let segments: Vec<&str> = base.split("::").collect();
    match segments.as_slice() {
        [.., module, "error", "Error"] => format!("{module}::Error"),
        [.., last] => (*last).to_string(),
        [] => full.to_string(),
    }
}
