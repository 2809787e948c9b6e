//! Leveled diagnostics with source coordinates.
//!
//! Diagnostics are written to stderr as lines of the form
//! `LEVEL: path:line:column: message`. Line and column are 1-based and
//! computed from the source view's current span of interest. Messages
//! without a source view omit the coordinate prefix.

use crate::source::SourceView;
use std::fmt;

/// Diagnostic severity, ordered from most to least severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    /// The compiler cannot continue at all.
    Fatal,
    /// A stage failed; compilation stops.
    Error,
    /// Suspicious but not fatal, e.g. a statically known overflow.
    Warning,
    /// Progress information.
    Info,
    /// Stage internals, e.g. each op as it is lexed.
    Debug,
}

impl Level {
    /// The label used in rendered diagnostic lines.
    pub fn as_str(self) -> &'static str {
        match self {
            Level::Fatal => "FATAL",
            Level::Error => "ERROR",
            Level::Warning => "WARNING",
            Level::Info => "INFO",
            Level::Debug => "DEBUG",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Renders and emits diagnostics up to a configured severity threshold.
#[derive(Debug, Clone)]
pub struct Reporter {
    threshold: Level,
}

impl Reporter {
    /// Create a reporter that emits diagnostics at `threshold` and above.
    pub fn new(threshold: Level) -> Self {
        Self { threshold }
    }

    /// Whether a diagnostic at `level` would be emitted.
    pub fn would_emit(&self, level: Level) -> bool {
        level <= self.threshold
    }

    /// Emit a diagnostic, with coordinates when a source view is given.
    pub fn emit(&self, level: Level, src: Option<&SourceView>, message: &str) {
        if !self.would_emit(level) {
            return;
        }
        let location = src.map(|s| {
            let (line, column) = s.line_column();
            (s.path(), line, column)
        });
        eprintln!("{}", render(level, location, message));
    }

    /// Emit an error diagnostic at the source view's current position.
    pub fn error(&self, src: &SourceView, message: &str) {
        self.emit(Level::Error, Some(src), message);
    }

    /// Emit a warning diagnostic at the source view's current position.
    pub fn warning(&self, src: &SourceView, message: &str) {
        self.emit(Level::Warning, Some(src), message);
    }

    /// Emit an info diagnostic at the source view's current position.
    pub fn info(&self, src: &SourceView, message: &str) {
        self.emit(Level::Info, Some(src), message);
    }

    /// Emit a debug diagnostic at the source view's current position.
    pub fn debug(&self, src: &SourceView, message: &str) {
        self.emit(Level::Debug, Some(src), message);
    }
}

impl Default for Reporter {
    fn default() -> Self {
        Self::new(Level::Warning)
    }
}

/// Render a single diagnostic line.
fn render(level: Level, location: Option<(&str, usize, usize)>, message: &str) -> String {
    match location {
        Some((path, line, column)) => {
            format!("{level}: {path}:{line}:{column}: {message}")
        }
        None => format!("{level}: {message}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_render_with_location() {
        let line = render(Level::Error, Some(("a.bf", 2, 7)), "No delimiter(]) for [");
        assert_eq!(line, "ERROR: a.bf:2:7: No delimiter(]) for [");
    }

    #[test]
    fn test_render_without_location() {
        let line = render(Level::Fatal, None, "File could not be opened: a.bf");
        assert_eq!(line, "FATAL: File could not be opened: a.bf");
    }

    #[test]
    fn test_threshold_ordering() {
        let reporter = Reporter::new(Level::Warning);
        assert!(reporter.would_emit(Level::Fatal));
        assert!(reporter.would_emit(Level::Error));
        assert!(reporter.would_emit(Level::Warning));
        assert!(!reporter.would_emit(Level::Info));
        assert!(!reporter.would_emit(Level::Debug));
    }

    #[test]
    fn test_coordinates_follow_span() {
        let mut src = SourceView::new("b.bf", "+\n[+");
        src.set_span(2, 3);
        let (line, column) = src.line_column();
        assert_eq!(
            render(Level::Warning, Some((src.path(), line, column)), "m"),
            "WARNING: b.bf:2:1: m"
        );
    }
}
