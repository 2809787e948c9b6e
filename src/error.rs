//! Error types for the compiler.
//!
//! Every stage entry point returns [`Result`]; there is no shared error
//! flag crossing stage boundaries. All errors are terminal: the driver
//! surfaces the diagnostic and exits nonzero.

use thiserror::Error;

/// Primary error type for the compilation pipeline.
#[derive(Debug, Error)]
pub enum CompileError {
    /// IO error while reading the source or writing the output binary.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A bracket whose matching delimiter does not exist in the source.
    ///
    /// This is the only way lexing can fail; everything that is not a
    /// command character is a comment.
    #[error("No delimiter({expected}) for {bracket}")]
    UnmatchedBracket {
        /// The offending bracket character, `[` or `]`.
        bracket: char,
        /// The delimiter that was never found.
        expected: char,
        /// Byte offset of the offending bracket in the source text.
        offset: usize,
    },
}

/// Result type alias for compiler operations.
pub type Result<T> = std::result::Result<T, CompileError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unmatched_display() {
        let err = CompileError::UnmatchedBracket {
            bracket: '[',
            expected: ']',
            offset: 3,
        };
        assert_eq!(err.to_string(), "No delimiter(]) for [");
    }

    #[test]
    fn test_io_display() {
        let err = CompileError::from(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "gone",
        ));
        assert!(err.to_string().contains("gone"));
    }
}
