//! bfc: an ahead-of-time Brainfuck compiler for x86-64 Linux.
//!
//! Translates Brainfuck source text into a freestanding flat blob of
//! x86-64 machine code that talks to the kernel through raw `read`,
//! `write`, and `exit` syscalls, with the process stack as the cell
//! tape. No runtime is linked; the entry point is byte 0 of the blob.
//!
//! # Pipeline
//!
//! ```text
//! source text → [lexer] → ops → [optimizer] → ops + info → [assembler] → code
//! ```
//!
//! - The **lexer** folds runs of identical commands into single ops and
//!   matches every bracket.
//! - The **optimizer** prunes ops that cancel to nothing, merges runs
//!   that became adjacent, and records facts such as the first
//!   input-dependent op.
//! - The **assembler** emits machine code in two passes, choosing the
//!   short or near branch form per bracket pair.
//!
//! # Quick start
//!
//! ```rust
//! use bfc::{compile_source, CompilerOptions, Reporter};
//!
//! let options = CompilerOptions::default();
//! let reporter = Reporter::default();
//! let compilation = compile_source("hello.bf", "++.", &options, &reporter)?;
//! assert!(!compilation.assembly.code.is_empty());
//! # Ok::<(), bfc::CompileError>(())
//! ```
//!
//! # Output format
//!
//! The blob is a 7-byte prologue reserving the tape, the concatenated
//! per-op code, and a 10-byte `exit(0)` epilogue. It is not wrapped in
//! an ELF header; wrap it with an external loader to execute it.

#![warn(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::similar_names)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]

pub mod asm;
pub mod buffer;
pub mod config;
pub mod diag;
pub mod error;
pub mod lexer;
pub mod listing;
pub mod op;
pub mod optimizer;
pub mod source;

pub use asm::{Assembler, Assembly};
pub use buffer::CodeBuf;
pub use config::{CompilerOptions, OverflowBehavior};
pub use diag::{Level, Reporter};
pub use error::{CompileError, Result};
pub use listing::{HumanFormatter, JsonFormatter, OpFormatter};
pub use op::{Op, OpKind};
pub use optimizer::OptimizationInfo;
pub use source::SourceView;

use std::path::Path;

/// Everything one compilation produced.
#[derive(Debug, Clone)]
pub struct Compilation {
    /// The source view, for rendering diagnostics or listings later.
    pub source: SourceView,
    /// The optimized op sequence with filled code buffers.
    pub ops: Vec<Op>,
    /// Facts the optimizer collected.
    pub info: OptimizationInfo,
    /// The assembled code blob.
    pub assembly: Assembly,
}

/// Compile in-memory source text.
///
/// `path` is used only for diagnostics. Stages run in order and
/// short-circuit on the first failure; the failing stage has already
/// emitted its diagnostic through `reporter`.
///
/// # Errors
///
/// Returns [`CompileError::UnmatchedBracket`] if a bracket has no
/// matching delimiter.
pub fn compile_source(
    path: impl Into<String>,
    text: impl Into<Vec<u8>>,
    options: &CompilerOptions,
    reporter: &Reporter,
) -> Result<Compilation> {
    compile_view(SourceView::new(path, text), options, reporter)
}

/// Compile a source file.
///
/// # Errors
///
/// Returns [`CompileError::Io`] if the file cannot be read, or any
/// error [`compile_source`] can return.
pub fn compile_file(
    path: &Path,
    options: &CompilerOptions,
    reporter: &Reporter,
) -> Result<Compilation> {
    let src = match SourceView::from_path(path) {
        Ok(src) => src,
        Err(err) => {
            reporter.emit(
                Level::Error,
                None,
                &format!("File could not be opened: {}", path.display()),
            );
            return Err(err);
        }
    };
    compile_view(src, options, reporter)
}

/// Run the pipeline over a constructed source view.
fn compile_view(
    mut src: SourceView,
    options: &CompilerOptions,
    reporter: &Reporter,
) -> Result<Compilation> {
    let mut ops = lexer::lex(&mut src, reporter)?;
    let info = optimizer::optimize(&mut ops, &mut src, options, reporter);
    let assembly = Assembler::new(options, &info).assemble(&mut ops);
    Ok(Compilation {
        source: src,
        ops,
        info,
        assembly,
    })
}

/// Get version information for this crate.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn compile(text: &str) -> Result<Compilation> {
        compile_source(
            "test.bf",
            text,
            &CompilerOptions::default(),
            &Reporter::new(Level::Error),
        )
    }

    const PROLOGUE: [u8; 7] = [0x48, 0x81, 0xC4, 0xD0, 0x8A, 0xFF, 0xFF];
    const EXIT: [u8; 10] = [0xB8, 0x3C, 0x00, 0x00, 0x00, 0x48, 0x31, 0xFF, 0x0F, 0x05];

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }

    #[test]
    fn test_empty_input_yields_prologue_plus_exit() {
        let compilation = compile("").unwrap();
        assert_eq!(compilation.ops, vec![]);
        assert_eq!(compilation.assembly.code.len(), 17);
        assert_eq!(&compilation.assembly.code[..7], &PROLOGUE);
        assert_eq!(&compilation.assembly.code[7..], &EXIT);
    }

    #[test]
    fn test_single_increment() {
        let compilation = compile("+").unwrap();
        assert_eq!(
            &compilation.assembly.code[7..11],
            &[0x80, 0x04, 0x24, 0x01]
        );
        assert_eq!(&compilation.assembly.code[11..], &EXIT);
    }

    #[test]
    fn test_net_increment_equals_single() {
        let single = compile("+").unwrap();
        let folded = compile("++-").unwrap();
        assert_eq!(single.assembly.code, folded.assembly.code);
    }

    #[test]
    fn test_cancelling_input_compiles_to_nothing() {
        let compilation = compile("+-").unwrap();
        assert_eq!(compilation.ops, vec![]);
        assert_eq!(compilation.assembly.code.len(), 17);
    }

    #[test]
    fn test_zero_cell_idiom_end_to_end() {
        let compilation = compile("[-]").unwrap();
        let code = &compilation.assembly.code[7..];
        assert_eq!(
            &code[..18],
            &[
                0x8A, 0x04, 0x24, 0x84, 0xC0, 0x74, 0x0B, // [
                0x80, 0x04, 0x24, 0xFF, // -
                0x8A, 0x04, 0x24, 0x84, 0xC0, 0x75, 0xF5, // ]
            ]
        );
        assert_eq!(&code[18..], &EXIT);
    }

    #[test]
    fn test_nested_loops_end_to_end() {
        let compilation = compile("[[+]]").unwrap();
        let kinds: Vec<OpKind> = compilation.ops.iter().map(|op| op.kind).collect();
        assert_eq!(
            kinds,
            vec![
                OpKind::IfZero(4),
                OpKind::IfZero(2),
                OpKind::Mutate(1),
                OpKind::IfNotZero(-2),
                OpKind::IfNotZero(-4),
            ]
        );
        // Both pairs fit the short form.
        for op in &compilation.ops {
            assert_eq!(op.code.len(), if op.kind.is_branch() { 7 } else { 4 });
        }
    }

    #[test]
    fn test_unmatched_bracket_fails() {
        let err = compile("[").unwrap_err();
        assert_eq!(err.to_string(), "No delimiter(]) for [");
    }

    #[test]
    fn test_missing_file_fails_with_io_error() {
        let err = compile_file(
            Path::new("/definitely/not/here.bf"),
            &CompilerOptions::default(),
            &Reporter::new(Level::Fatal),
        )
        .unwrap_err();
        assert!(matches!(err, CompileError::Io(_)));
    }

    #[test]
    fn test_compile_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("program.bf");
        std::fs::write(&path, "+[-].").unwrap();
        let compilation = compile_file(
            &path,
            &CompilerOptions::default(),
            &Reporter::new(Level::Error),
        )
        .unwrap();
        let in_memory = compile("+[-].").unwrap();
        assert_eq!(compilation.assembly.code, in_memory.assembly.code);
    }

    #[test]
    fn test_every_op_has_code_after_compilation() {
        let compilation = compile("+[>,.<-]").unwrap();
        for op in &compilation.ops {
            assert!(!op.code.is_empty());
        }
    }
}
