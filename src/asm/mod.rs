//! Machine-code generation.
//!
//! The only backend is x86-64 System V on Linux; other targets would
//! slot in as sibling modules. Backends fill each op's code buffer in
//! place and concatenate the buffers into a flat blob whose entry point
//! is byte 0, with no ELF wrapping, no relocations, no runtime.

pub mod x86_64;

pub use x86_64::Assembler;

/// The output of a backend.
#[derive(Debug, Clone)]
pub struct Assembly {
    /// Raw code segment; the entry point is byte 0.
    pub code: Vec<u8>,
    /// Byte offset where input-dependent code begins, if the program
    /// reads input at all. Everything before this offset is a pure
    /// function of the source text and could be evaluated at compile
    /// time by a future constant-folding pass.
    pub first_input_offset: Option<usize>,
}
