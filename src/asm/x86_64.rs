//! x86-64 code generation with two-pass branch resolution.
//!
//! The generated program uses `rsp` as the data pointer and the process
//! stack as the cell tape. The tape grows downward in memory: `>`
//! decrements `rsp`, `<` increments it, and cell 0 lives at `[rsp]`.
//! Only single-byte cells are emitted; wider cell configurations affect
//! analysis but not code generation.
//!
//! Pass 1 emits straight-line code for every non-branch op, so every
//! size is known except the brackets' own. Pass 2 resolves bracket
//! pairs innermost-first and picks the short (8-bit) or near (32-bit)
//! displacement form per pair. Displacements are measured from the end
//! of the branch instruction, so each one is biased by the bracket's
//! own size.

use crate::asm::Assembly;
use crate::buffer::CodeBuf;
use crate::config::CompilerOptions;
use crate::op::{Op, OpKind};
use crate::optimizer::OptimizationInfo;

/// Instruction templates for the generated code.
pub mod encoding {
    /// `add byte [rsp], imm8` (opcode, modrm, sib; imm follows).
    pub const ADD_BYTE_AT_RSP: [u8; 3] = [0x80, 0x04, 0x24];

    /// `add rsp, imm32` (REX.W + 81 /0; imm follows little-endian).
    pub const ADD_RSP_IMM32: [u8; 3] = [0x48, 0x81, 0xC4];

    /// `mov al, [rsp]` + `test al, al`, the shared prefix of both branch
    /// forms.
    pub const TEST_CELL: [u8; 5] = [0x8A, 0x04, 0x24, 0x84, 0xC0];

    /// `jz rel8`.
    pub const JZ_SHORT: u8 = 0x74;
    /// `jnz rel8`.
    pub const JNZ_SHORT: u8 = 0x75;
    /// `jz rel32`.
    pub const JZ_NEAR: [u8; 2] = [0x0F, 0x84];
    /// `jnz rel32`.
    pub const JNZ_NEAR: [u8; 2] = [0x0F, 0x85];

    /// `read(0, rsp, 1)`:
    /// `xor rax, rax; xor rdi, rdi; mov rsi, rsp; mov rdx, 1; syscall`.
    pub const READ_SYSCALL: [u8; 16] = [
        0x48, 0x31, 0xC0, // xor rax, rax
        0x48, 0x31, 0xFF, // xor rdi, rdi
        0x48, 0x89, 0xE6, // mov rsi, rsp
        0xBA, 0x01, 0x00, 0x00, 0x00, // mov rdx, 1
        0x0F, 0x05, // syscall
    ];

    /// `write(1, rsp, 1)`:
    /// `mov rax, 1; mov rdi, 1; mov rsi, rsp; mov rdx, 1; syscall`.
    pub const WRITE_SYSCALL: [u8; 20] = [
        0xB8, 0x01, 0x00, 0x00, 0x00, // mov rax, 1
        0xBF, 0x01, 0x00, 0x00, 0x00, // mov rdi, 1
        0x48, 0x89, 0xE6, // mov rsi, rsp
        0xBA, 0x01, 0x00, 0x00, 0x00, // mov rdx, 1
        0x0F, 0x05, // syscall
    ];

    /// `exit(0)`: `mov rax, 60; xor rdi, rdi; syscall`.
    pub const EXIT_SUCCESS: [u8; 10] = [
        0xB8, 0x3C, 0x00, 0x00, 0x00, // mov rax, 60
        0x48, 0x31, 0xFF, // xor rdi, rdi
        0x0F, 0x05, // syscall
    ];

    /// Bytes in the tape-reserving prologue (`add rsp, imm32`).
    pub const PROLOGUE_SIZE: usize = ADD_RSP_IMM32.len() + 4;

    /// Bytes in the short branch form: test prefix + `74/75 ib`.
    pub const BRANCH_SHORT_SIZE: usize = TEST_CELL.len() + 2;

    /// Bytes in the near branch form: test prefix + `0F 84/85 id`.
    pub const BRANCH_NEAR_SIZE: usize = TEST_CELL.len() + 6;
}

/// x86-64 assembler over an optimized op sequence.
#[derive(Debug)]
pub struct Assembler<'a> {
    options: &'a CompilerOptions,
    info: &'a OptimizationInfo,
}

impl<'a> Assembler<'a> {
    /// Create an assembler for one compilation.
    pub fn new(options: &'a CompilerOptions, info: &'a OptimizationInfo) -> Self {
        Self { options, info }
    }

    /// Assemble the sequence into a flat code blob.
    ///
    /// Fills every op's code buffer in place, then concatenates
    /// prologue, op code in sequence order, and the exit template. The
    /// assembler does not validate the sequence; bracket matching is
    /// guaranteed by the lexer.
    pub fn assemble(&self, ops: &mut [Op]) -> Assembly {
        emit_straight_line(ops);
        resolve_branches(ops);

        let op_bytes: usize = ops.iter().map(|op| op.code.len()).sum();
        let mut blob = CodeBuf::new();
        blob.extend(&encoding::ADD_RSP_IMM32);
        blob.write_i32_le(-(self.options.tape_cells as i32));
        debug_assert_eq!(blob.len(), encoding::PROLOGUE_SIZE);
        for op in ops.iter() {
            blob.extend(op.code.as_slice());
        }
        blob.extend(&encoding::EXIT_SUCCESS);
        debug_assert_eq!(
            blob.len(),
            encoding::PROLOGUE_SIZE + op_bytes + encoding::EXIT_SUCCESS.len()
        );

        let first_input_offset = self.info.first_input_op.map(|idx| {
            encoding::PROLOGUE_SIZE
                + ops[..idx].iter().map(|op| op.code.len()).sum::<usize>()
        });

        Assembly {
            code: blob.into_vec(),
            first_input_offset,
        }
    }
}

/// Pass 1: emit code for every op whose size is position-independent.
///
/// Brackets are left empty; their size depends on the branch form
/// selected in pass 2.
fn emit_straight_line(ops: &mut [Op]) {
    for op in ops.iter_mut() {
        match op.kind {
            OpKind::Mutate(n) => {
                op.code.extend(&encoding::ADD_BYTE_AT_RSP);
                op.code.push(n as u8);
            }
            OpKind::Move(n) => {
                // `>` advances the tape, which grows downward.
                op.code.extend(&encoding::ADD_RSP_IMM32);
                op.code.write_i32_le(n.wrapping_neg());
            }
            OpKind::Input(count) => {
                for _ in 0..count {
                    op.code.extend(&encoding::READ_SYSCALL);
                }
            }
            OpKind::Print(count) => {
                for _ in 0..count {
                    op.code.extend(&encoding::WRITE_SYSCALL);
                }
            }
            OpKind::IfZero(_) | OpKind::IfNotZero(_) => {}
        }
    }
}

/// Pass 2: resolve every bracket pair, innermost-first.
///
/// A single walk with a stack of open `[` indices reaches each `]`
/// only after every pair nested inside it has been resolved, so the
/// sizes summed between the two brackets are final. Each bracket's
/// buffer is written exactly once.
fn resolve_branches(ops: &mut [Op]) {
    let mut open: Vec<usize> = Vec::new();
    for idx in 0..ops.len() {
        match ops[idx].kind {
            OpKind::IfZero(_) => open.push(idx),
            OpKind::IfNotZero(_) => {
                let start = open.pop().expect("brackets are matched by the lexer");
                let between: usize = ops[start + 1..idx].iter().map(|op| op.code.len()).sum();

                // The displacement spans everything between the pair
                // plus the target bracket itself.
                let short_span = between + encoding::BRANCH_SHORT_SIZE;
                if short_span < 128 {
                    write_short(&mut ops[start].code, encoding::JZ_SHORT, short_span as i8);
                    write_short(&mut ops[idx].code, encoding::JNZ_SHORT, -(short_span as i8));
                } else {
                    let near_span = (between + encoding::BRANCH_NEAR_SIZE) as i32;
                    write_near(&mut ops[start].code, encoding::JZ_NEAR, near_span);
                    write_near(&mut ops[idx].code, encoding::JNZ_NEAR, -near_span);
                }
            }
            _ => {}
        }
    }
    debug_assert!(open.is_empty(), "unclosed bracket reached the assembler");
}

fn write_short(code: &mut CodeBuf, opcode: u8, displacement: i8) {
    code.extend(&encoding::TEST_CELL);
    code.push(opcode);
    code.push(displacement as u8);
}

fn write_near(code: &mut CodeBuf, opcode: [u8; 2], displacement: i32) {
    code.extend(&encoding::TEST_CELL);
    code.extend(&opcode);
    code.write_i32_le(displacement);
}
