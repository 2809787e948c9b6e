//! Lexer: folds the Brainfuck character stream into a coalesced op
//! sequence while matching every bracket.
//!
//! Runs of `+`/`-`, `>`/`<`, `,` and `.` accumulate into single ops;
//! comment bytes are consumed silently and never terminate a run.
//! Each bracket yields exactly one op and is validated to have a
//! matching delimiter before lexing continues.

use crate::diag::Reporter;
use crate::error::{CompileError, Result};
use crate::op::{classify, CharClass, Op, OpKind};
use crate::source::SourceView;

/// Lex the whole source into an op sequence.
///
/// Returns an error if any bracket has no matching delimiter; the
/// diagnostic has already been emitted at the offending bracket.
pub fn lex(src: &mut SourceView, reporter: &Reporter) -> Result<Vec<Op>> {
    let mut ops = Vec::new();
    let mut cursor = 0;
    while cursor < src.len() {
        let Some(op) = lex_one(src, &mut cursor, reporter)? else {
            break; // only comments remained
        };
        if reporter.would_emit(crate::diag::Level::Debug) {
            src.set_span_of(&op);
            reporter.debug(
                src,
                &format!(
                    "lexer: Op{{kind={}, n={}, start={}, end={}}}",
                    op.kind.name(),
                    op.kind.n(),
                    op.src_start,
                    op.src_end
                ),
            );
        }
        ops.push(op);
    }
    Ok(ops)
}

/// Lex one op starting at `cursor`, which is left one past the last
/// consumed character.
///
/// Returns `Ok(None)` when only comment bytes remain.
fn lex_one(src: &mut SourceView, cursor: &mut usize, reporter: &Reporter) -> Result<Option<Op>> {
    let mut kind: Option<OpKind> = None;
    let mut start = *cursor;
    let mut end = *cursor;

    while let Some(byte) = src.byte(*cursor) {
        let class = classify(byte);
        if class == CharClass::Skip {
            *cursor += 1;
            continue;
        }

        match kind {
            None => {
                start = *cursor;
                if let Some(seeded) = seed(class, byte) {
                    kind = Some(seeded);
                    *cursor += 1;
                    end = *cursor;
                } else {
                    // A bracket: one op on its own, never coalesced.
                    let n = find_delimiter(src, *cursor, byte, reporter)?;
                    kind = Some(match class {
                        CharClass::IfZero => OpKind::IfZero(n),
                        _ => OpKind::IfNotZero(n),
                    });
                    *cursor += 1;
                    end = *cursor;
                    break;
                }
            }
            Some(current) => match accumulate(current, class, byte) {
                Some(updated) => {
                    kind = Some(updated);
                    *cursor += 1;
                    end = *cursor;
                }
                // A different kind terminates the run; the character is
                // left for the next op.
                None => break,
            },
        }
    }

    Ok(kind.map(|kind| Op::new(kind, start, end)))
}

/// The op a command character starts. `None` for brackets.
fn seed(class: CharClass, byte: u8) -> Option<OpKind> {
    match class {
        CharClass::Mutate => Some(OpKind::Mutate(if byte == b'+' { 1 } else { -1 })),
        CharClass::Move => Some(OpKind::Move(if byte == b'>' { 1 } else { -1 })),
        CharClass::Input => Some(OpKind::Input(1)),
        CharClass::Print => Some(OpKind::Print(1)),
        _ => None,
    }
}

/// Fold one more character into a run, or `None` if the character is of
/// a different kind and the run is over.
fn accumulate(kind: OpKind, class: CharClass, byte: u8) -> Option<OpKind> {
    match (kind, class) {
        (OpKind::Mutate(n), CharClass::Mutate) => {
            Some(OpKind::Mutate(n.wrapping_add(if byte == b'+' { 1 } else { -1 })))
        }
        (OpKind::Move(n), CharClass::Move) => {
            Some(OpKind::Move(n.wrapping_add(if byte == b'>' { 1 } else { -1 })))
        }
        (OpKind::Input(n), CharClass::Input) => Some(OpKind::Input(n.wrapping_add(1))),
        (OpKind::Print(n), CharClass::Print) => Some(OpKind::Print(n.wrapping_add(1))),
        _ => None,
    }
}

/// Scan outward from the bracket at `at` for its matching delimiter.
///
/// Returns the signed distance walked in non-comment characters, the
/// match itself included: positive for `[`, negative for `]`. Nested
/// same-kind brackets raise the depth; the scan succeeds when depth
/// returns to zero.
fn find_delimiter(
    src: &mut SourceView,
    at: usize,
    bracket: u8,
    reporter: &Reporter,
) -> Result<i32> {
    let forward = bracket == b'[';
    let delimiter = if forward { b']' } else { b'[' };
    let step: isize = if forward { 1 } else { -1 };
    let delta: i32 = if forward { 1 } else { -1 };

    let mut depth = 1i32;
    let mut n = 0i32;
    let mut j = at as isize + step;
    while j >= 0 {
        let Some(byte) = src.byte(j as usize) else {
            break;
        };
        n += delta;
        if byte == bracket {
            depth += 1;
        } else if byte == delimiter {
            depth -= 1;
            if depth == 0 {
                return Ok(n);
            }
        } else if classify(byte) == CharClass::Skip {
            // Comment bytes do not count toward the distance.
            n -= delta;
        }
        j += step;
    }

    src.set_cursor(at);
    reporter.error(
        src,
        &format!(
            "No delimiter({}) for {}",
            delimiter as char, bracket as char
        ),
    );
    Err(CompileError::UnmatchedBracket {
        bracket: bracket as char,
        expected: delimiter as char,
        offset: at,
    })
}
