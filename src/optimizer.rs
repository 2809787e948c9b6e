//! Optimizer: prunes no-ops, merges adjacent same-kind ops, and
//! collects facts for the assembly stage.
//!
//! There is little to rewrite at the op level since the instruction set
//! is already so small, but the optimizer also computes information
//! that later stages (or a future constant-folding pass) can use.

use crate::config::{CompilerOptions, OverflowBehavior};
use crate::diag::Reporter;
use crate::op::{Op, OpKind};
use crate::source::SourceView;

/// Facts collected once the op sequence has reached fixpoint.
#[derive(Debug, Clone, Default)]
pub struct OptimizationInfo {
    /// Index of the earliest op whose semantics depend on runtime
    /// input. Everything strictly before it is a pure function of the
    /// source and could be evaluated at compile time. `None` means the
    /// whole program is input-independent.
    pub first_input_op: Option<usize>,
    /// Indices of ops statically known to overflow the configured cell
    /// width.
    pub overflow_ops: Vec<usize>,
}

/// Rewrite the op sequence to fixpoint, then analyze it.
///
/// Each iteration runs one prune pass and one merge pass; the loop
/// repeats while either produced a change. Both passes strictly shrink
/// the sequence, so termination is immediate.
pub fn optimize(
    ops: &mut Vec<Op>,
    src: &mut SourceView,
    options: &CompilerOptions,
    reporter: &Reporter,
) -> OptimizationInfo {
    loop {
        let pruned = prune_pass(ops, src, reporter);
        let merged = merge_pass(ops);
        if pruned == 0 && merged == 0 {
            break;
        }
    }
    analyze(ops, src, options, reporter)
}

fn should_prune(kind: OpKind) -> bool {
    matches!(kind, OpKind::Mutate(0) | OpKind::Move(0))
}

/// Delete ops that equate to NOP, e.g. runs like `<<>>` or `++--`.
///
/// Returns how many ops were pruned.
fn prune_pass(ops: &mut Vec<Op>, src: &mut SourceView, reporter: &Reporter) -> usize {
    let mut pruned = 0;
    let mut idx = 0;
    while idx < ops.len() {
        if should_prune(ops[idx].kind) {
            src.set_span_of(&ops[idx]);
            reporter.warning(
                src,
                &format!(
                    "optimizer: {} sequence evaluates to NOP here.",
                    ops[idx].kind.name()
                ),
            );
            ops.remove(idx);
            pruned += 1;
        } else {
            idx += 1;
        }
    }
    pruned
}

/// Merge adjacent same-kind coalescable ops.
///
/// Such pairs only arise after pruning removed the op that separated
/// them. Brackets are never merged. Returns how many merges happened.
fn merge_pass(ops: &mut Vec<Op>) -> usize {
    let mut merged = 0;
    let mut idx = 0;
    while idx + 1 < ops.len() {
        if let Some(combined) = merge_kinds(ops[idx].kind, ops[idx + 1].kind) {
            ops[idx].kind = combined;
            ops[idx].src_end = ops[idx + 1].src_end;
            ops.remove(idx + 1);
            merged += 1;
            // Stay put: the merged op may fold into the next one too.
        } else {
            idx += 1;
        }
    }
    merged
}

fn merge_kinds(a: OpKind, b: OpKind) -> Option<OpKind> {
    match (a, b) {
        (OpKind::Mutate(x), OpKind::Mutate(y)) => Some(OpKind::Mutate(x.wrapping_add(y))),
        (OpKind::Move(x), OpKind::Move(y)) => Some(OpKind::Move(x.wrapping_add(y))),
        (OpKind::Input(x), OpKind::Input(y)) => Some(OpKind::Input(x.wrapping_add(y))),
        (OpKind::Print(x), OpKind::Print(y)) => Some(OpKind::Print(x.wrapping_add(y))),
        _ => None,
    }
}

/// Non-mutating analysis over the fixpoint sequence.
fn analyze(
    ops: &[Op],
    src: &mut SourceView,
    options: &CompilerOptions,
    reporter: &Reporter,
) -> OptimizationInfo {
    let mut info = OptimizationInfo::default();
    let max = options.max_cell_value();

    for (idx, op) in ops.iter().enumerate() {
        match op.kind {
            OpKind::Input(_) => {
                if info.first_input_op.is_none() {
                    info.first_input_op = Some(idx);
                }
            }
            OpKind::Mutate(n) | OpKind::Move(n) => {
                if i64::from(n) > max || i64::from(n) < -max {
                    src.set_span_of(op);
                    reporter.warning(
                        src,
                        &format!(
                            "optimizer: {} sequence causes overflow({n}).",
                            op.kind.name()
                        ),
                    );
                    if options.overflow == OverflowBehavior::Abort {
                        reporter.warning(
                            src,
                            "optimizer: Regarding above warning, this guarantees \
                             eventual abort due to the configured overflow behavior",
                        );
                    }
                    info.overflow_ops.push(idx);
                }
            }
            _ => {}
        }
    }

    match info.first_input_op {
        Some(idx) => {
            src.set_span_of(&ops[idx]);
            reporter.debug(
                src,
                "optimizer: All code up to here can be evaluated at compile-time.",
            );
        }
        None => {
            reporter.debug(
                src,
                "optimizer: The entire program can be evaluated at compile-time.",
            );
        }
    }

    info
}
