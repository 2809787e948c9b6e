//! Renderers for the op sequence.
//!
//! Useful for inspecting what the optimizer kept and what the
//! assembler emitted for it. The human format is a fixed-width listing;
//! the JSON format is stable enough to feed other tooling.

use crate::op::{Op, OpKind};
use serde::Serialize;

/// Trait for rendering an op sequence.
pub trait OpFormatter {
    /// Render the whole sequence to a string.
    fn render(&self, ops: &[Op]) -> String;
}

/// One op as it appears in a dump.
#[derive(Debug, Serialize)]
struct OpRecord {
    index: usize,
    kind: OpKind,
    src_start: usize,
    src_end: usize,
    /// Emitted machine code, hex-encoded; empty before assembly.
    code: String,
}

impl OpRecord {
    fn new(index: usize, op: &Op) -> Self {
        Self {
            index,
            kind: op.kind,
            src_start: op.src_start,
            src_end: op.src_end,
            code: hex::encode(op.code.as_slice()),
        }
    }
}

/// Human-readable fixed-width listing.
#[derive(Debug, Clone, Copy, Default)]
pub struct HumanFormatter;

impl OpFormatter for HumanFormatter {
    fn render(&self, ops: &[Op]) -> String {
        let mut out = String::new();
        for (index, op) in ops.iter().enumerate() {
            let code = if op.code.is_empty() {
                "-".to_string()
            } else {
                hex::encode(op.code.as_slice())
            };
            out.push_str(&format!(
                "{index:>4}  {:<12} {:>4}..{:<4} {code}\n",
                op.kind.to_string(),
                op.src_start,
                op.src_end,
            ));
        }
        out
    }
}

/// JSON dump of the sequence.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFormatter;

impl OpFormatter for JsonFormatter {
    fn render(&self, ops: &[Op]) -> String {
        let records: Vec<OpRecord> = ops
            .iter()
            .enumerate()
            .map(|(index, op)| OpRecord::new(index, op))
            .collect();
        // Plain structs of primitives; serialization cannot fail.
        serde_json::to_string_pretty(&records).expect("op records serialize to JSON")
    }
}
