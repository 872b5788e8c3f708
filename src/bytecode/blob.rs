use std::fmt::Write;

use crate::{
    bytecode::instruction::Instruction,
    intern::{Interner, Symbol},
};

/// Compiled bytecode for one function body (or the top-level program).
///
/// A blob is immutable once compilation finishes and is shared via `Rc`:
/// every function instantiated from the same lambda points at the same blob.
/// Blobs are never garbage collected.
#[derive(Debug, Clone, PartialEq)]
pub struct Blob {
    /// Parameter names, in declaration order. Empty for the top level.
    pub params: Vec<Symbol>,
    pub instructions: Vec<Instruction>,
}

impl Blob {
    pub fn new(params: Vec<Symbol>) -> Self {
        Self {
            params,
            instructions: Vec::new(),
        }
    }

    /// Renders a textual dump: a parameter header line followed by one
    /// indexed line per instruction.
    pub fn disassemble(&self, names: &Interner) -> String {
        let mut out = String::new();
        let _ = write!(out, "nargs = {}", self.params.len());
        for &param in &self.params {
            let _ = write!(out, " {}", names.resolve(param));
        }
        out.push('\n');
        for (i, instruction) in self.instructions.iter().enumerate() {
            let _ = writeln!(out, "{:<7}{}", i, instruction.describe(names));
        }
        out
    }
}
