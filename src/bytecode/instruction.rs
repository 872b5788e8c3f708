use std::rc::Rc;

use crate::{
    bytecode::blob::Blob,
    intern::{Interner, Symbol},
};

/// One bytecode instruction.
///
/// The operand kind is carried by the variant: jump targets and argument
/// counts are absolute integers, variable accesses carry an interned symbol,
/// and `PushFunction` embeds the compiled body of a lambda directly.
#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
    /// Never emitted by the compiler; dispatching it is a fatal error.
    Invalid,
    /// Pushes a nil value.
    PushNil,
    /// Pushes the value bound to the symbol in the current scope chain.
    PushVariable(Symbol),
    /// Pushes an integer literal.
    PushInteger(i64),
    /// Pushes a function closing over the current environment.
    PushFunction(Rc<Blob>),
    /// Declares a variable from the value on top of the stack; the value is
    /// inspected, not popped.
    DeclareVariable(Symbol),
    /// Pushes a new environment frame.
    BlockStart,
    /// Pops the top environment frame.
    BlockEnd,
    /// Jumps to the absolute target when the popped condition is falsy.
    If(usize),
    /// Unconditional jump to the absolute target.
    Else(usize),
    /// Drops the value on top of the stack.
    Pop,
    /// Calls the function on top of the stack with the given argument count.
    Call(usize),
    /// Reserved for frame-eliding calls; dispatching it is a fatal error.
    TailCall(usize),
    /// Prints the value on top of the stack without popping it.
    DebugPrint,
}

impl Instruction {
    /// Returns the mnemonic used in bytecode dumps and traces.
    pub fn name(&self) -> &'static str {
        match self {
            Instruction::Invalid => "INVALID",
            Instruction::PushNil => "PUSH_NIL",
            Instruction::PushVariable(_) => "PUSH_VARIABLE",
            Instruction::PushInteger(_) => "PUSH_INTEGER",
            Instruction::PushFunction(_) => "PUSH_FUNCTION",
            Instruction::DeclareVariable(_) => "DECLARE_VARIABLE",
            Instruction::BlockStart => "BLOCK_START",
            Instruction::BlockEnd => "BLOCK_END",
            Instruction::If(_) => "IF",
            Instruction::Else(_) => "ELSE",
            Instruction::Pop => "POP",
            Instruction::Call(_) => "CALL",
            Instruction::TailCall(_) => "TAILCALL",
            Instruction::DebugPrint => "DEBUG_PRINT",
        }
    }

    /// Renders the instruction with its operand resolved through the
    /// interner, as one line of a bytecode dump.
    pub fn describe(&self, names: &Interner) -> String {
        match self {
            Instruction::PushInteger(value) => format!("{:<18}{}", self.name(), value),
            Instruction::If(target) | Instruction::Else(target) => {
                format!("{:<18}{}", self.name(), target)
            }
            Instruction::Call(argc) | Instruction::TailCall(argc) => {
                format!("{:<18}{}", self.name(), argc)
            }
            Instruction::PushVariable(name) | Instruction::DeclareVariable(name) => {
                format!("{:<18}{}", self.name(), names.resolve(*name))
            }
            Instruction::PushFunction(blob) => {
                let mut out = format!("{:<18}:", self.name());
                for &param in &blob.params {
                    out.push(' ');
                    out.push_str(names.resolve(param));
                }
                out
            }
            _ => self.name().to_string(),
        }
    }
}
