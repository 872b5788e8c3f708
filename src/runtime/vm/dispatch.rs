use std::{io::Write, rc::Rc};

use crate::{
    bytecode::instruction::Instruction,
    runtime::{
        error::RuntimeError,
        gc::{
            HeapObject,
            table::{table_declare, table_get},
        },
        value::Value,
    },
};

use super::VM;

impl VM<'_> {
    /// Executes one instruction, advancing the program counter unless the
    /// instruction wrote to it.
    pub(super) fn dispatch(&mut self, instruction: &Instruction) -> Result<(), RuntimeError> {
        match instruction {
            Instruction::PushNil => {
                self.push(Value::Nil);
                self.pc.advance();
            }
            Instruction::PushInteger(value) => {
                self.push(Value::Integer(*value));
                self.pc.advance();
            }
            Instruction::PushVariable(name) => {
                let frame = self.env_top()?;
                let value = table_get(&self.heap, frame, *name).ok_or_else(|| {
                    RuntimeError::UndefinedName {
                        name: self.names.resolve(*name).to_string(),
                    }
                })?;
                self.push(value);
                self.pc.advance();
            }
            Instruction::PushFunction(blob) => {
                let env = self.env_top()?;
                let function = self.gc_alloc(HeapObject::Function {
                    env,
                    blob: Rc::clone(blob),
                });
                self.push(Value::Function(function));
                self.pc.advance();
            }
            Instruction::DeclareVariable(name) => {
                // Inspect, don't pop: the declared value is the result.
                let value = self.peek()?;
                let frame = self.env_top()?;
                if !table_declare(&mut self.heap, frame, *name, value) {
                    return Err(RuntimeError::Redeclaration {
                        name: self.names.resolve(*name).to_string(),
                    });
                }
                self.pc.advance();
            }
            Instruction::BlockStart => {
                let proto = self.env_top()?;
                let frame = self.gc_alloc(HeapObject::table(Some(proto)));
                self.env.push(frame);
                self.pc.advance();
            }
            Instruction::BlockEnd => {
                self.env.pop().ok_or(RuntimeError::StackUnderflow)?;
                self.pc.advance();
            }
            Instruction::Pop => {
                self.pop()?;
                self.pc.advance();
            }
            Instruction::If(target) => {
                let condition = self.pop()?;
                if condition.is_truthy() {
                    self.pc.advance();
                } else {
                    self.pc.jump(*target);
                }
            }
            Instruction::Else(target) => {
                self.pc.jump(*target);
            }
            Instruction::DebugPrint => {
                let value = self.peek()?;
                let _ = writeln!(self.out, "{}", value);
                self.pc.advance();
            }
            Instruction::Call(argc) => self.execute_call(*argc)?,
            Instruction::Invalid | Instruction::TailCall(_) => {
                return Err(RuntimeError::InvalidInstruction {
                    op: instruction.name(),
                });
            }
        }
        Ok(())
    }
}
