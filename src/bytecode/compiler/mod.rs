use std::{collections::HashSet, rc::Rc};

use crate::{
    ast::Expression,
    bytecode::{blob::Blob, instruction::Instruction},
    intern::Interner,
};

#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    #[error("duplicate parameter `{name}`")]
    DuplicateParameter { name: String },
}

/// Lowers an [`Expression`] tree into a [`Blob`] by structural recursion.
///
/// Every expression form contributes exactly one value to its enclosing
/// context; block emission inserts the `POP`s that discard unused
/// intermediates. Nested lambdas compile into child blobs embedded as
/// `PUSH_FUNCTION` operands.
pub struct Compiler<'i> {
    names: &'i Interner,
}

impl<'i> Compiler<'i> {
    pub fn new(names: &'i Interner) -> Self {
        Self { names }
    }

    /// Compiles `expression` into a fresh top-level blob.
    pub fn compile(&self, expression: &Expression) -> Result<Rc<Blob>, CompileError> {
        let mut blob = Blob::new(Vec::new());
        self.compile_into(expression, &mut blob)?;
        Ok(Rc::new(blob))
    }

    fn compile_into(&self, expression: &Expression, blob: &mut Blob) -> Result<(), CompileError> {
        match expression {
            Expression::Nil => {
                self.emit(blob, Instruction::PushNil);
            }
            Expression::Integer(value) => {
                self.emit(blob, Instruction::PushInteger(*value));
            }
            Expression::Variable(name) => {
                self.emit(blob, Instruction::PushVariable(*name));
            }
            Expression::Lambda { params, body } => {
                let mut seen = HashSet::new();
                for &param in params {
                    if !seen.insert(param) {
                        return Err(CompileError::DuplicateParameter {
                            name: self.names.resolve(param).to_string(),
                        });
                    }
                }
                let mut child = Blob::new(params.clone());
                self.compile_into(body, &mut child)?;
                self.emit(blob, Instruction::PushFunction(Rc::new(child)));
            }
            Expression::Declare { name, value } => {
                self.compile_into(value, blob)?;
                // The declared value stays on the stack as the result.
                self.emit(blob, Instruction::DeclareVariable(*name));
            }
            Expression::Call { callee, args } => {
                // Arguments first, callee last: CALL pops the callee off the
                // top and peeks the arguments below it.
                for arg in args {
                    self.compile_into(arg, blob)?;
                }
                self.compile_into(callee, blob)?;
                self.emit(blob, Instruction::Call(args.len()));
            }
            Expression::If {
                condition,
                consequence,
                alternative,
            } => {
                self.compile_into(condition, blob)?;
                let if_pos = self.emit(blob, Instruction::If(0));
                self.compile_into(consequence, blob)?;
                let else_pos = self.emit(blob, Instruction::Else(0));
                self.compile_into(alternative, blob)?;
                blob.instructions[if_pos] = Instruction::If(else_pos + 1);
                blob.instructions[else_pos] = Instruction::Else(blob.instructions.len());
            }
            Expression::Block(statements) => match statements.split_last() {
                None => {
                    self.emit(blob, Instruction::PushNil);
                }
                Some((last, init)) => {
                    self.emit(blob, Instruction::BlockStart);
                    for statement in init {
                        self.compile_into(statement, blob)?;
                        self.emit(blob, Instruction::Pop);
                    }
                    // The last statement's value is the block's result;
                    // BLOCK_END leaves the stack alone.
                    self.compile_into(last, blob)?;
                    self.emit(blob, Instruction::BlockEnd);
                }
            },
            Expression::DebugPrint(value) => {
                self.compile_into(value, blob)?;
                self.emit(blob, Instruction::DebugPrint);
            }
        }
        Ok(())
    }

    fn emit(&self, blob: &mut Blob, instruction: Instruction) -> usize {
        blob.instructions.push(instruction);
        blob.instructions.len() - 1
    }
}

#[cfg(test)]
mod compiler_test;
