use crate::runtime::{
    error::RuntimeError,
    gc::{HeapObject, table::table_declare},
    program_counter::ProgramCounter,
    value::Value,
};

use super::VM;

impl VM<'_> {
    /// Executes `CALL(argc)`.
    ///
    /// Stack precondition: `[…, arg1, …, argN, callee]` with the callee on
    /// top. The callee and arguments are consumed here; the callee's return
    /// value takes their place when its blob runs out and the run loop pops
    /// the saved program counter.
    pub(super) fn execute_call(&mut self, argc: usize) -> Result<(), RuntimeError> {
        let callee = self.peek()?;
        let Value::Function(handle) = callee else {
            return Err(RuntimeError::NotCallable {
                type_name: callee.type_name(),
            });
        };

        // Save the return address past the CALL instruction.
        self.pc.advance();
        self.ret.push(self.pc.clone());

        // Park the callee in the temporary-roots register: the frame
        // allocation below is a safe point, and the eval stack no longer
        // anchors the callee once popped.
        self.pop()?;
        self.scratch.push(callee);

        let (captured_env, blob) = self.heap.function(handle);
        if argc != blob.params.len() {
            return Err(RuntimeError::WrongArity {
                want: blob.params.len(),
                got: argc,
            });
        }
        if self.eval.len() < argc {
            return Err(RuntimeError::StackUnderflow);
        }

        // The frame's prototype is the environment captured at function
        // creation, not the caller's current frame.
        let frame = self.gc_alloc(HeapObject::table(Some(captured_env)));
        self.env.push(frame);

        let base = self.eval.len() - argc;
        for (i, &param) in blob.params.iter().enumerate() {
            let value = self.eval[base + i];
            if !table_declare(&mut self.heap, frame, param, value) {
                return Err(RuntimeError::Redeclaration {
                    name: self.names.resolve(param).to_string(),
                });
            }
        }
        self.eval.truncate(base);

        self.pc = ProgramCounter::new(blob, 0);
        self.scratch.clear();
        Ok(())
    }
}
