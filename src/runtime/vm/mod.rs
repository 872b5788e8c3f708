use std::{
    io::{self, Write},
    rc::Rc,
};

use crate::{
    bytecode::blob::Blob,
    intern::Interner,
    runtime::{
        error::RuntimeError,
        gc::{GcHandle, GcHeap, GcMode, HeapObject},
        program_counter::ProgramCounter,
        value::Value,
    },
};

mod dispatch;
mod function_call;
mod trace;

/// Stack-based bytecode virtual machine.
///
/// Three parallel stacks carry all execution state: `eval` holds values,
/// `ret` holds return addresses, and `env` holds the chain of lexical frames.
/// Each stack has a single element type, which keeps GC rooting uniform and
/// the call/return discipline auditable.
pub struct VM<'a> {
    eval: Vec<Value>,
    ret: Vec<ProgramCounter>,
    env: Vec<GcHandle>,
    pc: ProgramCounter,
    /// Temporary-roots register: values a composite instruction holds across
    /// an allocation safe point, where the collector must still see them.
    scratch: Vec<Value>,
    pub heap: GcHeap,
    names: &'a Interner,
    trace: bool,
    out: Box<dyn Write + 'a>,
}

impl<'a> VM<'a> {
    /// Creates a VM seeded with a prototype-less root environment and a
    /// program counter at the start of `blob`. `DEBUG_PRINT` goes to stdout.
    pub fn new(blob: Rc<Blob>, names: &'a Interner) -> Self {
        Self::with_output(blob, names, Box::new(io::stdout()))
    }

    /// Like [`Self::new`] with an explicit print sink.
    pub fn with_output(blob: Rc<Blob>, names: &'a Interner, out: Box<dyn Write + 'a>) -> Self {
        let mut heap = GcHeap::new();
        let root = heap.alloc(HeapObject::table(None));
        Self {
            eval: Vec::new(),
            ret: Vec::new(),
            env: vec![root],
            pc: ProgramCounter::new(blob, 0),
            scratch: Vec::new(),
            heap,
            names,
            trace: false,
            out,
        }
    }

    /// Enables or disables the per-instruction trace on stderr.
    pub fn set_trace(&mut self, enabled: bool) {
        self.trace = enabled;
    }

    pub fn set_gc_mode(&mut self, mode: GcMode) {
        self.heap.set_mode(mode);
    }

    /// Runs the fetch-decode-execute loop to completion.
    ///
    /// The loop ends when the call stack is empty and the current blob is
    /// exhausted; a blob exhausted mid-call instead pops the saved return
    /// address and the callee's environment frame. There is no RETURN
    /// opcode.
    pub fn run(&mut self) -> Result<(), RuntimeError> {
        while !(self.ret.is_empty() && self.pc.done()) {
            if self.heap.mode() == GcMode::Debug {
                self.collect_gc();
            }

            if self.pc.done() {
                // Call epilogue: resume the caller and drop the callee's
                // frame. The return value is whatever the callee left on
                // top of the eval stack.
                if let Some(caller) = self.ret.pop() {
                    self.pc = caller;
                    self.env.pop();
                }
                continue;
            }

            if self.trace {
                self.trace_instruction();
            }
            let instruction = self.pc.current().clone();
            self.dispatch(&instruction)?;
        }
        Ok(())
    }

    /// Returns the value execution left on top of the eval stack.
    ///
    /// After a completed run of a compiled expression this is the
    /// expression's result.
    pub fn result(&self) -> Option<&Value> {
        self.eval.last()
    }

    /// Allocates a heap object, collecting first when the threshold is due.
    ///
    /// Every caller must have all live references anchored in a root before
    /// calling: this is a GC safe point.
    pub(crate) fn gc_alloc(&mut self, object: HeapObject) -> GcHandle {
        if self.heap.should_collect() {
            self.collect_gc();
        }
        self.heap.alloc(object)
    }

    fn collect_gc(&mut self) {
        self.heap.collect(&self.eval, &self.env, &self.scratch);
    }

    fn push(&mut self, value: Value) {
        self.eval.push(value);
    }

    fn pop(&mut self) -> Result<Value, RuntimeError> {
        self.eval.pop().ok_or(RuntimeError::StackUnderflow)
    }

    fn peek(&self) -> Result<Value, RuntimeError> {
        self.eval.last().copied().ok_or(RuntimeError::StackUnderflow)
    }

    fn env_top(&self) -> Result<GcHandle, RuntimeError> {
        self.env.last().copied().ok_or(RuntimeError::StackUnderflow)
    }
}
