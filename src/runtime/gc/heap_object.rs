use std::{collections::HashMap, rc::Rc};

use crate::{
    bytecode::blob::Blob,
    intern::Symbol,
    runtime::{gc::gc_handle::GcHandle, value::Value},
};

/// Objects that live on the GC-managed heap.
///
/// Blobs and symbols are deliberately absent: they are immortal and shared
/// via `Rc` / raw indices, so the collector never traces or frees them.
#[derive(Debug, Clone)]
pub enum HeapObject {
    /// Lexical environment frame, chained to its enclosing frame through
    /// `proto`. The root environment is the one table with no prototype.
    Table {
        proto: Option<GcHandle>,
        mapping: HashMap<Symbol, Value>,
    },
    /// Closure: the blob to run plus the environment captured at creation.
    Function { env: GcHandle, blob: Rc<Blob> },
}

impl HeapObject {
    /// Creates an empty table chained to `proto`.
    pub fn table(proto: Option<GcHandle>) -> Self {
        HeapObject::Table {
            proto,
            mapping: HashMap::new(),
        }
    }
}
