//! Environment-table operations over the GC heap.
//!
//! Tables double as lexical frames and as the prototype chain that scoping
//! walks: a lookup starts at the innermost frame and follows `proto` links
//! outward until it finds the name or runs off the root.

use crate::{
    intern::Symbol,
    runtime::{
        gc::{GcHandle, GcHeap, HeapObject},
        value::Value,
    },
};

/// Looks up `name` starting at `table` and walking the prototype chain.
///
/// Returns `None` when no frame in the chain binds the name.
pub fn table_get(heap: &GcHeap, table: GcHandle, name: Symbol) -> Option<Value> {
    let mut current = table;
    loop {
        match heap.get(current) {
            HeapObject::Table { proto, mapping } => {
                if let Some(value) = mapping.get(&name) {
                    return Some(*value);
                }
                match proto {
                    Some(parent) => current = *parent,
                    None => return None,
                }
            }
            HeapObject::Function { .. } => {
                unreachable!("table handle refers to a function")
            }
        }
    }
}

/// Declares `name` in `table` itself, never in a prototype.
///
/// Returns `false` when the frame already binds the name; redeclaration in
/// the same frame is not allowed, shadowing an outer frame is.
#[must_use]
pub fn table_declare(heap: &mut GcHeap, table: GcHandle, name: Symbol, value: Value) -> bool {
    match heap.get_mut(table) {
        HeapObject::Table { mapping, .. } => {
            if mapping.contains_key(&name) {
                return false;
            }
            mapping.insert(name, value);
            true
        }
        HeapObject::Function { .. } => {
            unreachable!("table handle refers to a function")
        }
    }
}
