use crate::runtime::gc::heap_object::HeapObject;

/// One occupied heap slot: the object plus its mark bit.
///
/// Unmarked is white, marked is black. The grey set only exists as the
/// collector's worklist during a collection.
pub struct HeapEntry {
    pub object: HeapObject,
    pub marked: bool,
}
