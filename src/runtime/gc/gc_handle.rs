/// Handle into the GC heap.
///
/// A `GcHandle` is a lightweight, copyable index that refers to a
/// heap-allocated object managed by the garbage collector. The heap is
/// non-moving, so a handle stays valid for as long as its object is
/// reachable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GcHandle(pub(crate) u32);

impl GcHandle {
    /// Returns the raw heap slot index backing this handle.
    pub fn index(self) -> u32 {
        self.0
    }
}
