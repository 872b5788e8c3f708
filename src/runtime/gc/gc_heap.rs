use std::rc::Rc;

use crate::{
    bytecode::blob::Blob,
    runtime::{
        gc::{gc_handle::GcHandle, heap_entry::HeapEntry, heap_object::HeapObject},
        value::Value,
    },
};

const INITIAL_GC_THRESHOLD: usize = 1000;
const MIN_GC_THRESHOLD: usize = 1000;

/// Collection trigger policy.
///
/// `Debug` runs a full collection before every instruction so a reference
/// missing from the root set dies immediately instead of surviving until some
/// later threshold crossing. `Prod` collects at allocation safe points once
/// the live count reaches the adaptive threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GcMode {
    Debug,
    Prod,
}

/// Stop-the-world mark-and-sweep garbage collector heap.
///
/// All tables and functions are allocated here; the VM supplies the root set
/// (eval stack, env stack, temporary-roots register) at every collection.
/// The heap is non-moving: objects keep their slot, and freed slots are
/// recycled through a free list.
pub struct GcHeap {
    entries: Vec<Option<HeapEntry>>,
    free_list: Vec<u32>,
    live: usize,
    threshold: usize,
    mode: GcMode,
    total_allocations: usize,
    total_collections: usize,
}

impl Default for GcHeap {
    fn default() -> Self {
        Self::new()
    }
}

impl GcHeap {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            free_list: Vec::new(),
            live: 0,
            threshold: INITIAL_GC_THRESHOLD,
            mode: GcMode::Prod,
            total_allocations: 0,
            total_collections: 0,
        }
    }

    /// Creates a heap with a custom starting threshold.
    ///
    /// The adaptive policy still applies after the first collection; values
    /// below `MIN_GC_THRESHOLD` only last until then.
    pub fn with_threshold(threshold: usize) -> Self {
        let mut heap = Self::new();
        heap.threshold = threshold;
        heap
    }

    pub fn set_mode(&mut self, mode: GcMode) {
        self.mode = mode;
    }

    pub fn mode(&self) -> GcMode {
        self.mode
    }

    /// Returns `true` when a threshold collection is due.
    ///
    /// In `Debug` mode this is always `false`: the VM already collects at
    /// every instruction boundary.
    pub fn should_collect(&self) -> bool {
        self.mode == GcMode::Prod && self.live >= self.threshold
    }

    /// Allocates a new heap object and returns a stable handle to it.
    ///
    /// Freed slots are reused through the internal free list before growing
    /// the storage vector. Allocation never collects on its own; the VM
    /// checks [`Self::should_collect`] first so that every live reference is
    /// anchored in a root when the collector runs.
    pub fn alloc(&mut self, object: HeapObject) -> GcHandle {
        self.live += 1;
        self.total_allocations += 1;

        let entry = HeapEntry {
            object,
            marked: false,
        };

        if let Some(idx) = self.free_list.pop() {
            self.entries[idx as usize] = Some(entry);
            GcHandle(idx)
        } else {
            let idx = self.entries.len() as u32;
            self.entries.push(Some(entry));
            GcHandle(idx)
        }
    }

    /// Returns an immutable reference to a live object by handle.
    ///
    /// Panics if the handle points to a free slot or is out of bounds; a
    /// handle that outlives its object is a collector bug, not a user error.
    pub fn get(&self, handle: GcHandle) -> &HeapObject {
        &self.entries[handle.0 as usize]
            .as_ref()
            .expect("GcHeap::get: invalid or free handle")
            .object
    }

    /// Returns a mutable reference to a live object by handle.
    ///
    /// Panics under the same conditions as [`Self::get`].
    pub fn get_mut(&mut self, handle: GcHandle) -> &mut HeapObject {
        &mut self.entries[handle.0 as usize]
            .as_mut()
            .expect("GcHeap::get_mut: invalid or free handle")
            .object
    }

    /// Returns the captured environment and blob of a function object.
    ///
    /// Panics if the handle does not refer to a function.
    pub fn function(&self, handle: GcHandle) -> (GcHandle, Rc<Blob>) {
        match self.get(handle) {
            HeapObject::Function { env, blob } => (*env, Rc::clone(blob)),
            HeapObject::Table { .. } => panic!("GcHeap::function: handle is not a function"),
        }
    }

    /// Returns the number of currently live heap objects.
    pub fn live_count(&self) -> usize {
        self.live
    }

    /// Returns the total number of allocations performed by this heap.
    pub fn total_allocations(&self) -> usize {
        self.total_allocations
    }

    /// Returns the total number of completed collection cycles.
    pub fn total_collections(&self) -> usize {
        self.total_collections
    }

    /// Runs a full stop-the-world mark-and-sweep collection.
    ///
    /// The roots are the heap-typed values on the eval stack, every frame on
    /// the env stack, and whatever the VM has parked in its temporary-roots
    /// register mid-instruction. Return addresses carry only blobs, which are
    /// unmanaged, so the ret stack contributes nothing.
    ///
    /// After the sweep the threshold is retuned to three times the work this
    /// cycle performed (root scans + trace edges + swept slots), floored at
    /// `MIN_GC_THRESHOLD`, so bookkeeping stays amortized-linear as the heap
    /// grows.
    pub fn collect(&mut self, eval: &[Value], env: &[GcHandle], scratch: &[Value]) {
        let mut work_done = 0usize;
        let mut grey: Vec<GcHandle> = Vec::new();

        for value in eval.iter().chain(scratch.iter()) {
            work_done += 1;
            if let Some(handle) = value.heap_handle() {
                self.mark(handle, &mut grey);
            }
        }
        for &frame in env {
            work_done += 1;
            self.mark(frame, &mut grey);
        }

        while let Some(handle) = grey.pop() {
            self.trace_object(handle, &mut grey, &mut work_done);
        }

        work_done += self.sweep();

        self.total_collections += 1;
        self.threshold = (3 * work_done).max(MIN_GC_THRESHOLD);
    }

    /// Paints a white object black and queues it on the grey worklist.
    fn mark(&mut self, handle: GcHandle, grey: &mut Vec<GcHandle>) {
        if let Some(entry) = self
            .entries
            .get_mut(handle.0 as usize)
            .and_then(Option::as_mut)
        {
            if !entry.marked {
                entry.marked = true;
                grey.push(handle);
            }
        }
    }

    /// Visits every outbound heap reference of one grey object.
    fn trace_object(&mut self, handle: GcHandle, grey: &mut Vec<GcHandle>, work_done: &mut usize) {
        let mut children: Vec<GcHandle> = Vec::new();
        match self.get(handle) {
            HeapObject::Table { proto, mapping } => {
                if let Some(proto) = proto {
                    children.push(*proto);
                }
                children.extend(mapping.values().filter_map(Value::heap_handle));
            }
            HeapObject::Function { env, .. } => children.push(*env),
        }

        for child in children {
            *work_done += 1;
            self.mark(child, grey);
        }
    }

    /// Frees every white object and repaints survivors white for the next
    /// cycle. Returns the number of slots visited.
    fn sweep(&mut self) -> usize {
        let mut work_done = 0;
        for (i, slot) in self.entries.iter_mut().enumerate() {
            if let Some(entry) = slot {
                work_done += 1;
                if entry.marked {
                    entry.marked = false;
                } else {
                    *slot = None;
                    self.free_list.push(i as u32);
                    self.live -= 1;
                }
            }
        }
        work_done
    }
}
