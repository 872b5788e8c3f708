use std::{
    collections::HashMap,
    hash::{BuildHasher, Hash, Hasher, RandomState},
};

use crate::intern::symbol::Symbol;

#[derive(Debug, Clone, Copy)]
struct Entry {
    start: usize,
    end: usize,
}

/// Process-wide pool of interned names.
///
/// The pool grows monotonically and never evicts: a `Symbol` handed out once
/// stays valid for the life of the interner. Two calls with equal text return
/// the same `Symbol`.
#[derive(Debug, Clone)]
pub struct Interner {
    hasher: RandomState,
    buckets: HashMap<u64, Vec<Symbol>>,
    entries: Vec<Entry>,
    storage: String,
}

impl Default for Interner {
    fn default() -> Self {
        Self::new()
    }
}

impl Interner {
    pub fn new() -> Self {
        Self {
            hasher: RandomState::new(),
            buckets: HashMap::default(),
            entries: Vec::new(),
            storage: String::new(),
        }
    }

    pub fn with_capacity(symbol_capacity: usize, storage_bytes: usize) -> Self {
        Self {
            hasher: RandomState::new(),
            buckets: HashMap::with_capacity(symbol_capacity),
            entries: Vec::with_capacity(symbol_capacity),
            storage: String::with_capacity(storage_bytes),
        }
    }

    pub fn intern(&mut self, s: &str) -> Symbol {
        let hash = self.hash_str(s);
        if let Some(candidates) = self.buckets.get(&hash) {
            for candidate in candidates {
                if self.resolve(*candidate) == s {
                    return *candidate;
                }
            }
        }

        let sym = Symbol::new(self.entries.len() as u32);

        let start = self.storage.len();
        self.storage.push_str(s);
        let end = self.storage.len();

        self.entries.push(Entry { start, end });
        self.buckets.entry(hash).or_default().push(sym);
        sym
    }

    pub fn resolve(&self, sym: Symbol) -> &str {
        let Some(entry) = self.entries.get(sym.as_u32() as usize) else {
            return "";
        };

        self.storage.get(entry.start..entry.end).unwrap_or("")
    }

    fn hash_str(&self, s: &str) -> u64 {
        let mut h = self.hasher.build_hasher();

        s.hash(&mut h);
        h.finish()
    }
}

#[cfg(test)]
mod tests {
    use crate::intern::interner::Interner;

    #[test]
    fn interning_reuses_symbol_for_same_name() {
        let mut interner = Interner::new();
        let a = interner.intern("alpha");
        let b = interner.intern("alpha");
        let c = interner.intern("beta");

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(interner.resolve(a), "alpha");
        assert_eq!(interner.resolve(c), "beta");
    }

    #[test]
    fn distinct_names_get_distinct_symbols() {
        let mut interner = Interner::new();
        let symbols: Vec<_> = ["x", "y", "z", "xy"]
            .iter()
            .map(|name| interner.intern(name))
            .collect();

        for (i, a) in symbols.iter().enumerate() {
            for (j, b) in symbols.iter().enumerate() {
                assert_eq!(a == b, i == j);
            }
        }
    }

    #[test]
    fn resolve_survives_storage_growth() {
        let mut interner = Interner::with_capacity(4, 8);
        let first = interner.intern("first");
        for i in 0..256 {
            interner.intern(&format!("name{}", i));
        }
        assert_eq!(interner.resolve(first), "first");
    }
}
