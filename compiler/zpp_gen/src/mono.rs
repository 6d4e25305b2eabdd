//! Monomorphization cache.
//!
//! Types are not hash-consed, so argument lists cannot key a hash map
//! directly. Entries are bucketed by `(symbol, structural hash of the
//! arguments)` and scanned with [`TypePool::equal_lists`] inside a bucket.
//! Buckets stay tiny in practice: a collision needs the same generic
//! declaration instantiated with structurally different argument lists that
//! hash alike. Completing a placeholder changes the hash of every key that
//! mentions it, so the cache is re-bucketed whenever that happens.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use zpp_types::{TypeId, TypePool};

use crate::symbol::SymbolId;

/// Generation state of a cache entry.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MonoState {
    /// Body still being generated; the value is the provisional handle.
    InProgress,
    Done,
}

struct MonoEntry<T> {
    args: SmallVec<[TypeId; 4]>,
    value: T,
    state: MonoState,
}

pub struct MonoCache<T> {
    buckets: FxHashMap<(SymbolId, u64), Vec<MonoEntry<T>>>,
}

impl<T> Default for MonoCache<T> {
    fn default() -> Self {
        MonoCache {
            buckets: FxHashMap::default(),
        }
    }
}

impl<T> MonoCache<T> {
    pub fn get(&self, pool: &TypePool, sym: SymbolId, args: &[TypeId]) -> Option<(&T, MonoState)> {
        let bucket = self.buckets.get(&(sym, pool.structural_hash(args)))?;
        bucket
            .iter()
            .find(|e| pool.equal_lists(&e.args, args))
            .map(|e| (&e.value, e.state))
    }

    /// Record an instantiation whose generation has just started.
    pub fn insert(&mut self, pool: &TypePool, sym: SymbolId, args: &[TypeId], value: T) {
        self.buckets
            .entry((sym, pool.structural_hash(args)))
            .or_default()
            .push(MonoEntry {
                args: SmallVec::from_slice(args),
                value,
                state: MonoState::InProgress,
            });
    }

    /// Mark an instantiation complete.
    pub fn finish(&mut self, pool: &TypePool, sym: SymbolId, args: &[TypeId]) {
        if let Some(bucket) = self.buckets.get_mut(&(sym, pool.structural_hash(args))) {
            if let Some(entry) = bucket.iter_mut().find(|e| pool.equal_lists(&e.args, args)) {
                entry.state = MonoState::Done;
            }
        }
    }

    /// Re-bucket every entry under the current hash of its arguments.
    pub fn rehash(&mut self, pool: &TypePool) {
        for ((sym, _), bucket) in std::mem::take(&mut self.buckets) {
            for entry in bucket {
                self.buckets
                    .entry((sym, pool.structural_hash(&entry.args)))
                    .or_default()
                    .push(entry);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests;
