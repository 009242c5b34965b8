// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! # Scratch Pool Collaborator
//!
//! Materializing sequence operations (sort, dedup, grouping) need temporary
//! buffers. Where those buffers come from is not this crate's business: the
//! [`ScratchPool`] trait is the contract an external pool implements, and
//! [`AllocScratch`] is the trivial implementation that allocates fresh
//! buffers and drops them on release.
//!
//! ## Contract
//!
//! - Buffers returned by `take_*` start empty.
//! - Every taken buffer is released exactly once, on every exit path —
//!   normal drain, early termination, and mid-iteration drop.
//! - A released buffer must not be touched again by the releasing party.
//!
//! The release discipline is not left to call sites: the [`ScratchVec`] and
//! [`ScratchMap`] guards clear and return their buffer when dropped, so a
//! sequence that is abandoned halfway still hands its scratch storage back.
//!
//! ## Usage
//!
//! ```rust
//! use hawser_slinq::pool::{AllocScratch, ScratchVec};
//!
//! let pool = AllocScratch;
//! let mut buf: ScratchVec<'_, AllocScratch, i32> = ScratchVec::new(&pool);
//! buf.push(3);
//! buf.push(1);
//! buf.vec_mut().sort();
//! assert_eq!(buf.get(0), Some(&1));
//! // Dropping the guard returns the buffer to the pool.
//! ```

use rustc_hash::FxHashMap;
use std::hash::Hash;

/// Provider of temporary list- and map-shaped buffers.
///
/// Implementations may recycle storage aggressively; the engine only assumes
/// the buffers it receives are empty and gives every one back exactly once.
pub trait ScratchPool {
    /// Borrows an empty vector buffer.
    fn take_vec<T>(&self) -> Vec<T>;

    /// Returns a vector buffer to the pool. The buffer is already cleared.
    fn put_vec<T>(&self, buf: Vec<T>);

    /// Borrows an empty map buffer.
    fn take_map<K: Eq + Hash, V>(&self) -> FxHashMap<K, V>;

    /// Returns a map buffer to the pool. The buffer is already cleared.
    fn put_map<K: Eq + Hash, V>(&self, map: FxHashMap<K, V>);
}

/// The no-pool pool: fresh allocations, dropped on release.
///
/// This is the default collaborator behind the convenience forms of the
/// materializing operations (`order_by`, `distinct`, ...). Real pools live
/// outside this crate and are passed to the `*_in` forms.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllocScratch;

/// Shared instance for `'static` borrows of the default collaborator.
pub static ALLOC_SCRATCH: AllocScratch = AllocScratch;

impl ScratchPool for AllocScratch {
    #[inline]
    fn take_vec<T>(&self) -> Vec<T> {
        Vec::new()
    }

    #[inline]
    fn put_vec<T>(&self, buf: Vec<T>) {
        drop(buf);
    }

    #[inline]
    fn take_map<K: Eq + Hash, V>(&self) -> FxHashMap<K, V> {
        FxHashMap::default()
    }

    #[inline]
    fn put_map<K: Eq + Hash, V>(&self, map: FxHashMap<K, V>) {
        drop(map);
    }
}

/// RAII guard around a pooled vector buffer.
///
/// The buffer is cleared and handed back to the pool when the guard is
/// released or dropped. Read accessors degrade gracefully after release
/// (`len` is 0, `get`/`pop` yield nothing); write access after release is a
/// usage defect and panics.
pub struct ScratchVec<'p, P: ScratchPool + ?Sized, T> {
    pool: &'p P,
    buf: Option<Vec<T>>,
}

impl<'p, P: ScratchPool + ?Sized, T> ScratchVec<'p, P, T> {
    /// Borrows a fresh buffer from `pool`.
    #[inline]
    pub fn new(pool: &'p P) -> Self {
        Self {
            pool,
            buf: Some(pool.take_vec()),
        }
    }

    /// Number of elements still held, 0 once released.
    #[inline]
    pub fn len(&self) -> usize {
        self.buf.as_ref().map_or(0, Vec::len)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Element at `index`, `None` out of bounds or after release.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.buf.as_ref().and_then(|b| b.get(index))
    }

    /// Removes and returns the last element, `None` when empty or released.
    #[inline]
    pub fn pop(&mut self) -> Option<T> {
        self.buf.as_mut().and_then(Vec::pop)
    }

    /// Appends an element.
    ///
    /// # Panics
    ///
    /// Panics if the buffer was already released.
    #[inline]
    pub fn push(&mut self, value: T) {
        self.vec_mut().push(value);
    }

    /// Mutable access to the underlying vector, for build-time operations
    /// such as sorting and reversing.
    ///
    /// # Panics
    ///
    /// Panics if the buffer was already released.
    #[inline]
    pub fn vec_mut(&mut self) -> &mut Vec<T> {
        self.buf
            .as_mut()
            .expect("called `ScratchVec::vec_mut` after the buffer was released")
    }

    /// Clears the buffer and returns it to the pool. Idempotent.
    pub fn release(&mut self) {
        if let Some(mut buf) = self.buf.take() {
            buf.clear();
            self.pool.put_vec(buf);
        }
    }
}

impl<P: ScratchPool + ?Sized, T> Drop for ScratchVec<'_, P, T> {
    fn drop(&mut self) {
        self.release();
    }
}

/// RAII guard around a pooled map buffer. Same discipline as [`ScratchVec`].
pub struct ScratchMap<'p, P: ScratchPool + ?Sized, K: Eq + Hash, V> {
    pool: &'p P,
    map: Option<FxHashMap<K, V>>,
}

impl<'p, P: ScratchPool + ?Sized, K: Eq + Hash, V> ScratchMap<'p, P, K, V> {
    /// Borrows a fresh map from `pool`.
    #[inline]
    pub fn new(pool: &'p P) -> Self {
        Self {
            pool,
            map: Some(pool.take_map()),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.map.as_ref().map_or(0, FxHashMap::len)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Value for `key`, `None` when absent or after release.
    #[inline]
    pub fn get(&self, key: &K) -> Option<&V> {
        self.map.as_ref().and_then(|m| m.get(key))
    }

    #[inline]
    pub fn contains_key(&self, key: &K) -> bool {
        self.map.as_ref().is_some_and(|m| m.contains_key(key))
    }

    /// Inserts a key/value pair, returning the previous value.
    ///
    /// # Panics
    ///
    /// Panics if the map was already released.
    #[inline]
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        self.map_mut().insert(key, value)
    }

    /// Removes `key`, returning its value. `None` after release.
    #[inline]
    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.map.as_mut().and_then(|m| m.remove(key))
    }

    /// Mutable access to the underlying map, for build-time operations.
    ///
    /// # Panics
    ///
    /// Panics if the map was already released.
    #[inline]
    pub fn map_mut(&mut self) -> &mut FxHashMap<K, V> {
        self.map
            .as_mut()
            .expect("called `ScratchMap::map_mut` after the buffer was released")
    }

    /// Clears the map and returns it to the pool. Idempotent.
    pub fn release(&mut self) {
        if let Some(mut map) = self.map.take() {
            map.clear();
            self.pool.put_map(map);
        }
    }
}

impl<P: ScratchPool + ?Sized, K: Eq + Hash, V> Drop for ScratchMap<'_, P, K, V> {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use std::cell::Cell;

    /// Pool that counts borrows and releases, for verifying the
    /// exactly-once release discipline.
    #[derive(Debug, Default)]
    pub struct CountingPool {
        pub vecs_taken: Cell<usize>,
        pub vecs_put: Cell<usize>,
        pub maps_taken: Cell<usize>,
        pub maps_put: Cell<usize>,
    }

    impl CountingPool {
        pub fn balanced(&self) -> bool {
            self.vecs_taken.get() == self.vecs_put.get()
                && self.maps_taken.get() == self.maps_put.get()
        }
    }

    impl ScratchPool for CountingPool {
        fn take_vec<T>(&self) -> Vec<T> {
            self.vecs_taken.set(self.vecs_taken.get() + 1);
            Vec::new()
        }

        fn put_vec<T>(&self, buf: Vec<T>) {
            assert!(buf.is_empty(), "released vec buffer must be cleared");
            self.vecs_put.set(self.vecs_put.get() + 1);
        }

        fn take_map<K: Eq + Hash, V>(&self) -> FxHashMap<K, V> {
            self.maps_taken.set(self.maps_taken.get() + 1);
            FxHashMap::default()
        }

        fn put_map<K: Eq + Hash, V>(&self, map: FxHashMap<K, V>) {
            assert!(map.is_empty(), "released map buffer must be cleared");
            self.maps_put.set(self.maps_put.get() + 1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::CountingPool;
    use super::*;

    #[test]
    fn test_vec_guard_releases_on_drop() {
        let pool = CountingPool::default();
        {
            let mut buf: ScratchVec<'_, CountingPool, i32> = ScratchVec::new(&pool);
            buf.push(1);
            buf.push(2);
            assert_eq!(buf.len(), 2);
        }
        assert_eq!(pool.vecs_taken.get(), 1);
        assert_eq!(pool.vecs_put.get(), 1);
    }

    #[test]
    fn test_vec_guard_release_is_idempotent() {
        let pool = CountingPool::default();
        let mut buf: ScratchVec<'_, CountingPool, i32> = ScratchVec::new(&pool);
        buf.push(7);
        buf.release();
        buf.release();
        drop(buf);
        assert_eq!(pool.vecs_put.get(), 1);
    }

    #[test]
    fn test_vec_guard_degrades_after_release() {
        let pool = AllocScratch;
        let mut buf: ScratchVec<'_, AllocScratch, i32> = ScratchVec::new(&pool);
        buf.push(5);
        buf.release();
        assert_eq!(buf.len(), 0);
        assert_eq!(buf.get(0), None);
        assert_eq!(buf.pop(), None);
    }

    #[test]
    #[should_panic(expected = "after the buffer was released")]
    fn test_vec_write_after_release_panics() {
        let pool = AllocScratch;
        let mut buf: ScratchVec<'_, AllocScratch, i32> = ScratchVec::new(&pool);
        buf.release();
        buf.push(1);
    }

    #[test]
    fn test_map_guard_round_trip() {
        let pool = CountingPool::default();
        {
            let mut map: ScratchMap<'_, CountingPool, &str, i32> = ScratchMap::new(&pool);
            map.insert("a", 1);
            assert_eq!(map.get(&"a"), Some(&1));
            assert_eq!(map.remove(&"a"), Some(1));
            assert!(!map.contains_key(&"a"));
        }
        assert!(pool.balanced());
    }
}
