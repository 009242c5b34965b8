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

//! # Materializing Combinators
//!
//! Sorting, deduplication, set operations, and grouping need a full view or
//! random access, so they drain their input into scratch storage before
//! yielding anything. The storage comes from a [`ScratchPool`] collaborator:
//! every combinator has an explicit `*_in(pool, ...)` form, and a
//! convenience form routed through the trivial [`AllocScratch`].
//!
//! Ownership rule: a buffer borrowed for a result (the sorted run, the group
//! table) is owned by the resulting sequence and released when that sequence
//! is disposed or dropped. A buffer borrowed only for the build step (the
//! group index, a probe set drained from the second operand) is released the
//! moment the step completes.
//!
//! Hash-based operations use the element type's `Eq + Hash` as their
//! equality; custom equality is expressed by keying (`group_by`, `join`) or
//! by wrapping elements in a key-extracting newtype before the operation.

use crate::context::{no_removal, Context};
use crate::pool::{AllocScratch, ScratchMap, ScratchPool, ScratchVec, ALLOC_SCRATCH};
use crate::slice::{Slice, SliceContext};
use crate::slinq::Slinq;
use smallvec::SmallVec;
use std::hash::Hash;

/// Context over a materialized buffer.
///
/// The buffer is stored back-to-front so that yielding is a plain `pop`:
/// elements move out without cloning and the drained prefix is freed as it
/// goes.
pub struct Buffered<'p, P: ScratchPool + ?Sized, T> {
    buf: ScratchVec<'p, P, T>,
}

impl<P: ScratchPool + ?Sized, T> Context for Buffered<'_, P, T> {
    type Item = T;

    fn advance(&mut self) -> Option<T> {
        self.buf.pop()
    }

    no_removal!("Buffered");

    fn dispose(&mut self) {
        self.buf.release();
    }
}

/// Context produced by [`Slinq::distinct_in`]: suppresses elements already
/// seen, tracked in a pooled set.
pub struct Distinct<'p, P: ScratchPool + ?Sized, C: Context>
where
    C::Item: Eq + Hash,
{
    chained: Slinq<C>,
    seen: ScratchMap<'p, P, C::Item, ()>,
}

impl<P: ScratchPool + ?Sized, C: Context> Context for Distinct<'_, P, C>
where
    C::Item: Eq + Hash + Clone,
{
    type Item = C::Item;

    fn advance(&mut self) -> Option<C::Item> {
        while let Some(item) = self.chained.next() {
            if self.seen.insert(item.clone(), ()).is_none() {
                return Some(item);
            }
        }
        None
    }

    no_removal!("Distinct");

    fn dispose(&mut self) {
        self.chained.dispose();
        self.seen.release();
    }
}

/// Context produced by [`Slinq::intersect_in`]: yields elements found in the
/// probe set built from the second operand, each at most once.
pub struct Intersect<'p, P: ScratchPool + ?Sized, C: Context>
where
    C::Item: Eq + Hash,
{
    chained: Slinq<C>,
    probe: ScratchMap<'p, P, C::Item, ()>,
}

impl<P: ScratchPool + ?Sized, C: Context> Context for Intersect<'_, P, C>
where
    C::Item: Eq + Hash,
{
    type Item = C::Item;

    fn advance(&mut self) -> Option<C::Item> {
        while let Some(item) = self.chained.next() {
            // Consuming the probe entry makes the output distinct.
            if self.probe.remove(&item).is_some() {
                return Some(item);
            }
        }
        None
    }

    no_removal!("Intersect");

    fn dispose(&mut self) {
        self.chained.dispose();
        self.probe.release();
    }
}

/// Context produced by [`Slinq::except_in`]: yields elements absent from the
/// probe set built from the second operand, each at most once.
pub struct Except<'p, P: ScratchPool + ?Sized, C: Context>
where
    C::Item: Eq + Hash,
{
    chained: Slinq<C>,
    probe: ScratchMap<'p, P, C::Item, ()>,
}

impl<P: ScratchPool + ?Sized, C: Context> Context for Except<'_, P, C>
where
    C::Item: Eq + Hash + Clone,
{
    type Item = C::Item;

    fn advance(&mut self) -> Option<C::Item> {
        while let Some(item) = self.chained.next() {
            if !self.probe.contains_key(&item) {
                self.probe.insert(item.clone(), ());
                return Some(item);
            }
        }
        None
    }

    no_removal!("Except");

    fn dispose(&mut self) {
        self.chained.dispose();
        self.probe.release();
    }
}

/// Context produced by [`Slinq::distinct_by_key_in`]: like [`Distinct`],
/// but equality is decided by an extracted key. This is the seam for custom
/// equality — two elements are duplicates iff their keys collide.
pub struct DistinctBy<'p, P: ScratchPool + ?Sized, C: Context, K: Eq + Hash, KF> {
    chained: Slinq<C>,
    key_fn: KF,
    seen: ScratchMap<'p, P, K, ()>,
}

impl<P, C, K, KF> Context for DistinctBy<'_, P, C, K, KF>
where
    P: ScratchPool + ?Sized,
    C: Context,
    K: Eq + Hash,
    KF: FnMut(&C::Item) -> K,
{
    type Item = C::Item;

    fn advance(&mut self) -> Option<C::Item> {
        while let Some(item) = self.chained.next() {
            let key = (self.key_fn)(&item);
            if self.seen.insert(key, ()).is_none() {
                return Some(item);
            }
        }
        None
    }

    no_removal!("DistinctBy");

    fn dispose(&mut self) {
        self.chained.dispose();
        self.seen.release();
    }
}

/// Context produced by [`Slinq::intersect_by_key_in`]: key-based
/// counterpart of [`Intersect`].
pub struct IntersectBy<'p, P: ScratchPool + ?Sized, C: Context, K: Eq + Hash, KF> {
    chained: Slinq<C>,
    key_fn: KF,
    probe: ScratchMap<'p, P, K, ()>,
}

impl<P, C, K, KF> Context for IntersectBy<'_, P, C, K, KF>
where
    P: ScratchPool + ?Sized,
    C: Context,
    K: Eq + Hash,
    KF: FnMut(&C::Item) -> K,
{
    type Item = C::Item;

    fn advance(&mut self) -> Option<C::Item> {
        while let Some(item) = self.chained.next() {
            let key = (self.key_fn)(&item);
            if self.probe.remove(&key).is_some() {
                return Some(item);
            }
        }
        None
    }

    no_removal!("IntersectBy");

    fn dispose(&mut self) {
        self.chained.dispose();
        self.probe.release();
    }
}

/// Context produced by [`Slinq::except_by_key_in`]: key-based counterpart
/// of [`Except`].
pub struct ExceptBy<'p, P: ScratchPool + ?Sized, C: Context, K: Eq + Hash, KF> {
    chained: Slinq<C>,
    key_fn: KF,
    probe: ScratchMap<'p, P, K, ()>,
}

impl<P, C, K, KF> Context for ExceptBy<'_, P, C, K, KF>
where
    P: ScratchPool + ?Sized,
    C: Context,
    K: Eq + Hash,
    KF: FnMut(&C::Item) -> K,
{
    type Item = C::Item;

    fn advance(&mut self) -> Option<C::Item> {
        while let Some(item) = self.chained.next() {
            let key = (self.key_fn)(&item);
            if !self.probe.contains_key(&key) {
                self.probe.insert(key, ());
                return Some(item);
            }
        }
        None
    }

    no_removal!("ExceptBy");

    fn dispose(&mut self) {
        self.chained.dispose();
        self.probe.release();
    }
}

/// One key and the elements that mapped to it, in encounter order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group<K, T> {
    key: K,
    items: SmallVec<[T; 4]>,
}

impl<K, T> Group<K, T> {
    /// The grouping key.
    #[inline]
    pub fn key(&self) -> &K {
        &self.key
    }

    /// The grouped elements in encounter order.
    #[inline]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<K, T: Clone> Group<K, T> {
    /// Opens a read-only sequence cursor over the grouped elements.
    #[inline]
    pub fn slinq(&self) -> Slinq<SliceContext<'_, T>> {
        Slice::from_slice(&self.items).slinq()
    }
}

/// Context produced by [`Slinq::join_in`]: streams the outer side against a
/// hash table built from the inner side.
pub struct Join<'p, P: ScratchPool + ?Sized, C: Context, K: Eq + Hash, B, OK, S> {
    outer: Slinq<C>,
    table: ScratchMap<'p, P, K, SmallVec<[B; 4]>>,
    outer_key: OK,
    selector: S,
    pending: Option<(C::Item, K, usize)>,
}

impl<P, C, K, B, OK, S, U> Context for Join<'_, P, C, K, B, OK, S>
where
    P: ScratchPool + ?Sized,
    C: Context,
    K: Eq + Hash,
    OK: FnMut(&C::Item) -> K,
    S: FnMut(&C::Item, &B) -> U,
{
    type Item = U;

    fn advance(&mut self) -> Option<U> {
        loop {
            if let Some((item, key, position)) = self.pending.as_mut() {
                if let Some(b) = self.table.get(key).and_then(|bs| bs.get(*position)) {
                    let out = (self.selector)(item, b);
                    *position += 1;
                    return Some(out);
                }
                self.pending = None;
            }
            let item = self.outer.next()?;
            let key = (self.outer_key)(&item);
            self.pending = Some((item, key, 0));
        }
    }

    no_removal!("Join");

    fn dispose(&mut self) {
        self.outer.dispose();
        self.table.release();
    }
}

/// Context produced by [`Slinq::group_join_in`]: one output per outer
/// element, paired with the (possibly empty) slice of matching inner
/// elements.
pub struct GroupJoin<'p, P: ScratchPool + ?Sized, C: Context, K: Eq + Hash, B, OK, S> {
    outer: Slinq<C>,
    table: ScratchMap<'p, P, K, SmallVec<[B; 4]>>,
    outer_key: OK,
    selector: S,
}

impl<P, C, K, B, OK, S, U> Context for GroupJoin<'_, P, C, K, B, OK, S>
where
    P: ScratchPool + ?Sized,
    C: Context,
    K: Eq + Hash,
    OK: FnMut(&C::Item) -> K,
    S: FnMut(C::Item, &[B]) -> U,
{
    type Item = U;

    fn advance(&mut self) -> Option<U> {
        let item = self.outer.next()?;
        let key = (self.outer_key)(&item);
        let matches = self.table.get(&key).map(|bs| bs.as_slice()).unwrap_or(&[]);
        Some((self.selector)(item, matches))
    }

    no_removal!("GroupJoin");

    fn dispose(&mut self) {
        self.outer.dispose();
        self.table.release();
    }
}

impl<C: Context> Slinq<C> {
    fn drain_into<'p, P>(mut self, pool: &'p P) -> ScratchVec<'p, P, C::Item>
    where
        P: ScratchPool + ?Sized,
    {
        let mut buf = ScratchVec::new(pool);
        while let Some(item) = self.next() {
            buf.push(item);
        }
        buf
    }

    /// Stable sort by a key, materialized into a scratch buffer from `pool`.
    ///
    /// Elements with equal keys keep their upstream relative order. The
    /// buffer is owned by the returned sequence and released on disposal.
    pub fn order_by_in<'p, P, K, KF>(self, pool: &'p P, mut key_fn: KF) -> Slinq<Buffered<'p, P, C::Item>>
    where
        P: ScratchPool + ?Sized,
        K: Ord,
        KF: FnMut(&C::Item) -> K,
    {
        let mut buf = self.drain_into(pool);
        buf.vec_mut().sort_by(|a, b| key_fn(a).cmp(&key_fn(b)));
        buf.vec_mut().reverse();
        Slinq::new(Buffered { buf })
    }

    /// Stable sort by a key. See [`Slinq::order_by_in`].
    #[inline]
    pub fn order_by<K, KF>(self, key_fn: KF) -> Slinq<Buffered<'static, AllocScratch, C::Item>>
    where
        K: Ord,
        KF: FnMut(&C::Item) -> K,
    {
        self.order_by_in(&ALLOC_SCRATCH, key_fn)
    }

    /// Stable descending sort by a key, materialized from `pool`.
    pub fn order_by_descending_in<'p, P, K, KF>(
        self,
        pool: &'p P,
        mut key_fn: KF,
    ) -> Slinq<Buffered<'p, P, C::Item>>
    where
        P: ScratchPool + ?Sized,
        K: Ord,
        KF: FnMut(&C::Item) -> K,
    {
        let mut buf = self.drain_into(pool);
        buf.vec_mut().sort_by(|a, b| key_fn(b).cmp(&key_fn(a)));
        buf.vec_mut().reverse();
        Slinq::new(Buffered { buf })
    }

    /// Stable descending sort by a key. See [`Slinq::order_by_descending_in`].
    #[inline]
    pub fn order_by_descending<K, KF>(
        self,
        key_fn: KF,
    ) -> Slinq<Buffered<'static, AllocScratch, C::Item>>
    where
        K: Ord,
        KF: FnMut(&C::Item) -> K,
    {
        self.order_by_descending_in(&ALLOC_SCRATCH, key_fn)
    }

    /// Stable sort by the elements' own order, materialized from `pool`.
    pub fn order_in<'p, P>(self, pool: &'p P) -> Slinq<Buffered<'p, P, C::Item>>
    where
        P: ScratchPool + ?Sized,
        C::Item: Ord,
    {
        let mut buf = self.drain_into(pool);
        buf.vec_mut().sort();
        buf.vec_mut().reverse();
        Slinq::new(Buffered { buf })
    }

    /// Stable sort by the elements' own order.
    #[inline]
    pub fn order(self) -> Slinq<Buffered<'static, AllocScratch, C::Item>>
    where
        C::Item: Ord,
    {
        self.order_in(&ALLOC_SCRATCH)
    }

    /// Stable descending sort by the elements' own order, materialized from
    /// `pool`.
    pub fn order_descending_in<'p, P>(self, pool: &'p P) -> Slinq<Buffered<'p, P, C::Item>>
    where
        P: ScratchPool + ?Sized,
        C::Item: Ord,
    {
        let mut buf = self.drain_into(pool);
        buf.vec_mut().sort_by(|a, b| b.cmp(a));
        buf.vec_mut().reverse();
        Slinq::new(Buffered { buf })
    }

    /// Stable descending sort by the elements' own order.
    #[inline]
    pub fn order_descending(self) -> Slinq<Buffered<'static, AllocScratch, C::Item>>
    where
        C::Item: Ord,
    {
        self.order_descending_in(&ALLOC_SCRATCH)
    }

    /// Reverses the sequence by materializing it from `pool`.
    ///
    /// Contexts with a native backward walk (vectors, chain lists) offer
    /// descending constructors instead, which reverse without materializing.
    pub fn reverse_in<'p, P>(self, pool: &'p P) -> Slinq<Buffered<'p, P, C::Item>>
    where
        P: ScratchPool + ?Sized,
    {
        let buf = self.drain_into(pool);
        Slinq::new(Buffered { buf })
    }

    /// Reverses the sequence by materializing it. See [`Slinq::reverse_in`].
    #[inline]
    pub fn reverse(self) -> Slinq<Buffered<'static, AllocScratch, C::Item>> {
        self.reverse_in(&ALLOC_SCRATCH)
    }

    /// Suppresses duplicate elements, tracking seen ones in a pooled set.
    #[inline]
    pub fn distinct_in<'p, P>(self, pool: &'p P) -> Slinq<Distinct<'p, P, C>>
    where
        P: ScratchPool + ?Sized,
        C::Item: Eq + Hash + Clone,
    {
        Slinq::new(Distinct {
            chained: self,
            seen: ScratchMap::new(pool),
        })
    }

    /// Suppresses duplicate elements. See [`Slinq::distinct_in`].
    #[inline]
    pub fn distinct(self) -> Slinq<Distinct<'static, AllocScratch, C>>
    where
        C::Item: Eq + Hash + Clone,
    {
        self.distinct_in(&ALLOC_SCRATCH)
    }

    /// Set union: all distinct elements of this sequence, then the distinct
    /// remainder of `other`.
    #[inline]
    pub fn union_in<'p, P, C2>(
        self,
        pool: &'p P,
        other: Slinq<C2>,
    ) -> Slinq<Distinct<'p, P, crate::lazy::Concat<C, C2>>>
    where
        P: ScratchPool + ?Sized,
        C2: Context<Item = C::Item>,
        C::Item: Eq + Hash + Clone,
    {
        self.concat(other).distinct_in(pool)
    }

    /// Set union. See [`Slinq::union_in`].
    #[inline]
    pub fn union_with<C2>(
        self,
        other: Slinq<C2>,
    ) -> Slinq<Distinct<'static, AllocScratch, crate::lazy::Concat<C, C2>>>
    where
        C2: Context<Item = C::Item>,
        C::Item: Eq + Hash + Clone,
    {
        self.union_in(&ALLOC_SCRATCH, other)
    }

    /// Set intersection: distinct elements of this sequence also produced by
    /// `other`. The second operand is drained eagerly into a probe set.
    pub fn intersect_in<'p, P, C2>(self, pool: &'p P, other: Slinq<C2>) -> Slinq<Intersect<'p, P, C>>
    where
        P: ScratchPool + ?Sized,
        C2: Context<Item = C::Item>,
        C::Item: Eq + Hash,
    {
        let mut probe = ScratchMap::new(pool);
        let mut other = other;
        while let Some(item) = other.next() {
            probe.insert(item, ());
        }
        other.dispose();
        Slinq::new(Intersect {
            chained: self,
            probe,
        })
    }

    /// Set intersection. See [`Slinq::intersect_in`].
    #[inline]
    pub fn intersect_with<C2>(self, other: Slinq<C2>) -> Slinq<Intersect<'static, AllocScratch, C>>
    where
        C2: Context<Item = C::Item>,
        C::Item: Eq + Hash,
    {
        self.intersect_in(&ALLOC_SCRATCH, other)
    }

    /// Set difference: distinct elements of this sequence not produced by
    /// `other`. The second operand is drained eagerly into a probe set.
    pub fn except_in<'p, P, C2>(self, pool: &'p P, other: Slinq<C2>) -> Slinq<Except<'p, P, C>>
    where
        P: ScratchPool + ?Sized,
        C2: Context<Item = C::Item>,
        C::Item: Eq + Hash + Clone,
    {
        let mut probe = ScratchMap::new(pool);
        let mut other = other;
        while let Some(item) = other.next() {
            probe.insert(item, ());
        }
        other.dispose();
        Slinq::new(Except {
            chained: self,
            probe,
        })
    }

    /// Set difference. See [`Slinq::except_in`].
    #[inline]
    pub fn except_with<C2>(self, other: Slinq<C2>) -> Slinq<Except<'static, AllocScratch, C>>
    where
        C2: Context<Item = C::Item>,
        C::Item: Eq + Hash + Clone,
    {
        self.except_in(&ALLOC_SCRATCH, other)
    }

    /// Suppresses elements whose extracted key was already seen. The first
    /// element of each key survives.
    #[inline]
    pub fn distinct_by_key_in<'p, P, K, KF>(
        self,
        pool: &'p P,
        key_fn: KF,
    ) -> Slinq<DistinctBy<'p, P, C, K, KF>>
    where
        P: ScratchPool + ?Sized,
        K: Eq + Hash,
        KF: FnMut(&C::Item) -> K,
    {
        Slinq::new(DistinctBy {
            chained: self,
            key_fn,
            seen: ScratchMap::new(pool),
        })
    }

    /// Suppresses elements by key. See [`Slinq::distinct_by_key_in`].
    #[inline]
    pub fn distinct_by_key<K, KF>(
        self,
        key_fn: KF,
    ) -> Slinq<DistinctBy<'static, AllocScratch, C, K, KF>>
    where
        K: Eq + Hash,
        KF: FnMut(&C::Item) -> K,
    {
        self.distinct_by_key_in(&ALLOC_SCRATCH, key_fn)
    }

    /// Key-based set intersection: elements of this sequence whose key also
    /// occurs in `other`, each key at most once.
    pub fn intersect_by_key_in<'p, P, C2, K, KF>(
        self,
        pool: &'p P,
        other: Slinq<C2>,
        mut key_fn: KF,
    ) -> Slinq<IntersectBy<'p, P, C, K, KF>>
    where
        P: ScratchPool + ?Sized,
        C2: Context<Item = C::Item>,
        K: Eq + Hash,
        KF: FnMut(&C::Item) -> K,
    {
        let mut probe = ScratchMap::new(pool);
        let mut other = other;
        while let Some(item) = other.next() {
            probe.insert(key_fn(&item), ());
        }
        other.dispose();
        Slinq::new(IntersectBy {
            chained: self,
            key_fn,
            probe,
        })
    }

    /// Key-based set intersection. See [`Slinq::intersect_by_key_in`].
    #[inline]
    pub fn intersect_by_key<C2, K, KF>(
        self,
        other: Slinq<C2>,
        key_fn: KF,
    ) -> Slinq<IntersectBy<'static, AllocScratch, C, K, KF>>
    where
        C2: Context<Item = C::Item>,
        K: Eq + Hash,
        KF: FnMut(&C::Item) -> K,
    {
        self.intersect_by_key_in(&ALLOC_SCRATCH, other, key_fn)
    }

    /// Key-based set difference: elements of this sequence whose key does
    /// not occur in `other`, each key at most once.
    pub fn except_by_key_in<'p, P, C2, K, KF>(
        self,
        pool: &'p P,
        other: Slinq<C2>,
        mut key_fn: KF,
    ) -> Slinq<ExceptBy<'p, P, C, K, KF>>
    where
        P: ScratchPool + ?Sized,
        C2: Context<Item = C::Item>,
        K: Eq + Hash,
        KF: FnMut(&C::Item) -> K,
    {
        let mut probe = ScratchMap::new(pool);
        let mut other = other;
        while let Some(item) = other.next() {
            probe.insert(key_fn(&item), ());
        }
        other.dispose();
        Slinq::new(ExceptBy {
            chained: self,
            key_fn,
            probe,
        })
    }

    /// Key-based set difference. See [`Slinq::except_by_key_in`].
    #[inline]
    pub fn except_by_key<C2, K, KF>(
        self,
        other: Slinq<C2>,
        key_fn: KF,
    ) -> Slinq<ExceptBy<'static, AllocScratch, C, K, KF>>
    where
        C2: Context<Item = C::Item>,
        K: Eq + Hash,
        KF: FnMut(&C::Item) -> K,
    {
        self.except_by_key_in(&ALLOC_SCRATCH, other, key_fn)
    }

    /// Key-based set union: distinct-by-key elements of this sequence, then
    /// the distinct-by-key remainder of `other`.
    #[inline]
    pub fn union_by_key_in<'p, P, C2, K, KF>(
        self,
        pool: &'p P,
        other: Slinq<C2>,
        key_fn: KF,
    ) -> Slinq<DistinctBy<'p, P, crate::lazy::Concat<C, C2>, K, KF>>
    where
        P: ScratchPool + ?Sized,
        C2: Context<Item = C::Item>,
        K: Eq + Hash,
        KF: FnMut(&C::Item) -> K,
    {
        self.concat(other).distinct_by_key_in(pool, key_fn)
    }

    /// Key-based set union. See [`Slinq::union_by_key_in`].
    #[inline]
    pub fn union_by_key<C2, K, KF>(
        self,
        other: Slinq<C2>,
        key_fn: KF,
    ) -> Slinq<DistinctBy<'static, AllocScratch, crate::lazy::Concat<C, C2>, K, KF>>
    where
        C2: Context<Item = C::Item>,
        K: Eq + Hash,
        KF: FnMut(&C::Item) -> K,
    {
        self.union_by_key_in(&ALLOC_SCRATCH, other, key_fn)
    }

    /// Groups elements by key into [`Group`]s, in first-occurrence key
    /// order.
    ///
    /// The group table is owned by the returned sequence; the key index used
    /// during the build is released as soon as the build completes.
    pub fn group_by_in<'p, P, K, KF>(
        mut self,
        pool: &'p P,
        mut key_fn: KF,
    ) -> Slinq<Buffered<'p, P, Group<K, C::Item>>>
    where
        P: ScratchPool + ?Sized,
        K: Eq + Hash + Clone,
        KF: FnMut(&C::Item) -> K,
    {
        let mut groups: ScratchVec<'p, P, Group<K, C::Item>> = ScratchVec::new(pool);
        {
            let mut index: ScratchMap<'_, P, K, usize> = ScratchMap::new(pool);
            while let Some(item) = self.next() {
                let key = key_fn(&item);
                match index.get(&key).copied() {
                    Some(slot) => groups.vec_mut()[slot].items.push(item),
                    None => {
                        index.insert(key.clone(), groups.len());
                        let mut items = SmallVec::new();
                        items.push(item);
                        groups.push(Group { key, items });
                    }
                }
            }
        }
        groups.vec_mut().reverse();
        Slinq::new(Buffered { buf: groups })
    }

    /// Groups elements by key. See [`Slinq::group_by_in`].
    #[inline]
    pub fn group_by<K, KF>(
        self,
        key_fn: KF,
    ) -> Slinq<Buffered<'static, AllocScratch, Group<K, C::Item>>>
    where
        K: Eq + Hash + Clone,
        KF: FnMut(&C::Item) -> K,
    {
        self.group_by_in(&ALLOC_SCRATCH, key_fn)
    }

    /// Hash join: pairs every outer element with every inner element
    /// sharing its key, in outer order. The inner side is drained eagerly
    /// into a hash table owned by the returned sequence.
    pub fn join_in<'p, P, C2, K, OK, IK, S, U>(
        self,
        pool: &'p P,
        other: Slinq<C2>,
        outer_key: OK,
        mut inner_key: IK,
        selector: S,
    ) -> Slinq<Join<'p, P, C, K, C2::Item, OK, S>>
    where
        P: ScratchPool + ?Sized,
        C2: Context,
        K: Eq + Hash,
        OK: FnMut(&C::Item) -> K,
        IK: FnMut(&C2::Item) -> K,
        S: FnMut(&C::Item, &C2::Item) -> U,
    {
        let mut table: ScratchMap<'p, P, K, SmallVec<[C2::Item; 4]>> = ScratchMap::new(pool);
        let mut other = other;
        while let Some(item) = other.next() {
            let key = inner_key(&item);
            table.map_mut().entry(key).or_default().push(item);
        }
        other.dispose();
        Slinq::new(Join {
            outer: self,
            table,
            outer_key,
            selector,
            pending: None,
        })
    }

    /// Hash join. See [`Slinq::join_in`].
    #[inline]
    pub fn join_with<C2, K, OK, IK, S, U>(
        self,
        other: Slinq<C2>,
        outer_key: OK,
        inner_key: IK,
        selector: S,
    ) -> Slinq<Join<'static, AllocScratch, C, K, C2::Item, OK, S>>
    where
        C2: Context,
        K: Eq + Hash,
        OK: FnMut(&C::Item) -> K,
        IK: FnMut(&C2::Item) -> K,
        S: FnMut(&C::Item, &C2::Item) -> U,
    {
        self.join_in(&ALLOC_SCRATCH, other, outer_key, inner_key, selector)
    }

    /// Grouped hash join: one output per outer element, built from the
    /// element and the (possibly empty) slice of key-matching inner
    /// elements.
    pub fn group_join_in<'p, P, C2, K, OK, IK, S, U>(
        self,
        pool: &'p P,
        other: Slinq<C2>,
        outer_key: OK,
        mut inner_key: IK,
        selector: S,
    ) -> Slinq<GroupJoin<'p, P, C, K, C2::Item, OK, S>>
    where
        P: ScratchPool + ?Sized,
        C2: Context,
        K: Eq + Hash,
        OK: FnMut(&C::Item) -> K,
        IK: FnMut(&C2::Item) -> K,
        S: FnMut(C::Item, &[C2::Item]) -> U,
    {
        let mut table: ScratchMap<'p, P, K, SmallVec<[C2::Item; 4]>> = ScratchMap::new(pool);
        let mut other = other;
        while let Some(item) = other.next() {
            let key = inner_key(&item);
            table.map_mut().entry(key).or_default().push(item);
        }
        other.dispose();
        Slinq::new(GroupJoin {
            outer: self,
            table,
            outer_key,
            selector,
        })
    }

    /// Grouped hash join. See [`Slinq::group_join_in`].
    #[inline]
    pub fn group_join_with<C2, K, OK, IK, S, U>(
        self,
        other: Slinq<C2>,
        outer_key: OK,
        inner_key: IK,
        selector: S,
    ) -> Slinq<GroupJoin<'static, AllocScratch, C, K, C2::Item, OK, S>>
    where
        C2: Context,
        K: Eq + Hash,
        OK: FnMut(&C::Item) -> K,
        IK: FnMut(&C2::Item) -> K,
        S: FnMut(C::Item, &[C2::Item]) -> U,
    {
        self.group_join_in(&ALLOC_SCRATCH, other, outer_key, inner_key, selector)
    }
}
