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

//! # The Sequence Value
//!
//! [`Slinq<C>`] pairs a [`Context`] cursor with a one-element lookahead
//! slot. Pulling is strictly on demand: nothing is read from the backing
//! store until something downstream asks, and nothing is ever read twice. A
//! sequence is single-pass and not restartable — re-enumeration means
//! rebuilding from the backing store.
//!
//! The lookahead slot exists for the operations that need a loaded cursor:
//! [`Slinq::skip`] and [`Slinq::skip_while`] leave the cursor *on* the first
//! kept element, which is what lets them compose with the removal operations
//! ([`Slinq::remove_n`], [`Slinq::remove_while`]) without re-reading.
//!
//! Lifecycle: `Ready → (advance)* → Exhausted`, with `Disposed` as an
//! absorbing state reachable from anywhere via [`Slinq::dispose`]. Once
//! disposed, [`Slinq::next`] reports `None` forever. Dropping a sequence
//! mid-iteration is equivalent to disposal: contexts holding pooled buffers
//! release them through RAII.
//!
//! Lazy combinators live in [`crate::lazy`], materializing (pool-backed)
//! combinators in [`crate::materialize`]; this module holds the sequence
//! value itself, its removal surface, and the terminal consumers.

use crate::context::{Context, RemoveUnsupported, SingleContext, VecContext};
use num_traits::{ToPrimitive, Zero};
use rustc_hash::FxHashMap;
use std::hash::Hash;
use std::iter::FusedIterator;

/// A lazy, single-pass sequence bound to a context cursor.
pub struct Slinq<C: Context> {
    context: C,
    current: Option<C::Item>,
    disposed: bool,
}

impl<C: Context> Slinq<C> {
    /// Binds a sequence to a context. No element is pulled yet.
    #[inline]
    pub fn new(context: C) -> Self {
        Self {
            context,
            current: None,
            disposed: false,
        }
    }

    /// Produces the next element, or `None` when exhausted or disposed.
    ///
    /// Exhaustion is idempotent: once this returns `None`, it keeps
    /// returning `None`.
    #[inline]
    pub fn next(&mut self) -> Option<C::Item> {
        if self.disposed {
            return None;
        }
        match self.current.take() {
            Some(item) => Some(item),
            None => self.context.advance(),
        }
    }

    /// Loads the lookahead slot if it is empty and the sequence is live.
    fn reload(&mut self) {
        if !self.disposed && self.current.is_none() {
            self.current = self.context.advance();
        }
    }

    /// Peeks at the next element without consuming it.
    #[inline]
    pub fn peek(&mut self) -> Option<&C::Item> {
        self.reload();
        self.current.as_ref()
    }

    /// Advances past the next `n` elements, leaving the cursor on the first
    /// kept element. Stops early at exhaustion.
    pub fn skip(mut self, n: usize) -> Self {
        self.reload();
        for _ in 0..n {
            if self.current.is_none() {
                break;
            }
            self.current = self.context.advance();
        }
        self
    }

    /// Advances past elements while `pred` holds, leaving the cursor on the
    /// first element that failed the predicate.
    pub fn skip_while<F>(mut self, mut pred: F) -> Self
    where
        F: FnMut(&C::Item) -> bool,
    {
        self.reload();
        while let Some(item) = self.current.as_ref() {
            if !pred(item) {
                break;
            }
            self.current = self.context.advance();
        }
        self
    }

    /// Removes the element under the cursor from the backing store.
    ///
    /// "Under the cursor" means the element most recently produced — either
    /// handed out by [`Slinq::next`] or loaded by `skip`/`peek`. The cursor
    /// moves onto the removed element's successor. A no-op when nothing has
    /// been produced yet or the sequence is exhausted or disposed.
    ///
    /// # Errors
    ///
    /// Returns [`RemoveUnsupported`] when the context cannot mutate its
    /// backing store.
    pub fn remove(&mut self) -> Result<(), RemoveUnsupported> {
        if self.disposed {
            return Ok(());
        }
        self.current = self.context.remove_current()?;
        Ok(())
    }

    /// Removes the next `n` not-yet-consumed elements, stopping early at
    /// exhaustion. Returns the sequence for further chaining.
    ///
    /// # Errors
    ///
    /// Returns [`RemoveUnsupported`] when the context cannot mutate its
    /// backing store; elements removed before the error stay removed.
    pub fn remove_n(mut self, n: usize) -> Result<Self, RemoveUnsupported> {
        for _ in 0..n {
            self.reload();
            if self.current.is_none() {
                break;
            }
            self.current = self.context.remove_current()?;
        }
        Ok(self)
    }

    /// Removes not-yet-consumed elements while `pred` holds, stopping at the
    /// first element that fails the predicate (which stays in the store and
    /// on the cursor).
    ///
    /// # Errors
    ///
    /// Returns [`RemoveUnsupported`] when the context cannot mutate its
    /// backing store.
    pub fn remove_while<F>(mut self, mut pred: F) -> Result<Self, RemoveUnsupported>
    where
        F: FnMut(&C::Item) -> bool,
    {
        loop {
            self.reload();
            match self.current.as_ref() {
                Some(item) if pred(item) => {
                    self.current = self.context.remove_current()?;
                }
                _ => break,
            }
        }
        Ok(self)
    }

    /// Releases resources held by the context chain and pins the sequence to
    /// exhaustion. Idempotent; also triggered by dropping the sequence.
    pub fn dispose(&mut self) {
        if !self.disposed {
            self.disposed = true;
            self.current = None;
            self.context.dispose();
        }
    }

    /// Bridges the sequence into the standard iterator ecosystem.
    #[inline]
    pub fn iter(self) -> SlinqIter<C> {
        SlinqIter { seq: self }
    }

    // ----- terminal consumers -------------------------------------------

    /// Drains the sequence into a vector.
    pub fn to_vec(mut self) -> Vec<C::Item> {
        let mut out = Vec::new();
        while let Some(item) = self.next() {
            out.push(item);
        }
        out
    }

    /// Drains the sequence into an existing vector, preserving its contents.
    pub fn collect_into(mut self, out: &mut Vec<C::Item>) {
        while let Some(item) = self.next() {
            out.push(item);
        }
    }

    /// Drains the sequence into a map keyed by `key_fn`. When two elements
    /// share a key, the later one wins.
    pub fn to_map<K, F>(mut self, mut key_fn: F) -> FxHashMap<K, C::Item>
    where
        K: Eq + Hash,
        F: FnMut(&C::Item) -> K,
    {
        let mut map = FxHashMap::default();
        while let Some(item) = self.next() {
            map.insert(key_fn(&item), item);
        }
        map
    }

    /// Number of elements remaining in the sequence.
    pub fn count(mut self) -> usize {
        let mut n = 0;
        while self.next().is_some() {
            n += 1;
        }
        n
    }

    /// `true` when the sequence has no further element.
    #[inline]
    pub fn is_empty(mut self) -> bool {
        self.next().is_none()
    }

    /// `true` when any element satisfies `pred`. Stops at the first hit.
    pub fn any<F>(mut self, mut pred: F) -> bool
    where
        F: FnMut(&C::Item) -> bool,
    {
        while let Some(item) = self.next() {
            if pred(&item) {
                return true;
            }
        }
        false
    }

    /// `true` when every element satisfies `pred`. Stops at the first miss.
    pub fn all<F>(mut self, mut pred: F) -> bool
    where
        F: FnMut(&C::Item) -> bool,
    {
        while let Some(item) = self.next() {
            if !pred(&item) {
                return false;
            }
        }
        true
    }

    /// `true` when the sequence produces an element equal to `needle`.
    pub fn contains(mut self, needle: &C::Item) -> bool
    where
        C::Item: PartialEq,
    {
        while let Some(item) = self.next() {
            if &item == needle {
                return true;
            }
        }
        false
    }

    /// First element, or `None` on an empty sequence.
    #[inline]
    pub fn first_or_none(mut self) -> Option<C::Item> {
        self.next()
    }

    /// First element satisfying `pred`.
    pub fn first_or_none_by<F>(mut self, mut pred: F) -> Option<C::Item>
    where
        F: FnMut(&C::Item) -> bool,
    {
        while let Some(item) = self.next() {
            if pred(&item) {
                return Some(item);
            }
        }
        None
    }

    /// Last element, or `None` on an empty sequence.
    pub fn last_or_none(mut self) -> Option<C::Item> {
        let mut last = None;
        while let Some(item) = self.next() {
            last = Some(item);
        }
        last
    }

    /// Last element satisfying `pred`.
    pub fn last_or_none_by<F>(mut self, mut pred: F) -> Option<C::Item>
    where
        F: FnMut(&C::Item) -> bool,
    {
        let mut last = None;
        while let Some(item) = self.next() {
            if pred(&item) {
                last = Some(item);
            }
        }
        last
    }

    /// The only element of the sequence, or `None` when the sequence is
    /// empty or holds more than one element.
    pub fn single_or_none(mut self) -> Option<C::Item> {
        let first = self.next()?;
        match self.next() {
            Some(_) => None,
            None => Some(first),
        }
    }

    /// The only element satisfying `pred`, or `None` on zero or multiple
    /// matches.
    pub fn single_or_none_by<F>(mut self, mut pred: F) -> Option<C::Item>
    where
        F: FnMut(&C::Item) -> bool,
    {
        let mut found = None;
        while let Some(item) = self.next() {
            if pred(&item) {
                if found.is_some() {
                    return None;
                }
                found = Some(item);
            }
        }
        found
    }

    /// Greatest element, or `None` on an empty sequence. Ties keep the
    /// earliest element.
    pub fn max_or_none(mut self) -> Option<C::Item>
    where
        C::Item: Ord,
    {
        let mut best = self.next()?;
        while let Some(item) = self.next() {
            if item > best {
                best = item;
            }
        }
        Some(best)
    }

    /// Smallest element, or `None` on an empty sequence. Ties keep the
    /// earliest element.
    pub fn min_or_none(mut self) -> Option<C::Item>
    where
        C::Item: Ord,
    {
        let mut best = self.next()?;
        while let Some(item) = self.next() {
            if item < best {
                best = item;
            }
        }
        Some(best)
    }

    /// Greatest element.
    ///
    /// # Panics
    ///
    /// Panics on an empty sequence; use [`Slinq::max_or_none`] for the
    /// recoverable form.
    #[inline]
    pub fn max(self) -> C::Item
    where
        C::Item: Ord,
    {
        self.max_or_none()
            .expect("called `Slinq::max` on an empty sequence")
    }

    /// Smallest element.
    ///
    /// # Panics
    ///
    /// Panics on an empty sequence; use [`Slinq::min_or_none`] for the
    /// recoverable form.
    #[inline]
    pub fn min(self) -> C::Item
    where
        C::Item: Ord,
    {
        self.min_or_none()
            .expect("called `Slinq::min` on an empty sequence")
    }

    /// Element with the greatest key, or `None` on an empty sequence. Ties
    /// keep the earliest element.
    pub fn max_by_key<K, F>(mut self, mut key_fn: F) -> Option<C::Item>
    where
        K: Ord,
        F: FnMut(&C::Item) -> K,
    {
        let first = self.next()?;
        let mut best_key = key_fn(&first);
        let mut best = first;
        while let Some(item) = self.next() {
            let key = key_fn(&item);
            if key > best_key {
                best_key = key;
                best = item;
            }
        }
        Some(best)
    }

    /// Element with the smallest key, or `None` on an empty sequence. Ties
    /// keep the earliest element.
    pub fn min_by_key<K, F>(mut self, mut key_fn: F) -> Option<C::Item>
    where
        K: Ord,
        F: FnMut(&C::Item) -> K,
    {
        let first = self.next()?;
        let mut best_key = key_fn(&first);
        let mut best = first;
        while let Some(item) = self.next() {
            let key = key_fn(&item);
            if key < best_key {
                best_key = key;
                best = item;
            }
        }
        Some(best)
    }

    /// Sum of all elements; zero on an empty sequence.
    pub fn sum(mut self) -> C::Item
    where
        C::Item: Zero,
    {
        let mut acc = C::Item::zero();
        while let Some(item) = self.next() {
            acc = acc + item;
        }
        acc
    }

    /// Arithmetic mean of all elements as `f64`, or `None` on an empty
    /// sequence or when an element is not representable as `f64`.
    pub fn average_or_none(mut self) -> Option<f64>
    where
        C::Item: ToPrimitive,
    {
        let mut sum = 0.0f64;
        let mut count = 0usize;
        while let Some(item) = self.next() {
            sum += item.to_f64()?;
            count += 1;
        }
        if count == 0 {
            None
        } else {
            Some(sum / count as f64)
        }
    }

    /// Strict left fold over the whole sequence.
    pub fn aggregate<A, F>(mut self, seed: A, mut fold: F) -> A
    where
        F: FnMut(A, C::Item) -> A,
    {
        let mut acc = seed;
        while let Some(item) = self.next() {
            acc = fold(acc, item);
        }
        acc
    }

    /// Strict left fold followed by a final projection of the accumulator.
    #[inline]
    pub fn aggregate_select<A, U, F, S>(self, seed: A, fold: F, selector: S) -> U
    where
        F: FnMut(A, C::Item) -> A,
        S: FnOnce(A) -> U,
    {
        selector(self.aggregate(seed, fold))
    }

    /// Left fold that stops early the first time `fold` declines.
    ///
    /// Returns the last accepted accumulator — the seed when `fold` declined
    /// immediately. The element that triggered the stop is consumed.
    pub fn aggregate_while<A, F>(mut self, seed: A, mut fold: F) -> A
    where
        A: Clone,
        F: FnMut(A, C::Item) -> Option<A>,
    {
        let mut acc = seed;
        while let Some(item) = self.next() {
            match fold(acc.clone(), item) {
                Some(next) => acc = next,
                None => break,
            }
        }
        acc
    }

    /// `true` when both sequences produce equal elements in the same order
    /// and exhaust together.
    pub fn sequence_equal<C2>(mut self, mut other: Slinq<C2>) -> bool
    where
        C2: Context<Item = C::Item>,
        C::Item: PartialEq,
    {
        loop {
            match (self.next(), other.next()) {
                (None, None) => return true,
                (Some(a), Some(b)) if a == b => continue,
                _ => return false,
            }
        }
    }

    /// Runs `f` on every remaining element.
    pub fn for_each<F>(mut self, mut f: F)
    where
        F: FnMut(C::Item),
    {
        while let Some(item) = self.next() {
            f(item);
        }
    }
}

impl<T> Slinq<SingleContext<T>> {
    /// Sequence producing exactly one element.
    #[inline]
    pub fn once(value: T) -> Self {
        Slinq::new(SingleContext::new(Some(value)))
    }

    /// Sequence producing the contained element, if any.
    #[inline]
    pub fn from_option(value: Option<T>) -> Self {
        Slinq::new(SingleContext::new(value))
    }

    /// Sequence producing nothing.
    #[inline]
    pub fn empty() -> Self {
        Slinq::new(SingleContext::new(None))
    }
}

/// Iterator bridge returned by [`Slinq::iter`].
pub struct SlinqIter<C: Context> {
    seq: Slinq<C>,
}

impl<C: Context> Iterator for SlinqIter<C> {
    type Item = C::Item;

    #[inline]
    fn next(&mut self) -> Option<C::Item> {
        self.seq.next()
    }
}

impl<C: Context> FusedIterator for SlinqIter<C> {}

impl<C: Context> IntoIterator for Slinq<C> {
    type Item = C::Item;
    type IntoIter = SlinqIter<C>;

    #[inline]
    fn into_iter(self) -> SlinqIter<C> {
        self.iter()
    }
}

/// Entry point opening removable sequences over vectors.
///
/// The sequence borrows the vector mutably for its whole lifetime, which is
/// what makes mid-iteration removal sound. Read-only iteration over a vector
/// goes through [`crate::slice::SliceSlinq`] instead.
pub trait VecSlinq<T: Clone> {
    /// Opens a removable ascending sequence cursor.
    fn slinq_mut(&mut self) -> Slinq<VecContext<'_, T>>;

    /// Opens a removable descending sequence cursor.
    fn slinq_mut_descending(&mut self) -> Slinq<VecContext<'_, T>>;
}

impl<T: Clone> VecSlinq<T> for Vec<T> {
    #[inline]
    fn slinq_mut(&mut self) -> Slinq<VecContext<'_, T>> {
        Slinq::new(VecContext::ascending(self))
    }

    #[inline]
    fn slinq_mut_descending(&mut self) -> Slinq<VecContext<'_, T>> {
        Slinq::new(VecContext::descending(self))
    }
}
