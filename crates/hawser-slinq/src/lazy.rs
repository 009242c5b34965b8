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

//! # Lazy Combinators
//!
//! Every combinator here returns a new sequence whose context wraps the
//! upstream sequence; no element is computed until something downstream
//! pulls. One downstream pull triggers at most the necessary upstream pulls:
//! `filter` and `flatten` skip ahead until a match, `take` stops pulling the
//! moment its budget is spent, and the zip family pulls one element per side
//! per step.
//!
//! Composite contexts do not support removal — removal is a capability of
//! the storage-backed contexts, composed through `skip`/`skip_while` (which
//! keep the sequence type). Disposal cascades through the wrapped sequence,
//! so pooled buffers held anywhere upstream are released.

use crate::context::{no_removal, Context};
use crate::slinq::Slinq;

/// Context produced by [`Slinq::select`].
pub struct Select<C: Context, F> {
    chained: Slinq<C>,
    selector: F,
}

impl<C: Context, U, F: FnMut(C::Item) -> U> Context for Select<C, F> {
    type Item = U;

    fn advance(&mut self) -> Option<U> {
        self.chained.next().map(&mut self.selector)
    }

    no_removal!("Select");

    fn dispose(&mut self) {
        self.chained.dispose();
    }
}

/// Context produced by [`Slinq::filter`].
pub struct Filter<C: Context, F> {
    chained: Slinq<C>,
    pred: F,
}

impl<C: Context, F: FnMut(&C::Item) -> bool> Context for Filter<C, F> {
    type Item = C::Item;

    fn advance(&mut self) -> Option<C::Item> {
        while let Some(item) = self.chained.next() {
            if (self.pred)(&item) {
                return Some(item);
            }
        }
        None
    }

    no_removal!("Filter");

    fn dispose(&mut self) {
        self.chained.dispose();
    }
}

/// Context produced by [`Slinq::flatten`] and [`Slinq::select_many`].
pub struct Flatten<C, C2>
where
    C2: Context,
    C: Context<Item = Slinq<C2>>,
{
    outer: Slinq<C>,
    inner: Option<Slinq<C2>>,
}

impl<C, C2> Context for Flatten<C, C2>
where
    C2: Context,
    C: Context<Item = Slinq<C2>>,
{
    type Item = C2::Item;

    fn advance(&mut self) -> Option<C2::Item> {
        loop {
            if let Some(inner) = self.inner.as_mut() {
                if let Some(item) = inner.next() {
                    return Some(item);
                }
                self.inner = None;
            }
            match self.outer.next() {
                Some(seq) => self.inner = Some(seq),
                None => return None,
            }
        }
    }

    no_removal!("Flatten");

    fn dispose(&mut self) {
        if let Some(mut inner) = self.inner.take() {
            inner.dispose();
        }
        self.outer.dispose();
    }
}

/// Context produced by [`Slinq::concat`].
pub struct Concat<C1: Context, C2: Context<Item = C1::Item>> {
    first: Slinq<C1>,
    second: Slinq<C2>,
    on_second: bool,
}

impl<C1: Context, C2: Context<Item = C1::Item>> Context for Concat<C1, C2> {
    type Item = C1::Item;

    fn advance(&mut self) -> Option<C1::Item> {
        if !self.on_second {
            if let Some(item) = self.first.next() {
                return Some(item);
            }
            self.on_second = true;
        }
        self.second.next()
    }

    no_removal!("Concat");

    fn dispose(&mut self) {
        self.first.dispose();
        self.second.dispose();
    }
}

/// Context produced by [`Slinq::zip`].
pub struct Zip<C1: Context, C2: Context> {
    left: Slinq<C1>,
    right: Slinq<C2>,
}

impl<C1: Context, C2: Context> Context for Zip<C1, C2> {
    type Item = (C1::Item, C2::Item);

    fn advance(&mut self) -> Option<(C1::Item, C2::Item)> {
        let a = self.left.next()?;
        let b = self.right.next()?;
        Some((a, b))
    }

    no_removal!("Zip");

    fn dispose(&mut self) {
        self.left.dispose();
        self.right.dispose();
    }
}

/// Context produced by [`Slinq::zip_with`].
pub struct ZipWith<C1: Context, C2: Context, F> {
    left: Slinq<C1>,
    right: Slinq<C2>,
    selector: F,
}

impl<C1: Context, C2: Context, U, F> Context for ZipWith<C1, C2, F>
where
    F: FnMut(C1::Item, C2::Item) -> U,
{
    type Item = U;

    fn advance(&mut self) -> Option<U> {
        let a = self.left.next()?;
        let b = self.right.next()?;
        Some((self.selector)(a, b))
    }

    no_removal!("ZipWith");

    fn dispose(&mut self) {
        self.left.dispose();
        self.right.dispose();
    }
}

/// Context produced by [`Slinq::zip_all`]: runs to the longer side, padding
/// the shorter one with `None`.
pub struct ZipAll<C1: Context, C2: Context> {
    left: Slinq<C1>,
    right: Slinq<C2>,
    done: bool,
}

impl<C1: Context, C2: Context> Context for ZipAll<C1, C2> {
    type Item = (Option<C1::Item>, Option<C2::Item>);

    fn advance(&mut self) -> Option<(Option<C1::Item>, Option<C2::Item>)> {
        if self.done {
            return None;
        }
        let a = self.left.next();
        let b = self.right.next();
        if a.is_none() && b.is_none() {
            self.done = true;
            None
        } else {
            Some((a, b))
        }
    }

    no_removal!("ZipAll");

    fn dispose(&mut self) {
        self.left.dispose();
        self.right.dispose();
    }
}

/// Context produced by [`Slinq::zip_all_with`].
pub struct ZipAllWith<C1: Context, C2: Context, F> {
    left: Slinq<C1>,
    right: Slinq<C2>,
    selector: F,
    done: bool,
}

impl<C1: Context, C2: Context, U, F> Context for ZipAllWith<C1, C2, F>
where
    F: FnMut(Option<C1::Item>, Option<C2::Item>) -> U,
{
    type Item = U;

    fn advance(&mut self) -> Option<U> {
        if self.done {
            return None;
        }
        let a = self.left.next();
        let b = self.right.next();
        if a.is_none() && b.is_none() {
            self.done = true;
            None
        } else {
            Some((self.selector)(a, b))
        }
    }

    no_removal!("ZipAllWith");

    fn dispose(&mut self) {
        self.left.dispose();
        self.right.dispose();
    }
}

/// Context produced by [`Slinq::zip_with_index`].
pub struct ZipWithIndex<C: Context> {
    chained: Slinq<C>,
    index: usize,
}

impl<C: Context> Context for ZipWithIndex<C> {
    type Item = (C::Item, usize);

    fn advance(&mut self) -> Option<(C::Item, usize)> {
        let item = self.chained.next()?;
        let index = self.index;
        self.index += 1;
        Some((item, index))
    }

    no_removal!("ZipWithIndex");

    fn dispose(&mut self) {
        self.chained.dispose();
    }
}

/// Context produced by [`Slinq::take`].
pub struct Take<C: Context> {
    chained: Slinq<C>,
    remaining: usize,
}

impl<C: Context> Context for Take<C> {
    type Item = C::Item;

    fn advance(&mut self) -> Option<C::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        self.chained.next()
    }

    no_removal!("Take");

    fn dispose(&mut self) {
        self.chained.dispose();
    }
}

/// Context produced by [`Slinq::take_while`].
pub struct TakeWhile<C: Context, F> {
    chained: Slinq<C>,
    pred: F,
    done: bool,
}

impl<C: Context, F: FnMut(&C::Item) -> bool> Context for TakeWhile<C, F> {
    type Item = C::Item;

    fn advance(&mut self) -> Option<C::Item> {
        if self.done {
            return None;
        }
        match self.chained.next() {
            Some(item) if (self.pred)(&item) => Some(item),
            _ => {
                self.done = true;
                None
            }
        }
    }

    no_removal!("TakeWhile");

    fn dispose(&mut self) {
        self.chained.dispose();
    }
}

/// Context produced by [`Slinq::running_fold`]: yields each successive
/// accumulator of a left fold, one per upstream element.
pub struct RunningFold<C: Context, A, F> {
    chained: Slinq<C>,
    acc: A,
    fold: F,
}

impl<C: Context, A: Clone, F: FnMut(A, C::Item) -> A> Context for RunningFold<C, A, F> {
    type Item = A;

    fn advance(&mut self) -> Option<A> {
        let item = self.chained.next()?;
        self.acc = (self.fold)(self.acc.clone(), item);
        Some(self.acc.clone())
    }

    no_removal!("RunningFold");

    fn dispose(&mut self) {
        self.chained.dispose();
    }
}

impl<C: Context> Slinq<C> {
    /// Maps every element through `selector`.
    #[inline]
    pub fn select<U, F>(self, selector: F) -> Slinq<Select<C, F>>
    where
        F: FnMut(C::Item) -> U,
    {
        Slinq::new(Select {
            chained: self,
            selector,
        })
    }

    /// Keeps only elements satisfying `pred`.
    #[inline]
    pub fn filter<F>(self, pred: F) -> Slinq<Filter<C, F>>
    where
        F: FnMut(&C::Item) -> bool,
    {
        Slinq::new(Filter {
            chained: self,
            pred,
        })
    }

    /// Maps every element to a sequence and flattens the results in order.
    #[inline]
    pub fn select_many<C2, F>(self, selector: F) -> Slinq<Flatten<Select<C, F>, C2>>
    where
        C2: Context,
        F: FnMut(C::Item) -> Slinq<C2>,
    {
        self.select(selector).flatten()
    }

    /// Exhausts this sequence, then draws from `other`.
    #[inline]
    pub fn concat<C2>(self, other: Slinq<C2>) -> Slinq<Concat<C, C2>>
    where
        C2: Context<Item = C::Item>,
    {
        Slinq::new(Concat {
            first: self,
            second: other,
            on_second: false,
        })
    }

    /// Pairs elements side by side, stopping at the shorter side.
    #[inline]
    pub fn zip<C2>(self, other: Slinq<C2>) -> Slinq<Zip<C, C2>>
    where
        C2: Context,
    {
        Slinq::new(Zip {
            left: self,
            right: other,
        })
    }

    /// Combines elements side by side through `selector`, stopping at the
    /// shorter side.
    #[inline]
    pub fn zip_with<C2, U, F>(self, other: Slinq<C2>, selector: F) -> Slinq<ZipWith<C, C2, F>>
    where
        C2: Context,
        F: FnMut(C::Item, C2::Item) -> U,
    {
        Slinq::new(ZipWith {
            left: self,
            right: other,
            selector,
        })
    }

    /// Pairs elements side by side, continuing to the longer side and
    /// padding the exhausted one with `None`.
    #[inline]
    pub fn zip_all<C2>(self, other: Slinq<C2>) -> Slinq<ZipAll<C, C2>>
    where
        C2: Context,
    {
        Slinq::new(ZipAll {
            left: self,
            right: other,
            done: false,
        })
    }

    /// Combines optional elements side by side through `selector`,
    /// continuing to the longer side.
    #[inline]
    pub fn zip_all_with<C2, U, F>(
        self,
        other: Slinq<C2>,
        selector: F,
    ) -> Slinq<ZipAllWith<C, C2, F>>
    where
        C2: Context,
        F: FnMut(Option<C::Item>, Option<C2::Item>) -> U,
    {
        Slinq::new(ZipAllWith {
            left: self,
            right: other,
            selector,
            done: false,
        })
    }

    /// Pairs every element with its zero-based position.
    #[inline]
    pub fn zip_with_index(self) -> Slinq<ZipWithIndex<C>> {
        Slinq::new(ZipWithIndex {
            chained: self,
            index: 0,
        })
    }

    /// Bounds the sequence to its first `n` elements. Never pulls more than
    /// `n` elements upstream.
    #[inline]
    pub fn take(self, n: usize) -> Slinq<Take<C>> {
        Slinq::new(Take {
            chained: self,
            remaining: n,
        })
    }

    /// Bounds the sequence to its leading elements satisfying `pred`. The
    /// first failing element is consumed and discarded.
    #[inline]
    pub fn take_while<F>(self, pred: F) -> Slinq<TakeWhile<C, F>>
    where
        F: FnMut(&C::Item) -> bool,
    {
        Slinq::new(TakeWhile {
            chained: self,
            pred,
            done: false,
        })
    }

    /// Lazily yields each successive accumulator of a left fold.
    #[inline]
    pub fn running_fold<A, F>(self, seed: A, fold: F) -> Slinq<RunningFold<C, A, F>>
    where
        A: Clone,
        F: FnMut(A, C::Item) -> A,
    {
        Slinq::new(RunningFold {
            chained: self,
            acc: seed,
            fold,
        })
    }
}

impl<C, C2> Slinq<C>
where
    C2: Context,
    C: Context<Item = Slinq<C2>>,
{
    /// Flattens a sequence of sequences in order.
    #[inline]
    pub fn flatten(self) -> Slinq<Flatten<C, C2>> {
        Slinq::new(Flatten {
            outer: self,
            inner: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slice::SliceSlinq;
    use crate::slinq::VecSlinq;

    #[test]
    fn test_select() {
        let data = [1, 2, 3];
        assert_eq!(data.slinq().select(|x| x * 10).to_vec(), vec![10, 20, 30]);
    }

    #[test]
    fn test_filter_keeps_even() {
        let data = [1, 2, 3, 4, 5];
        assert_eq!(data.slinq().filter(|x| x % 2 == 0).to_vec(), vec![2, 4]);
    }

    #[test]
    fn test_select_many_flattens_in_order() {
        let rows: [&'static [i32]; 3] = [&[1, 2], &[], &[3]];
        let result = rows.slinq().select_many(|row| row.slinq()).to_vec();
        assert_eq!(result, vec![1, 2, 3]);
    }

    #[test]
    fn test_select_many_over_options() {
        // A None expansion contributes nothing, mirroring filter + select.
        let data = [1, 2, 3, 4];
        let result = data
            .slinq()
            .select_many(|x| Slinq::from_option((x % 2 == 0).then_some(x * 10)))
            .to_vec();
        assert_eq!(result, vec![20, 40]);
    }

    #[test]
    fn test_flatten() {
        let rows: [&'static [i32]; 2] = [&[1], &[2, 3]];
        let result = rows.slinq().select(|row| row.slinq()).flatten().to_vec();
        assert_eq!(result, vec![1, 2, 3]);
    }

    #[test]
    fn test_concat_exhausts_first_side_first() {
        let a = [1, 2];
        let b = [3, 4];
        assert_eq!(a.slinq().concat(b.slinq()).to_vec(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_zip_stops_at_shorter_side() {
        let a = [1, 2, 3];
        let b = ['x', 'y'];
        assert_eq!(
            a.slinq().zip(b.slinq()).to_vec(),
            vec![(1, 'x'), (2, 'y')]
        );
        assert_eq!(
            a.slinq().zip_with(b.slinq(), |n, c| format!("{n}{c}")).to_vec(),
            vec!["1x".to_owned(), "2y".to_owned()]
        );
    }

    #[test]
    fn test_zip_all_pads_shorter_side() {
        let a = [1, 2, 3];
        let b = [10];
        assert_eq!(
            a.slinq().zip_all(b.slinq()).to_vec(),
            vec![
                (Some(1), Some(10)),
                (Some(2), None),
                (Some(3), None),
            ]
        );
        assert_eq!(
            a.slinq()
                .zip_all_with(b.slinq(), |x, y| x.unwrap_or(0) + y.unwrap_or(0))
                .to_vec(),
            vec![11, 2, 3]
        );
    }

    #[test]
    fn test_zip_with_index() {
        let data = ['a', 'b', 'c'];
        assert_eq!(
            data.slinq().zip_with_index().to_vec(),
            vec![('a', 0), ('b', 1), ('c', 2)]
        );
        // Indexing counts yielded elements, not storage positions.
        assert_eq!(
            data.slinq().skip(1).zip_with_index().to_vec(),
            vec![('b', 0), ('c', 1)]
        );
    }

    #[test]
    fn test_take_and_take_while() {
        let data = [1, 2, 3, 4, 1];
        assert_eq!(data.slinq().take(2).to_vec(), vec![1, 2]);
        assert_eq!(data.slinq().take(0).to_vec(), Vec::<i32>::new());
        assert_eq!(data.slinq().take(9).to_vec(), vec![1, 2, 3, 4, 1]);
        assert_eq!(data.slinq().take_while(|x| *x < 3).to_vec(), vec![1, 2]);
        // take_while never resumes after the first failure.
        assert_eq!(
            data.slinq().take_while(|x| *x < 2).count(),
            1
        );
    }

    #[test]
    fn test_running_fold_yields_each_accumulator() {
        let data = [1, 2, 3, 4];
        assert_eq!(
            data.slinq().running_fold(0, |acc, x| acc + x).to_vec(),
            vec![1, 3, 6, 10]
        );
    }

    #[test]
    fn test_running_fold_with_aggregate_while_equivalence() {
        // The short-circuit fold agrees with scanning for the first
        // accumulator past the threshold.
        let data = [5, 5, 5, 5, 5];
        let threshold = 12;
        let via_while = data
            .slinq()
            .aggregate_while(0, |acc, x| if acc < threshold { Some(acc + x) } else { None });
        let via_running = data
            .slinq()
            .running_fold(0, |acc, x| acc + x)
            .filter(|acc| *acc >= threshold)
            .first_or_none()
            .unwrap_or(0);
        assert_eq!(via_while, via_running);
    }

    #[test]
    fn test_chained_pipeline() {
        let data = [5, 1, 4, 2, 3, 6];
        let result = data
            .slinq()
            .filter(|x| x % 2 == 0)
            .select(|x| x * 100)
            .take(2)
            .to_vec();
        assert_eq!(result, vec![400, 200]);
    }

    #[test]
    fn test_combinators_report_removal_unsupported() {
        let mut data = vec![1, 2, 3];
        let mut seq = data.slinq_mut().select(|x| x + 1);
        seq.next();
        let err = seq.remove().unwrap_err();
        assert_eq!(err.context(), "Select");
    }

    #[test]
    fn test_dispose_cascades_through_wrappers() {
        let data = [1, 2, 3];
        let mut seq = data.slinq().select(|x| x * 2).filter(|x| *x > 0);
        assert_eq!(seq.next(), Some(2));
        seq.dispose();
        assert_eq!(seq.next(), None);
    }
}
