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

//! # Sequence Contexts
//!
//! A *context* is the minimal mutable cursor state needed to resume
//! iteration over one kind of backing store. Everything a sequence can do is
//! defined by the three operations of the [`Context`] trait; the sequence
//! value ([`crate::slinq::Slinq`]) and every combinator are written against
//! this contract alone.
//!
//! ## Contract
//!
//! - [`Context::advance`] produces the next element and moves the cursor
//!   past it. Contexts are fused: after exhaustion (and after `dispose`)
//!   every further call returns `None`.
//! - [`Context::remove_current`] removes the element most recently produced
//!   by `advance` from the backing store and produces the element after it,
//!   leaving cursor and store mutually consistent. Contexts over immutable
//!   or view-only storage return [`RemoveUnsupported`] instead; calling it
//!   before anything was produced, or after exhaustion, is a no-op.
//! - [`Context::dispose`] releases any held resources and forces subsequent
//!   `advance` calls to report exhaustion.
//!
//! ## Adapters in this module
//!
//! - [`VecContext`]: indexed cursor over `&mut Vec<T>`, ascending or
//!   descending, removal supported. Ascending removal relies on the shift of
//!   later elements onto the cursor index; descending removal only ever
//!   touches positions already visited, so it is index-safe by construction.
//! - [`SingleContext`]: zero-or-one element with a tri-state move flag,
//!   removal unsupported.
//!
//! The linked-node adapter lives in [`crate::chain`], the read-only view
//! adapter in [`crate::slice`].

use std::error::Error;
use std::fmt;

/// Cursor operations over one kind of backing store.
pub trait Context {
    /// Element type produced by this context.
    type Item;

    /// Produces the next element, or `None` when exhausted. Fused.
    fn advance(&mut self) -> Option<Self::Item>;

    /// Removes the element most recently produced by [`Context::advance`]
    /// from the backing store and produces the element after it.
    ///
    /// Returns `Ok(None)` when there is nothing to remove (nothing produced
    /// yet, or exhausted). Contexts that cannot mutate their backing store
    /// return [`RemoveUnsupported`].
    fn remove_current(&mut self) -> Result<Option<Self::Item>, RemoveUnsupported>;

    /// Releases held resources and pins the context to exhaustion.
    fn dispose(&mut self);
}

/// Signal that a context cannot remove elements from its backing store.
///
/// This is a recoverable error, not a defect: whether removal is available
/// depends on how the sequence was constructed, and callers may probe for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemoveUnsupported {
    context: &'static str,
}

impl RemoveUnsupported {
    /// Creates the signal, naming the context that rejected the removal.
    #[inline]
    pub fn new(context: &'static str) -> Self {
        Self { context }
    }

    /// Name of the rejecting context type.
    #[inline]
    pub fn context(&self) -> &'static str {
        self.context
    }
}

impl fmt::Display for RemoveUnsupported {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "sequence context `{}` does not support element removal",
            self.context
        )
    }
}

impl Error for RemoveUnsupported {}

/// Implements `remove_current` as an unsupported-operation signal, for
/// contexts that cannot mutate a backing store.
macro_rules! no_removal {
    ($name:literal) => {
        fn remove_current(
            &mut self,
        ) -> Result<Option<Self::Item>, $crate::context::RemoveUnsupported> {
            Err($crate::context::RemoveUnsupported::new($name))
        }
    };
}

pub(crate) use no_removal;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cursor {
    NotStarted,
    At(usize),
    Done,
}

/// Indexed cursor over a mutable vector.
///
/// Holding the `&mut Vec<T>` for the lifetime of the sequence is what makes
/// mid-iteration removal sound: nothing else can observe the store while the
/// cursor walks it.
#[derive(Debug)]
pub struct VecContext<'a, T> {
    store: &'a mut Vec<T>,
    cursor: Cursor,
    descending: bool,
}

impl<'a, T> VecContext<'a, T> {
    /// Ascending cursor starting before the first element.
    #[inline]
    pub fn ascending(store: &'a mut Vec<T>) -> Self {
        Self {
            store,
            cursor: Cursor::NotStarted,
            descending: false,
        }
    }

    /// Descending cursor starting past the last element.
    #[inline]
    pub fn descending(store: &'a mut Vec<T>) -> Self {
        Self {
            store,
            cursor: Cursor::NotStarted,
            descending: true,
        }
    }

    fn next_index(&self) -> Option<usize> {
        match (self.cursor, self.descending) {
            (Cursor::Done, _) => None,
            (Cursor::NotStarted, false) => (!self.store.is_empty()).then_some(0),
            (Cursor::NotStarted, true) => self.store.len().checked_sub(1),
            (Cursor::At(c), false) => {
                let i = c + 1;
                (i < self.store.len()).then_some(i)
            }
            (Cursor::At(c), true) => c.checked_sub(1),
        }
    }
}

impl<T: Clone> Context for VecContext<'_, T> {
    type Item = T;

    fn advance(&mut self) -> Option<T> {
        match self.next_index() {
            Some(i) => {
                self.cursor = Cursor::At(i);
                Some(self.store[i].clone())
            }
            None => {
                self.cursor = Cursor::Done;
                None
            }
        }
    }

    fn remove_current(&mut self) -> Result<Option<T>, RemoveUnsupported> {
        let Cursor::At(c) = self.cursor else {
            return Ok(None);
        };

        self.store.remove(c);

        let successor = if self.descending {
            c.checked_sub(1)
        } else {
            // Removal shifted the successor down onto the cursor index.
            (c < self.store.len()).then_some(c)
        };

        Ok(match successor {
            Some(i) => {
                self.cursor = Cursor::At(i);
                Some(self.store[i].clone())
            }
            None => {
                self.cursor = Cursor::Done;
                None
            }
        })
    }

    fn dispose(&mut self) {
        self.cursor = Cursor::Done;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MoveState {
    NotMoved,
    OnValue,
    Done,
}

/// Zero-or-one element cursor with a tri-state move flag.
#[derive(Debug)]
pub struct SingleContext<T> {
    value: Option<T>,
    state: MoveState,
}

impl<T> SingleContext<T> {
    /// Creates a cursor over an optional value.
    #[inline]
    pub fn new(value: Option<T>) -> Self {
        Self {
            value,
            state: MoveState::NotMoved,
        }
    }
}

impl<T> Context for SingleContext<T> {
    type Item = T;

    fn advance(&mut self) -> Option<T> {
        match self.state {
            MoveState::NotMoved => match self.value.take() {
                Some(v) => {
                    self.state = MoveState::OnValue;
                    Some(v)
                }
                None => {
                    self.state = MoveState::Done;
                    None
                }
            },
            MoveState::OnValue | MoveState::Done => {
                self.state = MoveState::Done;
                None
            }
        }
    }

    fn remove_current(&mut self) -> Result<Option<T>, RemoveUnsupported> {
        Err(RemoveUnsupported::new("SingleContext"))
    }

    fn dispose(&mut self) {
        self.value = None;
        self.state = MoveState::Done;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec_context_ascending_walk() {
        let mut data = vec![1, 2, 3];
        let mut ctx = VecContext::ascending(&mut data);
        assert_eq!(ctx.advance(), Some(1));
        assert_eq!(ctx.advance(), Some(2));
        assert_eq!(ctx.advance(), Some(3));
        assert_eq!(ctx.advance(), None);
        // Fused after exhaustion.
        assert_eq!(ctx.advance(), None);
    }

    #[test]
    fn test_vec_context_descending_walk() {
        let mut data = vec![1, 2, 3];
        let mut ctx = VecContext::descending(&mut data);
        assert_eq!(ctx.advance(), Some(3));
        assert_eq!(ctx.advance(), Some(2));
        assert_eq!(ctx.advance(), Some(1));
        assert_eq!(ctx.advance(), None);
    }

    #[test]
    fn test_vec_context_remove_yields_successor() {
        let mut data = vec![10, 20, 30];
        {
            let mut ctx = VecContext::ascending(&mut data);
            assert_eq!(ctx.advance(), Some(10));
            // Removes 10, produces 20 with the cursor re-synchronized.
            assert_eq!(ctx.remove_current(), Ok(Some(20)));
            assert_eq!(ctx.advance(), Some(30));
            assert_eq!(ctx.advance(), None);
        }
        assert_eq!(data, vec![20, 30]);
    }

    #[test]
    fn test_vec_context_remove_last_exhausts() {
        let mut data = vec![1, 2];
        {
            let mut ctx = VecContext::ascending(&mut data);
            ctx.advance();
            ctx.advance();
            assert_eq!(ctx.remove_current(), Ok(None));
            assert_eq!(ctx.advance(), None);
        }
        assert_eq!(data, vec![1]);
    }

    #[test]
    fn test_vec_context_remove_before_advance_is_noop() {
        let mut data = vec![1, 2];
        {
            let mut ctx = VecContext::ascending(&mut data);
            assert_eq!(ctx.remove_current(), Ok(None));
            assert_eq!(ctx.advance(), Some(1));
        }
        assert_eq!(data, vec![1, 2]);
    }

    #[test]
    fn test_vec_context_descending_remove() {
        let mut data = vec![1, 2, 3];
        {
            let mut ctx = VecContext::descending(&mut data);
            assert_eq!(ctx.advance(), Some(3));
            assert_eq!(ctx.remove_current(), Ok(Some(2)));
            assert_eq!(ctx.remove_current(), Ok(Some(1)));
        }
        assert_eq!(data, vec![1]);
    }

    #[test]
    fn test_vec_context_dispose_pins_exhaustion() {
        let mut data = vec![1, 2, 3];
        let mut ctx = VecContext::ascending(&mut data);
        assert_eq!(ctx.advance(), Some(1));
        ctx.dispose();
        assert_eq!(ctx.advance(), None);
        assert_eq!(ctx.advance(), None);
    }

    #[test]
    fn test_single_context_tri_state() {
        let mut ctx = SingleContext::new(Some(9));
        assert_eq!(ctx.advance(), Some(9));
        assert_eq!(ctx.advance(), None);
        assert_eq!(ctx.advance(), None);
    }

    #[test]
    fn test_single_context_empty() {
        let mut ctx: SingleContext<i32> = SingleContext::new(None);
        assert_eq!(ctx.advance(), None);
        assert_eq!(ctx.advance(), None);
    }

    #[test]
    fn test_single_context_remove_unsupported() {
        let mut ctx = SingleContext::new(Some(1));
        ctx.advance();
        let err = ctx.remove_current().unwrap_err();
        assert_eq!(err.context(), "SingleContext");
        assert!(err.to_string().contains("does not support element removal"));
    }
}
