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

//! # Two-Way Tagged Union
//!
//! `Either<L, R>` holds exactly one of two alternatives with no bias between
//! them (unlike `Result`, neither side means failure). It is the two-arity
//! sibling of [`crate::union::Union3`] and carries the same access
//! discipline: exhaustive fold via [`Either::either`], checked accessors
//! returning `Option`, and hard-failing `expect_*` accessors for call sites
//! that already matched on the tag.

use std::fmt;

/// A value holding exactly one of two alternatives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Either<L, R> {
    Left(L),
    Right(R),
}

impl<L, R> Either<L, R> {
    #[inline]
    pub fn is_left(&self) -> bool {
        matches!(self, Either::Left(_))
    }

    #[inline]
    pub fn is_right(&self) -> bool {
        matches!(self, Either::Right(_))
    }

    /// Returns a reference to the left value if present.
    #[inline]
    pub fn left(&self) -> Option<&L> {
        match self {
            Either::Left(v) => Some(v),
            Either::Right(_) => None,
        }
    }

    /// Returns a reference to the right value if present.
    #[inline]
    pub fn right(&self) -> Option<&R> {
        match self {
            Either::Left(_) => None,
            Either::Right(v) => Some(v),
        }
    }

    /// Consumes the value, returning the left alternative if present.
    #[inline]
    pub fn into_left(self) -> Option<L> {
        match self {
            Either::Left(v) => Some(v),
            Either::Right(_) => None,
        }
    }

    /// Consumes the value, returning the right alternative if present.
    #[inline]
    pub fn into_right(self) -> Option<R> {
        match self {
            Either::Left(_) => None,
            Either::Right(v) => Some(v),
        }
    }

    /// Exhaustive fold into a single result type.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hawser_core::either::Either;
    ///
    /// let sides: [Either<i32, &str>; 2] = [Either::Left(3), Either::Right("x")];
    /// let lens: Vec<usize> = sides
    ///     .into_iter()
    ///     .map(|e| e.either(|n| n as usize, |s| s.len()))
    ///     .collect();
    /// assert_eq!(lens, vec![3, 1]);
    /// ```
    #[inline]
    pub fn either<U, FL, FR>(self, left_fn: FL, right_fn: FR) -> U
    where
        FL: FnOnce(L) -> U,
        FR: FnOnce(R) -> U,
    {
        match self {
            Either::Left(v) => left_fn(v),
            Either::Right(v) => right_fn(v),
        }
    }

    /// Exhaustive side-effecting dispatch.
    #[inline]
    pub fn for_each<FL, FR>(&self, left_fn: FL, right_fn: FR)
    where
        FL: FnOnce(&L),
        FR: FnOnce(&R),
    {
        match self {
            Either::Left(v) => left_fn(v),
            Either::Right(v) => right_fn(v),
        }
    }

    /// Maps the left alternative, leaving a right value unchanged.
    #[inline]
    pub fn map_left<U, F>(self, f: F) -> Either<U, R>
    where
        F: FnOnce(L) -> U,
    {
        match self {
            Either::Left(v) => Either::Left(f(v)),
            Either::Right(v) => Either::Right(v),
        }
    }

    /// Maps the right alternative, leaving a left value unchanged.
    #[inline]
    pub fn map_right<U, F>(self, f: F) -> Either<L, U>
    where
        F: FnOnce(R) -> U,
    {
        match self {
            Either::Left(v) => Either::Left(v),
            Either::Right(v) => Either::Right(f(v)),
        }
    }

    /// Consumes the value, returning the left alternative.
    ///
    /// # Panics
    ///
    /// Panics if the value is `Right`. Call sites must have checked the tag
    /// first; this accessor is not a recoverable path.
    #[inline]
    pub fn expect_left(self) -> L {
        match self {
            Either::Left(v) => v,
            Either::Right(_) => {
                panic!("called `Either::expect_left` on a Right value")
            }
        }
    }

    /// Consumes the value, returning the right alternative.
    ///
    /// # Panics
    ///
    /// Panics if the value is `Left`.
    #[inline]
    pub fn expect_right(self) -> R {
        match self {
            Either::Left(_) => {
                panic!("called `Either::expect_right` on a Left value")
            }
            Either::Right(v) => v,
        }
    }
}

impl<L, R> fmt::Display for Either<L, R>
where
    L: fmt::Display,
    R: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Either::Left(v) => write!(f, "[Left: {v}]"),
            Either::Right(v) => write!(f, "[Right: {v}]"),
        }
    }
}
