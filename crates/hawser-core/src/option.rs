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

//! # Option Extensions
//!
//! Fold and construction vocabulary over `std::option::Option`. `Option` is
//! already the zero-or-one tagged container this crate needs; the standard
//! library covers mapping (`map`), flattening map (`and_then`), predicate
//! gating (`filter`), fallback (`or`, `or_else`), and unwrap-with-default
//! (`unwrap_or`, `unwrap_or_else`). This module adds the two operators it
//! lacks:
//!
//! - [`OptionExt::cata`]: an exhaustive fold that forces both arms to be
//!   handled at the call site, the sanctioned extraction path when a plain
//!   `match` is too heavy for an expression position.
//! - [`IntoSome::into_some`]: wraps any value into `Some(value)`, useful at
//!   the tail of method chains where `Some(...)` would force extra nesting.
//!
//! ## Usage
//!
//! ```rust
//! use hawser_core::option::{IntoSome, OptionExt};
//!
//! let label = 7.into_some().cata(|v| format!("got {v}"), || "empty".to_owned());
//! assert_eq!(label, "got 7");
//! ```

/// Exhaustive fold over `Option`.
///
/// # Examples
///
/// ```rust
/// use hawser_core::option::OptionExt;
///
/// assert_eq!(Some(2).cata(|v| v * 10, || 0), 20);
/// assert_eq!(None::<i32>.cata(|v| v * 10, || 0), 0);
/// ```
pub trait OptionExt<T> {
    /// Folds the option into a single value by applying `some_fn` to a
    /// contained value or calling `none_fn` when empty.
    ///
    /// Exactly one of the two functions is evaluated.
    fn cata<U, S, N>(self, some_fn: S, none_fn: N) -> U
    where
        S: FnOnce(T) -> U,
        N: FnOnce() -> U;
}

impl<T> OptionExt<T> for Option<T> {
    #[inline]
    fn cata<U, S, N>(self, some_fn: S, none_fn: N) -> U
    where
        S: FnOnce(T) -> U,
        N: FnOnce() -> U,
    {
        match self {
            Some(value) => some_fn(value),
            None => none_fn(),
        }
    }
}

/// Wraps a value into `Some(value)` at the end of a method chain.
///
/// # Examples
///
/// ```rust
/// use hawser_core::option::IntoSome;
///
/// let opt = "ready".trim().into_some();
/// assert_eq!(opt, Some("ready"));
/// ```
pub trait IntoSome: Sized {
    /// Returns `Some(self)`.
    fn into_some(self) -> Option<Self>;
}

impl<T> IntoSome for T {
    #[inline]
    fn into_some(self) -> Option<Self> {
        Some(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cata_some() {
        let result = Some(5).cata(|v| v + 1, || -1);
        assert_eq!(result, 6);
    }

    #[test]
    fn test_cata_none() {
        let result = None::<i32>.cata(|v| v + 1, || -1);
        assert_eq!(result, -1);
    }

    #[test]
    fn test_cata_evaluates_exactly_one_arm() {
        let mut some_calls = 0;
        let mut none_calls = 0;
        Some(1).cata(|_| some_calls += 1, || none_calls += 1);
        assert_eq!((some_calls, none_calls), (1, 0));

        None::<i32>.cata(|_| some_calls += 1, || none_calls += 1);
        assert_eq!((some_calls, none_calls), (1, 1));
    }

    #[test]
    fn test_into_some() {
        assert_eq!(3.into_some(), Some(3));
        assert_eq!("x".into_some(), Some("x"));
    }

    #[test]
    fn test_identity_law() {
        // Mapping with the identity function leaves the option unchanged.
        let opt = Some(41);
        assert_eq!(opt.map(|x| x), opt);
        assert_eq!(None::<i32>.map(|x| x), None);
    }

    #[test]
    fn test_value_or_scenarios() {
        assert_eq!(None::<i32>.unwrap_or(42), 42);
        assert_eq!(Some(7).unwrap_or(42), 7);
    }

    #[test]
    fn test_round_trip_through_result() {
        // Converting to a result and back discards nothing for Some and
        // restores None after the error is dropped.
        let some = Some(9);
        assert_eq!(some.ok_or("missing").ok(), some);
        assert_eq!(None::<i32>.ok_or("missing").ok(), None);
    }
}
