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

//! # Three-Way Tagged Union
//!
//! `Union3<T1, T2, T3>` is a fixed-arity tagged union over three
//! alternatives. The discriminant always matches exactly one populated slot;
//! the other slots do not exist at runtime (Rust enums give this invariant
//! for free, where the original pattern had to guard dead slots by hand).
//!
//! Case analysis is exhaustive by construction: [`Union3::cata`] folds all
//! three arms into one result, [`Union3::for_each`] dispatches a side effect
//! to the active arm. Checked accessors (`as_*`, `into_*`) return `Option`
//! for call sites that only care about one case. The `expect_*` accessors are
//! reserved for call sites that have already matched on [`Union3::variant`]:
//! reading the wrong case through them is a usage defect and fails fast with
//! a message naming the type, the operation, and the actual variant.
//!
//! ## Usage
//!
//! ```rust
//! use hawser_core::union::{Union3, Variant};
//!
//! let u: Union3<i32, &str, f64> = Union3::second("mid");
//! assert_eq!(u.variant(), Variant::Second);
//!
//! let rendered = u.cata(
//!     |n| format!("int {n}"),
//!     |s| format!("str {s}"),
//!     |f| format!("float {f}"),
//! );
//! assert_eq!(rendered, "str mid");
//! ```

use std::fmt;

/// Discriminant of a [`Union3`] value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Variant {
    First,
    Second,
    Third,
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variant::First => write!(f, "First"),
            Variant::Second => write!(f, "Second"),
            Variant::Third => write!(f, "Third"),
        }
    }
}

/// A tagged union over three fixed alternatives.
///
/// Equality, ordering, and hashing delegate to the active slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Union3<T1, T2, T3> {
    First(T1),
    Second(T2),
    Third(T3),
}

impl<T1, T2, T3> Union3<T1, T2, T3> {
    /// Creates a union holding the first alternative.
    #[inline]
    pub fn first(value: T1) -> Self {
        Union3::First(value)
    }

    /// Creates a union holding the second alternative.
    #[inline]
    pub fn second(value: T2) -> Self {
        Union3::Second(value)
    }

    /// Creates a union holding the third alternative.
    #[inline]
    pub fn third(value: T3) -> Self {
        Union3::Third(value)
    }

    /// Returns the discriminant of the active slot.
    #[inline]
    pub fn variant(&self) -> Variant {
        match self {
            Union3::First(_) => Variant::First,
            Union3::Second(_) => Variant::Second,
            Union3::Third(_) => Variant::Third,
        }
    }

    #[inline]
    pub fn is_first(&self) -> bool {
        matches!(self, Union3::First(_))
    }

    #[inline]
    pub fn is_second(&self) -> bool {
        matches!(self, Union3::Second(_))
    }

    #[inline]
    pub fn is_third(&self) -> bool {
        matches!(self, Union3::Third(_))
    }

    /// Exhaustive fold: applies the function matching the active slot.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hawser_core::union::Union3;
    ///
    /// let u: Union3<i32, i32, i32> = Union3::third(3);
    /// assert_eq!(u.cata(|a| a * 1, |b| b * 10, |c| c * 100), 300);
    /// ```
    #[inline]
    pub fn cata<U, F1, F2, F3>(self, first: F1, second: F2, third: F3) -> U
    where
        F1: FnOnce(T1) -> U,
        F2: FnOnce(T2) -> U,
        F3: FnOnce(T3) -> U,
    {
        match self {
            Union3::First(v) => first(v),
            Union3::Second(v) => second(v),
            Union3::Third(v) => third(v),
        }
    }

    /// Exhaustive side-effecting dispatch to the active slot.
    #[inline]
    pub fn for_each<F1, F2, F3>(&self, first: F1, second: F2, third: F3)
    where
        F1: FnOnce(&T1),
        F2: FnOnce(&T2),
        F3: FnOnce(&T3),
    {
        match self {
            Union3::First(v) => first(v),
            Union3::Second(v) => second(v),
            Union3::Third(v) => third(v),
        }
    }

    /// Returns a reference to the first slot if it is active.
    #[inline]
    pub fn as_first(&self) -> Option<&T1> {
        match self {
            Union3::First(v) => Some(v),
            _ => None,
        }
    }

    /// Returns a reference to the second slot if it is active.
    #[inline]
    pub fn as_second(&self) -> Option<&T2> {
        match self {
            Union3::Second(v) => Some(v),
            _ => None,
        }
    }

    /// Returns a reference to the third slot if it is active.
    #[inline]
    pub fn as_third(&self) -> Option<&T3> {
        match self {
            Union3::Third(v) => Some(v),
            _ => None,
        }
    }

    /// Consumes the union, returning the first slot if it is active.
    #[inline]
    pub fn into_first(self) -> Option<T1> {
        match self {
            Union3::First(v) => Some(v),
            _ => None,
        }
    }

    /// Consumes the union, returning the second slot if it is active.
    #[inline]
    pub fn into_second(self) -> Option<T2> {
        match self {
            Union3::Second(v) => Some(v),
            _ => None,
        }
    }

    /// Consumes the union, returning the third slot if it is active.
    #[inline]
    pub fn into_third(self) -> Option<T3> {
        match self {
            Union3::Third(v) => Some(v),
            _ => None,
        }
    }

    /// Consumes the union, returning the first slot.
    ///
    /// # Panics
    ///
    /// Panics if another slot is active. Call sites must have matched on
    /// [`Union3::variant`] first; this accessor is not a recoverable path.
    #[inline]
    pub fn expect_first(self) -> T1 {
        match self {
            Union3::First(v) => v,
            other => wrong_case("expect_first", Variant::First, other.variant()),
        }
    }

    /// Consumes the union, returning the second slot.
    ///
    /// # Panics
    ///
    /// Panics if another slot is active.
    #[inline]
    pub fn expect_second(self) -> T2 {
        match self {
            Union3::Second(v) => v,
            other => wrong_case("expect_second", Variant::Second, other.variant()),
        }
    }

    /// Consumes the union, returning the third slot.
    ///
    /// # Panics
    ///
    /// Panics if another slot is active.
    #[inline]
    pub fn expect_third(self) -> T3 {
        match self {
            Union3::Third(v) => v,
            other => wrong_case("expect_third", Variant::Third, other.variant()),
        }
    }
}

#[cold]
#[inline(never)]
fn wrong_case(operation: &str, expected: Variant, actual: Variant) -> ! {
    panic!("called `Union3::{operation}` expecting the {expected} case on a {actual} value");
}

impl<T1, T2, T3> fmt::Display for Union3<T1, T2, T3>
where
    T1: fmt::Display,
    T2: fmt::Display,
    T3: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Union3::First(v) => write!(f, "[First: {v}]"),
            Union3::Second(v) => write!(f, "[Second: {v}]"),
            Union3::Third(v) => write!(f, "[Third: {v}]"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type U = Union3<i32, &'static str, f64>;

    #[test]
    fn test_variant_matches_constructor() {
        assert_eq!(U::first(1).variant(), Variant::First);
        assert_eq!(U::second("s").variant(), Variant::Second);
        assert_eq!(U::third(1.5).variant(), Variant::Third);
    }

    #[test]
    fn test_cata_dispatches_to_active_slot() {
        assert_eq!(U::first(2).cata(|a| a * 2, |_| 0, |_| 0), 4);
        assert_eq!(U::second("ab").cata(|_| 0, |s| s.len() as i32, |_| 0), 2);
        assert_eq!(U::third(2.5).cata(|_| 0, |_| 0, |f| f as i32), 2);
    }

    #[test]
    fn test_for_each_runs_exactly_one_arm() {
        let mut h0 = 0u32;
        let mut h1 = 0u32;
        let mut h2 = 0u32;
        U::second("x").for_each(|_| h0 += 1, |_| h1 += 1, |_| h2 += 1);
        assert_eq!([h0, h1, h2], [0, 1, 0]);
    }

    #[test]
    fn test_checked_accessors() {
        let u = U::second("mid");
        assert_eq!(u.as_first(), None);
        assert_eq!(u.as_second(), Some(&"mid"));
        assert_eq!(u.as_third(), None);
        assert_eq!(u.into_second(), Some("mid"));
    }

    #[test]
    fn test_expect_right_case() {
        assert_eq!(U::first(7).expect_first(), 7);
    }

    #[test]
    #[should_panic(expected = "expect_first")]
    fn test_expect_wrong_case_panics() {
        U::second("oops").expect_first();
    }

    #[test]
    fn test_equality_delegates_to_active_slot() {
        assert_eq!(U::first(1), U::first(1));
        assert_ne!(U::first(1), U::first(2));
        // Same payload position, different slot: never equal.
        let a: Union3<i32, i32, i32> = Union3::first(1);
        let b: Union3<i32, i32, i32> = Union3::second(1);
        assert_ne!(a, b);
    }

    #[test]
    fn test_display() {
        assert_eq!(U::first(3).to_string(), "[First: 3]");
        assert_eq!(U::second("s").to_string(), "[Second: s]");
    }
}
