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

//! # Result Extensions
//!
//! Chaining vocabulary over `std::result::Result`. Three result shapes are
//! used throughout the hawser ecosystem, distinguished only by their error
//! type:
//!
//! - [`TextResult<T>`] — human-readable string errors.
//! - [`FaultResult<T>`] — captured fault objects ([`Fault`], a boxed
//!   `std::error::Error`), for chains that must carry an arbitrary failure
//!   without flattening it to text.
//! - `Result<T, E>` — a typed error owned by the caller.
//!
//! The standard library already covers chaining (`map`, `and_then` — both
//! short-circuit on `Err` without evaluating the supplied function and
//! without touching the error value), fallback (`or`, `or_else`),
//! unwrap-with-default (`unwrap_or`, `unwrap_or_else`), error transformation
//! (`map_err`), and the conversion to `Option` (`ok`). This module adds what
//! it lacks:
//!
//! - [`ResultExt::check`]: downgrade a success to an error when a predicate
//!   fails; an error input passes through untouched.
//! - [`ResultExt::then_try`] / [`ResultExt::then_try_with`]: the designated
//!   boundary where a fault raised by a caller-supplied fallible function is
//!   converted into a controlled error value. `then_try` lands in the
//!   [`Fault`] channel; `then_try_with` maps the fault into the chain's own
//!   error type. Panics are *not* captured — they belong to the defect
//!   channel and must stay fatal.
//! - [`ResultExt::to_text`] / [`ResultExt::to_fault`]: conversions between
//!   the three result shapes, explicit about the error-shape change.
//!
//! Reading the wrong side (`unwrap` on an `Err`, `unwrap_err` on an `Ok`)
//! panics with a descriptive message; that is the defect channel, distinct
//! from the `Err` payload that flows through the chain.
//!
//! ## Usage
//!
//! ```rust
//! use hawser_core::result::{ResultExt, TextResult};
//!
//! fn parse(input: &str) -> TextResult<i32> {
//!     Ok(input)
//!         .then_try_with(|s: &str| s.trim().parse::<i32>(), |e| e.to_string())
//!         .check(|n| *n >= 0, |n| format!("negative input: {n}"))
//! }
//!
//! assert_eq!(parse(" 12 "), Ok(12));
//! assert!(parse("twelve").is_err());
//! assert_eq!(parse("-3"), Err("negative input: -3".to_owned()));
//! ```

use std::error::Error;
use std::fmt::Display;

/// A captured fault: any boxed error object, preserved rather than flattened.
pub type Fault = Box<dyn Error + Send + Sync + 'static>;

/// Result with a human-readable string error.
pub type TextResult<T> = Result<T, String>;

/// Result carrying a captured [`Fault`].
pub type FaultResult<T> = Result<T, Fault>;

/// Chaining extensions for `Result`.
pub trait ResultExt<T, E> {
    /// Downgrades a success to an error when `pred` rejects the value.
    ///
    /// An `Err` input is returned unchanged and neither function is
    /// evaluated. `err_fn` receives the rejected value to build the error.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hawser_core::result::ResultExt;
    ///
    /// let ok: Result<i32, String> = Ok(4);
    /// assert_eq!(ok.check(|v| v % 2 == 0, |v| format!("{v} is odd")), Ok(4));
    ///
    /// let odd: Result<i32, String> = Ok(5);
    /// assert_eq!(odd.check(|v| v % 2 == 0, |v| format!("{v} is odd")), Err("5 is odd".to_owned()));
    /// ```
    fn check<P, F>(self, pred: P, err_fn: F) -> Result<T, E>
    where
        P: FnOnce(&T) -> bool,
        F: FnOnce(&T) -> E;

    /// Chains a fallible function, capturing whatever fault it raises into
    /// the [`Fault`] channel.
    ///
    /// An `Err` input is boxed into the fault channel without invoking `f`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hawser_core::result::{FaultResult, ResultExt};
    ///
    /// let parsed: FaultResult<i32> = Ok::<_, String>("17").then_try(|s| s.parse::<i32>());
    /// assert_eq!(parsed.unwrap(), 17);
    ///
    /// let failed: FaultResult<i32> = Ok::<_, String>("nope").then_try(|s| s.parse::<i32>());
    /// assert!(failed.is_err());
    /// ```
    fn then_try<U, X, F>(self, f: F) -> FaultResult<U>
    where
        F: FnOnce(T) -> Result<U, X>,
        X: Into<Fault>,
        E: Into<Fault>;

    /// Chains a fallible function, mapping the fault it raises into the
    /// chain's own error type via `catch`.
    ///
    /// An `Err` input is returned unchanged; neither `f` nor `catch` runs.
    fn then_try_with<U, X, F, C>(self, f: F, catch: C) -> Result<U, E>
    where
        F: FnOnce(T) -> Result<U, X>,
        C: FnOnce(X) -> E;

    /// Converts into the string-error shape, rendering the error through its
    /// `Display` impl.
    fn to_text(self) -> TextResult<T>
    where
        E: Display;

    /// Converts into the captured-fault shape.
    fn to_fault(self) -> FaultResult<T>
    where
        E: Into<Fault>;
}

impl<T, E> ResultExt<T, E> for Result<T, E> {
    #[inline]
    fn check<P, F>(self, pred: P, err_fn: F) -> Result<T, E>
    where
        P: FnOnce(&T) -> bool,
        F: FnOnce(&T) -> E,
    {
        match self {
            Ok(value) => {
                if pred(&value) {
                    Ok(value)
                } else {
                    let err = err_fn(&value);
                    Err(err)
                }
            }
            Err(e) => Err(e),
        }
    }

    #[inline]
    fn then_try<U, X, F>(self, f: F) -> FaultResult<U>
    where
        F: FnOnce(T) -> Result<U, X>,
        X: Into<Fault>,
        E: Into<Fault>,
    {
        match self {
            Ok(value) => f(value).map_err(Into::into),
            Err(e) => Err(e.into()),
        }
    }

    #[inline]
    fn then_try_with<U, X, F, C>(self, f: F, catch: C) -> Result<U, E>
    where
        F: FnOnce(T) -> Result<U, X>,
        C: FnOnce(X) -> E,
    {
        match self {
            Ok(value) => f(value).map_err(catch),
            Err(e) => Err(e),
        }
    }

    #[inline]
    fn to_text(self) -> TextResult<T>
    where
        E: Display,
    {
        self.map_err(|e| e.to_string())
    }

    #[inline]
    fn to_fault(self) -> FaultResult<T>
    where
        E: Into<Fault>,
    {
        self.map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_passes_success() {
        let r: TextResult<i32> = Ok(10).check(|v| *v > 5, |v| format!("too small: {v}"));
        assert_eq!(r, Ok(10));
    }

    #[test]
    fn test_check_downgrades_success() {
        let r: TextResult<i32> = Ok(3).check(|v| *v > 5, |v| format!("too small: {v}"));
        assert_eq!(r, Err("too small: 3".to_owned()));
    }

    #[test]
    fn test_check_passes_error_through_untouched() {
        let mut pred_calls = 0;
        let r: TextResult<i32> = Err("bad".to_owned()).check(
            |_| {
                pred_calls += 1;
                true
            },
            |_| "other".to_owned(),
        );
        assert_eq!(r, Err("bad".to_owned()));
        assert_eq!(pred_calls, 0);
    }

    #[test]
    fn test_short_circuit_law() {
        // An error input must flow through the whole chain without any
        // supplied function being evaluated and with the error untouched.
        let mut calls = 0;
        let r: TextResult<i32> = Err("bad".to_owned())
            .and_then(|v: i32| {
                calls += 1;
                Ok(v + 1)
            })
            .map(|v| {
                calls += 1;
                v * 2
            })
            .check(
                |_| {
                    calls += 1;
                    true
                },
                |_| "replaced".to_owned(),
            );
        assert_eq!(r, Err("bad".to_owned()));
        assert_eq!(calls, 0);
    }

    #[test]
    fn test_then_chain_error_value_preserved() {
        let r: TextResult<i32> = Err("bad".to_owned()).and_then(|v: i32| Ok(v + 1));
        assert_eq!(r.unwrap_err(), "bad");
    }

    #[test]
    fn test_identity_law() {
        let r: TextResult<i32> = Ok(7);
        assert_eq!(r.and_then(|v| Ok(v)), Ok(7));
    }

    #[test]
    fn test_then_try_captures_fault() {
        let r: FaultResult<i32> = Ok::<_, String>("not a number").then_try(|s| s.parse::<i32>());
        let fault = r.unwrap_err();
        assert!(fault.to_string().contains("invalid digit"));
    }

    #[test]
    fn test_then_try_propagates_error_without_calling() {
        let mut calls = 0;
        let r: FaultResult<i32> = Err("upstream".to_owned()).then_try(|s: &str| {
            calls += 1;
            s.parse::<i32>()
        });
        assert_eq!(r.unwrap_err().to_string(), "upstream");
        assert_eq!(calls, 0);
    }

    #[test]
    fn test_then_try_with_maps_fault_into_typed_error() {
        #[derive(Debug, PartialEq, Eq)]
        enum AppError {
            BadNumber,
        }

        let r: Result<i32, AppError> =
            Ok("x1".to_owned()).then_try_with(|s: String| s.parse::<i32>(), |_| AppError::BadNumber);
        assert_eq!(r, Err(AppError::BadNumber));
    }

    #[test]
    fn test_shape_conversions() {
        let typed: Result<i32, std::num::ParseIntError> = "9".parse::<i32>();
        assert_eq!(typed.to_text(), Ok(9));

        let failed: Result<i32, std::num::ParseIntError> = "no".parse::<i32>();
        let text = failed.clone().to_text();
        assert!(text.unwrap_err().contains("invalid digit"));

        let fault = failed.to_fault();
        assert!(fault.is_err());
    }

    #[test]
    fn test_to_option_discards_error() {
        let ok: TextResult<i32> = Ok(1);
        let err: TextResult<i32> = Err("gone".to_owned());
        assert_eq!(ok.ok(), Some(1));
        assert_eq!(err.ok(), None);
    }

    #[test]
    fn test_success_and_error_never_equal() {
        let ok: TextResult<i32> = Ok(1);
        let err: TextResult<i32> = Err("1".to_owned());
        assert_ne!(ok, err);
    }
}
