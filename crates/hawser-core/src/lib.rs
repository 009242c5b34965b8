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

//! # Hawser Core
//!
//! Algebraic foundations for the hawser ecosystem. This crate consolidates
//! the small, reusable value vocabulary that the higher-level sequence crate
//! builds on: fold and chaining extensions for `Option` and `Result`, and
//! fixed-arity tagged unions (`Union3`, `Either`) with exhaustive
//! case-analysis operators.
//!
//! ## Modules
//!
//! - `option`: Extension vocabulary over `std::option::Option` — the
//!   exhaustive fold `cata` and the `into_some` wrapper.
//! - `result`: Extension vocabulary over `std::result::Result` — predicate
//!   gating (`check`), the fault-capture boundary (`then_try`,
//!   `then_try_with`), and conversions between the string-error, boxed-fault,
//!   and typed-error result shapes.
//! - `union`: `Union3<T1, T2, T3>`, a three-way tagged union with exhaustive
//!   fold, side-effecting dispatch, and checked accessors.
//! - `either`: `Either<L, R>`, the two-way counterpart.
//!
//! ## Design Philosophy
//!
//! 1. **Extend, don't shadow**: `Option` and `Result` are already the tagged
//!    values this vocabulary needs; the crate adds the missing operators as
//!    extension traits rather than re-deriving parallel types.
//! 2. **Two error channels**: recoverable outcomes flow through `Err`/`None`
//!    values; misuse (reading the wrong case of a union, unwrapping the wrong
//!    side) fails fast with a descriptive panic. The two never mix.
//! 3. **Zero dependencies**: everything here is pure value plumbing.

pub mod either;
pub mod option;
pub mod result;
pub mod union;

pub use either::Either;
pub use option::{IntoSome, OptionExt};
pub use result::{Fault, FaultResult, ResultExt, TextResult};
pub use union::{Union3, Variant};
