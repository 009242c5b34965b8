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

//! # Hawser Slinq
//!
//! A lazy, single-pass sequence engine over in-memory backing stores. A
//! sequence is a context cursor (array index, linked node, single value,
//! read-only view) plus a combinator surface: transform and filter lazily,
//! remove elements from the backing store mid-iteration, and materialize
//! through an external scratch pool only where an operation genuinely needs
//! a full view (sort, dedup, grouping).
//!
//! ## Architecture
//!
//! - **`context`**: the three-operation cursor contract
//!   (`advance`/`remove_current`/`dispose`) and the vector and single-value
//!   adapters.
//! - **`slinq`**: the sequence value, its removal surface, and the terminal
//!   consumers.
//! - **`lazy`**: deferred combinators — each wraps the upstream sequence in
//!   a new context and pulls only on demand.
//! - **`materialize`**: pool-backed combinators that drain into scratch
//!   buffers; ownership and release of those buffers is enforced by RAII
//!   guards.
//! - **`pool`**: the scratch-pool collaborator contract and its trivial
//!   allocate-and-drop implementation.
//! - **`chain`**: an arena-backed doubly-linked list with stable node
//!   handles, the linked backing store with O(1) mid-iteration unlink.
//! - **`slice`**: read-only views (sub-range or single scalar) and their
//!   cursor.
//!
//! ## Usage
//!
//! ```rust
//! use hawser_slinq::prelude::*;
//!
//! let data = [5, 1, 4, 2, 3];
//! let picked = data
//!     .slinq()
//!     .filter(|x| x % 2 == 1)
//!     .order_by(|x| *x)
//!     .to_vec();
//! assert_eq!(picked, vec![1, 3, 5]);
//!
//! let mut store = vec![1, 2, 3, 4, 5];
//! store.slinq_mut().skip(1).remove_n(2).unwrap();
//! assert_eq!(store, vec![1, 4, 5]);
//! ```

pub mod chain;
pub mod context;
pub mod lazy;
pub mod materialize;
pub mod pool;
pub mod slice;
pub mod slinq;

pub use chain::{ChainList, NodeId};
pub use context::{Context, RemoveUnsupported};
pub use materialize::Group;
pub use pool::{AllocScratch, ScratchPool};
pub use slice::{Slice, SliceSlinq};
pub use slinq::{Slinq, VecSlinq};

/// Common imports for sequence-heavy code.
pub mod prelude {
    pub use crate::chain::ChainList;
    pub use crate::context::Context;
    pub use crate::pool::{AllocScratch, ScratchPool};
    pub use crate::slice::{Slice, SliceSlinq};
    pub use crate::slinq::{Slinq, VecSlinq};
}
