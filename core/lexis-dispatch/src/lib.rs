//! Type-directed dispatch over open sets of constructs.
//!
//! A [`Match`] (side effects) or [`Yield`] (produces a value) expression offers a
//! value to an ordered list of arms. Each arm names a [`Pattern`] type; the first
//! arm whose pattern projects the value, and whose optional `when` predicate holds,
//! wins. Ordering is the only tie-breaker: a broad pattern placed before a narrow
//! one shadows it.
//!
//! ```
//! use lexis_dispatch::{Match, Pattern};
//!
//! struct Even;
//! impl Pattern<u32> for Even {
//!     type View = u32;
//!     fn project(value: &u32) -> Option<u32> {
//!         (value % 2 == 0).then_some(*value)
//!     }
//! }
//!
//! let label = Match::on(4u32)
//!     .yielding::<&str>()
//!     .case_value::<Even>("even")
//!     .or_default("odd");
//! assert_eq!(label, "even");
//! ```

pub mod matcher;
pub mod pattern;

pub use matcher::{Guarded, GuardedYield, Match, Yield};
pub use pattern::{Anything, Exact, Pattern};
