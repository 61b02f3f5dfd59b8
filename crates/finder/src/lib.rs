//! Finder - query and traversal engine over a DOM tree
//!
//! Locate nodes with predicates, scan sibling chains, and chain searches into
//! lazy pipelines that run as concurrent tokio stages.
//!
//! # Design
//!
//! 1. **Not found is a value**: an empty `Finder` answers every call with
//!    another empty value, so long lookup chains need one check at the end
//! 2. **Document order, always**: concurrency decouples stages, it never
//!    reorders them
//! 3. **The tree is shared and read-only**: `map` and `reduce` rewrite
//!    copies, never the tree
//!
//! ```text
//! Finder ─find_all──> FinderStream ─filter/join/map/reduce──> FinderStream
//!   │                                                              │
//!   └─find/find_sibling──> Finder <──first/last/select────────────┘
//! ```
//!
//! Streams spawn tokio tasks, so building one requires a running runtime.

pub mod combinators;
pub mod finder;
pub mod pred;
pub mod stream;
pub mod traverse;

pub use combinators::{all_text, ReduceStep};
pub use finder::Finder;
pub use pred::Predicate;
pub use stream::{inject, FinderStream};
pub use traverse::{Descendants, Direction, Siblings};

pub use dom;
