#![warn(missing_docs)]
//! The cellpart library
//!
//! ## Overview
//!
//! cellpart enumerates all ways of partitioning a fixed finite universe of
//! cells into disjoint connected pieces, reporting exactly one
//! representative per equivalence class under the universe's symmetry
//! group. The search is exhaustive backtracking; symmetric duplicates are
//! suppressed by canonical-form computation and by persistent,
//! copy-on-write duplicate-detection trees forked between sibling search
//! levels.
//!
//! ## Example
//!
//! ```
//! use cellpart::{Catalog, SearchContext, Universe};
//!
//! // the 2-dimensional hypercube: a 4-cycle with a symmetry group of order 8
//! let universe = Universe::hypercube(2).unwrap();
//! let catalog = Catalog::build(&universe, 4);
//! let mut context = SearchContext::new(&universe, &catalog);
//!
//! let mut out = Vec::new();
//! let mut found = 0;
//! for first in 1..=4 {
//!     found += context.run_pass(first, &mut out).unwrap();
//! }
//! // the 4-cycle splits into connected pieces in 5 symmetry-distinct ways
//! assert_eq!(found, 5);
//! assert_eq!(String::from_utf8(out).unwrap().lines().count(), 5);
//! ```

pub mod bitset;
pub mod canonical;
pub mod catalog;
pub mod dup_index;
pub mod enumerate;
mod errors;
pub mod symmetry;
pub mod universe;

pub use crate::bitset::CellSet;
pub use crate::catalog::{Catalog, Piece};
pub use crate::dup_index::{DupTree, SeenOutcome, TreeArena};
pub use crate::enumerate::{Partitions, RunStats, SearchContext};
pub use crate::errors::UniverseError;
pub use crate::symmetry::{Symmetry, SymmetryGroup};
pub use crate::universe::Universe;
