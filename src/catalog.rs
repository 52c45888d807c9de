//! The piece catalog: canonically-distinct connected shapes
//!
//! Pieces of size `s` are generated by extending every size-`s-1`
//! representative with one boundary cell, canonicalizing the result and
//! deduplicating through a [`TreeArena`]. Within one size the catalog holds
//! exactly one piece per symmetry orbit of connected shapes, stored in
//! increasing order of the total order.

use crate::bitset::CellSet;
use crate::canonical::canonical_set;
use crate::dup_index::{DupTree, SeenOutcome, TreeArena};
use crate::symmetry::SymmetryGroup;
use crate::universe::Universe;

/// A connected shape, canonical within its symmetry orbit.
#[derive(Debug, Clone)]
pub struct Piece {
    /// The canonical cell set of the piece.
    pub cells: CellSet,
    /// Symmetry indices producing pairwise-distinct images of `cells`,
    /// identity first. Applying only these avoids re-deriving images the
    /// piece's stabilizer maps onto each other.
    pub syms: Box<[u32]>,
}

/// Pieces partitioned into contiguous ranges by size.
#[derive(Debug)]
pub struct Catalog {
    pieces: Vec<Piece>,
    /// `bounds[s]..bounds[s + 1]` is the index range of size-`s` pieces.
    bounds: Vec<usize>,
}

impl Catalog {
    /// Builds the catalog of all connected pieces of size 1 up to
    /// `max_size` in `universe`.
    pub fn build(universe: &Universe, max_size: usize) -> Catalog {
        let group = universe.group();
        let mut arena: TreeArena<CellSet> = TreeArena::new();
        let mut pieces: Vec<Piece> = Vec::new();
        let mut bounds = vec![0; max_size + 2];

        for size in 1..=max_size {
            let mut seen = DupTree::new();
            if size == 1 {
                for cell in universe.all_cells() {
                    let (canon, _) = canonical_set(group, CellSet::cell(cell));
                    arena.seen(&mut seen, &canon);
                }
            } else {
                for index in bounds[size - 1]..bounds[size] {
                    let shape = pieces[index].cells;
                    for cell in universe.boundary(shape) {
                        let (canon, _) = canonical_set(group, shape.with(cell));
                        arena.seen(&mut seen, &canon);
                    }
                }
            }
            // in-order traversal delivers the new size class already sorted
            let shapes = arena.in_order(&seen);
            arena.destroy(seen);
            for cells in shapes {
                debug_assert!(universe.is_connected(cells));
                let syms = distinct_syms(group, cells, &mut arena);
                pieces.push(Piece { cells, syms });
            }
            bounds[size + 1] = pieces.len();
        }

        Catalog { pieces, bounds }
    }

    /// Index range of the size-`size` pieces.
    pub fn size_range(&self, size: usize) -> std::ops::Range<usize> {
        self.bounds[size]..self.bounds[size + 1]
    }

    /// Number of pieces of the given size.
    pub fn count(&self, size: usize) -> usize {
        self.size_range(size).len()
    }

    /// The piece at `index`.
    pub fn piece(&self, index: usize) -> &Piece {
        &self.pieces[index]
    }

    /// Total number of pieces across all sizes.
    pub fn total(&self) -> usize {
        self.pieces.len()
    }

    /// Largest size the catalog was built for.
    pub fn max_size(&self) -> usize {
        self.bounds.len() - 2
    }
}

/// The symmetry indices whose images of `shape` are pairwise distinct.
fn distinct_syms(group: &SymmetryGroup, shape: CellSet, arena: &mut TreeArena<CellSet>) -> Box<[u32]> {
    let mut seen = DupTree::new();
    let mut syms = Vec::new();
    for index in 0..group.len() {
        let image = group.apply(index, shape);
        if arena.seen(&mut seen, &image) == SeenOutcome::Inserted {
            syms.push(index as u32);
        }
    }
    arena.destroy(seen);
    syms.into_boxed_slice()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn four_cycle_has_one_piece_per_size() {
        // hypercube dim 2 is a 4-cycle with a symmetry group of order 8
        let universe = Universe::hypercube(2).unwrap();
        let catalog = Catalog::build(&universe, 4);
        for size in 1..=4 {
            assert_eq!(catalog.count(size), 1, "size {}", size);
        }
        assert_eq!(catalog.total(), 4);
    }

    #[test]
    fn pieces_are_connected_and_canonical() {
        let universe = Universe::grid(3, 3).unwrap();
        let catalog = Catalog::build(&universe, 4);
        let group = universe.group();
        for index in 0..catalog.total() {
            let piece = catalog.piece(index);
            assert!(universe.is_connected(piece.cells));
            assert_eq!(canonical_set(group, piece.cells).0, piece.cells);
            assert_eq!(piece.syms[0], 0);
        }
    }

    #[test]
    fn no_two_pieces_share_an_orbit() {
        let universe = Universe::grid(3, 2).unwrap();
        let catalog = Catalog::build(&universe, 6);
        let group = universe.group();
        for size in 1..=6 {
            let range = catalog.size_range(size);
            for a in range.clone() {
                for b in range.clone() {
                    if a == b {
                        continue;
                    }
                    let shape = catalog.piece(a).cells;
                    for index in 0..group.len() {
                        assert_ne!(group.apply(index, shape), catalog.piece(b).cells);
                    }
                }
            }
        }
    }

    /// Orbit count of connected size-`size` subsets by exhaustive generation.
    fn brute_force_orbits(universe: &Universe, size: u32) -> usize {
        use std::collections::BTreeSet;
        let cells = universe.cell_count();
        let group = universe.group();
        let mut orbits = BTreeSet::new();
        for bits in 0u128..1 << cells {
            let set = CellSet::from_bits(bits);
            if set.len() == size && universe.is_connected(set) {
                orbits.insert(canonical_set(group, set).0);
            }
        }
        orbits.len()
    }

    #[test]
    fn counts_match_brute_force_orbit_counting() {
        for universe in &[
            Universe::grid(3, 3).unwrap(),
            Universe::grid(3, 2).unwrap(),
            Universe::hypercube(3).unwrap(),
        ] {
            let catalog = Catalog::build(universe, 4);
            for size in 1..=4 {
                assert_eq!(
                    catalog.count(size),
                    brute_force_orbits(universe, size as u32),
                    "size {}",
                    size
                );
            }
        }
    }

    #[test]
    fn disconnected_shapes_never_enter_the_catalog() {
        let universe = Universe::grid(3, 1).unwrap();
        let catalog = Catalog::build(&universe, 3);
        // 1x3 strip: the end cells and the middle cell form distinct orbits;
        // the disconnected two-end pair must not appear as a size-2 piece
        assert_eq!(catalog.count(1), 2);
        assert_eq!(catalog.count(2), 1);
        assert_eq!(catalog.count(3), 1);
        let ends = CellSet::cell(0) | CellSet::cell(2);
        for index in catalog.size_range(2) {
            assert_ne!(catalog.piece(index).cells, ends);
        }
    }
}
