//! The cell universe: adjacency and its symmetry group
//!
//! A [`Universe`] fixes everything that stays constant for the lifetime of a
//! run: the number of cells, the adjacency relation used for connectivity and
//! the symmetry group acting on the cell indices. Two adjacency rules are
//! supported, the single-bit-flip hypercube and the 4-neighbor rectangular
//! grid.

use crate::bitset::{CellSet, MAX_CELLS};
use crate::errors::UniverseError;
use crate::symmetry::SymmetryGroup;

/// A fixed finite set of cells with adjacency and symmetries.
#[derive(Debug, Clone)]
pub struct Universe {
    cells: usize,
    all: CellSet,
    neighbors: Vec<CellSet>,
    group: SymmetryGroup,
}

impl Universe {
    /// The `dim`-dimensional hypercube: `2^dim` cells, two cells adjacent
    /// iff their indices differ in exactly one bit.
    pub fn hypercube(dim: u32) -> Result<Self, UniverseError> {
        let cells = 1usize
            .checked_shl(dim)
            .ok_or(UniverseError::TooManyCells(usize::max_value()))?;
        if cells > MAX_CELLS {
            return Err(UniverseError::TooManyCells(cells));
        }
        let neighbors = (0..cells)
            .map(|i| {
                let mut n = CellSet::NONE;
                for axis in 0..dim {
                    n.insert((i ^ (1 << axis)) as u8);
                }
                n
            })
            .collect();
        Ok(Universe {
            cells,
            all: CellSet::first_cells(cells),
            neighbors,
            group: SymmetryGroup::hypercube(dim),
        })
    }

    /// A `width` x `height` grid with 4-neighbor adjacency, cell `(x, y)`
    /// at index `y * width + x`.
    pub fn grid(width: usize, height: usize) -> Result<Self, UniverseError> {
        if width == 0 || height == 0 {
            return Err(UniverseError::Empty);
        }
        let cells = width * height;
        if cells > MAX_CELLS {
            return Err(UniverseError::TooManyCells(cells));
        }
        let neighbors = (0..cells)
            .map(|i| {
                let (x, y) = (i % width, i / width);
                let mut n = CellSet::NONE;
                if x > 0 {
                    n.insert((i - 1) as u8);
                }
                if x + 1 < width {
                    n.insert((i + 1) as u8);
                }
                if y > 0 {
                    n.insert((i - width) as u8);
                }
                if y + 1 < height {
                    n.insert((i + width) as u8);
                }
                n
            })
            .collect();
        Ok(Universe {
            cells,
            all: CellSet::first_cells(cells),
            neighbors,
            group: SymmetryGroup::rectangle(width, height),
        })
    }

    /// Number of cells in the universe.
    pub fn cell_count(&self) -> usize {
        self.cells
    }

    /// The set of all cells.
    pub fn all_cells(&self) -> CellSet {
        self.all
    }

    /// The symmetry group acting on the cell indices.
    pub fn group(&self) -> &SymmetryGroup {
        &self.group
    }

    /// The cells adjacent to `cell`.
    pub fn neighbors(&self, cell: u8) -> CellSet {
        self.neighbors[cell as usize]
    }

    /// The cells adjacent to any member of `set`, excluding `set` itself.
    pub fn boundary(&self, set: CellSet) -> CellSet {
        let mut b = CellSet::NONE;
        for cell in set {
            b |= self.neighbors[cell as usize];
        }
        b.without(set)
    }

    /// Checks that a flood fill from any one cell of `set` reaches every
    /// other cell of `set`. The empty set counts as connected.
    pub fn is_connected(&self, set: CellSet) -> bool {
        let seed = match set.smallest() {
            Some(cell) => cell,
            None => return true,
        };
        let mut reached = CellSet::cell(seed);
        let mut frontier = reached;
        while !frontier.is_empty() {
            let mut grown = CellSet::NONE;
            for cell in frontier {
                grown |= self.neighbors[cell as usize];
            }
            frontier = (grown & set).without(reached);
            reached |= frontier;
        }
        reached == set
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn hypercube_adjacency() {
        let u = Universe::hypercube(3).unwrap();
        assert_eq!(u.cell_count(), 8);
        assert_eq!(
            u.neighbors(0),
            CellSet::cell(1) | CellSet::cell(2) | CellSet::cell(4)
        );
        // antipodal cells are never adjacent
        assert!(!u.neighbors(0).has(7));
    }

    #[test]
    fn grid_adjacency() {
        let u = Universe::grid(3, 2).unwrap();
        assert_eq!(u.cell_count(), 6);
        // corner
        assert_eq!(u.neighbors(0), CellSet::cell(1) | CellSet::cell(3));
        // middle of the top row
        assert_eq!(
            u.neighbors(1),
            CellSet::cell(0) | CellSet::cell(2) | CellSet::cell(4)
        );
    }

    #[test]
    fn connectivity() {
        let u = Universe::grid(3, 2).unwrap();
        let path = CellSet::cell(0) | CellSet::cell(1) | CellSet::cell(4);
        assert!(u.is_connected(path));
        let split = CellSet::cell(0) | CellSet::cell(2);
        assert!(!u.is_connected(split));
        assert!(u.is_connected(CellSet::NONE));
        assert!(u.is_connected(u.all_cells()));
    }

    #[test]
    fn boundary_excludes_the_set() {
        let u = Universe::grid(3, 2).unwrap();
        let set = CellSet::cell(0) | CellSet::cell(1);
        assert_eq!(
            u.boundary(set),
            CellSet::cell(2) | CellSet::cell(3) | CellSet::cell(4)
        );
    }

    #[test]
    fn oversized_universes_are_rejected() {
        assert!(Universe::hypercube(8).is_err());
        assert!(Universe::grid(20, 20).is_err());
        assert!(Universe::grid(0, 5).is_err());
        assert!(Universe::hypercube(7).is_ok());
    }
}
