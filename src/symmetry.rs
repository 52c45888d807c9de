//! Symmetry groups acting on the cell index space
//!
//! A symmetry is a permutation of cell indices stored as a lookup table.
//! The groups generated here are closed under composition and list the
//! identity first, which the canonicalization code relies on for its
//! tie-breaking rule.

use crate::bitset::CellSet;

/// A permutation of cell indices, `map[old] == new`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symmetry {
    map: Box<[u8]>,
}

impl Symmetry {
    pub(crate) fn new(map: Box<[u8]>) -> Self {
        Symmetry { map }
    }

    /// Image of a single cell index.
    pub fn map(&self, cell: u8) -> u8 {
        self.map[cell as usize]
    }

    /// Image of a set of cells.
    pub fn apply(&self, set: CellSet) -> CellSet {
        let mut image = CellSet::NONE;
        for cell in set {
            image.insert(self.map[cell as usize]);
        }
        image
    }
}

/// A closed, identity-first list of symmetries of the cell universe.
#[derive(Debug, Clone)]
pub struct SymmetryGroup {
    symmetries: Vec<Symmetry>,
}

impl SymmetryGroup {
    /// Group containing only the identity on `cells` indices.
    pub fn trivial(cells: usize) -> Self {
        let map: Box<[u8]> = (0..cells as u8).collect();
        SymmetryGroup {
            symmetries: vec![Symmetry::new(map)],
        }
    }

    /// The automorphism group of the `dim`-dimensional hypercube on
    /// `2^dim` cells: every permutation of the axes combined with every
    /// per-axis flip. Order `dim! * 2^dim`.
    ///
    /// Cell `i`'s coordinate on axis `a` is bit `a` of `i`.
    pub fn hypercube(dim: u32) -> Self {
        let cells = 1usize << dim;
        let mut symmetries = Vec::new();
        for perm in permutations(dim as usize) {
            for flips in 0..cells as u128 {
                let map = (0..cells)
                    .map(|i| {
                        let mut j = 0usize;
                        for (axis, &target) in perm.iter().enumerate() {
                            j |= (i >> axis & 1) << target;
                        }
                        (j ^ flips as usize) as u8
                    })
                    .collect();
                symmetries.push(Symmetry::new(map));
            }
        }
        SymmetryGroup { symmetries }
    }

    /// The dihedral symmetry group of a `width` x `height` grid, cell
    /// `(x, y)` at index `y * width + x`. Order 8 for squares, 4 otherwise.
    pub fn rectangle(width: usize, height: usize) -> Self {
        let transforms: Vec<fn(usize, usize, usize, usize) -> (usize, usize)> = if width == height
        {
            vec![
                |x, y, _w, _h| (x, y),
                |x, y, _w, h| (h - 1 - y, x),
                |x, y, w, h| (w - 1 - x, h - 1 - y),
                |x, y, w, _h| (y, w - 1 - x),
                |x, y, w, _h| (w - 1 - x, y),
                |x, y, w, h| (h - 1 - y, w - 1 - x),
                |x, y, _w, h| (x, h - 1 - y),
                |x, y, _w, _h| (y, x),
            ]
        } else {
            vec![
                |x, y, _w, _h| (x, y),
                |x, y, w, _h| (w - 1 - x, y),
                |x, y, _w, h| (x, h - 1 - y),
                |x, y, w, h| (w - 1 - x, h - 1 - y),
            ]
        };

        // degenerate grids (width or height 1) make some transforms coincide
        let mut symmetries: Vec<Symmetry> = Vec::new();
        for f in transforms {
            let map: Box<[u8]> = (0..width * height)
                .map(|i| {
                    let (x, y) = f(i % width, i / width, width, height);
                    (y * width + x) as u8
                })
                .collect();
            if symmetries.iter().all(|s| s.map != map) {
                symmetries.push(Symmetry::new(map));
            }
        }
        SymmetryGroup { symmetries }
    }

    /// Number of symmetries in the group.
    pub fn len(&self) -> usize {
        self.symmetries.len()
    }

    /// A group always contains at least the identity.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// The symmetry at `index`; index 0 is the identity.
    pub fn get(&self, index: usize) -> &Symmetry {
        &self.symmetries[index]
    }

    /// Image of `set` under the symmetry at `index`.
    pub fn apply(&self, index: usize, set: CellSet) -> CellSet {
        self.symmetries[index].apply(set)
    }

    /// Iterates over the symmetries in index order.
    pub fn iter(&self) -> impl Iterator<Item = &Symmetry> {
        self.symmetries.iter()
    }
}

/// All permutations of `0..n` in lexicographic order, identity first.
fn permutations(n: usize) -> Vec<Vec<usize>> {
    let mut out = Vec::new();
    let mut current: Vec<usize> = Vec::with_capacity(n);
    let mut used = vec![false; n];
    fill(n, &mut current, &mut used, &mut out);
    out
}

fn fill(n: usize, current: &mut Vec<usize>, used: &mut [bool], out: &mut Vec<Vec<usize>>) {
    if current.len() == n {
        out.push(current.clone());
        return;
    }
    for i in 0..n {
        if !used[i] {
            used[i] = true;
            current.push(i);
            fill(n, current, used, out);
            current.pop();
            used[i] = false;
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn compose(a: &Symmetry, b: &Symmetry, cells: usize) -> Vec<u8> {
        // apply a, then b
        (0..cells as u8).map(|i| b.map(a.map(i))).collect()
    }

    fn assert_is_group(group: &SymmetryGroup, cells: usize) {
        let identity: Vec<u8> = (0..cells as u8).collect();
        assert_eq!(&*group.get(0).map, &identity[..]);

        for a in group.iter() {
            // total bijection
            let mut hit = vec![false; cells];
            for i in 0..cells as u8 {
                hit[a.map(i) as usize] = true;
            }
            assert!(hit.iter().all(|&h| h));

            // closure and inverses
            for b in group.iter() {
                let ab = compose(a, b, cells);
                assert!(group.iter().any(|c| &*c.map == &ab[..]));
            }
            assert!(group
                .iter()
                .any(|b| compose(a, b, cells) == identity));
        }
    }

    #[test]
    fn hypercube_group_order() {
        assert_eq!(SymmetryGroup::hypercube(1).len(), 2);
        assert_eq!(SymmetryGroup::hypercube(2).len(), 8);
        assert_eq!(SymmetryGroup::hypercube(3).len(), 48);
    }

    #[test]
    fn hypercube_is_closed_with_inverses() {
        assert_is_group(&SymmetryGroup::hypercube(2), 4);
        assert_is_group(&SymmetryGroup::hypercube(3), 8);
    }

    #[test]
    fn rectangle_group_order() {
        assert_eq!(SymmetryGroup::rectangle(2, 2).len(), 8);
        assert_eq!(SymmetryGroup::rectangle(3, 2).len(), 4);
    }

    #[test]
    fn rectangle_is_closed_with_inverses() {
        assert_is_group(&SymmetryGroup::rectangle(3, 3), 9);
        assert_is_group(&SymmetryGroup::rectangle(3, 2), 6);
    }

    #[test]
    fn square_group_contains_the_antidiagonal_reflection() {
        let group = SymmetryGroup::rectangle(2, 2);
        // (x, y) -> (1 - y, 1 - x): swaps cells 0 and 3, fixes 1 and 2
        assert!(group
            .iter()
            .any(|s| s.map(0) == 3 && s.map(3) == 0 && s.map(1) == 1 && s.map(2) == 2));
    }

    #[test]
    fn apply_moves_cells() {
        let group = SymmetryGroup::hypercube(2);
        // flipping axis 0 is the permutation 0<->1, 2<->3
        let flip = group
            .iter()
            .find(|s| s.map(0) == 1 && s.map(2) == 3)
            .unwrap();
        assert_eq!(
            flip.apply(CellSet::cell(0) | CellSet::cell(2)),
            CellSet::cell(1) | CellSet::cell(3)
        );
    }
}
