//! Canonical forms under the symmetry group
//!
//! The canonical form of a cell set (or of an ordered placement sequence) is
//! its minimal image under the group, with respect to the total order defined
//! by [`CellSet`]'s `Ord`. Ties between symmetries producing the same minimal
//! image are broken towards the lowest symmetry index, so the identity wins
//! whenever the input is already canonical.

use crate::bitset::CellSet;
use crate::symmetry::SymmetryGroup;

/// Returns the minimal image of `set` under `group` and the index of the
/// symmetry that produced it.
pub fn canonical_set(group: &SymmetryGroup, set: CellSet) -> (CellSet, u32) {
    let mut best = set;
    let mut best_sym = 0u32;
    for index in 1..group.len() {
        let image = group.apply(index, set);
        if image < best {
            best = image;
            best_sym = index as u32;
        }
    }
    (best, best_sym)
}

/// Returns the minimal image of a placement sequence under `group` and the
/// index of the symmetry that produced it.
///
/// `sequence` must be ordered by non-increasing piece size. A symmetry maps
/// every piece simultaneously; since piece sizes are preserved, the runs of
/// equal-size pieces keep their boundaries and only the order within a run is
/// normalized (sorted ascending) before sequences are compared element-wise.
pub fn canonical_sequence(group: &SymmetryGroup, sequence: &[CellSet]) -> (Vec<CellSet>, u32) {
    debug_assert!(sequence.windows(2).all(|w| w[0].len() >= w[1].len()));

    let mut best = sequence.to_vec();
    sort_size_runs(&mut best);
    let mut best_sym = 0u32;
    let mut image = Vec::with_capacity(sequence.len());
    for index in 1..group.len() {
        image.clear();
        image.extend(sequence.iter().map(|&piece| group.apply(index, piece)));
        sort_size_runs(&mut image);
        if image < best {
            std::mem::swap(&mut best, &mut image);
            best_sym = index as u32;
        }
    }
    (best, best_sym)
}

/// Sorts each maximal run of equal-size pieces ascending, leaving the run
/// boundaries in place.
fn sort_size_runs(sequence: &mut [CellSet]) {
    let mut start = 0;
    while start < sequence.len() {
        let size = sequence[start].len();
        let end = start
            + sequence[start..]
                .iter()
                .take_while(|piece| piece.len() == size)
                .count();
        sequence[start..end].sort_unstable();
        start = end;
    }
}
