//! The backtracking search over piece placements
//!
//! One outer pass fixes the size of the first (largest) piece, iterates the
//! integer partitions of the universe with that leading part, and fills the
//! universe left to right along the partition's parts. Piece sizes never
//! increase along a branch, so placements of equal-size pieces are tried
//! contiguously and sibling levels of the same size can share their
//! duplicate index by forking it instead of rebuilding it.
//!
//! Three layers of duplicate suppression interact here:
//! - the per-level [`DupTree`] of placement images, forked from the parent
//!   level while the size stays the same;
//! - the canonical-prefix seen-sets, one per piece count, which prune whole
//!   branches congruent to an already-explored partial solution;
//! - the seen-set of complete canonical solutions, which makes the emission
//!   stream duplicate-free.

use std::io::{self, Write};
use std::time::{Duration, Instant};

use crate::bitset::CellSet;
use crate::canonical::canonical_sequence;
use crate::catalog::Catalog;
use crate::dup_index::{DupTree, SeenOutcome, TreeArena};
use crate::universe::Universe;

/// A progress line goes to stderr whenever the solution count has all of
/// these bits clear, i.e. every 65536 solutions.
const REPORT_MASK: u64 = (1 << 16) - 1;

/// Counters kept while searching. The placement and skip counts are
/// diagnostics; the deduplicated `solutions` count is the deliverable.
#[derive(Debug, Clone)]
pub struct RunStats {
    /// Canonically-distinct solutions emitted.
    pub solutions: u64,
    /// Placements pushed (search tree nodes).
    pub placements: u64,
    /// Placements skipped by a level's duplicate index.
    pub shape_skips: u64,
    /// Branches pruned by the canonical-prefix seen-sets.
    pub prefix_skips: u64,
    started: Instant,
}

impl RunStats {
    fn new() -> Self {
        RunStats {
            solutions: 0,
            placements: 0,
            shape_skips: 0,
            prefix_skips: 0,
            started: Instant::now(),
        }
    }

    /// Time since the search context was created.
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

/// All state one search run needs: the read-only inputs, the node arenas
/// backing every duplicate index, and the per-piece-count seen-sets.
pub struct SearchContext<'a> {
    universe: &'a Universe,
    catalog: &'a Catalog,
    /// arena for the per-level placement-image trees
    shapes: TreeArena<CellSet>,
    /// arena for the canonical-sequence seen-sets
    prefixes: TreeArena<Vec<CellSet>>,
    /// `seen[k]` holds canonical prefixes of `k` placements; slot 0 holds
    /// the complete canonical solutions of the current partition pass
    seen: Vec<DupTree>,
    stats: RunStats,
    verbose: bool,
}

impl<'a> SearchContext<'a> {
    /// A fresh context over a universe and its piece catalog.
    pub fn new(universe: &'a Universe, catalog: &'a Catalog) -> Self {
        let seen = (0..=universe.cell_count()).map(|_| DupTree::new()).collect();
        SearchContext {
            universe,
            catalog,
            shapes: TreeArena::new(),
            prefixes: TreeArena::new(),
            seen,
            stats: RunStats::new(),
            verbose: false,
        }
    }

    /// The counters accumulated so far.
    pub fn stats(&self) -> &RunStats {
        &self.stats
    }

    /// Enables the stderr progress output (partition banners and the
    /// periodic solution report).
    pub fn set_verbose(&mut self, verbose: bool) {
        self.verbose = verbose;
    }

    /// Runs one outer pass: every partition of the universe whose largest
    /// part is exactly `first`. Accepted solutions are written to `out`, one
    /// line each. Returns the number of solutions this pass found.
    pub fn run_pass<W: Write>(&mut self, first: u32, out: &mut W) -> io::Result<u64> {
        let cells = self.universe.cell_count() as u32;
        let catalog = self.catalog;
        let before = self.stats.solutions;

        for parts in Partitions::new(cells, first) {
            if self.verbose {
                eprintln!("try partition: {:?}", parts);
            }
            let mut seen = DupTree::new();
            let mut result = Ok(());
            for index in catalog.size_range(first as usize) {
                let piece = catalog.piece(index);
                let mut placements = vec![piece.cells];
                let free = self.universe.all_cells() ^ piece.cells;
                // the first piece is placed untransformed only; mark it
                // tried so forked same-size levels below skip its image
                self.shapes.seen(&mut seen, &piece.cells);
                result = self.recurse(&parts, &mut placements, free, index, &seen, out);
                if result.is_err() {
                    break;
                }
            }
            self.shapes.destroy(seen);
            self.reset_seen();
            result?;
        }
        Ok(self.stats.solutions - before)
    }

    /// Destroys every per-piece-count seen-set. Called between partition
    /// passes; solutions of different partitions can never coincide.
    pub fn reset_seen(&mut self) {
        for index in 0..self.seen.len() {
            let old = std::mem::replace(&mut self.seen[index], DupTree::new());
            self.prefixes.destroy(old);
        }
    }

    fn recurse<W: Write>(
        &mut self,
        parts: &[u32],
        placements: &mut Vec<CellSet>,
        free: CellSet,
        min_index: usize,
        parent_seen: &DupTree,
        out: &mut W,
    ) -> io::Result<()> {
        let level = placements.len();
        if level == parts.len() {
            debug_assert!(free.is_empty());
            return self.accept(placements, out);
        }
        let size = parts[level];
        if size == 1 {
            // the remaining parts are all singletons and fit only one way
            let held = placements.len();
            for cell in free {
                placements.push(CellSet::cell(cell));
            }
            let result = self.accept(placements, out);
            placements.truncate(held);
            return result;
        }
        if level + 1 == parts.len() {
            // one piece left; it must be exactly the free set
            debug_assert_eq!(free.len(), size);
            if self.universe.is_connected(free) {
                placements.push(free);
                let result = self.accept(placements, out);
                placements.pop();
                return result;
            }
            return Ok(());
        }

        let universe = self.universe;
        let catalog = self.catalog;
        let group = universe.group();

        // same size as the level above: fork its index so placements
        // congruent to ones already tried there are skipped, and resume
        // from the same piece to keep equal-size slots ordered
        let (mut seen, start) = if size == parts[level - 1] {
            (self.shapes.duplicate(parent_seen), min_index)
        } else {
            (DupTree::new(), catalog.size_range(size as usize).start)
        };
        let end = catalog.size_range(size as usize).end;

        let mut result = Ok(());
        'pieces: for index in start..end {
            let piece = catalog.piece(index);
            for &sym in piece.syms.iter() {
                let shape = group.apply(sym as usize, piece.cells);
                if !free.contains(shape) {
                    continue;
                }
                if self.shapes.seen(&mut seen, &shape) == SeenOutcome::Exists {
                    self.stats.shape_skips += 1;
                    continue;
                }
                self.stats.placements += 1;
                placements.push(shape);
                let (prefix, _) = canonical_sequence(group, placements);
                let count = placements.len();
                if self.prefixes.seen(&mut self.seen[count], &prefix) == SeenOutcome::Exists {
                    self.stats.prefix_skips += 1;
                    placements.pop();
                    continue;
                }
                debug_assert!(free.contains(shape));
                result = self.recurse(parts, placements, free ^ shape, index, &seen, out);
                placements.pop();
                if result.is_err() {
                    break 'pieces;
                }
            }
        }
        self.shapes.destroy(seen);
        result
    }

    /// A complete cover: canonicalize, drop it if this partition pass has
    /// already produced a congruent solution, emit it otherwise.
    fn accept<W: Write>(&mut self, placements: &[CellSet], out: &mut W) -> io::Result<()> {
        debug_assert_eq!(
            placements.iter().fold(CellSet::NONE, |acc, &p| {
                debug_assert!(!acc.overlaps(p));
                acc | p
            }),
            self.universe.all_cells()
        );

        let (canon, _) = canonical_sequence(self.universe.group(), placements);
        if self.prefixes.seen(&mut self.seen[0], &canon) == SeenOutcome::Exists {
            return Ok(());
        }
        let line = render_partition(self.universe.cell_count(), &canon);
        writeln!(out, "{}", line)?;
        self.stats.solutions += 1;
        if self.verbose && self.stats.solutions & REPORT_MASK == 0 {
            eprintln!(
                "{}: {} ({:.2?})",
                self.stats.solutions,
                line,
                self.stats.started.elapsed()
            );
        }
        Ok(())
    }
}

/// Renders a solution as one symbol per cell in cell-index order, giving the
/// 1-based number of the piece occupying that cell. Solutions with more than
/// 61 pieces fall back to space-separated decimal labels.
pub fn render_partition(cells: usize, pieces: &[CellSet]) -> String {
    let mut labels = vec![0usize; cells];
    for (number, &piece) in pieces.iter().enumerate() {
        for cell in piece {
            labels[cell as usize] = number + 1;
        }
    }
    debug_assert!(labels.iter().all(|&label| label > 0));

    const SYMBOLS: &[u8] = b"123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";
    if pieces.len() <= SYMBOLS.len() {
        labels.iter().map(|&label| SYMBOLS[label - 1] as char).collect()
    } else {
        let labels: Vec<String> = labels.iter().map(|label| label.to_string()).collect();
        labels.join(" ")
    }
}

/// Iterator over the integer partitions of `total` whose largest part is
/// exactly `first`, parts non-increasing, in reverse lexicographic order.
pub struct Partitions {
    first: u32,
    tail: Vec<u32>,
    state: PartitionsState,
}

enum PartitionsState {
    NotStarted,
    Running,
    Done,
}

impl Partitions {
    /// Partitions of `total` led by a part of exactly `first`.
    pub fn new(total: u32, first: u32) -> Self {
        if first == 0 || first > total {
            return Partitions {
                first,
                tail: Vec::new(),
                state: PartitionsState::Done,
            };
        }
        let mut tail = Vec::new();
        fill_greedy(&mut tail, total - first, first);
        Partitions {
            first,
            tail,
            state: PartitionsState::NotStarted,
        }
    }

    fn emit(&self) -> Vec<u32> {
        let mut parts = Vec::with_capacity(1 + self.tail.len());
        parts.push(self.first);
        parts.extend_from_slice(&self.tail);
        parts
    }
}

impl Iterator for Partitions {
    type Item = Vec<u32>;

    fn next(&mut self) -> Option<Vec<u32>> {
        match self.state {
            PartitionsState::Done => None,
            PartitionsState::NotStarted => {
                self.state = PartitionsState::Running;
                Some(self.emit())
            }
            PartitionsState::Running => {
                // decrement the rightmost part above 1 and redistribute
                // everything after it as large as the new cap allows
                match self.tail.iter().rposition(|&part| part > 1) {
                    None => {
                        self.state = PartitionsState::Done;
                        None
                    }
                    Some(index) => {
                        let amount: u32 = self.tail[index..].iter().sum();
                        let cap = self.tail[index] - 1;
                        self.tail.truncate(index);
                        fill_greedy(&mut self.tail, amount, cap);
                        Some(self.emit())
                    }
                }
            }
        }
    }
}

fn fill_greedy(parts: &mut Vec<u32>, mut amount: u32, cap: u32) {
    while amount > 0 {
        let part = cap.min(amount);
        parts.push(part);
        amount -= part;
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn collect(total: u32, first: u32) -> Vec<Vec<u32>> {
        Partitions::new(total, first).collect()
    }

    #[test]
    fn partitions_of_small_totals() {
        assert_eq!(collect(4, 4), vec![vec![4]]);
        assert_eq!(collect(4, 3), vec![vec![3, 1]]);
        assert_eq!(collect(4, 2), vec![vec![2, 2], vec![2, 1, 1]]);
        assert_eq!(collect(4, 1), vec![vec![1, 1, 1, 1]]);
        assert_eq!(collect(4, 5), Vec::<Vec<u32>>::new());
    }

    #[test]
    fn partitions_are_exhaustive_and_non_increasing() {
        // p(8) = 22, split across leading parts
        let total: usize = (1..=8).map(|first| collect(8, first).len()).sum();
        assert_eq!(total, 22);

        for parts in (1..=8).flat_map(|first| collect(8, first)) {
            assert_eq!(parts.iter().sum::<u32>(), 8);
            assert!(parts.windows(2).all(|w| w[0] >= w[1]));
        }
    }

    #[test]
    fn rendering_numbers_pieces_in_order() {
        let pieces = [
            CellSet::cell(0) | CellSet::cell(1),
            CellSet::cell(3),
            CellSet::cell(2),
        ];
        assert_eq!(render_partition(4, &pieces), "1132");
    }

    #[test]
    fn rendering_falls_back_to_decimal_labels_past_61_pieces() {
        let pieces: Vec<CellSet> = (0..62).map(CellSet::cell).collect();
        let line = render_partition(62, &pieces);
        let labels: Vec<usize> = line
            .split(' ')
            .map(|label| label.parse().unwrap())
            .collect();
        assert_eq!(labels, (1..=62).collect::<Vec<_>>());
    }
}
