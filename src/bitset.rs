//! Fixed-size bitsets over the cell universe
//!
//! Every component of the search deals in sets of cells: pieces, placement
//! images, the filled/free halves of a partial solution. This module contains
//! a space-efficient fixed-width bitset for cell indices together with the
//! total order the canonicalization code relies on.

use std::fmt;
use std::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign};

/// Largest number of cells a universe may contain.
pub const MAX_CELLS: usize = 128;

/// Fixed-size bitset of cell indices.
///
/// The derived `Ord` compares raw bit patterns with the highest cell index as
/// the most significant bit. This is the single total order used for
/// canonical-form selection and for the keys of the duplicate index; all
/// components must agree on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct CellSet(u128);

/// Iterator over the cells contained in a [`CellSet`], lowest index first.
#[derive(Debug, Clone, Copy)]
pub struct CellIter(u128);

macro_rules! impl_binary_bitops {
    ( $( $trait:ident, $fn_name:ident);* $(;)* ) => {
        $(
            impl $trait for CellSet {
                type Output = Self;

                #[inline(always)]
                fn $fn_name(self, other: Self) -> Self {
                    CellSet($trait::$fn_name(self.0, other.0))
                }
            }
        )*
    };
}

macro_rules! impl_bitops_assign {
    ( $( $trait:ident, $fn_name:ident);* $(;)* ) => {
        $(
            impl $trait for CellSet {
                #[inline(always)]
                fn $fn_name(&mut self, other: Self) {
                    $trait::$fn_name(&mut self.0, other.0)
                }
            }
        )*
    };
}

impl_binary_bitops!(
    BitAnd, bitand;
    BitOr, bitor;
    BitXor, bitxor;
);

impl_bitops_assign!(
    BitAndAssign, bitand_assign;
    BitOrAssign, bitor_assign;
    BitXorAssign, bitxor_assign;
);

impl CellSet {
    /// Empty set.
    pub const NONE: CellSet = CellSet(0);

    /// Returns the set containing only `cell`.
    pub fn cell(cell: u8) -> Self {
        debug_assert!((cell as usize) < MAX_CELLS);
        CellSet(1 << cell)
    }

    /// Returns the set of the first `n` cells, i.e. the full universe mask
    /// for an `n`-cell universe.
    pub fn first_cells(n: usize) -> Self {
        assert!(n <= MAX_CELLS);
        if n == MAX_CELLS {
            CellSet(!0)
        } else {
            CellSet((1u128 << n) - 1)
        }
    }

    /// Construct a set from a raw bit pattern.
    pub fn from_bits(bits: u128) -> Self {
        CellSet(bits)
    }

    /// Return the raw bit pattern backing the set.
    pub fn bits(self) -> u128 {
        self.0
    }

    /// Adds `cell` to the set.
    pub fn insert(&mut self, cell: u8) {
        debug_assert!((cell as usize) < MAX_CELLS);
        self.0 |= 1 << cell;
    }

    /// Returns `self` with `cell` added.
    pub fn with(self, cell: u8) -> Self {
        self | CellSet::cell(cell)
    }

    /// Checks whether `cell` is in the set.
    pub fn has(self, cell: u8) -> bool {
        self.0 >> cell & 1 != 0
    }

    /// Returns the cells in this set that aren't present in `other`.
    pub fn without(self, other: Self) -> Self {
        CellSet(self.0 & !other.0)
    }

    /// Checks if `self` and `other` share any cell.
    pub fn overlaps(self, other: Self) -> bool {
        self & other != CellSet::NONE
    }

    /// Checks if every cell of `other` is in `self`.
    pub fn contains(self, other: Self) -> bool {
        self & other == other
    }

    /// Returns the number of cells in the set.
    pub fn len(self) -> u32 {
        self.0.count_ones()
    }

    /// Checks whether the set contains no cell.
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns the lowest cell index in the set, if any.
    pub fn smallest(self) -> Option<u8> {
        if self.0 == 0 {
            None
        } else {
            Some(self.0.trailing_zeros() as u8)
        }
    }

    /// Iterates over the contained cells, lowest index first.
    pub fn iter(self) -> CellIter {
        CellIter(self.0)
    }
}

impl IntoIterator for CellSet {
    type Item = u8;
    type IntoIter = CellIter;

    fn into_iter(self) -> CellIter {
        CellIter(self.0)
    }
}

impl Iterator for CellIter {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        if self.0 == 0 {
            return None;
        }
        let lowest_bit = self.0 & (!self.0 + 1);
        let bit_pos = lowest_bit.trailing_zeros() as u8;
        self.0 ^= lowest_bit;
        Some(bit_pos)
    }
}

impl fmt::Binary for CellSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:b}", self.0)
    }
}
