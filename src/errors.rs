/// Error for the [`Universe`](crate::universe::Universe) constructors
#[derive(Debug, thiserror::Error)]
pub enum UniverseError {
    /// The requested universe doesn't fit in a [`CellSet`](crate::bitset::CellSet)
    #[error("universe of {0} cells exceeds the supported maximum of 128")]
    TooManyCells(usize),
    /// The requested universe has no cells
    #[error("universe must contain at least one cell")]
    Empty,
}
