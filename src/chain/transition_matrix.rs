use std::collections::{BTreeMap, BTreeSet};

/// A sparse `N × N` stochastic transition matrix keyed by `(source, destination)`.
///
/// Entries are stored as a row-major adjacency map, with a secondary index of
/// incoming edges so both row-style and column-style iteration are available
/// without scanning the whole matrix. The matrix never materializes a dense
/// `N × N` array.
///
/// An entry with stored probability `0.0` is representable (and round-trips
/// through [`TransitionMatrix::get`]), but every algorithm in this crate treats
/// such entries as absent edges.
#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TransitionMatrix {
    dim: usize,
    rows: BTreeMap<usize, BTreeMap<usize, f64>>,
    incoming: BTreeMap<usize, BTreeSet<usize>>,
}

impl TransitionMatrix {
    /// Create an empty matrix over `dim` states.
    pub fn new(dim: usize) -> TransitionMatrix {
        TransitionMatrix {
            dim,
            rows: BTreeMap::new(),
            incoming: BTreeMap::new(),
        }
    }

    /// The number of states (rows/columns) of this matrix.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Store the transition probability for the `(source, destination)` edge,
    /// replacing any previous value.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of range, or if `probability` is negative,
    /// `NaN` or infinite. Both indicate a malformed call, not a recoverable error.
    pub fn set(&mut self, source: usize, destination: usize, probability: f64) {
        assert!(
            source < self.dim && destination < self.dim,
            "Transition ({},{}) out of range for {} states.",
            source,
            destination,
            self.dim
        );
        assert!(
            probability >= 0.0 && probability.is_finite(),
            "Transition ({},{}) has invalid probability {}.",
            source,
            destination,
            probability
        );
        self.rows.entry(source).or_default().insert(destination, probability);
        self.incoming.entry(destination).or_default().insert(source);
    }

    /// The stored probability of the `(source, destination)` edge, or `0.0` if
    /// no entry is stored.
    pub fn get(&self, source: usize, destination: usize) -> f64 {
        self.rows
            .get(&source)
            .and_then(|row| row.get(&destination))
            .copied()
            .unwrap_or(0.0)
    }

    /// Iterate over all stored entries as `(source, destination, probability)`,
    /// ordered by `(source, destination)`.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        self.rows
            .iter()
            .flat_map(|(&source, row)| row.iter().map(move |(&dest, &p)| (source, dest, p)))
    }

    /// Iterate over the stored entries of one row as `(destination, probability)`.
    pub fn outgoing(&self, source: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.rows
            .get(&source)
            .into_iter()
            .flat_map(|row| row.iter().map(|(&dest, &p)| (dest, p)))
    }

    /// Iterate over the stored entries of one column as `(source, probability)`.
    ///
    /// This is the column-style access required by target consolidation; it only
    /// touches the incoming edges of `destination`, not the whole matrix.
    pub fn incoming(&self, destination: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.incoming
            .get(&destination)
            .into_iter()
            .flat_map(move |sources| {
                sources
                    .iter()
                    .map(move |&source| (source, self.get(source, destination)))
            })
    }

    /// The total outgoing probability mass of one state, counting only
    /// positive entries.
    pub fn row_sum(&self, source: usize) -> f64 {
        self.outgoing(source).filter(|(_, p)| *p > 0.0).map(|(_, p)| p).sum()
    }

    /// The number of stored entries with positive probability.
    pub fn positive_count(&self) -> usize {
        self.iter().filter(|(_, _, p)| *p > 0.0).count()
    }
}
