use std::collections::BTreeSet;

#[cfg(test)]
mod test_utils;

pub mod chain;
pub mod io;
pub mod reachability;
pub mod reduction;

pub use chain::{Dtmc, Labeling, TransitionMatrix};
pub use reduction::{OriginalState, ReducedChain, StateMapping};

/// A set of state indices, as produced by reachability passes and consumed by the
/// reduction pipeline. Sorted iteration keeps reindexing deterministic.
pub type StateSet = BTreeSet<usize>;

/// A utility method for printing useful metadata of state sets.
fn log_set(set: &StateSet) -> String {
    format!("states={}", set.len())
}

/// Extract the "simple name" of a type argument at compile time.
///
/// In the future, this should be a `const fn`, but `type_name` and `unwrap_or` are not
/// yet stabilized as `const` functions (even thought they probably are).
fn simple_type_name<T>() -> &'static str {
    std::any::type_name::<T>().split("::").last().unwrap_or("?")
}
