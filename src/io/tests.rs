//! Round-trip and error tests for the persisted representation.

use super::{ModelError, load_labeling, load_transition_matrix};
use crate::chain::Dtmc;
use crate::test_utils::{dtmc_from_edges, init_logger};
use std::fs;
use std::path::PathBuf;

/// A scratch path prefix unique to one test.
fn scratch_prefix(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("dtmc_reduce_{}_{}", std::process::id(), name))
}

fn write_scratch(name: &str, contents: &str) -> PathBuf {
    let path = scratch_prefix(name);
    fs::write(&path, contents).expect("Failed to write test file");
    path
}

#[test]
fn chain_round_trips_through_files() {
    init_logger();
    let chain = dtmc_from_edges(
        4,
        &[(0, 1, 0.125), (0, 2, 0.875), (1, 3, 1.0), (2, 2, 1.0)],
        &[("init", &[0]), ("target", &[3]), ("sink", &[2, 3])],
    );

    let prefix = scratch_prefix("round_trip");
    let (tra_path, lab_path) = chain.save(&prefix).expect("Failed to save chain");
    let restored = Dtmc::from_files(&lab_path, &tra_path).expect("Failed to load chain");

    assert_eq!(restored, chain);

    fs::remove_file(tra_path).ok();
    fs::remove_file(lab_path).ok();
}

#[test]
fn probabilities_round_trip_losslessly() {
    init_logger();
    // A probability with no short decimal representation.
    let third = 1.0 / 3.0;
    let chain = dtmc_from_edges(
        2,
        &[(0, 1, third), (0, 0, 1.0 - third)],
        &[("init", &[0])],
    );

    let prefix = scratch_prefix("lossless");
    let (tra_path, lab_path) = chain.save(&prefix).expect("Failed to save chain");
    let restored = Dtmc::from_files(&lab_path, &tra_path).expect("Failed to load chain");

    assert_eq!(restored.transitions().get(0, 1), third);
    assert_eq!(restored.transitions().get(0, 0), 1.0 - third);

    fs::remove_file(tra_path).ok();
    fs::remove_file(lab_path).ok();
}

#[test]
fn zero_entries_are_not_persisted() {
    init_logger();
    let mut chain = dtmc_from_edges(3, &[(0, 1, 1.0)], &[("init", &[0])]);
    let matrix = {
        let mut matrix = chain.transitions().clone();
        matrix.set(1, 2, 0.0);
        matrix
    };
    chain = Dtmc::new(matrix, chain.labeling().clone());

    let prefix = scratch_prefix("zero_entries");
    let (tra_path, lab_path) = chain.save(&prefix).expect("Failed to save chain");

    let contents = fs::read_to_string(&tra_path).expect("Failed to read .tra file");
    assert_eq!(contents.lines().count(), 2, "Expected header plus one transition");
    assert!(contents.starts_with("3 1"));

    // The stored zero is gone after the round trip, which is not an error.
    let restored = Dtmc::from_files(&lab_path, &tra_path).expect("Failed to load chain");
    assert_eq!(restored.transitions().get(1, 2), 0.0);
    assert_eq!(restored.transitions().positive_count(), 1);

    fs::remove_file(tra_path).ok();
    fs::remove_file(lab_path).ok();
}

#[test]
fn transition_file_requires_a_header() {
    init_logger();
    let path = write_scratch("no_header.tra", "0 1 0.5\n");
    let result = load_transition_matrix(&path);
    assert!(matches!(result, Err(ModelError::MissingHeader)));
    fs::remove_file(path).ok();
}

#[test]
fn malformed_transition_line_is_reported_with_its_number() {
    init_logger();
    let path = write_scratch("malformed.tra", "2 2\n0 1 0.5\n1 nonsense 0.5\n");
    let result = load_transition_matrix(&path);
    assert!(matches!(result, Err(ModelError::MalformedTransition { line: 3 })));
    fs::remove_file(path).ok();
}

#[test]
fn out_of_range_transition_is_an_error() {
    init_logger();
    let path = write_scratch("out_of_range.tra", "2 1\n0 5 1.0\n");
    let result = load_transition_matrix(&path);
    assert!(matches!(
        result,
        Err(ModelError::StateOutOfRange { state: 5, state_count: 2 })
    ));
    fs::remove_file(path).ok();
}

#[test]
fn negative_probability_is_rejected() {
    init_logger();
    let path = write_scratch("negative.tra", "2 1\n0 1 -0.5\n");
    let result = load_transition_matrix(&path);
    assert!(matches!(result, Err(ModelError::MalformedTransition { line: 2 })));
    fs::remove_file(path).ok();
}

#[test]
fn label_file_parses_header_and_states() {
    init_logger();
    let path = write_scratch("labels.lab", "0=\"init\" 1=\"target\"\n0: 0\n3: 1\n4: 0 1\n");
    let labeling = load_labeling(&path).expect("Failed to load labeling");

    assert_eq!(labeling.states_of("init").unwrap().len(), 2);
    assert_eq!(labeling.states_of("target").unwrap().len(), 2);
    assert!(labeling.states_of("target").unwrap().contains(&3));
    assert!(labeling.labels_by_state()[&4].len() == 2);
    fs::remove_file(path).ok();
}

#[test]
fn undeclared_label_index_is_an_error() {
    init_logger();
    let path = write_scratch("bad_index.lab", "0=\"init\"\n1: 7\n");
    let result = load_labeling(&path);
    assert!(matches!(
        result,
        Err(ModelError::UnknownLabelIndex { line: 2, index: 7 })
    ));
    fs::remove_file(path).ok();
}

#[test]
fn labeled_state_outside_matrix_is_an_error() {
    init_logger();
    let tra = write_scratch("small.tra", "2 1\n0 1 1.0\n");
    let lab = write_scratch("big.lab", "0=\"target\"\n9: 0\n");
    let result = Dtmc::from_files(&lab, &tra);
    assert!(matches!(
        result,
        Err(ModelError::StateOutOfRange { state: 9, state_count: 2 })
    ));
    fs::remove_file(tra).ok();
    fs::remove_file(lab).ok();
}
