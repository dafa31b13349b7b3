//! Reading and writing the persisted chain representation.
//!
//! A chain is persisted as two plain-text files:
//!
//! - a `.tra` file with a header line `"<states> <transitions>"` followed by
//!   one `"<source> <destination> <probability>"` line per positive entry;
//! - a `.lab` file with a header of `<index>="<label>"` declarations followed
//!   by one `"<state>: <index> ..."` line per labeled state.
//!
//! Zero-probability entries are never persisted, and their absence is not an
//! error; positive entries round-trip losslessly (probabilities are written
//! with the shortest representation that parses back to the same value).
//!
//! Errors at this boundary are recoverable: malformed input produces a
//! [`ModelError`] instead of a panic, because the data originates outside the
//! calling program.

use crate::StateSet;
use crate::chain::{Dtmc, Labeling, TransitionMatrix};
use log::debug;
use std::collections::BTreeMap;
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

#[cfg(test)]
mod tests;

/// Error type for loading a persisted chain.
#[derive(Debug)]
pub enum ModelError {
    /// An underlying I/O failure.
    Io(std::io::Error),
    /// The `.tra` file does not start with a `"<states> <transitions>"` header.
    MissingHeader,
    /// A line of the `.tra` file is not a valid transition declaration.
    MalformedTransition { line: usize },
    /// The header of the `.lab` file contains an invalid label declaration.
    MalformedLabelDeclaration { line: usize },
    /// A line of the `.lab` file is not a valid state labeling.
    MalformedStateLabels { line: usize },
    /// A state labeling refers to a label index missing from the header.
    UnknownLabelIndex { line: usize, index: usize },
    /// A declared state index is outside the state space of the matrix.
    StateOutOfRange { state: usize, state_count: usize },
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelError::Io(e) => write!(f, "I/O error: {}", e),
            ModelError::MissingHeader => {
                write!(f, "Transition file does not start with a \"states transitions\" header")
            }
            ModelError::MalformedTransition { line } => {
                write!(f, "Line {} is not a \"source destination probability\" triple", line)
            }
            ModelError::MalformedLabelDeclaration { line } => {
                write!(f, "Line {} contains an invalid index=\"label\" declaration", line)
            }
            ModelError::MalformedStateLabels { line } => {
                write!(f, "Line {} is not a \"state: label-index ...\" declaration", line)
            }
            ModelError::UnknownLabelIndex { line, index } => {
                write!(f, "Line {} refers to undeclared label index {}", line, index)
            }
            ModelError::StateOutOfRange { state, state_count } => {
                write!(f, "State {} is out of range for {} states", state, state_count)
            }
        }
    }
}

impl std::error::Error for ModelError {}

impl From<std::io::Error> for ModelError {
    fn from(value: std::io::Error) -> Self {
        ModelError::Io(value)
    }
}

/// Load a sparse transition matrix from a `.tra` file.
pub fn load_transition_matrix(path: &Path) -> Result<TransitionMatrix, ModelError> {
    let reader = BufReader::new(File::open(path)?);
    let mut lines = reader.lines().enumerate();

    // The first non-empty line must be the "<states> <transitions>" header.
    let mut matrix = loop {
        let Some((_, line)) = lines.next() else {
            return Err(ModelError::MissingHeader);
        };
        let line = line?;
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.is_empty() {
            continue;
        }
        let [states, _transitions] = fields.as_slice() else {
            return Err(ModelError::MissingHeader);
        };
        let states: usize = states.parse().map_err(|_| ModelError::MissingHeader)?;
        break TransitionMatrix::new(states);
    };

    for (index, line) in lines {
        let line = line?;
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.is_empty() {
            continue;
        }

        let [source, dest, probability] = fields.as_slice() else {
            return Err(ModelError::MalformedTransition { line: index + 1 });
        };
        let (Ok(source), Ok(dest), Ok(probability)) = (
            source.parse::<usize>(),
            dest.parse::<usize>(),
            probability.parse::<f64>(),
        ) else {
            return Err(ModelError::MalformedTransition { line: index + 1 });
        };
        if !(probability >= 0.0 && probability.is_finite()) {
            return Err(ModelError::MalformedTransition { line: index + 1 });
        }
        if source >= matrix.dim() || dest >= matrix.dim() {
            return Err(ModelError::StateOutOfRange {
                state: source.max(dest),
                state_count: matrix.dim(),
            });
        }
        matrix.set(source, dest, probability);
    }

    Ok(matrix)
}

/// Load a state labeling from a `.lab` file.
pub fn load_labeling(path: &Path) -> Result<Labeling, ModelError> {
    let reader = BufReader::new(File::open(path)?);
    let mut label_names: BTreeMap<usize, String> = BTreeMap::new();
    let mut states_by_label: BTreeMap<String, StateSet> = BTreeMap::new();
    let mut seen_header = false;

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        if !seen_header {
            for declaration in line.split_whitespace() {
                let (label_index, name) = declaration
                    .split_once('=')
                    .and_then(|(label_index, quoted)| {
                        let name = quoted.strip_prefix('"')?.strip_suffix('"')?;
                        Some((label_index.parse::<usize>().ok()?, name))
                    })
                    .ok_or(ModelError::MalformedLabelDeclaration { line: index + 1 })?;
                label_names.insert(label_index, name.to_string());
                states_by_label.entry(name.to_string()).or_default();
            }
            seen_header = true;
            continue;
        }

        let (state, indices) = line
            .split_once(':')
            .and_then(|(state, indices)| Some((state.trim().parse::<usize>().ok()?, indices)))
            .ok_or(ModelError::MalformedStateLabels { line: index + 1 })?;
        for label_index in indices.split_whitespace() {
            let label_index: usize = label_index
                .parse()
                .map_err(|_| ModelError::MalformedStateLabels { line: index + 1 })?;
            let name = label_names.get(&label_index).ok_or(ModelError::UnknownLabelIndex {
                line: index + 1,
                index: label_index,
            })?;
            states_by_label.entry(name.clone()).or_default().insert(state);
        }
    }

    Ok(Labeling::from(states_by_label))
}

impl Dtmc {
    /// Load a chain from a `.lab` and a `.tra` file.
    pub fn from_files(label_path: &Path, transition_path: &Path) -> Result<Dtmc, ModelError> {
        let matrix = load_transition_matrix(transition_path)?;
        let labeling = load_labeling(label_path)?;
        if let Some(max_state) = labeling.max_state() {
            if max_state >= matrix.dim() {
                return Err(ModelError::StateOutOfRange {
                    state: max_state,
                    state_count: matrix.dim(),
                });
            }
        }
        debug!(
            "Loaded chain with {} states and {} transitions.",
            matrix.dim(),
            matrix.positive_count()
        );
        Ok(Dtmc::new(matrix, labeling))
    }

    /// Save the `.tra` and `.lab` files under the given path prefix.
    ///
    /// Returns the paths of the written `.tra` and `.lab` files.
    pub fn save(&self, prefix: &Path) -> Result<(PathBuf, PathBuf), ModelError> {
        let mut tra_path = prefix.to_path_buf();
        tra_path.as_mut_os_string().push(".tra");
        let mut lab_path = prefix.to_path_buf();
        lab_path.as_mut_os_string().push(".lab");

        let mut tra_file = File::create(&tra_path)?;
        writeln!(
            tra_file,
            "{} {}",
            self.state_count(),
            self.transitions().positive_count()
        )?;
        for (source, dest, p) in self.transitions().iter() {
            if p > 0.0 {
                writeln!(tra_file, "{} {} {}", source, dest, p)?;
            }
        }

        let mut lab_file = File::create(&lab_path)?;
        let label_list: Vec<&str> = self.labeling().labels().collect();
        let header: Vec<String> = label_list
            .iter()
            .enumerate()
            .map(|(index, label)| format!("{}=\"{}\"", index, label))
            .collect();
        writeln!(lab_file, "{}", header.join(" "))?;
        for (&state, labels) in self.labeling().labels_by_state() {
            if labels.is_empty() {
                continue;
            }
            let indices: Vec<String> = labels
                .iter()
                .filter_map(|label| label_list.iter().position(|known| *known == label.as_str()))
                .map(|index| index.to_string())
                .collect();
            writeln!(lab_file, "{}: {}", state, indices.join(" "))?;
        }

        debug!("Saved chain to {} and {}.", tra_path.display(), lab_path.display());
        Ok((tra_path, lab_path))
    }
}
