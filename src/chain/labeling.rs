use crate::StateSet;
use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::sync::OnceLock;

/// A bidirectional mapping between textual labels and sets of state indices.
///
/// The label-to-states direction is the source of truth. The inverse view
/// (state to labels) is a derived mapping computed lazily on first access and
/// cached; it is discarded whenever the source mapping changes.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Labeling {
    states_by_label: BTreeMap<String, StateSet>,
    #[cfg_attr(feature = "serde", serde(skip))]
    labels_by_state: OnceLock<BTreeMap<usize, BTreeSet<String>>>,
}

impl PartialEq for Labeling {
    fn eq(&self, other: &Self) -> bool {
        // The cached inverse is derived data and does not participate in equality.
        self.states_by_label == other.states_by_label
    }
}

impl From<BTreeMap<String, StateSet>> for Labeling {
    fn from(states_by_label: BTreeMap<String, StateSet>) -> Self {
        Labeling {
            states_by_label,
            labels_by_state: OnceLock::new(),
        }
    }
}

impl Labeling {
    /// Create an empty labeling.
    pub fn new() -> Labeling {
        Labeling::default()
    }

    /// Assign `states` to `label`, replacing any previous assignment of that label.
    ///
    /// This replaces the source mapping, so the cached inverse view is discarded
    /// and recomputed on next access.
    pub fn add_label(&mut self, label: &str, states: StateSet) {
        self.states_by_label.insert(label.to_string(), states);
        self.labels_by_state = OnceLock::new();
    }

    /// The set of states carrying `label`, if the label is declared.
    pub fn states_of(&self, label: &str) -> Option<&StateSet> {
        self.states_by_label.get(label)
    }

    /// Iterate over all declared labels in sorted order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.states_by_label.keys().map(String::as_str)
    }

    /// The full label-to-states mapping.
    pub fn states_by_label(&self) -> &BTreeMap<String, StateSet> {
        &self.states_by_label
    }

    /// The derived state-to-labels view. States without any label are not present.
    pub fn labels_by_state(&self) -> &BTreeMap<usize, BTreeSet<String>> {
        self.labels_by_state.get_or_init(|| {
            let mut inverse: BTreeMap<usize, BTreeSet<String>> = BTreeMap::new();
            for (label, states) in &self.states_by_label {
                for &state in states {
                    inverse.entry(state).or_default().insert(label.clone());
                }
            }
            inverse
        })
    }

    /// The largest state index appearing in any label, if any state is labeled.
    pub fn max_state(&self) -> Option<usize> {
        self.states_by_label
            .values()
            .filter_map(|states| states.last().copied())
            .max()
    }
}
