use {
    crate::automaton::{State, StateSet},
    std::{collections::HashSet, hash::Hash},
};

/// Returns the entries that occur more than once, each reported once, in order of their second occurrence.
pub fn find_duplicates<T: Clone + Eq + Hash>(entries: &[T]) -> Vec<T> {
    let mut seen = HashSet::new();
    let mut reported = HashSet::new();
    let mut duplicates = Vec::new();

    for entry in entries {
        if !seen.insert(entry) && reported.insert(entry) {
            duplicates.push(entry.clone());
        }
    }

    duplicates
}

/// Returns the members of `subset` that are not in `states`, in order.
pub fn not_in_states<'a, I: IntoIterator<Item = &'a State>>(subset: I, states: &StateSet) -> Vec<&'a State> {
    subset.into_iter().filter(|state| !states.contains(state)).collect()
}
