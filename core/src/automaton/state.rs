use std::{
    borrow::Borrow,
    collections::{btree_set, BTreeSet},
    fmt::{Debug, Display, Formatter, Result as FmtResult},
};

/// The configuration marker for an explicit empty target set. It doubles as the label of the empty composite
/// state produced by subset construction.
pub const EMPTY_SET_MARKER: &str = "{}";

/// An opaque state label. States are compared for equality and membership only.
#[derive(Clone, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct State(String);

impl State {
    /// Creates a state with the given label.
    pub fn new<S: Into<String>>(label: S) -> Self {
        Self(label.into())
    }

    /// Returns the label.
    #[inline]
    pub fn label(&self) -> &str {
        &self.0
    }
}

impl Debug for State {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        write!(f, "State({:?})", self.0)
    }
}

impl Display for State {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        f.write_str(&self.0)
    }
}

impl From<&str> for State {
    fn from(label: &str) -> Self {
        Self(label.to_string())
    }
}

impl Borrow<str> for State {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// An ordered set of states. Ordering makes iteration, hashing, and [StateSet::composite_label] independent of
/// the order in which members were discovered.
#[derive(Clone, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct StateSet {
    states: BTreeSet<State>,
}

impl StateSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a set holding only `state`.
    pub fn singleton(state: State) -> Self {
        let mut set = Self::new();
        set.insert(state);
        set
    }

    /// Inserts a state. Returns `true` if it was not already present.
    #[inline]
    pub fn insert(&mut self, state: State) -> bool {
        self.states.insert(state)
    }

    /// Returns `true` if `state` is a member.
    #[inline]
    pub fn contains(&self, state: &State) -> bool {
        self.states.contains(state)
    }

    /// Returns `true` if the set has no members.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Returns the number of members.
    #[inline]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Iterates over the members in label order.
    pub fn iter(&self) -> btree_set::Iter<'_, State> {
        self.states.iter()
    }

    /// Adds every member of `other` to this set.
    pub fn union_with(&mut self, other: &StateSet) {
        self.states.extend(other.states.iter().cloned());
    }

    /// Returns `true` if the two sets share a member.
    pub fn intersects(&self, other: &StateSet) -> bool {
        self.states.intersection(&other.states).next().is_some()
    }

    /// Returns `true` if every member of this set is in `other`.
    pub fn is_subset(&self, other: &StateSet) -> bool {
        self.states.is_subset(&other.states)
    }

    /// Returns the canonical label of this set when it is used as a single state of a derived DFA:
    /// the sorted member labels joined by commas inside braces. The empty set is labeled [EMPTY_SET_MARKER].
    ///
    /// Backslashes, commas, and braces inside member labels are escaped with a backslash, so distinct non-empty
    /// member labels always produce distinct composite labels.
    pub fn composite_label(&self) -> State {
        let mut label = String::from("{");
        for (i, state) in self.states.iter().enumerate() {
            if i > 0 {
                label.push(',');
            }
            escape_member(state.label(), &mut label);
        }
        label.push('}');
        State(label)
    }
}

fn escape_member(member: &str, out: &mut String) {
    for c in member.chars() {
        if matches!(c, '\\' | ',' | '{' | '}') {
            out.push('\\');
        }
        out.push(c);
    }
}

impl Display for StateSet {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        Display::fmt(&self.composite_label(), f)
    }
}

impl FromIterator<State> for StateSet {
    fn from_iter<I: IntoIterator<Item = State>>(iter: I) -> Self {
        Self {
            states: iter.into_iter().collect(),
        }
    }
}

impl Extend<State> for StateSet {
    fn extend<I: IntoIterator<Item = State>>(&mut self, iter: I) {
        self.states.extend(iter)
    }
}

impl<'a> IntoIterator for &'a StateSet {
    type Item = &'a State;
    type IntoIter = btree_set::Iter<'a, State>;

    fn into_iter(self) -> Self::IntoIter {
        self.states.iter()
    }
}

#[cfg(test)]
mod tests {
    use {super::*, pretty_assertions::assert_eq, test_log::test};

    fn set(labels: &[&str]) -> StateSet {
        labels.iter().map(|l| State::from(*l)).collect()
    }

    #[test]
    fn test_composite_label_is_order_independent() {
        assert_eq!(set(&["B", "A", "C"]).composite_label(), State::from("{A,B,C}"));
        assert_eq!(set(&["C", "B", "A"]).composite_label(), set(&["A", "B", "C"]).composite_label());
        assert_eq!(StateSet::new().composite_label().label(), EMPTY_SET_MARKER);
    }

    #[test]
    fn test_composite_label_escapes_separators() {
        assert_eq!(set(&["A,B"]).composite_label(), State::from("{A\\,B}"));
        assert_eq!(set(&["{A}", "B\\"]).composite_label(), State::from("{B\\\\,\\{A\\}}"));
        assert_ne!(set(&["A,B"]).composite_label(), set(&["A", "B"]).composite_label());
        assert_ne!(set(&["A,B", "C"]).composite_label(), set(&["A", "B,C"]).composite_label());
    }

    #[test]
    fn test_set_operations() {
        let mut s = set(&["A"]);
        assert!(!s.insert(State::from("A")));
        s.union_with(&set(&["B", "C"]));
        assert_eq!(s.len(), 3);
        assert!(s.intersects(&set(&["C", "D"])));
        assert!(!s.intersects(&set(&["D"])));
        assert!(set(&["A", "C"]).is_subset(&s));
    }
}
