use {
    crate::automaton::{State, StateSet, Symbol},
    std::collections::{BTreeMap, BTreeSet},
};

/// The kind of machine a configuration document describes.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum MachineKind {
    /// A DFA: one target state per (state, symbol), total table.
    Deterministic,

    /// An NFA-λ: a set of target states per (state, symbol), λ allowed.
    NonDeterministicLambda,
}

/// A validated machine definition. Instances are only produced by the loader or by subset construction and
/// are immutable thereafter.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Machine {
    /// A deterministic finite automaton.
    Deterministic(Dfa),

    /// A non-deterministic finite automaton with λ-transitions.
    NonDeterministicLambda(NfaLambda),
}

impl Machine {
    /// Returns whether this is a DFA or an NFA-λ.
    pub fn kind(&self) -> MachineKind {
        match self {
            Self::Deterministic(_) => MachineKind::Deterministic,
            Self::NonDeterministicLambda(_) => MachineKind::NonDeterministicLambda,
        }
    }

    /// Returns the States block.
    pub fn states(&self) -> &StateSet {
        match self {
            Self::Deterministic(dfa) => dfa.states(),
            Self::NonDeterministicLambda(nfa) => nfa.states(),
        }
    }

    /// Returns the start state.
    pub fn start(&self) -> &State {
        match self {
            Self::Deterministic(dfa) => dfa.start(),
            Self::NonDeterministicLambda(nfa) => nfa.start(),
        }
    }

    /// Returns the accept states.
    pub fn accept(&self) -> &StateSet {
        match self {
            Self::Deterministic(dfa) => dfa.accept(),
            Self::NonDeterministicLambda(nfa) => nfa.accept(),
        }
    }
}

impl From<Dfa> for Machine {
    fn from(dfa: Dfa) -> Self {
        Self::Deterministic(dfa)
    }
}

impl From<NfaLambda> for Machine {
    fn from(nfa: NfaLambda) -> Self {
        Self::NonDeterministicLambda(nfa)
    }
}

/// A deterministic finite automaton. The transition table is total over `states × alphabet`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Dfa {
    states: StateSet,
    alphabet: BTreeSet<char>,
    table: BTreeMap<State, BTreeMap<char, State>>,
    start: State,
    accept: StateSet,
}

impl Dfa {
    /// Assembles a DFA from parts that have already been checked against the definition.
    pub(crate) fn from_parts(
        states: StateSet,
        alphabet: BTreeSet<char>,
        table: BTreeMap<State, BTreeMap<char, State>>,
        start: State,
        accept: StateSet,
    ) -> Self {
        Self {
            states,
            alphabet,
            table,
            start,
            accept,
        }
    }

    /// Returns the States block.
    #[inline]
    pub fn states(&self) -> &StateSet {
        &self.states
    }

    /// Returns the input alphabet.
    #[inline]
    pub fn alphabet(&self) -> &BTreeSet<char> {
        &self.alphabet
    }

    /// Returns the total transition table.
    #[inline]
    pub fn table(&self) -> &BTreeMap<State, BTreeMap<char, State>> {
        &self.table
    }

    /// Returns the start state.
    #[inline]
    pub fn start(&self) -> &State {
        &self.start
    }

    /// Returns the accept states.
    #[inline]
    pub fn accept(&self) -> &StateSet {
        &self.accept
    }

    /// Returns the state reached from `state` on `symbol`, or `None` if `symbol` is not in the alphabet.
    pub fn transition(&self, state: &State, symbol: char) -> Option<&State> {
        self.table.get(state).and_then(|row| row.get(&symbol))
    }

    /// Returns `true` if `state` is an accept state.
    #[inline]
    pub fn is_accept(&self, state: &State) -> bool {
        self.accept.contains(state)
    }
}

/// The target of an NFA-λ transition. An explicit empty target is its own value, distinct from an absent
/// table entry.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum TransitionTarget {
    /// The explicit "no transition" marker.
    NoTransition,

    /// A non-empty set of target states.
    States(StateSet),
}

impl TransitionTarget {
    /// Builds a target from a state set, mapping the empty set to [TransitionTarget::NoTransition].
    pub fn from_set(set: StateSet) -> Self {
        if set.is_empty() {
            Self::NoTransition
        } else {
            Self::States(set)
        }
    }

    /// Returns the target states, if any.
    pub fn states(&self) -> Option<&StateSet> {
        match self {
            Self::NoTransition => None,
            Self::States(states) => Some(states),
        }
    }
}

/// A non-deterministic finite automaton with λ-transitions. The table has an entry for every
/// `state × alphabet` pair, where the alphabet may include [Symbol::Lambda].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NfaLambda {
    states: StateSet,
    alphabet: BTreeSet<Symbol>,
    table: BTreeMap<State, BTreeMap<Symbol, TransitionTarget>>,
    start: State,
    accept: StateSet,
}

impl NfaLambda {
    pub(crate) fn from_parts(
        states: StateSet,
        alphabet: BTreeSet<Symbol>,
        table: BTreeMap<State, BTreeMap<Symbol, TransitionTarget>>,
        start: State,
        accept: StateSet,
    ) -> Self {
        Self {
            states,
            alphabet,
            table,
            start,
            accept,
        }
    }

    /// Returns the States block.
    #[inline]
    pub fn states(&self) -> &StateSet {
        &self.states
    }

    /// Returns the alphabet, including λ when declared.
    #[inline]
    pub fn alphabet(&self) -> &BTreeSet<Symbol> {
        &self.alphabet
    }

    /// Returns the non-λ symbols of the alphabet, in order.
    pub fn input_symbols(&self) -> impl Iterator<Item = char> + '_ {
        self.alphabet.iter().filter_map(Symbol::as_char)
    }

    /// Returns the transition table. Every state × symbol pair has an entry.
    #[inline]
    pub fn table(&self) -> &BTreeMap<State, BTreeMap<Symbol, TransitionTarget>> {
        &self.table
    }

    /// Returns the start state.
    #[inline]
    pub fn start(&self) -> &State {
        &self.start
    }

    /// Returns the accept states.
    #[inline]
    pub fn accept(&self) -> &StateSet {
        &self.accept
    }

    /// Returns the states reached from `state` on `symbol`. Returns `None` both for an explicit empty target
    /// and for a pair outside `states × alphabet`.
    pub fn targets(&self, state: &State, symbol: Symbol) -> Option<&StateSet> {
        self.table.get(state).and_then(|row| row.get(&symbol)).and_then(TransitionTarget::states)
    }
}
