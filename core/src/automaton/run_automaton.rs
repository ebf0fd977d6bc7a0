use {
    crate::{
        automaton::{Dfa, State, Symbol},
        config::ConfigBlock,
        MachineError, Violation, ViolationKind,
    },
    bitvec::vec::BitVec,
};

/// A DFA compiled into dense state and symbol indices for fast stepping. States and symbols are indexed in
/// sorted order; the transition for state `s` on symbol class `c` is at `s * points.len() + c`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RunAutomaton {
    states: Vec<State>,

    points: Vec<char>,

    transitions: Vec<usize>,

    accept: BitVec,

    start: usize,
}

impl RunAutomaton {
    /// Compiles `dfa`. Fails only if the table is not total or leads outside the state set, which a loaded
    /// or converted [Dfa] never does.
    pub fn new(dfa: &Dfa) -> Result<Self, MachineError> {
        let states: Vec<State> = dfa.states().iter().cloned().collect();
        let points: Vec<char> = dfa.alphabet().iter().copied().collect();
        let mut transitions = Vec::with_capacity(states.len() * points.len());
        let mut accept = bitvec::bitvec![0; states.len()];
        let mut violations = Vec::new();

        for (n, state) in states.iter().enumerate() {
            if dfa.is_accept(state) {
                accept.set(n, true);
            }

            for &c in &points {
                let index = match dfa.transition(state, c) {
                    None => {
                        violations.push(ViolationKind::MissingTransition(state.clone(), Symbol::Char(c)));
                        0
                    }
                    Some(target) => match states.binary_search(target) {
                        Ok(index) => index,
                        Err(_) => {
                            violations.push(ViolationKind::UnknownTarget(
                                state.clone(),
                                Symbol::Char(c),
                                target.label().to_string(),
                            ));
                            0
                        }
                    },
                };
                transitions.push(index);
            }
        }

        let start = match states.binary_search(dfa.start()) {
            Ok(index) => index,
            Err(_) => {
                violations.push(ViolationKind::UnknownState(dfa.start().label().to_string()));
                0
            }
        };

        if !violations.is_empty() {
            return Err(MachineError::InvalidConfigBlock(
                violations.into_iter().map(|kind| Violation::new(ConfigBlock::TransitionTable, kind)).collect(),
            ));
        }

        Ok(Self {
            states,
            points,
            transitions,
            accept,
            start,
        })
    }

    /// Returns number of states in automaton.
    #[inline]
    pub fn size(&self) -> usize {
        self.states.len()
    }

    /// Returns the index of the start state.
    #[inline]
    pub fn start(&self) -> usize {
        self.start
    }

    /// Returns the label of the state at `index`.
    #[inline]
    pub fn state(&self, index: usize) -> &State {
        &self.states[index]
    }

    /// Indicates whether the given state is an accept state.
    #[inline]
    pub fn is_accept(&self, state: usize) -> bool {
        self.accept[state]
    }

    /// Returns the symbol class of `c`, or `None` if `c` is not in the alphabet.
    pub fn get_char_class(&self, c: char) -> Option<usize> {
        self.points.binary_search(&c).ok()
    }

    /// Returns the state obtained by reading `c` from `state`, or `None` if `c` is not in the alphabet.
    pub fn step(&self, state: usize, c: char) -> Option<usize> {
        let class = self.get_char_class(c)?;
        Some(self.transitions[state * self.points.len() + class])
    }
}
