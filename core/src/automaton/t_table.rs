use {
    crate::{
        automaton::{lambda_closure, lambda_closure_of, NfaLambda, State, StateSet, Symbol},
        MachineError, Tape,
    },
    log::debug,
    std::{
        collections::{BTreeMap, BTreeSet},
        fmt::{Display, Formatter, Result as FmtResult},
    },
};

/// The λ-closure-extended transition function of an NFA-λ.
///
/// For every state `s` and every non-λ symbol `a`, the entry is the union over `q ∈ closure(s)` of
/// `closure(δ(q, a))`. Every pair is present; an empty set means no transition.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TTable {
    alphabet: BTreeSet<char>,
    rows: BTreeMap<State, BTreeMap<char, StateSet>>,
}

impl TTable {
    /// Derives the T-table of `nfa`.
    pub fn build(nfa: &NfaLambda) -> Self {
        let alphabet: BTreeSet<char> = nfa.input_symbols().collect();
        let mut rows = BTreeMap::new();

        for state in nfa.states() {
            let closure = lambda_closure_of(nfa, state);
            let mut row = BTreeMap::new();

            for &symbol in &alphabet {
                let mut reached = StateSet::new();
                for q in &closure {
                    if let Some(targets) = nfa.targets(q, Symbol::Char(symbol)) {
                        reached.union_with(targets);
                    }
                }

                row.insert(symbol, lambda_closure(nfa, &reached));
            }

            rows.insert(state.clone(), row);
        }

        debug!("Built T-table with {} states and {} symbols", rows.len(), alphabet.len());
        Self {
            alphabet,
            rows,
        }
    }

    /// Returns the non-λ symbols the table is keyed by.
    #[inline]
    pub fn alphabet(&self) -> &BTreeSet<char> {
        &self.alphabet
    }

    /// Returns every row, keyed by NFA-λ state.
    #[inline]
    pub fn rows(&self) -> &BTreeMap<State, BTreeMap<char, StateSet>> {
        &self.rows
    }

    /// Returns the entry for `(state, symbol)`, or `None` if the pair is outside the table.
    pub fn get(&self, state: &State, symbol: char) -> Option<&StateSet> {
        self.rows.get(state).and_then(|row| row.get(&symbol))
    }

    /// Returns the union of the entries for every state in `states` on `symbol`.
    pub fn step(&self, states: &StateSet, symbol: char) -> StateSet {
        let mut next = StateSet::new();
        for state in states {
            if let Some(targets) = self.get(state, symbol) {
                next.union_with(targets);
            }
        }
        next
    }

    /// Decides whether `nfa` accepts `tape` by repeated table lookups from the closure of the start state.
    /// `self` must be the table built from `nfa`.
    pub fn accepts(&self, nfa: &NfaLambda, tape: &Tape) -> Result<bool, MachineError> {
        let mut current = lambda_closure_of(nfa, nfa.start());

        for (position, symbol) in tape.iter().enumerate() {
            if !self.alphabet.contains(&symbol) {
                return Err(MachineError::InvalidCharacterInTape {
                    position,
                    symbol,
                });
            }
            current = self.step(&current, symbol);
        }

        Ok(current.intersects(nfa.accept()))
    }
}

impl Display for TTable {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        let cells: Vec<(String, Vec<String>)> = self
            .rows
            .iter()
            .map(|(state, row)| (state.to_string(), row.values().map(StateSet::to_string).collect()))
            .collect();

        let state_width = cells.iter().map(|(s, _)| s.chars().count()).max().unwrap_or(0).max("State".len());
        let mut widths: Vec<usize> = self.alphabet.iter().map(|_| 1).collect();
        for (_, targets) in &cells {
            for (width, target) in widths.iter_mut().zip(targets) {
                *width = (*width).max(target.chars().count());
            }
        }

        write!(f, "{:<state_width$}", "State")?;
        for (symbol, width) in self.alphabet.iter().zip(&widths) {
            write!(f, " | {:<width$}", symbol.to_string())?;
        }
        writeln!(f)?;

        for (state, targets) in &cells {
            write!(f, "{state:<state_width$}")?;
            for (target, width) in targets.iter().zip(&widths) {
                write!(f, " | {target:<width$}")?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}
