use {
    crate::automaton::{lambda_closure_of, Dfa, NfaLambda, State, StateSet, TTable},
    log::debug,
    std::collections::{BTreeMap, HashMap, VecDeque},
};

/// Converts an NFA-λ into an equivalent DFA by subset construction.
///
/// Each DFA state is a set of NFA-λ states, labeled by [StateSet::composite_label]. Only subsets reachable
/// from the closure of the start state are generated. The empty subset, when reachable, becomes a single
/// non-accepting sink labeled `{}`, which keeps the resulting table total.
pub fn convert(nfa: &NfaLambda) -> Dfa {
    convert_with_table(nfa, &TTable::build(nfa))
}

/// Like [convert], reusing a T-table that was already built from `nfa`.
pub fn convert_with_table(nfa: &NfaLambda, t_table: &TTable) -> Dfa {
    let start_set = lambda_closure_of(nfa, nfa.start());
    let start = start_set.composite_label();

    let mut labels: HashMap<StateSet, State> = HashMap::new();
    let mut worklist = VecDeque::new();
    let mut states = StateSet::new();
    let mut accept = StateSet::new();
    let mut table = BTreeMap::new();

    labels.insert(start_set.clone(), start.clone());
    worklist.push_back(start_set);

    while let Some(current) = worklist.pop_front() {
        let label = labels[&current].clone();
        if current.intersects(nfa.accept()) {
            accept.insert(label.clone());
        }

        let mut row = BTreeMap::new();
        for &symbol in t_table.alphabet() {
            let next = t_table.step(&current, symbol);
            let next_label = match labels.get(&next) {
                Some(existing) => existing.clone(),
                None => {
                    let new_label = next.composite_label();
                    debug!("Subset construction: discovered {new_label} from {label} on {symbol}");
                    labels.insert(next.clone(), new_label.clone());
                    worklist.push_back(next);
                    new_label
                }
            };
            row.insert(symbol, next_label);
        }

        table.insert(label.clone(), row);
        states.insert(label);
    }

    debug!("Subset construction produced {} states ({} accepting)", states.len(), accept.len());
    Dfa::from_parts(states, t_table.alphabet().clone(), table, start, accept)
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::{
            automaton::{execute, Machine, MachineKind},
            config::{load, LoadOptions},
            Tape,
        },
        pretty_assertions::assert_eq,
        serde_json::json,
        test_log::test,
    };

    fn nfa(doc: serde_json::Value) -> NfaLambda {
        match load(MachineKind::NonDeterministicLambda, &doc, &LoadOptions::default()).unwrap() {
            Machine::NonDeterministicLambda(nfa) => nfa,
            other => panic!("Expected an NFA-λ, got {other:?}"),
        }
    }

    fn s(label: &str) -> State {
        State::from(label)
    }

    #[test]
    fn test_two_state_conversion() {
        let dfa = convert(&nfa(json!({
            "States": ["A", "B"],
            "Alphabet": ["λ", "a"],
            "D-Table": {
                "A": {"λ": ["B"], "a": ["A"]},
                "B": {"λ": "{}", "a": "{}"},
            },
            "Start": "A",
            "Accept": ["B"],
        })));

        assert_eq!(dfa.start(), &s("{A,B}"));
        assert!(dfa.is_accept(&s("{A,B}")));
        assert_eq!(dfa.states().len(), 1);
        assert_eq!(dfa.transition(&s("{A,B}"), 'a'), Some(&s("{A,B}")));
    }

    #[test]
    fn test_empty_target_becomes_sink() {
        let dfa = convert(&nfa(json!({
            "States": ["A", "B"],
            "Alphabet": ["a", "b"],
            "D-Table": {
                "A": {"a": ["B"], "b": "{}"},
                "B": {"a": "{}", "b": "{}"},
            },
            "Start": "A",
            "Accept": ["B"],
        })));

        let states: Vec<&str> = dfa.states().iter().map(State::label).collect();
        assert_eq!(states, vec!["{A}", "{B}", "{}"]);
        assert_eq!(dfa.transition(&s("{A}"), 'b'), Some(&s("{}")));
        assert_eq!(dfa.transition(&s("{}"), 'a'), Some(&s("{}")));
        assert_eq!(dfa.transition(&s("{}"), 'b'), Some(&s("{}")));
        assert!(!dfa.is_accept(&s("{}")));
        assert!(dfa.is_accept(&s("{B}")));
    }

    #[test]
    fn test_only_reachable_subsets() {
        // C is unreachable, so no subset containing it may appear.
        let dfa = convert(&nfa(json!({
            "States": ["A", "B", "C"],
            "Alphabet": ["a"],
            "D-Table": {
                "A": {"a": ["A", "B"]},
                "B": {"a": ["A", "B"]},
                "C": {"a": ["A", "B", "C"]},
            },
            "Start": "A",
            "Accept": ["B"],
        })));

        let states: Vec<&str> = dfa.states().iter().map(State::label).collect();
        assert_eq!(states, vec!["{A,B}", "{A}"]);
        for state in dfa.states() {
            assert_eq!(dfa.table()[state].len(), 1);
        }
    }

    #[test]
    fn test_separator_in_state_label() {
        let nfa = nfa(json!({
            "States": ["A", "B", "A,B"],
            "Alphabet": ["a"],
            "D-Table": {
                "A": {"a": "{}"},
                "B": {"a": "{}"},
                "A,B": {"a": ["A", "B"]},
            },
            "Start": "A,B",
            "Accept": ["A"],
        }));
        let dfa = convert(&nfa);

        let states: Vec<&str> = dfa.states().iter().map(State::label).collect();
        assert_eq!(states, vec!["{A,B}", "{A\\,B}", "{}"]);
        assert_eq!(dfa.start(), &s("{A\\,B}"));
        assert!(!dfa.is_accept(&s("{A\\,B}")));
        assert!(dfa.is_accept(&s("{A,B}")));

        let t_table = TTable::build(&nfa);
        for tape in ["", "a", "aa"] {
            let tape = Tape::new(tape);
            assert_eq!(execute(&dfa, &tape).unwrap().accepted, t_table.accepts(&nfa, &tape).unwrap(), "tape {tape:?}");
        }
    }

    #[test]
    fn test_conversion_is_total() {
        let dfa = convert(&nfa(json!({
            "States": ["Q0", "Q1", "Q2"],
            "Alphabet": ["λ", "0", "1"],
            "D-Table": {
                "Q0": {"λ": ["Q1"], "0": ["Q0"], "1": "{}"},
                "Q1": {"λ": "{}", "0": "{}", "1": ["Q2"]},
                "Q2": {"λ": ["Q0"], "0": "{}", "1": "{}"},
            },
            "Start": "Q0",
            "Accept": ["Q2"],
        })));

        for state in dfa.states() {
            for symbol in dfa.alphabet() {
                let target = dfa.transition(state, *symbol).unwrap();
                assert!(dfa.states().contains(target));
            }
        }
        assert!(dfa.accept().is_subset(dfa.states()));
    }
}
