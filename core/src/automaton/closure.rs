use {
    crate::automaton::{NfaLambda, State, StateSet, Symbol},
    log::trace,
};

/// Returns the λ-closure of a single state.
pub fn lambda_closure_of(nfa: &NfaLambda, state: &State) -> StateSet {
    lambda_closure(nfa, &StateSet::singleton(state.clone()))
}

/// Returns the smallest superset of `states` that is closed under λ-transitions.
///
/// Each state is pushed onto the frontier at most once, so this terminates even when λ-transitions form a
/// cycle.
pub fn lambda_closure(nfa: &NfaLambda, states: &StateSet) -> StateSet {
    let mut closure = states.clone();
    let mut frontier: Vec<&State> = states.iter().collect();

    while let Some(state) = frontier.pop() {
        let Some(targets) = nfa.targets(state, Symbol::Lambda) else {
            continue;
        };

        for target in targets {
            if closure.insert(target.clone()) {
                trace!("λ-closure: {state} --λ--> {target}");
                frontier.push(target);
            }
        }
    }

    closure
}
