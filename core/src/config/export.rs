use {
    crate::{
        automaton::{Dfa, Machine, NfaLambda, State, TransitionTarget, EMPTY_SET_MARKER},
        MachineError,
    },
    serde::Serialize,
    serde_json::Value,
    std::collections::BTreeMap,
};

#[derive(Serialize)]
struct MachineDocument<'a, T: Serialize> {
    #[serde(rename = "States")]
    states: Vec<&'a str>,

    #[serde(rename = "Alphabet")]
    alphabet: Vec<String>,

    #[serde(rename = "D-Table")]
    table: BTreeMap<&'a str, BTreeMap<String, T>>,

    #[serde(rename = "Start")]
    start: &'a str,

    #[serde(rename = "Accept")]
    accept: Vec<&'a str>,
}

/// An NFA-λ table entry as written to a document. The empty set is always the marker, never `[]`.
#[derive(Serialize)]
#[serde(untagged)]
enum TargetDocument<'a> {
    Marker(&'static str),
    States(Vec<&'a str>),
}

/// Serializes a machine into the configuration document shape accepted by the loader.
pub fn export(machine: &Machine) -> Result<Value, MachineError> {
    match machine {
        Machine::Deterministic(dfa) => export_dfa(dfa),
        Machine::NonDeterministicLambda(nfa) => export_nfa_lambda(nfa),
    }
}

/// Serializes a DFA into a configuration document.
pub fn export_dfa(dfa: &Dfa) -> Result<Value, MachineError> {
    to_value(&dfa_document(dfa))
}

/// Serializes an NFA-λ into a configuration document.
pub fn export_nfa_lambda(nfa: &NfaLambda) -> Result<Value, MachineError> {
    to_value(&nfa_lambda_document(nfa))
}

/// Returns the exported document of `machine` as pretty-printed JSON, with blocks in document order.
pub fn dumps(machine: &Machine) -> Result<String, MachineError> {
    let text = match machine {
        Machine::Deterministic(dfa) => serde_json::to_string_pretty(&dfa_document(dfa)),
        Machine::NonDeterministicLambda(nfa) => serde_json::to_string_pretty(&nfa_lambda_document(nfa)),
    };
    text.map_err(|e| MachineError::MalformedDocument(e.to_string()))
}

fn dfa_document(dfa: &Dfa) -> MachineDocument<'_, &str> {
    let table = dfa
        .table()
        .iter()
        .map(|(state, row)| {
            (state.label(), row.iter().map(|(symbol, target)| (symbol.to_string(), target.label())).collect())
        })
        .collect();

    MachineDocument {
        states: dfa.states().iter().map(State::label).collect(),
        alphabet: dfa.alphabet().iter().map(char::to_string).collect(),
        table,
        start: dfa.start().label(),
        accept: dfa.accept().iter().map(State::label).collect(),
    }
}

fn nfa_lambda_document(nfa: &NfaLambda) -> MachineDocument<'_, TargetDocument<'_>> {
    let table = nfa
        .table()
        .iter()
        .map(|(state, row)| {
            let row = row.iter().map(|(symbol, target)| {
                let target = match target {
                    TransitionTarget::NoTransition => TargetDocument::Marker(EMPTY_SET_MARKER),
                    TransitionTarget::States(states) => TargetDocument::States(states.iter().map(State::label).collect()),
                };
                (symbol.to_string(), target)
            });
            (state.label(), row.collect())
        })
        .collect();

    MachineDocument {
        states: nfa.states().iter().map(State::label).collect(),
        alphabet: nfa.alphabet().iter().map(ToString::to_string).collect(),
        table,
        start: nfa.start().label(),
        accept: nfa.accept().iter().map(State::label).collect(),
    }
}

fn to_value<T: Serialize>(document: &T) -> Result<Value, MachineError> {
    serde_json::to_value(document).map_err(|e| MachineError::MalformedDocument(e.to_string()))
}
