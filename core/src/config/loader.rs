use {
    crate::{
        automaton::{
            single_char, Dfa, Machine, MachineKind, NfaLambda, State, StateSet, Symbol, TransitionTarget,
            EMPTY_SET_MARKER,
        },
        config::{find_duplicates, not_in_states, ConfigBlock, LoadOptions},
        MachineError, Violation, ViolationKind,
    },
    log::debug,
    serde_json::{Map, Value},
    std::collections::{BTreeMap, BTreeSet},
};

const STATE_LABELS: &str = "a sequence of state labels";
const SYMBOLS: &str = "a sequence of symbols";
const START_LABEL: &str = "a single state label";
const TABLE: &str = "a mapping of states to mappings of symbols to targets";
const DFA_TARGET: &str = "a single target state label";
const NFA_TARGET: &str = "a sequence of target state labels or \"{}\"";

static NULL: Value = Value::Null;

/// Validates `document` as a machine of the given kind and builds its definition.
pub fn load(kind: MachineKind, document: &Value, options: &LoadOptions) -> Result<Machine, MachineError> {
    match kind {
        MachineKind::Deterministic => load_dfa(document, options).map(Machine::from),
        MachineKind::NonDeterministicLambda => load_nfa_lambda(document, options).map(Machine::from),
    }
}

/// Validates `document` as a DFA and builds its definition.
///
/// Beyond the checks shared with NFA-λ machines, λ may not appear in the alphabet and the table must hold a
/// single target state for every state and symbol.
pub fn load_dfa(document: &Value, options: &LoadOptions) -> Result<Dfa, MachineError> {
    let blocks = check_blocks(document)?;
    let mut loader = Loader::new(*options);

    let states = loader.state_set(ConfigBlock::States, block(blocks, ConfigBlock::States));
    let alphabet = loader.alphabet(block(blocks, ConfigBlock::Alphabet), false);
    let start = loader.start(block(blocks, ConfigBlock::Start), states.as_ref());
    let accept = loader.accept(block(blocks, ConfigBlock::Accept), states.as_ref());

    let case = options.state_case;
    let table = loader.table(
        block(blocks, ConfigBlock::TransitionTable),
        states.as_ref(),
        alphabet.as_ref(),
        |state, symbol, target| {
            let Some(label) = target.as_str() else {
                return Err(vec![ViolationKind::Malformed(DFA_TARGET)]);
            };

            let target = State::new(case.apply(label));
            match &states {
                Some(states) if !states.contains(&target) => {
                    Err(vec![ViolationKind::UnknownTarget(state.clone(), symbol, label.to_string())])
                }
                _ => Ok(target),
            }
        },
    );

    let violations = loader.finish();
    match (states, alphabet, table, start, accept) {
        (Some(states), Some(alphabet), Some(table), Some(start), Some(accept)) if violations.is_empty() => {
            let alphabet: BTreeSet<char> = alphabet.iter().filter_map(Symbol::as_char).collect();
            let table = table
                .into_iter()
                .map(|(state, row)| {
                    let row = row.into_iter().filter_map(|(symbol, target)| symbol.as_char().map(|c| (c, target)));
                    (state, row.collect())
                })
                .collect();

            debug!("Loaded DFA with {} states and {} symbols; start={start}", states.len(), alphabet.len());
            Ok(Dfa::from_parts(states, alphabet, table, start, accept))
        }
        _ => Err(MachineError::InvalidConfigBlock(violations)),
    }
}

/// Validates `document` as an NFA-λ and builds its definition.
///
/// Every state × symbol pair (λ included, when it is in the alphabet) must have a table entry. An entry is
/// either a non-empty sequence of target states or the empty-set marker `"{}"`.
pub fn load_nfa_lambda(document: &Value, options: &LoadOptions) -> Result<NfaLambda, MachineError> {
    let blocks = check_blocks(document)?;
    let mut loader = Loader::new(*options);

    let states = loader.state_set(ConfigBlock::States, block(blocks, ConfigBlock::States));
    let alphabet = loader.alphabet(block(blocks, ConfigBlock::Alphabet), true);
    let start = loader.start(block(blocks, ConfigBlock::Start), states.as_ref());
    let accept = loader.accept(block(blocks, ConfigBlock::Accept), states.as_ref());

    let case = options.state_case;
    let table = loader.table(
        block(blocks, ConfigBlock::TransitionTable),
        states.as_ref(),
        alphabet.as_ref(),
        |state, symbol, target| match target {
            Value::String(marker) if marker == EMPTY_SET_MARKER => Ok(TransitionTarget::NoTransition),
            Value::Array(entries) if entries.is_empty() => {
                Err(vec![ViolationKind::AmbiguousEmptyTarget(state.clone(), symbol)])
            }
            Value::Array(entries) => {
                let mut targets = Vec::with_capacity(entries.len());
                let mut errors = Vec::new();

                for entry in entries {
                    let Some(label) = entry.as_str() else {
                        return Err(vec![ViolationKind::Malformed(NFA_TARGET)]);
                    };

                    let target = State::new(case.apply(label));
                    if let Some(states) = &states {
                        if !states.contains(&target) {
                            errors.push(ViolationKind::UnknownTarget(state.clone(), symbol, label.to_string()));
                        }
                    }
                    targets.push(target);
                }

                let duplicates = find_duplicates(&targets);
                if !duplicates.is_empty() {
                    errors.push(ViolationKind::DuplicateEntries(
                        duplicates.iter().map(|target| format!("({state}, {symbol}) -> {target}")).collect(),
                    ));
                }

                if errors.is_empty() {
                    Ok(TransitionTarget::States(targets.into_iter().collect()))
                } else {
                    Err(errors)
                }
            }
            _ => Err(vec![ViolationKind::Malformed(NFA_TARGET)]),
        },
    );

    let violations = loader.finish();
    match (states, alphabet, table, start, accept) {
        (Some(states), Some(alphabet), Some(table), Some(start), Some(accept)) if violations.is_empty() => {
            debug!("Loaded NFA-λ with {} states and {} symbols; start={start}", states.len(), alphabet.len());
            Ok(NfaLambda::from_parts(states, alphabet, table, start, accept))
        }
        _ => Err(MachineError::InvalidConfigBlock(violations)),
    }
}

/// Checks that the top-level keys of `document` are exactly the five configuration blocks.
pub fn check_blocks(document: &Value) -> Result<&Map<String, Value>, MachineError> {
    let Some(blocks) = document.as_object() else {
        return Err(MachineError::MalformedDocument("expected a mapping of configuration blocks".to_string()));
    };

    let missing: Vec<ConfigBlock> =
        ConfigBlock::ALL.into_iter().filter(|block| !blocks.contains_key(block.key())).collect();
    let unexpected: Vec<String> = blocks.keys().filter(|key| ConfigBlock::from_key(key).is_none()).cloned().collect();

    if !missing.is_empty() || !unexpected.is_empty() {
        debug!("Configuration blocks missing: {missing:?}; unexpected: {unexpected:?}");
        return Err(MachineError::MissingConfigBlock {
            missing,
            unexpected,
        });
    }

    Ok(blocks)
}

fn block(blocks: &Map<String, Value>, block: ConfigBlock) -> &Value {
    blocks.get(block.key()).unwrap_or(&NULL)
}

/// Accumulates violations across every block so they can be reported together.
struct Loader {
    options: LoadOptions,
    violations: Vec<Violation>,
}

impl Loader {
    fn new(options: LoadOptions) -> Self {
        Self {
            options,
            violations: Vec::new(),
        }
    }

    fn report(&mut self, block: ConfigBlock, kind: ViolationKind) {
        debug!("Invalid {block} block: {kind}");
        self.violations.push(Violation::new(block, kind));
    }

    fn finish(self) -> Vec<Violation> {
        self.violations
    }

    fn state(&self, label: &str) -> State {
        State::new(self.options.state_case.apply(label))
    }

    fn symbol(&self, entry: &str) -> Option<Symbol> {
        match Symbol::parse(entry) {
            Some(Symbol::Lambda) => Some(Symbol::Lambda),
            _ => single_char(&self.options.symbol_case.apply(entry)).map(Symbol::Char),
        }
    }

    fn labels(&mut self, block: ConfigBlock, value: &Value, expected: &'static str) -> Option<Vec<String>> {
        let labels: Option<Vec<String>> =
            value.as_array().and_then(|entries| entries.iter().map(|entry| entry.as_str().map(str::to_string)).collect());

        if labels.is_none() {
            self.report(block, ViolationKind::Malformed(expected));
        }
        labels
    }

    fn state_set(&mut self, block: ConfigBlock, value: &Value) -> Option<StateSet> {
        let states: Vec<State> = self.labels(block, value, STATE_LABELS)?.iter().map(|label| self.state(label)).collect();

        // An empty member would make the composite label {""} indistinguishable from the empty set.
        if block == ConfigBlock::States && states.iter().any(|state| state.label().is_empty()) {
            self.report(block, ViolationKind::EmptyLabel);
        }

        let duplicates = find_duplicates(&states);
        if !duplicates.is_empty() {
            self.report(
                block,
                ViolationKind::DuplicateEntries(duplicates.iter().map(|state| state.label().to_string()).collect()),
            );
        }

        Some(states.into_iter().collect())
    }

    fn alphabet(&mut self, value: &Value, allow_lambda: bool) -> Option<BTreeSet<Symbol>> {
        let entries = self.labels(ConfigBlock::Alphabet, value, SYMBOLS)?;
        let mut symbols = Vec::with_capacity(entries.len());

        for entry in &entries {
            match self.symbol(entry) {
                None => self.report(ConfigBlock::Alphabet, ViolationKind::InvalidSymbol(entry.clone())),
                Some(Symbol::Lambda) if !allow_lambda => {
                    self.report(ConfigBlock::Alphabet, ViolationKind::LambdaNotAllowed)
                }
                Some(symbol) => symbols.push(symbol),
            }
        }

        let duplicates = find_duplicates(&symbols);
        if !duplicates.is_empty() {
            self.report(
                ConfigBlock::Alphabet,
                ViolationKind::DuplicateEntries(duplicates.iter().map(Symbol::to_string).collect()),
            );
        }

        Some(symbols.into_iter().collect())
    }

    fn start(&mut self, value: &Value, states: Option<&StateSet>) -> Option<State> {
        let Some(label) = value.as_str() else {
            self.report(ConfigBlock::Start, ViolationKind::Malformed(START_LABEL));
            return None;
        };

        let start = self.state(label);
        if let Some(states) = states {
            if !states.contains(&start) {
                self.report(ConfigBlock::Start, ViolationKind::UnknownState(start.label().to_string()));
            }
        }

        Some(start)
    }

    fn accept(&mut self, value: &Value, states: Option<&StateSet>) -> Option<StateSet> {
        let accept = self.state_set(ConfigBlock::Accept, value)?;

        if let Some(states) = states {
            for state in not_in_states(&accept, states) {
                self.report(ConfigBlock::Accept, ViolationKind::UnknownState(state.label().to_string()));
            }
        }

        Some(accept)
    }

    /// Parses the transition table, delegating each target to `parse_target`, then checks that every
    /// state × symbol pair has an entry.
    fn table<T, F>(
        &mut self,
        value: &Value,
        states: Option<&StateSet>,
        alphabet: Option<&BTreeSet<Symbol>>,
        mut parse_target: F,
    ) -> Option<BTreeMap<State, BTreeMap<Symbol, T>>>
    where
        F: FnMut(&State, Symbol, &Value) -> Result<T, Vec<ViolationKind>>,
    {
        let Some(rows) = value.as_object() else {
            self.report(ConfigBlock::TransitionTable, ViolationKind::Malformed(TABLE));
            return None;
        };

        let mut table = BTreeMap::new();
        let mut defined = BTreeSet::new();
        let mut malformed_rows = BTreeSet::new();
        let mut duplicates = Vec::new();

        for (label, row) in rows {
            let state = self.state(label);
            if let Some(states) = states {
                if !states.contains(&state) {
                    self.report(ConfigBlock::TransitionTable, ViolationKind::UnknownState(label.clone()));
                    continue;
                }
            }

            if table.contains_key(&state) || malformed_rows.contains(&state) {
                duplicates.push(state.label().to_string());
                continue;
            }

            let Some(row) = row.as_object() else {
                self.report(ConfigBlock::TransitionTable, ViolationKind::Malformed(TABLE));
                malformed_rows.insert(state);
                continue;
            };

            let mut entries = BTreeMap::new();
            for (entry, target) in row {
                let Some(symbol) = self.symbol(entry) else {
                    self.report(ConfigBlock::TransitionTable, ViolationKind::InvalidSymbol(entry.clone()));
                    continue;
                };

                if let Some(alphabet) = alphabet {
                    if !alphabet.contains(&symbol) {
                        self.report(ConfigBlock::TransitionTable, ViolationKind::UnknownSymbol(state.clone(), symbol));
                        continue;
                    }
                }

                if !defined.insert((state.clone(), symbol)) {
                    duplicates.push(format!("({state}, {symbol})"));
                    continue;
                }

                match parse_target(&state, symbol, target) {
                    Ok(target) => {
                        entries.insert(symbol, target);
                    }
                    Err(kinds) => {
                        for kind in kinds {
                            self.report(ConfigBlock::TransitionTable, kind);
                        }
                    }
                }
            }

            table.insert(state, entries);
        }

        if !duplicates.is_empty() {
            self.report(ConfigBlock::TransitionTable, ViolationKind::DuplicateEntries(duplicates));
        }

        if let (Some(states), Some(alphabet)) = (states, alphabet) {
            for state in states.iter().filter(|state| !malformed_rows.contains(*state)) {
                for &symbol in alphabet {
                    if !defined.contains(&(state.clone(), symbol)) {
                        self.report(ConfigBlock::TransitionTable, ViolationKind::MissingTransition(state.clone(), symbol));
                    }
                }
            }
        }

        Some(table)
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::config::LabelCase,
        pretty_assertions::assert_eq,
        serde_json::json,
        test_log::test,
    };

    fn parity() -> Value {
        json!({
            "States": ["A", "B"],
            "Alphabet": ["a", "b"],
            "D-Table": {
                "A": {"a": "A", "b": "B"},
                "B": {"a": "B", "b": "A"},
            },
            "Start": "A",
            "Accept": ["A"],
        })
    }

    fn violations(result: Result<impl std::fmt::Debug, MachineError>) -> Vec<Violation> {
        match result {
            Err(MachineError::InvalidConfigBlock(violations)) => violations,
            other => panic!("Expected InvalidConfigBlock, got {other:?}"),
        }
    }

    fn s(label: &str) -> State {
        State::from(label)
    }

    #[test]
    fn test_load_parity() {
        let dfa = load_dfa(&parity(), &LoadOptions::default()).unwrap();
        assert_eq!(dfa.states().len(), 2);
        assert_eq!(dfa.alphabet(), &BTreeSet::from(['a', 'b']));
        assert_eq!(dfa.start(), &s("A"));
        assert!(dfa.is_accept(&s("A")));
        assert!(!dfa.is_accept(&s("B")));
        assert_eq!(dfa.transition(&s("B"), 'b'), Some(&s("A")));
    }

    #[test]
    fn test_missing_and_unexpected_blocks() {
        let mut doc = parity();
        let blocks = doc.as_object_mut().unwrap();
        blocks.remove("Start");
        blocks.remove("Accept");
        blocks.insert("Extra".to_string(), json!([]));

        assert_eq!(
            load_dfa(&doc, &LoadOptions::default()),
            Err(MachineError::MissingConfigBlock {
                missing: vec![ConfigBlock::Start, ConfigBlock::Accept],
                unexpected: vec!["Extra".to_string()],
            })
        );
    }

    #[test]
    fn test_not_a_mapping() {
        assert!(matches!(
            load(MachineKind::Deterministic, &json!(["States"]), &LoadOptions::default()),
            Err(MachineError::MalformedDocument(_))
        ));
    }

    #[test]
    fn test_missing_transition_is_named_exactly() {
        let mut doc = parity();
        doc["D-Table"]["A"].as_object_mut().unwrap().remove("b");

        assert_eq!(
            violations(load_dfa(&doc, &LoadOptions::default())),
            vec![Violation::new(ConfigBlock::TransitionTable, ViolationKind::MissingTransition(s("A"), Symbol::Char('b')))]
        );
    }

    #[test]
    fn test_empty_state_label() {
        let doc = json!({
            "States": ["A", ""],
            "Alphabet": ["a"],
            "D-Table": {
                "A": {"a": ""},
                "": {"a": "A"},
            },
            "Start": "A",
            "Accept": ["A"],
        });

        assert_eq!(
            violations(load_nfa_lambda(&json!({
                "States": ["A", ""],
                "Alphabet": ["a"],
                "D-Table": {
                    "A": {"a": [""]},
                    "": {"a": ["A"]},
                },
                "Start": "A",
                "Accept": ["A"],
            }), &LoadOptions::default())),
            vec![Violation::new(ConfigBlock::States, ViolationKind::EmptyLabel)]
        );
        assert_eq!(
            violations(load_dfa(&doc, &LoadOptions::default())),
            vec![Violation::new(ConfigBlock::States, ViolationKind::EmptyLabel)]
        );
    }

    #[test]
    fn test_all_violations_are_collected() {
        let doc = json!({
            "States": ["A", "B", "A"],
            "Alphabet": ["a", "a", "λ"],
            "D-Table": {
                "A": {"a": "C"},
                "B": {"a": "B"},
            },
            "Start": "Z",
            "Accept": ["A", "Y"],
        });

        assert_eq!(
            violations(load_dfa(&doc, &LoadOptions::default())),
            vec![
                Violation::new(ConfigBlock::States, ViolationKind::DuplicateEntries(vec!["A".to_string()])),
                Violation::new(ConfigBlock::Alphabet, ViolationKind::LambdaNotAllowed),
                Violation::new(ConfigBlock::Alphabet, ViolationKind::DuplicateEntries(vec!["a".to_string()])),
                Violation::new(ConfigBlock::Start, ViolationKind::UnknownState("Z".to_string())),
                Violation::new(ConfigBlock::Accept, ViolationKind::UnknownState("Y".to_string())),
                Violation::new(
                    ConfigBlock::TransitionTable,
                    ViolationKind::UnknownTarget(s("A"), Symbol::Char('a'), "C".to_string())
                ),
            ]
        );
    }

    #[test]
    fn test_stray_table_entries() {
        let mut doc = parity();
        doc["D-Table"]["C"] = json!({"a": "A", "b": "A"});
        doc["D-Table"]["A"]["c"] = json!("A");
        doc["D-Table"]["B"]["bb"] = json!("A");

        assert_eq!(
            violations(load_dfa(&doc, &LoadOptions::default())),
            vec![
                Violation::new(ConfigBlock::TransitionTable, ViolationKind::UnknownSymbol(s("A"), Symbol::Char('c'))),
                Violation::new(ConfigBlock::TransitionTable, ViolationKind::InvalidSymbol("bb".to_string())),
                Violation::new(ConfigBlock::TransitionTable, ViolationKind::UnknownState("C".to_string())),
            ]
        );
    }

    #[test]
    fn test_malformed_blocks() {
        let doc = json!({
            "States": "A",
            "Alphabet": [1, 2],
            "D-Table": [],
            "Start": ["A"],
            "Accept": ["A"],
        });

        assert_eq!(
            violations(load_dfa(&doc, &LoadOptions::default())),
            vec![
                Violation::new(ConfigBlock::States, ViolationKind::Malformed(STATE_LABELS)),
                Violation::new(ConfigBlock::Alphabet, ViolationKind::Malformed(SYMBOLS)),
                Violation::new(ConfigBlock::Start, ViolationKind::Malformed(START_LABEL)),
                Violation::new(ConfigBlock::TransitionTable, ViolationKind::Malformed(TABLE)),
            ]
        );
    }

    #[test]
    fn test_load_nfa_lambda() {
        let doc = json!({
            "States": ["A", "B"],
            "Alphabet": ["λ", "a"],
            "D-Table": {
                "A": {"λ": ["B"], "a": ["A"]},
                "B": {"λ": "{}", "a": "{}"},
            },
            "Start": "A",
            "Accept": ["B"],
        });

        let nfa = load_nfa_lambda(&doc, &LoadOptions::default()).unwrap();
        assert_eq!(nfa.alphabet(), &BTreeSet::from([Symbol::Lambda, Symbol::Char('a')]));
        assert_eq!(nfa.targets(&s("A"), Symbol::Lambda), Some(&StateSet::singleton(s("B"))));
        assert_eq!(nfa.table()[&s("B")][&Symbol::Char('a')], TransitionTarget::NoTransition);
        assert_eq!(nfa.targets(&s("B"), Symbol::Char('a')), None);
    }

    #[test]
    fn test_nfa_lambda_empty_marker_is_required() {
        let doc = json!({
            "States": ["A", "B"],
            "Alphabet": ["λ", "a"],
            "D-Table": {
                "A": {"λ": [], "a": ["A", "A", "C"]},
                "B": {"a": "B"},
            },
            "Start": "A",
            "Accept": ["B"],
        });

        assert_eq!(
            violations(load_nfa_lambda(&doc, &LoadOptions::default())),
            vec![
                Violation::new(
                    ConfigBlock::TransitionTable,
                    ViolationKind::UnknownTarget(s("A"), Symbol::Char('a'), "C".to_string())
                ),
                Violation::new(
                    ConfigBlock::TransitionTable,
                    ViolationKind::DuplicateEntries(vec!["(A, a) -> A".to_string()])
                ),
                Violation::new(ConfigBlock::TransitionTable, ViolationKind::AmbiguousEmptyTarget(s("A"), Symbol::Lambda)),
                Violation::new(ConfigBlock::TransitionTable, ViolationKind::Malformed(NFA_TARGET)),
                Violation::new(ConfigBlock::TransitionTable, ViolationKind::MissingTransition(s("B"), Symbol::Lambda)),
            ]
        );
    }

    #[test]
    fn test_labels_are_case_sensitive_by_default() {
        let mut doc = parity();
        doc["Start"] = json!("a");
        assert_eq!(
            violations(load_dfa(&doc, &LoadOptions::default())),
            vec![Violation::new(ConfigBlock::Start, ViolationKind::UnknownState("a".to_string()))]
        );
    }

    #[test]
    fn test_case_normalization() {
        let doc = json!({
            "States": ["a", "b"],
            "Alphabet": ["X", "Y"],
            "D-Table": {
                "a": {"x": "A", "Y": "b"},
                "B": {"X": "b", "y": "a"},
            },
            "Start": "A",
            "Accept": ["b"],
        });
        let options = LoadOptions {
            state_case: LabelCase::Upper,
            symbol_case: LabelCase::Lower,
        };

        let dfa = load_dfa(&doc, &options).unwrap();
        assert_eq!(dfa.start(), &s("A"));
        assert_eq!(dfa.alphabet(), &BTreeSet::from(['x', 'y']));
        assert_eq!(dfa.transition(&s("A"), 'y'), Some(&s("B")));
        assert!(dfa.is_accept(&s("B")));
    }

    #[test]
    fn test_normalization_can_create_duplicates() {
        let mut doc = parity();
        doc["States"] = json!(["A", "a", "B"]);
        let options = LoadOptions {
            state_case: LabelCase::Upper,
            ..LoadOptions::default()
        };
        assert_eq!(
            violations(load_dfa(&doc, &options)),
            vec![Violation::new(ConfigBlock::States, ViolationKind::DuplicateEntries(vec!["A".to_string()]))]
        );
    }

    #[test]
    fn test_lambda_marker_is_not_normalized() {
        let doc = json!({
            "States": ["A"],
            "Alphabet": ["λ", "A"],
            "D-Table": {"A": {"λ": "{}", "a": ["A"]}},
            "Start": "A",
            "Accept": [],
        });
        let options = LoadOptions {
            symbol_case: LabelCase::Lower,
            ..LoadOptions::default()
        };

        let nfa = load_nfa_lambda(&doc, &options).unwrap();
        assert_eq!(nfa.alphabet(), &BTreeSet::from([Symbol::Lambda, Symbol::Char('a')]));
    }
}
