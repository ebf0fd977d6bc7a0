mod closure;
mod execution;
mod machine;
mod run_automaton;
mod state;
mod subset;
mod symbol;
mod t_table;

pub use {
    closure::{lambda_closure, lambda_closure_of},
    execution::{execute, Execution, RunStatus, Simulator, Step},
    machine::{Dfa, Machine, MachineKind, NfaLambda, TransitionTarget},
    run_automaton::RunAutomaton,
    state::{State, StateSet, EMPTY_SET_MARKER},
    subset::{convert, convert_with_table},
    symbol::{Symbol, LAMBDA_MARKER},
    t_table::TTable,
};

pub(crate) use symbol::single_char;
