use {
    crate::{
        automaton::{Dfa, RunAutomaton, State},
        MachineError, Tape,
    },
    log::{debug, trace},
    std::fmt::{Display, Formatter, Result as FmtResult},
};

/// Lifecycle of a [Simulator].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum RunStatus {
    /// Waiting for `execute()`.
    Ready,

    /// Stepping through the tape.
    Running,

    /// The tape was exhausted in an accept state.
    Accepted,

    /// The tape was exhausted in a non-accept state.
    Rejected,

    /// A symbol outside the alphabet halted execution.
    Errored,
}

/// One transition taken during execution.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Step {
    /// State before reading the symbol.
    pub state: State,

    /// The symbol read.
    pub symbol: char,

    /// State after reading the symbol.
    pub next: State,
}

impl Display for Step {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        write!(f, "{} --{}--> {}", self.state, self.symbol, self.next)
    }
}

/// The outcome of running a DFA over a tape.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Execution {
    /// Whether the tape was exhausted in an accept state.
    pub accepted: bool,

    /// The state the machine halted in.
    pub final_state: State,

    /// Position at which the tape was exhausted (the tape length).
    pub final_position: usize,

    /// Every transition taken, in order.
    pub trace: Vec<Step>,

    /// The tape the machine ran over.
    pub tape: String,
}

/// Runs `dfa` over `tape`.
///
/// This is a pure function of its arguments; identical inputs always produce identical executions.
pub fn execute(dfa: &Dfa, tape: &Tape) -> Result<Execution, MachineError> {
    Ok(run(&RunAutomaton::new(dfa)?, tape)?.0)
}

/// Steps `automaton` over `tape`, returning the execution record and the terminal status.
fn run(automaton: &RunAutomaton, tape: &Tape) -> Result<(Execution, RunStatus), MachineError> {
    let mut current = automaton.start();
    let mut position = 0;
    let mut trace = Vec::with_capacity(tape.len());

    loop {
        let symbol = match tape.read(position) {
            Ok(symbol) => symbol,
            Err(MachineError::TapeOutOfRange { .. }) => break,
            Err(e) => return Err(e),
        };

        let Some(next) = automaton.step(current, symbol) else {
            debug!("Invalid character {symbol:?} at position {position} of tape {tape}");
            return Err(MachineError::InvalidCharacterInTape {
                position,
                symbol,
            });
        };

        let step = Step {
            state: automaton.state(current).clone(),
            symbol,
            next: automaton.state(next).clone(),
        };
        trace!("{step}");
        trace.push(step);

        current = next;
        position += 1;
    }

    let accepted = automaton.is_accept(current);
    let final_state = automaton.state(current).clone();
    debug!("Tape \"{tape}\" {} in state {final_state}", if accepted { "accepted" } else { "rejected" });

    let status = if accepted {
        RunStatus::Accepted
    } else {
        RunStatus::Rejected
    };

    Ok((
        Execution {
            accepted,
            final_state,
            final_position: position,
            trace,
            tape: tape.to_string(),
        },
        status,
    ))
}

/// A DFA engine with a loaded tape. The DFA is compiled once; `load` and `execute` may be repeated.
#[derive(Clone, Debug)]
pub struct Simulator {
    automaton: RunAutomaton,
    tape: Option<Tape>,
    status: RunStatus,
}

impl Simulator {
    /// Compiles `dfa` into a simulator with no tape loaded.
    pub fn new(dfa: &Dfa) -> Result<Self, MachineError> {
        Ok(Self {
            automaton: RunAutomaton::new(dfa)?,
            tape: None,
            status: RunStatus::Ready,
        })
    }

    /// Loads a tape, replacing any previously loaded one, and returns to [RunStatus::Ready].
    pub fn load(&mut self, tape: Tape) {
        self.tape = Some(tape);
        self.status = RunStatus::Ready;
    }

    /// Returns the loaded tape, if any.
    #[inline]
    pub fn tape(&self) -> Option<&Tape> {
        self.tape.as_ref()
    }

    /// Returns the current lifecycle status.
    #[inline]
    pub fn status(&self) -> RunStatus {
        self.status
    }

    /// Runs the machine over the loaded tape.
    pub fn execute(&mut self) -> Result<Execution, MachineError> {
        let Some(tape) = &self.tape else {
            return Err(MachineError::NoTapeLoaded);
        };

        self.status = RunStatus::Running;
        match run(&self.automaton, tape) {
            Ok((execution, status)) => {
                self.status = status;
                Ok(execution)
            }
            Err(e) => {
                self.status = RunStatus::Errored;
                Err(e)
            }
        }
    }
}
