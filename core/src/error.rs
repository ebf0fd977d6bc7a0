use {
    crate::{
        automaton::{State, Symbol},
        config::ConfigBlock,
    },
    std::{
        error::Error,
        fmt::{Display, Formatter, Result as FmtResult},
        path::PathBuf,
    },
};

/// Errors that can occur while loading, executing, or exporting a machine.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum MachineError {
    /// The document's top-level keys are not exactly the five required blocks.
    MissingConfigBlock {
        /// Required blocks that are absent.
        missing: Vec<ConfigBlock>,

        /// Top-level keys that are not configuration blocks.
        unexpected: Vec<String>,
    },

    /// One or more structural invariants failed. Every violation found is reported.
    InvalidConfigBlock(Vec<Violation>),

    /// A configuration path does not resolve to a readable document.
    FileNotFound(PathBuf),

    /// A configuration document could not be parsed.
    MalformedDocument(String /* detail */),

    /// A document could not be read or written for a reason other than a missing file.
    Io(String /* detail */),

    /// A symbol outside the alphabet was read from the tape.
    InvalidCharacterInTape {
        /// Tape position of the offending symbol.
        position: usize,

        /// The offending symbol.
        symbol: char,
    },

    /// A tape position past the end of the tape was read or written.
    TapeOutOfRange {
        /// The requested position.
        position: usize,

        /// The length of the tape.
        len: usize,
    },

    /// A simulator was executed before a tape was loaded.
    NoTapeLoaded,
}

impl Display for MachineError {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        match self {
            Self::MissingConfigBlock { missing, unexpected } => {
                write!(f, "Missing config block(s): ")?;
                write_list(f, missing)?;
                if !unexpected.is_empty() {
                    write!(f, "; unexpected block(s): ")?;
                    write_list(f, unexpected)?;
                }
                Ok(())
            }
            Self::InvalidConfigBlock(violations) => {
                write!(f, "Invalid config block(s): ")?;
                write_list(f, violations)
            }
            Self::FileNotFound(path) => write!(f, "File not found: {}", path.display()),
            Self::MalformedDocument(detail) => write!(f, "Malformed document: {detail}"),
            Self::Io(detail) => write!(f, "I/O error: {detail}"),
            Self::InvalidCharacterInTape { position, symbol } => {
                write!(f, "Invalid character in tape: {symbol:?} at position {position}")
            }
            Self::TapeOutOfRange { position, len } => {
                write!(f, "Tape position {position} is out of range for a tape of length {len}")
            }
            Self::NoTapeLoaded => write!(f, "No tape loaded"),
        }
    }
}

impl Error for MachineError {}

fn write_list<T: Display>(f: &mut Formatter, items: &[T]) -> FmtResult {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

/// A single violated invariant, attributed to the block it was found in.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Violation {
    /// The block containing the violation.
    pub block: ConfigBlock,

    /// What is wrong with it.
    pub kind: ViolationKind,
}

impl Violation {
    /// Creates a violation of `kind` found in `block`.
    pub fn new(block: ConfigBlock, kind: ViolationKind) -> Self {
        Self {
            block,
            kind,
        }
    }
}

impl Display for Violation {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        write!(f, "{} ({})", self.block, self.kind)
    }
}

/// The kinds of structural violation a configuration document can contain.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ViolationKind {
    /// The block has the wrong shape.
    Malformed(&'static str /* expected */),

    /// The block lists some entries more than once.
    DuplicateEntries(Vec<String>),

    /// An alphabet entry or table key is not a single character (or the λ marker).
    InvalidSymbol(String),

    /// λ appears in a deterministic machine.
    LambdaNotAllowed,

    /// A state label is the empty string.
    EmptyLabel,

    /// A state is referenced that is not in the States block.
    UnknownState(String),

    /// A table entry is keyed by a symbol that is not in the Alphabet block.
    UnknownSymbol(State, Symbol),

    /// The transition table has no entry for this state and symbol.
    MissingTransition(State, Symbol),

    /// A transition leads to a label that is not a state.
    UnknownTarget(State, Symbol, String /* target */),

    /// An empty sequence was given where the empty-set marker is required.
    AmbiguousEmptyTarget(State, Symbol),
}

impl Display for ViolationKind {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        match self {
            Self::Malformed(expected) => write!(f, "expected {expected}"),
            Self::DuplicateEntries(duplicates) => {
                write!(f, "duplicate entries: ")?;
                write_list(f, duplicates)
            }
            Self::InvalidSymbol(entry) => write!(f, "{entry:?} is not a single character"),
            Self::LambdaNotAllowed => write!(f, "λ is not allowed in a deterministic machine"),
            Self::EmptyLabel => write!(f, "state labels may not be empty"),
            Self::UnknownState(label) => write!(f, "{label:?} is not a state"),
            Self::UnknownSymbol(state, symbol) => write!(f, "{state} has a transition on {symbol} which is not in the alphabet"),
            Self::MissingTransition(state, symbol) => write!(f, "no transition defined for ({state}, {symbol})"),
            Self::UnknownTarget(state, symbol, target) => {
                write!(f, "transition ({state}, {symbol}) leads to {target:?} which is not a state")
            }
            Self::AmbiguousEmptyTarget(state, symbol) => write!(
                f,
                "transition ({state}, {symbol}) is an empty sequence; use {:?} for no transition",
                crate::automaton::EMPTY_SET_MARKER
            ),
        }
    }
}
