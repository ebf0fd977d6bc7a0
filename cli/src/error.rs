use {
    automata_core::MachineError,
    std::{
        error::Error,
        fmt::{Display, Formatter, Result as FmtResult},
        io,
        path::PathBuf,
    },
};

const USAGE: &str = "simulator <TAPE> (--dfa <PATH> | --nfal <PATH>) [--conv [<PATH>]]";

/// Everything that can stop a simulator run. Each variant maps to its own exit code.
#[derive(Debug)]
pub(crate) enum CliError {
    NoMachine,
    PathNotSupplied(&'static str),
    PathNotFound(&'static str, PathBuf),
    NoTape,
    ConversionWithoutNfa,
    InvalidTape {
        source: MachineError,
        allowed: Vec<char>,
    },
    Machine(MachineError),
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NoMachine => 3,
            Self::PathNotSupplied(_) => 4,
            Self::PathNotFound(_, _) => 5,
            Self::NoTape => 6,
            Self::ConversionWithoutNfa => 7,
            Self::InvalidTape {
                ..
            } => 10,
            Self::Machine(e) => match e {
                MachineError::MissingConfigBlock {
                    ..
                } => 8,
                MachineError::InvalidConfigBlock(_) => 9,
                MachineError::InvalidCharacterInTape {
                    ..
                } => 10,
                MachineError::FileNotFound(_) => 5,
                _ => 11,
            },
        }
    }
}

impl Display for CliError {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        match self {
            Self::NoMachine => write!(f, "No machine selected; usage: {USAGE}"),
            Self::PathNotSupplied(flag) => write!(f, "File path not supplied for {flag}"),
            Self::PathNotFound(flag, path) => write!(f, "File path for {flag} does not exist: {}", path.display()),
            Self::NoTape => write!(f, "No input tape provided; usage: {USAGE}"),
            Self::ConversionWithoutNfa => write!(f, "--conv requires --nfal; usage: {USAGE}"),
            Self::InvalidTape {
                source,
                allowed,
            } => {
                let allowed: Vec<String> = allowed.iter().map(char::to_string).collect();
                write!(f, "{source}; allowed characters: {}", allowed.join(", "))
            }
            Self::Machine(e) => write!(f, "{e}"),
        }
    }
}

impl Error for CliError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidTape {
                source,
                ..
            } => Some(source),
            Self::Machine(e) => Some(e),
            _ => None,
        }
    }
}

impl From<MachineError> for CliError {
    fn from(e: MachineError) -> Self {
        Self::Machine(e)
    }
}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::Machine(MachineError::Io(e.to_string()))
    }
}
