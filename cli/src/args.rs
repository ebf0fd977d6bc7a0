use {
    crate::CliError,
    automata_core::config::{LabelCase, LoadOptions},
    clap::{ArgAction, Parser},
    std::{
        env,
        path::{PathBuf, MAIN_SEPARATOR_STR},
    },
};

pub(crate) const DFA_FLAG: &str = "--dfa";
pub(crate) const NFAL_FLAG: &str = "--nfal";
const CONVERTED_EXTENSION: &str = "dfa";

/// Runs a tape through a DFA, or through the DFA converted from an NFA-λ.
#[derive(Debug, Parser)]
#[command(name = "simulator", version, about)]
pub(crate) struct Cli {
    /// Input string to run as the tape.
    #[arg(value_name = "TAPE")]
    pub tape: Option<String>,

    /// DFA configuration document.
    #[arg(long, value_name = "PATH", num_args = 0..=1, conflicts_with = "nfal")]
    pub dfa: Option<Option<String>>,

    /// NFA-λ configuration document.
    #[arg(long, value_name = "PATH", num_args = 0..=1)]
    pub nfal: Option<Option<String>>,

    /// Convert the NFA-λ to a DFA and write its configuration here (default: the NFA-λ path with a .dfa extension).
    #[arg(long, value_name = "PATH", num_args = 0..=1)]
    pub conv: Option<Option<String>>,

    /// Case normalization for state labels: preserve, upper or lower.
    #[arg(long, value_name = "CASE", default_value = "preserve")]
    pub state_case: LabelCase,

    /// Case normalization for symbols, applied to the tape as well: preserve, upper or lower.
    #[arg(long, value_name = "CASE", default_value = "preserve")]
    pub symbol_case: LabelCase,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            state_case: self.state_case,
            symbol_case: self.symbol_case,
        }
    }
}

/// A fully resolved invocation.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum Command {
    RunDfa {
        machine: PathBuf,
        tape: String,
    },
    RunNfaLambda {
        machine: PathBuf,
        tape: String,
        conv: Option<PathBuf>,
    },
}

/// Validates the parsed arguments and resolves every path.
///
/// Checks run in a fixed order: machine selector, machine path, conversion target, tape.
pub(crate) fn resolve(cli: &Cli) -> Result<Command, CliError> {
    let (flag, raw_path) = match (&cli.nfal, &cli.dfa) {
        (Some(path), _) => (NFAL_FLAG, path),
        (None, Some(path)) => (DFA_FLAG, path),
        (None, None) => return Err(CliError::NoMachine),
    };

    let machine = match raw_path.as_deref() {
        Some(raw) if !raw.is_empty() => normalize_path(raw),
        _ => return Err(CliError::PathNotSupplied(flag)),
    };

    if !machine.is_file() {
        return Err(CliError::PathNotFound(flag, machine));
    }

    let conv = match &cli.conv {
        Some(_) if flag != NFAL_FLAG => return Err(CliError::ConversionWithoutNfa),
        Some(Some(raw)) if !raw.is_empty() => Some(normalize_path(raw)),
        Some(_) => Some(machine.with_extension(CONVERTED_EXTENSION)),
        None => None,
    };

    let Some(tape) = cli.tape.clone() else {
        return Err(CliError::NoTape);
    };

    Ok(if flag == NFAL_FLAG {
        Command::RunNfaLambda {
            machine,
            tape,
            conv,
        }
    } else {
        Command::RunDfa {
            machine,
            tape,
        }
    })
}

/// Accepts both `/` and `\` as separators and expands a leading `~` to the home directory.
///
/// A path with neither separator is split on the classic Mac OS separator `:` instead.
pub(crate) fn normalize_path(raw: &str) -> PathBuf {
    let separators: &[char] = if raw.contains(['/', '\\']) {
        &['/', '\\']
    } else {
        &[':']
    };
    let mut path = PathBuf::new();

    for (i, component) in raw.split(separators).enumerate() {
        if i == 0 {
            if component.is_empty() {
                path.push(MAIN_SEPARATOR_STR);
                continue;
            }

            if component == "~" {
                if let Some(home) = env::var_os("HOME") {
                    path.push(home);
                    continue;
                }
            }
        }

        if !component.is_empty() {
            path.push(component);
        }
    }

    path
}
