//! Command-line simulator for DFA and NFA-λ machine documents.

mod args;
mod error;

use {
    crate::{
        args::{resolve, Cli, Command},
        error::CliError,
    },
    automata_core::{
        automaton::{convert, execute, Dfa, Machine, TTable},
        config::{dumps, load_dfa, load_nfa_lambda, LoadOptions},
        fs::{read_document, write_machine},
        MachineError, Tape,
    },
    clap::Parser,
    env_logger::Env,
    log::info,
    std::{
        io::{self, Write},
        process,
    },
};

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut stdout = io::stdout().lock();
    let result = resolve(&cli).and_then(|command| run(&command, &cli.load_options(), &mut stdout));

    if let Err(e) = result {
        eprintln!("Error: {e}");
        process::exit(e.exit_code());
    }

    println!("Run Complete - Exiting");
}

/// Installs env_logger. `RUST_LOG` takes precedence over the verbosity flag.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(Env::default().default_filter_or(level)).init();
}

fn run<W: Write>(command: &Command, options: &LoadOptions, out: &mut W) -> Result<(), CliError> {
    match command {
        Command::RunDfa {
            machine,
            tape,
        } => {
            let dfa = load_dfa(&read_document(machine)?, options)?;
            info!("Loaded DFA from {} with {} states", machine.display(), dfa.states().len());
            report_execution(&dfa, &tape_for(tape, options), out)
        }
        Command::RunNfaLambda {
            machine,
            tape,
            conv,
        } => {
            let nfa = load_nfa_lambda(&read_document(machine)?, options)?;
            info!("Loaded NFA-λ from {} with {} states", machine.display(), nfa.states().len());

            writeln!(out, "T-Table:")?;
            writeln!(out, "{}", TTable::build(&nfa))?;

            let Some(conv) = conv else {
                return Ok(());
            };

            let dfa = convert(&nfa);
            let converted = Machine::from(dfa.clone());
            write_machine(conv, &converted)?;
            info!("Wrote converted DFA to {}", conv.display());

            writeln!(out, "DFA Configuration:")?;
            writeln!(out, "{}", dumps(&converted)?)?;

            report_execution(&dfa, &tape_for(tape, options), out)
        }
    }
}

fn tape_for(input: &str, options: &LoadOptions) -> Tape {
    Tape::new(&options.symbol_case.apply(input))
}

fn report_execution<W: Write>(dfa: &Dfa, tape: &Tape, out: &mut W) -> Result<(), CliError> {
    let execution = match execute(dfa, tape) {
        Ok(execution) => execution,
        Err(source @ MachineError::InvalidCharacterInTape {
            ..
        }) => {
            return Err(CliError::InvalidTape {
                source,
                allowed: dfa.alphabet().iter().copied().collect(),
            })
        }
        Err(e) => return Err(e.into()),
    };

    writeln!(out, "Accepted: {}", execution.accepted)?;
    writeln!(out, "Tape: {}", execution.tape)?;
    writeln!(out, "Machine Execution:")?;
    for step in &execution.trace {
        writeln!(out, "{step}")?;
    }

    Ok(())
}
