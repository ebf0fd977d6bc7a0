use {
    crate::{
        automaton::{Machine, MachineKind},
        config::{dumps, load, LoadOptions},
        MachineError,
    },
    log::{debug, error},
    serde_json::Value,
    std::{
        fs::{read_to_string, write},
        io::{Error as IoError, ErrorKind as IoErrorKind},
        path::Path,
    },
};

/// Reads and parses the JSON document at `path`.
///
/// A path that does not exist is reported as [MachineError::FileNotFound]; a file that is not valid JSON as
/// [MachineError::MalformedDocument].
pub fn read_document<P: AsRef<Path>>(path: P) -> Result<Value, MachineError> {
    let path = path.as_ref();
    let text = read_to_string(path).map_err(|e| io_error(path, e))?;

    serde_json::from_str(&text).map_err(|e| {
        error!("Failed to parse {}: {e}", path.display());
        MachineError::MalformedDocument(format!("{}: {e}", path.display()))
    })
}

/// Reads the document at `path` and loads it as a machine of the given kind.
pub fn load_file<P: AsRef<Path>>(kind: MachineKind, path: P, options: &LoadOptions) -> Result<Machine, MachineError> {
    let path = path.as_ref();
    debug!("Loading {kind:?} machine from {}", path.display());
    load(kind, &read_document(path)?, options)
}

/// Writes the exported document of `machine` to `path` as pretty-printed JSON.
pub fn write_machine<P: AsRef<Path>>(path: P, machine: &Machine) -> Result<(), MachineError> {
    let path = path.as_ref();
    let text = dumps(machine)?;
    write(path, text + "\n").map_err(|e| io_error(path, e))?;
    debug!("Wrote {:?} machine to {}", machine.kind(), path.display());
    Ok(())
}

fn io_error(path: &Path, e: IoError) -> MachineError {
    if e.kind() == IoErrorKind::NotFound {
        error!("File {} not found", path.display());
        MachineError::FileNotFound(path.to_path_buf())
    } else {
        error!("Failed to access {}: {e}", path.display());
        MachineError::Io(format!("{}: {e}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::automaton::State,
        pretty_assertions::assert_eq,
        serde_json::json,
        std::{env::temp_dir, fs::remove_file, path::PathBuf, process},
        test_log::test,
    };

    fn scratch(name: &str) -> PathBuf {
        let mut path = temp_dir();
        path.push(format!("automata-core-{}-{name}", process::id()));
        path
    }

    #[test]
    fn test_missing_file() {
        let path = scratch("does-not-exist.dfa");
        assert_eq!(read_document(&path), Err(MachineError::FileNotFound(path.clone())));
        assert_eq!(
            load_file(MachineKind::Deterministic, &path, &LoadOptions::default()),
            Err(MachineError::FileNotFound(path))
        );
    }

    #[test]
    fn test_malformed_file() {
        let path = scratch("malformed.dfa");
        write(&path, "{ not json").unwrap();
        let result = read_document(&path);
        remove_file(&path).unwrap();
        assert!(matches!(result, Err(MachineError::MalformedDocument(_))));
    }

    #[test]
    fn test_write_then_load() {
        let doc = json!({
            "States": ["Even", "Odd"],
            "Alphabet": ["1"],
            "D-Table": {
                "Even": {"1": "Odd"},
                "Odd": {"1": "Even"},
            },
            "Start": "Even",
            "Accept": ["Odd"],
        });
        let machine = load(MachineKind::Deterministic, &doc, &LoadOptions::default()).unwrap();

        let path = scratch("odd-ones.dfa");
        write_machine(&path, &machine).unwrap();
        let reloaded = load_file(MachineKind::Deterministic, &path, &LoadOptions::default());
        let text = read_to_string(&path).unwrap();
        remove_file(&path).unwrap();

        assert_eq!(reloaded, Ok(machine));
        assert!(text.starts_with("{\n  \"States\""));

        let Ok(Machine::Deterministic(dfa)) = reloaded else {
            panic!("Expected a DFA");
        };
        assert_eq!(dfa.transition(&State::from("Odd"), '1'), Some(&State::from("Even")));
    }
}
