use {
    crate::MachineError,
    std::fmt::{Display, Formatter, Result as FmtResult},
};

/// An input tape: an ordered, mutable sequence of symbols with bounds-checked random access.
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct Tape {
    symbols: Vec<char>,
}

impl Tape {
    /// Creates a tape holding the characters of `input`.
    pub fn new(input: &str) -> Self {
        Self {
            symbols: input.chars().collect(),
        }
    }

    /// Returns the number of symbols on the tape.
    #[inline]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Returns `true` if the tape holds no symbols.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Reads the symbol at `position`.
    ///
    /// Reading at or past the end returns [MachineError::TapeOutOfRange]. The DFA engine treats this as the
    /// signal that the input is exhausted.
    pub fn read(&self, position: usize) -> Result<char, MachineError> {
        self.symbols.get(position).copied().ok_or(MachineError::TapeOutOfRange {
            position,
            len: self.symbols.len(),
        })
    }

    /// Overwrites the symbol at `position`.
    pub fn write(&mut self, symbol: char, position: usize) -> Result<(), MachineError> {
        let len = self.symbols.len();
        match self.symbols.get_mut(position) {
            Some(slot) => {
                *slot = symbol;
                Ok(())
            }
            None => Err(MachineError::TapeOutOfRange {
                position,
                len,
            }),
        }
    }

    /// Iterates over the symbols in order.
    pub fn iter(&self) -> impl Iterator<Item = char> + '_ {
        self.symbols.iter().copied()
    }
}

impl From<&str> for Tape {
    fn from(input: &str) -> Self {
        Self::new(input)
    }
}

impl Display for Tape {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        for c in &self.symbols {
            write!(f, "{c}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use {super::Tape, crate::MachineError, pretty_assertions::assert_eq, test_log::test};

    #[test]
    fn test_read() {
        let tape = Tape::new("ab");
        assert_eq!(tape.read(0), Ok('a'));
        assert_eq!(tape.read(1), Ok('b'));
        assert_eq!(tape.read(2), Err(MachineError::TapeOutOfRange { position: 2, len: 2 }));
    }

    #[test]
    fn test_write() {
        let mut tape = Tape::new("aaa");
        tape.write('b', 1).unwrap();
        assert_eq!(tape.to_string(), "aba");
        assert_eq!(tape.write('b', 3), Err(MachineError::TapeOutOfRange { position: 3, len: 3 }));
    }

    #[test]
    fn test_empty() {
        let tape = Tape::new("");
        assert!(tape.is_empty());
        assert!(tape.read(0).is_err());
    }
}
