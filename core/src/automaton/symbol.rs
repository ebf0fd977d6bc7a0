use std::fmt::{Display, Formatter, Result as FmtResult};

/// The configuration marker for the empty (λ) symbol.
pub const LAMBDA_MARKER: &str = "λ";

/// A transition symbol. `Lambda` denotes a spontaneous transition and is only valid in NFA-λ machines.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Symbol {
    /// The empty symbol.
    Lambda,

    /// A single input character.
    Char(char),
}

impl Symbol {
    /// Parses a configuration entry into a symbol. Returns `None` if the entry is neither the λ marker nor
    /// exactly one character.
    pub fn parse(entry: &str) -> Option<Self> {
        if entry == LAMBDA_MARKER {
            Some(Self::Lambda)
        } else {
            single_char(entry).map(Self::Char)
        }
    }

    /// Returns the input character, or `None` for λ.
    #[inline]
    pub fn as_char(&self) -> Option<char> {
        match self {
            Self::Lambda => None,
            Self::Char(c) => Some(*c),
        }
    }

    /// Returns `true` for the λ symbol.
    #[inline]
    pub fn is_lambda(&self) -> bool {
        matches!(self, Self::Lambda)
    }
}

/// Returns the only character of `s`, or `None` if `s` is empty or longer than one character.
pub(crate) fn single_char(s: &str) -> Option<char> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

impl From<char> for Symbol {
    fn from(c: char) -> Self {
        Self::Char(c)
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        match self {
            Self::Lambda => f.write_str(LAMBDA_MARKER),
            Self::Char(c) => write!(f, "{c}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use {super::*, pretty_assertions::assert_eq, test_log::test};

    #[test]
    fn test_parse() {
        assert_eq!(Symbol::parse("λ"), Some(Symbol::Lambda));
        assert_eq!(Symbol::parse("a"), Some(Symbol::Char('a')));
        assert_eq!(Symbol::parse("ab"), None);
        assert_eq!(Symbol::parse(""), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Symbol::Lambda.to_string(), "λ");
        assert_eq!(Symbol::from('x').to_string(), "x");
    }
}
