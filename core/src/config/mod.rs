mod export;
mod loader;
mod validate;

pub use {export::*, loader::*, validate::*};

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

/// Key of the States block.
pub const STATES_BLOCK: &str = "States";

/// Key of the Alphabet block.
pub const ALPHABET_BLOCK: &str = "Alphabet";

/// Key of the transition table block.
pub const TRANSITION_TABLE_BLOCK: &str = "D-Table";

/// Key of the Start block.
pub const START_BLOCK: &str = "Start";

/// Key of the Accept block.
pub const ACCEPT_BLOCK: &str = "Accept";

/// The five blocks of a machine configuration document.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum ConfigBlock {
    /// The `States` block.
    States,

    /// The `Alphabet` block.
    Alphabet,

    /// The `D-Table` transition table block.
    TransitionTable,

    /// The `Start` block.
    Start,

    /// The `Accept` block.
    Accept,
}

impl ConfigBlock {
    /// Every block, in document order.
    pub const ALL: [ConfigBlock; 5] =
        [ConfigBlock::States, ConfigBlock::Alphabet, ConfigBlock::TransitionTable, ConfigBlock::Start, ConfigBlock::Accept];

    /// Returns the document key of this block.
    pub fn key(&self) -> &'static str {
        match self {
            Self::States => STATES_BLOCK,
            Self::Alphabet => ALPHABET_BLOCK,
            Self::TransitionTable => TRANSITION_TABLE_BLOCK,
            Self::Start => START_BLOCK,
            Self::Accept => ACCEPT_BLOCK,
        }
    }

    /// Returns the block with the given document key, if any.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|block| block.key() == key)
    }
}

impl Display for ConfigBlock {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        f.write_str(self.key())
    }
}

/// Case normalization applied to labels while loading. Labels are case-sensitive unless a policy other than
/// [LabelCase::Preserve] is selected.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum LabelCase {
    /// Use labels exactly as written.
    #[default]
    Preserve,

    /// Convert labels to upper case.
    Upper,

    /// Convert labels to lower case.
    Lower,
}

impl LabelCase {
    /// Applies this policy to `label`.
    pub fn apply(&self, label: &str) -> String {
        match self {
            Self::Preserve => label.to_string(),
            Self::Upper => label.to_uppercase(),
            Self::Lower => label.to_lowercase(),
        }
    }
}

impl FromStr for LabelCase {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "preserve" => Ok(Self::Preserve),
            "upper" => Ok(Self::Upper),
            "lower" => Ok(Self::Lower),
            _ => Err(format!("Invalid label case {s:?}; expected one of preserve, upper, lower")),
        }
    }
}

/// Options controlling how a configuration document is loaded.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct LoadOptions {
    /// Normalization of state labels (States, Start, Accept, and table rows and targets).
    pub state_case: LabelCase,

    /// Normalization of symbols (Alphabet and table keys). The λ marker is never normalized.
    pub symbol_case: LabelCase,
}
