use thiserror::Error;

/// How an option alias was written on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Specifier {
    Long(String),
    Short(char),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct OptionConfig {
    name: String,
    short: Option<char>,
    long: Option<String>,
    takes_value: bool,
    negatable: bool,
}

impl OptionConfig {
    pub(crate) fn new(
        name: impl Into<String>,
        short: Option<char>,
        long: Option<String>,
        takes_value: bool,
        negatable: bool,
    ) -> Self {
        Self {
            name: name.into(),
            short,
            long,
            takes_value,
            negatable,
        }
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn short(&self) -> &Option<char> {
        &self.short
    }

    pub(crate) fn long(&self) -> &Option<String> {
        &self.long
    }

    pub(crate) fn takes_value(&self) -> bool {
        self.takes_value
    }

    pub(crate) fn negatable(&self) -> bool {
        self.negatable
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ArgumentConfig {
    required: bool,
    preset: bool,
}

impl ArgumentConfig {
    pub(crate) fn new(required: bool) -> Self {
        Self {
            required,
            preset: false,
        }
    }

    /// Mark the positional as already holding a value (from config) before any token is fed.
    pub(crate) fn preset(mut self, preset: bool) -> Self {
        self.preset = preset;
        self
    }

    /// Whether a sub-command may be selected before this positional is filled by a token.
    pub(crate) fn satisfied(&self) -> bool {
        !self.required || self.preset
    }
}

/// One classified unit of input, emitted in input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Match {
    Option {
        name: String,
        specifier: Specifier,
        value: Option<String>,
        negated: bool,
    },
    Argument {
        index: usize,
        value: String,
    },
    SubCommand {
        name: String,
    },
    Help,
}

/// An option waiting on the following token for its value.
#[derive(Debug)]
pub(super) struct MatchBuffer {
    name: String,
    specifier: Specifier,
}

impl MatchBuffer {
    pub(super) fn new(name: impl Into<String>, specifier: Specifier) -> Self {
        Self {
            name: name.into(),
            specifier,
        }
    }

    pub(super) fn close(self, value: impl Into<String>) -> Match {
        Match::Option {
            name: self.name,
            specifier: self.specifier,
            value: Some(value.into()),
            negated: false,
        }
    }

    pub(super) fn abandon(self) -> MatchError {
        match self.specifier {
            Specifier::Long(long) => MatchError::MissingValueLong(long),
            Specifier::Short(short) => MatchError::MissingValueShort(short),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum MatchError {
    #[error("Option '--{0}' does not exist.")]
    UnknownLong(String),

    #[error("Option '--{0}' requires a value.")]
    MissingValueLong(String),

    #[error("Option '--{0}' does not take a value.")]
    UnexpectedValueLong(String),

    #[error("Short option '-{0}' does not exist.")]
    UnknownShort(char),

    #[error("Short option '-{short}' does not exist in '-{cluster}'.")]
    UnknownShortInCluster { short: char, cluster: String },

    #[error("Short option '-{short}' requires a value and must be last in '-{cluster}'.")]
    ShortClusterNoBool { short: char, cluster: String },

    #[error("Short option '{0}' cannot use '='.")]
    ShortWithEquals(String),

    #[error("Short option '-{0}' requires a value.")]
    MissingValueShort(char),

    #[error("No more positionals to match '{0}' against.")]
    ArgumentsExhausted(String),

    #[error("No sub-command or positional matches '{0}'.")]
    UnknownSubCommand(String),
}
