use std::collections::BTreeMap;
use thiserror::Error;

use crate::parser::messages::render_default;

/// Every failure the engine can report, each with a stable snake_case key.
///
/// Kinds for which [`ErrorKind::is_config`] holds are raised while declaring options/positionals/sub-commands.
/// The remainder are raised while consuming input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum ErrorKind {
    NoShortOrLong,
    ShortNotOneChar,
    LongLessThanTwoChars,
    InvalidLong,
    DuplicateOption,
    DuplicatePositional,
    DuplicateSubcommand,
    OptionalDefaultTypeMismatch,
    PositionalDefaultTypeMismatch,
    RequiredAfterOptional,
    ChoicesTypeMismatch,
    ChoicesDefaultTypeMismatch,
    DefaultFailedValidation,
    RequireDefArgNotFound,
    ConflictDefArgNotFound,
    UnknownLong,
    MissingValueLong,
    UnexpectedValueLong,
    UnknownSingleShort,
    UnknownShortInCluster,
    ShortClusterNoBool,
    ShortWithEqualSign,
    MissingValueShort,
    ValueTypeMismatch,
    ListItemTypeMismatch,
    ValueNotInChoicesShort,
    ValueNotInChoicesLong,
    ValidationFailedShort,
    ValidationFailedLong,
    ValidationFailedShortMessage,
    ValidationFailedLongMessage,
    UnknownPositional,
    UnknownSubcommand,
    PositionalTypeMismatch,
    MissingPositional,
    UnknownInConfig,
    RequireNotProvided,
    ConflictIsProvided,
}

impl ErrorKind {
    /// All error kinds, configuration kinds first.
    pub const ALL: &'static [ErrorKind] = &[
        ErrorKind::NoShortOrLong,
        ErrorKind::ShortNotOneChar,
        ErrorKind::LongLessThanTwoChars,
        ErrorKind::InvalidLong,
        ErrorKind::DuplicateOption,
        ErrorKind::DuplicatePositional,
        ErrorKind::DuplicateSubcommand,
        ErrorKind::OptionalDefaultTypeMismatch,
        ErrorKind::PositionalDefaultTypeMismatch,
        ErrorKind::RequiredAfterOptional,
        ErrorKind::ChoicesTypeMismatch,
        ErrorKind::ChoicesDefaultTypeMismatch,
        ErrorKind::DefaultFailedValidation,
        ErrorKind::RequireDefArgNotFound,
        ErrorKind::ConflictDefArgNotFound,
        ErrorKind::UnknownLong,
        ErrorKind::MissingValueLong,
        ErrorKind::UnexpectedValueLong,
        ErrorKind::UnknownSingleShort,
        ErrorKind::UnknownShortInCluster,
        ErrorKind::ShortClusterNoBool,
        ErrorKind::ShortWithEqualSign,
        ErrorKind::MissingValueShort,
        ErrorKind::ValueTypeMismatch,
        ErrorKind::ListItemTypeMismatch,
        ErrorKind::ValueNotInChoicesShort,
        ErrorKind::ValueNotInChoicesLong,
        ErrorKind::ValidationFailedShort,
        ErrorKind::ValidationFailedLong,
        ErrorKind::ValidationFailedShortMessage,
        ErrorKind::ValidationFailedLongMessage,
        ErrorKind::UnknownPositional,
        ErrorKind::UnknownSubcommand,
        ErrorKind::PositionalTypeMismatch,
        ErrorKind::MissingPositional,
        ErrorKind::UnknownInConfig,
        ErrorKind::RequireNotProvided,
        ErrorKind::ConflictIsProvided,
    ];

    /// The stable key of this error kind (ex: `"unknown_long"`).
    pub fn key(&self) -> &'static str {
        match self {
            ErrorKind::NoShortOrLong => "no_short_or_long",
            ErrorKind::ShortNotOneChar => "short_not_one_char",
            ErrorKind::LongLessThanTwoChars => "long_less_than_two_chars",
            ErrorKind::InvalidLong => "invalid_long",
            ErrorKind::DuplicateOption => "duplicate_option",
            ErrorKind::DuplicatePositional => "duplicate_positional",
            ErrorKind::DuplicateSubcommand => "duplicate_subcommand",
            ErrorKind::OptionalDefaultTypeMismatch => "optional_default_type_mismatch",
            ErrorKind::PositionalDefaultTypeMismatch => "positional_default_type_mismatch",
            ErrorKind::RequiredAfterOptional => "required_after_optional",
            ErrorKind::ChoicesTypeMismatch => "choices_type_mismatch",
            ErrorKind::ChoicesDefaultTypeMismatch => "choices_default_type_mismatch",
            ErrorKind::DefaultFailedValidation => "default_failed_validation",
            ErrorKind::RequireDefArgNotFound => "require_def_arg_not_found",
            ErrorKind::ConflictDefArgNotFound => "conflict_def_arg_not_found",
            ErrorKind::UnknownLong => "unknown_long",
            ErrorKind::MissingValueLong => "missing_value_long",
            ErrorKind::UnexpectedValueLong => "unexpected_value_long",
            ErrorKind::UnknownSingleShort => "unknown_single_short",
            ErrorKind::UnknownShortInCluster => "unknown_short_in_cluster",
            ErrorKind::ShortClusterNoBool => "short_cluster_no_bool",
            ErrorKind::ShortWithEqualSign => "short_with_equal_sign",
            ErrorKind::MissingValueShort => "missing_value_short",
            ErrorKind::ValueTypeMismatch => "value_type_mismatch",
            ErrorKind::ListItemTypeMismatch => "list_item_type_mismatch",
            ErrorKind::ValueNotInChoicesShort => "value_not_in_choices_short",
            ErrorKind::ValueNotInChoicesLong => "value_not_in_choices_long",
            ErrorKind::ValidationFailedShort => "validation_failed_short",
            ErrorKind::ValidationFailedLong => "validation_failed_long",
            ErrorKind::ValidationFailedShortMessage => "validation_failed_short_message",
            ErrorKind::ValidationFailedLongMessage => "validation_failed_long_message",
            ErrorKind::UnknownPositional => "unknown_positional",
            ErrorKind::UnknownSubcommand => "unknown_subcommand",
            ErrorKind::PositionalTypeMismatch => "positional_type_mismatch",
            ErrorKind::MissingPositional => "missing_positional",
            ErrorKind::UnknownInConfig => "unknown_in_config",
            ErrorKind::RequireNotProvided => "require_not_provided",
            ErrorKind::ConflictIsProvided => "conflict_is_provided",
        }
    }

    /// Look up an error kind by its key.
    pub fn from_key(key: &str) -> Option<ErrorKind> {
        ErrorKind::ALL.iter().find(|kind| kind.key() == key).copied()
    }

    /// Whether this kind is raised at declaration time.
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            ErrorKind::NoShortOrLong
                | ErrorKind::ShortNotOneChar
                | ErrorKind::LongLessThanTwoChars
                | ErrorKind::InvalidLong
                | ErrorKind::DuplicateOption
                | ErrorKind::DuplicatePositional
                | ErrorKind::DuplicateSubcommand
                | ErrorKind::OptionalDefaultTypeMismatch
                | ErrorKind::PositionalDefaultTypeMismatch
                | ErrorKind::RequiredAfterOptional
                | ErrorKind::ChoicesTypeMismatch
                | ErrorKind::ChoicesDefaultTypeMismatch
                | ErrorKind::DefaultFailedValidation
                | ErrorKind::RequireDefArgNotFound
                | ErrorKind::ConflictDefArgNotFound
        )
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Placeholder values supplied with an error, keyed by placeholder name.
pub type Placeholders = BTreeMap<&'static str, String>;

/// A declaration (programmer) error.
///
/// Raised immediately by the declaring operation; never deferred to parse time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Config error: {}", render_default(.kind, .placeholders))]
pub struct ConfigError {
    /// What went wrong.
    pub kind: ErrorKind,
    /// Values for the message template.
    pub placeholders: Placeholders,
}

impl ConfigError {
    pub(crate) fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            placeholders: Placeholders::default(),
        }
    }

    pub(crate) fn with(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.placeholders.insert(name, value.into());
        self
    }
}

/// An input error raised during a parse call.
///
/// Parsing stops at the first such error; no partial result is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Parse error: {}", render_default(.kind, .placeholders))]
pub struct ParseError {
    /// What went wrong.
    pub kind: ErrorKind,
    /// Values for the message template.
    pub placeholders: Placeholders,
}

impl ParseError {
    pub(crate) fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            placeholders: Placeholders::default(),
        }
    }

    pub(crate) fn with(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.placeholders.insert(name, value.into());
        self
    }

    /// The value of one placeholder, if supplied.
    pub fn placeholder(&self, name: &str) -> Option<&str> {
        self.placeholders.get(name).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_round_trip() {
        for kind in ErrorKind::ALL {
            assert_eq!(ErrorKind::from_key(kind.key()), Some(*kind));
        }

        assert_eq!(ErrorKind::from_key("nonsense"), None);
    }

    #[test]
    fn config_partition() {
        assert!(ErrorKind::NoShortOrLong.is_config());
        assert!(ErrorKind::RequiredAfterOptional.is_config());
        assert!(ErrorKind::ConflictDefArgNotFound.is_config());
        assert!(!ErrorKind::UnknownLong.is_config());
        assert!(!ErrorKind::ConflictIsProvided.is_config());
    }

    #[test]
    fn display() {
        let error = ParseError::new(ErrorKind::UnknownLong).with("arg_name", "colour");
        assert_eq!(error.to_string(), "Parse error: Unknown argument '--colour'");
        assert_eq!(error.placeholder("arg_name"), Some("colour"));

        let error = ConfigError::new(ErrorKind::NoShortOrLong);
        assert_eq!(
            error.to_string(),
            "Config error: At least one of 'short' or 'long' must be provided"
        );
    }
}
