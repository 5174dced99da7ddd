use std::collections::{BTreeMap, HashMap};

use crate::parser::ErrorKind;

#[cfg(feature = "tracing_debug")]
use tracing::debug;

/// The template table used to render errors for the user.
///
/// Templates reference placeholders by name, for example `"Unknown argument '--{arg_name}'"`.
/// Placeholders that a template references but an error does not supply are left as-is.
///
/// ### Example
/// ```
/// # use declarg_engine as declarg;
/// use declarg::{ErrorKind, Messages};
/// use std::collections::BTreeMap;
///
/// let messages = Messages::default().with(ErrorKind::UnknownLong, "no such flag: {arg_name}");
/// let placeholders = BTreeMap::from([("arg_name", "colour".to_string())]);
///
/// assert_eq!(messages.render(ErrorKind::UnknownLong, &placeholders), "no such flag: colour");
/// ```
#[derive(Debug, Clone)]
pub struct Messages {
    templates: HashMap<ErrorKind, String>,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            templates: ErrorKind::ALL
                .iter()
                .map(|kind| (*kind, default_template(*kind).to_string()))
                .collect(),
        }
    }
}

impl Messages {
    /// Override the template for one error kind.
    pub fn with(mut self, kind: ErrorKind, template: impl Into<String>) -> Self {
        self.templates.insert(kind, template.into());
        self
    }

    /// Override templates by their error key (ex: `"unknown_long"`).
    /// Keys that do not name an [`ErrorKind`] are ignored.
    pub fn with_keys<K, V>(mut self, overrides: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: AsRef<str>,
        V: Into<String>,
    {
        for (key, template) in overrides {
            match ErrorKind::from_key(key.as_ref()) {
                Some(kind) => {
                    self.templates.insert(kind, template.into());
                }
                None => {
                    #[cfg(feature = "tracing_debug")]
                    debug!("Ignoring template for unknown error key '{}'.", key.as_ref());
                }
            }
        }

        self
    }

    /// The template currently configured for `kind`.
    pub fn template(&self, kind: ErrorKind) -> &str {
        self.templates
            .get(&kind)
            .map(String::as_str)
            .unwrap_or_else(|| default_template(kind))
    }

    /// Render the template for `kind`, substituting the placeholders.
    pub fn render(&self, kind: ErrorKind, placeholders: &BTreeMap<&'static str, String>) -> String {
        interpolate(self.template(kind), placeholders)
    }
}

fn interpolate(template: &str, placeholders: &BTreeMap<&'static str, String>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];

        match after.find('}') {
            Some(close) => match placeholders.get(&after[..close]) {
                Some(value) => {
                    out.push_str(value);
                    rest = &after[close + 1..];
                }
                None => {
                    out.push('{');
                    rest = after;
                }
            },
            None => {
                out.push_str(&rest[open..]);
                rest = "";
            }
        }
    }

    out.push_str(rest);
    out
}

pub(crate) fn render_default(kind: &ErrorKind, placeholders: &BTreeMap<&'static str, String>) -> String {
    interpolate(default_template(*kind), placeholders)
}

fn default_template(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::NoShortOrLong => "At least one of 'short' or 'long' must be provided",
        ErrorKind::ShortNotOneChar => "Short name '{arg_name}' must be a single visible character other than '-' or '='",
        ErrorKind::LongLessThanTwoChars => "Long name '{arg_name}' must be at least 2 characters",
        ErrorKind::InvalidLong => "Long name '{arg_name}' must not start with '-' or contain '=' or whitespace",
        ErrorKind::DuplicateOption => "Option '{arg_name}' is already defined",
        ErrorKind::DuplicatePositional => "Positional argument '{arg_name}' is already defined",
        ErrorKind::DuplicateSubcommand => "Sub-command '{arg_name}' is already defined",
        ErrorKind::OptionalDefaultTypeMismatch => "Default of '{arg_name}' must be a {type_name}",
        ErrorKind::PositionalDefaultTypeMismatch => "Type of default value for '{arg_name}' should be {type_name}",
        ErrorKind::RequiredAfterOptional => "Required positional argument '{arg_name}' cannot be defined after an optional one. All required arguments must come first.",
        ErrorKind::ChoicesTypeMismatch => "Items in choices of '{arg_name}' must be of type {type_name}",
        ErrorKind::ChoicesDefaultTypeMismatch => "Default value of '{arg_name}' must be in choices",
        ErrorKind::DefaultFailedValidation => "Default value of '{arg_name}' must pass the validation",
        ErrorKind::RequireDefArgNotFound => "Argument '{arg_name}' not found",
        ErrorKind::ConflictDefArgNotFound => "Argument '{arg_name}' not found",
        ErrorKind::UnknownLong => "Unknown argument '--{arg_name}'",
        ErrorKind::MissingValueLong => "Missing value for argument '--{arg_name}'",
        ErrorKind::UnexpectedValueLong => "Argument '--{arg_name}' does not take a value",
        ErrorKind::UnknownSingleShort => "Unknown argument '-{arg_name}'",
        ErrorKind::UnknownShortInCluster => "Unknown argument '-{arg_name}' in '-{cluster}'",
        ErrorKind::ShortClusterNoBool => "Option '-{arg_name}' requires an argument and can only be the last option in '-{cluster}'.",
        ErrorKind::ShortWithEqualSign => "Short option '{option}' does not support '=' syntax. Use space-separated values.",
        ErrorKind::MissingValueShort => "Missing value for argument '-{arg_name}'",
        ErrorKind::ValueTypeMismatch => "Value should be a {type_name} for argument '{arg_name}'.",
        ErrorKind::ListItemTypeMismatch => "Value '{value}' at index {index} of '{arg_name}' should be of type {type_name}",
        ErrorKind::ValueNotInChoicesShort => "Value for '-{arg_name}' must be in '{arg_choices}'",
        ErrorKind::ValueNotInChoicesLong => "Value for '--{arg_name}' must be in '{arg_choices}'",
        ErrorKind::ValidationFailedShort => "Validation failed for '-{arg_name}' ({value})",
        ErrorKind::ValidationFailedLong => "Validation failed for '--{arg_name}' ({value})",
        ErrorKind::ValidationFailedShortMessage => "Validation failed for '-{arg_name}' ({value}): {err}",
        ErrorKind::ValidationFailedLongMessage => "Validation failed for '--{arg_name}' ({value}): {err}",
        ErrorKind::UnknownPositional => "Unknown argument '{arg_name}'",
        ErrorKind::UnknownSubcommand => "Unknown argument or sub-command '{arg_name}'",
        ErrorKind::PositionalTypeMismatch => "Type mismatch for '{arg_name}' (expected {type_name})",
        ErrorKind::MissingPositional => "Missing required arguments: {arg_names}",
        ErrorKind::UnknownInConfig => "Unknown argument '{arg_name}' in file '{file}'",
        ErrorKind::RequireNotProvided => "Missing required argument(s) for '{arg}': {missing_args}",
        ErrorKind::ConflictIsProvided => "Argument '{arg}' cannot be used with: {conflict_args}",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("plain", "plain")]
    #[case("{a}", "1")]
    #[case("x{a}y{b}z", "x1y2z")]
    #[case("{missing}", "{missing}")]
    #[case("{a}{missing}{b}", "1{missing}2")]
    #[case("open {", "open {")]
    #[case("{{a}}", "{1}")]
    fn interpolate_placeholders(#[case] template: &str, #[case] expected: &str) {
        let placeholders = BTreeMap::from([("a", "1".to_string()), ("b", "2".to_string())]);
        assert_eq!(interpolate(template, &placeholders), expected);
    }

    #[test]
    fn every_kind_has_a_template() {
        let messages = Messages::default();

        for kind in ErrorKind::ALL {
            assert!(!messages.template(*kind).is_empty(), "{kind:?}");
        }
    }

    #[test]
    fn override_by_kind() {
        let messages = Messages::default().with(ErrorKind::UnknownLong, "nope: {arg_name}");
        let placeholders = BTreeMap::from([("arg_name", "abc".to_string())]);
        assert_eq!(
            messages.render(ErrorKind::UnknownLong, &placeholders),
            "nope: abc"
        );
        assert_eq!(
            messages.render(ErrorKind::MissingValueLong, &placeholders),
            "Missing value for argument '--abc'"
        );
    }

    #[test]
    fn override_by_key() {
        let messages = Messages::default().with_keys([
            ("unknown_positional", "what is {arg_name}?"),
            ("short_not_one_char", "bad short {arg_name}"),
            ("not_a_kind", "ignored"),
        ]);
        let placeholders = BTreeMap::from([("arg_name", "x".to_string())]);
        assert_eq!(
            messages.render(ErrorKind::UnknownPositional, &placeholders),
            "what is x?"
        );
        assert_eq!(
            messages.render(ErrorKind::ShortNotOneChar, &placeholders),
            "bad short x"
        );
    }
}
