use crate::api::{Config, OptionSpec, PositionalSpec};
use crate::constant::*;
use crate::model::{Kind, Value};
use crate::parser::{
    items, validate, Action, ConfigError, ErrorKind, ParseError, ParsedResult, Parser, Rejection,
};

#[cfg(feature = "tracing_debug")]
use tracing::debug;

#[derive(Debug, Clone)]
pub(crate) struct SubCommand {
    pub(crate) name: String,
    pub(crate) registry: Registry,
}

/// The declarations of one command: its options, positionals, and sub-commands.
///
/// Every declaration is checked immediately; a bad declaration fails with a [`ConfigError`] and leaves the registry unchanged.
/// Once declared, a registry may be parsed any number of times.
///
/// ### Example
/// ```
/// # use declarg_engine as declarg;
/// use declarg::{OptionSpec, PositionalSpec, Registry, ScalarKind};
///
/// let mut registry = Registry::new();
/// registry
///     .declare_option(OptionSpec::boolean().short('v').long("verbose"))
///     .unwrap()
///     .declare_positional(PositionalSpec::required("input", ScalarKind::Str))
///     .unwrap();
/// registry
///     .declare_subcommand("resize")
///     .unwrap()
///     .declare_option(OptionSpec::int().long("width"))
///     .unwrap();
///
/// let result = registry
///     .parse_tokens(&["-v", "in.png", "resize", "--width", "100"])
///     .unwrap();
/// assert_eq!(result.get_bool("verbose"), Some(true));
/// assert_eq!(result.sub_cmd(), Some("resize"));
/// assert_eq!(result.subcommand("resize").unwrap().get_int("width"), Some(100));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Registry {
    about: Option<String>,
    options: Vec<OptionSpec>,
    positionals: Vec<PositionalSpec>,
    sub_commands: Vec<SubCommand>,
}

impl Registry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Document the command; shown in the help message (and in the parent's sub-command listing).
    pub fn about(&mut self, description: impl Into<String>) -> &mut Self {
        self.about.replace(description.into());
        self
    }

    /// Declare a named option.
    ///
    /// Fails when the aliases are malformed or taken, when the default or choices do not match the kind,
    /// when the default is not among the choices or fails the validator,
    /// or when a `requires`/`conflicts` reference names an option not yet declared.
    pub fn declare_option(&mut self, spec: OptionSpec) -> Result<&mut Self, ConfigError> {
        let spec = self.check_option(spec)?;
        #[cfg(feature = "tracing_debug")]
        debug!("Declared option {spec:?}.");
        self.options.push(spec);
        Ok(self)
    }

    /// Declare a positional, filled after those declared before it.
    pub fn declare_positional(&mut self, spec: PositionalSpec) -> Result<&mut Self, ConfigError> {
        let spec = self.check_positional(spec)?;
        #[cfg(feature = "tracing_debug")]
        debug!("Declared positional {spec:?}.");
        self.positionals.push(spec);
        Ok(self)
    }

    /// Declare a sub-command, returning its (empty) registry for further declarations.
    pub fn declare_subcommand(&mut self, name: impl Into<String>) -> Result<&mut Registry, ConfigError> {
        let name = name.into();

        // The name keys the nested result, alongside the option and positional names.
        if name == SUB_CMD_KEY || self.is_taken(&name) {
            return Err(ConfigError::new(ErrorKind::DuplicateSubcommand).with("arg_name", name));
        }

        #[cfg(feature = "tracing_debug")]
        debug!("Declared sub-command '{name}'.");
        let index = self.sub_commands.len();
        self.sub_commands.push(SubCommand {
            name,
            registry: Registry::new(),
        });
        Ok(&mut self.sub_commands[index].registry)
    }

    /// Require `others` (by any alias) whenever `option` is supplied explicitly.
    pub fn requires<S: AsRef<str>>(
        &mut self,
        option: &str,
        others: impl IntoIterator<Item = S>,
    ) -> Result<&mut Self, ConfigError> {
        let index = self.lookup(option, ErrorKind::RequireDefArgNotFound)?;
        let others = self.resolve_all(others, ErrorKind::RequireDefArgNotFound)?;
        extend_unique(&mut self.options[index].requires, others);
        Ok(self)
    }

    /// Forbid `others` (by any alias) from being supplied explicitly together with `option`.
    pub fn conflicts<S: AsRef<str>>(
        &mut self,
        option: &str,
        others: impl IntoIterator<Item = S>,
    ) -> Result<&mut Self, ConfigError> {
        let index = self.lookup(option, ErrorKind::ConflictDefArgNotFound)?;
        let others = self.resolve_all(others, ErrorKind::ConflictDefArgNotFound)?;
        extend_unique(&mut self.options[index].conflicts, others);
        Ok(self)
    }

    /// Parse `tokens` (which exclude the program name).
    ///
    /// There is no built-in help at this level; see [`CommandLineParser`](crate::CommandLineParser).
    pub fn parse_tokens(&self, tokens: &[&str]) -> Result<ParsedResult, ParseError> {
        self.complete(Parser::new(self, false).consume(tokens, None)?)
    }

    /// Parse `tokens`, first applying the values of `config` over the defaults.
    /// Explicit tokens still take precedence over the config.
    pub fn parse_tokens_with_config(
        &self,
        tokens: &[&str],
        config: &Config,
    ) -> Result<ParsedResult, ParseError> {
        self.complete(Parser::new(self, false).consume(tokens, Some(config))?)
    }

    fn complete(&self, action: Action) -> Result<ParsedResult, ParseError> {
        match action {
            Action::Complete(result) => Ok(result),
            Action::PrintHelp(_) => unreachable!("internal error - help is disabled"),
        }
    }

    pub(crate) fn description(&self) -> Option<&str> {
        self.about.as_deref()
    }

    pub(crate) fn options(&self) -> &[OptionSpec] {
        &self.options
    }

    pub(crate) fn positionals(&self) -> &[PositionalSpec] {
        &self.positionals
    }

    pub(crate) fn has_sub_commands(&self) -> bool {
        !self.sub_commands.is_empty()
    }

    pub(crate) fn sub_commands(&self) -> impl Iterator<Item = (&str, &Registry)> {
        self.sub_commands
            .iter()
            .map(|sub_command| (sub_command.name.as_str(), &sub_command.registry))
    }

    pub(crate) fn sub_command(&self, name: &str) -> Option<&Registry> {
        self.sub_commands
            .iter()
            .find(|sub_command| sub_command.name == name)
            .map(|sub_command| &sub_command.registry)
    }

    /// The index of the option known by `alias`: its canonical name, short, long, or long with `_` for `-`.
    pub(crate) fn position(&self, alias: &str) -> Option<usize> {
        self.options.iter().position(|spec| {
            spec.canonical() == alias
                || spec.short.map_or(false, |short| short.to_string() == alias)
                || spec.long.as_ref().map_or(false, |long| {
                    long == alias || long.replace('-', "_") == alias
                })
        })
    }

    pub(crate) fn positional_position(&self, name: &str) -> Option<usize> {
        self.positionals.iter().position(|spec| spec.name == name)
    }

    fn lookup(&self, alias: &str, kind: ErrorKind) -> Result<usize, ConfigError> {
        self.position(alias)
            .ok_or_else(|| ConfigError::new(kind).with("arg_name", alias))
    }

    fn resolve_all<S: AsRef<str>>(
        &self,
        aliases: impl IntoIterator<Item = S>,
        kind: ErrorKind,
    ) -> Result<Vec<String>, ConfigError> {
        aliases
            .into_iter()
            .map(|alias| {
                self.lookup(alias.as_ref(), kind)
                    .map(|index| self.options[index].canonical())
            })
            .collect()
    }

    fn is_taken(&self, name: &str) -> bool {
        self.position(name).is_some()
            || self.positional_position(name).is_some()
            || self.sub_command(name).is_some()
            || self.options.iter().any(|spec| {
                spec.negatable()
                    && spec
                        .long
                        .as_ref()
                        .map_or(false, |long| format!("{NEGATION_PREFIX}{long}") == name)
            })
    }

    fn check_option(&self, mut spec: OptionSpec) -> Result<OptionSpec, ConfigError> {
        if spec.short.is_none() && spec.long.is_none() {
            return Err(ConfigError::new(ErrorKind::NoShortOrLong));
        }

        if let Some(short) = spec.short {
            if short == '-' || short == '=' || short.is_whitespace() || short.is_control() {
                return Err(ConfigError::new(ErrorKind::ShortNotOneChar).with("arg_name", short));
            }

            if self.is_taken(&short.to_string()) {
                return Err(
                    ConfigError::new(ErrorKind::DuplicateOption).with("arg_name", format!("-{short}"))
                );
            }
        }

        if let Some(long) = &spec.long {
            if long.chars().count() < 2 {
                return Err(ConfigError::new(ErrorKind::LongLessThanTwoChars).with("arg_name", long));
            }

            if long.starts_with('-') || long.contains('=') || long.chars().any(char::is_whitespace)
            {
                return Err(ConfigError::new(ErrorKind::InvalidLong).with("arg_name", long));
            }

            if self.is_taken(long) || self.is_taken(&long.replace('-', "_")) {
                return Err(
                    ConfigError::new(ErrorKind::DuplicateOption).with("arg_name", format!("--{long}"))
                );
            }
        }

        let name = spec.canonical();
        spec.default = match (spec.default.take(), spec.kind) {
            (None, Kind::Bool) => Some(Value::Bool(false)),
            (None, Kind::List(_)) => Some(Value::List(Vec::default())),
            (None, _) => None,
            (Some(default), kind) => {
                let default = default.coerce(kind);

                if !default.is_kind(kind) {
                    return Err(ConfigError::new(ErrorKind::OptionalDefaultTypeMismatch)
                        .with("arg_name", name)
                        .with("type_name", kind.to_string()));
                }

                Some(default)
            }
        };

        if spec.negatable() && self.is_taken(&format!("{NEGATION_PREFIX}{}", name)) {
            return Err(ConfigError::new(ErrorKind::DuplicateOption)
                .with("arg_name", format!("--{NEGATION_PREFIX}{name}")));
        }

        if let Some(choices) = spec.choices.take() {
            let item_kind = spec.kind.item_kind().ok_or_else(|| {
                ConfigError::new(ErrorKind::ChoicesTypeMismatch)
                    .with("arg_name", &name)
                    .with("type_name", spec.kind.to_string())
            })?;
            let choices: Vec<Value> = choices
                .into_iter()
                .map(|choice| choice.coerce_scalar(item_kind))
                .collect();

            if !choices.iter().all(|choice| choice.is_scalar_kind(item_kind)) {
                return Err(ConfigError::new(ErrorKind::ChoicesTypeMismatch)
                    .with("arg_name", name)
                    .with("type_name", item_kind.to_string()));
            }

            spec.choices.replace(choices);
        }

        if let Some(default) = &spec.default {
            for item in items(default) {
                match validate(&spec, item) {
                    Ok(()) => {}
                    Err(Rejection::NotInChoices) => {
                        return Err(ConfigError::new(ErrorKind::ChoicesDefaultTypeMismatch)
                            .with("arg_name", name));
                    }
                    Err(Rejection::Invalid(_)) => {
                        return Err(ConfigError::new(ErrorKind::DefaultFailedValidation)
                            .with("arg_name", name));
                    }
                }
            }
        }

        spec.requires = self.resolve_all(&spec.requires, ErrorKind::RequireDefArgNotFound)?;
        spec.conflicts = self.resolve_all(&spec.conflicts, ErrorKind::ConflictDefArgNotFound)?;
        Ok(spec)
    }

    fn check_positional(&self, mut spec: PositionalSpec) -> Result<PositionalSpec, ConfigError> {
        if self.is_taken(&spec.name) {
            return Err(ConfigError::new(ErrorKind::DuplicatePositional).with("arg_name", spec.name));
        }

        if let Some(default) = spec.default.take() {
            let default = default.coerce_scalar(spec.kind);

            if !default.is_scalar_kind(spec.kind) {
                return Err(ConfigError::new(ErrorKind::PositionalDefaultTypeMismatch)
                    .with("arg_name", spec.name)
                    .with("type_name", spec.kind.to_string()));
            }

            spec.default.replace(default);
        }

        if spec.required && self.positionals.iter().any(|other| !other.required) {
            return Err(ConfigError::new(ErrorKind::RequiredAfterOptional).with("arg_name", spec.name));
        }

        Ok(spec)
    }
}

fn extend_unique(names: &mut Vec<String>, others: Vec<String>) {
    for other in others {
        if !names.contains(&other) {
            names.push(other);
        }
    }
}
