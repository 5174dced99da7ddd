use std::collections::HashSet;

use crate::api::{Config, OptionSpec, Registry};
use crate::constant::SUB_CMD_KEY;
use crate::matcher::{ArgumentConfig, Match, MatchError, OptionConfig, Specifier, TokenMatcher};
use crate::model::{Kind, Provenance, Value};
use crate::parser::convert::{convert, convert_json, items, validate, Rejection};
use crate::parser::resolve::check_dependencies;
use crate::parser::result::{Entry, ParsedResult};
use crate::parser::{ErrorKind, ParseError};

#[cfg(feature = "tracing_debug")]
use tracing::debug;

impl From<MatchError> for ParseError {
    fn from(error: MatchError) -> Self {
        match error {
            MatchError::UnknownLong(long) => {
                ParseError::new(ErrorKind::UnknownLong).with("arg_name", long)
            }
            MatchError::MissingValueLong(long) => {
                ParseError::new(ErrorKind::MissingValueLong).with("arg_name", long)
            }
            MatchError::UnexpectedValueLong(long) => {
                ParseError::new(ErrorKind::UnexpectedValueLong).with("arg_name", long)
            }
            MatchError::UnknownShort(short) => {
                ParseError::new(ErrorKind::UnknownSingleShort).with("arg_name", short)
            }
            MatchError::UnknownShortInCluster { short, cluster } => {
                ParseError::new(ErrorKind::UnknownShortInCluster)
                    .with("arg_name", short)
                    .with("cluster", cluster)
            }
            MatchError::ShortClusterNoBool { short, cluster } => {
                ParseError::new(ErrorKind::ShortClusterNoBool)
                    .with("arg_name", short)
                    .with("cluster", cluster)
            }
            MatchError::ShortWithEquals(option) => {
                ParseError::new(ErrorKind::ShortWithEqualSign).with("option", option)
            }
            MatchError::MissingValueShort(short) => {
                ParseError::new(ErrorKind::MissingValueShort).with("arg_name", short)
            }
            MatchError::ArgumentsExhausted(token) => {
                ParseError::new(ErrorKind::UnknownPositional).with("arg_name", token)
            }
            MatchError::UnknownSubCommand(token) => {
                ParseError::new(ErrorKind::UnknownSubcommand).with("arg_name", token)
            }
        }
    }
}

/// What a parse call resolved to.
#[derive(Debug)]
pub(crate) enum Action {
    Complete(ParsedResult),
    /// Help was requested; the path of sub-command names (outermost first) to the command it was requested for.
    PrintHelp(Vec<String>),
}

/// Runs one parse of a registry: defaults, then config, then tokens, then the final checks.
///
/// All state lives in the call, so the registry may be parsed again.
pub(crate) struct Parser<'r> {
    registry: &'r Registry,
    help: bool,
}

impl<'r> Parser<'r> {
    pub(crate) fn new(registry: &'r Registry, help: bool) -> Self {
        Self { registry, help }
    }

    pub(crate) fn consume(
        &self,
        tokens: &[&str],
        config: Option<&Config>,
    ) -> Result<Action, ParseError> {
        let mut state = ParseState::new(self.registry);

        if let Some(config) = config {
            state.apply_config(config)?;
        }

        let mut token_matcher = self.token_matcher(&state);
        let mut dispatch: Option<(String, usize)> = None;

        for (position, token) in tokens.iter().enumerate() {
            token_matcher.feed(token)?;
            let matches: Vec<Match> = token_matcher.drain().collect();

            for found in matches {
                match found {
                    Match::Help => {
                        #[cfg(feature = "tracing_debug")]
                        debug!("Help requested at token {position}.");
                        return Ok(Action::PrintHelp(Vec::default()));
                    }
                    Match::Option {
                        name,
                        specifier,
                        value,
                        negated,
                    } => state.apply_option(&name, &specifier, value, negated)?,
                    Match::Argument { index, value } => state.apply_argument(index, &value)?,
                    Match::SubCommand { name } => {
                        dispatch.replace((name, position + 1));
                    }
                }
            }

            if dispatch.is_some() {
                break;
            }
        }

        if dispatch.is_none() {
            token_matcher.close()?;
        }

        state.check_positionals()?;
        check_dependencies(self.registry, &state.provenances())?;
        let mut result = state.finish();

        if let Some((name, start)) = dispatch {
            #[cfg(feature = "tracing_debug")]
            debug!("Dispatching {:?} to sub-command '{name}'.", &tokens[start..]);
            let sub_registry = self
                .registry
                .sub_command(&name)
                .ok_or_else(|| ParseError::new(ErrorKind::UnknownSubcommand).with("arg_name", &name))?;
            let nested_config = config.and_then(|config| config.nested(&name));

            match Parser::new(sub_registry, self.help).consume(&tokens[start..], nested_config.as_ref())? {
                Action::Complete(nested) => result.embed(name, nested),
                Action::PrintHelp(mut path) => {
                    path.insert(0, name);
                    return Ok(Action::PrintHelp(path));
                }
            }
        }

        Ok(Action::Complete(result))
    }

    fn token_matcher(&self, state: &ParseState) -> TokenMatcher {
        let options = self
            .registry
            .options()
            .iter()
            .map(|spec| {
                OptionConfig::new(
                    spec.canonical(),
                    spec.short,
                    spec.long.clone(),
                    spec.kind.takes_value(),
                    spec.negatable(),
                )
            })
            .collect();
        let arguments = self
            .registry
            .positionals()
            .iter()
            .zip(state.positionals.iter())
            .map(|(spec, entry)| {
                ArgumentConfig::new(spec.required).preset(entry.provenance == Provenance::Config)
            })
            .collect();
        let sub_commands: HashSet<String> = self
            .registry
            .sub_commands()
            .map(|(name, _)| name.to_string())
            .collect();

        TokenMatcher::new(options, arguments, sub_commands, self.help)
    }
}

fn written(specifier: &Specifier) -> String {
    match specifier {
        Specifier::Long(long) => format!("--{long}"),
        Specifier::Short(short) => format!("-{short}"),
    }
}

fn alias(specifier: &Specifier) -> String {
    match specifier {
        Specifier::Long(long) => long.clone(),
        Specifier::Short(short) => short.to_string(),
    }
}

fn rejected(spec: &OptionSpec, specifier: &Specifier, item: &Value, rejection: Rejection) -> ParseError {
    let long = matches!(specifier, Specifier::Long(_));

    match rejection {
        Rejection::NotInChoices => {
            let kind = if long {
                ErrorKind::ValueNotInChoicesLong
            } else {
                ErrorKind::ValueNotInChoicesShort
            };
            let choices = spec
                .choices
                .iter()
                .flatten()
                .map(Value::to_string)
                .collect::<Vec<String>>()
                .join(", ");
            ParseError::new(kind)
                .with("arg_name", alias(specifier))
                .with("arg_choices", choices)
                .with("value", item.to_string())
        }
        Rejection::Invalid(message) => {
            let kind = match (long, message.is_some()) {
                (true, false) => ErrorKind::ValidationFailedLong,
                (false, false) => ErrorKind::ValidationFailedShort,
                (true, true) => ErrorKind::ValidationFailedLongMessage,
                (false, true) => ErrorKind::ValidationFailedShortMessage,
            };
            let error = ParseError::new(kind)
                .with("arg_name", alias(specifier))
                .with("value", item.to_string());

            match message {
                Some(message) => error.with("err", message),
                None => error,
            }
        }
    }
}

/// The values of one registry during one parse call.
struct ParseState<'r> {
    registry: &'r Registry,
    options: Vec<Entry>,
    positionals: Vec<Entry>,
}

impl<'r> ParseState<'r> {
    fn new(registry: &'r Registry) -> Self {
        Self {
            registry,
            options: registry
                .options()
                .iter()
                .map(|spec| Entry::declared(spec.default.clone()))
                .collect(),
            positionals: registry
                .positionals()
                .iter()
                .map(|spec| Entry::declared(spec.default.clone()))
                .collect(),
        }
    }

    fn apply_config(&mut self, config: &Config) -> Result<(), ParseError> {
        for (key, json) in config.entries() {
            if key == SUB_CMD_KEY || json.is_null() {
                continue;
            }

            if json.is_object() && self.registry.sub_command(key).is_some() {
                continue;
            }

            if let Some(index) = self.registry.position(key) {
                let spec = &self.registry.options()[index];
                let value = convert_json(json, spec.kind).map_err(|error| match error.index {
                    Some(index) => ParseError::new(ErrorKind::ListItemTypeMismatch)
                        .with("arg_name", key)
                        .with("value", error.value)
                        .with("index", index.to_string())
                        .with("type_name", error.type_name),
                    None => ParseError::new(ErrorKind::ValueTypeMismatch)
                        .with("arg_name", key)
                        .with("type_name", error.type_name),
                })?;

                let specifier = spec.specifier();
                for item in items(&value) {
                    validate(spec, item)
                        .map_err(|rejection| rejected(spec, &specifier, item, rejection))?;
                }

                #[cfg(feature = "tracing_debug")]
                debug!("Config sets '{}' to {value}.", spec.canonical());
                self.options[index] = Entry {
                    value: Some(value),
                    provenance: Provenance::Config,
                };
            } else if let Some(index) = self.registry.positional_position(key) {
                let spec = &self.registry.positionals()[index];
                let value = convert_json(json, Kind::from(spec.kind)).map_err(|_| {
                    ParseError::new(ErrorKind::PositionalTypeMismatch)
                        .with("arg_name", key)
                        .with("type_name", spec.kind.to_string())
                })?;
                self.positionals[index] = Entry {
                    value: Some(value),
                    provenance: Provenance::Config,
                };
            } else {
                return Err(ParseError::new(ErrorKind::UnknownInConfig)
                    .with("arg_name", key)
                    .with("file", config.source()));
            }
        }

        Ok(())
    }

    fn apply_option(
        &mut self,
        name: &str,
        specifier: &Specifier,
        value: Option<String>,
        negated: bool,
    ) -> Result<(), ParseError> {
        let index = self.registry.position(name).ok_or_else(|| match specifier {
            Specifier::Long(long) => ParseError::new(ErrorKind::UnknownLong).with("arg_name", long),
            Specifier::Short(short) => {
                ParseError::new(ErrorKind::UnknownSingleShort).with("arg_name", *short)
            }
        })?;
        let spec = &self.registry.options()[index];
        let entry = &mut self.options[index];

        let (item_kind, token) = match (spec.kind.item_kind(), value) {
            (None, _) => {
                entry.value.replace(Value::Bool(!negated));
                entry.provenance = Provenance::Explicit;
                return Ok(());
            }
            (Some(item_kind), Some(token)) => (item_kind, token),
            (Some(_), None) => {
                return Err(match specifier {
                    Specifier::Long(long) => {
                        ParseError::new(ErrorKind::MissingValueLong).with("arg_name", long)
                    }
                    Specifier::Short(short) => {
                        ParseError::new(ErrorKind::MissingValueShort).with("arg_name", *short)
                    }
                })
            }
        };

        match spec.kind {
            Kind::List(_) => {
                // Explicit items replace any default or config list; repetitions then accumulate.
                if entry.provenance != Provenance::Explicit {
                    entry.value.replace(Value::List(Vec::default()));
                }

                let position = entry.value.as_ref().and_then(Value::as_list).map_or(0, <[Value]>::len);
                let item = convert(&token, item_kind).map_err(|error| {
                    ParseError::new(ErrorKind::ListItemTypeMismatch)
                        .with("arg_name", written(specifier))
                        .with("value", error.token)
                        .with("index", position.to_string())
                        .with("type_name", error.type_name)
                })?;
                validate(spec, &item).map_err(|rejection| rejected(spec, specifier, &item, rejection))?;

                if let Some(Value::List(items)) = entry.value.as_mut() {
                    items.push(item);
                }
            }
            _ => {
                let value = convert(&token, item_kind).map_err(|error| {
                    ParseError::new(ErrorKind::ValueTypeMismatch)
                        .with("arg_name", written(specifier))
                        .with("value", error.token)
                        .with("type_name", error.type_name)
                })?;
                validate(spec, &value)
                    .map_err(|rejection| rejected(spec, specifier, &value, rejection))?;
                entry.value.replace(value);
            }
        }

        entry.provenance = Provenance::Explicit;
        Ok(())
    }

    fn apply_argument(&mut self, index: usize, token: &str) -> Result<(), ParseError> {
        let spec = &self.registry.positionals()[index];
        let value = convert(token, spec.kind).map_err(|error| {
            ParseError::new(ErrorKind::PositionalTypeMismatch)
                .with("arg_name", &spec.name)
                .with("value", error.token)
                .with("type_name", error.type_name)
        })?;

        self.positionals[index] = Entry {
            value: Some(value),
            provenance: Provenance::Explicit,
        };
        Ok(())
    }

    fn check_positionals(&self) -> Result<(), ParseError> {
        let missing: Vec<&str> = self
            .registry
            .positionals()
            .iter()
            .zip(self.positionals.iter())
            .filter(|(spec, entry)| spec.required && entry.provenance == Provenance::Default)
            .map(|(spec, _)| spec.name.as_str())
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ParseError::new(ErrorKind::MissingPositional).with("arg_names", missing.join(", ")))
        }
    }

    fn provenances(&self) -> Vec<Provenance> {
        self.options.iter().map(|entry| entry.provenance).collect()
    }

    fn finish(self) -> ParsedResult {
        ParsedResult::assemble(self.registry, self.options, self.positionals)
    }
}
