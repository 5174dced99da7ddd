use std::sync::Arc;

use crate::matcher::Specifier;
use crate::model::{Kind, ScalarKind, Value};

/// The outcome of a validator: `Err(None)` rejects silently, `Err(Some(message))` rejects with a reason.
pub type Verdict = Result<(), Option<String>>;

pub(crate) type Validator = Arc<dyn Fn(&Value) -> Verdict + Send + Sync>;

/// A named option declaration.
///
/// Start from a kind constructor and chain the remaining attributes.
/// Nothing is checked until the option is declared on a [`Registry`](crate::Registry).
///
/// ### Example
/// ```
/// # use declarg_engine as declarg;
/// use declarg::{OptionSpec, Registry, ScalarKind};
///
/// let mut registry = Registry::new();
/// registry
///     .declare_option(OptionSpec::int().short('n').long("num").default(5))
///     .unwrap()
///     .declare_option(OptionSpec::list(ScalarKind::Str).short('f').long("files"))
///     .unwrap();
///
/// let result = registry.parse_tokens(&["-n", "10", "-f", "a", "--files", "b"]).unwrap();
/// assert_eq!(result.get_int("num"), Some(10));
/// assert_eq!(result.get_list("files").unwrap().len(), 2);
/// ```
#[derive(Clone)]
pub struct OptionSpec {
    pub(crate) kind: Kind,
    pub(crate) short: Option<char>,
    pub(crate) long: Option<String>,
    pub(crate) default: Option<Value>,
    pub(crate) choices: Option<Vec<Value>>,
    pub(crate) validator: Option<Validator>,
    pub(crate) requires: Vec<String>,
    pub(crate) conflicts: Vec<String>,
    pub(crate) description: Option<String>,
}

impl std::fmt::Debug for OptionSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let short = match &self.short {
            Some(s) => format!("-{s}"),
            None => "".to_string(),
        };
        let long = match &self.long {
            Some(l) => format!("--{l}"),
            None => "".to_string(),
        };

        write!(
            f,
            "Opt[{kind}, {short} {long}, default={default:?}, choices={choices:?}, validator={validator}]",
            kind = self.kind,
            default = self.default,
            choices = self.choices,
            validator = self.validator.is_some(),
        )
    }
}

impl OptionSpec {
    /// Declare an option of any kind.
    pub fn new(kind: Kind) -> Self {
        Self {
            kind,
            short: None,
            long: None,
            default: None,
            choices: None,
            validator: None,
            requires: Vec::default(),
            conflicts: Vec::default(),
            description: None,
        }
    }

    /// An integer option.
    pub fn int() -> Self {
        Self::new(Kind::Int)
    }

    /// A float option.
    pub fn float() -> Self {
        Self::new(Kind::Float)
    }

    /// A string option.
    pub fn string() -> Self {
        Self::new(Kind::Str)
    }

    /// A boolean flag (defaults to `false` unless given a default).
    pub fn boolean() -> Self {
        Self::new(Kind::Bool)
    }

    /// A repeatable option collecting items of `item` kind (defaults to an empty list).
    pub fn list(item: ScalarKind) -> Self {
        Self::new(Kind::List(item))
    }

    /// The single character short alias, used as `-S`.
    pub fn short(mut self, short: char) -> Self {
        self.short.replace(short);
        self
    }

    /// The long alias (at least 2 characters), used as `--LONG`.
    pub fn long(mut self, long: impl Into<String>) -> Self {
        self.long.replace(long.into());
        self
    }

    /// The default value.
    /// Must match the declared kind; for a list, pass the whole list.
    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default.replace(value.into());
        self
    }

    /// Restrict the accepted values (for a list, the accepted items).
    pub fn choices<V: Into<Value>>(mut self, choices: impl IntoIterator<Item = V>) -> Self {
        self.choices
            .replace(choices.into_iter().map(Into::into).collect());
        self
    }

    /// Accept only values for which `predicate` holds (for a list, applied to each item).
    pub fn validator(mut self, predicate: impl Fn(&Value) -> bool + Send + Sync + 'static) -> Self {
        self.validator.replace(Arc::new(move |value: &Value| {
            if predicate(value) {
                Ok(())
            } else {
                Err(None)
            }
        }));
        self
    }

    /// Like [`OptionSpec::validator`], but the rejection carries a reason for the user.
    pub fn validator_with_message(
        mut self,
        check: impl Fn(&Value) -> Result<(), String> + Send + Sync + 'static,
    ) -> Self {
        self.validator
            .replace(Arc::new(move |value: &Value| check(value).map_err(Some)));
        self
    }

    /// Other options (by any alias) that must also be present whenever this one is supplied.
    /// Each must already be declared on the registry.
    pub fn requires<S: Into<String>>(mut self, others: impl IntoIterator<Item = S>) -> Self {
        self.requires.extend(others.into_iter().map(Into::into));
        self
    }

    /// Other options (by any alias) that may not be supplied together with this one.
    /// Each must already be declared on the registry.
    pub fn conflicts<S: Into<String>>(mut self, others: impl IntoIterator<Item = S>) -> Self {
        self.conflicts.extend(others.into_iter().map(Into::into));
        self
    }

    /// Document the option for the help message.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description.replace(description.into());
        self
    }

    /// The key of this option in a [`ParsedResult`](crate::ParsedResult): the long alias if present, else the short.
    pub fn canonical(&self) -> String {
        match (&self.long, &self.short) {
            (Some(long), _) => long.clone(),
            (None, Some(short)) => short.to_string(),
            (None, None) => String::default(),
        }
    }

    /// The declared kind.
    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// Whether `--no-LONG` sets this option to `false`.
    pub(crate) fn negatable(&self) -> bool {
        self.kind == Kind::Bool
            && self.long.is_some()
            && matches!(self.default, Some(Value::Bool(true)))
    }

    /// How the option is named in messages that are not tied to a token: the long alias if present.
    pub(crate) fn specifier(&self) -> Specifier {
        match (&self.long, &self.short) {
            (Some(long), _) => Specifier::Long(long.clone()),
            (None, Some(short)) => Specifier::Short(*short),
            (None, None) => Specifier::Long(String::default()),
        }
    }
}

/// A positional parameter declaration.
///
/// Positionals are filled left to right in declaration order.
#[derive(Debug, Clone)]
pub struct PositionalSpec {
    pub(crate) name: String,
    pub(crate) kind: ScalarKind,
    pub(crate) required: bool,
    pub(crate) default: Option<Value>,
    pub(crate) description: Option<String>,
}

impl PositionalSpec {
    /// A positional that must be supplied.
    pub fn required(name: impl Into<String>, kind: ScalarKind) -> Self {
        Self {
            name: name.into(),
            kind,
            required: true,
            default: None,
            description: None,
        }
    }

    /// A positional that may be omitted.
    pub fn optional(name: impl Into<String>, kind: ScalarKind) -> Self {
        Self {
            required: false,
            ..Self::required(name, kind)
        }
    }

    /// The value used when the positional is not supplied.
    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default.replace(value.into());
        self
    }

    /// Document the positional for the help message.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description.replace(description.into());
        self
    }

    /// The name, which is also its key in a [`ParsedResult`](crate::ParsedResult).
    pub fn name(&self) -> &str {
        &self.name
    }
}
