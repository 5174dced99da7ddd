use serde::Serialize;

/// The type of a single, non-collection value.
///
/// Used for positional parameters and for the items of a [`Kind::List`] option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    /// A signed 64-bit integer.
    Int,
    /// A 64-bit float.
    Float,
    /// A string, taken verbatim from the token.
    Str,
}

/// The declared kind of a named option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// `--NAME VALUE` converting to [`Value::Int`].
    Int,
    /// `--NAME VALUE` converting to [`Value::Float`].
    Float,
    /// `--NAME VALUE` taken as [`Value::Str`].
    Str,
    /// `--NAME` flag; presence alone is the value.
    Bool,
    /// `--NAME VALUE`, repeatable; each repetition appends one item of the inner kind.
    List(ScalarKind),
}

impl Kind {
    pub(crate) fn takes_value(&self) -> bool {
        !matches!(self, Kind::Bool)
    }

    /// The kind of each individual value: the list item kind, or the kind itself for scalars.
    pub(crate) fn item_kind(&self) -> Option<ScalarKind> {
        match self {
            Kind::Int => Some(ScalarKind::Int),
            Kind::Float => Some(ScalarKind::Float),
            Kind::Str => Some(ScalarKind::Str),
            Kind::Bool => None,
            Kind::List(item) => Some(*item),
        }
    }
}

impl From<ScalarKind> for Kind {
    fn from(value: ScalarKind) -> Self {
        match value {
            ScalarKind::Int => Kind::Int,
            ScalarKind::Float => Kind::Float,
            ScalarKind::Str => Kind::Str,
        }
    }
}

impl std::fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScalarKind::Int => write!(f, "int"),
            ScalarKind::Float => write!(f, "float"),
            ScalarKind::Str => write!(f, "str"),
        }
    }
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Kind::Int => write!(f, "int"),
            Kind::Float => write!(f, "float"),
            Kind::Str => write!(f, "str"),
            Kind::Bool => write!(f, "bool"),
            Kind::List(item) => write!(f, "list[{item}]"),
        }
    }
}

/// A typed value, as declared (defaults, choices) or as parsed from the command line.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// See [`Kind::Bool`].
    Bool(bool),
    /// See [`Kind::Int`].
    Int(i64),
    /// See [`Kind::Float`].
    Float(f64),
    /// See [`Kind::Str`].
    Str(String),
    /// See [`Kind::List`].
    List(Vec<Value>),
}

impl Value {
    /// The integer, if this is a [`Value::Int`].
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(value) => Some(*value),
            _ => None,
        }
    }

    /// The float, if this is a [`Value::Float`].
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(value) => Some(*value),
            _ => None,
        }
    }

    /// The string slice, if this is a [`Value::Str`].
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(value) => Some(value),
            _ => None,
        }
    }

    /// The boolean, if this is a [`Value::Bool`].
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(value) => Some(*value),
            _ => None,
        }
    }

    /// The items, if this is a [`Value::List`].
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Whether this value is an instance of the scalar kind.
    pub fn is_scalar_kind(&self, kind: ScalarKind) -> bool {
        matches!(
            (self, kind),
            (Value::Int(_), ScalarKind::Int)
                | (Value::Float(_), ScalarKind::Float)
                | (Value::Str(_), ScalarKind::Str)
        )
    }

    /// Whether this value is an instance of the kind (lists check every item).
    pub fn is_kind(&self, kind: Kind) -> bool {
        match (self, kind) {
            (Value::Bool(_), Kind::Bool) => true,
            (Value::List(items), Kind::List(item)) => {
                items.iter().all(|value| value.is_scalar_kind(item))
            }
            (value, Kind::Int) => value.is_scalar_kind(ScalarKind::Int),
            (value, Kind::Float) => value.is_scalar_kind(ScalarKind::Float),
            (value, Kind::Str) => value.is_scalar_kind(ScalarKind::Str),
            _ => false,
        }
    }

    // Integers are accepted wherever a float is declared.
    pub(crate) fn coerce_scalar(self, kind: ScalarKind) -> Self {
        match (self, kind) {
            (Value::Int(value), ScalarKind::Float) => Value::Float(value as f64),
            (value, _) => value,
        }
    }

    pub(crate) fn coerce(self, kind: Kind) -> Self {
        match (self, kind) {
            (Value::List(items), Kind::List(item)) => Value::List(
                items
                    .into_iter()
                    .map(|value| value.coerce_scalar(item))
                    .collect(),
            ),
            (value, Kind::Float) => value.coerce_scalar(ScalarKind::Float),
            (value, _) => value,
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Bool(value) => write!(f, "{value}"),
            Value::Int(value) => write!(f, "{value}"),
            Value::Float(value) => write!(f, "{value:?}"),
            Value::Str(value) => write!(f, "{value}"),
            Value::List(items) => write!(
                f,
                "[{}]",
                items
                    .iter()
                    .map(|item| item.to_string())
                    .collect::<Vec<String>>()
                    .join(", ")
            ),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(value as i64)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(value: Vec<T>) -> Self {
        Value::List(value.into_iter().map(Into::into).collect())
    }
}

/// Where a parsed value came from.
///
/// Precedence, lowest to highest: `Default`, `Config`, `Explicit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Provenance {
    /// The declared default (or no value at all).
    Default,
    /// Loaded from an external [`Config`](crate::Config).
    Config,
    /// Supplied by a command line token.
    Explicit,
}
