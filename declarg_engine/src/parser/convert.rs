use std::str::FromStr;

use crate::api::{OptionSpec, Validator, Verdict};
use crate::model::{Kind, ScalarKind, Value};

#[cfg(feature = "tracing_debug")]
use tracing::debug;

/// A raw token that does not parse as the target kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct InvalidConversion {
    pub(crate) token: String,
    pub(crate) type_name: String,
}

/// A config value that does not coerce to the declared kind.
/// `index` is set when a single list item is at fault.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct InvalidJson {
    pub(crate) index: Option<usize>,
    pub(crate) value: String,
    pub(crate) type_name: String,
}

/// Why a converted value was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Rejection {
    NotInChoices,
    Invalid(Option<String>),
}

/// Convert a raw token to the scalar kind.
/// The whole token must parse; there are no partial parses.
pub(crate) fn convert(token: &str, kind: ScalarKind) -> Result<Value, InvalidConversion> {
    let invalid = || InvalidConversion {
        token: token.to_string(),
        type_name: kind.to_string(),
    };

    match kind {
        ScalarKind::Int => i64::from_str(token).map(Value::Int).map_err(|_| invalid()),
        ScalarKind::Float => f64::from_str(token)
            .map(Value::Float)
            .map_err(|_| invalid()),
        ScalarKind::Str => Ok(Value::Str(token.to_string())),
    }
}

fn convert_json_scalar(json: &serde_json::Value, kind: ScalarKind) -> Option<Value> {
    match (json, kind) {
        (serde_json::Value::Number(number), ScalarKind::Int) => number.as_i64().map(Value::Int),
        (serde_json::Value::Number(number), ScalarKind::Float) => {
            number.as_f64().map(Value::Float)
        }
        (serde_json::Value::String(token), _) => convert(token, kind).ok(),
        _ => None,
    }
}

/// Coerce an external (config) value to the declared kind.
pub(crate) fn convert_json(json: &serde_json::Value, kind: Kind) -> Result<Value, InvalidJson> {
    let invalid = |index: Option<usize>, value: &serde_json::Value, type_name: String| InvalidJson {
        index,
        value: match value {
            serde_json::Value::String(token) => token.clone(),
            other => other.to_string(),
        },
        type_name,
    };

    match (kind, kind.item_kind()) {
        (Kind::Bool, _) => json
            .as_bool()
            .map(Value::Bool)
            .ok_or_else(|| invalid(None, json, kind.to_string())),
        (Kind::List(item), _) => match json {
            serde_json::Value::Array(items) => items
                .iter()
                .enumerate()
                .map(|(index, value)| {
                    convert_json_scalar(value, item)
                        .ok_or_else(|| invalid(Some(index), value, item.to_string()))
                })
                .collect::<Result<Vec<Value>, InvalidJson>>()
                .map(Value::List),
            _ => Err(invalid(None, json, kind.to_string())),
        },
        (_, Some(item)) => {
            convert_json_scalar(json, item).ok_or_else(|| invalid(None, json, kind.to_string()))
        }
        (_, None) => Err(invalid(None, json, kind.to_string())),
    }
}

fn validate_choices(value: &Value, choices: Option<&[Value]>) -> bool {
    match choices {
        Some(choices) => choices.contains(value),
        None => true,
    }
}

fn validate_custom(value: &Value, validator: Option<&Validator>) -> Verdict {
    match validator {
        Some(validator) => validator(value),
        None => Ok(()),
    }
}

/// Check one item (the whole value for scalar kinds) against the option's choices, then its validator.
///
/// Shared by declaration time (checking defaults) and parse time (checking supplied values).
pub(crate) fn validate(spec: &OptionSpec, item: &Value) -> Result<(), Rejection> {
    if !validate_choices(item, spec.choices.as_deref()) {
        #[cfg(feature = "tracing_debug")]
        debug!("Value '{item}' is not among the choices of '{}'.", spec.canonical());
        return Err(Rejection::NotInChoices);
    }

    validate_custom(item, spec.validator.as_ref()).map_err(Rejection::Invalid)
}

/// Every individual item of a value: the list items, or the value itself.
pub(crate) fn items(value: &Value) -> Vec<&Value> {
    match value {
        Value::List(items) => items.iter().collect(),
        other => vec![other],
    }
}
