use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::{BTreeMap, HashMap};

use crate::api::Registry;
use crate::constant::SUB_CMD_KEY;
use crate::model::{Provenance, Value};

/// The current value of one parameter, along with where it came from.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Entry {
    pub(crate) value: Option<Value>,
    pub(crate) provenance: Provenance,
}

impl Entry {
    pub(crate) fn declared(value: Option<Value>) -> Self {
        Self {
            value,
            provenance: Provenance::Default,
        }
    }
}

/// The outcome of a successful parse.
///
/// Holds exactly one key per declared option (its canonical name) and per positional (its name).
/// Values are looked up by any alias: the short, the long, or the long with `-` replaced by `_`.
///
/// ### Example
/// ```
/// # use declarg_engine as declarg;
/// use declarg::{OptionSpec, Registry};
///
/// let mut registry = Registry::new();
/// registry
///     .declare_option(OptionSpec::boolean().short('d').long("dry-run"))
///     .unwrap();
///
/// let result = registry.parse_tokens(&["-d"]).unwrap();
/// assert_eq!(result.get_bool("dry-run"), Some(true));
/// assert_eq!(result.get_bool("dry_run"), Some(true));
/// assert_eq!(result.get_bool("d"), Some(true));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedResult {
    values: BTreeMap<String, Entry>,
    aliases: HashMap<String, String>,
    has_sub_commands: bool,
    sub_cmd: Option<String>,
    nested: BTreeMap<String, ParsedResult>,
}

impl ParsedResult {
    pub(crate) fn assemble(
        registry: &Registry,
        options: Vec<Entry>,
        positionals: Vec<Entry>,
    ) -> Self {
        let mut values = BTreeMap::default();
        let mut aliases = HashMap::default();

        for (spec, entry) in registry.options().iter().zip(options.into_iter()) {
            let canonical = spec.canonical();

            if let Some(short) = spec.short {
                aliases.insert(short.to_string(), canonical.clone());
            }

            if let Some(long) = &spec.long {
                aliases.insert(long.replace('-', "_"), canonical.clone());
            }

            values.insert(canonical, entry);
        }

        for (spec, entry) in registry.positionals().iter().zip(positionals.into_iter()) {
            values.insert(spec.name.clone(), entry);
        }

        Self {
            values,
            aliases,
            has_sub_commands: registry.has_sub_commands(),
            sub_cmd: None,
            nested: BTreeMap::default(),
        }
    }

    pub(crate) fn embed(&mut self, name: impl Into<String>, nested: ParsedResult) {
        let name = name.into();
        self.sub_cmd.replace(name.clone());
        self.nested.insert(name, nested);
    }

    fn entry(&self, name: &str) -> Option<&Entry> {
        match self.values.get(name) {
            Some(entry) => Some(entry),
            None => self
                .aliases
                .get(name)
                .and_then(|canonical| self.values.get(canonical)),
        }
    }

    /// The value of a parameter, by any alias.
    ///
    /// `None` when the name is unknown, or the parameter has neither a default nor a supplied value.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entry(name).and_then(|entry| entry.value.as_ref())
    }

    /// Whether the parameter has a value.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Where the value of a parameter came from.
    pub fn provenance(&self, name: &str) -> Option<Provenance> {
        self.entry(name).map(|entry| entry.provenance)
    }

    /// See [`ParsedResult::get`] and [`Value::as_int`].
    pub fn get_int(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(Value::as_int)
    }

    /// See [`ParsedResult::get`] and [`Value::as_float`].
    pub fn get_float(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(Value::as_float)
    }

    /// See [`ParsedResult::get`] and [`Value::as_str`].
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    /// See [`ParsedResult::get`] and [`Value::as_bool`].
    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(Value::as_bool)
    }

    /// See [`ParsedResult::get`] and [`Value::as_list`].
    pub fn get_list(&self, name: &str) -> Option<&[Value]> {
        self.get(name).and_then(Value::as_list)
    }

    /// The selected sub-command, if any.
    pub fn sub_cmd(&self) -> Option<&str> {
        self.sub_cmd.as_deref()
    }

    /// The result of the selected sub-command, when `name` is the one selected.
    pub fn subcommand(&self, name: &str) -> Option<&ParsedResult> {
        self.nested.get(name)
    }

    /// Every parameter by its canonical name, in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&Value>)> {
        self.values
            .iter()
            .map(|(name, entry)| (name.as_str(), entry.value.as_ref()))
    }

    /// The result as a JSON object; the same shape is accepted back as a config.
    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl Serialize for ParsedResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;

        for (name, entry) in &self.values {
            map.serialize_entry(name, &entry.value)?;
        }

        if self.has_sub_commands {
            map.serialize_entry(SUB_CMD_KEY, &self.sub_cmd)?;
        }

        for (name, nested) in &self.nested {
            map.serialize_entry(name, nested)?;
        }

        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{OptionSpec, PositionalSpec};
    use crate::model::ScalarKind;
    use serde_json::json;

    fn registry() -> Registry {
        let mut registry = Registry::new();
        registry
            .declare_option(OptionSpec::int().short('n').long("max-count").default(3))
            .unwrap()
            .declare_option(OptionSpec::string().short('o'))
            .unwrap()
            .declare_positional(PositionalSpec::optional("path", ScalarKind::Str))
            .unwrap();
        registry
    }

    #[test]
    fn assemble_defaults() {
        // Setup
        let registry = registry();

        // Execute
        let result = ParsedResult::assemble(
            &registry,
            vec![Entry::declared(Some(Value::Int(3))), Entry::declared(None)],
            vec![Entry::declared(None)],
        );

        // Verify
        assert_eq!(
            result.iter().collect::<Vec<_>>(),
            vec![("max-count", Some(&Value::Int(3))), ("o", None), ("path", None)]
        );
        assert_eq!(result.provenance("n"), Some(Provenance::Default));
        assert_eq!(result.sub_cmd(), None);
    }

    #[test]
    fn aliases() {
        // Setup
        let registry = registry();

        // Execute
        let result = ParsedResult::assemble(
            &registry,
            vec![
                Entry {
                    value: Some(Value::Int(7)),
                    provenance: Provenance::Explicit,
                },
                Entry::declared(Some(Value::from("x"))),
            ],
            vec![Entry::declared(Some(Value::from("a.txt")))],
        );

        // Verify
        assert_eq!(result.get_int("max-count"), Some(7));
        assert_eq!(result.get_int("max_count"), Some(7));
        assert_eq!(result.get_int("n"), Some(7));
        assert_eq!(result.get_str("o"), Some("x"));
        assert_eq!(result.get_str("path"), Some("a.txt"));
        assert_eq!(result.get_str("max-count"), None);
        assert_eq!(result.get("missing"), None);
        assert!(!result.contains("missing"));
        assert_eq!(result.provenance("max_count"), Some(Provenance::Explicit));
    }

    #[test]
    fn serialize_flat() {
        // Setup
        let registry = registry();
        let result = ParsedResult::assemble(
            &registry,
            vec![Entry::declared(Some(Value::Int(3))), Entry::declared(None)],
            vec![Entry::declared(Some(Value::from("a")))],
        );

        // Execute
        let json: serde_json::Value = serde_json::from_str(&result.to_json_string().unwrap()).unwrap();

        // Verify
        assert_eq!(json, json!({"max-count": 3, "o": null, "path": "a"}));
    }

    #[test]
    fn serialize_nested() {
        // Setup
        let mut registry = Registry::new();
        registry
            .declare_option(OptionSpec::boolean().long("verbose"))
            .unwrap();
        registry
            .declare_subcommand("resize")
            .unwrap()
            .declare_option(OptionSpec::int().long("width"))
            .unwrap();
        let sub_registry = registry.sub_command("resize").unwrap();
        let nested = ParsedResult::assemble(
            sub_registry,
            vec![Entry {
                value: Some(Value::Int(100)),
                provenance: Provenance::Explicit,
            }],
            vec![],
        );
        let mut result = ParsedResult::assemble(
            &registry,
            vec![Entry::declared(Some(Value::Bool(false)))],
            vec![],
        );

        // Execute
        result.embed("resize", nested);
        let json = serde_json::to_value(&result).unwrap();

        // Verify
        assert_eq!(result.sub_cmd(), Some("resize"));
        assert_eq!(result.subcommand("resize").unwrap().get_int("width"), Some(100));
        assert_eq!(result.subcommand("other"), None);
        assert_eq!(
            json,
            json!({"verbose": false, "sub_cmd": "resize", "resize": {"width": 100}})
        );
    }

    #[test]
    fn serialize_no_sub_command_selected() {
        // Setup
        let mut registry = Registry::new();
        registry.declare_subcommand("resize").unwrap();
        let result = ParsedResult::assemble(&registry, vec![], vec![]);

        // Execute
        let json = serde_json::to_value(&result).unwrap();

        // Verify
        assert_eq!(json, json!({"sub_cmd": null}));
    }
}
