use terminal_size::{terminal_size, Width};

use crate::api::{OptionSpec, PositionalSpec, Registry};
use crate::constant::*;
use crate::model::{Kind, Value};
use crate::parser::interface::UserInterface;
use crate::parser::{
    ColumnRenderer, LeftWidth, MiddleWidth, PaddingWidth, TotalWidth, MINIMUM_MIDDLE_WIDTH,
};

const PADDING_WIDTH: usize = 3;
const MAIN_INDENT: usize = 1;

struct HelpLine {
    flags: String,
    description: String,
}

/// Renders the help message of one (sub-)command.
pub(crate) struct Printer {
    terminal_width: Option<usize>,
}

impl Printer {
    pub(crate) fn terminal() -> Self {
        let terminal_width = if let Some((Width(terminal_width), _)) = terminal_size() {
            Some(terminal_width as usize)
        } else {
            None
        };

        Self::new(terminal_width)
    }

    pub(crate) fn new(terminal_width: Option<usize>) -> Self {
        Self { terminal_width }
    }

    /// Print the help of `registry`, invoked as `program` (the program name followed by any sub-command names).
    pub(crate) fn print_help(
        &self,
        program: &str,
        registry: &Registry,
        user_interface: &(impl UserInterface + ?Sized),
    ) {
        let help_long = !registry
            .options()
            .iter()
            .any(|spec| spec.long.as_deref() == Some(HELP_NAME));
        let help_short = !registry
            .options()
            .iter()
            .any(|spec| spec.short == Some(HELP_SHORT));
        let mut options: Vec<&OptionSpec> = registry.options().iter().collect();
        options.sort_by_key(|spec| spec.canonical());

        let mut summary = Vec::default();
        let mut option_lines = Vec::default();

        if help_short {
            summary.push(format!("[-{HELP_SHORT}]"));
        } else if help_long {
            summary.push(format!("[--{HELP_NAME}]"));
        }

        let help_flags = [
            help_short.then(|| format!("-{HELP_SHORT}")),
            help_long.then(|| format!("--{HELP_NAME}")),
        ]
        .into_iter()
        .flatten()
        .collect::<Vec<String>>()
        .join(", ");

        if !help_flags.is_empty() {
            option_lines.push(HelpLine {
                flags: help_flags,
                description: HELP_MESSAGE.to_string(),
            });
        }

        for spec in options {
            let (usage, line) = option_help(spec);
            summary.push(usage);
            option_lines.push(line);
        }

        let positional_lines: Vec<HelpLine> = registry
            .positionals()
            .iter()
            .map(|spec| {
                let (usage, line) = positional_help(spec);
                summary.push(usage);
                line
            })
            .collect();

        let sub_command_lines: Vec<HelpLine> = registry
            .sub_commands()
            .map(|(name, sub_registry)| HelpLine {
                flags: name.to_string(),
                description: sub_registry.description().unwrap_or_default().to_string(),
            })
            .collect();

        if !sub_command_lines.is_empty() {
            let names = sub_command_lines
                .iter()
                .map(|line| line.flags.as_str())
                .collect::<Vec<&str>>()
                .join(",");
            summary.push(format!("{{{names}}} ..."));
        }

        let all_lines = || {
            positional_lines
                .iter()
                .chain(sub_command_lines.iter())
                .chain(option_lines.iter())
        };
        let left_column_width = all_lines()
            .map(|line| line.flags.chars().count())
            .max()
            .unwrap_or(1);
        let middle_column_width = all_lines()
            .map(|line| line.description.chars().count() + MAIN_INDENT)
            .max()
            .unwrap_or(MINIMUM_MIDDLE_WIDTH);
        let column_renderer = self.column_renderer(left_column_width, middle_column_width);

        user_interface.print(format!("usage: {program} {}", summary.join(" ")));

        if let Some(about) = registry.description() {
            user_interface.print("".to_string());
            user_interface.print(about.to_string());
        }

        for (title, lines) in [
            ("positional arguments:", &positional_lines),
            ("sub-commands:", &sub_command_lines),
            ("options:", &option_lines),
        ] {
            if lines.is_empty() {
                continue;
            }

            user_interface.print("".to_string());
            user_interface.print(title.to_string());

            for HelpLine { flags, description } in lines {
                for line in column_renderer.render(MAIN_INDENT, flags, description) {
                    user_interface.print(line);
                }
            }
        }
    }

    fn column_renderer(&self, left_column_width: usize, middle_column_width: usize) -> ColumnRenderer {
        let padding = PaddingWidth::new(PADDING_WIDTH);
        let left = LeftWidth::new(std::cmp::max(left_column_width, 1));

        match (padding, left) {
            (Some(padding), Some(left)) => match self.terminal_width {
                Some(terminal_width) => ColumnRenderer::guided(
                    padding,
                    left,
                    MiddleWidth::new(std::cmp::max(middle_column_width, 2))
                        .unwrap_or_else(|| unreachable!("internal error - middle must be at least 2")),
                    TotalWidth(terminal_width),
                ),
                None => ColumnRenderer::new(
                    padding,
                    left,
                    MiddleWidth::new(std::cmp::max(
                        std::cmp::min(middle_column_width, MINIMUM_MIDDLE_WIDTH),
                        2,
                    ))
                    .unwrap_or_else(|| unreachable!("internal error - middle must be at least 2")),
                ),
            },
            _ => unreachable!("internal error - padding and left must be at least 1"),
        }
    }
}

fn metavar(name: &str) -> String {
    name.to_ascii_uppercase().replace('-', "_")
}

fn option_help(spec: &OptionSpec) -> (String, HelpLine) {
    let name = spec.canonical();
    let grammar = match spec.kind {
        Kind::Bool => "".to_string(),
        Kind::List(_) => format!(" {} ...", metavar(&name)),
        _ => format!(" {}", metavar(&name)),
    };

    let usage = match (&spec.short, &spec.long) {
        (Some(short), _) => format!("[-{short}{grammar}]"),
        (None, Some(long)) => format!("[--{long}{grammar}]"),
        (None, None) => unreachable!("internal error - declared options must have an alias"),
    };

    let mut flags = Vec::default();

    if let Some(short) = &spec.short {
        flags.push(format!("-{short}{grammar}"));
    }

    if let Some(long) = &spec.long {
        flags.push(format!("--{long}{grammar}"));

        if spec.negatable() {
            flags.push(format!("--{NEGATION_PREFIX}{long}"));
        }
    }

    let mut details = Vec::default();

    if spec.kind != Kind::Bool {
        details.push(spec.kind.to_string());
    }

    match &spec.default {
        Some(Value::Bool(false)) | None => {}
        Some(Value::List(items)) if items.is_empty() => {}
        Some(default) => details.push(format!("default: {default}")),
    };

    if let Some(choices) = &spec.choices {
        details.push(format!(
            "choices: {}",
            choices
                .iter()
                .map(Value::to_string)
                .collect::<Vec<String>>()
                .join(", ")
        ));
    }

    let line = HelpLine {
        flags: flags.join(", "),
        description: describe(spec.description.as_deref(), details),
    };
    (usage, line)
}

fn positional_help(spec: &PositionalSpec) -> (String, HelpLine) {
    let grammar = metavar(&spec.name);
    let usage = if spec.required {
        grammar.clone()
    } else {
        format!("[{grammar}]")
    };

    let mut details = vec![spec.kind.to_string()];

    if let Some(default) = &spec.default {
        details.push(format!("default: {default}"));
    }

    let line = HelpLine {
        flags: grammar,
        description: describe(spec.description.as_deref(), details),
    };
    (usage, line)
}

fn describe(description: Option<&str>, details: Vec<String>) -> String {
    let details = if details.is_empty() {
        None
    } else {
        Some(format!("[{}]", details.join(", ")))
    };

    match (description, details) {
        (Some(description), Some(details)) => format!("{description} {details}"),
        (Some(description), None) => description.to_string(),
        (None, Some(details)) => details,
        (None, None) => "".to_string(),
    }
}
