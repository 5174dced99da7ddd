use std::env;
use thiserror::Error;

use crate::api::{Config, Registry};
use crate::parser::{
    Action, ConsoleInterface, Messages, ParseError, ParsedResult, Parser, Printer, UserInterface,
};

#[cfg(any(test, feature = "unit_test"))]
use crate::parser::InMemoryInterface;

#[cfg(any(test, feature = "unit_test"))]
const IN_MEMORY_WIDTH: usize = 100;

#[cfg(feature = "tracing_debug")]
use tracing::debug;

/// Why [`CommandLineParser`] stopped without a result.
///
/// `code` is `0` when help was printed, and `1` on a parse error (which is also carried in `error`).
#[derive(Debug, Error)]
#[error("Exit with code {code}.")]
pub struct ParseExit {
    /// The process exit code.
    pub code: i32,
    /// The parse error, if any.
    pub error: Option<ParseError>,
}

/// The outer command line parser.
///
/// Wraps a root [`Registry`] with the user facing behaviour:
/// the built-in `-h`/`--help`, error rendering through [`Messages`], an optional [`Config`], and exiting the process.
///
/// ### Example
/// ```
/// # use declarg_engine as declarg;
/// use declarg::{CommandLineParser, OptionSpec, Registry};
///
/// let mut registry = Registry::new();
/// registry
///     .declare_option(OptionSpec::int().short('n').long("num").default(1))
///     .unwrap();
///
/// let parser = CommandLineParser::new("program", registry).exit_on_error(false);
/// let result = parser.parse_tokens(&["--num", "3"]).unwrap();
/// assert_eq!(result.get_int("num"), Some(3));
///
/// let exit = parser.parse_tokens(&["--num", "three"]).unwrap_err();
/// assert_eq!(exit.code, 1);
/// ```
pub struct CommandLineParser {
    program: String,
    registry: Registry,
    messages: Messages,
    exit_on_error: bool,
    config: Option<Config>,
    printer: Printer,
    user_interface: Box<dyn UserInterface>,
}

impl CommandLineParser {
    /// Create a command line parser for `program` over the declarations of `registry`.
    pub fn new(program: impl Into<String>, registry: Registry) -> Self {
        Self {
            program: program.into(),
            registry,
            messages: Messages::default(),
            exit_on_error: true,
            config: None,
            printer: Printer::terminal(),
            user_interface: Box::new(ConsoleInterface::default()),
        }
    }

    /// Document the about message, shown in the help under the usage line.
    /// If repeated, only the final message applies.
    pub fn about(mut self, description: impl Into<String>) -> Self {
        self.registry.about(description);
        self
    }

    /// Render errors using `messages`.
    pub fn messages(mut self, messages: Messages) -> Self {
        self.messages = messages;
        self
    }

    /// Whether to exit the process (via [`std::process::exit`]) on help or a parse error; defaults to `true`.
    /// When `false`, [`ParseExit`] is returned instead.
    pub fn exit_on_error(mut self, exit_on_error: bool) -> Self {
        self.exit_on_error = exit_on_error;
        self
    }

    /// Apply `config` ahead of the command line tokens on every parse.
    pub fn config(mut self, config: Config) -> Self {
        self.config.replace(config);
        self
    }

    /// The declarations being parsed.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Capture all output in memory, rather than printing to the console.
    /// The help is laid out for a fixed width of 100 columns, whatever the terminal.
    ///
    /// *Available using 'unit_test' crate feature only.*
    #[cfg(any(test, feature = "unit_test"))]
    pub fn in_memory_interface(mut self) -> (Self, InMemoryInterface) {
        let interface = InMemoryInterface::default();
        self.printer = Printer::new(Some(IN_MEMORY_WIDTH));
        self.user_interface = Box::new(interface.clone());
        (self, interface)
    }

    /// Run the parser against the input tokens (which exclude the program name).
    ///
    /// If help is requested (`-h` or `--help`), the help of the selected (sub-)command is printed and parsing stops with code `0`.
    /// If parsing fails, the rendered error is printed and parsing stops with code `1`.
    /// In both cases the process exits, unless [`CommandLineParser::exit_on_error`] is disabled.
    pub fn parse_tokens(&self, tokens: &[&str]) -> Result<ParsedResult, ParseExit> {
        match Parser::new(&self.registry, true).consume(tokens, self.config.as_ref()) {
            Ok(Action::Complete(result)) => Ok(result),
            Ok(Action::PrintHelp(path)) => {
                let registry = path
                    .iter()
                    .try_fold(&self.registry, |registry, name| registry.sub_command(name))
                    .unwrap_or(&self.registry);
                let program = std::iter::once(self.program.as_str())
                    .chain(path.iter().map(String::as_str))
                    .collect::<Vec<&str>>()
                    .join(" ");
                self.printer.print_help(&program, registry, &*self.user_interface);
                self.exit(ParseExit {
                    code: 0,
                    error: None,
                })
            }
            Err(error) => {
                #[cfg(feature = "tracing_debug")]
                debug!("Parse failed: {error:?}.");
                self.user_interface.print_error(format!(
                    "Parse error: {}",
                    self.messages.render(error.kind, &error.placeholders)
                ));
                self.exit(ParseExit {
                    code: 1,
                    error: Some(error),
                })
            }
        }
    }

    /// Run the parser against the process arguments.
    ///
    /// See [`CommandLineParser::parse_tokens`].
    pub fn parse(&self) -> Result<ParsedResult, ParseExit> {
        let command_input: Vec<String> = env::args().skip(1).collect();
        self.parse_tokens(
            command_input
                .iter()
                .map(AsRef::as_ref)
                .collect::<Vec<&str>>()
                .as_slice(),
        )
    }

    fn exit(&self, parse_exit: ParseExit) -> Result<ParsedResult, ParseExit> {
        if self.exit_on_error {
            std::process::exit(parse_exit.code);
        }

        Err(parse_exit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::assert_contains;
    use crate::api::{OptionSpec, PositionalSpec};
    use crate::model::ScalarKind;
    use crate::parser::ErrorKind;
    use rstest::rstest;

    fn registry() -> Registry {
        let mut registry = Registry::new();
        registry
            .declare_option(OptionSpec::boolean().short('v').long("verbose"))
            .unwrap()
            .declare_positional(PositionalSpec::optional("input", ScalarKind::Str))
            .unwrap();
        registry
            .declare_subcommand("resize")
            .unwrap()
            .about("Resize the image.")
            .declare_option(OptionSpec::int().long("width").description("The new width."))
            .unwrap();
        registry
    }

    fn parser() -> (CommandLineParser, InMemoryInterface) {
        CommandLineParser::new("program", registry())
            .about("Edit images.")
            .exit_on_error(false)
            .in_memory_interface()
    }

    #[test]
    fn parse_tokens() {
        // Setup
        let (parser, interface) = parser();

        // Execute
        let result = parser
            .parse_tokens(&["-v", "in.png", "resize", "--width", "3"])
            .unwrap();

        // Verify
        assert_eq!(result.get_bool("verbose"), Some(true));
        assert_eq!(result.get_str("input"), Some("in.png"));
        assert_eq!(result.subcommand("resize").unwrap().get_int("width"), Some(3));
        assert_eq!(interface.consume_message(), "");
        assert_eq!(interface.consume_error(), "");
    }

    #[rstest]
    #[case(vec!["--help"])]
    #[case(vec!["-h"])]
    #[case(vec!["-v", "--help", "--unknown"])]
    fn help(#[case] tokens: Vec<&str>) {
        // Setup
        let (parser, interface) = parser();

        // Execute
        let exit = parser.parse_tokens(&tokens).unwrap_err();

        // Verify
        assert_eq!(exit.code, 0);
        assert_matches!(exit.error, None);
        let message = interface.consume_message();
        assert_contains!(message, "usage: program [-h] [-v] [INPUT] {resize} ...\n");
        assert_contains!(message, "\nEdit images.\n");
        assert_contains!(message, "Resize the image.");
        assert_eq!(interface.consume_error(), "");
    }

    #[test]
    fn help_sub_command() {
        // Setup
        let (parser, interface) = parser();

        // Execute
        let exit = parser.parse_tokens(&["resize", "-h"]).unwrap_err();

        // Verify
        assert_eq!(exit.code, 0);
        let message = interface.consume_message();
        assert_contains!(message, "usage: program resize [-h] [--width WIDTH]\n");
        assert_contains!(message, "\nResize the image.\n");
        assert_contains!(message, "The new width. [int]");
    }

    #[test]
    fn help_fixed_width() {
        // Setup
        let mut registry = Registry::new();
        registry
            .declare_option(
                OptionSpec::boolean()
                    .short('v')
                    .description("Print a great deal more about everything being done."),
            )
            .unwrap();
        let (parser, interface) = CommandLineParser::new("program", registry)
            .exit_on_error(false)
            .in_memory_interface();

        // Execute
        parser.parse_tokens(&["-h"]).unwrap_err();

        // Verify
        assert_contains!(
            interface.consume_message(),
            " -v           Print a great deal more about everything being done.\n"
        );
    }

    #[test]
    fn help_after_terminator() {
        let (parser, _) = parser();
        let result = parser.parse_tokens(&["--", "--help"]).unwrap();
        assert_eq!(result.get_str("input"), Some("--help"));
    }

    #[test]
    fn help_shadowed() {
        // Setup
        let mut registry = Registry::new();
        registry
            .declare_option(OptionSpec::string().short('h').long("host"))
            .unwrap();
        let (parser, interface) = CommandLineParser::new("program", registry)
            .exit_on_error(false)
            .in_memory_interface();

        // Execute
        let result = parser.parse_tokens(&["-h", "localhost"]).unwrap();
        let exit = parser.parse_tokens(&["--help"]).unwrap_err();

        // Verify
        assert_eq!(result.get_str("host"), Some("localhost"));
        assert_eq!(exit.code, 0);
        assert_contains!(interface.consume_message(), "usage: program [--help] [-h HOST]\n");
    }

    #[test]
    fn parse_error() {
        // Setup
        let (parser, interface) = parser();

        // Execute
        let exit = parser.parse_tokens(&["--colour"]).unwrap_err();

        // Verify
        assert_eq!(exit.code, 1);
        assert_matches!(exit.error, Some(ParseError { kind: ErrorKind::UnknownLong, .. }));
        assert_eq!(
            interface.consume_error(),
            "Parse error: Unknown argument '--colour'\n"
        );
        assert_eq!(interface.consume_message(), "");
    }

    #[test]
    fn parse_error_messages() {
        // Setup
        let (parser, interface) = parser();
        let parser = parser.messages(
            Messages::default().with_keys([("unknown_subcommand", "'{arg_name}' is not a command")]),
        );

        // Execute
        let exit = parser.parse_tokens(&["in.png", "rotate"]).unwrap_err();

        // Verify
        assert_eq!(exit.code, 1);
        assert_eq!(
            interface.consume_error(),
            "Parse error: 'rotate' is not a command\n"
        );
    }

    #[test]
    fn config() {
        // Setup
        let config = Config::from_json_str(
            "settings.json",
            r#"{"verbose": true, "resize": {"width": 7}}"#,
        )
        .unwrap();
        let (parser, _) = parser();
        let parser = parser.config(config);

        // Execute
        let result = parser.parse_tokens(&["resize"]).unwrap();

        // Verify
        assert_eq!(result.get_bool("verbose"), Some(true));
        assert_eq!(result.subcommand("resize").unwrap().get_int("width"), Some(7));
    }

    #[test]
    fn parse_exit_display() {
        let exit = ParseExit {
            code: 1,
            error: None,
        };
        assert_eq!(exit.to_string(), "Exit with code 1.");
    }
}
