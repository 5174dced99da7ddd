use assert_matches::assert_matches;
use declarg::*;
use rstest::rstest;
use serde_json::json;

fn registry() -> Registry {
    let mut registry = Registry::new();
    registry
        .about("Edit an image.")
        .declare_option(OptionSpec::boolean().short('v').long("verbose"))
        .unwrap()
        .declare_option(OptionSpec::boolean().long("color").default(true))
        .unwrap()
        .declare_option(
            OptionSpec::float()
                .short('q')
                .long("quality")
                .default(0.8)
                .validator(|value| value.as_float().map_or(false, |q| (0.0..=1.0).contains(&q))),
        )
        .unwrap()
        .declare_option(OptionSpec::list(ScalarKind::Str).short('t').long("tag"))
        .unwrap()
        .declare_positional(PositionalSpec::required("input", ScalarKind::Str))
        .unwrap();
    registry
        .declare_subcommand("resize")
        .unwrap()
        .about("Resize the image.")
        .declare_option(OptionSpec::int().short('w').long("max-width").default(640))
        .unwrap()
        .declare_option(OptionSpec::int().long("height"))
        .unwrap()
        .declare_option(
            OptionSpec::string()
                .long("filter")
                .choices(["nearest", "linear"]),
        )
        .unwrap()
        .requires("filter", ["height"])
        .unwrap();
    registry
        .declare_subcommand("rotate")
        .unwrap()
        .declare_option(OptionSpec::int().short('d').long("degrees").choices([90, 180, 270]))
        .unwrap();
    registry
}

#[test]
fn parse_tokens() {
    // Setup
    let registry = registry();

    // Execute
    let result = registry
        .parse_tokens(&[
            "-vq", "0.5", "--no-color", "-t", "a", "--tag=b", "in.png", "resize", "-w", "100",
            "--height", "50",
        ])
        .unwrap();

    // Verify
    assert_eq!(result.get_bool("verbose"), Some(true));
    assert_eq!(result.get_bool("color"), Some(false));
    assert_eq!(result.get_float("q"), Some(0.5));
    assert_eq!(
        result.get_list("tag"),
        Some(vec![Value::from("a"), Value::from("b")].as_slice())
    );
    assert_eq!(result.get_str("input"), Some("in.png"));
    assert_eq!(result.sub_cmd(), Some("resize"));
    let resize = result.subcommand("resize").unwrap();
    assert_eq!(resize.get_int("max_width"), Some(100));
    assert_eq!(resize.get_int("height"), Some(50));
    assert_eq!(resize.get("filter"), None);
    assert_eq!(result.subcommand("rotate"), None);
}

#[test]
fn parse_tokens_mixed() {
    // Setup
    let mut registry = Registry::new();
    registry
        .declare_option(OptionSpec::int().short('n').long("num").default(5))
        .unwrap()
        .declare_option(OptionSpec::float().short('r').long("rate").default(1.0))
        .unwrap()
        .declare_option(OptionSpec::string().short('a').long("author"))
        .unwrap()
        .declare_option(OptionSpec::boolean().short('v').long("verbose").default(false))
        .unwrap()
        .declare_option(OptionSpec::list(ScalarKind::Str).short('f').long("files"))
        .unwrap()
        .declare_option(OptionSpec::list(ScalarKind::Int).long("numbers"))
        .unwrap()
        .declare_positional(PositionalSpec::required("price", ScalarKind::Int))
        .unwrap();

    // Execute
    let result = registry
        .parse_tokens(&[
            "5000", "-n", "10", "--rate", "1.2", "-a", "Mike", "-v", "-f", "file1.txt",
            "--files", "file2.txt", "--numbers", "5", "--numbers", "10",
        ])
        .unwrap();

    // Verify
    assert_eq!(result.get_int("num"), Some(10));
    assert_eq!(result.get_float("rate"), Some(1.2));
    assert_eq!(result.get_str("author"), Some("Mike"));
    assert_eq!(result.get_bool("verbose"), Some(true));
    assert_eq!(result.get("files"), Some(&Value::from(vec!["file1.txt", "file2.txt"])));
    assert_eq!(result.get("numbers"), Some(&Value::from(vec![5, 10])));
    assert_eq!(result.get_int("price"), Some(5000));
}

#[test]
fn parse_tokens_sub_command() {
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

    // Execute
    let result = registry
        .parse_tokens(&["--verbose", "resize", "--width", "100"])
        .unwrap();

    // Verify
    assert_eq!(result.get_bool("verbose"), Some(true));
    assert_eq!(result.sub_cmd(), Some("resize"));
    assert_eq!(result.subcommand("resize").unwrap().get_int("width"), Some(100));
}

#[test]
fn parse_tokens_defaults() {
    // Setup
    let registry = registry();

    // Execute
    let result = registry.parse_tokens(&["in.png"]).unwrap();

    // Verify
    assert_eq!(result.get_bool("verbose"), Some(false));
    assert_eq!(result.get_bool("color"), Some(true));
    assert_eq!(result.get_float("quality"), Some(0.8));
    assert_eq!(result.get_list("tag"), Some(&[][..]));
    assert_eq!(result.provenance("quality"), Some(Provenance::Default));
    assert_eq!(result.sub_cmd(), None);
}

#[rstest]
#[case(vec![], ErrorKind::MissingPositional)]
#[case(vec!["in.png", "--colour"], ErrorKind::UnknownLong)]
#[case(vec!["in.png", "-x"], ErrorKind::UnknownSingleShort)]
#[case(vec!["in.png", "-qv"], ErrorKind::ShortClusterNoBool)]
#[case(vec!["in.png", "-q=0.5"], ErrorKind::ShortWithEqualSign)]
#[case(vec!["in.png", "resize", "-w100"], ErrorKind::ShortClusterNoBool)]
#[case(vec!["in.png", "--verbose=yes"], ErrorKind::UnexpectedValueLong)]
#[case(vec!["in.png", "--quality", "high"], ErrorKind::ValueTypeMismatch)]
#[case(vec!["in.png", "--quality", "1.5"], ErrorKind::ValidationFailedLong)]
#[case(vec!["in.png", "crop"], ErrorKind::UnknownSubcommand)]
#[case(vec!["in.png", "rotate", "-d", "45"], ErrorKind::ValueNotInChoicesShort)]
#[case(vec!["in.png", "resize", "--filter", "linear"], ErrorKind::RequireNotProvided)]
fn parse_tokens_invalid(#[case] tokens: Vec<&str>, #[case] expected: ErrorKind) {
    // Setup
    let registry = registry();

    // Execute
    let error = registry.parse_tokens(&tokens).unwrap_err();

    // Verify
    assert_eq!(error.kind, expected);
}

#[test]
fn declare_invalid() {
    // Setup
    let mut registry = registry();

    // Execute
    let duplicate = registry
        .declare_option(OptionSpec::string().long("verbose"))
        .unwrap_err();
    let no_alias = registry.declare_option(OptionSpec::int()).unwrap_err();
    let bad_default = registry
        .declare_option(OptionSpec::int().long("count").default("many"))
        .unwrap_err();

    // Verify
    assert_eq!(duplicate.kind, ErrorKind::DuplicateOption);
    assert_eq!(no_alias.kind, ErrorKind::NoShortOrLong);
    assert_eq!(bad_default.kind, ErrorKind::OptionalDefaultTypeMismatch);
    assert!(duplicate.kind.is_config());
}

#[test]
fn config_layering() {
    // Setup
    let registry = registry();
    let config = Config::from_value(
        "settings.json",
        json!({
            "quality": 0.3,
            "tag": ["x"],
            "resize": {"max_width": 1024},
        }),
    )
    .unwrap();

    // Execute
    let result = registry
        .parse_tokens_with_config(&["-t", "y", "in.png", "resize"], &config)
        .unwrap();

    // Verify
    assert_eq!(result.get_float("quality"), Some(0.3));
    assert_eq!(result.provenance("quality"), Some(Provenance::Config));
    assert_eq!(result.get_list("tag"), Some(vec![Value::from("y")].as_slice()));
    assert_eq!(result.provenance("tag"), Some(Provenance::Explicit));
    let resize = result.subcommand("resize").unwrap();
    assert_eq!(resize.get_int("max-width"), Some(1024));
    assert_eq!(resize.provenance("max-width"), Some(Provenance::Config));
}

#[test]
fn config_unknown() {
    // Setup
    let registry = registry();
    let config = Config::from_value("settings.json", json!({"qualty": 0.3})).unwrap();

    // Execute
    let error = registry
        .parse_tokens_with_config(&["in.png"], &config)
        .unwrap_err();

    // Verify
    assert_eq!(error.kind, ErrorKind::UnknownInConfig);
    assert_eq!(error.placeholder("arg_name"), Some("qualty"));
    assert_eq!(error.placeholder("file"), Some("settings.json"));
}

#[test]
fn json_replay() {
    // Setup
    let registry = registry();
    let original = registry
        .parse_tokens(&["-v", "-t", "a", "in.png", "rotate", "-d", "180"])
        .unwrap();

    // Execute
    let exported: serde_json::Value =
        serde_json::from_str(&original.to_json_string().unwrap()).unwrap();
    let config = Config::from_result(&original).unwrap();
    let replayed = registry.parse_tokens_with_config(&[], &config);

    // Verify
    assert_eq!(exported["verbose"], json!(true));
    assert_eq!(exported["tag"], json!(["a"]));
    assert_eq!(exported["sub_cmd"], json!("rotate"));
    assert_eq!(exported["rotate"]["degrees"], json!(180));
    // The sub-command is chosen by tokens only.
    let replayed = replayed.unwrap();
    assert_eq!(replayed.get_bool("verbose"), Some(true));
    assert_eq!(replayed.get_str("input"), Some("in.png"));
    assert_eq!(replayed.sub_cmd(), None);
}

#[test]
fn json_replay_sub_command() {
    // Setup
    let registry = registry();
    let original = registry.parse_tokens(&["-q", "0.4", "in.png"]).unwrap();
    let config = Config::from_result(&original).unwrap();

    // Execute
    let replayed = registry
        .parse_tokens_with_config(&["rotate", "-d", "90"], &config)
        .unwrap();

    // Verify
    assert_eq!(replayed.get_str("input"), Some("in.png"));
    assert_eq!(replayed.provenance("input"), Some(Provenance::Config));
    assert_eq!(replayed.get_float("quality"), Some(0.4));
    assert_eq!(replayed.sub_cmd(), Some("rotate"));
    assert_eq!(replayed.subcommand("rotate").unwrap().get_int("degrees"), Some(90));
}

#[test]
fn command_line_parser_help() {
    // Setup
    let (parser, interface) = CommandLineParser::new("editor", registry())
        .exit_on_error(false)
        .in_memory_interface();

    // Execute
    let exit = parser.parse_tokens(&["in.png", "resize", "--help"]).unwrap_err();

    // Verify
    assert_eq!(exit.code, 0);
    let message = interface.consume_message();
    assert!(message.starts_with(
        "usage: editor resize [-h] [--filter FILTER] [--height HEIGHT] [-w MAX_WIDTH]\n"
    ));
    assert!(message.contains("\nResize the image.\n"));
    assert_eq!(interface.consume_error(), "");
}

#[test]
fn command_line_parser_messages() {
    // Setup
    let messages = Messages::default()
        .with(ErrorKind::UnknownLong, "No such option: --{arg_name}")
        .with_keys([("missing_positional", "Please name the {arg_names}")]);
    let (parser, interface) = CommandLineParser::new("editor", registry())
        .messages(messages)
        .exit_on_error(false)
        .in_memory_interface();

    // Execute
    let unknown = parser.parse_tokens(&["in.png", "--colour"]).unwrap_err();
    let unknown_error = interface.consume_error();
    let missing = parser.parse_tokens(&[]).unwrap_err();
    let missing_error = interface.consume_error();

    // Verify
    assert_eq!(unknown.code, 1);
    assert_matches!(unknown.error, Some(ParseError { kind: ErrorKind::UnknownLong, .. }));
    assert_eq!(unknown_error, "Parse error: No such option: --colour\n");
    assert_eq!(missing.code, 1);
    assert_eq!(missing_error, "Parse error: Please name the input\n");
}
