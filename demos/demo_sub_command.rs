use declarg::{CommandLineParser, OptionSpec, PositionalSpec, Registry, ScalarKind};

fn main() {
    let mut registry = Registry::new();
    registry
        .about("Edit an image.")
        .declare_option(
            OptionSpec::boolean()
                .short('v')
                .long("verbose")
                .description("Print more."),
        )
        .expect("Invalid argument parser configuration")
        .declare_positional(
            PositionalSpec::required("input", ScalarKind::Str).description("The image to edit."),
        )
        .expect("Invalid argument parser configuration");
    registry
        .declare_subcommand("resize")
        .expect("Invalid argument parser configuration")
        .about("Resize the image.")
        .declare_option(OptionSpec::int().short('w').long("width").default(640))
        .expect("Invalid argument parser configuration")
        .declare_option(OptionSpec::int().long("height"))
        .expect("Invalid argument parser configuration");
    registry
        .declare_subcommand("rotate")
        .expect("Invalid argument parser configuration")
        .about("Rotate the image.")
        .declare_option(
            OptionSpec::int()
                .short('d')
                .long("degrees")
                .choices([90, 180, 270])
                .default(90),
        )
        .expect("Invalid argument parser configuration");

    let parser = CommandLineParser::new("editor", registry);
    let result = parser.parse().expect("exit_on_error is enabled");

    println!("Input: {}", result.get_str("input").unwrap_or_default());
    match result.sub_cmd() {
        Some(name) => {
            let sub_result = result
                .subcommand(name)
                .expect("the selected sub-command always has a result");
            println!("Used sub-command '{name}'.");
            for (key, value) in sub_result.iter() {
                println!("  {key}: {value:?}");
            }
        }
        None => println!("No sub-command."),
    }
}
