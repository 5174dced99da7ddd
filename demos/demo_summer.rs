use declarg::{CommandLineParser, OptionSpec, PositionalSpec, Registry, ScalarKind, Value};

fn main() {
    let mut registry = Registry::new();
    registry
        .declare_option(
            OptionSpec::list(ScalarKind::Int)
                .short('i')
                .long("item")
                .description("The items to sum."),
        )
        .expect("Invalid argument parser configuration")
        .declare_positional(
            PositionalSpec::optional("start", ScalarKind::Int)
                .default(0)
                .description("The initial total."),
        )
        .expect("Invalid argument parser configuration");

    let parser = CommandLineParser::new("summer", registry).about("Sum some integers.");
    let result = parser.parse().expect("exit_on_error is enabled");
    let items = result.get_list("item").unwrap_or_default();
    let sum: i64 = result.get_int("start").unwrap_or_default()
        + items.iter().filter_map(Value::as_int).sum::<i64>();
    println!("Sum: {sum}");
}
