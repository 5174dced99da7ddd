use declarg::{CommandLineParser, Config, OptionSpec, Registry};

fn main() {
    let mut registry = Registry::new();
    registry
        .declare_option(OptionSpec::string().long("host").default("localhost"))
        .expect("Invalid argument parser configuration")
        .declare_option(
            OptionSpec::int()
                .short('p')
                .long("port")
                .default(8080)
                .validator(|value| value.as_int().map_or(false, |port| port > 0)),
        )
        .expect("Invalid argument parser configuration")
        .declare_option(OptionSpec::boolean().long("tls").default(true))
        .expect("Invalid argument parser configuration")
        .requires("tls", ["port"])
        .expect("Invalid argument parser configuration");

    // Values in 'server.json' apply over the defaults, but under the command line.
    let mut parser = CommandLineParser::new("server", registry);
    if let Ok(config) = Config::from_path("server.json") {
        parser = parser.config(config);
    }

    let result = parser.parse().expect("exit_on_error is enabled");
    println!(
        "{}",
        result
            .to_json_string()
            .expect("results always serialize to JSON")
    );
}
