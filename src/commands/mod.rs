use clap::{Arg, ArgMatches, Command};

pub fn create_base_commands() -> Command {
    Command::new("oncoderma")
        .about("Skin lesion classification client")
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .action(clap::ArgAction::Set)
                .value_name("FILE")
                .help("Path to the config file"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .global(true)
                .action(clap::ArgAction::SetTrue)
                .help("Print results as JSON"),
        )
        .subcommand(
            Command::new("analyze")
                .about("Classify a lesion image")
                .arg(
                    Arg::new("file")
                        .required(true)
                        .value_name("IMAGE")
                        .help("JPEG or PNG image of the lesion"),
                )
                .arg(
                    Arg::new("age")
                        .long("age")
                        .required(true)
                        .value_parser(clap::value_parser!(u32))
                        .help("Patient age in years"),
                )
                .arg(
                    Arg::new("sex")
                        .long("sex")
                        .required(true)
                        .help("Patient sex (MALE or FEMALE)"),
                )
                .arg(
                    Arg::new("site")
                        .long("site")
                        .required(true)
                        .help("Anatomical site of the lesion, e.g. \"posterior torso\""),
                ),
        )
        .subcommand(Command::new("health").about("Check the prediction service"))
        .subcommand(
            Command::new("login")
                .about("Sign in and save the session")
                .arg(Arg::new("username").long("username").required(true))
                .arg(Arg::new("password").long("password").required(true)),
        )
        .subcommand(Command::new("logout").about("Forget the saved session"))
        .subcommand(Command::new("whoami").about("Show the saved session"))
}

// Global args land in the subcommand's matches when given after it.
pub fn get_config_path(matches: &ArgMatches) -> String {
    matches
        .subcommand()
        .and_then(|(_, sub)| sub.get_one::<String>("config"))
        .or_else(|| matches.get_one::<String>("config"))
        .map(|s| s.as_str())
        .unwrap_or("config.toml")
        .to_string()
}

pub fn wants_json(matches: &ArgMatches) -> bool {
    matches.get_flag("json")
        || matches
            .subcommand()
            .map_or(false, |(_, sub)| sub.get_flag("json"))
}
