use clap::{App, AppSettings, Arg};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let matches = app().get_matches();

    let default_filter = if matches.is_present("verbose") {
        "debug"
    } else {
        "info"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    if let Some(ref matches) = matches.subcommand_matches("demo") {
        txhandler_lib::commands::run_demo_command(&matches)
    } else {
        panic!("Should report help.");
    }
}

fn app() -> App<'static> {
    App::new("txhandler")
        .about("Validates transactions against a UTXO pool and applies a conflict-free subset.")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Logs the reason every transaction is rejected."),
        )
        .subcommand(txhandler_lib::commands::demo_command())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbose_is_a_top_level_option() {
        let matches = app()
            .try_get_matches_from(vec!["txhandler", "-v", "demo"])
            .unwrap();
        assert!(matches.is_present("verbose"));
        assert!(matches.subcommand_matches("demo").is_some());

        let matches = app().try_get_matches_from(vec!["txhandler", "demo"]).unwrap();
        assert!(!matches.is_present("verbose"));
    }

    #[test]
    fn verbose_is_not_a_demo_option() {
        assert!(app()
            .try_get_matches_from(vec!["txhandler", "demo", "--verbose"])
            .is_err());
    }
}
