mod simulatepcr;

use anyhow::Result;
use clap::{ArgAction, ArgMatches, Command, arg};

pub mod consts {
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
    pub const BIN_NAME: &str = "ampli";
}

fn build_parser() -> Command {
    Command::new(consts::BIN_NAME)
        .bin_name(consts::BIN_NAME)
        .version(consts::VERSION)
        .author("Databio")
        .about("Predict PCR products of exact-match primers on genome sequences.")
        .subcommand_required(true)
        .arg(arg!(-v --verbose "Log debug messages").action(ArgAction::SetTrue).global(true))
        .arg(arg!(-q --quiet "Only log warnings and errors").action(ArgAction::SetTrue).global(true))
        .subcommand(simulatepcr::cli::create_simulatepcr_cli())
}

/// `RUST_LOG` wins over the verbosity flags.
fn init_logging(matches: &ArgMatches) {
    let default_level = if matches.get_flag("verbose") {
        "debug"
    } else if matches.get_flag("quiet") {
        "warn"
    } else {
        "info"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
}

fn main() -> Result<()> {
    let app = build_parser();
    let matches = app.get_matches();

    init_logging(&matches);

    match matches.subcommand() {
        //
        // SIMULATE PCR
        //
        Some((simulatepcr::cli::SIMULATE_PCR_CMD, matches)) => {
            simulatepcr::handlers::run_simulatepcr(matches)?;
        }

        _ => unreachable!("Subcommand not found"),
    };

    Ok(())
}
