use clap::{Arg, ArgAction, ArgGroup, Command, arg, value_parser};

pub use ampli_pcr::consts::*;

pub fn create_simulatepcr_cli() -> Command {
    Command::new(SIMULATE_PCR_CMD)
        .author("Databio")
        .about("Predict every PCR product of a primer set on a template genome and write them as bed.")
        .arg_required_else_help(true)
        .arg(
            Arg::new("template")
                .required(true)
                .help("Template FASTA file (.fa or .fa.gz), '-' for stdin"),
        )
        .arg(
            Arg::new("output")
                .default_value(DEFAULT_OUT)
                .help("Output bed file, '-' for stdout. A .gz extension compresses the output"),
        )
        .arg(
            arg!(-p --primer <PRIMER> "Primer that may bind either strand (repeatable)")
                .action(ArgAction::Append),
        )
        .arg(
            arg!(--"forward-primer" <PRIMER> "Primer that only binds the plus strand (repeatable)")
                .action(ArgAction::Append),
        )
        .arg(
            arg!(--"reverse-primer" <PRIMER> "Primer that only binds the minus strand (repeatable)")
                .action(ArgAction::Append),
        )
        .arg(arg!(--"primer-file" <FILE> "File with one primer per line, or primers as FASTA records"))
        .arg(
            arg!(-m --"max-length" <LENGTH> "Maximum product length, 0 for no limit")
                .value_parser(value_parser!(usize)),
        )
        .arg(
            arg!(--"ignore-case" "Uppercase templates and primers before searching")
                .action(ArgAction::SetTrue),
        )
        .arg(
            arg!(--sort "Sort products by chromosome and position before writing")
                .action(ArgAction::SetTrue),
        )
        .arg(
            arg!(--"channel-capacity" <SIZE> "Capacity of the internal site and product queues")
                .value_parser(value_parser!(usize)),
        )
        .arg(
            arg!(-t --threads <COUNT> "Templates processed at once, 0 for one per available core")
                .value_parser(value_parser!(usize)),
        )
        .arg(arg!(--progress "Show a progress bar over templates").action(ArgAction::SetTrue))
        .arg(arg!(-c --config <FILE> "TOML file with default settings and primers"))
        .group(
            ArgGroup::new("primers")
                .args(["primer", "forward-primer", "reverse-primer", "primer-file", "config"])
                .multiple(true)
                .required(true),
        )
}
