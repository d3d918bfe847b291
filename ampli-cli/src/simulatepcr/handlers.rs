use std::path::Path;

use anyhow::{Context, Result, bail};
use clap::ArgMatches;
use indicatif::ProgressBar;
use log::{info, warn};

use ampli_core::fasta::load_templates;
use ampli_core::io::AmpliconWriter;
use ampli_core::utils::{STD_STREAM, get_dynamic_reader_w_stdin};
use ampli_pcr::{
    MaxProductLength, PcrOptions, Primer, PrimerSet, default_concurrency, read_primers,
    simulate_pcr, simulate_pcr_sorted,
};

use super::cli::DEFAULT_OUT;
use super::config::SimulatePcrConfig;

/// Merge the config file (if any) with the command line flags.
fn resolve_config(matches: &ArgMatches) -> Result<SimulatePcrConfig> {
    let mut config = match matches.get_one::<String>("config") {
        Some(path) => SimulatePcrConfig::from_file(Path::new(path))?,
        None => SimulatePcrConfig::default(),
    };

    if let Some(path) = matches.get_one::<String>("primer-file") {
        let reader = get_dynamic_reader_w_stdin(path)?;
        let primers =
            read_primers(reader).with_context(|| format!("Failed to read primer file: {}", path))?;
        config.primers.extend(primers);
    }

    let flag_values = |id: &str| -> Vec<String> {
        matches
            .get_many::<String>(id)
            .map(|values| values.cloned().collect())
            .unwrap_or_default()
    };
    config.primers.extend(flag_values("primer"));
    config.forward_primers.extend(flag_values("forward-primer"));
    config.reverse_primers.extend(flag_values("reverse-primer"));

    if let Some(max_length) = matches.get_one::<usize>("max-length") {
        config.max_length = *max_length;
    }
    if let Some(capacity) = matches.get_one::<usize>("channel-capacity") {
        config.channel_capacity = *capacity;
    }
    if let Some(threads) = matches.get_one::<usize>("threads") {
        config.threads = *threads;
    }
    config.ignore_case |= matches.get_flag("ignore-case");
    config.sort |= matches.get_flag("sort");

    Ok(config)
}

fn build_primer_set(config: &SimulatePcrConfig) -> Result<PrimerSet> {
    if !config.has_primers() {
        bail!("No primers supplied: at least one --primer is required");
    }

    let primers = config
        .primers
        .iter()
        .map(Primer::any)
        .chain(config.forward_primers.iter().map(Primer::forward))
        .chain(config.reverse_primers.iter().map(Primer::reverse))
        .collect();

    let primers = PrimerSet::new(primers).context("Invalid primer set")?;
    Ok(match config.ignore_case {
        true => primers.to_uppercase(),
        false => primers,
    })
}

/// Matches items from CLAP args before running the PCR simulation
pub fn run_simulatepcr(matches: &ArgMatches) -> Result<()> {
    let template_path = matches
        .get_one::<String>("template")
        .context("A path to a template FASTA file is required.")?;

    let default_out = DEFAULT_OUT.to_string();
    let output = matches.get_one::<String>("output").unwrap_or(&default_out);

    // configuration problems are reported before anything is read
    let config = resolve_config(matches)?;
    let primers = build_primer_set(&config)?;
    info!("Using {} primer(s)", primers.len());

    let templates = load_templates(template_path)
        .with_context(|| format!("Failed to load templates from {}", template_path))?;
    let templates = match config.ignore_case {
        true => templates.to_uppercase(),
        false => templates,
    };

    let progress = matches
        .get_flag("progress")
        .then(|| ProgressBar::new(templates.len() as u64));

    let options = PcrOptions {
        max_product_length: MaxProductLength::from_raw(config.max_length),
        channel_capacity: config.channel_capacity,
        max_concurrent_templates: Some(template_concurrency(config.threads)),
        progress: progress.clone(),
        ..PcrOptions::default()
    };

    let mut writer = AmpliconWriter::create(output)
        .with_context(|| format!("Failed to create output file: {}", output))?;

    let result = match config.sort {
        true => simulate_pcr_sorted(&templates, &primers, &options)
            .map_err(anyhow::Error::from)
            .and_then(|(amplicons, _)| {
                for amplicon in &amplicons {
                    writer.write_amplicon(amplicon)?;
                }
                Ok(())
            }),
        false => simulate_pcr(&templates, &primers, &options, |amplicon| {
            writer.write_amplicon(&amplicon)
        })
        .map(|_| ())
        .map_err(anyhow::Error::from),
    };

    if let Some(bar) = progress {
        bar.finish_and_clear();
    }

    let written = result.and_then(|()| writer.finish().map_err(anyhow::Error::from));
    let written = match written {
        Ok(count) => count,
        Err(err) => {
            discard_partial_output(output);
            return Err(err).context("PCR simulation failed");
        }
    };

    if written == 0 {
        warn!("No PCR products found; {} is empty", display_output(output));
    } else {
        info!("Wrote {} PCR product(s) to {}", written, display_output(output));
    }

    Ok(())
}

/// `--threads 0` means one template per available core.
fn template_concurrency(threads: usize) -> usize {
    match threads {
        0 => default_concurrency(),
        n => n,
    }
}

fn display_output(output: &str) -> &str {
    match output {
        STD_STREAM => "stdout",
        path => path,
    }
}

/// Remove an output file left behind by a failed run.
fn discard_partial_output(output: &str) {
    if output == STD_STREAM {
        return;
    }
    if let Err(err) = std::fs::remove_file(output) {
        warn!("Could not remove partial output {}: {}", output, err);
    }
}
