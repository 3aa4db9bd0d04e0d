use clap::Parser;
use harmonizer_core::cli::{default_output_path, Cli, Command, OutputFormat};
use harmonizer_core::{ErrorResponse, Harmonizer, Result, TextReport};
use log::error;
use serde::Serialize;
use std::process;

fn main() {
    let cli = Cli::parse();

    // Setup logging
    setup_logging(cli.verbose);

    if let Err(e) = run(&cli) {
        error!("Error processing DICOM file: {}", e);
        match cli.format {
            OutputFormat::Json => print_json(&ErrorResponse::from(&e)),
            OutputFormat::Text => eprintln!("Error: {}", e),
        }
        process::exit(1);
    }
}

fn setup_logging(verbose: bool) {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    let harmonizer = Harmonizer::from_config(cli.config())?.with_code_table(cli.code_table()?);

    match &cli.command {
        Command::Analyze { file } => {
            let bytes = std::fs::read(file)?;
            let analysis = harmonizer.analyze(&bytes)?;

            match cli.format {
                OutputFormat::Json => print_json(&analysis),
                OutputFormat::Text => println!("{}", TextReport::new(&analysis)),
            }
        }
        Command::Harmonize { file, output } => {
            let bytes = std::fs::read(file)?;
            let outcome = harmonizer.harmonize(&bytes)?;

            let output = output.clone().unwrap_or_else(|| default_output_path(file));
            std::fs::write(&output, &outcome.bytes)?;

            match cli.format {
                OutputFormat::Json => print_json(&outcome.response()),
                OutputFormat::Text => {
                    let scheme = &harmonizer.config().coding_scheme;
                    let report = TextReport::new(&outcome.analysis)
                        .with_code(&outcome.code, scheme)
                        .with_output(&output);
                    println!("{}", report);
                }
            }
        }
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            error!("Failed to serialize to JSON: {}", e);
            eprintln!("Error: Failed to serialize to JSON: {}", e);
            process::exit(1);
        }
    }
}
