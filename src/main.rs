//! sarek-steps CLI Entry Point
//!
//! Prints the command line for a Sarek step described in a definition file,
//! and optionally the report files that step produces for a sample.
//!
//! # Usage
//!
//! ```bash
//! # Print the command line
//! sarek-steps germline.yaml
//!
//! # Also list the reports of an analyzed sample
//! sarek-steps preprocessing.yaml --reports /proj/analysis/SAREK --sample P100_1001
//! ```

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use log::{error, info};

use sarek_steps::workflow::load_step_definition;
use sarek_steps::{SampleDirectory, APP_NAME, VERSION};

/// Command-line configuration parsed from arguments.
#[derive(Debug, Default)]
struct Config {
    definition_path: Option<String>,
    analysis_dir: Option<PathBuf>,
    sampleid: Option<String>,
    verbose: bool,
}

/// Configures the logging system with appropriate formatting.
fn setup_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format(|buf, record| {
            use std::io::Write;

            match record.level() {
                log::Level::Warn | log::Level::Error => {
                    writeln!(buf, "[{}] {}", record.level(), record.args())
                }
                _ => writeln!(buf, "{}", record.args()),
            }
        })
        .target(env_logger::Target::Stderr)
        .init();
}

/// Prints usage information.
fn print_usage() {
    println!("Usage: {} [OPTIONS] <STEP_FILE>", APP_NAME);
    println!();
    println!("Arguments:");
    println!("  <STEP_FILE>         Step definition (YAML, or JSON with .json extension)");
    println!();
    println!("Options:");
    println!("  --reports DIR       List report files for a sample analyzed under DIR");
    println!("  --sample ID         Sample id used with --reports");
    println!("  --verbose           Enable debug logging");
    println!("  --help              Show this help message");
    println!("  --version           Show version information");
}

/// Parses command-line arguments into a Config struct.
fn parse_arguments(args: &[String]) -> Result<Config, String> {
    let mut config = Config::default();
    let mut i = 1; // Skip program name

    while i < args.len() {
        let arg = &args[i];

        match arg.as_str() {
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            "--version" | "-V" => {
                println!("{} {}", APP_NAME, VERSION);
                std::process::exit(0);
            }
            "--verbose" | "-v" => {
                config.verbose = true;
            }
            "--reports" => {
                i += 1;
                let dir = args
                    .get(i)
                    .ok_or("--reports requires a directory argument")?;
                config.analysis_dir = Some(PathBuf::from(dir));
            }
            "--sample" => {
                i += 1;
                let id = args.get(i).ok_or("--sample requires a sample id")?;
                config.sampleid = Some(id.clone());
            }
            arg if arg.starts_with('-') => {
                return Err(format!("Unknown option: {}", arg));
            }
            _ => {
                if config.definition_path.is_some() {
                    return Err(format!("Unexpected argument: {}", arg));
                }
                config.definition_path = Some(arg.clone());
            }
        }
        i += 1;
    }

    if config.definition_path.is_none() {
        return Err("Missing step definition file".to_string());
    }
    if config.analysis_dir.is_some() != config.sampleid.is_some() {
        return Err("--reports and --sample must be given together".to_string());
    }

    Ok(config)
}

/// Main application entry point.
fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let config = parse_arguments(&args).map_err(|e| {
        eprintln!("Error: {}", e);
        eprintln!();
        print_usage();
        e
    })?;

    setup_logging(config.verbose);

    let definition_path = config.definition_path.unwrap_or_default();
    let definition = load_step_definition(&definition_path).map_err(|e| {
        error!("Failed to load step definition: {}", e);
        e
    })?;

    let step = definition.build();
    println!("{}", step.build_command_line()?);

    if let (Some(dir), Some(sampleid)) = (config.analysis_dir, config.sampleid) {
        let sample = SampleDirectory::new(sampleid, dir);
        let reports = step.report_files(&sample)?;
        if reports.is_empty() {
            info!("Step '{}' produces no report files", definition.step);
        }
        for report in reports {
            println!("{}\t{}", report.parser, report.path.display());
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
