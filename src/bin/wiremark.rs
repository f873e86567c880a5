//! Command-line interface for wiremark
//!
//! Usage:
//!   wiremark compile `<path>` [--format `<format>`] [--previous `<ast.json>`] [--config `<file>`]
//!   wiremark check `<path>` [--config `<file>`]   - print diagnostics, exit 1 on errors
//!   wiremark formats                              - list output formats
#[path = "wiremark/logging.rs"]
mod logging;

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use logging::{init_logging, LoggingConfig};
use wiremark::wiremark::config::{Loader, WiremarkConfig};
use wiremark::wiremark::error::ProcessingError;
use wiremark::wiremark::formats::diagnostics;
use wiremark::wiremark::pipeline::compile_with_options;
use wiremark::wiremark::processor::{
    available_formats, process_with_options, read_previous, read_source, ProcessOptions,
    ProcessingSpec,
};

/// Configuration file picked up from the working directory when `--config` is absent.
const LOCAL_CONFIG: &str = "wiremark.toml";

#[derive(Parser)]
#[command(name = "wiremark")]
#[command(version, about = "Compile Wiremark UI markup into a normalized AST")]
struct Cli {
    /// Log filter in env_logger syntax, e.g. `debug` or `wiremark=trace`
    #[arg(long, global = true)]
    log: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compile a document and print one rendering of it
    Compile {
        /// Path to the .wm file
        path: PathBuf,
        /// Output format (see `wiremark formats`)
        #[arg(long, short)]
        format: Option<String>,
        /// Previous ast-json output, for stable ids across edits
        #[arg(long)]
        previous: Option<PathBuf>,
        /// Configuration file layered over the defaults
        #[arg(long)]
        config: Option<PathBuf>,
        /// Single-line JSON
        #[arg(long)]
        compact: bool,
    },
    /// Print diagnostics; exit with status 1 when any is an error
    Check {
        path: PathBuf,
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// List available output formats
    Formats,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(LoggingConfig {
        env_filter: cli.log.clone(),
        ..LoggingConfig::default()
    });

    let outcome = match cli.command {
        Command::Compile {
            path,
            format,
            previous,
            config,
            compact,
        } => handle_compile_command(&path, format, previous.as_deref(), config.as_deref(), compact),
        Command::Check { path, config } => handle_check_command(&path, config.as_deref()),
        Command::Formats => {
            for name in available_formats() {
                println!("{}", name);
            }
            Ok(ExitCode::SUCCESS)
        }
    };

    outcome.unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        ExitCode::FAILURE
    })
}

fn load_config(path: Option<&Path>, format: Option<String>) -> Result<WiremarkConfig, ProcessingError> {
    let mut loader = match path {
        Some(path) => Loader::new().with_file(path),
        None => Loader::new().with_optional_file(LOCAL_CONFIG),
    };
    if let Some(format) = format {
        loader = loader.set_override("output.format", format)?;
    }
    Ok(loader.build()?)
}

fn handle_compile_command(
    path: &Path,
    format: Option<String>,
    previous: Option<&Path>,
    config: Option<&Path>,
    compact: bool,
) -> Result<ExitCode, ProcessingError> {
    let config = load_config(config, format)?;
    let spec = ProcessingSpec::from_string(&config.output.format)?;
    let source = read_source(path)?;
    let previous = previous.map(read_previous).transpose()?;

    let options = ProcessOptions {
        compile: config.compile_options(),
        pretty: config.output.pretty && !compact,
        path: Some(path.display().to_string()),
    };
    let output = process_with_options(&source, &spec, previous.as_ref(), &options)?;
    print!("{}", output);
    if !output.ends_with('\n') {
        println!();
    }
    Ok(ExitCode::SUCCESS)
}

fn handle_check_command(path: &Path, config: Option<&Path>) -> Result<ExitCode, ProcessingError> {
    let config = load_config(config, None)?;
    let source = read_source(path)?;
    let result = compile_with_options(&source, None, &config.compile_options());

    let display_path = path.display().to_string();
    print!("{}", diagnostics::to_simple_str(&result.errors, Some(&display_path)));

    if result.has_errors() {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}
