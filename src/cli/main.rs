//! tabx: convert and validate tabular clipboard text

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use table_interchange::cli::commands::{handle_convert, handle_validate};
use table_interchange::cli::output::{format_report, format_summary};
use table_interchange::cli::{CliError, TextFormat};
use table_interchange::config::TransferOptions;
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser)]
#[command(name = "tabx")]
#[command(about = "Convert and validate tabular clipboard text", long_about = None)]
struct Cli {
    /// TOML file with transfer options
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Input has no header line
    #[arg(long, global = true)]
    no_header: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Re-encode table text in another layout
    Convert {
        /// Input file, or - for stdin
        input: String,

        /// Columns as key[:type][=Title], comma separated
        #[arg(short, long)]
        columns: String,

        #[arg(long, value_enum, default_value = "tsv")]
        from: TextFormat,

        #[arg(long, value_enum, default_value = "json")]
        to: TextFormat,
    },

    /// Check table text against column types and required keys
    Validate {
        /// Input file, or - for stdin
        input: String,

        /// Columns as key[:type][=Title], comma separated
        #[arg(short, long)]
        columns: String,

        /// Column key that must not be blank (repeatable)
        #[arg(long = "required")]
        required: Vec<String>,

        #[arg(long, value_enum, default_value = "tsv")]
        from: TextFormat,
    },
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_options(cli: &Cli) -> Result<TransferOptions, CliError> {
    let mut options = match &cli.config {
        Some(path) => TransferOptions::load(path)?,
        None => TransferOptions::default(),
    };
    if cli.no_header {
        options.include_header = false;
    }
    Ok(options)
}

async fn run(cli: Cli) -> Result<bool, CliError> {
    let options = load_options(&cli)?;

    match cli.command {
        Commands::Convert {
            input,
            columns,
            from,
            to,
        } => {
            let output = handle_convert(&input, &columns, from, to, &options).await?;
            println!("{}", output);
            Ok(true)
        }
        Commands::Validate {
            input,
            columns,
            required,
            from,
        } => {
            let pasted = handle_validate(&input, &columns, &required, from, &options).await?;
            println!("{}", format_report(&pasted.report)?);
            eprintln!(
                "{}",
                format_summary(&pasted.report, pasted.snapshot.row_count())
            );
            Ok(pasted.report.valid)
        }
    }
}

fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();

    let runtime = match tokio::runtime::Builder::new_current_thread().build() {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Error: failed to start runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(cli)) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(2)
        }
    }
}
