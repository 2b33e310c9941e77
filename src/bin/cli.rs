use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use sigscan::config::Config;
use sigscan::output::OutputFormat;
use sigscan::ScanOptions;

#[derive(Parser)]
#[command(
    name = "sigscan",
    about = "Scan a file against a YARA rule corpus",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan a file with every rule in the rules directory
    Scan {
        /// Path to the file to scan
        file: PathBuf,

        /// Rules directory (overrides the config file)
        #[arg(long, short = 'r')]
        rules: Option<PathBuf>,

        /// Config file path
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,

        /// Output format (console, json)
        #[arg(long, short = 'f', default_value = "console")]
        format: String,

        /// Write output to file instead of stdout
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Generate a starter .sigscan.toml config file
    Init {
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Scan {
            file,
            rules,
            config,
            format,
            output,
        } => cmd_scan(file, rules, config, format, output),
        Commands::Init { force } => cmd_init(force),
    };

    match result {
        Ok(exit_code) => process::exit(exit_code),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(e.exit_code());
        }
    }
}

fn cmd_scan(
    file: PathBuf,
    rules: Option<PathBuf>,
    config: Option<PathBuf>,
    format_str: String,
    output_path: Option<PathBuf>,
) -> Result<i32, sigscan::error::SigscanError> {
    let format = OutputFormat::from_str_lenient(&format_str).unwrap_or_else(|| {
        eprintln!("Warning: unknown format '{}', using console", format_str);
        OutputFormat::Console
    });

    let options = ScanOptions {
        config_path: config,
        rules_dir: rules,
        format,
    };

    let report = sigscan::scan(&file, &options)?;
    let rendered = sigscan::render_report(&report, options.format)?;

    match output_path {
        Some(out) => std::fs::write(&out, &rendered)?,
        None => print!("{}", rendered),
    }

    // Exit code: 0 = clean, 100 = detections present.
    Ok(report.exit_code())
}

fn cmd_init(force: bool) -> Result<i32, sigscan::error::SigscanError> {
    let path = PathBuf::from(".sigscan.toml");

    if path.exists() && !force {
        eprintln!(".sigscan.toml already exists. Use --force to overwrite.");
        return Ok(1);
    }

    std::fs::write(&path, Config::starter_toml())?;
    println!("Created .sigscan.toml");

    Ok(0)
}
