//! baku - Fast manga backup converter

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use baku::{Diagnostics, Format, SourceRegistry, convert};

#[derive(Parser)]
#[command(name = "baku")]
#[command(version, about = "Fast manga backup converter", long_about = None)]
#[command(after_help = "EXAMPLES:
    baku backup.bk.zip backup.tachibk    Convert Kotatsu to Mihon
    baku backup.tachibk backup.bk.zip    Convert Mihon to Kotatsu
    baku -i backup.tachibk               Show backup contents")]
struct Cli {
    /// Input file (Kotatsu .bk.zip or Mihon .tachibk)
    #[arg(value_name = "INPUT")]
    input: String,

    /// Output file; format inferred from the extension
    #[arg(value_name = "OUTPUT", required_unless_present = "info")]
    output: Option<String>,

    /// Show backup contents without converting
    #[arg(short, long)]
    info: bool,

    /// Suppress warning output
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.quiet { "baku=error" } else { "baku=warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false).without_time())
        .init();

    // clap enforces output's presence when --info is not given.
    let result = match (cli.info, cli.output) {
        (true, _) => show_info(&cli.input),
        (false, Some(output)) => run_convert(&cli.input, &output, cli.quiet),
        (false, None) => Err("output path required".to_string()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn show_info(path: &str) -> Result<(), String> {
    let bytes = std::fs::read(path).map_err(|e| e.to_string())?;
    let format = detect(path, &bytes)?;

    let registry = SourceRegistry::new();
    let mut diag = Diagnostics::new();
    let backup = format
        .read(&bytes, &registry, &mut diag)
        .map_err(|e| e.to_string())?;

    println!("File: {path}");
    println!("Format: {}", format.name());
    println!("Manga: {}", backup.manga.len());
    println!("Categories: {}", backup.categories.len());
    println!("History entries: {}", backup.history_len());
    if !diag.is_empty() {
        println!("Warnings: {}", diag.len());
    }

    Ok(())
}

fn run_convert(input: &str, output: &str, quiet: bool) -> Result<(), String> {
    let bytes = std::fs::read(input).map_err(|e| e.to_string())?;
    let from = detect(input, &bytes)?;
    let to = Format::from_path(output).unwrap_or_else(|| from.counterpart());

    let registry = SourceRegistry::new();
    let result = convert(&bytes, from, to, &registry).map_err(|e| e.to_string())?;

    std::fs::write(output, &result.bytes).map_err(|e| e.to_string())?;

    // Individual warnings were already rendered by the tracing layer as
    // they were raised.
    if !quiet {
        println!(
            "Converted {} manga, {} categories, {} history entries ({} -> {})",
            result.manga,
            result.categories,
            result.history,
            from.name(),
            to.name()
        );
        if !result.verification.is_verified() {
            eprintln!("warning: output verification: {:?}", result.verification);
        }
    }

    Ok(())
}

/// Prefer content sniffing over the file extension; extensions lie.
fn detect(path: &str, bytes: &[u8]) -> Result<Format, String> {
    Format::sniff(bytes)
        .or_else(|| Format::from_path(path))
        .ok_or_else(|| format!("unrecognized backup format: {path}"))
}
