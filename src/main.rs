//! notihist - Android notification history extractor
//!
//! Usage:
//!   notihist --input ./extraction --output ./reports
//!   notihist --input ./extraction --output ./reports --formats tsv,timeline --threads 4
//!   notihist --input ./extraction --json

use clap::Parser;
use notihist::config::{parse_formats, ExtractorConfig, ReportConfig};
use notihist::report::ReportWriter;
use notihist::sources::ArtifactScanner;
use notihist::Extractor;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "notihist")]
#[command(about = "Extract Android notification history artifacts into reports")]
struct Args {
    /// Root of the extracted data partition
    #[arg(short, long)]
    input: PathBuf,

    /// Directory the reports are written to
    #[arg(short, long, default_value = "./reports")]
    output: PathBuf,

    /// Report formats (comma-separated): html, tsv, timeline
    #[arg(short, long, default_value = "html,tsv,timeline")]
    formats: String,

    /// Worker threads for decoding history files
    #[arg(short, long, default_value = "1")]
    threads: usize,

    /// Print the extraction as JSON instead of writing reports
    #[arg(long)]
    json: bool,
}

fn run(args: Args) -> notihist::Result<()> {
    let report_config =
        ReportConfig { output_dir: args.output, formats: parse_formats(&args.formats)? };
    let extractor_config =
        ExtractorConfig { worker_threads: args.threads.max(1), ..ExtractorConfig::default() };

    let scanner = ArtifactScanner::new(&args.input);
    let files = scanner.scan()?;
    if !args.json {
        println!("Scanning {}: {} artifact files", scanner.root().display(), files.len());
    }

    let report = Extractor::new(extractor_config).run(&files);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let written = ReportWriter::new(report_config).write_all(&report)?;

    println!();
    println!("Notifications:          {}", report.notifications.len());
    println!("Status rows:            {}", report.statuses.len());
    println!("Snoozed notifications:  {}", report.snoozed.len());
    println!("Skipped files:          {}", report.skipped.len());
    for skipped in &report.skipped {
        println!("  - {}: {}", skipped.path, skipped.reason);
    }
    println!();
    for path in &written {
        println!("Wrote {}", path.display());
    }

    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
