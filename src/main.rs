use anyhow::Context;
use clap::Parser;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use cwndplot::{process_file, CharmingRenderer, ProcessingStats, Schema};

/// Prefix a file name must carry to be treated as experiment input.
const LOG_PREFIX: &str = "log-";

/// Prefix substituted in for the chart produced from each log file.
const CHART_PREFIX: &str = "cwnd-";

#[derive(Parser)]
#[command(name = "cwndplot")]
#[command(about = "Render congestion-window graphs from transport experiment logs")]
#[command(version)]
struct Args {
    /// Directory holding the log files (only `log-*` files are read)
    #[arg(long = "logs", default_value = "metrics/logs")]
    logs_dir: PathBuf,

    /// Directory the charts are written to
    #[arg(long = "graphs", default_value = "metrics/graphs")]
    graphs_dir: PathBuf,

    /// Log line layout in use
    #[arg(long, value_enum, default_value = "multi")]
    schema: Schema,

    /// Debug mode - show per-file processing details
    #[arg(long)]
    debug: bool,
}

fn main() {
    let args = Args::parse();

    if let Err(e) = run(args) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    let log_files = discover_log_files(&args.logs_dir)?;

    std::fs::create_dir_all(&args.graphs_dir).with_context(|| {
        format!(
            "Failed to create graphs directory '{}'",
            args.graphs_dir.display()
        )
    })?;
    let renderer = CharmingRenderer::new(&args.graphs_dir);

    let mut totals = ProcessingStats::default();
    let mut files_processed = 0usize;

    for path in &log_files {
        let chart_name = chart_name_for(path);

        // One bad file never aborts the batch; the handle is dropped
        // before the next file is opened.
        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) => {
                eprintln!("cwndplot: failed to open '{}': {}", path.display(), e);
                continue;
            }
        };

        let stats = process_file(BufReader::new(file), args.schema, &renderer, &chart_name)?;
        files_processed += 1;

        if args.debug {
            eprintln!(
                "cwndplot: {}: {} lines, {} data, {} ack, {} skipped",
                path.display(),
                stats.lines_read,
                stats.data_events,
                stats.ack_events,
                stats.lines_skipped
            );
        }
        totals.merge(&stats);
    }

    if args.debug {
        eprintln!("Final statistics:");
        eprintln!("  Files processed: {}", files_processed);
        eprintln!("  Lines read: {}", totals.lines_read);
        eprintln!("  Data events: {}", totals.data_events);
        eprintln!("  Ack events: {}", totals.ack_events);
        eprintln!("  Lines skipped: {}", totals.lines_skipped);
        eprintln!("  Charts rendered: {}", totals.charts_rendered);
        eprintln!("  Render failures: {}", totals.render_failures);
    }

    Ok(())
}

/// List `log-*` regular files under `logs_dir`, sorted by name so the
/// batch order is deterministic.
fn discover_log_files(logs_dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(logs_dir).with_context(|| {
        format!("Failed to read logs directory '{}'", logs_dir.display())
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry?;
        let name = entry.file_name();
        let is_log = name.to_string_lossy().starts_with(LOG_PREFIX);
        if is_log && entry.file_type()?.is_file() {
            files.push(entry.path());
        }
    }
    files.sort();
    Ok(files)
}

/// `log-trial3.txt` becomes `cwnd-log-trial3`; the renderer appends its
/// own output extension.
fn chart_name_for(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    format!("{}{}", CHART_PREFIX, stem)
}
