mod debug_report;

use callscan::{ColumnNames, FactSet, Options, Table, explain, scan, write_outputs};
use clap::Parser;
use std::error::Error as _;
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Find greetings, introductions, company names and farewells in sales-call
/// dialogs.
#[derive(Debug, Parser)]
#[command(name = "callscan", version, about)]
struct Cli {
    /// CSV with dialogs (columns dlg_id, role, text)
    #[arg(long, value_name = "FILE", default_value = "test_data.csv")]
    input_file: PathBuf,

    /// Where the per-dialog results are written (JSON)
    #[arg(long, value_name = "FILE", default_value = "dialogs.json")]
    output_file: PathBuf,

    /// Where the input table extended with the event columns is written (CSV)
    #[arg(long, value_name = "FILE", default_value = "extended_test_data.csv")]
    extended_file: PathBuf,

    /// Manager utterances searched at the start of each dialog
    #[arg(long, default_value_t = callscan::DEFAULT_FIRST_ROWS)]
    n_first: usize,

    /// Manager utterances searched at the end of each dialog
    #[arg(long, default_value_t = callscan::DEFAULT_LAST_ROWS)]
    n_last: usize,

    /// Worker threads (default: available parallelism)
    #[arg(long)]
    n_jobs: Option<usize>,

    /// Exchange the manager and client labels before scanning
    #[arg(long, default_value_t = false)]
    swap_roles: bool,

    /// Print the rule engine trace for one utterance instead of scanning a file
    #[arg(long, value_name = "TEXT", conflicts_with = "swap_roles")]
    explain: Option<String>,

    /// Force ANSI color in the explain report
    #[arg(long, conflicts_with = "no_color")]
    color: bool,

    /// Disable ANSI color in the explain report
    #[arg(long)]
    no_color: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("callscan=info")))
        .with_writer(io::stderr)
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    let outcome = match &cli.explain {
        Some(text) => run_explain(&cli, text),
        None => run_scan(&cli),
    };

    if let Err(err) = outcome {
        error!("{err}");
        let mut source = std::error::Error::source(&err);
        while let Some(cause) = source {
            error!("  caused by: {cause}");
            source = cause.source();
        }
        std::process::exit(1);
    }
}

fn run_explain(cli: &Cli, text: &str) -> callscan::Result<()> {
    let color = if cli.color {
        true
    } else if cli.no_color {
        false
    } else {
        io::stdout().is_terminal()
    };
    let details = explain(text, FactSet::all())?;
    debug_report::print_explain(&details, color);
    Ok(())
}

fn run_scan(cli: &Cli) -> callscan::Result<()> {
    info!(input = %cli.input_file.display(), "loading dialogs");
    let mut table = Table::from_path(&cli.input_file, &ColumnNames::default())?;
    if cli.swap_roles {
        table.swap_roles();
        info!("manager and client labels swapped");
    }

    let options = Options { n_first_rows: cli.n_first, n_last_rows: cli.n_last, workers: cli.n_jobs };
    let out = scan(&table, &options)?;

    write_outputs(&cli.output_file, &out.run.results, &cli.extended_file, &out.extended)?;

    let greet_and_bye = out.run.results.iter().filter(|r| r.greet_and_bye).count();
    info!(
        dialogs = out.run.results.len(),
        greet_and_bye,
        engine_calls = out.run.stats.engine_calls,
        workers = out.run.workers,
        elapsed = ?out.run.elapsed,
        results = %cli.output_file.display(),
        extended = %cli.extended_file.display(),
        "scan complete"
    );
    Ok(())
}
