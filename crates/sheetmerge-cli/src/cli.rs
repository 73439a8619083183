use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use serde::Serialize;
use sheetmerge_core::{
    merge, FillPolicy, MatchStats, MergeError, MergeSpec, OutputMode, OutputWorkbook, TableSide,
};
use sheetmerge_io::{write_workbook, SheetStore, SheetStoreError};
use sheetmerge_model::{SheetSelector, Table};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// Copy a column from File A into File B wherever the key columns match.
///
/// Keys are compared after trimming whitespace and case folding. When a key
/// appears more than once in File A, the first row with a non-empty value wins.
#[derive(Debug, Parser)]
#[command(
    name = "sheetmerge",
    about = "Compare a key column between two workbook sheets and copy a source column from File A into a target column in File B where keys match (VLOOKUP-like)."
)]
pub struct Args {
    /// Source workbook (File A).
    #[arg(long = "file-a", value_name = "PATH")]
    file_a: PathBuf,

    /// Sheet name or 0-based index in File A.
    #[arg(long = "sheet-a", value_name = "SHEET", default_value = "0")]
    sheet_a: SheetSelector,

    /// Key column in File A (to match).
    #[arg(long = "key-a", value_name = "COLUMN")]
    key_a: String,

    /// Column in File A to copy when matched.
    #[arg(long = "source-a", value_name = "COLUMN")]
    source_a: String,

    /// Destination workbook (File B).
    #[arg(long = "file-b", value_name = "PATH")]
    file_b: PathBuf,

    /// Sheet name or 0-based index in File B.
    #[arg(long = "sheet-b", value_name = "SHEET", default_value = "0")]
    sheet_b: SheetSelector,

    /// Key column in File B (to look up).
    #[arg(long = "key-b", value_name = "COLUMN")]
    key_b: String,

    /// Target column to populate in File B (created if missing).
    #[arg(long = "target-b", value_name = "COLUMN")]
    target_b: String,

    /// Output `.xlsx` path.
    #[arg(long, value_name = "PATH")]
    output: PathBuf,

    /// Only fill blank target cells instead of overwriting.
    ///
    /// Without this flag every target cell is replaced, and rows whose key has
    /// no match in File A are cleared even if they held a value.
    #[arg(long = "only-fill-empty")]
    only_fill_empty: bool,

    /// Copy every sheet of File B into the output and replace only `--sheet-b`.
    #[arg(long = "copy-all-sheets")]
    copy_all_sheets: bool,

    /// Summary format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Increase log verbosity (`-v` info, `-vv` debug). `RUST_LOG` takes precedence.
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Args {
    fn fill_policy(&self) -> FillPolicy {
        if self.only_fill_empty {
            FillPolicy::FillEmptyOnly
        } else {
            FillPolicy::Overwrite
        }
    }

    fn output_mode(&self) -> OutputMode {
        if self.copy_all_sheets {
            OutputMode::AllSheets
        } else {
            OutputMode::SingleSheet
        }
    }

    fn merge_spec(&self) -> MergeSpec {
        MergeSpec::new(&self.key_a, &self.source_a, &self.key_b, &self.target_b)
    }
}

#[derive(Debug, Serialize)]
struct JsonSummary<'a> {
    matched: usize,
    total: usize,
    output: &'a str,
    policy: FillPolicy,
    mode: OutputMode,
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);
    run_with_args(args)
}

pub fn run_with_args(args: Args) -> Result<()> {
    let stats = execute(&args)?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    match write_summary(&mut handle, &args, stats) {
        // Downstream consumers closing the pipe early (e.g. `| head`) is not a failure.
        Err(err) if err.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        other => other.context("write summary"),
    }
}

fn init_logging(verbose: u8) {
    let default_filter = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .try_init();
}

fn execute(args: &Args) -> Result<MatchStats> {
    // Both inputs are checked before either is parsed.
    ensure_exists(&args.file_a, "File A")?;
    ensure_exists(&args.file_b, "File B")?;

    let source = {
        let mut store = open_store(&args.file_a, "File A")?;
        let sheet = store.resolve(&args.sheet_a)?;
        store.read_table(&sheet)?
    };

    let mut dest_store = open_store(&args.file_b, "File B")?;
    let dest_sheet = dest_store.resolve(&args.sheet_b)?;
    let dest = dest_store.read_table(&dest_sheet)?;

    let spec = args.merge_spec();
    let policy = args.fill_policy();
    let result = merge(&source, &dest, &spec, policy).map_err(|err| {
        let path = match &err {
            MergeError::ColumnNotFound {
                side: TableSide::Source,
                ..
            } => &args.file_a,
            _ => &args.file_b,
        };
        anyhow::Error::new(err).context(format!("cannot merge using {}", path.display()))
    })?;
    log::info!(
        "matched {}/{} rows ({policy:?})",
        result.stats.matched,
        result.stats.total
    );

    let output = match args.output_mode() {
        OutputMode::SingleSheet => OutputWorkbook::single(&args.sheet_b, &dest_sheet, result.table),
        OutputMode::AllSheets => {
            let sheets: Vec<(String, Table)> = dest_store.read_all()?;
            OutputWorkbook::all_sheets(sheets, &dest_sheet, result.table)?
        }
    };
    drop(dest_store);

    write_workbook(&args.output, &output)
        .with_context(|| format!("write output {}", args.output.display()))?;

    Ok(result.stats)
}

fn ensure_exists(path: &Path, label: &str) -> Result<()> {
    if path.is_file() {
        return Ok(());
    }
    Err(SheetStoreError::FileNotFound {
        path: path.to_path_buf(),
    })
    .with_context(|| format!("{label} not found: {}", path.display()))
}

fn open_store(path: &Path, label: &str) -> Result<SheetStore> {
    SheetStore::open(path).with_context(|| format!("open {label} ({})", path.display()))
}

fn write_summary(out: &mut impl Write, args: &Args, stats: MatchStats) -> io::Result<()> {
    match args.format {
        OutputFormat::Text => {
            writeln!(
                out,
                "Matched {}/{} rows in B based on key comparison.",
                stats.matched, stats.total
            )?;
            writeln!(out, "Done. Wrote: {}", args.output.display())
        }
        OutputFormat::Json => {
            let output = args.output.to_string_lossy();
            let summary = JsonSummary {
                matched: stats.matched,
                total: stats.total,
                output: &output,
                policy: args.fill_policy(),
                mode: args.output_mode(),
            };
            serde_json::to_writer(&mut *out, &summary)?;
            out.write_all(b"\n")
        }
    }
}
