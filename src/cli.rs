//! Command-line interface for cpcheck.

use clap::{Parser, Subcommand, ValueEnum};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::config::{self, Config};
use crate::detect::{CodeUnit, ScanResult, Scanner, Severity};
use crate::report::{self, Format};
use crate::serve;

/// Exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILED: i32 = 1;
pub const EXIT_ERROR: i32 = 2;

/// Source file extensions picked up when scanning a directory.
const SOURCE_EXTENSIONS: &[&str] = &["abap"];

/// Unit type tag for units read from plain source files.
const FILE_UNIT_TYPE: &str = "PROG";

/// Flag TRANSLATE statements that use the obsolete CODE PAGE option.
///
/// cpcheck scans ABAP code units for TRANSLATE ... CODE PAGE statements and
/// reports obsolete options, legacy CP1/CP2 pages, missing FROM/TO
/// directions, and conversions on likely non-character data.
#[derive(Parser)]
#[command(name = "cpcheck")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Show debug logging
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to config YAML file (default: auto-discover)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scan a JSON batch of code units, a source file, or a directory
    #[command(visible_alias = "check")]
    Scan(ScanArgs),
    /// Serve the scanner over HTTP
    Serve(ServeArgs),
    /// Write a default config file
    Init(InitArgs),
}

/// Minimum severity that makes `scan` exit non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FailOn {
    Warning,
    Info,
    Never,
}

impl FailOn {
    fn threshold(self) -> Option<Severity> {
        match self {
            FailOn::Warning => Some(Severity::Warning),
            FailOn::Info => Some(Severity::Info),
            FailOn::Never => None,
        }
    }
}

/// Arguments for the scan command.
#[derive(Parser)]
pub struct ScanArgs {
    /// JSON units file, `.abap` file, directory, or `-` for JSON on stdin
    pub path: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "pretty")]
    pub format: Format,

    /// Exit non-zero when a finding reaches this severity
    #[arg(long, value_enum, default_value = "warning")]
    pub fail_on: FailOn,

    /// Context characters around each snippet (overrides config)
    #[arg(long)]
    pub context: Option<usize>,
}

/// Arguments for the serve command.
#[derive(Parser)]
pub struct ServeArgs {
    /// Address to listen on (overrides config)
    #[arg(short, long)]
    pub listen: Option<String>,
}

/// Arguments for the init command.
#[derive(Parser)]
pub struct InitArgs {
    /// Output file path
    #[arg(short, long, default_value = "cpcheck.yaml")]
    pub output: PathBuf,
}

/// Load config from `--config` or the current directory.
pub fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let config = Config::load(cli.config.as_deref(), Path::new("."))?;
    Ok(config)
}

/// Read code units from `path`.
///
/// A `.json` file or `-` holds an array of units. Any other file becomes a
/// single unit; a directory contributes one unit per source file.
pub fn collect_units(path: &Path) -> anyhow::Result<Vec<CodeUnit>> {
    if path == Path::new("-") {
        let mut input = String::new();
        std::io::stdin().read_to_string(&mut input)?;
        return parse_units(&input, "stdin");
    }

    let metadata = std::fs::metadata(path)
        .map_err(|e| anyhow::anyhow!("cannot access path {:?}: {}", path, e))?;

    if metadata.is_dir() {
        return collect_source_dir(path);
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("reading {}: {}", path.display(), e))?;

    if path.extension().and_then(|e| e.to_str()) == Some("json") {
        parse_units(&content, &path.display().to_string())
    } else {
        Ok(vec![unit_from_source(path, content)])
    }
}

fn parse_units(input: &str, origin: &str) -> anyhow::Result<Vec<CodeUnit>> {
    serde_json::from_str(input)
        .map_err(|e| anyhow::anyhow!("parsing units from {}: {}", origin, e))
}

fn collect_source_dir(root: &Path) -> anyhow::Result<Vec<CodeUnit>> {
    let mut units = Vec::new();

    for entry in WalkDir::new(root)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| {
            // Skip hidden directories
            let hidden = e.file_name().to_string_lossy().starts_with('.');
            !(e.depth() > 0 && e.file_type().is_dir() && hidden)
        })
    {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();
        if !SOURCE_EXTENSIONS.contains(&ext.as_str()) {
            continue;
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("reading {}: {}", path.display(), e))?;
        units.push(unit_from_source(path, content));
    }

    Ok(units)
}

/// Build a unit from a source file; the file stem names program and include.
fn unit_from_source(path: &Path, content: String) -> CodeUnit {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_uppercase())
        .unwrap_or_default();
    let lines = content.lines().count() as i64;

    let mut unit = CodeUnit::new(stem.clone(), stem, FILE_UNIT_TYPE, content);
    unit.start_line = Some(if lines > 0 { 1 } else { 0 });
    unit.end_line = Some(lines);
    unit
}

/// Exit code for `results` under the given failure threshold.
pub fn exit_code_for(results: &[ScanResult], fail_on: FailOn) -> i32 {
    let Some(threshold) = fail_on.threshold() else {
        return EXIT_SUCCESS;
    };
    let failed = results
        .iter()
        .filter_map(ScanResult::max_severity)
        .any(|s| s >= threshold);
    if failed {
        EXIT_FAILED
    } else {
        EXIT_SUCCESS
    }
}

/// Run the scan command.
pub fn run_scan(args: &ScanArgs, config: &Config) -> anyhow::Result<i32> {
    let units = match collect_units(&args.path) {
        Ok(u) => u,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(EXIT_ERROR);
        }
    };

    if units.is_empty() {
        eprintln!("Warning: no units to scan");
        return Ok(EXIT_SUCCESS);
    }

    let scanner = Scanner::from_config(config)
        .snippet_context(args.context.unwrap_or(config.snippet_context));

    info!(units = units.len(), "scanning");
    let results = scanner.scan_batch(&units);
    debug!(flagged = results.len(), "scan finished");

    let path_str = args.path.to_string_lossy().to_string();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    report::write(&mut out, args.format, &path_str, units.len(), &results)?;

    Ok(exit_code_for(&results, args.fail_on))
}

/// Run the serve command.
pub fn run_serve(args: &ServeArgs, config: &Config) -> anyhow::Result<i32> {
    let addr = args.listen.clone().unwrap_or_else(|| config.listen.clone());
    let scanner = Scanner::from_config(config);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(serve::run(&addr, scanner))?;

    Ok(EXIT_SUCCESS)
}

/// Run the init command.
pub fn run_init(args: &InitArgs) -> anyhow::Result<i32> {
    // Check if output already exists
    if args.output.exists() {
        eprintln!("Error: file already exists: {}", args.output.display());
        eprintln!("Remove it or use --output to specify a different path");
        return Ok(EXIT_ERROR);
    }

    // Create output directory if needed
    if let Some(parent) = args.output.parent() {
        if !parent.as_os_str().is_empty() && parent != Path::new(".") {
            if let Err(e) = std::fs::create_dir_all(parent) {
                eprintln!("Error: failed to create directory: {}", e);
                return Ok(EXIT_ERROR);
            }
        }
    }

    if let Err(e) = std::fs::write(&args.output, config::DEFAULT_CONFIG_TEMPLATE) {
        eprintln!("Error: failed to write config: {}", e);
        return Ok(EXIT_ERROR);
    }

    println!("Created {}", args.output.display());
    println!();
    println!("Next steps:");
    println!("  1. Edit {} to customize for your project", args.output.display());
    println!("  2. Run: cpcheck scan <path> --config {}", args.output.display());

    Ok(EXIT_SUCCESS)
}
