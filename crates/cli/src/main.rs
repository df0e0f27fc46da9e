use anyhow::{Context, Result};
use chrono::Local;
use clap::{Parser, ValueEnum};
use log::LevelFilter;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use xrename_core::{
    app_paths, check_target, load_config_from, validate_pattern, AppConfig, BatchRenamer,
    FacadeSink, RenameError, RenameOptions, RenameResult, TargetCheck,
};

const EXAMPLES: &str = "\
Usage examples:
  # Add prefix
  xrename /path/to/directory --prefix \"IMG_\"

  # Add suffix
  xrename /path/to/directory --suffix \"_backup\"

  # Add number (sequentially)
  xrename /path/to/directory --number

  # Change extension
  xrename /path/to/directory --ext \"jpg\"

  # Custom pattern
  xrename /path/to/directory --pattern \"file_{index:03d}\"

  # Preview (no actual changes)
  xrename /path/to/directory --prefix \"NEW_\" --dry-run";

const PATTERN_HELP: &str = "\
Custom filename pattern using {index}, {original} and {total}.

Fields accept a format spec: [[fill]align][sign][#][0][width][,|_][.precision][type]
with integer types d, x, X, o, b and text type s, e.g. \"file_{index:03d}\".
Width and precision are limited to 255. Nested fields ({index:{total}}),
indexing ({original[0]}), conversions (!r) and the c, n, e, f, % types are not
supported; such a pattern falls back to the prefix/number/suffix rule.";

#[derive(Debug, Parser)]
#[command(name = "xrename")]
#[command(about = "Batch rename all files in the specified path.")]
#[command(after_help = EXAMPLES)]
struct Cli {
    /// Path to the directory to rename files in
    #[arg(required_unless_present = "show_config")]
    path: Option<PathBuf>,
    /// Prefix to add before filename
    #[arg(long, default_value = "")]
    prefix: String,
    /// Suffix to add after filename (excluding extension)
    #[arg(long, default_value = "")]
    suffix: String,
    /// Add sequential numbers to filenames (e.g. file_01, file_02)
    #[arg(long, default_value_t = false)]
    number: bool,
    /// Change file extension (e.g. jpg, png)
    #[arg(long, default_value = "")]
    ext: String,
    /// Custom filename pattern using {index}, {original} and {total}
    #[arg(long, default_value = "", long_help = PATTERN_HELP)]
    pattern: String,
    /// Process subdirectories recursively
    #[arg(short, long, default_value_t = false)]
    recursive: bool,
    /// Preview changes without actually renaming
    #[arg(long, default_value_t = false)]
    dry_run: bool,
    /// Filter by specific extensions (e.g. ".jpg,.png")
    #[arg(long)]
    filter: Option<String>,
    /// Also write log lines to this file
    #[arg(long)]
    log: Option<PathBuf>,
    /// Replace characters that are invalid in filenames
    #[arg(long, default_value_t = false)]
    sanitize: bool,
    /// Log per-file decisions at debug level
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
    /// Config file to use instead of the platform default
    #[arg(long)]
    config: Option<PathBuf>,
    /// Print the effective configuration and exit
    #[arg(long, default_value_t = false)]
    show_config: bool,
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    output: OutputFormat,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("\nError occurred: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => app_paths()?.config_path,
    };
    let config = load_config_from(&config_path)?;

    if cli.show_config {
        println!("Config file: {}", config_path.display());
        println!("{}", toml::to_string_pretty(&config)?);
        return Ok(ExitCode::SUCCESS);
    }

    let log_file = cli.log.clone().or_else(|| config.log_file.clone());
    init_logging(
        cli.verbose || config.verbose_default,
        log_file.as_deref(),
        matches!(cli.output, OutputFormat::Json),
    )?;

    let target = cli
        .path
        .as_deref()
        .context("a target directory is required")?;
    match check_target(target) {
        TargetCheck::Missing => {
            eprintln!("Error: Path does not exist: {}", target.display());
            return Ok(ExitCode::FAILURE);
        }
        TargetCheck::NotADirectory => {
            eprintln!("Error: Not a directory: {}", target.display());
            return Ok(ExitCode::FAILURE);
        }
        TargetCheck::MaybeUnreadable => {
            eprintln!(
                "Warning: Path may not have read permission: {}",
                target.display()
            );
        }
        TargetCheck::Ready => {}
    }

    let options = build_options(&cli, &config);
    if let Some(pattern) = &options.pattern {
        if let Err(err) = validate_pattern(pattern) {
            log::warn!("Pattern '{pattern}' is invalid ({err}); default naming will be used");
        }
    }

    let interrupted = Arc::new(AtomicBool::new(false));
    let interrupted_clone = Arc::clone(&interrupted);
    ctrlc::set_handler(move || interrupted_clone.store(true, Ordering::SeqCst))
        .context("failed to install Ctrl-C handler")?;

    let sink = FacadeSink;
    let renamer = BatchRenamer::new(&options, &sink).with_interrupt(&interrupted);
    match renamer.rename_files(target) {
        Ok(result) => {
            print_summary(&result, options.dry_run, cli.output)?;
            Ok(if result.is_clean() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Err(RenameError::Interrupted) => {
            println!("\n\nOperation interrupted by user.");
            Ok(ExitCode::FAILURE)
        }
        Err(err) => Err(err.into()),
    }
}

fn build_options(cli: &Cli, config: &AppConfig) -> RenameOptions {
    let options = RenameOptions::default()
        .with_prefix(cli.prefix.as_str())
        .with_suffix(cli.suffix.as_str())
        .with_numbering(cli.number)
        .with_new_extension(&cli.ext)
        .with_pattern(cli.pattern.as_str())
        .with_recursive(cli.recursive || config.recursive_default)
        .with_dry_run(cli.dry_run)
        .with_sanitize(cli.sanitize);

    match &cli.filter {
        Some(raw) => options.with_extension_filter(raw.split(',')),
        None => options.with_extension_filter(&config.filter_default),
    }
}

fn print_summary(result: &RenameResult, dry_run: bool, output: OutputFormat) -> Result<()> {
    match output {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(result)?);
        }
        OutputFormat::Table if dry_run => {
            println!(
                "\n[Preview mode] {} files are expected to be changed.",
                result.renamed
            );
        }
        OutputFormat::Table => {
            println!(
                "\nSuccessfully changed the names of {} files.",
                result.renamed
            );
            if result.skipped > 0 {
                println!("{} files were skipped.", result.skipped);
            }
            if result.errors > 0 {
                println!("{} files processing failed.", result.errors);
            }
        }
    }
    Ok(())
}

/// Console output always happens; a log file, when given, receives the same
/// lines. Console lines go to stderr when stdout carries machine output.
fn init_logging(verbose: bool, log_file: Option<&Path>, console_to_stderr: bool) -> Result<()> {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let file = log_file
        .map(|path| {
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("could not open log file: {}", path.display()))
        })
        .transpose()?;

    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format(|buf, record| {
            writeln!(
                buf,
                "{} - {} - {}",
                Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .target(env_logger::Target::Pipe(Box::new(TeeWriter {
            console_to_stderr,
            file,
        })))
        .try_init()
        .context("failed to initialize logging")?;
    Ok(())
}

struct TeeWriter {
    console_to_stderr: bool,
    file: Option<File>,
}

impl TeeWriter {
    fn console(&self) -> Box<dyn Write> {
        if self.console_to_stderr {
            Box::new(io::stderr())
        } else {
            Box::new(io::stdout())
        }
    }
}

impl Write for TeeWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.console().write_all(buf)?;
        if let Some(file) = self.file.as_mut() {
            file.write_all(buf)?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.console().flush()?;
        if let Some(file) = self.file.as_mut() {
            file.flush()?;
        }
        Ok(())
    }
}
