//! Avatar CLI entry point.
//!
//! This binary is the composition root for the workspace. Responsibilities:
//!
//! 1. **Parse arguments**: `clap` derive; there is no configuration file.
//! 2. **Wire observability**: configure `tracing-subscriber` with an
//!    `EnvFilter` (from `RUST_LOG`, or `info`/`debug` depending on
//!    `--verbose`) and a human-readable or JSON formatter on stderr.
//! 3. **Load and validate a report**: a JSON-serialised
//!    [`compilation::CompilationResult`] is read from a file or stdin.
//!    Deserialisation goes through the validating factory, so a report with
//!    a `null` collection or element is rejected here.
//! 4. **Render**: print the diagnostics and a one-line summary, or the
//!    normalised JSON.
//!
//! ## Exit status
//!
//! | Code | Meaning |
//! |------|---------|
//! | 0 | Report is valid and compilation succeeded |
//! | 1 | Report is valid but compilation failed (or warnings were denied) |
//! | 2 | Report could not be read or is invalid |

use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use compilation::CompilationResult;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Inspect compilation reports produced by an external compiler run.
#[derive(Parser, Debug)]
#[command(name = "avatar", author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log output format (written to stderr)
    #[arg(long, value_enum, global = true, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate a compilation report and summarise it
    Inspect {
        /// Report file (JSON), or `-` for stdin
        report: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Exit with status 1 when the report contains any warning
        #[arg(long)]
        deny_warnings: bool,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Pretty,
    Json,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

const EXIT_FAILED: u8 = 1;
const EXIT_INVALID: u8 = 2;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.log_format, cli.verbose);

    match run(cli.command) {
        Ok(code) => code,
        Err(err) => {
            error!(error = %format!("{err:#}"), "could not inspect report");
            ExitCode::from(EXIT_INVALID)
        }
    }
}

fn init_tracing(format: LogFormat, verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_level.into());
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Pretty => {
            let layer = tracing_subscriber::fmt::layer().with_writer(io::stderr);
            registry.with(layer).init();
        }
        LogFormat::Json => {
            let layer = tracing_subscriber::fmt::layer()
                .json()
                .with_writer(io::stderr);
            registry.with(layer).init();
        }
    }
}

fn run(command: Commands) -> Result<ExitCode> {
    match command {
        Commands::Inspect {
            report,
            format,
            deny_warnings,
        } => {
            let result = read_report(&report)?;
            let summary = result.summary();
            info!(
                report = %report.display(),
                success = summary.success,
                errors = summary.errors,
                warnings = summary.warnings,
                generated_files = summary.generated_files,
                "report loaded"
            );

            let rendered = match format {
                OutputFormat::Text => render_text(&result),
                OutputFormat::Json => render_json(&result)?,
            };
            println!("{rendered}");

            let status = exit_status(&result, deny_warnings);
            if status != 0 {
                warn!(status, "compilation report indicates failure");
            }
            Ok(ExitCode::from(status))
        }
    }
}

/// Reads a report from `path`, treating `-` as stdin.
fn read_report(path: &Path) -> Result<CompilationResult> {
    if path == Path::new("-") {
        let stdin = io::stdin().lock();
        return load_report(stdin).context("failed to read report from stdin");
    }
    let file = std::fs::File::open(path)
        .with_context(|| format!("failed to open report {}", path.display()))?;
    load_report(io::BufReader::new(file))
        .with_context(|| format!("failed to read report {}", path.display()))
}

/// Parses and validates a JSON report.
fn load_report(mut reader: impl Read) -> Result<CompilationResult> {
    let mut raw = String::new();
    reader.read_to_string(&mut raw).context("I/O error")?;
    let result = serde_json::from_str(&raw).context("invalid compilation report")?;
    Ok(result)
}

/// One line per diagnostic and per generated file, then the summary line.
fn render_text(result: &CompilationResult) -> String {
    let diagnostics = result.diagnostics().iter().map(ToString::to_string);
    let files = result
        .generated_files()
        .iter()
        .map(|f| format!("generated {f}"));
    let summary = std::iter::once(result.summary().to_string());

    diagnostics
        .chain(files)
        .chain(summary)
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_json(result: &CompilationResult) -> Result<String> {
    let json = serde_json::to_string_pretty(result);
    json.context("failed to serialise report")
}

fn exit_status(result: &CompilationResult, deny_warnings: bool) -> u8 {
    let warned = deny_warnings && result.warnings().next().is_some();
    if result.is_failure() || warned {
        EXIT_FAILED
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FAILED_REPORT: &str = r#"{
        "success": false,
        "diagnostics": [
            {
                "severity": "error",
                "source": "src/Foo.java",
                "position": { "line": 4, "column": 17 },
                "code": "compiler.err.cant.resolve",
                "message": "cannot find symbol"
            },
            { "severity": "warning", "message": "unchecked conversion" }
        ],
        "generated_files": [ { "path": "gen/Foo_Factory.java" } ]
    }"#;

    #[test]
    fn cli_parses_inspect_with_global_flags() {
        let cli = Cli::try_parse_from([
            "avatar",
            "inspect",
            "report.json",
            "--format",
            "json",
            "--deny-warnings",
            "--log-format",
            "json",
            "-v",
        ])
        .unwrap();

        assert_eq!(cli.log_format, LogFormat::Json);
        assert!(cli.verbose);
        let Commands::Inspect {
            report,
            format,
            deny_warnings,
        } = cli.command;
        assert_eq!(report, PathBuf::from("report.json"));
        assert_eq!(format, OutputFormat::Json);
        assert!(deny_warnings);
    }

    #[test]
    fn cli_requires_a_report_argument() {
        assert!(Cli::try_parse_from(["avatar", "inspect"]).is_err());
    }

    #[test]
    fn renders_diagnostics_files_and_summary() {
        let result = load_report(FAILED_REPORT.as_bytes()).unwrap();

        assert_eq!(
            render_text(&result),
            "error[compiler.err.cant.resolve] src/Foo.java:4:17: cannot find symbol\n\
             warning: unchecked conversion\n\
             generated gen/Foo_Factory.java\n\
             compilation failed: 1 error, 1 warning, 0 notes; 1 file generated"
        );
    }

    const NULL_FILE_REPORT: &str = r#"{
        "success": true,
        "diagnostics": [],
        "generated_files": [null]
    }"#;

    const WARNED_REPORT: &str = r#"{
        "success": true,
        "diagnostics": [{ "severity": "mandatory_warning", "message": "deprecated" }],
        "generated_files": []
    }"#;

    const CLEAN_REPORT: &str = r#"{ "success": true, "diagnostics": [], "generated_files": [] }"#;

    #[test]
    fn renders_position_without_source() {
        let report = r#"{
            "success": true,
            "diagnostics": [{
                "severity": "note",
                "position": { "line": 3, "column": 4 },
                "message": "x"
            }],
            "generated_files": []
        }"#;
        let result = load_report(report.as_bytes()).unwrap();

        assert_eq!(
            render_text(&result),
            "note 3:4: x\n\
             compilation succeeded: 0 errors, 0 warnings, 1 note; 0 files generated"
        );
    }

    #[test]
    fn renders_json_that_loads_back_unchanged() {
        let result = load_report(FAILED_REPORT.as_bytes()).unwrap();

        let json = render_json(&result).unwrap();
        assert_eq!(load_report(json.as_bytes()).unwrap(), result);
    }

    #[test]
    fn invalid_report_error_names_the_argument() {
        let err = load_report(NULL_FILE_REPORT.as_bytes()).unwrap_err();

        let chain = format!("{err:#}");
        assert!(chain.starts_with("invalid compilation report"));
        let message = "Argument 'generated_files' cannot contain null (element 0)";
        assert!(chain.contains(message));
    }

    #[test]
    fn malformed_json_is_rejected() {
        assert!(load_report("not json".as_bytes()).is_err());
    }

    #[test]
    fn exit_status_reflects_success_and_warnings() {
        let failed = load_report(FAILED_REPORT.as_bytes()).unwrap();
        assert_eq!(exit_status(&failed, false), EXIT_FAILED);

        let warned = load_report(WARNED_REPORT.as_bytes()).unwrap();
        assert_eq!(exit_status(&warned, false), 0);
        assert_eq!(exit_status(&warned, true), EXIT_FAILED);

        let clean = load_report(CLEAN_REPORT.as_bytes()).unwrap();
        assert_eq!(exit_status(&clean, true), 0);
    }

    #[test]
    fn missing_report_file_is_an_error() {
        let err = read_report(Path::new("definitely/not/here.json")).unwrap_err();
        assert!(err.to_string().contains("failed to open report"));
    }
}
