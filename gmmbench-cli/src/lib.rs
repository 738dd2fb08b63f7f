#![warn(missing_docs)]
//! gmmbench CLI Library
//!
//! Command line harness around [`BenchmarkAdapter`]: one dataset, one option
//! string, one timed fit. Use `gmmbench::run()` (or `gmmbench_cli::run()`) in
//! a main function.
//!
//! # Example
//!
//! ```text
//! gmmbench data.csv -- -g 3 --covariance_type diag
//! gmmbench data.csv --options "-g 2 -s 7" --timeout 30s --format json
//! ```

mod config;
mod metadata;

pub use config::*;
pub use metadata::{build_report_meta, describe_dataset};

use clap::Parser;
use gmmbench_core::{BenchmarkAdapter, RunMetrics};
use gmmbench_report::{OutputFormat, RunReport, render};
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// gmmbench CLI arguments
#[derive(Parser, Debug)]
#[command(name = "gmmbench")]
#[command(author, version, about = "gmmbench - timed Gaussian Mixture Model fits")]
pub struct Cli {
    /// Dataset to fit: CSV of numeric rows, one sample per line
    pub dataset: PathBuf,

    /// GMM options, e.g. `-- -g 3 --covariance_type diag`
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub gmm_options: Vec<String>,

    /// GMM option string, used when no trailing options are given
    #[arg(long = "options", allow_hyphen_values = true)]
    pub options: Option<String>,

    /// Abandon the run after this long (e.g. "30s", "500ms"); 0 disables
    #[arg(long)]
    pub timeout: Option<String>,

    /// Output format: json, report, human
    #[arg(long)]
    pub format: Option<String>,

    /// Output file (stdout if not specified)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Configuration file; defaults to a discovered gmmbench.toml
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Settings for one run after layering gmmbench.toml under the CLI flags.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSettings {
    /// Option string handed to the adapter
    pub options: String,
    /// Run timeout; zero means unbounded
    pub timeout: Duration,
    /// Whether the adapter logs its informational line
    pub verbose: bool,
    /// Output format
    pub format: OutputFormat,
}

impl RunSettings {
    /// Resolve settings: CLI wins, then the config file, then built-in defaults.
    pub fn resolve(cli: &Cli, config: &GmmBenchConfig) -> anyhow::Result<Self> {
        let options = if !cli.gmm_options.is_empty() {
            cli.gmm_options.join(" ")
        } else if let Some(ref options) = cli.options {
            options.clone()
        } else {
            config.runner.default_options.clone()
        };

        let timeout = GmmBenchConfig::parse_duration(
            cli.timeout.as_deref().unwrap_or(&config.runner.timeout),
        )?;

        let format: OutputFormat = cli
            .format
            .as_deref()
            .unwrap_or(&config.output.format)
            .parse()
            .map_err(anyhow::Error::msg)?;

        Ok(Self {
            options,
            timeout,
            verbose: config.runner.verbose && !cli.quiet,
            format,
        })
    }
}

/// Run the gmmbench CLI with the process arguments.
///
/// # Returns
/// The metrics value of the run. A failed run is `Ok(RunMetrics::Failed(..))`;
/// `Err` is reserved for configuration and I/O problems.
pub fn run() -> anyhow::Result<RunMetrics> {
    let cli = Cli::parse();
    run_with_cli(cli)
}

/// Run the gmmbench CLI with pre-parsed arguments.
pub fn run_with_cli(cli: Cli) -> anyhow::Result<RunMetrics> {
    init_logging(&cli);

    let config = match cli.config {
        Some(ref path) => GmmBenchConfig::load(path)?,
        None => GmmBenchConfig::discover().unwrap_or_default(),
    };
    let settings = RunSettings::resolve(&cli, &config)?;
    tracing::debug!(?settings, dataset = %cli.dataset.display(), "resolved run settings");

    let adapter = BenchmarkAdapter::new(&cli.dataset)
        .with_timeout(settings.timeout)
        .with_verbose(settings.verbose);
    let outcome = adapter.try_run(&settings.options);

    let report = RunReport::from_outcome(
        build_report_meta(),
        cli.dataset.display().to_string(),
        settings.options.as_str(),
        adapter.backend_name(),
        &outcome,
    )
    .with_dataset_shape(describe_dataset(&cli.dataset));
    let output = render(&report, settings.format)?;

    // Write output
    if let Some(ref path) = cli.output {
        let mut file = std::fs::File::create(path)?;
        file.write_all(output.as_bytes())?;
        eprintln!("Report written to: {}", path.display());
    } else {
        print!("{}", output);
    }

    Ok(report.metrics)
}

/// Install the stderr subscriber. `RUST_LOG` overrides the flag-derived filter.
fn init_logging(cli: &Cli) {
    let default_filter = if cli.verbose {
        "gmmbench=debug"
    } else if cli.quiet {
        "warn"
    } else {
        "gmmbench=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    // A subscriber may already be installed (tests, embedding binaries)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("gmmbench").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_trailing_options_are_joined() {
        let cli = parse(&["data.csv", "--", "-g", "3", "--covariance_type", "diag"]);
        assert_eq!(cli.dataset, PathBuf::from("data.csv"));
        assert_eq!(cli.gmm_options, ["-g", "3", "--covariance_type", "diag"]);

        let settings = RunSettings::resolve(&cli, &GmmBenchConfig::default()).unwrap();
        assert_eq!(settings.options, "-g 3 --covariance_type diag");
    }

    #[test]
    fn test_options_flag_accepts_leading_hyphen() {
        let cli = parse(&["data.csv", "--options", "-g 2 -s 7"]);
        let settings = RunSettings::resolve(&cli, &GmmBenchConfig::default()).unwrap();
        assert_eq!(settings.options, "-g 2 -s 7");
    }

    #[test]
    fn test_config_supplies_defaults() {
        let mut config = GmmBenchConfig::default();
        config.runner.default_options = "-g 4".to_string();
        config.runner.timeout = "5s".to_string();
        config.output.format = "json".to_string();

        let settings = RunSettings::resolve(&parse(&["data.csv"]), &config).unwrap();
        assert_eq!(settings.options, "-g 4");
        assert_eq!(settings.timeout, Duration::from_secs(5));
        assert_eq!(settings.format, OutputFormat::Json);
        assert!(settings.verbose);
    }

    #[test]
    fn test_cli_overrides_config() {
        let mut config = GmmBenchConfig::default();
        config.runner.default_options = "-g 4".to_string();
        config.runner.timeout = "5s".to_string();

        let cli = parse(&[
            "data.csv", "--timeout", "250ms", "--format", "report", "-q", "--", "-g", "1",
        ]);
        let settings = RunSettings::resolve(&cli, &config).unwrap();
        assert_eq!(settings.options, "-g 1");
        assert_eq!(settings.timeout, Duration::from_millis(250));
        assert_eq!(settings.format, OutputFormat::Report);
        assert!(!settings.verbose);
    }

    #[test]
    fn test_defaults_without_config() {
        let settings = RunSettings::resolve(&parse(&["data.csv"]), &GmmBenchConfig::default()).unwrap();
        assert_eq!(settings.options, "");
        assert_eq!(settings.timeout, Duration::ZERO);
        assert_eq!(settings.format, OutputFormat::Human);
    }

    #[test]
    fn test_bad_settings_are_errors() {
        let config = GmmBenchConfig::default();
        assert!(RunSettings::resolve(&parse(&["data.csv", "--format", "xml"]), &config).is_err());
        assert!(RunSettings::resolve(&parse(&["data.csv", "--timeout", "soon"]), &config).is_err());
    }

    #[test]
    fn test_verbose_and_quiet_conflict() {
        assert!(Cli::try_parse_from(["gmmbench", "data.csv", "-v", "-q"]).is_err());
    }

    #[test]
    fn test_dataset_is_required() {
        assert!(Cli::try_parse_from(["gmmbench"]).is_err());
    }

    #[test]
    fn test_run_writes_metrics_json() {
        let dir = tempfile::tempdir().unwrap();
        let dataset = dir.path().join("data.csv");
        let rows: Vec<String> = (0..10)
            .map(|i| format!("{},{}", i as f64 * 0.5, (i % 3) as f64 + 0.25 * i as f64))
            .collect();
        std::fs::write(&dataset, rows.join("\n")).unwrap();
        let output = dir.path().join("out.json");

        let cli = parse(&[
            dataset.to_str().unwrap(),
            "--format",
            "json",
            "--output",
            output.to_str().unwrap(),
        ]);
        let metrics = run_with_cli(cli).unwrap();
        assert!(metrics.is_success());

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
        assert!(written["Runtime"].as_f64().unwrap() >= 0.0);
    }

    #[test]
    fn test_full_report_records_dataset_shape() {
        let dir = tempfile::tempdir().unwrap();
        let dataset = dir.path().join("data.csv");
        let rows: Vec<String> = (0..12)
            .map(|i| format!("{},{}", (i % 4) as f64 + 0.1 * i as f64, i as f64 * 0.3))
            .collect();
        std::fs::write(&dataset, rows.join("\n")).unwrap();
        let output = dir.path().join("report.json");

        let cli = parse(&[
            dataset.to_str().unwrap(),
            "--format",
            "report",
            "--output",
            output.to_str().unwrap(),
            "--",
            "-g",
            "2",
            "--covariance_type",
            "full",
        ]);
        assert!(run_with_cli(cli).unwrap().is_success());

        let report: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(report["status"], "passed");
        assert_eq!(report["options"], "-g 2 --covariance_type full");
        assert_eq!(report["dataset_shape"]["samples"], 12);
        assert_eq!(report["dataset_shape"]["features"], 2);
    }

    #[test]
    fn test_run_reports_sentinel_for_invalid_options() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.json");

        let cli = parse(&[
            "missing.csv",
            "--format",
            "json",
            "--output",
            output.to_str().unwrap(),
            "--",
            "--covariance_type",
            "bogus",
        ]);
        let metrics = run_with_cli(cli).unwrap();
        assert!(!metrics.is_success());
        assert_eq!(std::fs::read_to_string(&output).unwrap().trim(), "-1.0");
    }
}
