use std::error::Error;
use std::process::ExitCode;

use clap::Parser;
use clap::builder::PossibleValuesParser;
use serde::Serialize;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use dft_verify::config::{FilterConfig, HarnessConfig};
use dft_verify::fft::{RootComparison, compare_roots};
use dft_verify::harness::{ReportSummary, analyze};
use dft_verify::pattern::Pattern;

/// Runs synthetic patterns through the 2-D DFT engine and reports
/// round-trip and filter reconstruction errors.
#[derive(Debug, Parser)]
#[command(name = "dft-verify", version)]
struct Cli {
    /// Side length of the square test patterns.
    #[arg(long, default_value_t = 256)]
    size: usize,

    /// Pattern to analyze; repeat for several. Defaults to all of them.
    #[arg(long = "pattern", value_parser = PossibleValuesParser::new(Pattern::NAMES))]
    patterns: Vec<String>,

    #[arg(long)]
    low_pass_radius: Option<f64>,

    #[arg(long)]
    high_pass_radius: Option<f64>,

    #[arg(long)]
    band_inner: Option<f64>,

    #[arg(long)]
    band_outer: Option<f64>,

    /// Phase rotation in radians.
    #[arg(long)]
    phase_angle: Option<f64>,

    /// Length N for the root-of-unity check.
    #[arg(long, default_value_t = 8)]
    roots: usize,

    /// Print the results as JSON instead of a table.
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn harness_config(&self) -> HarnessConfig {
        HarnessConfig {
            size: self.size,
            root_check_length: self.roots,
            filters: FilterConfig {
                low_pass_radius: self.low_pass_radius,
                high_pass_radius: self.high_pass_radius,
                band_inner: self.band_inner,
                band_outer: self.band_outer,
                phase_angle: self.phase_angle,
            },
        }
    }

    /// Patterns picked with `--pattern`, or every pattern when none was given.
    /// Names were already checked against [`Pattern::NAMES`] by the parser.
    fn selected_patterns(&self) -> Vec<Pattern> {
        if self.patterns.is_empty() {
            Pattern::NAMES.iter().filter_map(|name| Pattern::named(name)).collect()
        } else {
            self.patterns.iter().filter_map(|name| Pattern::named(name)).collect()
        }
    }
}

#[derive(Serialize)]
struct Output {
    roots: Vec<RootComparison>,
    patterns: Vec<ReportSummary>,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .try_init();
}

fn print_table(output: &Output) {
    println!("root-of-unity check");
    for row in &output.roots {
        println!(
            "  k={}: ours={:.4}, reference={:.4}, deviation={:.2e}",
            row.k,
            row.computed,
            row.reference,
            row.deviation()
        );
    }
    println!();
    for summary in &output.patterns {
        println!(
            "{} ({}x{}): round trip max={:.3e} mean={:.3e}",
            summary.pattern,
            summary.height,
            summary.width,
            summary.round_trip.max_error,
            summary.round_trip.mean_error
        );
        for (name, stats) in &summary.filters {
            println!(
                "  {name:<12} max={:>10.3} mean={:>10.3}",
                stats.max_error, stats.mean_error
            );
        }
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn Error>> {
    let config = cli.harness_config();
    info!(size = config.size, "starting");

    let roots = compare_roots(config.root_check_length)?;
    let worst = roots.iter().map(RootComparison::deviation).fold(0.0, f64::max);
    if worst > 1e-9 {
        warn!(worst, "root of unity deviates from reference");
    }

    let selected = cli.selected_patterns();
    let mut patterns = Vec::with_capacity(selected.len());
    for pattern in selected {
        let name = pattern.name();
        let image = pattern.generate(config.size, config.size)?;
        let report = analyze(&image, &config.filters)?;
        let summary = report.summary(name);
        info!(
            pattern = name,
            max_error = summary.round_trip.max_error,
            mean_error = summary.round_trip.mean_error,
            "analyzed"
        );
        patterns.push(summary);
    }

    let output = Output { roots, patterns };
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print_table(&output);
    }
    Ok(())
}

fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_pattern_flag_selects_every_pattern() {
        let cli = Cli::try_parse_from(["dft-verify"]).unwrap();
        let names: Vec<&str> = cli.selected_patterns().iter().map(Pattern::name).collect();
        assert_eq!(names, Pattern::NAMES);
    }

    #[test]
    fn repeated_pattern_flags_keep_order() {
        let cli =
            Cli::try_parse_from(["dft-verify", "--pattern", "noise", "--pattern", "sine"]).unwrap();
        let names: Vec<&str> = cli.selected_patterns().iter().map(Pattern::name).collect();
        assert_eq!(names, ["noise", "sine"]);
    }

    #[test]
    fn unknown_pattern_is_a_parse_error() {
        assert!(Cli::try_parse_from(["dft-verify", "--pattern", "plaid"]).is_err());
    }
}
