//! GeoAudit: Generative Engine Optimization audit CLI

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use geoaudit::analyzer::AuditInput;
use geoaudit::config::load_config;
use geoaudit::fetch::{normalize_url, Fetcher};
use geoaudit::page::parse_page;
use geoaudit::reporter::{ConsoleReporter, JsonReporter};
use geoaudit::serp::{AuthorityLookup, SerpClient};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

/// GeoAudit: score how well a page can be cited by AI answer engines
#[derive(Parser, Debug)]
#[command(name = "geoaudit")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// URL to audit (https:// is assumed when no scheme is given)
    url: String,

    /// Output the report as JSON
    #[arg(long, short)]
    json: bool,

    /// Pretty-print JSON output (implies --json)
    #[arg(long)]
    pretty: bool,

    /// Quiet mode (just the score)
    #[arg(long, short)]
    quiet: bool,

    /// Verbose output (include every finding)
    #[arg(long, short)]
    verbose: bool,

    /// Minimum overall score (exit 1 if below)
    #[arg(long, short)]
    threshold: Option<u8>,

    /// Path to config file (default: search geoaudit.json in current dir and parents)
    #[arg(long)]
    config: Option<PathBuf>,

    /// HTTP timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Skip the site-authority lookup even when an API key is configured
    #[arg(long)]
    no_authority: bool,

    /// Maximum number of recommendations to show
    #[arg(long, value_name = "N")]
    max_recommendations: Option<usize>,
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", "Error".red().bold(), e);
            ExitCode::from(2)
        }
    }
}

fn run() -> Result<ExitCode> {
    env_logger::init();
    let args = Args::parse();

    let work_dir = std::env::current_dir().context("Failed to resolve working directory")?;
    let config = load_config(&work_dir, args.config.as_deref())?.merge_with_cli(
        args.threshold,
        args.timeout,
        args.max_recommendations,
    );

    let url = normalize_url(&args.url)?;
    let timeout = Duration::from_secs(config.timeout_secs);
    let fetcher = Fetcher::new(timeout)?;

    let fetched = fetcher.fetch_page(&url)?;
    let page = parse_page(&fetched.body)?;
    let robots = fetcher.fetch_robots(&fetched.final_url);

    let authority = if args.no_authority {
        AuthorityLookup::unavailable()
    } else {
        match (SerpClient::from_env(timeout), fetched.final_url.host_str()) {
            (Some(client), Some(domain)) => client.lookup(domain, &config.authority),
            _ => AuthorityLookup::unavailable(),
        }
    };

    let input = AuditInput {
        url: fetched.final_url.clone(),
        page,
        payload_bytes: fetched.bytes,
        robots,
        authority,
    };

    let report = geoaudit::audit(&input, &config);

    if args.json || args.pretty {
        let reporter = if args.pretty {
            JsonReporter::new().pretty()
        } else {
            JsonReporter::new()
        };
        println!("{}", reporter.report(&report));
    } else if args.quiet {
        ConsoleReporter::new().report_quiet(&report);
    } else {
        let reporter = if args.verbose {
            ConsoleReporter::new().verbose()
        } else {
            ConsoleReporter::new()
        };
        reporter.report(&report);
    }

    if let Some(threshold) = config.threshold {
        if report.overall_score < threshold {
            if !args.quiet && !args.json && !args.pretty {
                eprintln!(
                    "{}",
                    format!(
                        "Score {} is below the threshold {threshold}",
                        report.overall_score
                    )
                    .red()
                );
            }
            return Ok(ExitCode::from(1));
        }
    }

    Ok(ExitCode::SUCCESS)
}
