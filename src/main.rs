//! TransferLens - Transfer Market Analytics
//!
//! A CLI tool that parses a football transfer table and generates
//! league, club, and spending statistics as a Markdown or JSON report.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (fetch, parse, config, write failure, etc.)

mod analysis;
mod cli;
mod config;
mod loader;
mod models;
mod parser;
mod report;

use anyhow::{Context, Result};
use cli::{Args, OutputFormat};
use config::Config;
use parser::Dataset;
use report::ReportOptions;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Initialize logging
    init_logging(&args);

    info!("TransferLens v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    // Run the analysis pipeline
    if let Err(e) = run_analysis(args).await {
        error!("Analysis failed: {}", e);
        eprintln!("\n❌ Error: {}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Handle --init-config: generate a default .transferlens.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(".transferlens.toml");

    if path.exists() {
        eprintln!("⚠️  .transferlens.toml already exists. Remove it first or edit it manually.");
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content).context("Failed to write .transferlens.toml")?;

    println!("✅ Created .transferlens.toml with default settings.");
    println!("   Edit it to customize output, query limits, and report sections.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Run the complete load → parse → query → report workflow.
async fn run_analysis(args: Args) -> Result<()> {
    // Load configuration
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);

    let source = args.source_str().to_string();

    // Step 1: Fetch the raw table
    println!("📥 Loading transfer data: {}", source);
    let raw_text = loader::fetch_source(&source).await?;

    // Step 2: Parse it into the record snapshot
    let dataset = parser::parse(&raw_text)
        .with_context(|| format!("Failed to parse transfer data from {}", source))?;

    info!(
        "Parsed {} records with {} columns",
        dataset.len(),
        dataset.columns().len()
    );

    if dataset.is_empty() {
        warn!("Source contains a header but no data rows");
    }

    // Handle --dry-run: print dataset statistics and exit
    if args.dry_run {
        return handle_dry_run(&dataset);
    }

    // Step 3: Run the queries and assemble the report
    println!("📊 Computing transfer statistics...");

    let options = ReportOptions {
        club: args.club.clone(),
        league: args.league.clone(),
        top_limit: config.query.top_transfers,
        club_top_limit: config.query.club_top_transfers,
        include_flows: config.report.include_flows,
        include_nationalities: config.report.include_nationalities,
        include_positions: config.report.include_positions,
    };

    if let Some(ref club) = options.club {
        let known = analysis::all_clubs(dataset.records());
        if !known.iter().any(|c| c == club) {
            warn!("Club \"{}\" does not appear in the data", club);
        }
    }

    let report = report::build_report(&source, dataset.records(), &options);

    // Step 4: Generate and save the report
    println!("📝 Generating report...");

    let output = match args.format {
        OutputFormat::Json => report::generate_json_report(&report)?,
        OutputFormat::Markdown => report::generate_markdown_report(&report),
    };

    let output_path = std::path::Path::new(&config.general.output);
    std::fs::write(output_path, &output)
        .with_context(|| format!("Failed to write report to {}", output_path.display()))?;

    // Print summary
    let metadata = &report.metadata;
    println!("\n📊 Dataset Summary:");
    println!("   Records: {}", metadata.records_total);
    println!("   Priced transfers: {}", metadata.records_paid);
    println!("   Clubs: {}", metadata.clubs_total);
    println!("   Leagues: {}", report.leagues.len());
    println!(
        "\n✅ Analysis complete! Report saved to: {}",
        output_path.display()
    );

    Ok(())
}

/// Handle --dry-run: print dataset statistics, write nothing.
fn handle_dry_run(dataset: &Dataset) -> Result<()> {
    println!("\n🔍 Dry run: parsing without generating a report...\n");

    let records = dataset.records();
    let years = analysis::transfers_by_year(records);

    println!("   Columns: {}", dataset.columns().len());
    println!("   Records: {}", dataset.len());
    println!("   Priced transfers: {}", analysis::filter_paid(records).len());
    println!("   Clubs: {}", analysis::all_clubs(records).len());
    match (years.first(), years.last()) {
        (Some(first), Some(last)) => println!("   Years: {}-{}", first.year, last.year),
        _ => println!("   Years: none"),
    }

    println!("\n✅ Dry run complete. No report was written.");
    Ok(())
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from .transferlens.toml");
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {}", e);
            Ok(Config::default())
        }
    }
}
