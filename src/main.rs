use chrono::{DateTime, Utc};
use clap::Parser;
use skyclock::config::CatalogSource;
use skyclock::location::Catalog;
use skyclock::{server, telemetry, SkyClock};
use std::path::PathBuf;

/// skyclock — local time, sunrise/sunset and UV estimates for dashboard cities
///
/// Examples:
///   skyclock Tokyo
///   skyclock 大阪 --at 2025-06-21T03:00:00Z --cloud 20
///   skyclock "New York" --explain
///   skyclock --list
///   skyclock --serve --port 3000
#[derive(Parser)]
#[command(name = "skyclock", version, about, long_about = None)]
struct Cli {
    /// City name or alias. Example: skyclock Tokyo
    #[arg(index = 1)]
    city: Option<String>,

    /// Instant to evaluate (RFC 3339). Defaults to now.
    #[arg(long)]
    at: Option<String>,

    /// Cloud coverage percent (0-100). Omit for the light-cloud default.
    #[arg(long)]
    cloud: Option<f64>,

    /// Catalog JSON file. Overrides SKYCLOCK_CATALOG and the user config file.
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// List catalog locations and exit.
    #[arg(long)]
    list: bool,

    /// Include the UV factor breakdown in the report.
    #[arg(long)]
    explain: bool,

    /// Emit logs as JSON lines.
    #[arg(long)]
    json_logs: bool,

    /// Run the HTTP API instead of printing a report.
    #[arg(long)]
    serve: bool,

    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    #[arg(long, default_value_t = 3000)]
    port: u16,
}

fn main() {
    let cli = Cli::parse();
    telemetry::init_tracing(cli.json_logs);

    // ── Load catalog ────────────────────────────────────────────

    let source = CatalogSource::detect(cli.catalog.as_deref());
    let catalog = source.load().unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });

    if cli.list {
        println!("{}", to_json(&catalog.summaries()));
        return;
    }

    if cli.serve {
        serve(catalog, &cli.host, cli.port);
        return;
    }

    // ── Report ──────────────────────────────────────────────────

    let Some(city) = cli.city.as_deref() else {
        eprintln!("Error: No city specified.");
        eprintln!();
        eprintln!("Usage:");
        eprintln!("  skyclock Tokyo");
        eprintln!("  skyclock --list");
        eprintln!("  skyclock --serve");
        std::process::exit(1);
    };

    let now = parse_at(cli.at.as_deref());
    let report = SkyClock::new(&catalog).report(city, now, cli.cloud, cli.explain);

    match &report.location {
        Some(loc) => eprintln!(
            "  {} ({}) {} {} | UV {}",
            loc.key, report.clock.offset_label, report.clock.date, report.clock.time, report.uv_index
        ),
        None => eprintln!("  '{}' is not in the catalog; showing defaults", city),
    }

    println!("{}", to_json(&report));
}

fn parse_at(at: Option<&str>) -> DateTime<Utc> {
    match at {
        Some(s) => server::parse_instant(s).unwrap_or_else(|e| {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }),
        None => Utc::now(),
    }
}

fn serve(catalog: Catalog, host: &str, port: u16) {
    let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("Error: Cannot start runtime: {}", e);
        std::process::exit(1);
    });
    if let Err(e) = runtime.block_on(server::start(catalog, host, port)) {
        eprintln!("Server error: {}", e);
        std::process::exit(1);
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| {
        eprintln!("Error: Cannot serialize output: {}", e);
        std::process::exit(1);
    })
}
