use alarm_chart_etl::alarms::{self, AlarmCategory, AttributeTriplet, SeriesSelector};
use alarm_chart_etl::config::Config;
use alarm_chart_etl::etl::{timeseries, worldmap};
use alarm_chart_etl::output::world_map_json;
use anyhow::Result;
use clap::Parser;
use indexmap::IndexMap;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser)]
#[command(
    name = "alarmchart",
    about = "Reshape network alarm records into chart-ready time-series and world-map data"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Per-bin alarm counts: an "All" trace plus one trace per country (or per AS with --country)
    Timeseries {
        /// JSON file holding the fetched alarm records
        #[arg(short, long)]
        input: PathBuf,

        /// Category to include (prefix or counts key); repeatable. Defaults to the config selection
        #[arg(long = "category")]
        categories: Vec<String>,

        /// Restrict to one country, matched exactly against country_name
        #[arg(long)]
        country: Option<String>,

        /// Path to config file
        #[arg(short, long, default_value = "alarmchart.toml")]
        config: PathBuf,

        /// Write JSON here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Log summed counts per severity label for each selected category
        #[arg(long)]
        by_severity: bool,
    },

    /// Per-country alarm totals for a choropleth
    Worldmap {
        /// JSON file holding the fetched alarm records
        #[arg(short, long)]
        input: PathBuf,

        /// Counts key or category prefix to include; repeatable. Unknown keys are passed through
        #[arg(long = "category")]
        categories: Vec<String>,

        /// Path to config file
        #[arg(short, long, default_value = "alarmchart.toml")]
        config: PathBuf,

        /// Write JSON here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List the known alarm categories and their record field keys
    Categories,
}

fn main() -> Result<()> {
    // Before the filter is built, so RUST_LOG may come from .env.
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new("alarm_chart_etl=info,alarmchart=info")
            }),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Timeseries {
            input,
            categories,
            country,
            config,
            output,
            by_severity,
        } => {
            let cfg = load_config(&config)?;
            let selected = alarms::parse_selection(&cfg.selection.or_requested(categories))?;

            let records = alarms::load_records(&input)?;
            if by_severity {
                log_severities(&records, &selected, country.as_deref());
            }
            let traces = timeseries::etl(&records, &selected, country.as_deref(), &cfg.display);
            info!(
                records = records.len(),
                entities = traces.iter().filter(|t| !t.is_aggregate()).count(),
                "time-series built"
            );
            write_json(&serde_json::to_value(&traces)?, output.as_deref())
        }
        Command::Worldmap {
            input,
            categories,
            config,
            output,
        } => {
            let cfg = load_config(&config)?;
            let selected: Vec<String> = cfg
                .selection
                .or_requested(categories)
                .iter()
                .map(|name| alarms::counts_key_or_verbatim(name))
                .collect();

            let records = alarms::load_records(&input)?;
            let series = worldmap::etl(&records, &selected);
            match &series {
                Some(s) => info!(countries = s.locations.len(), "world map built"),
                None => info!("world map empty: no selected category in records"),
            }
            write_json(&world_map_json(series.as_ref())?, output.as_deref())
        }
        Command::Categories => {
            for category in AlarmCategory::ALL {
                println!(
                    "{:<14} {:<24} {}, {}, {}",
                    category.prefix(),
                    category.to_string(),
                    category.counts_key(),
                    category.timebins_key(),
                    category.severities_key()
                );
            }
            Ok(())
        }
    }
}

fn load_config(path: &Path) -> Result<Config> {
    let cfg = Config::load_or_default(path)?;
    cfg.validate()?;
    Ok(cfg)
}

fn log_severities(
    records: &[alarms::AlarmRecord],
    selected: &[AttributeTriplet],
    country: Option<&str>,
) {
    for triplet in selected {
        let selector = SeriesSelector::from_triplet(triplet);
        let mut totals: IndexMap<&str, u64> = IndexMap::new();
        for record in records
            .iter()
            .filter(|r| country.is_none_or(|c| r.country_name == c))
        {
            for (label, count) in alarms::extract(record, &selector).severity_histogram() {
                let slot = totals.entry(label).or_insert(0);
                *slot = slot.saturating_add(count);
            }
        }
        info!(category = %selector.key, severities = ?totals, "severity breakdown");
    }
}

fn write_json(value: &serde_json::Value, output: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    match output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, &json)?;
            info!(path = %path.display(), "chart data written");
        }
        None => println!("{json}"),
    }
    Ok(())
}
