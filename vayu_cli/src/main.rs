use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::time::Duration;
use vayu_core::aqi::category_table;
use vayu_core::*;

#[derive(Parser)]
#[command(name = "vayu")]
#[command(about = "Nepal air quality dashboard and AQI calculator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Load configuration from this file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level (RUST_LOG still takes precedence)
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch current measures once and show the dashboard (default)
    Now {
        /// Override the measures endpoint
        #[arg(long)]
        api_url: Option<String>,

        /// Print the dashboard as JSON
        #[arg(long)]
        json: bool,
    },

    /// Refresh the dashboard at a fixed interval
    Watch {
        /// Override the measures endpoint
        #[arg(long)]
        api_url: Option<String>,

        /// Seconds between refreshes
        #[arg(long)]
        interval: Option<u64>,

        /// Stop after this many refreshes
        #[arg(long)]
        ticks: Option<u64>,

        /// Print each refresh as a JSON line
        #[arg(long)]
        json: bool,
    },

    /// Compute the AQI from PM2.5 and PM10 readings
    Calc {
        /// PM2.5 in µg/m³
        #[arg(long, allow_negative_numbers = true)]
        pm25: f64,

        /// PM10 in µg/m³
        #[arg(long, allow_negative_numbers = true)]
        pm10: f64,

        /// Also print the category legend
        #[arg(long)]
        legend: bool,

        #[arg(long)]
        json: bool,
    },

    /// Cigarette equivalent of breathing a PM2.5 level
    Exposure {
        /// PM2.5 in µg/m³ (omit for "No data")
        #[arg(long)]
        pm25: Option<f64>,

        /// Hours of exposure (defaults to the configured value)
        #[arg(long)]
        hours: Option<f64>,
    },

    /// Show the daily PM2.5 history with AQI per day
    History {
        /// CSV file with date,pm25 columns
        #[arg(long)]
        csv: Option<PathBuf>,

        #[arg(long)]
        json: bool,
    },

    /// Shade countries from the global air pollution dataset
    Map {
        /// Dataset CSV (defaults to the configured path)
        #[arg(long)]
        dataset: Option<PathBuf>,

        /// Pollutant column to shade by
        #[arg(long, value_enum, default_value_t = LayerArg::Aqi)]
        layer: LayerArg,

        /// Number of countries to list
        #[arg(long, default_value_t = 10)]
        top: usize,

        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum LayerArg {
    Aqi,
    Co,
    Ozone,
    No2,
    Pm25,
}

impl From<LayerArg> for MapLayer {
    fn from(arg: LayerArg) -> Self {
        match arg {
            LayerArg::Aqi => MapLayer::Aqi,
            LayerArg::Co => MapLayer::Co,
            LayerArg::Ozone => MapLayer::Ozone,
            LayerArg::No2 => MapLayer::No2,
            LayerArg::Pm25 => MapLayer::Pm25,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    vayu_core::logging::init_for_verbosity(cli.verbose);

    let config = match cli.config.as_deref() {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    match cli.command {
        Some(Commands::Now { api_url, json }) => cmd_now(&config, api_url, json),
        Some(Commands::Watch {
            api_url,
            interval,
            ticks,
            json,
        }) => cmd_watch(&config, api_url, interval, ticks, json),
        Some(Commands::Calc {
            pm25,
            pm10,
            legend,
            json,
        }) => cmd_calc(pm25, pm10, legend, json),
        Some(Commands::Exposure { pm25, hours }) => {
            cmd_exposure(pm25, hours.unwrap_or(config.dashboard.exposure_hours))
        }
        Some(Commands::History { csv, json }) => cmd_history(&config, csv, json),
        Some(Commands::Map {
            dataset,
            layer,
            top,
            json,
        }) => cmd_map(&config, dataset, layer.into(), top, json),
        None => {
            // Default to "now" command
            cmd_now(&config, None, false)
        }
    }
}

/// Build the history the dashboard owns for the whole run
fn load_history(path: Option<&Path>) -> Result<PollutionHistory> {
    match path {
        Some(path) => PollutionHistory::load_csv(path),
        None => Ok(PollutionHistory::sample()),
    }
}

fn cmd_now(config: &Config, api_url: Option<String>, json: bool) -> Result<()> {
    let history = load_history(config.dashboard.history_csv.as_deref())?;
    let mut source =
        AirGradientClient::new(api_url.unwrap_or_else(|| config.source.api_url.clone()));

    let dashboard = refresh(&mut source, &history, config.dashboard.exposure_hours);
    if json {
        println!("{}", serde_json::to_string_pretty(&dashboard)?);
    } else {
        display_dashboard(&dashboard);
    }
    Ok(())
}

fn cmd_watch(
    config: &Config,
    api_url: Option<String>,
    interval: Option<u64>,
    ticks: Option<u64>,
    json: bool,
) -> Result<()> {
    let interval_secs = interval.unwrap_or(config.dashboard.refresh_interval_secs);
    if interval_secs == 0 {
        return Err(Error::Config("--interval must be at least 1 second".into()));
    }
    if ticks == Some(0) {
        return Err(Error::Config("--ticks must be at least 1".into()));
    }
    let interval = Duration::from_secs(interval_secs);

    let history = load_history(config.dashboard.history_csv.as_deref())?;
    let mut source =
        AirGradientClient::new(api_url.unwrap_or_else(|| config.source.api_url.clone()));
    tracing::info!(
        "Refreshing from {} every {}s",
        source.api_url(),
        interval_secs
    );

    let mut tick: u64 = 0;
    loop {
        let dashboard = refresh(&mut source, &history, config.dashboard.exposure_hours);
        if json {
            println!("{}", serde_json::to_string(&dashboard)?);
        } else {
            display_dashboard(&dashboard);
        }

        tick += 1;
        if ticks.is_some_and(|limit| tick >= limit) {
            break;
        }
        std::thread::sleep(interval);
    }

    Ok(())
}

fn cmd_calc(pm25: f64, pm10: f64, legend: bool, json: bool) -> Result<()> {
    let result = calculate(pm25, pm10);

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    if legend {
        display_legend();
    }

    match result {
        Some(result) => {
            println!("Calculated AQI: {:.2}", result.index);
            println!(
                "Category: {} ({})",
                result.category,
                result.category.color_name()
            );
            println!(
                "{} AQI: {:.2}, {} AQI: {:.2}",
                Pollutant::Pm25.label(),
                result.pm25_index,
                Pollutant::Pm10.label(),
                result.pm10_index
            );
        }
        None => println!("Unable to calculate AQI. Please enter valid inputs."),
    }
    Ok(())
}

fn cmd_exposure(pm25: Option<f64>, hours: f64) -> Result<()> {
    match compute_exposure_equivalent(pm25, hours) {
        Exposure::Cigarettes(n) => println!(
            "Equivalent to smoking {:.2} cigarettes over {} hours.",
            n, hours
        ),
        Exposure::NoData => println!("{}", NO_DATA),
    }
    Ok(())
}

fn cmd_history(config: &Config, csv: Option<PathBuf>, json: bool) -> Result<()> {
    let path = csv.or_else(|| config.dashboard.history_csv.clone());
    let history = load_history(path.as_deref())?;
    let days = history.with_indices();

    if json {
        println!("{}", serde_json::to_string_pretty(&days)?);
        return Ok(());
    }

    if history.is_empty() {
        println!("No history available.");
        return Ok(());
    }

    println!("{:<12} {:>8} {:>8}  Category", "Date", "PM2.5", "AQI");
    for day in &days {
        let aqi = day
            .aqi
            .map(|v| format!("{:.0}", v))
            .unwrap_or_else(|| NO_DATA.to_string());
        let category = day.category.map(|c| c.label()).unwrap_or(NO_DATA);
        println!("{:<12} {:>8.1} {:>8}  {}", day.date, day.pm25, aqi, category);
    }

    if let (Some(mean), Some(peak)) = (history.mean_pm25(), history.peak()) {
        println!();
        println!("Mean PM2.5: {:.1} µg/m³", mean);
        println!("Peak: {:.1} µg/m³ on {}", peak.pm25, peak.date);
    }
    Ok(())
}

fn cmd_map(
    config: &Config,
    dataset: Option<PathBuf>,
    layer: MapLayer,
    top: usize,
    json: bool,
) -> Result<()> {
    let path = dataset
        .or_else(|| config.map.dataset_csv.clone())
        .ok_or_else(|| {
            Error::Config("no dataset given; pass --dataset or set map.dataset_csv".into())
        })?;

    let dataset = GlobalDataset::load_csv(&path)?;
    let map = dataset.choropleth(layer);

    if json {
        println!("{}", serde_json::to_string_pretty(&map)?);
    } else {
        println!("{} cities loaded from {}", dataset.len(), path.display());
        display_map(&map, top);
    }
    Ok(())
}

fn display_dashboard(dashboard: &Dashboard) {
    println!("\n╭─────────────────────────────────────────╮");
    println!("│  Nepal Air Quality Index (AQI)");
    println!("╰─────────────────────────────────────────╯");
    println!();
    println!("  {}", dashboard.location_name);
    println!();
    match dashboard.category {
        Some(category) => println!("  AQI: {}  ({})", dashboard.aqi, category),
        None => println!("  AQI: {}", dashboard.aqi),
    }
    println!("  PM2.5: {}", dashboard.pm25);
    println!("  PM10: {}", dashboard.pm10);
    println!("  Temperature: {}", dashboard.temperature);
    println!("  Humidity: {}", dashboard.humidity);
    println!();
    println!("  ℹ {}", dashboard.health_advice);
    println!("  🚬 {}", dashboard.cigarette_equivalent);

    if let Some(ref marker) = dashboard.marker {
        println!();
        println!(
            "  Location: {:.4}, {:.4} ({})",
            marker.latitude, marker.longitude, marker.popup
        );
    }

    if !dashboard.history.is_empty() {
        println!();
        println!("  {}", dashboard.history_title);
        for day in &dashboard.history {
            println!("  {}  {:>6.1}  {}", day.date, day.pm25, history_bar(day.pm25));
        }
    }

    println!();
    println!("  {}", dashboard.last_updated);
    println!();
}

/// Widest bar drawn in the history chart
const MAX_BAR_WIDTH: usize = 60;

/// One block per 5 µg/m³, capped at [`MAX_BAR_WIDTH`]
fn history_bar(pm25: f64) -> String {
    let blocks = (pm25 / 5.0).round();
    let width = if blocks.is_nan() || blocks <= 0.0 {
        0
    } else {
        (blocks as usize).min(MAX_BAR_WIDTH)
    };
    "█".repeat(width)
}

fn display_legend() {
    println!("AQI Categories and Color Codes");
    println!("{:<9} {:<32} Color", "AQI Range", "Category");
    for category in category_table() {
        println!(
            "{:<9} {:<32} {} ({})",
            category.range_label(),
            category.label(),
            category.color_name(),
            category.color_hex()
        );
    }
    println!();
}

fn display_map(map: &Choropleth, top: usize) {
    println!("{}", map.title);
    println!(
        "{} countries, range {:.1} to {:.1}",
        map.countries.len(),
        map.min,
        map.max
    );
    println!();
    println!(
        "{:<32} {:>8} {:>6}  {:<8} Worst city",
        "Country", "Mean", "Cities", "Fill"
    );
    for shade in map.countries.iter().take(top) {
        println!(
            "{:<32} {:>8.1} {:>6}  {:<8} {} ({:.0})",
            shade.country,
            shade.mean,
            shade.city_count,
            shade.fill,
            shade.worst_city,
            shade.worst_value
        );
    }
}
