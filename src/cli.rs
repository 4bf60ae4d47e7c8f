//! Command-line entry points: one subcommand per way of composing the runner.

use chrono::{DateTime, Local, Weekday};
use clap::{Args, Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::config::{load_config, to_duration, Config};
use crate::data::features::{FeatureSchema, SchemaPolicy};
use crate::data::readings::load_readings;
use crate::data::synthesis::{
    FeatureSource, JitteredWeather, WeatherBaseline, ZoneRanges, ZoneReadings, ZoneSampler,
};
use crate::error::{Error, Result};
use crate::model::Artifacts;
use crate::runner::{
    run_fixed_count, run_time_boxed, run_unbounded, Advisory, BlockingPacer, ChartMode,
    ChartReporter, ConsoleReporter, InterruptiblePacer, Pacer, PredictionLog, Predictor,
    Simulation,
};
use crate::utils::input::Prompter;
use crate::utils::plot::ChartStyle;

#[derive(Parser, Debug)]
#[command(
    name = "smart-water",
    version,
    about = "Water consumption predictions for the Pune zones"
)]
pub struct Cli {
    /// TOML configuration file (defaults to ./smart_water.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding the model and scaler artifacts
    #[arg(long, global = true)]
    pub artifact_dir: Option<PathBuf>,

    /// What to do when input columns differ from the artifact's: fill-zero or fail
    #[arg(long, global = true, value_parser = parse_policy)]
    pub schema_policy: Option<SchemaPolicy>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// One-shot prediction from zone readings
    Predict(PredictArgs),
    /// Weather form with an optional 15-step live simulation
    Dashboard(DashboardArgs),
    /// Time-boxed live chart with a CSV prediction log
    Visualize(VisualizeArgs),
    /// Console monitor that runs until Ctrl-C
    Monitor(MonitorArgs),
    /// Print what the loaded artifacts expect
    Inspect,
}

#[derive(Args, Debug, Clone)]
pub struct PredictArgs {
    /// CSV of readings, one prediction per row (columns matched by header)
    #[arg(long)]
    pub input: Option<PathBuf>,
    #[arg(long, default_value_t = 420.5)]
    pub parvati: f64,
    #[arg(long, default_value_t = 15.2)]
    pub cantonment: f64,
    #[arg(long, default_value_t = 22.4)]
    pub waraje: f64,
    #[arg(long, default_value_t = 10.9)]
    pub old_holkar: f64,
    #[arg(long, default_value_t = 165.3)]
    pub vadgaon: f64,
}

impl PredictArgs {
    fn readings(&self) -> ZoneReadings {
        ZoneReadings {
            parvati: self.parvati,
            cantonment: self.cantonment,
            waraje: self.waraje,
            old_holkar: self.old_holkar,
            vadgaon: self.vadgaon,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct DashboardArgs {
    /// Temperature in °C (10-45)
    #[arg(long, default_value_t = 25.0)]
    pub temperature: f64,
    /// Humidity in % (10-100)
    #[arg(long, default_value_t = 60.0)]
    pub humidity: f64,
    /// Rainfall in mm (0-200)
    #[arg(long, default_value_t = 10.0)]
    pub rainfall: f64,
    /// Population in thousands (0-10000)
    #[arg(long, default_value_t = 200.0)]
    pub population: f64,
    /// Day of week, e.g. Mon
    #[arg(long, default_value = "Mon", value_parser = parse_weekday)]
    pub day: Weekday,
    /// Prompt for every control instead of using flags
    #[arg(long)]
    pub interactive: bool,
    /// Run the live simulation after the single prediction
    #[arg(long)]
    pub simulate: bool,
    /// Chart image rewritten every simulation step
    #[arg(long)]
    pub chart: Option<PathBuf>,
}

impl DashboardArgs {
    fn baseline(&self) -> WeatherBaseline {
        WeatherBaseline {
            temperature: self.temperature,
            humidity: self.humidity,
            rainfall: self.rainfall,
            population: self.population,
            day: self.day,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct VisualizeArgs {
    /// Wall-clock length of the run in seconds
    #[arg(long)]
    pub duration_secs: Option<f64>,
    /// CSV log written when the run ends
    #[arg(long)]
    pub log: Option<PathBuf>,
    /// Chart image rewritten every tick
    #[arg(long)]
    pub chart: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct MonitorArgs {
    /// Seconds between readings
    #[arg(long)]
    pub interval_secs: Option<f64>,
}

fn parse_policy(s: &str) -> std::result::Result<SchemaPolicy, String> {
    s.parse().map_err(|e: Error| e.to_string())
}

fn parse_weekday(s: &str) -> std::result::Result<Weekday, String> {
    s.parse().map_err(|_| format!("'{s}' is not a day of the week"))
}

/// Resolves configuration, loads the artifacts once and dispatches.
pub fn run(cli: Cli) -> Result<()> {
    let mut config = load_config(cli.config.as_deref())?;
    if let Some(dir) = cli.artifact_dir {
        config.artifacts.dir = dir;
    }
    if let Some(policy) = cli.schema_policy {
        config.schema_policy = policy;
    }

    let artifacts = Artifacts::load(&config.artifact_paths())?;
    let predictor = Predictor::new(&artifacts, config.schema_policy);
    let mut out = io::stdout();

    match cli.command {
        Command::Predict(args) => predict(&predictor, &args, Local::now(), &mut out),
        Command::Dashboard(args) => {
            let stdin = io::stdin();
            let mut prompter = Prompter::new(stdin.lock(), io::stdout());
            let mut pacer = BlockingPacer::new();
            dashboard(&predictor, &config, &args, &mut prompter, &mut pacer, &mut out)
        }
        Command::Visualize(args) => {
            visualize(&predictor, &config, &args, &mut BlockingPacer::new(), &mut out)
        }
        Command::Monitor(args) => monitor(&predictor, &config, &args, &mut out),
        Command::Inspect => inspect(&artifacts, &mut out),
    }
}

fn write_err(e: io::Error) -> Error {
    Error::io("writing to stdout", e)
}

pub fn predict<W: Write>(
    predictor: &Predictor<'_>,
    args: &PredictArgs,
    now: DateTime<Local>,
    out: &mut W,
) -> Result<()> {
    match &args.input {
        None => {
            let features = args.readings().to_features(now);
            let predicted = predictor.predict(&features)?;
            let advisory = Advisory::classify(predicted);
            writeln!(out, "\nPredicted Total Water Supply (MLD): {predicted:.2}")
                .map_err(write_err)?;
            writeln!(out, "{}", advisory.forecast_message()).map_err(write_err)?;
        }
        Some(path) => {
            let readings = load_readings(path)?;
            info!(rows = readings.len(), path = %path.display(), "batch readings loaded");
            for (row, features) in readings.iter().enumerate() {
                let predicted = predictor.predict(features)?;
                writeln!(
                    out,
                    "Row {}: Predicted Total Water Supply (MLD): {predicted:.2} - {}",
                    row + 1,
                    Advisory::classify(predicted).forecast_message()
                )
                .map_err(write_err)?;
            }
        }
    }
    Ok(())
}

/// Weather form, one prediction, then optionally the fixed-count simulation
/// paced by `pacer`.
pub fn dashboard<R, P, Pc, W>(
    predictor: &Predictor<'_>,
    config: &Config,
    args: &DashboardArgs,
    prompter: &mut Prompter<R, P>,
    pacer: &mut Pc,
    out: &mut W,
) -> Result<()>
where
    R: BufRead,
    P: Write,
    Pc: Pacer,
    W: Write,
{
    let defaults = args.baseline();
    let baseline = if args.interactive {
        WeatherBaseline {
            temperature: prompter.number(
                "Temperature (°C)",
                WeatherBaseline::TEMPERATURE_RANGE,
                defaults.temperature,
            )?,
            humidity: prompter.number(
                "Humidity (%)",
                WeatherBaseline::HUMIDITY_RANGE,
                defaults.humidity,
            )?,
            rainfall: prompter.number(
                "Rainfall (mm)",
                WeatherBaseline::RAINFALL_RANGE,
                defaults.rainfall,
            )?,
            population: prompter.number(
                "Population (in 1000s)",
                WeatherBaseline::POPULATION_RANGE,
                defaults.population,
            )?,
            day: prompter.weekday("Day of Week", defaults.day)?,
        }
    } else {
        defaults
    };
    baseline.validate()?;

    let predicted = predictor.predict(&baseline.to_features())?;
    writeln!(out, "Predicted Water Usage: {predicted:.2} litres").map_err(write_err)?;

    let simulate =
        args.simulate || (args.interactive && prompter.confirm("Start Real-Time Simulation?")?);
    if !simulate {
        return Ok(());
    }

    let interval = config.timing.dashboard_interval()?;
    let chart = args
        .chart
        .clone()
        .unwrap_or_else(|| config.output.dashboard_chart_path.clone());
    let reporter = ChartReporter::new(&chart, ChartStyle::DASHBOARD, ChartMode::Placeholder);
    let source = JitteredWeather::new(baseline, rand::thread_rng());
    let mut sim = Simulation::new(*predictor, source, reporter);

    writeln!(out, "Live chart: {}", chart.display()).map_err(write_err)?;
    run_fixed_count(&mut sim, pacer, config.timing.dashboard_iterations, interval)?;
    sim.finish()?;
    writeln!(out, "Simulation Completed!").map_err(write_err)?;
    Ok(())
}

/// Time-boxed surge simulation; the CSV log is written once when the
/// deadline passes.
pub fn visualize<Pc: Pacer, W: Write>(
    predictor: &Predictor<'_>,
    config: &Config,
    args: &VisualizeArgs,
    pacer: &mut Pc,
    out: &mut W,
) -> Result<()> {
    let duration = match args.duration_secs {
        Some(secs) => to_duration("duration_secs", secs)?,
        None => config.timing.visualize_duration()?,
    };
    let interval = config.timing.visualize_interval()?;
    let log_path = args
        .log
        .clone()
        .unwrap_or_else(|| config.output.log_path.clone());
    let chart = args
        .chart
        .clone()
        .unwrap_or_else(|| config.output.chart_path.clone());

    let reporter = ChartReporter::new(&chart, ChartStyle::LIVE, ChartMode::Live);
    let source = ZoneSampler::new(ZoneRanges::SURGE, rand::thread_rng());
    let mut sim = Simulation::new(*predictor, source, reporter);

    run_time_boxed(&mut sim, pacer, duration, interval)?;
    writeln!(
        out,
        "Visualization stopped after {} seconds.",
        duration.as_secs_f64()
    )
    .map_err(write_err)?;

    let schema = sim.source().schema();
    let log = sim.finish()?;
    save_log(&log, &schema, &log_path, out)?;
    writeln!(out, "Final chart: {}", chart.display()).map_err(write_err)?;
    Ok(())
}

fn save_log<W: Write>(
    log: &PredictionLog,
    schema: &FeatureSchema,
    path: &Path,
    out: &mut W,
) -> Result<()> {
    log.write_csv(path, schema)?;
    writeln!(out, "Predictions saved to {}", path.display()).map_err(write_err)
}

pub fn monitor<W: Write>(
    predictor: &Predictor<'_>,
    config: &Config,
    args: &MonitorArgs,
    out: &mut W,
) -> Result<()> {
    let interval = match args.interval_secs {
        Some(secs) => to_duration("interval_secs", secs)?,
        None => config.timing.monitor_interval()?,
    };
    writeln!(out, "Smart Water Saver - IoT Simulation Started!").map_err(write_err)?;

    let reporter = ConsoleReporter::new(io::stdout());
    let source = ZoneSampler::new(ZoneRanges::STEADY, rand::thread_rng());
    let mut sim = Simulation::new(*predictor, source, reporter);
    let mut pacer = InterruptiblePacer::new()?;

    run_unbounded(&mut sim, &mut pacer, interval, out)?;
    Ok(())
}

pub fn inspect<W: Write>(artifacts: &Artifacts, out: &mut W) -> Result<()> {
    writeln!(out, "Model:  {}", artifacts.model().describe()).map_err(write_err)?;
    writeln!(out, "Scaler: {}", artifacts.scaler().describe()).map_err(write_err)?;

    let names = artifacts
        .model()
        .feature_names()
        .or_else(|| artifacts.scaler().feature_names());
    match names {
        Some(names) => {
            writeln!(out, "Expected features:").map_err(write_err)?;
            for (i, name) in names.iter().enumerate() {
                writeln!(out, "  {i}: {name}").map_err(write_err)?;
            }
        }
        None => {
            writeln!(out, "Feature names not recorded; inputs are used in the order given.")
                .map_err(write_err)?
        }
    }
    Ok(())
}
