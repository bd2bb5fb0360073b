//! Drawall command-line simulator.
//!
//! Runs a drawing session against the simulated hardware and reports what
//! the motors would have done. The status stream for the visualizer is
//! written to stdout.

use anyhow::{bail, Context};
use drawall::{
    init_logging, load_config_reported, Anchor, DrawingSize, JsonLinesTelemetry,
    NullTelemetry, PlotterConfig, SerialTelemetry, Session, SimulatedHardware, Telemetry,
    BUILD_DATE, VERSION,
};
use std::io;
use std::path::PathBuf;
use std::str::FromStr;

const USAGE: &str = "\
Usage: drawall [OPTIONS] <DRAWING>...

Arguments:
  <DRAWING>...  SVG or GCode files to draw, in order

Options:
  -c, --config <FILE>      Configuration file (key/value, .json or .toml)
  -s, --size <SIZE>        fit or original [default: fit]
  -p, --position <ANCHOR>  Placement on the sheet, e.g. UPPER_LEFT [default: CENTER]
  -a, --area               Only trace the area of each SVG drawing
      --speed <MM_S>       Drawing speed, overrides the configuration
  -t, --telemetry <KIND>   none, serial or json [default: none]
  -V, --version            Print version
  -h, --help               Print this help message";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TelemetryKind {
    None,
    Serial,
    Json,
}

#[derive(Debug)]
struct Options {
    config: Option<PathBuf>,
    size: DrawingSize,
    position: Anchor,
    area_only: bool,
    speed: Option<f64>,
    telemetry: TelemetryKind,
    drawings: Vec<PathBuf>,
}

enum Action {
    Run(Options),
    Help,
    Version,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> anyhow::Result<Action> {
    let mut options = Options {
        config: None,
        size: DrawingSize::Fit,
        position: Anchor::Center,
        area_only: false,
        speed: None,
        telemetry: TelemetryKind::None,
        drawings: Vec::new(),
    };

    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        let mut value = |name: &str| {
            args.next()
                .with_context(|| format!("missing value for {}", name))
        };
        match arg.as_str() {
            "-h" | "--help" => return Ok(Action::Help),
            "-V" | "--version" => return Ok(Action::Version),
            "-c" | "--config" => options.config = Some(PathBuf::from(value(arg.as_str())?)),
            "-s" | "--size" => {
                options.size = match value(arg.as_str())?.to_ascii_lowercase().as_str() {
                    "fit" => DrawingSize::Fit,
                    "original" => DrawingSize::Original,
                    other => bail!("unknown size '{}', expected fit or original", other),
                }
            }
            "-p" | "--position" => {
                options.position = Anchor::from_str(&value(arg.as_str())?).map_err(anyhow::Error::msg)?
            }
            "-a" | "--area" => options.area_only = true,
            "--speed" => {
                let raw = value(arg.as_str())?;
                options.speed = Some(
                    raw.parse()
                        .with_context(|| format!("invalid speed '{}'", raw))?,
                );
            }
            "-t" | "--telemetry" => {
                options.telemetry = match value(arg.as_str())?.as_str() {
                    "none" => TelemetryKind::None,
                    "serial" => TelemetryKind::Serial,
                    "json" => TelemetryKind::Json,
                    other => bail!("unknown telemetry '{}', expected none, serial or json", other),
                }
            }
            flag if flag.starts_with('-') => bail!("unknown option '{}'\n\n{}", flag, USAGE),
            _ => options.drawings.push(PathBuf::from(&arg)),
        }
    }

    if options.drawings.is_empty() {
        bail!("no drawing given\n\n{}", USAGE);
    }
    Ok(Action::Run(options))
}

fn run(options: Options) -> anyhow::Result<()> {
    let mut telemetry: Box<dyn Telemetry> = match options.telemetry {
        TelemetryKind::None => Box::new(NullTelemetry),
        TelemetryKind::Serial => Box::new(SerialTelemetry::new(io::stdout())),
        TelemetryKind::Json => Box::new(JsonLinesTelemetry::new(io::stdout())),
    };

    let config = match &options.config {
        Some(path) => load_config_reported(path, &mut *telemetry)
            .with_context(|| format!("loading {}", path.display()))?,
        None => PlotterConfig::default(),
    };

    let mut session = Session::begin(SimulatedHardware::new(), &mut *telemetry, &config)?;
    if let Some(speed) = options.speed {
        session.set_speed(speed);
    }

    for path in &options.drawings {
        if options.area_only {
            let mut src = session.open(path)?;
            session.draw_area(&mut src, options.size, options.position)?;
        } else {
            let summary = session.draw_file(path, options.size, options.position)?;
            tracing::debug!("{}: {:?}", path.display(), summary);
        }
    }

    let (hw, _) = session.end()?;
    tracing::info!(
        "{} steps, {:.3} s of motion, {} ms of dwell",
        hw.total_pulses(),
        hw.clock_us() as f64 / 1e6,
        hw.dwell_ms()
    );
    Ok(())
}

fn main() -> anyhow::Result<()> {
    init_logging()?;

    match parse_args(std::env::args().skip(1))? {
        Action::Help => println!("{}", USAGE),
        Action::Version => println!("drawall {} (built {})", VERSION, BUILD_DATE),
        Action::Run(options) => run(options)?,
    }
    Ok(())
}
