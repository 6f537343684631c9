//! Station Map - fire station orientation map tools
//!
//! Command line front end for the coordinate mapper and the marker store.
//! Run with: cargo run --bin station-map -- <command>

use anyhow::{bail, Context};
use serde::Serialize;
use station_map::mapping::{parse_args, parse_number};
use station_map::{AppSettings, CoordinateMapper, MapStore};
use std::env;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "\
Usage: station-map <command> [args]

Coordinates:
  to-pixel <lat> <lng>        Convert GPS to floor-plan pixels (or one \"lat, lng\" argument)
  to-gps <x> <y>              Convert floor-plan pixels to GPS (or one \"[x, y]\" argument)
  validate                    Round-trip every control point and report the error
  points                      List the calibration control points

Markers:
  classes                     List marker classes
  add-class <name> [color]    Create a marker class
  remove-class <id>           Delete an unused marker class
  markers                     List markers
  add-marker <class_id> <x> <y> <name> [description]
                              Create a marker at a floor-plan pixel position
  remove-marker <id>          Delete a marker
  pins                        Show where every marker lands on the floor plan

Settings:
  config                      Show the saved settings
  config set <key> <value>    Save a setting (data-dir, log-filter, pretty-json)

Environment:
  STATION_MAP_DATA_DIR        Directory for classes.json and markers.json
  STATION_MAP_LOG / RUST_LOG  Tracing filter (default from settings: info)";

fn main() -> anyhow::Result<()> {
    // Load .env file if present (ignore errors if file doesn't exist)
    let _ = dotenvy::dotenv();

    let settings = AppSettings::load();

    // Initialize tracing; logs go to stderr so stdout stays machine-readable
    let filter = env::var("STATION_MAP_LOG")
        .or_else(|_| env::var("RUST_LOG"))
        .unwrap_or_else(|_| settings.log_filter.clone());
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let Some((command, rest)) = args.split_first() else {
        println!("{}", USAGE);
        return Ok(());
    };

    let mapper = CoordinateMapper::new();

    match command.as_str() {
        "to-pixel" => {
            let (lat, lng) = parse_args(rest).context("Expected <lat> <lng>")?;
            print_json(&settings, &mapper.gps_to_pixel(lat, lng))?;
        }
        "to-gps" => {
            let (x, y) = parse_args(rest).context("Expected <x> <y>")?;
            print_json(&settings, &mapper.pixel_to_gps(x, y))?;
        }
        "validate" => run_validate(&mapper)?,
        "points" => {
            for point in mapper.control_points() {
                println!(
                    "{:<13} pixel=({:>6}, {:>6})  gps=({}, {})",
                    point.name, point.pixel_x, point.pixel_y, point.lat, point.lng
                );
            }
            let bounds = mapper.bounds();
            println!("bounds: width={} height={}", bounds.width, bounds.height);
        }
        "classes" => {
            let store = open_store(&settings)?;
            print_json(&settings, store.classes())?;
        }
        "add-class" => {
            let name = rest.first().context("Expected <name> [color]")?;
            let color = rest.get(1).cloned();
            let mut store = open_store(&settings)?;
            let class = store.add_class(name, color)?.clone();
            store.save()?;
            println!("✅ Added class {} ({})", class.name, class.id);
        }
        "remove-class" => {
            let id = rest.first().context("Expected <id>")?;
            let mut store = open_store(&settings)?;
            let class = store.remove_class(id)?;
            store.save()?;
            println!("🗑️ Removed class {}", class.name);
        }
        "markers" => {
            let store = open_store(&settings)?;
            print_json(&settings, store.markers())?;
        }
        "add-marker" => run_add_marker(&settings, &mapper, rest)?,
        "remove-marker" => {
            let id = rest.first().context("Expected <id>")?;
            let mut store = open_store(&settings)?;
            let marker = store.remove_marker(id)?;
            store.save()?;
            println!("🗑️ Removed marker {}", marker.name);
        }
        "pins" => {
            let store = open_store(&settings)?;
            for pin in store.pins(&mapper) {
                let flag = if pin.placement.is_valid { "  " } else { "⚠️" };
                println!(
                    "{} {:<24} ({:>6}, {:>6})  {}",
                    flag, pin.marker.name, pin.placement.pixel_x, pin.placement.pixel_y, pin.marker.id
                );
            }
        }
        "config" => run_config(settings, rest)?,
        "help" | "--help" | "-h" => println!("{}", USAGE),
        other => {
            eprintln!("Unknown command: {}\n", other);
            eprintln!("{}", USAGE);
            std::process::exit(2);
        }
    }

    Ok(())
}

/// Print the round-trip report and fail when any control point drifts.
fn run_validate(mapper: &CoordinateMapper) -> anyhow::Result<()> {
    let report = mapper.validate_reference_points();

    println!("🎯 Control point round trip");
    println!("================================================");
    for residual in &report.points {
        println!(
            "{:<13} expected=({:>6}, {:>6}) actual=({:>6}, {:>6}) error={:.4}",
            residual.name,
            residual.expected_x,
            residual.expected_y,
            residual.actual_x,
            residual.actual_y,
            residual.error
        );
    }
    println!("================================================");
    println!(
        "mean error: {:.4} px, max error: {:.4} px",
        report.mean_error, report.max_error
    );

    if !report.is_exact() {
        bail!("Control points no longer round-trip exactly");
    }
    println!("✅ All control points round-trip exactly");
    Ok(())
}

fn run_add_marker(
    settings: &AppSettings,
    mapper: &CoordinateMapper,
    args: &[String],
) -> anyhow::Result<()> {
    let [class_id, x, y, name, description @ ..] = args else {
        bail!("Expected <class_id> <x> <y> <name> [description]");
    };
    let x = parse_number(x)?;
    let y = parse_number(y)?;
    let description = description.join(" ");

    let mut store = open_store(settings)?;
    let marker = store
        .place_marker_at_pixel(mapper, x, y, name, class_id, &description)?
        .clone();
    store.save()?;

    let placement = mapper.gps_to_pixel(marker.lat, marker.lng);
    println!(
        "✅ Added marker {} ({}) at lat={}, lng={}",
        marker.name, marker.id, marker.lat, marker.lng
    );
    if !placement.is_valid {
        println!(
            "⚠️ Marker renders clamped at ({}, {})",
            placement.pixel_x, placement.pixel_y
        );
    }
    Ok(())
}

fn run_config(mut settings: AppSettings, args: &[String]) -> anyhow::Result<()> {
    match args {
        [] => print_json(&settings, &settings),
        [action, key, value @ ..] if action == "set" => {
            settings
                .set(key, &value.join(" "))
                .map_err(anyhow::Error::msg)?;
            let path = settings.save().map_err(anyhow::Error::msg)?;
            println!("✅ Saved {} to {}", key, path.display());
            Ok(())
        }
        _ => bail!("Expected `config` or `config set <key> <value>`"),
    }
}

fn open_store(settings: &AppSettings) -> anyhow::Result<MapStore> {
    let override_dir = env::var("STATION_MAP_DATA_DIR").ok();
    let dir = settings
        .resolve_data_dir(override_dir.as_deref())
        .context("Cannot determine data directory")?;
    MapStore::load(&dir).with_context(|| format!("Failed to load store from {}", dir.display()))
}

fn print_json<T: Serialize + ?Sized>(settings: &AppSettings, value: &T) -> anyhow::Result<()> {
    let content = if settings.pretty_json {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", content);
    Ok(())
}
