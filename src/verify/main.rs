//! Boundary verification CLI.
//!
//! Loads a GeoJSON dataset, finds the named boundary and reports whether
//! each given coordinate falls inside it.

mod config;
mod report;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

use perimeter::geojson::load_feature_collection;
use perimeter::{FeatureIndex, Verifier};

use crate::config::{parse_point, CliOverrides, RunConfig};
use crate::report::{render_text, Locations};

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[derive(Parser, Debug)]
#[command(name = "verify")]
#[command(about = "Check that coordinates fall inside a named boundary")]
struct Args {
    /// GeoJSON FeatureCollection (.json or .json.gz)
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// TOML run file with dataset, target and points
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Substring of the feature name to check against
    #[arg(short, long)]
    name: Option<String>,

    /// Substring of the containing area (town) name
    #[arg(short, long)]
    area: Option<String>,

    /// Point to check, as LABEL=LNG,LAT (repeatable)
    #[arg(short, long = "point", value_parser = parse_point)]
    points: Vec<perimeter::LabeledPoint>,

    /// Treat interior rings as holes
    #[arg(long)]
    holes: bool,

    /// Report which feature each failing point actually falls in
    #[arg(long)]
    locate: bool,

    /// Check points on the rayon thread pool
    #[arg(long)]
    parallel: bool,

    /// Fail if any feature in the dataset has unusable geometry
    #[arg(long)]
    strict_geometry: bool,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

/// Every point inside the boundary
const EXIT_OK: u8 = 0;
/// At least one point outside the boundary
const EXIT_FAILED_CHECK: u8 = 1;
/// Lookup, geometry, config or IO error; no verdict was reached
const EXIT_ERROR: u8 = 2;

fn main() -> ExitCode {
    let args = Args::parse();

    // Initialize logging; stdout is reserved for the report
    let subscriber = FmtSubscriber::builder()
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::INFO })
        .with_writer(std::io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to initialize logging: {}", e);
        return ExitCode::from(EXIT_ERROR);
    }

    let outcome = run(args);
    if let Err(e) = &outcome {
        error!("{:#}", e);
    }
    ExitCode::from(exit_status(&outcome))
}

fn exit_status(outcome: &Result<bool>) -> u8 {
    match outcome {
        Ok(true) => EXIT_OK,
        Ok(false) => EXIT_FAILED_CHECK,
        Err(_) => EXIT_ERROR,
    }
}

/// Run one verification; `Ok(true)` when every point is inside
fn run(args: Args) -> Result<bool> {
    let run = match &args.config {
        Some(path) => RunConfig::load_from_file(path)?,
        None => RunConfig::default(),
    };

    let plan = run.merge(CliOverrides {
        file: args.file,
        name: args.name,
        area: args.area,
        points: args.points,
        holes: args.holes,
        strict_geometry: args.strict_geometry,
    })?;

    let collection = load_feature_collection(&plan.dataset, plan.strict_geometry)?;
    let verifier = Verifier::new(plan.keys.clone(), plan.policy);

    let report = if args.parallel {
        verifier.verify_par(&collection, &plan.request)?
    } else {
        verifier.verify(&collection, &plan.request)?
    };

    let locations: Option<Locations> = if args.locate && !report.all_contained {
        let index = FeatureIndex::build(&collection);
        Some(
            report
                .failures()
                .map(|v| {
                    let coord = geo_types::Coord { x: v.lng, y: v.lat };
                    (v.label.clone(), index.locate(coord, plan.policy))
                })
                .collect(),
        )
    } else {
        None
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        let text = render_text(&report, &collection, &plan.keys, locations.as_ref())
            .context("Failed to render report")?;
        print!("{}", text);
    }

    info!(
        "{}/{} points inside",
        report.verdicts.len() - report.failures().count(),
        report.verdicts.len()
    );

    Ok(report.all_contained)
}

#[cfg(test)]
mod tests {
    use super::*;
    use perimeter::VerifyError;

    #[test]
    fn test_exit_status_pass_and_fail() {
        assert_eq!(exit_status(&Ok(true)), EXIT_OK);
        assert_eq!(exit_status(&Ok(false)), EXIT_FAILED_CHECK);
    }

    #[test]
    fn test_exit_status_errors_are_distinct() {
        let not_found: Result<bool> =
            Err(VerifyError::feature_not_found("北崙里", Some("竹北市")).into());
        assert_eq!(exit_status(&not_found), EXIT_ERROR);

        let invalid: Result<bool> =
            Err(VerifyError::invalid_geometry("北崙里", "missing geometry").into());
        assert_eq!(exit_status(&invalid), EXIT_ERROR);

        let io: Result<bool> = Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "villages.json",
        )
        .into());
        assert_eq!(exit_status(&io), EXIT_ERROR);
        assert_ne!(EXIT_ERROR, EXIT_FAILED_CHECK);
    }

    #[test]
    fn test_missing_dataset_is_an_error() {
        let args = Args::parse_from(["verify", "--name", "北崙里"]);
        assert_eq!(exit_status(&run(args)), EXIT_ERROR);
    }
}
