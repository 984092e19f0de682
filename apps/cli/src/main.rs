// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! UWG Typology - derive a building typology from building masses.
//!
//! Reads a JSON scene (typology categories plus a list of building masses),
//! measures the masses and prints the validated typology.
//!
//! Settings come from `UWG_*` environment variables; `RUST_LOG` controls
//! log output.

use anyhow::{Context, Result};
use clap::Parser;
use serde_json::Value;
use std::path::PathBuf;
use uwg_geometry::AngleThresholds;
use uwg_typology::{BuildingTypology, Settings, TypologyAggregator};

mod scene;

use scene::Scene;

#[derive(Parser, Debug)]
#[command(name = "uwg-typology")]
#[command(about = "Derive an urban building typology from building masses")]
#[command(version)]
struct Args {
    /// Path to the JSON scene
    #[arg(required = true)]
    scene: PathBuf,

    /// Override the scene's building program
    #[arg(long)]
    program: Option<String>,

    /// Override the scene's construction age
    #[arg(long)]
    age: Option<String>,

    /// Roof threshold in degrees from straight up
    #[arg(long, value_name = "DEGREES")]
    max_roof_angle: Option<f64>,

    /// Floor threshold in degrees from straight down
    #[arg(long, value_name = "DEGREES")]
    max_floor_angle: Option<f64>,

    /// Print the typology as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "warn,uwg_geometry=info,uwg_typology=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let settings = Settings::from_env().context("invalid UWG settings")?;

    let text = std::fs::read_to_string(&args.scene)
        .with_context(|| format!("failed to read {}", args.scene.display()))?;
    let mut scene: Scene = serde_json::from_str(&text)
        .with_context(|| format!("failed to parse {}", args.scene.display()))?;

    if let Some(program) = args.program {
        scene.bldg_program = Value::String(program);
    }
    if let Some(age) = args.age {
        scene.bldg_age = Value::String(age);
    }

    let solids = scene
        .buildings
        .iter()
        .enumerate()
        .map(|(i, mass)| mass.to_solid().with_context(|| format!("building {i} is invalid")))
        .collect::<Result<Vec<_>>>()?;

    let thresholds = AngleThresholds::new(
        args.max_roof_angle.unwrap_or(settings.thresholds.max_roof_angle),
        args.max_floor_angle.unwrap_or(settings.thresholds.max_floor_angle),
    );

    tracing::info!(
        buildings = solids.len(),
        tolerance = settings.tolerance,
        max_roof_angle = thresholds.max_roof_angle,
        max_floor_angle = thresholds.max_floor_angle,
        "Analyzing building masses"
    );

    let kernel = settings.kernel();
    let aggregator = TypologyAggregator::with_thresholds(&kernel, thresholds);
    let geometry = aggregator
        .aggregate(&solids)
        .context("failed to measure building masses")?;

    for (i, building) in geometry.buildings.iter().enumerate() {
        tracing::debug!(
            building = i,
            height = building.height,
            footprint = building.footprint_area,
            weight = building.weight,
            "building metrics"
        );
    }

    let record = scene.record(
        geometry.average_height,
        geometry.footprint_area,
        geometry.facade_area,
    );
    let typology = BuildingTypology::from_record(record).context("invalid typology")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&typology)?);
    } else {
        println!("{typology}");
    }

    Ok(())
}
