//! Grid/mesh scalar field converter.
//!
//! Moves values between ESRI ASCII grids and facet-grouped triangle
//! listings, checks value files against their triangle listing and compares
//! a reconstructed grid with its reference.

use anyhow::{bail, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use converter::{pipeline, ConverterConfig, GridToMeshMethod};
use serde::Serialize;
use std::path::PathBuf;
use surface_mapper::AggregationMode;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "converter")]
#[command(about = "Convert scalar fields between grids and triangle meshes")]
struct Args {
    /// Configuration file path
    #[arg(short, long, env = "CONVERTER_CONFIG")]
    config: Option<PathBuf>,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Emit logs as JSON lines
    #[arg(long)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

/// Placement and aggregation flags shared by both conversion directions.
#[derive(ClapArgs, Debug)]
struct MappingArgs {
    /// Use area-weighted means instead of plain means
    #[arg(long)]
    weighted: bool,

    /// Keep mesh coordinates as they are instead of centring on the grid
    #[arg(long)]
    no_align: bool,

    /// Rotate the mesh counter-clockwise by this many degrees first
    #[arg(long)]
    rotation: Option<f64>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Aggregate an ASCII grid onto triangles and write a .val file
    GridToMesh {
        grid: PathBuf,
        cir: PathBuf,
        out: PathBuf,

        /// surface, barycenter, bilinear or multisample
        #[arg(long)]
        method: Option<String>,

        #[command(flatten)]
        mapping: MappingArgs,
    },

    /// Rebuild an ASCII grid from a .val file on a reference grid
    MeshToGrid {
        reference: PathBuf,
        cir: PathBuf,
        val: PathBuf,
        out: PathBuf,

        #[command(flatten)]
        mapping: MappingArgs,
    },

    /// Check that a .val file matches the facets of a .cir file
    Verify { cir: PathBuf, val: PathBuf },

    /// Compare a reconstructed grid against a reference grid
    Compare {
        reference: PathBuf,
        reconstructed: PathBuf,

        /// Write the per-cell error grid here
        #[arg(long)]
        error_out: Option<PathBuf>,
    },
}

fn init_tracing(log_level: &str, json: bool) -> Result<()> {
    let level = match log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr);

    if json {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }
    Ok(())
}

fn apply_mapping_args(config: &mut ConverterConfig, args: &MappingArgs) {
    if args.weighted {
        config.aggregation = AggregationMode::AreaWeighted;
    }
    if args.no_align {
        config.align = false;
    }
    if let Some(rotation) = args.rotation {
        config.rotation_deg = rotation;
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let args = Args::parse();
    init_tracing(&args.log_level, args.log_json)?;

    let mut config = ConverterConfig::load(args.config.as_deref())?;

    match args.command {
        Command::GridToMesh {
            grid,
            cir,
            out,
            method,
            mapping,
        } => {
            apply_mapping_args(&mut config, &mapping);
            if let Some(name) = method {
                config.method = match GridToMeshMethod::from_str(&name) {
                    Some(method) => method,
                    None => bail!("Unknown grid to mesh method: {}", name),
                };
            }
            config.validate()?;

            info!(grid = %grid.display(), cir = %cir.display(), "Starting grid to mesh");
            let summary = pipeline::grid_to_mesh(&grid, &cir, &out, &config)?;
            print_json(&summary)?;
        }
        Command::MeshToGrid {
            reference,
            cir,
            val,
            out,
            mapping,
        } => {
            apply_mapping_args(&mut config, &mapping);
            config.validate()?;

            info!(reference = %reference.display(), val = %val.display(), "Starting mesh to grid");
            let summary = pipeline::mesh_to_grid(&reference, &cir, &val, &out, &config)?;
            print_json(&summary)?;
        }
        Command::Verify { cir, val } => {
            let report = pipeline::verify(&cir, &val)?;
            print_json(&report)?;
            if !report.is_consistent() {
                bail!("{} does not match {}", val.display(), cir.display());
            }
        }
        Command::Compare {
            reference,
            reconstructed,
            error_out,
        } => {
            config.validate()?;
            let stats = pipeline::compare(&reference, &reconstructed, error_out.as_deref(), &config)?;
            print_json(&stats)?;
        }
    }

    Ok(())
}
