//! Command-line front end for Waterman polyhedra.
//!
//! The binary in `main.rs` only parses arguments, sets up logging and picks
//! the output stream; [`run`] does the work so it can be tested against an
//! in-memory writer.

use std::collections::BTreeMap;
use std::io::{self, Write};
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use log::info;
use serde::Serialize;
use thiserror::Error;
use waterman_hull::export::{flatten_coords, normalize_coords, write_obj};
use waterman_hull::{waterman_polyhedron_of, HullConfig, HullError, Polyhedron};

#[derive(Parser, Debug)]
#[command(name = "waterman-cli")]
#[command(about = "Generate the Waterman polyhedron of a sphere radius")]
#[command(version, allow_negative_numbers = true)]
pub struct Cli {
    /// Sphere radius
    pub radius: f64,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Summary)]
    pub format: Format,

    /// Rescale coordinates by their overall range
    #[arg(short, long)]
    pub normalize: bool,

    /// Explicit hull distance tolerance (default: derived from the extent)
    #[arg(short, long)]
    pub tolerance: Option<f64>,

    /// Output file path (default: stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Wavefront OBJ with polygon faces
    Obj,
    /// Vertices and faces as JSON
    Json,
    /// Counts only
    Summary,
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Hull(#[from] HullError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Serialize)]
struct JsonReport<'a> {
    radius: f64,
    distance_tolerance: f64,
    vertices: Vec<[f64; 3]>,
    faces: &'a [Vec<usize>],
}

/// Builds the polyhedron described by `cli` and writes it to `out`.
pub fn run<W: Write>(cli: &Cli, mut out: W) -> Result<(), CliError> {
    let config = HullConfig::new(cli.tolerance, cli.normalize)?;
    let cloud = waterman_lattice::generate(cli.radius);
    let points = cloud.len();
    info!("radius {}: {points} lattice points", cli.radius);

    let polyhedron = waterman_polyhedron_of(cli.radius, &cloud, &config)?;
    info!(
        "{} vertices, {} faces",
        polyhedron.num_vertices(),
        polyhedron.num_faces()
    );

    match cli.format {
        Format::Obj => write_obj(&polyhedron, config.normalize_output, &mut out)?,
        Format::Json => {
            let report = json_report(cli.radius, &polyhedron, config.normalize_output);
            serde_json::to_writer_pretty(&mut out, &report)?;
            writeln!(out)?;
        }
        Format::Summary => write_summary(cli.radius, points, &polyhedron, &mut out)?,
    }
    out.flush()?;
    Ok(())
}

fn json_report(radius: f64, polyhedron: &Polyhedron, normalize: bool) -> JsonReport<'_> {
    let mut coords = flatten_coords(polyhedron);
    if normalize {
        normalize_coords(&mut coords);
    }
    JsonReport {
        radius,
        distance_tolerance: polyhedron.distance_tolerance(),
        vertices: coords.chunks_exact(3).map(|c| [c[0], c[1], c[2]]).collect(),
        faces: polyhedron.faces(),
    }
}

fn write_summary<W: Write>(radius: f64, points: usize, polyhedron: &Polyhedron, mut out: W) -> io::Result<()> {
    let mut by_size = BTreeMap::new();
    for face in polyhedron.faces() {
        *by_size.entry(face.len()).or_insert(0usize) += 1;
    }

    writeln!(out, "radius:         {radius}")?;
    writeln!(out, "lattice points: {points}")?;
    writeln!(out, "vertices:       {}", polyhedron.num_vertices())?;
    writeln!(out, "edges:          {}", polyhedron.edges().len())?;
    writeln!(out, "faces:          {}", polyhedron.num_faces())?;
    for (size, count) in by_size {
        writeln!(out, "  {size}-gons:      {count}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_to_string(args: &[&str]) -> Result<String, CliError> {
        let cli = Cli::try_parse_from(std::iter::once("waterman-cli").chain(args.iter().copied()))
            .expect("arguments parse");
        let mut out = Vec::new();
        run(&cli, &mut out)?;
        Ok(String::from_utf8(out).expect("utf-8 output"))
    }

    #[test]
    fn parses_defaults() {
        let cli = Cli::try_parse_from(["waterman-cli", "3"]).unwrap();
        assert_eq!(cli.radius, 3.0);
        assert_eq!(cli.format, Format::Summary);
        assert!(!cli.normalize);
        assert!(cli.tolerance.is_none());
        assert!(cli.output.is_none());
    }

    #[test]
    fn parses_negative_radius() {
        let cli = Cli::try_parse_from(["waterman-cli", "-2"]).unwrap();
        assert_eq!(cli.radius, -2.0);
    }

    #[test]
    fn rejects_unknown_format() {
        assert!(Cli::try_parse_from(["waterman-cli", "2", "--format", "stl"]).is_err());
    }

    #[test]
    fn summary_lists_counts() {
        let text = run_to_string(&["1.5"]).unwrap();
        assert!(text.contains("lattice points: 13"));
        assert!(text.contains("vertices:       12"));
        assert!(text.contains("edges:          24"));
        assert!(text.contains("faces:          14"));
        assert!(text.contains("3-gons:      8"));
        assert!(text.contains("4-gons:      6"));
    }

    #[test]
    fn summary_counts_the_scanned_cloud() {
        let text = run_to_string(&["5"]).unwrap();
        let expected = format!("lattice points: {}", waterman_lattice::count(5.0));
        assert!(text.contains(&expected));
    }

    #[test]
    fn empty_cloud_is_an_error() {
        let err = run_to_string(&["0"]).unwrap_err();
        assert!(matches!(err, CliError::Hull(HullError::InvalidInput { .. })));
    }

    #[test]
    fn obj_output() {
        let text = run_to_string(&["2", "--format", "obj"]).unwrap();
        assert_eq!(text.lines().filter(|l| l.starts_with("v ")).count(), 6);
        assert_eq!(text.lines().filter(|l| l.starts_with("f ")).count(), 8);
    }

    #[test]
    fn json_output_is_normalized() {
        let text = run_to_string(&["3", "-f", "json", "--normalize"]).unwrap();
        let json: serde_json::Value = serde_json::from_str(&text).unwrap();
        let vertices = json["vertices"].as_array().unwrap();
        assert!(!vertices.is_empty());
        for v in vertices {
            for c in v.as_array().unwrap() {
                assert!(c.as_f64().unwrap().abs() <= 0.5);
            }
        }
        assert_eq!(json["radius"], 3.0);
    }

    #[test]
    fn degenerate_radius_is_an_error() {
        let err = run_to_string(&["1"]).unwrap_err();
        assert!(matches!(err, CliError::Hull(HullError::DegenerateCloud { .. })));
    }

    #[test]
    fn invalid_tolerance_is_an_error() {
        let err = run_to_string(&["2", "--tolerance", "0"]).unwrap_err();
        assert!(matches!(err, CliError::Hull(HullError::InvalidConfig(_))));
    }
}
