//! Définition et implémentation des commandes CLI
//!
//! Chaque commande écrit son résultat en JSON sur la sortie standard :
//! - `distance` / `project` : Vincenty (défaut) ou sphère
//! - `to-utm` / `from-utm` : conversions UTM
//! - `cross-track` : distance transversale à un grand cercle
//! - `route` : longueur d'un itinéraire, tronçons calculés en parallèle

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Subcommand;
use geocoord::{GeoPoint, Geodesic, UtmReference, Vincenty};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info};

use crate::config::Config;

#[derive(Subcommand)]
pub enum Commands {
    /// Geodesic distance and azimuths between two points
    Distance {
        /// Start point
        #[arg(long, num_args = 2, value_names = ["LAT", "LON"], allow_negative_numbers = true)]
        from: Vec<f64>,

        /// End point
        #[arg(long, num_args = 2, value_names = ["LAT", "LON"], allow_negative_numbers = true)]
        to: Vec<f64>,

        /// Use the great-circle distance on the configured sphere
        #[arg(long)]
        spherical: bool,
    },

    /// Destination reached from a point along an azimuth
    Project {
        /// Start point
        #[arg(long, num_args = 2, value_names = ["LAT", "LON"], allow_negative_numbers = true)]
        from: Vec<f64>,

        /// Azimuth in degrees, clockwise from north
        #[arg(long, allow_negative_numbers = true)]
        azimuth: f64,

        /// Distance in meters
        #[arg(long)]
        distance: f64,

        /// Project on the configured sphere
        #[arg(long)]
        spherical: bool,
    },

    /// Convert a geographic point to UTM
    ToUtm {
        /// Point to convert
        #[arg(long, num_args = 2, value_names = ["LAT", "LON"], allow_negative_numbers = true)]
        point: Vec<f64>,
    },

    /// Convert a UTM reference to a geographic point
    FromUtm {
        /// Zone number (1-60)
        #[arg(long)]
        zone: u8,

        /// Latitude band letter (C-X, I and O excluded)
        #[arg(long)]
        letter: char,

        /// Easting in meters
        #[arg(long)]
        easting: f64,

        /// Northing in meters
        #[arg(long)]
        northing: f64,
    },

    /// Signed distance from a point to the great circle through two points
    CrossTrack {
        /// Point to measure
        #[arg(long, num_args = 2, value_names = ["LAT", "LON"], allow_negative_numbers = true)]
        point: Vec<f64>,

        /// First point of the great circle
        #[arg(long, num_args = 2, value_names = ["LAT", "LON"], allow_negative_numbers = true)]
        from: Vec<f64>,

        /// Second point of the great circle
        #[arg(long, num_args = 2, value_names = ["LAT", "LON"], allow_negative_numbers = true)]
        to: Vec<f64>,
    },

    /// Length of a route read from a JSON array of [lat, lon] pairs
    Route {
        /// Path to the JSON route file
        #[arg(short, long)]
        path: PathBuf,
    },
}

/// Résultat de la commande `distance`
#[derive(Debug, Serialize)]
pub struct DistanceReport {
    pub distance: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forward_azimuth: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reverse_azimuth: Option<f64>,
}

/// Résultat de la commande `cross-track`
#[derive(Debug, Serialize)]
pub struct CrossTrackReport {
    pub distance: f64,
    pub between: bool,
}

/// Tronçon d'un itinéraire
#[derive(Debug, Serialize)]
pub struct Leg {
    pub from: GeoPoint,
    pub to: GeoPoint,
    #[serde(flatten)]
    pub geodesic: Geodesic,
}

/// Résultat de la commande `route`
#[derive(Debug, Serialize)]
pub struct RouteReport {
    pub legs: Vec<Leg>,
    pub total: f64,
}

/// Convertit une paire `[lat, lon]` issue de la ligne de commande
fn to_point(values: &[f64]) -> Result<GeoPoint> {
    match values {
        [lat, lon] => Ok(GeoPoint::new(*lat, *lon)),
        _ => anyhow::bail!("Expected LAT LON, got {} values", values.len()),
    }
}

/// Écrit une valeur en JSON sur la sortie standard
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", json);
    Ok(())
}

/// Exécute une sous-commande avec la configuration donnée
pub fn run(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Distance { from, to, spherical } => {
            print_json(&cmd_distance(config, to_point(&from)?, to_point(&to)?, spherical)?)
        }
        Commands::Project {
            from,
            azimuth,
            distance,
            spherical,
        } => print_json(&cmd_project(config, to_point(&from)?, azimuth, distance, spherical)?),
        Commands::ToUtm { point } => print_json(&cmd_to_utm(config, to_point(&point)?)?),
        Commands::FromUtm {
            zone,
            letter,
            easting,
            northing,
        } => print_json(&cmd_from_utm(config, zone, letter, easting, northing)?),
        Commands::CrossTrack { point, from, to } => print_json(&cmd_cross_track(
            config,
            to_point(&point)?,
            to_point(&from)?,
            to_point(&to)?,
        )?),
        Commands::Route { path } => print_json(&cmd_route(config, &path)?),
    }
}

pub fn cmd_distance(
    config: &Config,
    from: GeoPoint,
    to: GeoPoint,
    spherical: bool,
) -> Result<DistanceReport> {
    debug!(?from, ?to, spherical, "distance");

    if spherical {
        let sphere = config.geodesy.sphere()?;
        return Ok(DistanceReport {
            distance: sphere.distance(&from, &to),
            forward_azimuth: None,
            reverse_azimuth: None,
        });
    }

    let geodesic = config.geodesy.vincenty().inverse(&from, &to)?;
    Ok(DistanceReport {
        distance: geodesic.distance,
        forward_azimuth: Some(geodesic.forward_azimuth),
        reverse_azimuth: Some(geodesic.reverse_azimuth),
    })
}

pub fn cmd_project(
    config: &Config,
    from: GeoPoint,
    azimuth: f64,
    distance: f64,
    spherical: bool,
) -> Result<GeoPoint> {
    debug!(?from, azimuth, distance, spherical, "project");

    if spherical {
        let sphere = config.geodesy.sphere()?;
        return Ok(sphere.projection(&from, azimuth, distance));
    }

    Ok(config.geodesy.vincenty().direct(&from, azimuth, distance)?)
}

pub fn cmd_to_utm(config: &Config, point: GeoPoint) -> Result<UtmReference> {
    config
        .geodesy
        .utm()
        .forward(&point)
        .context(format!("Cannot convert ({}, {}) to UTM", point.latitude, point.longitude))
}

pub fn cmd_from_utm(
    config: &Config,
    zone: u8,
    letter: char,
    easting: f64,
    northing: f64,
) -> Result<GeoPoint> {
    config
        .geodesy
        .utm()
        .inverse(zone, letter, easting, northing)
        .context(format!("Cannot convert {}{} {} {}", zone, letter, easting, northing))
}

pub fn cmd_cross_track(
    config: &Config,
    point: GeoPoint,
    from: GeoPoint,
    to: GeoPoint,
) -> Result<CrossTrackReport> {
    let sphere = config.geodesy.sphere()?;
    let distance = sphere.cross_track_distance(&point, &from, &to)?;
    let between = geocoord::Sphere::is_between(&point, &from, &to)?;
    Ok(CrossTrackReport { distance, between })
}

/// Charge un itinéraire : tableau JSON de paires `[lat, lon]`
pub fn load_route(path: &Path) -> Result<Vec<GeoPoint>> {
    let content = std::fs::read_to_string(path)
        .context(format!("Failed to read route file: {}", path.display()))?;
    let pairs: Vec<[f64; 2]> =
        serde_json::from_str(&content).context("Failed to parse route JSON")?;

    Ok(pairs.into_iter().map(|[lat, lon]| GeoPoint::new(lat, lon)).collect())
}

/// Calcule les tronçons d'un itinéraire en parallèle
pub fn compute_route(vincenty: &Vincenty, points: &[GeoPoint]) -> Result<RouteReport> {
    let legs = points
        .par_windows(2)
        .enumerate()
        .map(|(index, pair)| {
            let geodesic = vincenty
                .inverse(&pair[0], &pair[1])
                .context(format!("Leg {} failed", index + 1))?;
            Ok(Leg {
                from: pair[0],
                to: pair[1],
                geodesic,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let total = legs.iter().map(|leg| leg.geodesic.distance).sum();
    Ok(RouteReport { legs, total })
}

pub fn cmd_route(config: &Config, path: &Path) -> Result<RouteReport> {
    let points = load_route(path)?;
    info!(path = %path.display(), points = points.len(), "Calcul d'itinéraire");

    let report = compute_route(&config.geodesy.vincenty(), &points)?;
    info!(legs = report.legs.len(), total = report.total, "Itinéraire calculé");
    Ok(report)
}
