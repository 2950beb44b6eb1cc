//! Tests d'intégration : chargement de configuration et itinéraires

use std::io::Write;

use geocoord::{Ellipsoid, GeoPoint};
use geocoord_cli::cli::{cmd_route, compute_route, load_route};
use geocoord_cli::config::Config;
use tempfile::NamedTempFile;

fn write_temp(content: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_load_config_file() {
    let file = write_temp(
        r#"{
            "name": "intl",
            "ellipsoid": { "semi_major_axis": 6378388.0, "inverse_flattening": 297.0 },
            "sphere_radius": 6371000.0,
            "utm": { "round_to_meter": false }
        }"#,
    );

    let config = Config::load(file.path()).unwrap();
    assert_eq!(config.name.as_deref(), Some("intl"));
    assert_eq!(config.geodesy.ellipsoid, Ellipsoid::new(6378388.0, 297.0).unwrap());
    assert_eq!(config.geodesy.sphere_radius, 6371000.0);
    assert!(!config.geodesy.utm.round_to_meter);
    assert_eq!(config.geodesy.utm.false_easting, 500000.0);
    assert_eq!(config.geodesy.vincenty.max_iterations, 200);
}

#[test]
fn test_resolve_path_and_preset() {
    let file = write_temp(r#"{ "name": "custom" }"#);
    let path = file.path().to_str().unwrap();

    let from_path = Config::resolve(Some(path)).unwrap();
    assert_eq!(from_path.name.as_deref(), Some("custom"));

    let from_preset = Config::resolve(Some("grs80")).unwrap();
    let inverse_flattening = from_preset.geodesy.ellipsoid.inverse_flattening();
    assert!((inverse_flattening - Ellipsoid::GRS80.inverse_flattening()).abs() < 1e-9);

    assert!(Config::resolve(Some("missing.json")).is_err());
    assert!(Config::resolve(Some("airy")).is_err());
}

#[test]
fn test_malformed_config_file() {
    let file = write_temp("{ not json");
    let err = Config::load(file.path()).unwrap_err();
    assert!(format!("{:#}", err).contains("Failed to parse config JSON"), "err={:#}", err);
}

#[test]
fn test_route_from_file() {
    let file = write_temp("[[0.0, 0.0], [0.0, 90.0], [0.0, 180.0]]");
    let config = Config::default();

    let report = cmd_route(&config, file.path()).unwrap();
    assert_eq!(report.legs.len(), 2);
    for leg in &report.legs {
        let distance = leg.geodesic.distance;
        assert!((distance - 10018754.171394).abs() < 1e-3, "d={}", distance);
    }
    assert!((report.total - 2.0 * 10018754.171394).abs() < 1e-2, "total={}", report.total);

    let json = serde_json::to_value(&report).unwrap();
    assert!(json["legs"][0]["forward_azimuth"].is_number());
    assert!(json["total"].is_number());
}

#[test]
fn test_route_preserves_leg_order() {
    let vincenty = Config::default().geodesy.vincenty();
    let points: Vec<GeoPoint> = (0..50).map(|i| GeoPoint::new(45.0, i as f64 * 0.1)).collect();

    let report = compute_route(&vincenty, &points).unwrap();
    assert_eq!(report.legs.len(), 49);
    for (i, leg) in report.legs.iter().enumerate() {
        assert_eq!(leg.from, points[i]);
        assert_eq!(leg.to, points[i + 1]);
    }

    let sequential: f64 = points
        .windows(2)
        .map(|w| vincenty.distance(&w[0], &w[1]).unwrap())
        .sum();
    assert!((report.total - sequential).abs() < 1e-6);
}

#[test]
fn test_route_reports_failing_leg() {
    let vincenty = Config::default().geodesy.vincenty();
    let points = [GeoPoint::new(0.0, 0.0), GeoPoint::new(0.5, 179.7)];
    let err = compute_route(&vincenty, &points).unwrap_err();
    assert!(format!("{:#}", err).contains("Leg 1"), "err={:#}", err);
}

#[test]
fn test_route_rejects_bad_pairs() {
    let file = write_temp("[[1.0, 2.0, 3.0]]");
    assert!(load_route(file.path()).is_err());
}
