//! Géométrie sur la sphère (grands cercles)
//!
//! Distance, projection, produit vectoriel et distance transversale, pour des
//! points considérés sur une sphère de rayon fixe (rayon terrestre moyen par
//! défaut).

use std::f64::consts::FRAC_PI_2;

use crate::config::MEAN_EARTH_RADIUS;
use crate::error::{GeoError, Result};
use crate::types::{normalize_longitude, CartesianPoint, GeoPoint};

/// En dessous de ce seuil (mètres), la loi des cosinus perd sa précision
/// et la distance est recalculée par approximation plane.
const PLANAR_THRESHOLD: f64 = 0.01;

/// Norme minimale du produit vectoriel de deux vecteurs unitaires pour
/// définir un grand cercle
const DEGENERATE_NORMAL: f64 = 1e-12;

/// Calculateur sphérique
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    radius: f64,
}

impl Default for Sphere {
    fn default() -> Self {
        Self {
            radius: MEAN_EARTH_RADIUS,
        }
    }
}

impl Sphere {
    /// Crée une sphère de rayon `radius` (mètres)
    pub fn new(radius: f64) -> Result<Self> {
        if !(radius.is_finite() && radius > 0.0) {
            return Err(GeoError::InvalidRadius(radius));
        }
        Ok(Self { radius })
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Distance orthodromique entre deux points (mètres)
    pub fn distance(&self, p1: &GeoPoint, p2: &GeoPoint) -> f64 {
        let mut delta_lon = (p1.longitude - p2.longitude).to_radians();
        let lat1 = p1.lat_rad();
        let lat2 = p2.lat_rad();
        let delta_lat = lat1 - lat2;

        let cos_angle = lat1.sin() * lat2.sin() + lat1.cos() * lat2.cos() * delta_lon.cos();
        let distance = self.radius * cos_angle.clamp(-1.0, 1.0).acos();

        if distance < PLANAR_THRESHOLD {
            delta_lon *= lat2.cos();
            return self.radius * delta_lat.hypot(delta_lon);
        }

        distance
    }

    /// Point atteint depuis `origin` en suivant le grand cercle d'azimut
    /// `azimuth` (degrés) sur `distance` mètres
    pub fn projection(&self, origin: &GeoPoint, azimuth: f64, distance: f64) -> GeoPoint {
        let azimuth = azimuth.to_radians();
        let lat1 = origin.lat_rad();
        let s = distance / self.radius;

        let lat2 = (lat1.sin() * s.cos() + lat1.cos() * s.sin() * azimuth.cos())
            .clamp(-1.0, 1.0)
            .asin();
        let delta_lon =
            (azimuth.sin() * s.sin() * lat1.cos()).atan2(s.cos() - lat1.sin() * lat2.sin());

        GeoPoint {
            latitude: lat2.to_degrees(),
            longitude: normalize_longitude(origin.longitude + delta_lon.to_degrees()),
        }
    }

    /// Produit vectoriel des vecteurs unitaires de `p1` et `p2` (non normalisé)
    ///
    /// Formulé avec demi-somme et demi-différence des longitudes pour rester
    /// précis quand les deux points sont proches.
    pub fn cross(p1: &GeoPoint, p2: &GeoPoint) -> CartesianPoint {
        let lat1 = p1.lat_rad();
        let lat2 = p2.lat_rad();
        let lon1 = p1.lon_rad();
        let lon2 = p2.lon_rad();

        let delta_lat = lat1 - lat2;
        let sum_lat = lat1 + lat2;
        let half_delta_lon = (lon1 - lon2) / 2.0;
        let avg_lon = (lon1 + lon2) / 2.0;

        CartesianPoint {
            x: sum_lat.sin() * avg_lon.cos() * half_delta_lon.sin()
                - delta_lat.sin() * avg_lon.sin() * half_delta_lon.cos(),
            y: delta_lat.sin() * avg_lon.cos() * half_delta_lon.cos()
                + sum_lat.sin() * avg_lon.sin() * half_delta_lon.sin(),
            z: lat1.cos() * lat2.cos() * (-2.0 * half_delta_lon).sin(),
        }
    }

    /// Distance de `point` au grand cercle passant par `p1` et `p2` (mètres)
    ///
    /// Le signe ne distingue pas gauche/droite : la distance est positive si
    /// `point` se projette entre `p1` et `p2` (voir [`Sphere::is_between`]),
    /// négative sinon.
    ///
    /// # Errors
    ///
    /// `DegenerateGeometry` si `p1` et `p2` sont confondus ou antipodaux.
    pub fn cross_track_distance(
        &self,
        point: &GeoPoint,
        p1: &GeoPoint,
        p2: &GeoPoint,
    ) -> Result<f64> {
        // |p1 × p2| = sin de l'angle entre les deux points
        let cross = Self::cross(p1, p2);
        if cross.magnitude() < DEGENERATE_NORMAL {
            return Err(GeoError::degenerate(
                "great circle undefined: points coincide or are antipodal",
            ));
        }
        let normal = cross.normalize()?;

        let sign = if Self::is_between(point, p1, p2)? {
            1.0
        } else {
            -1.0
        };
        let p = point.to_spherical_cartesian(1.0);

        let angle = normal.dot(&p).clamp(-1.0, 1.0).acos();
        Ok(sign * (self.radius * (FRAC_PI_2 - angle)).abs())
    }

    /// Test approché : `point` se projette-t-il sur le segment `p1`–`p2` ?
    ///
    /// Approximation plane locale (longitudes pondérées par cos(latitude)),
    /// valable uniquement pour des segments courts. Le paramètre de projection
    /// `u` doit être dans [0, 1).
    ///
    /// # Errors
    ///
    /// `DegenerateGeometry` si `p1` et `p2` sont confondus.
    pub fn is_between(point: &GeoPoint, p1: &GeoPoint, p2: &GeoPoint) -> Result<bool> {
        let cos_lat = point.lat_rad().cos();
        let cos2 = cos_lat * cos_lat;
        let seg_lon = normalize_longitude(p2.longitude - p1.longitude);
        let seg_lat = p2.latitude - p1.latitude;

        let denominator = seg_lon * seg_lon * cos2 + seg_lat * seg_lat;
        if denominator == 0.0 {
            return Err(GeoError::degenerate("zero-length reference segment"));
        }

        let u = (normalize_longitude(point.longitude - p1.longitude) * seg_lon * cos2
            + (point.latitude - p1.latitude) * seg_lat)
            / denominator;

        Ok((0.0..1.0).contains(&u))
    }
}
