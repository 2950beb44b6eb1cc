//! Types de données pour le crate geocoord

use serde::{Deserialize, Serialize};

use crate::config::Convergence;
use crate::ellipsoid::Ellipsoid;
use crate::error::{GeoError, Result};

/// Ramène une longitude (degrés) dans l'intervalle [-180, 180)
pub fn normalize_longitude(longitude: f64) -> f64 {
    let lon = (longitude + 180.0).rem_euclid(360.0) - 180.0;
    // rem_euclid peut retourner 360 par arrondi pour un argument négatif infime
    if lon >= 180.0 {
        lon - 360.0
    } else {
        lon
    }
}

/// Point 3D en coordonnées cartésiennes (mètres, origine au centre de la surface de référence)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CartesianPoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl CartesianPoint {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Produit scalaire
    pub fn dot(&self, other: &Self) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Produit vectoriel `self × other`
    pub fn cross(&self, other: &Self) -> Self {
        Self {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    /// Norme euclidienne
    pub fn magnitude(&self) -> f64 {
        self.dot(self).sqrt()
    }

    /// Vecteur unitaire de même direction
    ///
    /// # Errors
    ///
    /// `DegenerateGeometry` si la norme est nulle ou non finie.
    pub fn normalize(&self) -> Result<Self> {
        let magnitude = self.magnitude();
        if magnitude == 0.0 || !magnitude.is_finite() {
            return Err(GeoError::degenerate(format!(
                "cannot normalize vector of magnitude {}",
                magnitude
            )));
        }

        Ok(Self {
            x: self.x / magnitude,
            y: self.y / magnitude,
            z: self.z / magnitude,
        })
    }
}

/// Coordonnée géographique en degrés décimaux
///
/// La longitude n'est pas normalisée à la construction ; toutes les
/// conversions retournent une longitude dans [-180, 180). La latitude doit
/// être dans [-90, 90] pour que les résultats aient un sens, ce qui n'est pas
/// vérifié ici.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude en degrés
    pub latitude: f64,
    /// Longitude en degrés
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Crée depuis des radians
    pub fn from_radians(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude: latitude.to_degrees(),
            longitude: longitude.to_degrees(),
        }
    }

    /// Latitude en radians
    pub fn lat_rad(&self) -> f64 {
        self.latitude.to_radians()
    }

    /// Longitude en radians
    pub fn lon_rad(&self) -> f64 {
        self.longitude.to_radians()
    }

    /// Copie avec la longitude ramenée dans [-180, 180)
    pub fn normalized(&self) -> Self {
        Self {
            latitude: self.latitude,
            longitude: normalize_longitude(self.longitude),
        }
    }

    /// Conversion géodésique → cartésien géocentrique sur l'ellipsoïde
    pub fn to_cartesian(&self, ellipsoid: &Ellipsoid) -> CartesianPoint {
        let e2 = ellipsoid.eccentricity_squared();
        let (sin_lat, cos_lat) = self.lat_rad().sin_cos();
        let (sin_lon, cos_lon) = self.lon_rad().sin_cos();
        let n = ellipsoid.prime_vertical_radius(self.lat_rad());

        CartesianPoint {
            x: n * cos_lon * cos_lat,
            y: n * sin_lon * cos_lat,
            z: n * (1.0 - e2) * sin_lat,
        }
    }

    /// Conversion cartésien géocentrique → géodésique sur l'ellipsoïde
    ///
    /// Itération de point fixe sur tan(φ) ; l'écart entre deux estimations
    /// est mesuré sur la latitude (radians).
    ///
    /// # Errors
    ///
    /// - `DegenerateGeometry` pour le centre de l'ellipsoïde
    /// - `NonConvergence` si `convergence.max_iterations` est atteint
    pub fn from_cartesian(
        point: &CartesianPoint,
        ellipsoid: &Ellipsoid,
        convergence: &Convergence,
    ) -> Result<Self> {
        let e2 = ellipsoid.eccentricity_squared();
        let r = ellipsoid.semi_major_axis() * e2;
        let p = point.x.hypot(point.y);
        let longitude = normalize_longitude(point.y.atan2(point.x).to_degrees());

        if p == 0.0 {
            if point.z == 0.0 {
                return Err(GeoError::degenerate("cartesian point at the ellipsoid center"));
            }
            // Sur l'axe polaire
            return Ok(Self::new(90.0_f64.copysign(point.z), longitude));
        }

        let initial = (point.z / (p * (1.0 - e2))).atan();
        let (latitude, _) = convergence.fixed_point("cartesian inverse", initial, |lat| {
            let t = lat.tan();
            (point.z / (p - r / (1.0 + (1.0 - e2) * t * t).sqrt())).atan()
        })?;

        Ok(Self::new(latitude.to_degrees(), longitude))
    }

    /// Conversion vers cartésien sur une sphère de rayon `radius`
    pub fn to_spherical_cartesian(&self, radius: f64) -> CartesianPoint {
        let (sin_lat, cos_lat) = self.lat_rad().sin_cos();
        let (sin_lon, cos_lon) = self.lon_rad().sin_cos();

        CartesianPoint {
            x: radius * cos_lon * cos_lat,
            y: radius * sin_lon * cos_lat,
            z: radius * sin_lat,
        }
    }

    /// Conversion inverse sphérique (forme close, indépendante du rayon)
    pub fn from_spherical_cartesian(point: &CartesianPoint) -> Self {
        Self {
            latitude: point.z.atan2(point.x.hypot(point.y)).to_degrees(),
            longitude: normalize_longitude(point.y.atan2(point.x).to_degrees()),
        }
    }
}

impl From<GeoPoint> for geo::Point<f64> {
    fn from(p: GeoPoint) -> Self {
        geo::Point::new(p.longitude, p.latitude)
    }
}

impl From<geo::Point<f64>> for GeoPoint {
    fn from(p: geo::Point<f64>) -> Self {
        GeoPoint::new(p.y(), p.x())
    }
}

/// Référence UTM (zone, bande de latitude, easting, northing)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UtmReference {
    /// Numéro de zone (1..=60)
    pub zone_number: u8,
    /// Lettre de bande (une de "CDEFGHJKLMNPQRSTUVWX")
    pub zone_letter: char,
    /// Easting en mètres
    pub easting: f64,
    /// Northing en mètres
    pub northing: f64,
}

impl UtmReference {
    /// Hémisphère sud (lettre de bande avant 'N')
    pub fn is_southern(&self) -> bool {
        self.zone_letter.to_ascii_uppercase() < 'N'
    }
}
