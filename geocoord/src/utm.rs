//! Projection UTM (Universal Transverse Mercator)
//!
//! - Conversion directe : latitude/longitude → zone, bande, easting, northing
//! - Conversion inverse : zone, bande, easting, northing → latitude/longitude
//!
//! Les zones irrégulières de Norvège (32V) et du Svalbard (31X, 33X, 35X, 37X)
//! sont prises en compte. Les latitudes hors de [-80, 84] relèvent de l'UPS et
//! sont rejetées.

use tracing::debug;

use crate::config::UtmParams;
use crate::ellipsoid::Ellipsoid;
use crate::error::{GeoError, Result};
use crate::types::{normalize_longitude, GeoPoint, UtmReference};

/// Lettres des bandes de 8° de latitude, de -80° à 84°
pub const ZONE_LETTERS: &str = "CDEFGHJKLMNPQRSTUVWX";

/// Longitude du méridien central d'une zone (degrés)
pub fn central_meridian(zone_number: u8) -> f64 {
    (f64::from(zone_number) - 1.0) * 6.0 - 180.0 + 3.0
}

/// Convertisseur UTM pour un ellipsoïde donné
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UtmConverter {
    ellipsoid: Ellipsoid,
    params: UtmParams,
}

impl Default for UtmConverter {
    fn default() -> Self {
        Self::new(Ellipsoid::WGS84)
    }
}

impl UtmConverter {
    pub fn new(ellipsoid: Ellipsoid) -> Self {
        Self {
            ellipsoid,
            params: UtmParams::default(),
        }
    }

    /// Remplace les paramètres de projection (k0, false easting/northing...)
    pub fn with_params(mut self, params: UtmParams) -> Self {
        self.params = params;
        self
    }

    pub fn params(&self) -> &UtmParams {
        &self.params
    }

    /// Numéro de zone d'un point, zones irrégulières comprises
    ///
    /// Une longitude exactement sur une limite appartient à la zone située à l'est.
    pub fn zone_number(point: &GeoPoint) -> u8 {
        let lat = point.latitude;
        let lon = normalize_longitude(point.longitude);

        // Norvège
        if lat > 56.0 && lat <= 64.0 && lon > 3.0 && lon <= 12.0 {
            return 32;
        }

        // Svalbard
        if lat > 72.0 && lat < 84.0 {
            if (0.0..9.0).contains(&lon) {
                return 31;
            } else if (9.0..21.0).contains(&lon) {
                return 33;
            } else if (21.0..33.0).contains(&lon) {
                return 35;
            } else if (33.0..42.0).contains(&lon) {
                return 37;
            }
        }

        (((lon + 180.0) / 6.0).floor() as i64).rem_euclid(60) as u8 + 1
    }

    /// Lettre de bande d'une latitude, `None` hors de [-80, 84]
    pub fn zone_letter(latitude: f64) -> Option<char> {
        if (72.0..=84.0).contains(&latitude) {
            return Some('X');
        }
        if !(-80.0..72.0).contains(&latitude) {
            return None;
        }

        let index = ((latitude + 80.0) / 8.0).floor() as usize;
        ZONE_LETTERS.chars().nth(index)
    }

    /// Convertit un point géographique en référence UTM
    ///
    /// # Errors
    ///
    /// `OutsideUtmCoverage` si la latitude est hors de [-80, 84].
    pub fn forward(&self, point: &GeoPoint) -> Result<UtmReference> {
        let zone_letter = Self::zone_letter(point.latitude).ok_or(GeoError::OutsideUtmCoverage {
            latitude: point.latitude,
        })?;
        let zone_number = Self::zone_number(point);

        let a = self.ellipsoid.semi_major_axis();
        let e2 = self.ellipsoid.eccentricity_squared();
        let ep2 = self.ellipsoid.second_eccentricity_squared();
        let k0 = self.params.scale_factor;

        let phi = point.lat_rad();
        let lon = normalize_longitude(point.longitude).to_radians();
        let lon0 = central_meridian(zone_number).to_radians();

        let (sin_phi, cos_phi) = phi.sin_cos();
        let tan_phi = phi.tan();

        let n = a / (1.0 - e2 * sin_phi * sin_phi).sqrt();
        let t = tan_phi * tan_phi;
        let c = ep2 * cos_phi * cos_phi;
        let aa = cos_phi * (lon - lon0);

        // Arc de méridien
        let m0 = 1.0 - e2 / 4.0 - 3.0 * e2.powi(2) / 64.0 - 5.0 * e2.powi(3) / 256.0;
        let m2 = 3.0 * e2 / 8.0 + 3.0 * e2.powi(2) / 32.0 + 45.0 * e2.powi(3) / 1024.0;
        let m4 = 15.0 * e2.powi(2) / 256.0 + 45.0 * e2.powi(3) / 1024.0;
        let m6 = 35.0 * e2.powi(3) / 3072.0;
        let m = a
            * (m0 * phi - m2 * (2.0 * phi).sin() + m4 * (4.0 * phi).sin()
                - m6 * (6.0 * phi).sin());

        let mut easting = k0
            * n
            * (aa + (1.0 - t + c) * aa.powi(3) / 6.0
                + (5.0 - 18.0 * t + t * t + 72.0 * c - 58.0 * ep2) * aa.powi(5) / 120.0)
            + self.params.false_easting;

        let mut northing = k0
            * (m + n
                * tan_phi
                * (aa * aa / 2.0
                    + (5.0 - t + 9.0 * c + 4.0 * c * c) * aa.powi(4) / 24.0
                    + (61.0 - 58.0 * t + t * t + 600.0 * c - 330.0 * ep2) * aa.powi(6) / 720.0));

        if point.latitude < 0.0 {
            northing += self.params.false_northing_south;
        }

        if self.params.round_to_meter {
            easting = (easting + 0.5).floor();
            northing = (northing + 0.5).floor();
        }

        debug!(zone_number, %zone_letter, easting, northing, "UTM forward");

        Ok(UtmReference {
            zone_number,
            zone_letter,
            easting,
            northing,
        })
    }

    /// Convertit une référence UTM en point géographique
    ///
    /// La lettre est acceptée en minuscule. Le false northing inverse n'est
    /// retiré que pour les bandes de l'hémisphère sud (avant 'N').
    ///
    /// # Errors
    ///
    /// - `InvalidZoneNumber` si la zone est hors de 1..=60
    /// - `UnrecognizedZoneLetter` si la lettre n'est pas dans [`ZONE_LETTERS`]
    pub fn inverse(
        &self,
        zone_number: u8,
        zone_letter: char,
        easting: f64,
        northing: f64,
    ) -> Result<GeoPoint> {
        if !(1..=60).contains(&zone_number) {
            return Err(GeoError::InvalidZoneNumber(zone_number));
        }
        let letter = zone_letter.to_ascii_uppercase();
        if !ZONE_LETTERS.contains(letter) {
            return Err(GeoError::UnrecognizedZoneLetter(zone_letter));
        }

        let a = self.ellipsoid.semi_major_axis();
        let e2 = self.ellipsoid.eccentricity_squared();
        let ep2 = self.ellipsoid.second_eccentricity_squared();
        let k0 = self.params.scale_factor;

        let x = easting - self.params.false_easting;
        let y = if letter < 'N' {
            northing - self.params.inverse_false_northing_south
        } else {
            northing
        };

        let lon0 = central_meridian(zone_number).to_radians();

        // Latitude du point pied (série fermée, sans itération)
        let m = y / k0;
        let mu = m / (a * (1.0 - e2 / 4.0 - 3.0 * e2.powi(2) / 64.0 - 5.0 * e2.powi(3) / 256.0));
        let e1 = (1.0 - (1.0 - e2).sqrt()) / (1.0 + (1.0 - e2).sqrt());

        let phi1 = mu
            + (3.0 * e1 / 2.0 - 27.0 * e1.powi(3) / 32.0) * (2.0 * mu).sin()
            + (21.0 * e1.powi(2) / 16.0 - 55.0 * e1.powi(4) / 32.0) * (4.0 * mu).sin()
            + (151.0 * e1.powi(3) / 96.0) * (6.0 * mu).sin()
            + (1097.0 * e1.powi(4) / 512.0) * (8.0 * mu).sin();

        let (sin_phi1, cos_phi1) = phi1.sin_cos();
        let tan_phi1 = phi1.tan();

        let n1 = a / (1.0 - e2 * sin_phi1.powi(2)).sqrt();
        let t1 = tan_phi1.powi(2);
        let c1 = ep2 * cos_phi1.powi(2);
        let r1 = a * (1.0 - e2) / (1.0 - e2 * sin_phi1.powi(2)).powf(1.5);
        let d = x / (n1 * k0);

        let lat4 = 5.0 + 3.0 * t1 + 10.0 * c1 - 4.0 * c1.powi(2) - 9.0 * ep2;
        let lat6 = 61.0 + 90.0 * t1 + 298.0 * c1 + 45.0 * t1.powi(2) - 252.0 * ep2
            - 3.0 * c1.powi(2);
        let lat = phi1
            - (n1 * tan_phi1 / r1)
                * (d.powi(2) / 2.0 - lat4 * d.powi(4) / 24.0 + lat6 * d.powi(6) / 720.0);

        let lon5 = 5.0 - 2.0 * c1 + 28.0 * t1 - 3.0 * c1.powi(2) + 8.0 * ep2 + 24.0 * t1.powi(2);
        let lon = lon0
            + (d - (1.0 + 2.0 * t1 + c1) * d.powi(3) / 6.0 + lon5 * d.powi(5) / 120.0) / cos_phi1;

        Ok(GeoPoint {
            latitude: lat.to_degrees(),
            longitude: normalize_longitude(lon.to_degrees()),
        })
    }

    /// Conversion inverse depuis une [`UtmReference`]
    pub fn inverse_reference(&self, reference: &UtmReference) -> Result<GeoPoint> {
        self.inverse(
            reference.zone_number,
            reference.zone_letter,
            reference.easting,
            reference.northing,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zone_number_regular() {
        assert_eq!(UtmConverter::zone_number(&GeoPoint::new(48.8584, 2.2945)), 31);
        assert_eq!(UtmConverter::zone_number(&GeoPoint::new(40.6892, -74.0445)), 18);
        assert_eq!(UtmConverter::zone_number(&GeoPoint::new(0.0, -180.0)), 1);
        assert_eq!(UtmConverter::zone_number(&GeoPoint::new(0.0, 179.99)), 60);
        // longitude non normalisée
        assert_eq!(UtmConverter::zone_number(&GeoPoint::new(0.0, 182.0)), 1);
    }

    #[test]
    fn test_zone_edge_belongs_to_east_zone() {
        assert_eq!(UtmConverter::zone_number(&GeoPoint::new(50.0, 6.0)), 32);
        assert_eq!(UtmConverter::zone_number(&GeoPoint::new(50.0, 5.999999)), 31);
    }

    #[test]
    fn test_zone_number_norway() {
        // Bergen
        assert_eq!(UtmConverter::zone_number(&GeoPoint::new(60.39, 5.32)), 32);
        // même longitude hors de la bande
        assert_eq!(UtmConverter::zone_number(&GeoPoint::new(55.0, 5.32)), 31);
    }

    #[test]
    fn test_zone_number_svalbard() {
        assert_eq!(UtmConverter::zone_number(&GeoPoint::new(78.22, 15.65)), 33);
        assert_eq!(UtmConverter::zone_number(&GeoPoint::new(78.0, 8.9)), 31);
        assert_eq!(UtmConverter::zone_number(&GeoPoint::new(78.0, 21.0)), 35);
        assert_eq!(UtmConverter::zone_number(&GeoPoint::new(78.0, 41.0)), 37);
    }

    #[test]
    fn test_zone_letter() {
        assert_eq!(UtmConverter::zone_letter(48.8584), Some('U'));
        assert_eq!(UtmConverter::zone_letter(-33.8568), Some('H'));
        assert_eq!(UtmConverter::zone_letter(0.0), Some('N'));
        assert_eq!(UtmConverter::zone_letter(-0.1), Some('M'));
        assert_eq!(UtmConverter::zone_letter(-80.0), Some('C'));
        assert_eq!(UtmConverter::zone_letter(72.0), Some('X'));
        assert_eq!(UtmConverter::zone_letter(84.0), Some('X'));
        assert_eq!(UtmConverter::zone_letter(84.5), None);
        assert_eq!(UtmConverter::zone_letter(-80.5), None);
    }

    #[test]
    fn test_forward_paris() {
        let utm = UtmConverter::default()
            .forward(&GeoPoint::new(48.8584, 2.2945))
            .unwrap();
        assert_eq!(utm.zone_number, 31);
        assert_eq!(utm.zone_letter, 'U');
        assert_eq!(utm.easting, 448252.0);
        assert_eq!(utm.northing, 5411955.0);
    }

    #[test]
    fn test_forward_southern_hemisphere() {
        let utm = UtmConverter::default()
            .forward(&GeoPoint::new(-33.8568, 151.2153))
            .unwrap();
        assert_eq!(utm.zone_number, 56);
        assert_eq!(utm.zone_letter, 'H');
        assert_eq!(utm.easting, 334901.0);
        assert_eq!(utm.northing, 6252289.0);
    }

    #[test]
    fn test_forward_without_rounding() {
        let params = UtmParams {
            round_to_meter: false,
            ..UtmParams::default()
        };
        let utm = UtmConverter::default()
            .with_params(params)
            .forward(&GeoPoint::new(48.8584, 2.2945))
            .unwrap();
        assert!((utm.easting - 448252.00138).abs() < 1e-3, "e={}", utm.easting);
        assert!((utm.northing - 5411954.91032).abs() < 1e-3, "n={}", utm.northing);
    }

    #[test]
    fn test_forward_outside_coverage() {
        let result = UtmConverter::default().forward(&GeoPoint::new(85.0, 10.0));
        assert!(matches!(result, Err(GeoError::OutsideUtmCoverage { .. })));
    }

    #[test]
    fn test_inverse_far_from_central_meridian() {
        // Fort-de-France, zone 20P, ~208 km à l'est du méridien central
        let geo = UtmConverter::default()
            .inverse(20, 'P', 708000.0, 1615000.0)
            .unwrap();
        assert!((geo.latitude - 14.6002829).abs() < 1e-6, "lat={}", geo.latitude);
        assert!((geo.longitude - (-61.0691127)).abs() < 1e-6, "lon={}", geo.longitude);
    }

    #[test]
    fn test_inverse_southern_lowercase_letter() {
        // Saint-Denis de La Réunion, zone 40K
        let geo = UtmConverter::default()
            .inverse(40, 'k', 338000.0, 7691000.0)
            .unwrap();
        assert!((geo.latitude - (-20.8741123)).abs() < 1e-6, "lat={}", geo.latitude);
        assert!((geo.longitude - 55.4426869).abs() < 1e-6, "lon={}", geo.longitude);
    }

    #[test]
    fn test_inverse_rejects_unknown_letter() {
        let converter = UtmConverter::default();
        for letter in ['I', 'O', 'A', 'Z', '?'] {
            assert_eq!(
                converter.inverse(31, letter, 448252.0, 5411955.0),
                Err(GeoError::UnrecognizedZoneLetter(letter))
            );
        }
    }

    #[test]
    fn test_inverse_rejects_zone_number() {
        let converter = UtmConverter::default();
        assert_eq!(
            converter.inverse(0, 'U', 448252.0, 5411955.0),
            Err(GeoError::InvalidZoneNumber(0))
        );
        assert!(converter.inverse(61, 'U', 448252.0, 5411955.0).is_err());
    }

    #[test]
    fn test_central_meridian() {
        assert_eq!(central_meridian(1), -177.0);
        assert_eq!(central_meridian(31), 3.0);
        assert_eq!(central_meridian(60), 177.0);
    }
}
