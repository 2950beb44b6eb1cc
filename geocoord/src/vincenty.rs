//! Formules de Vincenty sur l'ellipsoïde
//!
//! - Problème inverse : distance et azimuts entre deux points
//! - Problème direct : point atteint depuis une origine, un azimut et une distance
//!
//! Les deux résolutions sont itératives et bornées par un [`Convergence`] ;
//! les couples de points quasi antipodaux ne convergent pas et retournent
//! `GeoError::NonConvergence`.

use serde::{Deserialize, Serialize};

use crate::config::Convergence;
use crate::ellipsoid::Ellipsoid;
use crate::error::Result;
use crate::types::{normalize_longitude, GeoPoint};

/// Résultat du problème inverse
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Geodesic {
    /// Longueur de la géodésique en mètres
    pub distance: f64,
    /// Azimut de départ au premier point, degrés [0, 360)
    pub forward_azimuth: f64,
    /// Azimut de retour (du second point vers le premier), degrés [0, 360)
    pub reverse_azimuth: f64,
}

/// Ramène un azimut (degrés) dans [0, 360)
fn normalize_azimuth(azimuth: f64) -> f64 {
    let az = azimuth.rem_euclid(360.0);
    if az >= 360.0 {
        0.0
    } else {
        az
    }
}

/// Latitude réduite (sin u, cos u)
fn reduced_latitude(latitude_rad: f64, flattening: f64) -> (f64, f64) {
    ((1.0 - flattening) * latitude_rad.tan()).atan().sin_cos()
}

/// Coefficients A et B des développements en u²
fn series_coefficients(u2: f64) -> (f64, f64) {
    let a = 1.0 + u2 / 16384.0 * (4096.0 + u2 * (-768.0 + u2 * (320.0 - 175.0 * u2)));
    let b = u2 / 1024.0 * (256.0 + u2 * (-128.0 + u2 * (74.0 - 47.0 * u2)));
    (a, b)
}

/// Correction Δσ
fn delta_sigma(b: f64, sin_sigma: f64, cos_sigma: f64, cos_2sigma_m: f64) -> f64 {
    let c2 = cos_2sigma_m * cos_2sigma_m;
    let s2 = sin_sigma * sin_sigma;
    let inner = cos_sigma * (-1.0 + 2.0 * c2)
        - b / 6.0 * cos_2sigma_m * (-3.0 + 4.0 * s2) * (-3.0 + 4.0 * c2);
    b * sin_sigma * (cos_2sigma_m + b / 4.0 * inner)
}

/// Différence entre longitude sur la sphère auxiliaire et longitude sur l'ellipsoïde
fn lambda_correction(
    flattening: f64,
    sin_alpha: f64,
    cos2_alpha: f64,
    sigma: f64,
    sin_sigma: f64,
    cos_sigma: f64,
    cos_2sigma_m: f64,
) -> f64 {
    let c = flattening / 16.0 * cos2_alpha * (4.0 + flattening * (4.0 - 3.0 * cos2_alpha));
    let inner = cos_2sigma_m + c * cos_sigma * (-1.0 + 2.0 * cos_2sigma_m * cos_2sigma_m);
    (1.0 - c) * flattening * sin_alpha * (sigma + c * sin_sigma * inner)
}

/// Termes du problème inverse évalués pour une valeur de λ
#[derive(Debug, Clone, Copy, Default)]
struct InverseTerms {
    sin_sigma: f64,
    cos_sigma: f64,
    sigma: f64,
    sin_alpha: f64,
    cos2_alpha: f64,
    cos_2sigma_m: f64,
}

impl InverseTerms {
    fn at(lambda: f64, sin_u1: f64, cos_u1: f64, sin_u2: f64, cos_u2: f64) -> Self {
        let (sin_lambda, cos_lambda) = lambda.sin_cos();
        let ss1 = cos_u2 * sin_lambda;
        let ss2 = cos_u1 * sin_u2 - sin_u1 * cos_u2 * cos_lambda;
        let sin_sigma = ss1.hypot(ss2);
        let cos_sigma = sin_u1 * sin_u2 + cos_u1 * cos_u2 * cos_lambda;
        let sigma = sin_sigma.atan2(cos_sigma);

        let sin_alpha = cos_u1 * cos_u2 * sin_lambda / sin_sigma;
        let cos2_alpha = 1.0 - sin_alpha * sin_alpha;
        // Géodésique équatoriale : cos²α = 0, le terme est sans objet
        let cos_2sigma_m = if cos2_alpha == 0.0 {
            0.0
        } else {
            cos_sigma - 2.0 * sin_u1 * sin_u2 / cos2_alpha
        };

        Self {
            sin_sigma,
            cos_sigma,
            sigma,
            sin_alpha,
            cos2_alpha,
            cos_2sigma_m,
        }
    }
}

/// Solveur de Vincenty pour un ellipsoïde donné
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vincenty {
    ellipsoid: Ellipsoid,
    convergence: Convergence,
}

impl Default for Vincenty {
    fn default() -> Self {
        Self::new(Ellipsoid::WGS84)
    }
}

impl Vincenty {
    pub fn new(ellipsoid: Ellipsoid) -> Self {
        Self {
            ellipsoid,
            convergence: Convergence::VINCENTY,
        }
    }

    /// Remplace le critère d'arrêt (epsilon, nombre d'itérations)
    pub fn with_convergence(mut self, convergence: Convergence) -> Self {
        self.convergence = convergence;
        self
    }

    pub fn ellipsoid(&self) -> &Ellipsoid {
        &self.ellipsoid
    }

    /// u² = cos²α (a² - b²) / b²
    fn u_squared(&self, cos2_alpha: f64) -> f64 {
        let a = self.ellipsoid.semi_major_axis();
        let b = self.ellipsoid.semi_minor_axis();
        cos2_alpha * (a * a - b * b) / (b * b)
    }

    /// Problème inverse : distance et azimuts de `p1` vers `p2`
    ///
    /// Deux points identiques (y compris deux longitudes quelconques sur un
    /// même pôle) donnent une distance et des azimuts nuls.
    ///
    /// # Errors
    ///
    /// `NonConvergence` si l'itération sur λ n'aboutit pas (points quasi antipodaux).
    pub fn inverse(&self, p1: &GeoPoint, p2: &GeoPoint) -> Result<Geodesic> {
        // Longitudes égales à 360° près, ou même pôle : même point
        let delta_lon = normalize_longitude(p2.longitude - p1.longitude);
        let same_pole = p1.latitude.abs() == 90.0;
        if p1.latitude == p2.latitude && (delta_lon == 0.0 || same_pole) {
            return Ok(Geodesic::default());
        }

        let f = self.ellipsoid.flattening();
        let (sin_u1, cos_u1) = reduced_latitude(p1.lat_rad(), f);
        let (sin_u2, cos_u2) = reduced_latitude(p2.lat_rad(), f);
        let omega = delta_lon.to_radians();

        let mut terms = InverseTerms::default();
        let (lambda, _) = self.convergence.fixed_point("vincenty inverse", omega, |lambda| {
            terms = InverseTerms::at(lambda, sin_u1, cos_u1, sin_u2, cos_u2);
            omega
                + lambda_correction(
                    f,
                    terms.sin_alpha,
                    terms.cos2_alpha,
                    terms.sigma,
                    terms.sin_sigma,
                    terms.cos_sigma,
                    terms.cos_2sigma_m,
                )
        })?;

        let (a, b) = series_coefficients(self.u_squared(terms.cos2_alpha));
        let distance = self.ellipsoid.semi_minor_axis()
            * a
            * (terms.sigma - delta_sigma(b, terms.sin_sigma, terms.cos_sigma, terms.cos_2sigma_m));

        let (sin_lambda, cos_lambda) = lambda.sin_cos();
        let alpha12 = (cos_u2 * sin_lambda).atan2(cos_u1 * sin_u2 - sin_u1 * cos_u2 * cos_lambda);
        let alpha21 = (cos_u1 * sin_lambda).atan2(-sin_u1 * cos_u2 + cos_u1 * sin_u2 * cos_lambda);

        Ok(Geodesic {
            distance,
            forward_azimuth: normalize_azimuth(alpha12.to_degrees()),
            reverse_azimuth: normalize_azimuth(alpha21.to_degrees() + 180.0),
        })
    }

    /// Distance géodésique seule (mètres)
    pub fn distance(&self, p1: &GeoPoint, p2: &GeoPoint) -> Result<f64> {
        self.inverse(p1, p2).map(|g| g.distance)
    }

    /// Problème direct : point atteint depuis `origin` avec l'azimut `azimuth`
    /// (degrés) après `distance` mètres le long de la géodésique
    ///
    /// # Errors
    ///
    /// `NonConvergence` si l'itération sur σ n'aboutit pas.
    pub fn direct(&self, origin: &GeoPoint, azimuth: f64, distance: f64) -> Result<GeoPoint> {
        let f = self.ellipsoid.flattening();
        let b0 = self.ellipsoid.semi_minor_axis();
        let (sin_az, cos_az) = azimuth.to_radians().sin_cos();

        let tan_u1 = (1.0 - f) * origin.lat_rad().tan();
        let (sin_u1, cos_u1) = tan_u1.atan().sin_cos();
        let sigma1 = tan_u1.atan2(cos_az);

        let sin_alpha = cos_u1 * sin_az;
        let cos2_alpha = 1.0 - sin_alpha * sin_alpha;
        let (a, b) = series_coefficients(self.u_squared(cos2_alpha));

        let sigma0 = distance / (b0 * a);
        let (sigma, _) = self.convergence.fixed_point("vincenty direct", sigma0, |sigma| {
            let cos_2sigma_m = (2.0 * sigma1 + sigma).cos();
            sigma0 + delta_sigma(b, sigma.sin(), sigma.cos(), cos_2sigma_m)
        })?;

        let (sin_sigma, cos_sigma) = sigma.sin_cos();
        let cos_2sigma_m = (2.0 * sigma1 + sigma).cos();

        let tmp = sin_u1 * sin_sigma - cos_u1 * cos_sigma * cos_az;
        let lat2 = (sin_u1 * cos_sigma + cos_u1 * sin_sigma * cos_az)
            .atan2((1.0 - f) * (sin_alpha * sin_alpha + tmp * tmp).sqrt());

        let lambda = (sin_sigma * sin_az).atan2(cos_u1 * cos_sigma - sin_u1 * sin_sigma * cos_az);
        let correction =
            lambda_correction(f, sin_alpha, cos2_alpha, sigma, sin_sigma, cos_sigma, cos_2sigma_m);
        let omega = lambda - correction;

        Ok(GeoPoint {
            latitude: lat2.to_degrees(),
            longitude: normalize_longitude(origin.longitude + omega.to_degrees()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GeoError;

    #[test]
    fn test_identical_points() {
        let p = GeoPoint::new(50.0667, 5.7167);
        let g = Vincenty::default().inverse(&p, &p).unwrap();
        assert_eq!(g, Geodesic::default());
    }

    #[test]
    fn test_same_pole_different_longitudes() {
        let vincenty = Vincenty::default();
        let north = vincenty
            .inverse(&GeoPoint::new(90.0, 0.0), &GeoPoint::new(90.0, 50.0))
            .unwrap();
        assert_eq!(north, Geodesic::default());

        let south = vincenty
            .inverse(&GeoPoint::new(-90.0, 10.0), &GeoPoint::new(-90.0, -100.0))
            .unwrap();
        assert_eq!(south, Geodesic::default());
    }

    #[test]
    fn test_same_point_shifted_longitude() {
        let g = Vincenty::default()
            .inverse(&GeoPoint::new(10.0, -170.0), &GeoPoint::new(10.0, 190.0))
            .unwrap();
        assert_eq!(g, Geodesic::default());
    }

    #[test]
    fn test_quarter_equator() {
        let g = Vincenty::default()
            .inverse(&GeoPoint::new(0.0, 0.0), &GeoPoint::new(0.0, 90.0))
            .unwrap();
        assert!((g.distance - 10018754.171394).abs() < 1e-3, "d={}", g.distance);
        assert!((g.forward_azimuth - 90.0).abs() < 1e-9, "az={}", g.forward_azimuth);
        assert!((g.reverse_azimuth - 270.0).abs() < 1e-9, "az={}", g.reverse_azimuth);
    }

    #[test]
    fn test_meridian_arc() {
        // Équateur → pôle nord : quart de méridien WGS84
        let g = Vincenty::default()
            .inverse(&GeoPoint::new(0.0, 0.0), &GeoPoint::new(90.0, 0.0))
            .unwrap();
        assert!((g.distance - 10001965.729).abs() < 1e-2, "d={}", g.distance);
        assert!(g.forward_azimuth.abs() < 1e-9, "az={}", g.forward_azimuth);
    }

    #[test]
    fn test_azimuth_range() {
        let g = Vincenty::default()
            .inverse(&GeoPoint::new(50.0667, 5.7167), &GeoPoint::new(58.6439, 3.07))
            .unwrap();
        assert!((0.0..360.0).contains(&g.forward_azimuth));
        assert!((0.0..360.0).contains(&g.reverse_azimuth));
        assert!((g.forward_azimuth - 350.8506851).abs() < 1e-6, "az={}", g.forward_azimuth);
        assert!((g.reverse_azimuth - 168.6936766).abs() < 1e-6, "az={}", g.reverse_azimuth);
    }

    #[test]
    fn test_near_antipodal_does_not_converge() {
        let result =
            Vincenty::default().inverse(&GeoPoint::new(0.0, 0.0), &GeoPoint::new(0.5, 179.7));
        assert!(
            matches!(result, Err(GeoError::NonConvergence { solver: "vincenty inverse", .. })),
            "result={:?}",
            result
        );
    }

    #[test]
    fn test_iteration_cap_is_configurable() {
        let tight = Convergence {
            epsilon: 5e-14,
            max_iterations: 1,
        };
        let result = Vincenty::default()
            .with_convergence(tight)
            .inverse(&GeoPoint::new(50.0667, 5.7167), &GeoPoint::new(58.6439, 3.07));
        assert!(matches!(result, Err(GeoError::NonConvergence { iterations: 1, .. })));
    }

    #[test]
    fn test_direct_equator() {
        let p = Vincenty::default()
            .direct(&GeoPoint::new(0.0, 0.0), 90.0, 10018754.171394)
            .unwrap();
        assert!(p.latitude.abs() < 1e-9, "lat={}", p.latitude);
        assert!((p.longitude - 90.0).abs() < 1e-8, "lon={}", p.longitude);
    }

    #[test]
    fn test_direct_wraps_longitude() {
        let p = Vincenty::default()
            .direct(&GeoPoint::new(10.0, 170.0), 80.0, 2_000_000.0)
            .unwrap();
        assert!((-180.0..180.0).contains(&p.longitude), "lon={}", p.longitude);
        assert!((p.longitude - (-171.8670309701)).abs() < 1e-6, "lon={}", p.longitude);
        assert!((p.latitude - 12.6036760631).abs() < 1e-6, "lat={}", p.latitude);
    }

    #[test]
    fn test_normalize_azimuth() {
        assert_eq!(normalize_azimuth(-90.0), 270.0);
        assert_eq!(normalize_azimuth(360.0), 0.0);
        assert_eq!(normalize_azimuth(-1e-15), 0.0);
    }
}
