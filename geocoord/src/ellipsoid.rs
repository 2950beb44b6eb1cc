//! Définitions des ellipsoïdes de référence

use serde::{Deserialize, Serialize};

use crate::error::{GeoError, Result};

/// Ellipsoïde de référence (demi-grand axe + inverse de l'aplatissement)
///
/// Les grandeurs dérivées (aplatissement, excentricités, demi-petit axe)
/// sont recalculées à la demande et jamais stockées.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawEllipsoid")]
pub struct Ellipsoid {
    /// Demi-grand axe (rayon équatorial) en mètres
    semi_major_axis: f64,
    /// Inverse de l'aplatissement (1/f)
    inverse_flattening: f64,
}

#[derive(Deserialize)]
struct RawEllipsoid {
    semi_major_axis: f64,
    inverse_flattening: f64,
}

impl TryFrom<RawEllipsoid> for Ellipsoid {
    type Error = GeoError;

    fn try_from(raw: RawEllipsoid) -> Result<Self> {
        Self::new(raw.semi_major_axis, raw.inverse_flattening)
    }
}

impl Ellipsoid {
    /// Ellipsoïde WGS84
    pub const WGS84: Self = Self {
        semi_major_axis: 6378137.0,
        inverse_flattening: 298.257223563,
    };

    /// Ellipsoïde GRS80
    /// Note: Quasi identique à WGS84, différence < 0.1mm sur le demi-petit axe
    pub const GRS80: Self = Self {
        semi_major_axis: 6378137.0,
        inverse_flattening: 298.257222101,
    };

    /// Crée un ellipsoïde, rejette les paramètres non positifs
    pub fn new(semi_major_axis: f64, inverse_flattening: f64) -> Result<Self> {
        let valid = |v: f64| v.is_finite() && v > 0.0;
        if !valid(semi_major_axis) || !valid(inverse_flattening) {
            return Err(GeoError::InvalidEllipsoid {
                semi_major_axis,
                inverse_flattening,
            });
        }

        Ok(Self {
            semi_major_axis,
            inverse_flattening,
        })
    }

    /// Demi-grand axe en mètres
    pub fn semi_major_axis(&self) -> f64 {
        self.semi_major_axis
    }

    pub fn inverse_flattening(&self) -> f64 {
        self.inverse_flattening
    }

    /// Aplatissement f
    pub fn flattening(&self) -> f64 {
        1.0 / self.inverse_flattening
    }

    /// Demi-petit axe (rayon polaire) en mètres
    pub fn semi_minor_axis(&self) -> f64 {
        self.semi_major_axis * (1.0 - self.flattening())
    }

    /// Première excentricité au carré
    pub fn eccentricity_squared(&self) -> f64 {
        let f = self.flattening();
        2.0 * f - f * f
    }

    /// Deuxième excentricité au carré
    pub fn second_eccentricity_squared(&self) -> f64 {
        let e2 = self.eccentricity_squared();
        e2 / (1.0 - e2)
    }

    /// Grande normale N (rayon de courbure dans le premier vertical)
    pub fn prime_vertical_radius(&self, latitude_rad: f64) -> f64 {
        let sin_lat = latitude_rad.sin();
        self.semi_major_axis / (1.0 - self.eccentricity_squared() * sin_lat * sin_lat).sqrt()
    }
}

impl Default for Ellipsoid {
    fn default() -> Self {
        Self::WGS84
    }
}
