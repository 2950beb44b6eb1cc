//! Configuration des solveurs et des paramètres de projection
//!
//! Toutes les constantes partagées (ellipsoïde, rayon terrestre moyen,
//! epsilon de convergence, paramètres UTM) sont regroupées ici et passées
//! explicitement aux composants de calcul.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::ellipsoid::Ellipsoid;
use crate::error::{GeoError, Result};
use crate::spherical::Sphere;
use crate::utm::UtmConverter;
use crate::vincenty::Vincenty;

/// Rayon terrestre moyen utilisé en mode sphérique (mètres)
pub const MEAN_EARTH_RADIUS: f64 = 6366707.01896486;

/// Epsilon de convergence des solveurs itératifs (radians)
pub const CONVERGENCE_EPSILON: f64 = 5e-14;

/// Critère d'arrêt d'une itération de point fixe
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Convergence {
    /// Écart maximal entre deux estimations successives
    pub epsilon: f64,
    /// Nombre maximal d'itérations avant `NonConvergence`
    pub max_iterations: usize,
}

impl Convergence {
    /// Conversion cartésien → géographique (convergence rapide, ~e² par pas)
    pub const CARTESIAN: Self = Self {
        epsilon: CONVERGENCE_EPSILON,
        max_iterations: 20,
    };

    /// Formules de Vincenty (lentes près des antipodes)
    pub const VINCENTY: Self = Self {
        epsilon: CONVERGENCE_EPSILON,
        max_iterations: 200,
    };

    /// Itère `step` depuis `initial` jusqu'à ce que deux valeurs successives
    /// diffèrent de moins de `epsilon`.
    ///
    /// Retourne la dernière valeur et le nombre d'itérations effectuées.
    ///
    /// # Errors
    ///
    /// `NonConvergence` avec le nombre d'itérations effectuées si le plafond
    /// est atteint ou si une estimation n'est pas finie.
    pub fn fixed_point<F>(
        &self,
        solver: &'static str,
        initial: f64,
        mut step: F,
    ) -> Result<(f64, usize)>
    where
        F: FnMut(f64) -> f64,
    {
        let mut value = initial;
        let mut iterations = 0;

        while iterations < self.max_iterations {
            iterations += 1;
            let next = step(value);
            let delta = (next - value).abs();
            trace!(solver, iteration = iterations, delta, "fixed-point step");

            if !next.is_finite() {
                warn!(solver, iterations, "non-finite estimate");
                return Err(GeoError::non_convergence(solver, iterations));
            }
            value = next;

            if delta <= self.epsilon {
                debug!(solver, iterations, "converged");
                return Ok((value, iterations));
            }
        }

        warn!(solver, iterations, "solver did not converge");
        Err(GeoError::non_convergence(solver, iterations))
    }
}

/// Paramètres de la projection UTM
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UtmParams {
    /// Facteur d'échelle sur le méridien central (k0)
    pub scale_factor: f64,
    /// False easting (mètres)
    pub false_easting: f64,
    /// False northing ajouté par la conversion directe dans l'hémisphère sud
    pub false_northing_south: f64,
    /// False northing retiré par la conversion inverse dans l'hémisphère sud
    pub inverse_false_northing_south: f64,
    /// Arrondir easting/northing au mètre le plus proche
    pub round_to_meter: bool,
}

impl Default for UtmParams {
    fn default() -> Self {
        Self {
            scale_factor: 0.9996,
            false_easting: 500000.0,
            false_northing_south: 10000000.0,
            inverse_false_northing_south: 10000000.0,
            round_to_meter: true,
        }
    }
}

/// Configuration complète du moteur géodésique
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeodesyConfig {
    /// Ellipsoïde de référence
    pub ellipsoid: Ellipsoid,
    /// Rayon de la sphère pour les calculs sphériques
    pub sphere_radius: f64,
    /// Critère d'arrêt de la conversion cartésien → géographique
    pub cartesian: Convergence,
    /// Critère d'arrêt des formules de Vincenty
    pub vincenty: Convergence,
    /// Paramètres UTM
    pub utm: UtmParams,
}

impl Default for GeodesyConfig {
    fn default() -> Self {
        Self {
            ellipsoid: Ellipsoid::WGS84,
            sphere_radius: MEAN_EARTH_RADIUS,
            cartesian: Convergence::CARTESIAN,
            vincenty: Convergence::VINCENTY,
            utm: UtmParams::default(),
        }
    }
}

impl GeodesyConfig {
    /// Calculateur sphérique configuré
    pub fn sphere(&self) -> Result<Sphere> {
        Sphere::new(self.sphere_radius)
    }

    /// Solveur de Vincenty configuré
    pub fn vincenty(&self) -> Vincenty {
        Vincenty::new(self.ellipsoid).with_convergence(self.vincenty)
    }

    /// Convertisseur UTM configuré
    pub fn utm(&self) -> UtmConverter {
        UtmConverter::new(self.ellipsoid).with_params(self.utm)
    }
}
