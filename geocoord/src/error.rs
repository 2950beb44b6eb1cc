//! Types d'erreurs pour le crate geocoord

use thiserror::Error;

/// Erreurs pouvant survenir lors des calculs géodésiques
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeoError {
    /// Paramètres d'ellipsoïde non positifs (ou non finis)
    #[error("Invalid ellipsoid: a = {semi_major_axis}, 1/f = {inverse_flattening}")]
    InvalidEllipsoid {
        semi_major_axis: f64,
        inverse_flattening: f64,
    },

    /// Rayon de sphère non positif (ou non fini)
    #[error("Invalid sphere radius: {0}")]
    InvalidRadius(f64),

    /// Un solveur itératif a dépassé son nombre maximal d'itérations
    #[error("{solver} did not converge after {iterations} iterations")]
    NonConvergence {
        solver: &'static str,
        iterations: usize,
    },

    /// Lettre de bande UTM hors de la table "CDEFGHJKLMNPQRSTUVWX"
    #[error("Unrecognized UTM zone letter: {0:?}")]
    UnrecognizedZoneLetter(char),

    /// Numéro de zone UTM hors de 1..=60
    #[error("Invalid UTM zone number: {0}")]
    InvalidZoneNumber(u8),

    /// Latitude hors de la couverture UTM [-80, 84]
    #[error("Latitude {latitude} is outside UTM coverage (-80..=84)")]
    OutsideUtmCoverage { latitude: f64 },

    /// Géométrie dégénérée (segment de longueur nulle, vecteur nul...)
    #[error("Degenerate geometry: {0}")]
    DegenerateGeometry(String),
}

impl GeoError {
    /// Crée une erreur de géométrie dégénérée avec contexte
    pub fn degenerate(reason: impl Into<String>) -> Self {
        Self::DegenerateGeometry(reason.into())
    }

    /// Crée une erreur de non-convergence
    pub fn non_convergence(solver: &'static str, iterations: usize) -> Self {
        Self::NonConvergence { solver, iterations }
    }
}

/// Alias de résultat pour les opérations du crate
pub type Result<T> = std::result::Result<T, GeoError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = GeoError::non_convergence("vincenty inverse", 200);
        assert_eq!(
            err.to_string(),
            "vincenty inverse did not converge after 200 iterations"
        );

        let err = GeoError::UnrecognizedZoneLetter('I');
        assert!(err.to_string().contains("'I'"));
    }

    #[test]
    fn test_degenerate_helper() {
        let err = GeoError::degenerate("zero-length segment");
        assert!(matches!(err, GeoError::DegenerateGeometry(ref r) if r == "zero-length segment"));
    }
}
