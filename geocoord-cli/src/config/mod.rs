//! Configuration du moteur géodésique

use std::path::Path;

use anyhow::{Context, Result};
use geocoord::GeodesyConfig;
use serde::{Deserialize, Serialize};

/// Variable d'environnement donnant la configuration par défaut
pub const CONFIG_ENV: &str = "GEOCOORD_CONFIG";

/// Preset utilisé quand rien n'est précisé
pub const DEFAULT_PRESET: &str = "wgs84";

/// Configuration principale
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Nom libre de la configuration
    #[serde(default)]
    pub name: Option<String>,

    /// Paramètres du moteur (ellipsoïde, rayon, convergence, UTM)
    #[serde(flatten)]
    pub geodesy: GeodesyConfig,
}

impl Config {
    /// Charge une configuration depuis un fichier
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .context(format!("Failed to read config file: {}", path.display()))?;

        serde_json::from_str(&content).context("Failed to parse config JSON")
    }

    /// Charge une configuration depuis un preset embarqué
    pub fn from_preset(preset: &str) -> Result<Self> {
        match preset {
            "wgs84" => Self::load_embedded(include_str!("presets/wgs84.json")),
            "grs80" => Self::load_embedded(include_str!("presets/grs80.json")),
            _ => anyhow::bail!("Unknown preset: {}. Use: wgs84, grs80", preset),
        }
    }

    fn load_embedded(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse embedded config")
    }

    /// Résout un nom de preset ou un chemin de fichier JSON
    ///
    /// Sans argument, utilise `GEOCOORD_CONFIG` puis le preset `wgs84`.
    pub fn resolve(selector: Option<&str>) -> Result<Self> {
        let selector = match selector {
            Some(s) => s.to_string(),
            None => std::env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_PRESET.to_string()),
        };

        let path = Path::new(&selector);
        if path.extension().map_or(false, |ext| ext == "json") || path.exists() {
            Self::load(path)
        } else {
            Self::from_preset(&selector)
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            name: Some(DEFAULT_PRESET.to_string()),
            geodesy: GeodesyConfig::default(),
        }
    }
}
