//! Bibliothèque interne de la CLI geocoord
//!
//! Exposée pour les tests d'intégration.

pub mod cli;
pub mod config;
