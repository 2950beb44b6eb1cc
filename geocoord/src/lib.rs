//! # geocoord
//!
//! Moteur de calcul géodésique pour applications de géocaching.
//!
//! ## Features
//!
//! - Conversions géographique ↔ cartésien (ellipsoïde et sphère)
//! - Distance, projection et distance transversale sur la sphère
//! - Formules de Vincenty (problèmes direct et inverse) sur WGS84
//! - Conversion UTM directe et inverse, zones Norvège/Svalbard comprises
//! - Solveurs itératifs bornés : pas de boucle infinie près des antipodes
//!
//! ## Usage
//!
//! ```rust
//! use geocoord::{GeoPoint, GeodesyConfig};
//!
//! let config = GeodesyConfig::default();
//! let p1 = GeoPoint::new(50.0667, 5.7167);
//! let p2 = GeoPoint::new(58.6439, 3.07);
//!
//! let geodesic = config.vincenty().inverse(&p1, &p2)?;
//! println!("{:.1} m, azimut {:.2}°", geodesic.distance, geodesic.forward_azimuth);
//!
//! let utm = config.utm().forward(&p1)?;
//! println!("{}{} {} {}", utm.zone_number, utm.zone_letter, utm.easting, utm.northing);
//! # Ok::<(), geocoord::GeoError>(())
//! ```
//!
//! Angles en degrés, distances en mètres ; la trigonométrie interne est en radians.

pub mod config;
pub mod ellipsoid;
pub mod error;
pub mod spherical;
pub mod types;
pub mod utm;
pub mod vincenty;

pub use config::{Convergence, GeodesyConfig, UtmParams, CONVERGENCE_EPSILON, MEAN_EARTH_RADIUS};
pub use ellipsoid::Ellipsoid;
pub use error::{GeoError, Result};
pub use spherical::Sphere;
pub use types::{normalize_longitude, CartesianPoint, GeoPoint, UtmReference};
pub use utm::{UtmConverter, ZONE_LETTERS};
pub use vincenty::{Geodesic, Vincenty};
