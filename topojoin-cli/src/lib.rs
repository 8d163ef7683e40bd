//! # topojoin-cli
//!
//! Construction de topologies TopoJSON depuis des fichiers GeoJSON.
//!
//! ## Usage CLI
//!
//! ```bash
//! # Un objet par fichier, nommé d'après le fichier
//! topojoin communes.geojson routes.geojson -o topo.json
//!
//! # Conserver et renommer des propriétés
//! topojoin communes.geojson -p nom,code=CODE_INSEE -q 100000 --report report.json
//!
//! # Coordonnées brutes, sans quantification
//! topojoin communes.geojson -q 0 --pretty
//! ```

pub mod cli;
pub mod config;
pub mod input;
pub mod report;

pub use config::Config;
pub use report::BuildReport;
