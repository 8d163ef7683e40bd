//! Chargement des fichiers GeoJSON d'entrée

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use geo::{Coord, Rect};
use geojson::{GeoJson, Value};
use rayon::prelude::*;
use tracing::{debug, info};

/// Un fichier d'entrée, nommé d'après son nom de fichier sans extension
#[derive(Debug)]
pub struct InputFile {
    pub stats: InputStats,
    pub geojson: GeoJson,
}

/// Ce qui reste d'un fichier pour le rapport une fois le GeoJSON consommé
#[derive(Debug, Clone)]
pub struct InputStats {
    pub name: String,
    pub path: PathBuf,
    /// Nombre de positions lues
    pub positions: usize,
    /// Emprise des positions lues
    pub bounds: Option<Rect>,
}

impl InputFile {
    /// Sépare les statistiques de l'objet nommé passé au constructeur
    pub fn into_parts(self) -> (InputStats, (String, GeoJson)) {
        let name = self.stats.name.clone();
        (self.stats, (name, self.geojson))
    }
}

/// Charge les fichiers en parallèle, en conservant leur ordre
pub fn load_inputs(paths: &[PathBuf]) -> Result<Vec<InputFile>> {
    if paths.is_empty() {
        bail!("No input file given");
    }

    let inputs = paths
        .par_iter()
        .map(|path| load_input(path))
        .collect::<Result<Vec<_>>>()?;

    let mut names = HashSet::new();
    for input in &inputs {
        if !names.insert(input.stats.name.as_str()) {
            bail!(
                "Duplicate object name '{}' ({}): input files must have distinct names",
                input.stats.name,
                input.stats.path.display()
            );
        }
    }

    info!(
        files = inputs.len(),
        positions = inputs.iter().map(|i| i.stats.positions).sum::<usize>(),
        "Inputs loaded"
    );
    Ok(inputs)
}

/// Charge un fichier GeoJSON
pub fn load_input(path: &Path) -> Result<InputFile> {
    let name = object_name(path)?;
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Cannot read {}", path.display()))?;
    let geojson: GeoJson = content
        .parse()
        .with_context(|| format!("Invalid GeoJSON in {}", path.display()))?;

    let mut stats = Stats::default();
    stats.visit_geojson(&geojson);
    debug!(path = %path.display(), name = %name, positions = stats.positions, "File parsed");

    Ok(InputFile {
        stats: InputStats {
            name,
            path: path.to_path_buf(),
            positions: stats.positions,
            bounds: stats.bounds(),
        },
        geojson,
    })
}

/// Nom d'objet: nom du fichier sans extension (`communes.geojson` → `communes`)
pub fn object_name(path: &Path) -> Result<String> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .with_context(|| format!("Cannot derive an object name from {}", path.display()))
}

/// Emprise commune à plusieurs fichiers
pub fn merged_bounds(inputs: &[InputStats]) -> Option<Rect> {
    inputs
        .iter()
        .filter_map(|i| i.bounds)
        .reduce(|a, b| {
            Rect::new(
                Coord {
                    x: a.min().x.min(b.min().x),
                    y: a.min().y.min(b.min().y),
                },
                Coord {
                    x: a.max().x.max(b.max().x),
                    y: a.max().y.max(b.max().y),
                },
            )
        })
}

#[derive(Debug, Default)]
struct Stats {
    positions: usize,
    extent: Option<(Coord, Coord)>,
}

impl Stats {
    fn visit_geojson(&mut self, geojson: &GeoJson) {
        match geojson {
            GeoJson::Geometry(geometry) => self.visit_value(&geometry.value),
            GeoJson::Feature(feature) => {
                if let Some(geometry) = &feature.geometry {
                    self.visit_value(&geometry.value);
                }
            }
            GeoJson::FeatureCollection(collection) => {
                for geometry in collection.features.iter().filter_map(|f| f.geometry.as_ref()) {
                    self.visit_value(&geometry.value);
                }
            }
        }
    }

    fn visit_value(&mut self, value: &Value) {
        match value {
            Value::Point(p) => self.add(p),
            Value::MultiPoint(ps) | Value::LineString(ps) => ps.iter().for_each(|p| self.add(p)),
            Value::MultiLineString(lines) | Value::Polygon(lines) => {
                lines.iter().flatten().for_each(|p| self.add(p))
            }
            Value::MultiPolygon(polygons) => {
                polygons.iter().flatten().flatten().for_each(|p| self.add(p))
            }
            Value::GeometryCollection(geometries) => {
                for geometry in geometries {
                    self.visit_value(&geometry.value);
                }
            }
        }
    }

    fn add(&mut self, position: &[f64]) {
        self.positions += 1;
        let [x, y, ..] = position else {
            return;
        };
        let c = Coord { x: *x, y: *y };
        self.extent = Some(match self.extent {
            None => (c, c),
            Some((min, max)) => (
                Coord {
                    x: min.x.min(c.x),
                    y: min.y.min(c.y),
                },
                Coord {
                    x: max.x.max(c.x),
                    y: max.y.max(c.y),
                },
            ),
        });
    }

    fn bounds(&self) -> Option<Rect> {
        self.extent.map(|(min, max)| Rect::new(min, max))
    }
}
