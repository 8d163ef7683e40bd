//! Rapport de construction
//!
//! Résume une topologie produite: objets, positions lues et écrites, arcs
//! partagés, emprise et durée.

use std::io::{self, Write};
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use geo::Rect;
use serde::Serialize;
use topojoin::{Geometry, GeometryKind, Topology};

use crate::input::{merged_bounds, InputStats};

/// Résumé d'un objet de la topologie
#[derive(Debug, Clone, Serialize)]
pub struct ObjectSummary {
    /// Nom de l'objet
    pub name: String,
    /// Type de la géométrie de premier niveau
    pub geometry_type: String,
    /// Nombre de géométries (membres des collections compris)
    pub geometries: usize,
    /// Nombre de références d'arcs
    pub arc_refs: usize,
}

/// Emprise `[min_x, min_y, max_x, max_y]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds(pub [f64; 4]);

impl From<Rect> for Bounds {
    fn from(rect: Rect) -> Self {
        Self([rect.min().x, rect.min().y, rect.max().x, rect.max().y])
    }
}

/// Rapport complet de construction
#[derive(Debug, Clone, Serialize)]
pub struct BuildReport {
    /// Fichiers d'entrée
    pub inputs: Vec<String>,
    /// Résolution de la grille (0 = passthrough)
    pub quantization: u32,
    /// Durée de la construction
    pub duration_secs: f64,

    // Compteurs globaux
    /// Nombre d'objets nommés
    pub objects: usize,
    /// Positions lues dans les fichiers d'entrée
    pub input_positions: usize,
    /// Positions écrites (arcs + points)
    pub output_positions: usize,
    /// Nombre d'arcs partagés
    pub arcs: usize,

    /// Emprise des données d'entrée
    pub bounds: Option<Bounds>,

    /// Détail par objet
    pub by_object: Vec<ObjectSummary>,
}

impl BuildReport {
    pub fn new(inputs: &[InputStats], topology: &Topology, quantization: u32) -> Self {
        let by_object: Vec<ObjectSummary> = topology
            .objects
            .iter()
            .map(|(name, geometry)| ObjectSummary {
                name: name.clone(),
                geometry_type: geometry.type_name().to_string(),
                geometries: count_geometries(geometry),
                arc_refs: geometry.arc_refs().count(),
            })
            .collect();

        let point_positions: usize = topology
            .objects
            .iter()
            .map(|(_, geometry)| count_points(geometry))
            .sum();

        Self {
            inputs: inputs.iter().map(|i| i.path.display().to_string()).collect(),
            quantization,
            duration_secs: 0.0,
            objects: topology.objects.len(),
            input_positions: inputs.iter().map(|i| i.positions).sum(),
            output_positions: topology.arc_position_count() + point_positions,
            arcs: topology.arcs.len(),
            bounds: merged_bounds(inputs).map(Bounds::from),
            by_object,
        }
    }

    /// Définit la durée de la construction
    pub fn set_duration(&mut self, duration: Duration) {
        self.duration_secs = duration.as_secs_f64();
    }

    /// Part des positions éliminées par le partage des arcs
    pub fn reduction(&self) -> f64 {
        if self.input_positions == 0 {
            return 0.0;
        }
        1.0 - self.output_positions as f64 / self.input_positions as f64
    }

    /// Affiche le rapport
    pub fn display<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "\n{}", "=".repeat(60))?;
        writeln!(out, "TOPOLOGY REPORT")?;
        writeln!(out, "{}", "=".repeat(60))?;

        writeln!(out, "\nDuration: {:.2}s", self.duration_secs)?;
        match self.quantization {
            0 => writeln!(out, "Quantization: disabled")?,
            q => writeln!(out, "Quantization: {q}")?,
        }
        if let Some(Bounds([min_x, min_y, max_x, max_y])) = self.bounds {
            writeln!(out, "Bounds: [{min_x}, {min_y}] - [{max_x}, {max_y}]")?;
        }

        writeln!(out, "\n--- SUMMARY ---")?;
        writeln!(out, "Objects: {}", self.objects)?;
        writeln!(out, "Arcs: {}", self.arcs)?;
        writeln!(
            out,
            "Positions: {} in, {} out ({:.1}% saved)",
            self.input_positions,
            self.output_positions,
            self.reduction() * 100.0
        )?;

        if !self.by_object.is_empty() {
            writeln!(out, "\n--- BY OBJECT ---")?;
            for object in &self.by_object {
                writeln!(
                    out,
                    "  {}: {} ({} geometries, {} arc refs)",
                    object.name, object.geometry_type, object.geometries, object.arc_refs
                )?;
            }
        }

        writeln!(out, "\n{}", "=".repeat(60))
    }

    /// Sauvegarde le rapport en JSON
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .with_context(|| format!("Cannot write report {}", path.display()))?;
        Ok(())
    }

    /// Affichage compact pour le résumé
    pub fn summary(&self) -> String {
        format!(
            "{} objects, {} arcs, {} positions ({} in)",
            self.objects, self.arcs, self.output_positions, self.input_positions
        )
    }
}

fn count_geometries(geometry: &Geometry) -> usize {
    match &geometry.kind {
        GeometryKind::GeometryCollection(members) => {
            1 + members.iter().map(count_geometries).sum::<usize>()
        }
        _ => 1,
    }
}

fn count_points(geometry: &Geometry) -> usize {
    match &geometry.kind {
        GeometryKind::Point(_) => 1,
        GeometryKind::MultiPoint(points) => points.len(),
        GeometryKind::GeometryCollection(members) => members.iter().map(count_points).sum(),
        _ => 0,
    }
}
