//! Extraction des arcs partagés
//!
//! Deux passes sur les objets nettoyés: la première enregistre les jonctions
//! de toutes les lignes et de tous les anneaux, la seconde découpe chaque
//! ligne ou anneau aux jonctions et dédoublonne les arcs obtenus.

mod clean;
mod cut;
mod junction;
mod registry;

pub(crate) use clean::clean_object;

use tracing::trace;

use crate::point::Vertex;
use crate::shape::{Object, Shape};
use crate::types::ArcRef;

use cut::{cut_line, cut_ring, RingCut};
use junction::Junctions;
use registry::ArcRegistry;

#[derive(Debug)]
pub(crate) struct ArcBuilder<P> {
    junctions: Junctions<P>,
    registry: ArcRegistry<P>,
}

impl<P: Vertex> ArcBuilder<P> {
    pub fn new() -> Self {
        Self {
            junctions: Junctions::new(),
            registry: ArcRegistry::new(),
        }
    }

    /// Première passe: doit voir tous les objets avant tout découpage
    pub fn observe(&mut self, object: &Object<P>) {
        match &object.shape {
            Shape::Point(_) | Shape::MultiPoint(_) => {}
            Shape::LineString(line) => self.junctions.add_line(line),
            Shape::MultiLineString(lines) => {
                for line in lines {
                    self.junctions.add_line(line);
                }
            }
            Shape::Polygon(rings) => {
                for ring in rings {
                    self.junctions.add_ring(ring);
                }
            }
            Shape::MultiPolygon(polygons) => {
                for ring in polygons.iter().flatten() {
                    self.junctions.add_ring(ring);
                }
            }
            Shape::GeometryCollection(members) => {
                for member in members {
                    self.observe(member);
                }
            }
        }
    }

    pub fn line_arcs(&mut self, line: &[P]) -> Vec<ArcRef> {
        cut_line(line, &self.junctions)
            .into_iter()
            .map(|arc| self.registry.intern(arc))
            .collect()
    }

    pub fn ring_arcs(&mut self, ring: &[P]) -> Vec<ArcRef> {
        match cut_ring(ring, &self.junctions) {
            RingCut::Closed(ring) => {
                trace!(points = ring.len(), "Ring without junction kept as a single arc");
                vec![self.registry.intern_cycle(&ring)]
            }
            RingCut::Arcs(arcs) => arcs.iter().map(|arc| self.registry.intern(arc)).collect(),
        }
    }

    pub fn junction_count(&self) -> usize {
        self.junctions.len()
    }

    pub fn arc_count(&self) -> usize {
        self.registry.len()
    }

    pub fn finish(self) -> Vec<Vec<P>> {
        self.registry.into_arcs()
    }
}
