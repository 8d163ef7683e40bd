//! Détection des jonctions (points de coupure)
//!
//! Un point est une jonction s'il termine une ligne ouverte, ou s'il est
//! visité plusieurs fois avec des voisins différents. Deux frontières qui
//! suivent le même chemin passent par chaque point intérieur avec les mêmes
//! voisins et ne sont donc pas coupées entre leurs extrémités communes.

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};

use crate::point::Vertex;

#[derive(Debug)]
pub(crate) struct Junctions<P> {
    /// Paire de voisins (non ordonnée) de la première visite
    neighbors: HashMap<P, (P, P)>,
    junctions: HashSet<P>,
}

impl<P: Vertex> Junctions<P> {
    pub fn new() -> Self {
        Self {
            neighbors: HashMap::new(),
            junctions: HashSet::new(),
        }
    }

    /// Ligne nettoyée (au moins 2 points)
    pub fn add_line(&mut self, line: &[P]) {
        let (Some(&first), Some(&last)) = (line.first(), line.last()) else {
            return;
        };
        self.junctions.insert(first);
        self.junctions.insert(last);

        for window in line.windows(3) {
            self.visit(window[1], window[0], window[2]);
        }
    }

    /// Anneau nettoyé et fermé: les voisins bouclent autour du point de fermeture
    pub fn add_ring(&mut self, ring: &[P]) {
        let vertices = &ring[..ring.len().saturating_sub(1)];
        let n = vertices.len();
        for i in 0..n {
            let previous = vertices[(i + n - 1) % n];
            let next = vertices[(i + 1) % n];
            self.visit(vertices[i], previous, next);
        }
    }

    fn visit(&mut self, point: P, a: P, b: P) {
        let pair = if a <= b { (a, b) } else { (b, a) };
        match self.neighbors.entry(point) {
            Entry::Vacant(entry) => {
                entry.insert(pair);
            }
            Entry::Occupied(entry) => {
                if *entry.get() != pair {
                    self.junctions.insert(point);
                }
            }
        }
    }

    pub fn contains(&self, point: &P) -> bool {
        self.junctions.contains(point)
    }

    pub fn len(&self) -> usize {
        self.junctions.len()
    }
}
