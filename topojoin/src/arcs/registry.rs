//! Registre des arcs canoniques (déduplication directe / inverse)

use std::collections::HashMap;

use crate::point::Vertex;
use crate::types::ArcRef;

/// Arcs canoniques dans l'ordre de première rencontre
#[derive(Debug)]
pub(crate) struct ArcRegistry<P> {
    arcs: Vec<Vec<P>>,
    by_points: HashMap<Vec<P>, usize>,
    /// Anneaux sans jonction, indexés par leur cycle canonique:
    /// index de l'arc et sens de l'arc enregistré par rapport au cycle
    by_cycle: HashMap<Vec<P>, (usize, bool)>,
}

impl<P: Vertex> ArcRegistry<P> {
    pub fn new() -> Self {
        Self {
            arcs: Vec::new(),
            by_points: HashMap::new(),
            by_cycle: HashMap::new(),
        }
    }

    /// Référence vers un arc identique (direct ou inversé), ou nouvel arc
    pub fn intern(&mut self, arc: &[P]) -> ArcRef {
        if let Some(&index) = self.by_points.get(arc) {
            return ArcRef::forward(index);
        }

        let reversed: Vec<P> = arc.iter().rev().copied().collect();
        if let Some(&index) = self.by_points.get(&reversed) {
            return ArcRef::reverse(index);
        }

        let index = self.arcs.len();
        self.arcs.push(arc.to_vec());
        self.by_points.insert(arc.to_vec(), index);
        ArcRef::forward(index)
    }

    /// Anneau fermé sans jonction: deux anneaux décrivant le même cycle
    /// (départ ou sens différents) partagent un seul arc.
    pub fn intern_cycle(&mut self, ring: &[P]) -> ArcRef {
        let vertices = &ring[..ring.len().saturating_sub(1)];
        let Some((key, forward)) = cycle_key(vertices) else {
            return self.intern(ring);
        };

        if let Some(&(index, registered_forward)) = self.by_cycle.get(&key) {
            return if registered_forward == forward {
                ArcRef::forward(index)
            } else {
                ArcRef::reverse(index)
            };
        }

        let arc = self.intern(ring);
        self.by_cycle.insert(key, (arc.index, forward != arc.reversed));
        arc
    }

    pub fn len(&self) -> usize {
        self.arcs.len()
    }

    pub fn into_arcs(self) -> Vec<Vec<P>> {
        self.arcs
    }
}

/// Rotation commençant au plus petit sommet, dans le sens lexicographiquement
/// minimal; le booléen indique si ce sens est celui de l'anneau.
/// `None` si le plus petit sommet apparaît plusieurs fois.
fn cycle_key<P: Vertex>(vertices: &[P]) -> Option<(Vec<P>, bool)> {
    let n = vertices.len();
    let (start, min) = vertices.iter().enumerate().min_by_key(|(_, p)| **p)?;
    if vertices.iter().filter(|p| *p == min).count() > 1 {
        return None;
    }

    let forward: Vec<P> = (0..n).map(|k| vertices[(start + k) % n]).collect();
    let backward: Vec<P> = (0..n).map(|k| vertices[(start + n - k) % n]).collect();
    Some(if forward <= backward {
        (forward, true)
    } else {
        (backward, false)
    })
}
