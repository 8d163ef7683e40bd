//! Sommets manipulés par l'extraction d'arcs
//!
//! Deux représentations: points de grille entiers (quantification active)
//! et coordonnées brutes comparées au bit près (passthrough).

use std::cmp::Ordering;
use std::fmt::Debug;
use std::hash::{Hash, Hasher};

use geo::Coord;

use crate::types::Position;

/// Sommet comparable exactement, utilisable comme clé de table
pub(crate) trait Vertex: Copy + Eq + Hash + Ord + Debug {
    fn position(self) -> Position;

    /// Encode un arc finalisé pour la sortie
    fn encode_arc(arc: &[Self]) -> Vec<Position>;
}

/// Point de la grille de quantification
pub(crate) type GridPoint = [i64; 2];

impl Vertex for GridPoint {
    fn position(self) -> Position {
        Position::Grid(self)
    }

    /// Premier point absolu, puis différences successives
    fn encode_arc(arc: &[Self]) -> Vec<Position> {
        let mut previous = [0i64; 2];
        arc.iter()
            .map(|&[x, y]| {
                let delta = [x - previous[0], y - previous[1]];
                previous = [x, y];
                Position::Grid(delta)
            })
            .collect()
    }
}

/// Coordonnée brute (mode passthrough)
#[derive(Debug, Clone, Copy)]
pub(crate) struct RawPoint(Coord);

impl RawPoint {
    pub fn new(c: Coord) -> Self {
        // -0.0 + 0.0 == +0.0: les deux zéros deviennent le même sommet
        Self(Coord {
            x: c.x + 0.0,
            y: c.y + 0.0,
        })
    }
}

impl PartialEq for RawPoint {
    fn eq(&self, other: &Self) -> bool {
        self.0.x.to_bits() == other.0.x.to_bits() && self.0.y.to_bits() == other.0.y.to_bits()
    }
}

impl Eq for RawPoint {}

impl Hash for RawPoint {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.x.to_bits().hash(state);
        self.0.y.to_bits().hash(state);
    }
}

impl PartialOrd for RawPoint {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for RawPoint {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .x
            .total_cmp(&other.0.x)
            .then_with(|| self.0.y.total_cmp(&other.0.y))
    }
}

impl Vertex for RawPoint {
    fn position(self) -> Position {
        Position::Raw([self.0.x, self.0.y])
    }

    fn encode_arc(arc: &[Self]) -> Vec<Position> {
        arc.iter().map(|p| p.position()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delta_encoding() {
        let arc: Vec<GridPoint> = vec![[0, 0], [1, 0], [0, 1], [1, 1]];
        assert_eq!(
            GridPoint::encode_arc(&arc),
            vec![
                Position::Grid([0, 0]),
                Position::Grid([1, 0]),
                Position::Grid([-1, 1]),
                Position::Grid([1, 0]),
            ]
        );
    }

    #[test]
    fn test_raw_zeroes_are_equal() {
        let a = RawPoint::new(Coord { x: -0.0, y: 1.5 });
        let b = RawPoint::new(Coord { x: 0.0, y: 1.5 });
        assert_eq!(a, b);
        assert_eq!(a.cmp(&b), Ordering::Equal);
    }
}
