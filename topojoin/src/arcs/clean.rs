//! Suppression des points coïncidents et élagage des membres dégénérés

use std::collections::HashSet;

use crate::point::Vertex;
use crate::shape::{Object, Shape};

/// Nettoie toutes les lignes et tous les anneaux d'un objet.
///
/// Les membres de collection sans coordonnées en entrée sont retirés.
///
/// Après nettoyage, chaque ligne a au moins 2 points et aucun doublon
/// consécutif; chaque anneau est fermé (premier point = dernier point) et
/// compte au moins 3 sommets distincts.
pub(crate) fn clean_object<P: Vertex>(object: Object<P>) -> Object<P> {
    let shape = match object.shape {
        Shape::LineString(line) => Shape::LineString(clean_line(&line).unwrap_or_default()),
        Shape::MultiLineString(lines) => {
            Shape::MultiLineString(lines.iter().filter_map(|l| clean_line(l)).collect())
        }
        Shape::Polygon(rings) => Shape::Polygon(clean_polygon(&rings).unwrap_or_default()),
        Shape::MultiPolygon(polygons) => Shape::MultiPolygon(
            polygons
                .iter()
                .filter_map(|rings| clean_polygon(rings))
                .collect(),
        ),
        // Seuls les membres sans aucune position disparaissent; un membre
        // dégénéré reste, vidé de ses lignes et anneaux
        Shape::GeometryCollection(members) => Shape::GeometryCollection(
            members
                .into_iter()
                .filter(Object::has_coords)
                .map(clean_object)
                .collect(),
        ),
        shape @ (Shape::Point(_) | Shape::MultiPoint(_)) => shape,
    };

    Object {
        shape,
        id: object.id,
        properties: object.properties,
    }
}

/// `None` si la ligne a moins de 2 points distincts
pub(crate) fn clean_line<P: Vertex>(line: &[P]) -> Option<Vec<P>> {
    let line = dedup_consecutive(line);
    (line.len() >= 2).then_some(line)
}

/// Anneau fermé, ou `None` s'il a moins de 3 sommets distincts.
/// Un anneau non fermé en entrée est fermé implicitement.
pub(crate) fn clean_ring<P: Vertex>(ring: &[P]) -> Option<Vec<P>> {
    let mut ring = dedup_consecutive(ring);
    while ring.len() > 1 && ring.last() == ring.first() {
        ring.pop();
    }

    if ring.len() < 3 || ring.iter().collect::<HashSet<_>>().len() < 3 {
        return None;
    }

    ring.push(ring[0]);
    Some(ring)
}

/// Sans anneau extérieur valide, le polygone entier disparaît
fn clean_polygon<P: Vertex>(rings: &[Vec<P>]) -> Option<Vec<Vec<P>>> {
    let (exterior, holes) = rings.split_first()?;
    let exterior = clean_ring(exterior)?;
    Some(
        std::iter::once(exterior)
            .chain(holes.iter().filter_map(|hole| clean_ring(hole)))
            .collect(),
    )
}

fn dedup_consecutive<P: Vertex>(points: &[P]) -> Vec<P> {
    let mut out: Vec<P> = Vec::with_capacity(points.len());
    for &p in points {
        if out.last() != Some(&p) {
            out.push(p);
        }
    }
    out
}
