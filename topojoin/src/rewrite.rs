//! Réécriture des géométries en références d'arcs

use crate::arcs::ArcBuilder;
use crate::point::Vertex;
use crate::shape::{Object, Shape};
use crate::types::{ArcRef, Geometry, GeometryKind};

/// Remplace les lignes et anneaux d'un objet nettoyé par leurs arcs.
///
/// Une géométrie dont tous les anneaux ou lignes ont été élagués est
/// conservée avec une liste d'arcs vide.
pub(crate) fn rewrite<P: Vertex>(object: &Object<P>, builder: &mut ArcBuilder<P>) -> Geometry {
    let kind = match &object.shape {
        Shape::Point(p) => GeometryKind::Point(p.position()),
        Shape::MultiPoint(points) => {
            GeometryKind::MultiPoint(points.iter().map(|p| p.position()).collect())
        }
        Shape::LineString(line) => GeometryKind::LineString(builder.line_arcs(line)),
        Shape::MultiLineString(lines) => GeometryKind::MultiLineString(
            lines.iter().map(|line| builder.line_arcs(line)).collect(),
        ),
        Shape::Polygon(rings) => GeometryKind::Polygon(rewrite_rings(rings, builder)),
        Shape::MultiPolygon(polygons) => GeometryKind::MultiPolygon(
            polygons
                .iter()
                .map(|rings| rewrite_rings(rings, builder))
                .collect(),
        ),
        Shape::GeometryCollection(members) => GeometryKind::GeometryCollection(
            members
                .iter()
                .map(|member| rewrite(member, builder))
                .collect(),
        ),
    };

    Geometry {
        kind,
        id: object.id.clone(),
        properties: object.properties.clone(),
    }
}

fn rewrite_rings<P: Vertex>(rings: &[Vec<P>], builder: &mut ArcBuilder<P>) -> Vec<Vec<ArcRef>> {
    rings.iter().map(|ring| builder.ring_arcs(ring)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point::GridPoint;
    use crate::types::{ObjectId, Position};

    fn build(objects: &[Object<GridPoint>]) -> Vec<Geometry> {
        let mut builder = ArcBuilder::new();
        for object in objects {
            builder.observe(object);
        }
        objects
            .iter()
            .map(|object| rewrite(object, &mut builder))
            .collect()
    }

    #[test]
    fn test_points_keep_positions() {
        let geometries = build(&[Object::new(Shape::MultiPoint(vec![[0, 0], [3, 2]]))]);
        assert_eq!(
            geometries[0].kind,
            GeometryKind::MultiPoint(vec![Position::Grid([0, 0]), Position::Grid([3, 2])])
        );
    }

    #[test]
    fn test_collection_members_keep_id() {
        let mut feature = Object::new(Shape::LineString(vec![[0, 0], [1, 0]]));
        feature.id = Some(ObjectId::String("road".to_string()));

        let collection = Object::new(Shape::GeometryCollection(vec![
            feature,
            Object::new(Shape::Polygon(Vec::new())),
        ]));

        let geometries = build(&[collection]);
        let GeometryKind::GeometryCollection(members) = &geometries[0].kind else {
            panic!("expected a collection");
        };
        assert_eq!(members.len(), 2);
        assert_eq!(members[0].kind, GeometryKind::LineString(vec![ArcRef::forward(0)]));
        assert_eq!(members[0].id, Some(ObjectId::String("road".to_string())));
        assert_eq!(members[1].kind, GeometryKind::Polygon(Vec::new()));
    }

    #[test]
    fn test_top_level_empty_geometry_is_kept() {
        let geometries = build(&[Object::new(Shape::Polygon(Vec::new()))]);
        assert_eq!(geometries[0].type_name(), "Polygon");
        assert!(geometries[0].is_empty());
    }
}
