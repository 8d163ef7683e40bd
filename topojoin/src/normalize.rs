//! Normalisation des entrées GeoJSON
//!
//! Les Feature sont remplacées par leur géométrie (id recopié, propriétés
//! filtrées), les FeatureCollection par des GeometryCollection. Les positions
//! sont validées ici: au moins deux ordonnées, toutes finies.

use std::collections::HashSet;

use geo::Coord;
use geojson::{Feature, GeoJson, JsonObject, Value};
use tracing::debug;

use crate::options::PropertyFilter;
use crate::shape::{Object, Shape};
use crate::TopologyError;

/// Normalise les objets nommés, dans l'ordre d'entrée
pub(crate) fn normalize<I>(
    objects: I,
    filter: Option<&PropertyFilter>,
) -> Result<Vec<(String, Object<Coord>)>, TopologyError>
where
    I: IntoIterator<Item = (String, GeoJson)>,
{
    let mut seen = HashSet::new();
    let mut normalized = Vec::new();

    for (name, input) in objects {
        if !seen.insert(name.clone()) {
            return Err(TopologyError::input(&name, "duplicate object name"));
        }

        let object = match input {
            GeoJson::Geometry(geometry) => Object::new(shape(&name, geometry.value)?),
            GeoJson::Feature(feature) => feature_object(&name, feature, filter)?,
            GeoJson::FeatureCollection(collection) => {
                let members = collection
                    .features
                    .into_iter()
                    .map(|feature| feature_object(&name, feature, filter))
                    .collect::<Result<Vec<_>, _>>()?;
                Object::new(Shape::GeometryCollection(members))
            }
        };
        normalized.push((name, object));
    }

    debug!(objects = normalized.len(), "Objects normalized");
    Ok(normalized)
}

/// Remplace une Feature par sa géométrie
fn feature_object(
    name: &str,
    feature: Feature,
    filter: Option<&PropertyFilter>,
) -> Result<Object<Coord>, TopologyError> {
    let shape = match feature.geometry {
        Some(geometry) => shape(name, geometry.value)?,
        // Feature sans géométrie: collection vide, élaguée dans les collections
        None => Shape::GeometryCollection(Vec::new()),
    };

    Ok(Object {
        shape,
        id: feature.id.map(Into::into),
        properties: filter_properties(feature.properties, filter)?,
    })
}

fn shape(name: &str, value: Value) -> Result<Shape<Coord>, TopologyError> {
    let to_coord = |p: Vec<f64>| position(name, p);
    let to_line = |line: Vec<Vec<f64>>| line.into_iter().map(to_coord).collect::<Result<Vec<_>, _>>();
    let to_lines = |lines: Vec<Vec<Vec<f64>>>| {
        lines
            .into_iter()
            .map(to_line)
            .collect::<Result<Vec<_>, _>>()
    };

    Ok(match value {
        Value::Point(p) => Shape::Point(to_coord(p)?),
        Value::MultiPoint(points) => Shape::MultiPoint(to_line(points)?),
        Value::LineString(line) => Shape::LineString(to_line(line)?),
        Value::MultiLineString(lines) => Shape::MultiLineString(to_lines(lines)?),
        Value::Polygon(rings) => Shape::Polygon(to_lines(rings)?),
        Value::MultiPolygon(polygons) => Shape::MultiPolygon(
            polygons
                .into_iter()
                .map(to_lines)
                .collect::<Result<Vec<_>, _>>()?,
        ),
        Value::GeometryCollection(geometries) => Shape::GeometryCollection(
            geometries
                .into_iter()
                .map(|g| shape(name, g.value).map(Object::new))
                .collect::<Result<Vec<_>, _>>()?,
        ),
    })
}

/// Valide une position GeoJSON (z et m ignorés)
fn position(name: &str, p: Vec<f64>) -> Result<Coord, TopologyError> {
    let [x, y] = match p.as_slice() {
        [x, y, ..] => [*x, *y],
        _ => {
            return Err(TopologyError::input(
                name,
                format!("position has {} ordinate(s), expected at least 2", p.len()),
            ))
        }
    };
    if !x.is_finite() || !y.is_finite() {
        return Err(TopologyError::input(
            name,
            format!("non-finite coordinate [{x}, {y}]"),
        ));
    }
    Ok(Coord { x, y })
}

/// Applique le filtre; sans filtre ou sans clé retenue, pas de propriétés
fn filter_properties(
    properties: Option<JsonObject>,
    filter: Option<&PropertyFilter>,
) -> Result<Option<JsonObject>, TopologyError> {
    let (Some(properties), Some(filter)) = (properties, filter) else {
        return Ok(None);
    };

    let mut kept = JsonObject::new();
    for (key, value) in properties {
        match filter.apply(&key) {
            Ok(Some(target)) => {
                kept.insert(target, value);
            }
            Ok(None) => {}
            Err(source) => return Err(TopologyError::filter(key, source)),
        }
    }

    Ok((!kept.is_empty()).then_some(kept))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn geojson(value: serde_json::Value) -> GeoJson {
        serde_json::from_value(value).unwrap()
    }

    fn single(input: serde_json::Value, filter: Option<&PropertyFilter>) -> Object<Coord> {
        let mut objects = normalize([("foo".to_string(), geojson(input))], filter).unwrap();
        objects.pop().unwrap().1
    }

    #[test]
    fn test_feature_becomes_geometry_with_id() {
        let object = single(
            json!({"type": "Feature", "id": "Foo", "properties": {"name": "George"},
                   "geometry": {"type": "LineString", "coordinates": [[0.1, 0.2], [0.3, 0.4]]}}),
            None,
        );
        assert!(matches!(object.shape, Shape::LineString(ref line) if line.len() == 2));
        assert_eq!(
            object.id,
            Some(crate::types::ObjectId::String("Foo".to_string()))
        );
        assert!(object.properties.is_none());
    }

    #[test]
    fn test_filter_renames_and_drops() {
        let filter = PropertyFilter::from_fn(|key| {
            key.strip_prefix("UNREASONABLY_LONG_")
                .map(str::to_lowercase)
        });
        let object = single(
            json!({"type": "Feature", "properties": {"UNREASONABLY_LONG_NAME": "George", "other": 1},
                   "geometry": {"type": "Point", "coordinates": [0.0, 0.0]}}),
            Some(&filter),
        );
        let properties = object.properties.unwrap();
        assert_eq!(properties.len(), 1);
        assert_eq!(properties["name"], json!("George"));
    }

    #[test]
    fn test_filter_error_propagates() {
        let filter = PropertyFilter::new(|key| Err(format!("refused {key}").into()));
        let input = geojson(json!({"type": "Feature", "properties": {"name": "George"},
            "geometry": {"type": "Point", "coordinates": [0.0, 0.0]}}));

        let err = normalize([("foo".to_string(), input)], Some(&filter)).unwrap_err();
        assert!(matches!(err, TopologyError::Filter { ref key, .. } if key == "name"));
    }

    #[test]
    fn test_feature_collection_keeps_order_and_count() {
        let object = single(
            json!({"type": "FeatureCollection", "features": [
                {"type": "Feature", "properties": null,
                 "geometry": {"type": "MultiPolygon", "coordinates": []}},
                {"type": "Feature", "properties": null,
                 "geometry": {"type": "Point", "coordinates": [1.0, 2.0]}}
            ]}),
            None,
        );
        let Shape::GeometryCollection(members) = object.shape else {
            panic!("expected a collection");
        };
        assert_eq!(members.len(), 2);
        assert!(matches!(members[0].shape, Shape::MultiPolygon(ref p) if p.is_empty()));
        assert!(matches!(members[1].shape, Shape::Point(_)));
    }

    #[test]
    fn test_short_position_is_rejected() {
        let input = GeoJson::Geometry(geojson::Geometry::new(Value::LineString(vec![
            vec![0.0, 0.0],
            vec![1.0],
        ])));
        let err = normalize([("foo".to_string(), input)], None).unwrap_err();
        assert!(matches!(err, TopologyError::Input { .. }));
    }

    #[test]
    fn test_non_finite_coordinate_is_rejected() {
        let input = GeoJson::Geometry(geojson::Geometry::new(Value::Point(vec![f64::NAN, 0.0])));
        let err = normalize([("foo".to_string(), input)], None).unwrap_err();
        assert!(matches!(err, TopologyError::Input { .. }));
    }

    #[test]
    fn test_duplicate_names_are_rejected() {
        let point = || GeoJson::Geometry(geojson::Geometry::new(Value::Point(vec![0.0, 0.0])));
        let err = normalize(
            [("foo".to_string(), point()), ("foo".to_string(), point())],
            None,
        )
        .unwrap_err();
        assert!(matches!(err, TopologyError::Input { .. }));
    }
}
