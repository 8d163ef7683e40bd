//! Arbre de géométries interne, générique sur le type de coordonnée

use geojson::JsonObject;

use crate::types::ObjectId;

/// Géométrie normalisée (Feature et FeatureCollection déjà dépliées)
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Shape<C> {
    Point(C),
    MultiPoint(Vec<C>),
    LineString(Vec<C>),
    MultiLineString(Vec<Vec<C>>),
    Polygon(Vec<Vec<C>>),
    MultiPolygon(Vec<Vec<Vec<C>>>),
    GeometryCollection(Vec<Object<C>>),
}

/// Géométrie accompagnée de l'id et des propriétés de sa Feature d'origine
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Object<C> {
    pub shape: Shape<C>,
    pub id: Option<ObjectId>,
    pub properties: Option<JsonObject>,
}

impl<C> Object<C> {
    pub fn new(shape: Shape<C>) -> Self {
        Self {
            shape,
            id: None,
            properties: None,
        }
    }

    /// `false` si la structure de coordonnées ne contient aucune position
    pub fn has_coords(&self) -> bool {
        match &self.shape {
            Shape::Point(_) => true,
            Shape::MultiPoint(cs) | Shape::LineString(cs) => !cs.is_empty(),
            Shape::MultiLineString(lines) | Shape::Polygon(lines) => {
                lines.iter().any(|line| !line.is_empty())
            }
            Shape::MultiPolygon(polygons) => polygons.iter().flatten().any(|ring| !ring.is_empty()),
            Shape::GeometryCollection(members) => members.iter().any(Object::has_coords),
        }
    }

    /// Parcourt toutes les coordonnées, collections comprises
    pub fn for_each_coord<F: FnMut(&C)>(&self, f: &mut F) {
        match &self.shape {
            Shape::Point(c) => f(c),
            Shape::MultiPoint(cs) | Shape::LineString(cs) => cs.iter().for_each(f),
            Shape::MultiLineString(lines) | Shape::Polygon(lines) => {
                lines.iter().flatten().for_each(f)
            }
            Shape::MultiPolygon(polygons) => polygons.iter().flatten().flatten().for_each(f),
            Shape::GeometryCollection(members) => {
                for member in members {
                    member.for_each_coord(f);
                }
            }
        }
    }

    /// Convertit chaque coordonnée en conservant la structure
    pub fn map_coords<D, F: FnMut(C) -> D>(self, f: &mut F) -> Object<D> {
        let shape = match self.shape {
            Shape::Point(c) => Shape::Point(f(c)),
            Shape::MultiPoint(cs) => Shape::MultiPoint(map_line(cs, f)),
            Shape::LineString(cs) => Shape::LineString(map_line(cs, f)),
            Shape::MultiLineString(lines) => Shape::MultiLineString(map_lines(lines, f)),
            Shape::Polygon(rings) => Shape::Polygon(map_lines(rings, f)),
            Shape::MultiPolygon(polygons) => Shape::MultiPolygon(
                polygons
                    .into_iter()
                    .map(|rings| map_lines(rings, f))
                    .collect(),
            ),
            Shape::GeometryCollection(members) => Shape::GeometryCollection(
                members
                    .into_iter()
                    .map(|member| member.map_coords(f))
                    .collect(),
            ),
        };
        Object {
            shape,
            id: self.id,
            properties: self.properties,
        }
    }
}

fn map_line<C, D, F: FnMut(C) -> D>(line: Vec<C>, f: &mut F) -> Vec<D> {
    line.into_iter().map(|c| f(c)).collect()
}

fn map_lines<C, D, F: FnMut(C) -> D>(lines: Vec<Vec<C>>, f: &mut F) -> Vec<Vec<D>> {
    lines.into_iter().map(|line| map_line(line, f)).collect()
}
