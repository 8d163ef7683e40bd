//! Types de données produits par le crate topojoin

use geo::Coord;
use geojson::JsonObject;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

/// Une position d'arc ou de point en sortie.
///
/// `Grid` quand la quantification est active (entiers, delta dans les arcs),
/// `Raw` en mode passthrough (coordonnées absolues d'origine).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Position {
    Grid([i64; 2]),
    Raw([f64; 2]),
}

/// Référence signée vers un arc partagé
///
/// Sérialisée en entier: `i` pour un parcours direct, `!i` (soit `-i - 1`)
/// pour un parcours inverse, de sorte que l'arc 0 inversé vaut `-1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ArcRef {
    pub index: usize,
    pub reversed: bool,
}

impl ArcRef {
    pub fn forward(index: usize) -> Self {
        Self {
            index,
            reversed: false,
        }
    }

    pub fn reverse(index: usize) -> Self {
        Self {
            index,
            reversed: true,
        }
    }

    /// Même arc, sens opposé
    pub fn complement(self) -> Self {
        Self {
            index: self.index,
            reversed: !self.reversed,
        }
    }

    pub fn to_signed(self) -> i64 {
        let index = self.index as i64;
        if self.reversed {
            !index
        } else {
            index
        }
    }

    pub fn from_signed(value: i64) -> Self {
        if value < 0 {
            Self::reverse(!value as usize)
        } else {
            Self::forward(value as usize)
        }
    }
}

impl Serialize for ArcRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.to_signed())
    }
}

/// Identifiant d'une Feature, recopié sur la géométrie
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ObjectId {
    String(String),
    Number(serde_json::Number),
}

impl From<geojson::feature::Id> for ObjectId {
    fn from(id: geojson::feature::Id) -> Self {
        match id {
            geojson::feature::Id::String(s) => Self::String(s),
            geojson::feature::Id::Number(n) => Self::Number(n),
        }
    }
}

/// Contenu d'une géométrie réécrite
#[derive(Debug, Clone, PartialEq)]
pub enum GeometryKind {
    Point(Position),
    MultiPoint(Vec<Position>),
    LineString(Vec<ArcRef>),
    MultiLineString(Vec<Vec<ArcRef>>),
    Polygon(Vec<Vec<ArcRef>>),
    MultiPolygon(Vec<Vec<Vec<ArcRef>>>),
    GeometryCollection(Vec<Geometry>),
}

/// Une géométrie de la topologie, avec son id et ses propriétés filtrées
#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    pub kind: GeometryKind,
    pub id: Option<ObjectId>,
    pub properties: Option<JsonObject>,
}

impl Geometry {
    pub fn new(kind: GeometryKind) -> Self {
        Self {
            kind,
            id: None,
            properties: None,
        }
    }

    /// Nom du type GeoJSON/TopoJSON
    pub fn type_name(&self) -> &'static str {
        match self.kind {
            GeometryKind::Point(_) => "Point",
            GeometryKind::MultiPoint(_) => "MultiPoint",
            GeometryKind::LineString(_) => "LineString",
            GeometryKind::MultiLineString(_) => "MultiLineString",
            GeometryKind::Polygon(_) => "Polygon",
            GeometryKind::MultiPolygon(_) => "MultiPolygon",
            GeometryKind::GeometryCollection(_) => "GeometryCollection",
        }
    }

    /// Vrai si la géométrie ne porte ni arc, ni point, ni membre
    pub fn is_empty(&self) -> bool {
        match &self.kind {
            GeometryKind::Point(_) => false,
            GeometryKind::MultiPoint(points) => points.is_empty(),
            GeometryKind::LineString(arcs) => arcs.is_empty(),
            GeometryKind::MultiLineString(lines) => lines.is_empty(),
            GeometryKind::Polygon(rings) => rings.is_empty(),
            GeometryKind::MultiPolygon(polygons) => polygons.is_empty(),
            GeometryKind::GeometryCollection(geometries) => geometries.is_empty(),
        }
    }

    /// Itère sur toutes les références d'arc, collections comprises
    pub fn arc_refs(&self) -> Box<dyn Iterator<Item = ArcRef> + '_> {
        match &self.kind {
            GeometryKind::Point(_) | GeometryKind::MultiPoint(_) => Box::new(std::iter::empty()),
            GeometryKind::LineString(arcs) => Box::new(arcs.iter().copied()),
            GeometryKind::MultiLineString(lines) | GeometryKind::Polygon(lines) => {
                Box::new(lines.iter().flatten().copied())
            }
            GeometryKind::MultiPolygon(polygons) => {
                Box::new(polygons.iter().flatten().flatten().copied())
            }
            GeometryKind::GeometryCollection(geometries) => {
                Box::new(geometries.iter().flat_map(Geometry::arc_refs))
            }
        }
    }
}

impl Serialize for Geometry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("type", self.type_name())?;
        match &self.kind {
            GeometryKind::Point(position) => map.serialize_entry("coordinates", position)?,
            GeometryKind::MultiPoint(positions) => map.serialize_entry("coordinates", positions)?,
            GeometryKind::LineString(arcs) => map.serialize_entry("arcs", arcs)?,
            GeometryKind::MultiLineString(arcs) | GeometryKind::Polygon(arcs) => {
                map.serialize_entry("arcs", arcs)?
            }
            GeometryKind::MultiPolygon(arcs) => map.serialize_entry("arcs", arcs)?,
            GeometryKind::GeometryCollection(geometries) => {
                map.serialize_entry("geometries", geometries)?
            }
        }
        if let Some(id) = &self.id {
            map.serialize_entry("id", id)?;
        }
        if let Some(properties) = &self.properties {
            map.serialize_entry("properties", properties)?;
        }
        map.end()
    }
}

/// Transformation grille → coordonnées d'origine: `raw = translate + scale * q`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Transform {
    pub scale: [f64; 2],
    pub translate: [f64; 2],
}

impl Transform {
    /// Ramène une position de grille (absolue) en coordonnées d'origine
    pub fn apply(&self, position: [i64; 2]) -> Coord {
        Coord {
            x: self.translate[0] + self.scale[0] * position[0] as f64,
            y: self.translate[1] + self.scale[1] * position[1] as f64,
        }
    }
}

/// Résultat de [`crate::topology`]
#[derive(Debug, Clone, PartialEq)]
pub struct Topology {
    /// Présente uniquement si la quantification est active
    pub transform: Option<Transform>,

    /// Arcs partagés, dans l'ordre de leur index
    pub arcs: Vec<Vec<Position>>,

    /// Objets nommés, dans l'ordre d'entrée
    pub objects: Vec<(String, Geometry)>,
}

impl Topology {
    pub fn object(&self, name: &str) -> Option<&Geometry> {
        self.objects
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, geometry)| geometry)
    }

    /// Coordonnées absolues d'un arc (delta et transformation annulés)
    pub fn arc_coordinates(&self, index: usize) -> Option<Vec<Coord>> {
        let arc = self.arcs.get(index)?;
        let mut cursor = [0i64; 2];
        let coords = arc
            .iter()
            .map(|position| match (position, &self.transform) {
                (Position::Grid(delta), transform) => {
                    cursor[0] += delta[0];
                    cursor[1] += delta[1];
                    match transform {
                        Some(t) => t.apply(cursor),
                        None => Coord {
                            x: cursor[0] as f64,
                            y: cursor[1] as f64,
                        },
                    }
                }
                (Position::Raw([x, y]), _) => Coord { x: *x, y: *y },
            })
            .collect();
        Some(coords)
    }

    /// Nombre total de positions stockées dans les arcs
    pub fn arc_position_count(&self) -> usize {
        self.arcs.iter().map(Vec::len).sum()
    }
}

impl Serialize for Topology {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("type", "Topology")?;
        if let Some(transform) = &self.transform {
            map.serialize_entry("transform", transform)?;
        }
        map.serialize_entry("arcs", &self.arcs)?;
        map.serialize_entry("objects", &Objects(&self.objects))?;
        map.end()
    }
}

struct Objects<'a>(&'a [(String, Geometry)]);

impl Serialize for Objects<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(name, geometry)| (name, geometry)))
    }
}
