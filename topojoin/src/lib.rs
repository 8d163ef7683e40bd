//! # topojoin
//!
//! Construction de topologies TopoJSON à partir de géométries GeoJSON.
//!
//! ## Features
//!
//! - Frontières communes stockées une seule fois (arcs partagés, référencés
//!   en sens direct `i` ou inverse `~i`)
//! - Quantification sur une grille entière et encodage delta des arcs
//! - Mode passthrough sans perte (`quantization = 0`)
//! - Filtre/renommage des propriétés des Feature
//! - Types `geo` et `geojson` pour l'interopérabilité avec l'écosystème Rust géospatial
//!
//! ## Usage
//!
//! ```rust,ignore
//! use topojoin::{topology, Options, PropertyFilter};
//!
//! let options = Options::new()
//!     .quantization(10_000)
//!     .property_filter(PropertyFilter::keep(["name"]));
//!
//! let topology = topology([("communes".to_string(), geojson)], &options)?;
//! println!("{} arcs", topology.arcs.len());
//! println!("{}", serde_json::to_string(&topology)?);
//! ```

pub mod error;
pub mod options;
pub mod types;

mod arcs;
mod normalize;
mod point;
mod quantize;
mod rewrite;
mod shape;

pub use error::{FilterError, TopologyError};
pub use options::{Options, PropertyFilter};
pub use types::{ArcRef, Geometry, GeometryKind, ObjectId, Position, Topology, Transform};

use geo::Coord;
use geojson::GeoJson;
use tracing::debug;

use arcs::{clean_object, ArcBuilder};
use point::{RawPoint, Vertex};
use quantize::Quantizer;
use shape::Object;

/// Construit une topologie à partir d'objets GeoJSON nommés.
///
/// # Arguments
///
/// * `objects` - Couples (nom, GeoJSON), dans l'ordre de sortie souhaité
/// * `options` - Quantification et filtre de propriétés
///
/// # Returns
///
/// Une `Topology` contenant la transformation (si quantification), les arcs
/// partagés encodés et les objets réécrits en références d'arcs. Le résultat
/// ne dépend que de l'ordre des entrées et des options.
///
/// # Errors
///
/// `TopologyError::Config` si les options sont invalides, `Input` pour une
/// géométrie mal formée ou un nom dupliqué, `Filter` si le filtre échoue.
pub fn topology<I>(objects: I, options: &Options) -> Result<Topology, TopologyError>
where
    I: IntoIterator<Item = (String, GeoJson)>,
{
    // 1. Options et normalisation (Feature -> géométrie, propriétés filtrées)
    options.validate()?;
    let objects = normalize::normalize(objects, options.property_filter.as_ref())?;

    // 2. Passthrough: coordonnées brutes, ni transformation ni delta
    if options.quantization == 0 {
        let objects = objects
            .into_iter()
            .map(|(name, object)| (name, object.map_coords(&mut RawPoint::new)))
            .collect();
        return Ok(build(objects, None));
    }

    // 3. Quantification sur l'emprise de toutes les coordonnées
    let quantizer = Quantizer::new(
        quantize::bounds(objects.iter().map(|(_, object)| object)),
        options.quantization,
    );
    debug!(
        quantization = options.quantization,
        transform = ?quantizer.transform(),
        "Quantization transform computed"
    );

    let objects = objects
        .into_iter()
        .map(|(name, object)| {
            let quantized = object.map_coords(&mut |c: Coord| quantizer.quantize(c));
            (name, quantized)
        })
        .collect();
    Ok(build(objects, Some(quantizer.transform())))
}

/// Variante de [`topology`] prenant un objet JSON `{nom: GeoJSON, ...}`.
///
/// L'ordre des clés est conservé (`serde_json` avec `preserve_order`).
pub fn topology_from_json(
    value: serde_json::Value,
    options: &Options,
) -> Result<Topology, TopologyError> {
    let serde_json::Value::Object(map) = value else {
        return Err(TopologyError::input(
            "<root>",
            "expected a JSON object mapping names to GeoJSON objects",
        ));
    };

    let objects = map
        .into_iter()
        .map(|(name, value)| match serde_json::from_value::<GeoJson>(value) {
            Ok(geojson) => Ok((name, geojson)),
            Err(e) => Err(TopologyError::input(name, e.to_string())),
        })
        .collect::<Result<Vec<_>, _>>()?;

    topology(objects, options)
}

/// Nettoyage, extraction des arcs et réécriture, pour un type de sommet donné
fn build<P: Vertex>(objects: Vec<(String, Object<P>)>, transform: Option<Transform>) -> Topology {
    let objects: Vec<(String, Object<P>)> = objects
        .into_iter()
        .map(|(name, object)| (name, clean_object(object)))
        .collect();

    // Toutes les jonctions doivent être connues avant le premier découpage
    let mut builder = ArcBuilder::new();
    for (_, object) in &objects {
        builder.observe(object);
    }
    debug!(junctions = builder.junction_count(), "Junctions detected");

    let objects: Vec<(String, Geometry)> = objects
        .iter()
        .map(|(name, object)| (name.clone(), rewrite::rewrite(object, &mut builder)))
        .collect();
    debug!(arcs = builder.arc_count(), "Arcs extracted");

    let arcs = builder
        .finish()
        .iter()
        .map(|arc| P::encode_arc(arc))
        .collect();

    Topology {
        transform,
        arcs,
        objects,
    }
}
