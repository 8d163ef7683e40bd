//! Quantification des coordonnées sur une grille entière

use geo::{Coord, Rect};

use crate::point::GridPoint;
use crate::shape::Object;
use crate::types::Transform;

/// Emprise de toutes les coordonnées, `None` si aucune
pub(crate) fn bounds<'a, I>(objects: I) -> Option<Rect>
where
    I: IntoIterator<Item = &'a Object<Coord>>,
{
    let mut extent: Option<(Coord, Coord)> = None;
    for object in objects {
        object.for_each_coord(&mut |c: &Coord| {
            extent = Some(match extent {
                None => (*c, *c),
                Some((min, max)) => (
                    Coord {
                        x: min.x.min(c.x),
                        y: min.y.min(c.y),
                    },
                    Coord {
                        x: max.x.max(c.x),
                        y: max.y.max(c.y),
                    },
                ),
            });
        });
    }
    extent.map(|(min, max)| Rect::new(min, max))
}

/// Projection des coordonnées sur une grille de `n` cellules par axe
#[derive(Debug, Clone, Copy)]
pub(crate) struct Quantizer {
    transform: Transform,
}

impl Quantizer {
    /// `n` doit être >= 2 (vérifié par `Options::validate`)
    pub fn new(bounds: Option<Rect>, n: u32) -> Self {
        let cells = f64::from(n.saturating_sub(1).max(1));
        let transform = match bounds {
            Some(rect) => {
                let (min, max) = (rect.min(), rect.max());
                Transform {
                    scale: [(max.x - min.x) / cells, (max.y - min.y) / cells],
                    translate: [min.x, min.y],
                }
            }
            None => Transform {
                scale: [0.0, 0.0],
                translate: [0.0, 0.0],
            },
        };
        Self { transform }
    }

    pub fn transform(&self) -> Transform {
        self.transform
    }

    pub fn quantize(&self, c: Coord) -> GridPoint {
        [
            quantize_axis(c.x, self.transform.translate[0], self.transform.scale[0]),
            quantize_axis(c.y, self.transform.translate[1], self.transform.scale[1]),
        ]
    }
}

fn quantize_axis(value: f64, translate: f64, scale: f64) -> i64 {
    if scale == 0.0 {
        0
    } else {
        ((value - translate) / scale).round() as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::Shape;

    fn line(coords: &[(f64, f64)]) -> Object<Coord> {
        Object::new(Shape::LineString(
            coords.iter().map(|&(x, y)| Coord { x, y }).collect(),
        ))
    }

    #[test]
    fn test_transform_spans_input() {
        let objects = [line(&[(0.125, 0.0625), (0.5, 0.25)])];
        let quantizer = Quantizer::new(bounds(&objects), 2);

        let transform = quantizer.transform();
        assert_eq!(transform.scale, [0.375, 0.1875]);
        assert_eq!(transform.translate, [0.125, 0.0625]);
        assert_eq!(transform.apply([0, 0]), Coord { x: 0.125, y: 0.0625 });
        assert_eq!(transform.apply([1, 1]), Coord { x: 0.5, y: 0.25 });
    }

    #[test]
    fn test_flat_axis_quantizes_to_zero() {
        let objects = [line(&[(0.0, 3.0), (2.0, 3.0)])];
        let quantizer = Quantizer::new(bounds(&objects), 3);

        assert_eq!(quantizer.transform().scale, [1.0, 0.0]);
        assert_eq!(quantizer.quantize(Coord { x: 2.0, y: 3.0 }), [2, 0]);
    }

    #[test]
    fn test_no_coordinates() {
        let objects = [Object::new(Shape::<Coord>::MultiPolygon(Vec::new()))];
        assert!(bounds(&objects).is_none());
        let quantizer = Quantizer::new(None, 2);
        assert_eq!(quantizer.transform().translate, [0.0, 0.0]);
    }
}
