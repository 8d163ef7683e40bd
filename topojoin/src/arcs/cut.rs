//! Découpage des lignes et anneaux en arcs élémentaires

use crate::point::Vertex;

use super::junction::Junctions;

/// Résultat du découpage d'un anneau
#[derive(Debug, PartialEq)]
pub(crate) enum RingCut<P> {
    /// Aucune jonction: l'anneau est un arc unique qui se referme sur lui-même
    Closed(Vec<P>),
    /// Arcs bornés par des jonctions, dans l'ordre de parcours
    Arcs(Vec<Vec<P>>),
}

/// Coupe une ligne à chaque jonction intérieure
pub(crate) fn cut_line<'a, P: Vertex>(line: &'a [P], junctions: &Junctions<P>) -> Vec<&'a [P]> {
    let mut arcs = Vec::new();
    let mut start = 0;
    for i in 1..line.len().saturating_sub(1) {
        if junctions.contains(&line[i]) {
            arcs.push(&line[start..=i]);
            start = i;
        }
    }
    if line.len() - start >= 2 {
        arcs.push(&line[start..]);
    }
    arcs
}

/// Coupe un anneau fermé.
///
/// Le parcours commence toujours sur une jonction: si le point de départ
/// nominal en est une, on part de la dernière jonction de l'anneau (l'arc qui
/// revient au départ nominal vient donc en premier), sinon de la première
/// jonction qui suit le départ nominal.
pub(crate) fn cut_ring<P: Vertex>(ring: &[P], junctions: &Junctions<P>) -> RingCut<P> {
    let vertices = &ring[..ring.len().saturating_sub(1)];
    let n = vertices.len();

    let cuts: Vec<usize> = (0..n)
        .filter(|&i| junctions.contains(&vertices[i]))
        .collect();

    let start = match (cuts.first(), cuts.last()) {
        (None, _) | (_, None) => return RingCut::Closed(ring.to_vec()),
        (Some(&0), Some(&last)) => last,
        (Some(&first), _) => first,
    };

    let rotated: Vec<P> = (0..=n).map(|k| vertices[(start + k) % n]).collect();
    RingCut::Arcs(
        cut_line(&rotated, junctions)
            .into_iter()
            .map(<[P]>::to_vec)
            .collect(),
    )
}
