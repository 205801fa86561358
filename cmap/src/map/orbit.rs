use smallvec::SmallVec;
use std::fmt::{self, Display, Formatter};
use std::slice;

use crate::map::dart::Dart;
use crate::map::trace::{Trace, TraceBits, TraceFirst};
use crate::map::{CombinatorialMap, MapError};

/// Darts of a single orbit in traversal order.
pub type Orbit = SmallVec<[Dart; 4]>;

/// Relation that generates an orbit.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum OrbitKind {
    /// Orbits of $\phi_1 \circ \phi_2$, opened at boundary darts.
    Vertex,
    /// Orbits of $\phi_2$.
    Edge,
    /// Orbits of $\phi_1$.
    Face,
}

impl Display for OrbitKind {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        let name = match self {
            OrbitKind::Vertex => "vertex",
            OrbitKind::Edge => "edge",
            OrbitKind::Face => "face",
        };
        formatter.write_str(name)
    }
}

/// Partition of the darts of a map into the orbits of a relation.
///
/// Every dart of the map belongs to exactly one orbit of the partition. Orbits
/// are ordered by their first dart in index order and the darts of an orbit
/// are ordered by traversal, so a partition is deterministic for a given
/// construction sequence.
#[derive(Clone, Debug)]
pub struct Partition {
    kind: OrbitKind,
    orbits: Vec<Orbit>,
    lookup: Vec<usize>,
}

impl Partition {
    pub fn kind(&self) -> OrbitKind {
        self.kind
    }

    /// Gets the number of orbits in the partition.
    pub fn len(&self) -> usize {
        self.orbits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orbits.is_empty()
    }

    pub fn orbits(&self) -> &[Orbit] {
        &self.orbits
    }

    pub fn iter(&self) -> slice::Iter<'_, Orbit> {
        self.orbits.iter()
    }

    /// Gets the index of the orbit containing the given dart.
    ///
    /// Returns `None` if the dart was not part of the map when the partition
    /// was computed.
    pub fn orbit_index(&self, dart: Dart) -> Option<usize> {
        self.lookup.get(dart.index()).cloned()
    }

    /// Gets the orbit containing the given dart.
    pub fn orbit_of(&self, dart: Dart) -> Option<&Orbit> {
        self.orbit_index(dart).map(|index| &self.orbits[index])
    }

    pub fn into_orbits(self) -> Vec<Orbit> {
        self.orbits
    }
}

impl<'a> IntoIterator for &'a Partition {
    type Item = &'a Orbit;
    type IntoIter = slice::Iter<'a, Orbit>;

    fn into_iter(self) -> Self::IntoIter {
        self.orbits.iter()
    }
}

/// Partitions all darts of a map into orbits of the given relation.
///
/// Darts are visited in index order and a single bitset is shared by all
/// orbits, so the partition visits each dart once.
pub(in crate::map) fn partition(
    map: &CombinatorialMap,
    kind: OrbitKind,
) -> Result<Partition, MapError> {
    let mut trace = TraceBits::with_capacity(map.len());
    let mut orbits = Vec::new();
    let mut lookup = vec![0; map.len()];
    for dart in map.darts() {
        if trace.contains(dart) {
            continue;
        }
        let orbit = traverse(map, kind, dart, &mut trace)?;
        for dart in orbit.iter() {
            lookup[dart.index()] = orbits.len();
        }
        orbits.push(orbit);
    }
    debug_assert_eq!(map.len(), trace.len());
    Ok(Partition {
        kind,
        orbits,
        lookup,
    })
}

/// Collects the orbit of the given relation that contains `dart`.
///
/// Darts are inserted into `trace` as they are visited. Closed orbits begin at
/// `dart`. Open vertex orbits (fans around a boundary vertex) begin at the
/// first dart of the fan.
///
/// # Errors
///
/// Returns `InconsistentPermutation` if the traversal reaches a dart that has
/// already been traced without closing at its first dart. Because every step
/// inserts a new dart, this bounds the traversal by the number of darts.
pub(in crate::map) fn traverse<T>(
    map: &CombinatorialMap,
    kind: OrbitKind,
    dart: Dart,
    trace: &mut T,
) -> Result<Orbit, MapError>
where
    T: Trace<Dart>,
{
    let first = match kind {
        OrbitKind::Vertex => fan(map, dart)?,
        OrbitKind::Edge | OrbitKind::Face => dart,
    };
    let mut orbit = Orbit::new();
    let mut current = first;
    loop {
        if !trace.insert(current) {
            return if current == first && !orbit.is_empty() {
                Ok(orbit)
            }
            else {
                Err(MapError::InconsistentPermutation {
                    dart: current,
                    kind,
                })
            };
        }
        orbit.push(current);
        match step(map, kind, current) {
            Some(next) => {
                current = next;
            }
            // The fan ends at a boundary dart.
            None => return Ok(orbit),
        }
    }
}

fn step(map: &CombinatorialMap, kind: OrbitKind, dart: Dart) -> Option<Dart> {
    match kind {
        OrbitKind::Vertex => {
            if map.is_boundary(dart) {
                None
            }
            else {
                Some(map.phi1(map.phi2(dart)))
            }
        }
        OrbitKind::Edge => Some(map.phi2(dart)),
        OrbitKind::Face => Some(map.phi1(dart)),
    }
}

/// Finds the first dart of the vertex orbit containing `dart`.
///
/// Walks backwards around the vertex with $\phi_2 \circ \phi_1^{-1}$. If the
/// walk returns to `dart`, then the vertex is closed and `dart` is returned.
/// Otherwise, the walk stops at the dart whose predecessor is a boundary dart.
fn fan(map: &CombinatorialMap, dart: Dart) -> Result<Dart, MapError> {
    let mut trace = TraceFirst::default();
    trace.insert(dart);
    let mut first = dart;
    for _ in 0..map.len() {
        let previous = map.phi_1(first);
        if map.is_boundary(previous) {
            return Ok(first);
        }
        let next = map.phi2(previous);
        if !trace.insert(next) {
            return Ok(dart);
        }
        first = next;
    }
    Err(MapError::InconsistentPermutation {
        dart,
        kind: OrbitKind::Vertex,
    })
}

#[cfg(test)]
mod tests {
    use crate::map::orbit::{self, OrbitKind};
    use crate::map::trace::TraceAny;
    use crate::map::CombinatorialMap;

    #[test]
    fn open_triangle_has_singleton_vertices() {
        let mut map = CombinatorialMap::new();
        let first = map.new_face(3).unwrap();

        let partition = orbit::partition(&map, OrbitKind::Vertex).unwrap();
        assert_eq!(3, partition.len());
        for orbit in &partition {
            assert_eq!(1, orbit.len());
        }
        assert_eq!(Some(0), partition.orbit_index(first));
    }

    #[test]
    fn fan_begins_at_first_dart() {
        // Two triangles sharing one edge form an open quadrilateral. The shared
        // vertices have fans of two darts.
        let mut map = CombinatorialMap::new();
        let a = map.new_face(3).unwrap();
        let b = map.new_face(3).unwrap();
        map.sew_phi2(a, b).unwrap();

        // `b` arrives at the source of `a`, so the fan around that vertex
        // continues from `a` to `phi1(b)` and ends there.
        let orbit = orbit::traverse(&map, OrbitKind::Vertex, a, &mut TraceAny::default()).unwrap();
        assert_eq!(&[a, map.phi1(b)], orbit.as_slice());

        // Traversal from the last dart of the fan yields the same order.
        let orbit = orbit::traverse(
            &map,
            OrbitKind::Vertex,
            map.phi1(b),
            &mut TraceAny::default(),
        )
        .unwrap();
        assert_eq!(&[a, map.phi1(b)], orbit.as_slice());

        let partition = orbit::partition(&map, OrbitKind::Vertex).unwrap();
        assert_eq!(4, partition.len());
    }

    #[test]
    fn closed_orbit_begins_at_dart() {
        let mut map = CombinatorialMap::new();
        let a = map.new_face(2).unwrap();
        let b = map.phi1(a);
        map.sew_phi2(a, b).unwrap();

        let orbit = orbit::traverse(&map, OrbitKind::Edge, a, &mut TraceAny::default()).unwrap();
        assert_eq!(&[a, b], orbit.as_slice());
    }

    #[test]
    fn orbit_kind_display() {
        assert_eq!("vertex", OrbitKind::Vertex.to_string());
        assert_eq!("edge", OrbitKind::Edge.to_string());
        assert_eq!("face", OrbitKind::Face.to_string());
    }
}
