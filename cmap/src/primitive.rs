//! Reference shapes.
//!
//! Primitives are built through the public API of [`CombinatorialMap`] and
//! [`MapBuilder`] and are embedded with [`Vertex`] positions. Closed primitives
//! (pyramids, prisms, and the cube) have no boundary darts and an Euler
//! characteristic of two. Faces are oriented so that their normals point
//! outwards.
//!
//! # Examples
//!
//! ```rust
//! use cmap::primitive;
//!
//! let pyramid = primitive::pyramid(4).unwrap();
//!
//! assert!(pyramid.map.is_closed());
//! assert_eq!(5, pyramid.map.vertices().len());
//! assert_eq!(5, pyramid.map.faces().len());
//! assert_eq!(2, pyramid.map.euler());
//! ```
//!
//! [`CombinatorialMap`]: crate::map::CombinatorialMap
//! [`MapBuilder`]: crate::builder::MapBuilder
//! [`Vertex`]: crate::geometry::Vertex

use log::debug;
use nalgebra::{Point2, Point3};
use std::f32::consts::PI;

use crate::builder::MapBuilder;
use crate::embedding::Embedding;
use crate::geometry::Vertex;
use crate::map::{CombinatorialMap, Dart, MapError, ResultExt as _};
use crate::IteratorExt as _;

/// Open regular polygon.
#[derive(Clone, Debug)]
pub struct Polygon {
    pub map: CombinatorialMap,
    pub embedding: Embedding,
    pub face: Dart,
}

/// Closed pyramid over a regular polygon.
#[derive(Clone, Debug)]
pub struct Pyramid {
    pub map: CombinatorialMap,
    pub embedding: Embedding,
    /// First dart of the base face.
    pub base: Dart,
    /// A dart leaving the apex.
    pub apex: Dart,
}

/// Closed prism over a regular polygon.
#[derive(Clone, Debug)]
pub struct Prism {
    pub map: CombinatorialMap,
    pub embedding: Embedding,
    /// First dart of the bottom face.
    pub bottom: Dart,
    /// First dart of the top face.
    pub top: Dart,
}

/// Creates an open regular polygon in the $xy$-plane with unit circumradius.
///
/// # Errors
///
/// Returns [`MapError::InvalidArity`] if `sides` is less than three.
///
/// [`MapError::InvalidArity`]: crate::map::MapError::InvalidArity
pub fn polygon(sides: usize) -> Result<Polygon, MapError> {
    if sides < 3 {
        return Err(MapError::InvalidArity(sides));
    }
    let mut map = CombinatorialMap::new();
    let face = map.new_face(sides)?;
    let mut embedding = Embedding::new(&map);
    let mut dart = face;
    for position in ring(sides, 0.0) {
        embedding.set(dart, Vertex::from_position(Point3::new(position.x, position.y, 0.0)))?;
        dart = map.phi1(dart);
    }
    Ok(Polygon {
        map,
        embedding,
        face,
    })
}

/// Creates a closed pyramid over a regular polygon.
///
/// The base lies in the $xy$-plane with unit circumradius and the apex is at
/// $(0, 0, 1)$. Faces are allocated and sewn by hand: the base first, then one
/// triangle for each side of the base. Each triangle is sewn to its side of
/// the base and to its neighbors.
///
/// # Errors
///
/// Returns [`MapError::InvalidArity`] if `sides` is less than three.
///
/// [`MapError::InvalidArity`]: crate::map::MapError::InvalidArity
pub fn pyramid(sides: usize) -> Result<Pyramid, MapError> {
    if sides < 3 {
        return Err(MapError::InvalidArity(sides));
    }
    let mut map = CombinatorialMap::new();
    let (base, triangles) = map.mutate(|mutation| {
        let base = mutation.new_face(sides)?;
        let triangles = (0..sides)
            .map(|_| mutation.new_face(3))
            .collect::<Result<Vec<_>, _>>()?;
        // Triangle `i` runs against side `i` of the base, so its first dart
        // arrives where the side leaves.
        let mut dart = base;
        for triangle in triangles.iter().cloned() {
            mutation.sew_phi2(dart, triangle)?;
            dart = mutation.phi1(dart);
        }
        // The second dart of each triangle rises to the apex from the corner
        // where the third dart of the previous triangle descends.
        for (previous, next) in triangles.iter().cloned().perimeter() {
            let rising = mutation.phi1(next);
            let descending = mutation.phi1(mutation.phi1(previous));
            mutation.sew_phi2(rising, descending)?;
        }
        Ok::<_, MapError>((base, triangles))
    })?;
    let apex = map.phi1(map.phi1(triangles[0]));

    // The base winds clockwise when viewed from above.
    let mut embedding = Embedding::new(&map);
    let mut dart = base;
    for position in ring(sides, 0.0) {
        let position = Point3::new(position.x, -position.y, 0.0);
        embedding.set(dart, Vertex::from_position(position))?;
        dart = map.phi1(dart);
    }
    embedding.set(apex, Vertex::from_position(Point3::new(0.0, 0.0, 1.0)))?;
    debug!(
        "built pyramid with {} sides and {} darts",
        sides,
        map.len()
    );
    Ok(Pyramid {
        map,
        embedding,
        base,
        apex,
    })
}

/// Creates a closed tetrahedron as a pyramid over a triangle.
pub fn tetrahedron() -> Pyramid {
    pyramid(3).expect_consistent()
}

/// Creates a closed prism over a regular polygon.
///
/// The prism has unit circumradius and unit height and is centered at the
/// origin.
///
/// # Errors
///
/// Returns [`MapError::InvalidArity`] if `sides` is less than three.
///
/// [`MapError::InvalidArity`]: crate::map::MapError::InvalidArity
pub fn prism(sides: usize) -> Result<Prism, MapError> {
    if sides < 3 {
        return Err(MapError::InvalidArity(sides));
    }
    extrude(&ring(sides, PI / sides as f32).collect::<Vec<_>>())
}

/// Creates a closed unit cube centered at the origin.
pub fn cube() -> Prism {
    extrude(&[
        Point2::new(0.5, 0.5),
        Point2::new(-0.5, 0.5),
        Point2::new(-0.5, -0.5),
        Point2::new(0.5, -0.5),
    ])
    .expect_consistent()
}

// Positions of a regular polygon with unit circumradius, counterclockwise.
fn ring(sides: usize, offset: f32) -> impl Iterator<Item = Point2<f32>> {
    (0..sides).map(move |index| {
        let angle = offset + (2.0 * PI * index as f32 / sides as f32);
        Point2::new(angle.cos(), angle.sin())
    })
}

// Extrudes a counterclockwise ring into a prism with unit height.
fn extrude(ring: &[Point2<f32>]) -> Result<Prism, MapError> {
    let n = ring.len();
    let vertices = ring
        .iter()
        .map(|position| Point3::new(position.x, position.y, -0.5))
        .chain(
            ring.iter()
                .map(|position| Point3::new(position.x, position.y, 0.5)),
        )
        .map(Vertex::from_position)
        .collect::<Vec<_>>();
    let mut builder = MapBuilder::new();
    let bottom = builder.insert_face((0..n).rev().collect::<Vec<_>>())?;
    let top = builder.insert_face((n..(2 * n)).collect::<Vec<_>>())?;
    for index in 0..n {
        let next = (index + 1) % n;
        builder.insert_face(&[index, next, n + next, n + index])?;
    }
    let (map, embedding) = builder.build_with_vertices(&vertices)?;
    debug!("built prism with {} sides and {} darts", n, map.len());
    Ok(Prism {
        map,
        embedding,
        bottom,
        top,
    })
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use nalgebra::{Point3, Vector3};

    use crate::buffer::MeshBuffer;
    use crate::map::{MapError, OrbitKind};
    use crate::primitive;

    #[test]
    fn polygon_is_open() {
        let polygon = primitive::polygon(5).unwrap();

        assert!(!polygon.map.is_closed());
        assert_eq!(5, polygon.map.vertices().len());
        assert_eq!(1, polygon.map.euler());
        assert_eq!(5, polygon.embedding.len());
    }

    #[test]
    fn tetrahedron() {
        let tetrahedron = primitive::tetrahedron();

        assert!(tetrahedron.map.is_closed());
        assert_eq!(4, tetrahedron.map.vertices().len());
        assert_eq!(6, tetrahedron.map.edges().len());
        assert_eq!(4, tetrahedron.map.faces().len());
        assert_eq!(2, tetrahedron.map.euler());
    }

    #[test]
    fn square_pyramid_is_embedded() {
        let pyramid = primitive::pyramid(4).unwrap();

        assert_eq!(5, pyramid.map.vertices().len());
        assert_eq!(8, pyramid.map.edges().len());
        assert_eq!(5, pyramid.map.faces().len());
        assert_eq!(2, pyramid.map.euler());
        assert_eq!(5, pyramid.embedding.len());
        assert_eq!(
            Point3::new(0.0, 0.0, 1.0),
            pyramid.embedding.get(pyramid.apex).unwrap().position
        );
        // Every dart of the apex shares its position.
        for dart in pyramid.map.orbit(OrbitKind::Vertex, pyramid.apex).unwrap() {
            assert_eq!(
                Point3::new(0.0, 0.0, 1.0),
                pyramid.embedding.get(dart).unwrap().position
            );
        }
        // The base winds clockwise from $(1, 0, 0)$ when viewed from above.
        let corners = [
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, -1.0, 0.0),
            Point3::new(-1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        let mut dart = pyramid.base;
        for corner in corners {
            for shared in pyramid.map.orbit(OrbitKind::Vertex, dart).unwrap() {
                assert_abs_diff_eq!(
                    corner,
                    pyramid.embedding.get(shared).unwrap().position,
                    epsilon = 1e-6
                );
            }
            dart = pyramid.map.phi1(dart);
        }
        assert_eq!(pyramid.base, dart);
    }

    #[test]
    fn pyramid_faces_point_outwards() {
        let pyramid = primitive::pyramid(6).unwrap();
        let buffer = MeshBuffer::<u32>::from_map(&pyramid.map, &pyramid.embedding).unwrap();
        let positions = buffer.as_vertex_slice();
        for triangle in buffer.as_index_slice().chunks(3) {
            let [a, b, c] = [0, 1, 2].map(|i| positions[triangle[i] as usize].position);
            let normal: Vector3<f32> = (b - a).cross(&(c - a));
            let centroid = (a.coords + b.coords + c.coords) / 3.0;
            // The pyramid contains the point just above the center of its base.
            let inside = Vector3::new(0.0, 0.0, 0.25);
            assert!(normal.dot(&(centroid - inside)) > 0.0);
        }
    }

    #[test]
    fn degenerate_pyramid_is_error() {
        assert!(matches!(
            primitive::pyramid(2),
            Err(MapError::InvalidArity(2))
        ));
    }

    #[test]
    fn prism() {
        let prism = primitive::prism(6).unwrap();

        assert!(prism.map.is_closed());
        assert_eq!(12, prism.map.vertices().len());
        assert_eq!(18, prism.map.edges().len());
        assert_eq!(8, prism.map.faces().len());
        assert_eq!(2, prism.map.euler());
        assert_eq!(
            6,
            prism.map.orbit(OrbitKind::Face, prism.top).unwrap().len()
        );
    }

    #[test]
    fn cube() {
        let cube = primitive::cube();

        assert_eq!(8, cube.map.vertices().len());
        assert_eq!(12, cube.map.edges().len());
        assert_eq!(6, cube.map.faces().len());
        assert_eq!(2, cube.map.euler());
        for (orbit, vertex) in cube.embedding.iter() {
            assert_eq!(3, orbit.len());
            assert_abs_diff_eq!(0.5, vertex.position.x.abs());
            assert_abs_diff_eq!(0.5, vertex.position.z.abs());
        }
        assert_eq!(
            -0.5,
            cube.embedding.get(cube.bottom).unwrap().position.z
        );
    }
}
