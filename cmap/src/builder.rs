//! Construction of sewn maps from indexed polygons.
//!
//! [`MapBuilder`] inserts polygons given as perimeters of vertex indices. Each
//! polygon becomes a face and each side of a polygon becomes a dart that
//! represents the directed arc $(u, v)$ between consecutive indices. When a
//! polygon introduces the arc $(v, u)$ opposite an existing arc, the two darts
//! are sewn along $\phi_2$. Polygons must therefore be consistently oriented:
//! an arc that is introduced twice in the same direction is a conflict.
//!
//! # Examples
//!
//! Building a quadrilateral from two triangles that share the arcs $(0, 2)$
//! and $(2, 0)$:
//!
//! ```rust
//! use cmap::builder::MapBuilder;
//!
//! let mut builder = MapBuilder::new();
//! builder.insert_face(&[0, 1, 2]).unwrap();
//! builder.insert_face(&[0, 2, 3]).unwrap();
//! let map = builder.build();
//!
//! assert_eq!(4, map.vertices().len());
//! assert_eq!(5, map.edges().len());
//! assert_eq!(2, map.faces().len());
//! ```
//!
//! [`MapBuilder`]: crate::builder::MapBuilder

use ahash::AHashMap;
use itertools::Itertools;
use log::{debug, trace};
use num::ToPrimitive;
use smallvec::SmallVec;

use crate::embedding::Embedding;
use crate::map::{CombinatorialMap, Dart, MapError};
use crate::IteratorExt as _;

/// Builds a sewn [`CombinatorialMap`] from polygons.
///
/// See the [`builder`] module documentation.
///
/// [`builder`]: crate::builder
/// [`CombinatorialMap`]: crate::map::CombinatorialMap
#[derive(Debug, Default)]
pub struct MapBuilder {
    map: CombinatorialMap,
    arcs: AHashMap<(usize, usize), Dart>,
    // Source vertex index of each dart, in dart order.
    corners: Vec<usize>,
}

impl MapBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a polygon with the given perimeter of vertex indices and
    /// returns the dart of its first arc.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::InvalidArity`] if the perimeter has fewer than three
    /// indices. Returns [`MapError::TopologyConflict`] if the perimeter repeats
    /// an arc, refers to the same index on both ends of an arc, or introduces
    /// an arc that has already been inserted. Nothing is inserted if an error
    /// is returned.
    ///
    /// [`MapError::InvalidArity`]: crate::map::MapError::InvalidArity
    /// [`MapError::TopologyConflict`]: crate::map::MapError::TopologyConflict
    pub fn insert_face<P>(&mut self, perimeter: P) -> Result<Dart, MapError>
    where
        P: AsRef<[usize]>,
    {
        let perimeter = perimeter.as_ref();
        let arity = perimeter.len();
        if arity < 3 {
            return Err(MapError::InvalidArity(arity));
        }
        let arcs = perimeter
            .iter()
            .cloned()
            .perimeter()
            .collect::<SmallVec<[_; 4]>>();
        if arcs.iter().unique().count() != arity
            || arcs
                .iter()
                .any(|arc| arc.0 == arc.1 || self.arcs.contains_key(arc))
        {
            return Err(MapError::TopologyConflict);
        }
        let first = self.map.new_face(arity)?;
        let mut dart = first;
        for (source, destination) in arcs {
            self.arcs.insert((source, destination), dart);
            self.corners.push(source);
            if let Some(opposite) = self.arcs.get(&(destination, source)).cloned() {
                self.map.sew_phi2(dart, opposite)?;
            }
            dart = self.map.phi1(dart);
        }
        trace!("inserted polygon {:?} at {}", perimeter, first);
        Ok(first)
    }

    /// Gets the map built so far.
    pub fn map(&self) -> &CombinatorialMap {
        &self.map
    }

    pub fn build(self) -> CombinatorialMap {
        debug!(
            "built map with {} darts from {} arcs",
            self.map.len(),
            self.arcs.len()
        );
        self.map
    }

    /// Builds the map together with an embedding of the given vertex data.
    ///
    /// The record of each vertex orbit is the data of the vertex index at the
    /// source of its darts.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::IndexOutOfBounds`] if an inserted perimeter refers
    /// to an index that is not in `vertices`.
    ///
    /// [`MapError::IndexOutOfBounds`]: crate::map::MapError::IndexOutOfBounds
    pub fn build_with_vertices<T>(
        self,
        vertices: &[T],
    ) -> Result<(CombinatorialMap, Embedding<T>), MapError>
    where
        T: Clone + Default,
    {
        let MapBuilder { map, corners, .. } = self;
        let mut embedding = Embedding::new(&map);
        for (dart, corner) in map.darts().zip(corners) {
            let vertex = vertices.get(corner).ok_or(MapError::IndexOutOfBounds)?;
            embedding.set(dart, vertex.clone())?;
        }
        debug!(
            "built map with {} darts and {} embedded vertices",
            map.len(),
            embedding.len()
        );
        Ok((map, embedding))
    }

    /// Builds a map and embedding from polygons and vertex data.
    pub fn from_polygons<I, P, T>(
        polygons: I,
        vertices: &[T],
    ) -> Result<(CombinatorialMap, Embedding<T>), MapError>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<[usize]>,
        T: Clone + Default,
    {
        let mut builder = MapBuilder::new();
        for polygon in polygons {
            builder.insert_face(polygon)?;
        }
        builder.build_with_vertices(vertices)
    }

    /// Builds a map and embedding from a flat index buffer of polygons with
    /// the given arity.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::InvalidArity`] if the arity is less than three and
    /// [`MapError::ArityConflict`] if the length of the index buffer is not a
    /// multiple of the arity. Indices that cannot be represented as `usize` or
    /// that are not in `vertices` are [`MapError::IndexOutOfBounds`].
    ///
    /// [`MapError::ArityConflict`]: crate::map::MapError::ArityConflict
    /// [`MapError::IndexOutOfBounds`]: crate::map::MapError::IndexOutOfBounds
    /// [`MapError::InvalidArity`]: crate::map::MapError::InvalidArity
    pub fn from_raw_buffers_with_arity<I, N, T>(
        indices: I,
        vertices: &[T],
        arity: usize,
    ) -> Result<(CombinatorialMap, Embedding<T>), MapError>
    where
        I: IntoIterator<Item = N>,
        N: ToPrimitive,
        T: Clone + Default,
    {
        if arity < 3 {
            return Err(MapError::InvalidArity(arity));
        }
        let mut builder = MapBuilder::new();
        for polygon in &indices.into_iter().chunks(arity) {
            let perimeter = polygon
                .map(|index| index.to_usize().ok_or(MapError::IndexOutOfBounds))
                .collect::<Result<SmallVec<[_; 4]>, _>>()?;
            if perimeter.len() != arity {
                // Index buffer length is not a multiple of arity.
                return Err(MapError::ArityConflict {
                    expected: arity,
                    actual: perimeter.len(),
                });
            }
            builder.insert_face(&perimeter)?;
        }
        builder.build_with_vertices(vertices)
    }
}
