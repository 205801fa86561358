//! Linear representation of maps.
//!
//! This module provides a [`MeshBuffer`] that represents an embedded map as a
//! linear collection of vertex data and a flat collection of triangle indices
//! into that vertex data. These two buffers are called the _vertex buffer_ and
//! _index buffer_, respectively. This layout is well-suited for graphics
//! pipelines.
//!
//! The vertex buffer contains exactly one element for each vertex orbit of the
//! map, in the order of the vertex partition. Faces are triangulated as fans
//! about their first dart, so a face with the darts $\\{d_0, d_1, \ldots,
//! d_{n-1}\\}$ produces the triangles $(d_0, d_i, d_{i+1})$. Faces with fewer
//! than three darts produce no triangles.
//!
//! # Examples
//!
//! ```rust
//! use cmap::buffer::MeshBuffer;
//! use cmap::primitive;
//!
//! let cube = primitive::cube();
//! let buffer = MeshBuffer::<u16>::from_map(&cube.map, &cube.embedding).unwrap();
//!
//! assert_eq!(8, buffer.as_vertex_slice().len());
//! assert_eq!(12, buffer.triangle_count());
//! ```
//!
//! [`MeshBuffer`]: crate::buffer::MeshBuffer

use itertools::Itertools;
use log::debug;
use num::{NumCast, Unsigned};
use thiserror::Error;

use crate::embedding::Embedding;
use crate::geometry::Vertex;
use crate::map::{CombinatorialMap, Dart, MapError};

#[derive(Debug, Error, PartialEq)]
pub enum BufferError {
    #[error("index overflow")]
    IndexOverflow,
    /// The embedding was loaded from an older revision of the map.
    #[error("embedding is stale; loaded from revision {embedding}, but map is at {map}")]
    StaleEmbedding { embedding: u64, map: u64 },
    #[error(transparent)]
    Map(#[from] MapError),
}

/// Triangulated index buffer and vertex buffer of an embedded map.
///
/// See the [`buffer`] module documentation.
///
/// [`buffer`]: crate::buffer
#[derive(Clone, Debug)]
pub struct MeshBuffer<N = u32, T = Vertex>
where
    N: Copy + NumCast + Unsigned,
{
    indices: Vec<N>,
    vertices: Vec<T>,
}

impl<N, T> MeshBuffer<N, T>
where
    N: Copy + NumCast + Unsigned,
{
    /// Triangulates the faces of a map into a buffer of the records of an
    /// embedding.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::StaleEmbedding`] if the map has changed since
    /// the embedding was loaded and [`BufferError::IndexOverflow`] if the
    /// number of vertex orbits cannot be represented by `N`.
    ///
    /// [`BufferError::IndexOverflow`]: crate::buffer::BufferError::IndexOverflow
    /// [`BufferError::StaleEmbedding`]: crate::buffer::BufferError::StaleEmbedding
    pub fn from_map(
        map: &CombinatorialMap,
        embedding: &Embedding<T>,
    ) -> Result<Self, BufferError>
    where
        T: Clone,
    {
        if embedding.is_stale(map) {
            return Err(BufferError::StaleEmbedding {
                embedding: embedding.revision(),
                map: map.revision(),
            });
        }
        let mut indices = Vec::with_capacity(map.len() * 3);
        let index = |dart: Dart| -> Result<N, BufferError> {
            let index = embedding.orbit_index(dart)?;
            <N as NumCast>::from(index).ok_or(BufferError::IndexOverflow)
        };
        for face in map.faces().into_iter().filter(|face| face.len() >= 3) {
            let apex = index(face[0])?;
            for (b, c) in face.iter().skip(1).tuple_windows() {
                indices.push(apex);
                indices.push(index(*b)?);
                indices.push(index(*c)?);
            }
        }
        let vertices = embedding.records().to_vec();
        debug!(
            "triangulated {} vertices into {} triangles",
            vertices.len(),
            indices.len() / 3
        );
        Ok(MeshBuffer { indices, vertices })
    }

    /// Maps over the vertex data in a `MeshBuffer`.
    ///
    /// # Examples
    ///
    /// Extracting positions from a buffer:
    ///
    /// ```rust
    /// use cmap::buffer::MeshBuffer;
    /// use cmap::primitive;
    ///
    /// let tetrahedron = primitive::tetrahedron();
    /// let buffer = MeshBuffer::<u32>::from_map(&tetrahedron.map, &tetrahedron.embedding)
    ///     .unwrap()
    ///     .map_vertices(|vertex| vertex.position);
    ///
    /// assert_eq!(4, buffer.as_vertex_slice().len());
    /// ```
    pub fn map_vertices<H, F>(self, f: F) -> MeshBuffer<N, H>
    where
        F: FnMut(T) -> H,
    {
        let MeshBuffer { indices, vertices } = self;
        MeshBuffer {
            indices,
            vertices: vertices.into_iter().map(f).collect(),
        }
    }

    /// Gets the number of triangles in the index buffer.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn into_raw_buffers(self) -> (Vec<N>, Vec<T>) {
        let MeshBuffer { indices, vertices } = self;
        (indices, vertices)
    }

    /// Gets a slice of the index data.
    pub fn as_index_slice(&self) -> &[N] {
        self.indices.as_slice()
    }

    /// Gets a slice of the vertex data.
    pub fn as_vertex_slice(&self) -> &[T] {
        self.vertices.as_slice()
    }
}

#[cfg(test)]
mod tests {
    use crate::buffer::{BufferError, MeshBuffer};
    use crate::builder::MapBuilder;
    use crate::embedding::Embedding;
    use crate::map::CombinatorialMap;

    #[test]
    fn fan_triangulation() {
        let (map, embedding) =
            MapBuilder::from_polygons(vec![[0usize, 1, 2, 3, 4]], &[0u8, 1, 2, 3, 4]).unwrap();
        let buffer = MeshBuffer::<u32, u8>::from_map(&map, &embedding).unwrap();

        assert_eq!(3, buffer.triangle_count());
        // Vertex orbits are ordered by dart, so indices match the input here.
        assert_eq!(&[0, 1, 2, 3, 4], buffer.as_vertex_slice());
        assert_eq!(&[0, 1, 2, 0, 2, 3, 0, 3, 4], buffer.as_index_slice());
    }

    #[test]
    fn degenerate_faces_are_skipped() {
        let mut map = CombinatorialMap::new();
        map.new_face(2).unwrap();
        map.new_face(3).unwrap();
        let embedding = Embedding::<()>::new(&map);
        let buffer = MeshBuffer::<u32, ()>::from_map(&map, &embedding).unwrap();

        assert_eq!(1, buffer.triangle_count());
        assert_eq!(5, buffer.as_vertex_slice().len());
    }

    #[test]
    fn shared_vertices_are_indexed_once() {
        let (map, embedding) =
            MapBuilder::from_polygons(vec![[0usize, 1, 2], [2, 1, 3]], &[0u8, 1, 2, 3]).unwrap();
        let (indices, vertices) = MeshBuffer::<u16, u8>::from_map(&map, &embedding)
            .unwrap()
            .into_raw_buffers();

        assert_eq!(4, vertices.len());
        assert_eq!(6, indices.len());
        for index in indices {
            assert!((index as usize) < vertices.len());
        }
    }

    #[test]
    fn index_overflow() {
        let mut map = CombinatorialMap::new();
        for _ in 0..100 {
            map.new_face(3).unwrap();
        }
        let embedding = Embedding::<()>::new(&map);

        assert_eq!(
            Err(BufferError::IndexOverflow),
            MeshBuffer::<u8, ()>::from_map(&map, &embedding).map(|_| ())
        );
    }

    #[test]
    fn stale_embedding_is_error() {
        let mut map = CombinatorialMap::new();
        map.new_face(3).unwrap();
        let embedding = Embedding::<()>::new(&map);
        map.new_face(3).unwrap();

        assert!(matches!(
            MeshBuffer::<u32, ()>::from_map(&map, &embedding),
            Err(BufferError::StaleEmbedding { .. })
        ));
    }
}
