//! Geometric embedding of vertex orbits.
//!
//! An [`Embedding`] attaches one record of data (by default a [`Vertex`]) to
//! each vertex orbit of a [`CombinatorialMap`]. Records are addressed by any
//! dart of the orbit, so all darts leaving a vertex share the same record.
//!
//! Embeddings do not borrow their map. Instead, an embedding remembers the
//! revision of the map it was loaded from and must be reloaded explicitly
//! after the topology of the map changes. Reloading discards all records.
//!
//! # Examples
//!
//! ```rust
//! use cmap::embedding::Embedding;
//! use cmap::map::CombinatorialMap;
//! use cmap::nalgebra::Point3;
//!
//! let mut map = CombinatorialMap::new();
//! let a = map.new_face(3).unwrap();
//! let b = map.new_face(3).unwrap();
//! map.sew_phi2(a, b).unwrap();
//!
//! let mut embedding: Embedding = Embedding::new(&map);
//! embedding.get_mut(a).unwrap().position = Point3::new(1.0, 0.0, 0.0);
//!
//! // `phi1(b)` leaves the same vertex as `a`.
//! assert_eq!(Point3::new(1.0, 0.0, 0.0), embedding.get(map.phi1(b)).unwrap().position);
//! ```
//!
//! [`CombinatorialMap`]: crate::map::CombinatorialMap
//! [`Embedding`]: crate::embedding::Embedding
//! [`Vertex`]: crate::geometry::Vertex

use derivative::Derivative;
use log::debug;
use std::fmt::Debug;
use std::mem;

use crate::geometry::Vertex;
use crate::map::{CombinatorialMap, Dart, MapError, Orbit, OrbitKind, Partition};

/// Data attached to the vertex orbits of a map.
#[derive(Derivative)]
#[derivative(
    Clone(bound = "T: Clone"),
    Debug(bound = "T: Debug")
)]
pub struct Embedding<T = Vertex> {
    revision: u64,
    #[derivative(Debug = "ignore")]
    vertices: Partition,
    records: Vec<T>,
}

impl<T> Embedding<T>
where
    T: Default,
{
    /// Creates an embedding of the vertex orbits of a map.
    ///
    /// Every vertex orbit is given a default record.
    pub fn new(map: &CombinatorialMap) -> Self {
        let vertices = map.partition(OrbitKind::Vertex);
        let records = vertices.iter().map(|_| T::default()).collect();
        Embedding {
            revision: map.revision(),
            vertices,
            records,
        }
    }

    /// Recomputes the vertex orbits of a map and replaces all records with
    /// defaults.
    ///
    /// This must be called after the topology of the map changes. Records from
    /// before the reload are discarded, even if their orbits still exist.
    pub fn reload(&mut self, map: &CombinatorialMap) {
        let stale = mem::replace(self, Embedding::new(map));
        debug!(
            "reloaded embedding from revision {} to {}; discarded {} records for {} orbits",
            stale.revision,
            self.revision,
            stale.records.len(),
            self.records.len(),
        );
    }
}

impl<T> Embedding<T> {
    /// Returns `true` if the map has changed since the embedding was loaded.
    pub fn is_stale(&self, map: &CombinatorialMap) -> bool {
        self.revision != map.revision()
    }

    fn check(&self, map: &CombinatorialMap) -> Result<(), MapError> {
        if self.is_stale(map) {
            Err(MapError::StaleEmbedding {
                embedding: self.revision,
                map: map.revision(),
            })
        }
        else {
            Ok(())
        }
    }

    /// Gets the revision of the map from which the embedding was loaded.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Gets the number of records, which is the number of vertex orbits.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Gets the index of the vertex orbit containing a dart.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::UnknownDart`] if the dart was not part of the map
    /// when the embedding was loaded.
    ///
    /// [`MapError::UnknownDart`]: crate::map::MapError::UnknownDart
    pub fn orbit_index(&self, dart: Dart) -> Result<usize, MapError> {
        self.vertices
            .orbit_index(dart)
            .ok_or(MapError::UnknownDart(dart))
    }

    /// Gets the vertex orbits known to the embedding.
    pub fn orbits(&self) -> &[Orbit] {
        self.vertices.orbits()
    }

    /// Gets the record of the vertex orbit containing a dart.
    ///
    /// Orbits are those of the map when the embedding was loaded. If the map
    /// has changed since, the record may belong to an orbit that no longer
    /// exists. Use [`get_checked`] to reject stale embeddings.
    ///
    /// [`get_checked`]: crate::embedding::Embedding::get_checked
    pub fn get(&self, dart: Dart) -> Result<&T, MapError> {
        let index = self.orbit_index(dart)?;
        Ok(&self.records[index])
    }

    /// Gets the record of the vertex orbit containing a dart if the embedding
    /// is current with the given map.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::StaleEmbedding`] if the map has changed since the
    /// embedding was loaded.
    ///
    /// [`MapError::StaleEmbedding`]: crate::map::MapError::StaleEmbedding
    pub fn get_checked(&self, map: &CombinatorialMap, dart: Dart) -> Result<&T, MapError> {
        self.check(map)?;
        self.get(dart)
    }

    /// Gets the record of the vertex orbit containing a dart mutably.
    ///
    /// Like [`get`], this does not detect stale embeddings.
    ///
    /// [`get`]: crate::embedding::Embedding::get
    pub fn get_mut(&mut self, dart: Dart) -> Result<&mut T, MapError> {
        let index = self.orbit_index(dart)?;
        Ok(&mut self.records[index])
    }

    /// Sets the record of the vertex orbit containing a dart, returning the
    /// previous record.
    ///
    /// Like [`get`], this does not detect stale embeddings. Use
    /// [`set_checked`] to reject them.
    ///
    /// [`get`]: crate::embedding::Embedding::get
    /// [`set_checked`]: crate::embedding::Embedding::set_checked
    pub fn set(&mut self, dart: Dart, record: T) -> Result<T, MapError> {
        self.get_mut(dart).map(|target| mem::replace(target, record))
    }

    /// Sets the record of the vertex orbit containing a dart if the embedding
    /// is current with the given map.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::StaleEmbedding`] if the map has changed since the
    /// embedding was loaded. The record is not written in that case.
    ///
    /// [`MapError::StaleEmbedding`]: crate::map::MapError::StaleEmbedding
    pub fn set_checked(
        &mut self,
        map: &CombinatorialMap,
        dart: Dart,
        record: T,
    ) -> Result<T, MapError> {
        self.check(map)?;
        self.set(dart, record)
    }

    /// Gets the record of the vertex orbit with the given index.
    pub fn record(&self, index: usize) -> Option<&T> {
        self.records.get(index)
    }

    /// Gets the records in orbit order.
    pub fn records(&self) -> &[T] {
        &self.records
    }

    /// Gets an iterator over vertex orbits and their records.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&Orbit, &T)> {
        self.vertices.iter().zip(self.records.iter())
    }
}
