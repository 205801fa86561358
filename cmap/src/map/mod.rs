//! Combinatorial map representation of polygonal meshes.
//!
//! This module provides [`CombinatorialMap`], which represents the topology of
//! a polygonal mesh with a flat set of _darts_ and two relations over them.
//! Darts are atomic and carry no geometry. A dart can be thought of as a
//! corner of a face together with the side of the face that leaves that
//! corner, but it is only ever identified by its [`Dart`] key.
//!
//! # Representation
//!
//! The permutation $\phi_1$ maps every dart to the next dart around its face.
//! Every dart has exactly one successor and one predecessor ($\phi_1^{-1}$,
//! which is stored explicitly), so the cycles of $\phi_1$ are the _faces_ of
//! the map.
//!
//! The involution $\phi_2$ pairs the two darts on either side of an edge, such
//! that $\phi_2(\phi_2(d)) = d$. A dart that is paired with itself is a
//! _boundary dart_ and is not _sewn_. The cycles of $\phi_2$ (which have one or
//! two darts) are the _edges_ of the map.
//!
//! The _vertices_ of the map are the orbits of $\phi_1 \circ \phi_2$: for a dart
//! $d$ leaving a vertex $v$, $\phi_2(d)$ arrives at $v$ and $\phi_1(\phi_2(d))$
//! leaves $v$ again. Around a boundary vertex this rotation is open. It ends at
//! a boundary dart and is completed by walking backwards with
//! $\phi_2 \circ \phi_1^{-1}$, so every corner of an unsewn polygon is its own
//! vertex. On closed maps vertices are exactly the cycles of
//! $\phi_1 \circ \phi_2$.
//!
//! Together these orbits give the Euler characteristic $\chi = V - E + F$.
//!
//! # Consistency
//!
//! Every mutation leaves $\phi_1$ a total permutation and $\phi_2$ a total
//! involution. Preconditions are checked before anything is written, so no
//! partially applied sew is ever observable. Sequences of edits can be applied
//! atomically with [`CombinatorialMap::mutate`].
//!
//! Orbit enumeration assumes consistency. If a traversal fails to close, then
//! some prior mutation corrupted the map and enumeration panics.
//! [`CombinatorialMap::validate`] reports the same condition as an error.
//!
//! # Examples
//!
//! Sewing two triangles along an edge:
//!
//! ```rust
//! use cmap::map::CombinatorialMap;
//!
//! let mut map = CombinatorialMap::new();
//! let a = map.new_face(3).unwrap();
//! let b = map.new_face(3).unwrap();
//! map.sew_phi2(a, b).unwrap();
//!
//! assert_eq!(b, map.phi2(a));
//! assert_eq!(4, map.vertices().len());
//! assert_eq!(5, map.edges().len());
//! assert_eq!(2, map.faces().len());
//! assert_eq!(1, map.euler());
//! ```
//!
//! [`CombinatorialMap`]: crate::map::CombinatorialMap
//! [`CombinatorialMap::mutate`]: crate::map::CombinatorialMap::mutate
//! [`CombinatorialMap::validate`]: crate::map::CombinatorialMap::validate
//! [`Dart`]: crate::map::Dart

mod dart;
mod mutation;
mod orbit;
mod trace;

use log::{debug, trace};
use std::fmt::Debug;
use std::io;
use thiserror::Error;

use crate::encoding::dot::ToDot;
use crate::map::trace::TraceAny;

pub use crate::map::dart::Dart;
pub use crate::map::mutation::Mutation;
pub use crate::map::orbit::{Orbit, OrbitKind, Partition};

/// Errors concerning [`CombinatorialMap`]s and data attached to them.
///
/// [`CombinatorialMap`]: crate::map::CombinatorialMap
#[derive(Debug, Error, PartialEq)]
pub enum MapError {
    /// A face was requested with a degenerate number of sides.
    #[error("arity {0} is degenerate")]
    InvalidArity(usize),
    /// A dart is already sewn and the map uses [`SewPolicy::Strict`].
    #[error("dart {0} is already sewn")]
    AlreadySewn(Dart),
    /// A dart is not part of any orbit known to an embedding.
    #[error("dart {0} is not part of any known vertex orbit")]
    UnknownDart(Dart),
    /// A dart was not allocated by the map.
    #[error("dart {0} not found")]
    DartNotFound(Dart),
    /// A dart was sewn to itself.
    #[error("dart {0} cannot be sewn to itself")]
    SelfSew(Dart),
    /// A face repeats an arc or overlaps an arc that was already inserted.
    #[error("conflicting topology found")]
    TopologyConflict,
    /// A face refers to a vertex index that has no vertex data.
    #[error("index into vertex data out of bounds")]
    IndexOutOfBounds,
    /// The arity of an index buffer is not compatible with an operation.
    #[error("conflicting arity; expected {expected}, but got {actual}")]
    ArityConflict {
        /// The expected arity.
        expected: usize,
        /// The incompatible arity that was encountered.
        actual: usize,
    },
    /// An orbit does not close or a relation is not a permutation.
    ///
    /// This indicates a defect in code that mutates the map and is never
    /// expected from a map that has only been mutated through its API.
    #[error("inconsistent permutation at dart {dart} in {kind} orbit")]
    InconsistentPermutation {
        /// The dart at which the inconsistency was found.
        dart: Dart,
        /// The kind of orbit that was being traversed.
        kind: OrbitKind,
    },
    /// An embedding was read after the topology of its map changed.
    #[error("embedding loaded at revision {embedding} is stale; map is at revision {map}")]
    StaleEmbedding {
        /// The revision at which the embedding was loaded.
        embedding: u64,
        /// The current revision of the map.
        map: u64,
    },
}

pub(crate) trait OptionExt<T> {
    fn expect_consistent(self) -> T;
}

impl<T> OptionExt<T> for Option<T> {
    fn expect_consistent(self) -> T {
        self.expect("internal error: map consistency violated")
    }
}

pub(crate) trait ResultExt<T, E> {
    fn expect_consistent(self) -> T
    where
        E: Debug;
}

impl<T, E> ResultExt<T, E> for Result<T, E> {
    fn expect_consistent(self) -> T
    where
        E: Debug,
    {
        self.expect("internal error: map consistency violated")
    }
}

/// Policy applied when sewing darts that are already sewn.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum SewPolicy {
    /// Sewing a dart that is already sewn fails with
    /// [`MapError::AlreadySewn`].
    ///
    /// [`MapError::AlreadySewn`]: crate::map::MapError::AlreadySewn
    #[default]
    Strict,
    /// Darts that are already sewn are unsewn from their previous partners
    /// before they are sewn again.
    Resew,
}

/// Combinatorial map representation of a polygonal mesh.
///
/// Stores darts as indices into flat arrays for $\phi_1$, $\phi_1^{-1}$, and
/// $\phi_2$. Darts are only ever appended, so the storage is never compacted
/// and [`Dart`] keys remain stable.
///
/// See the [`map`] module documentation for more.
///
/// [`Dart`]: crate::map::Dart
/// [`map`]: crate::map
#[derive(Clone, Debug, Default)]
pub struct CombinatorialMap {
    phi1: Vec<Dart>,
    phi_1: Vec<Dart>,
    phi2: Vec<Dart>,
    policy: SewPolicy,
    revision: u64,
}

impl CombinatorialMap {
    /// Creates an empty `CombinatorialMap` with the strict sew policy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty `CombinatorialMap` with the given sew policy.
    pub fn with_policy(policy: SewPolicy) -> Self {
        CombinatorialMap {
            policy,
            ..Self::default()
        }
    }

    pub fn policy(&self) -> SewPolicy {
        self.policy
    }

    pub fn set_policy(&mut self, policy: SewPolicy) {
        self.policy = policy;
    }

    /// Gets the number of darts in the map.
    pub fn len(&self) -> usize {
        self.phi1.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phi1.is_empty()
    }

    /// Gets the revision of the map.
    ///
    /// The revision changes whenever the topology of the map changes. It is
    /// used to detect embeddings that have not been reloaded since an edit.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Gets an iterator over all darts in the map in index order.
    pub fn darts(&self) -> impl ExactSizeIterator<Item = Dart> {
        (0..self.len()).map(Dart::from_index)
    }

    /// Returns `true` if the dart was allocated by this map.
    pub fn contains(&self, dart: Dart) -> bool {
        dart.index() < self.len()
    }

    /// Allocates a dart with $\phi_1(d) = d$ and $\phi_2(d) = d$.
    ///
    /// The dart forms a degenerate face and edge on its own.
    pub fn new_strand(&mut self) -> Dart {
        let dart = Dart::from_index(self.len());
        self.phi1.push(dart);
        self.phi_1.push(dart);
        self.phi2.push(dart);
        self.touch();
        trace!("inserted strand {}", dart);
        dart
    }

    /// Allocates a face with the given number of sides and returns its first
    /// dart.
    ///
    /// The darts of the face are wired into a single $\phi_1$ cycle in creation
    /// order. All darts of the face are boundary darts. A face with one side is
    /// a single self-looped dart.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::InvalidArity`] if `sides` is zero.
    ///
    /// [`MapError::InvalidArity`]: crate::map::MapError::InvalidArity
    pub fn new_face(&mut self, sides: usize) -> Result<Dart, MapError> {
        if sides == 0 {
            return Err(MapError::InvalidArity(sides));
        }
        let offset = self.len();
        self.phi1.reserve(sides);
        self.phi_1.reserve(sides);
        self.phi2.reserve(sides);
        for index in offset..(offset + sides) {
            let next = offset + ((index - offset + 1) % sides);
            let previous = offset + ((index - offset + sides - 1) % sides);
            self.phi1.push(Dart::from_index(next));
            self.phi_1.push(Dart::from_index(previous));
            self.phi2.push(Dart::from_index(index));
        }
        self.touch();
        let first = Dart::from_index(offset);
        trace!("inserted face {} with {} sides", first, sides);
        Ok(first)
    }

    /// Gets the successor of a dart around its face.
    ///
    /// # Panics
    ///
    /// Panics if the dart was not allocated by this map.
    pub fn phi1(&self, dart: Dart) -> Dart {
        self.phi1[dart.index()]
    }

    /// Gets the predecessor of a dart around its face ($\phi_1^{-1}$).
    ///
    /// # Panics
    ///
    /// Panics if the dart was not allocated by this map.
    pub fn phi_1(&self, dart: Dart) -> Dart {
        self.phi_1[dart.index()]
    }

    /// Gets the dart paired with a dart across its edge.
    ///
    /// Boundary darts are paired with themselves.
    ///
    /// # Panics
    ///
    /// Panics if the dart was not allocated by this map.
    pub fn phi2(&self, dart: Dart) -> Dart {
        self.phi2[dart.index()]
    }

    /// Returns `true` if the dart is not sewn along $\phi_2$.
    pub fn is_boundary(&self, dart: Dart) -> bool {
        self.phi2(dart) == dart
    }

    /// Returns `true` if no dart in the map is a boundary dart.
    pub fn is_closed(&self) -> bool {
        self.darts().all(|dart| !self.is_boundary(dart))
    }

    /// Sews two darts along $\phi_2$, forming an edge.
    ///
    /// # Errors
    ///
    /// Returns an error if either dart is not found or if `a` and `b` are the
    /// same dart. With [`SewPolicy::Strict`], returns
    /// [`MapError::AlreadySewn`] if either dart is already sewn. With
    /// [`SewPolicy::Resew`], sewn darts are first unsewn from their partners.
    ///
    /// [`MapError::AlreadySewn`]: crate::map::MapError::AlreadySewn
    /// [`SewPolicy::Resew`]: crate::map::SewPolicy::Resew
    /// [`SewPolicy::Strict`]: crate::map::SewPolicy::Strict
    pub fn sew_phi2(&mut self, a: Dart, b: Dart) -> Result<(), MapError> {
        self.find(a)?;
        self.find(b)?;
        if a == b {
            return Err(MapError::SelfSew(a));
        }
        for dart in [a, b] {
            if !self.is_boundary(dart) {
                match self.policy {
                    SewPolicy::Strict => return Err(MapError::AlreadySewn(dart)),
                    SewPolicy::Resew => {
                        let partner = self.phi2(dart);
                        debug!("unsewing {} from {} to resew", dart, partner);
                        self.detach_phi2(dart);
                    }
                }
            }
        }
        self.phi2[a.index()] = b;
        self.phi2[b.index()] = a;
        self.touch();
        trace!("sewed {} and {} along phi2", a, b);
        Ok(())
    }

    /// Inserts the isolated dart `b` after `a` in the face of `a`.
    ///
    /// The dart `b` must form a face on its own (that is, $\phi_1(b) = b$). After
    /// sewing, $\phi_1(a) = b$ and $b$ precedes the former successor of `a`.
    ///
    /// # Errors
    ///
    /// Returns an error if either dart is not found or if `a` and `b` are the
    /// same dart. With [`SewPolicy::Strict`], returns
    /// [`MapError::AlreadySewn`] if `b` is part of a larger face. With
    /// [`SewPolicy::Resew`], `b` is first removed from its face.
    ///
    /// [`MapError::AlreadySewn`]: crate::map::MapError::AlreadySewn
    /// [`SewPolicy::Resew`]: crate::map::SewPolicy::Resew
    /// [`SewPolicy::Strict`]: crate::map::SewPolicy::Strict
    pub fn sew_phi1(&mut self, a: Dart, b: Dart) -> Result<(), MapError> {
        self.find(a)?;
        self.find(b)?;
        if a == b {
            return Err(MapError::SelfSew(a));
        }
        if self.phi1(b) != b {
            match self.policy {
                SewPolicy::Strict => return Err(MapError::AlreadySewn(b)),
                SewPolicy::Resew => {
                    debug!("removing {} from its face to resew", b);
                    self.detach_phi1(b);
                }
            }
        }
        let next = self.phi1(a);
        self.phi1[a.index()] = b;
        self.phi_1[b.index()] = a;
        self.phi1[b.index()] = next;
        self.phi_1[next.index()] = b;
        self.touch();
        trace!("sewed {} after {} along phi1", b, a);
        Ok(())
    }

    /// Unsews a dart along $\phi_2$, returning its former partner.
    ///
    /// Both the dart and its partner become boundary darts. Returns `None` if
    /// the dart is already a boundary dart.
    pub fn unsew_phi2(&mut self, dart: Dart) -> Result<Option<Dart>, MapError> {
        self.find(dart)?;
        if self.is_boundary(dart) {
            Ok(None)
        }
        else {
            let partner = self.detach_phi2(dart);
            self.touch();
            trace!("unsewed {} and {} along phi2", dart, partner);
            Ok(Some(partner))
        }
    }

    /// Removes a dart from its face, leaving it a face on its own.
    ///
    /// The predecessor and successor of the dart are joined. This is the
    /// inverse of [`sew_phi1`]. Nothing changes if the dart already forms a
    /// face on its own.
    ///
    /// [`sew_phi1`]: crate::map::CombinatorialMap::sew_phi1
    pub fn unsew_phi1(&mut self, dart: Dart) -> Result<(), MapError> {
        self.find(dart)?;
        if self.phi1(dart) != dart {
            self.detach_phi1(dart);
            self.touch();
            trace!("removed {} from its face", dart);
        }
        Ok(())
    }

    /// Gets the orbit of the given relation that contains a dart.
    ///
    /// Returns `None` if the dart was not allocated by this map.
    ///
    /// # Panics
    ///
    /// Panics if the orbit does not close (see [`validate`]).
    ///
    /// [`validate`]: crate::map::CombinatorialMap::validate
    pub fn orbit(&self, kind: OrbitKind, dart: Dart) -> Option<Orbit> {
        if self.contains(dart) {
            Some(orbit::traverse(self, kind, dart, &mut TraceAny::default()).expect_consistent())
        }
        else {
            None
        }
    }

    /// Partitions the darts of the map into the orbits of the given relation.
    ///
    /// # Panics
    ///
    /// Panics if any orbit does not close (see [`validate`]).
    ///
    /// [`validate`]: crate::map::CombinatorialMap::validate
    pub fn partition(&self, kind: OrbitKind) -> Partition {
        orbit::partition(self, kind).expect_consistent()
    }

    /// Gets the vertex orbits of the map.
    ///
    /// # Panics
    ///
    /// Panics if any orbit does not close (see [`validate`]).
    ///
    /// [`validate`]: crate::map::CombinatorialMap::validate
    pub fn vertices(&self) -> Vec<Orbit> {
        self.partition(OrbitKind::Vertex).into_orbits()
    }

    /// Gets the edge orbits of the map.
    ///
    /// # Panics
    ///
    /// Panics if any orbit does not close (see [`validate`]).
    ///
    /// [`validate`]: crate::map::CombinatorialMap::validate
    pub fn edges(&self) -> Vec<Orbit> {
        self.partition(OrbitKind::Edge).into_orbits()
    }

    /// Gets the face orbits of the map.
    ///
    /// Each orbit is the ordered cycle of darts bounding a polygon.
    ///
    /// # Panics
    ///
    /// Panics if any orbit does not close (see [`validate`]).
    ///
    /// [`validate`]: crate::map::CombinatorialMap::validate
    pub fn faces(&self) -> Vec<Orbit> {
        self.partition(OrbitKind::Face).into_orbits()
    }

    /// Computes the Euler characteristic $\chi = V - E + F$ of the map.
    pub fn euler(&self) -> i64 {
        let count = |kind| self.partition(kind).len() as i64;
        count(OrbitKind::Vertex) - count(OrbitKind::Edge) + count(OrbitKind::Face)
    }

    /// Verifies the consistency of the map.
    ///
    /// Checks that $\phi_1$ is a permutation with a coherent inverse, that
    /// $\phi_2$ is an involution, and that every orbit closes.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::InconsistentPermutation`] at the first violation.
    ///
    /// [`MapError::InconsistentPermutation`]: crate::map::MapError::InconsistentPermutation
    pub fn validate(&self) -> Result<(), MapError> {
        let len = self.len();
        for dart in self.darts() {
            let index = dart.index();
            let next = self.phi1[index];
            let previous = self.phi_1[index];
            if next.index() >= len
                || previous.index() >= len
                || self.phi_1[next.index()] != dart
                || self.phi1[previous.index()] != dart
            {
                return Err(MapError::InconsistentPermutation {
                    dart,
                    kind: OrbitKind::Face,
                });
            }
            let opposite = self.phi2[index];
            if opposite.index() >= len || self.phi2[opposite.index()] != dart {
                return Err(MapError::InconsistentPermutation {
                    dart,
                    kind: OrbitKind::Edge,
                });
            }
        }
        for kind in [OrbitKind::Vertex, OrbitKind::Edge, OrbitKind::Face] {
            orbit::partition(self, kind)?;
        }
        Ok(())
    }

    /// Writes a DOT graph of the face, edge, and vertex incidence of the map.
    ///
    /// This is a diagnostic dump and its format is not stable. See
    /// [`ToDot`].
    ///
    /// [`ToDot`]: crate::encoding::dot::ToDot
    pub fn export_graph<W>(&self, sink: W) -> io::Result<()>
    where
        W: io::Write,
    {
        self.to_dot(sink)
    }

    fn find(&self, dart: Dart) -> Result<Dart, MapError> {
        if self.contains(dart) {
            Ok(dart)
        }
        else {
            Err(MapError::DartNotFound(dart))
        }
    }

    fn touch(&mut self) {
        self.revision += 1;
    }

    fn detach_phi2(&mut self, dart: Dart) -> Dart {
        let partner = self.phi2(dart);
        self.phi2[dart.index()] = dart;
        self.phi2[partner.index()] = partner;
        partner
    }

    fn detach_phi1(&mut self, dart: Dart) {
        let previous = self.phi_1(dart);
        let next = self.phi1(dart);
        self.phi1[previous.index()] = next;
        self.phi_1[next.index()] = previous;
        self.phi1[dart.index()] = dart;
        self.phi_1[dart.index()] = dart;
    }
}
