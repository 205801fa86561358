use log::{debug, warn};
use std::ops::Deref;

use crate::map::{CombinatorialMap, Dart, MapError};
use crate::transact::Transact;

/// Transactional edit of a [`CombinatorialMap`].
///
/// A mutation captures the state of its map when it is created. Edits are
/// applied to the map immediately and are validated when the mutation is
/// committed. If validation fails, the mutation is aborted, or the mutation is
/// dropped without being committed, then the map is restored to its captured
/// state.
///
/// The map can be read through a mutation via `Deref`.
///
/// # Examples
///
/// ```rust
/// use cmap::map::{CombinatorialMap, Mutation};
/// use cmap::prelude::*;
///
/// let mut map = CombinatorialMap::new();
/// let mut mutation = Mutation::from(&mut map);
/// let a = mutation.new_face(3).unwrap();
/// let b = mutation.new_face(3).unwrap();
/// mutation.sew_phi2(a, b).unwrap();
/// mutation.abort();
///
/// assert!(map.is_empty());
/// ```
///
/// [`CombinatorialMap`]: crate::map::CombinatorialMap
pub struct Mutation<'a> {
    map: &'a mut CombinatorialMap,
    snapshot: Option<CombinatorialMap>,
}

impl<'a> Mutation<'a> {
    pub fn new_strand(&mut self) -> Dart {
        self.map.new_strand()
    }

    pub fn new_face(&mut self, sides: usize) -> Result<Dart, MapError> {
        self.map.new_face(sides)
    }

    pub fn sew_phi2(&mut self, a: Dart, b: Dart) -> Result<(), MapError> {
        self.map.sew_phi2(a, b)
    }

    pub fn sew_phi1(&mut self, a: Dart, b: Dart) -> Result<(), MapError> {
        self.map.sew_phi1(a, b)
    }

    pub fn unsew_phi2(&mut self, dart: Dart) -> Result<Option<Dart>, MapError> {
        self.map.unsew_phi2(dart)
    }

    pub fn unsew_phi1(&mut self, dart: Dart) -> Result<(), MapError> {
        self.map.unsew_phi1(dart)
    }

    fn restore(&mut self) -> bool {
        if let Some(snapshot) = self.snapshot.take() {
            // The revision only advances, so embeddings loaded during the
            // mutation are stale after it is rolled back.
            let revision = self.map.revision;
            *self.map = snapshot;
            self.map.revision = revision + 1;
            true
        }
        else {
            false
        }
    }
}

impl<'a> AsRef<CombinatorialMap> for Mutation<'a> {
    fn as_ref(&self) -> &CombinatorialMap {
        self.map
    }
}

impl<'a> Deref for Mutation<'a> {
    type Target = CombinatorialMap;

    fn deref(&self) -> &Self::Target {
        self.map
    }
}

impl<'a> Drop for Mutation<'a> {
    fn drop(&mut self) {
        if self.restore() {
            warn!("map mutation dropped without commit; restored previous state");
        }
    }
}

impl<'a> From<&'a mut CombinatorialMap> for Mutation<'a> {
    fn from(map: &'a mut CombinatorialMap) -> Self {
        let snapshot = Some(map.clone());
        Mutation { map, snapshot }
    }
}

impl<'a> Transact<&'a mut CombinatorialMap> for Mutation<'a> {
    type Output = ();
    type Error = MapError;

    fn commit(mut self) -> Result<Self::Output, Self::Error> {
        match self.map.validate() {
            Ok(()) => {
                self.snapshot = None;
                debug!("committed map mutation at revision {}", self.map.revision());
                Ok(())
            }
            Err(error) => {
                self.restore();
                warn!("map mutation failed validation: {}", error);
                Err(error)
            }
        }
    }

    fn abort(mut self) {
        if self.restore() {
            debug!("aborted map mutation");
        }
    }
}

impl CombinatorialMap {
    /// Applies a function to a [`Mutation`] of the map and commits it.
    ///
    /// If the function fails or the edits leave the map inconsistent, then the
    /// map is restored and the error is returned. No partial edit is ever
    /// observable.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use cmap::map::{CombinatorialMap, MapError};
    ///
    /// let mut map = CombinatorialMap::new();
    /// let result = map.mutate(|mutation| {
    ///     let a = mutation.new_face(3)?;
    ///     mutation.new_face(3)?;
    ///     mutation.sew_phi2(a, a)
    /// });
    ///
    /// assert!(matches!(result, Err(MapError::SelfSew(_))));
    /// assert!(map.is_empty());
    /// ```
    ///
    /// [`Mutation`]: crate::map::Mutation
    pub fn mutate<T, E, F>(&mut self, f: F) -> Result<T, MapError>
    where
        F: FnOnce(&mut Mutation<'_>) -> Result<T, E>,
        E: Into<MapError>,
    {
        Mutation::from(self)
            .commit_with(f)
            .map(|(_, value)| value)
    }
}

#[cfg(test)]
mod tests {
    use crate::buffer::{BufferError, MeshBuffer};
    use crate::embedding::Embedding;
    use crate::map::{CombinatorialMap, Dart, MapError, Mutation, OrbitKind};
    use crate::transact::Transact;

    #[test]
    fn commit_keeps_edits() {
        let mut map = CombinatorialMap::new();
        let mut mutation = Mutation::from(&mut map);
        let a = mutation.new_face(3).unwrap();
        let b = mutation.new_face(3).unwrap();
        mutation.sew_phi2(a, b).unwrap();
        mutation.commit().unwrap();

        assert_eq!(6, map.len());
        assert_eq!(b, map.phi2(a));
    }

    #[test]
    fn drop_restores_map() {
        let mut map = CombinatorialMap::new();
        let a = map.new_face(3).unwrap();
        {
            let mut mutation = Mutation::from(&mut map);
            let b = mutation.new_face(3).unwrap();
            mutation.sew_phi2(a, b).unwrap();
            assert_eq!(6, mutation.len());
        }

        assert_eq!(3, map.len());
        assert!(map.is_boundary(a));
    }

    #[test]
    fn mutate_returns_value() {
        let mut map = CombinatorialMap::new();
        let (a, b) = map
            .mutate(|mutation| {
                let a = mutation.new_face(4)?;
                let b = mutation.new_face(4)?;
                mutation.sew_phi2(a, b)?;
                Ok::<_, MapError>((a, b))
            })
            .unwrap();

        assert_eq!(b, map.phi2(a));
        assert_eq!(2, map.faces().len());
    }

    #[test]
    fn mutate_rolls_back_on_error() {
        let mut map = CombinatorialMap::new();
        let a = map.new_face(3).unwrap();
        let b = map.new_face(3).unwrap();
        let revision = map.revision();
        let result = map.mutate(|mutation| {
            let c = mutation.new_face(3)?;
            mutation.sew_phi2(a, b)?;
            // `b` is already sewn, so this fails after two edits.
            mutation.sew_phi2(c, b)
        });

        assert_eq!(Err(MapError::AlreadySewn(b)), result);
        assert_eq!(6, map.len());
        assert!(map.is_boundary(a));
        assert!(map.revision() > revision);
    }

    #[test]
    fn rollback_advances_revision() {
        let mut map = CombinatorialMap::new();
        let a = map.new_face(3).unwrap();
        let b = map.new_face(3).unwrap();
        let c = map.new_face(3).unwrap();
        let embedding = {
            let mut mutation = Mutation::from(&mut map);
            mutation.sew_phi2(a, b).unwrap();
            Embedding::<u32>::new(&mutation)
        };
        // Sewing `a` to `c` instead gives another topology with as many edits.
        map.sew_phi2(a, c).unwrap();

        assert!(embedding.is_stale(&map));
        assert!(matches!(
            MeshBuffer::<u32, u32>::from_map(&map, &embedding),
            Err(BufferError::StaleEmbedding { .. })
        ));
    }

    #[test]
    fn commit_rejects_inconsistent_map() {
        let mut map = CombinatorialMap::new();
        let a = map.new_face(3).unwrap();
        let mut mutation = Mutation::from(&mut map);
        mutation.new_face(2).unwrap();
        // Corrupt the map behind the mutation API.
        mutation.map.phi2[a.index()] = Dart::from_index(3);

        assert!(matches!(
            mutation.commit(),
            Err(MapError::InconsistentPermutation {
                kind: OrbitKind::Edge,
                ..
            })
        ));
        assert_eq!(3, map.len());
        assert!(map.validate().is_ok());
    }
}
