use std::fmt::{self, Display, Formatter};

/// Key of a dart in a [`CombinatorialMap`].
///
/// Darts are opaque indices into the flat storage of the map that allocated
/// them. A dart carries no geometry; it only participates in the $\phi_1$ and
/// $\phi_2$ relations. Darts are never removed, so a dart remains valid for the
/// lifetime of its map.
///
/// Darts from one map are meaningless in another. Mutators reject darts that
/// are out of bounds with [`MapError::DartNotFound`].
///
/// [`CombinatorialMap`]: crate::map::CombinatorialMap
/// [`MapError::DartNotFound`]: crate::map::MapError::DartNotFound
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Dart(usize);

impl Dart {
    pub(in crate::map) fn from_index(index: usize) -> Self {
        Dart(index)
    }

    /// Gets the index of the dart in the storage of its map.
    pub fn index(self) -> usize {
        self.0
    }
}

impl Display for Dart {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        write!(formatter, "d{}", self.0)
    }
}

impl From<Dart> for usize {
    fn from(dart: Dart) -> Self {
        dart.0
    }
}
