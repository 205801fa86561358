//! **cmap** is a library for representing the topology of polygonal meshes as
//! [combinatorial maps][cmap].
//!
//! A combinatorial map does not store vertices, edges, and faces as explicit
//! lists. Instead, it stores a flat set of atomic _darts_ and two relations
//! over them: the permutation $\phi_1$, whose cycles are faces, and the
//! involution $\phi_2$, whose cycles are edges. Vertices are orbits of the
//! composite $\phi_1 \circ \phi_2$. See the [`map`] module documentation.
//!
//! Geometry is attached to vertex orbits by an [`Embedding`], which can then be
//! triangulated into a [`MeshBuffer`] for rendering.
//!
//! # Examples
//!
//! Building a closed tetrahedron and computing its Euler characteristic:
//!
//! ```rust
//! use cmap::primitive;
//!
//! let tetrahedron = primitive::tetrahedron();
//! let map = &tetrahedron.map;
//!
//! assert_eq!(4, map.vertices().len());
//! assert_eq!(6, map.edges().len());
//! assert_eq!(4, map.faces().len());
//! assert_eq!(2, map.euler());
//! ```
//!
//! [cmap]: https://en.wikipedia.org/wiki/Combinatorial_map
//!
//! [`Embedding`]: crate::embedding::Embedding
//! [`MeshBuffer`]: crate::buffer::MeshBuffer
//! [`map`]: crate::map
#![allow(unknown_lints)] // Allow clippy lints.

pub mod buffer;
pub mod builder;
pub mod embedding;
pub mod encoding;
pub mod geometry;
pub mod map;
pub mod primitive;
pub mod transact;

pub use nalgebra;

pub mod prelude {
    //! Re-exports commonly used types and traits.
    //!
    //! Importing the contents of this module is recommended when building and
    //! sewing maps, as transactional edits are expressed through the
    //! `Transact` trait.

    pub use crate::encoding::dot::ToDot as _;
    pub use crate::map::{CombinatorialMap, Dart, MapError, OrbitKind, SewPolicy};
    pub use crate::transact::Transact as _;
    pub use crate::IteratorExt as _;
}

/// Extension methods for types implementing `Iterator`.
pub trait IteratorExt: Iterator + Sized {
    /// Provides an iterator over a window of duplets that includes the first
    /// value in the sequence at the beginning and end of the iteration.
    ///
    /// Given a collection of ordered elements $\\{a, b, c\\}$, this iterator
    /// yeilds the ordered items $\\{(a, b), (b, c), (c, a)\\}$.
    fn perimeter(self) -> Perimeter<Self>
    where
        Self::Item: Clone;
}

impl<I> IteratorExt for I
where
    I: Iterator,
{
    fn perimeter(self) -> Perimeter<I>
    where
        I::Item: Clone,
    {
        Perimeter::new(self)
    }
}

/// Iterator that produces a window of duplets over its input.
///
/// The duplets produced include the first value in the input sequence at both
/// the beginning and end of the iteration, forming a perimeter. A face of a map
/// given as the vertex indices $\\{a, b, c\\}$ is formed from the arcs
/// $\\{(a, b), (b, c), (c, a)\\}$.
pub struct Perimeter<I>
where
    I: Iterator,
    I::Item: Clone,
{
    input: I,
    first: Option<I::Item>,
    previous: Option<I::Item>,
}

impl<I> Perimeter<I>
where
    I: Iterator,
    I::Item: Clone,
{
    fn new(mut input: I) -> Self {
        let first = input.next();
        let previous = first.clone();
        Perimeter {
            input,
            first,
            previous,
        }
    }
}

impl<I> Iterator for Perimeter<I>
where
    I: Iterator,
    I::Item: Clone,
{
    type Item = (I::Item, I::Item);

    fn next(&mut self) -> Option<Self::Item> {
        let next = self.input.next();
        match (self.previous.clone(), next.or_else(|| self.first.take())) {
            (Some(a), Some(b)) => {
                self.previous = Some(b.clone());
                Some((a, b))
            }
            _ => None,
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        // The first item is emitted again to close the perimeter.
        let closing = usize::from(self.first.is_some());
        let (lower, upper) = self.input.size_hint();
        (
            lower.saturating_add(closing),
            upper.and_then(|upper| upper.checked_add(closing)),
        )
    }
}

#[cfg(test)]
mod tests {
    use crate::IteratorExt;

    #[test]
    fn perimeter_closes() {
        let arcs = [0usize, 1, 2].iter().cloned().perimeter().collect::<Vec<_>>();

        assert_eq!(vec![(0, 1), (1, 2), (2, 0)], arcs);
    }

    #[test]
    fn perimeter_of_single_item_is_loop() {
        let arcs = [7usize].iter().cloned().perimeter().collect::<Vec<_>>();

        assert_eq!(vec![(7, 7)], arcs);
    }

    #[test]
    fn perimeter_of_empty_input_is_empty() {
        assert_eq!(0, std::iter::empty::<usize>().perimeter().count());
    }

    #[test]
    fn perimeter_size_hint_includes_closing_arc() {
        let mut arcs = [0usize, 1, 2].iter().cloned().perimeter();

        assert_eq!((3, Some(3)), arcs.size_hint());
        arcs.next();
        arcs.next();
        assert_eq!((1, Some(1)), arcs.size_hint());
        assert_eq!(Some((2, 0)), arcs.next());
        assert_eq!((0, Some(0)), arcs.size_hint());
        assert_eq!(None, arcs.next());
        assert_eq!(
            (0, Some(0)),
            std::iter::empty::<usize>().perimeter().size_hint()
        );
        assert_eq!(3, [0usize, 1, 2].iter().cloned().perimeter().count());
    }
}
