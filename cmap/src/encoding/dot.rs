//! [DOT] dumps of orbit incidence.
//!
//! The dump is a directed graph from a root node `S` to every face, from each
//! face to the edges bounding it, and from each edge to the vertices at the
//! source of its darts. Nodes are named by the index of their orbit in the
//! corresponding partition. Lines are emitted in sorted order and without
//! duplicates, so the dump of a map is deterministic.
//!
//! ```text
//! digraph cmap {
//!     S -> face_0;
//!     face_0 -> edge_0;
//!     edge_0 -> vertex_0;
//! }
//! ```
//!
//! The format is not stable.
//!
//! [DOT]: https://graphviz.org/doc/info/lang.html

use std::collections::BTreeSet;
use std::io::{self, Write};

use crate::map::{CombinatorialMap, OptionExt as _, OrbitKind};

pub trait ToDot {
    fn to_dot<W>(&self, sink: W) -> io::Result<()>
    where
        W: Write;
}

impl ToDot for CombinatorialMap {
    fn to_dot<W>(&self, mut sink: W) -> io::Result<()>
    where
        W: Write,
    {
        let vertices = self.partition(OrbitKind::Vertex);
        let edges = self.partition(OrbitKind::Edge);
        let faces = self.partition(OrbitKind::Face);

        let mut incidence = BTreeSet::new();
        let mut adjacency = BTreeSet::new();
        for (face, orbit) in faces.iter().enumerate() {
            for dart in orbit.iter().cloned() {
                let edge = edges.orbit_index(dart).expect_consistent();
                let vertex = vertices.orbit_index(dart).expect_consistent();
                incidence.insert((face, edge));
                adjacency.insert((edge, vertex));
            }
        }

        writeln!(sink, "digraph cmap {{")?;
        for face in 0..faces.len() {
            writeln!(sink, "\tS -> face_{};", face)?;
        }
        for (face, edge) in incidence {
            writeln!(sink, "\tface_{} -> edge_{};", face, edge)?;
        }
        for (edge, vertex) in adjacency {
            writeln!(sink, "\tedge_{} -> vertex_{};", edge, vertex)?;
        }
        writeln!(sink, "}}")
    }
}

#[cfg(test)]
mod tests {
    use crate::encoding::dot::ToDot;
    use crate::map::CombinatorialMap;

    fn dot(map: &CombinatorialMap) -> String {
        let mut sink = Vec::new();
        map.to_dot(&mut sink).unwrap();
        String::from_utf8(sink).unwrap()
    }

    #[test]
    fn open_triangle() {
        let mut map = CombinatorialMap::new();
        map.new_face(3).unwrap();

        assert_eq!(
            "digraph cmap {\n\
             \tS -> face_0;\n\
             \tface_0 -> edge_0;\n\
             \tface_0 -> edge_1;\n\
             \tface_0 -> edge_2;\n\
             \tedge_0 -> vertex_0;\n\
             \tedge_1 -> vertex_1;\n\
             \tedge_2 -> vertex_2;\n\
             }\n",
            dot(&map)
        );
    }

    #[test]
    fn shared_edge_is_emitted_once_per_face() {
        let mut map = CombinatorialMap::new();
        let a = map.new_face(3).unwrap();
        let b = map.new_face(3).unwrap();
        map.sew_phi2(a, b).unwrap();
        let dot = dot(&map);

        assert_eq!(2, dot.matches("S -> face_").count());
        assert_eq!(1, dot.matches("face_0 -> edge_0;").count());
        assert_eq!(1, dot.matches("face_1 -> edge_0;").count());
        // Both darts of the shared edge leave distinct vertices.
        assert_eq!(2, dot.matches("edge_0 -> vertex_").count());
    }

    #[test]
    fn empty_map() {
        assert_eq!("digraph cmap {\n}\n", dot(&CombinatorialMap::new()));
    }
}
