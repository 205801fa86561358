//! Serialization and encodings.
//!
//! Each encoding has a corresponding sub-module. The following table
//! summarizes the encodings supported by this crate:
//!
//! | Module | Encoding | Read | Write |
//! |--------|----------|------|-------|
//! | `dot`  | [DOT]    | No   | Yes   |
//!
//! Encodings are diagnostic. They describe the incidence of orbits in a map and
//! do not round-trip.
//!
//! [DOT]: https://graphviz.org/doc/info/lang.html

pub mod dot;
