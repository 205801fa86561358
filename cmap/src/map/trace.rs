use std::collections::HashSet;

use crate::map::dart::Dart;

/// Trace of an orbit traversal.
pub trait Trace<T> {
    /// Inserts the given breadcrumb into the trace.
    ///
    /// If an intersection with the trace is detected, then this function
    /// returns `false` and otherwise returns `true` (similarly to collections
    /// like `HashSet`). If `false` is returned, then the traversal should
    /// terminate.
    fn insert(&mut self, breadcrumb: T) -> bool;
}

/// Trace that detects the first breadcrumb that is encountered.
///
/// This trace only stores the first breadcrumb in a traversal and should
/// **not** be used when traversing a map with unknown consistency, because it
/// may never signal that the traversal should terminate. Pair it with a step
/// limit.
#[derive(Clone, Copy, Debug)]
pub struct TraceFirst<T>
where
    T: Copy,
{
    breadcrumb: Option<T>,
}

impl<T> Default for TraceFirst<T>
where
    T: Copy,
{
    fn default() -> Self {
        TraceFirst { breadcrumb: None }
    }
}

impl<T> Trace<T> for TraceFirst<T>
where
    T: Copy + Eq,
{
    fn insert(&mut self, breadcrumb: T) -> bool {
        match self.breadcrumb {
            Some(intersection) => intersection != breadcrumb,
            None => {
                self.breadcrumb = Some(breadcrumb);
                true
            }
        }
    }
}

/// Trace that detects any breadcrumb that has been previously encountered.
///
/// This trace stores all breadcrumbs and detects any and all collisions. It is
/// used to traverse a single orbit without allocating storage proportional to
/// the entire map.
#[derive(Clone, Debug)]
pub struct TraceAny<T>
where
    T: Copy + Eq + std::hash::Hash,
{
    breadcrumbs: HashSet<T>,
}

impl<T> Default for TraceAny<T>
where
    T: Copy + Eq + std::hash::Hash,
{
    fn default() -> Self {
        TraceAny {
            breadcrumbs: HashSet::new(),
        }
    }
}

impl<T> Trace<T> for TraceAny<T>
where
    T: Copy + Eq + std::hash::Hash,
{
    fn insert(&mut self, breadcrumb: T) -> bool {
        self.breadcrumbs.insert(breadcrumb)
    }
}

/// Trace over all darts of a map backed by a bitset.
///
/// The bitset is sized to the number of darts and is shared by every orbit of
/// a partition, so each dart is visited at most once by the whole partition.
#[derive(Clone, Debug)]
pub struct TraceBits {
    bits: Vec<u64>,
    len: usize,
}

impl TraceBits {
    pub fn with_capacity(capacity: usize) -> Self {
        TraceBits {
            bits: vec![0; (capacity + 63) / 64],
            len: 0,
        }
    }

    pub fn contains(&self, dart: Dart) -> bool {
        let index = dart.index();
        self.bits
            .get(index / 64)
            .map_or(false, |word| word & (1 << (index % 64)) != 0)
    }

    /// Gets the number of distinct darts in the trace.
    pub fn len(&self) -> usize {
        self.len
    }
}

impl Trace<Dart> for TraceBits {
    fn insert(&mut self, dart: Dart) -> bool {
        let index = dart.index();
        let word = index / 64;
        if word >= self.bits.len() {
            self.bits.resize(word + 1, 0);
        }
        let mask = 1 << (index % 64);
        if self.bits[word] & mask != 0 {
            false
        }
        else {
            self.bits[word] |= mask;
            self.len += 1;
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::map::dart::Dart;
    use crate::map::trace::{Trace, TraceAny, TraceBits, TraceFirst};

    #[test]
    fn trace_first_detects_only_first() {
        let mut trace = TraceFirst::default();

        assert!(trace.insert(1u32));
        assert!(trace.insert(2));
        assert!(trace.insert(2));
        assert!(!trace.insert(1));
    }

    #[test]
    fn trace_any_detects_all() {
        let mut trace = TraceAny::default();

        assert!(trace.insert(1u32));
        assert!(trace.insert(2));
        assert!(!trace.insert(2));
        assert!(!trace.insert(1));
    }

    #[test]
    fn dart_traces_start_empty() {
        let mut first = TraceFirst::<Dart>::default();
        let mut any = TraceAny::<Dart>::default();

        for trace in [&mut first as &mut dyn Trace<Dart>, &mut any] {
            assert!(trace.insert(Dart::from_index(0)));
            assert!(!trace.insert(Dart::from_index(0)));
        }
    }

    #[test]
    fn trace_bits_spans_words() {
        let mut trace = TraceBits::with_capacity(70);

        assert!(trace.insert(Dart::from_index(0)));
        assert!(trace.insert(Dart::from_index(69)));
        assert!(!trace.insert(Dart::from_index(69)));
        assert!(trace.insert(Dart::from_index(128)));
        assert!(trace.contains(Dart::from_index(128)));
        assert!(!trace.contains(Dart::from_index(64)));
        assert_eq!(3, trace.len());
    }
}
