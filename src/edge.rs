//! A module for working with edges.

/// A pair of vertices representing a connection between two brain regions (or any other pair of
/// graph vertices). The pair is ordered; whether `(a, b)` and `(b, a)` denote the same connection
/// is decided by the graph's directedness, see [`canonical`](Edge::canonical).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Edge<T> {
    source: T,
    target: T,
}

impl<T> Edge<T> {
    /// Creates a new edge from two vertices.
    ///
    /// # Examples
    ///
    /// ```
    /// use connectoscope::edge::Edge;
    ///
    /// let edge = Edge::new("AAA_L", "ACAv_L");
    /// assert_eq!(edge.source(), &"AAA_L");
    /// ```
    pub fn new(source: T, target: T) -> Self {
        Self { source, target }
    }

    /// Returns the first vertex forming the edge.
    pub fn source(&self) -> &T {
        &self.source
    }

    /// Returns the second vertex forming the edge.
    pub fn target(&self) -> &T {
        &self.target
    }

    /// Returns whether the edge contains the given vertex.
    ///
    /// # Examples
    ///
    /// ```
    /// use connectoscope::edge::Edge;
    ///
    /// let edge = Edge::new("a", "b");
    ///
    /// assert_eq!(edge.contains(&"a"), true);
    /// assert_eq!(edge.contains(&"b"), true);
    /// assert_eq!(edge.contains(&"c"), false);
    /// ```
    pub fn contains(&self, vertex: &T) -> bool
    where
        T: PartialEq,
    {
        self.source() == vertex || self.target() == vertex
    }

    /// Returns the edge with its endpoints swapped.
    pub fn reversed(self) -> Self {
        Self {
            source: self.target,
            target: self.source,
        }
    }

    /// Returns the edge with its endpoints sorted by `T`'s implementation of `Ord`.
    ///
    /// Undirected graphs store edges in canonical form so that `(a, b)` and `(b, a)` collapse to
    /// a single key.
    ///
    /// # Examples
    ///
    /// ```
    /// use connectoscope::edge::Edge;
    ///
    /// assert_eq!(Edge::new("b", "a").canonical(), Edge::new("a", "b"));
    /// assert_eq!(Edge::new("a", "b").canonical(), Edge::new("a", "b"));
    /// ```
    pub fn canonical(self) -> Self
    where
        T: Ord,
    {
        if self.source <= self.target {
            self
        } else {
            self.reversed()
        }
    }
}
