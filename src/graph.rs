//! A module for working with weighted graphs.

use std::{
    collections::{BTreeMap, HashMap, HashSet},
    fmt::Debug,
    hash::Hash,
};

use itertools::Itertools;
use nalgebra::DMatrix;

use crate::{betweenness::compute_betweenness, edge::Edge};

pub(crate) type GraphIndex = u32;

pub(crate) const MIN_NUM_THREADS: usize = 1;
pub(crate) const MAX_NUM_THREADS: usize = 128;

/// A weighted graph, made up of edges.
///
/// The graph can be constructed in directed or undirected mode. In undirected mode, the edges
/// `(a, b)` and `(b, a)` are the same edge; in directed mode they are distinct. The per-node
/// statistics (degree, clustering coefficient, betweenness) are defined on the undirected
/// skeleton of the graph in either mode.
#[derive(Clone, Debug)]
pub struct Graph<T> {
    /// Whether `(a, b)` and `(b, a)` are distinct edges.
    directed: bool,
    /// The edges in the graph and their weights. Undirected edges are stored in canonical form.
    weights: HashMap<Edge<T>, f64>,
    /// A mapping of vertices to their indices to be used when constructing the various matrices
    /// representing the graph.
    ///
    /// The use of a `BTreeMap` means we need the `Ord` bound on `T`. The sorted collection allows
    /// us to maintain some form of order between computations, which can be useful for debugging.
    index: Option<BTreeMap<T, usize>>,
    /// Cache the weighted adjacency matrix when possible.
    adjacency_matrix: Option<DMatrix<f64>>,
    /// Cache the binary undirected adjacency matrix (the skeleton) when possible.
    skeleton_matrix: Option<DMatrix<f64>>,
    /// Cache the degree matrix when possible.
    degree_matrix: Option<DMatrix<f64>>,
}

impl<T> Default for Graph<T>
where
    T: Copy + Eq + Hash + Ord + Debug,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Graph<T>
where
    T: Copy + Eq + Hash + Ord + Debug,
{
    /// Creates an empty undirected graph.
    ///
    /// # Examples
    ///
    /// ```
    /// use connectoscope::graph::Graph;
    ///
    /// let graph: Graph<&str> = Graph::new();
    /// ```
    pub fn new() -> Self {
        Self {
            directed: false,
            weights: Default::default(),
            index: None,
            adjacency_matrix: None,
            skeleton_matrix: None,
            degree_matrix: None,
        }
    }

    /// Creates an empty directed graph.
    pub fn directed() -> Self {
        Self {
            directed: true,
            ..Self::new()
        }
    }

    /// Returns whether the graph is directed.
    pub fn is_directed(&self) -> bool {
        self.directed
    }

    /// Inserts an edge into the graph with a weight of `1.0` and returns whether it was newly
    /// inserted.
    ///
    /// # Examples
    ///
    /// ```
    /// use connectoscope::edge::Edge;
    /// use connectoscope::graph::Graph;
    ///
    /// let mut graph = Graph::new();
    ///
    /// assert!(graph.insert(Edge::new("a", "b")));
    /// // The graph is undirected, so the reversed edge is the same edge.
    /// assert!(!graph.insert(Edge::new("b", "a")));
    /// ```
    pub fn insert(&mut self, edge: Edge<T>) -> bool {
        self.insert_weighted(edge, 1.0)
    }

    /// Inserts a weighted edge into the graph and returns whether it was newly inserted.
    ///
    /// Inserting an existing edge updates its weight.
    pub fn insert_weighted(&mut self, edge: Edge<T>, weight: f64) -> bool {
        let is_inserted = self.weights.insert(self.key(edge), weight).is_none();

        // Delete the cached objects on mutation because we can't reliably update them from the
        // new connection alone.
        if self.index.is_some() {
            self.clear_cache()
        }

        is_inserted
    }

    /// Inserts a subset of `(hub, leaf)` edges into the graph.
    pub fn insert_subset(&mut self, hub: T, leaves: &[T]) {
        for leaf in leaves {
            self.insert(Edge::new(hub, *leaf));
        }
    }

    /// Removes an edge from the graph and returns whether it was present.
    ///
    /// # Examples
    ///
    /// ```
    /// use connectoscope::edge::Edge;
    /// use connectoscope::graph::Graph;
    ///
    /// let mut graph = Graph::new();
    /// graph.insert(Edge::new("a", "b"));
    ///
    /// assert_eq!(graph.remove(&Edge::new("a", "b")), true);
    /// assert_eq!(graph.remove(&Edge::new("a", "c")), false);
    /// ```
    pub fn remove(&mut self, edge: &Edge<T>) -> bool {
        let is_removed = self.weights.remove(&self.key(*edge)).is_some();

        if is_removed && self.index.is_some() {
            self.clear_cache()
        }

        is_removed
    }

    /// Checks if the graph contains an edge.
    pub fn contains(&self, edge: &Edge<T>) -> bool {
        self.weights.contains_key(&self.key(*edge))
    }

    /// Returns the weight of an edge, if present.
    pub fn weight(&self, edge: &Edge<T>) -> Option<f64> {
        self.weights.get(&self.key(*edge)).copied()
    }

    /// Returns the edges and their weights, sorted by endpoints.
    ///
    /// The sort keeps figure rendering deterministic for a given graph.
    pub fn edges(&self) -> Vec<(Edge<T>, f64)> {
        let mut edges: Vec<(Edge<T>, f64)> = self.weights.iter().map(|(e, w)| (*e, *w)).collect();
        edges.sort_by(|(a, _), (b, _)| a.cmp(b));

        edges
    }

    /// Returns the vertices contained in the set of edges, sorted.
    pub fn vertices(&self) -> Vec<T> {
        let mut vertices: Vec<T> = self.vertices_from_edges().into_iter().collect();
        vertices.sort();

        vertices
    }

    /// Returns the vertex count of the graph.
    ///
    /// This call constructs the collection of vertices from the collection of edges. This is
    /// because the vertex set can't accurately be updated on the basis of the addition or the
    /// removal of an edge alone.
    ///
    /// # Examples
    ///
    /// ```
    /// use connectoscope::edge::Edge;
    /// use connectoscope::graph::Graph;
    ///
    /// let mut graph = Graph::new();
    /// graph.insert(Edge::new("a", "b"));
    ///
    /// assert_eq!(graph.vertex_count(), 2);
    /// ```
    pub fn vertex_count(&self) -> usize {
        self.vertices_from_edges().len()
    }

    /// Returns the edge count of the graph.
    pub fn edge_count(&self) -> usize {
        self.weights.len()
    }

    /// Computes the density of the graph, the ratio of edges with respect to the maximum possible
    /// edges.
    ///
    /// # Examples
    ///
    /// ```
    /// use connectoscope::edge::Edge;
    /// use connectoscope::graph::Graph;
    ///
    /// let mut graph = Graph::new();
    ///
    /// graph.insert(Edge::new("a", "b"));
    /// assert_eq!(graph.density(), 1.0);
    ///
    /// graph.insert(Edge::new("a", "c"));
    /// assert_eq!(graph.density(), 2.0 / 3.0);
    /// ```
    pub fn density(&self) -> f64 {
        let vc = self.vertex_count() as f64;
        let ec = self.edge_count() as f64;

        // Total number of possible edges given a vertex count; an ordered pair in the directed
        // case, an unordered pair otherwise.
        let pec = if self.directed {
            vc * (vc - 1.0)
        } else {
            vc * (vc - 1.0) / 2.0
        };

        ec / pec
    }

    /// Constructs the weighted adjacency matrix for this graph.
    ///
    /// Rows and columns are ordered by `T`'s implementation of `Ord`. For undirected graphs the
    /// matrix is symmetric; for directed graphs each edge only sets its `(source, target)` entry.
    ///
    /// # Examples
    ///
    /// ```
    /// use nalgebra::dmatrix;
    /// use connectoscope::edge::Edge;
    /// use connectoscope::graph::Graph;
    ///
    /// let mut graph = Graph::new();
    /// graph.insert_weighted(Edge::new("a", "b"), 0.5);
    /// assert_eq!(
    ///     graph.adjacency_matrix(),
    ///     dmatrix![0.0, 0.5;
    ///              0.5, 0.0]
    /// );
    /// ```
    pub fn adjacency_matrix(&mut self) -> DMatrix<f64> {
        // Check the cache.
        if let Some(matrix) = self.adjacency_matrix.clone() {
            return matrix;
        }

        if self.index.is_none() {
            self.generate_index();
        }

        // Safety: the previous call guarantees the index has been generated and stored.
        let index = self.index.as_ref().unwrap();
        let n = index.len();
        let mut matrix = DMatrix::<f64>::zeros(n, n);

        for (edge, weight) in &self.weights {
            // Safety: get the indices for each edge in the graph, these must be present as the
            // index was generated from this set of edges.
            let i = *index.get(edge.source()).unwrap();
            let j = *index.get(edge.target()).unwrap();

            matrix[(i, j)] = *weight;
            if !self.directed {
                matrix[(j, i)] = *weight;
            }
        }

        // Cache the matrix.
        self.adjacency_matrix = Some(matrix.clone());

        matrix
    }

    /// Constructs the degree matrix for this graph.
    ///
    /// The degree of a vertex is its connection count in the undirected skeleton, so for directed
    /// graphs reciprocal edges count once.
    ///
    /// # Examples
    ///
    /// ```
    /// use nalgebra::dmatrix;
    /// use connectoscope::edge::Edge;
    /// use connectoscope::graph::Graph;
    ///
    /// let mut graph = Graph::new();
    /// graph.insert(Edge::new("a", "b"));
    /// graph.insert(Edge::new("a", "c"));
    /// assert_eq!(
    ///     graph.degree_matrix(),
    ///     dmatrix![2.0, 0.0, 0.0;
    ///              0.0, 1.0, 0.0;
    ///              0.0, 0.0, 1.0]
    /// );
    /// ```
    pub fn degree_matrix(&mut self) -> DMatrix<f64> {
        // Check the cache.
        if let Some(matrix) = self.degree_matrix.clone() {
            return matrix;
        }

        let skeleton = self.skeleton_matrix();
        let n = skeleton.nrows();
        let mut matrix = DMatrix::<f64>::zeros(n, n);

        for (i, row) in skeleton.row_iter().enumerate() {
            // Set the diagonal to be the sum of connections in that row. The index isn't
            // necessary here since the rows are visited in order and the skeleton is ordered
            // after the index.
            matrix[(i, i)] = row.sum()
        }

        // Cache the matrix.
        self.degree_matrix = Some(matrix.clone());

        matrix
    }

    /// Returns the difference between the highest and lowest degree centrality in the graph.
    ///
    /// Returns an `f64`, though the value should be a natural number.
    pub fn degree_centrality_delta(&mut self) -> f64 {
        let degree_matrix = self.degree_matrix();

        if degree_matrix.is_empty() {
            return 0.0;
        }

        let max = degree_matrix.diagonal().max();
        let min = degree_matrix.diagonal().min();

        max - min
    }

    /// Returns a mapping of vertices to their degree centrality (number of connections) in the
    /// graph.
    ///
    /// # Examples
    ///
    /// ```
    /// use connectoscope::edge::Edge;
    /// use connectoscope::graph::Graph;
    ///
    /// let mut graph = Graph::new();
    /// graph.insert(Edge::new("a", "b"));
    /// graph.insert(Edge::new("a", "c"));
    ///
    /// assert_eq!(graph.degree_centrality().get("a"), Some(&2));
    /// ```
    pub fn degree_centrality(&mut self) -> HashMap<T, u32> {
        let degree_matrix = self.degree_matrix();

        // Safety: building the degree matrix guarantees the index has been generated and stored.
        self.index
            .as_ref()
            .unwrap()
            .keys()
            .zip(degree_matrix.diagonal().iter())
            .map(|(vertex, dc)| (*vertex, *dc as u32))
            .collect()
    }

    /// Returns a mapping of vertices to their clustering coefficient, the fraction of possible
    /// connections between a vertex's neighbours that are present.
    ///
    /// Vertices with fewer than two neighbours have a coefficient of zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use connectoscope::edge::Edge;
    /// use connectoscope::graph::Graph;
    ///
    /// let mut graph = Graph::new();
    ///
    /// // A triangle with a pendant vertex.
    /// graph.insert(Edge::new("a", "b"));
    /// graph.insert(Edge::new("b", "c"));
    /// graph.insert(Edge::new("a", "c"));
    /// graph.insert(Edge::new("c", "d"));
    ///
    /// let coefficients = graph.clustering_coefficients();
    /// assert_eq!(coefficients.get("a"), Some(&1.0));
    /// assert_eq!(coefficients.get("c"), Some(&(1.0 / 3.0)));
    /// assert_eq!(coefficients.get("d"), Some(&0.0));
    /// ```
    pub fn clustering_coefficients(&mut self) -> HashMap<T, f64> {
        let skeleton = self.skeleton_matrix();
        let neighbours = self.neighbour_indices();

        let mut coefficients = HashMap::with_capacity(neighbours.len());

        // Safety: building the skeleton guarantees the index has been generated and stored.
        for (vertex, i) in self.index.as_ref().unwrap() {
            let k = neighbours[*i].len();
            if k < 2 {
                coefficients.insert(*vertex, 0.0);
                continue;
            }

            // Count the connections between distinct pairs of neighbours.
            let links = neighbours[*i]
                .iter()
                .tuple_combinations()
                .filter(|(u, w)| skeleton[(**u as usize, **w as usize)] != 0.0)
                .count();

            coefficients.insert(*vertex, 2.0 * links as f64 / (k * (k - 1)) as f64);
        }

        coefficients
    }

    /// Returns a mapping of vertices to their normalized betweenness centrality, the fraction of
    /// shortest paths between other vertex pairs passing through the vertex.
    ///
    /// The computation is multi-threaded, `num_threads` is clamped to `1..=128`.
    pub fn betweenness_centrality(&mut self, num_threads: usize) -> HashMap<T, f64> {
        let neighbours = self.neighbour_indices();
        let scores = compute_betweenness(neighbours, num_threads, true);

        // Safety: building the neighbour lists guarantees the index has been generated and
        // stored.
        self.index
            .as_ref()
            .unwrap()
            .keys()
            .zip(scores)
            .map(|(vertex, score)| (*vertex, score))
            .collect()
    }

    //
    // Private
    //

    /// Returns the storage key for an edge: canonical form unless the graph is directed.
    fn key(&self, edge: Edge<T>) -> Edge<T> {
        if self.directed {
            edge
        } else {
            edge.canonical()
        }
    }

    /// Clears the computed state.
    ///
    /// This should be called every time the set of edges is mutated since the cached state won't
    /// correspond to the new graph.
    fn clear_cache(&mut self) {
        self.index = None;
        self.adjacency_matrix = None;
        self.skeleton_matrix = None;
        self.degree_matrix = None;
    }

    /// Returns the set of unique vertices contained within the set of edges.
    fn vertices_from_edges(&self) -> HashSet<T> {
        let mut vertices: HashSet<T> = HashSet::new();
        for edge in self.weights.keys() {
            // Using a hashset guarantees uniqueness.
            vertices.insert(*edge.source());
            vertices.insert(*edge.target());
        }

        vertices
    }

    /// Constructs and stores an index of vertices for this set of edges.
    ///
    /// The index will be sorted by `T`'s implementation of `Ord`.
    fn generate_index(&mut self) {
        // It should be impossible to call this function if the cache is not empty.
        debug_assert!(self.index.is_none());

        let index: BTreeMap<T, usize> = self
            .vertices()
            .iter()
            .enumerate()
            .map(|(i, &vertex)| (vertex, i))
            .collect();

        self.index = Some(index);
    }

    /// Constructs the binary undirected adjacency matrix the statistics are computed on.
    ///
    /// An entry is `1.0` when an edge exists in either direction.
    fn skeleton_matrix(&mut self) -> DMatrix<f64> {
        // Check the cache.
        if let Some(matrix) = self.skeleton_matrix.clone() {
            return matrix;
        }

        if self.index.is_none() {
            self.generate_index();
        }

        // Safety: the previous call guarantees the index has been generated and stored.
        let index = self.index.as_ref().unwrap();
        let n = index.len();
        let mut matrix = DMatrix::<f64>::zeros(n, n);

        for edge in self.weights.keys() {
            // Safety: the index was generated from this set of edges.
            let i = *index.get(edge.source()).unwrap();
            let j = *index.get(edge.target()).unwrap();

            matrix[(i, j)] = 1.0;
            matrix[(j, i)] = 1.0;
        }

        // Cache the matrix.
        self.skeleton_matrix = Some(matrix.clone());

        matrix
    }

    /// Returns per-vertex neighbour lists over the undirected skeleton, ordered after the index.
    fn neighbour_indices(&mut self) -> Vec<Vec<GraphIndex>> {
        let skeleton = self.skeleton_matrix();
        let n = skeleton.nrows();

        let mut neighbours: Vec<Vec<GraphIndex>> = vec![Vec::new(); n];
        for i in 0..n {
            for j in 0..n {
                if skeleton[(i, j)] != 0.0 {
                    neighbours[i].push(j as GraphIndex);
                }
            }
        }

        neighbours
    }
}

#[cfg(test)]
mod tests {
    use nalgebra::dmatrix;

    use super::*;

    macro_rules! graph {
          ($($path:expr),*) => {{
              let mut graph = Graph::new();

              $(
                  let mut iter = $path.into_iter().peekable();
                  while let (Some(a), Some(b)) = (iter.next(), iter.peek()) {
                      graph.insert(Edge::new(a, *b));
                  }

              )*

              graph
          }}
      }

    #[test]
    fn insert() {
        let mut graph = Graph::new();
        let edge = Edge::new("a", "b");

        assert!(graph.insert(edge));
        assert!(!graph.insert(edge));
        assert!(!graph.insert(edge.reversed()));
    }

    #[test]
    fn insert_directed() {
        let mut graph = Graph::directed();
        let edge = Edge::new("a", "b");

        assert!(graph.insert(edge));
        assert!(graph.insert(edge.reversed()));
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn insert_weighted_updates_weight() {
        let mut graph = Graph::new();
        let edge = Edge::new("a", "b");

        assert!(graph.insert_weighted(edge, 0.5));
        assert!(!graph.insert_weighted(edge.reversed(), 0.7));

        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.weight(&edge), Some(0.7));
    }

    #[test]
    fn remove() {
        let edge = Edge::new("a", "b");
        let uninserted_edge = Edge::new("a", "c");

        let mut graph = Graph::new();
        graph.insert(edge);

        assert!(graph.remove(&edge));
        assert!(!graph.remove(&uninserted_edge));
    }

    #[test]
    fn contains() {
        let mut graph = Graph::new();
        let edge = Edge::new("a", "b");

        graph.insert(edge);

        assert!(graph.contains(&edge));
        assert!(graph.contains(&edge.reversed()));
        assert!(!graph.contains(&Edge::new("b", "c")));
    }

    #[test]
    fn edges_are_sorted() {
        let mut graph = Graph::new();
        graph.insert_weighted(Edge::new("c", "a"), 2.0);
        graph.insert_weighted(Edge::new("a", "b"), 1.0);

        assert_eq!(
            graph.edges(),
            vec![
                (Edge::new("a", "b"), 1.0),
                (Edge::new("a", "c"), 2.0),
            ]
        );
    }

    #[test]
    fn vertex_count() {
        let mut graph = Graph::new();
        assert_eq!(graph.vertex_count(), 0);

        // Verify two new vertices get added when they don't yet exist in the graph.
        graph.insert(Edge::new("a", "b"));
        assert_eq!(graph.vertex_count(), 2);

        // Verify only one new vertex is added when one of them already exists in the graph.
        graph.insert(Edge::new("a", "c"));
        assert_eq!(graph.vertex_count(), 3);
    }

    #[test]
    fn density() {
        let mut graph = Graph::new();
        assert!(graph.density().is_nan());

        graph.insert(Edge::new("a", "b"));
        assert_eq!(graph.density(), 1.0);

        graph.insert(Edge::new("a", "c"));
        assert_eq!(graph.density(), 2.0 / 3.0);
    }

    #[test]
    fn adjacency_matrix() {
        let mut graph = Graph::new();
        assert_eq!(graph.adjacency_matrix(), dmatrix![]);

        graph.insert_weighted(Edge::new("a", "b"), 0.2);
        assert_eq!(
            graph.adjacency_matrix(),
            dmatrix![0.0, 0.2;
                     0.2, 0.0]
        );

        graph.insert_weighted(Edge::new("c", "a"), 0.4);
        assert_eq!(
            graph.adjacency_matrix(),
            dmatrix![0.0, 0.2, 0.4;
                     0.2, 0.0, 0.0;
                     0.4, 0.0, 0.0]
        );

        // Sanity check the index gets stored.
        assert!(graph.index.is_some());
    }

    #[test]
    fn adjacency_matrix_directed() {
        let mut graph = Graph::directed();
        graph.insert_weighted(Edge::new("b", "a"), 0.2);

        assert_eq!(
            graph.adjacency_matrix(),
            dmatrix![0.0, 0.0;
                     0.2, 0.0]
        );
    }

    #[test]
    fn degree_matrix() {
        let mut graph = Graph::new();
        assert_eq!(graph.degree_matrix(), dmatrix![]);

        graph.insert(Edge::new("a", "b"));
        assert_eq!(
            graph.degree_matrix(),
            dmatrix![1.0, 0.0;
                     0.0, 1.0]
        );

        graph.insert(Edge::new("a", "c"));
        assert_eq!(
            graph.degree_matrix(),
            dmatrix![2.0, 0.0, 0.0;
                     0.0, 1.0, 0.0;
                     0.0, 0.0, 1.0]
        );
    }

    #[test]
    fn degree_matrix_counts_reciprocal_edges_once() {
        let mut graph = Graph::directed();
        graph.insert(Edge::new("a", "b"));
        graph.insert(Edge::new("b", "a"));

        assert_eq!(
            graph.degree_matrix(),
            dmatrix![1.0, 0.0;
                     0.0, 1.0]
        );
    }

    #[test]
    fn degree_centrality_delta() {
        let mut graph = Graph::new();
        assert_eq!(graph.degree_centrality_delta(), 0.0);

        graph.insert(Edge::new("a", "b"));
        assert_eq!(graph.degree_centrality_delta(), 0.0);

        graph.insert(Edge::new("a", "c"));
        assert_eq!(graph.degree_centrality_delta(), 1.0);
    }

    #[test]
    fn degree_centrality() {
        let mut graph = Graph::new();
        assert!(graph.degree_centrality().is_empty());

        let (a, b, c) = ("a", "b", "c");
        graph.insert(Edge::new(a, b));
        let degree_centrality = graph.degree_centrality();

        assert_eq!(degree_centrality.get_key_value(a), Some((&a, &1)));
        assert_eq!(degree_centrality.get_key_value(b), Some((&b, &1)));
        assert_eq!(degree_centrality.len(), 2);

        graph.insert(Edge::new(a, c));
        let degree_centrality = graph.degree_centrality();

        assert_eq!(degree_centrality.get_key_value(a), Some((&a, &2)));
        assert_eq!(degree_centrality.get_key_value(b), Some((&b, &1)));
        assert_eq!(degree_centrality.get_key_value(c), Some((&c, &1)));
        assert_eq!(degree_centrality.len(), 3);
    }

    #[test]
    fn clustering_coefficients() {
        // A triangle with a pendant vertex hanging off "c".
        let mut graph = graph!(["a", "b", "c", "a"], ["c", "d"]);

        let coefficients = graph.clustering_coefficients();

        assert_eq!(coefficients.get("a"), Some(&1.0));
        assert_eq!(coefficients.get("b"), Some(&1.0));
        assert_eq!(coefficients.get("c"), Some(&(1.0 / 3.0)));
        assert_eq!(coefficients.get("d"), Some(&0.0));
    }

    #[test]
    fn clustering_coefficients_complete_graph() {
        let mut graph = Graph::new();
        for (u, v) in [0, 1, 2, 3].into_iter().tuple_combinations() {
            graph.insert(Edge::new(u, v));
        }

        let coefficients = graph.clustering_coefficients();
        assert!(coefficients.values().all(|&c| c == 1.0));
    }

    #[test]
    fn betweenness_centrality_path_graph() {
        let mut graph = graph!(["a", "b", "c", "d"]);

        let centralities = graph.betweenness_centrality(2);

        // The inner vertices of a path graph each sit on two of the three pairwise shortest
        // paths, normalized by (n - 1)(n - 2) / 2 = 3.
        assert_eq!(centralities.get("a"), Some(&0.0));
        assert_eq!(centralities.get("b"), Some(&(2.0 / 3.0)));
        assert_eq!(centralities.get("c"), Some(&(2.0 / 3.0)));
        assert_eq!(centralities.get("d"), Some(&0.0));
    }

    #[test]
    fn betweenness_centrality_star_graph() {
        let mut graph = Graph::new();
        graph.insert_subset("hub", &["a", "b", "c", "d"]);

        let centralities = graph.betweenness_centrality(2);

        // The hub sits on every one of the six leaf-pair shortest paths.
        assert_eq!(centralities.get("hub"), Some(&1.0));
        assert_eq!(centralities.get("a"), Some(&0.0));
    }

    #[test]
    fn cache_cleared_on_mutation() {
        let mut graph = Graph::new();
        graph.insert(Edge::new("a", "b"));

        let _ = graph.adjacency_matrix();
        assert!(graph.index.is_some());

        graph.insert(Edge::new("a", "c"));
        assert!(graph.index.is_none());
        assert!(graph.adjacency_matrix.is_none());
    }
}
