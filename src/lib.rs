//! Connectoscope is a toolkit for analysing and rendering brain connectivity networks, though the
//! graph side applies more generally to weighted networks.
//!
//! # Basic usage
//!
//! The library is centered around the [`Graph`](graph::Graph) structure which can be constructed
//! from one or more [`Edge`](edge::Edge) instances, from a thresholded
//! [`WeightMatrix`](weights::WeightMatrix), or from one of the random
//! [`generators`](generators). Once constructed, various measurements and matrix representations
//! of the graph can be computed, plotted as histograms or rendered as a 3D scene.
//!
//! ```rust
//! use connectoscope::edge::Edge;
//! use connectoscope::graph::Graph;
//!
//! // Construct the graph instance.
//! let mut graph = Graph::new();
//!
//! // Insert some edges, note the IDs can be any type that is `Copy + Eq + Hash + Ord`.
//! graph.insert(Edge::new("VISp", "VISl"));
//! graph.insert_weighted(Edge::new("VISp", "AUDp"), 0.4);
//!
//! // Compute some metrics on that state of the graph.
//! let density = graph.density();
//! let clustering = graph.clustering_coefficients();
//!
//! // Matrices can be pretty printed...
//! println!("{}", graph.adjacency_matrix());
//! // ...outputs:
//! //  ┌             ┐
//! //  │   0   0 0.4 │
//! //  │   0   0   1 │
//! //  │ 0.4   1   0 │
//! //  └             ┘
//! ```

mod betweenness;
pub mod edge;
pub mod generators;
pub mod graph;
pub mod hist;
pub mod render;
pub mod weights;
