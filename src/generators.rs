//! A module for generating synthetic comparison graphs.
//!
//! Every generator takes an explicit `Rng` so runs can be seeded and reproduced. Vertices are
//! `0..n`; since graphs are edge-defined, vertices left without any connection by a generator
//! don't appear in the result.

use std::collections::HashSet;

use nalgebra::{DMatrix, Point3};
use rand::Rng;

use crate::{edge::Edge, graph::Graph};

/// Generates an Erdos-Renyi graph G(n, p): every edge between distinct vertices independently
/// exists with probability `p`.
pub fn erdos_renyi(n: usize, p: f64, rng: &mut impl Rng) -> Graph<usize> {
    let p = p.clamp(0.0, 1.0);
    let mut graph = Graph::new();

    for u in 0..n {
        for v in (u + 1)..n {
            if rng.gen_bool(p) {
                graph.insert(Edge::new(u, v));
            }
        }
    }

    graph
}

/// Generates a Watts-Strogatz small-world graph: a ring lattice where each vertex connects to
/// its `k / 2` nearest neighbours on either side, with each lattice edge rewired to a uniformly
/// random endpoint with probability `beta`.
pub fn watts_strogatz(n: usize, k: usize, beta: f64, rng: &mut impl Rng) -> Graph<usize> {
    if n == 0 {
        return Graph::new();
    }

    let k = k.min(n - 1);
    let beta = beta.clamp(0.0, 1.0);

    let mut adjacency: Vec<HashSet<usize>> = vec![HashSet::new(); n];
    for j in 1..=k / 2 {
        for v in 0..n {
            let w = (v + j) % n;
            adjacency[v].insert(w);
            adjacency[w].insert(v);
        }
    }

    for j in 1..=k / 2 {
        for v in 0..n {
            if !rng.gen_bool(beta) {
                continue;
            }

            // A saturated vertex has nowhere left to rewire to.
            if adjacency[v].len() >= n - 1 {
                continue;
            }

            let mut w = rng.gen_range(0..n);
            while w == v || adjacency[v].contains(&w) {
                w = rng.gen_range(0..n);
            }

            let old = (v + j) % n;
            adjacency[v].remove(&old);
            adjacency[old].remove(&v);
            adjacency[v].insert(w);
            adjacency[w].insert(v);
        }
    }

    from_adjacency_sets(&adjacency)
}

/// Generates a Barabasi-Albert scale-free graph: vertices arrive one at a time and attach `m`
/// edges to existing vertices with probability proportional to their degree.
pub fn barabasi_albert(n: usize, m: usize, rng: &mut impl Rng) -> Graph<usize> {
    let mut graph = Graph::new();
    if m == 0 || n <= m {
        return graph;
    }

    // The first batch of targets is the initial vertex set; afterwards each endpoint of every
    // edge is recorded once, making a uniform draw from the list a degree-proportional draw.
    let mut targets: Vec<usize> = (0..m).collect();
    let mut repeated: Vec<usize> = Vec::new();

    for source in m..n {
        for target in &targets {
            graph.insert(Edge::new(source, *target));
        }

        repeated.extend(targets.iter());
        repeated.extend(std::iter::repeat(source).take(m));

        targets = preferential_targets(&repeated, m, rng);
    }

    graph
}

/// Generates a directed Barabasi-Albert variant in which each attachment is made reciprocal
/// with probability `p`, yielding a scale-free graph with a tunable fraction of symmetric
/// connections.
pub fn symmetric_barabasi_albert(n: usize, m: usize, p: f64, rng: &mut impl Rng) -> Graph<usize> {
    let p = p.clamp(0.0, 1.0);
    let mut graph = Graph::directed();
    if m == 0 || n <= m {
        return graph;
    }

    let mut targets: Vec<usize> = (0..m).collect();
    let mut repeated: Vec<usize> = Vec::new();

    for source in m..n {
        for target in &targets {
            graph.insert(Edge::new(source, *target));
            if rng.gen_bool(p) {
                graph.insert(Edge::new(*target, source));
            }
        }

        repeated.extend(targets.iter());
        repeated.extend(std::iter::repeat(source).take(m));

        targets = preferential_targets(&repeated, m, rng);
    }

    graph
}

/// Generates a Holme-Kim power-law-cluster graph: Barabasi-Albert attachment where each
/// preferential edge is followed, with probability `p`, by a triad-closing edge to one of the
/// new neighbour's neighbours.
pub fn powerlaw_cluster(n: usize, m: usize, p: f64, rng: &mut impl Rng) -> Graph<usize> {
    let p = p.clamp(0.0, 1.0);
    if m == 0 || n <= m {
        return Graph::new();
    }

    let mut adjacency: Vec<HashSet<usize>> = vec![HashSet::new(); n];
    let mut repeated: Vec<usize> = (0..m).collect();

    for source in m..n {
        let mut added = 0;
        while added < m {
            let target = repeated[rng.gen_range(0..repeated.len())];
            if target == source || adjacency[source].contains(&target) {
                continue;
            }

            adjacency[source].insert(target);
            adjacency[target].insert(source);
            repeated.push(source);
            repeated.push(target);
            added += 1;

            // Triad closure: connect to a random neighbour of the vertex just attached to.
            if added < m && rng.gen_bool(p) {
                let candidates: Vec<usize> = adjacency[target]
                    .iter()
                    .copied()
                    .filter(|w| *w != source && !adjacency[source].contains(w))
                    .collect();

                if let Some(w) = candidates.get(rng.gen_range(0..candidates.len().max(1))) {
                    adjacency[source].insert(*w);
                    adjacency[*w].insert(source);
                    repeated.push(source);
                    repeated.push(*w);
                    added += 1;
                }
            }
        }
    }

    from_adjacency_sets(&adjacency)
}

/// A biophysically inspired network: vertices embedded in the unit cube, wired with a
/// distance-decay, degree-preferring attachment rule.
#[derive(Clone, Debug)]
pub struct BiophysicalNet {
    /// The generated graph.
    pub graph: Graph<usize>,
    /// The binary adjacency matrix.
    pub adjacency: DMatrix<f64>,
    /// The pairwise Euclidean distance matrix.
    pub distances: DMatrix<f64>,
    /// The vertex positions the distances derive from.
    pub positions: Vec<Point3<f64>>,
}

/// Generates a biophysical graph of `n` vertices and exactly `n_edges` edges.
///
/// Vertices are placed uniformly at random in the unit cube. Edges are drawn one at a time: a
/// uniformly random source is connected to a target sampled with probability proportional to
/// `exp(-d / l) * (degree + 1)^power`, so short-range connections and hubs are both favoured.
pub fn biophysical(
    n: usize,
    n_edges: usize,
    l: f64,
    power: f64,
    rng: &mut impl Rng,
) -> BiophysicalNet {
    let positions: Vec<Point3<f64>> = (0..n)
        .map(|_| Point3::new(rng.gen::<f64>(), rng.gen::<f64>(), rng.gen::<f64>()))
        .collect();

    let distances = DMatrix::from_fn(n, n, |i, j| (positions[i] - positions[j]).norm());

    let mut adjacency = DMatrix::<f64>::zeros(n, n);
    let mut degrees = vec![0usize; n];
    let mut graph = Graph::new();

    let max_edges = n.saturating_mul(n.saturating_sub(1)) / 2;
    let n_edges = n_edges.min(max_edges);

    let mut weights = vec![0.0; n];
    while graph.edge_count() < n_edges {
        let source = rng.gen_range(0..n);

        let mut total = 0.0;
        for target in 0..n {
            weights[target] = if target == source || adjacency[(source, target)] != 0.0 {
                0.0
            } else {
                (-distances[(source, target)] / l).exp() * (degrees[target] + 1) as f64
            };
            total += weights[target];
        }

        // The source is saturated.
        if total == 0.0 {
            continue;
        }

        let mut draw = rng.gen::<f64>() * total;
        let mut target = n - 1;
        for (candidate, weight) in weights.iter().enumerate() {
            draw -= weight;
            if draw <= 0.0 {
                target = candidate;
                break;
            }
        }

        if graph.insert(Edge::new(source, target)) {
            adjacency[(source, target)] = 1.0;
            adjacency[(target, source)] = 1.0;
            degrees[source] += 1;
            degrees[target] += 1;
        }
    }

    BiophysicalNet {
        graph,
        adjacency,
        distances,
        positions,
    }
}

//
// Helpers
//

/// Draws `m` distinct vertices from the repeated-endpoints list; a uniform draw from the list
/// is a degree-proportional draw over vertices.
fn preferential_targets(repeated: &[usize], m: usize, rng: &mut impl Rng) -> Vec<usize> {
    let mut targets = HashSet::with_capacity(m);
    while targets.len() < m {
        targets.insert(repeated[rng.gen_range(0..repeated.len())]);
    }

    targets.into_iter().collect()
}

fn from_adjacency_sets(adjacency: &[HashSet<usize>]) -> Graph<usize> {
    let mut graph = Graph::new();
    for (u, neighbours) in adjacency.iter().enumerate() {
        for &v in neighbours {
            if u < v {
                graph.insert(Edge::new(u, v));
            }
        }
    }

    graph
}
