//! A module for performing the multi-threaded computation of betweenness.

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
    thread,
};

use crate::graph::{GraphIndex, MAX_NUM_THREADS, MIN_NUM_THREADS};

/// Accumulates the betweenness contributions of all shortest paths rooted at one vertex.
///
/// This is an implementation of Ulrik Brandes's
/// A Faster Algorithm for Betweenness Centrality
/// http://snap.stanford.edu/class/cs224w-readings/brandes01centrality.pdf
/// page 10, "Algorithm 1: Betweenness centrality in unweighted graphs"
fn betweenness_for_vertex(
    index: usize,
    neighbours: &[Vec<GraphIndex>],
    betweenness_count: &mut [f64],
) {
    let num_vertices = neighbours.len();

    let mut sigma: Vec<f64> = vec![0.0; num_vertices];
    let mut distance: Vec<usize> = vec![num_vertices + 1; num_vertices];
    let mut predecessors: Vec<Vec<usize>> = vec![Vec::new(); num_vertices];
    let mut delta: Vec<f64> = vec![0.0; num_vertices];
    let mut queue: VecDeque<usize> = VecDeque::new();
    let mut stack: Vec<usize> = Vec::new();

    sigma[index] = 1.0;
    distance[index] = 0;
    queue.push_back(index);

    while let Some(v) = queue.pop_front() {
        stack.push(v);

        for w in &neighbours[v] {
            let w = *w as usize;
            if distance[w] == num_vertices + 1 {
                distance[w] = distance[v] + 1;
                queue.push_back(w);
            }
            if distance[w] == distance[v] + 1 {
                sigma[w] += sigma[v];
                predecessors[w].push(v);
            }
        }
    }

    // Vertices are popped in order of non-increasing distance from the root, so the dependency
    // of each vertex is complete before it is propagated to its predecessors.
    while let Some(w) = stack.pop() {
        for i in 0..predecessors[w].len() {
            let v = predecessors[w][i];
            delta[v] += sigma[v] / sigma[w] * (1.0 + delta[w]);
        }
        if w != index {
            betweenness_count[w] += delta[w];
        }
    }
}

/// The thread task: grabs the next unprocessed vertex, accumulating into a thread-local count
/// vector. Exits when no vertices remain, returning the accumulated counts.
fn betweenness_task(
    counter: Arc<Mutex<usize>>,
    neighbours: Arc<Vec<Vec<GraphIndex>>>,
) -> Vec<f64> {
    let num_vertices = neighbours.len();
    let mut betweenness_count: Vec<f64> = vec![0.0; num_vertices];

    loop {
        let mut counter = counter.lock().unwrap();
        let index: usize = *counter;
        *counter += 1;
        drop(counter);

        if index < num_vertices {
            betweenness_for_vertex(index, &neighbours, &mut betweenness_count);
        } else {
            break;
        }
    }

    betweenness_count
}

/// Computes the betweenness count of every vertex given per-vertex neighbour lists.
///
/// Called by the graph method `betweenness_centrality`, which owns the mapping between vertices
/// and indices. Responsible for:
/// - setting up the shared data passed to the threads
/// - spawning the threads and collecting their results
/// - summing the per-thread counts and applying the normalization divisor
pub(crate) fn compute_betweenness(
    neighbours: Vec<Vec<GraphIndex>>,
    mut num_threads: usize,
    normalize: bool,
) -> Vec<f64> {
    num_threads = num_threads.clamp(MIN_NUM_THREADS, MAX_NUM_THREADS);

    let num_vertices = neighbours.len();

    // With fewer than three vertices there are no intermediate vertices and the normalization
    // divisor is degenerate.
    if num_vertices < 3 {
        return vec![0.0; num_vertices];
    }

    let mut betweenness_count: Vec<f64> = vec![0.0; num_vertices];

    let mut handles = Vec::with_capacity(num_threads);
    let wrapped_neighbours = Arc::new(neighbours);
    let wrapped_counter = Arc::new(Mutex::new(0));

    for _ in 0..num_threads {
        let counter = Arc::clone(&wrapped_counter);
        let neighbours = Arc::clone(&wrapped_neighbours);
        let handle = thread::spawn(move || betweenness_task(counter, neighbours));
        handles.push(handle);
    }

    let divisor: f64 = if normalize {
        ((num_vertices - 1) * (num_vertices - 2)) as f64
    } else {
        // Non-normalized: every pair is counted from both endpoints, so we must divide by two.
        2.0
    };
    for handle in handles {
        let counts = handle.join().unwrap();
        for (total, count) in betweenness_count.iter_mut().zip(counts) {
            *total += count / divisor;
        }
    }

    betweenness_count
}

#[cfg(test)]
mod tests {
    use super::*;

    // A path graph: 0 - 1 - 2 - 3.
    fn path_neighbours() -> Vec<Vec<GraphIndex>> {
        vec![vec![1], vec![0, 2], vec![1, 3], vec![2]]
    }

    #[test]
    fn empty_and_tiny_inputs() {
        assert!(compute_betweenness(vec![], 2, true).is_empty());
        assert_eq!(compute_betweenness(vec![vec![1], vec![0]], 2, true), [0.0, 0.0]);
    }

    #[test]
    fn path_graph_normalized() {
        let scores = compute_betweenness(path_neighbours(), 2, true);

        assert_eq!(scores, [0.0, 2.0 / 3.0, 2.0 / 3.0, 0.0]);
    }

    #[test]
    fn path_graph_raw_counts() {
        let scores = compute_betweenness(path_neighbours(), 2, false);

        assert_eq!(scores, [0.0, 2.0, 2.0, 0.0]);
    }

    #[test]
    fn thread_count_is_irrelevant_to_result() {
        let single = compute_betweenness(path_neighbours(), 1, true);
        let many = compute_betweenness(path_neighbours(), 64, true);

        assert_eq!(single, many);
    }
}
