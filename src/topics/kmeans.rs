// Deterministic k-means over pre-computed embedding vectors.
//
// Seeding takes the first k distinct vectors in input order, so the same
// batch always clusters the same way. Assignment uses squared Euclidean
// distance with ties going to the lower cluster id. A cluster that loses all
// its members keeps its previous centroid. When k equals the vector count
// every vector gets its own cluster, duplicates included.

use serde::Serialize;
use tracing::debug;

use crate::error::TopicError;

/// Upper bound on assign/update rounds.
pub const MAX_ITERATIONS: usize = 100;

/// Cluster id for every input vector, in input order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClusterAssignment {
    labels: Vec<usize>,
    k: usize,
}

impl ClusterAssignment {
    /// Cluster id per input index.
    pub fn labels(&self) -> &[usize] {
        &self.labels
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Cluster id of the document at `index`.
    pub fn cluster_of(&self, index: usize) -> Option<usize> {
        self.labels.get(index).copied()
    }

    /// Member indices of each cluster, in input order. Always `k` groups.
    pub fn members(&self) -> Vec<Vec<usize>> {
        let mut groups = vec![Vec::new(); self.k];
        for (index, &label) in self.labels.iter().enumerate() {
            groups[label].push(index);
        }
        groups
    }

    /// Number of members per cluster.
    pub fn sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0; self.k];
        for &label in &self.labels {
            sizes[label] += 1;
        }
        sizes
    }
}

/// K-means clusterer with a fixed iteration bound.
#[derive(Debug, Clone)]
pub struct KMeans {
    pub max_iterations: usize,
}

impl Default for KMeans {
    fn default() -> Self {
        Self {
            max_iterations: MAX_ITERATIONS,
        }
    }
}

impl KMeans {
    /// Partition `vectors` into `k` clusters.
    ///
    /// Fails without partial output if `k` is out of range, a vector has a
    /// different length from the first, or a component is not finite.
    pub fn cluster(
        &self,
        vectors: &[Vec<f64>],
        k: usize,
    ) -> Result<ClusterAssignment, TopicError> {
        validate(vectors, k)?;

        // Identical seeds would tie and leave a cluster empty.
        if k == vectors.len() {
            return Ok(ClusterAssignment {
                labels: (0..k).collect(),
                k,
            });
        }

        let mut centroids = seed_centroids(vectors, k);
        let mut labels = assign(vectors, &centroids);
        let mut iterations = 1;

        while iterations < self.max_iterations {
            update_centroids(vectors, &labels, &mut centroids);
            let next = assign(vectors, &centroids);
            iterations += 1;
            if next == labels {
                break;
            }
            labels = next;
        }

        debug!(
            vectors = vectors.len(),
            k = k,
            iterations = iterations,
            "k-means converged"
        );

        Ok(ClusterAssignment { labels, k })
    }
}

/// Cluster with the default iteration bound.
pub fn cluster(vectors: &[Vec<f64>], k: usize) -> Result<ClusterAssignment, TopicError> {
    KMeans::default().cluster(vectors, k)
}

fn validate(vectors: &[Vec<f64>], k: usize) -> Result<(), TopicError> {
    if k == 0 {
        return Err(TopicError::ClusteringConfig(
            "cluster count must be at least 1".to_string(),
        ));
    }
    if k > vectors.len() {
        return Err(TopicError::ClusteringConfig(format!(
            "cannot form {k} clusters from {} vectors",
            vectors.len()
        )));
    }

    let expected = vectors[0].len();
    for (index, vector) in vectors.iter().enumerate() {
        if vector.len() != expected {
            return Err(TopicError::DimensionMismatch {
                index,
                expected,
                found: vector.len(),
            });
        }
        if vector.iter().any(|v| !v.is_finite()) {
            return Err(TopicError::ClusteringConfig(format!(
                "vector {index} has a non-finite component"
            )));
        }
    }
    Ok(())
}

/// First k distinct vectors in input order. When the batch has fewer than k
/// distinct vectors, the earliest duplicates fill the remaining seeds.
fn seed_centroids(vectors: &[Vec<f64>], k: usize) -> Vec<Vec<f64>> {
    let mut seeds: Vec<usize> = Vec::with_capacity(k);
    for (i, vector) in vectors.iter().enumerate() {
        if seeds.len() == k {
            break;
        }
        if !seeds.iter().any(|&s| vectors[s] == *vector) {
            seeds.push(i);
        }
    }
    for i in 0..vectors.len() {
        if seeds.len() == k {
            break;
        }
        if !seeds.contains(&i) {
            seeds.push(i);
        }
    }
    seeds.into_iter().map(|i| vectors[i].clone()).collect()
}

fn assign(vectors: &[Vec<f64>], centroids: &[Vec<f64>]) -> Vec<usize> {
    vectors
        .iter()
        .map(|vector| {
            let mut best = 0;
            let mut best_dist = f64::INFINITY;
            for (ci, centroid) in centroids.iter().enumerate() {
                let d = squared_distance(vector, centroid);
                if d < best_dist {
                    best_dist = d;
                    best = ci;
                }
            }
            best
        })
        .collect()
}

/// Move each non-empty cluster's centroid to the mean of its members.
/// Empty clusters keep their previous centroid.
fn update_centroids(vectors: &[Vec<f64>], labels: &[usize], centroids: &mut [Vec<f64>]) {
    let dim = centroids.first().map_or(0, Vec::len);
    let mut sums = vec![vec![0.0_f64; dim]; centroids.len()];
    let mut counts = vec![0usize; centroids.len()];

    for (vector, &label) in vectors.iter().zip(labels) {
        counts[label] += 1;
        for (acc, &v) in sums[label].iter_mut().zip(vector) {
            *acc += v;
        }
    }

    for (ci, centroid) in centroids.iter_mut().enumerate() {
        if counts[ci] == 0 {
            continue;
        }
        let n = counts[ci] as f64;
        for (c, s) in centroid.iter_mut().zip(&sums[ci]) {
            *c = s / n;
        }
    }
}

/// Squared Euclidean distance between two equal-length vectors.
#[inline]
pub fn squared_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}
