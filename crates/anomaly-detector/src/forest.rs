//! Isolation Forest
//!
//! Unsupervised outlier scoring over standardized readings. Each tree
//! recursively splits a subsample on a random feature at a random
//! threshold; readings that isolate in few splits score close to 1.

use ndarray::{Array2, ArrayView1};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Euler-Mascheroni constant for the unsuccessful-search path adjustment
const EULER_GAMMA: f64 = 0.577_215_664_901_532_9;

/// Isolation forest hyperparameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForestConfig {
    /// Number of trees in the ensemble
    pub trees: usize,
    /// Subsample cap per tree; actual size is `min(max_samples, n)`
    pub max_samples: usize,
    /// RNG seed, fixed so repeated fits agree
    pub seed: u64,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            trees: 100,
            max_samples: 256,
            seed: 42,
        }
    }
}

enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: Box<Node>,
        right: Box<Node>,
    },
    Leaf {
        size: usize,
    },
}

/// A fitted ensemble of isolation trees
pub struct IsolationForest {
    trees: Vec<Node>,
    subsample_size: usize,
}

impl IsolationForest {
    /// Fit trees over the rows of `data`. Needs at least two rows.
    pub fn fit(config: &ForestConfig, data: &Array2<f64>) -> Self {
        let n = data.nrows();
        assert!(n >= 2, "isolation forest needs at least two rows");

        let subsample_size = config.max_samples.min(n);
        let depth_limit = (subsample_size as f64).log2().ceil() as usize;
        let mut rng = StdRng::seed_from_u64(config.seed);

        let trees = (0..config.trees)
            .map(|_| {
                let rows = rand::seq::index::sample(&mut rng, n, subsample_size).into_vec();
                build_tree(&mut rng, data, rows, 0, depth_limit)
            })
            .collect();

        Self {
            trees,
            subsample_size,
        }
    }

    /// Anomaly score per row, in (0, 1); higher isolates faster.
    pub fn score_samples(&self, data: &Array2<f64>) -> Vec<f64> {
        let norm = average_path_length(self.subsample_size);
        data.rows()
            .into_iter()
            .map(|row| {
                let total: f64 = self
                    .trees
                    .iter()
                    .map(|tree| path_length(tree, row, 0))
                    .sum();
                let mean_path = total / self.trees.len() as f64;
                2f64.powf(-mean_path / norm)
            })
            .collect()
    }

    /// Label the `ceil(contamination * n)` highest-scoring rows as outliers.
    ///
    /// Ties resolve by row order, so labeling is deterministic.
    pub fn label_outliers(scores: &[f64], contamination: f64) -> Vec<bool> {
        let n = scores.len();
        let outlier_count = ((contamination * n as f64).ceil() as usize).min(n);
        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]).then(a.cmp(&b)));

        let mut labels = vec![false; n];
        for &row in order.iter().take(outlier_count) {
            labels[row] = true;
        }
        labels
    }
}

fn build_tree(
    rng: &mut StdRng,
    data: &Array2<f64>,
    rows: Vec<usize>,
    depth: usize,
    depth_limit: usize,
) -> Node {
    if depth >= depth_limit || rows.len() <= 1 {
        return Node::Leaf { size: rows.len() };
    }

    // Splittable features: those with spread among the current rows
    let mut candidates = Vec::with_capacity(data.ncols());
    for feature in 0..data.ncols() {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for &row in &rows {
            let v = data[[row, feature]];
            min = min.min(v);
            max = max.max(v);
        }
        if max > min {
            candidates.push((feature, min, max));
        }
    }
    if candidates.is_empty() {
        return Node::Leaf { size: rows.len() };
    }

    let (feature, min, max) = candidates[rng.gen_range(0..candidates.len())];
    let threshold = rng.gen_range(min..max);
    let (left_rows, right_rows): (Vec<usize>, Vec<usize>) = rows
        .into_iter()
        .partition(|&row| data[[row, feature]] < threshold);

    Node::Split {
        feature,
        threshold,
        left: Box::new(build_tree(rng, data, left_rows, depth + 1, depth_limit)),
        right: Box::new(build_tree(rng, data, right_rows, depth + 1, depth_limit)),
    }
}

fn path_length(node: &Node, sample: ArrayView1<'_, f64>, depth: usize) -> f64 {
    match node {
        Node::Leaf { size } => depth as f64 + average_path_length(*size),
        Node::Split {
            feature,
            threshold,
            left,
            right,
        } => {
            if sample[*feature] < *threshold {
                path_length(left, sample, depth + 1)
            } else {
                path_length(right, sample, depth + 1)
            }
        }
    }
}

/// c(n): average path length of an unsuccessful BST search over n items
fn average_path_length(n: usize) -> f64 {
    match n {
        0 | 1 => 0.0,
        2 => 1.0,
        _ => {
            let n = n as f64;
            2.0 * ((n - 1.0).ln() + EULER_GAMMA) - 2.0 * (n - 1.0) / n
        }
    }
}
