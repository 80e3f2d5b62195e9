//! Random forest regressor
//!
//! Bagged CART regression trees: each tree is grown on a bootstrap sample of
//! the training rows, splitting on the (feature, threshold) pair that most
//! reduces squared error. Predictions average the trees. A seeded `StdRng`
//! drives the bootstrap so repeated fits on the same data agree exactly.

use super::Regressor;
use crate::config::ForestConfig;
use crate::error::{PredictorError, Result};
use crate::types::FeatureMatrix;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[derive(Debug, Clone)]
enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: f64,
    },
}

#[derive(Debug, Clone)]
struct RegressionTree {
    nodes: Vec<Node>,
}

impl RegressionTree {
    fn predict(&self, sample: &[f64]) -> f64 {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                Node::Leaf { value } => return *value,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if sample[*feature] <= *threshold { *left } else { *right };
                }
            }
        }
    }
}

/// Growth limits shared by every tree
#[derive(Debug, Clone, Copy)]
struct TreeParams {
    min_samples_split: usize,
    max_depth: Option<usize>,
}

struct TreeBuilder<'a> {
    rows: &'a [Vec<f64>],
    target: &'a [f64],
    params: TreeParams,
    nodes: Vec<Node>,
}

impl<'a> TreeBuilder<'a> {
    fn build(
        rows: &'a [Vec<f64>],
        target: &'a [f64],
        sample: Vec<usize>,
        params: TreeParams,
    ) -> RegressionTree {
        let mut builder = Self {
            rows,
            target,
            params,
            nodes: Vec::new(),
        };
        builder.grow(sample, 0);
        RegressionTree {
            nodes: builder.nodes,
        }
    }

    fn grow(&mut self, indices: Vec<usize>, depth: usize) -> usize {
        let value = mean(self.target, &indices);
        let depth_reached = self.params.max_depth.is_some_and(|max| depth >= max);

        if depth_reached || indices.len() < self.params.min_samples_split || is_pure(self.target, &indices) {
            return self.push(Node::Leaf { value });
        }

        let Some((feature, threshold)) = self.best_split(&indices) else {
            return self.push(Node::Leaf { value });
        };

        let (left_idx, right_idx): (Vec<usize>, Vec<usize>) =
            indices.into_iter().partition(|&i| self.rows[i][feature] <= threshold);
        if left_idx.is_empty() || right_idx.is_empty() {
            return self.push(Node::Leaf { value });
        }

        // Reserve the slot, children are appended after it
        let node = self.push(Node::Leaf { value });
        let left = self.grow(left_idx, depth + 1);
        let right = self.grow(right_idx, depth + 1);
        self.nodes[node] = Node::Split {
            feature,
            threshold,
            left,
            right,
        };
        node
    }

    fn push(&mut self, node: Node) -> usize {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    /// Split minimising the summed squared error of both children
    fn best_split(&self, indices: &[usize]) -> Option<(usize, f64)> {
        let n = indices.len();
        let n_features = self.rows.first().map_or(0, |r| r.len());
        let total_sum: f64 = indices.iter().map(|&i| self.target[i]).sum();
        let total_sq: f64 = indices.iter().map(|&i| self.target[i] * self.target[i]).sum();
        let parent_sse = total_sq - total_sum * total_sum / n as f64;

        let mut best: Option<(usize, f64, f64)> = None;
        let mut pairs: Vec<(f64, f64)> = Vec::with_capacity(n);

        for feature in 0..n_features {
            pairs.clear();
            pairs.extend(indices.iter().map(|&i| (self.rows[i][feature], self.target[i])));
            pairs.sort_by(|a, b| a.0.total_cmp(&b.0));

            let mut left_sum = 0.0;
            let mut left_sq = 0.0;
            for i in 0..n - 1 {
                let (x, y) = pairs[i];
                left_sum += y;
                left_sq += y * y;

                let next_x = pairs[i + 1].0;
                if next_x <= x {
                    continue;
                }

                let left_n = (i + 1) as f64;
                let right_n = (n - i - 1) as f64;
                let right_sum = total_sum - left_sum;
                let right_sq = total_sq - left_sq;
                let sse = (left_sq - left_sum * left_sum / left_n) + (right_sq - right_sum * right_sum / right_n);

                match best {
                    Some((_, _, best_sse)) if sse >= best_sse => {}
                    _ => best = Some((feature, (x + next_x) / 2.0, sse)),
                }
            }
        }

        best.filter(|&(_, _, sse)| sse < parent_sse - 1e-12)
            .map(|(feature, threshold, _)| (feature, threshold))
    }
}

fn mean(target: &[f64], indices: &[usize]) -> f64 {
    if indices.is_empty() {
        return 0.0;
    }
    indices.iter().map(|&i| target[i]).sum::<f64>() / indices.len() as f64
}

fn is_pure(target: &[f64], indices: &[usize]) -> bool {
    match indices.first() {
        Some(&first) => indices.iter().all(|&i| target[i] == target[first]),
        None => true,
    }
}

/// Bagged regression-tree ensemble
#[derive(Debug, Clone)]
pub struct RandomForestRegressor {
    n_estimators: usize,
    seed: u64,
    params: TreeParams,
    n_features: usize,
    trees: Vec<RegressionTree>,
}

impl RandomForestRegressor {
    pub fn new(n_estimators: usize, min_samples_split: usize, seed: u64) -> Self {
        Self {
            n_estimators,
            seed,
            params: TreeParams {
                min_samples_split: min_samples_split.max(2),
                max_depth: None,
            },
            n_features: 0,
            trees: Vec::new(),
        }
    }

    pub fn from_config(config: &ForestConfig) -> Self {
        Self::new(config.n_estimators, config.min_samples_split, config.seed).with_max_depth(config.max_depth)
    }

    pub fn with_max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.params.max_depth = max_depth;
        self
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }
}

impl Default for RandomForestRegressor {
    fn default() -> Self {
        Self::from_config(&ForestConfig::default())
    }
}

impl Regressor for RandomForestRegressor {
    fn fit(&mut self, features: &FeatureMatrix, target: &[f64]) -> Result<()> {
        let n = features.n_rows();
        if n == 0 {
            return Err(PredictorError::Model("random forest: empty training set".into()));
        }
        if target.len() != n {
            return Err(PredictorError::Model(format!(
                "random forest: {} target values for {} rows",
                target.len(),
                n
            )));
        }
        if self.n_estimators == 0 {
            return Err(PredictorError::Model("random forest: n_estimators must be at least 1".into()));
        }

        let mut rng = StdRng::seed_from_u64(self.seed);
        let rows = features.rows();
        let params = self.params;
        self.trees = (0..self.n_estimators)
            .map(|_| {
                let sample: Vec<usize> = (0..n).map(|_| rng.random_range(0..n)).collect();
                TreeBuilder::build(rows, target, sample, params)
            })
            .collect();
        self.n_features = features.n_features();

        tracing::debug!(
            "Random forest fitted: {} trees on {} rows x {} features",
            self.trees.len(),
            n,
            self.n_features
        );
        Ok(())
    }

    fn predict(&self, features: &FeatureMatrix) -> Result<Vec<f64>> {
        if self.trees.is_empty() {
            return Err(PredictorError::Model("random forest: predict called before fit".into()));
        }
        if features.n_features() != self.n_features {
            return Err(PredictorError::Model(format!(
                "random forest: fitted on {} features, got {}",
                self.n_features,
                features.n_features()
            )));
        }

        let n_trees = self.trees.len() as f64;
        Ok(features
            .rows()
            .iter()
            .map(|row| self.trees.iter().map(|t| t.predict(row)).sum::<f64>() / n_trees)
            .collect())
    }

    fn name(&self) -> &str {
        "random_forest"
    }
}
