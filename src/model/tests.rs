//! Tests for model module

#[cfg(test)]
mod tests {
    use super::super::ridge::solve_linear_system;
    use super::super::*;
    use crate::config::{ForestConfig, ModelConfig, ModelKind, RidgeConfig};
    use crate::types::FeatureMatrix;

    fn matrix(rows: Vec<Vec<f64>>) -> FeatureMatrix {
        let width = rows.first().map_or(0, |r| r.len());
        let columns = (0..width).map(|i| format!("x{}", i)).collect();
        FeatureMatrix::new(columns, rows).unwrap()
    }

    #[test]
    fn test_solve_linear_system() {
        // 2x + y = 5, x + 3y = 10 -> x = 1, y = 3
        let x = solve_linear_system(vec![vec![2.0, 1.0], vec![1.0, 3.0]], vec![5.0, 10.0]).unwrap();
        assert!((x[0] - 1.0).abs() < 1e-10);
        assert!((x[1] - 3.0).abs() < 1e-10);
    }

    #[test]
    fn test_solve_linear_system_needs_pivoting() {
        let x = solve_linear_system(vec![vec![0.0, 1.0], vec![1.0, 0.0]], vec![2.0, 3.0]).unwrap();
        assert_eq!(x, vec![3.0, 2.0]);
    }

    #[test]
    fn test_solve_singular_system() {
        assert!(solve_linear_system(vec![vec![1.0, 2.0], vec![2.0, 4.0]], vec![1.0, 2.0]).is_none());
    }

    #[test]
    fn test_ridge_without_penalty_recovers_line() {
        let features = matrix(vec![vec![1.0], vec![2.0], vec![3.0], vec![4.0]]);
        let target = vec![3.0, 5.0, 7.0, 9.0]; // y = 2x + 1

        let mut ridge = RidgeRegressor::new(0.0);
        ridge.fit(&features, &target).unwrap();

        assert!((ridge.weights().unwrap()[0] - 2.0).abs() < 1e-9);
        assert!((ridge.intercept().unwrap() - 1.0).abs() < 1e-9);

        let preds = ridge.predict(&matrix(vec![vec![10.0]])).unwrap();
        assert!((preds[0] - 21.0).abs() < 1e-9);
    }

    #[test]
    fn test_ridge_penalty_shrinks_weights() {
        let features = matrix(vec![vec![1.0], vec![2.0], vec![3.0], vec![4.0]]);
        let target = vec![3.0, 5.0, 7.0, 9.0];

        let mut ridge = RidgeRegressor::new(5.0);
        ridge.fit(&features, &target).unwrap();

        // sum((x - mean)^2) = 5, so w = 2 * 5 / (5 + 5)
        assert!((ridge.weights().unwrap()[0] - 1.0).abs() < 1e-9);
        // Intercept keeps the prediction at the means
        assert!((ridge.intercept().unwrap() - 3.5).abs() < 1e-9);
    }

    #[test]
    fn test_ridge_handles_constant_column_with_penalty() {
        let features = matrix(vec![vec![1.0, 7.0], vec![2.0, 7.0], vec![3.0, 7.0]]);
        let target = vec![1.0, 2.0, 3.0];

        let mut ridge = RidgeRegressor::new(1.0);
        ridge.fit(&features, &target).unwrap();
        assert_eq!(ridge.weights().unwrap()[1], 0.0);
    }

    #[test]
    fn test_ridge_singular_without_penalty() {
        let features = matrix(vec![vec![1.0, 7.0], vec![2.0, 7.0], vec![3.0, 7.0]]);
        let mut ridge = RidgeRegressor::new(0.0);
        let err = ridge.fit(&features, &[1.0, 2.0, 3.0]).unwrap_err();
        assert!(err.is_model());
    }

    #[test]
    fn test_ridge_predict_before_fit() {
        let ridge = RidgeRegressor::default();
        let err = ridge.predict(&matrix(vec![vec![1.0]])).unwrap_err();
        assert!(err.is_model());
    }

    #[test]
    fn test_ridge_rejects_wrong_width() {
        let mut ridge = RidgeRegressor::default();
        ridge.fit(&matrix(vec![vec![1.0], vec![2.0]]), &[1.0, 2.0]).unwrap();
        let err = ridge.predict(&matrix(vec![vec![1.0, 2.0]])).unwrap_err();
        assert!(err.is_model());
    }

    #[test]
    fn test_ridge_rejects_empty_training_set() {
        let mut ridge = RidgeRegressor::default();
        let empty = FeatureMatrix::new(vec!["x0".into()], vec![]).unwrap();
        assert!(ridge.fit(&empty, &[]).unwrap_err().is_model());
    }

    #[test]
    fn test_forest_learns_step_function() {
        let rows: Vec<Vec<f64>> = (0..40).map(|i| vec![i as f64]).collect();
        let target: Vec<f64> = (0..40).map(|i| if i < 20 { 0.0 } else { 1.0 }).collect();

        let mut forest = RandomForestRegressor::new(20, 2, 7);
        forest.fit(&matrix(rows), &target).unwrap();
        assert_eq!(forest.n_trees(), 20);

        let preds = forest.predict(&matrix(vec![vec![2.0], vec![37.0]])).unwrap();
        assert!(preds[0] < 0.2, "low side predicted {}", preds[0]);
        assert!(preds[1] > 0.8, "high side predicted {}", preds[1]);
    }

    #[test]
    fn test_forest_is_deterministic_for_a_seed() {
        let rows: Vec<Vec<f64>> = (0..30).map(|i| vec![i as f64, (i % 7) as f64]).collect();
        let target: Vec<f64> = (0..30).map(|i| ((i * 13) % 11) as f64 / 10.0).collect();
        let features = matrix(rows);

        let mut a = RandomForestRegressor::new(10, 5, 1);
        let mut b = RandomForestRegressor::new(10, 5, 1);
        a.fit(&features, &target).unwrap();
        b.fit(&features, &target).unwrap();

        assert_eq!(a.predict(&features).unwrap(), b.predict(&features).unwrap());
    }

    #[test]
    fn test_forest_depth_limit_gives_stump() {
        let rows: Vec<Vec<f64>> = (0..10).map(|i| vec![i as f64]).collect();
        let target: Vec<f64> = (0..10).map(|i| i as f64).collect();

        let mut forest = RandomForestRegressor::new(1, 2, 3).with_max_depth(Some(1));
        forest.fit(&matrix(rows), &target).unwrap();

        let preds = forest.predict(&matrix((0..10).map(|i| vec![i as f64]).collect())).unwrap();
        let mut distinct = preds.clone();
        distinct.dedup();
        assert!(distinct.len() <= 2);
    }

    #[test]
    fn test_forest_predict_before_fit() {
        let forest = RandomForestRegressor::default();
        assert!(forest.predict(&matrix(vec![vec![1.0]])).unwrap_err().is_model());
    }

    #[test]
    fn test_forest_target_length_mismatch() {
        let mut forest = RandomForestRegressor::default();
        let err = forest.fit(&matrix(vec![vec![1.0], vec![2.0]]), &[1.0]).unwrap_err();
        assert!(err.is_model());
    }

    #[test]
    fn test_build_regressor_by_kind() {
        let ridge = build_regressor(&ModelConfig {
            kind: ModelKind::Ridge,
            ridge: RidgeConfig { alpha: 2.0 },
            ..Default::default()
        });
        assert_eq!(ridge.name(), "ridge");

        let forest = build_regressor(&ModelConfig {
            kind: ModelKind::RandomForest,
            forest: ForestConfig {
                n_estimators: 3,
                ..Default::default()
            },
            ..Default::default()
        });
        assert_eq!(forest.name(), "random_forest");
    }

    #[test]
    fn test_boxed_regressor_delegates() {
        let mut boxed: Box<dyn Regressor> = Box::new(RidgeRegressor::new(0.0));
        let features = matrix(vec![vec![0.0], vec![1.0]]);
        boxed.fit(&features, &[1.0, 3.0]).unwrap();
        let preds = boxed.predict(&features).unwrap();
        assert!((preds[1] - 3.0).abs() < 1e-9);
    }
}
