//! Tests for core types

#[cfg(test)]
mod tests {
    use super::super::types::*;

    #[test]
    fn test_feature_matrix_shape() {
        let matrix = FeatureMatrix::new(
            vec!["PTS".into(), "AST".into()],
            vec![vec![30.1, 7.2], vec![25.0, 5.5], vec![12.3, 2.0]],
        )
        .unwrap();

        assert_eq!(matrix.n_rows(), 3);
        assert_eq!(matrix.n_features(), 2);
        assert_eq!(matrix.columns(), &["PTS".to_string(), "AST".to_string()]);
        assert_eq!(matrix.row(1), Some(&[25.0, 5.5][..]));
        assert_eq!(matrix.row(3), None);
        assert!(!matrix.is_empty());
    }

    #[test]
    fn test_feature_matrix_rejects_ragged_rows() {
        let err = FeatureMatrix::new(vec!["PTS".into()], vec![vec![1.0], vec![1.0, 2.0]]).unwrap_err();
        assert!(err.is_data_contract());
    }

    #[test]
    fn test_empty_feature_matrix() {
        let matrix = FeatureMatrix::new(vec!["PTS".into()], vec![]).unwrap();
        assert!(matrix.is_empty());
        assert_eq!(matrix.n_features(), 1);
    }

    #[test]
    fn test_prediction_record_serialization() {
        let record = PredictionRecord {
            year: 2023,
            player: "Joel Embiid".to_string(),
            share: 0.915,
            predicted_score: 0.42,
            actual_rank: 1,
            predicted_rank: 2,
            rank_difference: -1,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["Share"], 0.915);
        assert_eq!(json["rank_difference"], -1);
        assert_eq!(json["player"], "Joel Embiid");
    }

    #[test]
    fn test_season_record_deserialization() {
        let json = r#"{"player":"Nikola Jokic","year":2021,"share":0.961,"features":[26.4,8.3]}"#;
        let record: SeasonRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.year, 2021);
        assert_eq!(record.features.len(), 2);
    }

    #[test]
    fn test_year_score_copy() {
        let score = YearScore { year: 2020, score: 0.8 };
        let copy = score;
        assert_eq!(score, copy);
    }
}
