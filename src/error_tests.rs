//! Tests for error types

#[cfg(test)]
mod tests {
    use super::super::error::*;

    #[test]
    fn test_error_messages() {
        let err = PredictorError::Configuration("need at least 6 years".into());
        assert_eq!(err.to_string(), "Configuration error: need at least 6 years");

        let err = PredictorError::DataContract("missing required column 'Share'".into());
        assert_eq!(err.to_string(), "Data contract violation: missing required column 'Share'");

        let err = PredictorError::Model("ridge: singular system".into());
        assert_eq!(err.to_string(), "Model error: ridge: singular system");
    }

    #[test]
    fn test_error_kind_predicates() {
        assert!(PredictorError::Configuration(String::new()).is_configuration());
        assert!(PredictorError::DataContract(String::new()).is_data_contract());
        assert!(PredictorError::Model(String::new()).is_model());
        assert!(!PredictorError::Model(String::new()).is_configuration());
    }

    #[test]
    fn test_io_error_conversion() {
        fn open() -> Result<()> {
            std::fs::File::open("/no/such/dataset.csv")?;
            Ok(())
        }
        let err = open().unwrap_err();
        assert!(matches!(err, PredictorError::Io(_)));
        assert!(err.to_string().starts_with("IO error"));
    }

    #[test]
    fn test_json_error_conversion() {
        fn parse() -> Result<serde_json::Value> {
            Ok(serde_json::from_str("{not json")?)
        }
        assert!(matches!(parse().unwrap_err(), PredictorError::Serialization(_)));
    }
}
