use thiserror::Error;

/// Failures surfaced by the loading and configuration layers.
///
/// Data-quality problems (missing prices, sparse segments, empty datasets)
/// are never errors: the engine degrades gracefully and annotates its
/// results instead. Only records that cannot be joined into the data model
/// at all — or unreadable input files — abort a call.
#[derive(Error, Debug)]
pub enum AdvisorError {
    #[error("record {record} in {file} has no listing id")]
    MissingRecordId { file: String, record: u64 },

    #[error("required data file not found: {0}")]
    DataFileNotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yml::Error),
}

pub type Result<T> = std::result::Result<T, AdvisorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_record_id_display() {
        let err = AdvisorError::MissingRecordId {
            file: "listings.csv".into(),
            record: 17,
        };
        let msg = err.to_string();
        assert!(msg.contains("listings.csv"));
        assert!(msg.contains("17"));
    }

    #[test]
    fn data_file_not_found_display() {
        let err = AdvisorError::DataFileNotFound("listings.csv".into());
        assert!(err.to_string().contains("listings.csv"));
    }

    #[test]
    fn config_display() {
        let err = AdvisorError::Config("bad threshold".into());
        assert!(err.to_string().contains("bad threshold"));
    }

    #[test]
    fn error_from_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{{invalid").unwrap_err();
        let err: AdvisorError = json_err.into();
        assert!(matches!(err, AdvisorError::Json(_)));
        assert!(err.to_string().contains("JSON error"));
    }

    #[test]
    fn error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: AdvisorError = io_err.into();
        assert!(matches!(err, AdvisorError::Io(_)));
    }
}
