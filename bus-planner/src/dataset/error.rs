//! Dataset loading error types.

use std::path::PathBuf;

/// Errors that can occur while reading the static network dataset.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    /// The dataset file could not be read
    #[error("failed to read dataset {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The dataset is not valid JSON or has the wrong shape
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = DatasetError::Io {
            path: PathBuf::from("data/network.json"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert_eq!(
            err.to_string(),
            "failed to read dataset \"data/network.json\": gone"
        );

        let json_err = serde_json::from_str::<u8>("x").unwrap_err();
        let err = DatasetError::from(json_err);
        assert!(err.to_string().starts_with("JSON parse error"));
    }
}
