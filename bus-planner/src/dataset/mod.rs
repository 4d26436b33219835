//! Static network dataset.
//!
//! Lines, stops and inter-stop travel times are published as one JSON
//! document, loaded once at startup and handed to
//! [`Network::build`](crate::network::Network::build).

mod error;
mod records;

use std::path::Path;

pub use error::DatasetError;
pub use records::{
    Dataset, LineRecord, NetworkData, StopRecord, TravelRecord, parse_pair_key,
};

impl Dataset {
    /// Parse a dataset from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, DatasetError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a dataset file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DatasetError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| DatasetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }
}
