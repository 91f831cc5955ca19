// Copyright 2025 Cinevec Project
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Error types for catalog loading and search operations

use thiserror::Error;

/// Errors that can occur while loading assets or serving a search.
#[derive(Error, Debug)]
pub enum SearchError {
    /// Required configuration is missing or unusable
    #[error("Configuration error: {0}")]
    Config(String),

    /// One or both index assets are absent on disk
    #[error("Missing index assets: {0}")]
    AssetsNotFound(String),

    /// meta.json is not the expected shape
    #[error("Invalid metadata: {0}")]
    InvalidMetadata(String),

    /// meta.json declares a missing or non-positive vector dimension
    #[error("Invalid vector dim in meta.json: {0}")]
    InvalidDimension(i64),

    /// Catalog and index disagree on how many vectors exist
    #[error("Catalog/index size mismatch: index holds {index_len} vectors, catalog has {catalog_len} items")]
    SizeMismatch {
        /// Number of vectors stored in the index artifact
        index_len: usize,
        /// Number of records in the metadata catalog
        catalog_len: usize,
    },

    /// Query vector length does not match the declared dimension
    #[error("vector must have length {expected}, got {actual}")]
    DimensionMismatch {
        /// Dimension declared in meta.json
        expected: usize,
        /// Length of the submitted vector
        actual: usize,
    },

    /// Query vector contains an infinity or NaN
    #[error("vector contains non-finite values")]
    NonFiniteValue,

    /// Query vector has zero Euclidean norm and no direction
    #[error("vector norm is 0")]
    ZeroNorm,

    /// Requested result count outside the accepted range
    #[error("topK must be between {min} and {max}")]
    TopKOutOfRange {
        /// Smallest accepted topK
        min: usize,
        /// Largest accepted topK
        max: usize,
    },

    /// File I/O failed while reading assets
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The vector index library reported a failure
    #[error("Index error: {0}")]
    Index(String),
}

impl SearchError {
    /// Whether this error was caused by the client's input rather than the
    /// service's configuration or assets. Client faults map to 4xx responses,
    /// everything else to 5xx.
    pub fn is_client_fault(&self) -> bool {
        matches!(
            self,
            SearchError::DimensionMismatch { .. }
                | SearchError::NonFiniteValue
                | SearchError::ZeroNorm
                | SearchError::TopKOutOfRange { .. }
        )
    }
}
