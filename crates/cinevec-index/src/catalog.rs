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

//! Metadata catalog types
//!
//! The catalog is position-aligned with the index artifact: the i-th record
//! describes the i-th indexed vector. Records are sparse; every field is
//! optional and missing fields are surfaced as `null` in responses.

use crate::errors::SearchError;
use serde::{Deserialize, Serialize};

/// One catalog record, aligned by position with an indexed vector.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    /// IMDb identifier
    #[serde(default)]
    pub imdb_id: Option<String>,
    /// Internal identifier (numeric or string, depending on the builder)
    #[serde(default)]
    pub id: Option<serde_json::Value>,
    /// Display title
    #[serde(default)]
    pub title: Option<String>,
    /// Release year
    #[serde(default)]
    pub year: Option<i32>,
    /// Primary genre
    #[serde(default)]
    pub genre: Option<String>,
    /// Production country
    #[serde(default)]
    pub production_country: Option<String>,
    /// Keyword list
    #[serde(default)]
    pub keywords: Option<Vec<String>>,
    /// Mood tag list
    #[serde(default)]
    pub mood_tags: Option<Vec<String>>,
}

/// Parsed contents of `meta.json`.
#[derive(Debug, Deserialize)]
pub struct CatalogMeta {
    /// Item records, one per indexed vector
    pub items: Vec<CatalogItem>,
    /// Declared vector dimensionality
    #[serde(default)]
    pub dim: Option<i64>,
}

impl CatalogMeta {
    /// Parses a `meta.json` document. The document must be a JSON object with
    /// an `items` array; anything else is a validation error.
    pub fn from_json(raw: &str) -> Result<Self, SearchError> {
        serde_json::from_str(raw).map_err(|e| {
            SearchError::InvalidMetadata(format!(
                "meta.json must be an object with an 'items' field: {e}"
            ))
        })
    }

    /// Validated vector dimension. Absent or non-positive values are a
    /// configuration fault, not a client error.
    pub fn dim(&self) -> Result<usize, SearchError> {
        match self.dim {
            Some(d) if d > 0 => Ok(d as usize),
            other => Err(SearchError::InvalidDimension(other.unwrap_or(0))),
        }
    }
}
