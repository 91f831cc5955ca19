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

//! Query normalization, top-K search, and result assembly

use crate::assets::SearchAssets;
use crate::catalog::CatalogItem;
use crate::errors::SearchError;
use serde::Serialize;

/// Default number of results when the client does not ask for a count.
pub const DEFAULT_TOP_K: usize = 50;
/// Smallest accepted `topK`.
pub const MIN_TOP_K: usize = 1;
/// Largest accepted `topK`.
pub const MAX_TOP_K: usize = 200;

/// One search result: the catalog record plus its similarity score.
///
/// The score appears under both `score` and `similarity`; clients of the
/// original API read either key, so the duplication is part of the contract.
#[derive(Debug, Clone, Serialize)]
pub struct SearchHit {
    /// Catalog fields, flattened into the result object
    #[serde(flatten)]
    pub item: CatalogItem,
    /// Cosine similarity of the query to this item
    pub score: f32,
    /// Same value as `score`
    pub similarity: f32,
}

/// Checks the requested result count against the accepted range.
pub fn validate_top_k(top_k: usize) -> Result<usize, SearchError> {
    if !(MIN_TOP_K..=MAX_TOP_K).contains(&top_k) {
        return Err(SearchError::TopKOutOfRange {
            min: MIN_TOP_K,
            max: MAX_TOP_K,
        });
    }
    Ok(top_k)
}

/// Validates a query vector and scales it to unit Euclidean norm.
///
/// The index scores by inner product; on unit vectors that equals cosine
/// similarity, so normalizing here turns arbitrary embeddings into a cosine
/// search without the index needing a custom distance.
pub fn normalize_query(vector: &[f32], dim: usize) -> Result<Vec<f32>, SearchError> {
    if vector.len() != dim {
        return Err(SearchError::DimensionMismatch {
            expected: dim,
            actual: vector.len(),
        });
    }
    if vector.iter().any(|v| !v.is_finite()) {
        return Err(SearchError::NonFiniteValue);
    }
    let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm == 0.0 {
        return Err(SearchError::ZeroNorm);
    }
    Ok(vector.iter().map(|v| v / norm).collect())
}

/// Clamps the requested count to what the catalog can actually return.
pub fn effective_k(top_k: usize, catalog_len: usize) -> usize {
    top_k.max(1).min(catalog_len)
}

/// Joins (position, score) pairs back to catalog records, preserving rank
/// order. Positions outside the catalog are dropped silently: a single
/// misaligned neighbor (or an unfilled search slot, which arrives as an
/// out-of-range key) should not fail the whole request.
pub fn join(items: &[CatalogItem], matches: &[(u64, f32)]) -> Vec<SearchHit> {
    matches
        .iter()
        .filter_map(|&(key, score)| {
            let idx = usize::try_from(key).ok().filter(|&i| i < items.len())?;
            Some(SearchHit {
                item: items[idx].clone(),
                score,
                similarity: score,
            })
        })
        .collect()
}

impl SearchAssets {
    /// Runs a top-K similarity search for `vector`.
    ///
    /// Validates and normalizes the query, searches the index with K clamped
    /// to the catalog size, and joins the returned positions back to catalog
    /// records. Results are ranked by descending similarity; the index's own
    /// ordering is trusted and not re-sorted.
    pub fn search(&self, vector: &[f32], top_k: usize) -> Result<Vec<SearchHit>, SearchError> {
        let top_k = validate_top_k(top_k)?;
        let query = normalize_query(vector, self.dim)?;

        let k = effective_k(top_k, self.items.len());
        if k == 0 {
            return Ok(Vec::new());
        }

        let matches = self
            .index
            .search(&query, k)
            .map_err(|e| SearchError::Index(e.to_string()))?;

        // usearch reports inner-product matches as distance 1 - <q, v>, in
        // ascending order. Undo that to recover the cosine similarity the
        // wire contract promises, keeping the order (now descending).
        let scored: Vec<(u64, f32)> = matches
            .keys
            .iter()
            .zip(matches.distances.iter())
            .map(|(&key, &dist)| (key, 1.0 - dist))
            .collect();

        let hits = join(&self.items, &scored);
        tracing::debug!(requested = top_k, k, returned = hits.len(), "search served");
        Ok(hits)
    }
}
