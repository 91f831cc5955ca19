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

//! Startup loading of the index artifact and metadata catalog

use crate::catalog::{CatalogItem, CatalogMeta};
use crate::config;
use crate::errors::SearchError;
use std::fmt;
use std::fs;
use std::path::Path;
use usearch::ffi::{IndexOptions, MetricKind, ScalarKind};
use usearch::Index;

/// Name of the binary index artifact inside the data directory.
pub const INDEX_FILE: &str = "faiss.index";
/// Name of the metadata document inside the data directory.
pub const META_FILE: &str = "meta.json";

/// The loaded, read-only search state: the vector index, the position-aligned
/// catalog, and the declared dimension.
///
/// Constructed exactly once at startup and shared (via `Arc`) with every
/// request handler. Never mutated afterwards; concurrent reads need no
/// synchronization. Discarded only on process shutdown.
pub struct SearchAssets {
    pub(crate) index: Index,
    pub(crate) items: Vec<CatalogItem>,
    pub(crate) dim: usize,
}

// The usearch index handle has no Debug impl, so summarize it by size.
impl fmt::Debug for SearchAssets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchAssets")
            .field("items", &self.items.len())
            .field("dim", &self.dim)
            .finish_non_exhaustive()
    }
}

impl SearchAssets {
    /// Loads the assets from the directory named by `LOCAL_DATA_PATH`.
    pub fn load() -> Result<Self, SearchError> {
        Self::load_from(&config::data_dir()?)
    }

    /// Loads `faiss.index` and `meta.json` from `data_dir`.
    ///
    /// Fails if either file is absent, if the metadata is malformed, if the
    /// declared dimension is non-positive, or if the catalog length disagrees
    /// with the index's vector count. All of these are startup-fatal: the
    /// service must refuse to come up rather than serve from a broken pairing.
    pub fn load_from(data_dir: &Path) -> Result<Self, SearchError> {
        let index_path = data_dir.join(INDEX_FILE);
        let meta_path = data_dir.join(META_FILE);

        if !index_path.exists() || !meta_path.exists() {
            return Err(SearchError::AssetsNotFound(format!(
                "{INDEX_FILE}/{META_FILE} not found under {}; run the offline index builder first",
                data_dir.display()
            )));
        }

        let meta = CatalogMeta::from_json(&fs::read_to_string(&meta_path)?)?;
        let dim = meta.dim()?;

        let options = IndexOptions {
            dimensions: dim,
            metric: MetricKind::IP,
            quantization: ScalarKind::F32,
            ..Default::default()
        };
        let index = Index::new(&options).map_err(|e| SearchError::Index(e.to_string()))?;
        index
            .load(index_path.to_string_lossy().as_ref())
            .map_err(|e| SearchError::Index(e.to_string()))?;

        // A misaligned index/catalog pairing would silently join the wrong
        // records, so it is rejected here instead of tolerated per-request.
        if index.size() != meta.items.len() {
            return Err(SearchError::SizeMismatch {
                index_len: index.size(),
                catalog_len: meta.items.len(),
            });
        }

        tracing::info!(
            items = meta.items.len(),
            dim,
            dir = %data_dir.display(),
            "search assets loaded"
        );

        Ok(Self {
            index,
            items: meta.items,
            dim,
        })
    }

    /// Number of records in the catalog (equals the index's vector count).
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Vector dimensionality declared by the metadata.
    pub fn dim(&self) -> usize {
        self.dim
    }
}
