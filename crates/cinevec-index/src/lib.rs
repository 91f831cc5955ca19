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

#![warn(missing_docs)]

//! Catalog loading and vector similarity search for Cinevec.
//!
//! This crate provides:
//! - Loading of the prebuilt index and metadata catalog at startup
//! - Query vector validation and L2 normalization
//! - Top-K inner-product search with results joined back to catalog records

pub mod assets;
pub mod catalog;
pub mod config;
pub mod errors;
pub mod search;

pub use assets::SearchAssets;
pub use catalog::CatalogItem;
pub use errors::SearchError;
pub use search::SearchHit;
