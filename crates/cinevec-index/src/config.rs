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

//! Environment configuration

use crate::errors::SearchError;
use std::env;
use std::path::PathBuf;

/// Environment variable naming the folder that contains the `index/` assets.
pub const DATA_PATH_ENV: &str = "LOCAL_DATA_PATH";

/// Resolves the directory holding `faiss.index` and `meta.json`.
///
/// Reads [`DATA_PATH_ENV`] and appends `index/`. An unset or blank value is a
/// configuration error; there is no default location.
pub fn data_dir() -> Result<PathBuf, SearchError> {
    let raw = env::var(DATA_PATH_ENV).unwrap_or_default();
    if raw.trim().is_empty() {
        return Err(SearchError::Config(format!(
            "Missing {DATA_PATH_ENV}. Set {DATA_PATH_ENV} to the folder containing index/faiss.index + index/meta.json"
        )));
    }
    Ok(PathBuf::from(raw).join("index"))
}
