// Copyright 2025 Fernando Borretti
//
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

use std::fs::read_to_string;
use std::path::Path;

use serde::Deserialize;

use crate::error::ErrorReport;
use crate::error::Fallible;

/// Name of the optional configuration file in a collection directory.
pub const CONFIG_FILE_NAME: &str = "leitcards.toml";

/// Per-collection study settings.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Database file name, relative to the collection directory.
    #[serde(default = "default_database")]
    pub database: String,
    /// Whether to shuffle due cards before a session.
    #[serde(default = "default_shuffle")]
    pub shuffle: bool,
    /// Maximum number of cards in one session.
    #[serde(default)]
    pub session_limit: Option<usize>,
}

fn default_database() -> String {
    "leitcards.db".to_string()
}

fn default_shuffle() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: default_database(),
            shuffle: default_shuffle(),
            session_limit: None,
        }
    }
}

impl Config {
    /// Loads the configuration of a collection, or the defaults if the
    /// collection has no configuration file.
    pub fn load(directory: &Path) -> Fallible<Self> {
        let path = directory.join(CONFIG_FILE_NAME);
        if !path.exists() {
            log::debug!("No {CONFIG_FILE_NAME}, using defaults.");
            return Ok(Self::default());
        }
        let content = read_to_string(&path)?;
        Self::parse(&content)
            .map_err(|e| ErrorReport::new(format!("{}: {}", path.display(), e.message())))
    }

    pub fn parse(content: &str) -> Fallible<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }
}
