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

use std::path::Path;

use crate::config::Config;
use crate::deck::all_cards;
use crate::deck::parse_decks;
use crate::error::Fallible;
use crate::error::fail;

/// Validates the decks and configuration of a collection without touching
/// its database.
pub fn check_collection(directory: &Path) -> Fallible<()> {
    if !directory.exists() {
        return fail("directory does not exist.");
    }
    let _ = Config::load(directory)?;
    let decks = parse_decks(directory)?;
    log::debug!("{} decks, {} cards", decks.len(), all_cards(&decks).len());
    println!("ok");
    Ok(())
}
