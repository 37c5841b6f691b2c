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

use std::collections::HashSet;
use std::env::current_dir;
use std::path::PathBuf;
use std::time::Instant;

use crate::config::Config;
use crate::db::Database;
use crate::deck::Deck;
use crate::deck::all_cards;
use crate::deck::parse_decks;
use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::error::fail;
use crate::scheduler::initialize;
use crate::types::card::SpacedRepetitionCard;
use crate::types::card_id::CardId;
use crate::types::timestamp::Timestamp;

/// A collection directory, loaded: its configuration, database, decks, and
/// every card paired with its progress.
pub struct Collection {
    pub directory: PathBuf,
    pub config: Config,
    pub db: Database,
    pub decks: Vec<Deck>,
    pub cards: Vec<SpacedRepetitionCard>,
}

impl Collection {
    /// Loads the collection in `directory` (the current directory if `None`).
    ///
    /// Cards without stored progress are initialized at `now` in memory only.
    /// Their progress is written to the database when they are first reviewed
    /// (see [`Database::save_session`]).
    pub fn new(directory: Option<String>, now: Timestamp) -> Fallible<Self> {
        let directory: PathBuf = match directory {
            Some(dir) => PathBuf::from(dir),
            None => current_dir()?,
        };
        let directory = if directory.exists() {
            directory.canonicalize()?
        } else {
            return fail("directory does not exist.");
        };

        let config = Config::load(&directory)?;

        let db_path: PathBuf = directory.join(&config.database);
        let db_path: &str = db_path
            .to_str()
            .ok_or_else(|| ErrorReport::new("invalid path"))?;
        let db: Database = Database::new(db_path)?;

        let decks = {
            log::debug!("Loading decks...");
            let start = Instant::now();
            let decks = parse_decks(&directory)?;
            let duration = start.elapsed().as_millis();
            log::debug!("Decks loaded in {duration}ms.");
            decks
        };

        let mut stored = db.all_progress()?;
        let mut cards = Vec::new();
        let mut new_count = 0;
        for card in all_cards(&decks) {
            let progress = match stored.remove(&card.id) {
                Some(progress) => progress,
                None => {
                    new_count += 1;
                    initialize(card.id.clone(), now)
                }
            };
            cards.push(SpacedRepetitionCard::new(card, progress));
        }
        if new_count > 0 {
            log::debug!("{new_count} cards have no stored progress yet.");
        }
        if !stored.is_empty() {
            log::warn!(
                "{} progress records have no matching card; see `leitcards orphans`.",
                stored.len()
            );
        }

        Ok(Self {
            directory,
            config,
            db,
            decks,
            cards,
        })
    }

    /// IDs of stored progress records whose card is in no deck, sorted.
    pub fn orphans(&self) -> Fallible<Vec<CardId>> {
        let deck_ids: HashSet<&CardId> = self.cards.iter().map(|card| card.id()).collect();
        let mut orphans: Vec<CardId> = self
            .db
            .card_ids()?
            .into_iter()
            .filter(|id| !deck_ids.contains(id))
            .collect();
        orphans.sort();
        Ok(orphans)
    }
}
