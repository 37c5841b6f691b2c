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

//! leitcards: a Leitner-box spaced repetition scheduler.
//!
//! The [`scheduler`] module is the core: pure functions that initialize,
//! advance, and query the review state of cards. The remaining modules load
//! decks from a collection directory, persist progress in SQLite, and drive
//! the `leitcards` command-line tool.

pub mod cli;
pub mod cmd;
pub mod collection;
pub mod config;
pub mod db;
pub mod deck;
pub mod error;
pub mod scheduler;
pub mod types;

#[cfg(test)]
mod helper;

pub use error::ErrorReport;
pub use error::Fallible;
pub use error::fail;
pub use scheduler::accuracy_rate;
pub use scheduler::apply;
pub use scheduler::box_label;
pub use scheduler::box_tier;
pub use scheduler::days_until_due;
pub use scheduler::due_for_review;
pub use scheduler::group_by_box;
pub use scheduler::initialize;
pub use types::card::Difficulty;
pub use types::card::Flashcard;
pub use types::card::SpacedRepetitionCard;
pub use types::card_id::CardId;
pub use types::leitner_box::BoxTier;
pub use types::leitner_box::LeitnerBox;
pub use types::outcome::Outcome;
pub use types::progress::CardProgress;
pub use types::timestamp::Timestamp;
