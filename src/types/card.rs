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

use std::fmt::Display;
use std::fmt::Formatter;

use serde::Deserialize;
use serde::Serialize;

use crate::types::card_id::CardId;
use crate::types::progress::CardProgress;

/// The difficulty tag attached to a card when it was written.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Display for Difficulty {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "Easy"),
            Difficulty::Medium => write!(f, "Medium"),
            Difficulty::Hard => write!(f, "Hard"),
        }
    }
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flashcard {
    pub id: CardId,
    pub question: String,
    pub answer: String,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl Flashcard {
    pub fn new(
        id: impl Into<CardId>,
        question: impl Into<String>,
        answer: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            question: question.into(),
            answer: answer.into(),
            difficulty: Difficulty::default(),
            category: None,
        }
    }
}

/// A flashcard paired with its review state.
#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
pub struct SpacedRepetitionCard {
    /// The card's content, from the deck files.
    pub card: Flashcard,
    /// The card's review state, from the database.
    pub progress: CardProgress,
}

impl SpacedRepetitionCard {
    pub fn new(card: Flashcard, progress: CardProgress) -> Self {
        Self { card, progress }
    }

    pub fn id(&self) -> &CardId {
        &self.card.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_difficulty_defaults_to_medium() {
        let card: Flashcard =
            serde_json::from_str(r#"{"id": "a", "question": "Q", "answer": "A"}"#).unwrap();
        assert_eq!(card.difficulty, Difficulty::Medium);
        assert_eq!(card.category, None);
    }

    #[test]
    fn test_parse_full_card() {
        let json = r#"{
            "id": "b",
            "question": "What is the capital of France?",
            "answer": "Paris",
            "difficulty": "Easy",
            "category": "Geography"
        }"#;
        let card: Flashcard = serde_json::from_str(json).unwrap();
        assert_eq!(card.difficulty, Difficulty::Easy);
        assert_eq!(card.category.as_deref(), Some("Geography"));
    }
}
