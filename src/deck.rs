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
use std::fs::read_to_string;
use std::path::Path;

use serde::Deserialize;
use serde::Serialize;
use walkdir::WalkDir;

use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::error::fail;
use crate::types::card::Flashcard;
use crate::types::timestamp::Timestamp;

/// A named collection of flashcards, as stored in a deck file.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deck {
    pub id: String,
    pub name: String,
    pub cards: Vec<Flashcard>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
}

/// A deck file holds either a single deck or a list of decks.
#[derive(Deserialize)]
#[serde(untagged)]
enum DeckFile {
    Single(Deck),
    Many(Vec<Deck>),
}

/// Parses the contents of a single deck file.
pub fn parse_deck_content(content: &str) -> Fallible<Vec<Deck>> {
    let file: DeckFile = serde_json::from_str(content)?;
    let decks = match file {
        DeckFile::Single(deck) => vec![deck],
        DeckFile::Many(decks) => decks,
    };
    Ok(decks)
}

/// Loads every `.json` deck file under `directory`, in path order, and checks
/// the result for empty cards and duplicate card IDs.
pub fn parse_decks(directory: &Path) -> Fallible<Vec<Deck>> {
    if !directory.exists() {
        return fail("directory does not exist.");
    }
    let mut decks = Vec::new();
    for entry in WalkDir::new(directory).sort_by_file_name() {
        let entry = entry?;
        let path = entry.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
            log::debug!("Reading deck file {}", path.display());
            let content = read_to_string(path)?;
            let parsed = parse_deck_content(&content).map_err(|e| {
                ErrorReport::new(format!("{}: {}", path.display(), e.message()))
            })?;
            decks.extend(parsed);
        }
    }
    validate_decks(&decks)?;
    Ok(decks)
}

/// All cards across the given decks, in deck order.
pub fn all_cards(decks: &[Deck]) -> Vec<Flashcard> {
    decks.iter().flat_map(|deck| deck.cards.clone()).collect()
}

fn validate_decks(decks: &[Deck]) -> Fallible<()> {
    let mut seen = HashSet::new();
    for deck in decks {
        for card in &deck.cards {
            if card.question.trim().is_empty() {
                return fail(format!(
                    "card {} in deck '{}' has an empty question.",
                    card.id, deck.name
                ));
            }
            if card.answer.trim().is_empty() {
                return fail(format!(
                    "card {} in deck '{}' has an empty answer.",
                    card.id, deck.name
                ));
            }
            if !seen.insert(card.id.clone()) {
                return fail(format!("duplicate card ID: {}", card.id));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs::write;

    use tempfile::tempdir;

    use super::*;
    use crate::types::card::Difficulty;

    #[test]
    fn test_parse_single_deck() -> Fallible<()> {
        let content = r#"{
            "id": "geo",
            "name": "Geography",
            "cards": [
                {"id": "g1", "question": "Capital of France?", "answer": "Paris", "difficulty": "Easy"}
            ],
            "createdAt": "2025-01-01T00:00:00.000Z",
            "totalCards": 1
        }"#;
        let decks = parse_deck_content(content)?;
        assert_eq!(decks.len(), 1);
        assert_eq!(decks[0].name, "Geography");
        assert_eq!(decks[0].cards[0].difficulty, Difficulty::Easy);
        assert!(decks[0].created_at.is_some());
        Ok(())
    }

    #[test]
    fn test_parse_deck_list() -> Fallible<()> {
        let content = r#"[
            {"id": "a", "name": "A", "cards": []},
            {"id": "b", "name": "B", "cards": [{"id": "b1", "question": "Q", "answer": "A"}]}
        ]"#;
        let decks = parse_deck_content(content)?;
        assert_eq!(decks.len(), 2);
        assert_eq!(all_cards(&decks).len(), 1);
        Ok(())
    }

    #[test]
    fn test_invalid_json() {
        assert!(parse_deck_content("{ not json").is_err());
    }

    #[test]
    fn test_non_existent_directory() {
        assert!(parse_decks(Path::new("./derpherp")).is_err());
    }

    #[test]
    fn test_test_directory() -> Fallible<()> {
        let decks = parse_decks(Path::new("./test"))?;
        assert_eq!(decks.len(), 3);
        assert_eq!(all_cards(&decks).len(), 7);
        Ok(())
    }

    #[test]
    fn test_duplicate_ids() -> Fallible<()> {
        let dir = tempdir()?;
        write(
            dir.path().join("one.json"),
            r#"{"id": "a", "name": "A", "cards": [{"id": "x", "question": "Q1", "answer": "A1"}]}"#,
        )?;
        write(
            dir.path().join("two.json"),
            r#"{"id": "b", "name": "B", "cards": [{"id": "x", "question": "Q2", "answer": "A2"}]}"#,
        )?;
        let err = parse_decks(dir.path()).unwrap_err();
        assert_eq!(err.to_string(), "duplicate card ID: x");
        Ok(())
    }

    #[test]
    fn test_empty_answer() -> Fallible<()> {
        let dir = tempdir()?;
        write(
            dir.path().join("deck.json"),
            r#"{"id": "a", "name": "A", "cards": [{"id": "x", "question": "Q", "answer": "  "}]}"#,
        )?;
        assert!(parse_decks(dir.path()).is_err());
        Ok(())
    }

    #[test]
    fn test_error_names_file() -> Fallible<()> {
        let dir = tempdir()?;
        write(dir.path().join("broken.json"), "[1, 2")?;
        let err = parse_decks(dir.path()).unwrap_err();
        assert!(err.to_string().contains("broken.json"));
        Ok(())
    }
}
