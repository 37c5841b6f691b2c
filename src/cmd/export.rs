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

use std::collections::HashMap;
use std::fmt::Display;
use std::fmt::Formatter;
use std::io::Write;
use std::io::stdout;

use clap::ValueEnum;
use serde::Serialize;

use crate::collection::Collection;
use crate::db::SessionRow;
use crate::error::Fallible;
use crate::scheduler::accuracy_rate;
use crate::types::card::Difficulty;
use crate::types::card::SpacedRepetitionCard;
use crate::types::card_id::CardId;
use crate::types::leitner_box::LeitnerBox;
use crate::types::outcome::Outcome;
use crate::types::progress::CardProgress;
use crate::types::timestamp::Timestamp;

#[derive(ValueEnum, Clone)]
pub enum ExportFormat {
    /// Decks, cards, progress, and sessions as JSON.
    Json,
    /// One row per card, as CSV.
    Csv,
}

impl Display for ExportFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportFormat::Json => write!(f, "json"),
            ExportFormat::Csv => write!(f, "csv"),
        }
    }
}

pub fn export_collection(directory: Option<String>, format: ExportFormat) -> Fallible<()> {
    let coll: Collection = Collection::new(directory, Timestamp::now())?;
    let mut out = stdout().lock();
    match format {
        ExportFormat::Json => write_json(&coll, &mut out),
        ExportFormat::Csv => write_csv(&coll, &mut out),
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Export {
    decks: Vec<DeckExport>,
    sessions: Vec<SessionExport>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DeckExport {
    id: String,
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    created_at: Option<Timestamp>,
    total_cards: usize,
    cards: Vec<CardExport>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CardExport {
    id: CardId,
    question: String,
    answer: String,
    difficulty: Difficulty,
    #[serde(skip_serializing_if = "Option::is_none")]
    category: Option<String>,
    progress: CardProgress,
    accuracy: u8,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SessionExport {
    started_at: Timestamp,
    ended_at: Timestamp,
    reviews: Vec<ReviewExport>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ReviewExport {
    card_id: CardId,
    reviewed_at: Timestamp,
    outcome: Outcome,
    box_before: LeitnerBox,
    box_after: LeitnerBox,
    next_review: Timestamp,
}

#[derive(Serialize)]
struct CsvRow<'a> {
    deck: &'a str,
    id: &'a CardId,
    question: &'a str,
    answer: &'a str,
    difficulty: Difficulty,
    category: Option<&'a str>,
    #[serde(rename = "box")]
    leitner_box: LeitnerBox,
    box_label: &'static str,
    last_reviewed: Timestamp,
    next_review: Timestamp,
    total_reviews: u32,
    correct_reviews: u32,
    correct_streak: u32,
    accuracy: u8,
}

fn write_json<W: Write>(coll: &Collection, out: &mut W) -> Fallible<()> {
    let export = get_export(coll)?;
    serde_json::to_writer_pretty(&mut *out, &export)?;
    writeln!(out)?;
    Ok(())
}

fn write_csv<W: Write>(coll: &Collection, out: &mut W) -> Fallible<()> {
    let by_id = cards_by_id(coll);
    let mut writer = csv::Writer::from_writer(out);
    for deck in &coll.decks {
        for card in &deck.cards {
            let Some(sr) = by_id.get(&card.id) else {
                continue;
            };
            let progress = &sr.progress;
            writer.serialize(CsvRow {
                deck: &deck.name,
                id: &card.id,
                question: &card.question,
                answer: &card.answer,
                difficulty: card.difficulty,
                category: card.category.as_deref(),
                leitner_box: progress.leitner_box,
                box_label: progress.leitner_box.label(),
                last_reviewed: progress.last_reviewed,
                next_review: progress.next_review,
                total_reviews: progress.total_reviews,
                correct_reviews: progress.correct_reviews,
                correct_streak: progress.correct_streak,
                accuracy: accuracy_rate(progress),
            })?;
        }
    }
    writer.flush()?;
    Ok(())
}

fn cards_by_id(coll: &Collection) -> HashMap<&CardId, &SpacedRepetitionCard> {
    coll.cards.iter().map(|card| (card.id(), card)).collect()
}

fn get_export(coll: &Collection) -> Fallible<Export> {
    let by_id = cards_by_id(coll);
    let decks = coll
        .decks
        .iter()
        .map(|deck| {
            let cards: Vec<CardExport> = deck
                .cards
                .iter()
                .filter_map(|card| by_id.get(&card.id))
                .map(|sr| CardExport {
                    id: sr.card.id.clone(),
                    question: sr.card.question.clone(),
                    answer: sr.card.answer.clone(),
                    difficulty: sr.card.difficulty,
                    category: sr.card.category.clone(),
                    progress: sr.progress.clone(),
                    accuracy: accuracy_rate(&sr.progress),
                })
                .collect();
            DeckExport {
                id: deck.id.clone(),
                name: deck.name.clone(),
                created_at: deck.created_at,
                total_cards: cards.len(),
                cards,
            }
        })
        .collect();
    let sessions = coll
        .db
        .sessions()?
        .into_iter()
        .map(session_export)
        .collect();
    Ok(Export { decks, sessions })
}

fn session_export(session: SessionRow) -> SessionExport {
    SessionExport {
        started_at: session.started_at,
        ended_at: session.ended_at,
        reviews: session
            .reviews
            .into_iter()
            .map(|r| ReviewExport {
                card_id: r.card_id,
                reviewed_at: r.reviewed_at,
                outcome: r.outcome,
                box_before: r.box_before,
                box_after: r.box_after,
                next_review: r.next_review,
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::helper::create_tmp_copy_of_test_directory;
    use crate::types::review::Review;

    fn reviewed_collection() -> Fallible<(tempfile::TempDir, Collection)> {
        let (guard, dir) = create_tmp_copy_of_test_directory()?;
        let now = Timestamp::now();
        let coll = Collection::new(Some(dir.clone()), now)?;
        let review = Review::new(coll.cards[0].progress.clone(), Outcome::Correct, now);
        coll.db.save_session(now, now, &[review])?;
        let coll = Collection::new(Some(dir), now)?;
        Ok((guard, coll))
    }

    #[test]
    fn test_json_export() -> Fallible<()> {
        let (_guard, coll) = reviewed_collection()?;
        let mut out = Vec::new();
        write_json(&coll, &mut out)?;
        let value: serde_json::Value = serde_json::from_slice(&out)?;
        let decks = value["decks"].as_array().map(Vec::len);
        assert_eq!(decks, Some(3));
        assert_eq!(value["decks"][0]["name"], "Biology");
        assert_eq!(value["decks"][0]["totalCards"], 2);
        assert_eq!(value["decks"][0]["cards"][0]["progress"]["box"], 2);
        assert_eq!(value["decks"][0]["cards"][0]["accuracy"], 100);
        assert_eq!(value["sessions"][0]["reviews"][0]["cardId"], "bio-1");
        assert_eq!(value["sessions"][0]["reviews"][0]["outcome"], "correct");
        Ok(())
    }

    #[test]
    fn test_csv_export() -> Fallible<()> {
        let (_guard, coll) = reviewed_collection()?;
        let mut out = Vec::new();
        write_csv(&coll, &mut out)?;
        let text = String::from_utf8_lossy(&out).to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 8);
        assert!(lines[0].starts_with("deck,id,question,answer,difficulty,category,box,box_label"));
        assert!(lines[1].starts_with("Biology,bio-1,What is the powerhouse of the cell?"));
        assert!(lines[1].contains(",2,Every 3 Days,"));
        Ok(())
    }
}
