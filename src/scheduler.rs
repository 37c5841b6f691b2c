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

//! The Leitner-box scheduler.
//!
//! Cards live in one of five boxes. A correct answer moves a card up one box
//! (box 5 saturates); an incorrect answer sends it back to box 1. The next
//! review is scheduled a fixed number of days after the review, depending on
//! the box the card lands in:
//!
//! | box | interval | label        |
//! |-----|----------|--------------|
//! | 1   | 1 day    | Daily Review |
//! | 2   | 3 days   | Every 3 Days |
//! | 3   | 7 days   | Weekly       |
//! | 4   | 14 days  | Bi-weekly    |
//! | 5   | 30 days  | Monthly      |
//!
//! Everything here is pure: the current time is always passed in, and
//! nothing is read from or written to storage.

use std::collections::BTreeMap;

use crate::types::card::SpacedRepetitionCard;
use crate::types::card_id::CardId;
use crate::types::leitner_box::BoxTier;
use crate::types::leitner_box::LeitnerBox;
use crate::types::leitner_box::UNKNOWN_LABEL;
use crate::types::outcome::Outcome;
use crate::types::progress::CardProgress;
use crate::types::timestamp::Timestamp;

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Creates the review state of a card that has never been reviewed.
pub fn initialize(card_id: CardId, now: Timestamp) -> CardProgress {
    let leitner_box = LeitnerBox::FIRST;
    CardProgress {
        card_id,
        leitner_box,
        last_reviewed: now,
        next_review: now.plus_days(leitner_box.interval_days()),
        review_count: 0,
        correct_streak: 0,
        total_reviews: 0,
        correct_reviews: 0,
    }
}

/// Applies a review outcome, returning the new review state.
pub fn apply(progress: &CardProgress, outcome: Outcome, now: Timestamp) -> CardProgress {
    let mut next = progress.clone();
    next.last_reviewed = now;
    next.review_count += 1;
    next.total_reviews += 1;
    match outcome {
        Outcome::Correct => {
            next.correct_reviews += 1;
            next.correct_streak += 1;
            next.leitner_box = progress.leitner_box.promote();
        }
        Outcome::Incorrect => {
            next.correct_streak = 0;
            next.leitner_box = LeitnerBox::FIRST;
        }
    }
    next.next_review = now.plus_days(next.leitner_box.interval_days());
    next
}

/// The cards whose next review is at or before `now`, in input order.
pub fn due_for_review(
    cards: &[SpacedRepetitionCard],
    now: Timestamp,
) -> Vec<&SpacedRepetitionCard> {
    cards
        .iter()
        .filter(|card| card.progress.next_review <= now)
        .collect()
}

/// Groups cards by box. All five boxes are present in the result, and cards
/// keep their relative order within a box.
pub fn group_by_box(
    cards: &[SpacedRepetitionCard],
) -> BTreeMap<LeitnerBox, Vec<&SpacedRepetitionCard>> {
    let mut groups: BTreeMap<LeitnerBox, Vec<&SpacedRepetitionCard>> =
        LeitnerBox::all().map(|b| (b, Vec::new())).collect();
    for card in cards {
        groups
            .entry(card.progress.leitner_box)
            .or_default()
            .push(card);
    }
    groups
}

/// Percentage of correct reviews, rounded. Zero for unreviewed cards.
pub fn accuracy_rate(progress: &CardProgress) -> u8 {
    percentage(u64::from(progress.correct_reviews), u64::from(progress.total_reviews))
}

/// Accuracy across many cards: all correct reviews over all reviews.
pub fn overall_accuracy<'a>(progress: impl IntoIterator<Item = &'a CardProgress>) -> u8 {
    let (correct, total) = progress.into_iter().fold((0u64, 0u64), |(c, t), p| {
        (c + u64::from(p.correct_reviews), t + u64::from(p.total_reviews))
    });
    percentage(correct, total)
}

/// Accuracy of a single study session.
pub fn session_accuracy(correct: u32, incorrect: u32) -> u8 {
    percentage(u64::from(correct), u64::from(correct) + u64::from(incorrect))
}

/// Whole days until the card is due, rounded up. Overdue cards report zero.
pub fn days_until_due(progress: &CardProgress, now: Timestamp) -> u64 {
    let millis = now.millis_until(progress.next_review);
    if millis <= 0 {
        0
    } else {
        (millis as u64).div_ceil(MILLIS_PER_DAY as u64)
    }
}

/// The display name of a box number.
pub fn box_label(number: u8) -> &'static str {
    match LeitnerBox::new(number) {
        Some(b) => b.label(),
        None => UNKNOWN_LABEL,
    }
}

/// The presentation tier of a box number.
pub fn box_tier(number: u8) -> BoxTier {
    match LeitnerBox::new(number) {
        Some(b) => b.tier(),
        None => BoxTier::Unknown,
    }
}

fn percentage(part: u64, total: u64) -> u8 {
    if total == 0 {
        return 0;
    }
    let rate = (part as f64 / total as f64) * 100.0;
    rate.round().clamp(0.0, 100.0) as u8
}
