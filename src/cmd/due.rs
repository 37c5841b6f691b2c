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

use crate::collection::Collection;
use crate::error::Fallible;
use crate::scheduler::days_until_due;
use crate::scheduler::due_for_review;
use crate::types::card::SpacedRepetitionCard;
use crate::types::timestamp::Timestamp;

pub fn list_due(directory: Option<String>, all: bool) -> Fallible<()> {
    let now = Timestamp::now();
    let coll = Collection::new(directory, now)?;
    let lines = due_lines(&coll.cards, now, all);
    if lines.is_empty() {
        println!("No cards due for review.");
    }
    for line in lines {
        println!("{line}");
    }
    Ok(())
}

/// One line per due card, or per card if `all` is set, soonest first.
fn due_lines(cards: &[SpacedRepetitionCard], now: Timestamp, all: bool) -> Vec<String> {
    let mut selected: Vec<&SpacedRepetitionCard> = if all {
        cards.iter().collect()
    } else {
        due_for_review(cards, now)
    };
    selected.sort_by_key(|card| card.progress.next_review);
    selected
        .into_iter()
        .map(|card| {
            let progress = &card.progress;
            let days = days_until_due(progress, now);
            let when = match days {
                0 => "due now".to_string(),
                1 => "in 1 day".to_string(),
                n => format!("in {n} days"),
            };
            format!(
                "{}\tBox {} ({})\t{}\t{}",
                card.id(),
                progress.leitner_box,
                progress.leitner_box.label(),
                when,
                card.card.question
            )
        })
        .collect()
}
