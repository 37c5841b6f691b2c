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

use clap::ValueEnum;
use serde::Serialize;

use crate::collection::Collection;
use crate::error::Fallible;
use crate::scheduler::due_for_review;
use crate::scheduler::group_by_box;
use crate::scheduler::overall_accuracy;
use crate::types::leitner_box::BoxTier;
use crate::types::leitner_box::LeitnerBox;
use crate::types::timestamp::Timestamp;

#[derive(ValueEnum, Clone)]
pub enum StatsFormat {
    /// Plain text output.
    Text,
    /// JSON output.
    Json,
}

impl Display for StatsFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StatsFormat::Text => write!(f, "text"),
            StatsFormat::Json => write!(f, "json"),
        }
    }
}

pub fn print_stats(directory: Option<String>, format: StatsFormat) -> Fallible<()> {
    let now = Timestamp::now();
    let coll = Collection::new(directory, now)?;
    let stats = get_stats(&coll, now)?;
    match format {
        StatsFormat::Text => {
            println!("{}", stats.to_text());
        }
        StatsFormat::Json => {
            let stats_json = serde_json::to_string_pretty(&stats)?;
            println!("{}", stats_json);
        }
    }
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    deck_count: usize,
    total_cards: usize,
    due_cards: usize,
    mastered_cards: usize,
    reviews_today: usize,
    accuracy: u8,
    boxes: Vec<BoxStats>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BoxStats {
    #[serde(rename = "box")]
    leitner_box: LeitnerBox,
    label: &'static str,
    tier: BoxTier,
    interval_days: i64,
    card_count: usize,
}

fn get_stats(coll: &Collection, now: Timestamp) -> Fallible<Stats> {
    let groups = group_by_box(&coll.cards);
    let boxes: Vec<BoxStats> = groups
        .iter()
        .map(|(leitner_box, cards)| BoxStats {
            leitner_box: *leitner_box,
            label: leitner_box.label(),
            tier: leitner_box.tier(),
            interval_days: leitner_box.interval_days(),
            card_count: cards.len(),
        })
        .collect();
    Ok(Stats {
        deck_count: coll.decks.len(),
        total_cards: coll.cards.len(),
        due_cards: due_for_review(&coll.cards, now).len(),
        mastered_cards: groups[&LeitnerBox::LAST].len(),
        reviews_today: coll.db.count_reviews_since(now.start_of_local_day())?,
        accuracy: overall_accuracy(coll.cards.iter().map(|card| &card.progress)),
        boxes,
    })
}

impl Stats {
    fn to_text(&self) -> String {
        let mut lines = vec![
            format!("Decks:          {}", self.deck_count),
            format!("Cards:          {}", self.total_cards),
            format!("Due now:        {}", self.due_cards),
            format!("Mastered:       {}", self.mastered_cards),
            format!("Reviews today:  {}", self.reviews_today),
            format!("Accuracy:       {}%", self.accuracy),
        ];
        for b in &self.boxes {
            lines.push(format!(
                "Box {} ({}):{}{}",
                b.leitner_box,
                b.label,
                " ".repeat(14usize.saturating_sub(b.label.len())),
                b.card_count
            ));
        }
        lines.join("\n")
    }
}
