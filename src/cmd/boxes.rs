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

use std::collections::BTreeMap;

use crate::collection::Collection;
use crate::error::Fallible;
use crate::scheduler::group_by_box;
use crate::types::card::SpacedRepetitionCard;
use crate::types::leitner_box::LeitnerBox;
use crate::types::timestamp::Timestamp;

pub fn print_boxes(directory: Option<String>) -> Fallible<()> {
    let coll = Collection::new(directory, Timestamp::now())?;
    for line in box_lines(&group_by_box(&coll.cards)) {
        println!("{line}");
    }
    Ok(())
}

fn box_lines(groups: &BTreeMap<LeitnerBox, Vec<&SpacedRepetitionCard>>) -> Vec<String> {
    groups
        .iter()
        .map(|(leitner_box, cards)| {
            let days = leitner_box.interval_days();
            let unit = if days == 1 { "day" } else { "days" };
            let tier = leitner_box.tier();
            format!(
                "Box {}  {:<13} every {:>2} {:<4}  {:<10} ({:<6})  {} cards",
                leitner_box,
                leitner_box.label(),
                days,
                unit,
                tier.as_str(),
                tier.color(),
                cards.len()
            )
        })
        .collect()
}
