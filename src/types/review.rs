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

use crate::scheduler::apply;
use crate::types::card_id::CardId;
use crate::types::outcome::Outcome;
use crate::types::progress::CardProgress;
use crate::types::timestamp::Timestamp;

/// One answered card in a study session.
#[derive(Clone, Debug)]
pub struct Review {
    pub reviewed_at: Timestamp,
    pub outcome: Outcome,
    /// The progress the review was computed from.
    pub before: CardProgress,
    /// The progress after the review.
    pub after: CardProgress,
}

impl Review {
    pub fn new(before: CardProgress, outcome: Outcome, reviewed_at: Timestamp) -> Self {
        let after = apply(&before, outcome, reviewed_at);
        Self {
            reviewed_at,
            outcome,
            before,
            after,
        }
    }

    pub fn card_id(&self) -> &CardId {
        &self.after.card_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::initialize;

    #[test]
    fn test_review_keeps_both_states() {
        let now = Timestamp::now();
        let before = initialize(CardId::from("c1"), now);
        let review = Review::new(before.clone(), Outcome::Correct, now.plus_days(1));
        assert_eq!(review.before, before);
        assert_eq!(review.after.leitner_box.number(), 2);
        assert_eq!(review.card_id(), &CardId::from("c1"));
    }
}
