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

use serde::Deserialize;
use serde::Serialize;

use crate::types::card_id::CardId;
use crate::types::leitner_box::LeitnerBox;
use crate::types::timestamp::Timestamp;

/// Review state of one card.
///
/// Records are produced by [`crate::scheduler::initialize`] and
/// [`crate::scheduler::apply`]; storing them is the caller's job.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardProgress {
    /// The card this record belongs to.
    pub card_id: CardId,
    /// The card's current Leitner box.
    #[serde(rename = "box")]
    pub leitner_box: LeitnerBox,
    /// When the card was last reviewed. Creation time for new cards.
    pub last_reviewed: Timestamp,
    /// When the card becomes due.
    pub next_review: Timestamp,
    /// Number of reviews. Always equal to `total_reviews`; kept for
    /// compatibility with stored data.
    pub review_count: u32,
    /// Consecutive correct answers since the last incorrect one.
    pub correct_streak: u32,
    /// Number of reviews.
    pub total_reviews: u32,
    /// Number of correct reviews. Never exceeds `total_reviews`.
    pub correct_reviews: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Fallible;

    #[test]
    fn test_json_field_names() -> Fallible<()> {
        let json = r#"{
            "cardId": "c1",
            "box": 3,
            "lastReviewed": "2025-01-01T00:00:00.000Z",
            "nextReview": "2025-01-08T00:00:00.000Z",
            "reviewCount": 2,
            "correctStreak": 2,
            "totalReviews": 2,
            "correctReviews": 2
        }"#;
        let progress: CardProgress = serde_json::from_str(json)?;
        assert_eq!(progress.card_id, CardId::from("c1"));
        assert_eq!(progress.leitner_box.number(), 3);
        assert_eq!(progress.correct_streak, 2);
        let value = serde_json::to_value(&progress)?;
        assert_eq!(value["box"], 3);
        assert_eq!(value["nextReview"], "2025-01-08T00:00:00.000Z");
        Ok(())
    }

    #[test]
    fn test_rejects_corrupt_box() {
        let json = r#"{
            "cardId": "c1",
            "box": 7,
            "lastReviewed": "2025-01-01T00:00:00.000Z",
            "nextReview": "2025-01-02T00:00:00.000Z",
            "reviewCount": 0,
            "correctStreak": 0,
            "totalReviews": 0,
            "correctReviews": 0
        }"#;
        assert!(serde_json::from_str::<CardProgress>(json).is_err());
    }
}
