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

use std::io::BufRead;
use std::io::Write;
use std::io::stdin;
use std::io::stdout;

use rand::Rng;
use rand::seq::SliceRandom;
use rand::thread_rng;

use crate::collection::Collection;
use crate::error::Fallible;
use crate::scheduler::days_until_due;
use crate::scheduler::due_for_review;
use crate::scheduler::session_accuracy;
use crate::types::card::SpacedRepetitionCard;
use crate::types::outcome::Outcome;
use crate::types::review::Review;
use crate::types::timestamp::Timestamp;

pub fn study(directory: Option<String>, limit: Option<usize>, no_shuffle: bool) -> Fallible<()> {
    let started_at = Timestamp::now();
    let coll = Collection::new(directory, started_at)?;

    let due: Vec<SpacedRepetitionCard> = due_for_review(&coll.cards, started_at)
        .into_iter()
        .cloned()
        .collect();
    if due.is_empty() {
        println!("No cards due for review.");
        let next = coll
            .cards
            .iter()
            .map(|card| days_until_due(&card.progress, started_at))
            .min();
        if let Some(days) = next {
            println!("Next review in {days} day(s).");
        }
        return Ok(());
    }

    let shuffle = coll.config.shuffle && !no_shuffle;
    let limit = limit.or(coll.config.session_limit);
    let queue = order_queue(due, shuffle, limit, &mut thread_rng());
    log::debug!("Starting session with {} cards", queue.len());

    let reviews = {
        let mut input = stdin().lock();
        let mut output = stdout().lock();
        drill(queue, &mut input, &mut output, Timestamp::now)?
    };
    if reviews.is_empty() {
        println!("No cards reviewed.");
        return Ok(());
    }
    coll.db.save_session(started_at, Timestamp::now(), &reviews)?;
    println!("{}", summarize(&reviews));
    Ok(())
}

/// Orders the cards of a session: shuffled if requested, then cut down to
/// `limit` cards.
pub fn order_queue<T, R: Rng>(
    mut cards: Vec<T>,
    shuffle: bool,
    limit: Option<usize>,
    rng: &mut R,
) -> Vec<T> {
    if shuffle {
        cards.shuffle(rng);
    }
    if let Some(limit) = limit {
        cards.truncate(limit);
    }
    cards
}

/// Runs the question/answer loop over `queue`, returning the reviews made.
/// Stops early on `q` or end of input.
pub fn drill<R: BufRead, W: Write>(
    queue: Vec<SpacedRepetitionCard>,
    input: &mut R,
    output: &mut W,
    mut clock: impl FnMut() -> Timestamp,
) -> Fallible<Vec<Review>> {
    let total = queue.len();
    let mut reviews = Vec::new();
    for (i, card) in queue.into_iter().enumerate() {
        let leitner_box = card.progress.leitner_box;
        writeln!(
            output,
            "[{}/{}] Box {} ({})",
            i + 1,
            total,
            leitner_box,
            leitner_box.label()
        )?;
        writeln!(output, "Q: {}", card.card.question)?;
        write!(output, "[press enter to reveal]")?;
        output.flush()?;
        if read_line(input)?.is_none() {
            break;
        }
        writeln!(output, "A: {}", card.card.answer)?;
        let outcome = match read_outcome(input, output)? {
            Some(outcome) => outcome,
            None => break,
        };
        let review = Review::new(card.progress, outcome, clock());
        log::debug!(
            "{} {} box {} -> {} next={}",
            review.card_id(),
            outcome.as_str(),
            review.before.leitner_box,
            review.after.leitner_box,
            review.after.next_review
        );
        writeln!(
            output,
            "-> Box {} ({})\n",
            review.after.leitner_box,
            review.after.leitner_box.label()
        )?;
        reviews.push(review);
    }
    Ok(reviews)
}

/// One-line summary of a finished session.
pub fn summarize(reviews: &[Review]) -> String {
    let correct = reviews.iter().filter(|r| r.outcome.is_correct()).count() as u32;
    let incorrect = reviews.len() as u32 - correct;
    format!(
        "Session complete: {} reviewed, {} correct, {} incorrect, {}% accuracy.",
        reviews.len(),
        correct,
        incorrect,
        session_accuracy(correct, incorrect)
    )
}

fn read_outcome<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> Fallible<Option<Outcome>> {
    loop {
        write!(output, "Correct? [y]es / [n]o / [q]uit: ")?;
        output.flush()?;
        let line = match read_line(input)? {
            Some(line) => line,
            None => return Ok(None),
        };
        match line.trim().to_lowercase().as_str() {
            "y" | "yes" => return Ok(Some(Outcome::Correct)),
            "n" | "no" => return Ok(Some(Outcome::Incorrect)),
            "q" | "quit" => return Ok(None),
            _ => writeln!(output, "Please answer y, n, or q.")?,
        }
    }
}

/// Reads one line, or `None` at end of input.
fn read_line<R: BufRead>(input: &mut R) -> Fallible<Option<String>> {
    let mut line = String::new();
    let read = input.read_line(&mut line)?;
    if read == 0 { Ok(None) } else { Ok(Some(line)) }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use chrono::TimeZone;
    use chrono::Utc;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::scheduler::initialize;
    use crate::types::card::Flashcard;
    use crate::types::card_id::CardId;

    fn t0() -> Timestamp {
        Timestamp::new(Utc.with_ymd_and_hms(2025, 6, 1, 8, 0, 0).unwrap())
    }

    fn queue(ids: &[&str]) -> Vec<SpacedRepetitionCard> {
        ids.iter()
            .map(|id| {
                SpacedRepetitionCard::new(
                    Flashcard::new(*id, format!("question {id}"), format!("answer {id}")),
                    initialize(CardId::from(*id), t0()),
                )
            })
            .collect()
    }

    fn run(ids: &[&str], script: &str) -> Fallible<(Vec<Review>, String)> {
        let mut input = Cursor::new(script.as_bytes().to_vec());
        let mut output = Vec::new();
        let now = t0().plus_days(1);
        let reviews = drill(queue(ids), &mut input, &mut output, || now)?;
        Ok((reviews, String::from_utf8_lossy(&output).to_string()))
    }

    #[test]
    fn test_drill_answers() -> Fallible<()> {
        let (reviews, output) = run(&["a", "b"], "\ny\n\nn\n")?;
        assert_eq!(reviews.len(), 2);
        assert_eq!(reviews[0].outcome, Outcome::Correct);
        assert_eq!(reviews[0].after.leitner_box.number(), 2);
        assert_eq!(reviews[0].after.next_review, t0().plus_days(4));
        assert_eq!(reviews[1].outcome, Outcome::Incorrect);
        assert_eq!(reviews[1].after.leitner_box.number(), 1);
        assert!(output.contains("Q: question a"));
        assert!(output.contains("A: answer b"));
        assert!(output.contains("[1/2] Box 1 (Daily Review)"));
        Ok(())
    }

    #[test]
    fn test_drill_reprompts_on_invalid_answer() -> Fallible<()> {
        let (reviews, output) = run(&["a"], "\nmaybe\nYES\n")?;
        assert_eq!(reviews.len(), 1);
        assert_eq!(reviews[0].outcome, Outcome::Correct);
        assert!(output.contains("Please answer y, n, or q."));
        Ok(())
    }

    #[test]
    fn test_drill_quit() -> Fallible<()> {
        let (reviews, _) = run(&["a", "b", "c"], "\nn\n\nq\n")?;
        assert_eq!(reviews.len(), 1);
        Ok(())
    }

    #[test]
    fn test_drill_end_of_input() -> Fallible<()> {
        let (reviews, _) = run(&["a", "b"], "\ny\n")?;
        assert_eq!(reviews.len(), 1);
        Ok(())
    }

    #[test]
    fn test_order_queue_limit() {
        let mut rng = StdRng::seed_from_u64(7);
        let cards = order_queue(vec![1, 2, 3, 4, 5], false, Some(3), &mut rng);
        assert_eq!(cards, vec![1, 2, 3]);
        let cards = order_queue(vec![1, 2], false, Some(10), &mut rng);
        assert_eq!(cards, vec![1, 2]);
    }

    #[test]
    fn test_order_queue_shuffle_keeps_cards() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut cards = order_queue((0..20).collect::<Vec<u32>>(), true, None, &mut rng);
        cards.sort();
        assert_eq!(cards, (0..20).collect::<Vec<u32>>());
    }

    #[test]
    fn test_summarize() -> Fallible<()> {
        let (reviews, _) = run(&["a", "b", "c", "d"], "\ny\n\ny\n\nn\n\ny\n")?;
        assert_eq!(
            summarize(&reviews),
            "Session complete: 4 reviewed, 3 correct, 1 incorrect, 75% accuracy."
        );
        Ok(())
    }
}
