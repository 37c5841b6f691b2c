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
use std::collections::HashSet;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;

use rusqlite::Connection;
use rusqlite::Row;
use rusqlite::Transaction;
use rusqlite::config::DbConfig;

use crate::error::Fallible;
use crate::error::fail;
use crate::types::card_id::CardId;
use crate::types::leitner_box::LeitnerBox;
use crate::types::outcome::Outcome;
use crate::types::progress::CardProgress;
use crate::types::review::Review;
use crate::types::timestamp::Timestamp;

#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

/// A stored study session, with its reviews in the order they happened.
pub struct SessionRow {
    pub started_at: Timestamp,
    pub ended_at: Timestamp,
    pub reviews: Vec<ReviewRow>,
}

pub struct ReviewRow {
    pub card_id: CardId,
    pub reviewed_at: Timestamp,
    pub outcome: Outcome,
    pub box_before: LeitnerBox,
    pub box_after: LeitnerBox,
    pub next_review: Timestamp,
}

impl Database {
    pub fn new(database_path: &str) -> Fallible<Self> {
        log::debug!("Opening database {database_path}");
        let mut conn = Connection::open(database_path)?;
        conn.set_db_config(DbConfig::SQLITE_DBCONFIG_ENABLE_FKEY, true)?;
        {
            let tx = conn.transaction()?;
            if !probe_schema_exists(&tx)? {
                log::debug!("Creating schema");
                tx.execute_batch(include_str!("schema.sql"))?;
                tx.commit()?;
            }
        }
        let conn = Arc::new(Mutex::new(conn));
        Ok(Self { conn })
    }

    /// Return the set of all card IDs with stored progress.
    pub fn card_ids(&self) -> Fallible<HashSet<CardId>> {
        let mut ids = HashSet::new();
        let conn = self.acquire();
        let mut stmt = conn.prepare("select card_id from progress;")?;
        let mut rows = stmt.query([])?;
        while let Some(row) = rows.next()? {
            let id: CardId = row.get(0)?;
            ids.insert(id);
        }
        Ok(ids)
    }

    /// Store the progress of a card seen for the first time.
    ///
    /// If the card already has stored progress, returns an error.
    pub fn insert_progress(&self, progress: &CardProgress) -> Fallible<()> {
        log::debug!("Adding progress for new card: {}", progress.card_id);
        let mut conn = self.acquire();
        let tx = conn.transaction()?;
        let sql = "insert into progress (card_id, box, last_reviewed, next_review, review_count, correct_streak, total_reviews, correct_reviews) values (?, ?, ?, ?, ?, ?, ?, ?);";
        tx.execute(
            sql,
            (
                &progress.card_id,
                progress.leitner_box,
                progress.last_reviewed,
                progress.next_review,
                progress.review_count,
                progress.correct_streak,
                progress.total_reviews,
                progress.correct_reviews,
            ),
        )?;
        tx.commit()?;
        Ok(())
    }

    /// Get a card's stored progress, if any.
    pub fn get_progress(&self, card_id: &CardId) -> Fallible<Option<CardProgress>> {
        let conn = self.acquire();
        let sql = "select card_id, box, last_reviewed, next_review, review_count, correct_streak, total_reviews, correct_reviews from progress where card_id = ?;";
        let mut stmt = conn.prepare(sql)?;
        let mut rows = stmt.query([card_id])?;
        match rows.next()? {
            Some(row) => Ok(Some(progress_from_row(row)?)),
            None => Ok(None),
        }
    }

    /// All stored progress, keyed by card ID.
    pub fn all_progress(&self) -> Fallible<HashMap<CardId, CardProgress>> {
        let mut map = HashMap::new();
        let conn = self.acquire();
        let sql = "select card_id, box, last_reviewed, next_review, review_count, correct_streak, total_reviews, correct_reviews from progress;";
        let mut stmt = conn.prepare(sql)?;
        let mut rows = stmt.query([])?;
        while let Some(row) = rows.next()? {
            let progress = progress_from_row(row)?;
            map.insert(progress.card_id.clone(), progress);
        }
        Ok(map)
    }

    /// Delete a card's progress and review history. Returns whether anything
    /// was deleted.
    pub fn delete_progress(&self, card_id: &CardId) -> Fallible<bool> {
        let mut conn = self.acquire();
        let tx = conn.transaction()?;
        let deleted = tx.execute("delete from progress where card_id = ?;", [card_id])?;
        tx.commit()?;
        Ok(deleted > 0)
    }

    /// Save a study session: record the session and its reviews, and store the
    /// new progress of every reviewed card.
    ///
    /// Each review must have been computed from the progress currently stored
    /// for its card, or from fresh progress if nothing is stored yet. If
    /// another writer got there first, nothing is saved and an error is
    /// returned.
    pub fn save_session(
        &self,
        started_at: Timestamp,
        ended_at: Timestamp,
        reviews: &[Review],
    ) -> Fallible<()> {
        let mut conn = self.acquire();
        let tx = conn.transaction()?;
        let session_id = insert_session(&tx, started_at, ended_at)?;
        for review in reviews {
            if review.before.total_reviews == 0 {
                insert_unseen_progress(&tx, &review.before)?;
            }
            update_progress(&tx, &review.before, &review.after)?;
            insert_review(&tx, session_id, review)?;
        }
        tx.commit()?;
        log::debug!("Saved session with {} reviews", reviews.len());
        Ok(())
    }

    /// Number of reviews made at or after `since`.
    pub fn count_reviews_since(&self, since: Timestamp) -> Fallible<usize> {
        let conn = self.acquire();
        let sql = "select count(*) from reviews where reviewed_at >= ?;";
        let count: i64 = conn.query_row(sql, [since], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// All sessions, oldest first.
    pub fn sessions(&self) -> Fallible<Vec<SessionRow>> {
        let conn = self.acquire();
        let mut sessions = Vec::new();
        let sql = "select session_id, started_at, ended_at from sessions order by started_at;";
        let mut stmt = conn.prepare(sql)?;
        let sql = "select card_id, reviewed_at, correct, box_before, box_after, next_review from reviews where session_id = ? order by review_id;";
        let mut review_stmt = conn.prepare(sql)?;
        let mut rows = stmt.query([])?;
        while let Some(row) = rows.next()? {
            let session_id: SessionId = row.get(0)?;
            let mut reviews = Vec::new();
            let mut review_rows = review_stmt.query([session_id])?;
            while let Some(r) = review_rows.next()? {
                reviews.push(ReviewRow {
                    card_id: r.get(0)?,
                    reviewed_at: r.get(1)?,
                    outcome: r.get(2)?,
                    box_before: r.get(3)?,
                    box_after: r.get(4)?,
                    next_review: r.get(5)?,
                });
            }
            sessions.push(SessionRow {
                started_at: row.get(1)?,
                ended_at: row.get(2)?,
                reviews,
            });
        }
        Ok(sessions)
    }

    fn acquire(&self) -> MutexGuard<'_, Connection> {
        self.conn
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn progress_from_row(row: &Row) -> Fallible<CardProgress> {
    Ok(CardProgress {
        card_id: row.get(0)?,
        leitner_box: row.get(1)?,
        last_reviewed: row.get(2)?,
        next_review: row.get(3)?,
        review_count: row.get(4)?,
        correct_streak: row.get(5)?,
        total_reviews: row.get(6)?,
        correct_reviews: row.get(7)?,
    })
}

type SessionId = i64;

fn insert_session(
    tx: &Transaction,
    started_at: Timestamp,
    ended_at: Timestamp,
) -> Fallible<SessionId> {
    let sql = "insert into sessions (started_at, ended_at) values (?, ?) returning session_id;";
    let session_id: SessionId = tx.query_row(sql, (started_at, ended_at), |row| row.get(0))?;
    Ok(session_id)
}

/// Stores fresh progress for a card reviewed for the first time. A card that
/// already has a row is left alone.
fn insert_unseen_progress(tx: &Transaction, progress: &CardProgress) -> Fallible<()> {
    let sql = "insert into progress (card_id, box, last_reviewed, next_review, review_count, correct_streak, total_reviews, correct_reviews) values (?, ?, ?, ?, ?, ?, ?, ?) on conflict (card_id) do nothing;";
    tx.execute(
        sql,
        (
            &progress.card_id,
            progress.leitner_box,
            progress.last_reviewed,
            progress.next_review,
            progress.review_count,
            progress.correct_streak,
            progress.total_reviews,
            progress.correct_reviews,
        ),
    )?;
    Ok(())
}

fn update_progress(tx: &Transaction, before: &CardProgress, after: &CardProgress) -> Fallible<()> {
    let sql = "update progress set box = ?, last_reviewed = ?, next_review = ?, review_count = ?, correct_streak = ?, total_reviews = ?, correct_reviews = ? where card_id = ? and total_reviews = ?;";
    let changed = tx.execute(
        sql,
        (
            after.leitner_box,
            after.last_reviewed,
            after.next_review,
            after.review_count,
            after.correct_streak,
            after.total_reviews,
            after.correct_reviews,
            &after.card_id,
            before.total_reviews,
        ),
    )?;
    if changed == 0 {
        return fail(format!(
            "progress for card {} was changed or removed since it was loaded.",
            after.card_id
        ));
    }
    Ok(())
}

fn insert_review(tx: &Transaction, session_id: SessionId, review: &Review) -> Fallible<()> {
    let sql = "insert into reviews (session_id, card_id, reviewed_at, correct, box_before, box_after, next_review) values (?, ?, ?, ?, ?, ?, ?);";
    tx.execute(
        sql,
        (
            session_id,
            review.card_id(),
            review.reviewed_at,
            review.outcome,
            review.before.leitner_box,
            review.after.leitner_box,
            review.after.next_review,
        ),
    )?;
    Ok(())
}

fn probe_schema_exists(tx: &Transaction) -> Fallible<bool> {
    let sql = "select count(*) from sqlite_master where type='table' AND name=?;";
    let count: i64 = tx.query_row(sql, ["progress"], |row| row.get(0))?;
    Ok(count > 0)
}
