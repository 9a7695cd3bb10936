// Copyright 2025 The cardbox authors
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

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;

use rusqlite::Connection;
use rusqlite::Row;
use rusqlite::Transaction;
use rusqlite::config::DbConfig;

use crate::error::Fallible;
use crate::srs::MemoryState;
use crate::srs::Rating;
use crate::types::card::Card;
use crate::types::card::CardId;
use crate::types::deck::Deck;
use crate::types::deck::DeckId;
use crate::types::timestamp::Timestamp;

/// Handle to the SQLite database.
///
/// All access goes through a single mutex-guarded connection, so the
/// read-modify-write cycle of rating a card is serialized within the
/// process.
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    pub fn new(database_path: &str) -> Fallible<Self> {
        let mut conn = Connection::open(database_path)?;
        conn.set_db_config(DbConfig::SQLITE_DBCONFIG_ENABLE_FKEY, true)?;
        {
            let tx = conn.transaction()?;
            if !probe_schema_exists(&tx)? {
                tx.execute_batch(include_str!("schema.sql"))?;
                tx.commit()?;
            }
        }
        let conn = Arc::new(Mutex::new(conn));
        Ok(Self { conn })
    }

    pub fn create_deck(&self, title: &str, description: &str, now: Timestamp) -> Fallible<Deck> {
        let conn = self.acquire();
        let sql = "insert into decks (title, description, created_at, updated_at) values (?, ?, ?, ?) returning deck_id;";
        let deck_id: DeckId =
            conn.query_row(sql, (title, description, now, now), |row| row.get(0))?;
        Ok(Deck {
            deck_id,
            title: title.to_string(),
            description: description.to_string(),
            total_cards: 0,
            mastered_cards: 0,
            created_at: now,
            updated_at: now,
        })
    }

    /// All decks, most recently touched first.
    pub fn list_decks(&self) -> Fallible<Vec<Deck>> {
        let conn = self.acquire();
        let sql = "select deck_id, title, description, total_cards, mastered_cards, created_at, updated_at from decks order by updated_at desc, deck_id desc;";
        let mut stmt = conn.prepare(sql)?;
        let mut rows = stmt.query([])?;
        let mut decks = Vec::new();
        while let Some(row) = rows.next()? {
            decks.push(deck_from_row(row)?);
        }
        Ok(decks)
    }

    pub fn get_deck(&self, deck_id: DeckId) -> Fallible<Option<Deck>> {
        let conn = self.acquire();
        let sql = "select deck_id, title, description, total_cards, mastered_cards, created_at, updated_at from decks where deck_id = ?;";
        let mut stmt = conn.prepare(sql)?;
        let mut rows = stmt.query([deck_id])?;
        if let Some(row) = rows.next()? {
            Ok(Some(deck_from_row(row)?))
        } else {
            Ok(None)
        }
    }

    pub fn update_deck(
        &self,
        deck_id: DeckId,
        title: &str,
        description: &str,
        now: Timestamp,
    ) -> Fallible<()> {
        let conn = self.acquire();
        let sql = "update decks set title = ?, description = ?, updated_at = ? where deck_id = ?;";
        conn.execute(sql, (title, description, now, deck_id))?;
        Ok(())
    }

    /// Delete a deck. Its cards and their reviews go with it.
    pub fn delete_deck(&self, deck_id: DeckId) -> Fallible<()> {
        log::debug!("Deleting deck {deck_id}");
        let conn = self.acquire();
        conn.execute("delete from decks where deck_id = ?;", [deck_id])?;
        Ok(())
    }

    pub fn create_card(
        &self,
        deck_id: DeckId,
        front: &str,
        back: &str,
        now: Timestamp,
    ) -> Fallible<Card> {
        let state = MemoryState::new(now);
        let mut conn = self.acquire();
        let tx = conn.transaction()?;
        let sql = "insert into cards (deck_id, front, back, interval, ease_factor, next_review, reviews, is_mastered, mastered_at, created_at) values (?, ?, ?, ?, ?, ?, ?, ?, ?, ?) returning card_id;";
        let card_id: CardId = tx.query_row(
            sql,
            (
                deck_id,
                front,
                back,
                state.interval,
                state.ease_factor,
                state.next_review,
                state.reviews,
                state.is_mastered,
                state.mastered_at,
                now,
            ),
            |row| row.get(0),
        )?;
        tx.execute(
            "update decks set total_cards = total_cards + 1, updated_at = ? where deck_id = ?;",
            (now, deck_id),
        )?;
        tx.commit()?;
        Ok(Card {
            card_id,
            deck_id,
            front: front.to_string(),
            back: back.to_string(),
            state,
            created_at: now,
        })
    }

    pub fn get_card(&self, card_id: CardId) -> Fallible<Option<Card>> {
        let conn = self.acquire();
        let sql = "select card_id, deck_id, front, back, interval, ease_factor, next_review, reviews, is_mastered, mastered_at, created_at from cards where card_id = ?;";
        let mut stmt = conn.prepare(sql)?;
        let mut rows = stmt.query([card_id])?;
        if let Some(row) = rows.next()? {
            Ok(Some(card_from_row(row)?))
        } else {
            Ok(None)
        }
    }

    pub fn update_card(&self, card_id: CardId, front: &str, back: &str) -> Fallible<()> {
        let conn = self.acquire();
        let sql = "update cards set front = ?, back = ? where card_id = ?;";
        conn.execute(sql, (front, back, card_id))?;
        Ok(())
    }

    /// Delete a card, keeping the owning deck's counters in sync.
    pub fn delete_card(&self, card_id: CardId) -> Fallible<()> {
        let mut conn = self.acquire();
        let tx = conn.transaction()?;
        let sql = "select deck_id, is_mastered from cards where card_id = ?;";
        let mut deleted: Option<(DeckId, bool)> = None;
        {
            let mut stmt = tx.prepare(sql)?;
            let mut rows = stmt.query([card_id])?;
            if let Some(row) = rows.next()? {
                deleted = Some((row.get(0)?, row.get(1)?));
            }
        }
        if let Some((deck_id, is_mastered)) = deleted {
            tx.execute("delete from cards where card_id = ?;", [card_id])?;
            tx.execute(
                "update decks set total_cards = total_cards - 1 where deck_id = ?;",
                [deck_id],
            )?;
            if is_mastered {
                tx.execute(
                    "update decks set mastered_cards = mastered_cards - 1 where deck_id = ?;",
                    [deck_id],
                )?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    /// All cards in a deck, oldest first.
    pub fn deck_cards(&self, deck_id: DeckId) -> Fallible<Vec<Card>> {
        let conn = self.acquire();
        let sql = "select card_id, deck_id, front, back, interval, ease_factor, next_review, reviews, is_mastered, mastered_at, created_at from cards where deck_id = ? order by created_at asc, card_id asc;";
        let mut stmt = conn.prepare(sql)?;
        let mut rows = stmt.query([deck_id])?;
        let mut cards = Vec::new();
        while let Some(row) = rows.next()? {
            cards.push(card_from_row(row)?);
        }
        Ok(cards)
    }

    pub fn all_cards(&self) -> Fallible<Vec<Card>> {
        let conn = self.acquire();
        let sql = "select card_id, deck_id, front, back, interval, ease_factor, next_review, reviews, is_mastered, mastered_at, created_at from cards order by created_at asc, card_id asc;";
        let mut stmt = conn.prepare(sql)?;
        let mut rows = stmt.query([])?;
        let mut cards = Vec::new();
        while let Some(row) = rows.next()? {
            cards.push(card_from_row(row)?);
        }
        Ok(cards)
    }

    /// Persist the outcome of rating a card: the card's new memory state, an
    /// entry in the review log, and the deck's mastered counter if the
    /// card's mastery status flipped. One transaction.
    pub fn apply_review(
        &self,
        card: &Card,
        new_state: &MemoryState,
        rating: Rating,
        now: Timestamp,
    ) -> Fallible<()> {
        let mut conn = self.acquire();
        let tx = conn.transaction()?;
        let sql = "update cards set interval = ?, ease_factor = ?, next_review = ?, reviews = ?, is_mastered = ?, mastered_at = ? where card_id = ?;";
        tx.execute(
            sql,
            (
                new_state.interval,
                new_state.ease_factor,
                new_state.next_review,
                new_state.reviews,
                new_state.is_mastered,
                new_state.mastered_at,
                card.card_id,
            ),
        )?;
        let sql = "insert into reviews (card_id, rated_at, rating, interval, ease_factor, next_review) values (?, ?, ?, ?, ?, ?);";
        tx.execute(
            sql,
            (
                card.card_id,
                now,
                rating.as_int(),
                new_state.interval,
                new_state.ease_factor,
                new_state.next_review,
            ),
        )?;
        if new_state.is_mastered != card.state.is_mastered {
            let sql = if new_state.is_mastered {
                "update decks set mastered_cards = mastered_cards + 1 where deck_id = ?;"
            } else {
                "update decks set mastered_cards = mastered_cards - 1 where deck_id = ?;"
            };
            tx.execute(sql, [card.deck_id])?;
        }
        tx.execute(
            "update decks set updated_at = ? where deck_id = ?;",
            (now, card.deck_id),
        )?;
        tx.commit()?;
        Ok(())
    }

    pub fn deck_count(&self) -> Fallible<i64> {
        let conn = self.acquire();
        let count = conn.query_row("select count(*) from decks;", [], |row| row.get(0))?;
        Ok(count)
    }

    pub fn card_count(&self) -> Fallible<i64> {
        let conn = self.acquire();
        let count = conn.query_row("select count(*) from cards;", [], |row| row.get(0))?;
        Ok(count)
    }

    pub fn mastered_count(&self) -> Fallible<i64> {
        let conn = self.acquire();
        let count = conn.query_row("select count(*) from cards where is_mastered;", [], |row| {
            row.get(0)
        })?;
        Ok(count)
    }

    pub fn review_count(&self) -> Fallible<i64> {
        let conn = self.acquire();
        let count = conn.query_row("select count(*) from reviews;", [], |row| row.get(0))?;
        Ok(count)
    }

    fn acquire(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap()
    }
}

fn deck_from_row(row: &Row) -> rusqlite::Result<Deck> {
    Ok(Deck {
        deck_id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        total_cards: row.get(3)?,
        mastered_cards: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

fn card_from_row(row: &Row) -> rusqlite::Result<Card> {
    Ok(Card {
        card_id: row.get(0)?,
        deck_id: row.get(1)?,
        front: row.get(2)?,
        back: row.get(3)?,
        state: MemoryState {
            interval: row.get(4)?,
            ease_factor: row.get(5)?,
            next_review: row.get(6)?,
            reviews: row.get(7)?,
            is_mastered: row.get(8)?,
            mastered_at: row.get(9)?,
        },
        created_at: row.get(10)?,
    })
}

fn probe_schema_exists(tx: &Transaction) -> Fallible<bool> {
    let sql = "select count(*) from sqlite_master where type='table' and name=?;";
    let count: i64 = tx.query_row(sql, ["decks"], |row| row.get(0))?;
    Ok(count > 0)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use chrono::Utc;
    use tempfile::tempdir;

    use super::*;
    use crate::srs::EASE_FACTOR_FLOOR;
    use crate::srs::schedule;

    fn open_test_db(dir: &tempfile::TempDir) -> Database {
        let path = dir.path().join("cardbox.db");
        Database::new(path.to_str().unwrap()).unwrap()
    }

    fn ts(day: u32) -> Timestamp {
        Timestamp::new(Utc.with_ymd_and_hms(2025, 6, day, 10, 0, 0).unwrap())
    }

    #[test]
    fn test_reopen_existing_database() -> Fallible<()> {
        let dir = tempdir()?;
        let path = dir.path().join("cardbox.db");
        {
            let db = Database::new(path.to_str().unwrap())?;
            db.create_deck("Greek", "", ts(1))?;
        }
        let db = Database::new(path.to_str().unwrap())?;
        assert_eq!(db.deck_count()?, 1);
        Ok(())
    }

    #[test]
    fn test_deck_crud() -> Fallible<()> {
        let dir = tempdir()?;
        let db = open_test_db(&dir);

        let deck = db.create_deck("Greek", "Ancient Greek vocabulary", ts(1))?;
        assert_eq!(deck.total_cards, 0);
        assert_eq!(deck.mastered_cards, 0);

        let loaded = db.get_deck(deck.deck_id)?.unwrap();
        assert_eq!(loaded.title, "Greek");
        assert_eq!(loaded.description, "Ancient Greek vocabulary");

        db.update_deck(deck.deck_id, "Attic Greek", "", ts(2))?;
        let loaded = db.get_deck(deck.deck_id)?.unwrap();
        assert_eq!(loaded.title, "Attic Greek");
        assert_eq!(loaded.updated_at, ts(2));

        db.delete_deck(deck.deck_id)?;
        assert!(db.get_deck(deck.deck_id)?.is_none());
        Ok(())
    }

    #[test]
    fn test_list_decks_most_recent_first() -> Fallible<()> {
        let dir = tempdir()?;
        let db = open_test_db(&dir);
        let a = db.create_deck("A", "", ts(1))?;
        let b = db.create_deck("B", "", ts(2))?;
        let decks = db.list_decks()?;
        assert_eq!(decks[0].deck_id, b.deck_id);
        assert_eq!(decks[1].deck_id, a.deck_id);

        // Touching A moves it to the front.
        db.update_deck(a.deck_id, "A", "", ts(3))?;
        let decks = db.list_decks()?;
        assert_eq!(decks[0].deck_id, a.deck_id);
        Ok(())
    }

    #[test]
    fn test_new_card_has_default_state() -> Fallible<()> {
        let dir = tempdir()?;
        let db = open_test_db(&dir);
        let deck = db.create_deck("Greek", "", ts(1))?;
        let card = db.create_card(deck.deck_id, "logos", "word", ts(1))?;

        let loaded = db.get_card(card.card_id)?.unwrap();
        assert_eq!(loaded.front, "logos");
        assert_eq!(loaded.back, "word");
        assert_eq!(loaded.state.interval, 0);
        assert_eq!(loaded.state.ease_factor, EASE_FACTOR_FLOOR);
        assert_eq!(loaded.state.next_review, ts(1));
        assert_eq!(loaded.state.reviews, 0);
        assert!(!loaded.state.is_mastered);
        assert!(loaded.state.mastered_at.is_none());

        let deck = db.get_deck(deck.deck_id)?.unwrap();
        assert_eq!(deck.total_cards, 1);
        Ok(())
    }

    #[test]
    fn test_card_update_and_delete() -> Fallible<()> {
        let dir = tempdir()?;
        let db = open_test_db(&dir);
        let deck = db.create_deck("Greek", "", ts(1))?;
        let card = db.create_card(deck.deck_id, "logos", "word", ts(1))?;

        db.update_card(card.card_id, "kosmos", "world")?;
        let loaded = db.get_card(card.card_id)?.unwrap();
        assert_eq!(loaded.front, "kosmos");

        db.delete_card(card.card_id)?;
        assert!(db.get_card(card.card_id)?.is_none());
        let deck = db.get_deck(deck.deck_id)?.unwrap();
        assert_eq!(deck.total_cards, 0);
        Ok(())
    }

    #[test]
    fn test_apply_review_round_trips_state() -> Fallible<()> {
        let dir = tempdir()?;
        let db = open_test_db(&dir);
        let deck = db.create_deck("Greek", "", ts(1))?;
        let card = db.create_card(deck.deck_id, "logos", "word", ts(1))?;

        let new_state = schedule(&card.state, Rating::Good, ts(1));
        db.apply_review(&card, &new_state, Rating::Good, ts(1))?;

        let loaded = db.get_card(card.card_id)?.unwrap();
        assert_eq!(loaded.state, new_state);
        assert_eq!(db.review_count()?, 1);
        Ok(())
    }

    #[test]
    fn test_mastery_flip_adjusts_deck_counter() -> Fallible<()> {
        let dir = tempdir()?;
        let db = open_test_db(&dir);
        let deck = db.create_deck("Greek", "", ts(1))?;
        let card = db.create_card(deck.deck_id, "logos", "word", ts(1))?;

        // Force a state straight past the threshold.
        let mut mastered = card.state.clone();
        mastered.interval = 24;
        mastered.is_mastered = true;
        mastered.mastered_at = Some(ts(2));
        mastered.reviews = 1;
        db.apply_review(&card, &mastered, Rating::Easy, ts(2))?;
        assert_eq!(db.get_deck(deck.deck_id)?.unwrap().mastered_cards, 1);
        assert_eq!(db.mastered_count()?, 1);

        // Losing mastery decrements it again.
        let card = db.get_card(card.card_id)?.unwrap();
        let reset = schedule(&card.state, Rating::Again, ts(3));
        assert!(!reset.is_mastered);
        db.apply_review(&card, &reset, Rating::Again, ts(3))?;
        assert_eq!(db.get_deck(deck.deck_id)?.unwrap().mastered_cards, 0);
        Ok(())
    }

    #[test]
    fn test_deleting_mastered_card_decrements_counter() -> Fallible<()> {
        let dir = tempdir()?;
        let db = open_test_db(&dir);
        let deck = db.create_deck("Greek", "", ts(1))?;
        let card = db.create_card(deck.deck_id, "logos", "word", ts(1))?;

        let mut mastered = card.state.clone();
        mastered.interval = 30;
        mastered.is_mastered = true;
        mastered.mastered_at = Some(ts(2));
        db.apply_review(&card, &mastered, Rating::Easy, ts(2))?;

        db.delete_card(card.card_id)?;
        let deck = db.get_deck(deck.deck_id)?.unwrap();
        assert_eq!(deck.total_cards, 0);
        assert_eq!(deck.mastered_cards, 0);
        Ok(())
    }

    #[test]
    fn test_deleting_deck_cascades() -> Fallible<()> {
        let dir = tempdir()?;
        let db = open_test_db(&dir);
        let deck = db.create_deck("Greek", "", ts(1))?;
        let card = db.create_card(deck.deck_id, "logos", "word", ts(1))?;
        let new_state = schedule(&card.state, Rating::Good, ts(1));
        db.apply_review(&card, &new_state, Rating::Good, ts(1))?;

        db.delete_deck(deck.deck_id)?;
        assert_eq!(db.card_count()?, 0);
        assert_eq!(db.review_count()?, 0);
        Ok(())
    }

    #[test]
    fn test_deck_cards_oldest_first() -> Fallible<()> {
        let dir = tempdir()?;
        let db = open_test_db(&dir);
        let deck = db.create_deck("Greek", "", ts(1))?;
        let a = db.create_card(deck.deck_id, "a", "1", ts(1))?;
        let b = db.create_card(deck.deck_id, "b", "2", ts(2))?;
        let cards = db.deck_cards(deck.deck_id)?;
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].card_id, a.card_id);
        assert_eq!(cards[1].card_id, b.card_id);
        Ok(())
    }
}
