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

//! The review service: loads a card, runs the scheduler, and persists the
//! outcome.

use crate::db::Database;
use crate::error::Fallible;
use crate::error::fail;
use crate::srs::Rating;
use crate::srs::schedule;
use crate::types::card::Card;
use crate::types::card::CardId;
use crate::types::timestamp::Timestamp;

/// The result of rating a card. The mastery-transition flags are derived by
/// comparing the card's state before and after scheduling; they drive the
/// deck counter update and the UI banner, and are not stored.
pub struct RatingOutcome {
    pub card: Card,
    pub just_mastered: bool,
    pub lost_mastery: bool,
}

/// Rate a card. The rating arrives as the raw integer from the client and is
/// validated here; an out-of-range value is rejected before anything is
/// computed or persisted.
pub fn rate_card(
    db: &Database,
    card_id: CardId,
    rating: i64,
    now: Timestamp,
) -> Fallible<RatingOutcome> {
    let rating = Rating::from_int(rating)?;
    let card = match db.get_card(card_id)? {
        Some(card) => card,
        None => return fail(format!("card {card_id} not found")),
    };
    let new_state = schedule(&card.state, rating, now);
    let just_mastered = new_state.is_mastered && !card.state.is_mastered;
    let lost_mastery = !new_state.is_mastered && card.state.is_mastered;
    db.apply_review(&card, &new_state, rating, now)?;
    log::debug!(
        "card {} rated {}: interval {} -> {}, due {}",
        card.card_id,
        rating.as_str(),
        card.state.interval,
        new_state.interval,
        new_state.next_review.local_date_string()
    );
    Ok(RatingOutcome {
        card: Card {
            state: new_state,
            ..card
        },
        just_mastered,
        lost_mastery,
    })
}
