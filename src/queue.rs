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

//! Due-card selection: which cards to show in a study session, and in what
//! order.

use crate::types::card::Card;
use crate::types::timestamp::Timestamp;

/// The subset of `cards` that is due at `now`, ordered for review:
/// non-mastered cards first, then ascending due date within each bucket.
///
/// The sort is stable, so cards with equal keys keep their input order
/// between calls.
pub fn select_due(cards: Vec<Card>, now: Timestamp) -> Vec<Card> {
    let mut due: Vec<Card> = cards
        .into_iter()
        .filter(|card| card.state.is_due(now))
        .collect();
    due.sort_by_key(|card| (card.state.is_mastered, card.state.next_review));
    due
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use chrono::Utc;

    use super::*;
    use crate::srs::MemoryState;

    fn ts(day: u32) -> Timestamp {
        Timestamp::new(Utc.with_ymd_and_hms(2025, 6, day, 12, 0, 0).unwrap())
    }

    fn card(card_id: i64, next_review: Timestamp, is_mastered: bool) -> Card {
        Card {
            card_id,
            deck_id: 1,
            front: format!("front {card_id}"),
            back: format!("back {card_id}"),
            state: MemoryState {
                interval: if is_mastered { 25 } else { 6 },
                ease_factor: 2.5,
                next_review,
                reviews: 1,
                is_mastered,
                mastered_at: if is_mastered { Some(ts(1)) } else { None },
            },
            created_at: ts(1),
        }
    }

    fn ids(cards: &[Card]) -> Vec<i64> {
        cards.iter().map(|c| c.card_id).collect()
    }

    #[test]
    fn test_filters_and_orders() {
        // A: due yesterday, not mastered.
        // B: due yesterday, mastered.
        // C: due tomorrow, not mastered.
        // D: due today, not mastered.
        let now = ts(10);
        let cards = vec![
            card(1, ts(9), false),
            card(2, ts(9), true),
            card(3, ts(11), false),
            card(4, ts(10), false),
        ];
        let due = select_due(cards, now);
        assert_eq!(ids(&due), vec![1, 4, 2]);
    }

    #[test]
    fn test_due_boundary_is_inclusive() {
        let now = ts(10);
        let due = select_due(vec![card(1, now, false)], now);
        assert_eq!(ids(&due), vec![1]);
    }

    #[test]
    fn test_empty_input() {
        assert!(select_due(Vec::new(), ts(10)).is_empty());
    }

    #[test]
    fn test_stable_for_equal_keys() {
        let now = ts(10);
        let cards = vec![
            card(7, ts(9), false),
            card(3, ts(9), false),
            card(5, ts(9), false),
        ];
        let due = select_due(cards, now);
        assert_eq!(ids(&due), vec![7, 3, 5]);
    }

    #[test]
    fn test_mastered_cards_deprioritized_regardless_of_date() {
        let now = ts(10);
        let cards = vec![card(1, ts(2), true), card(2, ts(9), false)];
        let due = select_due(cards, now);
        assert_eq!(ids(&due), vec![2, 1]);
    }
}
