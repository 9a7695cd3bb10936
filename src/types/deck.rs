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

use crate::types::timestamp::Timestamp;

pub type DeckId = i64;

/// A named collection of cards.
///
/// `total_cards` and `mastered_cards` are denormalized counters maintained by
/// the database layer: card creation and deletion adjust `total_cards`, and
/// reviews that flip a card's mastery status adjust `mastered_cards`.
#[derive(Clone, Debug)]
pub struct Deck {
    pub deck_id: DeckId,
    pub title: String,
    pub description: String,
    pub total_cards: i64,
    pub mastered_cards: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
