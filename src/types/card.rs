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

use crate::srs::MemoryState;
use crate::types::deck::DeckId;
use crate::types::timestamp::Timestamp;

pub type CardId = i64;

/// A single question/answer study unit belonging to a deck.
#[derive(Clone, Debug)]
pub struct Card {
    pub card_id: CardId,
    pub deck_id: DeckId,
    /// The question side, as Markdown.
    pub front: String,
    /// The answer side, as Markdown.
    pub back: String,
    pub state: MemoryState,
    pub created_at: Timestamp,
}
