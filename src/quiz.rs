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

//! Multiple-choice quiz generation: a randomized selection over a deck's
//! cards, with distractor answers drawn from sibling cards.

use rand::Rng;
use rand::seq::SliceRandom;

use crate::types::card::Card;
use crate::types::card::CardId;

/// How many answer options a question has, including the correct one.
const OPTION_COUNT: usize = 4;

pub struct QuizQuestion {
    pub card_id: CardId,
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: String,
}

/// Build a quiz of up to `count` questions from `cards`.
///
/// Each question uses a card's front as the prompt and its back as the
/// correct answer, with up to three distractors taken from other cards'
/// backs (skipping any that match the correct answer). Small decks simply
/// yield questions with fewer options.
pub fn generate_quiz(cards: &[Card], count: usize, rng: &mut impl Rng) -> Vec<QuizQuestion> {
    let mut picked: Vec<&Card> = cards.iter().collect();
    picked.shuffle(rng);
    picked.truncate(count);

    let mut questions = Vec::with_capacity(picked.len());
    for card in picked {
        let mut distractors: Vec<&str> = cards
            .iter()
            .filter(|other| other.card_id != card.card_id && other.back != card.back)
            .map(|other| other.back.as_str())
            .collect();
        distractors.sort_unstable();
        distractors.dedup();
        distractors.shuffle(rng);
        distractors.truncate(OPTION_COUNT - 1);

        let mut options: Vec<String> = distractors.into_iter().map(String::from).collect();
        options.push(card.back.clone());
        options.shuffle(rng);

        questions.push(QuizQuestion {
            card_id: card.card_id,
            question: card.front.clone(),
            options,
            correct_answer: card.back.clone(),
        });
    }
    questions
}
