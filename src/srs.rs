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

//! The review scheduler: a pure function from a card's memory state and a
//! recall rating to its next memory state.

use crate::error::Fallible;
use crate::error::fail;
use crate::types::timestamp::Timestamp;

/// A card whose interval has reached this many days counts as mastered.
pub const MASTERY_THRESHOLD_DAYS: i64 = 21;

/// The hard floor on the ease factor.
pub const EASE_FACTOR_FLOOR: f64 = 1.3;

/// How well the user recalled a card, in increasing order of quality.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Rating {
    Again,
    Hard,
    Good,
    Easy,
}

impl Rating {
    /// Parse a rating from its integer encoding. Anything outside 0..=3 is
    /// rejected: silently coercing a bad rating would corrupt the schedule.
    pub fn from_int(value: i64) -> Fallible<Self> {
        match value {
            0 => Ok(Rating::Again),
            1 => Ok(Rating::Hard),
            2 => Ok(Rating::Good),
            3 => Ok(Rating::Easy),
            _ => fail(format!("invalid rating: {value} (must be 0, 1, 2, or 3)")),
        }
    }

    pub fn as_int(self) -> i64 {
        match self {
            Rating::Again => 0,
            Rating::Hard => 1,
            Rating::Good => 2,
            Rating::Easy => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Rating::Again => "Again",
            Rating::Hard => "Hard",
            Rating::Good => "Good",
            Rating::Easy => "Easy",
        }
    }
}

/// The scheduling state of a single card.
#[derive(Clone, PartialEq, Debug)]
pub struct MemoryState {
    /// Days until the next scheduled review. Zero means the card has had no
    /// successful review since its last reset.
    pub interval: i64,
    /// Multiplier controlling interval growth. Never below
    /// [`EASE_FACTOR_FLOOR`].
    pub ease_factor: f64,
    /// When the card next becomes due.
    pub next_review: Timestamp,
    /// Total number of review events applied to this card.
    pub reviews: i64,
    /// Whether the interval has reached [`MASTERY_THRESHOLD_DAYS`]. Derived
    /// from `interval`, recomputed on every review.
    pub is_mastered: bool,
    /// Set at the moment the card becomes mastered, cleared when mastery is
    /// lost.
    pub mastered_at: Option<Timestamp>,
}

impl MemoryState {
    /// The state of a freshly created card: due immediately, ease at the
    /// floor.
    pub fn new(now: Timestamp) -> Self {
        Self {
            interval: 0,
            ease_factor: EASE_FACTOR_FLOOR,
            next_review: now,
            reviews: 0,
            is_mastered: false,
            mastered_at: None,
        }
    }

    pub fn is_due(&self, now: Timestamp) -> bool {
        self.next_review <= now
    }
}

/// Compute a card's next memory state after a review.
///
/// Pure and deterministic: `now` is passed in rather than read from the
/// clock, and the result depends only on the arguments. The caller persists
/// the result and compares the old and new `is_mastered` flags to detect a
/// mastery transition.
pub fn schedule(state: &MemoryState, rating: Rating, now: Timestamp) -> MemoryState {
    // Ease factor update, applied on every rating:
    // Easy +0.1, Good +0.02, Hard -0.06, Again -0.14, floored at 1.3.
    let delta = 0.1 - (3.0 - rating.as_int() as f64) * 0.08;
    let ease_factor = (state.ease_factor + delta).max(EASE_FACTOR_FLOOR);

    let interval = match rating {
        // A failed recall resets the card to the unlearned bucket. This
        // takes precedence over the fixed early steps below.
        Rating::Again | Rating::Hard => 0,
        Rating::Good | Rating::Easy => match state.interval {
            // First successful review.
            0 => 1,
            // Second successful review: a fixed jump, not ease-driven.
            1 => 6,
            // After that, geometric growth using the just-updated ease.
            // `f64::round` rounds ties away from zero, matching the
            // original implementation's rounding for positive intervals.
            n => (n as f64 * ease_factor).round() as i64,
        },
    };

    let next_review = now.add_days(interval);
    let is_mastered = interval >= MASTERY_THRESHOLD_DAYS;
    let mastered_at = match (state.is_mastered, is_mastered) {
        (false, true) => Some(now),
        (true, false) => None,
        // No transition: carried over unchanged, so the timestamp records
        // when mastery was first reached.
        _ => state.mastered_at,
    };

    MemoryState {
        interval,
        ease_factor,
        next_review,
        reviews: state.reviews + 1,
        is_mastered,
        mastered_at,
    }
}
