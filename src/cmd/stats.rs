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

use std::fmt::Display;
use std::fmt::Formatter;
use std::path::Path;

use clap::ValueEnum;
use serde::Serialize;

use crate::db::Database;
use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::queue::select_due;
use crate::types::timestamp::Timestamp;

#[derive(ValueEnum, Clone)]
pub enum StatsFormat {
    /// Human-readable text.
    Text,
    /// JSON output.
    Json,
}

impl Display for StatsFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StatsFormat::Text => write!(f, "text"),
            StatsFormat::Json => write!(f, "json"),
        }
    }
}

#[derive(Serialize)]
struct Stats {
    deck_count: i64,
    card_count: i64,
    mastered_count: i64,
    due_count: usize,
    review_count: i64,
}

pub fn print_stats(directory: &Path, format: StatsFormat) -> Fallible<()> {
    let db_path = directory.join("cardbox.db");
    let db = Database::new(
        db_path
            .to_str()
            .ok_or_else(|| ErrorReport::new("invalid path"))?,
    )?;
    let stats = gather_stats(&db, Timestamp::now())?;
    match format {
        StatsFormat::Text => {
            println!("Decks:     {}", stats.deck_count);
            println!("Cards:     {}", stats.card_count);
            println!("Mastered:  {}", stats.mastered_count);
            println!("Due now:   {}", stats.due_count);
            println!("Reviews:   {}", stats.review_count);
        }
        StatsFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
    }
    Ok(())
}

fn gather_stats(db: &Database, now: Timestamp) -> Fallible<Stats> {
    Ok(Stats {
        deck_count: db.deck_count()?,
        card_count: db.card_count()?,
        mastered_count: db.mastered_count()?,
        due_count: select_due(db.all_cards()?, now).len(),
        review_count: db.review_count()?,
    })
}
