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

use std::path::PathBuf;

use axum::Router;
use axum::http::StatusCode;
use axum::http::header::CONTENT_TYPE;
use axum::routing::get;
use axum::routing::post;
use tokio::net::TcpListener;

use crate::db::Database;
use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::error::fail;
use crate::web::get::card_edit_handler;
use crate::web::get::deck_handler;
use crate::web::get::home_handler;
use crate::web::get::quiz_handler;
use crate::web::get::study_handler;
use crate::web::post::create_card_handler;
use crate::web::post::create_deck_handler;
use crate::web::post::delete_card_handler;
use crate::web::post::delete_deck_handler;
use crate::web::post::rate_handler;
use crate::web::post::update_card_handler;
use crate::web::post::update_deck_handler;
use crate::web::state::ServerState;
use crate::web::template::not_found_page;

pub async fn start_server(directory: PathBuf, port: u16, open_browser: bool) -> Fallible<()> {
    if !directory.exists() {
        return fail("directory does not exist.");
    }
    let db_path = directory.join("cardbox.db");
    let db_path = db_path
        .to_str()
        .ok_or_else(|| ErrorReport::new("invalid path"))?;
    let db = Database::new(db_path)?;
    let state = ServerState { db };

    let app = Router::new()
        .route("/", get(home_handler))
        .route("/decks", post(create_deck_handler))
        .route("/decks/{deck_id}", get(deck_handler).post(update_deck_handler))
        .route("/decks/{deck_id}/delete", post(delete_deck_handler))
        .route("/decks/{deck_id}/cards", post(create_card_handler))
        .route("/decks/{deck_id}/study", get(study_handler))
        .route("/decks/{deck_id}/quiz", get(quiz_handler))
        .route("/cards/{card_id}", post(update_card_handler))
        .route("/cards/{card_id}/edit", get(card_edit_handler))
        .route("/cards/{card_id}/rate", post(rate_handler))
        .route("/cards/{card_id}/delete", post(delete_card_handler))
        .route("/style.css", get(style_handler))
        .fallback(fallback_handler)
        .with_state(state);

    let url = format!("http://localhost:{port}");
    let listener = TcpListener::bind(("0.0.0.0", port)).await?;
    log::info!("Listening on {url}");
    if open_browser {
        if let Err(e) = open::that(&url) {
            log::error!("failed to open browser: {e}");
        }
    }
    axum::serve(listener, app).await?;
    Ok(())
}

async fn style_handler() -> (StatusCode, [(axum::http::HeaderName, &'static str); 1], &'static str)
{
    (
        StatusCode::OK,
        [(CONTENT_TYPE, "text/css")],
        include_str!("style.css"),
    )
}

async fn fallback_handler() -> (StatusCode, axum::response::Html<String>) {
    not_found_page()
}
