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

use axum::Form;
use axum::extract::Path;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::response::Redirect;
use axum::response::Response;
use serde::Deserialize;

use crate::review::rate_card;
use crate::srs::Rating;
use crate::types::card::CardId;
use crate::types::deck::DeckId;
use crate::types::timestamp::Timestamp;
use crate::web::state::ServerState;
use crate::web::template::bad_request_page;
use crate::web::template::internal_error_page;
use crate::web::template::not_found_page;

#[derive(Deserialize)]
pub struct DeckForm {
    title: String,
    #[serde(default)]
    description: String,
}

#[derive(Deserialize)]
pub struct CardForm {
    front: String,
    back: String,
}

#[derive(Deserialize)]
pub struct RateForm {
    rating: i64,
}

pub async fn create_deck_handler(
    State(state): State<ServerState>,
    Form(form): Form<DeckForm>,
) -> Response {
    let title = form.title.trim();
    if title.is_empty() {
        return bad_request_page("title is required").into_response();
    }
    match state
        .db
        .create_deck(title, form.description.trim(), Timestamp::now())
    {
        Ok(deck) => Redirect::to(&format!("/decks/{}", deck.deck_id)).into_response(),
        Err(e) => internal_error_page(&e).into_response(),
    }
}

pub async fn update_deck_handler(
    State(state): State<ServerState>,
    Path(deck_id): Path<DeckId>,
    Form(form): Form<DeckForm>,
) -> Response {
    let title = form.title.trim();
    if title.is_empty() {
        return bad_request_page("title is required").into_response();
    }
    match state
        .db
        .update_deck(deck_id, title, form.description.trim(), Timestamp::now())
    {
        Ok(()) => Redirect::to(&format!("/decks/{deck_id}")).into_response(),
        Err(e) => internal_error_page(&e).into_response(),
    }
}

pub async fn delete_deck_handler(
    State(state): State<ServerState>,
    Path(deck_id): Path<DeckId>,
) -> Response {
    match state.db.delete_deck(deck_id) {
        Ok(()) => Redirect::to("/").into_response(),
        Err(e) => internal_error_page(&e).into_response(),
    }
}

pub async fn create_card_handler(
    State(state): State<ServerState>,
    Path(deck_id): Path<DeckId>,
    Form(form): Form<CardForm>,
) -> Response {
    let front = form.front.trim();
    let back = form.back.trim();
    if front.is_empty() || back.is_empty() {
        return bad_request_page("front and back are required").into_response();
    }
    match state.db.get_deck(deck_id) {
        Ok(Some(_)) => {}
        Ok(None) => return not_found_page().into_response(),
        Err(e) => return internal_error_page(&e).into_response(),
    }
    match state.db.create_card(deck_id, front, back, Timestamp::now()) {
        Ok(_) => Redirect::to(&format!("/decks/{deck_id}")).into_response(),
        Err(e) => internal_error_page(&e).into_response(),
    }
}

pub async fn update_card_handler(
    State(state): State<ServerState>,
    Path(card_id): Path<CardId>,
    Form(form): Form<CardForm>,
) -> Response {
    let front = form.front.trim();
    let back = form.back.trim();
    if front.is_empty() || back.is_empty() {
        return bad_request_page("front and back are required").into_response();
    }
    let card = match state.db.get_card(card_id) {
        Ok(Some(card)) => card,
        Ok(None) => return not_found_page().into_response(),
        Err(e) => return internal_error_page(&e).into_response(),
    };
    match state.db.update_card(card_id, front, back) {
        Ok(()) => Redirect::to(&format!("/decks/{}", card.deck_id)).into_response(),
        Err(e) => internal_error_page(&e).into_response(),
    }
}

pub async fn delete_card_handler(
    State(state): State<ServerState>,
    Path(card_id): Path<CardId>,
) -> Response {
    let card = match state.db.get_card(card_id) {
        Ok(Some(card)) => card,
        Ok(None) => return not_found_page().into_response(),
        Err(e) => return internal_error_page(&e).into_response(),
    };
    match state.db.delete_card(card_id) {
        Ok(()) => Redirect::to(&format!("/decks/{}", card.deck_id)).into_response(),
        Err(e) => internal_error_page(&e).into_response(),
    }
}

pub async fn rate_handler(
    State(state): State<ServerState>,
    Path(card_id): Path<CardId>,
    Form(form): Form<RateForm>,
) -> Response {
    // Reject a bad rating before touching the card: an invalid submission
    // must not change any state.
    if let Err(e) = Rating::from_int(form.rating) {
        log::warn!("{e}");
        return bad_request_page(&e.to_string()).into_response();
    }
    if let Ok(None) = state.db.get_card(card_id) {
        return not_found_page().into_response();
    }
    match rate_card(&state.db, card_id, form.rating, Timestamp::now()) {
        Ok(outcome) => {
            if outcome.lost_mastery {
                log::debug!("card {card_id} lost mastery");
            }
            let mut target = format!("/decks/{}/study", outcome.card.deck_id);
            if outcome.just_mastered {
                target.push_str("?mastered=true");
            }
            Redirect::to(&target).into_response()
        }
        Err(e) => internal_error_page(&e).into_response(),
    }
}
