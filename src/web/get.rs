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

use axum::extract::Path;
use axum::extract::Query;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Html;
use maud::Markup;
use maud::PreEscaped;
use maud::html;
use serde::Deserialize;

use crate::error::Fallible;
use crate::markdown::markdown_to_html;
use crate::markdown::markdown_to_html_inline;
use crate::queue::select_due;
use crate::quiz::generate_quiz;
use crate::types::card::Card;
use crate::types::card::CardId;
use crate::types::deck::Deck;
use crate::types::deck::DeckId;
use crate::types::timestamp::Timestamp;
use crate::web::state::ServerState;
use crate::web::template::internal_error_page;
use crate::web::template::not_found_page;
use crate::web::template::ok_page;

/// How many questions a generated quiz has.
const QUIZ_SIZE: usize = 10;

pub async fn home_handler(State(state): State<ServerState>) -> (StatusCode, Html<String>) {
    match home_view(&state) {
        Ok(body) => ok_page("cardbox", body),
        Err(e) => internal_error_page(&e),
    }
}

fn home_view(state: &ServerState) -> Fallible<Markup> {
    let now = Timestamp::now();
    let decks = state.db.list_decks()?;
    let mut rows = Vec::new();
    for deck in &decks {
        let cards = state.db.deck_cards(deck.deck_id)?;
        let due = select_due(cards, now).len();
        rows.push((deck.clone(), due));
    }
    Ok(html! {
        div.root {
            h1 { "Decks" }
            @if rows.is_empty() {
                p { "No decks yet. Create one below." }
            }
            ul.decks {
                @for (deck, due) in &rows {
                    li.deck {
                        a href=(format!("/decks/{}", deck.deck_id)) { (deck.title) }
                        span.counts {
                            (deck.total_cards) " cards, "
                            (deck.mastered_cards) " mastered, "
                            (due) " due, updated "
                            (deck.updated_at.local_date_string())
                        }
                    }
                }
            }
            form.create action="/decks" method="post" {
                h2 { "New deck" }
                input type="text" name="title" placeholder="Title" required;
                input type="text" name="description" placeholder="Description";
                input type="submit" value="Create";
            }
        }
    })
}

pub async fn deck_handler(
    State(state): State<ServerState>,
    Path(deck_id): Path<DeckId>,
) -> (StatusCode, Html<String>) {
    match deck_view(&state, deck_id) {
        Ok(Some(body)) => ok_page("cardbox", body),
        Ok(None) => not_found_page(),
        Err(e) => internal_error_page(&e),
    }
}

fn deck_view(state: &ServerState, deck_id: DeckId) -> Fallible<Option<Markup>> {
    let deck = match state.db.get_deck(deck_id)? {
        Some(deck) => deck,
        None => return Ok(None),
    };
    let now = Timestamp::now();
    let cards = state.db.deck_cards(deck_id)?;
    let due = select_due(cards.clone(), now).len();
    Ok(Some(html! {
        div.root {
            p.breadcrumb { a href="/" { "Decks" } " / " (deck.title) }
            h1 { (deck.title) }
            @if !deck.description.is_empty() {
                p.description { (deck.description) }
            }
            p.counts {
                (deck.total_cards) " cards, "
                (deck.mastered_cards) " mastered, "
                (due) " due. Created " (deck.created_at.local_date_string()) "."
            }
            div.actions {
                a.button href=(format!("/decks/{deck_id}/study")) { "Study" }
                a.button href=(format!("/decks/{deck_id}/quiz")) { "Quiz" }
            }
            (card_table(&cards))
            form.create action=(format!("/decks/{deck_id}/cards")) method="post" {
                h2 { "New card" }
                textarea name="front" placeholder="Front (Markdown)" required {}
                textarea name="back" placeholder="Back (Markdown)" required {}
                input type="submit" value="Add card";
            }
            form.edit action=(format!("/decks/{deck_id}")) method="post" {
                h2 { "Edit deck" }
                input type="text" name="title" value=(deck.title) required;
                input type="text" name="description" value=(deck.description);
                input type="submit" value="Save";
            }
            form.danger action=(format!("/decks/{deck_id}/delete")) method="post" {
                input type="submit" value="Delete deck";
            }
        }
    }))
}

fn card_table(cards: &[Card]) -> Markup {
    html! {
        @if cards.is_empty() {
            p { "No cards yet." }
        } @else {
            table.cards {
                thead {
                    tr {
                        th { "Front" }
                        th { "Back" }
                        th { "Interval" }
                        th { "Due" }
                        th { "Reviews" }
                        th { "Added" }
                        th { }
                    }
                }
                tbody {
                    @for card in cards {
                        tr {
                            td.rich-text { (PreEscaped(markdown_to_html_inline(&card.front))) }
                            td.rich-text { (PreEscaped(markdown_to_html_inline(&card.back))) }
                            td {
                                (card.state.interval) "d"
                                @if card.state.is_mastered {
                                    " " span.mastered { "mastered" }
                                }
                            }
                            td { (card.state.next_review.local_date_string()) }
                            td { (card.state.reviews) }
                            td { (card.created_at.local_date_string()) }
                            td {
                                a href=(format!("/cards/{}/edit", card.card_id)) { "Edit" }
                                form action=(format!("/cards/{}/delete", card.card_id)) method="post" {
                                    input type="submit" value="Delete";
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

pub async fn card_edit_handler(
    State(state): State<ServerState>,
    Path(card_id): Path<CardId>,
) -> (StatusCode, Html<String>) {
    match card_edit_view(&state, card_id) {
        Ok(Some(body)) => ok_page("cardbox", body),
        Ok(None) => not_found_page(),
        Err(e) => internal_error_page(&e),
    }
}

fn card_edit_view(state: &ServerState, card_id: CardId) -> Fallible<Option<Markup>> {
    let card = match state.db.get_card(card_id)? {
        Some(card) => card,
        None => return Ok(None),
    };
    Ok(Some(html! {
        div.root {
            p.breadcrumb { a href="/" { "Decks" } " / " a href=(format!("/decks/{}", card.deck_id)) { "Deck" } }
            h1 { "Edit card" }
            form.edit action=(format!("/cards/{card_id}")) method="post" {
                textarea name="front" required { (card.front) }
                textarea name="back" required { (card.back) }
                input type="submit" value="Save";
            }
        }
    }))
}

#[derive(Deserialize)]
pub struct StudyParams {
    reveal: Option<bool>,
    mastered: Option<bool>,
}

pub async fn study_handler(
    State(state): State<ServerState>,
    Path(deck_id): Path<DeckId>,
    Query(params): Query<StudyParams>,
) -> (StatusCode, Html<String>) {
    match study_view(&state, deck_id, &params) {
        Ok(Some(body)) => ok_page("cardbox", body),
        Ok(None) => not_found_page(),
        Err(e) => internal_error_page(&e),
    }
}

fn study_view(
    state: &ServerState,
    deck_id: DeckId,
    params: &StudyParams,
) -> Fallible<Option<Markup>> {
    let deck = match state.db.get_deck(deck_id)? {
        Some(deck) => deck,
        None => return Ok(None),
    };
    let now = Timestamp::now();
    let due = select_due(state.db.deck_cards(deck_id)?, now);
    let banner = html! {
        @if params.mastered.unwrap_or(false) {
            p.banner { "Mastered!" }
        }
    };
    let body = match due.first() {
        None => html! {
            div.root {
                p.breadcrumb { a href="/" { "Decks" } " / " a href=(format!("/decks/{deck_id}")) { (deck.title) } }
                (banner)
                div.card {
                    p { "No cards due. Come back later." }
                }
            }
        },
        Some(card) => {
            let reveal = params.reveal.unwrap_or(false);
            let question = markdown_to_html(&card.front);
            let answer = markdown_to_html(&card.back);
            html! {
                div.root {
                    p.breadcrumb { a href="/" { "Decks" } " / " a href=(format!("/decks/{deck_id}")) { (deck.title) } }
                    (banner)
                    p.remaining { (due.len()) " due" }
                    div.card {
                        div.question.rich-text { (PreEscaped(question)) }
                        @if reveal {
                            div.answer.rich-text { (PreEscaped(answer)) }
                        }
                    }
                    div.controls {
                        @if reveal {
                            form action=(format!("/cards/{}/rate", card.card_id)) method="post" {
                                button name="rating" value="0" { "Again" }
                                button name="rating" value="1" { "Hard" }
                                button name="rating" value="2" { "Good" }
                                button name="rating" value="3" { "Easy" }
                            }
                        } @else {
                            a.button href=(format!("/decks/{deck_id}/study?reveal=true")) { "Reveal" }
                        }
                    }
                }
            }
        }
    };
    Ok(Some(body))
}

pub async fn quiz_handler(
    State(state): State<ServerState>,
    Path(deck_id): Path<DeckId>,
) -> (StatusCode, Html<String>) {
    match quiz_view(&state, deck_id) {
        Ok(Some(body)) => ok_page("cardbox", body),
        Ok(None) => not_found_page(),
        Err(e) => internal_error_page(&e),
    }
}

fn quiz_view(state: &ServerState, deck_id: DeckId) -> Fallible<Option<Markup>> {
    let deck: Deck = match state.db.get_deck(deck_id)? {
        Some(deck) => deck,
        None => return Ok(None),
    };
    let cards = state.db.deck_cards(deck_id)?;
    let mut rng = rand::thread_rng();
    let questions = generate_quiz(&cards, QUIZ_SIZE, &mut rng);
    Ok(Some(html! {
        div.root {
            p.breadcrumb { a href="/" { "Decks" } " / " a href=(format!("/decks/{deck_id}")) { (deck.title) } }
            h1 { "Quiz: " (deck.title) }
            @if questions.is_empty() {
                p { "No cards in this deck to quiz on." }
            }
            ol.quiz {
                @for q in &questions {
                    li.question id=(format!("card-{}", q.card_id)) {
                        div.rich-text { (PreEscaped(markdown_to_html_inline(&q.question))) }
                        ul.options {
                            @for option in &q.options {
                                li { (PreEscaped(markdown_to_html_inline(option))) }
                            }
                        }
                        details {
                            summary { "Answer" }
                            div.rich-text { (PreEscaped(markdown_to_html_inline(&q.correct_answer))) }
                        }
                    }
                }
            }
            a.button href=(format!("/decks/{deck_id}/quiz")) { "New quiz" }
        }
    }))
}
