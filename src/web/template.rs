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

use axum::http::StatusCode;
use axum::response::Html;
use maud::DOCTYPE;
use maud::Markup;
use maud::html;

use crate::error::ErrorReport;

pub fn page_template(title: &str, body: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) }
                link rel="stylesheet" href="/style.css";
            }
            body {
                (body)
            }
        }
    }
}

pub fn ok_page(title: &str, body: Markup) -> (StatusCode, Html<String>) {
    (
        StatusCode::OK,
        Html(page_template(title, body).into_string()),
    )
}

pub fn internal_error_page(e: &ErrorReport) -> (StatusCode, Html<String>) {
    log::error!("{e}");
    let body = html! {
        div.root {
            p.error { "Something went wrong." }
            a href="/" { "Back to decks" }
        }
    };
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Html(page_template("Error", body).into_string()),
    )
}

pub fn not_found_page() -> (StatusCode, Html<String>) {
    let body = html! {
        div.root {
            p.error { "Not found." }
            a href="/" { "Back to decks" }
        }
    };
    (
        StatusCode::NOT_FOUND,
        Html(page_template("Not found", body).into_string()),
    )
}

pub fn bad_request_page(message: &str) -> (StatusCode, Html<String>) {
    let body = html! {
        div.root {
            p.error { (message) }
            a href="/" { "Back to decks" }
        }
    };
    (
        StatusCode::BAD_REQUEST,
        Html(page_template("Bad request", body).into_string()),
    )
}
