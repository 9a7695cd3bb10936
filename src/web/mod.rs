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

mod get;
mod post;
pub mod server;
mod state;
mod template;

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::time::Duration;

    use reqwest::StatusCode;
    use tempfile::tempdir;
    use tokio::net::TcpStream;
    use tokio::spawn;
    use tokio::time::sleep;

    use crate::error::Fallible;
    use crate::web::server::start_server;

    #[tokio::test]
    async fn test_start_server_on_non_existent_directory() -> Fallible<()> {
        let directory = PathBuf::from("./derpherp");
        let result = start_server(directory, 0, false).await;
        assert!(result.is_err());
        let err = result.err().unwrap();
        assert_eq!(err.to_string(), "error: directory does not exist.");
        Ok(())
    }

    async fn spawn_server() -> Fallible<(tempfile::TempDir, String)> {
        let dir = tempdir()?;
        let directory = dir.path().to_path_buf();
        let port = portpicker::pick_unused_port().expect("no free port");
        spawn(async move { start_server(directory, port, false).await });
        loop {
            if let Ok(stream) = TcpStream::connect(("127.0.0.1", port)).await {
                drop(stream);
                break;
            }
            sleep(Duration::from_millis(1)).await;
        }
        Ok((dir, format!("http://127.0.0.1:{port}")))
    }

    #[tokio::test]
    async fn test_static_and_missing_routes() -> Fallible<()> {
        let (_dir, base) = spawn_server().await?;

        let response = reqwest::get(format!("{base}/style.css")).await?;
        assert!(response.status().is_success());
        assert_eq!(response.headers().get("content-type").unwrap(), "text/css");

        let response = reqwest::get(format!("{base}/herp-derp")).await?;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = reqwest::get(format!("{base}/decks/999")).await?;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        Ok(())
    }

    #[tokio::test]
    async fn test_deck_card_study_flow() -> Fallible<()> {
        let (_dir, base) = spawn_server().await?;
        let client = reqwest::Client::new();

        // The empty collection renders.
        let response = reqwest::get(format!("{base}/")).await?;
        assert!(response.status().is_success());
        let html = response.text().await?;
        assert!(html.contains("No decks yet"));

        // Create a deck; the redirect lands on the deck page.
        let response = client
            .post(format!("{base}/decks"))
            .form(&[("title", "Greek"), ("description", "Vocabulary")])
            .send()
            .await?;
        assert!(response.status().is_success());
        let deck_url = response.url().to_string();
        assert!(deck_url.contains("/decks/"));
        let html = response.text().await?;
        assert!(html.contains("Greek"));
        assert!(html.contains("No cards yet"));

        // Add a card.
        let response = client
            .post(format!("{deck_url}/cards"))
            .form(&[("front", "logos"), ("back", "word")])
            .send()
            .await?;
        assert!(response.status().is_success());
        let html = response.text().await?;
        assert!(html.contains("logos"));

        // A new card is due immediately; the study page shows its front.
        let response = reqwest::get(format!("{deck_url}/study")).await?;
        let html = response.text().await?;
        assert!(html.contains("logos"));
        assert!(html.contains("Reveal"));
        assert!(!html.contains("Again"));

        // Revealing shows the back and the rating buttons. The rate form
        // carries the card id.
        let response = reqwest::get(format!("{deck_url}/study?reveal=true")).await?;
        let html = response.text().await?;
        assert!(html.contains("word"));
        assert!(html.contains("Again"));
        let action_start = html.find("/cards/").unwrap();
        let action_end = html[action_start..].find("/rate").unwrap() + action_start;
        let card_id = &html[action_start + "/cards/".len()..action_end];

        // An out-of-range rating is rejected without changing anything.
        let response = client
            .post(format!("{base}/cards/{card_id}/rate"))
            .form(&[("rating", "9")])
            .send()
            .await?;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let response = reqwest::get(format!("{deck_url}/study")).await?;
        assert!(response.text().await?.contains("logos"));

        // Rating the card Good schedules it a day out, emptying the queue.
        let response = client
            .post(format!("{base}/cards/{card_id}/rate"))
            .form(&[("rating", "2")])
            .send()
            .await?;
        assert!(response.status().is_success());
        let response = reqwest::get(format!("{deck_url}/study")).await?;
        let html = response.text().await?;
        assert!(html.contains("No cards due"));

        // Rating an unknown card is a 404.
        let response = client
            .post(format!("{base}/cards/4242/rate"))
            .form(&[("rating", "2")])
            .send()
            .await?;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        Ok(())
    }

    #[tokio::test]
    async fn test_quiz_page() -> Fallible<()> {
        let (_dir, base) = spawn_server().await?;
        let client = reqwest::Client::new();

        let response = client
            .post(format!("{base}/decks"))
            .form(&[("title", "Greek")])
            .send()
            .await?;
        let deck_url = response.url().to_string();
        for (front, back) in [("logos", "word"), ("kosmos", "world"), ("polis", "city")] {
            client
                .post(format!("{deck_url}/cards"))
                .form(&[("front", front), ("back", back)])
                .send()
                .await?;
        }

        let response = reqwest::get(format!("{deck_url}/quiz")).await?;
        assert!(response.status().is_success());
        let html = response.text().await?;
        assert!(html.contains("Quiz"));
        assert!(html.contains("Answer"));
        Ok(())
    }
}
